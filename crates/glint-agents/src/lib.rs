// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Glint Agents
//!
//! The orchestration layer of the shader pipeline. The [`ProgramAgent`]
//! turns a vertex/fragment source pair into a linked, reflected program:
//! it drives the dialect rewriter from `glint-lanes`, consults the binary
//! cache from `glint-io`, and talks to whichever [`ShaderDevice`] it was
//! given.
//!
//! [`ShaderDevice`]: glint_core::renderer::ShaderDevice

#![warn(missing_docs)]

pub mod program_agent;

pub use program_agent::{LinkedProgram, ProgramAgent, ProgramStats, ReflectionTable};
