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

//! Acts as the **[A]gent** for shader programs.
//!
//! The [`ProgramAgent`] is the façade the draw-dispatch layer talks to. It
//! drives the dialect rewriter from `glint-lanes`, consults the binary cache
//! from `glint-io`, compiles and links through a [`ShaderDevice`], indexes the
//! linked program's uniforms and owns the resulting program table.
//!
//! [`ShaderDevice`]: glint_core::renderer::ShaderDevice

mod agent;
mod compiler;
mod constants;
mod reflection;
mod stats;
mod store;

pub use self::agent::{LinkedProgram, ProgramAgent};
pub use self::reflection::ReflectionTable;
pub use self::stats::ProgramStats;
