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

//! Provides the public, backend-agnostic contracts of the shader pipeline.
//!
//! This module defines the "common language" spoken between the rewriter, the
//! program agent and the concrete drivers. It contains the abstract
//! [`ShaderDevice`] trait, the data structures exchanged through it (like
//! [`ActiveUniform`] or [`ProgramBinary`]) and the error types that form the
//! stable, public-facing API.
//!
//! This module only defines the 'what'. The 'how' lives in a concrete driver
//! from `glint-infra` (a headless software driver or an OpenGL one) which
//! implements these traits, while `glint-lanes` and `glint-agents` drive them
//! without knowing which driver sits underneath.

pub mod api;
pub mod error;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::error::{ProgramError, ShaderError};
pub use self::traits::ShaderDevice;
