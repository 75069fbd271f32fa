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

//! # Glint I/O
//!
//! Persisted state of the shader pipeline:
//!
//! - [`hash`]: content keys of rewritten sources.
//! - [`program_cache`]: the one-file-per-program binary cache.
//! - [`config`]: loading [`GlintConfig`](glint_core::GlintConfig) from RON.

#![warn(missing_docs)]

pub mod config;
pub mod hash;
pub mod program_cache;

pub use config::{load_config, parse_config, ConfigError};
pub use hash::{program_key, stage_hash};
pub use program_cache::{CacheError, ProgramCache};
