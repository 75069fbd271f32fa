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

//! Backend-agnostic shader pipeline API.
//!
//! Organized into several logical sub-modules:
//!
//! - **[`capabilities`]**: What the active driver accepts (dialect version, extensions).
//! - **[`semantic`]**: The fixed semantic-name to location table.
//! - **[`interface`]**: Vertex-input and fragment-output declarations.
//! - **[`shader`]**: Stages, driver object ids and rewritten sources.
//! - **[`uniform`]**: Reflection types, constant slots and typed uploads.
//! - **[`program`]**: Program and texture handles.
//! - **[`builtin`]**: Engine built-in constant and sampler names.

pub mod builtin;
pub mod capabilities;
pub mod interface;
pub mod program;
pub mod semantic;
pub mod shader;
pub mod uniform;

pub use self::builtin::*;
pub use self::capabilities::*;
pub use self::interface::*;
pub use self::program::*;
pub use self::semantic::*;
pub use self::shader::*;
pub use self::uniform::*;
