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

//! Shader lane - rewrites engine-dialect shader text for the active driver.

mod declaration;
mod header;
mod rewriter;
mod stdlib;
mod tokenizer;

pub use declaration::DeclarationDiagnostic;
pub use header::{precision_block, version_preamble};
pub use rewriter::*;
pub use stdlib::stdlib_shim;
pub use tokenizer::{SourceToken, TokenKind, Tokenizer};
