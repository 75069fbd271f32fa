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

//! Defines the hierarchy of error types for the shader pipeline.

use crate::renderer::api::{ProgramHandle, ShaderStage};
use std::fmt;

/// An error raised while turning shader text into a linked driver program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    /// Neither stage was given any source text.
    EmptySource {
        /// Diagnostic name of the program.
        name: String,
    },
    /// The driver rejected a rewritten stage.
    CompilationFailed {
        /// Diagnostic name of the program.
        name: String,
        /// The stage that failed.
        stage: ShaderStage,
        /// The driver info log.
        log: String,
        /// The rewritten text, line numbered.
        source_dump: String,
    },
    /// The driver failed to link the compiled stages.
    LinkFailed {
        /// Diagnostic name of the program.
        name: String,
        /// The driver info log.
        log: String,
    },
    /// The driver could not allocate a stage or program object.
    Driver(String),
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::EmptySource { name } => {
                write!(f, "Program '{name}' has neither a vertex nor a fragment source")
            }
            ShaderError::CompilationFailed {
                name, stage, log, ..
            } => {
                write!(f, "Failed to compile {stage} stage of '{name}': {log}")
            }
            ShaderError::LinkFailed { name, log } => {
                write!(f, "Failed to link program '{name}': {log}")
            }
            ShaderError::Driver(msg) => write!(f, "Driver object allocation failed: {msg}"),
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error returned by the program façade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramError {
    /// Program creation failed.
    Shader(ShaderError),
    /// The handle refers to a deleted program.
    InvalidHandle(ProgramHandle),
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramError::Shader(err) => write!(f, "Program creation failed: {err}"),
            ProgramError::InvalidHandle(handle) => {
                write!(f, "Invalid or stale program handle {handle}")
            }
        }
    }
}

impl std::error::Error for ProgramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProgramError::Shader(err) => Some(err),
            ProgramError::InvalidHandle(_) => None,
        }
    }
}

impl From<ShaderError> for ProgramError {
    fn from(err: ShaderError) -> Self {
        ProgramError::Shader(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn compilation_error_display_omits_source_dump() {
        let err = ShaderError::CompilationFailed {
            name: "sky".to_string(),
            stage: ShaderStage::Fragment,
            log: "0:3: syntax error".to_string(),
            source_dump: "  1: #version 330\n".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Failed to compile fragment stage of 'sky': 0:3: syntax error"
        );
    }

    #[test]
    fn program_error_wraps_shader_error() {
        let err: ProgramError = ShaderError::LinkFailed {
            name: "sky".to_string(),
            log: "missing main".to_string(),
        }
        .into();
        assert_eq!(
            format!("{err}"),
            "Program creation failed: Failed to link program 'sky': missing main"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn invalid_handle_has_no_source() {
        let err = ProgramError::InvalidHandle(ProgramHandle {
            index: 3,
            generation: 1,
        });
        assert_eq!(format!("{err}"), "Invalid or stale program handle #3v1");
        assert!(err.source().is_none());
    }
}
