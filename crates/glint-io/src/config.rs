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

//! Loading the pipeline configuration from a RON file.

use glint_core::GlintConfig;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a configuration file could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but cannot be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// The configuration file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// The file is not valid RON for [`GlintConfig`].
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// The configuration file.
        path: PathBuf,
        /// The parser error, with its position.
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Parses a configuration from RON text. Missing fields take their defaults.
pub fn parse_config(text: &str) -> Result<GlintConfig, ron::error::SpannedError> {
    ron::from_str(text)
}

/// Loads the configuration at `path`.
///
/// An absent file yields [`GlintConfig::default`]; a malformed one is an
/// error.
pub fn load_config(path: impl AsRef<Path>) -> Result<GlintConfig, ConfigError> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::info!(
                "Config: {} not found, using defaults",
                path.display()
            );
            return Ok(GlintConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = parse_config(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "Config: loaded {} (GLSL {}, cache {})",
        path.display(),
        config.capabilities.glsl_version,
        if config.cache.enabled { "on" } else { "off" }
    );
    Ok(config)
}
