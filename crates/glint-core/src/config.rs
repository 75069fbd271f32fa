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

//! Pipeline configuration.
//!
//! Everything the pipeline would otherwise read from process-wide driver state
//! is carried here as plain data, so a rewrite or a compile can be driven
//! from a test without a live context.

use crate::renderer::DriverCapabilities;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Settings of the on-disk program binary cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramCacheSettings {
    /// Directory holding one cache file per program name.
    pub directory: PathBuf,
    /// File extension of cache files, without the leading dot.
    pub extension: String,
    /// Master switch. When `false` the cache is never read nor written,
    /// even if the driver supports program binaries.
    pub enabled: bool,
}

impl ProgramCacheSettings {
    /// Returns the cache file path for a program's logical name. The
    /// extension is appended, so dotted names keep their full text.
    ///
    /// Names may nest into subdirectories, but must stay below the cache
    /// directory: `None` for empty or absolute names and for names holding
    /// `.` or `..` components.
    pub fn path_for(&self, program_name: &str) -> Option<PathBuf> {
        let mut components = Path::new(program_name).components().peekable();
        components.peek()?;
        if !components.all(|component| matches!(component, Component::Normal(_))) {
            return None;
        }
        Some(
            self.directory
                .join(format!("{program_name}.{}", self.extension)),
        )
    }

    /// Creates settings rooted at `directory` with the default extension.
    pub fn in_directory(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            ..Self::default()
        }
    }
}

impl Default for ProgramCacheSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("cache/programs"),
            extension: "programbin".to_string(),
            enabled: true,
        }
    }
}

/// Top-level configuration of the shader pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlintConfig {
    /// What the active driver accepts.
    pub capabilities: DriverCapabilities,
    /// Binary cache settings.
    pub cache: ProgramCacheSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_path_uses_name_and_extension() {
        let settings = ProgramCacheSettings::in_directory("/tmp/glint");
        assert_eq!(
            settings.path_for("standard_lit"),
            Some(PathBuf::from("/tmp/glint/standard_lit.programbin"))
        );
        assert_eq!(
            settings.path_for("sky.night"),
            Some(PathBuf::from("/tmp/glint/sky.night.programbin"))
        );
        assert_eq!(
            settings.path_for("materials/water"),
            Some(PathBuf::from("/tmp/glint/materials/water.programbin"))
        );
    }

    #[test]
    fn cache_path_stays_inside_the_directory() {
        let settings = ProgramCacheSettings::in_directory("/tmp/glint");
        for name in ["", "..", "../escape", "/abs/x", "a/../../b", "./local"] {
            assert_eq!(settings.path_for(name), None, "name {name:?} must be refused");
        }
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: GlintConfig = ron::from_str("(cache: (enabled: false))").unwrap();
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.extension, "programbin");
        assert_eq!(config.capabilities, DriverCapabilities::default());
    }
}
