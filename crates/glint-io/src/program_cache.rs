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

//! The on-disk program binary cache.
//!
//! One file per program, named after the program:
//!
//! ```text
//! [u32 key][u32 format][payload ...]
//! ```
//!
//! Both integers are little-endian. An entry is only usable when its stored
//! key equals the key of the current rewritten sources; every write replaces
//! the whole file.

use glint_core::renderer::api::ProgramBinary;
use glint_core::ProgramCacheSettings;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Size of the fixed part of a cache file.
pub const CACHE_HEADER_LEN: usize = 8;

/// Why a cache entry could not be used or written.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The program name would leave the cache directory.
    #[error("program name '{name}' cannot be used as a cache file name")]
    InvalidName {
        /// The refused name.
        name: String,
    },
    /// Reading, creating or writing the file failed.
    #[error("program cache I/O failed for {path}: {source}")]
    Io {
        /// The cache file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// The file is shorter than its header.
    #[error("program cache file {path} is truncated ({len} bytes)")]
    Truncated {
        /// The cache file.
        path: PathBuf,
        /// Its length.
        len: usize,
    },
    /// The file was written for different sources.
    #[error("program cache file {path} holds key {stored:#010x}, expected {expected:#010x}")]
    HashMismatch {
        /// The cache file.
        path: PathBuf,
        /// Key stored in the file.
        stored: u32,
        /// Key of the current sources.
        expected: u32,
    },
}

/// Serializes a cache entry.
pub fn encode_entry(key: u32, binary: &ProgramBinary) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(CACHE_HEADER_LEN + binary.payload.len());
    bytes.extend_from_slice(&key.to_le_bytes());
    bytes.extend_from_slice(&binary.format.to_le_bytes());
    bytes.extend_from_slice(&binary.payload);
    bytes
}

/// Splits a cache file into its key and binary. `None` if it is shorter
/// than the header.
pub fn decode_entry(bytes: &[u8]) -> Option<(u32, ProgramBinary)> {
    let (header, payload) = bytes.split_first_chunk::<CACHE_HEADER_LEN>()?;
    let [k0, k1, k2, k3, f0, f1, f2, f3] = *header;
    Some((
        u32::from_le_bytes([k0, k1, k2, k3]),
        ProgramBinary {
            format: u32::from_le_bytes([f0, f1, f2, f3]),
            payload: payload.to_vec(),
        },
    ))
}

/// Reads and writes program binaries under the configured directory.
#[derive(Debug, Clone)]
pub struct ProgramCache {
    settings: ProgramCacheSettings,
}

impl ProgramCache {
    /// Creates a cache over `settings.directory`. Nothing is touched on disk
    /// until the first store.
    pub fn new(settings: ProgramCacheSettings) -> Self {
        Self { settings }
    }

    /// The settings the cache was created with.
    pub fn settings(&self) -> &ProgramCacheSettings {
        &self.settings
    }

    /// `false` when caching is switched off in the configuration.
    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    /// The file that holds the entry of `program_name`.
    ///
    /// ## Errors
    /// * `CacheError::InvalidName` - The name is empty, absolute or climbs
    ///   out of the cache directory.
    pub fn path_for(&self, program_name: &str) -> Result<PathBuf, CacheError> {
        self.settings
            .path_for(program_name)
            .ok_or_else(|| CacheError::InvalidName {
                name: program_name.to_string(),
            })
    }

    /// Loads the entry of `program_name` if it matches `expected_key`.
    ///
    /// ## Returns
    /// `Ok(None)` when there is no entry.
    ///
    /// ## Errors
    /// * `CacheError::Truncated` - The file is shorter than its header.
    /// * `CacheError::HashMismatch` - The entry belongs to other sources.
    /// * `CacheError::Io` - The file exists but cannot be read.
    /// * `CacheError::InvalidName` - See [`ProgramCache::path_for`].
    pub fn load(
        &self,
        program_name: &str,
        expected_key: u32,
    ) -> Result<Option<ProgramBinary>, CacheError> {
        let path = self.path_for(program_name)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(CacheError::Io { path, source }),
        };

        let Some((stored, binary)) = decode_entry(&bytes) else {
            return Err(CacheError::Truncated {
                path,
                len: bytes.len(),
            });
        };
        if stored != expected_key {
            return Err(CacheError::HashMismatch {
                path,
                stored,
                expected: expected_key,
            });
        }

        log::trace!(
            "ProgramCache: read {} bytes from {}",
            bytes.len(),
            path.display()
        );
        Ok(Some(binary))
    }

    /// Writes (or replaces) the entry of `program_name`.
    ///
    /// ## Returns
    /// The path of the written file.
    pub fn store(
        &self,
        program_name: &str,
        key: u32,
        binary: &ProgramBinary,
    ) -> Result<PathBuf, CacheError> {
        let path = self.path_for(program_name)?;
        if let Some(parent) = path.parent() {
            create_dir(parent)?;
        }

        let bytes = encode_entry(key, binary);
        fs::write(&path, &bytes).map_err(|source| CacheError::Io {
            path: path.clone(),
            source,
        })?;

        log::debug!(
            "ProgramCache: wrote {} bytes for '{}' to {}",
            bytes.len(),
            program_name,
            path.display()
        );
        Ok(path)
    }

    /// Deletes the entry of `program_name`.
    ///
    /// ## Returns
    /// `true` if a file was removed.
    pub fn remove(&self, program_name: &str) -> Result<bool, CacheError> {
        let path = self.path_for(program_name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(CacheError::Io { path, source }),
        }
    }
}

fn create_dir(dir: &Path) -> Result<(), CacheError> {
    fs::create_dir_all(dir).map_err(|source| CacheError::Io {
        path: dir.to_path_buf(),
        source,
    })
}
