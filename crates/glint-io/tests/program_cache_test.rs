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

//! Integration tests for the program binary cache protocol.

use anyhow::Result;
use glint_core::renderer::api::ProgramBinary;
use glint_core::ProgramCacheSettings;
use glint_io::{program_key, CacheError, ProgramCache};

fn sample_binary(tag: u8) -> ProgramBinary {
    ProgramBinary {
        format: 0x1234,
        payload: vec![tag; 16],
    }
}

#[test]
fn test_entry_written_for_current_sources_is_a_hit() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let cache = ProgramCache::new(ProgramCacheSettings::in_directory(dir.path()));
    let key = program_key(Some("vs text"), Some("fs text"));

    cache.store("lit", key, &sample_binary(1))?;
    assert_eq!(cache.load("lit", key)?, Some(sample_binary(1)));
    Ok(())
}

#[test]
fn test_changed_source_invalidates_entry() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let cache = ProgramCache::new(ProgramCacheSettings::in_directory(dir.path()));
    let stored_key = program_key(Some("vs text"), Some("fs text"));
    let current_key = program_key(Some("vs text"), Some("fs text!"));
    assert_ne!(stored_key, current_key);

    cache.store("lit", stored_key, &sample_binary(1))?;
    let result = cache.load("lit", current_key);
    assert!(
        matches!(result, Err(CacheError::HashMismatch { .. })),
        "a mismatched entry must never be handed out, got {result:?}"
    );
    Ok(())
}

#[test]
fn test_store_overwrites_previous_entry() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let cache = ProgramCache::new(ProgramCacheSettings::in_directory(dir.path()));

    cache.store("lit", 1, &ProgramBinary {
        format: 7,
        payload: vec![0; 64],
    })?;
    let path = cache.store("lit", 2, &sample_binary(9))?;

    assert_eq!(std::fs::metadata(&path)?.len(), 8 + 16);
    assert_eq!(cache.load("lit", 2)?, Some(sample_binary(9)));
    Ok(())
}
