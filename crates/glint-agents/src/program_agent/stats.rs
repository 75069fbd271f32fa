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

use std::fmt;

/// Running counters of the program agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgramStats {
    /// Programs successfully created, from source or from cache.
    pub programs_created: u64,
    /// Creations satisfied by a cached binary.
    pub cache_hits: u64,
    /// Creations that had to compile from source.
    pub cache_misses: u64,
    /// Creations rejected by a stage compiler.
    pub compile_failures: u64,
    /// Creations rejected by the linker.
    pub link_failures: u64,
    /// Programs currently alive.
    pub programs_live: u64,
}

impl fmt::Display for ProgramStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} live, {} created ({} cached, {} compiled), {} compile / {} link failures",
            self.programs_live,
            self.programs_created,
            self.cache_hits,
            self.cache_misses,
            self.compile_failures,
            self.link_failures
        )
    }
}
