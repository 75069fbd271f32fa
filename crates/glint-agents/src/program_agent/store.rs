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

//! Program slot storage and handle management.

use glint_core::renderer::api::ProgramHandle;

/// Dense storage of live programs addressed by [`ProgramHandle`].
///
/// Freed slots go to a free list and are recycled with a bumped generation,
/// so a handle to a deleted program never resolves to its successor.
#[derive(Debug)]
pub(crate) struct ProgramStore<T> {
    /// Every slot ever allocated, with the handle currently issued for it.
    /// The value is `Some` only while the program is alive.
    slots: Vec<(ProgramHandle, Option<T>)>,
    /// Indices available for reuse.
    freed: Vec<u32>,
}

impl<T> ProgramStore<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            freed: Vec::new(),
        }
    }

    /// Stores `value` in a recycled or new slot.
    pub fn insert(&mut self, value: T) -> ProgramHandle {
        if let Some(index) = self.freed.pop() {
            if let Some((handle, slot)) = self.slots.get_mut(index as usize) {
                handle.generation = handle.generation.wrapping_add(1);
                *slot = Some(value);
                return *handle;
            }
        }
        let handle = ProgramHandle {
            index: self.slots.len() as u32,
            generation: 0,
        };
        self.slots.push((handle, Some(value)));
        handle
    }

    pub fn get(&self, handle: ProgramHandle) -> Option<&T> {
        self.slots
            .get(handle.index as usize)
            .filter(|(current, _)| current.generation == handle.generation)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Takes the value out and frees its slot. Stale handles yield `None`.
    pub fn remove(&mut self, handle: ProgramHandle) -> Option<T> {
        let (current, slot) = self.slots.get_mut(handle.index as usize)?;
        if current.generation != handle.generation {
            return None;
        }
        let value = slot.take()?;
        self.freed.push(handle.index);
        Some(value)
    }

    /// Number of live values.
    pub fn live(&self) -> usize {
        self.slots.len() - self.freed.len()
    }

    /// Handles of all live values, in slot order.
    pub fn handles(&self) -> impl Iterator<Item = ProgramHandle> + '_ {
        self.slots
            .iter()
            .filter(|(_, value)| value.is_some())
            .map(|(handle, _)| *handle)
    }
}
