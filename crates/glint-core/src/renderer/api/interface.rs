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

//! Stage interface declarations extracted while rewriting.

/// One top-level `in`/`out` declaration of a shader stage.
///
/// Only vertex inputs and fragment outputs are recorded, because only those
/// carry a semantic that decides their location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceSlot {
    /// Declared type, including an optional precision qualifier (`highp vec4`).
    pub ty: String,
    /// Declared variable name, without any array suffix.
    pub name: String,
    /// Location resolved from the semantic, `None` if missing or unknown.
    pub location: Option<u32>,
    /// Array suffix as written (`"[2]"`), empty for non-array declarations.
    pub array_suffix: String,
}

impl InterfaceSlot {
    /// `true` if the declaration carries an array suffix.
    pub fn is_array(&self) -> bool {
        !self.array_suffix.is_empty()
    }

    /// The location as a signed integer, `-1` when unresolved.
    pub fn raw_location(&self) -> i32 {
        self.location.map_or(-1, |location| location as i32)
    }
}

/// The interface of a program, in source declaration order.
///
/// Order matters: it is the order in which explicit location bindings are
/// issued before linking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramInterface {
    /// Vertex-stage inputs.
    pub vertex_inputs: Vec<InterfaceSlot>,
    /// Fragment-stage outputs.
    pub fragment_outputs: Vec<InterfaceSlot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_location_is_negative() {
        let slot = InterfaceSlot {
            ty: "vec3".to_string(),
            name: "position".to_string(),
            location: None,
            array_suffix: String::new(),
        };
        assert_eq!(slot.raw_location(), -1);
        assert!(!slot.is_array());
    }
}
