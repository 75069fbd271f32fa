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

//! Shader stages, driver object ids and rewritten source text.

use std::fmt;

/// A programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Per-vertex stage.
    Vertex,
    /// Per-fragment stage.
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// An opaque driver id of a compiled stage object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StageObjectId(pub u32);

/// An opaque driver id of a program object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramObjectId(pub u32);

/// A linked program serialized by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramBinary {
    /// Driver-specific format tag.
    pub format: u32,
    /// Opaque payload.
    pub payload: Vec<u8>,
}

/// Shader text rewritten into the target dialect, ready for the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenSource {
    /// Stage the text was rewritten for.
    pub stage: ShaderStage,
    /// Version pragma, defines, stdlib shim and rewritten body.
    pub text: String,
}

impl RewrittenSource {
    /// Formats the text with 1-based line numbers, the way driver
    /// diagnostics refer to it. Blank source lines are collapsed by the
    /// rewrite, so the numbers follow the rewritten text.
    pub fn numbered_listing(&self) -> String {
        numbered_listing(&self.text)
    }
}

/// Prefixes every line of `text` with its 1-based line number.
pub fn numbered_listing(text: &str) -> String {
    let mut listing = String::with_capacity(text.len() + text.len() / 8);
    for (index, line) in text.split('\n').enumerate() {
        listing.push_str(&format!("{:3}: {}\n", index + 1, line));
    }
    listing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_object_id_creation_and_equality() {
        let id1 = StageObjectId(1);
        let id2 = StageObjectId(2);
        let id1_again = StageObjectId(1);

        assert_eq!(id1, id1_again);
        assert_ne!(id1, id2);
    }

    #[test]
    fn numbered_listing_counts_from_one() {
        let source = RewrittenSource {
            stage: ShaderStage::Fragment,
            text: "#version 330\nvoid main() {\n}".to_string(),
        };
        assert_eq!(
            source.numbered_listing(),
            "  1: #version 330\n  2: void main() {\n  3: }\n"
        );
    }

    #[test]
    fn stage_display() {
        assert_eq!(ShaderStage::Vertex.to_string(), "vertex");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }
}
