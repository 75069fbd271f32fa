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

//! The fixed table mapping semantic names to interface locations.
//!
//! Shader authors tag every vertex input and fragment output with a semantic
//! (`in vec3 position : POSITION;`). The semantic, not the variable name,
//! decides which vertex attribute slot or which render target the variable
//! is wired to. Matching is exact and case-sensitive.

/// A semantic name and the location it resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Semantic {
    /// Canonical name, as written after the `:` in a declaration.
    pub name: &'static str,
    /// Vertex attribute slot or fragment output index.
    pub location: u32,
}

/// Vertex input semantics. Aliases (`TEXCOORD`/`TEXCOORD0`, ...) share a slot.
pub const VERTEX_INPUT_SEMANTICS: &[Semantic] = &[
    Semantic { name: "POSITION", location: 0 },
    Semantic { name: "NORMAL", location: 1 },
    Semantic { name: "COLOR", location: 2 },
    Semantic { name: "SECONDARY_COLOR", location: 3 },
    Semantic { name: "WEIGHT_INDEX", location: 4 },
    Semantic { name: "WEIGHT_INDEX0", location: 4 },
    Semantic { name: "WEIGHT_INDEX1", location: 5 },
    Semantic { name: "WEIGHT_VALUE", location: 6 },
    Semantic { name: "WEIGHT_VALUE0", location: 6 },
    Semantic { name: "WEIGHT_VALUE1", location: 7 },
    Semantic { name: "TEXCOORD", location: 8 },
    Semantic { name: "TEXCOORD0", location: 8 },
    Semantic { name: "TEXCOORD1", location: 9 },
    Semantic { name: "TEXCOORD2", location: 10 },
    Semantic { name: "TEXCOORD3", location: 11 },
    Semantic { name: "TEXCOORD4", location: 12 },
    Semantic { name: "TEXCOORD5", location: 13 },
    Semantic { name: "TEXCOORD6", location: 14 },
    Semantic { name: "TEXCOORD7", location: 15 },
];

/// Fragment output semantics.
pub const FRAGMENT_OUTPUT_SEMANTICS: &[Semantic] = &[
    Semantic { name: "FRAG_COLOR", location: 0 },
    Semantic { name: "FRAG_COLOR0", location: 1 },
    Semantic { name: "FRAG_COLOR1", location: 2 },
    Semantic { name: "FRAG_COLOR2", location: 3 },
    Semantic { name: "FRAG_COLOR3", location: 4 },
    Semantic { name: "FRAG_DEPTH", location: 5 },
];

/// A legacy built-in variable a fragment output maps to on old dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyFragmentOutput {
    /// Built-in write target (e.g. `gl_FragColor`).
    pub builtin: &'static str,
    /// First dialect version in which the built-in is no longer available.
    pub deprecated_version: u32,
}

/// Built-in write targets, indexed by fragment output location.
const LEGACY_FRAGMENT_OUTPUTS: &[LegacyFragmentOutput] = &[
    LegacyFragmentOutput { builtin: "gl_FragColor", deprecated_version: 130 },
    LegacyFragmentOutput { builtin: "gl_FragData[0]", deprecated_version: 130 },
    LegacyFragmentOutput { builtin: "gl_FragData[1]", deprecated_version: 130 },
    LegacyFragmentOutput { builtin: "gl_FragData[2]", deprecated_version: 130 },
    LegacyFragmentOutput { builtin: "gl_FragData[3]", deprecated_version: 130 },
    // Not deprecated in any dialect we target.
    LegacyFragmentOutput { builtin: "gl_FragDepth", deprecated_version: 999 },
];

/// Resolves a semantic name against both tables.
///
/// Vertex input and fragment output names never overlap, so a single lookup
/// serves both stages.
pub fn semantic_location(name: &str) -> Option<u32> {
    VERTEX_INPUT_SEMANTICS
        .iter()
        .chain(FRAGMENT_OUTPUT_SEMANTICS)
        .find(|semantic| semantic.name == name)
        .map(|semantic| semantic.location)
}

/// Returns the legacy built-in for a fragment output location.
pub fn legacy_fragment_output(location: u32) -> Option<LegacyFragmentOutput> {
    LEGACY_FRAGMENT_OUTPUTS.get(location as usize).copied()
}

/// Returns the built-in to write instead of a user output on `glsl_version`,
/// or `None` if the user-declared name stays valid.
pub fn legacy_output_substitute(location: u32, glsl_version: u32) -> Option<&'static str> {
    legacy_fragment_output(location)
        .filter(|legacy| legacy.deprecated_version > glsl_version)
        .map(|legacy| legacy.builtin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_semantics_resolve() {
        assert_eq!(semantic_location("POSITION"), Some(0));
        assert_eq!(semantic_location("TEXCOORD"), semantic_location("TEXCOORD0"));
        assert_eq!(semantic_location("TEXCOORD7"), Some(15));
    }

    #[test]
    fn fragment_semantics_resolve() {
        assert_eq!(semantic_location("FRAG_COLOR"), Some(0));
        assert_eq!(semantic_location("FRAG_DEPTH"), Some(5));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(semantic_location("position"), None);
        assert_eq!(semantic_location(" POSITION"), None);
    }

    #[test]
    fn color_outputs_are_substituted_only_before_130() {
        assert_eq!(legacy_output_substitute(0, 120), Some("gl_FragColor"));
        assert_eq!(legacy_output_substitute(2, 100), Some("gl_FragData[1]"));
        assert_eq!(legacy_output_substitute(0, 130), None);
        assert_eq!(legacy_output_substitute(0, 330), None);
    }

    #[test]
    fn depth_output_is_always_substituted() {
        assert_eq!(legacy_output_substitute(5, 450), Some("gl_FragDepth"));
    }

    #[test]
    fn unknown_location_has_no_builtin() {
        assert!(legacy_fragment_output(6).is_none());
    }
}
