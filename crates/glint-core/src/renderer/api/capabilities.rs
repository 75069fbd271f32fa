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

//! Driver capability flags, injected into the rewriter and the compiler.

use serde::{Deserialize, Serialize};

/// First dialect version with `in`/`out` storage and user-declared fragment outputs.
pub const GLSL_STORAGE_QUALIFIER_VERSION: u32 = 130;

/// Last dialect version without in-shader `layout(location = N)` support.
pub const GLSL_LAST_BINDING_ONLY_VERSION: u32 = 150;

/// The extension that provides explicit-LOD sampling on legacy dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureLodExtension {
    /// `GL_ARB_shader_texture_lod`: `texture2DLod`, `textureCubeLod`.
    Arb,
    /// `GL_EXT_shader_texture_lod`: `texture2DLodEXT`, `textureCubeLodEXT`.
    Ext,
}

impl TextureLodExtension {
    /// Name used in the `#extension` pragma.
    pub fn pragma_name(self) -> &'static str {
        match self {
            TextureLodExtension::Arb => "GL_ARB_shader_texture_lod",
            TextureLodExtension::Ext => "GL_EXT_shader_texture_lod",
        }
    }

    /// Suffix of the explicit-LOD built-ins.
    pub fn builtin_suffix(self) -> &'static str {
        match self {
            TextureLodExtension::Arb => "",
            TextureLodExtension::Ext => "EXT",
        }
    }
}

/// Describes the shading-language dialect and the optional features the
/// active driver exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverCapabilities {
    /// Numeric dialect version (e.g. `120`, `330`, `300` for ES 3.0).
    pub glsl_version: u32,
    /// Text emitted after `#version` (e.g. `"330"`, `"300 es"`).
    pub glsl_version_string: String,
    /// `GL_ARB_gpu_shader5` is available.
    pub gpu_shader5: bool,
    /// `GL_EXT_gpu_shader4` is available.
    pub gpu_shader4: bool,
    /// `GL_ARB_shader_texture_lod` is available. Desktop targets only.
    pub shader_texture_lod: bool,
    /// `GL_EXT_shader_texture_lod` is available. Embedded targets only; its
    /// built-ins carry an `EXT` suffix (`texture2DLodEXT`).
    pub ext_shader_texture_lod: bool,
    /// The driver can export and import linked program binaries.
    pub program_binary: bool,
}

impl DriverCapabilities {
    /// Desktop GLSL 1.20 (OpenGL 2.1).
    pub fn legacy_gl21() -> Self {
        Self {
            glsl_version: 120,
            glsl_version_string: "120".to_string(),
            gpu_shader5: false,
            gpu_shader4: false,
            shader_texture_lod: true,
            ext_shader_texture_lod: false,
            program_binary: false,
        }
    }

    /// Desktop GLSL 3.30 core.
    pub fn gl33() -> Self {
        Self {
            glsl_version: 330,
            glsl_version_string: "330".to_string(),
            gpu_shader5: false,
            gpu_shader4: true,
            shader_texture_lod: true,
            ext_shader_texture_lod: false,
            program_binary: true,
        }
    }

    /// Desktop GLSL 4.10 core.
    pub fn gl41() -> Self {
        Self {
            glsl_version: 410,
            glsl_version_string: "410".to_string(),
            gpu_shader5: true,
            gpu_shader4: true,
            shader_texture_lod: true,
            ext_shader_texture_lod: false,
            program_binary: true,
        }
    }

    /// GLSL ES 1.00 (OpenGL ES 2.0 / WebGL 1).
    pub fn gles2() -> Self {
        Self {
            glsl_version: 100,
            glsl_version_string: "100".to_string(),
            gpu_shader5: false,
            gpu_shader4: false,
            shader_texture_lod: false,
            ext_shader_texture_lod: false,
            program_binary: false,
        }
    }

    /// GLSL ES 3.00 (OpenGL ES 3.0 / WebGL 2).
    pub fn gles3() -> Self {
        Self {
            glsl_version: 300,
            glsl_version_string: "300 es".to_string(),
            gpu_shader5: false,
            gpu_shader4: false,
            shader_texture_lod: false,
            ext_shader_texture_lod: false,
            program_binary: true,
        }
    }

    /// Looks up a preset by name (`gl21`, `gl33`, `gl41`, `gles2`, `gles3`).
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "gl21" => Some(Self::legacy_gl21()),
            "gl33" => Some(Self::gl33()),
            "gl41" => Some(Self::gl41()),
            "gles2" => Some(Self::gles2()),
            "gles3" => Some(Self::gles3()),
            _ => None,
        }
    }

    /// `true` for the embedded dialects (`100`, `300 es`, ...).
    pub fn is_embedded(&self) -> bool {
        self.glsl_version == 100 || self.glsl_version_string.trim_end().ends_with(" es")
    }

    /// The texture-LOD extension to enable, if any. Each flag only counts on
    /// the profile its extension belongs to.
    pub fn texture_lod_extension(&self) -> Option<TextureLodExtension> {
        if self.is_embedded() {
            self.ext_shader_texture_lod.then_some(TextureLodExtension::Ext)
        } else {
            self.shader_texture_lod.then_some(TextureLodExtension::Arb)
        }
    }

    /// `attribute`/`varying` storage and built-in fragment outputs.
    pub fn uses_legacy_storage(&self) -> bool {
        self.glsl_version < GLSL_STORAGE_QUALIFIER_VERSION
    }

    /// Vertex inputs must be bound with an explicit driver call before linking.
    pub fn requires_attrib_binding(&self) -> bool {
        self.glsl_version <= GLSL_LAST_BINDING_ONLY_VERSION
    }

    /// Fragment outputs are bound with an explicit driver call before linking.
    pub fn supports_frag_data_binding(&self) -> bool {
        (GLSL_STORAGE_QUALIFIER_VERSION..=GLSL_LAST_BINDING_ONLY_VERSION)
            .contains(&self.glsl_version)
    }

    /// Locations are written in the shader text as `layout(location = N)`.
    pub fn supports_layout_locations(&self) -> bool {
        self.glsl_version > GLSL_LAST_BINDING_ONLY_VERSION
    }
}

impl Default for DriverCapabilities {
    fn default() -> Self {
        Self::gl33()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_targets_bind_attributes_and_use_builtin_outputs() {
        let caps = DriverCapabilities::legacy_gl21();
        assert!(caps.uses_legacy_storage());
        assert!(caps.requires_attrib_binding());
        assert!(!caps.supports_frag_data_binding());
        assert!(!caps.supports_layout_locations());
    }

    #[test]
    fn glsl_150_binds_both_interfaces_explicitly() {
        let caps = DriverCapabilities {
            glsl_version: 150,
            glsl_version_string: "150".to_string(),
            ..DriverCapabilities::default()
        };
        assert!(!caps.uses_legacy_storage());
        assert!(caps.requires_attrib_binding());
        assert!(caps.supports_frag_data_binding());
        assert!(!caps.supports_layout_locations());
    }

    #[test]
    fn modern_targets_use_layout_locations() {
        for caps in [
            DriverCapabilities::gl33(),
            DriverCapabilities::gl41(),
            DriverCapabilities::gles3(),
        ] {
            assert!(caps.supports_layout_locations(), "{caps:?}");
            assert!(!caps.requires_attrib_binding(), "{caps:?}");
            assert!(!caps.supports_frag_data_binding(), "{caps:?}");
        }
    }

    #[test]
    fn texture_lod_extension_follows_the_profile() {
        assert_eq!(
            DriverCapabilities::legacy_gl21().texture_lod_extension(),
            Some(TextureLodExtension::Arb)
        );
        assert_eq!(DriverCapabilities::gles2().texture_lod_extension(), None);

        let desktop_flag_on_es = DriverCapabilities {
            shader_texture_lod: true,
            ..DriverCapabilities::gles2()
        };
        assert!(desktop_flag_on_es.is_embedded());
        assert_eq!(desktop_flag_on_es.texture_lod_extension(), None);

        let es_lod = DriverCapabilities {
            ext_shader_texture_lod: true,
            ..DriverCapabilities::gles2()
        };
        assert_eq!(es_lod.texture_lod_extension(), Some(TextureLodExtension::Ext));
        assert!(DriverCapabilities::gles3().is_embedded());
        assert!(!DriverCapabilities::gl33().is_embedded());
    }

    #[test]
    fn preset_lookup() {
        assert_eq!(
            DriverCapabilities::preset("gles3"),
            Some(DriverCapabilities::gles3())
        );
        assert!(DriverCapabilities::preset("vulkan").is_none());
    }
}
