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

//! Header assembly: version pragma, feature defines, extension pragmas and
//! precision qualifiers.

use glint_core::renderer::api::{DriverCapabilities, ShaderStage};
use std::fmt::Write;

/// Builds the version pragma and the capability-dependent lines shared by
/// both stages.
pub fn version_preamble(caps: &DriverCapabilities) -> String {
    let mut text = String::with_capacity(192);
    let _ = writeln!(text, "#version {}", caps.glsl_version_string);
    let _ = writeln!(text, "#define GLSL_VERSION {}", caps.glsl_version);

    if caps.gpu_shader5 {
        text.push_str("#define GPU_SHADER 5\n");
    } else if caps.gpu_shader4 {
        text.push_str("#define GPU_SHADER 4\n");
        text.push_str("#extension GL_EXT_gpu_shader4 : enable\n");
    } else {
        text.push_str("#define GPU_SHADER 3\n");
    }

    if let Some(extension) = caps.texture_lod_extension() {
        let _ = writeln!(text, "#extension {} : enable", extension.pragma_name());
    }
    text
}

/// Default precisions, only seen by embedded-profile compilers.
///
/// The fragment block covers every sampler type the stdlib shim uses. Types
/// that only exist from the storage-qualifier dialects on (3D, array and
/// shadow samplers) are left out on legacy targets.
pub fn precision_block(stage: ShaderStage, caps: &DriverCapabilities) -> String {
    let mut text = String::from("#ifdef GL_ES\n");
    text.push_str("precision highp float;\n");
    text.push_str("precision highp int;\n");

    if stage == ShaderStage::Fragment {
        text.push_str("precision highp sampler2D;\n");
        text.push_str("#ifdef TEXTURE_RECT\n");
        text.push_str("precision highp sampler2DRect;\n");
        text.push_str("#endif\n");
        if caps.uses_legacy_storage() {
            text.push_str("precision highp samplerCube;\n");
        } else {
            text.push_str("precision highp sampler3D;\n");
            text.push_str("precision highp samplerCube;\n");
            text.push_str("precision highp sampler2DArray;\n");
            text.push_str("precision highp sampler2DShadow;\n");
            text.push_str("precision highp samplerCubeShadow;\n");
            text.push_str("precision highp sampler2DArrayShadow;\n");
        }
    }

    text.push_str("#endif\n");
    text
}
