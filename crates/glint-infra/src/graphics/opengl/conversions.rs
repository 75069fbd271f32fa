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

//! Conversions between glint types and OpenGL enums.

use glint_core::renderer::api::{DriverCapabilities, ShaderStage, UniformType};

/// The shader object type of a stage.
pub(crate) fn stage_enum(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

/// Maps a `glGetActiveUniform` type enum.
pub(crate) fn uniform_type(gl_type: u32) -> UniformType {
    match gl_type {
        glow::FLOAT => UniformType::Float,
        glow::FLOAT_VEC2 => UniformType::FloatVec2,
        glow::FLOAT_VEC3 => UniformType::FloatVec3,
        glow::FLOAT_VEC4 => UniformType::FloatVec4,
        glow::INT => UniformType::Int,
        glow::INT_VEC2 => UniformType::IntVec2,
        glow::INT_VEC3 => UniformType::IntVec3,
        glow::INT_VEC4 => UniformType::IntVec4,
        glow::UNSIGNED_INT => UniformType::UInt,
        glow::UNSIGNED_INT_VEC2 => UniformType::UIntVec2,
        glow::UNSIGNED_INT_VEC3 => UniformType::UIntVec3,
        glow::UNSIGNED_INT_VEC4 => UniformType::UIntVec4,
        glow::BOOL => UniformType::Bool,
        glow::BOOL_VEC2 => UniformType::BoolVec2,
        glow::BOOL_VEC3 => UniformType::BoolVec3,
        glow::BOOL_VEC4 => UniformType::BoolVec4,
        glow::FLOAT_MAT2 => UniformType::FloatMat2,
        glow::FLOAT_MAT3 => UniformType::FloatMat3,
        glow::FLOAT_MAT4 => UniformType::FloatMat4,
        glow::SAMPLER_2D => UniformType::Sampler2D,
        glow::SAMPLER_3D => UniformType::Sampler3D,
        glow::SAMPLER_CUBE => UniformType::SamplerCube,
        glow::SAMPLER_2D_SHADOW => UniformType::Sampler2DShadow,
        glow::SAMPLER_CUBE_SHADOW => UniformType::SamplerCubeShadow,
        glow::SAMPLER_2D_ARRAY => UniformType::Sampler2DArray,
        glow::SAMPLER_2D_ARRAY_SHADOW => UniformType::Sampler2DArrayShadow,
        other => UniformType::Other(other),
    }
}

/// The shading-language version of a context version: numeric value and
/// the text that follows `#version`.
pub(crate) fn glsl_version(major: u32, minor: u32, embedded: bool) -> (u32, String) {
    if embedded {
        return if major >= 3 {
            (300, "300 es".to_string())
        } else {
            (100, "100".to_string())
        };
    }
    let version = match (major, minor) {
        (2, 0) => 110,
        (2, _) => 120,
        (3, 0) => 130,
        (3, 1) => 140,
        (3, 2) => 150,
        (major, minor) => major * 100 + minor * 10,
    };
    (version, version.to_string())
}

/// Derives the capabilities of a context from its version and an extension
/// query.
pub(crate) fn capabilities_for(
    major: u32,
    minor: u32,
    embedded: bool,
    has: impl Fn(&str) -> bool,
) -> DriverCapabilities {
    let (glsl_version, glsl_version_string) = glsl_version(major, minor, embedded);

    if embedded {
        return DriverCapabilities {
            glsl_version,
            glsl_version_string,
            gpu_shader5: false,
            gpu_shader4: false,
            shader_texture_lod: false,
            // ES 3.0 has textureLod in core.
            ext_shader_texture_lod: glsl_version < 300 && has("GL_EXT_shader_texture_lod"),
            program_binary: glsl_version >= 300 || has("GL_OES_get_program_binary"),
        };
    }

    DriverCapabilities {
        glsl_version,
        glsl_version_string,
        gpu_shader5: glsl_version >= 400 || has("GL_ARB_gpu_shader5"),
        gpu_shader4: has("GL_EXT_gpu_shader4"),
        shader_texture_lod: has("GL_ARB_shader_texture_lod"),
        ext_shader_texture_lod: false,
        program_binary: glsl_version >= 410 || has("GL_ARB_get_program_binary"),
    }
}
