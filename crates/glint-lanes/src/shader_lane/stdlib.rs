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

//! Portable helper functions prepended to every stage.
//!
//! Shader authors call `tex2D`, `texCUBE`, `saturate`, `clip` and friends;
//! the shim maps them onto the sampling built-ins of the target dialect.

use glint_core::renderer::api::{DriverCapabilities, ShaderStage};

const SATURATE: &str = "\
float saturate(float v) { return clamp(v, 0.0, 1.0); }
vec2 saturate(vec2 v) { return clamp(v, 0.0, 1.0); }
vec3 saturate(vec3 v) { return clamp(v, 0.0, 1.0); }
vec4 saturate(vec4 v) { return clamp(v, 0.0, 1.0); }
";

const CLIP: &str = "\
void clip(float v) { if (v < 0.0) { discard; } }
void clip(vec2 v) { if (any(lessThan(v, vec2(0.0)))) { discard; } }
void clip(vec3 v) { if (any(lessThan(v, vec3(0.0)))) { discard; } }
void clip(vec4 v) { if (any(lessThan(v, vec4(0.0)))) { discard; } }
";

const MODERN_VERTEX_SAMPLING: &str = "\
vec4 tex2Dlod(sampler2D s, vec4 uv) { return textureLod(s, uv.xy, uv.w); }
";

const MODERN_FRAGMENT_SAMPLING: &str = "\
vec4 tex2D(sampler2D s, vec2 uv) { return texture(s, uv.xy); }
vec4 tex2D(sampler2D s, vec2 uv, vec2 dx, vec2 dy) { return textureGrad(s, uv.xy, dx, dy); }
vec4 tex2Dbias(sampler2D s, vec4 uv) { return texture(s, uv.xy, uv.w); }
vec4 tex2Dproj(sampler2D s, vec3 uv) { return textureProj(s, uv); }
vec4 tex2Dproj(sampler2D s, vec4 uv) { return textureProj(s, uv); }
vec4 tex2Dlod(sampler2D s, vec4 uv) { return textureLod(s, uv.xy, uv.w); }

vec4 tex2D(sampler2DShadow s, vec3 uv) { return vec4(texture(s, uv.xyz)); }
vec4 tex2D(sampler2DShadow s, vec3 uv, vec2 dx, vec2 dy) { return vec4(textureGrad(s, uv.xyz, dx, dy)); }

vec4 texCUBE(samplerCube s, vec3 uv) { return texture(s, uv.xyz); }
vec4 texCUBE(samplerCubeShadow s, vec4 uv) { return vec4(texture(s, uv.xyzw)); }
vec4 texCUBEbias(samplerCube s, vec4 uv) { return texture(s, uv.xyz, uv.w); }
vec4 texCUBElod(samplerCube s, vec4 uv) { return textureLod(s, uv.xyz, uv.w); }

vec4 tex3D(sampler3D s, vec3 uv) { return texture(s, uv.xyz); }
vec4 tex3Dproj(sampler3D s, vec4 uv) { return textureProj(s, uv); }
vec4 tex3Dbias(sampler3D s, vec4 uv) { return texture(s, uv.xyz, uv.w); }
vec4 tex3Dlod(sampler3D s, vec4 uv) { return textureLod(s, uv.xyz, uv.w); }

vec4 tex2Darray(sampler2DArray s, vec3 uv) { return texture(s, uv.xyz); }
vec4 tex2Darray(sampler2DArrayShadow s, vec4 uv) { return vec4(texture(s, uv.xyzw)); }

#ifdef TEXTURE_RECT
vec4 texRECT(sampler2DRect s, vec2 uv) { return texture(s, uv.xy); }
vec4 texRECTproj(sampler2DRect s, vec3 uv) { return textureProj(s, uv); }
vec4 texRECTproj(sampler2DRect s, vec4 uv) { return textureProj(s, uv); }
#endif
";

const LEGACY_VERTEX_SAMPLING: &str = "\
vec4 tex2Dlod(sampler2D s, vec4 uv) { return texture2DLod(s, uv.xy, uv.w); }
";

const LEGACY_FRAGMENT_SAMPLING: &str = "\
vec4 tex2D(sampler2D s, vec2 uv) { return texture2D(s, uv.xy); }
vec4 tex2Dbias(sampler2D s, vec4 uv) { return texture2D(s, uv.xy, uv.w); }
vec4 tex2Dproj(sampler2D s, vec3 uv) { return texture2DProj(s, uv); }
vec4 tex2Dproj(sampler2D s, vec4 uv) { return texture2DProj(s, uv); }

vec4 texCUBE(samplerCube s, vec3 uv) { return textureCube(s, uv.xyz); }
vec4 texCUBEbias(samplerCube s, vec4 uv) { return textureCube(s, uv.xyz, uv.w); }

#ifndef GL_ES
vec4 tex2D(sampler2DShadow s, vec3 uv) { return shadow2D(s, uv.xyz); }
vec4 tex3D(sampler3D s, vec3 uv) { return texture3D(s, uv.xyz); }
vec4 tex3Dproj(sampler3D s, vec4 uv) { return texture3DProj(s, uv); }
vec4 tex3Dbias(sampler3D s, vec4 uv) { return texture3D(s, uv.xyz, uv.w); }
#endif

#ifdef TEXTURE_RECT
vec4 texRECT(sampler2DRect s, vec2 uv) { return texture2DRect(s, uv.xy); }
vec4 texRECTproj(sampler2DRect s, vec3 uv) { return texture2DRectProj(s, uv); }
vec4 texRECTproj(sampler2DRect s, vec4 uv) { return texture2DRectProj(s, uv); }
#endif
";

/// Explicit-LOD fragment helpers; `suffix` is the extension's built-in suffix.
fn legacy_fragment_lod(suffix: &str) -> String {
    format!(
        "vec4 tex2Dlod(sampler2D s, vec4 uv) {{ return texture2DLod{suffix}(s, uv.xy, uv.w); }}\n\
         vec4 texCUBElod(samplerCube s, vec4 uv) {{ return textureCubeLod{suffix}(s, uv.xyz, uv.w); }}\n"
    )
}

/// Returns the helper text for `stage` on the given target.
pub fn stdlib_shim(stage: ShaderStage, caps: &DriverCapabilities) -> String {
    let legacy = caps.uses_legacy_storage();
    let mut text = String::with_capacity(4096);

    match stage {
        ShaderStage::Vertex => {
            text.push_str(SATURATE);
            text.push_str(if legacy {
                LEGACY_VERTEX_SAMPLING
            } else {
                MODERN_VERTEX_SAMPLING
            });
        }
        ShaderStage::Fragment => {
            text.push('\n');
            text.push_str(CLIP);
            text.push('\n');
            text.push_str(SATURATE);
            text.push('\n');
            if legacy {
                text.push_str(LEGACY_FRAGMENT_SAMPLING);
                if let Some(extension) = caps.texture_lod_extension() {
                    text.push('\n');
                    text.push_str(&legacy_fragment_lod(extension.builtin_suffix()));
                }
            } else {
                text.push_str(MODERN_FRAGMENT_SAMPLING);
            }
        }
    }

    text.push('\n');
    text
}
