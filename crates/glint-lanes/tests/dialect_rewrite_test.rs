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

//! Integration tests for the DialectRewriter.
//!
//! These tests rewrite complete vertex/fragment pairs and check the parts of
//! the output the compiler and the binding step depend on.

use glint_core::renderer::api::{DriverCapabilities, ShaderStage};
use glint_lanes::DialectRewriter;

const VERTEX: &str = "\
in vec3 position : POSITION;
in vec2 texCoord : TEXCOORD0;
out vec2 v_texCoord;

uniform mat4 modelViewProjectionMatrix;

void main() {
    v_texCoord = texCoord;
    gl_Position = modelViewProjectionMatrix * vec4(position, 1.0);
}
";

const FRAGMENT: &str = "\
in vec2 v_texCoord;
out vec4 color : FRAG_COLOR;

uniform sampler2D diffuseMap;

void main() {
    color = tex2D(diffuseMap, v_texCoord);
}
";

/// Strips the header so assertions only see the rewritten body.
fn body(rewriter: &DialectRewriter, stage: ShaderStage, text: &str) -> String {
    text[rewriter.header(stage).len()..].to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Fragment output round-trip
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_fragment_output_uses_builtin_below_threshold() {
    let rewriter = DialectRewriter::new(DriverCapabilities::legacy_gl21());
    let program = rewriter.rewrite_program("textured", Some(VERTEX), Some(FRAGMENT));
    let fragment = program.fragment.expect("fragment stage was given");
    let body = body(&rewriter, ShaderStage::Fragment, &fragment.text);

    assert!(
        body.contains("gl_FragColor = tex2D(diffuseMap, v_texCoord);"),
        "references to the output must be redirected, got:\n{body}"
    );
    assert!(!body.contains("color ="));
    assert!(!body.contains("layout"));
}

#[test]
fn test_fragment_output_kept_at_or_above_threshold() {
    let rewriter = DialectRewriter::new(DriverCapabilities::gl33());
    let program = rewriter.rewrite_program("textured", Some(VERTEX), Some(FRAGMENT));
    let fragment = program.fragment.expect("fragment stage was given");
    let body = body(&rewriter, ShaderStage::Fragment, &fragment.text);

    assert!(body.contains("layout (location = 0) out vec4 color;"));
    assert!(body.contains("color = tex2D(diffuseMap, v_texCoord);"));
    assert!(!body.contains("gl_FragColor"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Interface extraction
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_interface_lists_keep_declaration_order() {
    let rewriter = DialectRewriter::new(DriverCapabilities::gl33());
    let program = rewriter.rewrite_program("textured", Some(VERTEX), Some(FRAGMENT));

    let inputs: Vec<_> = program
        .interface
        .vertex_inputs
        .iter()
        .map(|slot| (slot.name.as_str(), slot.location))
        .collect();
    assert_eq!(inputs, vec![("position", Some(0)), ("texCoord", Some(8))]);

    assert_eq!(program.interface.fragment_outputs.len(), 1);
    assert_eq!(program.interface.fragment_outputs[0].name, "color");
    assert_eq!(program.interface.fragment_outputs[0].location, Some(0));
    assert!(program.diagnostics.is_empty());
}

#[test]
fn test_rewritten_sources_start_with_version_pragma() {
    for caps in [
        DriverCapabilities::legacy_gl21(),
        DriverCapabilities::gl33(),
        DriverCapabilities::gl41(),
        DriverCapabilities::gles2(),
        DriverCapabilities::gles3(),
    ] {
        let pragma = format!("#version {}\n", caps.glsl_version_string);
        let rewriter = DialectRewriter::new(caps);
        let program = rewriter.rewrite_program("textured", Some(VERTEX), Some(FRAGMENT));
        for source in [program.vertex, program.fragment].into_iter().flatten() {
            assert!(
                source.text.starts_with(&pragma),
                "{} stage must open with {pragma:?}",
                source.stage
            );
        }
    }
}

#[test]
fn test_line_structure_is_preserved() {
    let rewriter = DialectRewriter::new(DriverCapabilities::gl33());
    let program = rewriter.rewrite_program("textured", Some(VERTEX), None);
    let vertex = program.vertex.expect("vertex stage was given");
    let body = body(&rewriter, ShaderStage::Vertex, &vertex.text);

    assert_eq!(
        body,
        "layout (location = 0) in vec3 position;\n\
         layout (location = 8) in vec2 texCoord;\n\
         out vec2 v_texCoord;\n\
         uniform mat4 modelViewProjectionMatrix;\n\
         void main() {\n\
         \tv_texCoord = texCoord;\n\
         \tgl_Position = modelViewProjectionMatrix * vec4(position, 1.0);\n\
         }"
    );
}

#[test]
fn test_line_continuations_survive_the_rewrite() {
    let rewriter = DialectRewriter::new(DriverCapabilities::gl33());
    let source = "#define SCALE(v) \\\n    (v * 2.0)\nvoid main() {}\n";
    let rewrite = rewriter.rewrite_stage("macro", ShaderStage::Vertex, source);
    let body = body(&rewriter, ShaderStage::Vertex, &rewrite.source.text);

    assert_eq!(body, "#define SCALE(v) \\\n(v * 2.0)\nvoid main() {}");
    assert_eq!(
        body.lines().count(),
        source.lines().count(),
        "continued lines keep their own line in the output"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Embedded texture LOD
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_gles2_lod_extension_uses_ext_builtins() {
    let caps = DriverCapabilities {
        ext_shader_texture_lod: true,
        ..DriverCapabilities::gles2()
    };
    let rewriter = DialectRewriter::new(caps);
    let program = rewriter.rewrite_program("textured", Some(VERTEX), Some(FRAGMENT));
    let fragment = program.fragment.expect("fragment stage was given");

    assert!(fragment.text.starts_with("#version 100\n"));
    assert!(
        fragment
            .text
            .contains("#extension GL_EXT_shader_texture_lod : enable\n"),
        "ES targets enable the EXT extension"
    );
    assert!(fragment.text.contains("texture2DLodEXT(s, uv.xy, uv.w)"));
    assert!(fragment.text.contains("textureCubeLodEXT(s, uv.xyz, uv.w)"));
    assert!(!fragment.text.contains("GL_ARB_shader_texture_lod"));
    assert!(!fragment.text.contains("texture2DLod("));
}

#[test]
fn test_gles2_ignores_the_desktop_lod_flag() {
    let caps = DriverCapabilities {
        shader_texture_lod: true,
        ..DriverCapabilities::gles2()
    };
    let rewriter = DialectRewriter::new(caps);
    let program = rewriter.rewrite_program("textured", None, Some(FRAGMENT));
    let fragment = program.fragment.expect("fragment stage was given");

    assert!(!fragment.text.contains("#extension"));
    assert!(!fragment.text.contains("tex2Dlod"));
    assert!(!fragment.text.contains("texCUBElod"));
}
