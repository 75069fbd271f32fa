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

//! Integration tests for the HeadlessDevice fed with rewritten sources.

use anyhow::{ensure, Context, Result};
use glint_core::renderer::api::{DriverCapabilities, ProgramObjectId, ShaderStage, UniformType};
use glint_core::renderer::ShaderDevice;
use glint_infra::HeadlessDevice;
use glint_lanes::DialectRewriter;

const VERTEX: &str = "\
in vec3 position : POSITION;
uniform mat4 modelViewProjectionMatrix;
void main() { gl_Position = modelViewProjectionMatrix * vec4(position, 1.0); }
";

const FRAGMENT: &str = "\
out vec4 color : FRAG_COLOR;
uniform sampler2D diffuseMap;
uniform vec4 constantColor;
void main() { color = tex2D(diffuseMap, vec2(0.0)) * constantColor; }
";

/// Rewrites, compiles and links a pair. `None` if a stage fails to compile.
fn link(
    device: &mut HeadlessDevice,
    vertex: &str,
    fragment: &str,
) -> Result<Option<ProgramObjectId>> {
    let rewriter = DialectRewriter::new(device.capabilities());
    let rewritten = rewriter.rewrite_program("headless", Some(vertex), Some(fragment));
    let program = device.create_program()?;
    for source in [rewritten.vertex, rewritten.fragment].into_iter().flatten() {
        let stage = device.create_stage(source.stage)?;
        if !device.compile_stage(stage, &source.text) {
            return Ok(None);
        }
        device.attach_stage(program, stage);
        device.delete_stage(stage);
    }
    ensure!(device.link_program(program), "program must link");
    Ok(Some(program))
}

// ─────────────────────────────────────────────────────────────────────────────
// Rewritten sources
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_rewritten_headers_declare_no_uniforms() -> Result<()> {
    for caps in [
        DriverCapabilities::legacy_gl21(),
        DriverCapabilities::gl33(),
        DriverCapabilities::gles2(),
    ] {
        let mut device = HeadlessDevice::new(caps);
        let program = link(&mut device, VERTEX, FRAGMENT)?.context("stages must compile")?;
        let uniforms = device.active_uniforms(program);
        let names: Vec<_> = uniforms.iter().map(|uniform| uniform.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["modelViewProjectionMatrix", "diffuseMap", "constantColor"],
            "only the user declarations are active"
        );
        assert_eq!(uniforms[1].ty, UniformType::Sampler2D);
    }
    Ok(())
}

#[test]
fn test_error_directive_line_counts_the_header() -> Result<()> {
    let mut device = HeadlessDevice::default();
    let rewriter = DialectRewriter::new(device.capabilities());
    let rewritten = rewriter.rewrite_stage("broken", ShaderStage::Fragment, "#error unsupported\n");

    let stage = device.create_stage(ShaderStage::Fragment)?;
    assert!(!device.compile_stage(stage, &rewritten.source.text));

    let header_lines = rewriter.header(ShaderStage::Fragment).lines().count();
    let log = device.stage_info_log(stage);
    let line: usize = log
        .strip_prefix("ERROR: 0:")
        .and_then(|rest| rest.split(':').next())
        .context("log carries a line number")?
        .parse()?;
    assert!(
        line > header_lines,
        "line {line} must point past the {header_lines}-line header"
    );
    Ok(())
}
