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

//! The dialect rewriter.
//!
//! A single left-to-right pass regenerates the body token by token. Layout is
//! rebuilt from the token metadata: a token that crossed a line starts a new
//! line indented by its brace depth, a line continuation is written back as
//! `\` plus a line break, a token preceded by whitespace gets one space, and
//! anything else is glued to its predecessor. Top-level `in`/`out`
//! declarations are replaced with the storage qualifiers of the target
//! dialect, and on legacy fragment targets references to recorded outputs
//! are redirected to the built-in output variables.

use super::declaration::{parse_declaration, DeclarationDiagnostic, DiagnosticSink};
use super::header::{precision_block, version_preamble};
use super::stdlib::stdlib_shim;
use super::tokenizer::{SourceToken, TokenKind, Tokenizer};
use glint_core::renderer::api::{
    legacy_output_substitute, DriverCapabilities, InterfaceSlot, ProgramInterface,
    RewrittenSource, ShaderStage,
};
use std::fmt::Write;

/// The result of rewriting one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRewrite {
    /// Header, stdlib shim and rewritten body.
    pub source: RewrittenSource,
    /// Vertex inputs (vertex stage) or fragment outputs (fragment stage), in
    /// declaration order.
    pub interface: Vec<InterfaceSlot>,
    /// Recovered declaration problems.
    pub diagnostics: Vec<DeclarationDiagnostic>,
}

/// The result of rewriting a vertex/fragment pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RewrittenProgram {
    /// Rewritten vertex stage, if one was given.
    pub vertex: Option<RewrittenSource>,
    /// Rewritten fragment stage, if one was given.
    pub fragment: Option<RewrittenSource>,
    /// Extracted interface of both stages.
    pub interface: ProgramInterface,
    /// Recovered declaration problems of both stages.
    pub diagnostics: Vec<DeclarationDiagnostic>,
}

/// Rewrites engine-dialect shader text into the dialect of one driver.
///
/// The per-stage headers depend only on the capabilities, so they are built
/// once at construction and reused for every program.
#[derive(Debug, Clone)]
pub struct DialectRewriter {
    caps: DriverCapabilities,
    vertex_header: String,
    fragment_header: String,
}

impl DialectRewriter {
    /// Creates a rewriter for the given target.
    pub fn new(caps: DriverCapabilities) -> Self {
        let preamble = version_preamble(&caps);
        let build = |stage| {
            let mut header = preamble.clone();
            header.push_str(&precision_block(stage, &caps));
            header.push_str(&stdlib_shim(stage, &caps));
            header
        };
        let vertex_header = build(ShaderStage::Vertex);
        let fragment_header = build(ShaderStage::Fragment);
        log::debug!(
            "DialectRewriter: targeting GLSL {} ('{}')",
            caps.glsl_version,
            caps.glsl_version_string
        );
        Self {
            caps,
            vertex_header,
            fragment_header,
        }
    }

    /// The target capabilities.
    pub fn capabilities(&self) -> &DriverCapabilities {
        &self.caps
    }

    /// The text prepended to every body of `stage`.
    pub fn header(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex_header,
            ShaderStage::Fragment => &self.fragment_header,
        }
    }

    /// Rewrites a vertex/fragment pair. Either stage may be absent.
    pub fn rewrite_program(
        &self,
        name: &str,
        vertex: Option<&str>,
        fragment: Option<&str>,
    ) -> RewrittenProgram {
        let mut program = RewrittenProgram::default();

        if let Some(text) = vertex {
            let stage = self.rewrite_stage(name, ShaderStage::Vertex, text);
            program.interface.vertex_inputs = stage.interface;
            program.diagnostics.extend(stage.diagnostics);
            program.vertex = Some(stage.source);
        }
        if let Some(text) = fragment {
            let stage = self.rewrite_stage(name, ShaderStage::Fragment, text);
            program.interface.fragment_outputs = stage.interface;
            program.diagnostics.extend(stage.diagnostics);
            program.fragment = Some(stage.source);
        }
        program
    }

    /// Rewrites one stage.
    pub fn rewrite_stage(&self, name: &str, stage: ShaderStage, source: &str) -> StageRewrite {
        let header = self.header(stage);
        let mut text = String::with_capacity(header.len() + source.len() * 2);
        text.push_str(header);

        let mut sink = DiagnosticSink::new(name, stage);
        let interface = self.rewrite_body(stage, source, name, &mut text, &mut sink);

        log::debug!(
            "DialectRewriter: rewrote {} stage of '{}' ({} interface slots, {} diagnostics)",
            stage,
            name,
            interface.len(),
            sink.entries.len()
        );

        StageRewrite {
            source: RewrittenSource { stage, text },
            interface,
            diagnostics: sink.entries,
        }
    }

    fn rewrite_body(
        &self,
        stage: ShaderStage,
        source: &str,
        name: &str,
        out: &mut String,
        sink: &mut DiagnosticSink<'_>,
    ) -> Vec<InterfaceSlot> {
        let mut tokens = Tokenizer::new(name, source).peekable();
        let mut interface = Vec::new();

        while let Some(token) = tokens.next() {
            push_separator(out, &token);

            let is_input = token.is("in");
            if token.paren_depth == 0 && (is_input || token.is("out")) {
                let records = matches!(
                    (stage, is_input),
                    (ShaderStage::Vertex, true) | (ShaderStage::Fragment, false)
                );
                let Some(slot) = parse_declaration(&mut tokens, token.line, records, sink) else {
                    continue;
                };
                out.push_str(&self.storage_qualifier(stage, is_input, &slot));
                let _ = write!(out, "{} {}{};", slot.ty, slot.name, slot.array_suffix);
                if records {
                    interface.push(slot);
                }
                continue;
            }

            if stage == ShaderStage::Fragment && token.kind == TokenKind::Name {
                if let Some(builtin) = self.legacy_output(&interface, token.text) {
                    out.push_str(builtin);
                    continue;
                }
            }

            out.push_str(token.text);
        }

        interface
    }

    /// The qualifier text emitted in front of a rewritten declaration.
    fn storage_qualifier(&self, stage: ShaderStage, is_input: bool, slot: &InterfaceSlot) -> String {
        let caps = &self.caps;
        let qualifier = match (stage, is_input) {
            (ShaderStage::Vertex, true) if caps.uses_legacy_storage() => "attribute ",
            (ShaderStage::Vertex, true) if caps.requires_attrib_binding() => "in ",
            (ShaderStage::Vertex, true) => {
                return match slot.location {
                    Some(location) => format!("layout (location = {location}) in "),
                    None => "in ".to_string(),
                };
            }
            (ShaderStage::Fragment, false) if caps.uses_legacy_storage() => "",
            (ShaderStage::Fragment, false) if !caps.supports_layout_locations() => "out ",
            (ShaderStage::Fragment, false) => {
                return match slot.location {
                    Some(location) => format!("layout (location = {location}) out "),
                    None => "out ".to_string(),
                };
            }
            (ShaderStage::Fragment, true) | (ShaderStage::Vertex, false)
                if caps.uses_legacy_storage() =>
            {
                "varying "
            }
            (ShaderStage::Fragment, true) => "in ",
            (ShaderStage::Vertex, false) => "out ",
        };
        qualifier.to_string()
    }

    /// The legacy built-in that replaces references to a recorded fragment
    /// output, if the target still uses it. Only bare, non-array outputs
    /// with a resolved location qualify.
    fn legacy_output(&self, outputs: &[InterfaceSlot], identifier: &str) -> Option<&'static str> {
        outputs
            .iter()
            .filter(|slot| slot.name == identifier && !slot.is_array())
            .find_map(|slot| {
                legacy_output_substitute(slot.location?, self.caps.glsl_version)
            })
    }
}

fn push_separator(out: &mut String, token: &SourceToken<'_>) {
    // Continuations are re-emitted so multi-line macros keep their lines.
    for _ in 0..token.continuations {
        out.push_str(" \\\n");
    }
    if token.lines_crossed > 0 {
        out.push('\n');
        for _ in 0..token.brace_depth {
            out.push('\t');
        }
    } else if token.whitespace_before && token.continuations == 0 {
        out.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(rewrite: &StageRewrite, rewriter: &DialectRewriter) -> String {
        rewrite.source.text[rewriter.header(rewrite.source.stage).len()..].to_string()
    }

    #[test]
    fn output_starts_with_header() {
        let rewriter = DialectRewriter::new(DriverCapabilities::gl33());
        let rewrite = rewriter.rewrite_stage("t", ShaderStage::Vertex, "void main() {}");
        assert!(rewrite.source.text.starts_with("#version 330\n#define GLSL_VERSION 330\n"));
        assert!(rewrite.source.text.ends_with("void main() {}"));
    }

    #[test]
    fn indentation_follows_braces() {
        let rewriter = DialectRewriter::new(DriverCapabilities::gl33());
        let rewrite = rewriter.rewrite_stage(
            "t",
            ShaderStage::Vertex,
            "void main()\n{\n    if (x) {\n  y = 1;\n}\n}\n",
        );
        assert_eq!(
            body(&rewrite, &rewriter),
            "void main()\n{\n\tif (x) {\n\t\ty = 1;\n\t}\n}"
        );
    }

    #[test]
    fn vertex_inputs_per_version() {
        let source = "in vec3 position : POSITION;\nin vec2 uv : TEXCOORD0;";
        let expectations = [
            (
                DriverCapabilities::legacy_gl21(),
                "attribute vec3 position;\nattribute vec2 uv;",
            ),
            (
                DriverCapabilities {
                    glsl_version: 150,
                    glsl_version_string: "150".to_string(),
                    ..DriverCapabilities::gl33()
                },
                "in vec3 position;\nin vec2 uv;",
            ),
            (
                DriverCapabilities::gl33(),
                "layout (location = 0) in vec3 position;\nlayout (location = 8) in vec2 uv;",
            ),
        ];
        for (caps, expected) in expectations {
            let rewriter = DialectRewriter::new(caps);
            let rewrite = rewriter.rewrite_stage("t", ShaderStage::Vertex, source);
            assert_eq!(body(&rewrite, &rewriter), expected);
            assert_eq!(rewrite.interface.len(), 2);
            assert_eq!(rewrite.interface[1].location, Some(8));
        }
    }

    #[test]
    fn varyings_are_not_recorded() {
        let rewriter = DialectRewriter::new(DriverCapabilities::legacy_gl21());
        let vs = rewriter.rewrite_stage("t", ShaderStage::Vertex, "out vec2 v_uv;");
        assert_eq!(body(&vs, &rewriter), "varying vec2 v_uv;");
        assert!(vs.interface.is_empty());

        let fs = rewriter.rewrite_stage("t", ShaderStage::Fragment, "in vec2 v_uv;");
        assert_eq!(body(&fs, &rewriter), "varying vec2 v_uv;");
        assert!(fs.interface.is_empty());
    }

    #[test]
    fn function_parameters_are_untouched() {
        let rewriter = DialectRewriter::new(DriverCapabilities::gl33());
        let rewrite = rewriter.rewrite_stage(
            "t",
            ShaderStage::Fragment,
            "void f(in vec3 a, out float b) { b = a.x; }",
        );
        assert_eq!(
            body(&rewrite, &rewriter),
            "void f(in vec3 a, out float b) { b = a.x; }"
        );
        assert!(rewrite.interface.is_empty());
    }

    #[test]
    fn legacy_fragment_outputs_become_builtins() {
        let rewriter = DialectRewriter::new(DriverCapabilities::legacy_gl21());
        let rewrite = rewriter.rewrite_stage(
            "t",
            ShaderStage::Fragment,
            "out vec4 color : FRAG_COLOR;\nout vec4 extra : FRAG_COLOR1;\nvoid main() {\n color = vec4(1.0);\n extra = color;\n}",
        );
        assert_eq!(
            body(&rewrite, &rewriter),
            "vec4 color;\nvec4 extra;\nvoid main() {\n\tgl_FragColor = vec4(1.0);\n\tgl_FragData[1] = gl_FragColor;\n}"
        );
        assert_eq!(rewrite.interface.len(), 2);
    }

    #[test]
    fn frag_depth_redirects_on_modern_targets() {
        let rewriter = DialectRewriter::new(DriverCapabilities::gl33());
        let rewrite = rewriter.rewrite_stage(
            "t",
            ShaderStage::Fragment,
            "out float depth : FRAG_DEPTH;\nvoid main() { depth = 0.5; }",
        );
        // gl_FragDepth is still a live built-in at 330.
        assert_eq!(
            body(&rewrite, &rewriter),
            "layout (location = 5) out float depth;\nvoid main() { gl_FragDepth = 0.5; }"
        );
    }

    #[test]
    fn array_outputs_are_never_redirected() {
        let rewriter = DialectRewriter::new(DriverCapabilities::legacy_gl21());
        let rewrite = rewriter.rewrite_stage(
            "t",
            ShaderStage::Fragment,
            "out vec4 colors[2] : FRAG_COLOR0;\nvoid main() { colors[0] = vec4(0.0); }",
        );
        assert_eq!(
            body(&rewrite, &rewriter),
            "vec4 colors[2];\nvoid main() { colors[0] = vec4(0.0); }"
        );
        assert!(rewrite.interface[0].is_array());
    }

    #[test]
    fn binding_era_fragment_outputs_use_plain_out() {
        let caps = DriverCapabilities {
            glsl_version: 140,
            glsl_version_string: "140".to_string(),
            ..DriverCapabilities::gl33()
        };
        let rewriter = DialectRewriter::new(caps);
        let rewrite = rewriter.rewrite_stage(
            "t",
            ShaderStage::Fragment,
            "out vec4 color : FRAG_COLOR;",
        );
        assert_eq!(body(&rewrite, &rewriter), "out vec4 color;");
        assert_eq!(rewrite.interface[0].location, Some(0));
    }

    #[test]
    fn unresolved_semantic_emits_plain_qualifier() {
        let rewriter = DialectRewriter::new(DriverCapabilities::gl33());
        let rewrite = rewriter.rewrite_stage(
            "t",
            ShaderStage::Vertex,
            "in vec3 tangent : TANGENT;\nvoid main() {}",
        );
        assert_eq!(
            body(&rewrite, &rewriter),
            "in vec3 tangent;\nvoid main() {}"
        );
        assert_eq!(rewrite.interface[0].raw_location(), -1);
        assert_eq!(rewrite.diagnostics.len(), 1);
        assert_eq!(rewrite.diagnostics[0].line, 1);
        assert_eq!(rewrite.diagnostics[0].stage, ShaderStage::Vertex);
    }

    #[test]
    fn malformed_declaration_is_skipped() {
        let rewriter = DialectRewriter::new(DriverCapabilities::gl33());
        let rewrite = rewriter.rewrite_stage(
            "t",
            ShaderStage::Vertex,
            "in ;\nin vec3 position : POSITION;",
        );
        assert_eq!(rewrite.interface.len(), 1);
        assert_eq!(rewrite.interface[0].name, "position");
        assert_eq!(rewrite.diagnostics.len(), 1);
    }

    #[test]
    fn program_rewrite_collects_both_interfaces() {
        let rewriter = DialectRewriter::new(DriverCapabilities::gl33());
        let program = rewriter.rewrite_program(
            "pair",
            Some("in vec3 position : POSITION;"),
            Some("out vec4 color : FRAG_COLOR;"),
        );
        assert_eq!(program.interface.vertex_inputs.len(), 1);
        assert_eq!(program.interface.fragment_outputs.len(), 1);
        assert!(program.vertex.is_some());
        assert!(program.fragment.is_some());

        let vertex_only = rewriter.rewrite_program("v", Some("void main() {}"), None);
        assert!(vertex_only.fragment.is_none());
    }
}
