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

//! Source scanning used by the headless driver in place of a real compiler.

use glint_core::renderer::api::UniformType;

/// A `uniform` declaration found in stage text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DeclaredUniform {
    pub name: String,
    pub ty: UniformType,
    /// Array size, `1` for non-arrays.
    pub size: u32,
}

/// Removes `//` and `/* */` comments, keeping line breaks.
pub(crate) fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut last = '\0';
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                    }
                    if last == '*' && skipped == '/' {
                        break;
                    }
                    last = skipped;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }
    out
}

/// First `#error` directive: its 1-based line and message.
pub(crate) fn error_directive(text: &str) -> Option<(usize, String)> {
    strip_comments(text)
        .lines()
        .enumerate()
        .find_map(|(index, line)| {
            let rest = line.trim_start().strip_prefix('#')?.trim_start();
            let message = rest.strip_prefix("error")?;
            Some((index + 1, message.trim().to_string()))
        })
}

/// Every top-level `uniform` declaration, in source order. Uniform blocks
/// and types the pipeline does not know are skipped.
pub(crate) fn declared_uniforms(text: &str) -> Vec<DeclaredUniform> {
    let text = strip_comments(text);
    let mut uniforms = Vec::new();

    for statement in text.split(';') {
        let spaced = statement
            .replace('[', " [ ")
            .replace(']', " ] ")
            .replace(',', " , ");
        let mut words = spaced
            .split_whitespace()
            .skip_while(|word| *word != "uniform")
            .skip(1)
            .skip_while(|word| matches!(*word, "lowp" | "mediump" | "highp"))
            .peekable();

        let Some(ty) = words.next().and_then(UniformType::from_glsl) else {
            continue;
        };
        while let Some(name) = words.next() {
            match name {
                "," => continue,
                "=" => break,
                _ => {}
            }
            let mut size = 1;
            if words.peek() == Some(&"[") {
                words.next();
                size = words
                    .next()
                    .and_then(|count| count.parse().ok())
                    .unwrap_or(1);
                words.next();
            }
            uniforms.push(DeclaredUniform {
                name: name.to_string(),
                ty,
                size,
            });
        }
    }
    uniforms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_are_removed() {
        assert_eq!(strip_comments("a // b\nc"), "a \nc");
        assert_eq!(strip_comments("a /* b\n c */d"), "a \n d");
    }

    #[test]
    fn error_directive_reports_line() {
        let text = "void main() {}\n  #error missing feature\n";
        assert_eq!(
            error_directive(text),
            Some((2, "missing feature".to_string()))
        );
        assert_eq!(error_directive("// #error nope\n"), None);
    }

    #[test]
    fn uniforms_are_found_in_order() {
        let text = "uniform mat4 zeta;\n\
                    uniform highp vec4 alpha, mid;\n\
                    uniform sampler2D maps[3];\n\
                    // uniform float hidden;\n\
                    uniform Lights { vec4 color; };\n\
                    void main() { float uniform_like = 1.0; }";
        let names: Vec<_> = declared_uniforms(text)
            .into_iter()
            .map(|uniform| (uniform.name, uniform.size))
            .collect();
        assert_eq!(
            names,
            vec![
                ("zeta".to_string(), 1),
                ("alpha".to_string(), 1),
                ("mid".to_string(), 1),
                ("maps".to_string(), 3),
            ]
        );
    }
}
