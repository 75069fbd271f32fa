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

//! Serialized form of a headless program.
//!
//! ```text
//! repeat: [u8 stage][u32 len][len bytes of UTF-8 source]
//! ```

use glint_core::renderer::api::ShaderStage;

fn stage_tag(stage: ShaderStage) -> u8 {
    match stage {
        ShaderStage::Vertex => 0,
        ShaderStage::Fragment => 1,
    }
}

pub(crate) fn encode(stages: &[(ShaderStage, String)]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for (stage, text) in stages {
        bytes.push(stage_tag(*stage));
        bytes.extend_from_slice(&(text.len() as u32).to_le_bytes());
        bytes.extend_from_slice(text.as_bytes());
    }
    bytes
}

/// `None` if the payload is malformed.
pub(crate) fn decode(mut bytes: &[u8]) -> Option<Vec<(ShaderStage, String)>> {
    let mut stages = Vec::new();
    while let Some((&tag, rest)) = bytes.split_first() {
        let stage = match tag {
            0 => ShaderStage::Vertex,
            1 => ShaderStage::Fragment,
            _ => return None,
        };
        let (len, rest) = rest.split_first_chunk::<4>()?;
        let len = u32::from_le_bytes(*len) as usize;
        if rest.len() < len {
            return None;
        }
        let (text, rest) = rest.split_at(len);
        stages.push((stage, String::from_utf8(text.to_vec()).ok()?));
        bytes = rest;
    }
    Some(stages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_survive_encoding() {
        let stages = vec![
            (ShaderStage::Vertex, "void main() {}".to_string()),
            (ShaderStage::Fragment, String::new()),
        ];
        assert_eq!(decode(&encode(&stages)), Some(stages));
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        assert_eq!(decode(&[7]), None);
        assert_eq!(decode(&[0, 9, 0, 0, 0, b'x']), None);
        assert_eq!(decode(&[]), Some(Vec::new()));
    }
}
