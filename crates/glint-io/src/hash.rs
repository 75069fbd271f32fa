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

//! Content keys for the program binary cache.

/// 32-bit hash of one rewritten stage: the first four bytes of its BLAKE3
/// digest, read little-endian.
pub fn stage_hash(text: &str) -> u32 {
    let [a, b, c, d, ..] = *blake3::hash(text.as_bytes()).as_bytes();
    u32::from_le_bytes([a, b, c, d])
}

/// Cache key of a program: the XOR of both stage hashes. An absent stage
/// hashes as empty text.
pub fn program_key(vertex: Option<&str>, fragment: Option<&str>) -> u32 {
    stage_hash(vertex.unwrap_or_default()) ^ stage_hash(fragment.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_hash_is_stable() {
        assert_eq!(stage_hash("void main() {}"), stage_hash("void main() {}"));
    }

    #[test]
    fn stage_hash_uses_digest_prefix() {
        let digest = blake3::hash(b"abc");
        let expected = u32::from_le_bytes([
            digest.as_bytes()[0],
            digest.as_bytes()[1],
            digest.as_bytes()[2],
            digest.as_bytes()[3],
        ]);
        assert_eq!(stage_hash("abc"), expected);
    }

    #[test]
    fn one_character_changes_the_key() {
        let key = program_key(Some("void main() {}"), Some("void main() { }"));
        assert_ne!(key, program_key(Some("void main() {}"), Some("void main() {  }")));
        assert_ne!(key, program_key(Some("void main(){}"), Some("void main() { }")));
    }

    #[test]
    fn absent_stage_hashes_as_empty() {
        assert_eq!(
            program_key(Some("vs"), None),
            stage_hash("vs") ^ stage_hash("")
        );
    }
}
