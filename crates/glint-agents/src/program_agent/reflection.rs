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

//! Post-link introspection of a program's active uniforms.

use glint_core::renderer::api::{
    ActiveUniform, ConstantSlot, ProgramObjectId, SamplerEntry, UniformEntry, UniformUpload,
};
use glint_core::renderer::ShaderDevice;

/// Prefix of driver-reserved uniform names.
const RESERVED_PREFIX: &str = "gl_";

/// The samplers and ordinary uniforms of a linked program, each sorted by
/// name so lookups are binary searches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReflectionTable {
    samplers: Vec<SamplerEntry>,
    uniforms: Vec<UniformEntry>,
}

impl ReflectionTable {
    /// Enumerates the active uniforms of a linked `program`.
    ///
    /// Samplers get sequential texture units in enumeration order and are
    /// bound to them immediately, which requires `program` to be in use: the
    /// device is left with `program` bound and the caller restores its own
    /// binding afterwards.
    pub fn build<D: ShaderDevice>(device: &mut D, program: ProgramObjectId) -> Self {
        device.use_program(Some(program));

        let mut table = Self::default();
        for uniform in device.active_uniforms(program) {
            if uniform.name.starts_with(RESERVED_PREFIX) {
                continue;
            }
            if uniform.ty.is_sampler() {
                table.add_samplers(device, program, &uniform);
            } else {
                table.add_uniform(device, program, uniform);
            }
        }

        table.samplers.sort_by(|a, b| a.name.cmp(&b.name));
        table.uniforms.sort_by(|a, b| a.name.cmp(&b.name));
        log::trace!(
            "ReflectionTable: {} samplers, {} uniforms",
            table.samplers.len(),
            table.uniforms.len()
        );
        table
    }

    fn add_samplers<D: ShaderDevice>(
        &mut self,
        device: &mut D,
        program: ProgramObjectId,
        uniform: &ActiveUniform,
    ) {
        let base = uniform.name.strip_suffix("[0]");
        let names: Vec<String> = match base {
            Some(base) if uniform.size > 1 => (0..uniform.size)
                .map(|element| format!("{base}[{element}]"))
                .collect(),
            _ => vec![uniform.name.clone()],
        };

        for name in names {
            let unit = self.samplers.len() as u32;
            match device.uniform_location(program, &name) {
                Some(location) => device.set_uniform(
                    location,
                    UniformUpload::Int {
                        components: 1,
                        data: &[unit as i32],
                    },
                ),
                None => log::debug!("ReflectionTable: sampler '{name}' has no location"),
            }
            self.samplers.push(SamplerEntry { name, unit });
        }
    }

    fn add_uniform<D: ShaderDevice>(
        &mut self,
        device: &D,
        program: ProgramObjectId,
        uniform: ActiveUniform,
    ) {
        let name = match uniform.name.find('[') {
            None => uniform.name,
            Some(bracket) if &uniform.name[bracket..] == "[0]" => {
                uniform.name[..bracket].to_string()
            }
            Some(_) => return,
        };
        let Some(location) = device.uniform_location(program, &name) else {
            log::debug!("ReflectionTable: uniform '{name}' has no location");
            return;
        };
        self.uniforms.push(UniformEntry {
            name,
            location,
            ty: uniform.ty,
            count: uniform.size,
        });
    }

    /// Slot of the uniform called `name`, or `None` if the program does not
    /// expose it.
    pub fn find_uniform(&self, name: &str) -> Option<ConstantSlot> {
        self.uniforms
            .binary_search_by(|entry| entry.name.as_str().cmp(name))
            .ok()
            .map(|index| ConstantSlot(index as i32))
    }

    /// The uniform behind `slot`. Negative or out-of-range slots yield `None`.
    pub fn uniform(&self, slot: ConstantSlot) -> Option<&UniformEntry> {
        self.uniforms.get(slot.index()?)
    }

    /// Texture unit of the sampler called `name`.
    pub fn sampler_unit(&self, name: &str) -> Option<u32> {
        self.samplers
            .binary_search_by(|entry| entry.name.as_str().cmp(name))
            .ok()
            .map(|index| self.samplers[index].unit)
    }

    /// Samplers, sorted by name.
    pub fn samplers(&self) -> &[SamplerEntry] {
        &self.samplers
    }

    /// Ordinary uniforms, sorted by name.
    pub fn uniforms(&self) -> &[UniformEntry] {
        &self.uniforms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::renderer::api::{UniformLocation, UniformType};

    fn table() -> ReflectionTable {
        let uniform = |name: &str, location| UniformEntry {
            name: name.to_string(),
            location: UniformLocation(location),
            ty: UniformType::FloatVec4,
            count: 1,
        };
        ReflectionTable {
            samplers: vec![
                SamplerEntry {
                    name: "diffuseMap".into(),
                    unit: 1,
                },
                SamplerEntry {
                    name: "shadowMap".into(),
                    unit: 0,
                },
            ],
            uniforms: vec![uniform("alpha", 4), uniform("mid", 2), uniform("zeta", 9)],
        }
    }

    #[test]
    fn uniform_lookup_returns_sorted_index() {
        let table = table();
        assert_eq!(table.find_uniform("alpha"), Some(ConstantSlot(0)));
        assert_eq!(table.find_uniform("zeta"), Some(ConstantSlot(2)));
        assert_eq!(table.find_uniform("beta"), None);
        assert_eq!(
            table.uniform(ConstantSlot(1)).map(|entry| entry.location),
            Some(UniformLocation(2))
        );
    }

    #[test]
    fn invalid_slots_have_no_uniform() {
        let table = table();
        assert!(table.uniform(ConstantSlot::NONE).is_none());
        assert!(table.uniform(ConstantSlot(3)).is_none());
    }

    #[test]
    fn sampler_lookup_returns_assigned_unit() {
        let table = table();
        assert_eq!(table.sampler_unit("shadowMap"), Some(0));
        assert_eq!(table.sampler_unit("diffuseMap"), Some(1));
        assert_eq!(table.sampler_unit("normalMap"), None);
    }
}
