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

//! Engine built-in constants and samplers.
//!
//! Every program resolves these names once, right after reflection, so the
//! per-draw code can set them by index without a name lookup. Programs that
//! do not declare a built-in get [`ConstantSlot::NONE`] (or no sampler unit)
//! for it.

use crate::renderer::api::uniform::ConstantSlot;

/// Built-in constants set by the draw layer on every program that uses them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum BuiltInConstant {
    ModelViewMatrix,
    ProjectionMatrix,
    ModelViewProjectionMatrix,
    ModelViewMatrixTranspose,
    ProjectionMatrixTranspose,
    ModelViewProjectionMatrixTranspose,
    TextureMatrixS,
    TextureMatrixT,
    VertexColorScale,
    VertexColorAdd,
    ConstantColor,
}

impl BuiltInConstant {
    /// All built-in constants, in table order.
    pub const ALL: [BuiltInConstant; 11] = [
        BuiltInConstant::ModelViewMatrix,
        BuiltInConstant::ProjectionMatrix,
        BuiltInConstant::ModelViewProjectionMatrix,
        BuiltInConstant::ModelViewMatrixTranspose,
        BuiltInConstant::ProjectionMatrixTranspose,
        BuiltInConstant::ModelViewProjectionMatrixTranspose,
        BuiltInConstant::TextureMatrixS,
        BuiltInConstant::TextureMatrixT,
        BuiltInConstant::VertexColorScale,
        BuiltInConstant::VertexColorAdd,
        BuiltInConstant::ConstantColor,
    ];

    /// Name of the uniform in shader source.
    pub fn name(self) -> &'static str {
        match self {
            BuiltInConstant::ModelViewMatrix => "modelViewMatrix",
            BuiltInConstant::ProjectionMatrix => "projectionMatrix",
            BuiltInConstant::ModelViewProjectionMatrix => "modelViewProjectionMatrix",
            BuiltInConstant::ModelViewMatrixTranspose => "modelViewMatrixTranspose",
            BuiltInConstant::ProjectionMatrixTranspose => "projectionMatrixTranspose",
            BuiltInConstant::ModelViewProjectionMatrixTranspose => {
                "modelViewProjectionMatrixTranspose"
            }
            BuiltInConstant::TextureMatrixS => "textureMatrixS",
            BuiltInConstant::TextureMatrixT => "textureMatrixT",
            BuiltInConstant::VertexColorScale => "vertexColorScale",
            BuiltInConstant::VertexColorAdd => "vertexColorAdd",
            BuiltInConstant::ConstantColor => "constantColor",
        }
    }
}

/// Built-in samplers bound by the draw layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum BuiltInSampler {
    DiffuseMap,
    NormalMap,
    JointsMap,
}

impl BuiltInSampler {
    /// All built-in samplers, in table order.
    pub const ALL: [BuiltInSampler; 3] = [
        BuiltInSampler::DiffuseMap,
        BuiltInSampler::NormalMap,
        BuiltInSampler::JointsMap,
    ];

    /// Name of the sampler in shader source.
    pub fn name(self) -> &'static str {
        match self {
            BuiltInSampler::DiffuseMap => "diffuseMap",
            BuiltInSampler::NormalMap => "normalMap",
            BuiltInSampler::JointsMap => "jointsMap",
        }
    }
}

/// Per-program resolution of the built-in tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltInSlots {
    constants: [ConstantSlot; BuiltInConstant::ALL.len()],
    samplers: [Option<u32>; BuiltInSampler::ALL.len()],
}

impl BuiltInSlots {
    /// Resolves every built-in with the given lookups.
    pub fn resolve(
        mut constant: impl FnMut(&str) -> Option<ConstantSlot>,
        mut sampler_unit: impl FnMut(&str) -> Option<u32>,
    ) -> Self {
        Self {
            constants: BuiltInConstant::ALL
                .map(|builtin| constant(builtin.name()).unwrap_or(ConstantSlot::NONE)),
            samplers: BuiltInSampler::ALL.map(|builtin| sampler_unit(builtin.name())),
        }
    }

    /// Slot of a built-in constant, [`ConstantSlot::NONE`] if not declared.
    pub fn constant(&self, builtin: BuiltInConstant) -> ConstantSlot {
        self.constants[builtin as usize]
    }

    /// Texture unit of a built-in sampler, if declared.
    pub fn sampler_unit(&self, builtin: BuiltInSampler) -> Option<u32> {
        self.samplers[builtin as usize]
    }
}

impl Default for BuiltInSlots {
    fn default() -> Self {
        Self::resolve(|_| None, |_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_order_matches_discriminants() {
        for (index, builtin) in BuiltInConstant::ALL.iter().enumerate() {
            assert_eq!(*builtin as usize, index);
        }
        for (index, builtin) in BuiltInSampler::ALL.iter().enumerate() {
            assert_eq!(*builtin as usize, index);
        }
    }

    #[test]
    fn absent_builtins_resolve_to_none() {
        let slots = BuiltInSlots::resolve(
            |name| (name == "projectionMatrix").then_some(ConstantSlot(2)),
            |name| (name == "normalMap").then_some(1),
        );
        assert_eq!(
            slots.constant(BuiltInConstant::ProjectionMatrix),
            ConstantSlot(2)
        );
        assert_eq!(
            slots.constant(BuiltInConstant::ModelViewMatrix),
            ConstantSlot::NONE
        );
        assert_eq!(slots.sampler_unit(BuiltInSampler::NormalMap), Some(1));
        assert_eq!(slots.sampler_unit(BuiltInSampler::DiffuseMap), None);
    }
}
