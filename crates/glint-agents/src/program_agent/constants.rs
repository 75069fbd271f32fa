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

//! Typed uniform uploads driven by the reflected uniform type.

use glint_core::renderer::api::{ConstantData, UniformEntry, UniformType, UniformUpload};
use glint_core::renderer::ShaderDevice;

/// How a reflected type is uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UploadShape {
    Float(u8),
    Int(u8),
    Matrix(u8),
}

impl UploadShape {
    fn of(ty: UniformType) -> Option<Self> {
        use UniformType::*;
        let shape = match ty {
            Float => Self::Float(1),
            FloatVec2 => Self::Float(2),
            FloatVec3 => Self::Float(3),
            FloatVec4 => Self::Float(4),
            Int | UInt | Bool => Self::Int(1),
            IntVec2 | UIntVec2 | BoolVec2 => Self::Int(2),
            IntVec3 | UIntVec3 | BoolVec3 => Self::Int(3),
            IntVec4 | UIntVec4 | BoolVec4 => Self::Int(4),
            FloatMat2 => Self::Matrix(2),
            FloatMat3 => Self::Matrix(3),
            FloatMat4 => Self::Matrix(4),
            _ => return None,
        };
        Some(shape)
    }

    /// Scalars per element.
    fn width(self) -> usize {
        match self {
            Self::Float(n) | Self::Int(n) => n as usize,
            Self::Matrix(n) => (n as usize) * (n as usize),
        }
    }
}

/// Uploads `count` elements of `data` to `uniform`.
///
/// The call is chosen by the reflected type alone. Data of the other scalar
/// kind is reinterpreted bit for bit. A buffer shorter than `count` elements
/// is refused with a warning and nothing is uploaded.
pub(crate) fn dispatch<D: ShaderDevice>(
    device: &mut D,
    uniform: &UniformEntry,
    data: ConstantData<'_>,
    count: usize,
    row_major: bool,
) {
    let Some(shape) = UploadShape::of(uniform.ty) else {
        log::warn!(
            "ConstantDispatcher: '{}' has type {:?}, which takes no constant upload",
            uniform.name,
            uniform.ty
        );
        return;
    };

    let needed = shape.width() * count.max(1);
    if data.len() < needed {
        log::warn!(
            "ConstantDispatcher: '{}' needs {} scalars, got {}",
            uniform.name,
            needed,
            data.len()
        );
        return;
    }

    let upload = match shape {
        UploadShape::Float(components) => UniformUpload::Float {
            components,
            data: &as_floats(data)[..needed],
        },
        UploadShape::Int(components) => UniformUpload::Int {
            components,
            data: &as_ints(data)[..needed],
        },
        UploadShape::Matrix(dim) => UniformUpload::Matrix {
            dim,
            transpose: row_major,
            data: &as_floats(data)[..needed],
        },
    };
    device.set_uniform(uniform.location, upload);
}

/// Number of whole elements of `uniform` that `len` scalars cover, clamped
/// to the reflected array size. `None` for types that take no upload.
pub(crate) fn elements_in(uniform: &UniformEntry, len: usize) -> Option<usize> {
    let width = UploadShape::of(uniform.ty)?.width();
    let declared = usize::try_from(uniform.count).unwrap_or(1).max(1);
    Some((len / width).clamp(1, declared))
}

fn as_floats<'a>(data: ConstantData<'a>) -> &'a [f32] {
    match data {
        ConstantData::Floats(values) => values,
        ConstantData::Ints(values) => bytemuck::cast_slice(values),
    }
}

fn as_ints<'a>(data: ConstantData<'a>) -> &'a [i32] {
    match data {
        ConstantData::Ints(values) => values,
        ConstantData::Floats(values) => bytemuck::cast_slice(values),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_follow_the_reflected_type() {
        assert_eq!(UploadShape::of(UniformType::FloatVec3).map(UploadShape::width), Some(3));
        assert_eq!(UploadShape::of(UniformType::BoolVec2), Some(UploadShape::Int(2)));
        assert_eq!(UploadShape::of(UniformType::UInt), Some(UploadShape::Int(1)));
        assert_eq!(UploadShape::of(UniformType::FloatMat3).map(UploadShape::width), Some(9));
        assert_eq!(UploadShape::of(UniformType::Sampler2D), None);
        assert_eq!(UploadShape::of(UniformType::Other(0x1406)), None);
    }

    #[test]
    fn element_count_is_clamped_to_the_array() {
        let uniform = UniformEntry {
            name: "bones".into(),
            location: glint_core::renderer::api::UniformLocation(0),
            ty: UniformType::FloatMat4,
            count: 2,
        };
        assert_eq!(elements_in(&uniform, 16), Some(1));
        assert_eq!(elements_in(&uniform, 48), Some(2));
        assert_eq!(elements_in(&uniform, 3), Some(1));
    }

    #[test]
    fn data_is_reinterpreted_not_converted() {
        let ints = [1.0f32.to_bits() as i32];
        assert_eq!(as_floats(ConstantData::Ints(&ints)), &[1.0]);
        assert_eq!(as_ints(ConstantData::Floats(&[1.0])), &ints);
    }
}
