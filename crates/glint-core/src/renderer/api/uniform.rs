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

//! Reflection and constant-upload types.

/// The type of an active uniform, as reported by the driver after linking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum UniformType {
    Float,
    FloatVec2,
    FloatVec3,
    FloatVec4,
    Int,
    IntVec2,
    IntVec3,
    IntVec4,
    UInt,
    UIntVec2,
    UIntVec3,
    UIntVec4,
    Bool,
    BoolVec2,
    BoolVec3,
    BoolVec4,
    FloatMat2,
    FloatMat3,
    FloatMat4,
    Sampler2D,
    Sampler3D,
    SamplerCube,
    Sampler2DShadow,
    SamplerCubeShadow,
    Sampler2DArray,
    Sampler2DArrayShadow,
    /// A type the pipeline does not dispatch (raw driver enum).
    Other(u32),
}

impl UniformType {
    /// `true` for opaque texture-binding types.
    pub fn is_sampler(self) -> bool {
        matches!(
            self,
            UniformType::Sampler2D
                | UniformType::Sampler3D
                | UniformType::SamplerCube
                | UniformType::Sampler2DShadow
                | UniformType::SamplerCubeShadow
                | UniformType::Sampler2DArray
                | UniformType::Sampler2DArrayShadow
        )
    }

    /// Parses a shading-language type keyword (`vec3`, `sampler2D`, ...).
    pub fn from_glsl(keyword: &str) -> Option<Self> {
        let ty = match keyword {
            "float" => UniformType::Float,
            "vec2" => UniformType::FloatVec2,
            "vec3" => UniformType::FloatVec3,
            "vec4" => UniformType::FloatVec4,
            "int" => UniformType::Int,
            "ivec2" => UniformType::IntVec2,
            "ivec3" => UniformType::IntVec3,
            "ivec4" => UniformType::IntVec4,
            "uint" => UniformType::UInt,
            "uvec2" => UniformType::UIntVec2,
            "uvec3" => UniformType::UIntVec3,
            "uvec4" => UniformType::UIntVec4,
            "bool" => UniformType::Bool,
            "bvec2" => UniformType::BoolVec2,
            "bvec3" => UniformType::BoolVec3,
            "bvec4" => UniformType::BoolVec4,
            "mat2" => UniformType::FloatMat2,
            "mat3" => UniformType::FloatMat3,
            "mat4" => UniformType::FloatMat4,
            "sampler2D" => UniformType::Sampler2D,
            "sampler3D" => UniformType::Sampler3D,
            "samplerCube" => UniformType::SamplerCube,
            "sampler2DShadow" => UniformType::Sampler2DShadow,
            "samplerCubeShadow" => UniformType::SamplerCubeShadow,
            "sampler2DArray" => UniformType::Sampler2DArray,
            "sampler2DArrayShadow" => UniformType::Sampler2DArrayShadow,
            _ => return None,
        };
        Some(ty)
    }
}

/// An active uniform as enumerated by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveUniform {
    /// Name as reported; arrays are reported as `name[0]`.
    pub name: String,
    /// Array size, `1` for non-arrays.
    pub size: i32,
    /// Reflected type.
    pub ty: UniformType,
}

/// An opaque driver uniform location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

/// A typed uniform update, ready to hand to the driver.
///
/// `components` is the vector width (1..=4), `dim` the matrix dimension
/// (2..=4). The element count is implied by the slice length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformUpload<'a> {
    /// `float`/`vecN` values.
    Float {
        /// Vector width.
        components: u8,
        /// Packed values.
        data: &'a [f32],
    },
    /// `int`/`uint`/`bool` scalars and vectors, all uploaded as signed integers.
    Int {
        /// Vector width.
        components: u8,
        /// Packed values.
        data: &'a [i32],
    },
    /// `matN` values.
    Matrix {
        /// Matrix dimension.
        dim: u8,
        /// Whether `data` is row-major and must be transposed.
        transpose: bool,
        /// Packed values.
        data: &'a [f32],
    },
}

/// Caller-supplied constant data. The reflected uniform type, not this tag,
/// decides the upload call; the tag only tells how the buffer was packed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstantData<'a> {
    /// Floating-point values.
    Floats(&'a [f32]),
    /// Integer values.
    Ints(&'a [i32]),
}

impl ConstantData<'_> {
    /// Number of packed scalars.
    pub fn len(&self) -> usize {
        match self {
            ConstantData::Floats(data) => data.len(),
            ConstantData::Ints(data) => data.len(),
        }
    }

    /// `true` if the buffer holds no scalars.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An index into a program's sorted uniform table.
///
/// Negative slots are valid values meaning "not exposed by this program";
/// dispatching to them does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstantSlot(pub i32);

impl ConstantSlot {
    /// The slot of a constant the program does not expose.
    pub const NONE: ConstantSlot = ConstantSlot(-1);

    /// Returns the table index, or `None` for negative slots.
    pub fn index(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }

    /// `true` for non-negative slots.
    pub fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl Default for ConstantSlot {
    fn default() -> Self {
        Self::NONE
    }
}

/// A reflected sampler and the texture unit it was bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerEntry {
    /// Sampler name (`name[i]` for array elements).
    pub name: String,
    /// Texture unit assigned at reflection time.
    pub unit: u32,
}

/// A reflected non-sampler uniform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformEntry {
    /// Base name, without an array suffix.
    pub name: String,
    /// Driver location.
    pub location: UniformLocation,
    /// Reflected type.
    pub ty: UniformType,
    /// Array size, `1` for non-arrays.
    pub count: i32,
}
