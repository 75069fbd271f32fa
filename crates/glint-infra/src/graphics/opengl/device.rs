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

use std::num::NonZeroU32;

use glint_core::renderer::api::{
    ActiveUniform, DriverCapabilities, ProgramBinary, ProgramObjectId, ShaderStage,
    StageObjectId, TextureId, UniformLocation, UniformUpload,
};
use glint_core::renderer::{ShaderDevice, ShaderError};
use glow::HasContext;

use super::conversions::{capabilities_for, stage_enum, uniform_type};

/// A [`ShaderDevice`] over a current OpenGL or OpenGL ES context.
///
/// The context must stay current on the calling thread for the lifetime of
/// the device.
pub struct GlowDevice {
    gl: glow::Context,
    caps: DriverCapabilities,
}

impl std::fmt::Debug for GlowDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlowDevice")
            .field("caps", &self.caps)
            .finish_non_exhaustive()
    }
}

impl GlowDevice {
    /// Wraps `gl` and detects its capabilities.
    pub fn new(gl: glow::Context) -> Self {
        let caps = detect_capabilities(&gl);
        log::info!(
            "GlowDevice: {} (GLSL '{}', binaries: {})",
            gl.version().vendor_info,
            caps.glsl_version_string,
            caps.program_binary
        );
        Self { gl, caps }
    }

    /// Wraps `gl` with explicitly chosen capabilities.
    pub fn with_capabilities(gl: glow::Context, caps: DriverCapabilities) -> Self {
        Self { gl, caps }
    }

    /// The wrapped context.
    pub fn context(&self) -> &glow::Context {
        &self.gl
    }
}

/// Derives the dialect and extension flags of `gl`.
pub fn detect_capabilities(gl: &glow::Context) -> DriverCapabilities {
    let version = gl.version();
    let extensions = gl.supported_extensions();
    capabilities_for(version.major, version.minor, version.is_embedded, |name| {
        extensions.contains(name)
    })
}

fn native_stage(stage: StageObjectId) -> Option<glow::NativeShader> {
    NonZeroU32::new(stage.0).map(glow::NativeShader)
}

fn native_program(program: ProgramObjectId) -> Option<glow::NativeProgram> {
    NonZeroU32::new(program.0).map(glow::NativeProgram)
}

impl ShaderDevice for GlowDevice {
    fn capabilities(&self) -> DriverCapabilities {
        self.caps.clone()
    }

    fn create_stage(&mut self, stage: ShaderStage) -> Result<StageObjectId, ShaderError> {
        let shader = unsafe { self.gl.create_shader(stage_enum(stage)) }.map_err(ShaderError::Driver)?;
        Ok(StageObjectId(shader.0.get()))
    }

    fn compile_stage(&mut self, stage: StageObjectId, source: &str) -> bool {
        let Some(shader) = native_stage(stage) else {
            return false;
        };
        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            self.gl.get_shader_compile_status(shader)
        }
    }

    fn stage_info_log(&self, stage: StageObjectId) -> String {
        native_stage(stage)
            .map(|shader| unsafe { self.gl.get_shader_info_log(shader) })
            .unwrap_or_default()
    }

    fn delete_stage(&mut self, stage: StageObjectId) {
        if let Some(shader) = native_stage(stage) {
            unsafe { self.gl.delete_shader(shader) };
        }
    }

    fn create_program(&mut self) -> Result<ProgramObjectId, ShaderError> {
        let program = unsafe { self.gl.create_program() }.map_err(ShaderError::Driver)?;
        Ok(ProgramObjectId(program.0.get()))
    }

    fn delete_program(&mut self, program: ProgramObjectId) {
        if let Some(program) = native_program(program) {
            unsafe { self.gl.delete_program(program) };
        }
    }

    fn attach_stage(&mut self, program: ProgramObjectId, stage: StageObjectId) {
        if let (Some(program), Some(shader)) = (native_program(program), native_stage(stage)) {
            unsafe { self.gl.attach_shader(program, shader) };
        }
    }

    fn bind_attrib_location(&mut self, program: ProgramObjectId, location: u32, name: &str) {
        if let Some(program) = native_program(program) {
            unsafe { self.gl.bind_attrib_location(program, location, name) };
        }
    }

    fn bind_frag_data_location(&mut self, program: ProgramObjectId, location: u32, name: &str) {
        if let Some(program) = native_program(program) {
            unsafe { self.gl.bind_frag_data_location(program, location, name) };
        }
    }

    fn link_program(&mut self, program: ProgramObjectId) -> bool {
        let Some(program) = native_program(program) else {
            return false;
        };
        unsafe {
            self.gl.link_program(program);
            self.gl.get_program_link_status(program)
        }
    }

    fn link_status(&self, program: ProgramObjectId) -> bool {
        native_program(program)
            .is_some_and(|program| unsafe { self.gl.get_program_link_status(program) })
    }

    fn program_info_log(&self, program: ProgramObjectId) -> String {
        native_program(program)
            .map(|program| unsafe { self.gl.get_program_info_log(program) })
            .unwrap_or_default()
    }

    fn program_binary(&self, program: ProgramObjectId) -> Option<ProgramBinary> {
        if !self.caps.program_binary {
            return None;
        }
        let binary = unsafe { self.gl.get_program_binary(native_program(program)?) }?;
        Some(ProgramBinary {
            format: binary.format,
            payload: binary.buffer,
        })
    }

    fn load_program_binary(&mut self, program: ProgramObjectId, binary: &ProgramBinary) -> bool {
        let Some(program) = native_program(program) else {
            return false;
        };
        let native = glow::ProgramBinary {
            buffer: binary.payload.clone(),
            format: binary.format,
        };
        unsafe {
            self.gl.program_binary(program, &native);
            self.gl.get_program_link_status(program)
        }
    }

    fn active_uniforms(&self, program: ProgramObjectId) -> Vec<ActiveUniform> {
        let Some(program) = native_program(program) else {
            return Vec::new();
        };
        let count = unsafe { self.gl.get_active_uniforms(program) };
        (0..count)
            .filter_map(|index| unsafe { self.gl.get_active_uniform(program, index) })
            .map(|uniform| ActiveUniform {
                name: uniform.name,
                size: uniform.size,
                ty: uniform_type(uniform.utype),
            })
            .collect()
    }

    fn uniform_location(&self, program: ProgramObjectId, name: &str) -> Option<UniformLocation> {
        let location = unsafe { self.gl.get_uniform_location(native_program(program)?, name) }?;
        Some(UniformLocation(location.0))
    }

    fn use_program(&mut self, program: Option<ProgramObjectId>) {
        unsafe { self.gl.use_program(program.and_then(native_program)) };
    }

    fn set_uniform(&mut self, location: UniformLocation, upload: UniformUpload<'_>) {
        let location = glow::NativeUniformLocation(location.0);
        let location = Some(&location);
        unsafe {
            match upload {
                UniformUpload::Float { components, data } => match components {
                    1 => self.gl.uniform_1_f32_slice(location, data),
                    2 => self.gl.uniform_2_f32_slice(location, data),
                    3 => self.gl.uniform_3_f32_slice(location, data),
                    _ => self.gl.uniform_4_f32_slice(location, data),
                },
                UniformUpload::Int { components, data } => match components {
                    1 => self.gl.uniform_1_i32_slice(location, data),
                    2 => self.gl.uniform_2_i32_slice(location, data),
                    3 => self.gl.uniform_3_i32_slice(location, data),
                    _ => self.gl.uniform_4_i32_slice(location, data),
                },
                UniformUpload::Matrix {
                    dim,
                    transpose,
                    data,
                } => match dim {
                    2 => self.gl.uniform_matrix_2_f32_slice(location, transpose, data),
                    3 => self.gl.uniform_matrix_3_f32_slice(location, transpose, data),
                    _ => self.gl.uniform_matrix_4_f32_slice(location, transpose, data),
                },
            }
        }
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureId) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl
                .bind_texture(glow::TEXTURE_2D, NonZeroU32::new(texture.0).map(glow::NativeTexture));
        }
    }
}
