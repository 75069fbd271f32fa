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

use crate::renderer::api::*;
use crate::renderer::error::ShaderError;
use std::fmt::Debug;

/// The primitive driver operations of a GLSL-style programmable pipeline.
///
/// All calls are made from the thread that owns the driver context.
pub trait ShaderDevice: Debug {
    /// Reports what the driver accepts. Queried once when the agent starts.
    fn capabilities(&self) -> DriverCapabilities;

    /// Creates an empty stage object.
    /// ## Arguments
    /// * `stage` - The pipeline stage the object will hold.
    /// ## Errors
    /// * `ShaderError::Driver` - If the driver cannot allocate the object.
    fn create_stage(&mut self, stage: ShaderStage) -> Result<StageObjectId, ShaderError>;

    /// Uploads `source` into a stage object and compiles it.
    /// ## Arguments
    /// * `stage` - The stage object created by [`ShaderDevice::create_stage`].
    /// * `source` - The rewritten text.
    /// ## Returns
    /// The driver's compile status.
    fn compile_stage(&mut self, stage: StageObjectId, source: &str) -> bool;

    /// Returns the compile info log of a stage object (possibly empty).
    fn stage_info_log(&self, stage: StageObjectId) -> String;

    /// Releases a stage object. Attached stages stay alive until their
    /// program is deleted.
    fn delete_stage(&mut self, stage: StageObjectId);

    /// Creates an empty program object.
    /// ## Errors
    /// * `ShaderError::Driver` - If the driver cannot allocate the object.
    fn create_program(&mut self) -> Result<ProgramObjectId, ShaderError>;

    /// Releases a program object.
    fn delete_program(&mut self, program: ProgramObjectId);

    /// Attaches a compiled stage to a program.
    fn attach_stage(&mut self, program: ProgramObjectId, stage: StageObjectId);

    /// Binds a vertex input name to a location. Takes effect at the next link.
    /// ## Arguments
    /// * `program` - The program being built.
    /// * `location` - The attribute location.
    /// * `name` - The vertex input name as declared in the source.
    fn bind_attrib_location(&mut self, program: ProgramObjectId, location: u32, name: &str);

    /// Binds a fragment output name to a color number. Takes effect at the
    /// next link.
    fn bind_frag_data_location(&mut self, program: ProgramObjectId, location: u32, name: &str);

    /// Links the attached stages.
    /// ## Returns
    /// The driver's link status.
    fn link_program(&mut self, program: ProgramObjectId) -> bool;

    /// Returns the link status of a program, as last reported by the driver.
    fn link_status(&self, program: ProgramObjectId) -> bool;

    /// Returns the link info log of a program (possibly empty).
    fn program_info_log(&self, program: ProgramObjectId) -> String;

    /// Retrieves the serialized form of a linked program.
    /// ## Returns
    /// `None` when the driver does not support program binaries or the
    /// program is not linked.
    fn program_binary(&self, program: ProgramObjectId) -> Option<ProgramBinary>;

    /// Loads a serialized program into an empty program object.
    /// ## Returns
    /// The resulting link status. A binary from another driver or driver
    /// version yields `false`.
    fn load_program_binary(&mut self, program: ProgramObjectId, binary: &ProgramBinary) -> bool;

    /// Enumerates the active uniforms of a linked program, in driver order.
    fn active_uniforms(&self, program: ProgramObjectId) -> Vec<ActiveUniform>;

    /// Looks up the location of an active uniform by its full name
    /// (`name` or `name[i]`).
    fn uniform_location(&self, program: ProgramObjectId, name: &str) -> Option<UniformLocation>;

    /// Makes `program` current, or unbinds the current program with `None`.
    fn use_program(&mut self, program: Option<ProgramObjectId>);

    /// Uploads a uniform of the current program.
    fn set_uniform(&mut self, location: UniformLocation, value: UniformUpload<'_>);

    /// Binds a texture to a texture unit.
    fn bind_texture(&mut self, unit: u32, texture: TextureId);
}
