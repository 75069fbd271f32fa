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

//! Compiles rewritten stages and links them into a driver program.

use glint_core::renderer::api::{
    DriverCapabilities, ProgramObjectId, RewrittenSource, StageObjectId,
};
use glint_core::renderer::{ShaderDevice, ShaderError};
use glint_lanes::RewrittenProgram;

/// Compiles every present stage of `program`, binds interface locations the
/// dialect cannot express in source, and links into `object`.
///
/// Stage objects are released before returning, on success and on failure.
///
/// ## Errors
/// * `ShaderError::CompilationFailed` - A stage was rejected; carries the
///   driver log and the numbered rewritten text.
/// * `ShaderError::LinkFailed` - The linker rejected the stages.
/// * `ShaderError::Driver` - A stage object could not be created.
pub(crate) fn compile_and_link<D: ShaderDevice>(
    device: &mut D,
    caps: &DriverCapabilities,
    name: &str,
    program: &RewrittenProgram,
    object: ProgramObjectId,
) -> Result<(), ShaderError> {
    let mut stages: Vec<StageObjectId> = Vec::with_capacity(2);

    let result = compile_stages(device, name, program, &mut stages).and_then(|()| {
        for &stage in &stages {
            device.attach_stage(object, stage);
        }
        bind_locations(device, caps, program, object);
        link(device, name, object)
    });

    for stage in stages {
        device.delete_stage(stage);
    }
    result
}

fn compile_stages<D: ShaderDevice>(
    device: &mut D,
    name: &str,
    program: &RewrittenProgram,
    stages: &mut Vec<StageObjectId>,
) -> Result<(), ShaderError> {
    for source in [&program.vertex, &program.fragment].into_iter().flatten() {
        let stage = device.create_stage(source.stage)?;
        stages.push(stage);
        if !device.compile_stage(stage, &source.text) {
            return Err(compile_error(device, name, stage, source));
        }
    }
    Ok(())
}

fn compile_error<D: ShaderDevice>(
    device: &D,
    name: &str,
    stage: StageObjectId,
    source: &RewrittenSource,
) -> ShaderError {
    let log = device.stage_info_log(stage);
    let source_dump = source.numbered_listing();
    log::warn!(
        "SHADER COMPILE ERROR: {} stage of '{}'\n{}",
        source.stage,
        name,
        log
    );
    log::info!("ShaderCompiler: submitted source of '{name}':\n{source_dump}");
    ShaderError::CompilationFailed {
        name: name.to_string(),
        stage: source.stage,
        log,
        source_dump,
    }
}

fn bind_locations<D: ShaderDevice>(
    device: &mut D,
    caps: &DriverCapabilities,
    program: &RewrittenProgram,
    object: ProgramObjectId,
) {
    if program.vertex.is_some() && caps.requires_attrib_binding() {
        for slot in &program.interface.vertex_inputs {
            if let Some(location) = slot.location {
                device.bind_attrib_location(object, location, &slot.name);
            }
        }
    }
    if program.fragment.is_some() && caps.supports_frag_data_binding() {
        for slot in &program.interface.fragment_outputs {
            if let Some(location) = slot.location {
                device.bind_frag_data_location(object, location, &slot.name);
            }
        }
    }
}

fn link<D: ShaderDevice>(
    device: &mut D,
    name: &str,
    object: ProgramObjectId,
) -> Result<(), ShaderError> {
    device.link_program(object);
    if device.link_status(object) {
        return Ok(());
    }
    let log = device.program_info_log(object);
    log::warn!("ShaderCompiler: failed to link '{name}':\n{log}");
    Err(ShaderError::LinkFailed {
        name: name.to_string(),
        log,
    })
}
