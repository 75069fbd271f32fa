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

use std::collections::HashMap;

use glint_core::renderer::api::{
    ActiveUniform, DriverCapabilities, ProgramBinary, ProgramObjectId, ShaderStage,
    StageObjectId, TextureId, UniformLocation, UniformUpload,
};
use glint_core::renderer::{ShaderDevice, ShaderError};

use super::binary;
use super::declarations::{declared_uniforms, error_directive};

/// Binary format tag the headless driver writes and accepts by default.
pub const HEADLESS_BINARY_FORMAT: u32 = 0x474C_0001;

/// An owned copy of a uniform upload.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum UploadValue {
    Float { components: u8, data: Vec<f32> },
    Int { components: u8, data: Vec<i32> },
    Matrix { dim: u8, transpose: bool, data: Vec<f32> },
}

impl From<UniformUpload<'_>> for UploadValue {
    fn from(upload: UniformUpload<'_>) -> Self {
        match upload {
            UniformUpload::Float { components, data } => UploadValue::Float {
                components,
                data: data.to_vec(),
            },
            UniformUpload::Int { components, data } => UploadValue::Int {
                components,
                data: data.to_vec(),
            },
            UniformUpload::Matrix {
                dim,
                transpose,
                data,
            } => UploadValue::Matrix {
                dim,
                transpose,
                data: data.to_vec(),
            },
        }
    }
}

/// One accepted `set_uniform` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedUpload {
    /// The program in use when the call was made.
    pub program: ProgramObjectId,
    /// Target location.
    pub location: UniformLocation,
    /// Uploaded data.
    pub value: UploadValue,
}

#[derive(Debug)]
struct HeadlessStage {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    info_log: String,
}

#[derive(Debug, Default)]
struct HeadlessProgram {
    // Snapshots of the attached stages: (stage, source, compiled).
    attached: Vec<(ShaderStage, String, bool)>,
    attrib_bindings: Vec<(u32, String)>,
    frag_data_bindings: Vec<(u32, String)>,
    // Sources the current executable was built from.
    linked_stages: Vec<(ShaderStage, String)>,
    linked: bool,
    info_log: String,
    uniforms: Vec<ActiveUniform>,
    locations: HashMap<String, UniformLocation>,
    values: HashMap<UniformLocation, UploadValue>,
}

impl HeadlessProgram {
    /// Rebuilds the uniform tables from the linked sources. Uniforms are
    /// reported in declaration order, vertex stage first, each name once.
    fn reflect(&mut self) {
        self.uniforms.clear();
        self.locations.clear();
        self.values.clear();

        let mut next_location = 0;
        for (_, source) in &self.linked_stages {
            for declared in declared_uniforms(source) {
                if self.locations.contains_key(&declared.name) {
                    continue;
                }
                let base = UniformLocation(next_location);
                self.locations.insert(declared.name.clone(), base);
                let reported = if declared.size > 1 {
                    for element in 0..declared.size {
                        self.locations.insert(
                            format!("{}[{element}]", declared.name),
                            UniformLocation(next_location + element),
                        );
                    }
                    format!("{}[0]", declared.name)
                } else {
                    declared.name
                };
                self.uniforms.push(ActiveUniform {
                    name: reported,
                    size: declared.size as i32,
                    ty: declared.ty,
                });
                next_location += declared.size;
            }
        }
    }
}

/// A software [`ShaderDevice`] that needs no GPU.
///
/// It "compiles" by scanning the submitted text: a stage fails when it
/// contains an `#error` directive, and the active uniforms of a program are
/// its `uniform` declarations. Program binaries are the linked sources
/// tagged with [`HEADLESS_BINARY_FORMAT`]. Every accepted uniform upload and
/// texture binding is recorded for inspection.
#[derive(Debug)]
pub struct HeadlessDevice {
    caps: DriverCapabilities,
    binary_format: u32,
    fail_links: bool,
    next_id: u32,
    stages: HashMap<StageObjectId, HeadlessStage>,
    programs: HashMap<ProgramObjectId, HeadlessProgram>,
    current: Option<ProgramObjectId>,
    compile_count: usize,
    uploads: Vec<RecordedUpload>,
    texture_bindings: Vec<(u32, TextureId)>,
}

impl HeadlessDevice {
    /// Creates a driver reporting `caps`.
    pub fn new(caps: DriverCapabilities) -> Self {
        log::trace!(
            "HeadlessDevice: created for GLSL '{}'",
            caps.glsl_version_string
        );
        Self {
            caps,
            binary_format: HEADLESS_BINARY_FORMAT,
            fail_links: false,
            next_id: 1,
            stages: HashMap::new(),
            programs: HashMap::new(),
            current: None,
            compile_count: 0,
            uploads: Vec::new(),
            texture_bindings: Vec::new(),
        }
    }

    /// Uses another binary format tag, as a driver update would. Binaries
    /// written under a different tag are rejected.
    pub fn with_binary_format(mut self, format: u32) -> Self {
        self.binary_format = format;
        self
    }

    /// Makes every following link fail.
    pub fn set_fail_links(&mut self, fail: bool) {
        self.fail_links = fail;
    }

    /// Number of `compile_stage` calls so far.
    pub fn compile_count(&self) -> usize {
        self.compile_count
    }

    /// Stage objects not yet deleted.
    pub fn live_stages(&self) -> usize {
        self.stages.len()
    }

    /// Program objects not yet deleted.
    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    /// The program in use.
    pub fn current_program(&self) -> Option<ProgramObjectId> {
        self.current
    }

    /// Attribute bindings made on `program`, in call order.
    pub fn attrib_bindings(&self, program: ProgramObjectId) -> &[(u32, String)] {
        self.programs
            .get(&program)
            .map(|entry| entry.attrib_bindings.as_slice())
            .unwrap_or_default()
    }

    /// Fragment data bindings made on `program`, in call order.
    pub fn frag_data_bindings(&self, program: ProgramObjectId) -> &[(u32, String)] {
        self.programs
            .get(&program)
            .map(|entry| entry.frag_data_bindings.as_slice())
            .unwrap_or_default()
    }

    /// The source `program` was linked from for `stage`.
    pub fn linked_source(&self, program: ProgramObjectId, stage: ShaderStage) -> Option<&str> {
        self.programs
            .get(&program)?
            .linked_stages
            .iter()
            .find(|(linked, _)| *linked == stage)
            .map(|(_, text)| text.as_str())
    }

    /// The last value uploaded to uniform `name` of `program`.
    pub fn uniform_value(&self, program: ProgramObjectId, name: &str) -> Option<&UploadValue> {
        let entry = self.programs.get(&program)?;
        entry.values.get(entry.locations.get(name)?)
    }

    /// Every accepted uniform upload, in call order.
    pub fn uploads(&self) -> &[RecordedUpload] {
        &self.uploads
    }

    /// Drains the upload record.
    pub fn take_uploads(&mut self) -> Vec<RecordedUpload> {
        std::mem::take(&mut self.uploads)
    }

    /// Every texture binding, in call order.
    pub fn texture_bindings(&self) -> &[(u32, TextureId)] {
        &self.texture_bindings
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new(DriverCapabilities::default())
    }
}

impl ShaderDevice for HeadlessDevice {
    fn capabilities(&self) -> DriverCapabilities {
        self.caps.clone()
    }

    fn create_stage(&mut self, stage: ShaderStage) -> Result<StageObjectId, ShaderError> {
        let id = StageObjectId(self.allocate_id());
        self.stages.insert(
            id,
            HeadlessStage {
                stage,
                source: String::new(),
                compiled: false,
                info_log: String::new(),
            },
        );
        Ok(id)
    }

    fn compile_stage(&mut self, stage: StageObjectId, source: &str) -> bool {
        self.compile_count += 1;
        let Some(entry) = self.stages.get_mut(&stage) else {
            log::warn!("HeadlessDevice: compile of unknown stage {stage:?}");
            return false;
        };
        entry.source = source.to_string();
        match error_directive(source) {
            Some((line, message)) => {
                entry.compiled = false;
                entry.info_log = format!("ERROR: 0:{line}: '#error' : {message}");
            }
            None => {
                entry.compiled = true;
                entry.info_log.clear();
            }
        }
        log::trace!(
            "HeadlessDevice: compiled {} stage {:?}: {}",
            entry.stage,
            stage,
            entry.compiled
        );
        entry.compiled
    }

    fn stage_info_log(&self, stage: StageObjectId) -> String {
        self.stages
            .get(&stage)
            .map(|entry| entry.info_log.clone())
            .unwrap_or_default()
    }

    fn delete_stage(&mut self, stage: StageObjectId) {
        if self.stages.remove(&stage).is_some() {
            log::trace!("HeadlessDevice: deleted stage {stage:?}");
        }
    }

    fn create_program(&mut self) -> Result<ProgramObjectId, ShaderError> {
        let id = ProgramObjectId(self.allocate_id());
        self.programs.insert(id, HeadlessProgram::default());
        Ok(id)
    }

    fn delete_program(&mut self, program: ProgramObjectId) {
        if self.programs.remove(&program).is_some() {
            if self.current == Some(program) {
                self.current = None;
            }
            log::trace!("HeadlessDevice: deleted program {program:?}");
        }
    }

    fn attach_stage(&mut self, program: ProgramObjectId, stage: StageObjectId) {
        let (Some(entry), Some(stage)) = (self.programs.get_mut(&program), self.stages.get(&stage))
        else {
            log::warn!("HeadlessDevice: attach of unknown object to {program:?}");
            return;
        };
        entry
            .attached
            .push((stage.stage, stage.source.clone(), stage.compiled));
    }

    fn bind_attrib_location(&mut self, program: ProgramObjectId, location: u32, name: &str) {
        if let Some(entry) = self.programs.get_mut(&program) {
            entry.attrib_bindings.push((location, name.to_string()));
        }
    }

    fn bind_frag_data_location(&mut self, program: ProgramObjectId, location: u32, name: &str) {
        if let Some(entry) = self.programs.get_mut(&program) {
            entry.frag_data_bindings.push((location, name.to_string()));
        }
    }

    fn link_program(&mut self, program: ProgramObjectId) -> bool {
        let fail_links = self.fail_links;
        let Some(entry) = self.programs.get_mut(&program) else {
            return false;
        };

        entry.linked = false;
        entry.info_log = if fail_links {
            "error: link rejected by the headless driver".to_string()
        } else if entry.attached.is_empty() {
            "error: no shader stages attached".to_string()
        } else if entry.attached.iter().any(|(_, _, compiled)| !compiled) {
            "error: an attached stage was not compiled".to_string()
        } else {
            String::new()
        };

        if entry.info_log.is_empty() {
            entry.linked_stages = entry
                .attached
                .iter()
                .map(|(stage, source, _)| (*stage, source.clone()))
                .collect();
            entry.reflect();
            entry.linked = true;
        }
        entry.linked
    }

    fn link_status(&self, program: ProgramObjectId) -> bool {
        self.programs.get(&program).is_some_and(|entry| entry.linked)
    }

    fn program_info_log(&self, program: ProgramObjectId) -> String {
        self.programs
            .get(&program)
            .map(|entry| entry.info_log.clone())
            .unwrap_or_default()
    }

    fn program_binary(&self, program: ProgramObjectId) -> Option<ProgramBinary> {
        if !self.caps.program_binary {
            return None;
        }
        let entry = self.programs.get(&program).filter(|entry| entry.linked)?;
        Some(ProgramBinary {
            format: self.binary_format,
            payload: binary::encode(&entry.linked_stages),
        })
    }

    fn load_program_binary(&mut self, program: ProgramObjectId, binary: &ProgramBinary) -> bool {
        let expected = self.binary_format;
        let Some(entry) = self.programs.get_mut(&program) else {
            return false;
        };

        entry.linked = false;
        if binary.format != expected {
            entry.info_log = format!(
                "error: binary format {:#x} is not supported (expected {:#x})",
                binary.format, expected
            );
            return false;
        }
        let Some(stages) = binary::decode(&binary.payload) else {
            entry.info_log = "error: corrupt program binary".to_string();
            return false;
        };

        entry.info_log.clear();
        entry.linked_stages = stages;
        entry.reflect();
        entry.linked = true;
        true
    }

    fn active_uniforms(&self, program: ProgramObjectId) -> Vec<ActiveUniform> {
        self.programs
            .get(&program)
            .map(|entry| entry.uniforms.clone())
            .unwrap_or_default()
    }

    fn uniform_location(&self, program: ProgramObjectId, name: &str) -> Option<UniformLocation> {
        self.programs.get(&program)?.locations.get(name).copied()
    }

    fn use_program(&mut self, program: Option<ProgramObjectId>) {
        if let Some(id) = program {
            if !self.link_status(id) {
                log::warn!("HeadlessDevice: use of unlinked program {id:?} ignored");
                return;
            }
        }
        self.current = program;
    }

    fn set_uniform(&mut self, location: UniformLocation, upload: UniformUpload<'_>) {
        let Some(program) = self.current else {
            log::warn!("HeadlessDevice: uniform upload with no program in use");
            return;
        };
        let value = UploadValue::from(upload);
        if let Some(entry) = self.programs.get_mut(&program) {
            entry.values.insert(location, value.clone());
        }
        self.uploads.push(RecordedUpload {
            program,
            location,
            value,
        });
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureId) {
        self.texture_bindings.push((unit, texture));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: &str = "uniform mat4 mvp;\nuniform vec4 tints[2];\nvoid main() {}\n";
    const FRAGMENT: &str = "uniform sampler2D diffuseMap;\nuniform mat4 mvp;\nvoid main() {}\n";

    fn linked(device: &mut HeadlessDevice) -> ProgramObjectId {
        let program = device.create_program().expect("program");
        for (stage, text) in [
            (ShaderStage::Vertex, VERTEX),
            (ShaderStage::Fragment, FRAGMENT),
        ] {
            let id = device.create_stage(stage).expect("stage");
            assert!(device.compile_stage(id, text));
            device.attach_stage(program, id);
            device.delete_stage(id);
        }
        assert!(device.link_program(program));
        program
    }

    #[test]
    fn error_directive_fails_compilation() {
        let mut device = HeadlessDevice::default();
        let stage = device.create_stage(ShaderStage::Fragment).expect("stage");
        assert!(!device.compile_stage(stage, "void main() {}\n#error broken\n"));
        assert_eq!(device.stage_info_log(stage), "ERROR: 0:2: '#error' : broken");
    }

    #[test]
    fn uniforms_are_reflected_once_in_declaration_order() {
        let mut device = HeadlessDevice::default();
        let program = linked(&mut device);
        let names: Vec<_> = device
            .active_uniforms(program)
            .into_iter()
            .map(|uniform| (uniform.name, uniform.size))
            .collect();
        assert_eq!(
            names,
            vec![
                ("mvp".to_string(), 1),
                ("tints[0]".to_string(), 2),
                ("diffuseMap".to_string(), 1),
            ]
        );
        assert_eq!(
            device.uniform_location(program, "tints[1]"),
            Some(UniformLocation(2))
        );
        assert_eq!(
            device.uniform_location(program, "tints"),
            device.uniform_location(program, "tints[0]")
        );
    }

    #[test]
    fn link_can_be_forced_to_fail() {
        let mut device = HeadlessDevice::default();
        device.set_fail_links(true);
        let program = device.create_program().expect("program");
        assert!(!device.link_program(program));
        assert!(!device.link_status(program));
        assert!(device.program_info_log(program).starts_with("error:"));
    }

    #[test]
    fn binaries_from_another_format_are_rejected() {
        let mut device = HeadlessDevice::default();
        let program = linked(&mut device);
        let binary = device.program_binary(program).expect("binary");

        let mut updated = HeadlessDevice::default().with_binary_format(7);
        let target = updated.create_program().expect("program");
        assert!(!updated.load_program_binary(target, &binary));
        assert!(!updated.link_status(target));

        let mut same = HeadlessDevice::default();
        let target = same.create_program().expect("program");
        assert!(same.load_program_binary(target, &binary));
        assert_eq!(same.active_uniforms(target).len(), 3);
        assert_eq!(same.compile_count(), 0);
    }

    #[test]
    fn uploads_need_a_program_in_use() {
        let mut device = HeadlessDevice::default();
        let program = linked(&mut device);
        let upload = UniformUpload::Int {
            components: 1,
            data: &[3],
        };

        device.set_uniform(UniformLocation(0), upload);
        assert!(device.uploads().is_empty());

        device.use_program(Some(program));
        device.set_uniform(UniformLocation(3), upload);
        assert_eq!(
            device.uniform_value(program, "diffuseMap"),
            Some(&UploadValue::Int {
                components: 1,
                data: vec![3]
            })
        );
        assert_eq!(device.take_uploads().len(), 1);
    }
}
