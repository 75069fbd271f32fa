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

//! The program agent: owner of every linked program.

use glint_core::renderer::api::{
    BuiltInConstant, BuiltInSampler, BuiltInSlots, ConstantData, ConstantSlot, ProgramHandle,
    ProgramInterface, ProgramObjectId, TextureId,
};
use glint_core::renderer::{ProgramError, ShaderDevice, ShaderError};
use glint_core::ProgramCacheSettings;
use glint_io::{program_key, ProgramCache};
use glint_lanes::{DeclarationDiagnostic, DialectRewriter, RewrittenProgram};

use super::compiler::compile_and_link;
use super::constants;
use super::reflection::ReflectionTable;
use super::stats::ProgramStats;
use super::store::ProgramStore;

/// A linked program and everything resolved about it at creation.
#[derive(Debug, Clone)]
pub struct LinkedProgram {
    // Diagnostic and cache name.
    name: String,
    // Driver program object.
    object: ProgramObjectId,
    // Interface lists recorded by the rewriter.
    interface: ProgramInterface,
    // Recovered declaration problems, vertex stage first.
    diagnostics: Vec<DeclarationDiagnostic>,
    reflection: ReflectionTable,
    builtins: BuiltInSlots,
    // Whether the driver accepted a cached binary.
    from_cache: bool,
}

impl LinkedProgram {
    /// The name the program was created with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The driver program object.
    pub fn object(&self) -> ProgramObjectId {
        self.object
    }

    /// Vertex inputs and fragment outputs, in declaration order.
    pub fn interface(&self) -> &ProgramInterface {
        &self.interface
    }

    /// Declaration problems the rewriter recovered from, in source order per
    /// stage.
    pub fn diagnostics(&self) -> &[DeclarationDiagnostic] {
        &self.diagnostics
    }

    /// The sorted sampler and uniform tables.
    pub fn reflection(&self) -> &ReflectionTable {
        &self.reflection
    }

    /// Slots of the engine built-ins.
    pub fn builtins(&self) -> &BuiltInSlots {
        &self.builtins
    }

    /// `true` if the program was restored from the binary cache.
    pub fn from_cache(&self) -> bool {
        self.from_cache
    }
}

/// Creates, binds and deletes programs, and routes constant updates to the
/// bound one.
///
/// All calls must come from the thread that owns the device.
#[derive(Debug)]
pub struct ProgramAgent<D: ShaderDevice> {
    device: D,
    rewriter: DialectRewriter,
    // `None` when caching is disabled or the driver cannot export binaries.
    cache: Option<ProgramCache>,
    programs: ProgramStore<LinkedProgram>,
    bound: Option<ProgramHandle>,
    stats: ProgramStats,
}

impl<D: ShaderDevice> ProgramAgent<D> {
    /// Creates an agent over `device`, targeting the dialect the device reports.
    pub fn new(device: D, cache: ProgramCacheSettings) -> Self {
        let caps = device.capabilities();
        let cache = if cache.enabled && caps.program_binary {
            Some(ProgramCache::new(cache))
        } else {
            log::debug!("ProgramAgent: binary cache disabled");
            None
        };
        Self {
            device,
            rewriter: DialectRewriter::new(caps),
            cache,
            programs: ProgramStore::new(),
            bound: None,
            stats: ProgramStats::default(),
        }
    }

    /// The underlying device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Mutable access to the underlying device.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// The rewriter configured for the device's dialect.
    pub fn rewriter(&self) -> &DialectRewriter {
        &self.rewriter
    }

    /// The binary cache, if enabled.
    pub fn cache(&self) -> Option<&ProgramCache> {
        self.cache.as_ref()
    }

    /// Rewrites, compiles (or restores from cache), links and reflects a
    /// program.
    ///
    /// ## Arguments
    /// * `name` - Diagnostic name, also the cache file name.
    /// * `vertex` - Vertex stage text. Empty text counts as absent.
    /// * `fragment` - Fragment stage text. Empty text counts as absent.
    ///
    /// ## Returns
    /// The handle of the new program. The previously bound program stays bound.
    ///
    /// ## Errors
    /// * `ProgramError::Shader` - Both stages are absent, a stage failed to
    ///   compile, the link failed, or the driver could not allocate objects.
    pub fn create_program(
        &mut self,
        name: &str,
        vertex: Option<&str>,
        fragment: Option<&str>,
    ) -> Result<ProgramHandle, ProgramError> {
        let vertex = vertex.filter(|text| !text.trim().is_empty());
        let fragment = fragment.filter(|text| !text.trim().is_empty());
        if vertex.is_none() && fragment.is_none() {
            return Err(ShaderError::EmptySource {
                name: name.to_string(),
            }
            .into());
        }

        let rewritten = self.rewriter.rewrite_program(name, vertex, fragment);
        let key = program_key(
            rewritten.vertex.as_ref().map(|source| source.text.as_str()),
            rewritten.fragment.as_ref().map(|source| source.text.as_str()),
        );

        let object = self.device.create_program()?;
        let from_cache = self.restore_cached(name, key, object);
        if from_cache {
            self.stats.cache_hits += 1;
        } else {
            self.stats.cache_misses += 1;
            self.compile_fresh(name, &rewritten, object)?;
            self.store_cached(name, key, object);
        }

        let reflection = ReflectionTable::build(&mut self.device, object);
        let previous = self.bound_object();
        self.device.use_program(previous);

        let builtins = BuiltInSlots::resolve(
            |name| reflection.find_uniform(name),
            |name| reflection.sampler_unit(name),
        );
        let handle = self.programs.insert(LinkedProgram {
            name: name.to_string(),
            object,
            interface: rewritten.interface,
            diagnostics: rewritten.diagnostics,
            reflection,
            builtins,
            from_cache,
        });

        self.stats.programs_created += 1;
        self.stats.programs_live = self.programs.live() as u64;
        log::debug!(
            "ProgramAgent: created '{}' as {} ({})",
            name,
            handle,
            if from_cache { "cached" } else { "compiled" }
        );
        Ok(handle)
    }

    fn compile_fresh(
        &mut self,
        name: &str,
        rewritten: &RewrittenProgram,
        object: ProgramObjectId,
    ) -> Result<(), ShaderError> {
        let caps = self.rewriter.capabilities();
        if let Err(err) = compile_and_link(&mut self.device, caps, name, rewritten, object) {
            match err {
                ShaderError::CompilationFailed { .. } => self.stats.compile_failures += 1,
                ShaderError::LinkFailed { .. } => self.stats.link_failures += 1,
                _ => {}
            }
            self.device.delete_program(object);
            return Err(err);
        }
        Ok(())
    }

    /// Loads a cached binary into `object`. Any failure is a miss.
    fn restore_cached(&mut self, name: &str, key: u32, object: ProgramObjectId) -> bool {
        let Some(cache) = &self.cache else {
            return false;
        };
        let binary = match cache.load(name, key) {
            Ok(Some(binary)) => binary,
            Ok(None) => {
                log::debug!("ProgramAgent: no cached binary for '{name}'");
                return false;
            }
            Err(err) => {
                log::debug!("ProgramAgent: cache miss for '{name}': {err}");
                return false;
            }
        };

        if self.device.load_program_binary(object, &binary) && self.device.link_status(object) {
            log::debug!("ProgramAgent: restored '{name}' from the binary cache");
            true
        } else {
            log::debug!("ProgramAgent: driver rejected the cached binary of '{name}'");
            false
        }
    }

    fn store_cached(&self, name: &str, key: u32, object: ProgramObjectId) {
        let Some(cache) = &self.cache else {
            return;
        };
        let Some(binary) = self.device.program_binary(object) else {
            log::debug!("ProgramAgent: driver returned no binary for '{name}'");
            return;
        };
        if let Err(err) = cache.store(name, key, &binary) {
            log::warn!("ProgramAgent: failed to cache '{name}': {err}");
        }
    }

    /// Releases a program. Deleting the bound program unbinds it first.
    ///
    /// ## Errors
    /// * `ProgramError::InvalidHandle` - The handle is stale.
    pub fn delete_program(&mut self, handle: ProgramHandle) -> Result<(), ProgramError> {
        if self.bound == Some(handle) {
            self.bind_program(None)?;
        }
        let program = self
            .programs
            .remove(handle)
            .ok_or(ProgramError::InvalidHandle(handle))?;
        self.device.delete_program(program.object);

        self.stats.programs_live = self.programs.live() as u64;
        log::debug!("ProgramAgent: deleted '{}' ({})", program.name, handle);
        Ok(())
    }

    /// Makes `handle` the current program, or unbinds with `None`. Binding
    /// the already bound program does nothing.
    ///
    /// ## Errors
    /// * `ProgramError::InvalidHandle` - The handle is stale.
    pub fn bind_program(&mut self, handle: Option<ProgramHandle>) -> Result<(), ProgramError> {
        if self.bound == handle {
            return Ok(());
        }
        let object = match handle {
            Some(handle) => Some(
                self.programs
                    .get(handle)
                    .ok_or(ProgramError::InvalidHandle(handle))?
                    .object,
            ),
            None => None,
        };
        self.device.use_program(object);
        self.bound = handle;
        Ok(())
    }

    /// The currently bound program.
    pub fn bound_program(&self) -> Option<ProgramHandle> {
        self.bound
    }

    fn bound_object(&self) -> Option<ProgramObjectId> {
        self.bound
            .and_then(|handle| self.programs.get(handle))
            .map(|program| program.object)
    }

    /// The program behind `handle`, or `None` if it was deleted.
    pub fn program(&self, handle: ProgramHandle) -> Option<&LinkedProgram> {
        self.programs.get(handle)
    }

    /// Handles of all live programs.
    pub fn programs(&self) -> impl Iterator<Item = ProgramHandle> + '_ {
        self.programs.handles()
    }

    /// Slot of the uniform `name` in program `handle`.
    pub fn resolve_constant(&self, handle: ProgramHandle, name: &str) -> Option<ConstantSlot> {
        self.programs.get(handle)?.reflection.find_uniform(name)
    }

    /// Texture unit of the sampler `name` in program `handle`.
    pub fn resolve_sampler_unit(&self, handle: ProgramHandle, name: &str) -> Option<u32> {
        self.programs.get(handle)?.reflection.sampler_unit(name)
    }

    /// Slot of a built-in constant; [`ConstantSlot::NONE`] when the program
    /// does not declare it or the handle is stale.
    pub fn builtin_constant(&self, handle: ProgramHandle, builtin: BuiltInConstant) -> ConstantSlot {
        self.programs
            .get(handle)
            .map_or(ConstantSlot::NONE, |program| program.builtins.constant(builtin))
    }

    /// Texture unit of a built-in sampler.
    pub fn builtin_sampler_unit(
        &self,
        handle: ProgramHandle,
        builtin: BuiltInSampler,
    ) -> Option<u32> {
        self.programs.get(handle)?.builtins.sampler_unit(builtin)
    }

    /// Uploads `count` elements of `data` to `slot` of the bound program.
    ///
    /// The upload call is chosen by the reflected type of the slot. Negative
    /// slots, and calls with no bound program, do nothing.
    ///
    /// ## Arguments
    /// * `slot` - A slot resolved against the bound program.
    /// * `data` - At least `count` elements of packed scalars.
    /// * `count` - Number of array elements.
    /// * `row_major` - Whether matrix data must be transposed.
    pub fn set_constant(
        &mut self,
        slot: ConstantSlot,
        data: ConstantData<'_>,
        count: usize,
        row_major: bool,
    ) {
        if !slot.is_valid() {
            return;
        }
        let Some(program) = self.bound.and_then(|handle| self.programs.get(handle)) else {
            log::trace!("ProgramAgent: constant set with no program bound");
            return;
        };
        let Some(uniform) = program.reflection.uniform(slot) else {
            log::warn!(
                "ProgramAgent: slot {} is out of range for '{}'",
                slot.0,
                program.name
            );
            return;
        };
        constants::dispatch(&mut self.device, uniform, data, count, row_major);
    }

    /// Resolves `name` against the bound program and uploads `data`, as many
    /// elements as it covers.
    ///
    /// ## Returns
    /// `false` if no program is bound or it has no such uniform.
    pub fn set_constant_by_name(&mut self, name: &str, data: ConstantData<'_>) -> bool {
        let Some(program) = self.bound.and_then(|handle| self.programs.get(handle)) else {
            return false;
        };
        let Some(slot) = program.reflection.find_uniform(name) else {
            return false;
        };
        let Some(count) = program
            .reflection
            .uniform(slot)
            .and_then(|uniform| constants::elements_in(uniform, data.len()))
        else {
            return false;
        };
        self.set_constant(slot, data, count, false);
        true
    }

    /// Sets an `int` constant.
    pub fn set_constant_1i(&mut self, slot: ConstantSlot, value: i32) {
        self.set_constant(slot, ConstantData::Ints(&[value]), 1, false);
    }

    /// Sets an `ivec2` constant.
    pub fn set_constant_2i(&mut self, slot: ConstantSlot, value: [i32; 2]) {
        self.set_constant(slot, ConstantData::Ints(&value), 1, false);
    }

    /// Sets an `ivec3` constant.
    pub fn set_constant_3i(&mut self, slot: ConstantSlot, value: [i32; 3]) {
        self.set_constant(slot, ConstantData::Ints(&value), 1, false);
    }

    /// Sets an `ivec4` constant.
    pub fn set_constant_4i(&mut self, slot: ConstantSlot, value: [i32; 4]) {
        self.set_constant(slot, ConstantData::Ints(&value), 1, false);
    }

    /// Sets a `float` constant.
    pub fn set_constant_1f(&mut self, slot: ConstantSlot, value: f32) {
        self.set_constant(slot, ConstantData::Floats(&[value]), 1, false);
    }

    /// Sets a `vec2` constant.
    pub fn set_constant_2f(&mut self, slot: ConstantSlot, value: [f32; 2]) {
        self.set_constant(slot, ConstantData::Floats(&value), 1, false);
    }

    /// Sets a `vec3` constant.
    pub fn set_constant_3f(&mut self, slot: ConstantSlot, value: [f32; 3]) {
        self.set_constant(slot, ConstantData::Floats(&value), 1, false);
    }

    /// Sets a `vec4` constant.
    pub fn set_constant_4f(&mut self, slot: ConstantSlot, value: [f32; 4]) {
        self.set_constant(slot, ConstantData::Floats(&value), 1, false);
    }

    /// Sets a `mat2` constant.
    pub fn set_constant_2x2f(&mut self, slot: ConstantSlot, row_major: bool, value: &[f32; 4]) {
        self.set_constant(slot, ConstantData::Floats(value), 1, row_major);
    }

    /// Sets a `mat3` constant.
    pub fn set_constant_3x3f(&mut self, slot: ConstantSlot, row_major: bool, value: &[f32; 9]) {
        self.set_constant(slot, ConstantData::Floats(value), 1, row_major);
    }

    /// Sets a `mat4` constant.
    pub fn set_constant_4x4f(&mut self, slot: ConstantSlot, row_major: bool, value: &[f32; 16]) {
        self.set_constant(slot, ConstantData::Floats(value), 1, row_major);
    }

    /// Sets `count` elements of an integer array constant.
    pub fn set_constant_array_i(&mut self, slot: ConstantSlot, count: usize, values: &[i32]) {
        self.set_constant(slot, ConstantData::Ints(values), count, false);
    }

    /// Sets `count` elements of a float or vector array constant.
    pub fn set_constant_array_f(&mut self, slot: ConstantSlot, count: usize, values: &[f32]) {
        self.set_constant(slot, ConstantData::Floats(values), count, false);
    }

    /// Sets `count` elements of a matrix array constant.
    pub fn set_constant_array_matrix(
        &mut self,
        slot: ConstantSlot,
        row_major: bool,
        count: usize,
        values: &[f32],
    ) {
        self.set_constant(slot, ConstantData::Floats(values), count, row_major);
    }

    /// Binds `texture` to texture `unit`.
    pub fn bind_texture(&mut self, unit: u32, texture: TextureId) {
        self.device.bind_texture(unit, texture);
    }

    /// The agent's running counters.
    pub fn stats(&self) -> ProgramStats {
        self.stats
    }

    /// Deletes every live program.
    pub fn clear(&mut self) {
        let handles: Vec<ProgramHandle> = self.programs.handles().collect();
        for handle in handles {
            if let Err(err) = self.delete_program(handle) {
                log::warn!("ProgramAgent: {err}");
            }
        }
    }
}
