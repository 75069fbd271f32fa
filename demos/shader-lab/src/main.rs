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

// Shader lab: runs a vertex/fragment pair through the full program pipeline
// on the headless driver and prints every intermediate result.
// Run with: cargo run -p shader-lab -- --vertex a.vert --fragment a.frag

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use glint_agents::{LinkedProgram, ProgramAgent};
use glint_core::renderer::api::{numbered_listing, DriverCapabilities, InterfaceSlot, ShaderStage};
use glint_core::GlintConfig;
use glint_infra::HeadlessDevice;

#[derive(Parser, Debug)]
#[command(name = "shader-lab", about = "Transpile and reflect a shader pair")]
struct Args {
    /// Vertex stage source.
    #[arg(long)]
    vertex: Option<PathBuf>,

    /// Fragment stage source.
    #[arg(long)]
    fragment: Option<PathBuf>,

    /// Program name, used for diagnostics and the cache file.
    #[arg(long)]
    name: Option<String>,

    /// Driver preset: gl21, gl33, gl41, gles2 or gles3. Overrides the config.
    #[arg(long)]
    preset: Option<String>,

    /// RON configuration file.
    #[arg(long, default_value = "shader-lab.ron")]
    config: PathBuf,

    /// Never read or write the binary cache.
    #[arg(long)]
    no_cache: bool,

    /// Print only the reflection summary, not the rewritten text.
    #[arg(long)]
    quiet: bool,
}

fn read_stage(path: Option<&Path>) -> Result<Option<String>> {
    path.map(|path| {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read shader '{}'", path.display()))
    })
    .transpose()
}

fn print_slots(title: &str, slots: &[InterfaceSlot]) {
    println!("{title}:");
    if slots.is_empty() {
        println!("  (none)");
    }
    for slot in slots {
        let location = slot
            .location
            .map_or_else(|| "-".to_string(), |location| location.to_string());
        println!(
            "  [{location:>2}] {} {}{}",
            slot.ty, slot.name, slot.array_suffix
        );
    }
}

fn print_reflection(program: &LinkedProgram) {
    let reflection = program.reflection();
    println!("Samplers:");
    for sampler in reflection.samplers() {
        println!("  unit {:>2}  {}", sampler.unit, sampler.name);
    }
    println!("Uniforms:");
    for (slot, uniform) in reflection.uniforms().iter().enumerate() {
        println!(
            "  slot {:>2}  {} {:?} x{} @ {}",
            slot, uniform.name, uniform.ty, uniform.count, uniform.location.0
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config: GlintConfig = glint_io::load_config(&args.config)?;
    if let Some(preset) = &args.preset {
        config.capabilities = DriverCapabilities::preset(preset)
            .with_context(|| format!("Unknown driver preset '{preset}'"))?;
    }
    if args.no_cache {
        config.cache.enabled = false;
    }

    let vertex = read_stage(args.vertex.as_deref())?;
    let fragment = read_stage(args.fragment.as_deref())?;
    if vertex.is_none() && fragment.is_none() {
        bail!("Pass at least one of --vertex or --fragment");
    }
    let name = args.name.clone().unwrap_or_else(|| {
        args.vertex
            .as_deref()
            .or(args.fragment.as_deref())
            .and_then(Path::file_stem)
            .map_or_else(|| "program".to_string(), |stem| stem.to_string_lossy().into_owned())
    });

    log::info!(
        "shader-lab: building '{}' for GLSL '{}'",
        name,
        config.capabilities.glsl_version_string
    );

    let device = HeadlessDevice::new(config.capabilities.clone());
    let mut agent = ProgramAgent::new(device, config.cache.clone());

    let handle = agent
        .create_program(&name, vertex.as_deref(), fragment.as_deref())
        .with_context(|| format!("Failed to build program '{name}'"))?;
    let program = agent
        .program(handle)
        .context("Program vanished right after creation")?;

    if !args.quiet {
        for stage in [ShaderStage::Vertex, ShaderStage::Fragment] {
            if let Some(text) = agent.device().linked_source(program.object(), stage) {
                println!("===== {stage} stage =====");
                print!("{}", numbered_listing(text));
            }
        }
    }
    print_slots("Vertex inputs", &program.interface().vertex_inputs);
    print_slots("Fragment outputs", &program.interface().fragment_outputs);
    for diagnostic in program.diagnostics() {
        println!(
            "warning: {} line {}: {}",
            diagnostic.stage, diagnostic.line, diagnostic.message
        );
    }

    println!(
        "Program {} ({})",
        handle,
        if program.from_cache() { "restored from cache" } else { "compiled" }
    );
    print_reflection(program);
    println!("{}", agent.stats());
    Ok(())
}
