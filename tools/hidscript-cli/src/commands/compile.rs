//! Compile a recording into device artifacts.

use std::path::PathBuf;

use hidscript_common::clock::RecordingClock;
use hidscript_common::config::AppConfig;
use hidscript_common::error::HidscriptError;
use hidscript_compiler::InstructionCompiler;
use hidscript_render_engine::{export_program, ExportJob, ProgramRenderer};

pub fn run(
    config: &AppConfig,
    path: PathBuf,
    output: Option<PathBuf>,
    max_step: Option<i32>,
    noise_ms: Option<u64>,
    scroll_factor: Option<i32>,
    startup_delay: Option<u64>,
) -> anyhow::Result<()> {
    let recording = super::load_recording(&path)?;

    let mut compile_settings = config.compiler.clone();
    if let Some(step) = max_step {
        compile_settings.max_step = step;
    }
    if let Some(ms) = noise_ms {
        compile_settings.noise_threshold_ms = ms;
    }
    if let Some(factor) = scroll_factor {
        compile_settings.scroll_factor = factor;
    }

    let mut render_settings = config.render.clone();
    if let Some(ms) = startup_delay {
        render_settings.startup_delay_ms = ms;
    }

    let compiler = InstructionCompiler::new(compile_settings)?;
    tracing::debug!(path = %path.display(), events = recording.timeline.len(), "Compiling recording");
    let program = compiler.compile_timeline(&recording.timeline);

    if !program.diagnostics.is_empty() {
        println!("Diagnostics:");
        for diagnostic in &program.diagnostics {
            println!("  {diagnostic}");
        }
        println!();
    }

    if program.is_empty() {
        return Err(HidscriptError::compile(format!(
            "{} produced no device instructions",
            path.display()
        ))
        .into());
    }

    let job = match output {
        Some(base) => ExportJob::new(base),
        None => ExportJob::for_recording(&path),
    }
    .with_source(recording.metadata.clone());

    let renderer = ProgramRenderer::new(render_settings);
    let report = export_program(&job, &program, &renderer)?;

    println!("Compiled {} events", recording.timeline.len());
    println!("  Instructions: {}", report.instruction_count);
    println!("  Dropped or changed: {}", report.diagnostic_count);
    println!(
        "  Replay time: {:.2}s",
        RecordingClock::ms_to_secs(program.total_delay_ms())
    );
    println!("Instructions written to: {}", report.json_path.display());
    println!("Program written to: {}", report.sketch_path.display());

    Ok(())
}
