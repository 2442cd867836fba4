//! Record a session.

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use hidscript_common::clock::RecordingClock;
use hidscript_common::config::AppConfig;
use hidscript_input_tracker::backends::{detect_best_backend, ScriptedBackend};
use hidscript_input_tracker::{InputBackend, InputTracker, SharedRecorder, TimelineRecorder};
use hidscript_recording_model::recording::Recording;

pub struct RecordArgs {
    pub raw: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub min_move: Option<u32>,
    pub move_interval: Option<u64>,
    pub no_moves: bool,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

pub async fn run(config: &AppConfig, args: RecordArgs) -> anyhow::Result<()> {
    let mut settings = config.recorder.clone();
    if let Some(px) = args.min_move {
        settings.set_min_move_px(px)?;
    }
    if let Some(ms) = args.move_interval {
        settings.set_move_interval_ms(ms)?;
    }
    if args.no_moves {
        settings.record_moves = false;
    }
    if let Some(width) = args.width {
        settings.screen_width = width;
    }
    if let Some(height) = args.height {
        settings.screen_height = height;
    }

    let output = args.output.unwrap_or_else(|| {
        config.recordings_dir.join(format!(
            "recording_{}.json",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        ))
    });

    let live = args.raw.is_none();
    let backend: Box<dyn InputBackend> = match &args.raw {
        Some(path) => Box::new(ScriptedBackend::from_file(path)?),
        None => detect_best_backend(&settings),
    };

    println!("Recording session");
    println!("  Backend: {}", backend.name());
    println!("  Screen: {}x{}", settings.screen_width, settings.screen_height);
    println!(
        "  Moves: {} (min {}px, every {}ms)",
        if settings.record_moves { "on" } else { "off" },
        settings.min_move_px(),
        settings.move_interval_ms()
    );
    if let Some(key) = &settings.pause_hotkey {
        println!("  Pause/resume: {key}");
    }
    if let Some(key) = &settings.stop_hotkey {
        println!("  Stop: {key}");
    }
    println!();

    let fallback_screen = (settings.screen_width, settings.screen_height);
    let recorder = SharedRecorder::new(TimelineRecorder::new(settings));
    let mut tracker = InputTracker::new(backend, recorder);

    if live {
        let stop_flag = tracker.stop_flag();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                stop_flag.store(true, Ordering::SeqCst);
            }
        });
        println!("Press Ctrl+C to stop recording...");
        println!();
    }

    let report = tracker.run().await?;
    let timeline = report
        .timeline
        .ok_or_else(|| anyhow::anyhow!("Recorder did not produce a timeline"))?;

    let recording = Recording::from_timeline(timeline, fallback_screen);
    super::save_recording(&recording, &output)?;

    tracing::info!(
        path = %output.display(),
        events = recording.metadata.total_events,
        reason = ?report.reason,
        "Recording saved"
    );

    println!("Stopped ({:?})", report.reason);
    println!(
        "  Events: {} ({} input)",
        recording.metadata.total_events,
        recording.timeline.input_event_count()
    );
    println!(
        "  Duration: {:.2}s",
        RecordingClock::ms_to_secs(recording.metadata.duration_ms)
    );
    println!("Recording saved to: {}", output.display());

    Ok(())
}
