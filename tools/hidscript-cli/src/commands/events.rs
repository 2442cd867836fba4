//! List the events of a recording.

use std::path::PathBuf;

use hidscript_recording_model::event::{CanonicalEvent, EventKind};

pub fn run(path: PathBuf, sample: usize) -> anyhow::Result<()> {
    let recording = super::load_recording(&path)?;
    let events = recording.timeline.events();

    println!("{} events in {}", events.len(), path.display());
    println!();

    let sample = sample.max(1);
    if events.len() <= sample * 2 {
        for event in events {
            println!("{}", format_event(event));
        }
    } else {
        for event in &events[..sample] {
            println!("{}", format_event(event));
        }
        println!("  ... ({} events omitted) ...", events.len() - sample * 2);
        for event in &events[events.len() - sample..] {
            println!("{}", format_event(event));
        }
    }

    Ok(())
}

fn format_event(event: &CanonicalEvent) -> String {
    let detail = match &event.kind {
        EventKind::Start {
            wall_clock,
            screen_width,
            screen_height,
        } => format!("{wall_clock} ({screen_width}x{screen_height})"),
        EventKind::Stop { duration_ms } => format!("after {duration_ms}ms"),
        EventKind::Pause | EventKind::Resume => String::new(),
        EventKind::Key { key, .. } => key.to_string(),
        EventKind::Button { button, x, y, .. } => format!("{button:?} at ({x}, {y})"),
        EventKind::Move { x, y, dx, dy, .. } => format!("to ({x}, {y}) by ({dx:+}, {dy:+})"),
        EventKind::Scroll { dx, dy, .. } => format!("({dx}, {dy})"),
    };
    format!(
        "  [{:>9.3}s] +{:<6} {:<12} {}",
        event.elapsed_secs(),
        format!("{}ms", event.delay_ms),
        event.kind.label(),
        detail
    )
    .trim_end()
    .to_string()
}
