//! Show recording information.

use std::collections::BTreeMap;
use std::path::PathBuf;

use hidscript_common::clock::RecordingClock;


pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let recording = super::load_recording(&path)?;
    let m = &recording.metadata;

    println!("Recording: {}", path.display());
    println!("  Created: {}", m.created);
    println!("  Format: {}", m.format_version);
    println!("  Target: {}", m.target);
    if !m.platform.is_empty() {
        println!("  Platform: {}", m.platform);
    }
    println!("  Screen: {}x{}", m.screen_width, m.screen_height);
    println!("  Duration: {:.2}s", RecordingClock::ms_to_secs(m.duration_ms));
    println!();

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for event in &recording.timeline {
        *counts.entry(event.kind.label()).or_default() += 1;
    }

    println!("Events: {}", m.total_events);
    println!("  Input: {}", recording.timeline.input_event_count());
    for (label, count) in counts {
        println!("  {label}: {count}");
    }

    Ok(())
}
