//! Linux pointer capture through `/dev/input/mice`.

use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::Read;
use std::os::unix::fs::MetadataExt;
use std::os::unix::fs::OpenOptionsExt;

use hidscript_common::clock::RecordingClock;
use hidscript_common::config::RecorderSettings;
use hidscript_common::error::{HidscriptError, HidscriptResult};
use hidscript_recording_model::event::MouseButton;

use crate::raw::RawInputEvent;
use crate::InputBackend;

const MICE_DEVICE: &str = "/dev/input/mice";

const LEFT_BUTTON: usize = 0;
const RIGHT_BUTTON: usize = 1;
const MIDDLE_BUTTON: usize = 2;

/// Reads 3-byte PS/2 packets from the multiplexed mice device and
/// integrates them into an absolute pixel position.
///
/// The kernel device carries no keyboard data, so keyboard capture (and
/// with it the hotkeys) is unavailable through this backend.
pub struct MiceBackend {
    device: std::fs::File,
    clock: RecordingClock,
    pending: VecDeque<RawInputEvent>,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    button_state: [bool; 3],
}

impl MiceBackend {
    /// Open the device. The pointer starts at the screen center.
    pub fn new(screen_width: u32, screen_height: u32) -> HidscriptResult<Self> {
        let device = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(MICE_DEVICE)
            .map_err(|e| {
                HidscriptError::input_tracking(format!("Failed to open {MICE_DEVICE}: {e}"))
            })?;

        let width = screen_width.max(1) as i32;
        let height = screen_height.max(1) as i32;

        let clock = RecordingClock::start();
        tracing::info!(
            device = MICE_DEVICE,
            epoch = clock.epoch_wall(),
            "Pointer capture opened"
        );

        Ok(Self {
            device,
            clock,
            pending: VecDeque::new(),
            x: width / 2,
            y: height / 2,
            width,
            height,
            button_state: [false, false, false],
        })
    }

    pub fn is_supported() -> bool {
        OpenOptions::new().read(true).open(MICE_DEVICE).is_ok()
    }

    fn ingest_packets(&mut self) -> HidscriptResult<()> {
        loop {
            let mut packet = [0u8; 3];
            match self.device.read(&mut packet) {
                Ok(3) => self.process_packet(packet),
                Ok(_) => break,
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(err) => {
                    return Err(HidscriptError::input_tracking(format!(
                        "Failed reading {MICE_DEVICE}: {err}"
                    )));
                }
            }
        }
        Ok(())
    }

    fn process_packet(&mut self, packet: [u8; 3]) {
        let at_ms = self.clock.now_ms();
        let dx = packet[1] as i8 as i32;
        let dy = packet[2] as i8 as i32;

        if dx != 0 || dy != 0 {
            self.x = (self.x + dx).clamp(0, self.width - 1);
            // device y grows upward
            self.y = (self.y - dy).clamp(0, self.height - 1);
            self.pending
                .push_back(RawInputEvent::pointer_move(at_ms, self.x, self.y));
        }

        let left = packet[0] & 0b001 != 0;
        let right = packet[0] & 0b010 != 0;
        let middle = packet[0] & 0b100 != 0;

        self.push_button_transition(at_ms, LEFT_BUTTON, left, MouseButton::Left);
        self.push_button_transition(at_ms, RIGHT_BUTTON, right, MouseButton::Right);
        self.push_button_transition(at_ms, MIDDLE_BUTTON, middle, MouseButton::Middle);
    }

    fn push_button_transition(&mut self, at_ms: u64, idx: usize, now: bool, button: MouseButton) {
        if self.button_state[idx] == now {
            return;
        }
        self.button_state[idx] = now;
        let event = if now {
            RawInputEvent::pointer_down(at_ms, button, self.x, self.y)
        } else {
            RawInputEvent::pointer_up(at_ms, button, self.x, self.y)
        };
        self.pending.push_back(event);
    }
}

impl InputBackend for MiceBackend {
    fn poll(&mut self) -> HidscriptResult<Option<RawInputEvent>> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }

        self.ingest_packets()?;
        Ok(self.pending.pop_front())
    }

    fn name(&self) -> &str {
        "mice"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}

/// Detect the best available input backend for the current system.
pub fn detect_best_backend(settings: &RecorderSettings) -> Box<dyn InputBackend> {
    if MiceBackend::is_supported() {
        match MiceBackend::new(settings.screen_width, settings.screen_height) {
            Ok(backend) => {
                tracing::info!("Using mice pointer backend");
                return Box::new(backend);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to initialize mice backend, using stub");
            }
        }
    }

    tracing::warn!(
        details = %mice_device_diagnostic(),
        "Using stub input backend; pointer and click events will not be captured"
    );
    super::stub_for(settings)
}

fn mice_device_diagnostic() -> String {
    // SAFETY: geteuid/getegid have no preconditions and cannot fail.
    let uid = unsafe { libc::geteuid() };
    let gid = unsafe { libc::getegid() };

    match std::fs::metadata(MICE_DEVICE) {
        Ok(meta) => format!(
            "device={MICE_DEVICE} mode={:o} owner_uid={} owner_gid={} process_uid={uid} process_gid={gid}; likely missing 'input' group membership",
            meta.mode() & 0o777,
            meta.uid(),
            meta.gid()
        ),
        Err(err) => format!("device={MICE_DEVICE} unavailable ({err})"),
    }
}
