//! Bounded-range motion decomposition.
//!
//! A HID mouse report carries at most ±127 per axis, so larger relative
//! moves are split into several reports whose components sum back to the
//! original displacement.

use hidscript_common::config::DEVICE_MAX_STEP;

/// Split `(dx, dy)` into steps whose components lie in `[-max_step, max_step]`.
///
/// Each axis is split greedily (300 → 127, 127, 46); the two axes are
/// paired positionally and the shorter one is padded with zeros. A zero
/// displacement yields no steps. `max_step` is clamped to `1..=127`.
pub fn decompose(dx: i32, dy: i32, max_step: i32) -> Vec<(i32, i32)> {
    let max_step = max_step.clamp(1, DEVICE_MAX_STEP);
    let xs = split_axis(dx, max_step);
    let ys = split_axis(dy, max_step);

    let len = xs.len().max(ys.len());
    (0..len)
        .map(|i| {
            (
                xs.get(i).copied().unwrap_or(0),
                ys.get(i).copied().unwrap_or(0),
            )
        })
        .collect()
}

fn split_axis(value: i32, max_step: i32) -> Vec<i32> {
    let sign = value.signum();
    let mut remaining = value.unsigned_abs();
    let step = max_step as u32;

    let mut steps = Vec::with_capacity((remaining / step + 1) as usize);
    while remaining > 0 {
        let chunk = remaining.min(step);
        steps.push(sign * chunk as i32);
        remaining -= chunk;
    }
    steps
}
