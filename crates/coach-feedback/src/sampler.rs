//! Deterministic frame selection.

use coach_models::{Frame, FrameDetail, SampledFrame};

/// Pick at most `max_frames` items spread evenly over the whole clip.
///
/// Inputs no longer than `max_frames` are returned unchanged. Otherwise the
/// i-th pick is `items[min(floor(i * len / max_frames), len - 1)]`. Callers
/// clamp `max_frames` to at least 1; zero yields an empty selection.
pub fn select<T>(items: &[T], max_frames: usize) -> Vec<&T> {
    if items.is_empty() || max_frames == 0 {
        return Vec::new();
    }
    if items.len() <= max_frames {
        return items.iter().collect();
    }

    let len = items.len();
    let step = len as f64 / max_frames as f64;
    (0..max_frames)
        .map(|i| {
            let index = ((i as f64 * step).floor() as usize).min(len - 1);
            &items[index]
        })
        .collect()
}

/// Tag the first selected frame for high detail and the rest for low.
pub fn with_detail<'a>(frames: &[&'a Frame]) -> Vec<SampledFrame<'a>> {
    frames
        .iter()
        .enumerate()
        .map(|(i, &frame)| SampledFrame {
            frame,
            detail: if i == 0 {
                FrameDetail::High
            } else {
                FrameDetail::Low
            },
        })
        .collect()
}
