//! Gap filling between consecutive ink samples

use super::InkSample;

/// Samples to evaluate when moving from `prev` to `next`.
///
/// When both belong to the same ink stroke and are farther apart than `step`
/// but no farther than `max_gap`, the jump is linearly subdivided so no two
/// emitted samples are more than `step` apart. Otherwise only `next` is
/// emitted: pen lifts and large jumps are never bridged. The last item is
/// always `next` itself.
pub fn gap_fill(
    prev: Option<&InkSample>,
    next: InkSample,
    step: f32,
    max_gap: f32,
) -> impl Iterator<Item = InkSample> {
    let (from, steps) = match prev {
        Some(p) if p.stroke == next.stroke && step > 0.0 => {
            let dist = p.point().distance(next.point());
            if dist > step && dist <= max_gap {
                (*p, (dist / step).ceil() as usize)
            } else {
                (*p, 1)
            }
        }
        _ => (next, 1),
    };

    (1..=steps).map(move |i| {
        if i == steps {
            return next;
        }
        let t = i as f32 / steps as f32;
        let point = from.point().lerp(next.point(), t);
        let elapsed = next.timestamp_ms.saturating_sub(from.timestamp_ms);
        InkSample {
            x: point.x,
            y: point.y,
            timestamp_ms: from.timestamp_ms + (elapsed as f32 * t) as u64,
            stroke: next.stroke,
        }
    })
}

/// Apply [`gap_fill`] across a whole ordered stream
pub fn fill_gaps(samples: &[InkSample], step: f32, max_gap: f32) -> Vec<InkSample> {
    let mut result = Vec::with_capacity(samples.len() * 2);
    let mut prev: Option<InkSample> = None;

    for sample in samples {
        result.extend(gap_fill(prev.as_ref(), *sample, step, max_gap));
        prev = Some(*sample);
    }

    result
}
