//! Corridor projection - closest point on a polyline

use super::{Point, PolylinePath, LENGTH_EPSILON};

/// Closest point on a polyline, as distance plus normalized arc-length progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Euclidean distance from the query point to the polyline
    pub distance: f32,
    /// Arc-length progress (0.0 - 1.0) of the closest point
    pub progress: f32,
}

impl Projection {
    const MISS: Projection = Projection {
        distance: f32::INFINITY,
        progress: 0.0,
    };
}

impl PolylinePath {
    /// Project `point` onto this path.
    ///
    /// Each non-degenerate segment is tested with a clamped scalar projection;
    /// the first segment with the strictly smallest distance wins, so a point
    /// on a shared vertex resolves to the earlier segment. Degenerate paths
    /// project onto their anchor with progress 0.
    pub fn project(&self, point: Point) -> Projection {
        let mut best_distance_sq = f32::INFINITY;
        let mut best_length = 0.0;

        for segment in self.segments() {
            if segment.is_degenerate() {
                continue;
            }

            let dx = segment.end.x - segment.start.x;
            let dy = segment.end.y - segment.start.y;
            let px = point.x - segment.start.x;
            let py = point.y - segment.start.y;
            let t = ((px * dx + py * dy) / (segment.length * segment.length)).clamp(0.0, 1.0);

            let closest = segment.start.lerp(segment.end, t);
            let distance_sq = point.distance_squared(closest);
            if distance_sq < best_distance_sq {
                best_distance_sq = distance_sq;
                best_length = segment.cumulative_length + t * segment.length;
            }
        }

        if best_distance_sq.is_finite() {
            return Projection {
                distance: best_distance_sq.sqrt(),
                progress: self.normalize(best_length).clamp(0.0, 1.0),
            };
        }

        match self.anchor() {
            Some(anchor) => Projection {
                distance: point.distance(anchor),
                progress: 0.0,
            },
            None => Projection::MISS,
        }
    }
}

/// Find the path nearest to `point`.
///
/// Distances within `LENGTH_EPSILON` of each other count as a tie; ties go to
/// `preferred` when it is among them, otherwise to the lowest index.
pub fn nearest_stroke(
    paths: &[PolylinePath],
    point: Point,
    preferred: Option<usize>,
) -> Option<(usize, Projection)> {
    let mut best: Option<(usize, Projection)> = None;

    for (index, path) in paths.iter().enumerate() {
        let projection = path.project(point);
        if !projection.distance.is_finite() {
            continue;
        }

        best = match best {
            None => Some((index, projection)),
            Some((best_index, best_projection)) => {
                let delta = projection.distance - best_projection.distance;
                let wins_tie = delta.abs() <= LENGTH_EPSILON && preferred == Some(index);
                if delta < -LENGTH_EPSILON || wins_tie {
                    Some((index, projection))
                } else {
                    Some((best_index, best_projection))
                }
            }
        };
    }

    best
}
