//! Trajectory playback interpolation.
//!
//! Maps wall-clock progress onto a position along a fixed sequence of
//! timed samples. Both the main rocket and the minimap marker query the
//! same state here, which keeps them in visual lockstep.

use nalgebra::Vector3;

/// One timestamped position in a simulation result, plus whatever
/// telemetry the backend attached to it.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectorySample {
    pub time: f64,
    pub position: Vector3<f64>,
    pub speed: Option<f64>,
    pub fuel: Option<f64>,
    pub altitude: Option<f64>,
}

impl TrajectorySample {
    pub fn new(time: f64, position: Vector3<f64>) -> Self {
        Self {
            time,
            position,
            speed: None,
            fuel: None,
            altitude: None,
        }
    }
}

/// Normalized playback progress in [0, 1]. A non-positive duration is
/// degenerate and reports completion immediately.
pub fn progress(start: f64, duration: f64, now: f64) -> f64 {
    if duration <= 0.0 {
        return 1.0;
    }
    ((now - start) / duration).clamp(0.0, 1.0)
}

/// Maps progress to a fractional index into a sample sequence of `len`
/// points: the bracketing indices and the fraction between them.
pub fn segment(t: f64, len: usize) -> (usize, usize, f64) {
    if len < 2 {
        return (0, 0, 0.0);
    }
    let idx_float = t * (len - 1) as f64;
    let idx = (idx_float.floor() as usize).min(len - 1);
    let next = (idx + 1).min(len - 1);
    (idx, next, idx_float - idx as f64)
}

/// Interpolated position along `samples` at wall-clock `now`.
///
/// Exact at the endpoints: returns `samples[0]` at `now == start` and
/// `samples[last]` for any `now >= start + duration`. A single-sample
/// sequence is a static pose; an empty one has no position at all.
pub fn position_at(
    samples: &[TrajectorySample],
    start: f64,
    duration: f64,
    now: f64,
) -> Option<Vector3<f64>> {
    let first = samples.first()?;
    if samples.len() == 1 {
        return Some(first.position);
    }
    let t = progress(start, duration, now);
    let (idx, next, frac) = segment(t, samples.len());
    let a = samples[idx].position;
    let b = samples[next].position;
    Some(a + (b - a) * frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_samples(positions: &[(f64, f64, f64)]) -> Vec<TrajectorySample> {
        positions
            .iter()
            .enumerate()
            .map(|(i, &(x, y, z))| TrajectorySample::new(i as f64, Vector3::new(x, y, z)))
            .collect()
    }

    #[test]
    fn exact_at_endpoints() {
        let samples = line_samples(&[(0.0, 0.0, 0.0), (3.0, 1.0, -2.0), (7.0, 7.0, 7.0)]);
        assert_eq!(
            position_at(&samples, 10.0, 4.0, 10.0),
            Some(Vector3::new(0.0, 0.0, 0.0))
        );
        assert_eq!(
            position_at(&samples, 10.0, 4.0, 14.0),
            Some(Vector3::new(7.0, 7.0, 7.0))
        );
    }

    #[test]
    fn clamps_past_the_end() {
        let samples = line_samples(&[(0.0, 0.0, 0.0), (2.0, 2.0, 2.0)]);
        assert_eq!(
            position_at(&samples, 0.0, 1.0, 100.0),
            Some(Vector3::new(2.0, 2.0, 2.0))
        );
        assert_eq!(
            position_at(&samples, 5.0, 1.0, 0.0),
            Some(Vector3::new(0.0, 0.0, 0.0))
        );
    }

    #[test]
    fn midpoint_of_two_samples() {
        let samples = line_samples(&[(0.0, 0.0, 0.0), (0.0, 10.0, 0.0)]);
        assert_eq!(
            position_at(&samples, 0.0, 1.0, 0.5),
            Some(Vector3::new(0.0, 5.0, 0.0))
        );
    }

    #[test]
    fn single_sample_is_static() {
        let samples = line_samples(&[(4.0, 5.0, 6.0)]);
        for now in [-10.0, 0.0, 0.5, 1.0, 1e9] {
            assert_eq!(
                position_at(&samples, 0.0, 1.0, now),
                Some(Vector3::new(4.0, 5.0, 6.0))
            );
        }
    }

    #[test]
    fn empty_sequence_has_no_position() {
        assert_eq!(position_at(&[], 0.0, 1.0, 0.5), None);
    }

    #[test]
    fn result_stays_within_bracketing_segment() {
        let samples = line_samples(&[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0), (10.0, 10.0, 0.0)]);
        for i in 0..=100 {
            let t = i as f64 / 100.0;
            let (idx, next, _) = segment(t, samples.len());
            let p = position_at(&samples, 0.0, 1.0, t).unwrap();
            let a = samples[idx].position;
            let b = samples[next].position;
            for axis in 0..3 {
                let lo = a[axis].min(b[axis]);
                let hi = a[axis].max(b[axis]);
                assert!(p[axis] >= lo - 1e-12 && p[axis] <= hi + 1e-12);
            }
        }
    }

    #[test]
    fn fractional_index_is_monotonic_in_time() {
        let len = 11;
        let mut prev = -1.0;
        for i in 0..=50 {
            let now = i as f64 * 0.02;
            let t = progress(0.0, 1.0, now);
            let idx_float = t * (len - 1) as f64;
            assert!(idx_float >= prev);
            prev = idx_float;
        }
    }

    #[test]
    fn degenerate_duration_completes_immediately() {
        assert_eq!(progress(5.0, 0.0, 5.0), 1.0);
        assert_eq!(progress(5.0, -3.0, 5.0), 1.0);
        let samples = line_samples(&[(0.0, 0.0, 0.0), (1.0, 1.0, 1.0)]);
        assert_eq!(
            position_at(&samples, 5.0, 0.0, 5.0),
            Some(Vector3::new(1.0, 1.0, 1.0))
        );
    }
}
