//! Playback driver for a simulated launch.
//!
//! A small state machine (Idle -> Playing -> Completed) layered over the
//! trajectory interpolator. Starting playback replaces the sample
//! sequence wholesale and resets the start time; samples are never
//! mutated in place during a run. The Completed edge fires exactly once
//! so the caller can run its one-shot effects (hide exhaust, reset the
//! camera pull); the final pose stays latched afterwards.

use crate::trajectory::{position_at, progress, segment, TrajectorySample};
use nalgebra::Vector3;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PlaybackPhase {
    Idle,
    Playing,
    Completed,
}

pub struct Playback {
    samples: Vec<TrajectorySample>,
    start_time: f64,
    duration: f64,
    phase: PlaybackPhase,
    segment_idx: Option<usize>,
    heading: Option<Vector3<f64>>,
}

impl Playback {
    pub fn idle() -> Self {
        Self {
            samples: Vec::new(),
            start_time: 0.0,
            duration: 0.0,
            phase: PlaybackPhase::Idle,
            segment_idx: None,
            heading: None,
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == PlaybackPhase::Playing
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    /// Begins (or restarts) playback of a fresh sample sequence with the
    /// caller-supplied duration. An empty sequence leaves the driver Idle.
    pub fn start(&mut self, samples: Vec<TrajectorySample>, duration: f64, now: f64) {
        if samples.is_empty() {
            *self = Self::idle();
            return;
        }
        self.samples = samples;
        self.duration = duration;
        self.start_time = now;
        self.phase = PlaybackPhase::Playing;
        self.segment_idx = None;
        self.heading = None;
    }

    /// Advances the state machine to `now`. Returns true on the single
    /// tick where playback reaches completion.
    pub fn tick(&mut self, now: f64) -> bool {
        if self.phase != PlaybackPhase::Playing {
            return false;
        }
        let t = progress(self.start_time, self.duration, now);
        let (idx, next, _) = segment(t, self.samples.len());
        // Recompute the heading only when a new segment begins, so the
        // rocket does not jitter from per-frame re-orientation.
        if next > idx && self.segment_idx != Some(idx) {
            self.segment_idx = Some(idx);
            let delta = self.samples[next].position - self.samples[idx].position;
            if delta.norm_squared() > 0.0 {
                self.heading = Some(delta.normalize());
            }
        }
        if t >= 1.0 {
            self.phase = PlaybackPhase::Completed;
            return true;
        }
        false
    }

    /// Interpolated rocket position at `now`; None while Idle. After
    /// completion this keeps returning the final pose.
    pub fn position(&self, now: f64) -> Option<Vector3<f64>> {
        if self.phase == PlaybackPhase::Idle {
            return None;
        }
        position_at(&self.samples, self.start_time, self.duration, now)
    }

    pub fn heading(&self) -> Option<Vector3<f64>> {
        self.heading
    }

    pub fn progress(&self, now: f64) -> f64 {
        match self.phase {
            PlaybackPhase::Idle => 0.0,
            _ => progress(self.start_time, self.duration, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn climb() -> Vec<TrajectorySample> {
        vec![
            TrajectorySample::new(0.0, Vector3::new(0.0, 0.0, 0.0)),
            TrajectorySample::new(1.0, Vector3::new(0.0, 10.0, 0.0)),
            TrajectorySample::new(2.0, Vector3::new(5.0, 20.0, 0.0)),
        ]
    }

    #[test]
    fn idle_has_no_position() {
        let pb = Playback::idle();
        assert_eq!(pb.phase(), PlaybackPhase::Idle);
        assert_eq!(pb.position(123.0), None);
    }

    #[test]
    fn empty_start_stays_idle() {
        let mut pb = Playback::idle();
        pb.start(Vec::new(), 4.0, 0.0);
        assert_eq!(pb.phase(), PlaybackPhase::Idle);
    }

    #[test]
    fn completes_once_and_latches_final_pose() {
        let mut pb = Playback::idle();
        pb.start(climb(), 2.0, 100.0);
        assert!(pb.is_playing());
        assert!(!pb.tick(101.0));
        assert!(pb.tick(102.5));
        assert_eq!(pb.phase(), PlaybackPhase::Completed);
        // Edge fires only once.
        assert!(!pb.tick(103.0));
        assert_eq!(pb.position(200.0), Some(Vector3::new(5.0, 20.0, 0.0)));
    }

    #[test]
    fn restart_replaces_samples_and_start_time() {
        let mut pb = Playback::idle();
        pb.start(climb(), 2.0, 0.0);
        pb.tick(5.0);
        assert_eq!(pb.phase(), PlaybackPhase::Completed);

        pb.start(
            vec![
                TrajectorySample::new(0.0, Vector3::new(1.0, 1.0, 1.0)),
                TrajectorySample::new(1.0, Vector3::new(3.0, 1.0, 1.0)),
            ],
            4.0,
            50.0,
        );
        assert!(pb.is_playing());
        assert_eq!(pb.position(50.0), Some(Vector3::new(1.0, 1.0, 1.0)));
        assert_eq!(pb.position(52.0), Some(Vector3::new(2.0, 1.0, 1.0)));
    }

    #[test]
    fn heading_tracks_segment_not_frame() {
        let mut pb = Playback::idle();
        pb.start(climb(), 2.0, 0.0);
        pb.tick(0.1);
        let first = pb.heading().unwrap();
        assert!((first - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-12);
        // Still inside the first segment: heading unchanged.
        pb.tick(0.4);
        assert_eq!(pb.heading(), Some(first));
        // Second segment begins.
        pb.tick(1.5);
        let second = pb.heading().unwrap();
        assert!(second.x > 0.0);
    }

    #[test]
    fn single_sample_completes_as_static_pose() {
        let mut pb = Playback::idle();
        pb.start(
            vec![TrajectorySample::new(0.0, Vector3::new(9.0, 9.0, 9.0))],
            1.0,
            0.0,
        );
        assert_eq!(pb.position(0.5), Some(Vector3::new(9.0, 9.0, 9.0)));
        assert!(pb.tick(2.0));
        assert_eq!(pb.position(99.0), Some(Vector3::new(9.0, 9.0, 9.0)));
    }
}
