//! Forward-only replay of a sample table.
//!
//! [`Animator`] owns the replay cursor and turns one sample per tick into a frame of 2-D
//! marker positions. [`Playback`] drives an animator at a fixed real-time cadence into a
//! [`RenderSurface`] until the samples run out or a [`StopSignal`] fires.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::LoopConfig;
use crate::geometry::LoopGeometry;
use crate::math::R2;
use crate::samples::{SampleError, SampleStore};
use crate::scene::SceneLayout;

/// Replay cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimationCursor {
    /// Last sample handed out by `tick` (`k`).
    pub last_rendered: usize,
    /// Sample the next `tick` will render (`l`).
    pub current: usize,
}

/// Whether an animator still has samples to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Unrendered samples remain.
    Advancing,
    /// Every sample has been rendered.
    Idle,
}

/// Marker positions for one replayed sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Sample index in the store.
    pub sample: usize,
    /// Simulation step the sample was taken at.
    pub sim_step: usize,
    /// One coordinate per marker, in marker order.
    pub positions: Vec<R2>,
}

/// Owns a sample table and the replay cursor over it.
#[derive(Debug, Clone)]
pub struct Animator {
    store: SampleStore,
    geometry: LoopGeometry,
    cursor: AnimationCursor,
}

impl Animator {
    /// Replays `store` on `geometry`, starting at sample 0.
    #[must_use]
    pub fn new(store: SampleStore, geometry: LoopGeometry) -> Self {
        Self {
            store,
            geometry,
            cursor: AnimationCursor::default(),
        }
    }

    /// Replays `store` using the same configuration that produced it.
    ///
    /// Fails if the table's stride or dimensions disagree with `config`.
    pub fn from_config(store: SampleStore, config: &LoopConfig) -> Result<Self, SampleError> {
        if store.increment() != config.data_increment {
            return Err(SampleError::IncrementMismatch {
                found: store.increment(),
                expected: config.data_increment,
            });
        }
        store.check_shape(config.marker_count(), config.sample_count())?;
        Ok(Self::new(store, LoopGeometry::from_config(config)))
    }

    /// Geometry frames are mapped onto.
    #[must_use]
    pub fn geometry(&self) -> &LoopGeometry {
        &self.geometry
    }

    /// Table being replayed.
    #[must_use]
    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    /// Current cursor.
    #[must_use]
    pub fn cursor(&self) -> AnimationCursor {
        self.cursor
    }

    /// True once every sample has been rendered.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.cursor.current >= self.store.sample_count()
    }

    /// Current state of the replay.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        if self.is_done() {
            PlaybackState::Idle
        } else {
            PlaybackState::Advancing
        }
    }

    /// Renders the next sample and advances the cursor, or returns `None` when idle.
    pub fn tick(&mut self) -> Option<Frame> {
        if self.is_done() {
            return None;
        }
        let frame = self.render(self.cursor.current);
        self.cursor.last_rendered = self.cursor.current;
        self.cursor.current += 1;
        Some(frame)
    }

    /// Re-renders the most recently rendered sample, if any.
    #[must_use]
    pub fn last_frame(&self) -> Option<Frame> {
        (self.cursor.current > 0).then(|| self.render(self.cursor.last_rendered))
    }

    fn render(&self, sample: usize) -> Frame {
        Frame {
            sample,
            sim_step: self.store.sim_step(sample),
            positions: self
                .store
                .column(sample)
                .map(|s| self.geometry.to_coordinates(s))
                .collect(),
        }
    }
}

/// Cloneable handle that halts a running [`Playback`].
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    /// Creates a signal in the running state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the playback loop to stop before its next tick.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// True once [`stop`](Self::stop) has been called on any clone.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// External collaborator that draws frames.
pub trait RenderSurface {
    /// Draws `frame` on top of the static `scene`.
    fn present(&mut self, scene: &SceneLayout, frame: &Frame);
}

/// How a playback run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Every sample was presented.
    Completed,
    /// The stop signal fired first.
    Stopped,
}

/// Summary of a playback run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackReport {
    /// Frames presented during this run.
    pub frames: usize,
    /// Why the run ended.
    pub outcome: PlaybackOutcome,
}

/// Fixed-cadence tick loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playback {
    interval: Duration,
}

impl Playback {
    /// Creates a loop that waits `interval` after presenting each frame.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Creates a loop at the cadence configured in `config`.
    #[must_use]
    pub fn from_config(config: &LoopConfig) -> Self {
        Self::new(config.frame_interval)
    }

    /// Delay between frames.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Presents frames from `animator` until it goes idle or `stop` fires.
    pub fn run<S>(
        &self,
        animator: &mut Animator,
        scene: &SceneLayout,
        surface: &mut S,
        stop: &StopSignal,
    ) -> PlaybackReport
    where
        S: RenderSurface + ?Sized,
    {
        let _span =
            tracing::info_span!("playback", samples = animator.store().sample_count()).entered();
        let mut frames = 0;
        loop {
            if stop.is_stopped() {
                tracing::info!(frames, cursor = animator.cursor().current, "playback stopped");
                return PlaybackReport {
                    frames,
                    outcome: PlaybackOutcome::Stopped,
                };
            }
            let Some(frame) = animator.tick() else {
                tracing::info!(frames, "playback completed");
                return PlaybackReport {
                    frames,
                    outcome: PlaybackOutcome::Completed,
                };
            };
            surface.present(scene, &frame);
            frames += 1;
            if !self.interval.is_zero() {
                thread::sleep(self.interval);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SampleStore {
        let positions = vec![
            (0..9).map(|i| i as f64 * 100.0).collect::<Vec<_>>(),
            (0..9).map(|i| 1000.0 + i as f64 * 100.0).collect::<Vec<_>>(),
        ];
        SampleStore::sample(&positions, 2).expect("samples")
    }

    fn geometry() -> LoopGeometry {
        LoopGeometry::from_half_extents(500.0, 300.0)
    }

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Frame>,
        stop_after: Option<(usize, StopSignal)>,
    }

    impl RenderSurface for Recorder {
        fn present(&mut self, _scene: &SceneLayout, frame: &Frame) {
            self.frames.push(frame.clone());
            if let Some((limit, signal)) = &self.stop_after {
                if self.frames.len() >= *limit {
                    signal.stop();
                }
            }
        }
    }

    #[test]
    fn ticks_walk_forward_through_every_sample() {
        let mut animator = Animator::new(store(), geometry());
        assert_eq!(animator.state(), PlaybackState::Advancing);
        assert_eq!(animator.last_frame(), None);

        let frame = animator.tick().expect("first frame");
        assert_eq!(frame.sample, 0);
        assert_eq!(frame.positions, vec![R2::new(0.0, 0.0), R2::new(1000.0, 0.0)]);

        let frame = animator.tick().expect("second frame");
        assert_eq!(frame.sample, 1);
        assert_eq!(frame.sim_step, 2);
        assert_eq!(frame.positions, vec![R2::new(200.0, 0.0), R2::new(1000.0, 200.0)]);
        assert_eq!(
            animator.cursor(),
            AnimationCursor {
                last_rendered: 1,
                current: 2
            }
        );
    }

    #[test]
    fn goes_idle_and_keeps_last_frame() {
        let mut animator = Animator::new(store(), geometry());
        let mut count = 0;
        while animator.tick().is_some() {
            count += 1;
        }
        assert_eq!(count, 5);
        assert!(animator.is_done());
        assert_eq!(animator.state(), PlaybackState::Idle);
        assert_eq!(animator.tick(), None);
        let last = animator.last_frame().expect("last frame stays available");
        assert_eq!(last.sample, 4);
        assert_eq!(last.sim_step, 8);
        assert_eq!(
            animator.cursor(),
            AnimationCursor {
                last_rendered: 4,
                current: 5
            }
        );
    }

    #[test]
    fn playback_presents_every_frame_then_completes() {
        let mut animator = Animator::new(store(), geometry());
        let scene = SceneLayout::new(animator.geometry(), 50.0);
        let mut surface = Recorder::default();
        let stop = StopSignal::new();
        let report = Playback::new(Duration::ZERO).run(&mut animator, &scene, &mut surface, &stop);
        assert_eq!(
            report,
            PlaybackReport {
                frames: 5,
                outcome: PlaybackOutcome::Completed
            }
        );
        let samples: Vec<usize> = surface.frames.iter().map(|f| f.sample).collect();
        assert_eq!(samples, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn stop_signal_halts_before_remaining_frames() {
        let mut animator = Animator::new(store(), geometry());
        let scene = SceneLayout::new(animator.geometry(), 50.0);
        let signal = StopSignal::new();
        let mut surface = Recorder {
            frames: Vec::new(),
            stop_after: Some((2, signal.clone())),
        };
        let playback = Playback::new(Duration::from_millis(1));
        let report = playback.run(&mut animator, &scene, &mut surface, &signal);
        assert_eq!(
            report,
            PlaybackReport {
                frames: 2,
                outcome: PlaybackOutcome::Stopped
            }
        );
        assert!(!animator.is_done());
        assert_eq!(animator.cursor().current, 2);
    }

    #[test]
    fn stopped_replay_does_not_rewind() {
        let mut animator = Animator::new(store(), geometry());
        let scene = SceneLayout::new(animator.geometry(), 50.0);
        let signal = StopSignal::new();
        let mut surface = Recorder {
            frames: Vec::new(),
            stop_after: Some((3, signal.clone())),
        };
        let playback = Playback::new(Duration::ZERO);
        playback.run(&mut animator, &scene, &mut surface, &signal);
        let mut rest = Recorder::default();
        let report = playback.run(&mut animator, &scene, &mut rest, &StopSignal::new());
        assert_eq!(report.frames, 2);
        assert_eq!(report.outcome, PlaybackOutcome::Completed);
    }

    #[test]
    fn configuration_mismatch_is_rejected() {
        let config = LoopConfig::default();
        let err = Animator::from_config(store(), &config).unwrap_err();
        assert!(matches!(err, SampleError::IncrementMismatch { found: 2, expected: 20 }));
        let err = Animator::from_config(store(), &config.with_data_increment(2)).unwrap_err();
        assert!(matches!(err, SampleError::ShapeMismatch { markers: 2, .. }));
    }
}
