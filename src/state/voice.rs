//! Press-and-hold state for the floating voice button.
//!
//! A press starts capture immediately. Travelling more than
//! [`DRAG_THRESHOLD_PX`] on either axis turns the press into a reposition and
//! discards the capture. A release without crossing schedules a commit
//! [`COMMIT_DELAY_MS`] later so trailing audio is kept; pressing again before
//! then cancels that commit.
//!
//! The machine never touches timers or the speech API itself. It returns
//! [`VoiceEffect`]s and the component carries them out.

use super::geometry::{Geometry, Position, Size, Viewport};
use super::gesture::{GestureMode, GestureTracker};
use super::pointer::PointerInput;

pub const DRAG_THRESHOLD_PX: f64 = 15.0;
pub const COMMIT_DELAY_MS: u32 = 1_000;
/// Footprint of the button, used for viewport clamping.
pub const VOICE_BUTTON_SIZE: Size = Size::new(96.0, 96.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VoiceEffect {
    StartCapture,
    /// The press became a drag; whatever was recorded is thrown away.
    DiscardCapture,
    /// Arm a timer that calls [`VoiceGesture::fire_commit`] with `generation`.
    ScheduleCommit { generation: u64, delay_ms: u32 },
    CommitCapture,
    PositionCommitted(Position),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VoiceGestureState {
    pub pressed: bool,
    pub drag_mode: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VoiceStep {
    pub position: Position,
    pub effects: Vec<VoiceEffect>,
    pub prevent_default: bool,
}

#[derive(Clone, Debug)]
pub struct VoiceGesture {
    position: Position,
    tracker: GestureTracker,
    state: VoiceGestureState,
    generation: u64,
    pending_commit: Option<u64>,
}

impl VoiceGesture {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            tracker: GestureTracker::new(),
            state: VoiceGestureState::default(),
            generation: 0,
            pending_commit: None,
        }
    }

    pub fn state(&self) -> VoiceGestureState {
        self.state
    }

    #[cfg(test)]
    pub fn has_pending_commit(&self) -> bool {
        self.pending_commit.is_some()
    }

    /// Adopts an externally supplied position while idle.
    pub fn sync(&mut self, position: Position) -> bool {
        if self.tracker.is_active() {
            return false;
        }
        self.position = position;
        true
    }

    /// Pointer down. Returns `None` if a session is already open.
    pub fn press(&mut self, input: &PointerInput) -> Option<VoiceStep> {
        let origin = Geometry::new(self.position, VOICE_BUTTON_SIZE);
        let start = self.tracker.begin(GestureMode::Pressing, input, origin)?;
        if let Some(generation) = self.pending_commit.take() {
            tracing::debug!(generation, "pending capture commit cancelled by new press");
        }
        self.generation += 1;
        self.state = VoiceGestureState {
            pressed: true,
            drag_mode: false,
        };
        Some(VoiceStep {
            position: self.position,
            effects: vec![VoiceEffect::StartCapture],
            prevent_default: start.prevent_default,
        })
    }

    pub fn pointer_move(&mut self, input: &PointerInput, viewport: Viewport) -> Option<VoiceStep> {
        let session = *self.tracker.session()?;
        let delta = input.sample.delta_from(session.origin_pointer);
        let mut effects = Vec::new();
        if (delta.x.abs() > DRAG_THRESHOLD_PX || delta.y.abs() > DRAG_THRESHOLD_PX)
            && self.tracker.cross_threshold()
        {
            tracing::debug!(dx = delta.x, dy = delta.y, "voice press became a drag");
            self.state.drag_mode = true;
            effects.push(VoiceEffect::DiscardCapture);
        }
        self.position = session.origin_geometry.dragged(delta, viewport).position;
        Some(VoiceStep {
            position: self.position,
            effects,
            prevent_default: input.cancelable,
        })
    }

    /// Pointer up. A drag commits the new position; a plain press schedules
    /// the capture commit.
    pub fn release(&mut self) -> Vec<VoiceEffect> {
        let Some(session) = self.tracker.end() else {
            return Vec::new();
        };
        self.state.pressed = false;
        if session.threshold_crossed {
            self.state.drag_mode = false;
            vec![VoiceEffect::PositionCommitted(self.position)]
        } else {
            self.pending_commit = Some(self.generation);
            vec![VoiceEffect::ScheduleCommit {
                generation: self.generation,
                delay_ms: COMMIT_DELAY_MS,
            }]
        }
    }

    /// Timer callback. Yields the commit only for the generation still
    /// pending; stale timers are ignored.
    pub fn fire_commit(&mut self, generation: u64) -> Option<VoiceEffect> {
        if self.pending_commit != Some(generation) {
            return None;
        }
        self.pending_commit = None;
        Some(VoiceEffect::CommitCapture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport::new(1280.0, 800.0);

    /// Virtual clock with the timers the component would have armed.
    #[derive(Default)]
    struct Timers {
        now: u64,
        armed: Vec<(u64, u64)>,
    }

    impl Timers {
        fn collect(&mut self, effects: &[VoiceEffect]) {
            for e in effects {
                if let VoiceEffect::ScheduleCommit { generation, delay_ms } = e {
                    self.armed.push((self.now + u64::from(*delay_ms), *generation));
                }
            }
        }

        fn advance_to(&mut self, t: u64, voice: &mut VoiceGesture) -> Vec<VoiceEffect> {
            self.now = t;
            let (due, rest): (Vec<_>, Vec<_>) =
                std::mem::take(&mut self.armed).into_iter().partition(|(at, _)| *at <= t);
            self.armed = rest;
            due.into_iter()
                .filter_map(|(_, generation)| voice.fire_commit(generation))
                .collect()
        }
    }

    fn button() -> VoiceGesture {
        VoiceGesture::new(Position::new(40.0, 200.0))
    }

    #[test]
    fn press_starts_capture_once() {
        let mut v = button();
        let step = v.press(&PointerInput::mouse(80.0, 240.0)).unwrap();
        assert_eq!(step.effects, vec![VoiceEffect::StartCapture]);
        assert!(v.press(&PointerInput::mouse(80.0, 240.0)).is_none());
        assert_eq!(
            v.state(),
            VoiceGestureState {
                pressed: true,
                drag_mode: false
            }
        );
    }

    #[test]
    fn drag_past_threshold_discards_once_and_never_commits() {
        let mut v = button();
        let mut timers = Timers::default();
        let mut all = v.press(&PointerInput::mouse(80.0, 240.0)).unwrap().effects;
        for dx in [5.0, 10.0, 15.0, 16.0, 20.0] {
            all.extend(v.pointer_move(&PointerInput::mouse(80.0 + dx, 240.0), VIEWPORT).unwrap().effects);
        }
        let released = v.release();
        timers.collect(&released);
        all.extend(released);
        all.extend(timers.advance_to(5_000, &mut v));

        let discards = all.iter().filter(|e| **e == VoiceEffect::DiscardCapture).count();
        assert_eq!(discards, 1);
        assert!(!all.contains(&VoiceEffect::CommitCapture));
        assert!(!all.iter().any(|e| matches!(e, VoiceEffect::ScheduleCommit { .. })));
        assert_eq!(
            all.last(),
            Some(&VoiceEffect::PositionCommitted(Position::new(60.0, 200.0)))
        );
        assert!(!v.state().drag_mode);
    }

    #[test]
    fn exactly_threshold_is_still_a_press() {
        let mut v = button();
        v.press(&PointerInput::mouse(0.0, 0.0)).unwrap();
        let step = v.pointer_move(&PointerInput::mouse(15.0, -15.0), VIEWPORT).unwrap();
        assert!(step.effects.is_empty());
        assert!(!v.state().drag_mode);
        assert_eq!(step.position, Position::new(55.0, 185.0));
    }

    #[test]
    fn tap_commits_after_delay_and_not_before() {
        let mut v = button();
        let mut timers = Timers::default();
        v.press(&PointerInput::mouse(80.0, 240.0)).unwrap();
        timers.advance_to(200, &mut v);
        let released = v.release();
        timers.collect(&released);
        assert!(v.has_pending_commit());

        assert!(timers.advance_to(1_199, &mut v).is_empty());
        assert_eq!(timers.advance_to(1_200, &mut v), vec![VoiceEffect::CommitCapture]);
        assert!(timers.advance_to(10_000, &mut v).is_empty());
        assert!(!v.has_pending_commit());
    }

    #[test]
    fn repress_cancels_pending_commit() {
        let mut v = button();
        let mut timers = Timers::default();
        v.press(&PointerInput::mouse(80.0, 240.0)).unwrap();
        let released = v.release();
        timers.collect(&released);

        timers.now = 400;
        let second = v.press(&PointerInput::mouse(80.0, 240.0)).unwrap();
        assert_eq!(second.effects, vec![VoiceEffect::StartCapture]);
        let released = v.release();
        timers.collect(&released);

        // the first timer still runs out at 1000 but is stale
        assert!(timers.advance_to(1_000, &mut v).is_empty());
        assert!(timers.advance_to(1_399, &mut v).is_empty());
        assert_eq!(timers.advance_to(1_400, &mut v), vec![VoiceEffect::CommitCapture]);
    }

    #[test]
    fn drag_clamps_to_viewport() {
        let mut v = button();
        v.press(&PointerInput::mouse(80.0, 240.0)).unwrap();
        let step = v
            .pointer_move(&PointerInput::mouse(5_000.0, -5_000.0), Viewport::new(400.0, 300.0))
            .unwrap();
        assert_eq!(step.position, Position::new(304.0, 0.0));
    }

    #[test]
    fn release_without_press_is_noop() {
        let mut v = button();
        assert!(v.release().is_empty());
        assert!(v.fire_commit(0).is_none());
    }
}
