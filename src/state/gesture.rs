//! Gesture session tracking shared by the floating panel and the voice button.
//!
//! A [`GestureTracker`] owns at most one [`GestureSession`]. Sessions start on
//! a pointer press, report displacement relative to where they started, and end
//! exactly once no matter how often `end` is called.

use super::geometry::Geometry;
use super::pointer::{PointerInput, PointerSample};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureMode {
    Dragging,
    Resizing,
    Pressing,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSession {
    pub mode: GestureMode,
    pub origin_pointer: PointerSample,
    pub origin_geometry: Geometry,
    /// Set once the pointer has travelled past the widget's drag threshold.
    pub threshold_crossed: bool,
}

/// What the caller must do with the originating event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureStart {
    pub mode: GestureMode,
    pub prevent_default: bool,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GestureTracker {
    session: Option<GestureSession>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    pub fn mode(&self) -> Option<GestureMode> {
        self.session.map(|s| s.mode)
    }

    /// Opens a session. Returns `None` (and changes nothing) when the press
    /// landed on an interactive control or another session is still open.
    pub fn begin(
        &mut self,
        mode: GestureMode,
        input: &PointerInput,
        origin_geometry: Geometry,
    ) -> Option<GestureStart> {
        if input.on_control {
            tracing::debug!(?mode, "gesture start ignored: target is a control");
            return None;
        }
        if let Some(active) = &self.session {
            tracing::debug!(?mode, active = ?active.mode, "gesture start ignored: session open");
            return None;
        }
        self.session = Some(GestureSession {
            mode,
            origin_pointer: input.sample,
            origin_geometry,
            threshold_crossed: false,
        });
        tracing::debug!(?mode, x = input.sample.x, y = input.sample.y, "gesture started");
        Some(GestureStart {
            mode,
            prevent_default: input.cancelable,
        })
    }

    /// Marks the threshold as crossed. Returns `true` only on the first call
    /// of a session.
    pub fn cross_threshold(&mut self) -> bool {
        match &mut self.session {
            Some(s) if !s.threshold_crossed => {
                s.threshold_crossed = true;
                true
            }
            _ => false,
        }
    }

    /// Closes the session. Only the first call after `begin` returns it.
    pub fn end(&mut self) -> Option<GestureSession> {
        let ended = self.session.take();
        if let Some(s) = &ended {
            tracing::debug!(mode = ?s.mode, "gesture ended");
        }
        ended
    }
}
