// Drag/resize state for the floating command panel
use super::geometry::{Geometry, Size, Viewport};
use super::gesture::{GestureMode, GestureStart, GestureTracker};
use super::pointer::PointerInput;

/// Smallest panel the resize handle allows.
pub const PANEL_MIN_SIZE: Size = Size::new(340.0, 180.0);

/// Result of applying one move event to an open session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureStep {
    pub geometry: Geometry,
    pub prevent_default: bool,
}

#[derive(Clone, Debug)]
pub struct PanelGesture {
    geometry: Geometry,
    min_size: Size,
    tracker: GestureTracker,
}

impl PanelGesture {
    pub fn new(geometry: Geometry, min_size: Size) -> Self {
        Self {
            geometry,
            min_size,
            tracker: GestureTracker::new(),
        }
    }

    #[cfg(test)]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn mode(&self) -> Option<GestureMode> {
        self.tracker.mode()
    }

    /// Replaces the geometry from outside (e.g. restored settings). Ignored
    /// while a session is open so a live gesture is not yanked away.
    pub fn sync(&mut self, geometry: Geometry, min_size: Size) -> bool {
        if self.tracker.is_active() {
            return false;
        }
        self.geometry = geometry;
        self.min_size = min_size;
        true
    }

    pub fn begin_drag(&mut self, input: &PointerInput) -> Option<GestureStart> {
        self.tracker
            .begin(GestureMode::Dragging, input, self.geometry)
    }

    pub fn begin_resize(&mut self, input: &PointerInput) -> Option<GestureStart> {
        self.tracker
            .begin(GestureMode::Resizing, input, self.geometry)
    }

    /// Recomputes geometry from the session origin. `viewport` is read by the
    /// caller at every move so window resizes mid-gesture are respected.
    pub fn pointer_move(&mut self, input: &PointerInput, viewport: Viewport) -> Option<GestureStep> {
        let session = *self.tracker.session()?;
        let delta = input.sample.delta_from(session.origin_pointer);
        self.geometry = match session.mode {
            GestureMode::Dragging => Geometry::new(
                session.origin_geometry.position,
                self.geometry.size,
            )
            .dragged(delta, viewport),
            GestureMode::Resizing => Geometry::new(
                self.geometry.position,
                session.origin_geometry.size,
            )
            .resized(delta, self.min_size),
            GestureMode::Pressing => return None,
        };
        Some(GestureStep {
            geometry: self.geometry,
            prevent_default: input.cancelable,
        })
    }

    /// Ends the session and yields the geometry to commit. `None` when no
    /// session was open.
    pub fn end(&mut self) -> Option<Geometry> {
        self.tracker.end().map(|_| self.geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::geometry::Position;
    use proptest::prelude::*;

    fn panel() -> PanelGesture {
        PanelGesture::new(
            Geometry::new(Position::new(20.0, 20.0), Size::new(450.0, 280.0)),
            PANEL_MIN_SIZE,
        )
    }

    #[test]
    fn drag_follows_pointer_delta() {
        let mut p = panel();
        p.begin_drag(&PointerInput::mouse(100.0, 40.0)).unwrap();
        let step = p
            .pointer_move(&PointerInput::mouse(150.0, 70.0).cancelable(true), Viewport::new(1280.0, 800.0))
            .unwrap();
        assert_eq!(step.geometry.position, Position::new(70.0, 50.0));
        assert!(step.prevent_default);
    }

    #[test]
    fn drag_uses_viewport_of_each_move() {
        let mut p = panel();
        p.begin_drag(&PointerInput::mouse(0.0, 0.0)).unwrap();
        let wide = p
            .pointer_move(&PointerInput::mouse(600.0, 0.0), Viewport::new(1280.0, 800.0))
            .unwrap();
        assert_eq!(wide.geometry.position.x, 620.0);
        let narrow = p
            .pointer_move(&PointerInput::mouse(600.0, 0.0), Viewport::new(900.0, 800.0))
            .unwrap();
        assert_eq!(narrow.geometry.position.x, 450.0);
    }

    #[test]
    fn resize_leaves_position_alone() {
        let mut p = panel();
        p.begin_resize(&PointerInput::mouse(470.0, 300.0)).unwrap();
        let step = p
            .pointer_move(&PointerInput::mouse(520.0, 200.0), Viewport::new(1280.0, 800.0))
            .unwrap();
        assert_eq!(step.geometry.position, Position::new(20.0, 20.0));
        assert_eq!(step.geometry.size, Size::new(500.0, 180.0));
    }

    #[test]
    fn drag_and_resize_are_exclusive() {
        let mut p = panel();
        assert!(p.begin_drag(&PointerInput::mouse(0.0, 0.0)).is_some());
        assert!(p.begin_resize(&PointerInput::mouse(0.0, 0.0)).is_none());
        assert_eq!(p.mode(), Some(GestureMode::Dragging));
    }

    #[test]
    fn press_on_header_button_does_not_drag() {
        let mut p = panel();
        assert!(p.begin_drag(&PointerInput::mouse(10.0, 10.0).on_control(true)).is_none());
        assert!(p
            .pointer_move(&PointerInput::mouse(300.0, 300.0), Viewport::new(1280.0, 800.0))
            .is_none());
        assert_eq!(p.geometry().position, Position::new(20.0, 20.0));
    }

    #[test]
    fn end_commits_once() {
        let mut p = panel();
        p.begin_drag(&PointerInput::mouse(0.0, 0.0)).unwrap();
        p.pointer_move(&PointerInput::mouse(30.0, 30.0), Viewport::new(1280.0, 800.0));
        assert_eq!(p.end().map(|g| g.position), Some(Position::new(50.0, 50.0)));
        assert_eq!(p.end(), None);
    }

    #[test]
    fn sync_is_ignored_mid_session() {
        let mut p = panel();
        p.begin_drag(&PointerInput::mouse(0.0, 0.0)).unwrap();
        let other = Geometry::new(Position::new(1.0, 1.0), Size::new(500.0, 500.0));
        assert!(!p.sync(other, PANEL_MIN_SIZE));
        p.end();
        assert!(p.sync(other, PANEL_MIN_SIZE));
        assert_eq!(p.geometry(), other);
    }

    proptest! {
        #[test]
        fn drag_stays_in_viewport(
            moves in prop::collection::vec((-5000.0f64..5000.0, -5000.0f64..5000.0), 1..40),
            vw in 500.0f64..2560.0,
            vh in 300.0f64..1440.0,
        ) {
            let mut p = panel();
            p.begin_drag(&PointerInput::mouse(0.0, 0.0)).unwrap();
            for (x, y) in moves {
                let step = p.pointer_move(&PointerInput::mouse(x, y), Viewport::new(vw, vh)).unwrap();
                let g = step.geometry;
                prop_assert!(g.position.x >= 0.0 && g.position.x <= vw - g.size.width);
                prop_assert!(g.position.y >= 0.0 && g.position.y <= vh - g.size.height);
            }
        }

        #[test]
        fn resize_never_below_minimum(
            moves in prop::collection::vec((-5000.0f64..5000.0, -5000.0f64..5000.0), 1..40),
        ) {
            let mut p = panel();
            p.begin_resize(&PointerInput::mouse(470.0, 300.0)).unwrap();
            for (x, y) in moves {
                let step = p.pointer_move(&PointerInput::mouse(x, y), Viewport::new(1280.0, 800.0)).unwrap();
                prop_assert!(step.geometry.size.width >= PANEL_MIN_SIZE.width);
                prop_assert!(step.geometry.size.height >= PANEL_MIN_SIZE.height);
            }
        }
    }
}
