// Pointer input normalized from mouse and touch events
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, MouseEvent, TouchEvent};

/// Elements whose presses belong to the element itself, never to a gesture.
const INTERACTIVE_SELECTOR: &str = "button, input, textarea, select";

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
}

impl PointerSample {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Displacement from `origin` to `self`.
    pub fn delta_from(self, origin: PointerSample) -> PointerSample {
        PointerSample::new(self.x - origin.x, self.y - origin.y)
    }
}

/// One pointer event reduced to what the gesture engine needs. Built at the
/// DOM boundary so nothing downstream inspects the event shape.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerInput {
    pub sample: PointerSample,
    /// The browser allows `preventDefault` on the originating event.
    pub cancelable: bool,
    /// The event target sits inside a button or form control.
    pub on_control: bool,
}

impl PointerInput {
    pub fn mouse(client_x: f64, client_y: f64) -> Self {
        Self {
            sample: PointerSample::new(client_x, client_y),
            ..Self::default()
        }
    }

    /// Touch input keyed on the first active touch point. A touch event
    /// without touches (e.g. `touchend`) yields the zero coordinate.
    pub fn touch(first: Option<PointerSample>) -> Self {
        Self {
            sample: first.unwrap_or(PointerSample::ZERO),
            ..Self::default()
        }
    }

    pub fn cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    pub fn on_control(mut self, on_control: bool) -> Self {
        self.on_control = on_control;
        self
    }

    pub fn from_mouse(e: &MouseEvent) -> Self {
        Self::mouse(e.client_x() as f64, e.client_y() as f64)
            .cancelable(e.cancelable())
            .on_control(targets_control(e))
    }

    pub fn from_touch(e: &TouchEvent) -> Self {
        let first = e
            .touches()
            .item(0)
            .map(|t| PointerSample::new(t.client_x() as f64, t.client_y() as f64));
        Self::touch(first)
            .cancelable(e.cancelable())
            .on_control(targets_control(e))
    }

    /// Normalizes any DOM event. Unknown event shapes map to the zero
    /// coordinate instead of failing.
    pub fn from_event(e: &Event) -> Self {
        if let Some(touch) = e.dyn_ref::<TouchEvent>() {
            Self::from_touch(touch)
        } else if let Some(mouse) = e.dyn_ref::<MouseEvent>() {
            Self::from_mouse(mouse)
        } else {
            Self::default().cancelable(e.cancelable())
        }
    }
}

/// Walks up from the event target to the nearest interactive element.
fn targets_control(e: &Event) -> bool {
    e.target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .and_then(|el| el.closest(INTERACTIVE_SELECTOR).ok().flatten())
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::{PointerInput, PointerSample};

    #[test]
    fn touch_without_points_is_zero() {
        let input = PointerInput::touch(None);
        assert_eq!(input.sample, PointerSample::ZERO);
        assert!(!input.cancelable);
    }

    #[test]
    fn touch_uses_first_point() {
        let input = PointerInput::touch(Some(PointerSample::new(12.0, 30.5))).cancelable(true);
        assert_eq!(input.sample, PointerSample::new(12.0, 30.5));
        assert!(input.cancelable);
    }

    #[test]
    fn delta_is_relative_to_origin() {
        let d = PointerSample::new(110.0, 40.0).delta_from(PointerSample::new(100.0, 50.0));
        assert_eq!(d, PointerSample::new(10.0, -10.0));
    }
}
