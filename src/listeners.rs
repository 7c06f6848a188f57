// Window event listeners tied to the lifetime of a value
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Event, Window};

const MOVE_EVENTS: [&str; 2] = ["mousemove", "touchmove"];
const END_EVENTS: [&str; 3] = ["mouseup", "touchend", "touchcancel"];

/// One closure registered on `window` for a set of event types. Dropping it
/// removes every registration.
pub struct EventSubscription {
    window: Window,
    events: &'static [&'static str],
    callback: Closure<dyn FnMut(Event)>,
}

impl EventSubscription {
    /// Registers `handler` for `events`. Listeners are non-passive so the
    /// handler may call `preventDefault` on touch moves.
    pub fn window(
        events: &'static [&'static str],
        handler: impl FnMut(Event) + 'static,
    ) -> Option<Self> {
        let window = web_sys::window()?;
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        for name in events {
            if let Err(err) = window.add_event_listener_with_callback_and_add_event_listener_options(
                name,
                callback.as_ref().unchecked_ref(),
                &options,
            ) {
                tracing::warn!(event = name, ?err, "failed to register window listener");
            }
        }
        Some(Self {
            window,
            events,
            callback,
        })
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        for name in self.events {
            let _ = self
                .window
                .remove_event_listener_with_callback(name, self.callback.as_ref().unchecked_ref());
        }
    }
}

/// Move and end listeners for one gesture session.
pub struct PointerSubscription {
    _moves: EventSubscription,
    _ends: EventSubscription,
}

impl PointerSubscription {
    pub fn acquire(
        on_move: impl FnMut(Event) + 'static,
        on_end: impl FnMut(Event) + 'static,
    ) -> Option<Self> {
        let moves = EventSubscription::window(&MOVE_EVENTS, on_move)?;
        let ends = EventSubscription::window(&END_EVENTS, on_end)?;
        tracing::debug!("pointer listeners attached");
        Some(Self {
            _moves: moves,
            _ends: ends,
        })
    }
}

impl Drop for PointerSubscription {
    fn drop(&mut self) {
        tracing::debug!("pointer listeners released");
    }
}
