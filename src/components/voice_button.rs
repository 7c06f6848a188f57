use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use web_sys::Event;
use yew::prelude::*;

use crate::listeners::PointerSubscription;
use crate::state::{
    PointerInput, Position, VOICE_BUTTON_SIZE, VoiceEffect, VoiceGesture, VoiceGestureState,
    Viewport,
};

/// How a capture session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureOutcome {
    Commit,
    Discard,
}

#[derive(Properties, PartialEq, Clone)]
pub struct VoiceButtonProps {
    pub position: Position,
    pub on_position_change: Callback<Position>,
    pub on_capture_start: Callback<()>,
    pub on_capture_end: Callback<CaptureOutcome>,
    /// The speech backend is currently listening for this button.
    #[prop_or_default]
    pub recording: bool,
}

#[derive(Clone)]
struct VoiceCallbacks {
    on_position_change: Callback<Position>,
    on_capture_start: Callback<()>,
    on_capture_end: Callback<CaptureOutcome>,
}

impl From<&VoiceButtonProps> for VoiceCallbacks {
    fn from(props: &VoiceButtonProps) -> Self {
        Self {
            on_position_change: props.on_position_change.clone(),
            on_capture_start: props.on_capture_start.clone(),
            on_capture_end: props.on_capture_end.clone(),
        }
    }
}

#[derive(Clone)]
struct VoiceHandles {
    machine: Rc<RefCell<VoiceGesture>>,
    position: UseStateHandle<Position>,
    visual: UseStateHandle<VoiceGestureState>,
    subscription: Rc<RefCell<Option<PointerSubscription>>>,
    commit_timer: Rc<RefCell<Option<Timeout>>>,
    callbacks: Rc<RefCell<VoiceCallbacks>>,
}

impl VoiceHandles {
    fn press(&self, input: PointerInput, event: &Event) {
        let step = self.machine.borrow_mut().press(&input);
        let Some(step) = step else {
            return;
        };
        // dropping the handle clears the browser timer
        drop(self.commit_timer.borrow_mut().take());
        if step.prevent_default {
            event.prevent_default();
        }
        self.position.set(step.position);
        self.refresh();
        self.run(step.effects);

        let moving = self.clone();
        let ending = self.clone();
        let subscription = PointerSubscription::acquire(
            move |e: Event| moving.pointer_move(&e),
            move |_e: Event| ending.release(),
        );
        if subscription.is_none() {
            tracing::warn!("no window to listen on, releasing voice press");
            self.release();
            return;
        }
        *self.subscription.borrow_mut() = subscription;
    }

    fn pointer_move(&self, event: &Event) {
        let input = PointerInput::from_event(event);
        let step = self
            .machine
            .borrow_mut()
            .pointer_move(&input, Viewport::current());
        let Some(step) = step else {
            return;
        };
        if step.prevent_default {
            event.prevent_default();
        }
        self.position.set(step.position);
        if !step.effects.is_empty() {
            self.refresh();
        }
        self.run(step.effects);
    }

    fn release(&self) {
        let effects = self.machine.borrow_mut().release();
        let subscription = self.subscription.borrow_mut().take();
        drop(subscription);
        if effects.is_empty() {
            return;
        }
        self.refresh();
        self.run(effects);
    }

    fn fire_commit(&self, generation: u64) {
        let effect = self.machine.borrow_mut().fire_commit(generation);
        if let Some(effect) = effect {
            self.run(vec![effect]);
        }
    }

    fn refresh(&self) {
        let state = self.machine.borrow().state();
        self.visual.set(state);
    }

    fn run(&self, effects: Vec<VoiceEffect>) {
        let cb = self.callbacks.borrow().clone();
        for effect in effects {
            match effect {
                VoiceEffect::StartCapture => cb.on_capture_start.emit(()),
                VoiceEffect::DiscardCapture => cb.on_capture_end.emit(CaptureOutcome::Discard),
                VoiceEffect::ScheduleCommit {
                    generation,
                    delay_ms,
                } => {
                    let handles = self.clone();
                    let timer = Timeout::new(delay_ms, move || handles.fire_commit(generation));
                    *self.commit_timer.borrow_mut() = Some(timer);
                }
                VoiceEffect::CommitCapture => cb.on_capture_end.emit(CaptureOutcome::Commit),
                VoiceEffect::PositionCommitted(p) => cb.on_position_change.emit(p),
            }
        }
    }
}

#[function_component(VoiceButton)]
pub fn voice_button(props: &VoiceButtonProps) -> Html {
    let machine = use_mut_ref(|| VoiceGesture::new(props.position));
    let position = use_state(|| props.position);
    let visual = use_state(VoiceGestureState::default);
    let subscription = use_mut_ref(|| None::<PointerSubscription>);
    let commit_timer = use_mut_ref(|| None::<Timeout>);
    let callbacks = use_mut_ref(|| VoiceCallbacks::from(props));
    *callbacks.borrow_mut() = VoiceCallbacks::from(props);

    let handles = VoiceHandles {
        machine: machine.clone(),
        position: position.clone(),
        visual: visual.clone(),
        subscription,
        commit_timer,
        callbacks,
    };

    {
        let machine = machine.clone();
        let position = position.clone();
        use_effect_with(props.position, move |committed| {
            if machine.borrow_mut().sync(*committed) {
                position.set(*committed);
            }
            || ()
        });
    }
    // A release already in flight still stops the capture after unmount
    {
        let handles = handles.clone();
        use_effect_with((), move |_| {
            move || {
                handles.release();
                if let Some(timer) = handles.commit_timer.borrow_mut().take() {
                    timer.forget();
                }
            }
        });
    }

    let on_mouse = {
        let h = handles.clone();
        Callback::from(move |e: MouseEvent| h.press(PointerInput::from_mouse(&e), &e))
    };
    let on_touch = {
        let h = handles.clone();
        Callback::from(move |e: TouchEvent| h.press(PointerInput::from_touch(&e), &e))
    };

    let p = *position;
    let state = *visual;
    let (background, scale, cursor) = if state.drag_mode {
        ("rgba(31,111,235,0.8)", "0.9", "move")
    } else if state.pressed {
        ("#da3633", "1.1", "pointer")
    } else {
        ("rgba(33,38,45,0.9)", "1", "pointer")
    };
    let ring = if props.recording && !state.drag_mode {
        "box-shadow:0 0 0 4px rgba(255,255,255,0.2), 0 0 50px rgba(218,54,51,0.6);"
    } else {
        "box-shadow:0 10px 30px rgba(0,0,0,0.5);"
    };
    let label = if state.drag_mode {
        "Positioning..."
    } else {
        "Recording..."
    };
    html! {<div
        onmousedown={on_mouse}
        ontouchstart={on_touch}
        style={format!("position:absolute; z-index:60; left:{}px; top:{}px; touch-action:none; user-select:none;", p.x, p.y)}
    >
        <div style={format!(
            "width:{}px; height:{}px; border-radius:50%; display:flex; align-items:center; justify-content:center; font-size:36px; border:1px solid rgba(255,255,255,0.1); background:{}; transform:scale({}); cursor:{}; transition:all 0.3s ease-out; {}",
            VOICE_BUTTON_SIZE.width, VOICE_BUTTON_SIZE.height, background, scale, cursor, ring
        )}>
            { if state.drag_mode { "✥" } else { "🎤" } }
        </div>
        <div style={format!(
            "position:absolute; bottom:-40px; left:50%; transform:translateX(-50%); font-size:13px; font-weight:bold; white-space:nowrap; padding:6px 12px; border-radius:999px; background:rgba(0,0,0,0.7); opacity:{};",
            if state.pressed { "1" } else { "0" }
        )}>{ label }</div>
    </div>}
}
