use std::cell::RefCell;
use std::rc::Rc;

use web_sys::Event;
use yew::prelude::*;

use crate::listeners::PointerSubscription;
use crate::state::{Geometry, GestureMode, PANEL_MIN_SIZE, PanelGesture, PointerInput, Size, Viewport};

#[derive(Properties, PartialEq, Clone)]
pub struct FloatingPanelProps {
    pub title: AttrValue,
    /// Committed geometry. The panel adopts changes to it while idle.
    pub geometry: Geometry,
    #[prop_or(PANEL_MIN_SIZE)]
    pub min_size: Size,
    pub on_interaction_start: Callback<()>,
    pub on_interaction_end: Callback<()>,
    /// Fires once per drag/resize, when it ends.
    pub on_change: Callback<Geometry>,
    #[prop_or_default]
    pub on_close: Option<Callback<()>>,
    #[prop_or_default]
    pub header_actions: Html,
    #[prop_or_default]
    pub children: Html,
}

#[derive(Clone)]
struct PanelCallbacks {
    on_interaction_start: Callback<()>,
    on_interaction_end: Callback<()>,
    on_change: Callback<Geometry>,
}

impl From<&FloatingPanelProps> for PanelCallbacks {
    fn from(props: &FloatingPanelProps) -> Self {
        Self {
            on_interaction_start: props.on_interaction_start.clone(),
            on_interaction_end: props.on_interaction_end.clone(),
            on_change: props.on_change.clone(),
        }
    }
}

#[derive(Clone)]
struct PanelHandles {
    gesture: Rc<RefCell<PanelGesture>>,
    geometry: UseStateHandle<Geometry>,
    mode: UseStateHandle<Option<GestureMode>>,
    subscription: Rc<RefCell<Option<PointerSubscription>>>,
    callbacks: Rc<RefCell<PanelCallbacks>>,
}

impl PanelHandles {
    fn begin(&self, mode: GestureMode, input: PointerInput, event: &Event) {
        let started = {
            let mut gesture = self.gesture.borrow_mut();
            match mode {
                GestureMode::Dragging => gesture.begin_drag(&input),
                GestureMode::Resizing => gesture.begin_resize(&input),
                GestureMode::Pressing => None,
            }
        };
        let Some(start) = started else {
            return;
        };
        if start.prevent_default {
            event.prevent_default();
        }
        tracing::debug!(mode = ?start.mode, "panel gesture started");
        self.refresh_mode();
        let on_start = self.callbacks.borrow().on_interaction_start.clone();
        on_start.emit(());

        let moving = self.clone();
        let ending = self.clone();
        let subscription = PointerSubscription::acquire(
            move |e: Event| moving.pointer_move(&e),
            move |_e: Event| ending.finish(),
        );
        if subscription.is_none() {
            tracing::warn!("no window to listen on, ending panel gesture");
            self.finish();
            return;
        }
        *self.subscription.borrow_mut() = subscription;
    }

    fn pointer_move(&self, event: &Event) {
        let input = PointerInput::from_event(event);
        let step = self
            .gesture
            .borrow_mut()
            .pointer_move(&input, Viewport::current());
        if let Some(step) = step {
            if step.prevent_default {
                event.prevent_default();
            }
            self.geometry.set(step.geometry);
        }
    }

    fn refresh_mode(&self) {
        let mode = self.gesture.borrow().mode();
        self.mode.set(mode);
    }

    /// Ends the session if one is open. Safe to call repeatedly.
    fn finish(&self) {
        let committed = self.gesture.borrow_mut().end();
        let subscription = self.subscription.borrow_mut().take();
        drop(subscription);
        let Some(geometry) = committed else {
            return;
        };
        self.refresh_mode();
        let (on_end, on_change) = {
            let cb = self.callbacks.borrow();
            (cb.on_interaction_end.clone(), cb.on_change.clone())
        };
        on_end.emit(());
        on_change.emit(geometry);
    }
}

#[function_component(FloatingPanel)]
pub fn floating_panel(props: &FloatingPanelProps) -> Html {
    let gesture = use_mut_ref(|| PanelGesture::new(props.geometry, props.min_size));
    let geometry = use_state(|| props.geometry);
    let mode = use_state(|| None::<GestureMode>);
    let subscription = use_mut_ref(|| None::<PointerSubscription>);
    let callbacks = use_mut_ref(|| PanelCallbacks::from(props));
    *callbacks.borrow_mut() = PanelCallbacks::from(props);

    let handles = PanelHandles {
        gesture: gesture.clone(),
        geometry: geometry.clone(),
        mode: mode.clone(),
        subscription,
        callbacks,
    };

    // Adopt committed geometry from the coordinator
    {
        let gesture = gesture.clone();
        let geometry = geometry.clone();
        use_effect_with((props.geometry, props.min_size), move |(committed, min)| {
            if gesture.borrow_mut().sync(*committed, *min) {
                geometry.set(*committed);
            }
            || ()
        });
    }
    // End an interrupted session on unmount so the frame is not left suspended
    {
        let handles = handles.clone();
        use_effect_with((), move |_| move || handles.finish());
    }

    let drag_mouse = {
        let h = handles.clone();
        Callback::from(move |e: MouseEvent| {
            h.begin(GestureMode::Dragging, PointerInput::from_mouse(&e), &e)
        })
    };
    let drag_touch = {
        let h = handles.clone();
        Callback::from(move |e: TouchEvent| {
            h.begin(GestureMode::Dragging, PointerInput::from_touch(&e), &e)
        })
    };
    let resize_mouse = {
        let h = handles.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            h.begin(GestureMode::Resizing, PointerInput::from_mouse(&e), &e)
        })
    };
    let resize_touch = {
        let h = handles.clone();
        Callback::from(move |e: TouchEvent| {
            e.stop_propagation();
            h.begin(GestureMode::Resizing, PointerInput::from_touch(&e), &e)
        })
    };
    let close_button = props.on_close.clone().map(|cb| {
        let onclick = Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            cb.emit(());
        });
        html! { <button {onclick} title="Close Panel" style="padding:6px 8px; margin-left:4px;">{"✕"}</button> }
    });

    let g = *geometry;
    let header_cursor = if *mode == Some(GestureMode::Dragging) {
        "grabbing"
    } else {
        "move"
    };
    html! {<div style={format!(
        "position:absolute; z-index:50; left:{}px; top:{}px; width:{}px; height:{}px; display:flex; flex-direction:column; background:rgba(13,17,23,0.95); border:1px solid #30363d; border-radius:8px; overflow:hidden; touch-action:none; box-shadow:0 25px 50px -12px rgba(0,0,0,0.5);",
        g.position.x, g.position.y, g.size.width, g.size.height
    )}>
        <div
            onmousedown={drag_mouse}
            ontouchstart={drag_touch}
            style={format!("height:56px; flex-shrink:0; display:flex; align-items:center; justify-content:space-between; padding:0 12px; background:#161b22; border-bottom:1px solid #30363d; cursor:{}; user-select:none; touch-action:none;", header_cursor)}
        >
            <span style="font-size:14px; white-space:nowrap; overflow:hidden; text-overflow:ellipsis; margin-right:8px;">{ props.title.clone() }</span>
            <div style="display:flex; align-items:center; gap:6px; flex-shrink:0;">
                { props.header_actions.clone() }
                { close_button.unwrap_or_default() }
            </div>
        </div>
        <div style="flex:1; position:relative; overflow:hidden; display:flex; flex-direction:column;">
            { props.children.clone() }
        </div>
        <div
            onmousedown={resize_mouse}
            ontouchstart={resize_touch}
            style="position:absolute; right:0; bottom:0; width:32px; height:32px; cursor:se-resize; touch-action:none; display:flex; align-items:flex-end; justify-content:flex-end; padding:4px; box-sizing:border-box; color:#6e7681;"
        >{"◢"}</div>
    </div>}
}
