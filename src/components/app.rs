use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, KeyboardEvent};
use yew::prelude::*;

use super::{
    floating_panel::FloatingPanel,
    mode_toolbar::ModeToolbar,
    prompt_form::PromptForm,
    settings_modal::SettingsModal,
    vnc_frame::VncFrame,
    voice_button::{CaptureOutcome, VoiceButton},
};
use crate::listeners::EventSubscription;
use crate::model::{
    AppSettings, KeyEventKind, SettingsAction, SystemEvent, VncProfile, VoiceTarget,
    append_transcript,
};
use crate::services::speech::{SpeechCapture, SpeechHandlers};
use crate::services::{storage, transport};
use crate::state::{DraftSaver, Geometry, Position, SubmitGate};

/// Sends commands through the busy gate.
#[derive(Clone)]
struct CommandSender {
    gate: Rc<RefCell<SubmitGate>>,
    redraw: UseForceUpdateHandle,
}

impl CommandSender {
    fn is_busy(&self) -> bool {
        self.gate.borrow().is_busy()
    }

    /// Returns false when nothing was sent.
    fn send(&self, text: &str) -> bool {
        let Some(command) = self.gate.borrow_mut().try_begin(text) else {
            return false;
        };
        self.redraw.force_update();
        let gate = self.gate.clone();
        let redraw = self.redraw.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = transport::send_command(&command).await;
            match &outcome {
                Ok(receipt) => tracing::info!(message = %receipt.message, "command delivered"),
                Err(err) => tracing::error!(%err, "command failed"),
            }
            gate.borrow_mut().settle(&outcome);
            redraw.force_update();
        });
        true
    }
}

/// Draft text with a synchronous mirror for handlers that outlive a render.
/// Edits are persisted once typing pauses.
#[derive(Clone)]
struct DraftHandle {
    text: UseStateHandle<String>,
    latest: Rc<RefCell<String>>,
    saver: Rc<RefCell<DraftSaver>>,
    save_timer: Rc<RefCell<Option<Timeout>>>,
    settings: UseReducerDispatcher<AppSettings>,
}

impl DraftHandle {
    fn get(&self) -> String {
        self.latest.borrow().clone()
    }

    fn set(&self, value: String) {
        let timer = self.saver.borrow_mut().edit(&value);
        // dropping the handle clears the browser timer
        drop(self.save_timer.borrow_mut().take());
        if let Some(timer) = timer {
            let handle = self.clone();
            *self.save_timer.borrow_mut() = Some(Timeout::new(timer.delay_ms, move || {
                handle.fire_save(timer.generation)
            }));
        }
        *self.latest.borrow_mut() = value.clone();
        self.text.set(value);
    }

    fn fire_save(&self, generation: u64) {
        let text = self.saver.borrow_mut().fire(generation);
        if let Some(text) = text {
            self.settings.dispatch(SettingsAction::SaveDraft(text));
        }
    }
}

fn is_text_entry(event: &Event) -> bool {
    event
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .map(|el| matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA"))
        .unwrap_or(false)
}

fn alert(message: &str) {
    if let Some(win) = web_sys::window() {
        let _ = win.alert_with_message(message);
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let settings = use_reducer(storage::load_or_default);
    let draft = DraftHandle {
        text: use_state(|| settings.last_draft.clone()),
        latest: use_mut_ref(|| settings.last_draft.clone()),
        saver: use_mut_ref(|| DraftSaver::new(settings.last_draft.clone())),
        save_timer: use_mut_ref(|| None::<Timeout>),
        settings: settings.dispatcher(),
    };
    let interacting = use_state(|| false);
    let show_settings = use_state(|| false);
    let sender = CommandSender {
        gate: use_mut_ref(SubmitGate::default),
        redraw: use_force_update(),
    };
    let speech = use_mut_ref(|| None::<SpeechCapture>);
    let speech_available = use_state(|| false);
    let listening = use_state(|| false);
    let voice_target = use_mut_ref(VoiceTarget::default);

    // Persist every settings change
    use_effect_with((*settings).clone(), |current| {
        if let Err(err) = storage::save(current) {
            tracing::error!(%err, "failed to save settings");
        }
        || ()
    });
    // Speech recognition, if the browser has it
    {
        let speech = speech.clone();
        let speech_available = speech_available.clone();
        let listening = listening.clone();
        let voice_target = voice_target.clone();
        let draft = draft.clone();
        let sender = sender.clone();
        use_effect_with((), move |_| {
            let handlers = SpeechHandlers {
                on_listening: Callback::from(move |on: bool| listening.set(on)),
                on_transcript: Callback::from(move |transcript: String| {
                    let target = *voice_target.borrow();
                    match target {
                        VoiceTarget::AppendToDraft => {
                            draft.set(append_transcript(&draft.get(), &transcript))
                        }
                        VoiceTarget::SendDirect => {
                            if !sender.send(&transcript) {
                                tracing::warn!(%transcript, "voice command dropped: a send is still in flight");
                            }
                        }
                    }
                }),
            };
            match SpeechCapture::attach(handlers) {
                Ok(capture) => {
                    *speech.borrow_mut() = Some(capture);
                    speech_available.set(true);
                }
                Err(err) => tracing::info!(%err, "voice input disabled"),
            }
            move || drop(speech.borrow_mut().take())
        });
    }
    // Keystroke forwarding
    use_effect_with(settings.forward_events, |enabled| {
        let subscription = if *enabled {
            EventSubscription::window(&["keydown"], |event: Event| {
                if is_text_entry(&event) {
                    return;
                }
                if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
                    transport::send_system_event(&SystemEvent::from_keyboard(
                        KeyEventKind::Keydown,
                        key,
                    ));
                }
            })
        } else {
            None
        };
        move || drop(subscription)
    });

    let start_capture = {
        let speech = speech.clone();
        let voice_target = voice_target.clone();
        move |target: VoiceTarget| {
            *voice_target.borrow_mut() = target;
            if let Some(capture) = speech.borrow().as_ref() {
                if let Err(err) = capture.start() {
                    tracing::warn!(%err, "could not start speech recognition");
                }
            }
        }
    };
    let end_capture = {
        let speech = speech.clone();
        move |outcome: CaptureOutcome| {
            let speech = speech.borrow();
            let Some(capture) = speech.as_ref() else {
                return;
            };
            let result = match outcome {
                CaptureOutcome::Commit => capture.stop(),
                CaptureOutcome::Discard => capture.abort(),
            };
            if let Err(err) = result {
                tracing::warn!(%err, ?outcome, "could not end speech recognition");
            }
        }
    };

    let on_interaction_start = {
        let interacting = interacting.clone();
        Callback::from(move |_| interacting.set(true))
    };
    let on_interaction_end = {
        let interacting = interacting.clone();
        Callback::from(move |_| interacting.set(false))
    };
    let on_panel_change = {
        let settings = settings.clone();
        Callback::from(move |g: Geometry| settings.dispatch(SettingsAction::CommitPanel(g)))
    };
    let on_voice_position = {
        let settings = settings.clone();
        Callback::from(move |p: Position| {
            settings.dispatch(SettingsAction::CommitVoiceButton(p))
        })
    };
    let on_capture_start = {
        let start_capture = start_capture.clone();
        Callback::from(move |_| start_capture(VoiceTarget::SendDirect))
    };
    let on_capture_end = {
        let end_capture = end_capture.clone();
        Callback::from(move |outcome: CaptureOutcome| end_capture(outcome))
    };
    let on_toggle_dictation = {
        let listening = listening.clone();
        let voice_target = voice_target.clone();
        Callback::from(move |_| {
            let dictating = *listening && *voice_target.borrow() == VoiceTarget::AppendToDraft;
            if dictating {
                end_capture(CaptureOutcome::Commit);
            } else {
                start_capture(VoiceTarget::AppendToDraft);
            }
        })
    };
    let on_input = {
        let draft = draft.clone();
        Callback::from(move |text: String| draft.set(text))
    };
    let on_submit = {
        let draft = draft.clone();
        let sender = sender.clone();
        Callback::from(move |_| {
            if sender.send(&draft.get()) {
                draft.set(String::new());
            }
        })
    };

    let dispatch = |action: SettingsAction| {
        let settings = settings.clone();
        Callback::from(move |_: ()| settings.dispatch(action.clone()))
    };
    let dispatch_click = |action: SettingsAction| {
        let settings = settings.clone();
        Callback::from(move |_: MouseEvent| settings.dispatch(action.clone()))
    };
    let open_settings = {
        let show_settings = show_settings.clone();
        Callback::from(move |_| show_settings.set(true))
    };
    let close_settings = {
        let show_settings = show_settings.clone();
        Callback::from(move |_| show_settings.set(false))
    };
    let on_create_profile = {
        let settings = settings.clone();
        Callback::from(move |id: String| settings.dispatch(SettingsAction::CreateProfile { id }))
    };
    let on_save_profile = {
        let settings = settings.clone();
        Callback::from(move |p: VncProfile| {
            settings.dispatch(SettingsAction::UpdateProfile {
                id: p.id,
                name: p.name,
                url: p.url,
            })
        })
    };
    let on_delete_profile = {
        let settings = settings.clone();
        Callback::from(move |id: String| {
            let mut probe: AppSettings = (*settings).clone();
            match probe.delete_profile(&id) {
                Ok(()) => settings.dispatch(SettingsAction::DeleteProfile { id }),
                Err(err) if err.is_user_visible() => alert(&err.to_string()),
                Err(err) => tracing::warn!(%err, "profile not deleted"),
            }
        })
    };
    let on_select_profile = {
        let settings = settings.clone();
        Callback::from(move |id: String| settings.dispatch(SettingsAction::SelectProfile { id }))
    };

    let (title, url) = settings
        .active_profile()
        .map(|p| (p.name.clone(), p.url.clone()))
        .unwrap_or_default();
    let voice_on = settings.mode.shows_voice();
    let dictating = *listening && *voice_target.borrow() == VoiceTarget::AppendToDraft;
    let forward_style = if settings.forward_events {
        "background:#238636; color:#fff;"
    } else {
        ""
    };
    let header_actions = html! {<>
        <button onclick={dispatch_click(SettingsAction::ToggleVoice)} title="Voice Control" style={format!("padding:6px 8px; {}", if voice_on { "background:#da3633; color:#fff;" } else { "" })}>{"🎤"}</button>
        <button onclick={dispatch_click(SettingsAction::ToggleForwarding)} title="Forward keystrokes" style={format!("padding:6px 8px; {}", forward_style)}>{"⌨"}</button>
        <button onclick={open_settings} title="Settings" style="padding:6px 8px;">{"⚙"}</button>
    </>};

    html! {<div style="position:fixed; inset:0; overflow:hidden; background:#000; color:#c9d1d9; font-family:system-ui, sans-serif;">
        <VncFrame url={AttrValue::from(url)} suspended={*interacting} />
        if settings.mode.shows_prompt() {
            <FloatingPanel
                title={AttrValue::from(title)}
                geometry={settings.panel_geometry()}
                on_interaction_start={on_interaction_start}
                on_interaction_end={on_interaction_end}
                on_change={on_panel_change}
                on_close={Some(dispatch(SettingsAction::ClosePrompt))}
                header_actions={header_actions}
            >
                <PromptForm
                    text={AttrValue::from((*draft.text).clone())}
                    busy={sender.is_busy()}
                    on_input={on_input}
                    on_submit={on_submit}
                    speech_available={*speech_available}
                    dictating={dictating}
                    on_toggle_dictation={on_toggle_dictation}
                />
            </FloatingPanel>
        } else {
            <ModeToolbar
                voice_active={voice_on}
                on_toggle_voice={dispatch(SettingsAction::ToggleVoice)}
                on_show_prompt={dispatch(SettingsAction::ShowPrompt)}
            />
        }
        if voice_on {
            <VoiceButton
                position={settings.voice_button_position}
                on_position_change={on_voice_position}
                on_capture_start={on_capture_start}
                on_capture_end={on_capture_end}
                recording={*listening && *voice_target.borrow() == VoiceTarget::SendDirect}
            />
        }
        <SettingsModal
            show={*show_settings}
            profiles={settings.profiles.clone()}
            active_id={settings.active_profile().map(|p| p.id.clone())}
            on_close={close_settings}
            on_create={on_create_profile}
            on_save={on_save_profile}
            on_delete={on_delete_profile}
            on_select={on_select_profile}
        />
    </div>}
}
