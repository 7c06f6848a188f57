use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::model::VncProfile;

#[derive(Properties, PartialEq, Clone)]
pub struct SettingsModalProps {
    pub show: bool,
    pub profiles: Vec<VncProfile>,
    pub active_id: Option<String>,
    pub on_close: Callback<()>,
    /// Carries the id for the new profile.
    pub on_create: Callback<String>,
    pub on_save: Callback<VncProfile>,
    pub on_delete: Callback<String>,
    pub on_select: Callback<String>,
}

#[derive(Clone, Debug, PartialEq)]
struct Draft {
    id: String,
    name: String,
    url: String,
}

impl From<&VncProfile> for Draft {
    fn from(p: &VncProfile) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            url: p.url.clone(),
        }
    }
}

fn input_value(e: InputEvent) -> String {
    let el: HtmlInputElement = e.target_unchecked_into();
    el.value()
}

#[function_component]
pub fn SettingsModal(props: &SettingsModalProps) -> Html {
    let editing = use_state(|| None::<Draft>);
    if !props.show {
        return html! {};
    }
    // A draft whose profile is gone (deleted) is dropped
    let draft = (*editing)
        .clone()
        .filter(|d| props.profiles.iter().any(|p| p.id == d.id));

    let close_cb = {
        let cb = props.on_close.clone();
        let editing = editing.clone();
        Callback::from(move |_| {
            editing.set(None);
            cb.emit(());
        })
    };
    let create_cb = {
        let cb = props.on_create.clone();
        let editing = editing.clone();
        Callback::from(move |_| {
            let id = format!("{}", js_sys::Date::now() as u64);
            let profile = VncProfile {
                id: id.clone(),
                name: "New Connection".into(),
                url: String::new(),
            };
            cb.emit(id);
            editing.set(Some(Draft::from(&profile)));
        })
    };

    let rows = props.profiles.iter().map(|profile| {
        let active = props.active_id.as_deref() == Some(profile.id.as_str());
        let edit_cb = {
            let editing = editing.clone();
            let draft = Draft::from(profile);
            Callback::from(move |e: MouseEvent| {
                e.stop_propagation();
                editing.set(Some(draft.clone()));
            })
        };
        let select_cb = {
            let cb = props.on_select.clone();
            let id = profile.id.clone();
            Callback::from(move |e: MouseEvent| {
                e.stop_propagation();
                cb.emit(id.clone());
            })
        };
        let border = if active { "#1f6feb" } else { "transparent" };
        html! {<div key={profile.id.clone()} style={format!("display:flex; justify-content:space-between; align-items:center; gap:8px; padding:8px 10px; border:1px solid {}; border-radius:6px;", border)}>
            <div style="display:flex; flex-direction:column; min-width:0;">
                <span style={format!("font-size:14px; color:{};", if active { "#58a6ff" } else { "#c9d1d9" })}>{ profile.name.clone() }</span>
                <span style="font-size:11px; opacity:0.6; overflow:hidden; text-overflow:ellipsis; white-space:nowrap;">
                    { if profile.url.is_empty() { "No URL".to_string() } else { profile.url.clone() } }
                </span>
            </div>
            <div style="display:flex; gap:4px; flex-shrink:0;">
                <button onclick={edit_cb}>{"Edit"}</button>
                <button onclick={select_cb} disabled={active}>{ if active { "Active" } else { "Use" } }</button>
            </div>
        </div>}
    });

    let body = if let Some(d) = draft {
        let name_cb = {
            let editing = editing.clone();
            let d = d.clone();
            Callback::from(move |e: InputEvent| {
                editing.set(Some(Draft {
                    name: input_value(e),
                    ..d.clone()
                }))
            })
        };
        let url_cb = {
            let editing = editing.clone();
            let d = d.clone();
            Callback::from(move |e: InputEvent| {
                editing.set(Some(Draft {
                    url: input_value(e),
                    ..d.clone()
                }))
            })
        };
        let save_cb = {
            let cb = props.on_save.clone();
            let editing = editing.clone();
            let d = d.clone();
            Callback::from(move |_| {
                cb.emit(VncProfile {
                    id: d.id.clone(),
                    name: d.name.clone(),
                    url: d.url.clone(),
                });
                editing.set(None);
            })
        };
        let delete_cb = {
            let cb = props.on_delete.clone();
            let id = d.id.clone();
            Callback::from(move |_| cb.emit(id.clone()))
        };
        let cancel_cb = {
            let editing = editing.clone();
            Callback::from(move |_| editing.set(None))
        };
        html! {<div style="display:flex; flex-direction:column; gap:12px;">
            <h3 style="margin:0; font-size:16px;">{"Edit Profile"}</h3>
            <label style="display:flex; flex-direction:column; gap:4px; font-size:13px;">
                {"Profile Name"}
                <input type="text" value={d.name.clone()} oninput={name_cb} placeholder="My VNC Server" />
            </label>
            <label style="display:flex; flex-direction:column; gap:4px; font-size:13px;">
                {"VNC URL"}
                <input type="text" value={d.url.clone()} oninput={url_cb} placeholder="https://..." />
            </label>
            <div style="display:flex; gap:8px; justify-content:space-between; flex-wrap:wrap;">
                <button onclick={delete_cb} style="background:#f85149; border:1px solid #b62324; color:#fff;">{"Delete Profile"}</button>
                <div style="display:flex; gap:8px;">
                    <button onclick={cancel_cb}>{"Cancel"}</button>
                    <button onclick={save_cb} style="background:#1f6feb; color:#fff;">{"Save"}</button>
                </div>
            </div>
        </div>}
    } else {
        let active = props
            .active_id
            .as_deref()
            .and_then(|id| props.profiles.iter().find(|p| p.id == id))
            .or_else(|| props.profiles.first());
        let (name, url) = active
            .map(|p| (p.name.clone(), p.url.clone()))
            .unwrap_or_default();
        html! {<div style="display:flex; flex-direction:column; gap:8px; font-size:13px;">
            <p style="margin:0; opacity:0.7;">{"Select a profile to edit"}</p>
            <h4 style="margin:8px 0 0 0;">{"Current Active Configuration"}</h4>
            <div>{"Name: "}{ name }</div>
            <div style="overflow:hidden; text-overflow:ellipsis; white-space:nowrap;">{"URL: "}{ if url.is_empty() { "None".to_string() } else { url } }</div>
        </div>}
    };

    let stop = Callback::from(|e: MouseEvent| e.stop_propagation());
    html! {<div onclick={close_cb.clone()} style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.8); z-index:100;">
        <div onclick={stop} style="background:#161b22; border:1px solid #30363d; border-radius:12px; padding:16px 20px; width:min(820px, 94vw); max-height:90vh; overflow:auto; display:flex; flex-direction:column; gap:14px;">
            <div style="display:flex; justify-content:space-between; align-items:center;">
                <h3 style="margin:0; font-size:18px;">{"Settings"}</h3>
                <button onclick={close_cb} style="padding:4px 8px;">{"Close"}</button>
            </div>
            <div style="display:flex; gap:16px; flex-wrap:wrap;">
                <div style="flex:1 1 240px; display:flex; flex-direction:column; gap:6px;">
                    <div style="display:flex; justify-content:space-between; align-items:center;">
                        <strong>{"Profiles"}</strong>
                        <button onclick={create_cb}>{"+ New"}</button>
                    </div>
                    { for rows }
                </div>
                <div style="flex:2 1 320px;">{ body }</div>
            </div>
        </div>
    </div>}
}
