use yew::prelude::*;

/// Shown while the prompt panel is closed: switch to voice or back to the prompt.
#[derive(Properties, PartialEq, Clone)]
pub struct ModeToolbarProps {
    pub voice_active: bool,
    pub on_toggle_voice: Callback<()>,
    pub on_show_prompt: Callback<()>,
}

#[function_component(ModeToolbar)]
pub fn mode_toolbar(props: &ModeToolbarProps) -> Html {
    let voice_cb = {
        let cb = props.on_toggle_voice.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let prompt_cb = {
        let cb = props.on_show_prompt.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let voice_style = if props.voice_active {
        "background:#da3633; color:#fff;"
    } else {
        "background:#21262d; color:#c9d1d9;"
    };
    html! {<div style="position:absolute; top:16px; right:16px; z-index:40; display:flex; gap:8px;">
        <button onclick={voice_cb} style={format!("padding:8px 16px; border:none; border-radius:999px; {}", voice_style)}>{"🎤 Voice"}</button>
        <button onclick={prompt_cb} style="padding:8px 16px; border:none; border-radius:999px; background:#1f6feb; color:#fff;">{"Prompt"}</button>
    </div>}
}
