use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct PromptFormProps {
    pub text: AttrValue,
    pub busy: bool,
    pub on_input: Callback<String>,
    pub on_submit: Callback<()>,
    /// Dictation into the draft; hidden when speech is unsupported.
    pub speech_available: bool,
    pub dictating: bool,
    pub on_toggle_dictation: Callback<()>,
}

#[function_component(PromptForm)]
pub fn prompt_form(props: &PromptFormProps) -> Html {
    let oninput = {
        let cb = props.on_input.clone();
        Callback::from(move |e: InputEvent| {
            let el: HtmlTextAreaElement = e.target_unchecked_into();
            cb.emit(el.value());
        })
    };
    let onkeydown = {
        let cb = props.on_submit.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" && !e.shift_key() {
                e.prevent_default();
                cb.emit(());
            }
        })
    };
    let onsubmit = {
        let cb = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            cb.emit(());
        })
    };
    let dictate = {
        let cb = props.on_toggle_dictation.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let send_disabled = props.busy || props.text.trim().is_empty();
    html! {<form {onsubmit} style="position:relative; height:100%; display:flex; flex-direction:column; padding:16px; box-sizing:border-box;">
        <textarea
            value={props.text.clone()}
            {oninput}
            {onkeydown}
            disabled={props.busy}
            placeholder="Type a command to send to VNC..."
            style="flex:1; width:100%; box-sizing:border-box; resize:none; background:rgba(0,0,0,0.5); color:#e6edf3; border:1px solid #30363d; border-radius:8px; padding:12px 64px 12px 12px; font-size:16px;"
        />
        <div style="position:absolute; right:24px; bottom:24px; display:flex; gap:8px;">
            if props.speech_available {
                <button type="button" onclick={dictate} title="Dictate into the prompt" style={format!("padding:6px 10px; {}", if props.dictating { "background:#da3633; color:#fff;" } else { "" })}>{"🎤"}</button>
            }
            <button type="submit" disabled={send_disabled} style="padding:6px 10px; background:#1f6feb; color:#fff; border:none; border-radius:6px;">{"Send"}</button>
        </div>
    </form>}
}
