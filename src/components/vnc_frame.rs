use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct VncFrameProps {
    pub url: AttrValue,
    /// An overlay gesture is running; the frame must not swallow pointer events.
    pub suspended: bool,
}

/// Inline style of the iframe; a suspended frame ignores the pointer.
fn frame_style(suspended: bool) -> String {
    let (pointer_events, opacity) = if suspended {
        ("none", "0.9")
    } else {
        ("auto", "1")
    };
    format!(
        "width:100%; height:100%; border:none; pointer-events:{}; opacity:{}; transition:opacity 0.3s;",
        pointer_events, opacity
    )
}

#[function_component(VncFrame)]
pub fn vnc_frame(props: &VncFrameProps) -> Html {
    if props.url.is_empty() {
        return html! {<div style="position:absolute; inset:0; display:flex; flex-direction:column; align-items:center; justify-content:center; color:#6e7681;">
            <p style="font-size:20px; margin:0;">{"No VNC URL configured"}</p>
            <p style="font-size:13px; margin-top:8px; opacity:0.6;">{"Use the settings panel to add a URL"}</p>
        </div>};
    }
    html! {<div style="position:absolute; inset:0; z-index:0; background:#000; overflow:hidden;">
        <iframe
            src={props.url.clone()}
            title="VNC Viewer"
            allowfullscreen=true
            style={frame_style(props.suspended)}
        />
    </div>}
}

#[cfg(test)]
mod tests {
    use super::frame_style;

    #[test]
    fn suspended_frame_drops_pointer_events() {
        assert!(frame_style(true).contains("pointer-events:none; opacity:0.9;"));
        assert!(frame_style(false).contains("pointer-events:auto; opacity:1;"));
    }
}
