// Browser speech recognition behind start/stop/abort
use std::cell::Cell;
use std::rc::Rc;

use js_sys::{Function, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use yew::Callback;

use crate::error::{AppError, Result};

const CONSTRUCTORS: [&str; 2] = ["SpeechRecognition", "webkitSpeechRecognition"];
const LANG: &str = "en-US";

/// One entry of a recognition result list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultChunk {
    pub is_final: bool,
    pub transcript: String,
}

/// Concatenation of the final chunks; interim ones are skipped.
pub fn final_transcript(chunks: &[ResultChunk]) -> String {
    chunks
        .iter()
        .filter(|c| c.is_final)
        .map(|c| c.transcript.as_str())
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpeechErrorKind {
    PermissionDenied,
    Other(String),
}

impl SpeechErrorKind {
    pub fn from_code(code: &str) -> Self {
        match code {
            "not-allowed" | "service-not-allowed" => Self::PermissionDenied,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether the capture is known to be dead after this error.
    pub fn resets_listening(&self) -> bool {
        matches!(self, Self::PermissionDenied)
    }
}

/// A `start()` that raced an already running session.
pub fn is_already_started(name: &str, message: &str) -> bool {
    name == "InvalidStateError" || message.contains("started")
}

pub struct SpeechHandlers {
    pub on_listening: Callback<bool>,
    pub on_transcript: Callback<String>,
}

pub struct SpeechCapture {
    recognition: JsValue,
    listening: Rc<Cell<bool>>,
    _on_start: Closure<dyn FnMut()>,
    _on_end: Closure<dyn FnMut()>,
    _on_result: Closure<dyn FnMut(JsValue)>,
    _on_error: Closure<dyn FnMut(JsValue)>,
}

impl SpeechCapture {
    /// Builds a recognizer if the browser has one.
    pub fn attach(handlers: SpeechHandlers) -> Result<Self> {
        let window = web_sys::window().ok_or(AppError::SpeechUnsupported)?;
        let ctor = CONSTRUCTORS
            .iter()
            .filter_map(|name| Reflect::get(&window, &JsValue::from_str(name)).ok())
            .find_map(|v| v.dyn_into::<Function>().ok())
            .ok_or(AppError::SpeechUnsupported)?;
        let recognition = Reflect::construct(&ctor, &js_sys::Array::new())
            .map_err(|e| AppError::speech(describe(&e)))?;

        set(&recognition, "continuous", &JsValue::FALSE)?;
        set(&recognition, "interimResults", &JsValue::TRUE)?;
        set(&recognition, "lang", &JsValue::from_str(LANG))?;

        let listening = Rc::new(Cell::new(false));
        let on_start = {
            let listening = listening.clone();
            let cb = handlers.on_listening.clone();
            Closure::wrap(Box::new(move || {
                listening.set(true);
                cb.emit(true);
            }) as Box<dyn FnMut()>)
        };
        let on_end = {
            let listening = listening.clone();
            let cb = handlers.on_listening.clone();
            Closure::wrap(Box::new(move || {
                listening.set(false);
                cb.emit(false);
            }) as Box<dyn FnMut()>)
        };
        let on_result = {
            let cb = handlers.on_transcript.clone();
            Closure::wrap(Box::new(move |event: JsValue| {
                let text = final_transcript(&read_chunks(&event));
                if !text.is_empty() {
                    cb.emit(text);
                }
            }) as Box<dyn FnMut(JsValue)>)
        };
        let on_error = {
            let listening = listening.clone();
            let cb = handlers.on_listening;
            Closure::wrap(Box::new(move |event: JsValue| {
                let code = get_string(&event, "error");
                let kind = SpeechErrorKind::from_code(&code);
                tracing::error!(error = %code, "speech recognition error");
                if kind.resets_listening() {
                    listening.set(false);
                    cb.emit(false);
                }
            }) as Box<dyn FnMut(JsValue)>)
        };

        set(&recognition, "onstart", on_start.as_ref())?;
        set(&recognition, "onend", on_end.as_ref())?;
        set(&recognition, "onresult", on_result.as_ref())?;
        set(&recognition, "onerror", on_error.as_ref())?;

        Ok(Self {
            recognition,
            listening,
            _on_start: on_start,
            _on_end: on_end,
            _on_result: on_result,
            _on_error: on_error,
        })
    }

    pub fn is_listening(&self) -> bool {
        self.listening.get()
    }

    /// Starts listening. Already listening is fine and does nothing.
    pub fn start(&self) -> Result<()> {
        if self.is_listening() {
            return Ok(());
        }
        match self.call("start") {
            Ok(()) => Ok(()),
            Err(err) => {
                let name = get_string(&err, "name");
                let message = get_string(&err, "message");
                if is_already_started(&name, &message) {
                    tracing::info!("speech recognition already active");
                    Ok(())
                } else {
                    Err(AppError::speech(describe(&err)))
                }
            }
        }
    }

    /// Stops listening and lets the final result through. Also cancels a
    /// start that has not reported back yet.
    pub fn stop(&self) -> Result<()> {
        self.call("stop").map_err(|e| AppError::speech(describe(&e)))
    }

    /// Stops listening and drops anything recognized so far.
    pub fn abort(&self) -> Result<()> {
        self.call("abort").map_err(|e| AppError::speech(describe(&e)))
    }

    fn call(&self, method: &str) -> std::result::Result<(), JsValue> {
        let f: Function = Reflect::get(&self.recognition, &JsValue::from_str(method))?.dyn_into()?;
        f.call0(&self.recognition).map(|_| ())
    }
}

impl Drop for SpeechCapture {
    fn drop(&mut self) {
        for handler in ["onstart", "onend", "onresult", "onerror"] {
            let _ = set(&self.recognition, handler, &JsValue::NULL);
        }
        if self.is_listening() {
            let _ = self.call("abort");
        }
    }
}

fn set(target: &JsValue, key: &str, value: &JsValue) -> Result<()> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|e| AppError::speech(describe(&e)))
}

fn get_string(target: &JsValue, key: &str) -> String {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default()
}

fn describe(err: &JsValue) -> String {
    let message = get_string(err, "message");
    if message.is_empty() {
        format!("{err:?}")
    } else {
        message
    }
}

/// Reads `event.results[resultIndex..]` into plain chunks.
fn read_chunks(event: &JsValue) -> Vec<ResultChunk> {
    let start = Reflect::get(event, &JsValue::from_str("resultIndex"))
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0) as u32;
    let Ok(results) = Reflect::get(event, &JsValue::from_str("results")) else {
        return Vec::new();
    };
    let len = Reflect::get(&results, &JsValue::from_str("length"))
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0) as u32;
    (start..len)
        .filter_map(|i| Reflect::get_u32(&results, i).ok())
        .map(|result| {
            let is_final = Reflect::get(&result, &JsValue::from_str("isFinal"))
                .ok()
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            let transcript = Reflect::get_u32(&result, 0)
                .map(|alt| get_string(&alt, "transcript"))
                .unwrap_or_default();
            ResultChunk {
                is_final,
                transcript,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(is_final: bool, text: &str) -> ResultChunk {
        ResultChunk {
            is_final,
            transcript: text.into(),
        }
    }

    #[test]
    fn only_final_chunks_are_kept() {
        let chunks = [chunk(true, "open "), chunk(false, "brow"), chunk(true, "browser")];
        assert_eq!(final_transcript(&chunks), "open browser");
        assert_eq!(final_transcript(&[chunk(false, "interim")]), "");
    }

    #[test]
    fn permission_errors_reset_listening() {
        assert!(SpeechErrorKind::from_code("not-allowed").resets_listening());
        assert!(SpeechErrorKind::from_code("service-not-allowed").resets_listening());
        let net = SpeechErrorKind::from_code("network");
        assert_eq!(net, SpeechErrorKind::Other("network".into()));
        assert!(!net.resets_listening());
    }

    #[test]
    fn start_race_is_recognized() {
        assert!(is_already_started("InvalidStateError", ""));
        assert!(is_already_started("Error", "recognition has already started"));
        assert!(!is_already_started("NotAllowedError", "denied"));
    }
}
