// localStorage persistence for AppSettings
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::model::{AppSettings, UiMode, VncProfile};
use crate::state::{Position, Size, Viewport};

pub const STORAGE_KEY: &str = "vnc_app_settings_v4";

/// On-disk shape of the settings blob. Every field is optional so partial
/// blobs merge over defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoredSettings {
    panel_position: Position,
    panel_size: Size,
    profiles: Vec<VncProfile>,
    active_profile_id: Option<String>,
    forward_events: bool,
    last_draft: String,
    show_prompt: bool,
    show_voice_control: bool,
    voice_button_position: Position,
}

impl Default for StoredSettings {
    fn default() -> Self {
        StoredSettings::from(&AppSettings::default())
    }
}

impl From<&AppSettings> for StoredSettings {
    fn from(s: &AppSettings) -> Self {
        Self {
            panel_position: s.panel_position,
            panel_size: s.panel_size,
            profiles: s.profiles.clone(),
            active_profile_id: s.active_profile_id.clone(),
            forward_events: s.forward_events,
            last_draft: s.last_draft.clone(),
            show_prompt: s.mode.shows_prompt(),
            show_voice_control: s.mode.shows_voice(),
            voice_button_position: s.voice_button_position,
        }
    }
}

impl From<StoredSettings> for AppSettings {
    fn from(s: StoredSettings) -> Self {
        // voice wins if an old blob has both flags set
        let mode = match (s.show_prompt, s.show_voice_control) {
            (_, true) => UiMode::Voice,
            (true, false) => UiMode::Prompt,
            (false, false) => UiMode::Hidden,
        };
        let mut settings = AppSettings {
            panel_position: s.panel_position,
            panel_size: s.panel_size,
            voice_button_position: s.voice_button_position,
            profiles: s.profiles,
            active_profile_id: s.active_profile_id,
            mode,
            forward_events: s.forward_events,
            last_draft: s.last_draft,
        };
        settings.repair();
        settings
    }
}

pub fn encode(settings: &AppSettings) -> Result<String> {
    Ok(serde_json::to_string(&StoredSettings::from(settings))?)
}

pub fn decode(raw: &str) -> Result<AppSettings> {
    let stored: StoredSettings = serde_json::from_str(raw)?;
    Ok(stored.into())
}

fn local_storage() -> Result<web_sys::Storage> {
    web_sys::window()
        .and_then(|win| win.local_storage().ok().flatten())
        .ok_or(AppError::StorageUnavailable)
}

/// Loads saved settings. Missing or corrupt data yields the defaults for the
/// current viewport.
pub fn load_or_default() -> AppSettings {
    let fallback = || AppSettings::for_viewport(Viewport::current().width);
    let raw = match local_storage().map(|store| store.get_item(STORAGE_KEY)) {
        Ok(Ok(Some(raw))) => raw,
        Ok(Ok(None)) => return fallback(),
        Ok(Err(_)) | Err(_) => {
            tracing::warn!("settings storage unreadable, using defaults");
            return fallback();
        }
    };
    match decode(&raw) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!(%err, "failed to parse settings");
            fallback()
        }
    }
}

pub fn save(settings: &AppSettings) -> Result<()> {
    let raw = encode(settings)?;
    local_storage()?
        .set_item(STORAGE_KEY, &raw)
        .map_err(|_| AppError::StorageWrite {
            key: STORAGE_KEY.into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_blob_merges_over_defaults() {
        let s = decode(r#"{"forwardEvents":true,"panelPosition":{"x":70,"y":90}}"#).unwrap();
        assert!(s.forward_events);
        assert_eq!(s.panel_position, Position::new(70.0, 90.0));
        assert_eq!(s.panel_size, AppSettings::default().panel_size);
        assert_eq!(s.profiles, vec![VncProfile::demo()]);
        assert_eq!(s.mode, UiMode::Prompt);
    }

    #[test]
    fn mode_flags_map_to_single_mode() {
        let voice = decode(r#"{"showPrompt":false,"showVoiceControl":true}"#).unwrap();
        assert_eq!(voice.mode, UiMode::Voice);
        let hidden = decode(r#"{"showPrompt":false,"showVoiceControl":false}"#).unwrap();
        assert_eq!(hidden.mode, UiMode::Hidden);
    }

    #[test]
    fn saved_settings_reload_unchanged() {
        let mut s = AppSettings::default();
        s.mode = UiMode::Hidden;
        s.last_draft = "ls -la".into();
        s.create_profile("42");
        let back = decode(&encode(&s).unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn corrupt_blob_is_an_error() {
        assert!(matches!(decode("{oops"), Err(AppError::CorruptSettings(_))));
    }

    #[test]
    fn empty_profile_list_is_repaired() {
        let s = decode(r#"{"profiles":[],"activeProfileId":null}"#).unwrap();
        assert_eq!(s.profiles.len(), 1);
        assert_eq!(s.active_profile_id.as_deref(), Some("default"));
    }
}
