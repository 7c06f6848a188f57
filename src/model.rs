//! Settings and profile data owned by the overlay coordinator.
//! `AppSettings` is only ever changed through [`SettingsAction`].

use serde::{Deserialize, Serialize};
use std::rc::Rc;
use yew::Reducible;

use crate::error::{AppError, Result};
use crate::state::{Geometry, Position, Size};

/// Viewports narrower than this get the compact default layout.
pub const NARROW_VIEWPORT_PX: f64 = 768.0;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VncProfile {
    pub id: String,
    pub name: String,
    pub url: String,
}

impl VncProfile {
    pub fn demo() -> Self {
        Self {
            id: "default".into(),
            name: "Demo NoVNC".into(),
            url: "https://novnc.com/noVNC/vnc.html".into(),
        }
    }
}

/// Which overlay is on screen. The prompt panel and the voice button are
/// never shown together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UiMode {
    #[default]
    Prompt,
    Voice,
    Hidden,
}

impl UiMode {
    pub fn toggle_voice(self) -> Self {
        match self {
            UiMode::Voice => UiMode::Prompt,
            UiMode::Prompt | UiMode::Hidden => UiMode::Voice,
        }
    }

    pub fn close_prompt(self) -> Self {
        match self {
            UiMode::Prompt => UiMode::Hidden,
            other => other,
        }
    }

    pub fn shows_prompt(self) -> bool {
        self == UiMode::Prompt
    }

    pub fn shows_voice(self) -> bool {
        self == UiMode::Voice
    }
}

/// Where a finished transcript goes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VoiceTarget {
    #[default]
    AppendToDraft,
    SendDirect,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppSettings {
    pub panel_position: Position,
    pub panel_size: Size,
    pub voice_button_position: Position,
    pub profiles: Vec<VncProfile>,
    pub active_profile_id: Option<String>,
    pub mode: UiMode,
    pub forward_events: bool,
    pub last_draft: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        let profile = VncProfile::demo();
        Self {
            panel_position: Position::new(20.0, 20.0),
            panel_size: Size::new(450.0, 280.0),
            voice_button_position: Position::new(40.0, 200.0),
            active_profile_id: Some(profile.id.clone()),
            profiles: vec![profile],
            mode: UiMode::Prompt,
            forward_events: false,
            last_draft: String::new(),
        }
    }
}

impl AppSettings {
    /// Defaults sized for a viewport `width` pixels wide.
    pub fn for_viewport(width: f64) -> Self {
        let mut settings = Self::default();
        if width < NARROW_VIEWPORT_PX {
            settings.panel_position = Position::new(10.0, 10.0);
            settings.panel_size = Size::new((width - 20.0).max(0.0), 250.0);
            settings.voice_button_position = Position::new(20.0, 150.0);
        }
        settings
    }

    pub fn panel_geometry(&self) -> Geometry {
        Geometry::new(self.panel_position, self.panel_size)
    }

    /// The selected profile, falling back to the first one.
    pub fn active_profile(&self) -> Option<&VncProfile> {
        self.active_profile_id
            .as_deref()
            .and_then(|id| self.profile(id))
            .or_else(|| self.profiles.first())
    }

    pub fn profile(&self, id: &str) -> Option<&VncProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// Restores the profile invariants after loading untrusted data.
    pub fn repair(&mut self) {
        if self.profiles.is_empty() {
            tracing::warn!("settings had no profiles, restoring the demo profile");
            self.profiles.push(VncProfile::demo());
        }
        let active_ok = self
            .active_profile_id
            .as_deref()
            .is_some_and(|id| self.profile(id).is_some());
        if !active_ok {
            self.active_profile_id = self.profiles.first().map(|p| p.id.clone());
        }
    }

    pub fn create_profile(&mut self, id: impl Into<String>) -> &VncProfile {
        self.profiles.push(VncProfile {
            id: id.into(),
            name: "New Connection".into(),
            url: String::new(),
        });
        let idx = self.profiles.len() - 1;
        &self.profiles[idx]
    }

    pub fn update_profile(&mut self, id: &str, name: &str, url: &str) -> Result<()> {
        let profile = self
            .profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::UnknownProfile { id: id.into() })?;
        profile.name = name.to_string();
        profile.url = url.to_string();
        Ok(())
    }

    /// Removes a profile. The last remaining profile cannot be deleted; if the
    /// active one goes, another existing profile becomes active.
    pub fn delete_profile(&mut self, id: &str) -> Result<()> {
        if self.profiles.len() <= 1 {
            return Err(AppError::LastProfile);
        }
        let idx = self
            .profiles
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| AppError::UnknownProfile { id: id.into() })?;
        self.profiles.remove(idx);
        if self.active_profile_id.as_deref() == Some(id) {
            self.active_profile_id = self.profiles.first().map(|p| p.id.clone());
        }
        Ok(())
    }

    pub fn select_profile(&mut self, id: &str) -> Result<()> {
        if self.profile(id).is_none() {
            return Err(AppError::UnknownProfile { id: id.into() });
        }
        self.active_profile_id = Some(id.to_string());
        Ok(())
    }
}

/// Appends a transcript to the draft, separated by one space.
pub fn append_transcript(draft: &str, transcript: &str) -> String {
    let head = draft.trim();
    if head.is_empty() {
        transcript.to_string()
    } else {
        format!("{head} {transcript}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyEventKind {
    Keydown,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Modifiers {
    pub ctrl_key: bool,
    pub shift_key: bool,
    pub alt_key: bool,
    pub meta_key: bool,
}

impl Modifiers {
    pub fn labels(&self) -> String {
        let mut out = String::new();
        for (on, label) in [
            (self.ctrl_key, "CTRL "),
            (self.alt_key, "ALT "),
            (self.shift_key, "SHIFT "),
            (self.meta_key, "META "),
        ] {
            if on {
                out.push_str(label);
            }
        }
        out
    }
}

/// Keystroke forwarded to the remote session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SystemEvent {
    #[serde(rename = "type")]
    pub kind: KeyEventKind,
    pub key: String,
    pub code: String,
    #[serde(flatten)]
    pub modifiers: Modifiers,
}

impl SystemEvent {
    pub fn from_keyboard(kind: KeyEventKind, e: &web_sys::KeyboardEvent) -> Self {
        Self {
            kind,
            key: e.key(),
            code: e.code(),
            modifiers: Modifiers {
                ctrl_key: e.ctrl_key(),
                shift_key: e.shift_key(),
                alt_key: e.alt_key(),
                meta_key: e.meta_key(),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SettingsAction {
    CommitPanel(Geometry),
    CommitVoiceButton(Position),
    ToggleVoice,
    ShowPrompt,
    ClosePrompt,
    ToggleForwarding,
    SaveDraft(String),
    CreateProfile { id: String },
    UpdateProfile { id: String, name: String, url: String },
    DeleteProfile { id: String },
    SelectProfile { id: String },
}

impl Reducible for AppSettings {
    type Action = SettingsAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use SettingsAction::*;
        let mut new = (*self).clone();
        let outcome = match action {
            CommitPanel(g) => {
                new.panel_position = g.position;
                new.panel_size = g.size;
                Ok(())
            }
            CommitVoiceButton(p) => {
                new.voice_button_position = p;
                Ok(())
            }
            ToggleVoice => {
                new.mode = new.mode.toggle_voice();
                Ok(())
            }
            ShowPrompt => {
                new.mode = UiMode::Prompt;
                Ok(())
            }
            ClosePrompt => {
                new.mode = new.mode.close_prompt();
                Ok(())
            }
            ToggleForwarding => {
                new.forward_events = !new.forward_events;
                Ok(())
            }
            SaveDraft(text) => {
                new.last_draft = text;
                Ok(())
            }
            CreateProfile { id } => {
                new.create_profile(id);
                Ok(())
            }
            UpdateProfile { id, name, url } => new.update_profile(&id, &name, &url),
            DeleteProfile { id } => new.delete_profile(&id),
            SelectProfile { id } => new.select_profile(&id),
        };
        if let Err(err) = outcome {
            tracing::warn!(%err, "settings action rejected");
            return self;
        }
        if new == *self {
            return self;
        }
        Rc::new(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_profiles() -> AppSettings {
        let mut s = AppSettings::default();
        s.create_profile("lab");
        s.update_profile("lab", "Lab box", "http://10.0.0.5:6080/vnc.html")
            .unwrap();
        s
    }

    #[test]
    fn deleting_only_profile_is_rejected() {
        let mut s = AppSettings::default();
        let before = s.clone();
        assert!(matches!(s.delete_profile("default"), Err(AppError::LastProfile)));
        assert_eq!(s, before);
    }

    #[test]
    fn deleting_active_profile_reassigns_to_existing() {
        let mut s = two_profiles();
        s.select_profile("lab").unwrap();
        s.delete_profile("lab").unwrap();
        let active = s.active_profile_id.clone().unwrap();
        assert!(s.profile(&active).is_some());
        assert_eq!(active, "default");
    }

    #[test]
    fn deleting_inactive_profile_keeps_active() {
        let mut s = two_profiles();
        s.delete_profile("lab").unwrap();
        assert_eq!(s.active_profile_id.as_deref(), Some("default"));
        assert_eq!(s.profiles.len(), 1);
    }

    #[test]
    fn reducer_ignores_rejected_delete() {
        let s = Rc::new(AppSettings::default());
        let next = s.clone().reduce(SettingsAction::DeleteProfile {
            id: "default".into(),
        });
        assert!(Rc::ptr_eq(&s, &next));
    }

    #[test]
    fn mode_toggles_are_exclusive() {
        assert_eq!(UiMode::Prompt.toggle_voice(), UiMode::Voice);
        assert_eq!(UiMode::Voice.toggle_voice(), UiMode::Prompt);
        assert_eq!(UiMode::Hidden.toggle_voice(), UiMode::Voice);
        assert_eq!(UiMode::Prompt.close_prompt(), UiMode::Hidden);
        assert_eq!(UiMode::Voice.close_prompt(), UiMode::Voice);
    }

    #[test]
    fn reducer_commits_panel_geometry() {
        let s = Rc::new(AppSettings::default());
        let g = Geometry::new(Position::new(5.0, 6.0), Size::new(500.0, 300.0));
        let next = s.reduce(SettingsAction::CommitPanel(g));
        assert_eq!(next.panel_geometry(), g);
    }

    #[test]
    fn narrow_viewport_gets_compact_layout() {
        let s = AppSettings::for_viewport(390.0);
        assert_eq!(s.panel_position, Position::new(10.0, 10.0));
        assert_eq!(s.panel_size, Size::new(370.0, 250.0));
        assert_eq!(s.voice_button_position, Position::new(20.0, 150.0));
        assert_eq!(AppSettings::for_viewport(1280.0), AppSettings::default());
    }

    #[test]
    fn repair_restores_profile_invariants() {
        let mut s = AppSettings {
            profiles: Vec::new(),
            active_profile_id: Some("gone".into()),
            ..AppSettings::default()
        };
        s.repair();
        assert_eq!(s.profiles.len(), 1);
        assert_eq!(s.active_profile_id.as_deref(), Some("default"));
    }

    #[test]
    fn active_profile_falls_back_to_first() {
        let mut s = two_profiles();
        s.active_profile_id = None;
        assert_eq!(s.active_profile().map(|p| p.id.as_str()), Some("default"));
    }

    #[test]
    fn transcript_appends_with_single_space() {
        assert_eq!(append_transcript("", "open browser"), "open browser");
        assert_eq!(append_transcript("  type  ", "hello"), "type hello");
    }

    #[test]
    fn system_event_serializes_flat() {
        let ev = SystemEvent {
            kind: KeyEventKind::Keydown,
            key: "a".into(),
            code: "KeyA".into(),
            modifiers: Modifiers {
                ctrl_key: true,
                ..Modifiers::default()
            },
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "keydown");
        assert_eq!(json["ctrlKey"], true);
        assert_eq!(json["metaKey"], false);
        assert_eq!(ev.modifiers.labels(), "CTRL ");
    }
}
