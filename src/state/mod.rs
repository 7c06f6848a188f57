pub mod draft;
pub mod geometry;
pub mod gesture;
pub mod panel;
pub mod pointer;
pub mod submit;
pub mod voice;

pub use draft::DraftSaver;
pub use geometry::{Geometry, Position, Size, Viewport};
pub use gesture::GestureMode;
pub use panel::{PANEL_MIN_SIZE, PanelGesture};
pub use pointer::PointerInput;
pub use submit::SubmitGate;
pub use voice::{VOICE_BUTTON_SIZE, VoiceEffect, VoiceGesture, VoiceGestureState};
