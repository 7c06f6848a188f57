pub mod app;
pub mod floating_panel;
pub mod mode_toolbar;
pub mod prompt_form;
pub mod settings_modal;
pub mod vnc_frame;
pub mod voice_button;
