// Mock command/event transport to the VNC host
use gloo_timers::future::TimeoutFuture;

use crate::error::{AppError, Result};
use crate::model::SystemEvent;
use crate::util::preview;

const SIMULATED_LATENCY_MS: u32 = 800;
const SUCCESS_RATE: f64 = 0.9;
const PREVIEW_CHARS: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandReceipt {
    pub success: bool,
    pub message: String,
}

impl CommandReceipt {
    fn executed(command: &str) -> Self {
        Self {
            success: true,
            message: format!("Command executed: \"{}\"", preview(command, PREVIEW_CHARS)),
        }
    }

    fn refused() -> Self {
        Self {
            success: false,
            message: "Failed to establish connection with VNC server.".into(),
        }
    }

    /// Unsuccessful receipts become errors so callers can use `?`.
    pub fn into_result(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(AppError::CommandRejected {
                message: self.message,
            })
        }
    }
}

/// Sends one text command. Simulates network latency and an occasional
/// refusal.
pub async fn send_command(command: &str) -> Result<CommandReceipt> {
    tracing::info!(command, "sending command to VNC");
    TimeoutFuture::new(SIMULATED_LATENCY_MS).await;
    let receipt = if js_sys::Math::random() < SUCCESS_RATE {
        CommandReceipt::executed(command)
    } else {
        CommandReceipt::refused()
    };
    receipt.into_result()
}

/// Fire-and-forget keystroke forwarding.
pub fn send_system_event(event: &SystemEvent) {
    match serde_json::to_string(event) {
        Ok(payload) => tracing::debug!(%payload, "system event payload"),
        Err(err) => tracing::warn!(%err, "system event not serializable"),
    }
    let modifiers = event.modifiers.labels();
    tracing::info!(
        kind = ?event.kind,
        code = %event.code,
        modifiers = modifiers.trim_end(),
        "system event forwarded"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn executed_receipt_previews_command() {
        let receipt = CommandReceipt::executed("open the terminal and list files");
        assert_eq!(receipt.message, "Command executed: \"open the terminal an...\"");
        assert!(receipt.into_result().is_ok());
    }

    #[test]
    fn refused_receipt_is_an_error() {
        let err = CommandReceipt::refused().into_result().unwrap_err();
        assert!(matches!(err, AppError::CommandRejected { .. }));
        assert!(err.to_string().contains("VNC server"));
    }
}
