// Busy gate around the single outstanding command send
use crate::error::Result;

/// Hands out at most one in-flight command at a time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmitGate {
    busy: bool,
}

impl SubmitGate {
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Claims the gate for `text`. Blank text or an outstanding send yields
    /// `None`; otherwise the gate is busy until [`SubmitGate::settle`].
    pub fn try_begin(&mut self, text: &str) -> Option<String> {
        if self.busy || text.trim().is_empty() {
            return None;
        }
        self.busy = true;
        Some(text.to_string())
    }

    /// Reopens the gate once the send finished, whatever the outcome.
    /// Returns whether the send succeeded.
    pub fn settle<T>(&mut self, outcome: &Result<T>) -> bool {
        self.busy = false;
        outcome.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::SubmitGate;
    use crate::error::AppError;

    #[test]
    fn blank_text_is_not_sent() {
        let mut gate = SubmitGate::default();
        assert_eq!(gate.try_begin("   \n"), None);
        assert!(!gate.is_busy());
    }

    #[test]
    fn second_submit_waits_for_first() {
        let mut gate = SubmitGate::default();
        assert_eq!(gate.try_begin("open terminal").as_deref(), Some("open terminal"));
        assert!(gate.is_busy());
        assert_eq!(gate.try_begin("again"), None);
        assert!(gate.settle(&Ok(())));
        assert_eq!(gate.try_begin("again").as_deref(), Some("again"));
    }

    #[test]
    fn failed_send_reopens_gate() {
        let mut gate = SubmitGate::default();
        gate.try_begin("reboot").unwrap();
        let failed: crate::error::Result<()> = Err(AppError::CommandRejected {
            message: "Failed to establish connection with VNC server.".into(),
        });
        assert!(!gate.settle(&failed));
        assert!(!gate.is_busy());
        assert_eq!(gate.try_begin("reboot").as_deref(), Some("reboot"));
    }
}
