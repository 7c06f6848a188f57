//! Quiet-period saving for the prompt draft.
//!
//! Every edit re-arms a [`DRAFT_SAVE_DELAY_MS`] timer. Only the timer armed by
//! the latest edit may save; earlier ones find a stale generation and do
//! nothing.

pub const DRAFT_SAVE_DELAY_MS: u32 = 500;

/// Timer the caller must arm after an edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaveTimer {
    pub generation: u64,
    pub delay_ms: u32,
}

#[derive(Clone, Debug, Default)]
pub struct DraftSaver {
    saved: String,
    generation: u64,
    pending: Option<(u64, String)>,
}

impl DraftSaver {
    /// `saved` is the draft already persisted.
    pub fn new(saved: impl Into<String>) -> Self {
        Self {
            saved: saved.into(),
            ..Self::default()
        }
    }

    /// Records an edit. Returning to the saved text cancels any pending save.
    pub fn edit(&mut self, text: &str) -> Option<SaveTimer> {
        self.generation += 1;
        if text == self.saved {
            self.pending = None;
            return None;
        }
        self.pending = Some((self.generation, text.to_string()));
        Some(SaveTimer {
            generation: self.generation,
            delay_ms: DRAFT_SAVE_DELAY_MS,
        })
    }

    /// Timer callback. Yields the text to persist when `generation` is still
    /// the latest edit.
    pub fn fire(&mut self, generation: u64) -> Option<String> {
        match &self.pending {
            Some((pending, _)) if *pending == generation => {}
            _ => return None,
        }
        let (_, text) = self.pending.take()?;
        self.saved = text.clone();
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Virtual clock holding the timers the component would have armed.
    #[derive(Default)]
    struct Clock {
        now: u64,
        armed: Vec<(u64, u64)>,
    }

    impl Clock {
        fn edit(&mut self, at: u64, saver: &mut DraftSaver, text: &str) {
            self.now = at;
            if let Some(timer) = saver.edit(text) {
                self.armed.push((at + u64::from(timer.delay_ms), timer.generation));
            }
        }

        fn advance_to(&mut self, t: u64, saver: &mut DraftSaver) -> Vec<String> {
            self.now = t;
            let (due, rest): (Vec<_>, Vec<_>) =
                std::mem::take(&mut self.armed).into_iter().partition(|(at, _)| *at <= t);
            self.armed = rest;
            due.into_iter()
                .filter_map(|(_, generation)| saver.fire(generation))
                .collect()
        }
    }

    #[test]
    fn saves_only_after_quiet_period() {
        let mut saver = DraftSaver::new("");
        let mut clock = Clock::default();
        clock.edit(0, &mut saver, "l");
        clock.edit(200, &mut saver, "ls");
        clock.edit(450, &mut saver, "ls -la");
        assert!(clock.advance_to(949, &mut saver).is_empty());
        assert_eq!(clock.advance_to(950, &mut saver), vec!["ls -la".to_string()]);
        assert!(clock.advance_to(5_000, &mut saver).is_empty());
    }

    #[test]
    fn reverting_to_saved_text_cancels_save() {
        let mut saver = DraftSaver::new("echo hi");
        let mut clock = Clock::default();
        clock.edit(0, &mut saver, "echo hi!");
        clock.edit(100, &mut saver, "echo hi");
        assert!(clock.advance_to(1_000, &mut saver).is_empty());
    }

    #[test]
    fn saved_text_is_not_saved_twice() {
        let mut saver = DraftSaver::new("");
        assert!(saver.edit("pwd").is_some());
        let timer = saver.edit("pwd").unwrap();
        assert_eq!(saver.fire(timer.generation).as_deref(), Some("pwd"));
        assert_eq!(saver.edit("pwd"), None);
    }
}
