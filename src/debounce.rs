use std::time::Duration;
use tokio::time::Instant;

/// Delay between the last keystroke and the search it triggers.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Collapses a burst of text edits into the final value.
///
/// Purely clock-driven: callers push edits with the time they happened and
/// poll with the current time. Nothing here spawns or sleeps.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            pending: None,
        }
    }

    /// Records an edit, restarting the quiet period.
    pub fn push(&mut self, text: impl Into<String>, at: Instant) {
        self.pending = Some((text.into(), at + self.delay));
    }

    /// When the pending edit settles, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Takes the settled text once its quiet period has passed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => self.pending.take().map(|(text, _)| text),
            _ => None,
        }
    }

    /// Drops the pending edit without emitting it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Debouncer::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_burst_emits_only_last_value() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();
        debouncer.push("p", start);
        debouncer.push("pi", start + Duration::from_millis(100));
        debouncer.push("pik", start + Duration::from_millis(200));
        assert_eq!(debouncer.poll(start + Duration::from_millis(400)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(500)),
            Some("pik".to_string())
        );
        assert_eq!(debouncer.poll(start + Duration::from_millis(900)), None);
    }

    #[test]
    fn test_deadline_tracks_latest_edit() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(50));
        assert_eq!(debouncer.deadline(), None);
        debouncer.push("a", start);
        debouncer.push("ab", start + Duration::from_millis(30));
        assert_eq!(debouncer.deadline(), Some(start + Duration::from_millis(80)));
    }

    #[test]
    fn test_cancel_discards_pending() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();
        debouncer.push("mew", start);
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(start + Duration::from_secs(1)), None);
    }
}
