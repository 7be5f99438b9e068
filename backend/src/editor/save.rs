use crate::models::draft::EventDraft;

/// A save in flight: the draft as it was when the save was issued.
#[derive(Debug, Clone)]
pub struct SaveTicket {
    pub token: u64,
    /// `None` for the first save of a new event (POST).
    pub event_id: Option<String>,
    pub draft: EventDraft,
    pub(crate) revision: u64,
}

impl SaveTicket {
    pub fn is_create(&self) -> bool {
        self.event_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Baseline moved to the saved draft.
    Saved { event_id: String, dirty: bool },
    /// A newer save was issued meanwhile; this reply is ignored.
    Superseded,
}

/// Orders overlapping saves. Each save gets a strictly increasing token and
/// only the completion carrying the latest token may move the baseline.
#[derive(Debug, Default)]
pub struct SaveController {
    latest: u64,
    create_in_flight: bool,
}

impl SaveController {
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, token: u64) -> bool {
        token == self.latest
    }

    pub fn create_in_flight(&self) -> bool {
        self.create_in_flight
    }

    pub(crate) fn set_create_in_flight(&mut self, value: bool) {
        self.create_in_flight = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_increase_and_only_latest_is_current() {
        let mut saves = SaveController::default();
        let first = saves.issue();
        let second = saves.issue();
        assert!(second > first);
        assert!(!saves.is_current(first));
        assert!(saves.is_current(second));
    }
}
