use std::sync::Arc;

use serde::Serialize;

use crate::models::draft::EventDraft;

/// Top-level part of a draft, as reported by [`ChangeTracker::changed_sections`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Event,
    Branding,
    Locations,
    Program,
    Modules,
    Contacts,
    Settings,
    Status,
    Pack,
    Other,
}

/// Dirty flag plus the last persisted snapshot.
#[derive(Debug, Clone)]
pub struct ChangeTracker {
    baseline: EventDraft,
    dirty: bool,
}

impl ChangeTracker {
    pub fn new(baseline: EventDraft) -> Self {
        Self { baseline, dirty: false }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn baseline(&self) -> &EventDraft {
        &self.baseline
    }

    /// Clear the dirty flag and hand back the snapshot the draft should
    /// return to.
    pub fn reset(&mut self) -> EventDraft {
        self.dirty = false;
        self.baseline.clone()
    }

    /// Move the baseline to a freshly persisted draft.
    pub fn rebase(&mut self, saved: EventDraft) {
        self.baseline = saved;
    }

    /// Recompute the flag for `draft` after the baseline moved under it.
    pub fn refresh(&mut self, draft: &EventDraft) {
        self.dirty = !self.changed_sections(draft).is_empty();
    }

    /// Sections of `draft` that differ from the baseline. Shared sections
    /// are recognised by pointer before falling back to a deep compare.
    pub fn changed_sections(&self, draft: &EventDraft) -> Vec<Section> {
        fn differs<T: PartialEq>(a: &Arc<T>, b: &Arc<T>) -> bool {
            !Arc::ptr_eq(a, b) && a != b
        }

        let base = &self.baseline;
        let mut sections = Vec::new();
        if differs(&base.event, &draft.event) {
            sections.push(Section::Event);
        }
        if differs(&base.branding, &draft.branding) {
            sections.push(Section::Branding);
        }
        if differs(&base.locations, &draft.locations) {
            sections.push(Section::Locations);
        }
        if differs(&base.program, &draft.program) {
            sections.push(Section::Program);
        }
        if differs(&base.modules, &draft.modules) {
            sections.push(Section::Modules);
        }
        if differs(&base.contacts, &draft.contacts) {
            sections.push(Section::Contacts);
        }
        if differs(&base.settings, &draft.settings) {
            sections.push(Section::Settings);
        }
        if base.status != draft.status {
            sections.push(Section::Status);
        }
        if base.pack != draft.pack {
            sections.push(Section::Pack);
        }
        if base.extra != draft.extra || base.id != draft.id {
            sections.push(Section::Other);
        }
        sections
    }
}
