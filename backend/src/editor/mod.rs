//! Multi-tab event editor.
//!
//! Each tab module owns an edit enum and an `apply` function that takes the
//! current draft and returns a new one differing only in the path the edit
//! names. [`EventEditor`] strings the tabs together with the change tracker
//! and the save controller.

pub mod branding;
pub mod contacts;
pub mod general;
pub mod locations;
pub mod modules;
pub mod program;
pub mod save;
pub mod settings;
pub mod tracker;
pub mod validate;

use serde::{Deserialize, Serialize};

use crate::models::draft::EventDraft;
use crate::services::api_client::ApiError;
use crate::services::repository::EventRepository;

use branding::BrandingEdit;
use contacts::ContactsEdit;
use general::GeneralEdit;
use locations::LocationsEdit;
use modules::ModulesEdit;
use program::ProgramEdit;
use save::{SaveController, SaveOutcome, SaveTicket};
use settings::SettingsEdit;
use tracker::{ChangeTracker, Section};
use validate::ValidationIssue;

/// One edit, addressed to the tab that owns the field.
///
/// On the wire: `{"tab": "modules", "edit": {"toggle": {"module": "rsvp"}}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tab", content = "edit", rename_all = "snake_case")]
pub enum DraftEdit {
    General(GeneralEdit),
    Branding(BrandingEdit),
    Locations(LocationsEdit),
    Program(ProgramEdit),
    Modules(ModulesEdit),
    Contacts(ContactsEdit),
    Settings(SettingsEdit),
}

impl DraftEdit {
    pub fn apply(&self, draft: &EventDraft) -> EventDraft {
        match self {
            DraftEdit::General(e) => general::apply(draft, e),
            DraftEdit::Branding(e) => branding::apply(draft, e),
            DraftEdit::Locations(e) => locations::apply(draft, e),
            DraftEdit::Program(e) => program::apply(draft, e),
            DraftEdit::Modules(e) => modules::apply(draft, e),
            DraftEdit::Contacts(e) => contacts::apply(draft, e),
            DraftEdit::Settings(e) => settings::apply(draft, e),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("Le brouillon contient {} erreur(s) de validation", .0.len())]
    Invalid(Vec<ValidationIssue>),
    #[error("Une création est déjà en cours pour ce brouillon")]
    CreateInFlight,
    #[error(transparent)]
    Save(#[from] ApiError),
}

/// Editing state of one event: the working draft, its baseline and the
/// saves issued against it.
#[derive(Debug)]
pub struct EventEditor {
    event_id: Option<String>,
    draft: EventDraft,
    tracker: ChangeTracker,
    saves: SaveController,
    /// Bumped on every change to the working draft.
    revision: u64,
}

impl EventEditor {
    /// Edit flow: start from a loaded snapshot.
    pub fn open(snapshot: EventDraft) -> Self {
        Self {
            event_id: snapshot.id.clone(),
            draft: snapshot.clone(),
            tracker: ChangeTracker::new(snapshot),
            saves: SaveController::default(),
            revision: 0,
        }
    }

    /// Create flow: start from the empty template. The first save POSTs.
    pub fn create() -> Self {
        Self::open(EventDraft::empty_template())
    }

    pub async fn load<R: EventRepository + ?Sized>(repo: &R, event_id: &str) -> Result<Self, ApiError> {
        let snapshot = repo.load(event_id).await?;
        Ok(Self::open(snapshot))
    }

    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    pub fn draft(&self) -> &EventDraft {
        &self.draft
    }

    pub fn baseline(&self) -> &EventDraft {
        self.tracker.baseline()
    }

    pub fn is_dirty(&self) -> bool {
        self.tracker.is_dirty()
    }

    pub fn changed_sections(&self) -> Vec<Section> {
        self.tracker.changed_sections(&self.draft)
    }

    pub fn validate(&self) -> Vec<ValidationIssue> {
        validate::validate(&self.draft)
    }

    pub fn apply(&mut self, edit: &DraftEdit) -> &EventDraft {
        let next = edit.apply(&self.draft);
        self.replace(next);
        &self.draft
    }

    /// Whole-document replacement. Marks the editor dirty even when `next`
    /// equals the current draft.
    pub fn replace(&mut self, mut next: EventDraft) {
        next.id = self.event_id.clone();
        self.draft = next;
        self.revision += 1;
        self.tracker.mark_dirty();
    }

    /// Drop unsaved changes and go back to the baseline.
    pub fn discard(&mut self) {
        self.draft = self.tracker.reset();
        self.revision += 1;
    }

    /// Snapshot the draft for persistence. New events must pass validation
    /// and may only have one creation in flight.
    pub fn begin_save(&mut self) -> Result<SaveTicket, EditorError> {
        if self.event_id.is_none() {
            if self.saves.create_in_flight() {
                return Err(EditorError::CreateInFlight);
            }
            let issues = self.validate();
            if !issues.is_empty() {
                return Err(EditorError::Invalid(issues));
            }
            self.saves.set_create_in_flight(true);
        }

        Ok(SaveTicket {
            token: self.saves.issue(),
            event_id: self.event_id.clone(),
            draft: self.draft.clone(),
            revision: self.revision,
        })
    }

    /// Apply the reply of a persistence call. `result` carries the id the
    /// backend assigned when the ticket was a creation.
    ///
    /// A failure leaves the draft and the dirty flag untouched. A success
    /// whose token has been overtaken by a later save is ignored.
    pub fn finish_save(
        &mut self,
        ticket: SaveTicket,
        result: Result<Option<String>, ApiError>,
    ) -> Result<SaveOutcome, EditorError> {
        if ticket.is_create() {
            self.saves.set_create_in_flight(false);
        }

        let assigned = match result {
            Ok(assigned) => assigned,
            Err(e) => {
                tracing::warn!(
                    "Save #{} of event {} failed: {}",
                    ticket.token,
                    ticket.event_id.as_deref().unwrap_or("<new>"),
                    e
                );
                return Err(EditorError::Save(e));
            }
        };

        if let Some(id) = assigned.filter(|_| ticket.is_create()) {
            self.event_id = Some(id.clone());
            self.draft.id = Some(id);
        }

        if !self.saves.is_current(ticket.token) {
            tracing::debug!("Save #{} superseded by a later save", ticket.token);
            return Ok(SaveOutcome::Superseded);
        }

        let mut saved = ticket.draft;
        saved.id = self.event_id.clone();
        self.tracker.rebase(saved);
        if self.revision == ticket.revision {
            self.draft = self.tracker.reset();
        } else {
            // Edited or discarded while the save was in flight.
            self.tracker.refresh(&self.draft);
        }

        Ok(SaveOutcome::Saved {
            event_id: self.event_id.clone().unwrap_or_default(),
            dirty: self.is_dirty(),
        })
    }

    pub async fn save<R: EventRepository + ?Sized>(&mut self, repo: &R) -> Result<SaveOutcome, EditorError> {
        let ticket = self.begin_save()?;
        let result = persist(repo, &ticket).await;
        self.finish_save(ticket, result)
    }
}

/// Issue the PUT (or POST for a new event) for a ticket.
pub async fn persist<R: EventRepository + ?Sized>(
    repo: &R,
    ticket: &SaveTicket,
) -> Result<Option<String>, ApiError> {
    match &ticket.event_id {
        Some(id) => repo.update(id, &ticket.draft).await.map(|_| None),
        None => repo.create(&ticket.draft).await.map(Some),
    }
}
