use std::{collections::HashMap, sync::Arc, time::Duration};

use serde::Serialize;
use tokio::{sync::Mutex, time::Instant};
use uuid::Uuid;

use crate::editor::{
    persist, save::SaveOutcome, tracker::Section, validate::ValidationIssue, DraftEdit,
    EditorError, EventEditor,
};
use crate::models::draft::EventDraft;

use super::api_client::ApiError;
use super::repository::EventRepository;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Aucun éditeur ouvert pour {0}")]
    NotFound(String),
    #[error(transparent)]
    Load(#[from] ApiError),
    #[error(transparent)]
    Editor(#[from] EditorError),
}

/// State of one editor as returned to the CMS.
#[derive(Debug, Clone, Serialize)]
pub struct EditorView {
    pub key: String,
    pub event_id: Option<String>,
    pub dirty: bool,
    pub changed_sections: Vec<Section>,
    pub issues: Vec<ValidationIssue>,
    pub draft: EventDraft,
}

impl EditorView {
    fn of(key: &str, editor: &EventEditor) -> Self {
        Self {
            key: key.to_string(),
            event_id: editor.event_id().map(str::to_string),
            dirty: editor.is_dirty(),
            changed_sections: editor.changed_sections(),
            issues: editor.validate(),
            draft: editor.draft().clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveReply {
    /// `false` when a later save of the same editor had already completed.
    pub applied: bool,
    #[serde(flatten)]
    pub view: EditorView,
}

/// Editors left untouched this long are closed.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

struct OpenEditor {
    editor: EventEditor,
    touched: Instant,
}

impl OpenEditor {
    fn new(editor: EventEditor) -> Self {
        Self { editor, touched: Instant::now() }
    }

    fn touch(&mut self) -> &mut EventEditor {
        self.touched = Instant::now();
        &mut self.editor
    }
}

/// Open editors, keyed by event id (or `new-<uuid>` until a created event
/// gets its id). Edits run under the lock; loads and saves release it while
/// the event API is called. Editors idle for longer than the timeout are
/// dropped with their unsaved edits.
pub struct EditorSessions {
    editors: Mutex<HashMap<String, OpenEditor>>,
    idle_timeout: Duration,
}

impl Default for EditorSessions {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT)
    }
}

impl EditorSessions {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            editors: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Open the editor of an event, loading it on first access. An editor
    /// that is already open is returned as is, unsaved edits included.
    pub async fn open(&self, repo: &dyn EventRepository, event_id: &str) -> Result<EditorView, SessionError> {
        if let Some(open) = self.editors.lock().await.get_mut(event_id) {
            return Ok(EditorView::of(event_id, open.touch()));
        }

        let loaded = EventEditor::load(repo, event_id).await?;
        tracing::debug!("Opened editor for event {}", event_id);

        let mut editors = self.editors.lock().await;
        self.evict_idle(&mut editors);
        let open = editors
            .entry(event_id.to_string())
            .or_insert_with(|| OpenEditor::new(loaded));
        Ok(EditorView::of(event_id, open.touch()))
    }

    /// Start a new event from the empty template.
    pub async fn create(&self) -> EditorView {
        let key = format!("new-{}", Uuid::new_v4());
        let editor = EventEditor::create();
        let view = EditorView::of(&key, &editor);

        let mut editors = self.editors.lock().await;
        self.evict_idle(&mut editors);
        editors.insert(key, OpenEditor::new(editor));
        view
    }

    pub async fn view(&self, key: &str) -> Result<EditorView, SessionError> {
        let mut editors = self.editors.lock().await;
        let open = editors.get_mut(key).ok_or_else(|| SessionError::NotFound(key.into()))?;
        Ok(EditorView::of(key, open.touch()))
    }

    /// Apply edits in order.
    pub async fn apply(&self, key: &str, edits: &[DraftEdit]) -> Result<EditorView, SessionError> {
        let mut editors = self.editors.lock().await;
        let editor = editors
            .get_mut(key)
            .ok_or_else(|| SessionError::NotFound(key.into()))?
            .touch();
        for edit in edits {
            editor.apply(edit);
        }
        Ok(EditorView::of(key, editor))
    }

    pub async fn discard(&self, key: &str) -> Result<EditorView, SessionError> {
        let mut editors = self.editors.lock().await;
        let editor = editors
            .get_mut(key)
            .ok_or_else(|| SessionError::NotFound(key.into()))?
            .touch();
        editor.discard();
        Ok(EditorView::of(key, editor))
    }

    pub async fn close(&self, key: &str) -> bool {
        self.editors.lock().await.remove(key).is_some()
    }

    pub async fn len(&self) -> usize {
        self.editors.lock().await.len()
    }

    /// Persist the draft. A created event is re-keyed under the id the
    /// backend assigned; the reply's `key` tells the caller where it went.
    ///
    /// An editor closed while its save was in flight stays closed: the reply
    /// is dropped and the caller gets `NotFound`.
    pub async fn save(&self, repo: &dyn EventRepository, key: &str) -> Result<SaveReply, SessionError> {
        let ticket = {
            let mut editors = self.editors.lock().await;
            let editor = editors
                .get_mut(key)
                .ok_or_else(|| SessionError::NotFound(key.into()))?
                .touch();
            editor.begin_save()?
        };

        let result = persist(repo, &ticket).await;

        let mut editors = self.editors.lock().await;
        let Some(mut open) = editors.remove(key) else {
            tracing::warn!("Editor {} closed while saving, reply dropped", key);
            return Err(SessionError::NotFound(key.into()));
        };
        let editor = open.touch();
        let outcome = editor.finish_save(ticket, result);
        let new_key = editor.event_id().unwrap_or(key).to_string();
        let view = EditorView::of(&new_key, editor);
        editors.insert(new_key, open);

        let applied = match outcome? {
            SaveOutcome::Saved { .. } => true,
            SaveOutcome::Superseded => false,
        };
        Ok(SaveReply { applied, view })
    }

    /// Close every editor idle for longer than the timeout. Returns how many
    /// were closed.
    pub async fn sweep(&self) -> usize {
        let mut editors = self.editors.lock().await;
        self.evict_idle(&mut editors)
    }

    fn evict_idle(&self, editors: &mut HashMap<String, OpenEditor>) -> usize {
        let now = Instant::now();
        let before = editors.len();
        editors.retain(|key, open| {
            let idle = now.duration_since(open.touched);
            if idle < self.idle_timeout {
                return true;
            }
            if open.editor.is_dirty() {
                tracing::info!("Closing idle editor {} after {}s, unsaved changes dropped", key, idle.as_secs());
            } else {
                tracing::debug!("Closing idle editor {} after {}s", key, idle.as_secs());
            }
            false
        });
        before - editors.len()
    }
}

/// Spawn the background task that closes idle editors.
pub fn start_sweeper(sessions: Arc<EditorSessions>) {
    let period = (sessions.idle_timeout / 4).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let closed = sessions.sweep().await;
            if closed > 0 {
                tracing::debug!("Editor sweep closed {} idle editor(s)", closed);
            }
        }
    });
}
