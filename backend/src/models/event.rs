use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use super::draft::{
    Branding, Contacts, EventDraft, EventInfo, EventStatus, Location, Modules, Pack, ProgramStep,
    Settings,
};
use crate::services::eas::url_slug;

/// Row of the event list (`GET /api/events`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub pack: Option<String>,
    #[serde(default)]
    pub couple_names: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub guest_count: Option<u32>,
}

/// Event as returned by `GET /api/events/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub default_language: Option<String>,
    #[serde(default)]
    pub status: Option<EventStatus>,
    #[serde(default)]
    pub pack: Option<Pack>,
    #[serde(default)]
    pub config: Value,
    #[serde(default)]
    pub couple_names: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub client_phone: Option<String>,
}

/// The `config` document stored by the backend next to the event columns.
///
/// Sections are optional on the way out: a section that could not be read on
/// load and has not been edited since is left out here and sent back raw
/// through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branding: Option<Arc<Branding>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Arc<Vec<Location>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<Arc<Vec<ProgramStep>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<Arc<Modules>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Arc<Contacts>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Arc<Settings>>,
    /// Form-only estimate with no backend column of its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests_count_estimate: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventConfig {
    /// Read a stored config section by section. Sections that do not parse
    /// are returned raw in the second map instead of failing the whole
    /// document.
    pub fn read(event_id: &str, value: Value) -> (Self, Map<String, Value>) {
        let mut fields = match value {
            Value::Object(fields) => fields,
            Value::Null => Map::new(),
            other => {
                tracing::warn!("Event {} has a non-object config, ignoring it: {}", event_id, other);
                Map::new()
            }
        };

        let mut unreadable = Map::new();
        let config = Self {
            branding: parse_section(event_id, "branding", fields.remove("branding"), &mut unreadable),
            locations: parse_section(event_id, "locations", fields.remove("locations"), &mut unreadable),
            program: parse_section(event_id, "program", fields.remove("program"), &mut unreadable),
            modules: parse_section(event_id, "modules", fields.remove("modules"), &mut unreadable),
            contacts: parse_section(event_id, "contacts", fields.remove("contacts"), &mut unreadable),
            settings: parse_section(event_id, "settings", fields.remove("settings"), &mut unreadable),
            guests_count_estimate: parse_section::<Option<u32>>(
                event_id,
                "guests_count_estimate",
                fields.remove("guests_count_estimate"),
                &mut unreadable,
            )
            .flatten(),
            extra: fields,
        };
        (config, unreadable)
    }

    /// Config document of a draft. Unreadable sections go back as they were
    /// loaded unless the section has been edited away from its default.
    pub fn from_draft(draft: &EventDraft) -> Self {
        let raw = &draft.unreadable_config;
        let mut extra = draft.extra.clone();
        let mut keep = |key: &str, untouched: bool| -> bool {
            match raw.get(key) {
                Some(value) if untouched => {
                    extra.insert(key.to_string(), value.clone());
                    false
                }
                _ => true,
            }
        };

        let branding = keep("branding", *draft.branding == Branding::default())
            .then(|| draft.branding.clone());
        let locations = keep("locations", draft.locations.is_empty()).then(|| draft.locations.clone());
        let program = keep("program", draft.program.is_empty()).then(|| draft.program.clone());
        let modules = keep("modules", *draft.modules == Modules::default())
            .then(|| draft.modules.clone());
        let contacts = keep("contacts", *draft.contacts == Contacts::default())
            .then(|| draft.contacts.clone());
        let settings = keep("settings", *draft.settings == Settings::default())
            .then(|| draft.settings.clone());
        let estimate = draft.event.guests_count_estimate;
        let guests_count_estimate = if keep("guests_count_estimate", estimate.is_none()) {
            estimate
        } else {
            None
        };

        Self {
            branding,
            locations,
            program,
            modules,
            contacts,
            settings,
            guests_count_estimate,
            extra,
        }
    }
}

fn parse_section<T: DeserializeOwned>(
    event_id: &str,
    key: &str,
    raw: Option<Value>,
    unreadable: &mut Map<String, Value>,
) -> Option<T> {
    let raw = raw?;
    match serde_json::from_value(raw.clone()) {
        Ok(section) => Some(section),
        Err(e) => {
            tracing::warn!("Event {} config.{} is unreadable, keeping it as is: {}", event_id, key, e);
            unreadable.insert(key.to_string(), raw);
            None
        }
    }
}

/// Body of `POST /api/events` and `PUT /api/events/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub timezone: String,
    pub languages: Vec<String>,
    pub default_language: String,
    pub pack: Pack,
    pub status: EventStatus,
    pub config: EventConfig,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
}

impl EventPayload {
    /// Wire form of a draft. `with_slug` is set for creation only; the
    /// backend keeps the slug it assigned at creation time.
    pub fn from_draft(draft: &EventDraft, with_slug: bool) -> Self {
        let event = &draft.event;
        let organizer = &draft.contacts.organizer;
        let slug = with_slug.then(|| {
            let source = draft
                .branding
                .app_name
                .as_deref()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| draft.title());
            url_slug(source)
        });

        Self {
            slug,
            kind: event.kind.clone().unwrap_or_else(|| "wedding".into()),
            title: draft.title().to_string(),
            subtitle: non_empty(event.subtitle.as_deref()),
            event_date: event.date.as_deref().and_then(parse_form_datetime),
            end_date: event.end_date.as_deref().and_then(parse_form_datetime),
            timezone: event.timezone.clone().unwrap_or_else(|| "Europe/Paris".into()),
            languages: if event.language.is_empty() {
                vec!["fr".into()]
            } else {
                event.language.clone()
            },
            default_language: event.default_language.clone().unwrap_or_else(|| "fr".into()),
            pack: draft.pack.unwrap_or_default(),
            status: draft.status.unwrap_or_default(),
            config: EventConfig::from_draft(draft),
            client_name: non_empty(organizer.name.as_deref()),
            client_email: non_empty(organizer.email.as_deref()),
            client_phone: non_empty(organizer.phone.as_deref()),
        }
    }
}

impl EventRecord {
    /// Load the record into an editable draft. Config sections that do not
    /// parse start from their defaults in the draft and are kept raw for the
    /// next save.
    pub fn into_draft(self) -> EventDraft {
        let (config, unreadable_config) = EventConfig::read(&self.id, self.config);

        EventDraft {
            id: Some(self.id),
            event: Arc::new(EventInfo {
                kind: self.kind,
                title: self.title,
                subtitle: self.subtitle,
                date: self.event_date,
                end_date: self.end_date,
                timezone: self.timezone,
                language: self.languages,
                default_language: self.default_language,
                guests_count_estimate: config.guests_count_estimate,
                extra: Map::new(),
            }),
            branding: config.branding.unwrap_or_default(),
            locations: config.locations.unwrap_or_default(),
            program: config.program.unwrap_or_default(),
            modules: config.modules.unwrap_or_default(),
            contacts: config.contacts.unwrap_or_default(),
            settings: config.settings.unwrap_or_default(),
            status: self.status,
            pack: self.pack,
            unreadable_config,
            extra: config.extra,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse the date formats the editor produces: RFC 3339 from the API,
/// `datetime-local` values (`2026-06-15T17:00`) and plain dates. Values
/// without an offset are taken as UTC.
pub fn parse_form_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
