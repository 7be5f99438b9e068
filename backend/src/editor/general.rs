use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::draft::EventDraft;

pub const EVENT_TYPES: [&str; 6] = [
    "wedding",
    "bar_mitzvah",
    "bat_mitzvah",
    "birthday",
    "corporate",
    "other",
];

pub const LANGUAGES: [&str; 5] = ["fr", "en", "he", "es", "it"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneralEdit {
    #[serde(rename = "type")]
    Kind(String),
    Title(String),
    Subtitle(String),
    Date(String),
    EndDate(String),
    Timezone(String),
    Languages(Vec<String>),
    DefaultLanguage(String),
    GuestsCountEstimate(u32),
}

pub fn apply(draft: &EventDraft, edit: &GeneralEdit) -> EventDraft {
    let mut next = draft.clone();
    let event = Arc::make_mut(&mut next.event);
    match edit {
        GeneralEdit::Kind(v) => event.kind = Some(v.clone()),
        GeneralEdit::Title(v) => event.title = Some(v.clone()),
        GeneralEdit::Subtitle(v) => event.subtitle = Some(v.clone()),
        GeneralEdit::Date(v) => event.date = Some(v.clone()),
        GeneralEdit::EndDate(v) => event.end_date = Some(v.clone()),
        GeneralEdit::Timezone(v) => event.timezone = Some(v.clone()),
        GeneralEdit::Languages(codes) => {
            let mut unique: Vec<String> = Vec::with_capacity(codes.len());
            for code in codes {
                if !unique.contains(code) {
                    unique.push(code.clone());
                }
            }
            event.language = unique;
        }
        GeneralEdit::DefaultLanguage(v) => event.default_language = Some(v.clone()),
        GeneralEdit::GuestsCountEstimate(n) => event.guests_count_estimate = Some(*n),
    }
    next
}
