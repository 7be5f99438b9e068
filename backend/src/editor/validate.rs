use serde::Serialize;

use crate::models::draft::{AssetSlot, ColorRole, EventDraft};
use crate::models::event::parse_form_datetime;

/// A problem found in a draft. Issues never block editing; the create flow
/// refuses to save while any are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}

pub fn validate(draft: &EventDraft) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let event = &draft.event;

    if draft.title().trim().is_empty() {
        issues.push(ValidationIssue::new("event.title", "Le titre est obligatoire."));
    }
    match event.date.as_deref().map(str::trim) {
        None | Some("") => issues.push(ValidationIssue::new("event.date", "La date est obligatoire.")),
        Some(date) if parse_form_datetime(date).is_none() => {
            issues.push(ValidationIssue::new("event.date", "Date invalide."))
        }
        Some(_) => {}
    }
    if let (Some(start), Some(end)) = (
        event.date.as_deref().and_then(parse_form_datetime),
        event.end_date.as_deref().and_then(parse_form_datetime),
    ) {
        if end < start {
            issues.push(ValidationIssue::new(
                "event.end_date",
                "La date de fin précède la date de début.",
            ));
        }
    }
    if let Some(count) = event.guests_count_estimate {
        if !(1..=1000).contains(&count) {
            issues.push(ValidationIssue::new(
                "event.guests_count_estimate",
                "Le nombre d'invités doit être compris entre 1 et 1000.",
            ));
        }
    }
    if let Some(default) = event.default_language.as_deref() {
        if !event.language.is_empty() && !event.language.iter().any(|l| l == default) {
            issues.push(ValidationIssue::new(
                "event.default_language",
                "La langue par défaut doit faire partie des langues sélectionnées.",
            ));
        }
    }

    for role in ColorRole::ALL {
        if let Some(hex) = draft.branding.colors.0.get(role.key()) {
            if !is_hex_color(hex) {
                issues.push(ValidationIssue::new(
                    format!("branding.colors.{}", role.key()),
                    "Couleur invalide (format #RRGGBB).",
                ));
            }
        }
    }
    for slot in [
        AssetSlot::Logo,
        AssetSlot::Icon,
        AssetSlot::Splash,
        AssetSlot::BackgroundImage,
        AssetSlot::VideoIntro,
    ] {
        if let Some(url) = draft.branding.asset(slot).filter(|u| !u.is_empty()) {
            if !is_http_url(url) {
                let field = serde_json::to_value(slot)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default();
                issues.push(ValidationIssue::new(
                    format!("branding.{field}_url"),
                    "L'URL doit commencer par http:// ou https://.",
                ));
            }
        }
    }

    if let Some(email) = draft.contacts.organizer.email.as_deref() {
        if !email.is_empty() && !email.contains('@') {
            issues.push(ValidationIssue::new("contacts.organizer.email", "Email invalide."));
        }
    }

    if let Some(days) = draft.settings.souvenir_delay_days {
        if !(1..=30).contains(&days) {
            issues.push(ValidationIssue::new(
                "settings.souvenir_delay_days",
                "Le délai doit être compris entre 1 et 30 jours.",
            ));
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{branding::BrandingEdit, general::GeneralEdit, DraftEdit};

    fn valid_draft() -> EventDraft {
        let draft = EventDraft::empty_template();
        let draft = DraftEdit::General(GeneralEdit::Title("Sarah & David".into())).apply(&draft);
        DraftEdit::General(GeneralEdit::Date("2026-06-15T17:00".into())).apply(&draft)
    }

    #[test]
    fn empty_template_needs_title_and_date() {
        let fields: Vec<String> = validate(&EventDraft::empty_template())
            .into_iter()
            .map(|i| i.field)
            .collect();
        assert_eq!(fields, ["event.title", "event.date"]);
    }

    #[test]
    fn complete_draft_is_valid() {
        assert!(validate(&valid_draft()).is_empty());
    }

    #[test]
    fn flags_ranges_colors_and_urls() {
        let draft = valid_draft();
        let draft = DraftEdit::General(GeneralEdit::GuestsCountEstimate(5000)).apply(&draft);
        let draft = DraftEdit::Branding(BrandingEdit::Color {
            role: ColorRole::Primary,
            hex: "gold".into(),
        })
        .apply(&draft);
        let draft = DraftEdit::Branding(BrandingEdit::Asset {
            slot: AssetSlot::Splash,
            url: Some("ftp://example.com/splash.png".into()),
        })
        .apply(&draft);
        let draft = DraftEdit::General(GeneralEdit::EndDate("2026-06-14T10:00".into())).apply(&draft);

        let fields: Vec<String> = validate(&draft).into_iter().map(|i| i.field).collect();
        assert_eq!(
            fields,
            [
                "event.end_date",
                "event.guests_count_estimate",
                "branding.colors.primary",
                "branding.splash_url",
            ]
        );
    }
}
