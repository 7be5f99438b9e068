use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::draft::{EventDraft, EventStatus, Pack};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsEdit {
    Status(EventStatus),
    Pack(Pack),
    AutoSouvenirMode(bool),
    SouvenirDelayDays(u32),
    ExpirationDate(Option<String>),
    ShowPoweredBy(bool),
    MaintenanceMode(bool),
    StripeCustomerId(String),
}

pub fn apply(draft: &EventDraft, edit: &SettingsEdit) -> EventDraft {
    let mut next = draft.clone();
    match edit {
        SettingsEdit::Status(status) => next.status = Some(*status),
        SettingsEdit::Pack(pack) => next.pack = Some(*pack),
        SettingsEdit::StripeCustomerId(id) => {
            next.extra.insert("stripe_customer_id".into(), Value::String(id.clone()));
        }
        SettingsEdit::AutoSouvenirMode(v) => {
            Arc::make_mut(&mut next.settings).auto_souvenir_mode = Some(*v)
        }
        SettingsEdit::SouvenirDelayDays(v) => {
            Arc::make_mut(&mut next.settings).souvenir_delay_days = Some(*v)
        }
        SettingsEdit::ExpirationDate(v) => {
            Arc::make_mut(&mut next.settings).expiration_date = v.clone().filter(|d| !d.is_empty())
        }
        SettingsEdit::ShowPoweredBy(v) => {
            Arc::make_mut(&mut next.settings).show_powered_by = Some(*v)
        }
        SettingsEdit::MaintenanceMode(v) => {
            Arc::make_mut(&mut next.settings).maintenance_mode = Some(*v)
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_edit_does_not_copy_settings() {
        let draft = EventDraft::empty_template();
        let next = apply(&draft, &SettingsEdit::Status(EventStatus::Live));
        assert_eq!(next.status, Some(EventStatus::Live));
        assert!(Arc::ptr_eq(&draft.settings, &next.settings));
    }

    #[test]
    fn souvenir_settings() {
        let draft = apply(&EventDraft::default(), &SettingsEdit::AutoSouvenirMode(true));
        let draft = apply(&draft, &SettingsEdit::SouvenirDelayDays(14));
        assert_eq!(draft.settings.auto_souvenir_mode, Some(true));
        assert_eq!(draft.settings.souvenir_delay_days(), 14);

        let cleared = apply(&draft, &SettingsEdit::ExpirationDate(Some(String::new())));
        assert_eq!(cleared.settings.expiration_date, None);
    }

    #[test]
    fn stripe_id_goes_to_root_passthrough() {
        let draft = apply(&EventDraft::default(), &SettingsEdit::StripeCustomerId("cus_42".into()));
        assert_eq!(draft.extra["stripe_customer_id"], "cus_42");
    }
}
