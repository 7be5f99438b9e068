use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::draft::EventDraft;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactsEdit {
    OrganizerName(String),
    OrganizerPhone(String),
    OrganizerEmail(String),
    EmergencyName(String),
    EmergencyPhone(String),
}

pub fn apply(draft: &EventDraft, edit: &ContactsEdit) -> EventDraft {
    let mut next = draft.clone();
    let contacts = Arc::make_mut(&mut next.contacts);
    match edit {
        ContactsEdit::OrganizerName(v) => contacts.organizer.name = Some(v.clone()),
        ContactsEdit::OrganizerPhone(v) => contacts.organizer.phone = Some(v.clone()),
        ContactsEdit::OrganizerEmail(v) => contacts.organizer.email = Some(v.clone()),
        ContactsEdit::EmergencyName(v) => contacts.emergency.name = Some(v.clone()),
        ContactsEdit::EmergencyPhone(v) => contacts.emergency.phone = Some(v.clone()),
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organizer_edit_leaves_emergency_contact() {
        let draft = apply(&EventDraft::default(), &ContactsEdit::EmergencyName("Rachel".into()));
        let next = apply(&draft, &ContactsEdit::OrganizerEmail("sarah@example.com".into()));

        assert_eq!(next.contacts.organizer.email.as_deref(), Some("sarah@example.com"));
        assert_eq!(next.contacts.emergency, draft.contacts.emergency);
        assert!(Arc::ptr_eq(&draft.settings, &next.settings));
    }
}
