use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::models::draft::{EventDraft, Location};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationField {
    Name(String),
    #[serde(rename = "type")]
    Kind(String),
    Address(String),
    Latitude(Option<f64>),
    Longitude(Option<f64>),
    Time(String),
    Notes(String),
    ParkingInfo(String),
    DressCode(String),
}

/// Locations are addressed by id, so an edit issued against a stale view
/// cannot land on a neighbour after a deletion shifted the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationsEdit {
    /// Append a blank location. Without an id one is generated from the clock.
    Add {
        #[serde(default)]
        id: Option<String>,
    },
    Update { id: String, field: LocationField },
    Delete { id: String },
    DeleteAt { index: usize },
}

/// `loc_<unix millis>`, bumped by one millisecond until it is unused.
pub fn next_location_id(existing: &[Location], now_millis: i64) -> String {
    let mut millis = now_millis;
    loop {
        let candidate = format!("loc_{millis}");
        if !existing.iter().any(|l| l.id == candidate) {
            return candidate;
        }
        millis += 1;
    }
}

pub fn apply(draft: &EventDraft, edit: &LocationsEdit) -> EventDraft {
    match edit {
        LocationsEdit::Add { id } => {
            let id = match id {
                Some(id) if draft.location(id).is_some() => {
                    tracing::debug!("Location id {} already in use, ignoring add", id);
                    return draft.clone();
                }
                Some(id) => id.clone(),
                None => next_location_id(&draft.locations, Utc::now().timestamp_millis()),
            };
            let mut next = draft.clone();
            Arc::make_mut(&mut next.locations).push(Location::new(id));
            next
        }
        LocationsEdit::Update { id, field } => {
            let Some(index) = draft.locations.iter().position(|l| &l.id == id) else {
                return draft.clone();
            };
            let mut next = draft.clone();
            let location = &mut Arc::make_mut(&mut next.locations)[index];
            match field {
                LocationField::Name(v) => location.name = v.clone(),
                LocationField::Kind(v) => location.kind = v.clone(),
                LocationField::Address(v) => location.address = v.clone(),
                LocationField::Latitude(v) => location.latitude = *v,
                LocationField::Longitude(v) => location.longitude = *v,
                LocationField::Time(v) => location.time = v.clone(),
                LocationField::Notes(v) => location.notes = v.clone(),
                LocationField::ParkingInfo(v) => location.parking_info = v.clone(),
                LocationField::DressCode(v) => location.dress_code = v.clone(),
            }
            next
        }
        LocationsEdit::Delete { id } => {
            if draft.location(id).is_none() {
                return draft.clone();
            }
            // Program steps keep their location_id: an orphaned reference is
            // a valid state and renders as "Aucun lieu".
            let mut next = draft.clone();
            Arc::make_mut(&mut next.locations).retain(|l| &l.id != id);
            next
        }
        LocationsEdit::DeleteAt { index } => {
            if *index >= draft.locations.len() {
                return draft.clone();
            }
            let mut next = draft.clone();
            Arc::make_mut(&mut next.locations).remove(*index);
            next
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::draft::ProgramStep;

    fn add(draft: &EventDraft, id: &str) -> EventDraft {
        apply(draft, &LocationsEdit::Add { id: Some(id.into()) })
    }

    #[test]
    fn locations_keep_insertion_order() {
        let draft = EventDraft::empty_template();
        let draft = add(&draft, "loc_1700000000000");
        let draft = add(&draft, "loc_1700000000100");

        let ids: Vec<&str> = draft.locations.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["loc_1700000000000", "loc_1700000000100"]);
        assert_eq!(draft.locations[0].kind, "ceremony");
        assert_eq!(draft.locations[0].latitude, None);
    }

    #[test]
    fn generated_ids_are_unique() {
        let draft = add(&EventDraft::default(), "loc_1700000000000");
        assert_eq!(next_location_id(&draft.locations, 1_700_000_000_000), "loc_1700000000001");
        assert_eq!(next_location_id(&draft.locations, 1_700_000_000_100), "loc_1700000000100");

        let generated = apply(&draft, &LocationsEdit::Add { id: None });
        assert_eq!(generated.locations.len(), 2);
        assert_ne!(generated.locations[0].id, generated.locations[1].id);
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let draft = add(&EventDraft::default(), "loc_a");
        let again = add(&draft, "loc_a");
        assert_eq!(again.locations.len(), 1);
    }

    #[test]
    fn delete_leaves_program_references_dangling() {
        let draft = add(&EventDraft::default(), "loc_a");
        let draft = add(&draft, "loc_b");
        let mut draft = draft;
        Arc::make_mut(&mut draft.program).push(ProgramStep::new(Some("loc_a".into())));

        let next = apply(&draft, &LocationsEdit::Delete { id: "loc_a".into() });

        assert_eq!(next.locations.len(), 1);
        assert_eq!(next.locations[0].id, "loc_b");
        assert_eq!(next.program[0].location_id.as_deref(), Some("loc_a"));
        assert!(Arc::ptr_eq(&draft.program, &next.program));
        assert_eq!(next.step_location_name(&next.program[0]), "Aucun lieu");
    }

    #[test]
    fn update_by_id_after_index_shift() {
        let draft = add(&EventDraft::default(), "loc_a");
        let draft = add(&draft, "loc_b");
        let draft = apply(&draft, &LocationsEdit::DeleteAt { index: 0 });

        let next = apply(
            &draft,
            &LocationsEdit::Update { id: "loc_b".into(), field: LocationField::Name("Château".into()) },
        );
        assert_eq!(next.locations[0].name, "Château");

        let missing = apply(
            &next,
            &LocationsEdit::Update { id: "loc_a".into(), field: LocationField::Name("x".into()) },
        );
        assert_eq!(missing, next);
    }

    #[test]
    fn out_of_range_delete_is_noop() {
        let draft = add(&EventDraft::default(), "loc_a");
        let next = apply(&draft, &LocationsEdit::DeleteAt { index: 3 });
        assert_eq!(next, draft);
    }
}
