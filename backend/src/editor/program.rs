use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::draft::{EventDraft, ProgramStep};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepField {
    Time(String),
    Title(String),
    Subtitle(String),
    Icon(String),
    LocationId(Option<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramEdit {
    /// Append a step pointing at the first location, if any.
    Add,
    Update { index: usize, field: StepField },
    Delete { index: usize },
    Move { index: usize, direction: Direction },
}

pub fn apply(draft: &EventDraft, edit: &ProgramEdit) -> EventDraft {
    let len = draft.program.len();
    match edit {
        ProgramEdit::Add => {
            let first = draft.locations.first().map(|l| l.id.clone());
            let mut next = draft.clone();
            Arc::make_mut(&mut next.program).push(ProgramStep::new(first));
            next
        }
        ProgramEdit::Update { index, field } if *index < len => {
            let mut next = draft.clone();
            let step = &mut Arc::make_mut(&mut next.program)[*index];
            match field {
                StepField::Time(v) => step.time = v.clone(),
                StepField::Title(v) => step.title = v.clone(),
                StepField::Subtitle(v) => step.subtitle = v.clone(),
                StepField::Icon(v) => step.icon = v.clone(),
                StepField::LocationId(v) => {
                    step.location_id = v.clone().filter(|id| !id.is_empty())
                }
            }
            next
        }
        ProgramEdit::Delete { index } if *index < len => {
            let mut next = draft.clone();
            Arc::make_mut(&mut next.program).remove(*index);
            next
        }
        ProgramEdit::Move { index, direction } if *index < len => {
            let target = match direction {
                Direction::Up => index.checked_sub(1),
                Direction::Down => Some(index + 1).filter(|t| *t < len),
            };
            let Some(target) = target else {
                return draft.clone();
            };
            let mut next = draft.clone();
            Arc::make_mut(&mut next.program).swap(*index, target);
            next
        }
        _ => draft.clone(),
    }
}
