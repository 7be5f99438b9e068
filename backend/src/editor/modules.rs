use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::draft::{EventDraft, ModuleKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModulesEdit {
    Toggle { module: ModuleKey },
    SetEnabled { module: ModuleKey, enabled: bool },
    SetField { module: ModuleKey, key: String, value: Value },
}

/// Disabling a module only flips `enabled`; its settings stay in place so
/// re-enabling restores them.
pub fn apply(draft: &EventDraft, edit: &ModulesEdit) -> EventDraft {
    let mut next = draft.clone();
    let modules = Arc::make_mut(&mut next.modules);
    match edit {
        ModulesEdit::Toggle { module } => {
            let entry = modules.entry(*module);
            entry.enabled = !entry.enabled;
        }
        ModulesEdit::SetEnabled { module, enabled } => modules.entry(*module).enabled = *enabled,
        ModulesEdit::SetField { module, key, value } => {
            let entry = modules.entry(*module);
            if key == "enabled" {
                entry.enabled = value.as_bool().unwrap_or(false);
            } else {
                entry.fields.insert(key.clone(), value.clone());
            }
        }
    }
    next
}
