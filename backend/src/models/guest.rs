use serde::{Deserialize, Serialize};

/// One row of a guest import (CSV columns or JSON objects).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuestImport {
    pub name: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl GuestImport {
    /// "First Last" as stored by the backend.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.as_deref().unwrap_or(""), self.name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Deserialize)]
pub struct ImportGuestsRequest {
    pub guests: Vec<GuestImport>,
}

#[derive(Debug, Default, Serialize)]
pub struct ImportReport {
    pub created: usize,
    pub errors: Vec<String>,
}
