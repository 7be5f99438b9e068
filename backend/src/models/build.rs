use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Build profile to merge into `eas.json` for one client app.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EasProfile {
    pub profile_name: String,
    pub config: EasProfileConfig,
    pub build_commands: BuildCommands,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EasProfileConfig {
    pub extends: String,
    pub env: BTreeMap<String, String>,
    pub ios: IosTarget,
    pub android: AndroidTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IosTarget {
    pub bundle_identifier: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AndroidTarget {
    pub package: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildCommands {
    pub ios: String,
    pub android: String,
    pub all: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    #[default]
    All,
}

impl Platform {
    /// Concrete platforms a request expands to.
    pub fn targets(self) -> Vec<Platform> {
        match self {
            Platform::All => vec![Platform::Ios, Platform::Android],
            p => vec![p],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
            Platform::All => "all",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildProfile {
    Development,
    Preview,
    #[default]
    Production,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildRequest {
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub profile: BuildProfile,
}

/// Outcome of one platform build submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildResult {
    pub platform: Platform,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_id: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildList {
    pub builds: Vec<Value>,
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
