//! Per-event app identity for Expo builds: slugs, EAS profile and the
//! generated `app.json`.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::models::{
    build::{AndroidTarget, BuildCommands, EasProfile, EasProfileConfig, IosTarget},
    draft::ColorRole,
    event::{EventConfig, EventRecord},
};

const DEFAULT_PRIMARY: &str = "#D4AF37";

fn folded(name: &str) -> impl Iterator<Item = char> + '_ {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

/// Identifier-safe slug: lowercase ASCII alphanumerics only, accents folded,
/// at most 30 characters. `"Nathan Lévy-Dupont"` gives `"nathanlevydupont"`.
pub fn normalize_slug(name: &str) -> String {
    folded(name)
        .filter(char::is_ascii_alphanumeric)
        .take(30)
        .collect()
}

/// URL slug for a new event: `"Sarah & David 2026"` gives
/// `"sarah-david-2026"`.
pub fn url_slug(name: &str) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;
    for c in folded(name) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("evenement");
    }
    slug
}

/// EAS build profile for one client app, named after the couple (or the
/// event title when there is none).
pub fn eas_profile(event: &EventRecord, api_url: &str) -> EasProfile {
    let title = event.title.clone().unwrap_or_default();
    let couple_names = event.couple_names.clone().filter(|n| !n.trim().is_empty());
    let slug = normalize_slug(couple_names.as_deref().unwrap_or(&title));
    let profile_name = format!("client-{slug}");
    let bundle_id = format!("fr.oninvite.event.{slug}");

    let env = BTreeMap::from([
        ("EXPO_PUBLIC_EVENT_ID".to_string(), event.id.clone()),
        ("EXPO_PUBLIC_API_URL".to_string(), api_url.to_string()),
        ("EXPO_PUBLIC_EVENT_NAME".to_string(), title),
        ("EXPO_PUBLIC_COUPLE_NAMES".to_string(), couple_names.unwrap_or_default()),
        (
            "EXPO_PUBLIC_PRIMARY_COLOR".to_string(),
            event.primary_color.clone().unwrap_or_else(|| DEFAULT_PRIMARY.into()),
        ),
    ]);

    EasProfile {
        config: EasProfileConfig {
            extends: "production".into(),
            env,
            ios: IosTarget { bundle_identifier: bundle_id.clone() },
            android: AndroidTarget { package: bundle_id },
        },
        build_commands: BuildCommands {
            ios: format!("eas build --profile {profile_name} --platform ios"),
            android: format!("eas build --profile {profile_name} --platform android"),
            all: format!("eas build --profile {profile_name} --platform all"),
        },
        profile_name,
    }
}

/// What a build needs to know about its event.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildEvent {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub kind: String,
    pub primary_color: Option<String>,
    pub app_icon: Option<String>,
}

impl BuildEvent {
    pub fn from_record(record: EventRecord) -> Self {
        let (config, _) = EventConfig::read(&record.id, record.config);
        let branding = config.branding.unwrap_or_default();
        let title = record.title.unwrap_or_else(|| "Mon Événement".into());
        let primary_color = record
            .primary_color
            .or_else(|| branding.colors.0.get(ColorRole::Primary.key()).cloned());

        Self {
            slug: record
                .slug
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| url_slug(&title)),
            id: record.id,
            title,
            kind: record.kind.unwrap_or_else(|| "wedding".into()),
            primary_color,
            app_icon: branding.icon_url.clone().filter(|u| !u.is_empty()),
        }
    }

    /// Stand-in used when the event API cannot provide the event.
    pub fn fallback(event_id: &str) -> Self {
        let short: String = event_id.chars().take(8).collect();
        Self {
            id: event_id.to_string(),
            slug: format!("event-{short}"),
            title: "Mon Événement".into(),
            kind: "wedding".into(),
            primary_color: None,
            app_icon: None,
        }
    }

    fn color(&self) -> &str {
        self.primary_color.as_deref().unwrap_or(DEFAULT_PRIMARY)
    }
}

/// The Expo `app.json` of an event app.
pub fn app_config(event: &BuildEvent, api_url: &str, project_id: Option<&str>) -> Value {
    let bundle_id = format!("fr.oninvite.{}", normalize_slug(&event.slug));

    json!({
        "expo": {
            "name": event.title,
            "slug": event.slug,
            "version": "1.0.0",
            "orientation": "portrait",
            "icon": event.app_icon.as_deref().unwrap_or("./assets/icon.png"),
            "userInterfaceStyle": "light",
            "splash": { "backgroundColor": event.color() },
            "ios": {
                "supportsTablet": true,
                "bundleIdentifier": bundle_id,
                "buildNumber": "1"
            },
            "android": {
                "package": bundle_id,
                "versionCode": 1,
                "adaptiveIcon": { "backgroundColor": event.color() }
            },
            "extra": {
                "eventId": event.id,
                "eventSlug": event.slug,
                "apiUrl": api_url,
                "eas": { "projectId": project_id }
            },
            "plugins": [
                "expo-font",
                ["expo-notifications", {
                    "icon": "./assets/notification-icon.png",
                    "color": event.color()
                }]
            ]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_folds_accents_and_strips_punctuation() {
        assert_eq!(normalize_slug("Nathan Lévy-Dupont"), "nathanlevydupont");
        assert_eq!(normalize_slug("Bat-Mitsva de Noémie & Élise pour toujours"), "batmitsvadenoemieelisepourtouj");
        assert_eq!(normalize_slug("Bat-Mitsva de Noémie & Élise pour toujours").len(), 30);
        assert_eq!(normalize_slug("!!!"), "");
    }

    #[test]
    fn url_slug_is_kebab_case() {
        assert_eq!(url_slug("Sarah & David 2026"), "sarah-david-2026");
        assert_eq!(url_slug("Sarah et David 2026"), "sarah-et-david-2026");
        assert_eq!(url_slug("  Léa  "), "lea");
        assert_eq!(url_slug(""), "evenement");
    }

    #[test]
    fn profile_uses_couple_names() {
        let record = EventRecord {
            id: "evt_1".into(),
            title: Some("Mariage".into()),
            couple_names: Some("Léa & Tom".into()),
            ..EventRecord::default()
        };
        let profile = eas_profile(&record, "https://api.oninvite.fr");

        assert_eq!(profile.profile_name, "client-leatom");
        assert_eq!(profile.config.ios.bundle_identifier, "fr.oninvite.event.leatom");
        assert_eq!(profile.config.env["EXPO_PUBLIC_PRIMARY_COLOR"], "#D4AF37");
        assert_eq!(profile.build_commands.android, "eas build --profile client-leatom --platform android");

        let wire = serde_json::to_value(&profile).unwrap();
        assert_eq!(wire["profileName"], "client-leatom");
        assert_eq!(wire["buildCommands"]["all"], "eas build --profile client-leatom --platform all");
        assert_eq!(wire["config"]["ios"]["bundleIdentifier"], "fr.oninvite.event.leatom");
    }

    #[test]
    fn fallback_event_and_app_config() {
        let event = BuildEvent::fallback("a1b2c3d4e5f6");
        assert_eq!(event.slug, "event-a1b2c3d4");

        let config = app_config(&event, "https://api.oninvite.fr", None);
        assert_eq!(config["expo"]["ios"]["bundleIdentifier"], "fr.oninvite.eventa1b2c3d4");
        assert_eq!(config["expo"]["splash"]["backgroundColor"], "#D4AF37");
        assert!(config["expo"]["extra"]["eas"]["projectId"].is_null());
    }

    #[test]
    fn build_event_reads_branding_from_config() {
        let record = EventRecord {
            id: "9".into(),
            title: Some("Nathan".into()),
            config: json!({ "branding": { "colors": { "primary": "#112233" }, "icon_url": "https://cdn/x.png" } }),
            ..EventRecord::default()
        };
        let event = BuildEvent::from_record(record);
        assert_eq!(event.slug, "nathan");
        assert_eq!(event.primary_color.as_deref(), Some("#112233"));
        assert_eq!(event.app_icon.as_deref(), Some("https://cdn/x.png"));
    }
}
