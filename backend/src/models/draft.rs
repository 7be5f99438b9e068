use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Draft,
    PendingReview,
    Live,
    Souvenir,
    Expired,
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventStatus::Draft => "draft",
            EventStatus::PendingReview => "pending_review",
            EventStatus::Live => "live",
            EventStatus::Souvenir => "souvenir",
            EventStatus::Expired => "expired",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for EventStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(EventStatus::Draft),
            "pending_review" => Ok(EventStatus::PendingReview),
            "live" => Ok(EventStatus::Live),
            "souvenir" => Ok(EventStatus::Souvenir),
            "expired" => Ok(EventStatus::Expired),
            _ => Err(anyhow::anyhow!("Unknown event status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pack {
    Essential,
    #[default]
    Premium,
    Vip,
}

impl std::fmt::Display for Pack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Pack::Essential => "essential",
            Pack::Premium => "premium",
            Pack::Vip => "vip",
        };
        write!(f, "{s}")
    }
}

/// General information shown on the first editor tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventInfo {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// `YYYY-MM-DDTHH:MM` as typed in the form, or an RFC 3339 timestamp from the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Locale codes, kept in selection order without duplicates.
    #[serde(default)]
    pub language: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests_count_estimate: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorRole {
    Primary,
    Secondary,
    Accent,
    Background,
    Text,
    TextLight,
}

impl ColorRole {
    pub const ALL: [ColorRole; 6] = [
        ColorRole::Primary,
        ColorRole::Secondary,
        ColorRole::Accent,
        ColorRole::Background,
        ColorRole::Text,
        ColorRole::TextLight,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ColorRole::Primary => "primary",
            ColorRole::Secondary => "secondary",
            ColorRole::Accent => "accent",
            ColorRole::Background => "background",
            ColorRole::Text => "text",
            ColorRole::TextLight => "text_light",
        }
    }

    pub fn default_hex(self) -> &'static str {
        match self {
            ColorRole::Primary => "#D4AF37",
            ColorRole::Secondary => "#1A1A2E",
            ColorRole::Accent => "#F5E6CC",
            ColorRole::Background => "#FFFFFF",
            ColorRole::Text => "#333333",
            ColorRole::TextLight => "#FFFFFF",
        }
    }
}

/// Colour palette keyed by role name. Keys outside [`ColorRole`] are kept
/// untouched so a round trip through the editor never drops them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Colors(pub BTreeMap<String, String>);

impl Colors {
    pub fn defaults() -> Self {
        Colors(
            ColorRole::ALL
                .iter()
                .map(|role| (role.key().to_string(), role.default_hex().to_string()))
                .collect(),
        )
    }

    /// Colour for `role`, falling back to the platform default.
    pub fn get(&self, role: ColorRole) -> &str {
        self.0
            .get(role.key())
            .map(String::as_str)
            .unwrap_or_else(|| role.default_hex())
    }

    pub fn set(&mut self, role: ColorRole, hex: impl Into<String>) {
        self.0.insert(role.key().to_string(), hex.into());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSlot {
    Heading,
    Body,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fonts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetSlot {
    Logo,
    Icon,
    Splash,
    BackgroundImage,
    VideoIntro,
}

impl AssetSlot {
    /// Upload folder used by the asset store for this slot.
    pub fn folder(self) -> &'static str {
        match self {
            AssetSlot::Logo => "logos",
            AssetSlot::Icon => "icons",
            AssetSlot::Splash => "splash",
            AssetSlot::BackgroundImage => "backgrounds",
            AssetSlot::VideoIntro => "videos",
        }
    }

    /// Validation class the asset store applies (`image`, `icon` or `video`).
    pub fn asset_type(self) -> &'static str {
        match self {
            AssetSlot::Icon => "icon",
            AssetSlot::VideoIntro => "video",
            _ => "image",
        }
    }
}

impl std::str::FromStr for AssetSlot {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "logo" => Ok(AssetSlot::Logo),
            "icon" => Ok(AssetSlot::Icon),
            "splash" => Ok(AssetSlot::Splash),
            "background_image" => Ok(AssetSlot::BackgroundImage),
            "video_intro" => Ok(AssetSlot::VideoIntro),
            _ => Err(anyhow::anyhow!("Unknown asset slot: {s}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Branding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default)]
    pub colors: Colors,
    #[serde(default)]
    pub fonts: Fonts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splash_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_intro_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Branding {
    pub fn asset(&self, slot: AssetSlot) -> Option<&str> {
        match slot {
            AssetSlot::Logo => self.logo_url.as_deref(),
            AssetSlot::Icon => self.icon_url.as_deref(),
            AssetSlot::Splash => self.splash_url.as_deref(),
            AssetSlot::BackgroundImage => self.background_image_url.as_deref(),
            AssetSlot::VideoIntro => self.video_intro_url.as_deref(),
        }
    }

    pub fn asset_mut(&mut self, slot: AssetSlot) -> &mut Option<String> {
        match slot {
            AssetSlot::Logo => &mut self.logo_url,
            AssetSlot::Icon => &mut self.icon_url,
            AssetSlot::Splash => &mut self.splash_url,
            AssetSlot::BackgroundImage => &mut self.background_image_url,
            AssetSlot::VideoIntro => &mut self.video_intro_url,
        }
    }
}

pub const LOCATION_KINDS: [&str; 5] = ["ceremony", "reception", "party", "brunch", "other"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default = "default_location_kind")]
    pub kind: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub parking_info: String,
    #[serde(default)]
    pub dress_code: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_location_kind() -> String {
    "ceremony".into()
}

impl Location {
    /// Blank location as appended by the "Ajouter un lieu" action.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind: default_location_kind(),
            address: String::new(),
            latitude: None,
            longitude: None,
            time: String::new(),
            notes: String::new(),
            parking_info: String::new(),
            dress_code: String::new(),
            extra: Map::new(),
        }
    }
}

pub const PROGRAM_ICONS: [&str; 16] = [
    "church", "synagogue", "mosque", "houppa", "rings", "cocktail", "dinner", "cake", "dance",
    "music", "photo", "bus", "fireworks", "party", "brunch", "speech",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramStep {
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default = "default_step_icon")]
    pub icon: String,
    /// Weak reference to `Location::id`. May point at a location that no
    /// longer exists; readers render it as "Aucun lieu".
    #[serde(default)]
    pub location_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_step_icon() -> String {
    "party".into()
}

impl ProgramStep {
    pub fn new(location_id: Option<String>) -> Self {
        Self {
            time: String::new(),
            title: String::new(),
            subtitle: String::new(),
            icon: default_step_icon(),
            location_id,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKey {
    Rsvp,
    Gallery,
    Donation,
    Guestbook,
    Playlist,
    SeatingPlan,
    MenuChoice,
    Chat,
}

impl ModuleKey {
    pub const ALL: [ModuleKey; 8] = [
        ModuleKey::Rsvp,
        ModuleKey::Gallery,
        ModuleKey::Donation,
        ModuleKey::Guestbook,
        ModuleKey::Playlist,
        ModuleKey::SeatingPlan,
        ModuleKey::MenuChoice,
        ModuleKey::Chat,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ModuleKey::Rsvp => "rsvp",
            ModuleKey::Gallery => "gallery",
            ModuleKey::Donation => "donation",
            ModuleKey::Guestbook => "guestbook",
            ModuleKey::Playlist => "playlist",
            ModuleKey::SeatingPlan => "seating_plan",
            ModuleKey::MenuChoice => "menu_choice",
            ModuleKey::Chat => "chat",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Module settings keyed by module name. Keys are stored as strings so a
/// module the backend knows about but this build does not survives a save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Modules(pub BTreeMap<String, ModuleConfig>);

impl Modules {
    pub fn get(&self, key: ModuleKey) -> Option<&ModuleConfig> {
        self.0.get(key.key())
    }

    pub fn is_enabled(&self, key: ModuleKey) -> bool {
        self.get(key).map(|m| m.enabled).unwrap_or(false)
    }

    /// Entry for `key`, created disabled when absent.
    pub fn entry(&mut self, key: ModuleKey) -> &mut ModuleConfig {
        self.0.entry(key.key().to_string()).or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Organizer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contacts {
    #[serde(default)]
    pub organizer: Organizer,
    #[serde(default)]
    pub emergency: EmergencyContact,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_souvenir_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub souvenir_delay_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_powered_by: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_mode: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Settings {
    pub fn souvenir_delay_days(&self) -> u32 {
        self.souvenir_delay_days.unwrap_or(7)
    }

    /// The badge is shown unless explicitly switched off.
    pub fn show_powered_by(&self) -> bool {
        self.show_powered_by != Some(false)
    }
}

/// The event configuration being edited.
///
/// Every section sits behind an `Arc`: cloning a draft only bumps reference
/// counts, and an edit copies the one section it touches with
/// [`Arc::make_mut`]. Two drafts that differ by a single field therefore
/// share every other section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub event: Arc<EventInfo>,
    #[serde(default)]
    pub branding: Arc<Branding>,
    #[serde(default)]
    pub locations: Arc<Vec<Location>>,
    #[serde(default)]
    pub program: Arc<Vec<ProgramStep>>,
    #[serde(default)]
    pub modules: Arc<Modules>,
    #[serde(default)]
    pub contacts: Arc<Contacts>,
    #[serde(default)]
    pub settings: Arc<Settings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack: Option<Pack>,
    /// `config` sections that did not parse on load, kept verbatim so a save
    /// does not overwrite them with defaults.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub unreadable_config: Map<String, Value>,
    /// Root attributes the editor does not model (e.g. `stripe_customer_id`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventDraft {
    /// Starting point of the create flow.
    pub fn empty_template() -> Self {
        Self {
            id: None,
            event: Arc::new(EventInfo {
                kind: Some("wedding".into()),
                title: Some(String::new()),
                subtitle: Some(String::new()),
                date: Some(String::new()),
                end_date: Some(String::new()),
                timezone: Some("Europe/Paris".into()),
                language: vec!["fr".into()],
                default_language: Some("fr".into()),
                guests_count_estimate: Some(100),
                extra: Map::new(),
            }),
            branding: Arc::new(Branding {
                app_name: Some(String::new()),
                style: Some("elegant".into()),
                colors: Colors::defaults(),
                fonts: Fonts {
                    heading: Some("Playfair Display".into()),
                    body: Some("Lato".into()),
                    extra: Map::new(),
                },
                ..Branding::default()
            }),
            locations: Arc::default(),
            program: Arc::default(),
            modules: Arc::default(),
            contacts: Arc::default(),
            settings: Arc::default(),
            status: Some(EventStatus::Draft),
            pack: Some(Pack::Premium),
            unreadable_config: Map::new(),
            extra: Map::new(),
        }
    }

    pub fn title(&self) -> &str {
        self.event.title.as_deref().unwrap_or_default()
    }

    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    /// Display name of the location a program step points at.
    pub fn step_location_name(&self, step: &ProgramStep) -> &str {
        match step.location_id.as_deref().and_then(|id| self.location(id)) {
            Some(loc) if !loc.name.is_empty() => &loc.name,
            Some(_) => "Sans nom",
            None => "Aucun lieu",
        }
    }
}
