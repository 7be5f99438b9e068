use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use crate::models::draft::EventDraft;

use super::api_client::ApiError;
use super::repository::EventRepository;

/// In-memory event store used when no backend is configured
/// (`USE_FIXTURES=1`) and by tests.
#[derive(Debug, Default)]
pub struct FixtureRepository {
    events: RwLock<BTreeMap<String, EventDraft>>,
    fail_writes: AtomicBool,
}

impl FixtureRepository {
    pub fn with_demo_event() -> Self {
        let repo = Self::default();
        repo.insert(Self::demo_event());
        repo
    }

    /// The "Sarah & David" wedding, id `1`.
    pub fn demo_event() -> EventDraft {
        let raw = json!({
            "id": "1",
            "event": {
                "type": "wedding",
                "title": "Sarah & David",
                "subtitle": "Nous nous marions !",
                "date": "2026-06-15T17:00",
                "end_date": "2026-06-16T03:00",
                "timezone": "Europe/Paris",
                "language": ["fr", "he"],
                "default_language": "fr",
                "guests_count_estimate": 250
            },
            "branding": {
                "app_name": "Sarah & David",
                "logo_url": "",
                "colors": {
                    "primary": "#D4AF37",
                    "secondary": "#1A1A2E",
                    "accent": "#F5E6CC",
                    "background": "#FFFFFF",
                    "text": "#333333",
                    "text_light": "#FFFFFF"
                },
                "fonts": { "heading": "Playfair Display", "body": "Lato" },
                "style": "elegant"
            },
            "locations": [
                {
                    "id": "loc_ceremony",
                    "name": "Synagogue de la Victoire",
                    "type": "ceremony",
                    "address": "44 Rue de la Victoire, 75009 Paris",
                    "latitude": 48.8756,
                    "longitude": 2.3372,
                    "time": "17:00",
                    "notes": "Merci d'arriver 15 minutes en avance",
                    "parking_info": "Parking Q-Park Chaussée d'Antin à 200m",
                    "dress_code": "Tenue de soirée"
                },
                {
                    "id": "loc_reception",
                    "name": "Château de Versainville",
                    "type": "reception",
                    "address": "14 Rue du Château, 14700 Versainville",
                    "latitude": 48.9512,
                    "longitude": -0.1847,
                    "time": "20:00",
                    "notes": "Navettes depuis la synagogue à 19h00 et 19h30",
                    "parking_info": "Parking gratuit sur place",
                    "dress_code": ""
                }
            ],
            "program": [
                { "time": "17:00", "title": "Cérémonie religieuse", "subtitle": "Synagogue de la Victoire", "icon": "synagogue", "location_id": "loc_ceremony" },
                { "time": "17:45", "title": "Houppa", "subtitle": "Dans le jardin de la synagogue", "icon": "houppa", "location_id": "loc_ceremony" },
                { "time": "19:00", "title": "Navettes vers la réception", "subtitle": "Départ devant la synagogue", "icon": "bus", "location_id": "loc_ceremony" },
                { "time": "20:00", "title": "Cocktail", "subtitle": "Dans les jardins du château", "icon": "cocktail", "location_id": "loc_reception" },
                { "time": "21:30", "title": "Dîner", "subtitle": "Grande salle du château", "icon": "dinner", "location_id": "loc_reception" },
                { "time": "00:00", "title": "Soirée dansante", "subtitle": "Jusqu'au bout de la nuit !", "icon": "dance", "location_id": "loc_reception" }
            ],
            "modules": {
                "rsvp": { "enabled": true, "deadline": "2026-05-15", "allow_plus_ones": true, "max_plus_ones": 2, "ask_dietary": true, "ask_allergies": true },
                "gallery": { "enabled": true, "allow_upload": true, "moderation": true },
                "donation": { "enabled": true, "goal_amount": 5000, "show_progress": true, "allow_anonymous": true },
                "guestbook": { "enabled": true, "moderation": false },
                "playlist": { "enabled": true, "max_suggestions_per_user": 3 },
                "seating_plan": { "enabled": true, "allow_search": true }
            },
            "contacts": {
                "organizer": { "name": "Sarah Cohen", "phone": "+33 6 12 34 56 78", "email": "sarah.david2026@gmail.com" },
                "emergency": { "name": "Rachel (témoin)", "phone": "+33 6 98 76 54 32" }
            },
            "settings": {
                "auto_souvenir_mode": true,
                "souvenir_delay_days": 7,
                "show_powered_by": true
            },
            "status": "live",
            "pack": "premium"
        });

        serde_json::from_value(raw).unwrap_or_else(|e| {
            tracing::error!("Demo event fixture does not parse: {}", e);
            EventDraft::empty_template()
        })
    }

    pub fn insert(&self, draft: EventDraft) {
        let id = draft.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
        self.events
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, draft);
    }

    pub fn get(&self, event_id: &str) -> Option<EventDraft> {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.events.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make every subsequent create/update fail with a 503.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), ApiError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ApiError::Backend {
                status: 503,
                body: json!({ "detail": "Service indisponible" }),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl EventRepository for FixtureRepository {
    async fn load(&self, event_id: &str) -> Result<EventDraft, ApiError> {
        self.get(event_id)
            .ok_or_else(|| ApiError::NotFound(event_id.to_string()))
    }

    async fn create(&self, draft: &EventDraft) -> Result<String, ApiError> {
        self.check_writable()?;
        let id = Uuid::new_v4().to_string();
        let mut stored = draft.clone();
        stored.id = Some(id.clone());
        self.insert(stored);
        Ok(id)
    }

    async fn update(&self, event_id: &str, draft: &EventDraft) -> Result<(), ApiError> {
        self.check_writable()?;
        let mut events = self.events.write().unwrap_or_else(PoisonError::into_inner);
        let slot = events
            .get_mut(event_id)
            .ok_or_else(|| ApiError::NotFound(event_id.to_string()))?;
        let mut stored = draft.clone();
        stored.id = Some(event_id.to_string());
        *slot = stored;
        Ok(())
    }
}
