use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::draft::{AssetSlot, ColorRole, EventDraft, FontSlot};

pub const STYLES: [&str; 6] = ["elegant", "modern", "rustic", "minimalist", "romantic", "festive"];

pub const FONTS: [&str; 8] = [
    "Playfair Display",
    "Lato",
    "Montserrat",
    "Open Sans",
    "Roboto",
    "Dancing Script",
    "Great Vibes",
    "Cormorant Garamond",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrandingEdit {
    AppName(String),
    Style(String),
    Color { role: ColorRole, hex: String },
    Font { slot: FontSlot, family: String },
    /// `None` clears the asset.
    Asset { slot: AssetSlot, url: Option<String> },
}

pub fn apply(draft: &EventDraft, edit: &BrandingEdit) -> EventDraft {
    let mut next = draft.clone();
    let branding = Arc::make_mut(&mut next.branding);
    match edit {
        BrandingEdit::AppName(v) => branding.app_name = Some(v.clone()),
        BrandingEdit::Style(v) => branding.style = Some(v.clone()),
        BrandingEdit::Color { role, hex } => branding.colors.set(*role, hex.clone()),
        BrandingEdit::Font { slot, family } => match slot {
            FontSlot::Heading => branding.fonts.heading = Some(family.clone()),
            FontSlot::Body => branding.fonts.body = Some(family.clone()),
        },
        BrandingEdit::Asset { slot, url } => {
            *branding.asset_mut(*slot) = url.clone().filter(|u| !u.is_empty());
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_edit_keeps_other_roles_and_unknown_keys() {
        let mut draft = EventDraft::empty_template();
        Arc::make_mut(&mut draft.branding)
            .colors
            .0
            .insert("halo".into(), "#010203".into());

        let next = apply(
            &draft,
            &BrandingEdit::Color { role: ColorRole::Accent, hex: "#112233".into() },
        );

        assert_eq!(next.branding.colors.get(ColorRole::Accent), "#112233");
        assert_eq!(next.branding.colors.get(ColorRole::Primary), "#D4AF37");
        assert_eq!(next.branding.colors.0["halo"], "#010203");
        assert_eq!(draft.branding.colors.get(ColorRole::Accent), "#F5E6CC");
        assert!(Arc::ptr_eq(&draft.event, &next.event));
    }

    #[test]
    fn asset_edit_sets_and_clears_url() {
        let draft = EventDraft::empty_template();
        let with_logo = apply(
            &draft,
            &BrandingEdit::Asset {
                slot: AssetSlot::Logo,
                url: Some("https://cdn.example.com/logo.png".into()),
            },
        );
        assert_eq!(with_logo.branding.asset(AssetSlot::Logo), Some("https://cdn.example.com/logo.png"));

        let cleared = apply(&with_logo, &BrandingEdit::Asset { slot: AssetSlot::Logo, url: None });
        assert_eq!(cleared.branding.logo_url, None);
    }

    #[test]
    fn font_edit() {
        let draft = EventDraft::empty_template();
        let next = apply(
            &draft,
            &BrandingEdit::Font { slot: FontSlot::Body, family: "Roboto".into() },
        );
        assert_eq!(next.branding.fonts.body.as_deref(), Some("Roboto"));
        assert_eq!(next.branding.fonts.heading.as_deref(), Some("Playfair Display"));
    }
}
