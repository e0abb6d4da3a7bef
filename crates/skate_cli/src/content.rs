//! Page content payloads
//!
//! A page arrives as JSON: a list of slices discriminated by `slice_type`, plus the site
//! settings' footer boards. Only the hero's board fields and the footer textures reach
//! the scenes; everything else is recognised and passed over.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use skate_viewer::{AppearanceFields, BoardAppearance};
use std::fs;
use std::path::Path;

/// Linked image; `url` is absent when the editor left the field empty
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ImageField {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

/// Hero fields the board viewer reads
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct HeroPrimary {
    #[serde(default)]
    pub skateboard_deck_texture: Option<ImageField>,
    #[serde(default)]
    pub skateboard_wheel_texture: Option<ImageField>,
    #[serde(default)]
    pub skateboard_truck_color: Option<String>,
    #[serde(default)]
    pub skateboard_bolt_color: Option<String>,
}

impl HeroPrimary {
    pub fn appearance_fields(&self) -> AppearanceFields {
        AppearanceFields {
            deck_texture_url: image_url(&self.skateboard_deck_texture),
            wheel_texture_url: image_url(&self.skateboard_wheel_texture),
            truck_color: self.skateboard_truck_color.clone(),
            bolt_color: self.skateboard_bolt_color.clone(),
        }
    }
}

fn image_url(field: &Option<ImageField>) -> Option<String> {
    field.as_ref().and_then(|f| f.url.clone())
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "slice_type", rename_all = "snake_case")]
pub enum Slice {
    Hero {
        #[serde(default)]
        primary: HeroPrimary,
    },
    ProductGrid {
        #[serde(default)]
        primary: serde_json::Value,
    },
    TeamGrid {
        #[serde(default)]
        primary: serde_json::Value,
    },
    TextAndImages {
        #[serde(default)]
        primary: serde_json::Value,
    },
    VideoBlock {
        #[serde(default)]
        primary: serde_json::Value,
    },
    #[serde(other)]
    Unknown,
}

impl Slice {
    pub fn kind(&self) -> &'static str {
        match self {
            Slice::Hero { .. } => "hero",
            Slice::ProductGrid { .. } => "product_grid",
            Slice::TeamGrid { .. } => "team_grid",
            Slice::TextAndImages { .. } => "text_and_images",
            Slice::VideoBlock { .. } => "video_block",
            Slice::Unknown => "unknown",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct FooterBoard {
    #[serde(default)]
    pub skateboard: Option<ImageField>,
}

/// One page with its footer settings
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct PagePayload {
    #[serde(default)]
    pub slices: Vec<Slice>,
    #[serde(default)]
    pub footer_skateboards: Vec<FooterBoard>,
}

impl PagePayload {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// First hero slice, if any
    pub fn hero(&self) -> Option<&HeroPrimary> {
        self.slices.iter().find_map(|slice| match slice {
            Slice::Hero { primary } => Some(primary),
            _ => None,
        })
    }

    /// Board appearance with defaults for anything the hero leaves empty
    pub fn appearance(&self) -> Result<BoardAppearance> {
        let fields = self.hero().map(HeroPrimary::appearance_fields).unwrap_or_default();
        fields.resolve().context("Invalid hero board fields")
    }

    /// Footer texture URLs in order; boards without an image are skipped
    pub fn footer_textures(&self) -> Vec<String> {
        self.footer_skateboards
            .iter()
            .filter_map(|board| image_url(&board.skateboard))
            .filter(|url| !url.trim().is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skate_core::Color;

    const PAGE: &str = r##"{
        "slices": [
            {
                "slice_type": "hero",
                "primary": {
                    "skateboard_deck_texture": { "url": "https://cdn.example/deck.webp" },
                    "skateboard_wheel_texture": { "url": null },
                    "skateboard_truck_color": "#112233",
                    "skateboard_bolt_color": ""
                }
            },
            { "slice_type": "product_grid", "primary": { "heading": "Latest drops" } },
            { "slice_type": "video_block" }
        ],
        "footer_skateboards": [
            { "skateboard": { "url": "/boards/a.png" } },
            { "skateboard": {} },
            { "skateboard": { "url": "/boards/b.png" } }
        ]
    }"##;

    #[test]
    fn test_hero_fields_resolve_with_defaults() {
        let page: PagePayload = serde_json::from_str(PAGE).unwrap();
        let appearance = page.appearance().unwrap();
        assert_eq!(appearance.deck_texture_url, "https://cdn.example/deck.webp");
        assert_eq!(
            appearance.wheel_texture_url,
            skate_viewer::appearance::DEFAULT_WHEEL_TEXTURE
        );
        assert_eq!(appearance.truck_color, Color::from_hex(0x112233));
        assert_eq!(appearance.bolt_color, Color::from_hex(0x6F6E6A));
    }

    #[test]
    fn test_slices_are_recognised() {
        let page: PagePayload = serde_json::from_str(PAGE).unwrap();
        let kinds: Vec<_> = page.slices.iter().map(Slice::kind).collect();
        assert_eq!(kinds, ["hero", "product_grid", "video_block"]);
    }

    #[test]
    fn test_unknown_slice_type_is_tolerated() {
        let page: PagePayload =
            serde_json::from_str(r#"{"slices": [{"slice_type": "newsletter"}]}"#).unwrap();
        assert_eq!(page.slices, vec![Slice::Unknown]);
        assert!(page.hero().is_none());
        assert_eq!(page.appearance().unwrap(), BoardAppearance::default());
    }

    #[test]
    fn test_footer_textures_skip_empty_images() {
        let page: PagePayload = serde_json::from_str(PAGE).unwrap();
        assert_eq!(page.footer_textures(), ["/boards/a.png", "/boards/b.png"]);
    }

    #[test]
    fn test_empty_payload_is_valid() {
        let page: PagePayload = serde_json::from_str("{}").unwrap();
        assert!(page.slices.is_empty());
        assert!(page.footer_textures().is_empty());
    }
}
