//! Board appearance
//!
//! The viewer is configured once per mount with resolved texture URLs and colors. Content
//! fields arrive optional; `AppearanceFields::resolve` substitutes the stock board for
//! anything empty so the viewer itself never sees a missing value.

use crate::error::{Result, ViewerError};
use serde::{Deserialize, Serialize};
use skate_core::Color;

pub const DEFAULT_DECK_TEXTURE: &str = "/skateboard/Deck.webp";
pub const DEFAULT_WHEEL_TEXTURE: &str = "/skateboard/SkateWheel1.png";
pub const DEFAULT_TRUCK_COLOR: &str = "#6F6E6A";
pub const DEFAULT_BOLT_COLOR: &str = "#6F6E6A";

/// Immutable look of the mounted board
#[derive(Clone, Debug, PartialEq)]
pub struct BoardAppearance {
    pub deck_texture_url: String,
    pub wheel_texture_url: String,
    pub truck_color: Color,
    pub bolt_color: Color,
}

impl Default for BoardAppearance {
    fn default() -> Self {
        Self {
            deck_texture_url: DEFAULT_DECK_TEXTURE.to_string(),
            wheel_texture_url: DEFAULT_WHEEL_TEXTURE.to_string(),
            truck_color: Color::from_hex(0x6F6E6A),
            bolt_color: Color::from_hex(0x6F6E6A),
        }
    }
}

/// Appearance as authored, every field optional
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppearanceFields {
    #[serde(default)]
    pub deck_texture_url: Option<String>,
    #[serde(default)]
    pub wheel_texture_url: Option<String>,
    #[serde(default)]
    pub truck_color: Option<String>,
    #[serde(default)]
    pub bolt_color: Option<String>,
}

impl AppearanceFields {
    /// Fill empty fields with defaults and parse colors
    pub fn resolve(&self) -> Result<BoardAppearance> {
        Ok(BoardAppearance {
            deck_texture_url: non_empty(&self.deck_texture_url)
                .unwrap_or(DEFAULT_DECK_TEXTURE)
                .to_string(),
            wheel_texture_url: non_empty(&self.wheel_texture_url)
                .unwrap_or(DEFAULT_WHEEL_TEXTURE)
                .to_string(),
            truck_color: parse_color(
                "truck",
                non_empty(&self.truck_color).unwrap_or(DEFAULT_TRUCK_COLOR),
            )?,
            bolt_color: parse_color(
                "bolt",
                non_empty(&self.bolt_color).unwrap_or(DEFAULT_BOLT_COLOR),
            )?,
        })
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_color(field: &'static str, value: &str) -> Result<Color> {
    Color::parse_hex(value).map_err(|source| ViewerError::InvalidColor { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_fall_back_to_stock_board() {
        let fields = AppearanceFields {
            deck_texture_url: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(fields.resolve().unwrap(), BoardAppearance::default());
    }

    #[test]
    fn test_authored_fields_win() {
        let fields = AppearanceFields {
            deck_texture_url: Some("https://cdn.example/deck.png".into()),
            wheel_texture_url: None,
            truck_color: Some("#FF0000".into()),
            bolt_color: Some("".into()),
        };
        let appearance = fields.resolve().unwrap();
        assert_eq!(appearance.deck_texture_url, "https://cdn.example/deck.png");
        assert_eq!(appearance.wheel_texture_url, DEFAULT_WHEEL_TEXTURE);
        assert_eq!(appearance.truck_color, Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(appearance.bolt_color, Color::from_hex(0x6F6E6A));
    }

    #[test]
    fn test_bad_color_names_the_field() {
        let fields = AppearanceFields {
            bolt_color: Some("chartreuse".into()),
            ..Default::default()
        };
        match fields.resolve() {
            Err(ViewerError::InvalidColor { field, .. }) => assert_eq!(field, "bolt"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_fields_deserialize_with_missing_keys() {
        let fields: AppearanceFields =
            serde_json::from_str(r##"{"truck_color": "#123456"}"##).unwrap();
        assert_eq!(fields.truck_color.as_deref(), Some("#123456"));
        assert!(fields.deck_texture_url.is_none());
    }
}
