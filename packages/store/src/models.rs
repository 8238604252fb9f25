//! # Domain primitives shared by the wizard, the client and the server
//!
//! | Type | Represents |
//! |------|-----------|
//! | [`CardType`] | Which kind of card the wizard is building: a personal card owned by one user, or a team card whose members each get their own QR code. |
//! | [`HexColor`] | A validated `#rrggbb` color. Parsing accepts `#rgb` shorthand and upper case and normalises to six lowercase digits, so the same color is always cached and stored under the same spelling. |
//! | [`Palette`] | The primary/secondary pair chosen in the two color steps. |
//! | [`CardTarget`] | The row the wizard is editing: a card id or a team id. |
//!
//! These types serialise as plain strings (`"personal"`, `"#1e3a8a"`) so they
//! can be written to the durable cache and sent over the wire unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Kind of card being created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    #[default]
    Personal,
    Team,
}

impl CardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Personal => "personal",
            CardType::Team => "team",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "personal" => Ok(CardType::Personal),
            "team" => Ok(CardType::Team),
            other => Err(ParseError::CardType(other.to_string())),
        }
    }
}

/// Error returned when a cached or submitted value cannot be parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown card type: {0:?}")]
    CardType(String),
    #[error("invalid color: {0:?} (expected #rrggbb)")]
    Color(String),
}

/// A `#rrggbb` color, always lowercase.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HexColor(String);

impl HexColor {
    pub const DEFAULT_PRIMARY: &'static str = "#1e3a8a";
    pub const DEFAULT_SECONDARY: &'static str = "#f59e0b";

    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ParseError::Color(input.to_string()))?;

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseError::Color(input.to_string()));
        }

        let expanded = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => digits.to_string(),
            _ => return Err(ParseError::Color(input.to_string())),
        };

        Ok(Self(format!("#{}", expanded.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `(r, g, b)` components.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |i: usize| u8::from_str_radix(&self.0[i..i + 2], 16).unwrap_or(0);
        (channel(1), channel(3), channel(5))
    }

    /// Black or white, whichever reads better on top of this color.
    pub fn contrasting_text(&self) -> HexColor {
        let (r, g, b) = self.rgb();
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        if luma > 150.0 {
            HexColor("#111111".to_string())
        } else {
            HexColor("#ffffff".to_string())
        }
    }

    pub fn default_primary() -> Self {
        Self(Self::DEFAULT_PRIMARY.to_string())
    }

    pub fn default_secondary() -> Self {
        Self(Self::DEFAULT_SECONDARY.to_string())
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HexColor {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        HexColor::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Primary and secondary card colors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: HexColor,
    pub secondary: HexColor,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: HexColor::default_primary(),
            secondary: HexColor::default_secondary(),
        }
    }
}

impl Palette {
    /// Fill missing colors from the defaults.
    pub fn from_parts(primary: Option<HexColor>, secondary: Option<HexColor>) -> Self {
        Self {
            primary: primary.unwrap_or_else(HexColor::default_primary),
            secondary: secondary.unwrap_or_else(HexColor::default_secondary),
        }
    }
}

/// The row a wizard run is editing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum CardTarget {
    Card(i64),
    Team(i64),
}

impl CardTarget {
    pub fn new(card_type: CardType, id: i64) -> Self {
        match card_type {
            CardType::Personal => CardTarget::Card(id),
            CardType::Team => CardTarget::Team(id),
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            CardTarget::Card(id) | CardTarget::Team(id) => *id,
        }
    }

    pub fn card_type(&self) -> CardType {
        match self {
            CardTarget::Card(_) => CardType::Personal,
            CardTarget::Team(_) => CardType::Team,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_type_parse() {
        assert_eq!("personal".parse::<CardType>(), Ok(CardType::Personal));
        assert_eq!(" team ".parse::<CardType>(), Ok(CardType::Team));
        assert!("Team".parse::<CardType>().is_err());
        assert!("".parse::<CardType>().is_err());
        assert_eq!(CardType::Team.to_string(), "team");
    }

    #[test]
    fn test_color_normalisation() {
        assert_eq!(HexColor::parse("#ABCDEF").unwrap().as_str(), "#abcdef");
        assert_eq!(HexColor::parse("#fA0").unwrap().as_str(), "#ffaa00");
        assert_eq!(HexColor::parse("  #123456 ").unwrap().as_str(), "#123456");
    }

    #[test]
    fn test_color_rejects_garbage() {
        for bad in ["123456", "#12345", "#1234567", "#ggg", "", "#"] {
            assert!(HexColor::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_color_rgb_and_contrast() {
        let navy = HexColor::parse("#1e3a8a").unwrap();
        assert_eq!(navy.rgb(), (0x1e, 0x3a, 0x8a));
        assert_eq!(navy.contrasting_text().as_str(), "#ffffff");

        let amber = HexColor::parse("#f59e0b").unwrap();
        assert_eq!(amber.contrasting_text().as_str(), "#111111");
    }

    #[test]
    fn test_color_serde_validates() {
        let color: HexColor = serde_json::from_str("\"#ABC\"").unwrap();
        assert_eq!(color.as_str(), "#aabbcc");
        assert!(serde_json::from_str::<HexColor>("\"blue\"").is_err());
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"#aabbcc\"");
    }

    #[test]
    fn test_target_accessors() {
        let t = CardTarget::new(CardType::Team, 9);
        assert_eq!(t, CardTarget::Team(9));
        assert_eq!(t.id(), 9);
        assert_eq!(t.card_type(), CardType::Team);
        assert_eq!(CardTarget::new(CardType::Personal, 3), CardTarget::Card(3));
    }

    #[test]
    fn test_palette_defaults() {
        let p = Palette::from_parts(Some(HexColor::parse("#000").unwrap()), None);
        assert_eq!(p.primary.as_str(), "#000000");
        assert_eq!(p.secondary.as_str(), HexColor::DEFAULT_SECONDARY);
    }
}
