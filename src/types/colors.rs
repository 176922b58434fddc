use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Notion text and block colors.
///
/// The `Light*` variants are Notion's `*_background` colors. Their API names
/// are kept distinct so a copied block keeps its exact color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    #[default]
    Default,
    Gray,
    Brown,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    LightGray,
    LightBrown,
    LightRed,
    LightOrange,
    LightYellow,
    LightGreen,
    LightBlue,
    LightPurple,
    LightPink,
}

impl std::str::FromStr for Color {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Color::Default),
            "gray" => Ok(Color::Gray),
            "brown" => Ok(Color::Brown),
            "red" => Ok(Color::Red),
            "orange" => Ok(Color::Orange),
            "yellow" => Ok(Color::Yellow),
            "green" => Ok(Color::Green),
            "blue" => Ok(Color::Blue),
            "purple" => Ok(Color::Purple),
            "pink" => Ok(Color::Pink),
            "gray_background" | "light_gray" => Ok(Color::LightGray),
            "brown_background" | "light_brown" => Ok(Color::LightBrown),
            "red_background" | "light_red" => Ok(Color::LightRed),
            "orange_background" | "light_orange" => Ok(Color::LightOrange),
            "yellow_background" | "light_yellow" => Ok(Color::LightYellow),
            "green_background" | "light_green" => Ok(Color::LightGreen),
            "blue_background" | "light_blue" => Ok(Color::LightBlue),
            "purple_background" | "light_purple" => Ok(Color::LightPurple),
            "pink_background" | "light_pink" => Ok(Color::LightPink),
            _ => Err(ValidationError::InvalidColor(s.to_string())),
        }
    }
}

impl Color {
    /// The color name the Notion API expects in request bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Default => "default",
            Color::Gray => "gray",
            Color::Brown => "brown",
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::Pink => "pink",
            Color::LightGray => "gray_background",
            Color::LightBrown => "brown_background",
            Color::LightRed => "red_background",
            Color::LightOrange => "orange_background",
            Color::LightYellow => "yellow_background",
            Color::LightGreen => "green_background",
            Color::LightBlue => "blue_background",
            Color::LightPurple => "purple_background",
            Color::LightPink => "pink_background",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
