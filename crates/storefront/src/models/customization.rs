//! Customization (bespoke design request) rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lynora_core::{CustomizationId, CustomizationStatus, SessionId};

/// Font offered for custom text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FontStyle {
    #[default]
    Arial,
    Georgia,
    #[serde(rename = "Courier New")]
    CourierNew,
    #[serde(rename = "Brush Script")]
    BrushScript,
    Impact,
}

impl FontStyle {
    /// Every font, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Arial,
        Self::Georgia,
        Self::CourierNew,
        Self::BrushScript,
        Self::Impact,
    ];

    /// The label stored in the `font_style` column.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Arial => "Arial",
            Self::Georgia => "Georgia",
            Self::CourierNew => "Courier New",
            Self::BrushScript => "Brush Script",
            Self::Impact => "Impact",
        }
    }
}

impl std::fmt::Display for FontStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for FontStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|font| font.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("invalid font style: {s}"))
    }
}

/// Where on the garment the design is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Center => write!(f, "center"),
            Self::Top => write!(f, "top"),
            Self::Bottom => write!(f, "bottom"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

impl std::str::FromStr for Placement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "center" => Ok(Self::Center),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(format!("invalid placement: {s}")),
        }
    }
}

/// Insert payload for the `customizations` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCustomization {
    pub session_id: SessionId,
    pub custom_text: String,
    pub font_style: FontStyle,
    pub text_color: String,
    pub placement: Placement,
    pub notes: String,
    pub status: CustomizationStatus,
}

/// A stored customization request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customization {
    pub id: CustomizationId,
    pub session_id: SessionId,
    pub status: CustomizationStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
