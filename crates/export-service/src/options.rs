//! Export options understood by the processing service.

use std::fmt;
use std::str::FromStr;

use cursorflow_common::{FlowError, FlowResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CURSOR_SIZE: u32 = 48;

/// How the service draws the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorStyle {
    #[default]
    Fancy,
    Macos,
    Circle,
    Dot,
    Ring,
    Crosshair,
}

impl CursorStyle {
    pub const ALL: [CursorStyle; 6] = [
        CursorStyle::Fancy,
        CursorStyle::Macos,
        CursorStyle::Circle,
        CursorStyle::Dot,
        CursorStyle::Ring,
        CursorStyle::Crosshair,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CursorStyle::Fancy => "fancy",
            CursorStyle::Macos => "macos",
            CursorStyle::Circle => "circle",
            CursorStyle::Dot => "dot",
            CursorStyle::Ring => "ring",
            CursorStyle::Crosshair => "crosshair",
        }
    }

    /// Display name and short description.
    pub fn describe(&self) -> (&'static str, &'static str) {
        match self {
            CursorStyle::Fancy => ("Modern Arrow", "Clean arrow with shadow"),
            CursorStyle::Macos => ("macOS", "macOS-style pointer"),
            CursorStyle::Circle => ("Circle", "Filled circle"),
            CursorStyle::Dot => ("Dot", "Small dot"),
            CursorStyle::Ring => ("Ring", "Hollow circle"),
            CursorStyle::Crosshair => ("Crosshair", "Crosshair target"),
        }
    }

    pub fn info(&self) -> CursorStyleInfo {
        let (name, description) = self.describe();
        CursorStyleInfo {
            id: self.as_str().to_string(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// A cursor style as listed by the processing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorStyleInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl CursorStyleInfo {
    /// The style this entry names, if this build knows it.
    pub fn style(&self) -> Option<CursorStyle> {
        self.id.parse().ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorColor {
    #[default]
    White,
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
    Orange,
}

impl CursorColor {
    pub const ALL: [CursorColor; 8] = [
        CursorColor::White,
        CursorColor::Red,
        CursorColor::Green,
        CursorColor::Blue,
        CursorColor::Yellow,
        CursorColor::Cyan,
        CursorColor::Magenta,
        CursorColor::Orange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CursorColor::White => "white",
            CursorColor::Red => "red",
            CursorColor::Green => "green",
            CursorColor::Blue => "blue",
            CursorColor::Yellow => "yellow",
            CursorColor::Cyan => "cyan",
            CursorColor::Magenta => "magenta",
            CursorColor::Orange => "orange",
        }
    }

    pub fn rgb(&self) -> [u8; 3] {
        match self {
            CursorColor::White => [255, 255, 255],
            CursorColor::Red => [255, 0, 0],
            CursorColor::Green => [0, 255, 0],
            CursorColor::Blue => [0, 0, 255],
            CursorColor::Yellow => [255, 255, 0],
            CursorColor::Cyan => [0, 255, 255],
            CursorColor::Magenta => [255, 0, 255],
            CursorColor::Orange => [255, 165, 0],
        }
    }
}

/// Output quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Fast,
    Balanced,
    #[default]
    High,
}

/// x264 settings a quality tier maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderSettings {
    pub crf: u8,
    pub preset: &'static str,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Fast => "fast",
            Quality::Balanced => "balanced",
            Quality::High => "high",
        }
    }

    pub fn encoder_settings(&self) -> EncoderSettings {
        match self {
            Quality::High => EncoderSettings {
                crf: 18,
                preset: "slow",
            },
            Quality::Balanced => EncoderSettings {
                crf: 23,
                preset: "medium",
            },
            Quality::Fast => EncoderSettings {
                crf: 28,
                preset: "fast",
            },
        }
    }
}

macro_rules! impl_name_parsing {
    ($ty:ident, $what:literal) => {
        impl FromStr for $ty {
            type Err = FlowError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                Self::ALL
                    .into_iter()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| FlowError::config(format!("Unknown {}: {s}", $what)))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl Quality {
    pub const ALL: [Quality; 3] = [Quality::Fast, Quality::Balanced, Quality::High];
}

impl_name_parsing!(CursorStyle, "cursor style");
impl_name_parsing!(CursorColor, "cursor color");
impl_name_parsing!(Quality, "quality");

/// Options sent alongside a recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub cursor_style: CursorStyle,
    /// Cursor size in output pixels.
    pub cursor_size: u32,
    pub cursor_color: CursorColor,
    /// Smooth the pointer path before drawing.
    pub smooth: bool,
    pub quality: Quality,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            cursor_style: CursorStyle::default(),
            cursor_size: DEFAULT_CURSOR_SIZE,
            cursor_color: CursorColor::default(),
            smooth: true,
            quality: Quality::default(),
        }
    }
}

impl ExportOptions {
    pub fn validate(&self) -> FlowResult<()> {
        if self.cursor_size == 0 {
            return Err(FlowError::config("cursor_size must be positive"));
        }
        Ok(())
    }

    /// Text form fields as the service expects them.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("cursor_style", self.cursor_style.to_string()),
            ("cursor_size", self.cursor_size.to_string()),
            ("cursor_color", self.cursor_color.to_string()),
            ("smooth", self.smooth.to_string()),
            ("quality", self.quality.to_string()),
        ]
    }
}
