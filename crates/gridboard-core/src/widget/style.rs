//! Visual attributes shared by every widget kind.

use peniko::color::{parse_color, Srgb};
use peniko::Color;
use serde::{Deserialize, Deserializer, Serialize};

/// Serializable color representation (RGBA8).
///
/// Written as CSS hex. Reads any CSS color string, or an `{r, g, b, a}`
/// record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "ColorRecord")]
pub struct WidgetColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl WidgetColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Light grey used for widget outlines (`#e5e7eb`).
    pub const fn neutral_border() -> Self {
        Self::rgb(0xe5, 0xe7, 0xeb)
    }

    /// Parse a CSS color: hex, `rgb()`/`hsl()` functions or a named color.
    pub fn parse_css(css: &str) -> Option<Self> {
        let color = parse_color(css.trim()).ok()?;
        Some(color.to_alpha_color::<Srgb>().into())
    }

    /// CSS hex notation; the alpha pair is omitted when opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for WidgetColor {
    fn default() -> Self {
        Self::black()
    }
}

impl From<Color> for WidgetColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<WidgetColor> for String {
    fn from(color: WidgetColor) -> Self {
        color.to_hex()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRecord {
    Css(String),
    Rgba {
        r: u8,
        g: u8,
        b: u8,
        #[serde(default = "opaque")]
        a: u8,
    },
}

fn opaque() -> u8 {
    255
}

impl TryFrom<ColorRecord> for WidgetColor {
    type Error = String;

    fn try_from(record: ColorRecord) -> Result<Self, Self::Error> {
        match record {
            ColorRecord::Css(css) => {
                Self::parse_css(&css).ok_or_else(|| format!("invalid CSS color '{css}'"))
            }
            ColorRecord::Rgba { r, g, b, a } => Ok(Self::new(r, g, b, a)),
        }
    }
}

/// Box styling independent of content. Lengths are in CSS pixels.
///
/// Lengths also read as CSS strings (`"1px"`, `"0.375rem"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetStyle {
    pub background_color: WidgetColor,
    pub text_color: WidgetColor,
    pub border_color: WidgetColor,
    #[serde(deserialize_with = "css_length")]
    pub border_width: f32,
    #[serde(deserialize_with = "css_length")]
    pub border_radius: f32,
    #[serde(deserialize_with = "css_length")]
    pub padding: f32,
}

impl Default for WidgetStyle {
    fn default() -> Self {
        Self {
            background_color: WidgetColor::white(),
            text_color: WidgetColor::black(),
            border_color: WidgetColor::neutral_border(),
            border_width: 1.0,
            border_radius: 6.0,
            padding: 16.0,
        }
    }
}

/// Root font size `rem` lengths resolve against.
const REM_PX: f32 = 16.0;

/// Pixels for a CSS length in `px` or `rem`, or a bare number.
fn parse_css_length(css: &str) -> Option<f32> {
    let css = css.trim();
    let (number, scale) = if let Some(number) = css.strip_suffix("rem") {
        (number, REM_PX)
    } else if let Some(number) = css.strip_suffix("px") {
        (number, 1.0)
    } else {
        (css, 1.0)
    };
    let value: f32 = number.trim().parse().ok()?;
    value.is_finite().then_some(value * scale)
}

fn css_length<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Length {
        Px(f32),
        Css(String),
    }

    match Length::deserialize(deserializer)? {
        Length::Px(px) => Ok(px),
        Length::Css(css) => parse_css_length(&css)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid CSS length '{css}'"))),
    }
}
