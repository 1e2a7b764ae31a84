#[cfg(feature = "serde")]
use serde::Serialize;

/// Terminal color representation supporting 16-color, 256-color, and truecolor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Default,
    Indexed(u8),
    Rgb(u8, u8, u8),
}

impl Default for Color {
    fn default() -> Self {
        Color::Default
    }
}

/// Serializable color, useful for embedders that ship cell state over IPC/JSON.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum SerializableColor {
    Default,
    Indexed { index: u8 },
    Rgb { r: u8, g: u8, b: u8 },
}

#[cfg(feature = "serde")]
impl From<Color> for SerializableColor {
    fn from(c: Color) -> Self {
        match c {
            Color::Default => SerializableColor::Default,
            Color::Indexed(i) => SerializableColor::Indexed { index: i },
            Color::Rgb(r, g, b) => SerializableColor::Rgb { r, g, b },
        }
    }
}

/// Resolve an SGR 38;5;n / 48;5;n palette index to a `Color`.
///
/// 0..15 stay `Indexed` so an embedder-side theme can still remap the base
/// and bright ANSI colors; 16..255 resolve immediately to a truecolor triple
/// and the raw index is not retained.
pub fn palette256(index: u8) -> Color {
    match index {
        0..=15 => Color::Indexed(index),
        16..=231 => {
            let idx = index - 16;
            let r = idx / 36;
            let g = (idx % 36) / 6;
            let b = idx % 6;
            let scale = |v: u8| if v == 0 { 0 } else { 55 + 40 * v };
            Color::Rgb(scale(r), scale(g), scale(b))
        }
        232..=255 => {
            let v = 8 + 10 * (index - 232);
            Color::Rgb(v, v, v)
        }
    }
}
