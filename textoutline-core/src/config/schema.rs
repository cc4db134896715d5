use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::{OutlineError, Result};
use crate::render::outline::OutlineParams;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    /// `#rrggbb` or `#rrggbbaa`
    Hex(String),
    Rgba([f32; 4]),
}

impl ColorSpec {
    pub fn to_vec4(&self) -> Result<Vec4> {
        match self {
            ColorSpec::Rgba(c) => Ok(Vec4::from(*c)),
            ColorSpec::Hex(s) => parse_hex(s),
        }
    }
}

fn parse_hex(s: &str) -> Result<Vec4> {
    let bad = || OutlineError::InvalidColor(s.to_string());
    let digits = s.strip_prefix('#').unwrap_or(s);
    let hex_only = digits.bytes().all(|b| b.is_ascii_hexdigit());
    if !(digits.len() == 6 || digits.len() == 8) || !hex_only {
        return Err(bad());
    }
    let mut channels = [255u8; 4];
    for (i, chunk) in digits.as_bytes().chunks(2).enumerate() {
        let pair = std::str::from_utf8(chunk).map_err(|_| bad())?;
        channels[i] = u8::from_str_radix(pair, 16).map_err(|_| bad())?;
    }
    Ok(Vec4::from(channels.map(|c| c as f32 / 255.0)))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    pub color: ColorSpec,
    pub distance: [f32; 2],
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self { color: ColorSpec::Hex("#000000ff".into()), distance: [1.0, 1.0] }
    }
}

impl OutlineConfig {
    pub fn to_params(&self) -> Result<OutlineParams> {
        Ok(OutlineParams { color: self.color.to_vec4()?, distance: Vec2::from(self.distance) })
    }
}
