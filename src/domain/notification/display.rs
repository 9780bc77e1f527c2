//! Display options: icon and accent color

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::ColorParseError;

/// Icon used when neither the request nor the configuration names one
pub const FALLBACK_ICON: &str = "dialog-information";

/// Accent color used when neither the request nor the configuration sets one
pub const FALLBACK_COLOR: &str = "#FFFFFF";

/// Reference to an icon, as a freedesktop icon name or an absolute path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconRef(String);

impl IconRef {
    /// Returns `None` for blank names so they fall through to the next default
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            None
        } else {
            Some(Self(name))
        }
    }

    pub fn fallback() -> Self {
        Self(FALLBACK_ICON.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First non-empty of request, configured default, fallback
    pub fn resolve(requested: Option<&IconRef>, configured: Option<&IconRef>) -> IconRef {
        requested
            .or(configured)
            .cloned()
            .unwrap_or_else(Self::fallback)
    }
}

impl fmt::Display for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Accent color parsed from `#RRGGBB` or `#AARRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccentColor {
    argb: u32,
}

impl AccentColor {
    pub const fn from_argb(argb: u32) -> Self {
        Self { argb }
    }

    pub fn fallback() -> Self {
        Self::from_argb(0xFFFF_FFFF)
    }

    pub const fn argb(&self) -> u32 {
        self.argb
    }

    pub const fn alpha(&self) -> u8 {
        (self.argb >> 24) as u8
    }

    /// Hex form; alpha is omitted when fully opaque
    pub fn to_hex(&self) -> String {
        if self.alpha() == 0xFF {
            format!("#{:06X}", self.argb & 0x00FF_FFFF)
        } else {
            format!("#{:08X}", self.argb)
        }
    }

    pub fn resolve(requested: Option<AccentColor>, configured: Option<AccentColor>) -> AccentColor {
        requested.or(configured).unwrap_or_else(Self::fallback)
    }
}

impl FromStr for AccentColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError { input: s.to_string() };
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| err())?;
        match hex.len() {
            6 => Ok(Self::from_argb(0xFF00_0000 | value)),
            8 => Ok(Self::from_argb(value)),
            _ => Err(err()),
        }
    }
}

impl TryFrom<String> for AccentColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccentColor> for String {
    fn from(color: AccentColor) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for AccentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Per-request display hints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    pub icon: Option<IconRef>,
    pub color: Option<AccentColor>,
}
