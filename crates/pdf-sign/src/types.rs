use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignError {
    #[error("Failed to load document: {0}")]
    DocumentLoad(String),
    #[error("Rasterization failed: {0}")]
    Rasterization(String),
    #[error("Nothing to place: the signature is empty")]
    EmptySignature,
    #[error("Invalid drag payload: {0}")]
    Payload(String),
    #[error("Page {0} does not exist")]
    NoSuchPage(usize),
    #[error("Annotation {0} does not exist")]
    NoSuchAnnotation(uuid::Uuid),
    #[error("Invalid drag state: {0}")]
    InvalidDragState(&'static str),
    #[error("Document changed while the operation was in flight")]
    StaleDocument,
    #[error("Export failed: {0}")]
    Export(String),
    #[error("Upload failed: {0}")]
    Upload(String),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Not logged in")]
    NotLoggedIn,
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, SignError>;

/// Script typefaces offered for typed signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScriptFont {
    #[default]
    #[serde(rename = "Dancing Script")]
    DancingScript,
    #[serde(rename = "Pacifico")]
    Pacifico,
    #[serde(rename = "Satisfy")]
    Satisfy,
    #[serde(rename = "Great Vibes")]
    GreatVibes,
    #[serde(rename = "Alex Brush")]
    AlexBrush,
    #[serde(rename = "Marck Script")]
    MarckScript,
}

impl ScriptFont {
    pub const ALL: [ScriptFont; 6] = [
        ScriptFont::DancingScript,
        ScriptFont::Pacifico,
        ScriptFont::Satisfy,
        ScriptFont::GreatVibes,
        ScriptFont::AlexBrush,
        ScriptFont::MarckScript,
    ];

    /// Family name as shown to the user
    pub fn label(self) -> &'static str {
        match self {
            ScriptFont::DancingScript => "Dancing Script",
            ScriptFont::Pacifico => "Pacifico",
            ScriptFont::Satisfy => "Satisfy",
            ScriptFont::GreatVibes => "Great Vibes",
            ScriptFont::AlexBrush => "Alex Brush",
            ScriptFont::MarckScript => "Marck Script",
        }
    }

    /// Font file expected inside the configured font directory
    pub fn file_name(self) -> &'static str {
        match self {
            ScriptFont::DancingScript => "DancingScript-Regular.ttf",
            ScriptFont::Pacifico => "Pacifico-Regular.ttf",
            ScriptFont::Satisfy => "Satisfy-Regular.ttf",
            ScriptFont::GreatVibes => "GreatVibes-Regular.ttf",
            ScriptFont::AlexBrush => "AlexBrush-Regular.ttf",
            ScriptFont::MarckScript => "MarckScript-Regular.ttf",
        }
    }
}

impl fmt::Display for ScriptFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Opaque RGB color, serialized as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Rgb {
    type Err = SignError;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(SignError::Config(format!("Invalid color: {s}")));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| SignError::Config(format!("Invalid color: {s}")))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
