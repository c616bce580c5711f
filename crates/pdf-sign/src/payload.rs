//! Drag payloads passed from the composer to the placement canvas
//!
//! The producer encodes a payload into a transfer string when a drag starts;
//! the canvas decodes it on drop and rasterizes accordingly.

use crate::composer::TypedStyle;
use crate::types::*;
use base64::{Engine, engine::general_purpose::STANDARD};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::io::Cursor;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// A drawn signature carried by a drag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawnImage {
    /// PNG data URL of the generated stroke raster
    pub image: String,
    /// Layout width of the image before the 2x raster scale
    pub width_px: f32,
    pub opacity: f32,
}

impl DrawnImage {
    pub fn from_image(image: &RgbaImage, width_px: f32, opacity: f32) -> Result<Self> {
        Ok(Self {
            image: png_data_url(image)?,
            width_px,
            opacity,
        })
    }

    pub fn decode(&self) -> Result<RgbaImage> {
        decode_png_data_url(&self.image)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DragPayload {
    Drawn(DrawnImage),
    Typed(TypedStyle),
}

impl DragPayload {
    pub fn opacity(&self) -> f32 {
        match self {
            DragPayload::Drawn(drawn) => drawn.opacity,
            DragPayload::Typed(style) => style.opacity,
        }
    }

    /// Encode into the string placed on the transfer channel
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(data: &str) -> Result<Self> {
        serde_json::from_str(data).map_err(|e| SignError::Payload(e.to_string()))
    }
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;
    Ok(png)
}

pub fn png_data_url(image: &RgbaImage) -> Result<String> {
    Ok(format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(encode_png(image)?)))
}

pub fn decode_png_data_url(url: &str) -> Result<RgbaImage> {
    let encoded = url
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .ok_or_else(|| SignError::Payload("expected a PNG data URL".to_string()))?;
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| SignError::Payload(format!("bad base64 image: {e}")))?;
    let image = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png)?;
    Ok(image.into_rgba8())
}
