//! Typed signatures: styled text rendered with a script font

use crate::constants::*;
use crate::types::*;
use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use fontdue::{Font, FontSettings};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Styling of a typed signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedStyle {
    pub text: String,
    pub font: ScriptFont,
    pub font_size: f32,
    pub color: Rgb,
    pub opacity: f32,
}

impl Default for TypedStyle {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: ScriptFont::default(),
            font_size: FONT_SIZE_DEFAULT,
            color: Rgb::BLACK,
            opacity: OPACITY_MAX,
        }
    }
}

/// Turns a typed style into pixels
pub trait TextRasterizer: Send + Sync {
    /// Resolves once every font the rasterizer may need has finished loading
    fn fonts_ready(&self) -> impl Future<Output = Result<()>> + Send;

    /// Render `style` on a transparent background at `scale` times its CSS size
    fn rasterize_text(&self, style: &TypedStyle, scale: f32) -> Result<RgbaImage>;
}

type FontMap = HashMap<ScriptFont, Font>;

/// Script fonts loaded once, in the background, from a directory
#[derive(Clone)]
pub struct FontLibrary {
    dir: PathBuf,
    fonts: Arc<OnceCell<FontMap>>,
}

impl FontLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            fonts: Arc::new(OnceCell::new()),
        }
    }

    /// Library over fonts that are already parsed
    pub fn preloaded(fonts: HashMap<ScriptFont, Font>) -> Self {
        Self {
            dir: PathBuf::new(),
            fonts: Arc::new(OnceCell::new_with(Some(fonts))),
        }
    }

    /// Wait for the font files to be read and parsed. Loading happens once;
    /// later calls return immediately.
    pub async fn ready(&self) -> Result<()> {
        self.fonts
            .get_or_try_init(|| load_fonts(self.dir.clone()))
            .await
            .map(|_| ())
    }

    pub fn get(&self, font: ScriptFont) -> Option<&Font> {
        self.fonts.get().and_then(|fonts| fonts.get(&font))
    }

    pub fn loaded(&self) -> Vec<ScriptFont> {
        ScriptFont::ALL
            .into_iter()
            .filter(|font| self.get(*font).is_some())
            .collect()
    }
}

async fn load_fonts(dir: PathBuf) -> Result<FontMap> {
    let mut fonts = FontMap::new();
    for font in ScriptFont::ALL {
        let path = dir.join(font.file_name());
        match load_font(&path).await {
            Ok(parsed) => {
                fonts.insert(font, parsed);
            }
            Err(e) => log::warn!("Font {} unavailable ({}): {}", font, path.display(), e),
        }
    }

    if fonts.is_empty() {
        return Err(SignError::Rasterization(format!(
            "no signature fonts found in {}",
            dir.display()
        )));
    }
    log::info!("Loaded {} signature fonts from {}", fonts.len(), dir.display());
    Ok(fonts)
}

async fn load_font(path: &Path) -> Result<Font> {
    let bytes = tokio::fs::read(path).await?;
    tokio::task::spawn_blocking(move || {
        Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| SignError::Rasterization(e.to_string()))
    })
    .await?
}

/// [`TextRasterizer`] backed by fontdue
#[derive(Clone)]
pub struct FontdueRasterizer {
    library: FontLibrary,
}

impl FontdueRasterizer {
    pub fn new(library: FontLibrary) -> Self {
        Self { library }
    }

    pub fn library(&self) -> &FontLibrary {
        &self.library
    }
}

impl TextRasterizer for FontdueRasterizer {
    fn fonts_ready(&self) -> impl Future<Output = Result<()>> + Send {
        self.library.ready()
    }

    fn rasterize_text(&self, style: &TypedStyle, scale: f32) -> Result<RgbaImage> {
        let font = self.library.get(style.font).ok_or_else(|| {
            SignError::Rasterization(format!("font {} is not loaded", style.font))
        })?;
        render_text(font, style, scale)
    }
}

/// Lay out `style.text` on one line and paint it into a transparent image
/// sized to the text's bounding box plus the surface padding.
pub fn render_text(font: &Font, style: &TypedStyle, scale: f32) -> Result<RgbaImage> {
    let px = style.font_size * scale;
    let padding = SURFACE_PADDING_PX * scale;

    let mut layout: Layout = Layout::new(CoordinateSystem::PositiveYDown);
    layout.reset(&LayoutSettings::default());
    layout.append(std::slice::from_ref(font), &TextStyle::new(&style.text, px, 0));
    let glyphs = layout.glyphs();

    // Script faces often overhang to the left of the pen origin
    let min_x = glyphs.iter().map(|g| g.x).fold(0.0_f32, f32::min);
    let max_x = glyphs
        .iter()
        .map(|g| g.x + g.width as f32)
        .fold(0.0_f32, f32::max);
    let text_height = layout.height();
    let line_height = (px * LINE_HEIGHT).max(text_height);
    let shift_x = padding - min_x;
    let shift_y = padding + (line_height - text_height) / 2.0;

    let width = ((max_x - min_x) + 2.0 * padding).ceil().max(1.0) as u32;
    let height = (line_height + 2.0 * padding).ceil().max(1.0) as u32;
    let mut image = RgbaImage::new(width, height);

    for glyph in glyphs {
        if glyph.width == 0 || glyph.height == 0 {
            continue;
        }
        let (metrics, coverage) = font.rasterize_config(glyph.key);
        let left = (glyph.x + shift_x).round() as i64;
        let top = (glyph.y + shift_y).round() as i64;

        for row in 0..metrics.height {
            for col in 0..metrics.width {
                let alpha = coverage[row * metrics.width + col];
                if alpha == 0 {
                    continue;
                }
                let (x, y) = (left + col as i64, top + row as i64);
                if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                    continue;
                }
                let pixel = image.get_pixel_mut(x as u32, y as u32);
                let alpha = alpha.max(pixel.0[3]);
                *pixel = Rgba([style.color.r, style.color.g, style.color.b, alpha]);
            }
        }
    }

    Ok(image)
}
