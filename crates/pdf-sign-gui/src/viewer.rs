//! pdfium-backed page rasterizer

use pdf_sign::{PageRasterizer, RenderedPage, SignError};

#[cfg(feature = "pdf-viewer")]
use pdfium_render::prelude::*;

/// Initialize Pdfium, trying the vendored library first, then falling back to system
#[cfg(feature = "pdf-viewer")]
pub fn init_pdfium() -> Result<Pdfium, PdfiumError> {
    // Relative to the working directory, which is the workspace root under cargo
    let vendor_path = std::env::current_dir().ok().and_then(|mut p| {
        p.push("vendor/pdfium/lib");
        if p.exists() { Some(p) } else { None }
    });

    if let Some(vendor_path) = vendor_path {
        if let Ok(binding) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&vendor_path))
        {
            return Ok(Pdfium::new(binding));
        }
    }

    Pdfium::bind_to_system_library().map(Pdfium::new)
}

/// Renders pages one after another at a fixed pixels-per-point scale
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfiumRasterizer;

#[cfg(feature = "pdf-viewer")]
impl PageRasterizer for PdfiumRasterizer {
    fn rasterize(&self, pdf: &[u8], scale: f32) -> pdf_sign::Result<Vec<RenderedPage>> {
        let pdfium = init_pdfium()
            .map_err(|e| SignError::DocumentLoad(format!("pdfium unavailable: {}", e)))?;
        let document = pdfium
            .load_pdf_from_byte_slice(pdf, None)
            .map_err(|e| SignError::DocumentLoad(e.to_string()))?;

        let config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let mut rendered = Vec::new();
        for (index, page) in document.pages().iter().enumerate() {
            let bitmap = page.render_with_config(&config).map_err(|e| {
                SignError::Rasterization(format!("page {}: {}", index + 1, e))
            })?;
            let (width, height) = (bitmap.width() as u32, bitmap.height() as u32);
            log::debug!("Rendered page {} at {}x{}", index + 1, width, height);
            rendered.push(RenderedPage {
                width,
                height,
                rgba: bitmap.as_rgba_bytes().to_vec(),
            });
        }
        Ok(rendered)
    }
}

#[cfg(not(feature = "pdf-viewer"))]
impl PageRasterizer for PdfiumRasterizer {
    fn rasterize(&self, _pdf: &[u8], _scale: f32) -> pdf_sign::Result<Vec<RenderedPage>> {
        Err(SignError::DocumentLoad(
            "PDF rendering not available (pdf-viewer feature disabled)".to_string(),
        ))
    }
}

#[cfg(all(test, feature = "pdf-viewer"))]
mod tests {
    use super::*;

    /// Two pages: US letter and a small landscape page. The xref table is
    /// left empty; pdfium rebuilds it.
    const TWO_PAGE_PDF: &[u8] = b"%PDF-1.4
1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj
2 0 obj << /Type /Pages /Kids [3 0 R 4 0 R] /Count 2 >> endobj
3 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 5 0 R
  /Resources << /Font << /F1 << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> >> >> >> endobj
4 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 400 300] >> endobj
5 0 obj << /Length 44 >>
stream
BT
/F1 24 Tf
100 700 Td
(Sign here) Tj
ET
endstream
endobj
trailer << /Root 1 0 R >>
%%EOF
";

    #[test]
    #[ignore = "needs the pdfium shared library"]
    fn renders_every_page_at_scale() {
        let pages = PdfiumRasterizer.rasterize(TWO_PAGE_PDF, 0.5).unwrap();
        assert_eq!(pages.len(), 2);

        let sizes: Vec<_> = pages.iter().map(|p| (p.width, p.height)).collect();
        assert_eq!(sizes, [(306, 396), (200, 150)]);
        for page in &pages {
            assert_eq!(page.rgba.len(), (page.width * page.height * 4) as usize);
        }
        assert!(pages[0].rgba.iter().any(|&b| b != 255), "first page has visible text");
    }

    #[test]
    #[ignore = "needs the pdfium shared library"]
    fn rejects_bytes_that_are_not_a_pdf() {
        let result = PdfiumRasterizer.rasterize(b"<html></html>", 1.0);
        assert!(matches!(result, Err(SignError::DocumentLoad(_))));
    }
}
