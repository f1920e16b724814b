//! Primary structured extractor: reads the PDF's embedded text layer.
//!
//! Backed by the `pdf-extract` crate behind a small trait so tests and the
//! orchestrator can swap in a stub when no text layer is available.

use super::ExtractionError;

/// Text-layer extraction seam. Page-oriented so the orchestrator can report
/// a page/line summary alongside the mapped fields.
pub trait TextLayerExtractor: Send + Sync {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

/// Text layer reader over `pdf-extract`. Handles digital PDFs with embedded
/// text; scanned or malformed files come back as errors for the caller's
/// fallback chain.
pub struct PdfTextLayer;

impl TextLayerExtractor for PdfTextLayer {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
            .map_err(|e| ExtractionError::PdfParsing(e.to_string()))?;
        if pages.is_empty() {
            return Err(ExtractionError::EmptyDocument);
        }
        Ok(pages)
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Stub extractor returning canned pages, or a parse error when empty.
    pub struct FixedTextLayer {
        pub pages: Vec<String>,
    }

    impl TextLayerExtractor for FixedTextLayer {
        fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
            if self.pages.is_empty() {
                Err(ExtractionError::PdfParsing("no text layer".into()))
            } else {
                Ok(self.pages.clone())
            }
        }
    }

    /// Build a minimal one-page PDF with a real text object, via lopdf.
    pub fn make_test_pdf(text: &str) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

        let resources = dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        };

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources,
        });

        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        });

        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
            dict.set("Parent", pages_id);
        }

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

}
