//! Extraction orchestrator: turns an uploaded document into a field-ready
//! result, whatever it takes.
//!
//! Policy: a PDF goes to the primary text-layer extractor first; when that
//! succeeds the mapped field set is used directly and no fallback runs.
//! Otherwise the fallback strategies run in fixed priority order (decoder
//! bank, structural scan, byte scavenge), each a pure `bytes -> Option<String>`
//! folded to the first hit. Extraction never returns an error: the terminal
//! state of total failure is a placeholder string naming the file, so the
//! intake form stays fillable.

use super::decoder::decode_text;
use super::sanitize::sanitize_recovered_text;
use super::scavenger::scavenge_text;
use super::structural::scan_structure;
use super::structured::{PdfTextLayer, TextLayerExtractor};
use super::types::{StrategyKind, UploadKind, UploadedDocument, MIN_DIRECT_LEN};
use crate::pipeline::mapping::{self, FieldKey, IntakeFieldSet};

/// What the orchestrator recovered: a structured field set (primary path)
/// or a text blob for the field mapper.
#[derive(Debug, Clone)]
pub enum Recovered {
    Fields(IntakeFieldSet),
    Text { text: String, strategy: StrategyKind },
}

/// Final result handed to the intake form: always a fully populated field
/// set, which strategy produced it, and the raw recovered text when a
/// fallback (or the placeholder terminal state) produced one.
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    pub fields: IntakeFieldSet,
    pub strategy: StrategyKind,
    pub meaningful_fields: usize,
    pub recovered_text: Option<String>,
}

/// The fallback chain, in fixed priority order. Each entry is pure and
/// self-thresholding; the orchestrator takes the first `Some`.
const FALLBACK_CHAIN: [(StrategyKind, fn(&[u8]) -> Option<String>); 3] = [
    (StrategyKind::DecoderBank, decode_text),
    (StrategyKind::StructuralScan, scan_structure),
    (StrategyKind::ByteScavenge, scavenge_text),
];

pub struct DocumentExtractor {
    text_layer: Box<dyn TextLayerExtractor>,
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor {
    pub fn new() -> Self {
        Self {
            text_layer: Box::new(PdfTextLayer),
        }
    }

    /// Swap the primary extractor (tests, or deployments without one).
    pub fn with_text_layer(text_layer: Box<dyn TextLayerExtractor>) -> Self {
        Self { text_layer }
    }

    /// Recover a field set or text blob from an uploaded document.
    /// Infallible by design: every path terminates in some result.
    pub fn recover(&self, doc: &UploadedDocument) -> Recovered {
        match doc.kind() {
            Some(UploadKind::Pdf) => self.recover_pdf(doc),
            Some(UploadKind::PlainText) => read_as_text(doc),
            Some(UploadKind::WordDocument) => read_word_document(doc),
            // Callers validate media types up front; an unknown type this
            // deep still has to produce a fillable form.
            None => Recovered::Text {
                text: placeholder_text(doc),
                strategy: StrategyKind::Placeholder,
            },
        }
    }

    /// Run the full pipeline: recover, then map, then count.
    pub fn extract_fields(&self, doc: &UploadedDocument) -> ExtractionReport {
        let (fields, strategy, recovered_text) = match self.recover(doc) {
            Recovered::Fields(fields) => (fields, StrategyKind::TextLayer, None),
            Recovered::Text { text, strategy } => {
                let mut fields = mapping::map_text(&text);
                if strategy != StrategyKind::Placeholder {
                    // The free-text report field carries the recovered blob;
                    // on total failure it keeps its own placeholder so the
                    // field set stays fully placeholder-populated.
                    fields.set(FieldKey::ReportContent, text.clone());
                }
                (fields, strategy, Some(text))
            }
        };

        let meaningful_fields = fields.meaningful_count();
        tracing::info!(
            file = %doc.file_name,
            strategy = strategy.as_str(),
            meaningful_fields,
            "document extraction complete"
        );

        ExtractionReport {
            fields,
            strategy,
            meaningful_fields,
            recovered_text,
        }
    }

    fn recover_pdf(&self, doc: &UploadedDocument) -> Recovered {
        // Primary: real text layer. On success the structured result is
        // used directly and none of the fallback strategies run.
        match self.text_layer.extract_pages(&doc.bytes) {
            Ok(pages) => {
                let full_text = sanitize_recovered_text(&pages.join("\n"));
                if full_text.trim().len() > MIN_DIRECT_LEN {
                    let line_count = full_text.lines().count();
                    let mut fields = mapping::map_text(&full_text);
                    fields.set(
                        FieldKey::ReportContent,
                        format!(
                            "PDF report with {} page(s) and {} text line(s)",
                            pages.len(),
                            line_count
                        ),
                    );
                    return Recovered::Fields(fields);
                }
                tracing::debug!(
                    file = %doc.file_name,
                    "text layer below threshold, falling back"
                );
            }
            Err(e) => {
                tracing::debug!(file = %doc.file_name, error = %e, "text layer unavailable");
            }
        }

        self.run_fallback_chain(doc)
    }

    fn run_fallback_chain(&self, doc: &UploadedDocument) -> Recovered {
        for (strategy, run) in FALLBACK_CHAIN {
            if let Some(text) = run(&doc.bytes) {
                tracing::debug!(
                    file = %doc.file_name,
                    strategy = strategy.as_str(),
                    chars = text.len(),
                    "fallback strategy accepted"
                );
                return Recovered::Text {
                    text: sanitize_recovered_text(&text),
                    strategy,
                };
            }
        }

        Recovered::Text {
            text: placeholder_text(doc),
            strategy: StrategyKind::Placeholder,
        }
    }
}

/// Plain-text upload: read directly, lossy on stray bytes.
fn read_as_text(doc: &UploadedDocument) -> Recovered {
    let text = String::from_utf8_lossy(&doc.bytes);
    if text.trim().is_empty() {
        Recovered::Text {
            text: placeholder_text(doc),
            strategy: StrategyKind::Placeholder,
        }
    } else {
        Recovered::Text {
            text: sanitize_recovered_text(&text),
            strategy: StrategyKind::DirectRead,
        }
    }
}

/// Word-processor upload: read as plain text when the bytes look textual,
/// else reduce to the filename/size placeholder.
fn read_word_document(doc: &UploadedDocument) -> Recovered {
    if looks_textual(&doc.bytes) {
        read_as_text(doc)
    } else {
        Recovered::Text {
            text: placeholder_text(doc),
            strategy: StrategyKind::Placeholder,
        }
    }
}

/// At least 80% printable-or-whitespace over the first 4 KB.
fn looks_textual(bytes: &[u8]) -> bool {
    let sample = &bytes[..bytes.len().min(4096)];
    if sample.is_empty() {
        return false;
    }
    let Ok(text) = std::str::from_utf8(sample) else {
        return false;
    };
    let printable = text.chars().filter(|c| !c.is_control() || c.is_whitespace()).count();
    printable as f64 / text.chars().count().max(1) as f64 > 0.80
}

/// Terminal placeholder: never empty, always names the file.
fn placeholder_text(doc: &UploadedDocument) -> String {
    format!(
        "No readable text could be recovered from '{}' ({} bytes, {})",
        doc.file_name,
        doc.size(),
        doc.media_type
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::structured::testing::FixedTextLayer;

    fn extractor_with_pages(pages: Vec<&str>) -> DocumentExtractor {
        DocumentExtractor::with_text_layer(Box::new(FixedTextLayer {
            pages: pages.into_iter().map(str::to_string).collect(),
        }))
    }

    fn failing_extractor() -> DocumentExtractor {
        DocumentExtractor::with_text_layer(Box::new(FixedTextLayer { pages: vec![] }))
    }

    fn pdf_doc(bytes: &[u8]) -> UploadedDocument {
        UploadedDocument::new("report.pdf", "application/pdf", bytes.to_vec())
    }

    #[test]
    fn primary_path_returns_structured_fields_and_summary() {
        let extractor = extractor_with_pages(vec![
            "Patient Name: Jane Doe\nAge: 42\nChief Complaint: severe headache",
        ]);
        let report = extractor.extract_fields(&pdf_doc(b"%PDF-1.4 irrelevant"));

        assert_eq!(report.strategy, StrategyKind::TextLayer);
        assert_eq!(report.fields.patient_name, "Jane Doe");
        assert_eq!(report.fields.age, "42");
        assert!(report.fields.report_content.starts_with("PDF report with 1 page(s)"));
        assert!(report.meaningful_fields >= 3);
    }

    #[test]
    fn primary_failure_falls_back_to_decoder_bank() {
        let mut bytes = Vec::new();
        while bytes.len() < 80 {
            bytes.extend_from_slice(b"Patient: Jane Doe, Age: 42 ");
        }
        bytes.push(0xE9); // force invalid UTF-8, exercising the bank

        let report = failing_extractor().extract_fields(&pdf_doc(&bytes));
        assert_eq!(report.strategy, StrategyKind::DecoderBank);
        assert_eq!(report.fields.patient_name, "Jane Doe");
    }

    #[test]
    fn structural_scan_recovers_stream_payload() {
        // Too short for the decoder bank thresholds, but carries a stream
        // body the structural scanner accepts.
        let bytes = b"\xFF\xFEstream\nPatient history: diabetes\nendstream";
        let report = failing_extractor().extract_fields(&pdf_doc(bytes));
        assert_eq!(report.strategy, StrategyKind::StructuralScan);
        assert!(report.fields.report_content.contains("Patient history: diabetes"));
        assert!(report.recovered_text.unwrap().contains("diabetes"));
    }

    #[test]
    fn zero_byte_pdf_yields_placeholder_field_set() {
        let report = failing_extractor().extract_fields(&pdf_doc(b""));
        assert_eq!(report.strategy, StrategyKind::Placeholder);
        assert_eq!(report.meaningful_fields, 0);
        assert_eq!(report.fields, IntakeFieldSet::placeholders());
        assert!(report.recovered_text.unwrap().contains("report.pdf"));
    }

    #[test]
    fn placeholder_embeds_filename_size_and_type() {
        let doc = UploadedDocument::new("tiny.pdf", "application/pdf", vec![1, 2, 3]);
        let text = placeholder_text(&doc);
        assert!(text.contains("tiny.pdf"));
        assert!(text.contains("3 bytes"));
        assert!(text.contains("application/pdf"));
    }

    #[test]
    fn plain_text_read_directly() {
        let doc = UploadedDocument::new(
            "notes.txt",
            "text/plain",
            b"Chief Complaint: acute stroke symptoms".to_vec(),
        );
        let report = DocumentExtractor::new().extract_fields(&doc);
        assert_eq!(report.strategy, StrategyKind::DirectRead);
        assert_eq!(report.fields.chief_complaint, "acute stroke symptoms");
    }

    #[test]
    fn empty_plain_text_gets_placeholder() {
        let doc = UploadedDocument::new("empty.txt", "text/plain", vec![]);
        let report = DocumentExtractor::new().extract_fields(&doc);
        assert_eq!(report.strategy, StrategyKind::Placeholder);
        assert!(report.recovered_text.unwrap().contains("empty.txt"));
    }

    #[test]
    fn binary_word_document_reduced_to_placeholder() {
        let doc = UploadedDocument::new(
            "legacy.doc",
            "application/msword",
            vec![0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1],
        );
        let report = DocumentExtractor::new().extract_fields(&doc);
        assert_eq!(report.strategy, StrategyKind::Placeholder);
        assert!(report.recovered_text.unwrap().contains("legacy.doc"));
    }

    #[test]
    fn textual_word_document_read_as_text() {
        let doc = UploadedDocument::new(
            "summary.docx",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            b"Referring Doctor: Dr. Chen".to_vec(),
        );
        let report = DocumentExtractor::new().extract_fields(&doc);
        assert_eq!(report.strategy, StrategyKind::DirectRead);
        assert_eq!(report.fields.referring_doctor, "Dr. Chen");
    }

    #[test]
    fn real_pdf_goes_through_primary_extractor() {
        let pdf = crate::pipeline::extraction::structured::testing::make_test_pdf(
            "Age: 42 and Chief Complaint: persistent migraine episodes",
        );
        let report = DocumentExtractor::new().extract_fields(&pdf_doc(&pdf));
        // A synthetic digital PDF must not reach the byte scavenger.
        assert!(matches!(
            report.strategy,
            StrategyKind::TextLayer | StrategyKind::DecoderBank
        ));
    }
}
