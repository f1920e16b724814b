use serde::{Deserialize, Serialize};

/// Trimmed-length threshold for accepting a direct decode or text-layer read.
pub const MIN_DIRECT_LEN: usize = 20;

/// Trimmed-length threshold for accepting bulk pattern/scavenge output.
pub const MIN_PATTERN_LEN: usize = 50;

/// Upload size cap enforced before any extraction runs (10 MB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Broad categories for the four accepted media types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UploadKind {
    Pdf,
    PlainText,
    WordDocument,
}

impl UploadKind {
    /// Map a declared media type onto a category. Anything outside the
    /// four-type allowlist is rejected before extraction.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        match media_type {
            "application/pdf" => Some(Self::Pdf),
            "text/plain" => Some(Self::PlainText),
            "application/msword"
            | "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(Self::WordDocument)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::PlainText => "plain_text",
            Self::WordDocument => "word_document",
        }
    }
}

/// One uploaded document, alive for the duration of a single extraction
/// request. Only derived fields and the stored file path outlive it.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    pub fn kind(&self) -> Option<UploadKind> {
        UploadKind::from_media_type(&self.media_type)
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Which strategy produced the accepted result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StrategyKind {
    /// Primary structured extractor over the PDF text layer.
    TextLayer,
    /// Multi-encoding decoder bank.
    DecoderBank,
    /// Byte-level structural scan for PDF conventions.
    StructuralScan,
    /// Last-resort printable-byte scavenge.
    ByteScavenge,
    /// Plain-text / document file read directly.
    DirectRead,
    /// Every strategy exhausted; placeholder text substituted.
    Placeholder,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextLayer => "text_layer",
            Self::DecoderBank => "decoder_bank",
            Self::StructuralScan => "structural_scan",
            Self::ByteScavenge => "byte_scavenge",
            Self::DirectRead => "direct_read",
            Self::Placeholder => "placeholder",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_allowlist() {
        assert_eq!(UploadKind::from_media_type("application/pdf"), Some(UploadKind::Pdf));
        assert_eq!(UploadKind::from_media_type("text/plain"), Some(UploadKind::PlainText));
        assert_eq!(
            UploadKind::from_media_type("application/msword"),
            Some(UploadKind::WordDocument)
        );
        assert_eq!(
            UploadKind::from_media_type(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            ),
            Some(UploadKind::WordDocument)
        );
        assert_eq!(UploadKind::from_media_type("image/png"), None);
        assert_eq!(UploadKind::from_media_type("application/zip"), None);
    }

    #[test]
    fn document_reports_size_and_kind() {
        let doc = UploadedDocument::new("scan.pdf", "application/pdf", vec![0x25, 0x50]);
        assert_eq!(doc.size(), 2);
        assert_eq!(doc.kind(), Some(UploadKind::Pdf));
    }
}
