//! Upload storage: sanitized, uuid-prefixed filenames under the uploads
//! directory. Persistence of the derived fields is the database's job; this
//! module only keeps the original bytes around for later viewing.

use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Store an uploaded file. Returns the path it landed at.
pub fn store_upload(uploads_dir: &Path, original_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    std::fs::create_dir_all(uploads_dir)?;
    let file_name = format!("{}_{}", Uuid::new_v4(), sanitize_filename(original_name));
    let path = uploads_dir.join(file_name);
    std::fs::write(&path, bytes)?;
    Ok(path)
}

/// Sanitize a filename — strip path components, drop separator bytes,
/// limit length.
pub fn sanitize_filename(original: &str) -> String {
    let name = Path::new(original)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document");

    let clean: String = name
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | '\0'))
        .take(255)
        .collect();

    if clean.is_empty() {
        "document".to_string()
    } else {
        clean
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_with_uuid_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let path = store_upload(dir.path(), "report.pdf", b"%PDF-1.4").unwrap();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.ends_with("_report.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn same_name_stored_twice_does_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let a = store_upload(dir.path(), "scan.pdf", b"a").unwrap();
        let b = store_upload(dir.path(), "scan.pdf", b"b").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn creates_missing_uploads_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep").join("uploads");
        let path = store_upload(&nested, "x.txt", b"hello").unwrap();
        assert!(path.starts_with(&nested));
    }

    #[test]
    fn sanitize_path_traversal() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("normal_file.pdf"), "normal_file.pdf");
        assert_eq!(sanitize_filename(""), "document");
        assert_eq!(sanitize_filename("file\0name.pdf"), "filename.pdf");
    }
}
