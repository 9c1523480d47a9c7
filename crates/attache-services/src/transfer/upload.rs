use attache_core::AppError;
use bytes::Bytes;
use std::io::Cursor;
use std::pin::Pin;
use tokio::io::AsyncRead;

const MAX_FILENAME_LENGTH: usize = 255;

/// An inbound file: the name the client gave it, its declared size and its content.
pub struct UploadedFile {
    pub original_filename: String,
    pub size: i64,
    reader: Pin<Box<dyn AsyncRead + Send>>,
}

impl UploadedFile {
    pub fn new(
        original_filename: impl Into<String>,
        size: i64,
        reader: impl AsyncRead + Send + 'static,
    ) -> Self {
        Self {
            original_filename: original_filename.into(),
            size,
            reader: Box::pin(reader),
        }
    }

    /// Wrap an already-buffered body; the declared size is its length.
    pub fn from_bytes(original_filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let size = data.len() as i64;
        Self::new(original_filename, size, Cursor::new(data))
    }

    pub(crate) fn into_reader(self) -> Pin<Box<dyn AsyncRead + Send>> {
        self.reader
    }

    /// Reject names that cannot be used as part of a staging path or object key.
    pub(crate) fn validate(&self) -> Result<(), AppError> {
        let name = &self.original_filename;

        if name.trim().is_empty() {
            return Err(AppError::InvalidInput("File name is empty".to_string()));
        }
        if name.chars().count() > MAX_FILENAME_LENGTH {
            return Err(AppError::InvalidInput(format!(
                "File name exceeds {} characters",
                MAX_FILENAME_LENGTH
            )));
        }
        if name == "." || name == ".." || name.contains('/') || name.contains('\\') {
            return Err(AppError::InvalidInput(
                "File name contains invalid path traversal".to_string(),
            ));
        }
        if name.chars().any(|c| c.is_ascii_control()) {
            return Err(AppError::InvalidInput(
                "File name contains control characters".to_string(),
            ));
        }
        if self.size < 0 {
            return Err(AppError::InvalidInput(
                "File size must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("original_filename", &self.original_filename)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_declares_length() {
        let file = UploadedFile::from_bytes("a.txt", &b"0123456789"[..]);
        assert_eq!(file.size, 10);
        assert!(file.validate().is_ok());
    }

    #[test]
    fn test_rejects_unusable_names() {
        for name in [
            "",
            "   ",
            ".",
            "..",
            "../etc/passwd",
            "dir/a.txt",
            "dir\\a.txt",
            "a\nb.txt",
        ] {
            let file = UploadedFile::from_bytes(name, Bytes::new());
            assert!(
                matches!(file.validate(), Err(AppError::InvalidInput(_))),
                "expected {:?} to be rejected",
                name
            );
        }

        let long = "x".repeat(MAX_FILENAME_LENGTH + 1);
        assert!(UploadedFile::from_bytes(long, Bytes::new()).validate().is_err());
    }

    #[test]
    fn test_accepts_unicode_and_spaces() {
        let file = UploadedFile::from_bytes("보고서 final (1).pdf", Bytes::from_static(b"%PDF"));
        assert!(file.validate().is_ok());
    }

    #[test]
    fn test_accepts_dots_inside_names() {
        for name in ["a..txt", "report..final.pdf", "...hidden", ".env"] {
            let file = UploadedFile::from_bytes(name, Bytes::new());
            assert!(file.validate().is_ok(), "expected {:?} to be accepted", name);
        }
    }

    #[test]
    fn test_rejects_negative_declared_size() {
        let file = UploadedFile::new("a.txt", -1, Cursor::new(Vec::<u8>::new()));
        assert!(file.validate().is_err());
    }
}
