//! Encodes a single file upload as a `multipart/form-data` body.

use sha2::{Digest, Sha256};

/// A file to upload to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    /// The MIME type, e.g. `application/vnd.ms-excel`.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A `multipart/form-data` body with one file field.
#[derive(Debug, Clone)]
pub(crate) struct MultipartBody {
    boundary: String,
    bytes: Vec<u8>,
}

impl MultipartBody {
    /// Encode `file` as the form field `field`.
    ///
    /// The boundary is derived from a hash of the file contents so it cannot
    /// plausibly occur inside them.
    pub fn single_file(field: &str, file: &UploadFile) -> Self {
        let digest = format!("{:x}", Sha256::digest(&file.bytes));
        // Boundaries are limited to 70 characters.
        let boundary = format!("----bms-{}", &digest[..32]);

        let mut bytes = Vec::with_capacity(file.bytes.len() + 256);
        bytes.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        bytes.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                escape_quoted(field),
                escape_quoted(&file.file_name)
            )
            .as_bytes(),
        );
        bytes.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
        bytes.extend_from_slice(&file.bytes);
        bytes.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Self { boundary, bytes }
    }

    /// The value for the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Quoted header parameters cannot contain raw quotes or line breaks.
fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::{MultipartBody, UploadFile};

    fn statement() -> UploadFile {
        UploadFile {
            file_name: "april \"final\".xls".to_owned(),
            content_type: "application/vnd.ms-excel".to_owned(),
            bytes: b"binary statement".to_vec(),
        }
    }

    #[test]
    fn encodes_one_file_part() {
        let body = MultipartBody::single_file("file", &statement());
        let text = String::from_utf8_lossy(body.bytes()).to_string();
        let boundary = body
            .content_type()
            .strip_prefix("multipart/form-data; boundary=")
            .unwrap()
            .to_owned();

        let digest = boundary.strip_prefix("----bms-").unwrap();
        assert_eq!(digest.len(), 32);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert!(boundary.len() <= 70);
        assert!(text.starts_with(&format!("--{boundary}\r\n")));
        assert!(text.contains(
            "Content-Disposition: form-data; name=\"file\"; filename=\"april %22final%22.xls\"\r\n"
        ));
        assert!(text.contains("Content-Type: application/vnd.ms-excel\r\n\r\nbinary statement\r\n"));
        assert!(text.ends_with(&format!("\r\n--{boundary}--\r\n")));
    }

    #[test]
    fn boundary_depends_on_contents() {
        let mut other = statement();
        other.bytes = b"another statement".to_vec();

        let first = MultipartBody::single_file("file", &statement());
        let second = MultipartBody::single_file("file", &other);

        assert_ne!(first.content_type(), second.content_type());
    }
}
