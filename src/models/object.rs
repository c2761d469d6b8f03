//! Represents an object (image file) stored in the bucket.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// File extensions (lowercase, with leading dot) that `List` reports as images.
pub const IMAGE_EXTENSIONS: [&str; 7] = [".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp", ".svg"];

/// A single object held by the bucket, as seen by the gateway.
///
/// The bucket owns the object; the gateway never caches these.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// Storage key (unique name within the bucket).
    pub key: String,

    /// Size in bytes.
    pub size: i64,

    /// Timestamp when the object was last written.
    pub last_modified: DateTime<Utc>,

    /// Public URL derived from bucket, region and key.
    pub url: String,
}

/// What a storage backend reports for one object during a listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: i64,
    pub last_modified: DateTime<Utc>,
}

/// Stored bytes of one object, as served back by `GET /objects/{key}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectBody {
    pub body: Bytes,
    pub content_type: String,
}

/// A file being uploaded: original name, declared MIME type and the body.
#[derive(Clone, Debug)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes: bytes.into(),
        }
    }

    /// Declared content type, or `application/octet-stream` when none was sent.
    pub fn content_type_or_default(&self) -> &str {
        self.content_type
            .as_deref()
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or("application/octet-stream")
    }

    /// Exact body length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Extension of a file name: the text after the last `.`.
///
/// Returns `None` when there is no dot, the dot is the final character, or
/// the candidate contains a path separator (`a.b/c`).
pub fn file_extension(file_name: &str) -> Option<&str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() || ext.contains(['/', '\\']) {
        return None;
    }
    Some(ext)
}

/// Generate a fresh storage key `<uuid-v4>.<ext>` for an uploaded file.
///
/// The extension keeps its original case. Names without a usable extension
/// get a bare `<uuid-v4>` key rather than one ending in a dangling `.`.
pub fn generate_key(file_name: &str) -> String {
    let id = Uuid::new_v4();
    match file_extension(file_name) {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    }
}

/// Case-insensitive check of a key against [`IMAGE_EXTENSIONS`].
pub fn is_image_key(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// How public URLs for stored objects are built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublicUrl {
    /// Virtual-hosted S3 style: `https://<bucket>.s3.<region>.amazonaws.com/<key>`.
    S3 { bucket: String, region: String },
    /// Provider-equivalent base URL; keys are appended after a `/`.
    Base(String),
}

impl PublicUrl {
    pub fn for_key(&self, key: &str) -> String {
        match self {
            PublicUrl::S3 { bucket, region } => {
                format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
            }
            PublicUrl::Base(base) => format!("{}/{}", base.trim_end_matches('/'), key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_uuid_prefixed(key: &str, suffix: &str) -> bool {
        let Some(id) = key.strip_suffix(suffix) else {
            return false;
        };
        id.len() == 36
            && id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase() || c == '-')
            && Uuid::parse_str(id).is_ok()
    }

    #[test]
    fn key_keeps_extension_case() {
        let key = generate_key("cat.PNG");
        assert!(is_uuid_prefixed(&key, ".PNG"), "unexpected key {key}");
    }

    #[test]
    fn key_uses_last_dot_only() {
        let key = generate_key("holiday.photo.final.jpeg");
        assert!(is_uuid_prefixed(&key, ".jpeg"), "unexpected key {key}");
    }

    #[test]
    fn key_without_extension_has_no_dangling_dot() {
        for name in ["README", "trailing.", "dir.v2/file", ""] {
            let key = generate_key(name);
            assert!(!key.ends_with('.'), "{name} -> {key}");
            assert!(Uuid::parse_str(&key).is_ok(), "{name} -> {key}");
        }
    }

    #[test]
    fn repeated_keys_are_distinct() {
        assert_ne!(generate_key("cat.png"), generate_key("cat.png"));
    }

    #[test]
    fn image_filter_ignores_case() {
        assert!(is_image_key("a.png"));
        assert!(is_image_key("c.JPG"));
        assert!(is_image_key("vector.Svg"));
        assert!(!is_image_key("b.txt"));
        assert!(!is_image_key("png"));
        assert!(!is_image_key("archive.png.zip"));
    }

    #[test]
    fn s3_public_url() {
        let urls = PublicUrl::S3 {
            bucket: "photos".into(),
            region: "eu-west-1".into(),
        };
        assert_eq!(
            urls.for_key("abc.png"),
            "https://photos.s3.eu-west-1.amazonaws.com/abc.png"
        );
    }

    #[test]
    fn base_public_url_trims_slash() {
        let urls = PublicUrl::Base("http://localhost:9000/photos/".into());
        assert_eq!(urls.for_key("abc.png"), "http://localhost:9000/photos/abc.png");
    }

    #[test]
    fn upload_file_content_type_fallback() {
        let file = UploadFile::new("x.bin", None, vec![1u8, 2, 3]);
        assert_eq!(file.content_type_or_default(), "application/octet-stream");
        assert_eq!(file.len(), 3);

        let file = UploadFile::new("x.png", Some("image/png".into()), Vec::new());
        assert_eq!(file.content_type_or_default(), "image/png");
        assert!(file.is_empty());
    }
}
