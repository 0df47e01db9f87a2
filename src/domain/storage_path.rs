use std::fmt;

use uuid::Uuid;

const UPLOAD_PREFIX: &str = "uploads";
const MAX_EXTENSION_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadId(Uuid);

impl UploadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UploadId {
    fn default() -> Self {
        Self::new()
    }
}

/// Key of a staged object, relative to the staging root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoragePath(String);

impl StoragePath {
    /// Staging key for an upload. Only a sanitized extension of the
    /// client-supplied filename survives; the rest is the upload id.
    pub fn for_upload(upload_id: &UploadId, filename: &str) -> Self {
        match sanitized_extension(filename) {
            Some(ext) => Self(format!("{}/{}.{}", UPLOAD_PREFIX, upload_id.as_uuid(), ext)),
            None => Self(format!("{}/{}", UPLOAD_PREFIX, upload_id.as_uuid())),
        }
    }

    pub fn from_raw(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn sanitized_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
