//! Teaching material metadata.
//!
//! Only metadata lives here; the bytes behind `StoredFile` belong to the
//! external file-storage collaborator.

use serde::{Deserialize, Serialize};

use crate::domain::id::{LecturerId, MaterialId, SubjectId};

/// Maximum allowed length for a material title.
pub const TITLE_MAX: usize = 200;

/// Validation errors raised by the material constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MaterialValidationError {
    /// Title was blank once trimmed.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Title exceeds the storage width.
    #[error("title must be at most {max} characters")]
    TitleTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Stored files cannot have a negative size.
    #[error("file size must not be negative")]
    NegativeFileSize,
    /// Download counters never go backwards.
    #[error("download count must not be negative")]
    NegativeDownloadCount,
}

/// Metadata handed over by the external file-storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    path: String,
    file_type: String,
    size_bytes: i64,
}

impl StoredFile {
    /// Wrap stored-file metadata, rejecting negative sizes.
    pub fn try_new(
        path: impl Into<String>,
        file_type: impl Into<String>,
        size_bytes: i64,
    ) -> Result<Self, MaterialValidationError> {
        if size_bytes < 0 {
            return Err(MaterialValidationError::NegativeFileSize);
        }
        Ok(Self {
            path: path.into(),
            file_type: file_type.into(),
            size_bytes,
        })
    }

    /// Storage path of the file.
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// File type label such as `pdf`.
    pub fn file_type(&self) -> &str {
        self.file_type.as_str()
    }

    /// Size of the stored bytes.
    pub const fn size_bytes(&self) -> i64 {
        self.size_bytes
    }
}

/// Input for registering a [`Material`] before persistence assigns state.
#[derive(Debug, Clone)]
pub struct NewMaterial {
    /// Subject the material belongs to.
    pub subject_id: SubjectId,
    /// Uploading lecturer.
    pub uploaded_by: LecturerId,
    /// Display title.
    pub title: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Stored file metadata, if a file was attached.
    pub file: Option<StoredFile>,
}

/// Input for building a [`Material`].
#[derive(Debug, Clone)]
pub struct MaterialDraft {
    /// Primary key.
    pub id: MaterialId,
    /// Subject the material belongs to.
    pub subject_id: SubjectId,
    /// Uploading lecturer.
    pub uploaded_by: LecturerId,
    /// Display title.
    pub title: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Stored file metadata, if a file was attached.
    pub file: Option<StoredFile>,
    /// Successful downloads so far.
    pub download_count: i64,
}

/// Metadata for one uploaded document.
///
/// ## Invariants
/// - `download_count` never decreases and is incremented only by a
///   successful download.
/// - Only the uploading lecturer may delete the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    id: MaterialId,
    subject_id: SubjectId,
    uploaded_by: LecturerId,
    title: String,
    description: Option<String>,
    file: Option<StoredFile>,
    download_count: i64,
}

impl Material {
    /// Build a material record from validated components.
    pub fn new(draft: MaterialDraft) -> Result<Self, MaterialValidationError> {
        let title = draft.title.trim().to_owned();
        if title.is_empty() {
            return Err(MaterialValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(MaterialValidationError::TitleTooLong { max: TITLE_MAX });
        }
        if draft.download_count < 0 {
            return Err(MaterialValidationError::NegativeDownloadCount);
        }
        Ok(Self {
            id: draft.id,
            subject_id: draft.subject_id,
            uploaded_by: draft.uploaded_by,
            title,
            description: draft.description,
            file: draft.file,
            download_count: draft.download_count,
        })
    }

    /// Primary key.
    pub const fn id(&self) -> MaterialId {
        self.id
    }

    /// Subject the material belongs to.
    pub const fn subject_id(&self) -> SubjectId {
        self.subject_id
    }

    /// Uploading lecturer.
    pub const fn uploaded_by(&self) -> LecturerId {
        self.uploaded_by
    }

    /// Display title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Free-text description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Stored file metadata, if a file was attached.
    pub const fn file(&self) -> Option<&StoredFile> {
        self.file.as_ref()
    }

    /// Successful downloads so far.
    pub const fn download_count(&self) -> i64 {
        self.download_count
    }

    /// Human-readable size label for listings.
    pub fn size_label(&self) -> String {
        let Some(file) = &self.file else {
            return "0 KB".to_owned();
        };
        let size = file.size_bytes();
        if size < 1024 {
            format!("{size} B")
        } else if size < 1024 * 1024 {
            format!("{:.1} KB", size as f64 / 1024.0)
        } else {
            format!("{:.1} MB", size as f64 / (1024.0 * 1024.0))
        }
    }
}
