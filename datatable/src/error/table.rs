//! TableError for mounting

/// Errors raised while attaching a table to its document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// No element carries the requested mount id.
    #[error("Table element '{id}' does not exist")]
    MountTargetMissing { id: String },

    /// The document was already mutably borrowed while mounting.
    #[error("Document is borrowed elsewhere")]
    DocumentBorrowed,
}

impl TableError {
    pub fn mount_target_missing(id: impl Into<String>) -> Self {
        Self::MountTargetMissing { id: id.into() }
    }
}
