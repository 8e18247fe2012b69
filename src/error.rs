use {
    std::path::PathBuf,
    thiserror::Error
};

pub type Result<T> = std::result::Result<T, EpiError>;

/// Everything that can go wrong while reading or comparing simulator output.
///
/// None of these are fatal for a whole batch: callers skip or abort the
/// affected case and keep going.
#[derive(Debug, Error)]
pub enum EpiError {
    #[error("not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("shape mismatch for {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: String,
        expected: String,
        found: String
    },

    #[error("malformed data in {}: {reason}", path.display())]
    MalformedData { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl EpiError {
    pub fn not_found<P: Into<PathBuf>>(path: P) -> Self
    {
        Self::NotFound { path: path.into() }
    }

    pub fn malformed<P, S>(path: P, reason: S) -> Self
    where P: Into<PathBuf>,
        S: Into<String>
    {
        Self::MalformedData { path: path.into(), reason: reason.into() }
    }

    pub fn shape<W, E, F>(what: W, expected: E, found: F) -> Self
    where W: Into<String>,
        E: ToString,
        F: ToString
    {
        Self::ShapeMismatch {
            what: what.into(),
            expected: expected.to_string(),
            found: found.to_string()
        }
    }

    pub fn is_not_found(&self) -> bool
    {
        matches!(self, Self::NotFound { .. })
    }
}
