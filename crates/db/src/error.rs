use mycotheca_core::error::CoreError;

/// Error type for repository operations.
///
/// Domain failures (not found, validation, duplicate code, storage IO) are
/// carried as [`CoreError`]; anything else the driver reports is kept as
/// the raw [`sqlx::Error`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// The domain error, if this is one.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            StoreError::Core(core) => Some(core),
            StoreError::Database(_) => None,
        }
    }
}

/// Translate a unique-constraint violation on a `code` column into a
/// [`CoreError::DuplicateKey`]. Other errors pass through unchanged.
///
/// The repositories check uniqueness before writing; this covers the race
/// where two writers pass the check at the same time.
pub(crate) fn map_unique_code(err: sqlx::Error, entity: &'static str, code: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            CoreError::duplicate(entity, "code", code).into()
        }
        _ => StoreError::Database(err),
    }
}
