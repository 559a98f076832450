use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Duplicate {entity} {field}: '{value}' is already in use")]
    DuplicateKey {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Failed to store file '{name}': {source}")]
    StorageIo {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::Validation`] naming the offending field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`CoreError::DuplicateKey`].
    pub fn duplicate(entity: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        Self::DuplicateKey {
            entity,
            field,
            value: value.into(),
        }
    }

    /// Shorthand for a [`CoreError::StorageIo`].
    pub fn storage(name: impl Into<String>, source: std::io::Error) -> Self {
        Self::StorageIo {
            name: name.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_field() {
        let err = CoreError::validation("collection_date", "expected YYYY-MM-DD");
        assert_eq!(
            err.to_string(),
            "Invalid value for 'collection_date': expected YYYY-MM-DD"
        );
    }

    #[test]
    fn duplicate_message_names_field_and_value() {
        let err = CoreError::duplicate("Collection", "code", "COL001");
        assert_eq!(
            err.to_string(),
            "Duplicate Collection code: 'COL001' is already in use"
        );
    }
}
