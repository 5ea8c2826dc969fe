use aerie_core::SourceError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

/// Store failures cross the core boundary as `SourceUnavailable`-family errors.
impl From<StoreError> for SourceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Io(msg) => SourceError::Unavailable(msg),
            StoreError::Database(msg) => SourceError::Query(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_errors_become_database() {
        let err = StoreError::from(rusqlite::Error::InvalidQuery);
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[test]
    fn crosses_boundary_as_source_error() {
        let source = SourceError::from(StoreError::Database("no such table: drones".into()));
        assert!(matches!(source, SourceError::Query(_)));

        let source = SourceError::from(StoreError::Io("disk full".into()));
        assert!(matches!(source, SourceError::Unavailable(_)));
    }
}
