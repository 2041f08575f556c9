//! Classification of `sqlx` errors raised by the SQLite store.

/// Returns true if `e` is a unique constraint violation on `links.code`.
///
/// SQLite does not report constraint names, so the column is matched in the
/// error message (`UNIQUE constraint failed: links.code`).
pub fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    db_err.message().contains("links.code")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_violations() {
        assert!(!is_unique_violation_on_code(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation_on_code(&sqlx::Error::PoolTimedOut));
    }
}
