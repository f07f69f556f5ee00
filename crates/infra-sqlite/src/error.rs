// sqlx::Error -> AppError mapping

use tracker_core::error::AppError;

/// Convert sqlx::Error to AppError with structured information
///
/// UNIQUE violations become `UniqueConstraint` so services can translate
/// them; a FOREIGN KEY violation means the referenced project vanished.
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            // SQLite extended result codes: https://www.sqlite.org/rescode.html
            match db_err.code().as_deref() {
                Some("2067") | Some("1555") => AppError::UniqueConstraint(db_err.message().to_string()),
                Some("787") => AppError::Validation(format!(
                    "Referenced project does not exist: {}",
                    db_err.message()
                )),
                Some("5") => {
                    AppError::Database(format!("Database locked (SQLITE_BUSY): {}", db_err.message()))
                }
                Some(code) => {
                    AppError::Database(format!("Database error [{}]: {}", code, db_err.message()))
                }
                None => AppError::Database(format!("Database error: {}", db_err.message())),
            }
        }
        sqlx::Error::ColumnNotFound(col) => AppError::Database(format!("Column not found: {}", col)),
        // Connection, pool, protocol errors
        _ => AppError::Database(err.to_string()),
    }
}
