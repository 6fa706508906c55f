//! Conversions from external infrastructure errors into domain errors.

use gavel_domain::GavelError;
use r2d2::Error as PoolError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub GavelError);

impl From<InfraError> for GavelError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<GavelError> for InfraError {
    fn from(value: GavelError) -> Self {
        InfraError(value)
    }
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → GavelError */
/* -------------------------------------------------------------------------- */

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        let domain = match value {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => GavelError::Database("database is busy".into()),
                    ErrorCode::DatabaseLocked => GavelError::Database("database is locked".into()),
                    ErrorCode::ConstraintViolation => {
                        GavelError::Database(format!("constraint violation: {message}"))
                    }
                    _ => GavelError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => GavelError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                GavelError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                GavelError::Database(format!("invalid column type: {ty}"))
            }
            other => GavelError::Database(other.to_string()),
        };
        InfraError(domain)
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → GavelError */
/* -------------------------------------------------------------------------- */

impl From<PoolError> for InfraError {
    fn from(value: PoolError) -> Self {
        InfraError(GavelError::Database(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → GavelError */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        let domain = if value.is_timeout() {
            GavelError::Network("request timed out".into())
        } else if value.is_connect() {
            GavelError::Network(format!("connection failed: {value}"))
        } else if value.is_decode() {
            GavelError::Network(format!("failed to decode response body: {value}"))
        } else {
            GavelError::Network(value.to_string())
        };
        InfraError(domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_rows_maps_to_not_found() {
        let err: InfraError = SqlError::QueryReturnedNoRows.into();
        assert!(matches!(err.0, GavelError::NotFound(_)));
    }

    #[test]
    fn round_trips_through_the_newtype() {
        let original = GavelError::Auth("expired".into());
        let infra: InfraError = original.clone().into();
        let back: GavelError = infra.into();
        assert_eq!(back, original);
    }
}
