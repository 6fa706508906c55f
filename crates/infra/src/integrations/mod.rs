//! External service integrations

pub mod calendar;
pub mod registry;
pub mod video;

use gavel_domain::GavelError;
use reqwest::Response;

/// Map a non-success HTTP response onto the domain error taxonomy.
///
/// 404 (and calendar's 410 for purged events) is the distinguished
/// "resource not found" signal the reconciler keys on; auth statuses map to
/// `Auth`, everything else is a provider/network failure.
pub(crate) async fn response_error(context: &str, response: Response) -> GavelError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match status.as_u16() {
        404 | 410 => GavelError::NotFound(format!("{context}: {status}")),
        401 | 403 => GavelError::Auth(format!("{context}: {status}: {body}")),
        _ => GavelError::Network(format!("{context}: {status}: {body}")),
    }
}
