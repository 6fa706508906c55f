//! Organization collaborator data

use serde::{Deserialize, Serialize};

/// Committee or working group that owns meetings.
///
/// Read-only here; the display name prefixes calendar titles and seeds
/// description text during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub display_name: String,
}
