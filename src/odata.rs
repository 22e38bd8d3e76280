//! # OData Helpers
//!
//! Endpoint paths, the `{"value": [...]}` collection envelope and `$filter`
//! construction for the orchestrator's OData API.

use serde::Deserialize;

use crate::error::{ClientError, ClientResult};

/// Header that scopes a request to a folder (organization unit)
pub const FOLDER_HEADER: &str = "X-UIPATH-OrganizationUnitId";

pub const OAUTH_TOKEN_PATH: &str = "identity_/connect/token";
pub const LEGACY_AUTH_PATH: &str = "api/Account/Authenticate";

pub const FOLDERS_PATH: &str = "Folders";
pub const RELEASES_PATH: &str = "Releases";
pub const JOBS_PATH: &str = "Jobs";
pub const START_JOBS_PATH: &str = "Jobs/UiPath.Server.Configuration.OData.StartJobs";
pub const START_TRANSACTION_PATH: &str = "Queues/UiPathODataSvc.StartTransaction";
pub const ADD_QUEUE_ITEM_PATH: &str = "Queues/UiPathODataSvc.AddQueueItem";
pub const MACHINES_PATH: &str = "Machines";
pub const ROBOTS_PATH: &str = "Robots";

pub fn stop_job_path(job_id: i64) -> String {
    format!("Jobs({job_id})/UiPath.Server.Configuration.OData.StopJob")
}

pub fn queue_item_path(item_id: i64) -> String {
    format!("QueueItems({item_id})")
}

/// OData collection envelope
///
/// `value` is optional on the wire so a missing field can be reported as an
/// [`ClientError::InvalidResponse`] instead of a generic decode failure.
/// A missing `Option` field already decodes to `None`; no `Default` bound on
/// `T` is needed.
#[derive(Debug, Clone, Deserialize)]
pub struct ODataCollection<T> {
    pub value: Option<Vec<T>>,
}

impl<T> ODataCollection<T> {
    /// Records of the collection, or an error if the envelope had no `value`
    pub fn into_records(self) -> ClientResult<Vec<T>> {
        self.value
            .ok_or_else(|| ClientError::invalid_response("value", "OData collection has no 'value' field"))
    }
}

/// Quote a string as an OData literal, doubling embedded single quotes
pub fn quote_literal(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}

/// `contains(Field,'needle')`
pub fn contains_filter(field: &str, needle: &str) -> String {
    format!("contains({},{})", field, quote_literal(needle))
}

/// Filter for jobs of a release that are currently running
pub fn running_jobs_filter(release_name: &str) -> String {
    format!(
        "{} and State eq {}",
        contains_filter("ReleaseName", release_name),
        quote_literal("Running")
    )
}
