//! # Orchestrator Wire Types
//!
//! Typed request bodies and response records exchanged with the orchestrator.
//! Field names follow the orchestrator's JSON exactly (PascalCase records,
//! camelCase action envelopes).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Free-form key/value content attached to queue items and job inputs
pub type ContentMap = HashMap<String, Value>;

/// Folder (organization unit) used to scope requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "FullyQualifiedName", default)]
    pub fully_qualified_name: String,
}

impl Folder {
    pub fn new(id: i64, fully_qualified_name: impl Into<String>) -> Self {
        Self {
            id,
            fully_qualified_name: fully_qualified_name.into(),
        }
    }
}

/// Release record as returned by the releases listing
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ReleaseRecord {
    #[serde(rename = "Key")]
    pub key: String,
}

/// Job record as returned by the jobs listing
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct JobRecord {
    #[serde(rename = "Id")]
    pub id: i64,
}

/// Queue item as returned by the add and status endpoints
///
/// The commonly used fields are typed; every other field of the response is
/// kept in `extra`, so serializing a `QueueItem` reproduces the body it was
/// decoded from. Typed fields remember whether they were absent or `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(
        rename = "Name",
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    name: Option<Option<String>>,
    #[serde(
        rename = "Reference",
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    reference: Option<Option<String>>,
    #[serde(
        rename = "Status",
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    status: Option<Option<String>>,
    #[serde(
        rename = "SpecificContent",
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    specific_content: Option<Option<ContentMap>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Present fields decode to `Some`, with an explicit `null` as `Some(None)`
fn present_or_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl QueueItem {
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().and_then(Option::as_deref)
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_ref().and_then(Option::as_deref)
    }

    /// Processing status (`New`, `InProgress`, `Successful`, `Failed` ...)
    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().and_then(Option::as_deref)
    }

    pub fn specific_content(&self) -> Option<&ContentMap> {
        self.specific_content.as_ref().and_then(Option::as_ref)
    }
}

/// Body of the StartJobs action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartJobsRequest {
    pub start_info: StartInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StartInfo {
    pub release_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_arguments: Option<ContentMap>,
}

impl StartJobsRequest {
    pub fn new(release_key: impl Into<String>, inputs: Option<ContentMap>) -> Self {
        Self {
            start_info: StartInfo {
                release_key: release_key.into(),
                input_arguments: inputs,
            },
        }
    }
}

/// How a running job is stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopStrategy {
    SoftStop,
    Kill,
}

/// Body of the StopJob action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopJobRequest {
    pub strategy: StopStrategy,
}

/// Body of the StartTransaction action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTransactionRequest {
    pub transaction_data: TransactionData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionData {
    pub name: String,
}

impl StartTransactionRequest {
    pub fn new(queue_name: impl Into<String>) -> Self {
        Self {
            transaction_data: TransactionData {
                name: queue_name.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineType {
    #[default]
    Standard,
    Template,
}

/// Body of the machine creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateMachineRequest {
    pub name: String,
    pub description: String,
    #[serde(rename = "Type")]
    pub machine_type: MachineType,
}

impl CreateMachineRequest {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            machine_type: MachineType::Standard,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RobotType {
    #[default]
    Attended,
    Unattended,
    NonProduction,
    Development,
    StudioX,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostingType {
    #[default]
    Standard,
    Floating,
}

/// Robot provisioning record, serialized as the robot creation body
///
/// # Examples
///
/// ```rust
/// use orchestrator_client::models::{HostingType, NewRobot, RobotType};
///
/// let robot = NewRobot::new("MACHINE-01", "invoice-bot", "CORP\\bot", "s3cret")
///     .with_description("Processes invoices")
///     .with_robot_type(RobotType::Unattended);
/// assert_eq!(robot.hosting_type, HostingType::Standard);
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewRobot {
    pub machine_name: String,
    pub name: String,
    pub username: String,
    pub description: String,
    #[serde(rename = "Type")]
    pub robot_type: RobotType,
    pub hosting_type: HostingType,
    pub password: String,
}

impl NewRobot {
    pub fn new(
        machine_name: impl Into<String>,
        name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            machine_name: machine_name.into(),
            name: name.into(),
            username: username.into(),
            description: String::new(),
            robot_type: RobotType::default(),
            hosting_type: HostingType::default(),
            password: password.into(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_robot_type(mut self, robot_type: RobotType) -> Self {
        self.robot_type = robot_type;
        self
    }

    #[must_use]
    pub fn with_hosting_type(mut self, hosting_type: HostingType) -> Self {
        self.hosting_type = hosting_type;
        self
    }
}

impl std::fmt::Debug for NewRobot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewRobot")
            .field("machine_name", &self.machine_name)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("description", &self.description)
            .field("robot_type", &self.robot_type)
            .field("hosting_type", &self.hosting_type)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of the AddQueueItem action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddQueueItemRequest {
    pub item_data: QueueItemData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueueItemData {
    pub name: String,
    pub specific_content: ContentMap,
    pub reference: String,
}

impl AddQueueItemRequest {
    pub fn new(queue_name: impl Into<String>, reference: impl Into<String>, item: &ContentMap) -> Self {
        let specific_content = item
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            item_data: QueueItemData {
                name: queue_name.into(),
                specific_content,
                reference: reference.into(),
            },
        }
    }
}
