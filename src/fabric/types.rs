// ABOUTME: Minimal response types for the Fabric environment endpoints.
// ABOUTME: Only fields this tool reads are modelled; everything else is ignored.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Publish state of an environment as reported by `publishDetails.state`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishState {
    NotStarted,
    Waiting,
    Running,
    Cancelling,
    Success,
    Failed,
    Cancelled,
    /// A state this tool does not know about; treated as in progress.
    Other(String),
}

impl PublishState {
    /// Parse the API's state string. Only the exact spellings are known
    /// states; anything else is kept as `Other`.
    pub fn parse(value: &str) -> Self {
        match value {
            "NotStarted" => PublishState::NotStarted,
            "Waiting" => PublishState::Waiting,
            "Running" => PublishState::Running,
            "Cancelling" => PublishState::Cancelling,
            "Success" => PublishState::Success,
            "Failed" => PublishState::Failed,
            "Cancelled" => PublishState::Cancelled,
            _ => PublishState::Other(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PublishState::NotStarted => "NotStarted",
            PublishState::Waiting => "Waiting",
            PublishState::Running => "Running",
            PublishState::Cancelling => "Cancelling",
            PublishState::Success => "Success",
            PublishState::Failed => "Failed",
            PublishState::Cancelled => "Cancelled",
            PublishState::Other(s) => s,
        }
    }
}

impl fmt::Display for PublishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PublishState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

/// `properties.publishDetails.state` of `GET workspaces/{ws}/environments/{env}`.
///
/// Nothing else in the body is read, so unrelated fields never fail the decode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvironmentState {
    #[serde(default)]
    properties: Option<StateProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateProperties {
    #[serde(default)]
    publish_details: Option<StateDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StateDetails {
    #[serde(default)]
    state: Option<PublishState>,
}

impl EnvironmentState {
    pub fn into_publish_state(self) -> Option<PublishState> {
        self.properties?.publish_details?.state
    }
}

/// `GET workspaces/{ws}/environments/{env}`, for display.
///
/// Every field is best effort: a value with an unexpected shape reads as `None`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentDetails {
    #[serde(default, deserialize_with = "lenient")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub properties: Option<EnvironmentProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentProperties {
    #[serde(default, deserialize_with = "lenient")]
    pub publish_details: Option<PublishDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishDetails {
    #[serde(default, deserialize_with = "lenient")]
    pub state: Option<PublishState>,
    #[serde(default, deserialize_with = "lenient")]
    pub target_version: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub end_time: Option<DateTime<Utc>>,
}

/// Decode `T` if the value has the right shape, `None` otherwise.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl EnvironmentDetails {
    pub fn publish_details(&self) -> Option<&PublishDetails> {
        self.properties.as_ref()?.publish_details.as_ref()
    }

    /// `properties.publishDetails.state`, if present.
    pub fn publish_state(&self) -> Option<&PublishState> {
        self.publish_details()?.state.as_ref()
    }
}

/// `GET workspaces/{ws}/environments/{env}/libraries`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryListing {
    #[serde(default)]
    pub custom_libraries: Option<CustomLibraries>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomLibraries {
    #[serde(default)]
    pub wheel_files: Option<Vec<String>>,
}

impl LibraryListing {
    /// Wheel file names, empty when the listing has no `customLibraries.wheelFiles`.
    pub fn wheel_files(&self) -> &[String] {
        self.custom_libraries
            .as_ref()
            .and_then(|c| c.wheel_files.as_deref())
            .unwrap_or_default()
    }
}
