use std::io::Read;

use serde::{Deserialize, Serialize};

use super::{ConfigurationError, Policy};
use crate::time::{Duration, Service};

/// A task as supplied by a configuration source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(alias = "name")]
    pub task_name: String,
    /// Defaults to the WCET.
    #[serde(default, alias = "BCET")]
    pub bcet: Option<Service>,
    #[serde(alias = "WCET")]
    pub wcet: Service,
    pub period: Duration,
    /// Defaults to the period.
    #[serde(default)]
    pub deadline: Option<Duration>,
    #[serde(default)]
    pub priority: Option<u32>,
    pub component_id: String,
}

/// A component (server) as supplied by a configuration source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    #[serde(alias = "id")]
    pub component_id: String,
    pub scheduler: Policy,
    pub budget: Service,
    pub period: Duration,
    pub core_id: String,
    #[serde(default)]
    pub priority: Option<u32>,
}

/// A core as supplied by a configuration source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreRecord {
    #[serde(alias = "id")]
    pub core_id: String,
    pub speed_factor: f64,
    pub scheduler: Policy,
}

/// The three ordered record collections describing a system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemRecords {
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
    #[serde(default, alias = "budgets")]
    pub components: Vec<ComponentRecord>,
    #[serde(default, alias = "architecture")]
    pub cores: Vec<CoreRecord>,
}

impl SystemRecords {
    /// Parse a JSON document of the form
    /// `{ "tasks": [...], "components": [...], "cores": [...] }`.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Like [SystemRecords::from_json_str], reading from `reader`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigurationError> {
        Ok(serde_json::from_reader(reader)?)
    }
}
