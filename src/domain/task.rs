//! Geoprocessing task metadata.
//!
//! A [`GeospatialTask`] describes one named unit of work exposed by the
//! backend: its display name, description, and declared parameters. Whether
//! a task participates in feature-driven execution is derived from its
//! parameter declarations, never stored separately.

use serde::{Deserialize, Serialize};

/// Identifier of a loaded geoprocessing task.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Whether a parameter is consumed or produced by the task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterDirection {
    Input,
    Output,
}

/// Data types a task parameter can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterDataType {
    Features,
    Text,
}

/// Declared shape of a single task parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskParameterInfo {
    pub name: String,
    pub direction: ParameterDirection,
    pub data_type: ParameterDataType,
}

impl TaskParameterInfo {
    pub fn new(
        name: impl Into<String>,
        direction: ParameterDirection,
        data_type: ParameterDataType,
    ) -> Self {
        Self {
            name: name.into(),
            direction,
            data_type,
        }
    }
}

/// A named, loaded geoprocessing task.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeospatialTask {
    id: TaskId,
    display_name: String,
    description: String,
    parameters: Vec<TaskParameterInfo>,
}

impl GeospatialTask {
    pub fn new(
        id: TaskId,
        display_name: impl Into<String>,
        description: impl Into<String>,
        parameters: Vec<TaskParameterInfo>,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            description: description.into(),
            parameters,
        }
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &[TaskParameterInfo] {
        &self.parameters
    }

    /// Whether the task declares at least one feature-typed input parameter.
    pub fn accepts_feature_input(&self) -> bool {
        self.first_input_features_parameter().is_some()
    }

    /// The first declared input parameter of feature type, if any. This is
    /// the parameter the buffered input features are bound to at execution.
    pub fn first_input_features_parameter(&self) -> Option<&TaskParameterInfo> {
        self.parameters.iter().find(|parameter| {
            parameter.direction == ParameterDirection::Input
                && parameter.data_type == ParameterDataType::Features
        })
    }
}
