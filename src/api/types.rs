use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// A project as reported by the backend. The client only ever holds
/// read-only copies of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Value,
    pub name: String,
    #[serde(default)]
    pub tech_stack: String,
    #[serde(default)]
    pub created_at: String,
}

impl Project {
    pub fn id_string(&self) -> String {
        match &self.id {
            Value::String(id) => id.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentTarget {
    Script,
    Server,
}

impl fmt::Display for DeploymentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Script => write!(f, "script"),
            Self::Server => write!(f, "server"),
        }
    }
}

/// Factory-flow generation parameters, assembled from form state at submit
/// time and immutable once sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildConfig {
    pub functions: BTreeSet<String>,
    pub interfaces: BTreeSet<String>,
    pub deployment: DeploymentTarget,
    pub database_type: String,
    pub performance_level: String,
    pub features: BTreeSet<String>,
}

impl BuildConfig {
    /// Renders the structured prompt the generate endpoint expects for the
    /// factory flow. Selections are listed in stable order.
    pub fn to_prompt(&self) -> String {
        let join = |set: &BTreeSet<String>| {
            if set.is_empty() {
                "none".to_string()
            } else {
                set.iter().cloned().collect::<Vec<_>>().join(", ")
            }
        };

        format!(
            "Build an application with the following configuration.\n\
             Functions: {}\n\
             Interfaces: {}\n\
             Deployment: {}\n\
             Database: {}\n\
             Performance: {}\n\
             Features: {}",
            join(&self.functions),
            join(&self.interfaces),
            self.deployment,
            self.database_type,
            self.performance_level,
            join(&self.features),
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub project_type: String,
    pub tech_stack: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectResponse {
    pub project: Project,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateCodeRequest {
    pub prompt: String,
    pub language: String,
}

/// `file_structure` is kept as a raw value: the backend is not consistent
/// about its shape and rendering must tolerate anything it sends.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateCodeResponse {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub file_structure: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeployProjectRequest {
    pub project_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeployProjectResponse {
    #[serde(default)]
    pub deployment_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub provider: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub response: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectListResponse {
    #[serde(default)]
    pub projects: Vec<Project>,
}
