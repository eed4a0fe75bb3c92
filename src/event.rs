use crate::api::types::{GenerateCodeResponse, Project};
use crate::api::ApiError;

/// Messages sent from spawned backend tasks to the UI thread. Each
/// operation settles with exactly one terminal event; `BuildProgress` is
/// the only non-terminal one and is purely cosmetic.
#[derive(Debug, Clone)]
pub enum AppEvent {
    BuildProgress(u8),
    BuildFinished(Result<Project, ApiError>),
    CodeGenerated(Result<GenerateCodeResponse, ApiError>),
    DeployFinished(Result<String, ApiError>),
    ChatReply(Result<String, ApiError>),
    FactoryFinished(Result<String, ApiError>),
    ProjectsLoaded(Result<Vec<Project>, ApiError>),
}
