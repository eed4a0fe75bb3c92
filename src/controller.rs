use crate::api::types::{BuildConfig, CreateProjectRequest, CreateProjectResponse};
use crate::api::{ApiClient, ApiError};
use crate::event::AppEvent;
use std::fmt;
use std::future::Future;
use std::sync::{mpsc, Arc};
use tokio::runtime::Handle;
use tokio::time::{sleep, Duration};

/// Cosmetic build stages, one every ~500ms. Not tied to real backend
/// progress.
const BUILD_STAGES: [u8; 5] = [10, 30, 60, 80, 100];
const BUILD_STAGE_INTERVAL: Duration = Duration::from_millis(500);

/// Client-side preconditions checked before any network call. These stay
/// synchronous and never reach the activity log as failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingName,
    MissingDescription,
    EmptyPrompt,
    NoProjectSelected,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => write!(f, "Project name is required"),
            Self::MissingDescription => write!(f, "Project description is required"),
            Self::EmptyPrompt => write!(f, "Prompt cannot be empty"),
            Self::NoProjectSelected => write!(f, "Select a project first"),
        }
    }
}

pub fn validate_build(name: &str, description: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if description.trim().is_empty() {
        return Err(ValidationError::MissingDescription);
    }
    Ok(())
}

/// Turns UI intent into one backend call and one settle event. Every
/// spawned task sends exactly one terminal [`AppEvent`], so the UI can
/// restore control state no matter how the call ends.
#[derive(Clone)]
pub struct WorkbenchController {
    api: Arc<ApiClient>,
    tx: mpsc::Sender<AppEvent>,
    runtime_handle: Handle,
}

impl WorkbenchController {
    pub fn new(api: Arc<ApiClient>, tx: mpsc::Sender<AppEvent>, runtime_handle: Handle) -> Self {
        Self {
            api,
            tx,
            runtime_handle,
        }
    }

    pub fn build_project(
        &self,
        name: &str,
        description: &str,
        project_type: &str,
        tech_stack: &str,
    ) -> Result<(), ValidationError> {
        validate_build(name, description)?;

        let request = CreateProjectRequest {
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            project_type: project_type.to_string(),
            tech_stack: tech_stack.to_string(),
        };
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let progress_tx = self.tx.clone();

        self.runtime_handle.spawn(async move {
            drive_build(api.create_project(&request), tx, progress_tx).await;
        });
        Ok(())
    }

    pub fn generate_code(&self, prompt: &str, language: &str) -> Result<(), ValidationError> {
        if prompt.trim().is_empty() {
            return Err(ValidationError::EmptyPrompt);
        }

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let prompt = prompt.trim().to_string();
        let language = language.to_string();

        self.runtime_handle.spawn(async move {
            let result = api.generate_code(&prompt, &language).await;
            if let Err(err) = &result {
                log::warn!("generate-code failed: {err}");
            }
            let _ = tx.send(AppEvent::CodeGenerated(result));
        });
        Ok(())
    }

    pub fn deploy_project(&self, project_id: Option<&str>) -> Result<(), ValidationError> {
        let project_id = project_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(ValidationError::NoProjectSelected)?
            .to_string();

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();

        self.runtime_handle.spawn(async move {
            let result = api.deploy_project(&project_id).await;
            if let Err(err) = &result {
                log::warn!("deploy-project failed: {err}");
            }
            let _ = tx.send(AppEvent::DeployFinished(
                result.map(|response| response.deployment_url),
            ));
        });
        Ok(())
    }

    /// Caller is expected to have appended the user message and the
    /// thinking placeholder already; the reply event replaces the
    /// placeholder.
    pub fn send_message(&self, text: String, provider: String) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();

        self.runtime_handle.spawn(async move {
            let result = api.generate(&text, &provider).await;
            if let Err(err) = &result {
                log::warn!("chat generate failed: {err}");
            }
            let _ = tx.send(AppEvent::ChatReply(result));
        });
    }

    pub fn run_factory(&self, config: BuildConfig, provider: String) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();

        self.runtime_handle.spawn(async move {
            let result = api.generate_factory(&config, &provider).await;
            if let Err(err) = &result {
                log::warn!("factory generate failed: {err}");
            }
            let _ = tx.send(AppEvent::FactoryFinished(result));
        });
    }

    pub fn refresh_projects(&self) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();

        self.runtime_handle.spawn(async move {
            let result = api.list_projects().await;
            if let Err(err) = &result {
                log::warn!("project list failed: {err}");
            }
            let _ = tx.send(AppEvent::ProjectsLoaded(result));
        });
    }
}

/// Drives one build. The staged indicator ticks on its own task; the
/// settle event goes out the moment the request resolves and never waits
/// for the remaining ticks, which the state machine ignores once settled.
async fn drive_build<F>(call: F, tx: mpsc::Sender<AppEvent>, progress_tx: mpsc::Sender<AppEvent>)
where
    F: Future<Output = Result<CreateProjectResponse, ApiError>>,
{
    tokio::spawn(async move {
        for stage in BUILD_STAGES {
            let _ = progress_tx.send(AppEvent::BuildProgress(stage));
            sleep(BUILD_STAGE_INTERVAL).await;
        }
    });

    let result = call.await;
    if let Err(err) = &result {
        log::warn!("create-project failed: {err}");
    }
    let _ = tx.send(AppEvent::BuildFinished(
        result.map(|response| response.project),
    ));
}
