use crate::config::Config;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

pub mod types;

use types::{
    BuildConfig, CreateProjectRequest, CreateProjectResponse, DeployProjectRequest,
    DeployProjectResponse, GenerateCodeRequest, GenerateCodeResponse, GenerateRequest,
    GenerateResponse, Project, ProjectListResponse,
};

/// Failure taxonomy for backend calls. Every in-flight operation settles
/// into exactly one of these; validation failures never reach this layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The per-request deadline expired before the backend answered.
    #[error("request timed out - the server took too long to respond")]
    Timeout,
    /// The request never produced an HTTP response (DNS, refused, offline).
    #[error("Network error - check your connection")]
    Transport(String),
    /// Non-2xx status; `message` is the parsed `{error}` body or a fixed
    /// fallback when the body is not usable JSON.
    #[error("{message}")]
    Server { status: u16, message: String },
    /// 2xx response whose body did not decode into the expected shape.
    #[error("unexpected response payload: {0}")]
    Payload(String),
}

pub struct ApiClient {
    http: reqwest::Client,
    config: Config,
}

impl ApiClient {
    pub fn new(config: Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub async fn create_project(
        &self,
        request: &CreateProjectRequest,
    ) -> Result<CreateProjectResponse, ApiError> {
        self.post_json("/api/create-project", request).await
    }

    pub async fn generate_code(
        &self,
        prompt: &str,
        language: &str,
    ) -> Result<GenerateCodeResponse, ApiError> {
        let request = GenerateCodeRequest {
            prompt: prompt.to_string(),
            language: language.to_string(),
        };
        self.post_json("/api/generate-code", &request).await
    }

    pub async fn deploy_project(&self, project_id: &str) -> Result<DeployProjectResponse, ApiError> {
        let request = DeployProjectRequest {
            project_id: project_id.to_string(),
        };
        self.post_json("/api/deploy-project", &request).await
    }

    /// Shared by the chat and factory flows; only the prompt template
    /// differs. `provider` is passed through as an opaque string.
    pub async fn generate(&self, prompt: &str, provider: &str) -> Result<String, ApiError> {
        let request = GenerateRequest {
            prompt: prompt.to_string(),
            provider: provider.to_string(),
        };
        let response: GenerateResponse = self.post_json("/api/generate", &request).await?;
        reply_text(response)
    }

    pub async fn generate_factory(
        &self,
        config: &BuildConfig,
        provider: &str,
    ) -> Result<String, ApiError> {
        self.generate(&config.to_prompt(), provider).await
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        let response: ProjectListResponse = self.get_json("/api/projects").await?;
        Ok(response.projects)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.config.endpoint(path)).json(body);
        with_timeout(self.config.request_timeout, async move {
            let response = request.send().await.map_err(transport_error)?;
            let status = response.status();
            let body = response.text().await.map_err(transport_error)?;
            interpret_body(status, &body)
        })
        .await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.http.get(self.config.endpoint(path));
        with_timeout(self.config.request_timeout, async move {
            let response = request.send().await.map_err(transport_error)?;
            let status = response.status();
            let body = response.text().await.map_err(transport_error)?;
            interpret_body(status, &body)
        })
        .await
    }
}

/// Applies the per-request deadline. Each call gets its own timer, so one
/// slow request never affects another in flight.
async fn with_timeout<T, F>(limit: Duration, operation: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => Err(ApiError::Timeout),
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    log::warn!("transport failure: {err}");
    ApiError::Transport(err.to_string())
}

/// Maps an HTTP status plus raw body into the typed result. Non-2xx bodies
/// are best-effort parsed as `{error: string}` with a fixed fallback.
fn interpret_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ApiError> {
    if !status.is_success() {
        return Err(ApiError::Server {
            status: status.as_u16(),
            message: server_error_message(status, body),
        });
    }

    serde_json::from_str(body).map_err(|err| ApiError::Payload(err.to_string()))
}

/// A 2xx generate body can still flag failure via `success: false`; the
/// reply text doubles as the error message when it does.
fn reply_text(response: GenerateResponse) -> Result<String, ApiError> {
    if response.success == Some(false) {
        let message = if response.response.is_empty() {
            "Generation failed".to_string()
        } else {
            response.response
        };
        return Err(ApiError::Server {
            status: 200,
            message,
        });
    }
    Ok(response.response)
}

fn server_error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("Server error: {}", status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::future;
    use tokio::time::Instant;

    #[test]
    fn malformed_error_body_falls_back_to_status_message() {
        let result: Result<GenerateResponse, ApiError> =
            interpret_body(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(
            result,
            Err(ApiError::Server {
                status: 500,
                message: "Server error: 500".to_string(),
            })
        );
    }

    #[test]
    fn json_error_body_surfaces_backend_message() {
        let result: Result<GenerateResponse, ApiError> =
            interpret_body(StatusCode::BAD_REQUEST, r#"{"error":"prompt required"}"#);
        assert_eq!(
            result,
            Err(ApiError::Server {
                status: 400,
                message: "prompt required".to_string(),
            })
        );
    }

    #[test]
    fn success_body_decodes_into_expected_shape() {
        let body = json!({"success": true, "response": "hello"}).to_string();
        let result: Result<GenerateResponse, ApiError> = interpret_body(StatusCode::OK, &body);
        let response = result.expect("valid body should decode");
        assert_eq!(response.response, "hello");
    }

    #[test]
    fn declined_generate_body_is_an_error_reply() {
        let declined = GenerateResponse {
            success: Some(false),
            response: "quota exceeded".to_string(),
        };
        assert_eq!(
            reply_text(declined),
            Err(ApiError::Server {
                status: 200,
                message: "quota exceeded".to_string(),
            })
        );

        let silent = GenerateResponse {
            success: Some(false),
            response: String::new(),
        };
        assert_eq!(
            reply_text(silent),
            Err(ApiError::Server {
                status: 200,
                message: "Generation failed".to_string(),
            })
        );

        // Missing or true flags pass the reply through untouched.
        let plain = GenerateResponse {
            success: None,
            response: "hello".to_string(),
        };
        assert_eq!(reply_text(plain), Ok("hello".to_string()));
    }

    #[test]
    fn undecodable_success_body_is_a_payload_error() {
        let result: Result<CreateProjectResponse, ApiError> =
            interpret_body(StatusCode::OK, r#"{"unexpected": 1}"#);
        assert!(matches!(result, Err(ApiError::Payload(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn never_resolving_request_times_out_after_deadline() {
        let started = Instant::now();
        let result: Result<u8, ApiError> = with_timeout(
            Duration::from_secs(60),
            future::pending::<Result<u8, ApiError>>(),
        )
        .await;

        assert_eq!(result, Err(ApiError::Timeout));
        assert_eq!(started.elapsed(), Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn timers_are_independent_per_request() {
        let fast = with_timeout(Duration::from_secs(1), async {
            Ok::<_, ApiError>("done")
        });
        let slow = with_timeout(
            Duration::from_secs(60),
            future::pending::<Result<&str, ApiError>>(),
        );

        let (fast, slow) = tokio::join!(fast, slow);
        assert_eq!(fast, Ok("done"));
        assert_eq!(slow, Err(ApiError::Timeout));
    }
}
