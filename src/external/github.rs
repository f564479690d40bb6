use serde_json::json;
use thiserror::Error;

/// Env vars the trigger endpoint cannot work without. Named in the error
/// body so operators know what to set.
pub const REQUIRED_ENV_VARS: &str = "GITHUB_TOKEN, GITHUB_REPO_OWNER, GITHUB_REPO_NAME";

/// Credentials and coordinates for the `workflow_dispatch` call.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub token: String,
    pub repo_owner: String,
    pub repo_name: String,
    pub workflow_file: String,
    pub workflow_ref: String,
}

impl DispatchConfig {
    /// Read the dispatch target from the environment. `None` when any
    /// mandatory variable is unset; the server still starts and the
    /// trigger route reports the configuration error per request.
    pub fn from_env() -> Option<Self> {
        let token = std::env::var("GITHUB_TOKEN").ok()?;
        let repo_owner = std::env::var("GITHUB_REPO_OWNER").ok()?;
        let repo_name = std::env::var("GITHUB_REPO_NAME").ok()?;

        Some(Self {
            token,
            repo_owner,
            repo_name,
            workflow_file: std::env::var("GITHUB_WORKFLOW_FILE")
                .unwrap_or_else(|_| "main.yml".to_string()),
            workflow_ref: std::env::var("GITHUB_WORKFLOW_REF")
                .unwrap_or_else(|_| "main".to_string()),
        })
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("GitHub API returned status {status}")]
    Upstream { status: u16, body: serde_json::Value },
}

/// Client for the GitHub Actions workflow-dispatch API.
pub struct WorkflowDispatcher {
    client: reqwest::Client,
    config: Option<DispatchConfig>,
}

impl WorkflowDispatcher {
    pub fn new(config: Option<DispatchConfig>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("ustracker/0.1")
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            config,
        }
    }

    pub fn config(&self) -> Option<&DispatchConfig> {
        self.config.as_ref()
    }

    /// Fire a `workflow_dispatch` for the configured repository. GitHub
    /// answers 204 No Content when the dispatch is accepted.
    pub async fn dispatch(&self, config: &DispatchConfig) -> Result<(), DispatchError> {
        let url = format!(
            "https://api.github.com/repos/{}/{}/actions/workflows/{}/dispatches",
            config.repo_owner, config.repo_name, config.workflow_file
        );

        let payload = json!({
            "ref": config.workflow_ref,
            "inputs": {
                "trigger_source": "api_call"
            }
        });

        let resp = self
            .client
            .post(&url)
            .header("Accept", "application/vnd.github.v3+json")
            .header("Authorization", format!("token {}", config.token))
            .header("X-GitHub-Api-Version", "2022-11-28")
            .json(&payload)
            .send()
            .await
            .map_err(|e| DispatchError::Network(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(());
        }

        let body = resp
            .json::<serde_json::Value>()
            .await
            .unwrap_or(serde_json::Value::Null);

        Err(DispatchError::Upstream {
            status: status.as_u16(),
            body,
        })
    }
}
