//! Deployment API
//!
//! Contains the /run, /update-and-run and /clone-update-and-run endpoints.
//! Handlers only validate caller input and stage uploads; the actual
//! deployment logic lives in `services::deploy`.

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::error;

use crate::error::{ApiError, ApiResult};
use crate::services::deploy::is_valid_repo_name;
use crate::state::AppState;

/// Fresh deployment request
#[derive(Debug, Clone, Deserialize)]
pub struct RunRequest {
    /// Repository to clone. Optional at the deserialization layer so that an
    /// absent key is our own 400, not the extractor's 422.
    pub repo_url: Option<String>,
    /// Deployment name; defaults to the last URL path segment minus `.git`
    pub repo_name: Option<String>,
}

/// Create deployment routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/run", post(run))
        .route("/update-and-run", post(update_and_run))
        .route("/clone-update-and-run", post(clone_update_and_run))
}

/// Clone, build and run a repository
///
/// POST /run
async fn run(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RunRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo_url = request
        .repo_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Repo URL is required"))?;

    let name = match request.repo_name {
        Some(name) => name,
        None => repo_name_from_url(&repo_url)
            .ok_or_else(|| ApiError::bad_request("Could not derive repo name from URL"))?,
    };
    validate_repo_name(&name)?;

    let outcome = state.deployer.run(&repo_url, &name).await?;
    Ok(Json(outcome))
}

/// Drop an uploaded file into an existing workspace and relaunch
///
/// POST /update-and-run (multipart: `file`, `repo_name`)
async fn update_and_run(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let form = DeployForm::read(multipart).await?;
    let name = form.require_repo_name()?;
    validate_repo_name(&name)?;
    let file_path = form.save_upload(&state.config.upload_dir).await?;

    let outcome = state.deployer.update(&file_path, &name).await?;
    Ok(Json(outcome))
}

/// Clone if needed, then apply an uploaded file and relaunch
///
/// POST /clone-update-and-run (multipart: `repo_url`, `repo_name`, `file`)
async fn clone_update_and_run(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let form = DeployForm::read(multipart).await?;
    let repo_url = form
        .repo_url
        .clone()
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Repo URL is required"))?;
    let name = form.require_repo_name()?;
    validate_repo_name(&name)?;
    let file_path = form.save_upload(&state.config.upload_dir).await?;

    let outcome = state.deployer.clone_update(&repo_url, &file_path, &name).await?;
    Ok(Json(outcome))
}

/// Fields accepted by the multipart deploy endpoints
#[derive(Debug, Default)]
struct DeployForm {
    repo_url: Option<String>,
    repo_name: Option<String>,
    file: Option<(String, Bytes)>,
}

impl DeployForm {
    /// Drain a multipart body into the known fields; unknown fields are
    /// ignored.
    async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
        {
            let field_name = field.name().unwrap_or("").to_string();
            match field_name.as_str() {
                "file" => {
                    let file_name = field
                        .file_name()
                        .map(str::to_string)
                        .filter(|n| !n.is_empty())
                        .ok_or_else(|| {
                            ApiError::bad_request("File name and file data are required")
                        })?;
                    let bytes = field.bytes().await.map_err(|e| {
                        ApiError::bad_request(format!("Failed to read uploaded file: {}", e))
                    })?;
                    form.file = Some((file_name, bytes));
                }
                "repo_url" => {
                    form.repo_url = Some(text_field(field).await?);
                }
                "repo_name" => {
                    form.repo_name = Some(text_field(field).await?);
                }
                _ => {}
            }
        }

        Ok(form)
    }

    fn require_repo_name(&self) -> ApiResult<String> {
        self.repo_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| ApiError::bad_request("Repo name is required"))
    }

    /// Write the uploaded file to the staging directory under its client
    /// filename, returning the path for the update flow.
    async fn save_upload(&self, upload_dir: &std::path::Path) -> ApiResult<PathBuf> {
        let (file_name, bytes) = self
            .file
            .as_ref()
            .ok_or_else(|| ApiError::bad_request("File not found in the request"))?;

        if !is_valid_upload_name(file_name) {
            return Err(ApiError::bad_request(format!(
                "Invalid uploaded file name '{}'",
                file_name
            )));
        }

        let dest = upload_dir.join(file_name);
        tokio::fs::write(&dest, bytes).await.map_err(|e| {
            error!(dest = %dest.display(), error = %e, "Failed to store uploaded file");
            ApiError::internal(format!("Failed to store uploaded file: {}", e))
        })?;

        Ok(dest)
    }
}

async fn text_field(field: axum::extract::multipart::Field<'_>) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart field: {}", e)))
}

fn validate_repo_name(name: &str) -> ApiResult<()> {
    if is_valid_repo_name(name) {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!(
            "Invalid repo name '{}'",
            name
        )))
    }
}

/// Last URL path segment minus a `.git` suffix.
fn repo_name_from_url(url: &str) -> Option<String> {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed.rsplit('/').next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Uploaded filenames become path components under the upload dir.
fn is_valid_upload_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains('/') && !name.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::config::EnvConfig;

    fn test_router() -> (TempDir, axum::Router) {
        let root = TempDir::new().unwrap();
        let config = EnvConfig {
            port: 7654,
            workspace_root: root.path().to_path_buf(),
            upload_dir: root.path().to_path_buf(),
        };
        let state = Arc::new(AppState::with_config(config));
        (root, crate::api::router(state))
    }

    #[tokio::test]
    async fn test_run_without_repo_url_is_bad_request() {
        let (_root, app) = test_router();

        let request = Request::builder()
            .method("POST")
            .uri("/run")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_run_with_empty_repo_url_is_bad_request() {
        let (_root, app) = test_router();

        let request = Request::builder()
            .method("POST")
            .uri("/run")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"repo_url": "  "}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_repo_name_from_url() {
        assert_eq!(
            repo_name_from_url("https://github.com/acme/widget.git"),
            Some("widget".to_string())
        );
        assert_eq!(
            repo_name_from_url("https://github.com/acme/widget"),
            Some("widget".to_string())
        );
        assert_eq!(
            repo_name_from_url("https://github.com/acme/widget/"),
            Some("widget".to_string())
        );
        assert_eq!(repo_name_from_url(""), None);
    }

    #[test]
    fn test_upload_name_validation() {
        assert!(is_valid_upload_name("app.py"));
        assert!(is_valid_upload_name("package.json"));
        assert!(!is_valid_upload_name(""));
        assert!(!is_valid_upload_name(".."));
        assert!(!is_valid_upload_name("../../etc/passwd"));
        assert!(!is_valid_upload_name("dir\\file"));
    }

    #[test]
    fn test_require_repo_name() {
        let form = DeployForm {
            repo_name: Some("demo".to_string()),
            ..Default::default()
        };
        assert_eq!(form.require_repo_name().unwrap(), "demo");

        let empty = DeployForm::default();
        assert!(empty.require_repo_name().is_err());
    }
}
