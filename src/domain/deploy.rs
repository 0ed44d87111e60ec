//! Deployment domain models

use serde::Serialize;

use crate::domain::project::ProjectType;

/// Result of a completed deployment flow, returned to the API caller.
#[derive(Clone, Debug, Serialize)]
pub struct DeployOutcome {
    pub message: String,
    pub url: String,
    pub container_id: String,
    pub project_type: ProjectType,
    pub port: u16,
}

impl DeployOutcome {
    pub fn new(container_id: String, project_type: ProjectType, port: u16) -> Self {
        let url = format!("http://localhost:{}", port);
        let message = format!(
            "App is running. Access it at {}. Container ID: {}",
            url, container_id
        );
        Self {
            message,
            url,
            container_id,
            project_type,
            port,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_url_uses_classified_port() {
        let outcome = DeployOutcome::new("abc123".to_string(), ProjectType::Node, 8000);
        assert_eq!(outcome.url, "http://localhost:8000");
        assert!(outcome.message.contains("http://localhost:8000"));
        assert!(outcome.message.contains("abc123"));
    }
}
