//! Build descriptor synthesizer
//!
//! One Dockerfile template per project type, a pure function of the
//! classification. Base images are pinned; the exposed port matches the
//! type's conventional port.

use crate::domain::project::ProjectType;
use crate::error::DeployError;

const PYTHON_DOCKERFILE: &str = "\
FROM python:3.9-slim
WORKDIR /app
COPY . /app
RUN pip install --no-cache-dir -r requirements.txt
EXPOSE 4567
CMD [\"flask\", \"run\", \"--host=0.0.0.0\", \"--port=4567\"]
";

const NODE_DOCKERFILE: &str = "\
FROM node:16-alpine
WORKDIR /app
COPY . .
RUN npm install
EXPOSE 8000
CMD [\"npm\", \"start\"]
";

/// Dockerfile text for a classified project.
pub fn synthesize(kind: ProjectType) -> Result<&'static str, DeployError> {
    match kind {
        ProjectType::Python => Ok(PYTHON_DOCKERFILE),
        ProjectType::Node => Ok(NODE_DOCKERFILE),
        ProjectType::Unknown => Err(DeployError::UnsupportedProject),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_template() {
        let text = synthesize(ProjectType::Python).unwrap();
        assert!(text.starts_with("FROM python:3.9-slim"));
        assert!(text.contains("WORKDIR /app"));
        assert!(text.contains("pip install --no-cache-dir -r requirements.txt"));
        assert!(text.contains("EXPOSE 4567"));
        assert!(text.contains("--port=4567"));
    }

    #[test]
    fn test_node_template() {
        let text = synthesize(ProjectType::Node).unwrap();
        assert!(text.starts_with("FROM node:16-alpine"));
        assert!(text.contains("WORKDIR /app"));
        assert!(text.contains("RUN npm install"));
        assert!(text.contains("EXPOSE 8000"));
        assert!(text.contains("\"npm\", \"start\""));
    }

    #[test]
    fn test_unknown_has_no_template() {
        assert!(matches!(
            synthesize(ProjectType::Unknown),
            Err(DeployError::UnsupportedProject)
        ));
    }

    #[test]
    fn test_templates_are_deterministic() {
        assert_eq!(
            synthesize(ProjectType::Python).unwrap(),
            synthesize(ProjectType::Python).unwrap()
        );
    }
}
