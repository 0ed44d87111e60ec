//! Port reconciler
//!
//! At most one managed container publishes a given host port. Before every
//! launch the current occupant, if any, gets an immediate zero-grace stop.
//! The runtime daemon is queried on demand each time; nothing is cached, so
//! there is no drift between our view and actual runtime state.

use tracing::info;

use crate::error::DeployError;
use crate::infra::DockerClient;

/// Stop whatever currently publishes `port`. Idempotent: a no-op when
/// nothing is bound.
pub async fn release_port(docker: &DockerClient, port: u16) -> Result<(), DeployError> {
    let occupants = docker.containers_publishing(port).await?;

    for container_id in occupants {
        info!(port = port, container_id = %container_id, "Stopping container occupying target port");
        docker.stop(&container_id, 0).await?;
    }

    Ok(())
}
