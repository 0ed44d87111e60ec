//! Deployment launcher
//!
//! Starts detached, auto-removing containers with the classified port mapped
//! host:port -> container:port, then waits for the app inside to actually
//! start listening before the access URL is handed back to the caller.

use std::path::Path;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::config::constants::{READY_POLL_START_MS, READY_TIMEOUT_SECS};
use crate::error::DeployError;
use crate::infra::DockerClient;

/// Launch a container from `image` with host `port` mapped to the same
/// container port.
pub async fn launch_fresh(
    docker: &DockerClient,
    image: &str,
    port: u16,
) -> Result<String, DeployError> {
    let container_id = docker.run_detached(image, port, None).await?;
    info!(image = %image, port = port, container_id = %container_id, "Container launched");
    Ok(container_id)
}

/// Same as `launch_fresh`, plus a bind-mount of `workspace` onto the
/// container's `/app` so on-disk edits are visible without a rebuild.
pub async fn launch_with_mount(
    docker: &DockerClient,
    image: &str,
    port: u16,
    workspace: &Path,
) -> Result<String, DeployError> {
    let container_id = docker.run_detached(image, port, Some(workspace)).await?;
    info!(
        image = %image,
        port = port,
        workspace = %workspace.display(),
        container_id = %container_id,
        "Container launched with live mount"
    );
    Ok(container_id)
}

/// Poll until something accepts TCP connections on `port`, with exponential
/// backoff, bounded by `READY_TIMEOUT_SECS`.
pub async fn wait_until_ready(port: u16) -> Result<(), DeployError> {
    let deadline = Instant::now() + Duration::from_secs(READY_TIMEOUT_SECS);
    let mut delay = Duration::from_millis(READY_POLL_START_MS);

    loop {
        match TcpStream::connect(("127.0.0.1", port)).await {
            Ok(_) => {
                debug!(port = port, "Port is accepting connections");
                return Ok(());
            }
            Err(err) => {
                debug!(port = port, error = %err, "Readiness probe failed, retrying");
            }
        }

        if Instant::now() + delay >= deadline {
            return Err(DeployError::NotReady {
                port,
                timeout_secs: READY_TIMEOUT_SECS,
            });
        }
        tokio::time::sleep(delay).await;
        delay = (delay * 2).min(Duration::from_secs(2));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_wait_until_ready_succeeds_once_listening() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let probe = tokio::spawn(async move { wait_until_ready(port).await });
        let accept = tokio::spawn(async move {
            let _ = listener.accept().await;
        });

        probe.await.unwrap().unwrap();
        accept.abort();
    }
}
