//! Repo Deploy Agent - entry point
//!
//! Usage:
//! - Normal mode: `repo-deploy-agent`
//! - With custom port: `repo-deploy-agent --port 8080`

use repo_deploy_agent::RuntimeConfig;
use tracing_subscriber::EnvFilter;

/// Parse command line arguments
fn parse_args() -> RuntimeConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = RuntimeConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" if i + 1 < args.len() => {
                config.port_override = args[i + 1].parse().ok();
                i += 2;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    config
}

fn print_help() {
    println!("Repo Deploy Agent - deploys git repositories as Docker containers");
    println!();
    println!("USAGE:");
    println!("    repo-deploy-agent [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --port <PORT>    Override the listening port");
    println!("    -h, --help       Print help information");
    println!();
    println!("EXAMPLES:");
    println!("    repo-deploy-agent                 # Listen on $PORT (default 7654)");
    println!("    repo-deploy-agent --port 8080     # Custom port");
}

fn main() {
    let config = parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    rt.block_on(async {
        repo_deploy_agent::serve(config).await;
    });
}
