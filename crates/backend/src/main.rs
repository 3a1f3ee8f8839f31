pub mod routes;
pub mod shared;
pub mod system;

use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;

use shared::config::{self, JwtSecret};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `backend hash-password <password>` prints a PHC string for [[accounts]]
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("hash-password") {
        let password = args
            .get(1)
            .context("Usage: backend hash-password <password>")?;
        println!("{}", system::auth::password::hash_password(password)?);
        return Ok(());
    }

    system::tracing::initialize()?;

    let config = config::load_config()?;
    let secret = JwtSecret::from_env();
    tracing::info!(
        accounts = config.accounts.len(),
        static_dir = %config::get_static_dir(&config).display(),
        "Configuration loaded"
    );

    let app = routes::configure_routes(&config, &secret);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid server address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    addr.port()
                );
            } else {
                tracing::error!("Failed to bind to {}. Error: {}", addr, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
