// ABOUTME: Server binary: loads configuration, migrates the store, serves HTTP
// ABOUTME: Subcommands mirror the deployment lifecycle (serve, migrate)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

use anyhow::Result;
use clap::{Parser, Subcommand};
use gatehouse::config::environment::ServerConfig;
use gatehouse::database::Database;
use gatehouse::oauth2::OauthService;
use gatehouse::routes;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "gatehouse-server",
    about = "OAuth2 token issuance and bearer-token authentication service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Run database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ServerConfig::from_env()?;
    config.logging.init()?;

    let database = Database::new(&config.database.url, config.database.max_connections).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Migrate => {
            database.migrate().await?;
            info!("database migrations complete");
        }
        Command::Serve => {
            database.migrate().await?;

            let service = Arc::new(OauthService::new(database, Arc::new(config.oauth.clone())));
            let app = routes::router(service);

            let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.http_port)).await?;
            info!("gatehouse listening on {}", listener.local_addr()?);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
