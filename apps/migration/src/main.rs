//! Migration CLI tool.
//!
//! Reads `DATABASE_URL` (a `.env` file is honoured) and accepts the usual
//! `up`, `down`, `status`, `fresh` and `refresh` subcommands.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter("info,sea_orm_migration=info")
        .init();

    cli::run_cli(migration::Migrator).await;
}
