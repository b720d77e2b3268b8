//! `adminmeta` -- inspect resolved admin metadata from the command line.
//!
//! Reads an introspected schema, optional administrator configuration and an
//! optional role table from JSON files, resolves the requested view and
//! prints it as pretty JSON on stdout. Failures print `{"error", "code"}` on
//! stderr and exit with status 1.
//!
//! # Environment variables
//!
//! | Variable                  | Required | Default   | Description                        |
//! |---------------------------|----------|-----------|------------------------------------|
//! | `ADMINMETA_SCHEMA`        | yes      | --        | Schema file (or `--schema`)        |
//! | `ADMINMETA_CONFIGURATION` | no       | --        | Configuration overrides file       |
//! | `ADMINMETA_ROLES`         | no       | --        | Role capability file               |
//! | `ADMINMETA_ROLE`          | no       | `creator` | Role used by `relations` and `view`|
//! | `RUST_LOG`                | no       | `adminmeta=info` | Log filter                  |

mod cli;
mod config;

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adminmeta_core::CoreError;
use adminmeta_engine::EntityResolver;

use cli::{Cli, Command};

fn to_json<T: Serialize>(value: &T) -> Result<Value, CoreError> {
    serde_json::to_value(value).map_err(|e| CoreError::Internal(e.to_string()))
}

fn parse_record(text: &str) -> Result<Map<String, Value>, CoreError> {
    serde_json::from_str(text)
        .map_err(|e| CoreError::Validation(format!("Record must be a JSON object: {e}")))
}

async fn run(resolver: &EntityResolver, command: Command) -> Result<Value, CoreError> {
    match command {
        Command::Entities => to_json(&resolver.active_entities().await?),
        Command::Fields { entity } => to_json(&resolver.resolve_entity_fields(&entity).await?),
        Command::Relations { entity, role } => {
            resolver.ensure_entity_access(&entity, &role).await?;
            to_json(&resolver.resolve_entity_relations(&entity, &role).await?)
        }
        Command::View { entity, role } => {
            to_json(&resolver.resolve_entity_view(&entity, &role).await?)
        }
        Command::HiddenColumns { entity, view } => {
            to_json(&resolver.hidden_columns(&entity, view.into()).await?)
        }
        Command::ValidateTemplate { entity, template } => {
            let saved = resolver.validate_display_template(&entity, &template).await?;
            Ok(json!({ "template": saved }))
        }
        Command::ValidateRecord { entity, record } => {
            let record = parse_record(&record)?;
            let violations = resolver.validate_record(&entity, &record).await?;
            Ok(json!({ "valid": violations.is_empty(), "violations": violations }))
        }
        Command::ReferenceLabel { entity, record } => {
            let record = parse_record(&record)?;
            Ok(json!({ "label": resolver.reference_label(&entity, &record).await? }))
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adminmeta=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let resolver = match config::load_resolver(&cli.sources) {
        Ok(resolver) => resolver,
        Err(e) => {
            tracing::error!(error = ?e, "Failed to load sources");
            return ExitCode::FAILURE;
        }
    };

    match run(&resolver, cli.command).await {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode output");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            if err.is_server_error() {
                tracing::error!(code = err.code(), error = %err, "Command failed");
            }
            eprintln!("{}", json!({ "error": err.to_string(), "code": err.code() }));
            ExitCode::FAILURE
        }
    }
}
