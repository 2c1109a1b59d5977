//! Notes resolver bootstrap
//!
//! Runs as an AWS Lambda custom runtime behind an AppSync data source.
//! Each invocation carries one GraphQL field resolution; the response is the
//! field's payload or `null`.
//!
//! Usage:
//!   NOTES_TABLE=notes bootstrap

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use lambda_runtime::{service_fn, LambdaEvent};
use notes_lambda::{connect, resolve_event, router_for, Args, NotesConfig, SharedStore};
use notes_store::StoreAdapter;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::try_parse().context("Failed to parse arguments")?;
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .compact()
        .init();

    let config = NotesConfig::try_from(args).context("Invalid configuration")?;
    info!("Notes resolver starting (table {})", config.table_name);

    let shared: SharedStore<Arc<dyn StoreAdapter>> = SharedStore::new();
    let shared = &shared;
    let config = &config;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        let span = info_span!("invocation", request_id = %event.context.request_id);
        async move {
            let store = shared.get_or_connect(|| connect(config)).await;
            let router = router_for(Arc::clone(store), config);
            Ok::<Value, lambda_runtime::Error>(resolve_event(&router, event.payload).await)
        }
        .instrument(span)
        .await
    }))
    .await
    .map_err(|e| anyhow!(e))
}
