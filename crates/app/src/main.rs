//! `livegate` command-line entry point

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use livegate_domain::{EndpointPatch, PipelineEvent};
use livegate_infra::config;
use livegate_lib::utils::logging::init_tracing;
use livegate_lib::{commands, AppContext};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;

#[derive(Parser)]
#[command(name = "livegate", version, about = "Endpoint management and batch liveness evaluation")]
struct Cli {
    /// Log level (`RUST_LOG` overrides it)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Config file (json or toml) instead of `LIVEGATE_*` variables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage backend endpoints
    Endpoints {
        #[command(subcommand)]
        action: EndpointAction,
    },
    /// Manage the evaluation API key
    Credential {
        #[command(subcommand)]
        action: CredentialAction,
    },
    /// Evaluate image files or directories as one batch
    Evaluate {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Print pipeline progress to stderr
        #[arg(long)]
        progress: bool,
    },
    /// Evaluate a single image file
    Inspect { path: PathBuf },
    /// POST a JSON body to a service path of the selected endpoint
    Proxy {
        /// Path relative to the endpoint base, e.g. `decode`
        path: String,
        /// JSON request body
        #[arg(default_value = "{}")]
        body: String,
    },
    /// Print the effective configuration
    Config,
}

#[derive(Subcommand)]
enum EndpointAction {
    List,
    Add { tag: String, url: String },
    Update {
        id: String,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    Remove { id: String },
    Select { id: String },
    /// Check reachability of the selected endpoint, or `--url`
    Probe {
        #[arg(long)]
        url: Option<String>,
    },
}

#[derive(Subcommand)]
enum CredentialAction {
    Set { value: String },
    Clear,
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json);

    let app_config = match &cli.config {
        Some(path) => config::load_from_file(Some(path.clone()))?,
        None => config::load()?,
    };

    if matches!(cli.command, Command::Config) {
        return print_json(&app_config);
    }

    let ctx = AppContext::new_with_config(app_config)
        .await
        .context("failed to initialize livegate")?;

    let outcome = run(&ctx, cli.command).await;
    ctx.shutdown();
    outcome
}

async fn run(ctx: &AppContext, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Endpoints { action } => run_endpoints(ctx, action).await,
        Command::Credential { action } => match action {
            CredentialAction::Set { value } => {
                let configured = commands::set_credential(ctx, &value).await?;
                print_json(&serde_json::json!({ "configured": configured }))
            }
            CredentialAction::Clear => {
                commands::set_credential(ctx, "").await?;
                print_json(&serde_json::json!({ "configured": false }))
            }
            CredentialAction::Show => print_json(&serde_json::json!({
                "configured": commands::credential_status(ctx),
                "key": commands::masked_credential(ctx),
            })),
        },
        Command::Evaluate { paths, progress } => {
            let reporter = progress.then(|| tokio::spawn(report_progress(ctx.subscribe_progress())));
            let report = commands::evaluate_batch(ctx, &paths).await;
            if let Some(handle) = reporter {
                handle.abort();
            }
            print_json(&report?)
        }
        Command::Inspect { path } => print_json(&commands::evaluate_single(ctx, &path).await?),
        Command::Proxy { path, body } => {
            let body = serde_json::from_str(&body).context("request body is not valid JSON")?;
            print_json(&commands::proxy_post(ctx, &path, body).await?)
        }
        Command::Config => print_json(&ctx.config),
    }
}

async fn run_endpoints(ctx: &AppContext, action: EndpointAction) -> anyhow::Result<()> {
    match action {
        EndpointAction::List => print_json(&commands::list_endpoints(ctx)),
        EndpointAction::Add { tag, url } => print_json(&commands::add_endpoint(ctx, &tag, &url).await?),
        EndpointAction::Update { id, tag, url, active } => {
            let patch = EndpointPatch { tag, url, is_active: active };
            print_json(&commands::update_endpoint(ctx, &id, patch).await?)
        }
        EndpointAction::Remove { id } => {
            commands::remove_endpoint(ctx, &id).await?;
            print_json(&commands::list_endpoints(ctx))
        }
        EndpointAction::Select { id } => print_json(&commands::select_endpoint(ctx, &id).await?),
        EndpointAction::Probe { url } => {
            let status = commands::probe_endpoint(ctx, url.as_deref()).await;
            print_json(&serde_json::json!({ "status": status }))
        }
    }
}

async fn report_progress(mut events: tokio::sync::broadcast::Receiver<PipelineEvent>) {
    loop {
        match events.recv().await {
            Ok(PipelineEvent::ItemPhase { index, title, phase, .. }) => {
                eprintln!("[{}] {title}: {phase}", index + 1);
            }
            Ok(PipelineEvent::Started { total, .. }) => eprintln!("evaluating {total} image(s)"),
            Ok(_) => {}
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => break,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
