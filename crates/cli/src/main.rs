mod commands;
mod render;
mod setup;
mod shell;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use console::{style, Term};
use libris_app::{AppContext, ViewError};
use libris_kernel::Settings;

use commands::App;
use setup::{Cli, Command};

const VERBOSE_FILTER: &str = "warn,libris=debug,libris_app=debug,libris_http=debug,libris_kernel=debug";

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&Term::stderr(), &err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = Settings::load().with_context(|| "failed to load libris settings")?;
    if let Some(base_url) = cli.base_url {
        settings.api.base_url = base_url;
    }
    if let Some(store) = cli.store {
        settings.session.store_path = Some(store);
    }
    if cli.verbose {
        settings.telemetry.filter = VERBOSE_FILTER.to_string();
    }
    libris_telemetry::init(&settings.telemetry)?;
    tracing::debug!(env = ?settings.environment, base_url = %settings.api.base_url, "libris starting");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(start(cli.command, settings))
}

async fn start(command: Command, settings: Settings) -> anyhow::Result<()> {
    let ctx = AppContext::from_settings(&settings)?;
    let mut app = App::new(ctx);
    match command {
        Command::Shell => shell::run(&mut app).await,
        command => {
            let outcome = app.dispatch(command).await;
            app.leave();
            outcome
        }
    }
}

/// Print a failure the views have not already put on screen.
pub(crate) fn report(term: &Term, err: &anyhow::Error) {
    if let Some(view_error) = err.downcast_ref::<ViewError>() {
        if commands::already_shown(view_error) {
            return;
        }
    }
    let _ = term.write_line(&format!("{} {err:#}", style("error:").red().bold()));
}
