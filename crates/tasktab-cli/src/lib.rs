pub mod cli;
pub mod commands;
pub mod config;
pub mod file_storage;
pub mod render;

use std::ffi::OsString;
use std::io;

use anyhow::Context;
use chrono::{Local, Utc};
use clap::Parser;
use tracing::{debug, info};

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let pre = cli::preprocess_args(&raw_args)?;
    let cli = cli::GlobalCli::parse_from(pre.cleaned_args);

    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(verbose = cli.verbose, quiet = cli.quiet, "starting tasktab");
    debug!(?pre.rc_overrides, "preprocessed rc overrides");

    let mut cfg = config::Config::load(cli.tasktabrc.as_deref())?;
    cfg.apply_overrides(
        pre.rc_overrides
            .into_iter()
            .chain(cli.rc_overrides.into_iter().map(|kv| (kv.key, kv.value))),
    )?;

    let data_dir = cfg
        .data_dir(cli.data.as_deref())
        .context("failed to resolve data directory")?;

    let storage = file_storage::FileStorage::open(&data_dir)
        .with_context(|| format!("failed to open storage at {}", data_dir.display()))?;

    let renderer = render::Renderer::new(&cfg);

    let command = match cli.command {
        Some(command) => command,
        None => {
            debug!(command = %cfg.default_command, "no explicit command, using default");
            cli::default_command(&cfg.default_command)?
        }
    };

    let now = commands::Now {
        today: Local::now().date_naive(),
        millis: u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default(),
    };

    let mut out = io::stdout().lock();
    commands::dispatch(&storage, &cfg, &renderer, &mut out, command, now)?;

    info!("done");
    Ok(())
}
