pub mod api;
#[cfg(feature = "native")]
pub mod cli;
#[cfg(feature = "native")]
pub mod commands;
pub mod config;
pub mod datetime;
pub mod error;
pub mod filter;
pub mod modal;
pub mod notify;
pub mod render;
pub mod session;
pub mod store;

#[cfg(feature = "native")]
use std::ffi::OsString;
#[cfg(feature = "native")]
use std::io::IsTerminal;

#[cfg(feature = "native")]
use anyhow::Context;
#[cfg(feature = "native")]
use clap::Parser;
#[cfg(feature = "native")]
use tracing::{
  debug,
  info
};

#[cfg(feature = "native")]
#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let pre =
    cli::preprocess_args(&raw_args)?;
  let cli = cli::GlobalCli::parse_from(
    pre.cleaned_args
  );

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting taskdeck CLI"
  );
  debug!(?pre.rc_overrides, "preprocessed rc overrides");

  let mut cfg = config::Config::load(
    cli.config.as_deref()
  )?;
  cfg.apply_overrides(
    pre.rc_overrides.into_iter().chain(
      cli
        .rc_overrides
        .into_iter()
        .map(|kv| (kv.key, kv.value))
    )
  );

  let base_url = cfg.base_url();
  let api =
    api::HttpTaskApi::new(&base_url)
      .with_context(|| {
        format!(
          "failed to set up client for \
           {base_url}"
        )
      })?;
  let renderer =
    render::CardRenderer::from_config(
      &cfg
    )?;
  let console =
    render::ConsoleRenderer::from_config(
      &cfg,
      std::io::stdout().is_terminal()
    )?;
  let notifier =
    notify::Notifier::new(cfg.toast_ttl()?);
  let mut session = session::Session::new(
    api, renderer, notifier
  );

  let runtime =
    tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()
      .context(
        "failed to start async runtime"
      )?;

  let command =
    cli.command.unwrap_or_default();
  let mut stdout = std::io::stdout().lock();
  let result = runtime.block_on(
    commands::dispatch(
      &mut session,
      &console,
      &mut stdout,
      &mut commands::StdinConfirm,
      command
    )
  );

  let toasts =
    session.notifier_mut().drain();
  let stderr_console =
    render::ConsoleRenderer::from_config(
      &cfg,
      std::io::stderr().is_terminal()
    )?;
  stderr_console
    .write_toasts(
      std::io::stderr().lock(),
      &toasts
    )
    .context("failed to write messages")?;

  result?;
  info!("done");
  Ok(())
}
