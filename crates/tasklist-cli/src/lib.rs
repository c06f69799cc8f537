pub mod cli;
pub mod commands;
pub mod http;
pub mod prompt;
pub mod render;

use std::ffi::OsString;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tasklist_core::config::Config;
use tasklist_core::{
  ApiClient,
  Controller,
  ControllerSettings
};
use tracing::{
  debug,
  info
};

const REQUEST_TIMEOUT: Duration =
  Duration::from_secs(30);

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
    "starting tasklist CLI"
  );
  debug!(?pre.rc_overrides, "preprocessed rc overrides");

  let mut cfg =
    Config::load(cli.taskrc.as_deref())?;
  cfg.apply_overrides(
    pre.rc_overrides.into_iter().chain(
      cli
        .rc_overrides
        .into_iter()
        .map(|kv| (kv.key, kv.value))
    )
  );
  if let Some(api) = cli.api {
    cfg.apply_overrides([(
      "api.base_url".to_string(),
      api
    )]);
  }

  let mut renderer =
    render::Renderer::new(&cfg);
  let inv = cli::Invocation::parse(
    &cfg, cli.rest
  )?;

  let transport =
    http::ReqwestTransport::new(
      REQUEST_TIMEOUT
    )?;
  let controller = Controller::new(
    ApiClient::new(
      cfg.api_base_url(),
      transport
    ),
    ControllerSettings::from_config(
      &cfg
    )
  );
  info!(
    api = controller.api().base_url(),
    "using task API"
  );

  let runtime =
    tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()
      .context(
        "failed to start async runtime"
      )?;

  runtime.block_on(commands::dispatch(
    &controller,
    &cfg,
    &mut renderer,
    inv,
    cli.yes
  ))?;

  info!("done");
  Ok(())
}
