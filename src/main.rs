use clap::Parser;
use comflex_server::{start_comflex_server, CmdArgs};
use comflex_utils::error::ComflexResult;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
pub async fn main() -> ComflexResult<()> {
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();
  tracing_subscriber::fmt().with_env_filter(filter).init();

  let args = CmdArgs::parse();

  start_comflex_server(args).await?;
  Ok(())
}
