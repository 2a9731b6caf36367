pub mod api_routes_http;
pub mod session_middleware;

use actix_web::{
  error::JsonPayloadError,
  web::{Data, JsonConfig, QueryConfig},
  App,
  HttpServer,
};
use clap::Parser;
use comflex_api_utils::context::ComflexContext;
use comflex_db_schema::{source::secret::Secret, utils::build_db_pool};
use comflex_utils::{
  error::{ComflexError, ComflexErrorType, ComflexResult},
  settings::{structs::Settings, SETTINGS},
  VERSION,
};
use session_middleware::SessionMiddleware;
use tracing::info;
use tracing_actix_web::TracingLogger;

#[derive(Parser, Debug)]
#[command(
  version,
  about = "A community forum with per-community post types",
  long_about = "A community forum with per-community post types.

This is the Comflex backend API server. It serves the JSON API under /api/v1 and stored uploads \
                under /media."
)]
pub struct CmdArgs {
  /// Apply pending database migrations and exit, without starting the HTTP server.
  #[arg(long, default_value_t = false)]
  migrate_only: bool,
}

/// Sets up the database pool and runs the HTTP server until it is stopped.
pub async fn start_comflex_server(args: CmdArgs) -> ComflexResult<()> {
  // Building the pool also runs pending migrations
  let pool = build_db_pool().await?;
  if args.migrate_only {
    info!("Migrations applied, exiting");
    return Ok(());
  }

  let settings = &*SETTINGS;
  info!(
    "Starting Comflex v{} on http://{}:{}",
    VERSION, settings.bind, settings.port
  );

  let secret = Secret::init(&mut (&pool).into()).await?;
  let context = ComflexContext::create(pool, secret);
  let media_dir = settings.media_dir.clone();
  HttpServer::new(move || {
    App::new()
      .wrap(TracingLogger::default())
      .wrap(SessionMiddleware::new(context.clone()))
      .app_data(Data::new(context.clone()))
      .app_data(json_config(settings))
      .app_data(query_config())
      .configure(api_routes_http::config)
      .service(actix_files::Files::new("/media", media_dir.clone()))
  })
  .bind((settings.bind, settings.port))?
  .run()
  .await?;

  Ok(())
}

/// Room left in a request body for everything besides one base64 encoded upload.
const BODY_OVERHEAD: usize = 1024 * 1024;

/// Accepts bodies carrying a full size upload and reports extractor failures as api errors.
fn json_config(settings: &Settings) -> JsonConfig {
  let encoded_upload = (settings.max_upload_size / 3 + 1) * 4;
  JsonConfig::default()
    .limit(encoded_upload.saturating_add(BODY_OVERHEAD))
    .error_handler(|err, _req| {
      let error_type = match err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
          ComflexErrorType::RequestTooLarge
        }
        err => ComflexErrorType::InvalidRequestBody(err.to_string()),
      };
      ComflexError::from(error_type).into()
    })
}

fn query_config() -> QueryConfig {
  QueryConfig::default().error_handler(|err, _req| {
    ComflexError::from(ComflexErrorType::InvalidQuery(err.to_string())).into()
  })
}
