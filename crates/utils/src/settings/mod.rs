use crate::error::ComflexResult;
use deser_hjson::from_str;
use std::{env, fs, io::ErrorKind, sync::LazyLock};
use structs::{DatabaseConnection, Settings};

pub mod structs;

static DEFAULT_CONFIG_FILE: &str = "config/config.hjson";

#[allow(clippy::expect_used)]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(|| {
  if env::var("COMFLEX_INITIALIZE_WITH_DEFAULT_SETTINGS").is_ok() {
    Settings::default()
  } else {
    Settings::init().expect("Failed to load settings file, see config/defaults.hjson")
  }
});

impl Settings {
  /// Reads config from configuration file.
  ///
  /// Note: The env var `COMFLEX_DATABASE_URL` is parsed in
  /// `get_database_url()`. A missing config file means that all defaults are used.
  fn init() -> ComflexResult<Self> {
    match fs::read_to_string(Self::get_config_location()) {
      Ok(config) => Ok(from_str::<Settings>(&config)?),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(Settings::default()),
      Err(e) => Err(e.into()),
    }
  }

  pub fn get_database_url(&self) -> String {
    if let Ok(url) = env::var("COMFLEX_DATABASE_URL") {
      return url;
    }
    match &self.database.connection {
      DatabaseConnection::Uri { uri } => uri.clone(),
      DatabaseConnection::Parts(parts) => {
        format!(
          "postgres://{}:{}@{}:{}/{}",
          parts.user, parts.password, parts.host, parts.port, parts.database,
        )
      }
    }
  }

  fn get_config_location() -> String {
    env::var("COMFLEX_CONFIG_LOCATION").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string())
  }
}
