use doku::Document;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::net::{IpAddr, Ipv4Addr};

#[derive(Debug, Deserialize, Serialize, Clone, SmartDefault, Document)]
#[serde(default)]
pub struct Settings {
  /// settings related to the postgresql database
  #[default(Default::default())]
  pub database: DatabaseConfig,
  /// the domain name of your instance, used as the issuer of login tokens
  #[default("localhost")]
  #[doku(example = "example.com")]
  pub hostname: String,
  /// Address where comflex should listen for incoming requests
  #[default(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)))]
  #[doku(as = "String")]
  pub bind: IpAddr,
  /// Port where comflex should listen for incoming requests
  #[default(8536)]
  pub port: u16,
  /// Directory where files uploaded through image fields are stored
  #[default("media")]
  pub media_dir: String,
  /// Maximum size of a single uploaded file, in bytes
  #[default(10_485_760)]
  pub max_upload_size: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, SmartDefault, Document)]
#[serde(default)]
pub struct DatabaseConfig {
  #[serde(flatten, default)]
  pub(crate) connection: DatabaseConnection,

  /// Maximum number of active sql connections
  #[default(30)]
  pub pool_size: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, SmartDefault, Document)]
#[serde(untagged)]
pub enum DatabaseConnection {
  /// Configure the database by specifying a URI
  ///
  /// This is the preferred method to specify database connection details since
  /// it is the most flexible.
  Uri {
    /// Connection URI pointing to a postgres instance
    #[doku(example = "postgresql:///comflex?user=comflex&host=/var/run/postgresql")]
    uri: String,
  },

  /// Configure the database by specifying parts of a URI
  #[default]
  Parts(DatabaseConnectionParts),
}

#[derive(Debug, Deserialize, Serialize, Clone, SmartDefault, Document)]
#[serde(default)]
pub struct DatabaseConnectionParts {
  /// Username to connect to postgres
  #[default("comflex")]
  pub(super) user: String,
  /// Password to connect to postgres
  #[default("password")]
  pub(super) password: String,
  #[default("localhost")]
  /// Host where postgres is running
  pub(super) host: String,
  /// Port where postgres can be accessed
  #[default(5432)]
  pub(super) port: i32,
  /// Name of the postgres database for comflex
  #[default("comflex")]
  pub(super) database: String,
}
