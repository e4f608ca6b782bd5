pub mod config;
pub mod error;
pub mod model;

use std::{
    net::{IpAddr, Ipv4Addr},
    path::PathBuf,
    sync::LazyLock,
};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub const PROJECT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const PROJECT_NAME: &str = "mindspace-mailer";
pub const PROJECT_NAME_WITH_INITIAL_CAPITAL: &str = "MyMindSpace Mailer";

pub const PROGRAM_NAME: &str = "mindspace-mailer";
pub const CONFIG_NAME: &str = "mindspace-mailer.yaml";

pub const DEFAULT_WEB_PORT: u16 = 3003;
pub const DEFAULT_WEB_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Service name reported by `GET /health`.
pub const HEALTH_SERVICE_NAME: &str = "MyMindSpace Email Service";

/// Service name reported by `GET /status`.
pub const STATUS_SERVICE_NAME: &str = "Email Notification Service";

/// Provider reported by `GET /status` when no transport selector is configured.
pub const PROVIDER_NOT_CONFIGURED: &str = "Not configured";

/// Message of every 500 response that must not leak internal detail.
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong with the email service";

pub const DEFAULT_SENDER_ADDRESS: &str = "noreply@mymindspace.com";

pub static PROJECT_CONFIG_DIR: LazyLock<PathBuf> = LazyLock::new(|| {
    ProjectDirs::from("", PROJECT_NAME, PROJECT_NAME)
        .map_or_else(|| PathBuf::from("."), |dirs| dirs.config_dir().to_path_buf())
});

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub version: String,
    pub branch: String,
    pub commit_hash: String,
    pub provider: String,
    pub start_time: DateTime<Utc>,
}
