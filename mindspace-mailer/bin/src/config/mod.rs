mod error;
mod mail;
mod web;

use std::path::{Path, PathBuf};

use mindspace_cli_common::config::LogConfig;
use notification::template::RenderOptions;
use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

pub use self::{
    error::Error,
    mail::MailConfig,
    web::WebConfig,
};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub web: WebConfig,

    #[serde(default)]
    pub mail: MailConfig,
}

impl Config {
    #[inline]
    pub fn default_path() -> PathBuf {
        [
            mindspace_mailer_core::PROJECT_CONFIG_DIR.to_path_buf(),
            PathBuf::from(mindspace_mailer_core::CONFIG_NAME),
        ]
        .into_iter()
        .collect()
    }

    #[inline]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let data = std::fs::read_to_string(&path)
            .context(error::OpenConfigSnafu { filename: path.as_ref().to_path_buf() })?;

        Self::from_yaml(&data, path.as_ref())
    }

    fn from_yaml(data: &str, path: &Path) -> Result<Self, Error> {
        let mut config: Self = serde_yaml::from_str(data)
            .context(error::ParseConfigSnafu { filename: path.to_path_buf() })?;

        config.log.file_path = match config.log.file_path.map(|path| {
            path.try_resolve()
                .map(|path| path.to_path_buf())
                .with_context(|_| error::ResolveFilePathSnafu { file_path: path.clone() })
        }) {
            Some(Ok(path)) => Some(path),
            Some(Err(err)) => return Err(err),
            None => None,
        };

        Ok(config)
    }
}

#[inline]
pub fn load_server_config(
    Config { web, mail, .. }: Config,
) -> Result<mindspace_mailer_core::config::Config, Error> {
    let sender = notification::sender_mailbox(mail.sender_address())
        .context(error::InvalidSenderSnafu)?;

    Ok(mindspace_mailer_core::config::Config {
        web: web.into(),
        mail: mindspace_mailer_core::config::MailConfig {
            provider: mail.service.clone(),
            transport: mail.transport_config(),
            sender,
            render_options: RenderOptions { escape_html: mail.escape_html },
        },
    })
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    use notification::smtp::TransportConfig;

    use super::*;

    fn parse(data: &str) -> Config { Config::from_yaml(data, Path::new("test.yaml")).unwrap() }

    #[test]
    fn test_defaults_from_empty_file() {
        let config = parse("{}");

        assert_eq!(config.web, WebConfig::default());
        assert_eq!(config.mail, MailConfig::default());
        assert_eq!(config.web.socket_address().to_string(), "0.0.0.0:3003");
    }

    #[test]
    fn test_default_config_round_trips() {
        let text = serde_yaml::to_string(&Config::default()).unwrap();
        let config = parse(&text);

        assert_eq!(config.web, WebConfig::default());
        assert_eq!(config.mail.smtp.port, 587);
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = Config::from_yaml("web: [", Path::new("broken.yaml")).unwrap_err();

        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/mindspace-mailer.yaml").unwrap_err();

        assert!(matches!(err, Error::OpenConfig { .. }));
    }

    #[test]
    fn test_load_server_config() {
        let config = parse(
            "web:\n  host: 127.0.0.1\n  port: 8080\nmail:\n  service: smtp\n  from_address: \
             hello@mymindspace.com\n  escape_html: true\n  smtp:\n    host: mail.example.com\n",
        );

        let config = load_server_config(config).unwrap();

        assert_eq!(
            config.web.listen_address,
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8080)
        );
        assert_eq!(config.mail.provider_name(), "smtp");
        assert_eq!(config.mail.sender.email.to_string(), "hello@mymindspace.com");
        assert_eq!(config.mail.sender.name.as_deref(), Some("MyMindSpace"));
        assert!(config.mail.render_options.escape_html);
        assert!(matches!(config.mail.transport, TransportConfig::Smtp { .. }));
    }

    #[test]
    fn test_load_server_config_without_provider() {
        let config = load_server_config(Config::default()).unwrap();

        assert_eq!(config.mail.provider_name(), "Not configured");
        assert!(matches!(config.mail.transport, TransportConfig::Gmail { credentials: None }));
    }

    #[test]
    fn test_invalid_sender() {
        let mut config = Config::default();
        config.mail.from_address = Some("not an address".to_string());

        let err = load_server_config(config).unwrap_err();
        assert!(matches!(err, Error::InvalidSender { .. }));
    }
}
