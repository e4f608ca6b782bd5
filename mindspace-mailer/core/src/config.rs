use std::{fmt::Debug, net::SocketAddr};

use notification::{smtp::TransportConfig, template::RenderOptions, Mailbox};

#[derive(Clone, Debug)]
pub struct Config {
    pub web: WebConfig,

    pub mail: MailConfig,
}

#[derive(Clone, Debug)]
pub struct WebConfig {
    pub listen_address: SocketAddr,
}

#[derive(Clone, Debug)]
pub struct MailConfig {
    /// Transport selector exactly as configured, reported by `GET /status`.
    pub provider: Option<String>,

    pub transport: TransportConfig,

    pub sender: Mailbox,

    pub render_options: RenderOptions,
}

impl MailConfig {
    #[must_use]
    pub fn provider_name(&self) -> &str {
        self.provider.as_deref().unwrap_or(crate::PROVIDER_NOT_CONFIGURED)
    }
}
