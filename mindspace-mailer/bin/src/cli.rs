use std::{io, io::Write, path::PathBuf};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use mindspace_mailer_server::ApiDoc;
use snafu::ResultExt;
use utoipa::OpenApi;

use crate::{command::run_server, config::Config, error, shadow};

#[derive(Debug, Parser)]
#[command(author,
    version,
    long_version = shadow::CLAP_LONG_VERSION,
    about,
    long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(
        long = "config",
        short = 'c',
        env = "MINDSPACE_MAILER_CONFIG_FILE_PATH",
        help = "Specify a configuration file"
    )]
    config_file_path: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[clap(about = "Print version information")]
    Version,

    #[clap(about = "Output shell completion code for the specified shell (bash, zsh, fish)")]
    Completion { shell: Shell },

    #[clap(about = "Output default configuration")]
    DefaultConfig,

    #[clap(about = "Run server")]
    #[command(visible_alias = "run")]
    Server(ServerArgs),

    #[clap(about = "Output `OpenApi` document")]
    OpenApi,
}

/// Overrides for the configuration file, usually provided through the
/// environment.
#[derive(Args, Clone, Debug, Default)]
pub struct ServerArgs {
    #[clap(long = "port", env = "PORT", help = "Port of the HTTP server")]
    port: Option<u16>,

    #[clap(
        long = "email-service",
        env = "EMAIL_SERVICE",
        help = "Mail transport: `gmail`, `smtp` or anything else for an Ethereal sandbox"
    )]
    email_service: Option<String>,

    #[clap(long = "email-user", env = "EMAIL_USER", help = "Gmail account")]
    email_user: Option<String>,

    #[clap(
        long = "email-app-password",
        env = "EMAIL_APP_PASSWORD",
        hide_env_values = true,
        help = "Gmail application password"
    )]
    email_app_password: Option<String>,

    #[clap(long = "smtp-host", env = "SMTP_HOST", help = "SMTP relay host")]
    smtp_host: Option<String>,

    #[clap(long = "smtp-port", env = "SMTP_PORT", help = "SMTP relay port")]
    smtp_port: Option<u16>,

    #[clap(
        long = "smtp-secure",
        env = "SMTP_SECURE",
        help = "Use implicit TLS when set to `true`"
    )]
    smtp_secure: Option<String>,

    #[clap(long = "smtp-user", env = "SMTP_USER", help = "SMTP user name")]
    smtp_user: Option<String>,

    #[clap(
        long = "smtp-password",
        env = "SMTP_PASSWORD",
        hide_env_values = true,
        help = "SMTP password"
    )]
    smtp_password: Option<String>,

    #[clap(long = "email-from", env = "EMAIL_FROM", help = "Sender address")]
    email_from: Option<String>,
}

impl ServerArgs {
    /// Writes every given value over `config`. Empty strings count as
    /// absent.
    pub fn apply(self, config: &mut Config) {
        let Self {
            port,
            email_service,
            email_user,
            email_app_password,
            smtp_host,
            smtp_port,
            smtp_secure,
            smtp_user,
            smtp_password,
            email_from,
        } = self;
        let web = &mut config.web;
        let mail = &mut config.mail;

        override_with(&mut web.port, port);
        override_with(&mut mail.service, non_empty(email_service).map(Some));
        override_with(&mut mail.from_address, non_empty(email_from).map(Some));
        override_with(&mut mail.gmail.username, non_empty(email_user).map(Some));
        override_with(&mut mail.gmail.app_password, non_empty(email_app_password).map(Some));
        override_with(&mut mail.smtp.host, non_empty(smtp_host).map(Some));
        override_with(&mut mail.smtp.port, smtp_port);
        override_with(&mut mail.smtp.secure, smtp_secure.map(|secure| secure == "true"));
        override_with(&mut mail.smtp.username, non_empty(smtp_user).map(Some));
        override_with(&mut mail.smtp.password, non_empty(smtp_password).map(Some));
    }
}

fn override_with<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn non_empty(value: Option<String>) -> Option<String> { value.filter(|value| !value.is_empty()) }

impl Cli {
    pub fn run(self) -> Result<(), Box<error::Error>> {
        match self.command {
            Command::Version => {
                write_stdout(Self::command().render_long_version().as_bytes())?;
            }
            Command::Completion { shell } => {
                let mut command = Self::command();
                let bin_name = command.get_name().to_string();
                clap_complete::generate(shell, &mut command, bin_name, &mut io::stdout());
            }
            Command::DefaultConfig => {
                let config_text = serde_yaml::to_string(&Config::default())
                    .context(error::SerializeConfigSnafu)?;
                write_stdout(config_text.as_bytes())?;
            }
            Command::Server(ref args) => {
                let mut config = self.load_config()?;
                args.clone().apply(&mut config);
                run_server(config)?;
            }
            Command::OpenApi => {
                let document = ApiDoc::openapi()
                    .to_yaml()
                    .map_err(|err| error::Error::RenderOpenApi { message: err.to_string() })?;
                write_stdout(document.as_bytes())?;
            }
        }

        Ok(())
    }

    // A missing file at the default location means "run with defaults", an
    // explicitly given path has to exist.
    #[allow(clippy::result_large_err)]
    fn load_config(&self) -> Result<Config, error::Error> {
        if let Some(config_file_path) = &self.config_file_path {
            return Ok(Config::load(config_file_path)?);
        }

        let config_file_path = Config::default_path();
        if config_file_path.exists() {
            Ok(Config::load(&config_file_path)?)
        } else {
            Ok(Config::default())
        }
    }
}

#[allow(clippy::result_large_err)]
fn write_stdout(bytes: &[u8]) -> Result<(), error::Error> {
    io::stdout().write_all(bytes).context(error::WriteStdoutSnafu)
}
