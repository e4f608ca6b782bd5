mod error;
pub mod web;

use std::{net::SocketAddr, sync::Arc};

use futures::{future::BoxFuture, FutureExt};
use mindspace_mailer_core::{
    config::{Config, MailConfig},
    ServerInfo,
};
use notification::{
    smtp::{SmtpTransport, TransportConfig},
    MailTransport, Notifier,
};
use sigfinn::{ExitStatus, LifecycleManager, Shutdown};

pub use self::{
    error::{Error, Result},
    web::{api_router, app_router, controller, ApiDoc, ServiceState, MAX_BODY_SIZE},
};

/// # Errors
/// Returns errors when server fails to start
pub async fn serve_with_shutdown(config: Config, server_info: ServerInfo) -> Result<()> {
    let Config { web, mail } = config;

    let service_state = initialize_service_state(mail).await;

    let lifecycle_manager = LifecycleManager::<Error>::new();

    let _handle = lifecycle_manager.spawn(
        "Http Server",
        create_web_http_server_future(web.listen_address, service_state, server_info),
    );

    if let Ok(Err(err)) = lifecycle_manager.serve().await {
        tracing::error!("{err}");
        Err(err)
    } else {
        Ok(())
    }
}

async fn initialize_service_state(mail: MailConfig) -> ServiceState {
    let provider = mail.provider_name().to_string();
    let MailConfig { transport, sender, render_options, .. } = mail;

    let transport = initialize_mail_transport(transport).await;
    let notifier = Notifier::new(transport, sender).with_render_options(render_options);

    ServiceState::new(notifier, provider)
}

// A transport that cannot be built leaves the service running; every
// notification request then fails until the process is restarted.
#[tracing::instrument(skip(transport), fields(kind = transport.kind()))]
async fn initialize_mail_transport(transport: TransportConfig) -> Option<Arc<dyn MailTransport>> {
    tracing::info!("Initializing mail transport");

    match SmtpTransport::from_config(transport).await {
        Ok(transport) => {
            tracing::info!("Email transporter initialized");
            Some(Arc::new(transport))
        }
        Err(error) => {
            tracing::error!(%error, "Failed to initialize email transporter");
            None
        }
    }
}

fn create_web_http_server_future(
    listen_address: SocketAddr,
    service_state: ServiceState,
    server_info: ServerInfo,
) -> impl FnOnce(Shutdown) -> BoxFuture<'static, ExitStatus<Error>> {
    move |shutdown_signal| {
        async move {
            tracing::info!(
                version = %server_info.version,
                commit_hash = %server_info.commit_hash,
                provider = %server_info.provider,
                "Listen Web HTTP server endpoint on {listen_address}"
            );

            let result = web::new_api_server(listen_address, service_state, shutdown_signal).await;

            match result {
                Ok(()) => {
                    tracing::info!("HTTP server is shut down gracefully, mail transport released");
                    ExitStatus::Success
                }
                Err(err) => ExitStatus::FatalError(Error::from(err)),
            }
        }
        .boxed()
    }
}
