//! otp-server

use anyhow::{anyhow, Context, Result};
use axum::Router;
use axum_server::Handle;
use clap::Parser;
use http::header::HeaderName;
use otp_server::{
    app_state::AppStateBuilder,
    docs::ApiDoc,
    middleware::{request_ulid::MakeRequestUlid, runtime},
    router,
    settings::{LogFormat, MailerKind, Settings},
    setups::{
        local::{LocalSetup, LoggingCodeSender},
        prod::{EmailVerificationCodeSender, ProdSetup},
        ServerSetup,
    },
};
use std::{
    io,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    process::exit,
    time::Duration,
};
use tokio::signal::{
    self,
    unix::{signal, SignalKind},
};
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer, ServiceBuilderExt,
};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Request identifier field.
const REQUEST_ID: &str = "x-request-id";

/// Serves the one-time passcode API
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the settings file. Defaults to the crate's `config/settings.toml`.
    #[arg(long, short)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (stdout_writer, _stdout_guard) = tracing_appender::non_blocking(io::stdout());

    let settings = Settings::load(cli.config)?;

    setup_tracing(stdout_writer, settings.server.log_format);

    info!(
        subject = "app_settings",
        category = "init",
        "starting with settings: {:?}",
        settings,
    );

    let cancellation_token = CancellationToken::new();

    tokio::spawn({
        let cancellation_token = cancellation_token.clone();
        async move {
            capture_sigterm().await;

            cancellation_token.cancel();
            println!("\nCtrl+C received, shutting down. Press Ctrl+C again to force shutdown.");

            capture_sigterm().await;

            exit(130)
        }
    });

    let result = match settings.mailer.kind {
        MailerKind::Local => {
            let builder = AppStateBuilder::<LocalSetup>::default()
                .with_verification_code_sender(LoggingCodeSender);
            serve_app(&settings, builder, cancellation_token).await
        }
        MailerKind::Mailgun => {
            let sender = EmailVerificationCodeSender::new(settings.mailgun()?.clone());
            let builder =
                AppStateBuilder::<ProdSetup>::default().with_verification_code_sender(sender);
            serve_app(&settings, builder, cancellation_token).await
        }
    };

    if let Err(e) = &result {
        tracing::error!("app server crashed: {e:#}");
    }

    result
}

async fn serve_app<S: ServerSetup>(
    settings: &Settings,
    builder: AppStateBuilder<S>,
    token: CancellationToken,
) -> Result<()> {
    let req_id = HeaderName::from_static(REQUEST_ID);

    let app_state = builder
        .with_code(settings.code.value)
        .with_static_dir(settings.relative_static_dir())
        .finalize()?;

    let router = router::setup_app_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        // Set and propagate "x-request-id" (as a ulid) per request.
        .layer(
            ServiceBuilder::new()
                .set_request_id(req_id.clone(), MakeRequestUlid)
                .propagate_request_id(req_id),
        )
        // Applies the `tower_http::timeout::Timeout` middleware which
        // applies a timeout to requests.
        .layer(TimeoutLayer::new(Duration::from_millis(
            settings.server.timeout_ms,
        )))
        // Catches runtime panics and converts them into
        // `500 Internal Server` responses.
        .layer(CatchPanicLayer::custom(runtime::catch_panic));

    let (server, _) = serve("Application", router, settings.server.port).await?;

    token.cancelled().await;
    server.graceful_shutdown(Some(Duration::from_secs(5)));

    Ok(())
}

async fn serve(name: &str, app: Router, port: u16) -> Result<(Handle, SocketAddr)> {
    let bind_addr: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);

    let handle = Handle::new();

    tokio::spawn({
        let handle = handle.clone();
        let name = name.to_string();
        async move {
            if let Err(e) = axum_server::bind(bind_addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
            {
                tracing::error!("{name} server stopped: {e}");
            }
        }
    });

    let addr = handle
        .listening()
        .await
        .ok_or_else(|| anyhow!("{name} server failed to bind {bind_addr}"))
        .context("Could not start the server")?;

    info!(
        subject = "app_start",
        category = "init",
        "{} server listening on {}",
        name,
        addr
    );

    Ok((handle, addr))
}

/// Captures and waits for system signals.
async fn capture_sigterm() {
    let term = async {
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await
            }
        }
    };

    tokio::select! {
        _ = signal::ctrl_c() => {},
        _ = term => {}
    };
}

/// Setup the [tracing][tracing] subscriber writing either text or json lines.
fn setup_tracing(writer: tracing_appender::non_blocking::NonBlocking, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("otp_server=info,tower_http=info"));

    let (text, json) = match format {
        LogFormat::Text => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_target(true),
            ),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_current_span(true),
            ),
        ),
    };

    tracing_subscriber::Registry::default()
        .with(filter)
        .with(text)
        .with(json)
        .init();
}
