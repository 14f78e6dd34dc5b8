//! Main otp-cli command line entry points
use crate::{
    api::{HttpApi, VerificationApi},
    buffer::SLOT_COUNT,
    controller::{Event, Phase, WELCOME_ROUTE},
    driver::{Driver, View},
    modal::{ModalEvent, ModalPhase, MIN_EMAIL_LENGTH},
    notification::{Level, Notification},
    paths::config_file,
    settings::Settings,
};
use anyhow::Result;
use clap::{Parser, Subcommand};
use inquire::ui::RenderConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

#[derive(Debug, Parser)]
#[command(name = "otp-cli")]
#[command(about = "Pass the one-time passcode gate from the command line")]
pub struct Cli {
    #[arg(long, help = "Address of the otp server, overriding the config file")]
    api_endpoint: Option<Url>,
    #[arg(long, help = "Whether to turn off ansi terminal colors")]
    no_colors: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch the code, then enter and verify it
    Verify,
    /// Have the code mailed to an address
    Request(RequestCommand),
    /// Print file paths used by the application (e.g. the path to config)
    Paths,
}

#[derive(Debug, Parser)]
pub struct RequestCommand {
    /// Address to send the code to. Asked for when missing.
    email: Option<String>,
}

/// Prints notifications and navigation to the terminal.
#[derive(Debug, Default)]
pub struct TerminalView;

impl View for TerminalView {
    fn notify(&mut self, notification: &Notification) {
        match notification.level {
            Level::Success => println!("✔ {notification}"),
            Level::Error => println!("✘ {notification}"),
        }
    }

    fn navigate(&mut self, route: &str) {
        tracing::info!(route, "Navigating");
        if route == WELCOME_ROUTE {
            println!("Verification success!");
        }
    }
}

impl Cli {
    pub async fn run(&self, mut settings: Settings) -> Result<()> {
        setup_tracing(!self.no_colors);

        if let Some(api_endpoint) = &self.api_endpoint {
            settings.api_endpoint = api_endpoint.clone();
        }

        tracing::info!(?settings, "Loaded settings");

        let render_config = if self.no_colors {
            RenderConfig::empty()
        } else {
            RenderConfig::default_colored()
        };

        let mut driver = Driver::new(HttpApi::new(settings.api_endpoint.clone()), TerminalView);

        match &self.command {
            Commands::Verify => verify(&mut driver, render_config).await,
            Commands::Request(request) => {
                request_code(&mut driver, request.email.clone(), render_config).await
            }
            Commands::Paths => {
                println!("Config file: {}", config_file()?.display());
                Ok(())
            }
        }
    }
}

/// Keep asking for the code until verification succeeds.
///
/// Typing `request` instead of a code opens the email flow.
async fn verify<V: View>(
    driver: &mut Driver<HttpApi, V>,
    render_config: RenderConfig,
) -> Result<()> {
    driver.handle(Event::Mounted).await;

    while driver.state().phase != Phase::Success {
        let input = inquire::Text::new("Enter the code:")
            .with_render_config(render_config)
            .with_help_message("six digits, or \"request\" to get the code by email")
            .prompt()?;
        tracing::info!(input, "Code entered");

        if input.trim() == "request" {
            request_code(driver, None, render_config).await?;
            continue;
        }

        type_code(driver, &input).await;
        driver.handle(Event::SubmitPressed).await;
    }

    Ok(())
}

/// Put `input` into the slots the way a browser would.
///
/// Exactly six digits arrive as one paste into the first slot, anything else
/// as keystrokes into the focused slot.
async fn type_code<A: VerificationApi, V: View>(driver: &mut Driver<A, V>, input: &str) {
    // Emptying back to front leaves the focus on the first slot.
    for index in (0..SLOT_COUNT).rev() {
        driver
            .handle(Event::SlotChanged {
                index,
                value: String::new(),
            })
            .await;
    }

    if input.len() == SLOT_COUNT && input.bytes().all(|b| b.is_ascii_digit()) {
        driver
            .handle(Event::PasteApplied {
                index: 0,
                text: input.to_string(),
            })
            .await;
        return;
    }

    for c in input.chars().take(SLOT_COUNT) {
        let index = driver.state().buffer.focus();
        driver
            .handle(Event::SlotChanged {
                index,
                value: c.to_string(),
            })
            .await;
    }
}

/// Run the email flow until the code is sent or the prompt is skipped.
async fn request_code<V: View>(
    driver: &mut Driver<HttpApi, V>,
    mut email: Option<String>,
    render_config: RenderConfig,
) -> Result<()> {
    driver.handle(Event::Modal(ModalEvent::Opened)).await;

    while driver.state().modal.phase() == ModalPhase::EmailEntry {
        let entered = match email.take() {
            Some(email) => Some(email),
            None => inquire::Text::new("Please enter your email to receive code:")
                .with_render_config(render_config)
                .with_placeholder("example@gmail.com")
                .with_help_message(&format!("at least {MIN_EMAIL_LENGTH} characters, esc to cancel"))
                .prompt_skippable()?,
        };

        let Some(entered) = entered else {
            driver.handle(Event::Modal(ModalEvent::Dismissed)).await;
            break;
        };

        driver
            .handle(Event::Modal(ModalEvent::EmailChanged(entered)))
            .await;
        driver.handle(Event::Modal(ModalEvent::ConfirmPressed)).await;
    }

    Ok(())
}

fn setup_tracing(ansi: bool) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(ansi)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}
