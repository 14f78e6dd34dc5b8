//! Settings / Configuration.

use config::{Config, ConfigError, Environment, File};
use otp_core::code::VerificationCode;
use serde::Deserialize;
use std::{env, path::PathBuf};

/// Port the server listens on when neither the settings file nor `PORT` say otherwise.
pub const DEFAULT_PORT: u16 = 4500;

/// The code held by the server when none is configured.
pub const DEFAULT_CODE: u64 = 231524;

/// Log output format.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

/// Server settings.
#[derive(Clone, Debug, Deserialize)]
pub struct Server {
    /// Server port.
    pub port: u16,
    /// Server timeout in milliseconds.
    pub timeout_ms: u64,
    /// Directory holding the built single page app. Its `index.html` is
    /// served for unmatched `GET` requests.
    pub static_dir: Option<PathBuf>,
    /// Log output format.
    pub log_format: LogFormat,
}

/// The authoritative code. Read once at process start.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Code {
    /// The numeric code value.
    pub value: VerificationCode,
}

/// Which mail transport delivers codes.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MailerKind {
    /// Log codes instead of sending them.
    Local,
    /// Send codes through mailgun.
    Mailgun,
}

/// Mailer settings.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Mailer {
    /// The transport to use.
    pub kind: MailerKind,
}

/// [Mailgun] settings.
///
/// [Mailgun]: https://www.mailgun.com/
#[derive(Clone, Deserialize)]
pub struct Mailgun {
    /// Mailgun API key.
    pub api_key: String,
    /// Mailgun domain.
    pub domain: String,
    /// Mailgun Subject
    pub subject: String,
    /// Mailgun From Address
    pub from_address: String,
    /// Mailgun From Name
    pub from_name: String,
    /// Mailgun Template
    pub template: String,
}

impl std::fmt::Debug for Mailgun {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt.debug_struct("Mailgun")
            .field("api_key", &"[redacted]")
            .field("domain", &self.domain)
            .field("subject", &self.subject)
            .field("from_address", &self.from_address)
            .field("from_name", &self.from_name)
            .field("template", &self.template)
            .finish()
    }
}

#[derive(Clone, Debug, Deserialize)]
/// Application settings.
pub struct Settings {
    /// Server settings
    pub server: Server,
    /// The authoritative code
    pub code: Code,
    /// Mailer settings
    pub mailer: Mailer,
    /// Mailgun settings, required when `mailer.kind = "mailgun"`
    pub mailgun: Option<Mailgun>,
    /// The path where the settings file resides.
    /// This can't actually be configured in the settings file itself, for obvious reasons.
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

impl Settings {
    /// Load settings.
    ///
    /// Sources, lowest precedence first: built-in defaults, the settings file
    /// (optional), `OTP_SERVER_*` environment variables and finally `PORT`.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = config_path
            .unwrap_or(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/settings.toml"));
        // inject environment variables naming them properly on the settings
        // e.g. [server] timeout_ms=1000
        // would be injected with environment variable OTP_SERVER_SERVER__TIMEOUT_MS=1000
        let s = Config::builder()
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("server.timeout_ms", 30_000_i64)?
            .set_default("server.log_format", "text")?
            .set_default("code.value", DEFAULT_CODE as i64)?
            .set_default("mailer.kind", "local")?
            .add_source(File::from(path.as_path()).required(false))
            .add_source(
                Environment::with_prefix("OTP_SERVER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", env::var("PORT").ok())?
            .build()?;
        let mut settings: Self = s.try_deserialize()?;
        settings.path = Some(path);
        Ok(settings)
    }

    /// Return the static directory relative to the current working directory
    /// (as opposed to `self.server.static_dir`, which is relative to the
    /// settings file)
    pub fn relative_static_dir(&self) -> Option<PathBuf> {
        let static_dir = self.server.static_dir.as_ref()?;
        match self.path.as_ref().and_then(|p| p.parent()) {
            Some(settings_dir) => Some(settings_dir.join(static_dir)),
            None => Some(static_dir.clone()),
        }
    }

    /// The mailgun settings, or an error when they are missing.
    pub fn mailgun(&self) -> Result<&Mailgun, ConfigError> {
        self.mailgun
            .as_ref()
            .ok_or_else(|| ConfigError::NotFound("mailgun".to_string()))
    }
}
