//! SMTP transport backed by lettre's async tokio client

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, info};

use super::transport::{EmailTransport, OutgoingEmail};
use crate::shared::error::{PlatformError, Result};

/// How the session to the relay is secured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// Plain connection upgraded with STARTTLS (port 587)
    #[default]
    StartTls,
    /// Implicit TLS (port 465)
    Tls,
    /// Unencrypted, for local relays and test servers
    None,
}

impl FromStr for SmtpSecurity {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "starttls" => Ok(SmtpSecurity::StartTls),
            "tls" => Ok(SmtpSecurity::Tls),
            "none" => Ok(SmtpSecurity::None),
            other => Err(PlatformError::configuration(format!(
                "unknown SMTP security mode '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
    pub from_name: Option<String>,
    pub security: SmtpSecurity,
    pub timeout: Duration,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from_address: String::new(),
            from_name: None,
            security: SmtpSecurity::StartTls,
            timeout: Duration::from_secs(30),
        }
    }
}

impl SmtpConfig {
    fn mailbox(&self) -> Result<Mailbox> {
        let address: Address = self
            .from_address
            .parse()
            .map_err(|e| PlatformError::configuration(format!("invalid sender address '{}': {}", self.from_address, e)))?;
        Ok(Mailbox::new(self.from_name.clone(), address))
    }
}

pub struct SmtpEmailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailTransport {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let builder = match config.security {
            SmtpSecurity::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| PlatformError::configuration(format!("SMTP relay '{}': {}", config.host, e)))?,
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| PlatformError::configuration(format!("SMTP relay '{}': {}", config.host, e)))?,
            SmtpSecurity::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
        };

        let mut builder = builder.port(config.port).timeout(Some(config.timeout));
        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(config.username.clone(), config.password.clone()));
        }

        info!(
            host = %config.host,
            port = config.port,
            security = ?config.security,
            "SMTP transport configured"
        );

        Ok(Self {
            transport: builder.build(),
            from: config.mailbox()?,
        })
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message> {
        let to: Address = email
            .to
            .parse()
            .map_err(|e| PlatformError::email(format!("invalid recipient address '{}': {}", email.to, e)))?;

        Message::builder()
            .from(self.from.clone())
            .to(Mailbox::new(None, to))
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(email.html.clone())
            .map_err(|e| PlatformError::email(e.to_string()))
    }
}

#[async_trait]
impl EmailTransport for SmtpEmailTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        let message = self.build_message(email)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| PlatformError::email(e.to_string()))?;

        debug!(to = %email.to, code = %response.code(), "Email accepted by relay");
        Ok(())
    }

    async fn test_connection(&self) -> Result<bool> {
        self.transport
            .test_connection()
            .await
            .map_err(|e| PlatformError::email(e.to_string()))
    }
}
