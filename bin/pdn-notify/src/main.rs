//! Power Delay Notifier CLI
//!
//! Operator entry point for the notification workflow. Authentication is
//! handled elsewhere, so the sender identity is passed explicitly.
//!
//! ## Commands
//!
//! | Command       | Description                                          |
//! |---------------|------------------------------------------------------|
//! | `send`        | Broadcast an alert to one or more areas              |
//! | `history`     | List notification records, optionally per sender     |
//! | `stats`       | Show notification totals                             |
//! | `customers`   | List customers, or the recipients of one area        |
//! | `test-email`  | Check the SMTP connection                            |
//! | `config`      | Print an example configuration file                  |
//!
//! ## Environment Variables
//!
//! | Variable          | Default | Description                          |
//! |-------------------|---------|--------------------------------------|
//! | `PDN_CONFIG`      | -       | Path to the TOML configuration file  |
//! | `PDN_SENDER_ID`   | -       | Technician id for `send`             |
//! | `PDN_SENDER_NAME` | -       | Technician name for `send`           |
//! | `PDN_*`           | -       | Overrides, see `pdn-notify config`   |
//! | `LOG_FORMAT`      | `text`  | `json` for structured logs           |
//! | `RUST_LOG`        | `info`  | Log filter                           |

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use pdn_config::{AppConfig, ConfigLoader};
use pdn_platform::{
    AlertTemplate, AreaDirectory, AuditFailurePolicy, AuditLogger, AuditStore, DispatchConfig, DispatchEngine,
    DispatchRequest, EmailTransport, InMemoryAuditStore, NotificationService, PgCustomerRepository,
    PgNotificationRepository, RecordingEmailTransport, SenderIdentity, SmtpConfig, SmtpEmailTransport,
    SmtpSecurity, ValidationPolicy,
};

#[derive(Parser, Debug)]
#[command(name = "pdn-notify")]
#[command(about = "Power Delay Notifier - broadcast outage alerts to customers by area")]
struct Cli {
    /// Configuration file (defaults to the standard search paths)
    #[arg(long, env = "PDN_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Broadcast an alert to every customer in the given areas
    Send {
        /// Service area (repeat for several)
        #[arg(long = "area", required = true)]
        areas: Vec<String>,

        /// Alert text
        #[arg(long)]
        message: String,

        #[arg(long, env = "PDN_SENDER_ID")]
        sender_id: i64,

        #[arg(long, env = "PDN_SENDER_NAME")]
        sender_name: String,

        /// Resolve recipients but neither send email nor write audit records
        #[arg(long)]
        dry_run: bool,
    },

    /// List notification records, newest first
    History {
        #[arg(long)]
        sender_id: Option<i64>,
    },

    /// Show notification totals
    Stats,

    /// List customers, or the recipients of one area
    Customers {
        #[arg(long)]
        area: Option<String>,
    },

    /// Check the SMTP connection
    TestEmail,

    /// Print an example configuration file
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    pdn_common::logging::init_logging("pdn-notify");

    let cli = Cli::parse();
    let config_path = cli.config;

    match cli.command {
        Command::Send {
            areas,
            message,
            sender_id,
            sender_name,
            dry_run,
        } => {
            let config = load_config(config_path)?;
            let sender = SenderIdentity::new(sender_id, sender_name);
            let request = DispatchRequest::new(areas, message)?;
            let service = build_service(&config, dry_run)?;

            let response = service.send_request(&request, &sender).await?;
            print_json(&response)?;

            if response.is_server_error() {
                anyhow::bail!("{}", response.message);
            }
        }
        Command::History { sender_id } => {
            let config = load_config(config_path)?;
            let audit = AuditLogger::new(Arc::new(PgNotificationRepository::new(connect(&config)?)));
            let records = match sender_id {
                Some(id) => audit.history_for(id).await?,
                None => audit.history().await?,
            };
            print_json(&records)?;
        }
        Command::Stats => {
            let config = load_config(config_path)?;
            let audit = AuditLogger::new(Arc::new(PgNotificationRepository::new(connect(&config)?)));
            print_json(&audit.stats().await?)?;
        }
        Command::Customers { area } => {
            let config = load_config(config_path)?;
            let directory = PgCustomerRepository::new(connect(&config)?);
            match area_label(area) {
                Some(area) => print_json(&directory.lookup_by_area(&area).await?)?,
                None => print_json(&directory.list_all().await?)?,
            }
        }
        Command::TestEmail => {
            let config = load_config(config_path)?;
            let transport = SmtpEmailTransport::new(&smtp_config(&config)?)?;
            if transport.test_connection().await? {
                info!(host = %config.smtp.host, "SMTP connection verified");
            } else {
                anyhow::bail!("SMTP server {} rejected the connection", config.smtp.host);
            }
        }
        Command::Config => print!("{}", AppConfig::example_toml()),
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<AppConfig> {
    let loader = match path {
        Some(path) => ConfigLoader::with_path(path),
        None => ConfigLoader::new(),
    };
    loader.load().context("failed to load configuration")
}

/// Lazily connected pool; nothing touches the database until a query runs.
fn connect(config: &AppConfig) -> Result<sqlx::PgPool> {
    PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_lazy(&config.database.url)
        .context("invalid database URL")
}

fn build_service(config: &AppConfig, dry_run: bool) -> Result<NotificationService> {
    let pool = connect(config)?;
    let directory: Arc<dyn AreaDirectory> = Arc::new(PgCustomerRepository::new(pool.clone()));

    let (transport, store): (Arc<dyn EmailTransport>, Arc<dyn AuditStore>) = if dry_run {
        warn!("Dry run: emails are recorded in memory and no audit records are written");
        (
            Arc::new(RecordingEmailTransport::new()),
            Arc::new(InMemoryAuditStore::new()),
        )
    } else {
        (
            Arc::new(SmtpEmailTransport::new(&smtp_config(config)?)?),
            Arc::new(PgNotificationRepository::new(pool)),
        )
    };

    let audit = AuditLogger::new(store);
    let engine = DispatchEngine::new(
        directory,
        transport.clone(),
        audit.clone(),
        AlertTemplate::new(config.alert.organization.clone()),
        dispatch_config(config)?,
    );

    Ok(NotificationService::new(engine, audit, transport, validation_policy(config)))
}

fn smtp_config(config: &AppConfig) -> Result<SmtpConfig> {
    let smtp = &config.smtp;
    Ok(SmtpConfig {
        host: smtp.host.clone(),
        port: smtp.port,
        username: smtp.username.clone(),
        password: smtp.password.clone(),
        from_address: smtp.sender_address().to_string(),
        from_name: Some(smtp.from_name.clone()).filter(|name| !name.trim().is_empty()),
        security: smtp.security.parse::<SmtpSecurity>()?,
        timeout: smtp.timeout(),
    })
}

fn dispatch_config(config: &AppConfig) -> Result<DispatchConfig> {
    Ok(DispatchConfig {
        send_concurrency: config.dispatch.send_concurrency,
        send_timeout: config.dispatch.send_timeout(),
        audit_failure_policy: config.dispatch.audit_failure_policy.parse::<AuditFailurePolicy>()?,
    })
}

fn validation_policy(config: &AppConfig) -> ValidationPolicy {
    let v = &config.validation;
    ValidationPolicy {
        min_area_len: v.min_area_len,
        max_area_len: v.max_area_len,
        min_message_len: v.min_message_len,
        max_message_len: v.max_message_len,
    }
}

/// Area labels are matched trimmed, the same way `send` normalizes them.
fn area_label(area: Option<String>) -> Option<String> {
    area.map(|area| area.trim().to_string())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
