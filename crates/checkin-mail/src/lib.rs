use std::path::PathBuf;

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{debug, info};

/// Submission port that upgrades a plain connection with STARTTLS. Every
/// other port is expected to speak TLS from the first byte (465).
const STARTTLS_PORT: u16 = 587;

/// Content-ID the HTML body uses to reference the screenshot.
const SCREENSHOT_CID: &str = "image1";

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub receiver: String,
}

impl MailConfig {
    pub fn new(
        smtp_server: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        receiver: impl Into<String>,
    ) -> Self {
        Self {
            smtp_server: smtp_server.into(),
            smtp_port: 465,
            username: username.into(),
            password: password.into(),
            receiver: receiver.into(),
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.smtp_port = port;
        self
    }
}

/// A rendered failure notification.
#[derive(Debug, Clone)]
pub struct FailureReport {
    pub subject: String,
    pub content: String,
    /// Line shown above the screenshot.
    pub screenshot_caption: String,
    /// PNG embedded inline in the message, when one could be captured.
    pub screenshot: Option<PathBuf>,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Address error: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("Message error: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("Content type error: {0}")]
    ContentType(String),
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[cfg(feature = "async")]
    #[error("Join error: {0}")]
    Join(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Build the `multipart/related` message: HTML body plus the inline
/// screenshot.
pub fn build_message(config: &MailConfig, report: &FailureReport) -> Result<Message> {
    let from: Mailbox = config.username.parse()?;
    let to: Mailbox = config.receiver.parse()?;

    let body = match report.screenshot {
        Some(ref path) => {
            let image = std::fs::read(path)?;
            let png =
                ContentType::parse("image/png").map_err(|e| Error::ContentType(e.to_string()))?;
            let html = render_html(&report.content, Some(&report.screenshot_caption));
            MultiPart::related()
                .singlepart(SinglePart::html(html))
                .singlepart(Attachment::new_inline(SCREENSHOT_CID.to_string()).body(image, png))
        }
        None => {
            let html = render_html(&report.content, None);
            MultiPart::related().singlepart(SinglePart::html(html))
        }
    };

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(report.subject.clone())
        .multipart(body)?;
    Ok(message)
}

impl MailConfig {
    fn uses_starttls(&self) -> bool {
        self.smtp_port == STARTTLS_PORT
    }
}

/// Send the report over SMTP: STARTTLS on port 587, implicit TLS otherwise.
pub fn send_report(config: &MailConfig, report: &FailureReport) -> Result<()> {
    let message = build_message(config, report)?;

    debug!(
        "connecting to {}:{} as {} (starttls: {})",
        config.smtp_server,
        config.smtp_port,
        config.username,
        config.uses_starttls()
    );
    let builder = if config.uses_starttls() {
        SmtpTransport::starttls_relay(&config.smtp_server)?
    } else {
        SmtpTransport::relay(&config.smtp_server)?
    };
    let mailer = builder
        .port(config.smtp_port)
        .credentials(Credentials::new(
            config.username.clone(),
            config.password.clone(),
        ))
        .build();

    mailer.send(&message)?;
    info!("failure report sent to {}", config.receiver);
    Ok(())
}

fn render_html(content: &str, caption: Option<&str>) -> String {
    let mut html = format!("<p>{}</p>\n", escape_html(content));
    if let Some(caption) = caption {
        html.push_str(&format!(
            "<p>{}</p>\n<p><img src=\"cid:{}\"></p>\n",
            escape_html(caption),
            SCREENSHOT_CID
        ));
    }
    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' => out.push_str("<br>"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(feature = "async")]
pub mod async_client {
    use super::*;

    /// [`send_report`] on the blocking pool.
    pub async fn send_report(config: &MailConfig, report: &FailureReport) -> Result<()> {
        let config = config.clone();
        let report = report.clone();
        tokio::task::spawn_blocking(move || super::send_report(&config, &report))
            .await
            .map_err(|e| Error::Join(e.to_string()))?
    }
}
