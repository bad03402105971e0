//! Fallback path: hand the resident over to a WhatsApp chat instead of the form.

use std::io;

use tracing::info;

use crate::config::Settings;

pub const DEFAULT_MESSAGING_NUMBER: &str = "8801982780739";
pub const DEFAULT_MESSAGING_GREETING: &str =
    "Hello, I would like to submit a complaint/feedback for Rose Villa.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagingChannel {
    number: String,
    greeting: String,
}

impl Default for MessagingChannel {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGING_NUMBER, DEFAULT_MESSAGING_GREETING)
    }
}

impl MessagingChannel {
    pub fn new(number: impl Into<String>, greeting: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            greeting: greeting.into(),
        }
    }

    /// Reads only the messaging settings, so a broken API base URL never blocks the fallback.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.messaging_number.clone(),
            settings.messaging_greeting.clone(),
        )
    }

    pub fn link(&self) -> String {
        format!(
            "https://wa.me/{}?text={}",
            self.number,
            urlencoding::encode(&self.greeting)
        )
    }
}

pub trait LinkOpener: Send + Sync {
    fn open(&self, url: &str) -> io::Result<()>;
}

/// Opens links with the platform's default handler.
pub struct SystemLinkOpener;

impl LinkOpener for SystemLinkOpener {
    fn open(&self, url: &str) -> io::Result<()> {
        #[cfg(target_os = "windows")]
        let result = std::process::Command::new("cmd")
            .args(["/C", "start", "", url])
            .spawn();

        #[cfg(target_os = "macos")]
        let result = std::process::Command::new("open").arg(url).spawn();

        #[cfg(all(unix, not(target_os = "macos")))]
        let result = std::process::Command::new("xdg-open").arg(url).spawn();

        result.map(|_| ())
    }
}

/// Leaves the link for the caller to display.
pub struct NoopLinkOpener;

impl LinkOpener for NoopLinkOpener {
    fn open(&self, _url: &str) -> io::Result<()> {
        Ok(())
    }
}

pub fn escalate(channel: &MessagingChannel, opener: &dyn LinkOpener) -> io::Result<String> {
    let link = channel.link();
    opener.open(&link)?;
    info!("opened messaging escalation link");
    Ok(link)
}
