use praxis_core::Questionnaire;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone)]
pub struct IssuedLink {
    pub questionnaire: Questionnaire,
    pub token: String,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Outbound delivery seam for freshly issued questionnaire links. The
/// engine treats delivery failure as non-fatal: an issued token stands even
/// when the notification bounced.
pub trait Notifier {
    fn send_links(
        &self,
        recipient: &str,
        name: Option<&str>,
        links: &[IssuedLink],
    ) -> Result<(), NotifyError>;
}

/// Logs links instead of delivering them. Stand-in for environments without
/// a mail transport.
#[derive(Debug, Default)]
pub struct LoggingNotifier;

impl Notifier for LoggingNotifier {
    fn send_links(
        &self,
        recipient: &str,
        name: Option<&str>,
        links: &[IssuedLink],
    ) -> Result<(), NotifyError> {
        for link in links {
            info!(
                recipient,
                name = name.unwrap_or(""),
                questionnaire = %link.questionnaire,
                token = %link.token,
                "questionnaire link (logging notifier)"
            );
        }
        Ok(())
    }
}
