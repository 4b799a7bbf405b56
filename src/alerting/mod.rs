//! Emergency alert dispatch over a messaging platform
//!
//! The dispatcher composes one message per alert and fans it out to every
//! configured recipient. Recipients are independent: each delivery runs as
//! its own task with its own timeout, and one recipient's failure never
//! blocks or taints another's outcome.

pub mod telegram;

pub use telegram::TelegramClient;

use crate::config::AlertingConfig;
use crate::geolocation::{GeoLocation, GeoLookupService};
use crate::models::{AlertEvent, DeliveryOutcome};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Per-recipient delivery timeout applied when none is configured
const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur during alert dispatch
#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Messaging credential is not configured")]
    MissingCredential,

    #[error("Recipient list is empty or not configured")]
    MisconfiguredRecipients,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Messaging API rejected the call: {0}")]
    Api(String),

    #[error("Delivery timed out after {0:?}")]
    Timeout(Duration),
}

/// Client capability for the messaging platform
///
/// Implementations send to one recipient at a time; the dispatcher owns
/// the fan-out.
#[async_trait]
pub trait MessagingClient: Send + Sync {
    async fn send_message(&self, recipient_id: &str, text: &str) -> Result<(), AlertError>;

    async fn send_location(
        &self,
        recipient_id: &str,
        location: &GeoLocation,
    ) -> Result<(), AlertError>;
}

/// Location attached to an outgoing alert
#[derive(Debug, Clone)]
enum AlertLocation {
    /// Caller-supplied text, used verbatim
    Text(String),
    /// Coordinate resolved from the host's public IP
    Coordinates(GeoLocation),
}

/// Fans an alert out to every configured recipient
///
/// Dispatch resolves a location, composes a single message body and
/// attempts delivery to each recipient concurrently, returning one outcome
/// per recipient in the configured order. No retries happen within a
/// dispatch; repeated dispatches are independent events.
pub struct AlertDispatcher {
    client: Arc<dyn MessagingClient>,
    geo: GeoLookupService,
    recipients: Vec<String>,
    delivery_timeout: Duration,
}

impl AlertDispatcher {
    /// Create a dispatcher with an explicit client and recipient list.
    pub fn new(
        client: Arc<dyn MessagingClient>,
        geo: GeoLookupService,
        recipients: Vec<String>,
    ) -> Self {
        AlertDispatcher {
            client,
            geo,
            recipients,
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
        }
    }

    /// Override the per-recipient delivery timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = timeout;
        self
    }

    /// Build a Telegram-backed dispatcher from configuration.
    ///
    /// # Errors
    ///
    /// Fails fast, before any network call, when the bot token is absent
    /// or the recipient list parses to nothing.
    pub fn from_config(
        config: &AlertingConfig,
        geo: GeoLookupService,
    ) -> Result<Self, AlertError> {
        let token = config
            .bot_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AlertError::MissingCredential)?;

        let recipients = parse_recipients(&config.recipients);
        if recipients.is_empty() {
            return Err(AlertError::MisconfiguredRecipients);
        }

        let client = Arc::new(TelegramClient::new(token));
        Ok(
            AlertDispatcher::new(client, geo, recipients)
                .with_timeout(Duration::from_secs(config.delivery_timeout_seconds)),
        )
    }

    /// Dispatch an alert to every configured recipient.
    ///
    /// Returns the ordered outcome list, one entry per recipient. The
    /// preconditions (non-empty sender and message, configured recipients)
    /// are checked before any network call; past that point every failure
    /// is per-recipient data, never an early return.
    pub async fn dispatch(&self, event: &AlertEvent) -> Result<Vec<DeliveryOutcome>, AlertError> {
        if event.sender_name.trim().is_empty() {
            return Err(AlertError::MissingField("sender_name"));
        }
        if event.message.trim().is_empty() {
            return Err(AlertError::MissingField("message"));
        }
        if self.recipients.is_empty() {
            return Err(AlertError::MisconfiguredRecipients);
        }

        let location = self.resolve_location(event).await;
        let body = compose_message(event, location.as_ref());
        let coordinate = match &location {
            Some(AlertLocation::Coordinates(c)) => Some(*c),
            _ => None,
        };

        log::info!(
            "Dispatching alert from '{}' to {} recipient(s)",
            event.sender_name,
            self.recipients.len()
        );

        let handles: Vec<_> = self
            .recipients
            .iter()
            .map(|recipient| {
                let client = Arc::clone(&self.client);
                let recipient = recipient.clone();
                let body = body.clone();
                let timeout = self.delivery_timeout;
                tokio::spawn(async move {
                    deliver_one(client, recipient, body, coordinate, timeout).await
                })
            })
            .collect();

        // Join in spawn order so outcomes line up with the configured
        // recipient order, not completion order.
        let mut outcomes = Vec::with_capacity(handles.len());
        for (handle, recipient) in handles.into_iter().zip(&self.recipients) {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    log::error!("Delivery task for {} died: {}", recipient, e);
                    DeliveryOutcome::failed(recipient.clone(), format!("delivery task failed: {}", e))
                }
            };
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    /// Pick the location for an alert: a non-empty caller string wins and
    /// is used verbatim, otherwise the host lookup runs best-effort.
    async fn resolve_location(&self, event: &AlertEvent) -> Option<AlertLocation> {
        if let Some(text) = &event.location {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Some(AlertLocation::Text(trimmed.to_string()));
            }
        }
        self.geo
            .resolve_current_host()
            .await
            .map(AlertLocation::Coordinates)
    }
}

/// Attempt delivery to a single recipient, bounded by `timeout`.
async fn deliver_one(
    client: Arc<dyn MessagingClient>,
    recipient: String,
    body: String,
    coordinate: Option<GeoLocation>,
    timeout: Duration,
) -> DeliveryOutcome {
    let attempt = async {
        client.send_message(&recipient, &body).await?;
        if let Some(ref location) = coordinate {
            client.send_location(&recipient, location).await?;
        }
        Ok::<(), AlertError>(())
    };

    match tokio::time::timeout(timeout, attempt).await {
        Ok(Ok(())) => DeliveryOutcome::delivered(recipient),
        Ok(Err(e)) => {
            log::error!("Delivery to {} failed: {}", recipient, e);
            DeliveryOutcome::failed(recipient, e.to_string())
        }
        Err(_) => {
            log::error!("Delivery to {} timed out", recipient);
            DeliveryOutcome::failed(recipient, AlertError::Timeout(timeout).to_string())
        }
    }
}

/// Compose the single message body sent to every recipient.
fn compose_message(event: &AlertEvent, location: Option<&AlertLocation>) -> String {
    let mut body = format!(
        "EMERGENCY ALERT from {}\n{}",
        event.sender_name.trim(),
        event.message.trim()
    );
    match location {
        Some(AlertLocation::Text(text)) => {
            body.push_str("\nLocation: ");
            body.push_str(text);
        }
        Some(AlertLocation::Coordinates(coordinate)) => {
            body.push_str(&format!("\nLocation: {}", coordinate));
        }
        None => {}
    }
    body
}

/// Parse the configured recipient list: comma-separated ids, each entry
/// trimmed, empties dropped.
pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(String::from)
        .collect()
}
