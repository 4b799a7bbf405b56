use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An emergency alert as raised by the caller.
///
/// The recipient list is not part of the event; it is resolved from
/// configuration at dispatch time.
#[derive(Debug, Clone)]
pub struct AlertEvent {
    pub sender_name: String,
    pub message: String,
    /// Caller-captured location (coordinate pair or place text). Used
    /// verbatim when non-empty; otherwise the dispatcher falls back to a
    /// best-effort host lookup.
    pub location: Option<String>,
}

/// Delivery status for a single recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Delivered,
    Failed,
}

/// The result of one delivery attempt to one recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    pub recipient_id: String,
    pub status: DeliveryStatus,
    /// Present exactly when `status` is `Failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl DeliveryOutcome {
    pub fn delivered(recipient_id: impl Into<String>) -> Self {
        DeliveryOutcome {
            recipient_id: recipient_id.into(),
            status: DeliveryStatus::Delivered,
            error_detail: None,
        }
    }

    pub fn failed(recipient_id: impl Into<String>, detail: impl Into<String>) -> Self {
        DeliveryOutcome {
            recipient_id: recipient_id.into(),
            status: DeliveryStatus::Failed,
            error_detail: Some(detail.into()),
        }
    }

    pub fn is_delivered(&self) -> bool {
        self.status == DeliveryStatus::Delivered
    }
}

/// A completed dispatch: one outcome per configured recipient, in the
/// configured recipient order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchReport {
    pub sender_name: String,
    pub timestamp: DateTime<Utc>,
    pub outcomes: Vec<DeliveryOutcome>,
}

impl DispatchReport {
    pub fn new(sender_name: impl Into<String>, outcomes: Vec<DeliveryOutcome>) -> Self {
        DispatchReport {
            sender_name: sender_name.into(),
            timestamp: Utc::now(),
            outcomes,
        }
    }

    pub fn delivered_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_delivered()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.delivered_count()
    }
}
