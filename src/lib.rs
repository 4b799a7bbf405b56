pub mod accounts;
pub mod alerting;
pub mod assistant;
pub mod config;
pub mod geolocation;
pub mod models;
pub mod output;
pub mod store;

// Re-export commonly used types
pub use accounts::{AccountRegistrar, AuthOutcome, AuthenticationService, RegistrationOutcome};
pub use alerting::{AlertDispatcher, AlertError, MessagingClient, TelegramClient};
pub use assistant::{Assistant, GeminiClient, TextGenerator};
pub use config::Config;
pub use geolocation::{GeoLocation, GeoLookupService};
pub use models::{AlertEvent, DeliveryOutcome, DeliveryStatus, DispatchReport, NewAccount, UserRecord};
pub use store::{CsvRecordStore, KeyColumn, RecordStore};
