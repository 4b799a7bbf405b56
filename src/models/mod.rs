//! Core data types: account records and alert events

pub mod alert;
pub mod user;

pub use alert::{AlertEvent, DeliveryOutcome, DeliveryStatus, DispatchReport};
pub use user::{BloodGroup, Gender, NewAccount, UserRecord};
