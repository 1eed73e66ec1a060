//! Domain model (SMS record, error taxonomy).

pub mod errors;
pub mod message;

pub use self::errors::{BridgeError, DeliveryError, FetchError, MissingField, TransportError};
pub use self::message::Sms;
