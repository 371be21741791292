//! Network side of the relay: broker session, payload decoding, intake.

pub mod intake;
pub mod mqtt;
pub mod payload;

pub use intake::Intake;
pub use mqtt::Subscriber;
pub use payload::{decode, PayloadError};
