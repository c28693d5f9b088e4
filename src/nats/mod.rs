pub mod client;
pub mod messages;

pub use client::NatsTransport;
pub use messages::{CallCommandMessage, TransportEventMessage};
