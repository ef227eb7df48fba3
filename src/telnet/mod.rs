//! Telnet plumbing: option negotiation, stream decoding and the blocking session transport.
//!
//! - [`negotiation`]: stateless reply policy for `WILL`/`DO` requests.
//! - [`decoder`]: splits the inbound byte stream into data and negotiation events.
//! - [`session`]: the connection itself, with `send` / `read_until` / `close`.

pub mod decoder;
pub mod negotiation;
pub mod session;

pub use negotiation::{NegotiationEvent, OptionNegotiator, TelnetCommand, TelnetOption};
pub use session::{Session, Transport};
