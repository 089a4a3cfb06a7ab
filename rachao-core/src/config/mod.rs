//! Runtime configuration types shared between crates.
//!
//! Loading and validating the TOML file is done by the server crate.

mod messaging;

pub use messaging::{BrokerKind, MessagingConfig};
