//! dns-relay domain layer: wire codec, record types, errors and configuration.
pub mod config;
pub mod dns_message;
pub mod errors;
pub mod record_type;

pub use config::{CliOverrides, Config, ConfigError, ForwarderSettings};
pub use dns_message::{DnsHeader, DnsQuestion, DnsReply, ResourceRecord, HEADER_SIZE};
pub use errors::DomainError;
pub use record_type::{RecordType, CLASS_IN};
