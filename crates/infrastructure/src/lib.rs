//! dns-relay infrastructure: upstream resolver adapter and datagram handler.
pub mod dns;
