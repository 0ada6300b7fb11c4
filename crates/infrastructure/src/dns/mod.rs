pub mod forwarding;
pub mod resolver;
pub mod server;
pub mod transport;

pub use resolver::UpstreamResolver;
pub use server::DnsServerHandler;
