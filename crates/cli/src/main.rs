use clap::Parser;
use dns_relay_application::use_cases::ForwardQueryUseCase;
use dns_relay_domain::CliOverrides;
use dns_relay_infrastructure::dns::{DnsServerHandler, UpstreamResolver};
use std::sync::Arc;
use tracing::{error, info};

mod bootstrap;
mod server;

#[derive(Parser)]
#[command(name = "dns-relay")]
#[command(version)]
#[command(about = "Single-question DNS forwarder: answers A queries from an upstream resolver")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Upstream resolver (IP:PORT or udp://IP:PORT)
    #[arg(short = 'u', long)]
    upstream: Option<String>,

    /// Upstream query timeout in seconds
    #[arg(short = 't', long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind,
        upstream: cli.upstream,
        query_timeout: cli.timeout,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting dns-relay v{}", env!("CARGO_PKG_VERSION"));

    let settings = config.dns.forwarder_settings()?;
    info!(
        upstream = %settings.upstream,
        timeout_ms = settings.timeout.as_millis() as u64,
        answer_ttl = settings.answer_ttl,
        "Upstream configured"
    );

    let resolver = Arc::new(UpstreamResolver::from_settings(&settings));
    let use_case = Arc::new(ForwardQueryUseCase::new(resolver, settings));
    let handler = DnsServerHandler::new(use_case);

    let dns_addr = config.server.listen_addr();
    if let Err(e) = server::start_dns_server(
        dns_addr.clone(),
        handler,
        config.server.max_concurrent_queries,
    )
    .await
    {
        error!(address = %dns_addr, error = %e, "DNS server error");
        return Err(e);
    }

    info!("Server shutdown complete");
    Ok(())
}
