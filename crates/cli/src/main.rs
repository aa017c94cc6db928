use clap::Parser;
use shard_dns_domain::CliOverrides;
use shard_dns_infrastructure::dns::{DnsServerHandler, HandlerChain};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tracing::{error, info};

mod bootstrap;
mod server;

#[derive(Parser, Debug)]
#[command(name = "shard-dns")]
#[command(version)]
#[command(about = "Shard DNS - serves a deterministic slice of a domain's A records")]
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

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config.logging);

    info!("Starting Shard DNS Server v{}", env!("CARGO_PKG_VERSION"));

    let chain = HandlerChain::from_config(&config)?;
    let handler = DnsServerHandler::new(chain);

    let bind_ip: IpAddr = config.server.bind_address.parse()?;
    let dns_addr = SocketAddr::new(bind_ip, config.server.dns_port);
    let tcp_idle_timeout = Duration::from_secs(config.server.tcp_idle_timeout_secs);

    tokio::select! {
        result = server::start_dns_server(dns_addr, handler, config.server.num_workers, tcp_idle_timeout) => {
            if let Err(e) = result {
                error!(error = %e, "DNS server error");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
