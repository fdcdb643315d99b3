//! nsmove command - move a network interface into a process's network namespace.

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use nsmove::config::{DEFAULT_INTERFACE, MoveConfig};
use nsmove::netlink::namespace::{NamespaceTarget, TargetProcess};

#[derive(Parser)]
#[command(
    name = "nsmove",
    version,
    about = "Move a network interface into another process's network namespace"
)]
struct Cli {
    /// PID of the process whose network namespace receives the interface.
    #[arg(required_unless_present = "netns", conflicts_with = "netns")]
    pid: Option<TargetProcess>,

    /// Interface to move.
    #[arg(short, long, default_value = DEFAULT_INTERFACE)]
    interface: String,

    /// Target a namespace file instead of a PID: a name under /var/run/netns
    /// or a path such as /proc/<pid>/ns/net.
    #[arg(long, value_name = "NAME|PATH")]
    netns: Option<String>,

    /// Seconds to wait for the kernel's reply (0 waits forever).
    #[arg(short, long, default_value_t = 5)]
    timeout: u64,

    /// Log more (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<MoveConfig> {
        let target = match (self.pid, self.netns) {
            (Some(pid), _) => NamespaceTarget::Pid(pid),
            (None, Some(netns)) => NamespaceTarget::from_netns_arg(&netns)
                .with_context(|| format!("opening namespace {}", netns))?,
            (None, None) => anyhow::bail!("a PID or --netns is required"),
        };

        let timeout = (self.timeout > 0).then(|| Duration::from_secs(self.timeout));

        Ok(MoveConfig::new(target)
            .interface(self.interface)
            .timeout(timeout))
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.into_config()?;

    let iface = config
        .resolve()
        .with_context(|| format!("resolving interface {}", config.interface))?;
    let conn = config.connect().context("opening netlink socket")?;
    conn.set_link_netns(&iface, &config.target)
        .await
        .with_context(|| format!("moving interface {} into {}", iface, config.target))?;

    tracing::debug!(interface = %iface, target = %config.target, "done");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_pid_config() {
        let cli = Cli::try_parse_from(["nsmove", "4242"]).unwrap();
        let config = cli.into_config().unwrap();
        assert_eq!(config.interface, "eth0");
        assert_eq!(config.target.to_string(), "pid 4242");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_interface_and_timeout() {
        let cli = Cli::try_parse_from(["nsmove", "-i", "veth1", "--timeout", "0", "7"]).unwrap();
        let config = cli.into_config().unwrap();
        assert_eq!(config.interface, "veth1");
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_pid_validation() {
        assert!(Cli::try_parse_from(["nsmove", "0"]).is_err());
        assert!(Cli::try_parse_from(["nsmove", "abc"]).is_err());
        assert!(Cli::try_parse_from(["nsmove", "-5"]).is_err());
        assert!(Cli::try_parse_from(["nsmove"]).is_err());
    }

    #[test]
    fn test_netns_conflicts_with_pid() {
        assert!(Cli::try_parse_from(["nsmove", "--netns", "blue", "42"]).is_err());
        let cli = Cli::try_parse_from(["nsmove", "--netns", "/proc/self/ns/net"]).unwrap();
        let config = cli.into_config().unwrap();
        assert_eq!(config.target.to_string(), "netns /proc/self/ns/net");
    }
}
