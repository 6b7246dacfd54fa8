//! fetch token info from the dappio graphql api and print it
//!
//! ```text
//! dappio-token-info [SYMBOL] [--endpoint URL] [--timeout-ms N] [--pretty] [--schema] [-v...]
//! ```
//!
//! the result goes to stdout as json; errors go to stderr with a non-zero
//! exit code (2 config, 3 transport, 4 query, 5 response shape).

use clap::Parser;
use dappio::{Client, ClientConfig, Error, ErrorKind, ENDPOINT_ENV};
use serde::Serialize;
use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(
    name = "dappio-token-info",
    version,
    about = "Fetch token info from the dappio graphql api"
)]
struct Cli {
    /// token symbol, sent as-is
    #[arg(default_value = "ETH")]
    symbol: String,

    /// graphql endpoint (the public dappio endpoint when unset or blank)
    #[arg(long, env = ENDPOINT_ENV)]
    endpoint: Option<String>,

    /// request timeout in milliseconds (transport default when omitted)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// pretty-print json output
    #[arg(long)]
    pretty: bool,

    /// print the introspected schema instead of token info
    #[arg(long)]
    schema: bool,

    /// increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    dappio::init_logging(cli.verbose);

    match run(&cli, std::io::stdout().lock()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = report(&err, std::io::stderr().lock());
            ExitCode::from(exit_code(&err))
        }
    }
}

async fn run(cli: &Cli, out: impl Write) -> Result<(), Error> {
    let mut config = ClientConfig::new_or_default(cli.endpoint.as_deref());
    if let Some(ms) = cli.timeout_ms {
        config = config.with_timeout(Duration::from_millis(ms));
    }
    let client = Client::new(config)?;

    if cli.schema {
        let schema = client.introspect_schema().await?;
        return print_json(out, &schema, cli.pretty);
    }

    tracing::info!(
        symbol = %cli.symbol,
        endpoint = %client.config().endpoint(),
        "fetching token info"
    );
    let info = client.fetch_token_info(&cli.symbol).await?;
    print_json(out, &info, cli.pretty)
}

/// write one json document followed by a newline
fn print_json<W: Write, T: Serialize>(mut out: W, value: &T, pretty: bool) -> Result<(), Error> {
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out).map_err(serde_json::Error::io)?;
    Ok(())
}

/// write the error and any further graphql messages
fn report(err: &Error, mut out: impl Write) -> std::io::Result<()> {
    writeln!(out, "error: {err}")?;
    for detail in err.graphql_errors().iter().skip(1) {
        writeln!(out, "  {detail}")?;
    }
    Ok(())
}

fn exit_code(err: &Error) -> u8 {
    match err.kind() {
        ErrorKind::Config => 2,
        ErrorKind::Transport => 3,
        ErrorKind::Query => 4,
        ErrorKind::Deserialize => 5,
    }
}
