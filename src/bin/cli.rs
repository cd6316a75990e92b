//! kvline CLI Client
//!
//! Interactive client: reads request lines from stdin and prints responses.

use std::io::{self, BufRead, Write};

use clap::Parser;
use kvline::config::parse_port;
use kvline::network::Client;
use kvline::{Config, TransportKind};
use tracing_subscriber::{fmt, EnvFilter};

const HELP: &str = "All valid request formats:

GET x
PUT x y
DELETE x
STOP

Fields are separated by tabs. eg : PUT \\t key \\t value
Spaces also separate fields unless the server runs with --tab-separated.
";

/// kvline CLI
#[derive(Parser, Debug)]
#[command(name = "kvline-cli")]
#[command(about = "Interactive client for the kvline key-value store")]
#[command(version)]
struct Args {
    /// Server host name or IP address
    host: String,

    /// Server port (0-65535)
    #[arg(value_parser = parse_port)]
    port: u16,

    /// Talk to a UDP server instead of TCP
    #[arg(short, long)]
    udp: bool,

    /// How long to wait for each response
    #[arg(short, long, default_value = "1000")]
    timeout_ms: u64,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let args = Args::parse();

    let config = Config::builder()
        .listen_addr(format!("{}:{}", args.host, args.port))
        .transport(if args.udp {
            TransportKind::Datagram
        } else {
            TransportKind::Stream
        })
        .client_timeout_ms(args.timeout_ms)
        .build();

    let mut client = match Client::connect(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    println!("Connected to {}\n", client.server_addr());
    print!("{}", HELP);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("REQ to send: ");
        let _ = io::stdout().flush();

        let request = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("ERROR: {}", e);
                break;
            }
            None => break,
        };

        match client.request(&request) {
            Ok(response) => println!("RES received: {}", response),
            Err(e) if e.is_timeout() => {
                println!("ERROR: {}. Check server log or server might be down.", e)
            }
            Err(e) => println!("ERROR: {}", e),
        }

        if request.trim().eq_ignore_ascii_case("stop") {
            break;
        }
    }
}
