use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use nestegg::api::{AnalyzeArgs, ExportArgs, analyze_from_args, export_from_args, run_http_server};

#[derive(Parser, Debug)]
#[command(
    name = "nestegg",
    version,
    about = "Retirement portfolio projector: accumulation growth and fixed-rate withdrawal scenarios"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "NESTEGG_LOG_LEVEL",
        default_value = "info",
        help = "Log filter (trace, debug, info, warn, error)"
    )]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API
    Serve(ServeArgs),
    /// Project a configuration and print the report as JSON
    Analyze(AnalyzeArgs),
    /// Print a configuration snapshot for saving
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[arg(long, env = "NESTEGG_PORT", default_value_t = 8080)]
    port: u16,
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => fail(&e.to_string()),
    }
}

fn fail(msg: &str) -> ! {
    eprintln!("error: {msg}");
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Command::Serve(args) => {
            if let Err(e) = run_http_server(args.port).await {
                tracing::error!(error = %e, "server stopped");
                fail(&format!("server error: {e}"));
            }
        }
        Command::Analyze(args) => match analyze_from_args(args) {
            Ok(report) => print_json(&report),
            Err(e) => fail(&e.to_string()),
        },
        Command::Export(args) => match export_from_args(args) {
            Ok(snapshot) => print_json(&snapshot),
            Err(e) => fail(&e.to_string()),
        },
    }
}
