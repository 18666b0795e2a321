use std::process::ExitCode;

use clap::{Parser, Subcommand};
use fire_projection::api::{ProjectCommand, ServeArgs, run_http_server, run_project_command};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "fire-projection",
    version,
    about = "Month-by-month projection of savings, draw-down and pension income"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the web calculator and the JSON projection API
    Serve(ServeArgs),
    /// Run one projection and print it
    Project(ProjectCommand),
}

fn init_tracing() {
    // Logs go to stderr so `project --format json` stays pipeable.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,fire_projection=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Command::Serve(args) => {
            if let Err(e) = run_http_server(args).await {
                eprintln!("Server error: {e}");
                return ExitCode::FAILURE;
            }
        }
        Command::Project(command) => match run_project_command(command) {
            Ok(output) => print!("{output}"),
            Err(msg) => {
                eprintln!("{msg}");
                return ExitCode::FAILURE;
            }
        },
    }
    ExitCode::SUCCESS
}
