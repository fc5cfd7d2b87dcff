use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "releasekit")]
#[command(about = "Publish versioned releases and their artifacts to GitHub")]
#[command(version)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the latest published release version
    Latest,
    /// Print the version the next release would get
    NextVersion,
    /// Create the next release and upload an artifact to it
    Publish {
        /// File to attach to the release
        #[arg(short, long)]
        artifact: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so command output stays scriptable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Latest => cli::latest::run(config).await,
        Commands::NextVersion => cli::next_version::run(config).await,
        Commands::Publish { artifact } => cli::publish::run(config, &artifact).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\nError: {}", e);
            ExitCode::FAILURE
        }
    }
}
