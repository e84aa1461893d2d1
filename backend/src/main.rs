use clap::Parser;
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;

#[derive(Debug, Parser)]
#[command(version, about = "Match replay parsing service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Serve the upload API
    Serve {
        #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
        bind: String,
    },
    /// Parse a single replay and print the payload
    Parse {
        path: std::path::PathBuf,
        /// Frames between snapshots while the tick rate is unknown
        #[arg(long, default_value_t = analysis::sampler::DEFAULT_TICK_INTERVAL)]
        tick_interval: u32,
        /// Report the round still running at the end of the replay
        #[arg(long)]
        flush_incomplete_round: bool,
        /// Write the payload here instead of stdout
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), std::io::Error> {
    let registry = tracing_subscriber::Registry::default()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target().contains("backend") || meta.target().contains("analysis")
        }));
    if let Err(e) = tracing::subscriber::set_global_default(registry) {
        eprintln!("Setting up logging: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { bind } => serve(&bind).await,
        Command::Parse {
            path,
            tick_interval,
            flush_incomplete_round,
            output,
        } => {
            let options = analysis::ParseOptions {
                tick_interval,
                flush_incomplete_round,
            };
            parse_file(path, options, output).await
        }
    }
}

async fn serve(bind: &str) -> Result<(), std::io::Error> {
    tracing::info!("Starting...");

    let (worker, _worker_handle) = backend::worker::spawn();

    let router = axum::Router::new().nest("/api", backend::api::router(worker));

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("Listening on {}", bind);

    axum::serve(listener, router).await
}

async fn parse_file(
    path: std::path::PathBuf,
    options: analysis::ParseOptions,
    output: Option<std::path::PathBuf>,
) -> Result<(), std::io::Error> {
    tracing::info!("Loading {:?}", path);

    let payload = match backend::AnalysisData::load(&path) {
        Ok(data) => {
            let (worker, _worker_handle) = backend::worker::spawn();
            worker
                .submit(backend::AnalysisInput { data, options })
                .await
                .unwrap_or_else(|e| analysis::error_payload(&e.to_string()))
        }
        Err(e) => {
            tracing::error!("Opening {:?}: {}", path, e);
            analysis::error_payload(&format!("opening {}: {}", path.display(), e))
        }
    };

    match output {
        Some(out) => tokio::fs::write(out, payload).await,
        None => {
            println!("{}", payload);
            Ok(())
        }
    }
}
