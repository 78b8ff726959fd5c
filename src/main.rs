use clap::Parser;
use gomoku_client::config::Cli;
use gomoku_client::input::{MoveSource, RandomInput, StdinInput};
use gomoku_client::transport;
use gomoku_client::ui::ConsoleUi;
use gomoku_client::{Session, SessionError};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let file_appender = tracing_appender::rolling::daily(&cli.log_dir, "client.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(non_blocking)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Logging disabled: {}", err);
    }
    info!(host = %cli.host, port = cli.port, auto = cli.auto, "starting client");

    let result = if cli.auto {
        play(&cli, RandomInput::default()).await
    } else {
        play(&cli, StdinInput::default()).await
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            eprintln!("Game aborted: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn play<I: MoveSource>(cli: &Cli, input: I) -> Result<(), SessionError> {
    let connection = transport::connect(&cli.host, cli.port).await?;
    Session::new(connection, input, ConsoleUi::default())
        .run()
        .await?;
    Ok(())
}
