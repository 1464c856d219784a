use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;

use badapple::{
    open_source, parse_delay_nanos, play_until, unbuffered_stdout, PlaybackConfig, PlaybackSession,
    DEFAULT_DELAY_NANOS,
};

#[derive(Parser, Debug)]
#[command(name = "badapple", about = "Play an ASCII art animation in the terminal")]
struct Cli {
    #[arg(
        short = 'd',
        value_name = "NS",
        value_parser = delay_arg,
        help = format!("Set delay between frames, default: {DEFAULT_DELAY_NANOS}ns")
    )]
    delay: Option<u64>,
}

fn delay_arg(s: &str) -> Result<u64, String> {
    parse_delay_nanos(s).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    // Help exits with a failure status, like usage errors.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = PlaybackConfig::default();
    if let Some(nanos) = cli.delay {
        config = config.with_delay_nanos(nanos);
    }
    config.validate()?;

    let source = open_source(&config.source_path)?;
    let stdout = unbuffered_stdout().context("open standard output")?;
    let mut session = PlaybackSession::new(source, stdout, &config)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build timer runtime")?;

    let interrupt = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // No handler could be installed; rely on the default signal action.
            std::future::pending::<()>().await;
        }
    };
    let summary = runtime.block_on(play_until(&mut session, config.interval(), interrupt))?;

    tracing::info!(
        frames = summary.frames_drawn,
        interrupted = summary.interrupted,
        "playback finished"
    );
    Ok(())
}
