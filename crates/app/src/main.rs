mod terminal;
mod view;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::{Museum, start_param_from_url};
use services::config::parse_base_url;
use services::{GameConfig, GameController, HttpFetcher};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use crate::terminal::TerminalBridge;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDelay { raw: String },
    InvalidLaunchUrl { raw: String },
    Config(services::ConfigError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDelay { raw } => write!(f, "invalid --delay-ms value: {raw}"),
            ArgsError::InvalidLaunchUrl { raw } => write!(f, "invalid --launch-url value: {raw}"),
            ArgsError::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<services::ConfigError> for ArgsError {
    fn from(err: services::ConfigError) -> Self {
        ArgsError::Config(err)
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--base-url <url>] [--source <path>]... [--proxy <prefix>]");
    eprintln!("                      [--delay-ms <ms>] [--start-param <c_t>] [--launch-url <url>]");
    eprintln!("                      [--no-shuffle]");
    eprintln!();
    eprintln!("Keys while playing: 1 = Tretyakov Gallery, 2 = Russian Museum,");
    eprintln!("                    n = new game, s = share, q = quit");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_BASE_URL, QUIZ_SOURCES, QUIZ_PROXY_PREFIX, QUIZ_FEEDBACK_DELAY_MS,");
    eprintln!("  QUIZ_SHARE_LINK, RUST_LOG");
}

struct Args {
    config: GameConfig,
    start_param: Option<String>,
    shuffle: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut config = GameConfig::from_env()?;
        let mut start_param = None;
        let mut shuffle = true;
        let mut sources_from_args = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--base-url" => {
                    config.base_url = parse_base_url(&require_value(args, "--base-url")?)?;
                }
                "--source" => {
                    let value = require_value(args, "--source")?;
                    if !sources_from_args {
                        config.sources.clear();
                        sources_from_args = true;
                    }
                    config.sources.push(value);
                }
                "--proxy" => config.proxy_prefix = require_value(args, "--proxy")?,
                "--delay-ms" => {
                    let value = require_value(args, "--delay-ms")?;
                    let millis: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidDelay { raw: value.clone() })?;
                    config.feedback_delay = Duration::from_millis(millis);
                }
                "--start-param" => start_param = Some(require_value(args, "--start-param")?),
                "--launch-url" => {
                    let value = require_value(args, "--launch-url")?;
                    let url = url_from_arg(&value)?;
                    start_param = start_param_from_url(&url).or(start_param);
                }
                "--no-shuffle" => shuffle = false,
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Some(Self {
            config,
            start_param,
            shuffle,
        }))
    }
}

fn url_from_arg(raw: &str) -> Result<Url, ArgsError> {
    Url::parse(raw).map_err(|_| ArgsError::InvalidLaunchUrl {
        raw: raw.to_owned(),
    })
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "app=info,services=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_lines(lines: &[String]) {
    println!();
    for line in lines {
        println!("{line}");
    }
}

/// Answer the round, discarding lines typed while the feedback is showing so
/// they cannot answer a round the player has not seen yet.
async fn answer_and_drain<R>(
    game: &GameController,
    choice: Museum,
    lines: &mut Lines<R>,
) -> std::io::Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    let answering = game.answer(choice);
    tokio::pin!(answering);
    loop {
        tokio::select! {
            feedback = &mut answering => return Ok(feedback.is_some()),
            line = lines.next_line() => match line? {
                Some(ignored) => debug!(input = %ignored, "ignoring input during feedback"),
                None => return Ok(answering.await.is_some()),
            },
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let Some(parsed) = Args::parse(&mut argv).inspect_err(|_| print_usage())? else {
        print_usage();
        return Ok(());
    };

    info!(base_url = %parsed.config.base_url, "starting museum quiz");
    let game = GameController::new(
        &parsed.config,
        Arc::new(HttpFetcher::new()),
        Arc::new(TerminalBridge),
    )
    .with_shuffle(parsed.shuffle);

    // Data errors are shown through the snapshot; only I/O below is fatal.
    let _ = game.start(parsed.start_param.as_deref()).await;
    print_lines(&view::render(&game.snapshot()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input {
            "q" | "quit" => break,
            "n" | "new" => {
                let _ = game.restart().await;
            }
            "s" | "share" => match game.share().await {
                Some(outcome) => println!("{}", view::describe_share(outcome)),
                None => println!("Finish the game to share your result."),
            },
            _ => match view::parse_choice(input) {
                Some(choice) => {
                    if !answer_and_drain(&game, choice, &mut lines).await? {
                        continue;
                    }
                }
                None => {
                    println!("Type 1 or 2 to answer, n for a new game, q to quit.");
                    continue;
                }
            },
        }

        print_lines(&view::render(&game.snapshot()));
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
