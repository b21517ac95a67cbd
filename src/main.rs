mod cli;
mod render;
mod session;

use std::io::Write;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use crossterm::tty::IsTty;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};
use url::Url;

use cli::{Cli, Commands, InputArgs};
use regplay_config::Config;
use regplay_core::{permalink, presets, Engine, RunInput};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Completions need no config
    if let Commands::Completions { shell } = &cli.command {
        cli::print_completions(*shell);
        return Ok(());
    }

    let config = load_config(&cli)?;

    match &cli.command {
        Commands::ShowConfig => {
            println!("{}", serde_yaml::to_string(&config).unwrap_or_default());
            Ok(())
        }
        Commands::Ping => ping(&config).await,
        Commands::Link { input, decode } => link(&cli, &config, input, decode.as_deref()),
        Commands::Run { input, json } => {
            let initial = initial_input(&cli, input)?;
            run_once(&config, initial, *json).await
        }
        Commands::Session { input } => {
            let initial = initial_input(&cli, input)?;
            session::run(&config, initial, std::io::stdout().is_tty()).await
        }
        Commands::Completions { .. } => Ok(()),
    }
}

/// Config file layers plus command line overrides.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = regplay_config::load(cli.config.as_deref())?;
    if let Some(url) = &cli.url {
        config.matcher.base_url = url.clone();
    }
    if let Some(provider) = cli.provider {
        config.matcher.provider = provider;
    }
    Ok(config)
}

/// Starting input: the built-in sample, then a shared link, then explicit
/// arguments.
fn initial_input(cli: &Cli, args: &InputArgs) -> anyhow::Result<RunInput> {
    let mut input = presets::sample_input();
    if let Some(url) = &cli.from_url {
        input = permalink::decode_str(url, input)?;
    }
    args.apply(input)
}

fn share_base(config: &Config) -> anyhow::Result<Url> {
    Url::parse(&config.share.base_url)
        .with_context(|| format!("invalid share.base_url {:?}", config.share.base_url))
}

async fn run_once(config: &Config, input: RunInput, json: bool) -> anyhow::Result<()> {
    if input.pattern.is_empty() {
        bail!("empty pattern; pass --pattern or --preset");
    }

    let matcher = regplay_matcher::from_config(&config.matcher)?;
    let engine = Engine::new(matcher, config.engine.clone(), config.matcher.max_matches);
    let (handle, _events) = engine.spawn(input);
    handle.run_now()?;
    let state = handle.wait_for(|s| s.is_settled()).await?;
    handle.shutdown().await;

    if let Some(msg) = state.outcome.error() {
        return Err(anyhow!("{msg}"));
    }

    let mut stdout = std::io::stdout().lock();
    if json {
        let rs = state
            .outcome
            .result_set()
            .ok_or_else(|| anyhow!("run finished without a result"))?;
        writeln!(stdout, "{}", serde_json::to_string_pretty(rs)?)?;
    } else {
        write!(stdout, "{}", render::view(&state, std::io::stdout().is_tty()))?;
    }
    Ok(())
}

async fn ping(config: &Config) -> anyhow::Result<()> {
    let matcher = regplay_matcher::from_config(&config.matcher)?;
    matcher
        .ping()
        .await
        .with_context(|| format!("{} matcher at {} is not answering", matcher.name(), config.matcher.base_url))?;
    println!("pong from {} matcher", matcher.name());
    Ok(())
}

fn link(cli: &Cli, config: &Config, args: &InputArgs, decode: Option<&str>) -> anyhow::Result<()> {
    if let Some(url) = decode {
        let input = permalink::decode_str(url, presets::sample_input())?;
        println!("text:    {}", input.text.escape_debug());
        println!("pattern: {}", input.pattern);
        println!("flags:   {}", input.flags.letters());
        return Ok(());
    }
    let input = initial_input(cli, args)?;
    println!("{}", permalink::encode(&share_base(config)?, &input));
    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
