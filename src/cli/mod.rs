mod terminal;

pub use terminal::TerminalPresenter;

use crate::{
    config::{parse_setting, ChatConfig},
    core::credentials::API_KEY_ENV,
    AgentFactory, Credentials, EventOutcome, Session,
};
use anyhow::{bail, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::time::Duration;
use tracing::{info, warn, Level};

/// CLI entry point for the search-chat tool
pub async fn run() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let matches = command().get_matches();
    init_tracing(matches.get_count("verbose"));

    let config = ChatConfig::from_env().context("invalid environment configuration")?;
    let config = apply_flags(&matches, config)?;
    let credentials = matches
        .get_one::<String>("api-key")
        .map(Credentials::new)
        .unwrap_or_else(Credentials::from_env);
    if !credentials.is_present() {
        warn!(
            "No API key configured. Set {} or pass --api-key; turns will fail until one is provided",
            API_KEY_ENV
        );
    }

    info!("Using model: {}", config.model);
    info!("Base URL: {}", config.base_url);

    let mut session = Session::new(AgentFactory::new(config));
    let mut presenter = TerminalPresenter::stdio();

    match matches.get_one::<String>("prompt") {
        Some(prompt) => match session
            .process_event(Some(prompt.clone()), &credentials, &mut presenter)
            .await
        {
            EventOutcome::Answered(_) => Ok(()),
            EventOutcome::Failed(message) => bail!(message),
            EventOutcome::Ignored => bail!("prompt must not be empty"),
        },
        None => {
            session.run(&credentials, &mut presenter).await;
            Ok(())
        }
    }
}

fn command() -> Command {
    Command::new("search-chat")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Chat with an assistant that searches Wikipedia, arXiv and the web")
        .arg(
            Arg::new("prompt")
                .help("Ask a single question and exit instead of starting a chat")
                .index(1),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .help("Chat model to use (or set GROQ_MODEL)"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .help("Groq API key (or set GROQ_API_KEY env var)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .help("Chat completions base URL (or set GROQ_BASE_URL)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Per-request timeout in seconds"),
        )
        .arg(
            Arg::new("run-timeout")
                .long("run-timeout")
                .value_name("SECONDS")
                .help("Timeout for answering one turn, in seconds"),
        )
        .arg(
            Arg::new("max-iterations")
                .short('i')
                .long("max-iterations")
                .value_name("COUNT")
                .help("Maximum agent iterations per turn"),
        )
        .arg(
            Arg::new("result-count")
                .short('n')
                .long("result-count")
                .value_name("COUNT")
                .help("Results each lookup tool returns"),
        )
        .arg(
            Arg::new("max-chars")
                .short('c')
                .long("max-chars")
                .value_name("CHARS")
                .help("Maximum characters of each lookup result"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v debug, -vv trace)"),
        )
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Layer command-line flags on top of `config`
fn apply_flags(matches: &ArgMatches, mut config: ChatConfig) -> anyhow::Result<ChatConfig> {
    if let Some(model) = matches.get_one::<String>("model") {
        config.model = model.clone();
    }
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config.base_url = base_url.clone();
    }
    if let Some(value) = flag(matches, "timeout")? {
        config.request_timeout = Duration::from_secs(value);
    }
    if let Some(value) = flag(matches, "run-timeout")? {
        config.run_timeout = Duration::from_secs(value);
    }
    if let Some(value) = flag(matches, "max-iterations")? {
        config.max_iterations = value;
    }
    if let Some(value) = flag(matches, "result-count")? {
        config.lookup.result_count = value;
    }
    if let Some(value) = flag(matches, "max-chars")? {
        config.lookup.max_chars = value;
    }

    config.validate().context("invalid command-line configuration")?;
    Ok(config)
}

fn flag<T>(matches: &ArgMatches, name: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    matches
        .get_one::<String>(name)
        .map(|value| parse_setting(&format!("--{}", name), value))
        .transpose()
        .with_context(|| format!("could not parse --{}", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(args: &[&str]) -> anyhow::Result<ChatConfig> {
        let matches = command().try_get_matches_from(args)?;
        let base = ChatConfig::from_lookup(|_| None)?;
        apply_flags(&matches, base)
    }

    #[test]
    fn test_command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let config = resolve(&[
            "search-chat",
            "--model",
            "mixtral-8x7b-32768",
            "--max-iterations",
            "3",
            "--max-chars",
            "400",
            "--timeout",
            "5",
        ])
        .unwrap();

        assert_eq!(config.model, "mixtral-8x7b-32768");
        assert_eq!(config.max_iterations, 3);
        assert_eq!(config.lookup.max_chars, 400);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_flags_layer_over_environment() {
        let matches = command()
            .try_get_matches_from(["search-chat", "--result-count", "2"])
            .unwrap();
        let base = ChatConfig::from_lookup(|name| {
            (name == crate::config::MAX_CHARS_ENV).then(|| "600".to_string())
        })
        .unwrap();

        let config = apply_flags(&matches, base).unwrap();
        assert_eq!(config.lookup.result_count, 2);
        assert_eq!(config.lookup.max_chars, 600);
    }

    #[test]
    fn test_bad_number_flag_is_reported() {
        let err = resolve(&["search-chat", "--result-count", "many"]).unwrap_err();
        assert!(format!("{:#}", err).contains("--result-count"));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        assert!(resolve(&["search-chat", "--max-iterations", "0"]).is_err());
    }

    #[test]
    fn test_prompt_is_optional() {
        let matches = command().try_get_matches_from(["search-chat"]).unwrap();
        assert!(matches.get_one::<String>("prompt").is_none());

        let matches = command()
            .try_get_matches_from(["search-chat", "What is Rust?"])
            .unwrap();
        assert_eq!(
            matches.get_one::<String>("prompt").map(String::as_str),
            Some("What is Rust?")
        );
    }
}
