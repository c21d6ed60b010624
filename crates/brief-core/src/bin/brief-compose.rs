use anyhow::{Context, Result};
use brief_core::{
    init_tracing, CatalogSnapshot, ClientContext, CompositionOrchestrator, EngineConfig,
    LogFormat, RawSource,
};
use clap::{value_parser, Arg, ArgAction, Command};
use std::path::{Path, PathBuf};

fn cli() -> Command {
    Command::new("brief-compose")
        .version(brief_core::VERSION)
        .about("Compose a briefing into profile, estimate, templates and questions")
        .arg(
            Arg::new("answers")
                .long("answers")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("JSON file with answers; an array is read as several sources"),
        )
        .arg(
            Arg::new("catalog")
                .long("catalog")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("JSON catalog snapshot"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("TOML engine configuration"),
        )
        .arg(
            Arg::new("prior-projects")
                .long("prior-projects")
                .default_value("0")
                .value_parser(value_parser!(u32))
                .help("Projects already delivered to this client"),
        )
        .arg(
            Arg::new("segment")
                .long("segment")
                .help("Client market segment"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
}

fn read_sources(path: &Path) -> Result<Vec<RawSource>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading answers from {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing answers in {}", path.display()))?;

    Ok(match value {
        serde_json::Value::Array(items) => items.into_iter().map(RawSource::from_json).collect(),
        other => vec![RawSource::from_json(other)],
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    let format = if matches.get_flag("log-json") {
        LogFormat::Json
    } else {
        LogFormat::Plain
    };
    init_tracing(format);

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    let Some(answers_path) = matches.get_one::<PathBuf>("answers") else {
        anyhow::bail!("--answers is required");
    };
    let Some(catalog_path) = matches.get_one::<PathBuf>("catalog") else {
        anyhow::bail!("--catalog is required");
    };

    let sources = read_sources(answers_path)?;
    let catalog = CatalogSnapshot::from_file(catalog_path)
        .with_context(|| format!("loading catalog {}", catalog_path.display()))?;

    let mut client = ClientContext::returning(
        matches.get_one::<u32>("prior-projects").copied().unwrap_or(0),
    );
    if let Some(segment) = matches.get_one::<String>("segment") {
        client = client.with_segment(segment.as_str());
    }

    let orchestrator = CompositionOrchestrator::new(config);
    let result = orchestrator.compose(&sources, &catalog, &client).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
