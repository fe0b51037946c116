use anyhow::{Context, Result};
use nodemark_config::Config;
use nodemark_engine::{Host, InputEvent, Key, Outcome, Schema, Selection, Session, parse, render};
use serde::Deserialize;
use std::{env, path::PathBuf, process};

const DEFAULT_COLUMNS: usize = 80;

/// A scripted session: starting markup and the events to replay.
#[derive(Debug, Deserialize)]
struct Script {
    doc: String,
    #[serde(default = "default_columns")]
    columns: usize,
    #[serde(default)]
    events: Vec<InputEvent>,
}

fn default_columns() -> usize {
    DEFAULT_COLUMNS
}

/// One replayed event as printed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    event: String,
    outcome: Outcome,
    active: bool,
    markup: String,
}

fn schema_for(config: &Config) -> Schema {
    let schema = Schema::basic();
    if schema.node_type(&config.atom_type).is_ok() {
        // already known, options() decides whether it can be an atom
        schema
    } else {
        schema.with_atom(&config.atom_type)
    }
}

fn describe(event: &InputEvent) -> String {
    match event {
        InputEvent::Key(key) => {
            let mut name = match &key.key {
                Key::Char(ch) => format!("{ch:?}"),
                Key::Other(other) => other.clone(),
                named => format!("{named:?}"),
            };
            for (held, label) in [
                (key.modifiers.shift, "shift"),
                (key.modifiers.alt, "alt"),
                (key.modifiers.ctrl, "ctrl"),
                (key.modifiers.meta, "meta"),
            ] {
                if held {
                    name = format!("{label}+{name}");
                }
            }
            name
        }
        InputEvent::Click { pos } => format!("click {pos}"),
        InputEvent::TextInput {
            range,
            text,
            composing,
        } => {
            let mark = if *composing { " (composing)" } else { "" };
            format!("text {text:?} over {}..{}{mark}", range.start, range.end)
        }
        InputEvent::CompositionStart => "composition start".to_string(),
        InputEvent::CompositionEnd => "composition end".to_string(),
    }
}

fn replay(script: &Script, config: &Config) -> Result<Vec<Line>> {
    let schema = schema_for(config);
    let options = config.options(&schema)?;
    let parsed = parse(&schema, &script.doc).context("Failed to parse script document")?;
    let selection = parsed.selection.unwrap_or(Selection::caret(1));
    let mut host = Host::new(Session::new(parsed.doc, selection, options), script.columns);

    let mut lines = Vec::with_capacity(script.events.len());
    for (index, event) in script.events.iter().enumerate() {
        let step = host
            .step(event)
            .with_context(|| format!("Event {} ({}) failed", index + 1, describe(event)))?;
        log::debug!("event {}: {step:?}", index + 1);
        let session = host.session();
        lines.push(Line {
            event: describe(event),
            outcome: step.outcome,
            active: session.state().active,
            markup: render(session.doc(), Some(session.selection())),
        });
    }
    Ok(lines)
}

fn load_script(path: &PathBuf) -> Result<Script> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse script {}", path.display()))
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} <script.toml> [--config <config.toml>]");
    process::exit(1);
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args
        .first()
        .cloned()
        .unwrap_or_else(|| "nodemark-cli".to_string());

    let (script_path, config_path) = match args.get(1..).unwrap_or_default() {
        [script] => (PathBuf::from(script), None),
        [script, flag, config] if flag == "--config" => {
            (PathBuf::from(script), Some(PathBuf::from(config)))
        }
        _ => usage(&program),
    };

    let loaded = match &config_path {
        Some(path) => {
            log::info!("Config path: {}", path.display());
            Config::load_from_path(path)?
        }
        None => {
            log::info!("Config path: {}", Config::config_path().display());
            Config::load()?
        }
    };
    let config = match loaded {
        Some(config) => config,
        None => {
            log::info!("No config file found, using defaults");
            Config::default()
        }
    };

    let script = load_script(&script_path)?;
    log::info!(
        "Replaying {} events from {}",
        script.events.len(),
        script_path.display()
    );

    println!("{:>4}  {:<12} {:<6} {}", "", "start", "", script.doc);
    for (index, line) in replay(&script, &config)?.iter().enumerate() {
        let outcome = match line.outcome {
            Outcome::Handled => "handled",
            Outcome::PassThrough => "pass",
        };
        let active = if line.active { "active" } else { "" };
        println!(
            "{:>4}  {:<12} {:<6} {}    # {}",
            index + 1,
            outcome,
            active,
            line.markup,
            line.event
        );
    }
    Ok(())
}
