use crate::config::load_config;
use crate::ir::ScenePayload;
use crate::placement::{
    Suggestion, merge_ambient_suggestions, place_ambient_suggestions,
    should_schedule_ambient_intent,
};
use anyhow::Result;
use clap::Parser;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[command(
    name = "ambs",
    version,
    about = "Ambient suggestion placement over a canvas scene"
)]
pub struct Args {
    /// Scene payload (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file for the suggestion list. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Placement config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Override the configured suggestion cap
    #[arg(short = 'm', long = "maxSuggestions")]
    pub max_suggestions: Option<i64>,

    /// Edit reason that triggered this run; unknown reasons skip
    /// recomputation and echo the previous list
    #[arg(short = 'r', long = "reason")]
    pub reason: Option<String>,

    /// Fixed timestamp in epoch milliseconds (defaults to wall clock)
    #[arg(long = "nowMs")]
    pub now_ms: Option<u64>,

    /// Pretty-print the output JSON
    #[arg(long = "pretty")]
    pub pretty: bool,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(max_suggestions) = args.max_suggestions {
        config.max_suggestions = max_suggestions;
    }

    let input = read_input(args.input.as_deref())?;
    let payload = ScenePayload::from_str(&input)?;
    let now_ms = args.now_ms.unwrap_or_else(current_time_ms);

    let suggestions = if recompute_allowed(args.reason.as_deref()) {
        let next = place_ambient_suggestions(&payload.scene, &payload.branches, &config, now_ms);
        merge_ambient_suggestions(&payload.previous, &next, now_ms)
    } else {
        payload.previous
    };

    let json = encode_suggestions(&suggestions, args.pretty)?;
    write_output(&json, args.output.as_deref())?;
    Ok(())
}

/// No reason means an unconditional run; a supplied reason goes through the
/// scheduling gate.
fn recompute_allowed(reason: Option<&str>) -> bool {
    reason.is_none_or(should_schedule_ambient_intent)
}

fn encode_suggestions(suggestions: &[Suggestion], pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(suggestions)?
    } else {
        serde_json::to_string(suggestions)?
    };
    Ok(json)
}

fn current_time_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok(buf);
        }
        return Ok(std::fs::read_to_string(path)?);
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn write_output(json: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, json)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}
