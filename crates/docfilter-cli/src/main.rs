//! docfilter - translate an admin filter list into a query document.
//!
//! Reads a JSON array of filter clauses from a file or stdin and prints the
//! translated query as relaxed Extended JSON, ready to paste into a shell
//! `find()` call.
//!
//! Run with: cargo run --bin docfilter -- filters.json

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bson::{Bson, Document};
use clap::Parser;
use docfilter::{FilterClause, InvalidIdPolicy, TranslateOptions, Translator};

const ENV_LOG: &str = "DOCFILTER_LOG";
const ENV_OPTIONS: &str = "DOCFILTER_OPTIONS";
const ENV_INVALID_ID: &str = "DOCFILTER_INVALID_ID";
const ENV_NO_COLLAPSE: &str = "DOCFILTER_NO_COLLAPSE";
const ENV_COERCE_DATES: &str = "DOCFILTER_COERCE_DATES";
const ENV_CAST_IDS: &str = "DOCFILTER_CAST_IDS";

#[derive(Parser, Debug)]
#[command(name = "docfilter")]
#[command(version, about = "Translate admin-panel filters into document-database queries", long_about = None)]
struct Cli {
    /// Filter list (JSON array). Reads stdin when omitted or "-"
    input: Option<PathBuf>,

    /// Options file (JSON), applied before flags
    #[arg(long, short = 'o', env = ENV_OPTIONS)]
    options: Option<PathBuf>,

    /// What an invalid id clause does: skip or reset
    #[arg(long, env = ENV_INVALID_ID)]
    invalid_id: Option<InvalidIdPolicy>,

    /// Keep dotted array-index clauses instead of collapsing them into $in
    #[arg(long, env = ENV_NO_COLLAPSE)]
    no_collapse: bool,

    /// Convert RFC 3339 date bounds into BSON datetimes
    #[arg(long, env = ENV_COERCE_DATES)]
    coerce_dates: bool,

    /// Emit 24-hex id strings as ObjectIds
    #[arg(long, env = ENV_CAST_IDS)]
    cast_ids: bool,

    /// Print the query on one line
    #[arg(long)]
    compact: bool,

    /// Log translation decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let options = resolve_options(cli)?;
    let filters = load_filters(cli.input.as_deref())?;
    tracing::debug!(clauses = filters.len(), "loaded filter list");

    let query = Translator::new().with_options(options).translate(&filters);
    println!("{}", render(query, cli.compact)?);
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "warn".to_string())
    };

    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .with_env_filter(filter)
        .init();
}

/// Layers options: defaults, then the options file, then flags.
fn resolve_options(cli: &Cli) -> Result<TranslateOptions> {
    let mut options = match &cli.options {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read options file: {}", path.display()))?;
            TranslateOptions::from_json(&json)
                .with_context(|| format!("Invalid options file: {}", path.display()))?
        }
        None => TranslateOptions::default(),
    };

    if let Some(policy) = cli.invalid_id {
        options.invalid_id = policy;
    }
    if cli.no_collapse {
        options.collapse_arrays = false;
    }
    if cli.coerce_dates {
        options.coerce_dates = true;
    }
    if cli.cast_ids {
        options.cast_ids = true;
    }

    tracing::debug!(?options, "resolved translation options");
    Ok(options)
}

fn load_filters(path: Option<&Path>) -> Result<Vec<FilterClause>> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open filter file: {}", path.display()))?;
            FilterClause::list_from_reader(file)
                .with_context(|| format!("Invalid filter list: {}", path.display()))
        }
        _ => FilterClause::list_from_reader(std::io::stdin().lock())
            .context("Invalid filter list on stdin"),
    }
}

fn render(query: Document, compact: bool) -> Result<String> {
    let json = Bson::Document(query).into_relaxed_extjson();
    let out = if compact {
        serde_json::to_string(&json)?
    } else {
        serde_json::to_string_pretty(&json)?
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("docfilter").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn parses_flags() {
        let cli = parse(&["filters.json", "--invalid-id", "reset", "--no-collapse", "--compact"]);
        assert_eq!(cli.input, Some(PathBuf::from("filters.json")));
        assert_eq!(cli.invalid_id, Some(InvalidIdPolicy::Reset));
        assert!(cli.no_collapse);
        assert!(cli.compact);
        assert!(!cli.cast_ids);
    }

    #[test]
    fn rejects_unknown_policy() {
        let result = Cli::try_parse_from(["docfilter", "--invalid-id", "abort"]);
        assert!(result.is_err());
    }

    #[test]
    fn flags_override_options_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"invalid_id": "reset", "coerce_dates": true}}"#).unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let cli = parse(&["--options", &path, "--invalid-id", "skip", "--cast-ids"]);
        let options = resolve_options(&cli).unwrap();

        assert_eq!(options.invalid_id, InvalidIdPolicy::Skip);
        assert!(options.coerce_dates);
        assert!(options.cast_ids);
        assert!(options.collapse_arrays);
    }

    #[test]
    fn missing_options_file_is_an_error() {
        let cli = parse(&["--options", "/nonexistent/docfilter-options.json"]);
        let err = resolve_options(&cli).unwrap_err();
        assert!(err.to_string().contains("Failed to read options file"));
    }

    fn filter_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{json}").unwrap();
        file
    }

    #[test]
    fn translates_filter_file() {
        let file = filter_file(
            r#"[
                {"property": {"name": "name", "type": "string"}, "value": {"equal": "Ada"}},
                {"path": "tags.0.value", "property": {"name": "tags", "type": "array"}, "value": "x"}
            ]"#,
        );

        let filters = load_filters(Some(file.path())).unwrap();
        let query = Translator::new().translate(&filters);
        assert_eq!(
            query,
            bson::doc! {
                "name": { "$regex": "^Ada$", "$options": "i" },
                "tags": { "$in": ["x"] }
            }
        );
    }

    #[test]
    fn null_filter_file_is_empty() {
        let file = filter_file("null");
        assert!(load_filters(Some(file.path())).unwrap().is_empty());
    }

    #[test]
    fn bad_filter_file_reports_context() {
        let file = filter_file(r#"[{"value": 1}]"#);
        let err = load_filters(Some(file.path())).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.starts_with("Invalid filter list"));
        assert!(message.contains("clause 0"));
    }

    #[test]
    fn missing_filter_file_is_an_error() {
        let err = load_filters(Some(Path::new("/nonexistent/filters.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to open filter file"));
    }

    #[test]
    fn renders_extended_json() {
        let oid = bson::oid::ObjectId::parse_str("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
        let out = render(bson::doc! { "_id": oid }, true).unwrap();
        assert_eq!(out, r#"{"_id":{"$oid":"65a1f0c2e4b0a1b2c3d4e5f6"}}"#);
    }
}
