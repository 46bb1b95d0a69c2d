use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use scribe_config::ScribeConfig;
use scribe_refactor::{
    find_text_occurrences, locate_references, preview_rename, BatchOffsetRenamer, DocumentId,
    Occurrence, OccurrenceOrder, RenameOptions, RenamePreview, SearchResult,
};
use scribe_workbench::{Condition, WorkbenchSnapshot};
use scribe_cli::DiskWorkspace;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scribe", version, about = "Scribe CLI (rename, references, conditions)")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rename every whole-word occurrence of a symbol across files
    Rename(RenameArgs),
    /// List whole-word occurrences of a symbol
    References(ReferencesArgs),
    /// Evaluate a workbench condition against a saved snapshot
    Condition(ConditionArgs),
}

#[derive(Args)]
struct RenameArgs {
    /// Current name of the symbol
    name: String,
    /// New name for the symbol
    #[arg(long)]
    to: String,
    /// Files to rename in
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Print a unified diff instead of writing files
    #[arg(long)]
    dry_run: bool,
    /// Replace occurrences in the order they were found instead of sorting them
    #[arg(long)]
    keep_order: bool,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ReferencesArgs {
    /// Symbol to search for
    name: String,
    /// Files to search
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ConditionArgs {
    /// JSON workbench snapshot
    #[arg(long)]
    state: PathBuf,
    /// Condition name, e.g. `OpenWindowState`
    name: String,
    /// Condition properties as KEY=VALUE
    properties: Vec<String>,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct SkippedReport {
    #[serde(flatten)]
    occurrence: Occurrence,
    reason: String,
}

#[derive(Serialize)]
struct RenameReport {
    name: String,
    new_name: String,
    dry_run: bool,
    replaced: usize,
    touched: Vec<DocumentId>,
    written: usize,
    skipped: Vec<SkippedReport>,
    unreadable: Vec<String>,
    preview: RenamePreview,
}

#[derive(Serialize)]
struct ConditionReport {
    name: String,
    result: bool,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let (config, config_path) =
        scribe_config::load_for_workspace(&cwd).context("failed to load scribe config")?;
    scribe_config::init_tracing(&config.logging);
    if let Some(path) = config_path {
        tracing::debug!(target: "scribe.cli", path = %path.display(), "loaded config");
    }

    match cli.command {
        Command::Rename(args) => rename(&config, args),
        Command::References(args) => references(args),
        Command::Condition(args) => condition(args),
    }
}

fn rename(config: &ScribeConfig, args: RenameArgs) -> Result<i32> {
    let mut workspace = DiskWorkspace::new();
    let mut occurrences = Vec::new();
    let mut unreadable = Vec::new();
    let mut seen = BTreeSet::new();

    for path in &args.files {
        let id = workspace.add(path);
        if !seen.insert(id.clone()) {
            continue;
        }
        match workspace.text(&id) {
            Ok(text) => occurrences.extend(find_text_occurrences(&id, text, &args.name)),
            Err(err) => {
                tracing::warn!(target: "scribe.cli", document = %id, error = %err, "cannot read file");
                unreadable.push(err.to_string());
            }
        }
    }

    let order = if args.keep_order || config.rename.keep_input_order {
        OccurrenceOrder::Input
    } else {
        OccurrenceOrder::Sorted
    };
    let outcome = BatchOffsetRenamer::new(RenameOptions { order })
        .rename_all(&occurrences, &args.to, &mut workspace)
        .with_context(|| format!("failed to rename `{}` to `{}`", args.name, args.to))?;

    let preview = preview_rename(&workspace.original_texts(), &workspace.current_texts());
    let written = if args.dry_run {
        0
    } else {
        workspace.write_back(&outcome.touched)?
    };

    let exit = if outcome.is_complete() && unreadable.is_empty() {
        0
    } else {
        1
    };

    let report = RenameReport {
        name: args.name,
        new_name: args.to,
        dry_run: args.dry_run,
        replaced: outcome.replaced,
        touched: outcome.touched.into_iter().collect(),
        written,
        skipped: outcome
            .skipped
            .into_iter()
            .map(|skipped| SkippedReport {
                reason: skipped.reason.to_string(),
                occurrence: skipped.occurrence,
            })
            .collect(),
        unreadable,
        preview,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(exit);
    }

    if report.dry_run {
        for file in &report.preview.files {
            print!("{}", file.unified_diff);
        }
    }
    println!(
        "renamed {} occurrence(s) of `{}` to `{}` in {} file(s){}",
        report.replaced,
        report.name,
        report.new_name,
        report.preview.total_files,
        if report.dry_run { " (dry run)" } else { "" }
    );
    for skipped in &report.skipped {
        eprintln!(
            "skipped {}:{}: {}",
            skipped.occurrence.document, skipped.occurrence.offset, skipped.reason
        );
    }
    for err in &report.unreadable {
        eprintln!("skipped {err}");
    }

    Ok(exit)
}

fn references(args: ReferencesArgs) -> Result<i32> {
    let mut texts = BTreeMap::new();
    let mut occurrences = Vec::new();
    let mut unreadable = Vec::new();

    for path in &args.files {
        let id = DocumentId::new(path.display().to_string());
        if texts.contains_key(&id) {
            continue;
        }
        match std::fs::read_to_string(path) {
            Ok(text) => {
                occurrences.extend(find_text_occurrences(&id, &text, &args.name));
                texts.insert(id, text);
            }
            Err(err) => {
                tracing::warn!(target: "scribe.cli", document = %id, error = %err, "cannot read file");
                unreadable.push(format!("{id}: {err}"));
            }
        }
    }

    let results: Vec<SearchResult> = locate_references(&occurrences, &texts);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            println!(
                "{}:{}:{}: {}",
                result.document,
                result.line + 1,
                result.column + 1,
                result.line_text.trim_end()
            );
        }
    }
    for err in &unreadable {
        eprintln!("skipped {err}");
    }

    Ok(if results.is_empty() || !unreadable.is_empty() {
        1
    } else {
        0
    })
}

fn condition(args: ConditionArgs) -> Result<i32> {
    let state = std::fs::read_to_string(&args.state)
        .with_context(|| format!("failed to read {}", args.state.display()))?;
    let snapshot: WorkbenchSnapshot = serde_json::from_str(&state)
        .with_context(|| format!("invalid workbench snapshot {}", args.state.display()))?;

    let mut properties = BTreeMap::new();
    for pair in &args.properties {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("expected KEY=VALUE, got `{pair}`");
        };
        properties.insert(key.trim().to_ascii_lowercase(), value.to_string());
    }

    let condition = Condition::from_properties(&args.name, &properties)
        .with_context(|| format!("invalid condition `{}`", args.name))?;
    let result = condition.evaluate(&snapshot);

    if args.json {
        let report = ConditionReport {
            name: args.name,
            result,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{result}");
    }

    Ok(if result { 0 } else { 1 })
}
