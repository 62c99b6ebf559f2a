use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use quiz_rules::config::{
	LoadedSettings, PathOverrides, ResolvedPaths, discover_settings, generate_rules_template,
	load_settings, parse_rules_file, resolve_paths,
};
use quiz_rules::rules::{Action, RuleSet, compile_rules};
use quiz_rules::store::{load_records, render_records, save_records};

#[derive(Parser)]
#[command(name = "quiz-rules")]
#[command(
	author,
	version,
	about = "CLI tool for applying declarative rule sets to quiz-question collections"
)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Input records file (JSON array)
	#[arg(long, value_name = "PATH", global = true)]
	source: Option<PathBuf>,

	/// Output records file, overwritten on success
	#[arg(long, value_name = "PATH", global = true)]
	output: Option<PathBuf>,

	/// Rules file (JSON, or TOML with a .toml extension)
	#[arg(long, value_name = "PATH", global = true)]
	rules: Option<PathBuf>,

	/// Settings file to use instead of discovering .quiz-rules.toml
	#[arg(long, value_name = "PATH", global = true)]
	config: Option<PathBuf>,

	/// Reject unknown action types and targets instead of skipping them
	#[arg(long, global = true)]
	strict: bool,

	/// Print the resulting records to stdout instead of writing the output file
	#[arg(long)]
	dry_run: bool,

	/// Create a starter rules file at the rules location
	#[arg(long)]
	init: bool,

	/// Overwrite an existing rules file when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
	#[arg(long, default_value = "warn", global = true)]
	log_level: String,
}

#[derive(Subcommand)]
enum Commands {
	/// Load and compile the rules file without touching any records
	Check,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	init_logging(&cli.log_level);

	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	let loaded = match &cli.config {
		Some(path) => Some(
			load_settings(&cwd.join(path))
				.with_context(|| format!("Failed to load settings: {}", path.display()))?,
		),
		None => discover_settings(&cwd).context("Failed to discover settings")?,
	};

	let overrides = PathOverrides {
		source: cli.source.clone(),
		output: cli.output.clone(),
		rules: cli.rules.clone(),
	};
	let paths = resolve_paths(&cwd, loaded.as_ref(), &overrides);
	let strict = cli.strict || loaded.as_ref().is_some_and(|l| l.settings.strict);

	// Handle --init
	if cli.init {
		return handle_init(&paths.rules, cli.force);
	}

	match cli.command {
		Some(Commands::Check) => handle_check(&paths.rules, strict),
		None => handle_apply(&paths, loaded.as_ref(), strict, cli.dry_run),
	}
}

/// Install the stderr subscriber. `RUST_LOG` wins over `--log-level`.
fn init_logging(level: &str) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

	tracing_subscriber::registry()
		.with(filter)
		.with(fmt::layer().with_writer(std::io::stderr).compact())
		.init();
}

fn handle_init(rules_path: &Path, force: bool) -> Result<ExitCode> {
	if rules_path.exists() && !force {
		anyhow::bail!(
			"{} already exists. Use --force to overwrite.",
			rules_path.display()
		);
	}

	std::fs::write(rules_path, generate_rules_template())
		.with_context(|| format!("Failed to write {}", rules_path.display()))?;

	println!("Created {}", rules_path.display());
	Ok(ExitCode::SUCCESS)
}

fn load_rules(rules_path: &Path, strict: bool) -> Result<RuleSet> {
	let file = parse_rules_file(rules_path).context("Failed to load rules")?;
	compile_rules(&file, strict)
		.with_context(|| format!("Failed to compile rules: {}", rules_path.display()))
}

fn handle_check(rules_path: &Path, strict: bool) -> Result<ExitCode> {
	let rules = load_rules(rules_path, strict)?;

	println!(
		"Rules file is valid: {} ({} actions)",
		rules_path.display(),
		rules.actions.len()
	);

	for (i, action) in rules.actions.iter().enumerate() {
		match action {
			Action::Add { records } => {
				println!("  {}. add: {} records", i + 1, records.len());
			}
			Action::Delete { condition } => {
				println!("  {}. delete: {} conditions", i + 1, condition.predicates().len());
			}
			Action::TextReplace { condition, edit } => {
				println!(
					"  {}. text_replace: {} conditions, {} replacements",
					i + 1,
					condition.predicates().len(),
					edit.replacements().len()
				);
			}
			Action::SetFields { condition, set } => {
				println!(
					"  {}. set_fields: {} conditions, {} fields",
					i + 1,
					condition.predicates().len(),
					set.fields().len()
				);
			}
		}
	}

	match &rules.migration {
		Some(migration) => println!(
			"  structureMigration: {} renames, {} drops, {} defaults",
			migration.renames().len(),
			migration.drops().len(),
			migration.defaults().len()
		),
		None => println!("  structureMigration: none"),
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_apply(
	paths: &ResolvedPaths,
	loaded: Option<&LoadedSettings>,
	strict: bool,
	dry_run: bool,
) -> Result<ExitCode> {
	if let Some(loaded) = loaded {
		tracing::debug!(settings = %loaded.path.display(), "using settings file");
	}

	// Rules first, so a bad pattern fails before any records are read.
	let rules = load_rules(&paths.rules, strict)?;

	let records = load_records(&paths.source).context("Failed to load records")?;

	let outcome = quiz_rules::engine::run(records, &rules);

	if dry_run {
		let rendered = render_records(&outcome.records)?;
		print!("{rendered}");
		eprintln!("Dry run: {} records not written", outcome.report.output);
		return Ok(ExitCode::SUCCESS);
	}

	save_records(&paths.output, &outcome.records).context("Failed to save records")?;

	println!(
		"Wrote {} records to {}",
		outcome.report.output,
		paths.output.display()
	);
	Ok(ExitCode::SUCCESS)
}
