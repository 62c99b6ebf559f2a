use crate::config::parser::parse_settings_file;
use crate::config::types::LoadedSettings;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the project settings file.
pub const SETTINGS_FILE_NAME: &str = ".quiz-rules.toml";

/// Default input records file.
pub const DEFAULT_SOURCE: &str = "data/questions.source.json";

/// Default output records file.
pub const DEFAULT_OUTPUT: &str = "data/questions.json";

/// Default rules file.
pub const DEFAULT_RULES: &str = "rules.json";

/// Find the nearest `.quiz-rules.toml`, walking up from `start_dir`.
///
/// The nearest file wins; files further up are not merged into it.
pub fn discover_settings(start_dir: &Path) -> Result<Option<LoadedSettings>> {
	let mut current_dir = start_dir.to_path_buf();

	loop {
		let settings_path = current_dir.join(SETTINGS_FILE_NAME);

		if settings_path.is_file() {
			return load_settings(&settings_path).map(Some);
		}

		if let Some(parent) = current_dir.parent() {
			current_dir = parent.to_path_buf();
		} else {
			return Ok(None);
		}
	}
}

/// Load settings from an explicit path.
pub fn load_settings(path: &Path) -> Result<LoadedSettings> {
	let settings = parse_settings_file(path)?;
	debug!(path = %path.display(), "loaded settings");
	Ok(LoadedSettings {
		settings,
		path: path.to_path_buf(),
	})
}

/// Locations overridden on the command line.
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
	pub source: Option<PathBuf>,
	pub output: Option<PathBuf>,
	pub rules: Option<PathBuf>,
}

/// Fully resolved locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
	pub source: PathBuf,
	pub output: PathBuf,
	pub rules: PathBuf,
}

/// Resolve the three run locations.
///
/// Precedence is command line, then settings file, then the built-in default.
/// Command-line and default paths are relative to `cwd`; paths from a settings
/// file are relative to the directory containing that file.
pub fn resolve_paths(
	cwd: &Path,
	loaded: Option<&LoadedSettings>,
	overrides: &PathOverrides,
) -> ResolvedPaths {
	let settings_dir = loaded
		.and_then(|l| l.path.parent())
		.map(Path::to_path_buf)
		.unwrap_or_else(|| cwd.to_path_buf());

	let settings = loaded.map(|l| &l.settings);

	ResolvedPaths {
		source: pick(
			cwd,
			&settings_dir,
			overrides.source.as_ref(),
			settings.and_then(|s| s.source.as_ref()),
			DEFAULT_SOURCE,
		),
		output: pick(
			cwd,
			&settings_dir,
			overrides.output.as_ref(),
			settings.and_then(|s| s.output.as_ref()),
			DEFAULT_OUTPUT,
		),
		rules: pick(
			cwd,
			&settings_dir,
			overrides.rules.as_ref(),
			settings.and_then(|s| s.rules.as_ref()),
			DEFAULT_RULES,
		),
	}
}

fn pick(
	cwd: &Path,
	settings_dir: &Path,
	cli: Option<&PathBuf>,
	from_file: Option<&PathBuf>,
	default: &str,
) -> PathBuf {
	match (cli, from_file) {
		(Some(path), _) => cwd.join(path),
		(None, Some(path)) => settings_dir.join(path),
		(None, None) => cwd.join(default),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::types::Settings;
	use std::fs;

	#[test]
	fn test_discover_settings_none() {
		let temp_dir = tempfile::tempdir().unwrap();
		let nested = temp_dir.path().join("a/b");
		fs::create_dir_all(&nested).unwrap();

		// Parent directories of the temp dir are not expected to carry a settings file.
		let found = discover_settings(&nested).unwrap();
		assert!(found.is_none_or(|l| !l.path.starts_with(temp_dir.path())));
	}

	#[test]
	fn test_discover_settings_walks_up() {
		let temp_dir = tempfile::tempdir().unwrap();
		let nested = temp_dir.path().join("a/b");
		fs::create_dir_all(&nested).unwrap();
		fs::write(
			temp_dir.path().join(SETTINGS_FILE_NAME),
			"rules = \"conf/rules.json\"\nstrict = true\n",
		)
		.unwrap();

		let loaded = discover_settings(&nested).unwrap().unwrap();
		assert_eq!(loaded.path, temp_dir.path().join(SETTINGS_FILE_NAME));
		assert!(loaded.settings.strict);
		assert_eq!(loaded.settings.rules, Some(PathBuf::from("conf/rules.json")));
	}

	#[test]
	fn test_discover_settings_nearest_wins() {
		let temp_dir = tempfile::tempdir().unwrap();
		let nested = temp_dir.path().join("a");
		fs::create_dir_all(&nested).unwrap();
		fs::write(temp_dir.path().join(SETTINGS_FILE_NAME), "strict = true\n").unwrap();
		fs::write(nested.join(SETTINGS_FILE_NAME), "strict = false\n").unwrap();

		let loaded = discover_settings(&nested).unwrap().unwrap();
		assert_eq!(loaded.path, nested.join(SETTINGS_FILE_NAME));
		assert!(!loaded.settings.strict);
	}

	#[test]
	fn test_invalid_settings_file() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join(SETTINGS_FILE_NAME);
		fs::write(&path, "strict = [[[").unwrap();

		assert!(load_settings(&path).is_err());
	}

	#[test]
	fn test_resolve_paths_defaults() {
		let cwd = Path::new("/work");
		let paths = resolve_paths(cwd, None, &PathOverrides::default());

		assert_eq!(paths.source, PathBuf::from("/work/data/questions.source.json"));
		assert_eq!(paths.output, PathBuf::from("/work/data/questions.json"));
		assert_eq!(paths.rules, PathBuf::from("/work/rules.json"));
	}

	#[test]
	fn test_resolve_paths_precedence() {
		let cwd = Path::new("/work/sub");
		let loaded = LoadedSettings {
			settings: Settings {
				source: Some(PathBuf::from("in.json")),
				output: Some(PathBuf::from("out.json")),
				rules: None,
				strict: false,
			},
			path: PathBuf::from("/work/.quiz-rules.toml"),
		};
		let overrides = PathOverrides {
			output: Some(PathBuf::from("cli-out.json")),
			..Default::default()
		};

		let paths = resolve_paths(cwd, Some(&loaded), &overrides);

		assert_eq!(paths.source, PathBuf::from("/work/in.json"));
		assert_eq!(paths.output, PathBuf::from("/work/sub/cli-out.json"));
		assert_eq!(paths.rules, PathBuf::from("/work/sub/rules.json"));
	}
}
