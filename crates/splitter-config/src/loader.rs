//! Configuration loader handling `include` directives.
//!
//! The main file may name other files under `include`; their top-level
//! tables are merged into it. A section may only be defined once across all
//! files, a file may only be read once and included files cannot include
//! further files.

use crate::{resolve_env_vars, Config, ConfigError};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Loads a configuration spread over several TOML files.
pub struct ConfigLoader {
	base_dir: PathBuf,
	/// Canonical paths already read.
	visited: HashSet<PathBuf>,
	/// File that defined each top-level section.
	owners: HashMap<String, PathBuf>,
}

impl ConfigLoader {
	/// Loader resolving relative paths against `base_dir`.
	pub fn new(base_dir: impl AsRef<Path>) -> Self {
		Self {
			base_dir: base_dir.as_ref().to_path_buf(),
			visited: HashSet::new(),
			owners: HashMap::new(),
		}
	}

	/// Reads `path` and its includes into a validated `Config`.
	pub async fn load_config(&mut self, path: impl AsRef<Path>) -> Result<Config, ConfigError> {
		let root_path = self.locate(path.as_ref())?;
		let mut root = self.read_table(&root_path).await?;
		let includes = take_includes(&mut root)?;
		self.claim_sections(&root, &root_path)?;

		for include in includes {
			let include_path = self.locate(&include)?;
			let table = self.read_table(&include_path).await?;
			if table.contains_key("include") {
				return Err(ConfigError::Validation(format!(
					"{} is included and cannot include other files",
					include_path.display()
				)));
			}
			self.claim_sections(&table, &include_path)?;
			root.extend(table);
		}

		let config: Config = toml::Value::Table(root).try_into()?;
		config.validate()?;
		Ok(config)
	}

	/// Reads a file once, substitutes environment variables and parses it.
	async fn read_table(&mut self, path: &Path) -> Result<toml::Table, ConfigError> {
		let canonical = path.canonicalize()?;
		if !self.visited.insert(canonical.clone()) {
			return Err(ConfigError::Validation(format!(
				"Circular include detected: {} was already loaded",
				canonical.display()
			)));
		}

		let raw = tokio::fs::read_to_string(path).await?;
		let resolved = resolve_env_vars(&raw)?;
		Ok(toml::from_str(&resolved)?)
	}

	/// Records the sections of `table` as defined by `source`.
	fn claim_sections(&mut self, table: &toml::Table, source: &Path) -> Result<(), ConfigError> {
		for section in table.keys() {
			if let Some(owner) = self.owners.get(section) {
				return Err(ConfigError::Validation(format!(
					"Duplicate section '{}' found in {} and {}",
					section,
					owner.display(),
					source.display()
				)));
			}
			self.owners.insert(section.clone(), source.to_path_buf());
		}
		Ok(())
	}

	fn locate(&self, path: &Path) -> Result<PathBuf, ConfigError> {
		let full = if path.is_absolute() {
			path.to_path_buf()
		} else {
			self.base_dir.join(path)
		};

		if !full.is_file() {
			return Err(ConfigError::Io(std::io::Error::new(
				std::io::ErrorKind::NotFound,
				format!("Configuration file not found: {}", full.display()),
			)));
		}
		Ok(full)
	}
}

/// Removes the `include` key, accepting a single path or a list of paths.
fn take_includes(table: &mut toml::Table) -> Result<Vec<PathBuf>, ConfigError> {
	match table.remove("include") {
		None => Ok(Vec::new()),
		Some(toml::Value::String(path)) => Ok(vec![PathBuf::from(path)]),
		Some(toml::Value::Array(items)) => items
			.into_iter()
			.map(|item| match item {
				toml::Value::String(path) => Ok(PathBuf::from(path)),
				_ => Err(ConfigError::Validation(
					"include must contain only strings".into(),
				)),
			})
			.collect(),
		Some(_) => Err(ConfigError::Validation(
			"include must be a string or an array of strings".into(),
		)),
	}
}
