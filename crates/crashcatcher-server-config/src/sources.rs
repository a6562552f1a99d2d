// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;
use std::str::FromStr;

use crashcatcher_pipeline::AnalyzerFailurePolicy;
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	HttpConfigLayer, LoggingConfigLayer, ProcessingConfigLayer, StorageConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is not an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/crashcatcher/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: `CRASHCATCHER_<FIELD>`, e.g. `CRASHCATCHER_PORT`,
/// `CRASHCATCHER_MAX_CONCURRENT`. `CRASHCATCHER_ANALYZER_ARGS` is split on
/// whitespace.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		load_from_env(|name| std::env::var(name).ok())
	}
}

fn load_from_env<F>(lookup: F) -> Result<ServerConfigLayer, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	let env = Env(lookup);
	Ok(ServerConfigLayer {
		http: Some(HttpConfigLayer {
			host: env.var("CRASHCATCHER_HOST"),
			port: env.parse("CRASHCATCHER_PORT")?,
			max_upload_bytes: env.parse("CRASHCATCHER_MAX_UPLOAD_BYTES")?,
		}),
		storage: Some(StorageConfigLayer {
			data_dir: env.var("CRASHCATCHER_DATA_DIR").map(PathBuf::from),
		}),
		processing: Some(ProcessingConfigLayer {
			analyzer_path: env.var("CRASHCATCHER_ANALYZER_PATH").map(PathBuf::from),
			analyzer_args: env
				.var("CRASHCATCHER_ANALYZER_ARGS")
				.map(|v| v.split_whitespace().map(str::to_string).collect()),
			max_concurrent: env.parse("CRASHCATCHER_MAX_CONCURRENT")?,
			failure_policy: env.failure_policy("CRASHCATCHER_FAILURE_POLICY")?,
			collect_only: env.bool("CRASHCATCHER_COLLECT_ONLY"),
		}),
		logging: Some(LoggingConfigLayer {
			level: env.var("CRASHCATCHER_LOG_LEVEL"),
		}),
	})
}

struct Env<F>(F);

impl<F> Env<F>
where
	F: Fn(&str) -> Option<String>,
{
	fn var(&self, name: &str) -> Option<String> {
		(self.0)(name).filter(|s| !s.is_empty())
	}

	fn bool(&self, name: &str) -> Option<bool> {
		self.var(name)
			.map(|v| v.eq_ignore_ascii_case("true") || v == "1")
	}

	fn parse<T: FromStr>(&self, name: &str) -> Result<Option<T>, ConfigError> {
		match self.var(name) {
			Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid {} value '{v}'", std::any::type_name::<T>()),
			}),
			None => Ok(None),
		}
	}

	fn failure_policy(&self, name: &str) -> Result<Option<AnalyzerFailurePolicy>, ConfigError> {
		match self.var(name) {
			Some(v) => match v.to_lowercase().replace('-', "_").as_str() {
				"retry" => Ok(Some(AnalyzerFailurePolicy::Retry)),
				"best_effort" => Ok(Some(AnalyzerFailurePolicy::BestEffort)),
				_ => Err(ConfigError::InvalidValue {
					key: name.to_string(),
					message: format!("expected 'retry' or 'best_effort', got '{v}'"),
				}),
			},
			None => Ok(None),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> = pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |name| map.get(name).cloned()
	}

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let layer = DefaultsSource.load().unwrap();
		assert!(layer.http.is_none());
		assert!(layer.processing.is_none());
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let source = TomlSource::new("/nonexistent/config.toml");
		let layer = source.load().unwrap();
		assert!(layer.http.is_none());
	}

	#[test]
	fn test_toml_source_reads_sections() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("server.toml");
		std::fs::write(
			&path,
			r#"
[storage]
data_dir = "/srv/crashes"

[processing]
analyzer_path = "/opt/breakpad/minidump_stackwalk"
max_concurrent = 3
"#,
		)
		.unwrap();

		let layer = TomlSource::new(&path).load().unwrap();
		let processing = layer.processing.unwrap();
		assert_eq!(processing.max_concurrent, Some(3));
		assert_eq!(
			layer.storage.unwrap().data_dir,
			Some(PathBuf::from("/srv/crashes"))
		);
	}

	#[test]
	fn test_toml_source_parse_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("server.toml");
		std::fs::write(&path, "[http\nport = ").unwrap();

		let err = TomlSource::new(&path).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}

	#[test]
	fn test_env_values() {
		let layer = load_from_env(env_of(&[
			("CRASHCATCHER_PORT", "9090"),
			("CRASHCATCHER_DATA_DIR", "/data"),
			("CRASHCATCHER_ANALYZER_ARGS", "-m  --verbose"),
			("CRASHCATCHER_FAILURE_POLICY", "best-effort"),
			("CRASHCATCHER_COLLECT_ONLY", "1"),
			("CRASHCATCHER_HOST", ""),
		]))
		.unwrap();

		let http = layer.http.unwrap();
		assert_eq!(http.port, Some(9090));
		assert!(http.host.is_none());

		let processing = layer.processing.unwrap();
		assert_eq!(
			processing.analyzer_args,
			Some(vec!["-m".to_string(), "--verbose".to_string()])
		);
		assert_eq!(
			processing.failure_policy,
			Some(AnalyzerFailurePolicy::BestEffort)
		);
		assert_eq!(processing.collect_only, Some(true));
		assert_eq!(
			layer.storage.unwrap().data_dir,
			Some(PathBuf::from("/data"))
		);
	}

	#[test]
	fn test_env_invalid_number() {
		let err = load_from_env(env_of(&[("CRASHCATCHER_MAX_CONCURRENT", "lots")])).unwrap_err();
		match err {
			ConfigError::InvalidValue { key, .. } => assert_eq!(key, "CRASHCATCHER_MAX_CONCURRENT"),
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn test_env_invalid_policy() {
		let err = load_from_env(env_of(&[("CRASHCATCHER_FAILURE_POLICY", "ignore")])).unwrap_err();
		assert!(err.to_string().contains("CRASHCATCHER_FAILURE_POLICY"));
	}
}
