// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the crashcatcher server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`CRASHCATCHER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use crashcatcher_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub storage: StorageConfig,
	pub processing: ProcessingConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`CRASHCATCHER_*`)
/// 2. Config file (`/etc/crashcatcher/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	];
	load_from_sources(sources)
}

/// Load configuration with a custom config file path in place of the system one.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	];
	load_from_sources(sources)
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let config = ServerConfig {
		http: layer.http.unwrap_or_default().finalize(),
		storage: layer.storage.unwrap_or_default().finalize(),
		processing: layer.processing.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
	};

	validate_config(&config)?;

	info!(
		host = %config.http.host,
		port = config.http.port,
		data_dir = %config.storage.data_dir.display(),
		analyzer = %config.processing.analyzer_path.display(),
		max_concurrent = config.processing.max_concurrent,
		failure_policy = %config.processing.failure_policy,
		collect_only = config.processing.collect_only,
		"Server configuration loaded"
	);

	Ok(config)
}

/// Validate cross-field configuration rules.
fn validate_config(config: &ServerConfig) -> Result<(), ConfigError> {
	if config.processing.max_concurrent == 0 {
		return Err(ConfigError::validation(
			"processing.max_concurrent must be at least 1",
		));
	}
	if config.processing.analyzer_path.as_os_str().is_empty() {
		return Err(ConfigError::validation(
			"processing.analyzer_path must not be empty",
		));
	}
	if config.http.max_upload_bytes == 0 {
		return Err(ConfigError::validation(
			"http.max_upload_bytes must be greater than zero",
		));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use std::path::PathBuf;

	#[test]
	fn test_finalize_empty_layer_uses_defaults() {
		let config = finalize(ServerConfigLayer::default()).unwrap();
		assert_eq!(config, ServerConfig::default());
		assert_eq!(config.socket_addr(), "0.0.0.0:8080");
	}

	#[test]
	fn test_zero_concurrency_rejected() {
		let layer = ServerConfigLayer {
			processing: Some(ProcessingConfigLayer {
				max_concurrent: Some(0),
				..Default::default()
			}),
			..Default::default()
		};
		let err = finalize(layer).unwrap_err();
		assert!(err.to_string().contains("max_concurrent"));
	}

	#[test]
	fn test_empty_analyzer_path_rejected() {
		let layer = ServerConfigLayer {
			processing: Some(ProcessingConfigLayer {
				analyzer_path: Some(PathBuf::new()),
				..Default::default()
			}),
			..Default::default()
		};
		assert!(matches!(
			finalize(layer).unwrap_err(),
			ConfigError::Validation(_)
		));
	}

	#[test]
	fn test_file_overrides_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("server.toml");
		std::fs::write(
			&path,
			r#"
[http]
port = 9000

[processing]
failure_policy = "best_effort"
"#,
		)
		.unwrap();

		let sources: Vec<Box<dyn ConfigSource>> =
			vec![Box::new(DefaultsSource), Box::new(TomlSource::new(&path))];
		let config = load_from_sources(sources).unwrap();
		assert_eq!(config.http.port, 9000);
		assert_eq!(config.http.host, "0.0.0.0");
		assert_eq!(
			config.processing.failure_policy,
			crashcatcher_pipeline::AnalyzerFailurePolicy::BestEffort
		);
	}

	proptest! {
		#[test]
		fn prop_socket_addr_format(host in "[a-z0-9.]{1,20}", port in 1u16..=u16::MAX) {
			let config = ServerConfig {
				http: HttpConfig {
					host: host.clone(),
					port,
					..Default::default()
				},
				..Default::default()
			};
			prop_assert_eq!(config.socket_addr(), format!("{host}:{port}"));
		}

		#[test]
		fn prop_any_positive_concurrency_accepted(n in 1usize..1024) {
			let layer = ServerConfigLayer {
				processing: Some(ProcessingConfigLayer {
					max_concurrent: Some(n),
					..Default::default()
				}),
				..Default::default()
			};
			let config = finalize(layer).unwrap();
			prop_assert_eq!(config.processing.max_concurrent, n);
		}
	}
}
