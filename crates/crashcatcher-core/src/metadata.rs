// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Uploader-supplied crash metadata.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;

/// Free-form form fields sent alongside a dump.
///
/// Each field may carry several values. Persisted as a JSON object of string
/// arrays, e.g. `{"ProductName":["WaterWolf"],"Version":["1.0"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrashMetadata(BTreeMap<String, Vec<String>>);

impl CrashMetadata {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a value to `key`, keeping any values already present.
	pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.0.entry(key.into()).or_default().push(value.into());
	}

	/// All values recorded for `key`.
	pub fn get_all(&self, key: &str) -> &[String] {
		self.0.get(key).map(Vec::as_slice).unwrap_or(&[])
	}

	/// First value recorded for `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.get_all(key).first().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
		self.0.iter()
	}

	pub fn to_json_vec(&self) -> Result<Vec<u8>> {
		Ok(serde_json::to_vec(self)?)
	}

	pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
		Ok(serde_json::from_slice(bytes)?)
	}
}

impl From<BTreeMap<String, Vec<String>>> for CrashMetadata {
	fn from(map: BTreeMap<String, Vec<String>>) -> Self {
		Self(map)
	}
}

impl<K, V> FromIterator<(K, V)> for CrashMetadata
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut metadata = Self::new();
		for (k, v) in iter {
			metadata.append(k, v);
		}
		metadata
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_append_accumulates_values() {
		let mut meta = CrashMetadata::new();
		meta.append("Comments", "first");
		meta.append("Comments", "second");
		assert_eq!(meta.get_all("Comments"), ["first", "second"]);
		assert_eq!(meta.get("Comments"), Some("first"));
		assert_eq!(meta.len(), 1);
	}

	#[test]
	fn test_missing_key() {
		let meta = CrashMetadata::new();
		assert!(meta.get("ProductName").is_none());
		assert!(meta.get_all("ProductName").is_empty());
	}

	#[test]
	fn test_json_shape() {
		let meta: CrashMetadata = [("ProductName", "X"), ("Version", "1.0")].into_iter().collect();
		let json = String::from_utf8(meta.to_json_vec().unwrap()).unwrap();
		assert_eq!(json, r#"{"ProductName":["X"],"Version":["1.0"]}"#);
	}

	#[test]
	fn test_parse_rejects_non_array_values() {
		assert!(CrashMetadata::from_json_slice(br#"{"ProductName":"X"}"#).is_err());
		let meta = CrashMetadata::from_json_slice(br#"{"ProductName":["X","Y"]}"#).unwrap();
		assert_eq!(meta.get_all("ProductName"), ["X", "Y"]);
	}
}
