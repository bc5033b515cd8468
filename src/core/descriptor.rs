//! Typed package descriptor (`package.json`).
//!
//! Known fields are explicit so every consumer checks presence instead of
//! guessing. Anything else is carried through untouched in `extra`. A
//! descriptor read from disk remembers its key order and writes keys back in
//! that order; keys it did not have go after them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::utils::io;

pub const DESCRIPTOR_FILE: &str = "package.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Descriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scripts: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bugs: Option<Bugs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_dependencies: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Top-level key order of the source file; empty for descriptors built
    /// in code.
    #[serde(skip)]
    pub key_order: Vec<String>,
}

/// `author` as a plain string or a person record. Every record key is
/// optional and unknown keys are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Author {
    Name(String),
    Person {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bugs {
    Url(String),
    Tracker {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

/// `repository` field. The npm string shorthand (`"github:owner/project"`)
/// is accepted on input and normalized to a git record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RepositoryRepr")]
pub struct Repository {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RepositoryRepr {
    Shorthand(String),
    Record {
        #[serde(rename = "type", default)]
        kind: Option<String>,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        directory: Option<String>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl From<RepositoryRepr> for Repository {
    fn from(repr: RepositoryRepr) -> Self {
        match repr {
            RepositoryRepr::Shorthand(url) => Repository {
                kind: Some("git".to_string()),
                url: Some(url),
                ..Repository::default()
            },
            RepositoryRepr::Record {
                kind,
                url,
                directory,
                extra,
            } => Repository {
                kind,
                url,
                directory,
                extra,
            },
        }
    }
}

impl Repository {
    pub fn is_git(&self) -> bool {
        self.kind.as_deref() == Some("git")
    }
}

impl Descriptor {
    /// Read a descriptor from `path`. A missing file is an empty descriptor;
    /// a file that exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(Error::internal_io(
                    e.to_string(),
                    Some(format!("read {}", path.display())),
                ))
            }
        };

        Self::parse(&content)
            .map_err(|e| Error::descriptor_invalid_json(path.display().to_string(), e))
    }

    /// Load `package.json` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load(&dir.join(DESCRIPTOR_FILE))
    }

    pub fn parse(content: &str) -> std::result::Result<Self, serde_json::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_str(content)?;
        let key_order = value
            .as_object()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();

        let mut descriptor: Self = serde_json::from_value(value)?;
        descriptor.key_order = key_order;
        Ok(descriptor)
    }

    /// Two-space indented JSON with a trailing newline, keys in source order.
    pub fn to_pretty_json(&self) -> Result<String> {
        let value = Value::Object(self.ordered_fields()?);
        let mut out = serde_json::to_string_pretty(&value).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize package.json".to_string()))
        })?;
        out.push('\n');
        Ok(out)
    }

    fn ordered_fields(&self) -> Result<Map<String, Value>> {
        let mut fields = match self.to_value()? {
            Value::Object(map) => map,
            _ => return Ok(Map::new()),
        };

        let mut ordered = Map::new();
        for key in &self.key_order {
            if let Some(value) = fields.remove(key) {
                ordered.insert(key.clone(), value);
            }
        }
        ordered.extend(fields);
        Ok(ordered)
    }

    /// Nested JSON view, used as the variable tree for template filling.
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| {
            Error::internal_json(e.to_string(), Some("convert package.json".to_string()))
        })
    }

    pub fn save(&self, path: &Path) -> Result<String> {
        let content = self.to_pretty_json()?;
        io::write_file_atomic(path, &content, "write package.json")?;
        Ok(content)
    }

    pub fn repository_url(&self) -> Option<&str> {
        self.repository.as_ref()?.url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        let descriptor = Descriptor::load_from_dir(dir.path()).unwrap();
        assert_eq!(descriptor, Descriptor::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DESCRIPTOR_FILE), "{ \"name\": ").unwrap();

        let err = Descriptor::load_from_dir(dir.path()).unwrap_err();
        assert_eq!(err.code.as_str(), "descriptor.invalid_json");
    }

    fn keys(json: &str) -> Vec<String> {
        let value: Value = serde_json::from_str(json).unwrap();
        value.as_object().unwrap().keys().cloned().collect()
    }

    #[test]
    fn rewrite_keeps_source_key_order() {
        let descriptor = Descriptor::parse(
            r#"{ "private": true, "name": "tool", "dependencies": { "a": "1" }, "config": {} }"#,
        )
        .unwrap();

        assert_eq!(descriptor.name.as_deref(), Some("tool"));
        assert_eq!(descriptor.extra["private"], json!(true));

        let out = descriptor.to_pretty_json().unwrap();
        assert_eq!(keys(&out), vec!["private", "name", "dependencies", "config"]);
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn added_keys_follow_source_keys() {
        let mut descriptor =
            Descriptor::parse(r#"{ "version": "1.0.0", "engines": { "node": ">=18" } }"#).unwrap();
        descriptor.name = Some("tool".to_string());
        descriptor.license = Some("MIT".to_string());

        let out = descriptor.to_pretty_json().unwrap();
        assert_eq!(keys(&out), vec!["version", "engines", "name", "license"]);
    }

    #[test]
    fn record_fields_keep_unknown_keys() {
        let source = r#"{
  "author": { "name": "Ada", "twitter": "@ada" },
  "bugs": { "url": "https://tracker.example", "web": "https://help.example" },
  "repository": { "type": "git", "url": "https://github.com/octo/tool.git", "private": true }
}
"#;
        let descriptor = Descriptor::parse(source).unwrap();
        let out = descriptor.to_pretty_json().unwrap();

        let written: Value = serde_json::from_str(&out).unwrap();
        let original: Value = serde_json::from_str(source).unwrap();
        assert_eq!(written, original);
        assert_eq!(descriptor.repository_url(), Some("https://github.com/octo/tool.git"));
    }

    #[test]
    fn author_record_without_name_is_accepted() {
        let descriptor = Descriptor::parse(r#"{ "author": { "email": "a@b.c" } }"#).unwrap();
        assert!(matches!(
            &descriptor.author,
            Some(Author::Person { name: None, email: Some(email), .. }) if email == "a@b.c"
        ));

        let out = descriptor.to_pretty_json().unwrap();
        let written: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(written, json!({ "author": { "email": "a@b.c" } }));
    }

    #[test]
    fn repository_shorthand_becomes_git_record() {
        let descriptor = Descriptor::parse(r#"{ "repository": "github:octo/tool" }"#).unwrap();
        let repo = descriptor.repository.unwrap();

        assert!(repo.is_git());
        assert_eq!(repo.url.as_deref(), Some("github:octo/tool"));
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let descriptor = Descriptor {
            name: Some("tool".to_string()),
            repository: Some(Repository {
                kind: Some("git".to_string()),
                ..Repository::default()
            }),
            ..Descriptor::default()
        };

        let value: Value = serde_json::from_str(&descriptor.to_pretty_json().unwrap()).unwrap();
        assert_eq!(value, json!({ "name": "tool", "repository": { "type": "git" } }));
    }

    #[test]
    fn author_accepts_string_and_record() {
        let named = Descriptor::parse(r#"{ "author": "Ada" }"#).unwrap();
        assert_eq!(named.author, Some(Author::Name("Ada".to_string())));

        let person =
            Descriptor::parse(r#"{ "author": { "name": "Ada", "url": "https://ada.dev" } }"#)
                .unwrap();
        assert_eq!(
            person.author,
            Some(Author::Person {
                name: Some("Ada".to_string()),
                email: None,
                url: Some("https://ada.dev".to_string()),
                extra: Map::new(),
            })
        );
    }

    #[test]
    fn mapping_order_is_preserved() {
        let descriptor =
            Descriptor::parse(r#"{ "scripts": { "test": "tape", "build": "tsc", "lint": "eslint" } }"#)
                .unwrap();
        let keys: Vec<&str> = descriptor
            .scripts
            .as_ref()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["test", "build", "lint"]);
    }
}
