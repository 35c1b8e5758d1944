use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml::Value;

/// Name of the static metadata file expected at the project root.
pub const METADATA_FILE: &str = "about.toml";

/// The six descriptive fields every project must declare.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "title",
    "version",
    "description",
    "author",
    "author_email",
    "url",
];

/// Descriptive metadata for one project, loaded fresh on every invocation
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMeta {
    pub title: String,
    pub version: String,
    pub description: String,
    pub author: String,
    pub author_email: String,
    pub url: String,
    /// Relative paths of executable scripts to ship, in declaration order.
    pub scripts: Vec<String>,
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not valid TOML: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid metadata in {}: {}", .path.display(), .issues.join("; "))]
    Invalid { path: PathBuf, issues: Vec<String> },
}

/// Loads and validates `about.toml` from the project root.
///
/// Validation is exhaustive: every missing or malformed field is collected
/// and reported in a single error instead of failing on the first lookup.
/// No field is ever defaulted.
pub fn load_metadata(project_dir: &Path) -> Result<ProjectMeta, MetadataError> {
    let path = project_dir.join(METADATA_FILE);
    let contents = fs::read_to_string(&path).map_err(|source| MetadataError::Read {
        path: path.clone(),
        source,
    })?;
    let table: toml::Table = toml::from_str(&contents).map_err(|source| MetadataError::Parse {
        path: path.clone(),
        source,
    })?;

    let mut issues = Vec::new();

    let mut string_field = |name: &str| -> Option<String> {
        match table.get(name) {
            None => {
                issues.push(format!("missing required field `{name}`"));
                None
            }
            Some(Value::String(value)) => {
                if value.trim().is_empty() {
                    issues.push(format!("field `{name}` must not be empty"));
                    None
                } else {
                    Some(value.clone())
                }
            }
            Some(other) => {
                issues.push(format!(
                    "field `{name}` must be a string, found {}",
                    type_name(other)
                ));
                None
            }
        }
    };

    let title = string_field("title");
    let version = string_field("version");
    let description = string_field("description");
    let author = string_field("author");
    let author_email = string_field("author_email");
    let url = string_field("url");

    if let Some(version) = &version
        && let Err(err) = semver::Version::parse(version)
    {
        issues.push(format!("field `version` is not a valid version: {err}"));
    }

    let scripts = match table.get("scripts") {
        None => Some(Vec::new()),
        Some(Value::Array(entries)) => {
            let mut scripts = Vec::with_capacity(entries.len());
            let mut ok = true;
            for (index, entry) in entries.iter().enumerate() {
                match entry {
                    Value::String(path) if !path.trim().is_empty() => {
                        scripts.push(path.clone());
                    }
                    _ => {
                        issues.push(format!("scripts[{index}] must be a non-empty string"));
                        ok = false;
                    }
                }
            }
            ok.then_some(scripts)
        }
        Some(other) => {
            issues.push(format!(
                "field `scripts` must be an array of strings, found {}",
                type_name(other)
            ));
            None
        }
    };

    for key in table.keys() {
        if !REQUIRED_FIELDS.contains(&key.as_str()) && key != "scripts" {
            issues.push(format!("unknown field `{key}`"));
        }
    }

    if !issues.is_empty() {
        return Err(MetadataError::Invalid { path, issues });
    }

    Ok(ProjectMeta {
        title: title.unwrap_or_default(),
        version: version.unwrap_or_default(),
        description: description.unwrap_or_default(),
        author: author.unwrap_or_default(),
        author_email: author_email.unwrap_or_default(),
        url: url.unwrap_or_default(),
        scripts: scripts.unwrap_or_default(),
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "a string",
        Value::Integer(_) => "an integer",
        Value::Float(_) => "a float",
        Value::Boolean(_) => "a boolean",
        Value::Datetime(_) => "a datetime",
        Value::Array(_) => "an array",
        Value::Table(_) => "a table",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
title = "selfie"
version = "0.1.0"
description = "take a snapshot of the current directory"
author = "Jess Example"
author_email = "jess@example.com"
url = "https://example.com/selfie"
scripts = ["scripts/selfie"]
"#;

    fn write_metadata(dir: &Path, contents: &str) {
        fs::write(dir.join(METADATA_FILE), contents).expect("write about.toml");
    }

    #[test]
    fn full_metadata_round_trips_literal_values() {
        let temp = tempfile::tempdir().expect("temp dir");
        write_metadata(temp.path(), FULL);

        let meta = load_metadata(temp.path()).expect("metadata loads");
        assert_eq!(meta.title, "selfie");
        assert_eq!(meta.version, "0.1.0");
        assert_eq!(meta.description, "take a snapshot of the current directory");
        assert_eq!(meta.author, "Jess Example");
        assert_eq!(meta.author_email, "jess@example.com");
        assert_eq!(meta.url, "https://example.com/selfie");
        assert_eq!(meta.scripts, vec!["scripts/selfie".to_string()]);
    }

    #[test]
    fn loading_twice_yields_identical_records() {
        let temp = tempfile::tempdir().expect("temp dir");
        write_metadata(temp.path(), FULL);

        let first = load_metadata(temp.path()).expect("first load");
        let second = load_metadata(temp.path()).expect("second load");
        assert_eq!(first, second);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let temp = tempfile::tempdir().expect("temp dir");
        let err = load_metadata(temp.path()).expect_err("should fail");
        assert!(matches!(err, MetadataError::Read { .. }));
    }

    #[test]
    fn every_missing_field_is_named_at_once() {
        let temp = tempfile::tempdir().expect("temp dir");
        write_metadata(
            temp.path(),
            "title = \"selfie\"\nversion = \"0.1.0\"\ndescription = \"d\"\nauthor = \"a\"\n",
        );

        let err = load_metadata(temp.path()).expect_err("should fail");
        let MetadataError::Invalid { issues, .. } = err else {
            panic!("expected Invalid, got {err:?}");
        };
        assert_eq!(issues.len(), 2);
        assert!(issues[0].contains("`author_email`"));
        assert!(issues[1].contains("`url`"));
    }

    #[test]
    fn malformed_fields_are_collected_alongside_missing_ones() {
        let temp = tempfile::tempdir().expect("temp dir");
        write_metadata(
            temp.path(),
            "title = 7\nversion = \"not-a-version\"\ndescription = \"d\"\nauthor = \"a\"\nauthor_email = \"e\"\nurl = \"u\"\n",
        );

        let err = load_metadata(temp.path()).expect_err("should fail");
        let MetadataError::Invalid { issues, .. } = err else {
            panic!("expected Invalid, got {err:?}");
        };
        assert!(issues.iter().any(|issue| issue.contains("`title`")));
        assert!(
            issues
                .iter()
                .any(|issue| issue.contains("`version` is not a valid version"))
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let temp = tempfile::tempdir().expect("temp dir");
        write_metadata(temp.path(), &format!("{FULL}maintainer = \"m\"\n"));

        let err = load_metadata(temp.path()).expect_err("should fail");
        assert!(err.to_string().contains("unknown field `maintainer`"));
    }

    #[test]
    fn scripts_default_to_empty() {
        let temp = tempfile::tempdir().expect("temp dir");
        let without_scripts = FULL
            .lines()
            .filter(|line| !line.starts_with("scripts"))
            .collect::<Vec<_>>()
            .join("\n");
        write_metadata(temp.path(), &without_scripts);

        let meta = load_metadata(temp.path()).expect("metadata loads");
        assert!(meta.scripts.is_empty());
    }
}
