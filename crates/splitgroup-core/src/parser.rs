//! TOML partition file parser.
//!
//! Loads partition definitions from TOML files and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Group, Partition};

/// Intermediate TOML structure for partition files.
#[derive(Debug, Deserialize)]
struct TomlPartitionFile {
    #[serde(default)]
    partitions: Vec<TomlPartition>,
}

#[derive(Debug, Deserialize)]
struct TomlPartition {
    id: i64,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    groups: Vec<TomlGroup>,
}

#[derive(Debug, Deserialize)]
struct TomlGroup {
    id: String,
    name: String,
}

/// Raw partition definitions as written in a file, before construction checks.
#[derive(Debug, Clone)]
pub struct PartitionDef {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub groups: Vec<Group>,
}

/// Parse a partition file without applying construction checks.
pub fn parse_partition_defs_str(content: &str, source_path: &Path) -> Result<Vec<PartitionDef>> {
    let parsed: TomlPartitionFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    Ok(parsed
        .partitions
        .into_iter()
        .map(|p| PartitionDef {
            id: p.id,
            name: p.name,
            description: p.description,
            groups: p
                .groups
                .into_iter()
                .map(|g| Group::new(g.id, g.name))
                .collect(),
        })
        .collect())
}

/// Read a partition file without applying construction checks.
pub fn parse_partition_defs(path: &Path) -> Result<Vec<PartitionDef>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read partition file: {}", path.display()))?;

    parse_partition_defs_str(&content, path)
}

/// Parse a TOML string into partitions (useful for testing).
pub fn parse_partitions_str(content: &str, source_path: &Path) -> Result<Vec<Partition>> {
    parse_partition_defs_str(content, source_path)?
        .into_iter()
        .map(|def| {
            Partition::new(def.id, def.name, def.description, def.groups)
                .with_context(|| format!("invalid partition in {}", source_path.display()))
        })
        .collect()
}

/// Parse a partition file.
pub fn parse_partitions(path: &Path) -> Result<Vec<Partition>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read partition file: {}", path.display()))?;

    parse_partitions_str(&content, path)
}

/// A warning from partition validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The partition id (if applicable).
    pub partition_id: Option<i64>,
    /// Warning message.
    pub message: String,
}

/// Validate raw partition definitions for common issues.
pub fn validate_partitions(defs: &[PartitionDef]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for def in defs {
        if !seen_ids.insert(def.id) {
            warnings.push(ValidationWarning {
                partition_id: Some(def.id),
                message: format!("duplicate partition ID: {}", def.id),
            });
        }
    }

    for def in defs {
        if def.groups.is_empty() {
            warnings.push(ValidationWarning {
                partition_id: Some(def.id),
                message: "partition has no groups".into(),
            });
        }

        if def.name.trim().is_empty() {
            warnings.push(ValidationWarning {
                partition_id: Some(def.id),
                message: "partition name is empty".into(),
            });
        }

        let mut seen_groups = HashSet::new();
        for group in &def.groups {
            if !seen_groups.insert(group.id.as_str()) {
                warnings.push(ValidationWarning {
                    partition_id: Some(def.id),
                    message: format!("duplicate group ID: {}", group.id),
                });
            }
            if group.id.trim().is_empty() {
                warnings.push(ValidationWarning {
                    partition_id: Some(def.id),
                    message: format!("group {:?} has an empty ID", group.name),
                });
            }
        }
    }

    if defs.is_empty() {
        warnings.push(ValidationWarning {
            partition_id: None,
            message: "no partitions defined".into(),
        });
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[[partitions]]
id = 0
name = "first_partition"
description = "First Partition"
groups = [
    { id = "0", name = "alpha" },
    { id = "1", name = "beta" },
]

[[partitions]]
id = 1
name = "second_partition"
description = "Second Partition"

[[partitions.groups]]
id = "0"
name = "abel"

[[partitions.groups]]
id = "1"
name = "baker"

[[partitions.groups]]
id = "2"
name = "charlie"
"#;

    #[test]
    fn parse_valid_toml() {
        let partitions = parse_partitions_str(VALID_TOML, &PathBuf::from("p.toml")).unwrap();
        assert_eq!(partitions.len(), 2);
        assert_eq!(partitions[0].name(), "first_partition");
        assert_eq!(partitions[1].groups().len(), 3);
        assert_eq!(partitions[1].groups()[2].name, "charlie");
    }

    #[test]
    fn parse_missing_optional_fields() {
        let toml = r#"
[[partitions]]
id = 5
name = "bare"
"#;
        let partitions = parse_partitions_str(toml, &PathBuf::from("p.toml")).unwrap();
        assert_eq!(partitions[0].description(), "");
        assert!(partitions[0].groups().is_empty());
    }

    #[test]
    fn duplicate_group_fails_strict_parse() {
        let toml = r#"
[[partitions]]
id = 0
name = "dupes"
groups = [{ id = "0", name = "a" }, { id = "0", name = "b" }]
"#;
        let err = parse_partitions_str(toml, &PathBuf::from("p.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("duplicate group id"));

        let defs = parse_partition_defs_str(toml, &PathBuf::from("p.toml")).unwrap();
        let warnings = validate_partitions(&defs);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate group")));
    }

    #[test]
    fn validate_duplicate_and_empty() {
        let toml = r#"
[[partitions]]
id = 0
name = "first"

[[partitions]]
id = 0
name = " "
groups = [{ id = "0", name = "a" }]
"#;
        let defs = parse_partition_defs_str(toml, &PathBuf::from("p.toml")).unwrap();
        let warnings = validate_partitions(&defs);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate partition")));
        assert!(warnings.iter().any(|w| w.message.contains("no groups")));
        assert!(warnings.iter().any(|w| w.message.contains("name is empty")));
    }

    #[test]
    fn validate_clean_file_has_no_warnings() {
        let defs = parse_partition_defs_str(VALID_TOML, &PathBuf::from("p.toml")).unwrap();
        assert!(validate_partitions(&defs).is_empty());
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_partitions_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partitions.toml");
        std::fs::write(&path, VALID_TOML).unwrap();

        let partitions = parse_partitions(&path).unwrap();
        assert_eq!(partitions.len(), 2);
        assert!(parse_partitions(&dir.path().join("missing.toml")).is_err());
    }
}
