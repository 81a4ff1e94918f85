pub mod assign;
pub mod export;
pub mod init;
pub mod list;
pub mod select;
pub mod validate;

use std::path::PathBuf;

use anyhow::Result;

use splitgroup_core::Partition;
use splitgroup_store::SplitgroupConfig;

/// Load the config, then the partitions it (or the override) points at.
pub(crate) fn load_partitions(
    partitions: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<(SplitgroupConfig, Vec<Partition>)> {
    let config = splitgroup_store::load_config_from(config.as_deref())?;
    let path = partitions.unwrap_or_else(|| config.partitions.clone());
    let partitions = splitgroup_core::parser::parse_partitions(&path)?;
    Ok((config, partitions))
}

/// Split a comma-separated list, dropping blanks.
pub(crate) fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
