//! The `splitgroup export` command.

use std::path::PathBuf;

use anyhow::Result;

use splitgroup_core::{PartitionRegistry, SplitTest};

pub fn execute(
    partition_id: i64,
    children: String,
    partitions: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    let (_, partitions) = super::load_partitions(partitions, config)?;
    let registry = PartitionRegistry::new("", partitions)?;
    let partition = registry.get_partition(partition_id)?;

    let children = super::split_list(&children);
    if children.len() != partition.groups().len() {
        tracing::warn!(
            "partition {} has {} groups but {} children were given",
            partition_id,
            partition.groups().len(),
            children.len()
        );
    }

    let node = SplitTest::author(partition, children);
    println!("{}", serde_json::to_string_pretty(&node.to_attributes())?);

    Ok(())
}
