//! The `splitgroup list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Table;

pub fn execute(partitions: Option<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let (_, partitions) = super::load_partitions(partitions, config)?;

    if partitions.is_empty() {
        println!("No partitions defined. Run `splitgroup init` to create a partition file.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Description", "Groups"]);
    for partition in &partitions {
        let groups = partition
            .groups()
            .iter()
            .map(|g| format!("{}: {}", g.id, g.name))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            partition.id().to_string(),
            partition.name().to_string(),
            partition.description().to_string(),
            groups,
        ]);
    }
    println!("{table}");

    Ok(())
}
