//! The `splitgroup validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(partitions_path: PathBuf) -> Result<()> {
    let defs = splitgroup_core::parser::parse_partition_defs(&partitions_path)?;
    println!(
        "Partition file: {} ({} partitions)",
        partitions_path.display(),
        defs.len()
    );

    let warnings = splitgroup_core::parser::validate_partitions(&defs);
    for w in &warnings {
        let prefix = w
            .partition_id
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All partitions valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
