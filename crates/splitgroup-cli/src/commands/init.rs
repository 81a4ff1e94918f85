//! The `splitgroup init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("splitgroup.toml").exists() {
        println!("splitgroup.toml already exists, skipping.");
    } else {
        std::fs::write("splitgroup.toml", SAMPLE_CONFIG)?;
        println!("Created splitgroup.toml");
    }

    if std::path::Path::new("partitions.toml").exists() {
        println!("partitions.toml already exists, skipping.");
    } else {
        std::fs::write("partitions.toml", SAMPLE_PARTITIONS)?;
        println!("Created partitions.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit partitions.toml with your course's partitions");
    println!("  2. Run: splitgroup validate --partitions partitions.toml");
    println!("  3. Run: splitgroup assign --course demo/course/run --user 42 --partition 0");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# splitgroup configuration

partitions = "partitions.toml"
track_events = true

[store]
type = "file"
path = ".splitgroup/tags.json"
"#;

const SAMPLE_PARTITIONS: &str = r#"[[partitions]]
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
groups = [
    { id = "0", name = "abel" },
    { id = "1", name = "baker" },
    { id = "2", name = "charlie" },
]
"#;
