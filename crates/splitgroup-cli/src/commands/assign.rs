//! The `splitgroup assign` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use splitgroup_core::traits::{LogTracker, RandomSource, SeededRandom, ThreadRandom};
use splitgroup_core::{GroupAssignmentEngine, Learner, PartitionRegistry, StaticPartitionSource};
use splitgroup_store::{create_store, StoreConfig};

pub async fn execute(
    course: String,
    user: String,
    partition_id: i64,
    partitions: Option<PathBuf>,
    store_path: Option<PathBuf>,
    seed: Option<u64>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (mut config, partitions) = super::load_partitions(partitions, config_path)?;
    if let Some(path) = store_path {
        config.store = StoreConfig::File { path };
    }

    let source = StaticPartitionSource::new(partitions);
    let registry = PartitionRegistry::from_source(&source, &course)?;
    let store = create_store(&config.store);
    tracing::debug!(store = store.name(), "using tag store");

    let random: Arc<dyn RandomSource> = match seed.or(config.seed) {
        Some(seed) => Arc::new(SeededRandom::new(seed)),
        None => Arc::new(ThreadRandom),
    };
    let mut engine = GroupAssignmentEngine::new(registry, store, random);
    if config.track_events {
        engine = engine.with_tracker(Arc::new(LogTracker));
    }

    let group_id = engine
        .get_group(&Learner::identified(user), partition_id)
        .await?;
    println!("{group_id}");

    Ok(())
}
