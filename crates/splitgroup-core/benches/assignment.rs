use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use splitgroup_core::traits::{SeededRandom, TagStore};
use splitgroup_core::{
    select_child, Group, GroupAssignmentEngine, GroupChildMap, Learner, Partition,
    PartitionRegistry, StoreError, TagRef,
};

#[derive(Default)]
struct BenchStore {
    tags: Mutex<HashMap<TagRef, String>>,
}

#[async_trait]
impl TagStore for BenchStore {
    fn name(&self) -> &str {
        "bench"
    }

    async fn get_tag(&self, tag: &TagRef) -> Result<Option<String>, StoreError> {
        Ok(self.tags.lock().unwrap().get(tag).cloned())
    }

    async fn set_tag(&self, tag: &TagRef, value: &str) -> Result<(), StoreError> {
        self.tags
            .lock()
            .unwrap()
            .insert(tag.clone(), value.to_string());
        Ok(())
    }
}

fn make_partition(groups: usize) -> Partition {
    Partition::new(
        0,
        "bench",
        "",
        (0..groups)
            .map(|i| Group::new(i.to_string(), format!("group-{i}")))
            .collect(),
    )
    .unwrap()
}

fn bench_select_child(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_child");
    let random = SeededRandom::new(1);
    let children: Vec<String> = (0..16).map(|i| format!("child-{i}")).collect();
    let map = GroupChildMap::build_for_partition(&make_partition(16), &children);

    group.bench_function("mapped", |b| {
        b.iter(|| select_child(black_box(&map), black_box("3"), &children, &random))
    });

    group.bench_function("fallback", |b| {
        b.iter(|| select_child(black_box(&map), black_box("99"), &children, &random))
    });

    group.finish();
}

fn bench_get_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_group");
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    let registry = PartitionRegistry::new("bench-course", vec![make_partition(4)]).unwrap();
    let engine = GroupAssignmentEngine::new(
        registry,
        Arc::new(BenchStore::default()),
        Arc::new(SeededRandom::new(1)),
    );
    let learner = Learner::identified("bench-user");
    rt.block_on(engine.get_group(&learner, 0)).unwrap();

    group.bench_function("stable_path", |b| {
        b.iter(|| rt.block_on(engine.get_group(black_box(&learner), 0)))
    });

    let mut n = 0u64;
    group.bench_function("fresh_assignment", |b| {
        b.iter(|| {
            n += 1;
            let learner = Learner::identified(format!("user-{n}"));
            rt.block_on(engine.get_group(&learner, 0))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_select_child, bench_get_group);
criterion_main!(benches);
