//! The `splitgroup select` command.

use anyhow::Result;

use splitgroup_core::traits::{RandomSource, SeededRandom, ThreadRandom};
use splitgroup_core::{select_child, GroupChildMap};

pub fn execute(map: String, group: String, children: String, seed: Option<u64>) -> Result<()> {
    let map = GroupChildMap::from_json_string(&map)?;
    let children = super::split_list(&children);

    let random: Box<dyn RandomSource> = match seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom),
    };
    let selection = select_child(&map, &group, &children, random.as_ref())?;

    if selection.repaired {
        eprintln!(
            "note: group {} has no usable mapping, picked {}",
            selection.group_id, selection.child_id
        );
    }
    println!("{}", selection.child_id);

    Ok(())
}
