#![allow(dead_code)]

use dehacked_engine::{MemoryWorld, PatchEngine, world_from_descriptor};

pub const SUPPORT: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../dat/dehsupp.txt"));

pub fn classic_world() -> MemoryWorld {
    world_from_descriptor(SUPPORT).expect("shipped descriptor")
}

/// Apply `text` as an unnamed patch.
pub fn apply(engine: &mut PatchEngine, world: &mut MemoryWorld, text: &str) {
    engine
        .load_bytes(world, "test.deh", text.as_bytes().to_vec())
        .expect("apply patch");
}

/// A fresh world with `text` applied, without finishing.
pub fn patched(text: &str) -> (PatchEngine, MemoryWorld) {
    let mut world = classic_world();
    let mut engine = PatchEngine::new();
    apply(&mut engine, &mut world, text);
    (engine, world)
}
