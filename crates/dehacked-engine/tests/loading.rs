mod common;

use std::fs;

use common::{apply, classic_world};
use dehacked_engine::{DehError, MemoryWorld, PatchEngine, SupportError};

const HEADER: &str = "Patch File for DeHackEd v3.0\nDoom version = 21\nPatch format = 6\n\n";

#[test]
fn signed_patch_is_applied() {
    let mut world = classic_world();
    let mut engine = PatchEngine::new();
    apply(&mut engine, &mut world, &format!("{HEADER}Misc 0\nInitial Health = 150\n"));
    assert_eq!(engine.deh_info().start_health, 150);
    assert_eq!(engine.active_loads(), 0);
}

#[test]
fn old_patch_versions_are_rejected() {
    let mut world = classic_world();
    let mut engine = PatchEngine::new();
    let text = "Patch File for DeHackEd v2.0\nDoom version = 19\nPatch format = 5\n\nMisc 0\nInitial Health = 1\n";
    let err = engine
        .load_bytes(&mut world, "old.deh", text.as_bytes().to_vec())
        .unwrap_err();
    assert!(matches!(err, DehError::OldPatch { .. }), "{err}");
    assert_eq!(engine.deh_info().start_health, 100);
}

#[test]
fn signed_patch_needs_version_headers() {
    let mut world = classic_world();
    let mut engine = PatchEngine::new();
    let text = "Patch File for DeHackEd v3.0\n\nMisc 0\nInitial Health = 1\n";
    let err = engine
        .load_bytes(&mut world, "bad.deh", text.as_bytes().to_vec())
        .unwrap_err();
    assert!(matches!(err, DehError::NotAPatch { .. }), "{err}");
}

#[test]
fn nul_bytes_in_signed_patches_become_spaces() {
    let mut world = classic_world();
    let mut engine = PatchEngine::new();
    let mut data = format!("{HEADER}Misc 0\nInitial Health = 130\n").into_bytes();
    let pos = data.iter().position(|&b| b == b'=').expect("equals");
    data.insert(pos, 0);
    engine
        .load_bytes(&mut world, "nul.deh", data)
        .expect("apply patch");
    assert_eq!(engine.deh_info().start_health, 130);
}

#[test]
fn missing_descriptor_is_fatal() {
    let mut world = MemoryWorld::new();
    let mut engine = PatchEngine::new();
    let err = engine
        .load_bytes(&mut world, "x.bex", b"Misc 0\n".to_vec())
        .unwrap_err();
    assert!(matches!(err, DehError::Support(SupportError::Missing)), "{err}");
}

#[test]
fn descriptor_outside_base_resources_is_refused() {
    let mut world = classic_world();
    world.set_support(common::SUPPORT, false);
    let mut engine = PatchEngine::new();
    let err = engine
        .load_bytes(&mut world, "x.bex", b"Misc 0\n".to_vec())
        .unwrap_err();
    assert!(matches!(err, DehError::Support(SupportError::NotBase)), "{err}");
    assert_eq!(engine.active_loads(), 0);
}

#[test]
fn refused_load_leaves_held_tables_alone() {
    let mut world = classic_world();
    let mut engine = PatchEngine::new();
    engine.load_tables(&mut world).expect("tables");
    assert_eq!(engine.active_loads(), 1);

    world.set_support(common::SUPPORT, false);
    let err = engine
        .load_bytes(&mut world, "x.bex", b"Misc 0\n".to_vec())
        .unwrap_err();
    assert!(matches!(err, DehError::Support(SupportError::NotBase)), "{err}");
    assert_eq!(engine.active_loads(), 1);
    assert!(engine.find_state(1).is_some());

    engine.release_tables(&mut world);
    assert_eq!(engine.active_loads(), 0);
}

#[test]
fn unparsable_descriptor_gives_back_its_use() {
    let mut world = classic_world();
    world.set_support("ActionList { NULL", true);
    let mut engine = PatchEngine::new();
    let err = engine
        .load_bytes(&mut world, "x.bex", b"Misc 0\n".to_vec())
        .unwrap_err();
    assert!(matches!(err, DehError::Support(SupportError::Parse(_))), "{err}");
    assert_eq!(engine.active_loads(), 0);
}

#[test]
fn unreadable_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut world = classic_world();
    let mut engine = PatchEngine::new();
    let err = engine
        .load_file(&mut world, &dir.path().join("missing.deh"))
        .unwrap_err();
    assert!(matches!(err, DehError::Io { .. }), "{err}");
}

#[test]
fn include_resolves_next_to_the_patch() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("extra.bex"), "[STRINGS]\nGOTSTIM = Shot!\n").expect("write");
    fs::write(
        dir.path().join("main.deh"),
        "include extra.bex\nMisc 0\nInitial Health = 120\n",
    )
    .expect("write");

    let mut world = classic_world();
    let mut engine = PatchEngine::new();
    engine
        .load_file(&mut world, &dir.path().join("main.deh"))
        .expect("apply patch");

    let stim = &engine.string_overrides()["GOTSTIM"];
    assert_eq!(stim.value, "Shot!");
    assert_eq!(stim.file_id, 2);
    assert_eq!(engine.deh_info().start_health, 120);
    assert_eq!(engine.active_loads(), 0);
}

#[test]
fn includes_do_not_nest() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("third.bex"), "[STRINGS]\nGOTARMOR = nested\n").expect("write");
    fs::write(
        dir.path().join("extra.bex"),
        "include third.bex\n[STRINGS]\nGOTMEDIKIT = Med\n",
    )
    .expect("write");
    fs::write(dir.path().join("main.deh"), "include extra.bex\n").expect("write");

    let mut world = classic_world();
    let mut engine = PatchEngine::new();
    engine
        .load_file(&mut world, &dir.path().join("main.deh"))
        .expect("apply patch");

    let overrides = engine.string_overrides();
    assert_eq!(overrides["GOTMEDIKIT"].value, "Med");
    assert!(!overrides.contains_key("GOTARMOR"));
}

#[test]
fn include_notext_skips_text_sections() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("extra.deh"),
        "Text 17 9\nPicked up a clip.Got ammo.\n[STRINGS]\nGOTSTIM = yes\n",
    )
    .expect("write");
    fs::write(dir.path().join("main.deh"), "include notext \"extra.deh\"\n").expect("write");

    let mut world = classic_world();
    let mut engine = PatchEngine::new();
    engine
        .load_file(&mut world, &dir.path().join("main.deh"))
        .expect("apply patch");

    let overrides = engine.string_overrides();
    assert!(!overrides.contains_key("GOTCLIP"));
    assert_eq!(overrides["GOTSTIM"].value, "yes");
}

#[test]
fn failed_include_does_not_stop_the_patch() {
    let mut world = classic_world();
    let mut engine = PatchEngine::new();
    apply(
        &mut engine,
        &mut world,
        "include no_such_file.deh\nMisc 0\nInitial Health = 99\n",
    );
    assert_eq!(engine.deh_info().start_health, 99);
}

#[test]
fn skip_text_mode_ignores_text() {
    let mut world = classic_world();
    let mut engine = PatchEngine::new();
    engine.set_skip_text(true);
    apply(&mut engine, &mut world, "Text 17 9\nPicked up a clip.Got ammo.\n");
    assert!(engine.string_overrides().is_empty());
}

#[test]
fn files_are_numbered_in_load_order() {
    let mut world = classic_world();
    let mut engine = PatchEngine::new();
    apply(&mut engine, &mut world, "[STRINGS]\nGOTSTIM = one\n");
    apply(&mut engine, &mut world, "[STRINGS]\nGOTMEDIKIT = two\n");
    let overrides = engine.string_overrides();
    assert_eq!(overrides["GOTSTIM"].file_id, 1);
    assert_eq!(overrides["GOTMEDIKIT"].file_id, 2);
}

#[test]
fn state_numbers_resolve_across_the_whole_map() {
    let mut world = classic_world();
    let mut engine = PatchEngine::new();
    engine.load_tables(&mut world).expect("tables");
    let count = engine.mapped_state_count() as i64;
    assert_eq!(count, 225);
    assert_eq!(engine.find_state(0), None);
    for num in 1..=count {
        assert!(engine.find_state(num).is_some(), "state {num}");
    }
    assert_eq!(engine.find_state(count + 1), None);
    engine.release_tables(&mut world);
    assert_eq!(engine.active_loads(), 0);
}
