mod common;

use common::{apply, classic_world, patched};
use dehacked_engine::PatchEngine;
use dehacked_engine::world::{ClassRegistry, StateTable};
use dehacked_types::{ActorFlags8, StateFlags};

#[test]
fn touched_pickups_get_replacements() {
    let (mut engine, mut world) = patched("Thing 64 (Clip)\nHit points = 5\n");
    let clip = world.find_class("Clip").expect("Clip");
    assert_eq!(engine.touched_actors(), &[clip]);

    engine.finish(&mut world);

    let sub = world.replacement(clip).expect("replacement");
    assert_eq!(world.class_name(sub), "DehackedPickup0");
    assert_eq!(world.replacee(sub), Some(clip));
    assert_eq!(world.defaults(sub).health, 5);
    let base = world.find_class("DehackedPickup").expect("DehackedPickup");
    assert!(world.is_descendant_of(sub, base));
    assert!(engine.touched_actors().is_empty());
}

#[test]
fn pickup_states_mark_their_owner() {
    let (mut engine, mut world) = patched("Frame 208\nDuration = 6\nFrame 115\nDuration = 2\n");
    let clip = world.find_class("Clip").expect("Clip");
    let zombie = world.find_class("ZombieMan").expect("ZombieMan");
    engine.finish(&mut world);
    assert!(world.replacement(clip).is_some());
    assert!(world.replacement(zombie).is_none());
}

#[test]
fn replacement_chain_is_preserved() {
    let mut world = classic_world();
    let clip = world.find_class("Clip").expect("Clip");
    let clip_box = world.find_class("ClipBox").expect("ClipBox");
    world.set_replacement(clip, Some(clip_box));

    let mut engine = PatchEngine::new();
    apply(&mut engine, &mut world, "Thing 64\nHit points = 2\n");
    engine.finish(&mut world);

    let sub = world.replacement(clip).expect("replacement");
    assert_eq!(world.replacement(sub), Some(clip_box));
}

#[test]
fn string_overrides_are_installed() {
    let (mut engine, mut world) = patched("Text 17 9\nPicked up a clip.Got ammo.\n");
    engine.finish(&mut world);
    assert!(engine.string_overrides().is_empty());
    let clip = world.override_string("GOTCLIP").expect("GOTCLIP");
    assert_eq!(clip.value, "Got ammo.");
    assert_eq!(clip.file_id, 1);
}

#[test]
fn weapon_ammo_use_follows_fire_states() {
    let (mut engine, mut world) = patched("Misc 0\nBFG Cells/Shot = 30\n");
    engine.finish(&mut world);

    let ammo_use = |name: &str| {
        let class = world.find_class(name).expect(name);
        world.defaults(class).weapon.ammo_use1
    };
    assert_eq!(ammo_use("Fist"), 0);
    assert_eq!(ammo_use("Pistol"), 1);
    assert_eq!(ammo_use("SuperShotgun"), 2);
    assert_eq!(ammo_use("BFG9000"), 30);
    let pistol = world.find_class("Pistol").expect("Pistol");
    assert!(world.defaults(pistol).weapon.deh_ammo);
}

#[test]
fn explicit_ammo_use_is_kept() {
    let (mut engine, mut world) = patched("Weapon 1\nAmmo use = 3\n");
    engine.finish(&mut world);
    let pistol = world.find_class("Pistol").expect("Pistol");
    assert_eq!(world.defaults(pistol).weapon.ammo_use1, 3);
    assert!(!world.defaults(pistol).weapon.deh_ammo);
}

#[test]
fn consume_ammo_states_keep_current_use() {
    let (mut engine, mut world) = patched("[CODEPTR]\nFrame 35 = ConsumeAmmo\nFrame 36 = FirePistol\n");
    let ssg = world.find_class("SuperShotgun").expect("SuperShotgun");
    let fire = world.find_state(ssg, "Fire").expect("Fire");
    assert!(world.state(fire).flags.contains(StateFlags::CONSUME_AMMO));

    engine.finish(&mut world);

    assert_eq!(world.defaults(ssg).weapon.ammo_use1, 2);
    assert!(!world.state(fire).flags.contains(StateFlags::CONSUME_AMMO));
}

#[test]
fn changed_state_links_flag_mapped_states() {
    let (mut engine, mut world) = patched("Thing 2\nInitial frame = 148\n");
    engine.finish(&mut world);
    let fist = world.find_class("Fist").expect("Fist");
    let ready = world.find_state(fist, "Ready").expect("Ready");
    assert!(world.state(ready).flags.contains(StateFlags::WEAPON_USE));
}

#[test]
fn untouched_states_stay_unflagged() {
    let (mut engine, mut world) = patched("Misc 0\nInitial Health = 101\n");
    engine.finish(&mut world);
    assert!(
        world
            .states()
            .iter()
            .all(|s| !s.flags.contains(StateFlags::WEAPON_USE))
    );
}

#[test]
fn info_names_retarget_after_slam() {
    let (mut engine, mut world) = patched("Misc 0\n");
    engine.finish(&mut world);
    let zombie = world.find_class("ZombieMan").expect("ZombieMan");
    assert!(world.defaults(zombie).flags8.contains(ActorFlags8::RETARGETAFTERSLAM));
}
