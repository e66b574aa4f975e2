use dehacked_data::parse_dehsupp;
use dehacked_types::SpriteName;
use std::path::Path;

const DAT_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../dat");

fn shipped() -> dehacked_data::DehSupp {
    let input =
        std::fs::read_to_string(Path::new(DAT_DIR).join("dehsupp.txt")).expect("read dehsupp.txt");
    parse_dehsupp(&input).expect("parse dehsupp.txt")
}

#[test]
fn shipped_descriptor_has_classic_tables() {
    let supp = shipped();
    assert_eq!(supp.org_spr_names.len(), 138, "expected the 138 classic sprites");
    assert_eq!(supp.info_names.len(), 137, "expected the 137 classic things");
    assert_eq!(supp.org_heights.len(), 137);
    assert_eq!(supp.weapon_names.len(), 9);
    assert_eq!(supp.ammo_names.len(), 6);
    assert_eq!(supp.render_styles.len(), 8);
    assert_eq!(supp.org_spr_names[0], SpriteName::new("TROO"));
    assert_eq!(supp.info_names[0], "DoomPlayer");
}

#[test]
fn action_list_covers_every_mapped_state() {
    let supp = shipped();
    let mapped: u32 = supp.state_map.iter().map(|e| e.span).sum();
    // Entry 0 is the null state, which has no run of its own.
    assert!(supp.actions.len() > mapped as usize);
    assert_eq!(supp.actions[0], None);
    assert!(supp.actions.iter().flatten().any(|a| a == "Mushroom"));
}

#[test]
fn state_map_starts_with_weapon_block() {
    let supp = shipped();
    let first = &supp.state_map[0];
    assert_eq!(first.class_name, "Weapon");
    assert_eq!(first.label, "LightDone");
    assert_eq!(first.span, 1);
}

#[test]
fn sound_map_keeps_quoted_names() {
    let supp = shipped();
    assert_eq!(supp.sound_map[0], "weapons/pistol");
    assert_eq!(supp.sound_map[10], "weapons/sawidle");
}

#[test]
fn thing_bits_stay_in_range() {
    let supp = shipped();
    assert!(supp.thing_bits.iter().all(|b| b.bit < 32 && b.word < 3));
    assert!(
        supp.thing_bits
            .iter()
            .any(|b| b.name == "COUNTKILL" && b.word == 0 && b.bit == 22)
    );
}

#[test]
fn aliases_map_mbf21_routines() {
    let supp = shipped();
    let spawn = supp
        .aliases
        .iter()
        .find(|a| a.alias == "A_SpawnObject")
        .expect("A_SpawnObject alias");
    assert_eq!(spawn.arity, 8);
    let mushroom = supp
        .aliases
        .iter()
        .find(|a| a.alias == "A_Mushroom")
        .expect("A_Mushroom alias");
    assert_eq!(mushroom.name, "A_Mushroom");
    assert_eq!(mushroom.arity, 0);
}
