//! Seeding a [`MemoryWorld`] from a DEHSUPP descriptor.
//!
//! The descriptor names every class, state run, sound and routine a patch
//! can refer to. [`world_from_descriptor`] creates all of them, placing the
//! well-known classes in their usual hierarchy so that ammo, weapon and
//! inventory lookups behave as they do in the game.

use dehacked_data::{DehSupp, SupportParseError, parse_dehsupp};
use dehacked_types::{
    ActorFlags, ActorFlags3, Callable, ClassId, DropItem, FunctionSymbol, ParamSpec, StateId,
    StateRecord,
};

use crate::memory::MemoryWorld;
use crate::world::{ClassRegistry, FunctionRegistry};

/// Built-in classes and their parents, parents first.
const HIERARCHY: &[(&str, Option<&str>)] = &[
    ("Actor", None),
    ("Inventory", Some("Actor")),
    ("Ammo", Some("Inventory")),
    ("Weapon", Some("Inventory")),
    ("Health", Some("Inventory")),
    ("Armor", Some("Inventory")),
    ("BasicArmorPickup", Some("Armor")),
    ("BasicArmorBonus", Some("Armor")),
    ("Key", Some("Inventory")),
    ("Powerup", Some("Inventory")),
    ("PowerupGiver", Some("Inventory")),
    ("CustomInventory", Some("Inventory")),
    ("BackpackItem", Some("Inventory")),
    ("MapRevealer", Some("Inventory")),
    ("DehackedPickup", Some("Inventory")),
    ("PlayerPawn", Some("Actor")),
    ("DoomPlayer", Some("PlayerPawn")),
    ("Clip", Some("Ammo")),
    ("Shell", Some("Ammo")),
    ("RocketAmmo", Some("Ammo")),
    ("Cell", Some("Ammo")),
    ("ClipBox", Some("Clip")),
    ("ShellBox", Some("Shell")),
    ("RocketBox", Some("RocketAmmo")),
    ("CellPack", Some("Cell")),
    ("Backpack", Some("BackpackItem")),
    ("Fist", Some("Weapon")),
    ("Pistol", Some("Weapon")),
    ("Shotgun", Some("Weapon")),
    ("SuperShotgun", Some("Weapon")),
    ("Chaingun", Some("Weapon")),
    ("RocketLauncher", Some("Weapon")),
    ("PlasmaRifle", Some("Weapon")),
    ("BFG9000", Some("Weapon")),
    ("Chainsaw", Some("Weapon")),
    ("Stimpack", Some("Health")),
    ("Medikit", Some("Health")),
    ("HealthBonus", Some("Health")),
    ("Soulsphere", Some("Health")),
    ("MegasphereHealth", Some("Health")),
    ("Megasphere", Some("CustomInventory")),
    ("Berserk", Some("CustomInventory")),
    ("GreenArmor", Some("BasicArmorPickup")),
    ("BlueArmor", Some("BasicArmorPickup")),
    ("ArmorBonus", Some("BasicArmorBonus")),
    ("BlueCard", Some("Key")),
    ("RedCard", Some("Key")),
    ("YellowCard", Some("Key")),
    ("BlueSkull", Some("Key")),
    ("RedSkull", Some("Key")),
    ("YellowSkull", Some("Key")),
    ("InvulnerabilitySphere", Some("PowerupGiver")),
    ("BlurSphere", Some("PowerupGiver")),
    ("RadSuit", Some("PowerupGiver")),
    ("Infrared", Some("PowerupGiver")),
    ("Allmap", Some("MapRevealer")),
    ("PowerInvulnerable", Some("Powerup")),
    ("PowerStrength", Some("Powerup")),
    ("PowerInvisibility", Some("Powerup")),
    ("PowerIronFeet", Some("Powerup")),
    ("PowerLightAmp", Some("Powerup")),
    ("PowerWeaponLevel2", Some("Powerup")),
    ("PowerFlight", Some("Powerup")),
    ("PowerSpeed", Some("Powerup")),
    ("PowerMinotaur", Some("Powerup")),
];

/// Ammo classes: (name, amount, max amount, backpack amount).
const AMMO: &[(&str, i32, i32, i32)] = &[
    ("Clip", 10, 200, 10),
    ("Shell", 4, 50, 4),
    ("RocketAmmo", 1, 50, 1),
    ("Cell", 20, 300, 20),
    ("ClipBox", 50, 200, 10),
    ("ShellBox", 20, 50, 4),
    ("RocketBox", 5, 50, 1),
    ("CellPack", 100, 300, 20),
];

/// Weapons: (name, ammo type, ammo given on pickup, ammo used per shot).
const WEAPONS: &[(&str, Option<&str>, i32, i32)] = &[
    ("Fist", None, 0, 0),
    ("Chainsaw", None, 0, 0),
    ("Pistol", Some("Clip"), 20, 1),
    ("Shotgun", Some("Shell"), 8, 1),
    ("SuperShotgun", Some("Shell"), 8, 2),
    ("Chaingun", Some("Clip"), 20, 1),
    ("RocketLauncher", Some("RocketAmmo"), 2, 1),
    ("PlasmaRifle", Some("Cell"), 40, 1),
    ("BFG9000", Some("Cell"), 40, 40),
];

/// Original engine strings a `Text` section can replace.
const ENGLISH_STRINGS: &[(&str, &str)] = &[
    ("GOTARMOR", "Picked up the armor."),
    ("GOTMEGA", "Picked up the MegaArmor!"),
    ("GOTHTHBONUS", "Picked up a health bonus."),
    ("GOTARMBONUS", "Picked up an armor bonus."),
    ("GOTSUPER", "Supercharge!"),
    ("GOTBLUECARD", "Picked up a blue keycard."),
    ("GOTREDSKUL", "Picked up a red skull key."),
    ("GOTSTIM", "Picked up a stimpack."),
    ("GOTMEDIKIT", "Picked up a medikit."),
    ("GOTCLIP", "Picked up a clip."),
    ("GOTSHELLS", "Picked up 4 shotgun shells."),
    ("GOTSHOTGUN", "You got the shotgun!"),
    ("GOTCHAINGUN", "You got the chaingun!"),
    ("GOTBFG9000", "You got the BFG9000!  Oh, yes."),
    ("E1TEXT", "Once you beat the big badasses and\nclean out the moon base you're supposed\nto win, aren't you?"),
    ("QUITMSG", "are you sure you want to\nquit this great game?"),
];

/// Parameters of the routines behind codepointer aliases, all optional.
const ALIAS_PARAMS: u8 = 8;

const DECALS: &[&str] = &["BulletChip", "Scorch", "PlasmaScorch", "BFGScorch", "DoomImpScorch", "BloodSplat"];

/// Routines that run with the weapon owner and calling state as extra
/// implicit arguments.
fn is_weapon_routine(name: &str) -> bool {
    const PREFIXES: &[&str] = &[
        "A_Weapon", "A_Fire", "A_Lower", "A_Raise", "A_ReFire", "A_Light", "A_Punch", "A_Saw",
        "A_GunFlash", "A_CheckReload", "A_OpenShotgun2", "A_LoadShotgun2", "A_CloseShotgun2",
        "A_BFGsound", "MBF21_Weapon", "MBF21_ConsumeAmmo", "MBF21_CheckAmmo", "MBF21_RefireTo",
        "MBF21_GunFlashTo",
    ];
    PREFIXES.iter().any(|p| name.starts_with(p))
}

fn routine(name: &str, optional_params: u8) -> FunctionSymbol {
    let implicit = if is_weapon_routine(name) { 3 } else { 1 };
    let callable = Callable::native(name, implicit, false, |_, _| None);
    let mut symbol = FunctionSymbol::new(callable);
    symbol.params = (0..optional_params)
        .map(|i| ParamSpec {
            name: format!("arg{i}"),
            optional: true,
        })
        .collect();
    symbol
}

fn class_or_actor(world: &mut MemoryWorld, name: &str) -> ClassId {
    match world.find_class(name) {
        Some(class) => class,
        None => {
            let actor = world.find_class("Actor");
            world.add_class(name, actor)
        }
    }
}

fn seed_hierarchy(world: &mut MemoryWorld) {
    for &(name, parent) in HIERARCHY {
        let parent = parent.and_then(|p| world.find_class(p));
        let class = world.add_class(name, parent);
        // Properties set here are inherited by the classes created later.
        let defaults = world.defaults_mut(class);
        match name {
            "Inventory" => {
                defaults.flags |= ActorFlags::SPECIAL;
                defaults.inventory.amount = 1;
                defaults.inventory.max_amount = 1;
            }
            "Powerup" => defaults.flags.remove(ActorFlags::SPECIAL),
            "DoomPlayer" => {
                defaults.health = 100;
                defaults.flags |= ActorFlags::SOLID | ActorFlags::SHOOTABLE | ActorFlags::DROPOFF;
                defaults.drop_items.push(DropItem {
                    class_name: "Clip".to_string(),
                    probability: 255,
                    amount: 50,
                });
            }
            "GreenArmor" => {
                defaults.inventory.save_amount = 100;
                defaults.inventory.save_percent = 33.335;
            }
            "BlueArmor" => {
                defaults.inventory.save_amount = 200;
                defaults.inventory.save_percent = 50.0;
            }
            "Soulsphere" => {
                defaults.inventory.amount = 100;
                defaults.inventory.max_amount = 200;
            }
            "HealthBonus" => {
                defaults.inventory.amount = 1;
                defaults.inventory.max_amount = 200;
            }
            _ => {}
        }
    }
}

fn seed_items(world: &mut MemoryWorld) {
    for &(name, amount, max, backpack) in AMMO {
        if let Some(class) = world.find_class(name) {
            let inventory = &mut world.defaults_mut(class).inventory;
            inventory.amount = amount;
            inventory.max_amount = max;
            inventory.backpack_amount = backpack;
            inventory.backpack_max_amount = max * 2;
        }
    }
    for &(name, ammo, give, used) in WEAPONS {
        let ammo_type = ammo.and_then(|a| world.find_class(a));
        if let Some(class) = world.find_class(name) {
            let weapon = &mut world.defaults_mut(class).weapon;
            weapon.ammo_type1 = ammo_type;
            weapon.ammo_give1 = give;
            weapon.ammo_use1 = used;
        }
    }
}

/// Create the state runs of the state map. States inside a run are chained
/// through `next`; the last one of a run stops. Each state starts with the
/// routine the action list gives its legacy number.
fn seed_states(world: &mut MemoryWorld, supp: &DehSupp) {
    let mut legacy_num = 1usize;
    for entry in &supp.state_map {
        let owner = class_or_actor(world, &entry.class_name);
        let first = world.states().len() as u32;
        let run = (0..entry.span)
            .map(|i| {
                let action = supp
                    .actions
                    .get(legacy_num + i as usize)
                    .and_then(Option::as_ref)
                    .and_then(|name| world.find_function(&format!("A_{name}")))
                    .map(|symbol| symbol.callable);
                StateRecord {
                    tics: 4,
                    next: (i + 1 < entry.span).then(|| StateId(first + i + 1)),
                    action,
                    ..StateRecord::default()
                }
            })
            .collect();
        world.add_states(owner, &entry.label, run);
        legacy_num += entry.span as usize;
    }
}

fn seed_functions(world: &mut MemoryWorld, supp: &DehSupp) {
    for name in supp.actions.iter().flatten() {
        let name = format!("A_{name}");
        if world.find_function(&name).is_none() {
            world.add_function(routine(&name, 0));
        }
    }
    for alias in &supp.aliases {
        if world.find_function(&alias.name).is_none() {
            world.add_function(routine(&alias.name, ALIAS_PARAMS));
        }
    }
}

/// Classes named by the descriptor, created under `Actor` unless the
/// built-in hierarchy already has them.
fn seed_named_classes(world: &mut MemoryWorld, supp: &DehSupp) {
    for name in &supp.info_names {
        let class = class_or_actor(world, name);
        let monster = matches!(
            name.as_str(),
            "ZombieMan" | "ShotgunGuy" | "DoomImp" | "Demon" | "LostSoul" | "Cacodemon"
        );
        if monster {
            let defaults = world.defaults_mut(class);
            defaults.flags |= ActorFlags::SOLID | ActorFlags::SHOOTABLE | ActorFlags::COUNTKILL;
            defaults.flags3 |= ActorFlags3::ISMONSTER;
        }
    }
    for name in supp.ammo_names.iter().flatten() {
        class_or_actor(world, name);
    }
    for name in &supp.weapon_names {
        class_or_actor(world, name);
    }
}

fn seed_levels(world: &mut MemoryWorld) {
    for episode in 1..=4 {
        for map in 1..=9 {
            world.add_level(&format!("E{episode}M{map}"), 0);
        }
    }
    for map in 1..=32 {
        world.add_level(&format!("MAP{map:02}"), 0);
    }
}

/// Build a world holding everything `descriptor` refers to, with the
/// descriptor itself installed as the base-resource support data.
pub fn world_from_descriptor(descriptor: &str) -> Result<MemoryWorld, SupportParseError> {
    let supp = parse_dehsupp(descriptor)?;
    let mut world = MemoryWorld::new();

    seed_hierarchy(&mut world);
    seed_items(&mut world);
    seed_functions(&mut world, &supp);
    seed_states(&mut world, &supp);
    seed_named_classes(&mut world, &supp);

    for sprite in &supp.org_spr_names {
        world.add_sprite(*sprite);
    }
    for sound in &supp.sound_map {
        world.add_sound(sound);
    }
    for (id, text) in ENGLISH_STRINGS {
        world.add_string(id, text);
    }
    for decal in DECALS {
        world.add_decal(decal);
    }
    seed_levels(&mut world);

    // Plain actors need a spawn state to fall back on.
    if let Some(actor) = world.find_class("Actor")
        && world.find_state(actor, "Spawn").is_none()
    {
        world.add_states(actor, "Spawn", vec![StateRecord::default()]);
    }

    world.set_support(descriptor, true);
    log::debug!(
        "Seeded {} classes and {} states from the descriptor",
        world.class_count(),
        world.states().len()
    );
    Ok(world)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{ResourceProvider, SoundRegistry, StateTable};

    const DESCRIPTOR: &str = r#"
        ActionList { NULL, WeaponReady, FirePistol, Mushroom };
        StateMap { Pistol, Ready, 1, Pistol, Fire, 2 };
        SoundMap { "weapons/pistol" };
        InfoNames { DoomPlayer, ZombieMan };
        AmmoNames { Clip, NULL };
        WeaponNames { Pistol };
        Aliases { A_SpawnObject, MBF21_SpawnObject, 8 };
    "#;

    #[test]
    fn hierarchy_supports_ammo_and_weapon_lookups() {
        let world = world_from_descriptor(DESCRIPTOR).expect("world");
        let ammo = world.find_class("Ammo").expect("Ammo");
        let clip_box = world.find_class("ClipBox").expect("ClipBox");
        assert!(world.is_descendant_of(clip_box, ammo));
        let pistol = world.find_class("Pistol").expect("Pistol");
        assert_eq!(world.defaults(pistol).weapon.ammo_type1, world.find_class("Clip"));
        assert!(world.defaults(clip_box).flags.contains(ActorFlags::SPECIAL));
    }

    #[test]
    fn state_runs_are_chained() {
        let world = world_from_descriptor(DESCRIPTOR).expect("world");
        let pistol = world.find_class("Pistol").expect("Pistol");
        let fire = world.find_state(pistol, "Fire").expect("Fire");
        assert_eq!(world.state(fire).next, Some(fire.offset(1)));
        assert_eq!(world.state(fire.offset(1)).next, None);
        assert!(world.owns_state(pistol, fire.offset(1)));
        let ready = world.find_state(pistol, "Ready").expect("Ready");
        let action = world.state(ready).action.as_ref().expect("ready action");
        assert_eq!(action.name(), "A_WeaponReady");
        assert_eq!(world.state(fire).action.as_ref().map(|a| a.name()), Some("A_FirePistol"));
    }

    #[test]
    fn routines_and_support_are_registered() {
        let world = world_from_descriptor(DESCRIPTOR).expect("world");
        assert!(world.find_function("a_firepistol").is_some());
        let spawn_object = world.find_function("MBF21_SpawnObject").expect("alias routine");
        assert!(spawn_object.callable_without_args());
        assert_eq!(spawn_object.params.len(), 8);
        assert!(!world.find_sound("weapons/pistol").is_none());
        assert!(world.support_resource().is_some_and(|r| r.from_base));
    }

    #[test]
    fn unknown_names_become_plain_actors() {
        let world = world_from_descriptor(DESCRIPTOR).expect("world");
        let zombie = world.find_class("ZombieMan").expect("ZombieMan");
        assert_eq!(world.parent_class(zombie), world.find_class("Actor"));
        assert!(world.defaults(zombie).flags.contains(ActorFlags::COUNTKILL));
    }
}
