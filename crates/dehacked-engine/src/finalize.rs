//! Work that runs once after every patch has been applied.

use std::collections::HashSet;

use dehacked_types::{ActorFlags, ActorFlags8, StateFlags, StateId};

use crate::engine::PatchEngine;
use crate::world::World;

/// Attack routines and the ammo each shot costs. A negative count means
/// the configured BFG cells per shot.
const AMMO_PER_ATTACK: [(&str, i32); 11] = [
    ("A_Punch", 0),
    ("A_FirePistol", 1),
    ("A_FireShotgun", 1),
    ("A_FireShotgun2", 2),
    ("A_FireCGun", 1),
    ("A_FireMissile", 1),
    ("A_Saw", 0),
    ("A_FirePlasma", 1),
    ("A_FireBFG", -1),
    ("A_FireOldBFG", 1),
    ("A_FireRailgun", 1),
];

impl PatchEngine {
    /// Finish the load phase: install pickup replacements, hand the string
    /// overrides to the world and derive weapon ammo use from fire states.
    pub fn finish(&mut self, world: &mut dyn World) {
        // Patched charging monsters must keep the classic slam behavior.
        for &class in &self.info_names {
            world.defaults_mut(class).flags8 |= ActorFlags8::RETARGETAFTERSLAM;
        }

        self.install_pickups(world);

        if self.changed_states {
            for run in &self.state_map {
                for i in 0..run.span {
                    world.state_mut(run.first.offset(i)).flags |= StateFlags::WEAPON_USE;
                }
            }
        }
        self.state_map.clear();
        self.touched_actors.clear();
        self.english_strings.clear();
        let overrides = std::mem::take(&mut self.deh_strings).into_iter().collect();
        world.set_override_strings(overrides);

        self.fix_weapon_ammo_use(world);
        self.weapon_names.clear();
        self.explicit_ammo_use.clear();
    }

    /// Replace every touched pickup with a `DehackedPickup` subclass that
    /// carries the patched defaults.
    fn install_pickups(&self, world: &mut dyn World) {
        let Some(pickup_base) = world.find_class("DehackedPickup") else {
            if !self.touched_actors.is_empty() {
                log::error!("DehackedPickup class is missing; patched pickups stay unchanged");
            }
            return;
        };
        let inventory = world.find_class("Inventory");

        let mut name_index = 0u32;
        for &class in &self.touched_actors {
            if !world.defaults(class).flags.contains(ActorFlags::SPECIAL) {
                continue;
            }

            let subclass = loop {
                let name = format!("DehackedPickup{name_index}");
                name_index += 1;
                if let Some(created) = world.create_derived_class(pickup_base, &name) {
                    break created;
                }
            };

            let defaults = world.defaults(class).clone();
            *world.defaults_mut(subclass) = defaults;

            let mut labels = world.state_labels(class);
            if let Some(inventory) = inventory
                && !world.is_descendant_of(class, inventory)
            {
                labels.merge_missing(&world.state_labels(inventory));
            }
            world.install_state_labels(subclass, labels);

            let old_replacement = world.replacement(class);
            world.set_replacement(class, Some(subclass));
            world.set_replacee(subclass, class);
            if old_replacement.is_some() {
                world.set_replacement(subclass, old_replacement);
            }

            log::debug!(
                "{} replaces {}",
                world.class_name(subclass),
                world.class_name(class)
            );
        }
    }

    /// Weapons whose ammo use was not set explicitly take it from the first
    /// attack routine of their fire sequence.
    fn fix_weapon_ammo_use(&self, world: &mut dyn World) {
        let attacks: Vec<_> = AMMO_PER_ATTACK
            .iter()
            .filter_map(|&(name, count)| {
                let use_count = if count < 0 { self.deh.bfg_cells } else { count };
                world.find_function(name).map(|f| (f.callable, use_count))
            })
            .collect();

        for &weapon in &self.weapon_names {
            if self.explicit_ammo_use.contains(&weapon) {
                continue;
            }
            world.defaults_mut(weapon).weapon.deh_ammo = true;

            let mut handled = false;
            let mut visited = HashSet::<StateId>::new();
            let mut current = world.find_state(weapon, "Fire");
            while let Some(state) = current {
                if !visited.insert(state) {
                    break;
                }
                let record = world.state_mut(state);
                if record.flags.contains(StateFlags::CONSUME_AMMO) {
                    // The routine consumes its own amount; keep the existing use.
                    record.flags.remove(StateFlags::CONSUME_AMMO);
                    handled = true;
                    break;
                }
                let per_attack = record.action.as_ref().and_then(|action| {
                    attacks
                        .iter()
                        .find(|(routine, _)| action.same_routine(routine))
                        .map(|&(_, count)| count)
                });
                let next = record.next;
                if let Some(count) = per_attack {
                    world.defaults_mut(weapon).weapon.ammo_use1 = count;
                    handled = true;
                    break;
                }
                current = next;
            }

            if !handled {
                world.defaults_mut(weapon).weapon.ammo_use1 = 0;
            }
        }
    }
}
