use dehacked_data::values::atoi;
use dehacked_types::{ActorDefaults, SoundId, StateId, StateLabels};

use crate::bits::apply_mbf21_weapon_bits;
use crate::section::Patcher;

/// Legacy weapon frame keys and the labels they bind. Select and deselect
/// are swapped, as every DeHackEd editor labels them the wrong way round.
const WEAPON_FRAME_LABELS: &[(&str, &str)] = &[
    ("Deselect", "Select"),
    ("Select", "Deselect"),
    ("Bobbing", "Ready"),
    ("Shooting", "Fire"),
    ("Firing", "Flash"),
];

/// Legacy state number of the chainsaw's idle frame.
const SAW_READY_STATE: i64 = 67;
/// Ammo slot used when a patch names an invalid ammo type.
const NO_AMMO_SLOT: i32 = 5;

impl Patcher<'_> {
    pub(crate) fn patch_weapon(&mut self, weap_num: i32) {
        let class = usize::try_from(weap_num)
            .ok()
            .filter(|&n| n < 9)
            .and_then(|n| self.engine.weapon_names.get(n).copied());
        if class.is_none() {
            log::warn!("Weapon {weap_num} out of range.");
        }
        let mut info = match class {
            Some(class) => self.world.defaults(class).clone(),
            None => ActorDefaults::default(),
        };
        let mut labels: Option<StateLabels> = None;
        let mut ready_state: Option<StateId> = None;

        while let Some((key, value)) = self.next_pair() {
            let val = atoi(&value);

            let is_frame_key = key.len() > 6
                && key
                    .get(key.len() - 6..)
                    .is_some_and(|tail| tail.eq_ignore_ascii_case(" frame"));
            if is_frame_key {
                let state = self.engine.find_state(i64::from(val));
                if labels.is_none() {
                    labels = class.map(|c| self.world.state_labels(c));
                }
                let entry = WEAPON_FRAME_LABELS.iter().find(|(prefix, _)| {
                    key.get(..prefix.len())
                        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
                });
                if let (Some(&(_, label)), Some(labels)) = (entry, labels.as_mut()) {
                    if label == "Ready" {
                        ready_state = state;
                    }
                    labels.set(label, state);
                }
            } else if key.eq_ignore_ascii_case("Ammo type") {
                let ammo_names = &self.engine.tables.ammo_names;
                let index = if (0..12).contains(&val) && (val as usize) < ammo_names.len() {
                    val
                } else {
                    NO_AMMO_SLOT
                };
                let ammo = ammo_names.get(index as usize).copied().flatten();
                info.weapon.ammo_type1 = ammo;
                if let Some(ammo) = ammo {
                    info.weapon.ammo_give1 = self.world.defaults(ammo).inventory.amount * 2;
                    if info.weapon.ammo_use1 == 0 {
                        info.weapon.ammo_use1 = 1;
                    }
                }
            } else if key.eq_ignore_ascii_case("Decal") {
                if self.world.has_decal(&value) {
                    info.decal = Some(value);
                } else {
                    log::warn!("Weapon {weap_num}: Unknown decal {value}");
                }
            } else if key.eq_ignore_ascii_case("Ammo use") || key.eq_ignore_ascii_case("Ammo per shot") {
                info.weapon.ammo_use1 = val;
                if let Some(class) = class {
                    self.engine.explicit_ammo_use.insert(class);
                }
            } else if key.eq_ignore_ascii_case("Min ammo") {
                info.weapon.min_sel_ammo1 = val;
            } else if key.eq_ignore_ascii_case("MBF21 Bits") {
                apply_mbf21_weapon_bits(&mut info, &value);
            } else {
                self.unknown_key(&key, "Weapon", weap_num);
            }
        }

        let Some(class) = class else {
            return;
        };
        if let Some(ready) = ready_state {
            info.weapon.ready_sound = if self.engine.find_state(SAW_READY_STATE) == Some(ready) {
                self.world.find_sound("weapons/sawidle")
            } else {
                SoundId::NONE
            };
        }
        if info.weapon.ammo_type1.is_none() {
            info.weapon.ammo_use1 = 0;
        }
        *self.world.defaults_mut(class) = info;
        if let Some(labels) = labels {
            self.world.install_state_labels(class, labels);
        }
    }
}
