use dehacked_data::values::{atof, atoi, powerup_color};
use dehacked_types::{ActorDefaults, DehInfo, Rgba};

use crate::section::Patcher;

/// The integer field of `deh` that a plain `Misc` key sets.
fn misc_field<'a>(deh: &'a mut DehInfo, key: &str) -> Option<&'a mut i32> {
    let field = match key.to_ascii_lowercase().as_str() {
        "initial health" => &mut deh.start_health,
        "initial bullets" => &mut deh.start_bullets,
        "max health" => &mut deh.max_health,
        "max armor" => &mut deh.max_armor,
        "green armor class" => &mut deh.green_ac,
        "blue armor class" => &mut deh.blue_ac,
        "max soulsphere" => &mut deh.max_soulsphere,
        "soulsphere health" => &mut deh.soulsphere_health,
        "megasphere health" => &mut deh.megasphere_health,
        "god mode health" => &mut deh.god_health,
        "idfa armor" => &mut deh.fa_armor,
        "idfa armor class" => &mut deh.fa_ac,
        "idkfa armor" => &mut deh.kfa_armor,
        "idkfa armor class" => &mut deh.kfa_ac,
        "no autofreeze" => &mut deh.no_autofreeze,
        "bfg cells/shot" => &mut deh.bfg_cells,
        _ => return None,
    };
    Some(field)
}

/// Powerup names accepted after `Powerup Color ` and the classes they tint.
const POWERUP_CLASSES: &[(&str, &str)] = &[
    ("Invulnerability", "PowerInvulnerable"),
    ("Berserk", "PowerStrength"),
    ("Invisibility", "PowerInvisibility"),
    ("Radiation Suit", "PowerIronFeet"),
    ("Infrared", "PowerLightAmp"),
    ("Tome of Power", "PowerWeaponLevel2"),
    ("Wings of Wrath", "PowerFlight"),
    ("Speed", "PowerSpeed"),
    ("Minotaur", "PowerMinotaur"),
];

const INFIGHTING_ENABLED: i32 = 0xDD;

impl Patcher<'_> {
    pub(crate) fn patch_misc(&mut self) {
        log::debug!("Misc");
        while let Some((key, value)) = self.next_pair() {
            if let Some(field) = misc_field(&mut self.engine.deh, &key) {
                *field = atoi(&value);
                continue;
            }
            match key.to_ascii_lowercase().as_str() {
                "rocket explosion style" => {
                    if let Some(style) = self.engine.tables.find_style(&value) {
                        self.engine.deh.explosion_style = style;
                    }
                }
                "rocket explosion alpha" => self.engine.deh.explosion_alpha = atof(&value),
                "monsters infight" => self.engine.deh.infighting = atoi(&value),
                "monsters ignore each other" => {
                    self.engine.deh.infighting = if atoi(&value) != 0 { -1 } else { 0 };
                }
                lower if lower.starts_with("powerup color ") => self.powerup_color(&key, &value),
                _ => log::warn!("Unknown miscellaneous info {key}."),
            }
        }
        self.apply_misc_defaults();
    }

    fn powerup_color(&mut self, key: &str, value: &str) {
        let name = &key["powerup color ".len()..];
        let Some((_, class_name)) = POWERUP_CLASSES
            .iter()
            .find(|(powerup, _)| powerup.eq_ignore_ascii_case(name))
        else {
            log::warn!("Unknown miscellaneous info {key}.");
            return;
        };
        let Some((r, g, b, a)) = powerup_color(value) else {
            log::warn!("Bad powerup color description \"{value}\" for {key}");
            return;
        };
        let Some(class) = self.world.find_class(class_name) else {
            return;
        };
        let channel = |c: i32| c.clamp(0, 255) as u8;
        self.world.defaults_mut(class).inventory.blend_color = (a > 0.0).then(|| Rgba {
            r: channel(r),
            g: channel(g),
            b: channel(b),
            a: (a.clamp(0.0, 1.0) * 255.0) as u8,
        });
    }

    /// Push the edited constants into the item classes that mirror them.
    fn apply_misc_defaults(&mut self) {
        let deh = self.engine.deh.clone();
        let mut with_class = |name: &str, edit: &dyn Fn(&mut ActorDefaults)| {
            if let Some(class) = self.world.find_class(name) {
                edit(self.world.defaults_mut(class));
            }
        };

        let armor_percent = |class: i32| if class == 1 { 33.335 } else { 50.0 };
        with_class("GreenArmor", &|d| {
            d.inventory.save_amount = 100 * deh.green_ac;
            d.inventory.save_percent = armor_percent(deh.green_ac);
        });
        with_class("BlueArmor", &|d| {
            d.inventory.save_amount = 100 * deh.blue_ac;
            d.inventory.save_percent = armor_percent(deh.blue_ac);
        });
        with_class("ArmorBonus", &|d| d.inventory.max_save_amount = deh.max_armor);
        with_class("HealthBonus", &|d| d.inventory.max_amount = 2 * deh.max_health);
        with_class("Soulsphere", &|d| {
            d.inventory.amount = deh.soulsphere_health;
            d.inventory.max_amount = deh.max_soulsphere;
        });
        with_class("MegasphereHealth", &|d| {
            d.inventory.amount = deh.megasphere_health;
            d.inventory.max_amount = deh.megasphere_health;
        });
        with_class("DoomPlayer", &|d| {
            d.health = deh.start_health;
            for item in d.drop_items.iter_mut().filter(|i| i.class_name.eq_ignore_ascii_case("Clip")) {
                item.amount = deh.start_bullets;
            }
        });

        let infighting = &mut self.engine.deh.infighting;
        if *infighting == INFIGHTING_ENABLED {
            *infighting = 1;
        } else if *infighting != -1 {
            *infighting = 0;
        }
    }
}
