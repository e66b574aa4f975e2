use dehacked_data::values::{atof, int_prefix};
use dehacked_types::{
    ActorDefaults, ActorFlags, ActorFlags2, ActorFlags3, ActorFlags4, ClassId, DropItem,
    RenderFlags, RenderStyle, SoundId, StateLabels, fixed_to_f64,
};

use crate::bits::{BitsContext, apply_mbf21_thing_bits, remap_bits};
use crate::section::Patcher;

const BLOOD_COLORS: [u32; 9] = [
    0, // red, the engine default
    0xffcc_cccc,
    0xff63_af57,
    0xff63_57af,
    0xffff_d300,
    0xff33_3333,
    0xffff_30ff,
    0xffff_ffff,
    0xffff_8000,
];

/// Legacy frame key prefixes and the state labels they bind.
const FRAME_LABELS: &[(&str, &str)] = &[
    ("Initial", "Spawn"),
    ("First moving", "See"),
    ("Injury", "Pain"),
    ("Close attack", "Melee"),
    ("Far attack", "Missile"),
    ("Death", "Death"),
    ("Exploding", "XDeath"),
    ("Respawn", "Raise"),
];

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn ends_with_ignore_case(s: &str, suffix: &str) -> bool {
    s.len() >= suffix.len()
        && s.get(s.len() - suffix.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}

#[derive(Debug, Default)]
struct ThingEdits {
    had_height: bool,
    had_translucency: bool,
    had_style: bool,
    labels: Option<StateLabels>,
}

impl Patcher<'_> {
    pub(crate) fn patch_thing(&mut self, thingy: i32) {
        let class = usize::try_from(thingy)
            .ok()
            .filter(|&n| n > 0)
            .and_then(|n| self.engine.info_names.get(n - 1).copied());
        if class.is_none() {
            log::warn!("Thing {thingy} out of range.");
        }

        // Out-of-range things are still parsed, into a scratch template.
        let mut info = match class {
            Some(class) => self.world.defaults(class).clone(),
            None => ActorDefaults::default(),
        };
        let old_flags = info.flags;
        let mut edits = ThingEdits::default();

        while let Some((key, value)) = self.next_pair() {
            self.thing_key(thingy, class, &mut info, &mut edits, &key, &value);
        }

        let Some(class) = class else {
            return;
        };

        if info.flags.contains(ActorFlags::SPAWNCEILING) && !edits.had_height {
            if let Some(&height) = self.engine.tables.org_heights.get(thingy as usize - 1) {
                info.height = f64::from(height);
                info.projectile_pass_height = 0.0;
            }
        }

        if (info.flags ^ old_flags).contains(ActorFlags::SHADOW) {
            if info.flags.contains(ActorFlags::SHADOW) {
                if !edits.had_style {
                    info.render_style = RenderStyle::OptFuzzy;
                }
                if !edits.had_translucency {
                    info.alpha = 0.5;
                }
            } else if !edits.had_style {
                info.render_style = RenderStyle::Normal;
            }
        }

        // Speed is either an integer or a fixed-point value depending on
        // what the thing uses it for.
        if info.speed.abs() >= 256.0 {
            info.speed /= 65536.0;
        }

        if info.flags.contains(ActorFlags::SPECIAL) {
            self.engine.push_touched(class);
        }

        if thingy != 1 {
            if info.flags.contains(ActorFlags::COUNTKILL) {
                info.flags2 |= ActorFlags2::PUSHWALL | ActorFlags2::MCROSS | ActorFlags2::PASSMOBJ;
                info.flags3 |= ActorFlags3::ISMONSTER;
            } else {
                info.flags2 &= !(ActorFlags2::PUSHWALL | ActorFlags2::MCROSS);
                info.flags3 &= !ActorFlags3::ISMONSTER;
            }
        }
        info.flags4 |= ActorFlags4::CANUSEWALLS;

        *self.world.defaults_mut(class) = info;
        if let Some(labels) = edits.labels {
            self.world.install_state_labels(class, labels);
        }
    }

    fn thing_key(
        &mut self,
        thingy: i32,
        class: Option<ClassId>,
        info: &mut ActorDefaults,
        edits: &mut ThingEdits,
        key: &str,
        value: &str,
    ) {
        let (val, consumed) = int_prefix(value);
        if val < i64::from(i32::MIN) || val > i64::from(u32::MAX) {
            log::warn!("Bad numeric constant {value} for {key}");
            return;
        }
        let int = val as i32;

        match key.to_ascii_lowercase().as_str() {
            "hit points" => info.health = int,
            "reaction time" => info.reaction_time = int,
            "pain chance" => info.pain_chance = int as i16,
            "translucency" => {
                info.alpha = fixed_to_f64(val);
                info.render_style = RenderStyle::Translucent;
                info.render_flags.remove(RenderFlags::ZDOOMTRANS);
                edits.had_translucency = true;
                edits.had_style = true;
            }
            "height" => {
                info.height = fixed_to_f64(val);
                info.projectile_pass_height = 0.0;
                edits.had_height = true;
            }
            "missile damage" => info.damage = int,
            "speed" => info.speed = val as f64,
            "width" => info.radius = fixed_to_f64(val),
            "alpha" => {
                info.alpha = atof(value);
                edits.had_translucency = true;
            }
            "scale" => info.scale = atof(value).clamp(1.0 / 65536.0, 256.0),
            "decal" => {
                if self.world.has_decal(value) {
                    info.decal = Some(value.to_string());
                } else {
                    log::warn!("Thing {thingy}: Unknown decal {value}");
                }
            }
            "render style" => {
                if let Some(style) = self
                    .engine
                    .tables
                    .find_style(value)
                    .and_then(RenderStyle::from_repr)
                {
                    info.render_style = style;
                    edits.had_style = true;
                }
            }
            "no ice death" => info.flags4.set(ActorFlags4::NOICEDEATH, val != 0),
            "infighting group" => {
                if int < 0 {
                    log::warn!("Infighting groups must be >= 0 (check your dehacked)");
                }
                info.infighting_group = int.max(0);
            }
            "projectile group" => info.projectile_group = if int < 0 { -1 } else { int },
            "splash group" => {
                if int < 0 {
                    log::warn!("Splash groups must be >= 0 (check your dehacked)");
                }
                info.splash_group = int.max(0);
            }
            "fast speed" => {
                info.fast_speed = Some(if val >= 256 {
                    fixed_to_f64(val)
                } else {
                    val as f64
                });
            }
            // Ports measure melee range 20 units further than this engine.
            "melee range" => info.melee_range = fixed_to_f64(val) - 20.0,
            "dropped item" => {
                if val == 0 {
                    info.drop_items.clear();
                } else if let Some(&item) = usize::try_from(val - 1)
                    .ok()
                    .and_then(|i| self.engine.info_names.get(i))
                {
                    info.drop_items = vec![DropItem {
                        class_name: self.world.class_name(item).to_string(),
                        probability: 255,
                        amount: -1,
                    }];
                }
            }
            "blood color" => {
                let index = usize::try_from(val).ok().filter(|&i| i < BLOOD_COLORS.len());
                info.blood_color = BLOOD_COLORS[index.unwrap_or(0)];
            }
            "mbf21 bits" => apply_mbf21_thing_bits(info, value),
            "mass" => info.mass = int,
            "bits" => {
                let sentient = info.health > 0
                    && match (&edits.labels, class) {
                        (Some(labels), _) => labels.get("See").is_some(),
                        (None, Some(class)) => self.world.find_state(class, "See").is_some(),
                        (None, None) => false,
                    };
                let ctx = BitsContext {
                    is_player: thingy == 1,
                    sentient,
                };
                if remap_bits(info, value, &self.engine.tables.bit_names, ctx) {
                    edits.had_translucency = true;
                }
            }
            "id #" => info.ed_num = i32::from(int as i16),
            _ if key.len() > 6 && ends_with_ignore_case(key, " frame") => {
                self.thing_frame(thingy, class, edits, key, val);
            }
            _ if key.len() > 6 && ends_with_ignore_case(key, " sound") => {
                let sound = self.thing_sound(val, consumed, value);
                let sounds = &mut info.sounds;
                let slot = if starts_with_ignore_case(key, "Alert") {
                    Some(&mut sounds.see)
                } else if starts_with_ignore_case(key, "Attack") {
                    Some(&mut sounds.attack)
                } else if starts_with_ignore_case(key, "Pain") {
                    Some(&mut sounds.pain)
                } else if starts_with_ignore_case(key, "Death") {
                    Some(&mut sounds.death)
                } else if starts_with_ignore_case(key, "Action") {
                    Some(&mut sounds.active)
                } else if starts_with_ignore_case(key, "Rip") {
                    Some(&mut sounds.rip)
                } else {
                    None
                };
                if let Some(slot) = slot {
                    *slot = sound;
                }
            }
            _ => self.unknown_key(key, "Thing", thingy),
        }
    }

    fn thing_frame(
        &mut self,
        thingy: i32,
        class: Option<ClassId>,
        edits: &mut ThingEdits,
        key: &str,
        val: i64,
    ) {
        let state = self.engine.find_state(val);
        if edits.labels.is_none() {
            if let Some(class) = class {
                edits.labels = Some(self.world.state_labels(class));
                self.engine.changed_states = true;
            }
        }

        let Some(&(prefix, label)) = FRAME_LABELS
            .iter()
            .find(|(prefix, _)| starts_with_ignore_case(key, prefix))
        else {
            return;
        };
        // Players have no melee or missile states.
        if thingy == 1 && (label == "Melee" || label == "Missile") {
            return;
        }
        let state = match (prefix, state) {
            ("Initial", None) => self
                .world
                .find_class("Actor")
                .and_then(|actor| self.world.find_state(actor, "Spawn")),
            (_, state) => state,
        };
        if let Some(labels) = edits.labels.as_mut() {
            labels.set(label, state);
        }
    }

    /// A sound given either as a 1-based legacy index or, when the value is
    /// not a number, as a sound name.
    fn thing_sound(&self, val: i64, consumed: usize, value: &str) -> SoundId {
        let sounds = &self.engine.tables.sound_map;
        match usize::try_from(val) {
            Ok(index) if index >= 1 && index <= sounds.len() => sounds[index - 1],
            _ if consumed == 0 => self.world.find_sound(value),
            _ => SoundId::NONE,
        }
    }
}
