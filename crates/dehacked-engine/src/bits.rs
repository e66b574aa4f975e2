//! Translation of legacy flag words onto the modern flag fields.
//!
//! Boom and MBF reused several positions of the original flag word for new
//! meanings, so a patched `Bits` value is never copied straight across.
//! Each reused slot is consumed explicitly and turned into whatever the
//! modern model uses for that behavior.

use dehacked_data::ThingBitEntry;
use dehacked_data::values::parse_number;
use dehacked_types::{
    ActorDefaults, ActorFlags, ActorFlags2, ActorFlags3, ActorFlags4, ActorFlags6, ActorFlags8,
    BounceFlags, DamageType, Effects, RenderFlags, RenderStyle, StateFlags, WeaponFlags,
};

// Legacy word 0 slots that no longer mean what the modern flag says.
const MF_SLIDE: u32 = 0x0000_2000;
const MF_TRANSLATION: u32 = 0x0c00_0000;
const MF_TRANSSHIFT: u32 = 26;
const MF_TOUCHY: u32 = 0x1000_0000;
const MF_BOUNCES: u32 = 0x2000_0000;
const MF_FRIEND: u32 = 0x4000_0000;
const MF_TRANSLUCENT: u32 = 0x8000_0000;

// Legacy word 1 slots.
const MF2_OLD_BOUNCE1: u32 = 0x0000_0004;
const MF2_OLD_ICEDAMAGE: u32 = 0x2000_0000;
const MF2_OLD_FIREDAMAGE: u32 = 0x1000_0000;
const MF2_OLD_LOGRAV: u32 = 0x0000_0001;

const DELIMITERS: &[char] = &[',', '+', '|', ' ', '\t', '\x0c', '\r'];

/// Split a flag list on the separators patches use between mnemonics.
pub fn flag_tokens(list: &str) -> impl Iterator<Item = &str> {
    list.split(DELIMITERS).filter(|t| !t.is_empty())
}

fn strip_mf_prefix(token: &str) -> &str {
    match token.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("MF_") => &token[3..],
        _ => token,
    }
}

/// Facts about the patched actor that the remapper cannot read from its
/// flag words.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitsContext {
    /// The actor is the player (legacy thing 1).
    pub is_player: bool,
    /// The actor has health and a chase state.
    pub sentient: bool,
}

/// Accumulated legacy flag words.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct LegacyWords {
    value: [u32; 3],
    touched: [bool; 3],
    zdoom_flags: bool,
}

fn collect(list: &str, bit_names: &[ThingBitEntry]) -> LegacyWords {
    let mut words = LegacyWords::default();
    for token in flag_tokens(list) {
        if let Some(number) = parse_number(token) {
            words.value[0] |= number as u32;
            words.touched[0] = true;
            continue;
        }
        let name = strip_mf_prefix(token);
        // A mod that names STEALTH wants the engine flag, not MBF's FRIEND.
        if name.eq_ignore_ascii_case("STEALTH") {
            words.zdoom_flags = true;
        }
        match bit_names.iter().find(|b| b.name.eq_ignore_ascii_case(name)) {
            Some(bit) => {
                let word = usize::from(bit.word.min(2));
                words.value[word] |= 1 << (bit.bit & 31);
                words.touched[word] = true;
            }
            None => log::error!("Unknown bit mnemonic {token}"),
        }
    }
    words
}

fn bounce_factors(value: u32) -> (f64, f64) {
    let has = |flag: ActorFlags| value & flag.bits() != 0;
    if has(ActorFlags::NOGRAVITY) {
        (1.0, 1.0)
    } else if has(ActorFlags::FLOAT) && has(ActorFlags::DROPOFF) {
        (0.85, 0.85)
    } else if has(ActorFlags::FLOAT) {
        (0.70, 0.85)
    } else {
        (0.45, 0.85)
    }
}

fn apply_translucency(defaults: &mut ActorDefaults, value: u32) -> bool {
    let mut had_translucency = false;
    if value & 7 != 0 {
        had_translucency = true;
        defaults.alpha = if value & 1 != 0 {
            0.25
        } else if value & 2 != 0 {
            0.5
        } else {
            0.75
        };
        defaults.render_style = RenderStyle::Translucent;
        defaults.render_flags.remove(RenderFlags::ZDOOMTRANS);
    }
    defaults
        .render_flags
        .set(RenderFlags::INVISIBLE, value & 8 != 0);
    had_translucency
}

/// Apply a `Bits` flag list to `defaults`. Returns true when the list set a
/// translucency level.
pub fn remap_bits(
    defaults: &mut ActorDefaults,
    list: &str,
    bit_names: &[ThingBitEntry],
    ctx: BitsContext,
) -> bool {
    let mut words = collect(list, bit_names);

    if words.touched[0] {
        let mut value = words.value[0] & !MF_SLIDE;

        if value & MF_TRANSLATION != 0 {
            let index = ((value & MF_TRANSLATION) >> MF_TRANSSHIFT) - 1;
            defaults.translation = Some(index as u8);
            value &= !MF_TRANSLATION;
        }
        if value & MF_TOUCHY != 0 {
            value &= !MF_TOUCHY;
            defaults.flags6 |= ActorFlags6::TOUCHY;
        }
        if value & MF_BOUNCES != 0 {
            value &= !MF_BOUNCES;
            let missile = value & ActorFlags::MISSILE.bits() != 0;

            defaults.flags6 |= ActorFlags6::VULNERABLE;
            defaults.flags3 |= ActorFlags3::NOBLOCKMONST;
            defaults.flags4 |= ActorFlags4::FORCERADIUSDMG | ActorFlags4::DONTHARMCLASS;
            defaults.bounce_flags = if missile {
                BounceFlags::CLASSIC | BounceFlags::DEH
            } else {
                BounceFlags::GRENADE | BounceFlags::DEH
            };
            if !missile && defaults.effects.contains(Effects::ROCKET) {
                defaults.effects.remove(Effects::ROCKET);
                defaults.effects.insert(Effects::GRENADE);
            }
            (defaults.bounce_factor, defaults.wall_bounce_factor) = bounce_factors(value);

            if !ctx.sentient {
                value |= ActorFlags::NOBLOOD.bits();
            } else if value & ActorFlags::FLOAT.bits() != 0 {
                defaults.flags6 |= ActorFlags6::CANJUMP;
            }
        }
        if words.zdoom_flags && value & ActorFlags::STEALTH.bits() != 0 {
            // Explicit STEALTH keeps the engine meaning of the slot.
        } else if value & MF_FRIEND != 0 {
            value &= !MF_FRIEND;
            value |= ActorFlags::FRIENDLY.bits();
            defaults.flags3 |= ActorFlags3::NOBLOCKMONST;
        }
        if value & MF_TRANSLUCENT != 0 {
            value &= !MF_TRANSLUCENT;
            words.touched[2] = true;
            words.value[2] |= 2;
        }
        if defaults.flags.contains(ActorFlags::MISSILE)
            && defaults.flags2.contains(ActorFlags2::NOTELEPORT)
            && value & ActorFlags::MISSILE.bits() == 0
        {
            defaults.flags2.remove(ActorFlags2::NOTELEPORT);
        }
        if ctx.is_player {
            value |= ActorFlags::FRIENDLY.bits();
        }
        defaults.flags = ActorFlags::from_bits_retain(value);
    }

    if words.touched[1] {
        let mut value = words.value[1];
        if value & MF2_OLD_BOUNCE1 != 0 {
            value &= !MF2_OLD_BOUNCE1;
            defaults.bounce_flags = BounceFlags::DOOM_COMPAT;
        }
        if value & MF2_OLD_ICEDAMAGE != 0 {
            defaults.damage_type = DamageType::Ice;
            value &= !MF2_OLD_ICEDAMAGE;
        }
        if value & MF2_OLD_FIREDAMAGE != 0 {
            defaults.damage_type = DamageType::Fire;
            value &= !MF2_OLD_FIREDAMAGE;
        }
        if value & MF2_OLD_LOGRAV != 0 {
            defaults.gravity = 0.25;
            value &= !MF2_OLD_LOGRAV;
        }
        defaults.flags2 = ActorFlags2::from_bits_retain(value);
    }

    let had_translucency = words.touched[2] && apply_translucency(defaults, words.value[2]);

    log::debug!(
        "Bits: {},{} (0x{:08x},0x{:08x})",
        defaults.flags.bits(),
        defaults.flags2.bits(),
        defaults.flags.bits(),
        defaults.flags2.bits()
    );
    had_translucency
}

type Mbf21Setter = fn(&mut ActorDefaults);

/// MBF21 thing flags, in bit order.
const MBF21_THING_BITS: &[(&str, Mbf21Setter)] = &[
    ("LOGRAV", |d| d.gravity = 1.0 / 8.0),
    ("SHORTMRANGE", |d| d.max_target_range = 896.0),
    ("DMGIGNORED", |d| d.flags3 |= ActorFlags3::NOTARGET),
    ("NORADIUSDMG", |d| d.flags3 |= ActorFlags3::NORADIUSDMG),
    ("FORCERADIUSDMG", |d| d.flags4 |= ActorFlags4::FORCERADIUSDMG),
    ("HIGHERMPROB", |d| d.min_missile_chance = 160),
    ("RANGEHALF", |d| d.flags4 |= ActorFlags4::MISSILEMORE),
    ("NOTHRESHOLD", |d| d.flags4 |= ActorFlags4::QUICKTORETALIATE),
    ("LONGMELEE", |d| d.melee_threshold = 196.0),
    ("BOSS", |d| d.flags2 |= ActorFlags2::BOSS),
    ("MAP07BOSS1", |d| d.flags8 |= ActorFlags8::MAP07BOSS1),
    ("MAP07BOSS2", |d| d.flags8 |= ActorFlags8::MAP07BOSS2),
    ("E1M8BOSS", |d| d.flags8 |= ActorFlags8::E1M8BOSS),
    ("E2M8BOSS", |d| d.flags8 |= ActorFlags8::E2M8BOSS),
    ("E3M8BOSS", |d| d.flags8 |= ActorFlags8::E3M8BOSS),
    ("E4M6BOSS", |d| d.flags8 |= ActorFlags8::E4M6BOSS),
    ("E4M8BOSS", |d| d.flags8 |= ActorFlags8::E4M8BOSS),
    ("RIP", |d| d.flags2 |= ActorFlags2::RIP),
    ("FULLVOLSOUNDS", |d| {
        d.flags8 |= ActorFlags8::FULLVOLSEE;
        d.flags3 |= ActorFlags3::FULLVOLDEATH;
    }),
];

fn clear_mbf21_thing_bits(d: &mut ActorDefaults) {
    d.gravity = 1.0;
    d.max_target_range = 0.0;
    d.min_missile_chance = 200;
    d.melee_threshold = 0.0;
    d.flags2 &= !(ActorFlags2::BOSS | ActorFlags2::RIP);
    d.flags3 &= !(ActorFlags3::NOTARGET | ActorFlags3::NORADIUSDMG | ActorFlags3::FULLVOLDEATH);
    d.flags4 &= !(ActorFlags4::MISSILEMORE
        | ActorFlags4::QUICKTORETALIATE
        | ActorFlags4::FORCERADIUSDMG);
    d.flags8 &= !(ActorFlags8::E1M8BOSS
        | ActorFlags8::E2M8BOSS
        | ActorFlags8::E3M8BOSS
        | ActorFlags8::E4M8BOSS
        | ActorFlags8::E4M6BOSS
        | ActorFlags8::MAP07BOSS1
        | ActorFlags8::MAP07BOSS2
        | ActorFlags8::FULLVOLSEE);
}

/// Parse a list of names against `table`, OR-ing `1 << index` for each
/// match. Numbers are taken as raw bit masks. Returns `None` when nothing in
/// the list was understood.
fn collect_named_bits(list: &str, names: &[&str]) -> Option<u32> {
    let mut value = 0u32;
    let mut changed = false;
    for token in flag_tokens(list) {
        if let Some(number) = parse_number(token) {
            value |= number as u32;
            changed = true;
        } else if let Some(i) = names.iter().position(|n| n.eq_ignore_ascii_case(token)) {
            value |= 1 << i;
            changed = true;
        } else {
            log::error!("Unknown bit mnemonic {token}");
        }
    }
    changed.then_some(value)
}

/// Apply an MBF21 `Bits` list to a thing. The named properties are reset
/// first, so the list replaces rather than extends earlier settings.
pub fn apply_mbf21_thing_bits(defaults: &mut ActorDefaults, list: &str) {
    let names: Vec<&str> = MBF21_THING_BITS.iter().map(|(n, _)| *n).collect();
    if let Some(value) = collect_named_bits(list, &names) {
        clear_mbf21_thing_bits(defaults);
        for (i, (_, set)) in MBF21_THING_BITS.iter().enumerate() {
            if value & (1 << i) != 0 {
                set(defaults);
            }
        }
    }
    log::debug!("MBF21 Bits: {} (0x{:08x})", defaults.flags.bits(), defaults.flags.bits());
}

const MBF21_WEAPON_BITS: &[&str] = &[
    "NOTHRUST",
    "SILENT",
    "NOAUTOFIRE",
    "FLEEMELEE",
    "AUTOSWITCHFROM",
    "NOAUTOSWITCHTO",
];

/// Apply an MBF21 `Bits` list to a weapon. Unlisted properties revert to
/// their defaults.
pub fn apply_mbf21_weapon_bits(defaults: &mut ActorDefaults, list: &str) {
    let Some(value) = collect_named_bits(list, MBF21_WEAPON_BITS) else {
        return;
    };
    let weapon = &mut defaults.weapon;
    weapon.kickback = if value & 1 != 0 { 0 } else { 100 };
    weapon.flags.set(WeaponFlags::NOALERT, value & 2 != 0);
    weapon.flags.set(WeaponFlags::NOAUTOFIRE, value & 4 != 0);
    weapon.flags.set(WeaponFlags::MELEEWEAPON, value & 8 != 0);
    weapon.flags.set(WeaponFlags::WIMPY_WEAPON, value & 16 != 0);
    weapon.flags.set(WeaponFlags::NOAUTOSWITCHTO, value & 32 != 0);
}

/// MBF21 frame flags, or `None` when the list names none.
pub fn mbf21_state_bits(list: &str) -> Option<StateFlags> {
    collect_named_bits(list, &["SKILL5FAST"]).map(|value| {
        if value & 1 != 0 {
            StateFlags::SKILL5FAST
        } else {
            StateFlags::empty()
        }
    })
}
