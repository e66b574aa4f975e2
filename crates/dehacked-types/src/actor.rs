//! Per-class default field values ("templates") that patches edit.

use bitflags::bitflags;
use serde::Serialize;

use crate::actor_flags::{
    ActorFlags, ActorFlags2, ActorFlags3, ActorFlags4, ActorFlags6, ActorFlags8, BounceFlags,
    Effects,
};
use crate::ids::{ClassId, SoundId};
use crate::render::{DamageType, RenderFlags, RenderStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ActorSounds {
    pub see: SoundId,
    pub attack: SoundId,
    pub pain: SoundId,
    pub death: SoundId,
    pub active: SoundId,
    pub rip: SoundId,
}

/// An item dropped when the actor dies. `amount` of -1 uses the item's own
/// default amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropItem {
    pub class_name: String,
    pub probability: u8,
    pub amount: i32,
}

/// Fields that only matter for inventory-derived classes.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct InventoryProps {
    pub amount: i32,
    pub max_amount: i32,
    pub backpack_amount: i32,
    pub backpack_max_amount: i32,
    pub save_amount: i32,
    pub save_percent: f64,
    pub max_save_amount: i32,
    pub blend_color: Option<Rgba>,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct WeaponFlags: u16 {
        const NOALERT        = 0x0001;
        const NOAUTOFIRE     = 0x0002;
        const MELEEWEAPON    = 0x0004;
        const WIMPY_WEAPON   = 0x0008;
        const NOAUTOSWITCHTO = 0x0010;
    }
}

/// Fields that only matter for weapon-derived classes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaponProps {
    pub ammo_type1: Option<ClassId>,
    pub ammo_type2: Option<ClassId>,
    pub ammo_give1: i32,
    pub ammo_give2: i32,
    pub ammo_use1: i32,
    pub min_sel_ammo1: i32,
    pub kickback: i32,
    pub flags: WeaponFlags,
    pub ready_sound: SoundId,
    /// Ammo use is derived from the attack routines in the fire sequence.
    pub deh_ammo: bool,
}

impl Default for WeaponProps {
    fn default() -> Self {
        WeaponProps {
            ammo_type1: None,
            ammo_type2: None,
            ammo_give1: 0,
            ammo_give2: 0,
            ammo_use1: 0,
            min_sel_ammo1: 0,
            kickback: 100,
            flags: WeaponFlags::empty(),
            ready_sound: SoundId::NONE,
            deh_ammo: false,
        }
    }
}

/// The default field state of one actor class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorDefaults {
    pub health: i32,
    pub reaction_time: i32,
    pub pain_chance: i16,
    pub mass: i32,
    pub speed: f64,
    pub fast_speed: Option<f64>,
    pub radius: f64,
    pub height: f64,
    pub projectile_pass_height: f64,
    pub damage: i32,
    pub melee_range: f64,
    pub melee_threshold: f64,
    pub max_target_range: f64,
    pub min_missile_chance: i32,
    pub alpha: f64,
    pub scale: f64,
    pub render_style: RenderStyle,
    pub render_flags: RenderFlags,
    pub flags: ActorFlags,
    pub flags2: ActorFlags2,
    pub flags3: ActorFlags3,
    pub flags4: ActorFlags4,
    pub flags6: ActorFlags6,
    pub flags8: ActorFlags8,
    /// Standard palette translation, 0..=2.
    pub translation: Option<u8>,
    pub bounce_flags: BounceFlags,
    pub bounce_factor: f64,
    pub wall_bounce_factor: f64,
    pub effects: Effects,
    pub damage_type: DamageType,
    pub gravity: f64,
    pub sounds: ActorSounds,
    pub decal: Option<String>,
    pub ed_num: i32,
    pub drop_items: Vec<DropItem>,
    pub blood_color: u32,
    pub infighting_group: i32,
    pub projectile_group: i32,
    pub splash_group: i32,
    pub inventory: InventoryProps,
    pub weapon: WeaponProps,
}

impl Default for ActorDefaults {
    fn default() -> Self {
        ActorDefaults {
            health: 1000,
            reaction_time: 8,
            pain_chance: 0,
            mass: 100,
            speed: 0.0,
            fast_speed: None,
            radius: 20.0,
            height: 16.0,
            projectile_pass_height: 0.0,
            damage: 0,
            melee_range: 44.0,
            melee_threshold: 0.0,
            max_target_range: 0.0,
            min_missile_chance: 200,
            alpha: 1.0,
            scale: 1.0,
            render_style: RenderStyle::Normal,
            render_flags: RenderFlags::empty(),
            flags: ActorFlags::empty(),
            flags2: ActorFlags2::empty(),
            flags3: ActorFlags3::empty(),
            flags4: ActorFlags4::empty(),
            flags6: ActorFlags6::empty(),
            flags8: ActorFlags8::empty(),
            translation: None,
            bounce_flags: BounceFlags::empty(),
            bounce_factor: 0.7,
            wall_bounce_factor: 0.75,
            effects: Effects::empty(),
            damage_type: DamageType::Normal,
            gravity: 1.0,
            sounds: ActorSounds::default(),
            decal: None,
            ed_num: -1,
            drop_items: Vec::new(),
            blood_color: 0,
            infighting_group: 0,
            projectile_group: 0,
            splash_group: 0,
            inventory: InventoryProps::default(),
            weapon: WeaponProps::default(),
        }
    }
}
