pub mod action;
pub mod actor;
pub mod actor_flags;
pub mod deh_info;
pub mod ids;
pub mod render;
pub mod sprite_name;
pub mod state;

pub use action::{ActionArg, Callable, FunctionSymbol, ImplicitArgs, ParamSpec};
pub use actor::{
    ActorDefaults, ActorSounds, DropItem, InventoryProps, Rgba, WeaponFlags, WeaponProps,
};
pub use actor_flags::{
    ActorFlags, ActorFlags2, ActorFlags3, ActorFlags4, ActorFlags6, ActorFlags8, BounceFlags,
    Effects,
};
pub use deh_info::DehInfo;
pub use ids::{ClassId, SoundId, StateId};
pub use render::{DamageType, RenderFlags, RenderStyle};
pub use sprite_name::SpriteName;
pub use state::{MbfArgs, StateFlags, StateLabels, StateRecord};

/// Convert a 16.16 fixed-point value to a float.
pub fn fixed_to_f64(value: i64) -> f64 {
    value as f64 / 65536.0
}
