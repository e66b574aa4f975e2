use bitflags::bitflags;
use serde::Serialize;
use strum::{Display, EnumCount, EnumIter, EnumString, FromRepr};

/// Render styles an actor can be drawn with.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Display,
    EnumIter,
    EnumCount,
    EnumString,
    FromRepr,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum RenderStyle {
    None = 0,
    #[default]
    Normal = 1,
    Fuzzy = 2,
    SoulTrans = 3,
    OptFuzzy = 4,
    Stencil = 5,
    Translucent = 6,
    Add = 7,
    Shaded = 8,
    TranslucentStencil = 9,
    Shadow = 10,
    Subtract = 11,
    AddStencil = 12,
    AddShaded = 13,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct RenderFlags: u16 {
        const INVISIBLE  = 0x0001;
        /// Translucency that engines without alpha support should ignore.
        const ZDOOMTRANS = 0x0002;
    }
}

/// Damage type dealt by an actor's attacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Display, EnumIter)]
pub enum DamageType {
    #[default]
    Normal,
    Ice,
    Fire,
}
