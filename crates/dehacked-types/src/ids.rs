use serde::Serialize;

/// Handle to an actor class in the class registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClassId(pub u32);

/// Handle to a state record. State ids are dense: a run of states owned by
/// one class occupies consecutive ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StateId(pub u32);

impl StateId {
    /// The state `offset` records after this one.
    pub const fn offset(self, offset: u32) -> StateId {
        StateId(self.0 + offset)
    }
}

/// Handle to a registered sound. Id 0 is reserved for "no sound".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct SoundId(pub u32);

impl SoundId {
    pub const NONE: SoundId = SoundId(0);

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}
