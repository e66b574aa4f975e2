//! Services the patch engine consumes from the host game.
//!
//! The engine never owns game data. Everything it edits is reached through
//! these traits, bundled as [`World`].

use dehacked_types::{
    ActorDefaults, ClassId, FunctionSymbol, SoundId, SpriteName, StateId, StateLabels,
    StateRecord,
};

/// Actor class database.
pub trait ClassRegistry {
    fn find_class(&self, name: &str) -> Option<ClassId>;
    fn class_name(&self, class: ClassId) -> &str;
    fn parent_class(&self, class: ClassId) -> Option<ClassId>;
    fn all_classes(&self) -> Vec<ClassId>;

    fn defaults(&self, class: ClassId) -> &ActorDefaults;
    fn defaults_mut(&mut self, class: ClassId) -> &mut ActorDefaults;

    fn state_labels(&self, class: ClassId) -> StateLabels;
    fn install_state_labels(&mut self, class: ClassId, labels: StateLabels);

    /// Create a subclass of `parent` called `name`. Returns `None` when the
    /// name is already taken.
    fn create_derived_class(&mut self, parent: ClassId, name: &str) -> Option<ClassId>;

    fn replacement(&self, class: ClassId) -> Option<ClassId>;
    fn set_replacement(&mut self, class: ClassId, replacement: Option<ClassId>);
    fn set_replacee(&mut self, class: ClassId, replacee: ClassId);

    fn is_descendant_of(&self, class: ClassId, ancestor: ClassId) -> bool {
        let mut current = Some(class);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent_class(c);
        }
        false
    }

    fn find_state(&self, class: ClassId, label: &str) -> Option<StateId> {
        self.state_labels(class).get(label)
    }
}

/// Flat table of every state record.
pub trait StateTable {
    fn state(&self, id: StateId) -> &StateRecord;
    fn state_mut(&mut self, id: StateId) -> &mut StateRecord;
    fn state_count(&self) -> usize;
    fn owns_state(&self, class: ClassId, state: StateId) -> bool;
}

pub trait FunctionRegistry {
    /// Look up an action routine by name, case-insensitively.
    fn find_function(&self, name: &str) -> Option<FunctionSymbol>;
}

pub trait SoundRegistry {
    /// Sound id for `name`, or [`SoundId::NONE`] when unknown.
    fn find_sound(&self, name: &str) -> SoundId;
}

pub trait SpriteTable {
    fn sprite_names(&self) -> &[SpriteName];
    fn rename_sprite(&mut self, index: usize, name: SpriteName);
}

/// A string override with the numeric id of the patch that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringOverride {
    pub value: String,
    pub file_id: u32,
}

pub trait StringTable {
    /// The engine's unpatched strings as `(id, text)` pairs.
    fn default_strings(&self) -> Vec<(String, String)>;
    fn set_override_strings(&mut self, overrides: Vec<(String, StringOverride)>);
}

pub trait LevelInfo {
    /// Set the par time of `map`. Returns false when the map is unknown.
    fn set_par_time(&mut self, map: &str, seconds: i32) -> bool;
}

pub trait DecalLibrary {
    fn has_decal(&self, name: &str) -> bool;
}

/// The DEHSUPP lookup descriptor as found in the resource system.
#[derive(Debug, Clone)]
pub struct SupportResource {
    pub text: String,
    /// The descriptor comes from the engine's own base resources rather
    /// than user content.
    pub from_base: bool,
}

pub trait ResourceProvider {
    fn support_resource(&self) -> Option<SupportResource>;
}

/// Every collaborator the patch engine needs.
pub trait World:
    ClassRegistry
    + StateTable
    + FunctionRegistry
    + SoundRegistry
    + SpriteTable
    + StringTable
    + LevelInfo
    + DecalLibrary
    + ResourceProvider
{
}

impl<T> World for T where
    T: ClassRegistry
        + StateTable
        + FunctionRegistry
        + SoundRegistry
        + SpriteTable
        + StringTable
        + LevelInfo
        + DecalLibrary
        + ResourceProvider
{
}
