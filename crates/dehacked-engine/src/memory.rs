//! A self-contained [`World`](crate::world::World) kept entirely in memory.
//!
//! Used by the command-line front end and the tests. Classes inherit their
//! parent's defaults and state labels when they are created, the way the
//! game's own class loader seeds new actor types.

use std::collections::{BTreeMap, HashSet};

use dehacked_types::{
    ActorDefaults, ClassId, FunctionSymbol, SoundId, SpriteName, StateId, StateLabels,
    StateRecord,
};

use crate::world::{
    ClassRegistry, DecalLibrary, FunctionRegistry, LevelInfo, ResourceProvider, SoundRegistry,
    SpriteTable, StateTable, StringOverride, StringTable, SupportResource,
};

#[derive(Debug, Clone)]
struct ClassEntry {
    name: String,
    parent: Option<ClassId>,
    defaults: ActorDefaults,
    labels: StateLabels,
    replacement: Option<ClassId>,
    replacee: Option<ClassId>,
}

#[derive(Debug, Default)]
pub struct MemoryWorld {
    classes: Vec<ClassEntry>,
    states: Vec<StateRecord>,
    state_owners: Vec<ClassId>,
    functions: Vec<FunctionSymbol>,
    sounds: Vec<String>,
    sprites: Vec<SpriteName>,
    strings: Vec<(String, String)>,
    overrides: BTreeMap<String, StringOverride>,
    par_times: BTreeMap<String, i32>,
    decals: HashSet<String>,
    support: Option<SupportResource>,
}

impl MemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class. A subclass starts out with copies of its parent's
    /// defaults and labels.
    pub fn add_class(&mut self, name: &str, parent: Option<ClassId>) -> ClassId {
        let (defaults, labels) = match parent {
            Some(p) => {
                let entry = &self.classes[p.0 as usize];
                (entry.defaults.clone(), entry.labels.clone())
            }
            None => (ActorDefaults::default(), StateLabels::new()),
        };
        let id = ClassId(self.classes.len() as u32);
        self.classes.push(ClassEntry {
            name: name.to_string(),
            parent,
            defaults,
            labels,
            replacement: None,
            replacee: None,
        });
        id
    }

    /// Append a run of states owned by `class` and bind `label` to its
    /// first state. Returns the id of that state.
    pub fn add_states(&mut self, class: ClassId, label: &str, run: Vec<StateRecord>) -> StateId {
        let first = StateId(self.states.len() as u32);
        self.state_owners.extend(std::iter::repeat_n(class, run.len()));
        self.states.extend(run);
        self.classes[class.0 as usize].labels.set(label, Some(first));
        first
    }

    pub fn set_label(&mut self, class: ClassId, label: &str, state: Option<StateId>) {
        self.classes[class.0 as usize].labels.set(label, state);
    }

    pub fn add_function(&mut self, symbol: FunctionSymbol) {
        self.functions.push(symbol);
    }

    pub fn add_sound(&mut self, name: &str) -> SoundId {
        self.sounds.push(name.to_string());
        SoundId(self.sounds.len() as u32)
    }

    pub fn add_sprite(&mut self, name: SpriteName) -> usize {
        self.sprites.push(name);
        self.sprites.len() - 1
    }

    pub fn add_string(&mut self, id: &str, text: &str) {
        self.strings.push((id.to_string(), text.to_string()));
    }

    pub fn add_level(&mut self, map: &str, par: i32) {
        self.par_times.insert(map.to_ascii_uppercase(), par);
    }

    pub fn add_decal(&mut self, name: &str) {
        self.decals.insert(name.to_ascii_lowercase());
    }

    pub fn set_support(&mut self, text: impl Into<String>, from_base: bool) {
        self.support = Some(SupportResource {
            text: text.into(),
            from_base,
        });
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn replacee(&self, class: ClassId) -> Option<ClassId> {
        self.classes[class.0 as usize].replacee
    }

    /// Override installed for `id` by the finalizer.
    pub fn override_string(&self, id: &str) -> Option<&StringOverride> {
        self.overrides.get(id)
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    pub fn par_time(&self, map: &str) -> Option<i32> {
        self.par_times.get(&map.to_ascii_uppercase()).copied()
    }

    pub fn sound_name(&self, id: SoundId) -> Option<&str> {
        let index = (id.0 as usize).checked_sub(1)?;
        self.sounds.get(index).map(String::as_str)
    }

    pub fn states(&self) -> &[StateRecord] {
        &self.states
    }
}

impl ClassRegistry for MemoryWorld {
    fn find_class(&self, name: &str) -> Option<ClassId> {
        self.classes
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
            .map(|i| ClassId(i as u32))
    }

    fn class_name(&self, class: ClassId) -> &str {
        &self.classes[class.0 as usize].name
    }

    fn parent_class(&self, class: ClassId) -> Option<ClassId> {
        self.classes[class.0 as usize].parent
    }

    fn all_classes(&self) -> Vec<ClassId> {
        (0..self.classes.len() as u32).map(ClassId).collect()
    }

    fn defaults(&self, class: ClassId) -> &ActorDefaults {
        &self.classes[class.0 as usize].defaults
    }

    fn defaults_mut(&mut self, class: ClassId) -> &mut ActorDefaults {
        &mut self.classes[class.0 as usize].defaults
    }

    fn state_labels(&self, class: ClassId) -> StateLabels {
        self.classes[class.0 as usize].labels.clone()
    }

    fn install_state_labels(&mut self, class: ClassId, labels: StateLabels) {
        self.classes[class.0 as usize].labels = labels;
    }

    fn create_derived_class(&mut self, parent: ClassId, name: &str) -> Option<ClassId> {
        if self.find_class(name).is_some() {
            return None;
        }
        Some(self.add_class(name, Some(parent)))
    }

    fn replacement(&self, class: ClassId) -> Option<ClassId> {
        self.classes[class.0 as usize].replacement
    }

    fn set_replacement(&mut self, class: ClassId, replacement: Option<ClassId>) {
        self.classes[class.0 as usize].replacement = replacement;
    }

    fn set_replacee(&mut self, class: ClassId, replacee: ClassId) {
        self.classes[class.0 as usize].replacee = Some(replacee);
    }
}

impl StateTable for MemoryWorld {
    fn state(&self, id: StateId) -> &StateRecord {
        &self.states[id.0 as usize]
    }

    fn state_mut(&mut self, id: StateId) -> &mut StateRecord {
        &mut self.states[id.0 as usize]
    }

    fn state_count(&self) -> usize {
        self.states.len()
    }

    fn owns_state(&self, class: ClassId, state: StateId) -> bool {
        self.state_owners.get(state.0 as usize) == Some(&class)
    }
}

impl FunctionRegistry for MemoryWorld {
    fn find_function(&self, name: &str) -> Option<FunctionSymbol> {
        self.functions
            .iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
            .cloned()
    }
}

impl SoundRegistry for MemoryWorld {
    fn find_sound(&self, name: &str) -> SoundId {
        self.sounds
            .iter()
            .position(|s| s.eq_ignore_ascii_case(name))
            .map_or(SoundId::NONE, |i| SoundId(i as u32 + 1))
    }
}

impl SpriteTable for MemoryWorld {
    fn sprite_names(&self) -> &[SpriteName] {
        &self.sprites
    }

    fn rename_sprite(&mut self, index: usize, name: SpriteName) {
        if let Some(sprite) = self.sprites.get_mut(index) {
            *sprite = name;
        }
    }
}

impl StringTable for MemoryWorld {
    fn default_strings(&self) -> Vec<(String, String)> {
        self.strings.clone()
    }

    fn set_override_strings(&mut self, overrides: Vec<(String, StringOverride)>) {
        self.overrides = overrides.into_iter().collect();
    }
}

impl LevelInfo for MemoryWorld {
    fn set_par_time(&mut self, map: &str, seconds: i32) -> bool {
        match self.par_times.get_mut(&map.to_ascii_uppercase()) {
            Some(par) => {
                *par = seconds;
                true
            }
            None => false,
        }
    }
}

impl DecalLibrary for MemoryWorld {
    fn has_decal(&self, name: &str) -> bool {
        self.decals.contains(&name.to_ascii_lowercase())
    }
}

impl ResourceProvider for MemoryWorld {
    fn support_resource(&self) -> Option<SupportResource> {
        self.support.clone()
    }
}
