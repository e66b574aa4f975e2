use bitflags::bitflags;
use serde::Serialize;

use crate::action::Callable;
use crate::ids::StateId;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct StateFlags: u16 {
        const FULLBRIGHT   = 0x0001;
        /// Edited by a patch.
        const DEHACKED     = 0x0002;
        const CONSUME_AMMO = 0x0004;
        const SKILL5FAST   = 0x0008;
        /// Reachable from a weapon after state links were patched.
        const WEAPON_USE   = 0x0010;
    }
}

/// One animation frame of the state machine.
#[derive(Debug, Clone, Default)]
pub struct StateRecord {
    /// Index into the world's sprite table.
    pub sprite: usize,
    /// Sub-frame letter, 0 = 'A'.
    pub frame: u8,
    pub tics: i32,
    pub misc1: i32,
    pub misc2: i32,
    pub next: Option<StateId>,
    pub action: Option<Callable>,
    pub flags: StateFlags,
}

/// Eight MBF21 arguments plus a bitmask of which ones were set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MbfArgs {
    pub args: [i64; 8],
    pub used: u8,
}

impl MbfArgs {
    pub fn set(&mut self, index: usize, value: i64) {
        if index < self.args.len() {
            self.args[index] = value;
            self.used |= 1 << index;
        }
    }

    pub fn is_set(&self, index: usize) -> bool {
        index < self.args.len() && self.used & (1 << index) != 0
    }
}

/// Named entry points into a class's states (`Spawn`, `See`, `Death`, ...).
///
/// Label lookup is case-insensitive; insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateLabels(Vec<(String, Option<StateId>)>);

impl StateLabels {
    pub fn new() -> Self {
        StateLabels(Vec::new())
    }

    pub fn get(&self, label: &str) -> Option<StateId> {
        self.0
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(label))
            .and_then(|(_, state)| *state)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|(name, _)| name.eq_ignore_ascii_case(label))
    }

    /// Bind `label` to `state`, replacing an existing binding.
    pub fn set(&mut self, label: &str, state: Option<StateId>) {
        match self.0.iter_mut().find(|(name, _)| name.eq_ignore_ascii_case(label)) {
            Some(entry) => entry.1 = state,
            None => self.0.push((label.to_string(), state)),
        }
    }

    /// Add every label of `other` that is not already bound here.
    pub fn merge_missing(&mut self, other: &StateLabels) {
        for (name, state) in &other.0 {
            if !self.contains(name) {
                self.0.push((name.clone(), *state));
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<StateId>)> {
        self.0.iter().map(|(name, state)| (name.as_str(), *state))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_replace_case_insensitively() {
        let mut labels = StateLabels::new();
        labels.set("Spawn", Some(StateId(1)));
        labels.set("SPAWN", Some(StateId(4)));
        assert_eq!(labels.len(), 1);
        assert_eq!(labels.get("spawn"), Some(StateId(4)));
    }

    #[test]
    fn merge_keeps_existing_bindings() {
        let mut labels = StateLabels::new();
        labels.set("Spawn", Some(StateId(1)));
        let mut inventory = StateLabels::new();
        inventory.set("Spawn", Some(StateId(90)));
        inventory.set("HoldAndDestroy", Some(StateId(91)));

        labels.merge_missing(&inventory);
        assert_eq!(labels.get("Spawn"), Some(StateId(1)));
        assert_eq!(labels.get("HoldAndDestroy"), Some(StateId(91)));
    }

    #[test]
    fn mbf_args_track_usage() {
        let mut args = MbfArgs::default();
        args.set(2, 40);
        args.set(9, 1);
        assert!(args.is_set(2));
        assert!(!args.is_set(0));
        assert_eq!(args.used, 0b100);
    }
}
