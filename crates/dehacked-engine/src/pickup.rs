//! Sprite-based identity for patched pickups.
//!
//! A patched pickup is replaced by a generic `DehackedPickup` subclass that
//! decides at run time which item it stands for by looking at its sprite.

use dehacked_types::SpriteName;

const DEFAULT_MAPPINGS: [(&str, &str); 36] = [
    ("AMMO", "ClipBox"),
    ("ARM1", "GreenArmor"),
    ("ARM2", "BlueArmor"),
    ("BFUG", "BFG9000"),
    ("BKEY", "BlueCard"),
    ("BON1", "HealthBonus"),
    ("BON2", "ArmorBonus"),
    ("BPAK", "Backpack"),
    ("BROK", "RocketBox"),
    ("BSKU", "BlueSkull"),
    ("CELL", "Cell"),
    ("CELP", "CellPack"),
    ("CLIP", "Clip"),
    ("CSAW", "Chainsaw"),
    ("LAUN", "RocketLauncher"),
    ("MEDI", "Medikit"),
    ("MEGA", "Megasphere"),
    ("MGUN", "Chaingun"),
    ("PINS", "BlurSphere"),
    ("PINV", "InvulnerabilitySphere"),
    ("PLAS", "PlasmaRifle"),
    ("PMAP", "Allmap"),
    ("PSTR", "Berserk"),
    ("PVIS", "Infrared"),
    ("RKEY", "RedCard"),
    ("ROCK", "RocketAmmo"),
    ("RSKU", "RedSkull"),
    ("SBOX", "ShellBox"),
    ("SGN2", "SuperShotgun"),
    ("SHEL", "Shell"),
    ("SHOT", "Shotgun"),
    ("SOUL", "Soulsphere"),
    ("STIM", "Stimpack"),
    ("SUIT", "RadSuit"),
    ("YKEY", "YellowCard"),
    ("YSKU", "YellowSkull"),
];

/// Sprite to pickup class table, kept sorted by sprite name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DehSpriteMap {
    entries: Vec<(SpriteName, &'static str)>,
}

impl Default for DehSpriteMap {
    fn default() -> Self {
        DehSpriteMap {
            entries: DEFAULT_MAPPINGS
                .iter()
                .map(|&(sprite, class)| (SpriteName::new(sprite), class))
                .collect(),
        }
    }
}

impl DehSpriteMap {
    /// The pickup class a `DehackedPickup` showing `sprite` pretends to be.
    pub fn determine_type(&self, sprite: SpriteName) -> Option<&'static str> {
        self.entries
            .binary_search_by(|(name, _)| name.cmp(&sprite))
            .ok()
            .map(|i| self.entries[i].1)
    }

    /// Rename the first entry using `old`, then move it to keep the table
    /// sorted.
    pub fn rename(&mut self, old: SpriteName, new: SpriteName) {
        let Some(mut i) = self.entries.iter().position(|(name, _)| *name == old) else {
            return;
        };
        self.entries[i].0 = new;
        while i > 0 && self.entries[i - 1].0 > new {
            self.entries.swap(i - 1, i);
            i -= 1;
        }
        while i + 1 < self.entries.len() && self.entries[i + 1].0 < new {
            self.entries.swap(i + 1, i);
            i += 1;
        }
    }

    pub fn is_sorted(&self) -> bool {
        self.entries.windows(2).all(|w| w[0].0 <= w[1].0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SpriteName, &'static str)> + '_ {
        self.entries.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sorted() {
        let map = DehSpriteMap::default();
        assert!(map.is_sorted());
        assert_eq!(map.determine_type(SpriteName::new("MEDI")), Some("Medikit"));
        assert_eq!(map.determine_type(SpriteName::new("TROO")), None);
    }

    #[test]
    fn rename_moves_entry_forward_and_back() {
        let mut map = DehSpriteMap::default();
        map.rename(SpriteName::new("SHEL"), SpriteName::new("AAAA"));
        assert!(map.is_sorted());
        assert_eq!(map.iter().next(), Some((SpriteName::new("AAAA"), "Shell")));

        map.rename(SpriteName::new("AMMO"), SpriteName::new("ZZZZ"));
        assert!(map.is_sorted());
        assert_eq!(map.determine_type(SpriteName::new("ZZZZ")), Some("ClipBox"));
        assert_eq!(map.determine_type(SpriteName::new("AMMO")), None);
    }

    #[test]
    fn rename_onto_existing_name_keeps_order() {
        let mut map = DehSpriteMap::default();
        map.rename(SpriteName::new("SHEL"), SpriteName::new("AMMO"));
        assert!(map.is_sorted());
        assert!(map.determine_type(SpriteName::new("AMMO")).is_some());
    }
}
