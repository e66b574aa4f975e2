use dehacked_data::values::atoi;

use crate::section::Patcher;

/// Offset of the sprite name table inside each supported executable,
/// indexed by the patch's executable version.
const SPRITE_TABLE_OFFSETS: [i32; 5] = [129044, 129044, 129044, 129284, 129380];
const SPRITE_NAMES_BASE: i32 = 22044;

impl Patcher<'_> {
    pub(crate) fn patch_sprite(&mut self, spr_num: i32) {
        let org_count = self.engine.tables.org_spr_names.len();
        let spr_index = usize::try_from(spr_num).ok().filter(|&i| i < org_count);
        if spr_index.is_none() {
            log::warn!("Sprite {spr_num} out of range.");
        }

        let mut offset = 0;
        while let Some((key, value)) = self.next_pair() {
            if key.eq_ignore_ascii_case("Offset") {
                offset = atoi(&value);
            } else {
                self.unknown_key(&key, "Sprite", spr_num);
            }
        }

        let Some(spr_index) = spr_index else {
            return;
        };
        if offset <= 0 {
            return;
        }
        let table_offset = SPRITE_TABLE_OFFSETS[self.version_index.min(4)];
        let name_index = (offset - table_offset - SPRITE_NAMES_BASE) / 8;
        let tables = &self.engine.tables;
        let Some(&new_name) = usize::try_from(name_index)
            .ok()
            .and_then(|i| tables.org_spr_names.get(i))
        else {
            log::warn!("Sprite name {name_index} out of range.");
            return;
        };
        let old_name = tables.org_spr_names[spr_index];
        if let Some(sprite) = tables.find_sprite(old_name.as_bytes()) {
            self.world.rename_sprite(sprite, new_name);
        }
    }
}
