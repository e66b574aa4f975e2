use dehacked_data::values::atoi;
use dehacked_types::SpriteName;

use crate::section::Patcher;
use crate::world::StringOverride;

/// Collapse runs of spaces and drop trailing ones, so texts that only
/// differ in padding compare equal.
fn normalize_spaces(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == ' ' && out.ends_with(' ') {
            continue;
        }
        out.push(c);
    }
    out.truncate(out.trim_end_matches(' ').len());
    out
}

impl Patcher<'_> {
    pub(crate) fn patch_text(&mut self, rest: &str) {
        let old_size = atoi(rest);
        let new_size_text = rest
            .split_once(|c: char| c <= ' ')
            .map(|(_, tail)| tail.trim_start())
            .unwrap_or("");
        if new_size_text.is_empty() {
            log::warn!("Text chunk is missing size of new string.");
            self.skip_body();
            return;
        }
        let new_size = atoi(new_size_text);

        let old_len = usize::try_from(old_size).unwrap_or(0);
        let new_len = usize::try_from(new_size).unwrap_or(0);
        let old_bytes = self.cursor.read_chars(old_len);
        let new_bytes = self.cursor.read_chars(new_len);
        if old_bytes.len() < old_len || new_bytes.len() < new_len {
            // Nothing is left to dispatch, so the patch ends here.
            log::warn!("Unexpected end-of-file.");
            return;
        }

        if self.engine.skipping_text() {
            log::info!("Skipping text chunk in included patch.");
        } else {
            self.replace_text(&old_bytes, &new_bytes);
        }

        // The text may end mid-line; resync on the next section header.
        self.skip_body();
    }

    fn replace_text(&mut self, old_bytes: &[u8], new_bytes: &[u8]) {
        let old_text = String::from_utf8_lossy(old_bytes).into_owned();
        let new_text = String::from_utf8_lossy(new_bytes).into_owned();
        log::debug!("Searching for text:\n{old_text}");

        if old_bytes.len() == 4 && self.rename_sprite_text(old_bytes, new_bytes) {
            return;
        }

        let file_id = self.engine.current_file_id;
        let entry = || StringOverride {
            value: new_text.clone(),
            file_id,
        };

        if old_text.eq_ignore_ascii_case("Doom") {
            // The one string-table id that clashes with ordinary words.
            self.engine.deh_strings.insert("MUSIC_DOOM".to_string(), entry());
            return;
        }

        let wanted = normalize_spaces(&old_text);
        let mut matched = false;
        while let Some(pos) = self
            .engine
            .english_strings
            .iter()
            .position(|(_, text)| normalize_spaces(text) == wanted)
        {
            let (id, _) = self.engine.english_strings.remove(pos);
            self.engine.deh_strings.insert(id, entry());
            matched = true;
        }
        if !matched {
            log::debug!("   (Unmatched)");
        }
    }

    /// Treat a four-byte text as a sprite rename. Returns false when the old
    /// text is not a sprite name.
    fn rename_sprite_text(&mut self, old_bytes: &[u8], new_bytes: &[u8]) -> bool {
        let Some(index) = self.engine.tables.find_sprite(old_bytes) else {
            return false;
        };
        let old = SpriteName::from_bytes(old_bytes);
        let new = SpriteName::from_bytes(new_bytes);
        self.world.rename_sprite(index, new);
        if old.eq_bytes(b"PLAY") {
            self.engine.deh.player_sprite = new;
        }
        for name in self.engine.tables.org_spr_names.iter_mut().filter(|n| **n == old) {
            *name = new;
        }
        self.engine.sprite_map.rename(old, new);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_spaces;

    #[test]
    fn spaces_collapse_and_trail() {
        assert_eq!(normalize_spaces("You  got   it!  "), "You got it!");
        assert_eq!(normalize_spaces("plain"), "plain");
        assert_eq!(normalize_spaces("a\n  b"), "a\n b");
    }
}
