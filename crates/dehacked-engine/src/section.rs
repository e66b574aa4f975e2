//! Section dispatch.

use std::path::Path;
use std::str::FromStr;

use dehacked_data::values::atoi;
use dehacked_data::{PatchCursor, PatchLine};
use strum::{Display, EnumString};

use crate::engine::PatchEngine;
use crate::world::World;

/// Every section header a patch may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Section {
    Thing,
    Sound,
    Frame,
    Sprite,
    Ammo,
    Weapon,
    Pointer,
    Cheat,
    Misc,
    Text,
    #[strum(serialize = "include")]
    Include,
    #[strum(serialize = "[STRINGS]")]
    Strings,
    #[strum(serialize = "[PARS]")]
    Pars,
    #[strum(serialize = "[CODEPTR]")]
    CodePtr,
    #[strum(serialize = "[MUSIC]")]
    Music,
}

/// Applies the sections of one patch file.
pub(crate) struct Patcher<'a> {
    pub engine: &'a mut PatchEngine,
    pub world: &'a mut dyn World,
    pub cursor: PatchCursor<'a>,
    /// Index into the per-executable-version offset tables.
    pub version_index: usize,
    pub path: &'a Path,
    /// The line that ended the current section body.
    pub pending: Option<PatchLine>,
}

impl Patcher<'_> {
    /// Run the handler for `word`. Returns the first line the handler did
    /// not consume.
    pub fn dispatch(&mut self, word: &str, rest: &str) -> Option<PatchLine> {
        let Ok(section) = Section::from_str(word) else {
            log::warn!("Unknown chunk {word} encountered. Skipping.");
            self.skip_body();
            return self.pending.take();
        };
        let num = atoi(rest);
        log::debug!("{section} {num}");
        match section {
            Section::Thing => self.patch_thing(num),
            Section::Frame => self.patch_frame(num),
            Section::Sprite => self.patch_sprite(num),
            Section::Ammo => self.patch_ammo(num),
            Section::Weapon => self.patch_weapon(num),
            Section::Pointer => self.patch_pointer(num, rest),
            Section::Misc => self.patch_misc(),
            Section::Text => self.patch_text(rest),
            Section::Include => self.include(rest),
            Section::Strings => self.patch_strings(),
            Section::Pars => self.patch_pars(),
            Section::CodePtr => self.patch_code_ptrs(),
            Section::Music => self.patch_music(),
            Section::Sound => self.skip_body(),
            Section::Cheat => {
                log::debug!("Dehacked cheats support removed by request");
                self.skip_body();
            }
        }
        self.pending.take()
    }

    /// Next `key = value` pair of the current section body. Any other line
    /// ends the body and is kept in `pending`.
    pub fn next_pair(&mut self) -> Option<(String, String)> {
        match self.cursor.next_line() {
            Some(PatchLine::KeyValue { key, value }) => Some((key, value)),
            other => {
                self.pending = other;
                None
            }
        }
    }

    pub fn skip_body(&mut self) {
        while self.next_pair().is_some() {}
    }

    pub fn unknown_key(&self, key: &str, section: &str, num: i32) {
        log::warn!("Unknown key {key} encountered in {section} {num}.");
    }
}
