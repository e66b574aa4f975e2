//! The patch engine context and the top-level patch driver.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use dehacked_data::values::{atoi, signature_version};
use dehacked_data::{PatchCursor, PatchLine};
use dehacked_types::{ClassId, DehInfo, MbfArgs, StateId};

use crate::error::DehError;
use crate::pickup::DehSpriteMap;
use crate::section::Patcher;
use crate::tables::{LookupTables, StateMapper};
use crate::world::{StringOverride, World};

const SIGNATURE: &[u8] = b"Patch File for DeHackEd v";

/// A state whose action is an MBF-compatible routine that still needs its
/// legacy parameters bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MbfParamState {
    pub state: StateId,
    /// Index into the descriptor's alias table.
    pub alias: usize,
}

/// All cross-patch state of the DeHackEd loader.
///
/// One context lives for the whole data-load phase: every patch is applied
/// through it, then [`PatchEngine::finish`] runs once.
#[derive(Debug, Default)]
pub struct PatchEngine {
    pub(crate) active_loads: u32,
    pub(crate) tables: LookupTables,
    /// Survives between top-level loads; cleared by `finish`.
    pub(crate) state_map: Vec<StateMapper>,
    pub(crate) info_names: Vec<ClassId>,
    pub(crate) weapon_names: Vec<ClassId>,
    pub(crate) mbf_param_states: Vec<MbfParamState>,
    pub(crate) state_args: HashMap<StateId, MbfArgs>,
    pub(crate) touched_actors: Vec<ClassId>,
    /// Original engine strings not yet claimed by a `Text` replacement.
    pub(crate) english_strings: Vec<(String, String)>,
    pub(crate) deh_strings: BTreeMap<String, StringOverride>,
    pub(crate) deh: DehInfo,
    pub(crate) explicit_ammo_use: HashSet<ClassId>,
    pub(crate) changed_states: bool,
    pub(crate) sprite_map: DehSpriteMap,
    pub(crate) including: bool,
    pub(crate) include_notext: bool,
    skip_text: bool,
    next_file_id: u32,
    pub(crate) current_file_id: u32,
}

impl PatchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deh_info(&self) -> &DehInfo {
        &self.deh
    }

    /// String overrides collected so far; installed into the world by
    /// `finish`.
    pub fn string_overrides(&self) -> &BTreeMap<String, StringOverride> {
        &self.deh_strings
    }

    pub fn touched_actors(&self) -> &[ClassId] {
        &self.touched_actors
    }

    pub fn sprite_map(&self) -> &DehSpriteMap {
        &self.sprite_map
    }

    pub fn active_loads(&self) -> u32 {
        self.active_loads
    }

    /// Ignore `Text` sections in every patch loaded from now on.
    pub fn set_skip_text(&mut self, skip: bool) {
        self.skip_text = skip;
    }

    pub(crate) fn skipping_text(&self) -> bool {
        self.skip_text || self.include_notext
    }

    /// Read and apply the patch at `path`.
    pub fn load_file(&mut self, world: &mut dyn World, path: &Path) -> Result<(), DehError> {
        let data = std::fs::read(path).map_err(|source| DehError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.apply_patch(world, path, data)
    }

    /// Apply patch text that did not come from a file. `name` is used for
    /// diagnostics and to resolve relative includes.
    pub fn load_bytes(
        &mut self,
        world: &mut dyn World,
        name: &str,
        data: Vec<u8>,
    ) -> Result<(), DehError> {
        self.apply_patch(world, Path::new(name), data)
    }

    fn apply_patch(
        &mut self,
        world: &mut dyn World,
        path: &Path,
        mut data: Vec<u8>,
    ) -> Result<(), DehError> {
        let name = path.display().to_string();
        log::info!("Adding dehacked patch {name}");

        let signed = data.starts_with(SIGNATURE);
        let mut start = 0;
        if signed {
            let first_end = data.iter().position(|&b| b == b'\n');
            let first_line = String::from_utf8_lossy(&data[..first_end.unwrap_or(data.len())]);
            match signature_version(&first_line) {
                Some(version) if version >= (2, 3) => {}
                _ => return Err(DehError::OldPatch { name }),
            }
            // Some patches in the wild contain stray NULs.
            for b in data.iter_mut().filter(|b| **b == 0) {
                *b = b' ';
            }
            start = match first_end {
                Some(end) => end,
                None => return Err(DehError::NotAPatch { name }),
            };
        }

        let mut cursor = PatchCursor::at(&data, start);
        let mut doom_version = -1;
        let mut patch_format = -1;
        let first = loop {
            match cursor.next_line() {
                Some(PatchLine::KeyValue { key, value }) => {
                    if !signed {
                        continue;
                    }
                    if key.eq_ignore_ascii_case("Doom version") {
                        doom_version = atoi(&value);
                    } else if key.eq_ignore_ascii_case("Patch format") {
                        patch_format = atoi(&value);
                    }
                }
                other => break other,
            }
        };

        if signed {
            if first.is_none() || doom_version == -1 || patch_format == -1 {
                return Err(DehError::NotAPatch { name });
            }
        } else {
            log::debug!("{name} does not have DeHackEd signature. Assuming .bex");
            doom_version = 19;
            patch_format = 6;
        }

        if patch_format != 5 && patch_format != 6 {
            log::warn!("DeHackEd patch version is {patch_format}. Unexpected results may occur.");
        }

        let version_index = match doom_version {
            16 => 0,
            17 => 2,
            19 => 3,
            20 => 1,
            21 => 4,
            other => {
                log::warn!("Patch created with unknown DOOM version {other}. Assuming version 1.9.");
                3
            }
        };

        if let Err(err) = self.load_tables(world) {
            log::warn!("Could not load DEH support data: {err}");
            return Err(err.into());
        }

        self.next_file_id += 1;
        let saved_file = std::mem::replace(&mut self.current_file_id, self.next_file_id);

        let mut patcher = Patcher {
            engine: &mut *self,
            world: &mut *world,
            cursor,
            version_index,
            path,
            pending: None,
        };
        let mut line = first;
        while let Some(current) = line.take() {
            match current {
                PatchLine::KeyValue { key, .. } => {
                    log::warn!("Key {key} encountered out of context");
                }
                PatchLine::Header { word, rest } => {
                    line = patcher.dispatch(&word, &rest);
                }
            }
        }

        self.current_file_id = saved_file;
        self.release_tables(world);
        log::info!("Patch installed");
        Ok(())
    }
}
