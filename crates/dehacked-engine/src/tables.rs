//! Lookup tables that translate legacy positional ids into live handles.
//!
//! The tables are built from the DEHSUPP descriptor on the first
//! [`PatchEngine::load_tables`] of a load episode and torn down when the
//! matching [`PatchEngine::release_tables`] drops the use count to zero.

use dehacked_data::{RenderStyleEntry, ThingBitEntry, parse_dehsupp};
use dehacked_types::{ClassId, FunctionSymbol, SoundId, SpriteName, StateId};

use crate::engine::PatchEngine;
use crate::error::SupportError;
use crate::world::World;

/// One run of consecutive states in the legacy state numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateMapper {
    pub first: StateId,
    pub span: u32,
    pub owner: ClassId,
    pub owner_is_pickup: bool,
}

/// A legacy MBF codepointer name and the routine that implements it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodePointerAlias {
    pub alias: String,
    pub name: String,
    pub arity: u8,
}

/// Tables that only live while a load episode is active.
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    pub actions: Vec<Option<FunctionSymbol>>,
    pub org_heights: Vec<i32>,
    pub code_p_conv: Vec<i32>,
    pub org_spr_names: Vec<SpriteName>,
    pub sound_map: Vec<SoundId>,
    pub ammo_names: Vec<Option<ClassId>>,
    pub bit_names: Vec<ThingBitEntry>,
    pub style_names: Vec<RenderStyleEntry>,
    pub aliases: Vec<CodePointerAlias>,
    /// Sprite names as they were before any patch of this episode renamed
    /// them.
    pub unchanged_sprites: Vec<SpriteName>,
}

impl LookupTables {
    /// Index of `name` in the sprite table as it was before patching.
    pub fn find_sprite(&self, name: &[u8]) -> Option<usize> {
        self.unchanged_sprites.iter().position(|s| s.eq_bytes(name))
    }

    /// Render style number registered under `name`.
    pub fn find_style(&self, name: &str) -> Option<u8> {
        let style = self
            .style_names
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .map(|s| s.num);
        if style.is_none() {
            log::error!("Unknown render style {name}");
        }
        style
    }

    /// Alias table index of a legacy codepointer name.
    pub fn find_alias(&self, name: &str) -> Option<usize> {
        self.aliases.iter().position(|a| a.alias.eq_ignore_ascii_case(name))
    }

    /// Map a legacy sound index (1-based) to a sound id.
    pub fn sound(&self, index: i64) -> SoundId {
        usize::try_from(index)
            .ok()
            .filter(|&i| i > 0)
            .and_then(|i| self.sound_map.get(i - 1).copied())
            .unwrap_or(SoundId::NONE)
    }
}

fn resolve_class(world: &dyn World, what: &'static str, name: &str) -> Result<ClassId, SupportError> {
    world.find_class(name).ok_or_else(|| SupportError::Unresolved {
        what,
        name: name.to_string(),
    })
}

fn require_descendant(
    world: &dyn World,
    what: &'static str,
    name: &str,
    base: &str,
) -> Result<ClassId, SupportError> {
    let class = resolve_class(world, what, name)?;
    match world.find_class(base) {
        Some(base) if world.is_descendant_of(class, base) => Ok(class),
        _ => Err(SupportError::Unresolved {
            what,
            name: name.to_string(),
        }),
    }
}

impl PatchEngine {
    /// Acquire the lookup tables for one patch load. Nested loads share the
    /// tables of the outermost one.
    pub fn load_tables(&mut self, world: &mut dyn World) -> Result<(), SupportError> {
        let resource = world.support_resource().ok_or(SupportError::Missing)?;
        if !resource.from_base {
            log::warn!("DEHSUPP no longer supported. DEHACKED patch disabled.");
            return Err(SupportError::NotBase);
        }

        self.active_loads += 1;
        if self.active_loads > 1 {
            return Ok(());
        }
        if let Err(err) = self.build_tables(world, &resource.text) {
            self.active_loads -= 1;
            return Err(err);
        }
        Ok(())
    }

    fn build_tables(&mut self, world: &mut dyn World, text: &str) -> Result<(), SupportError> {
        if self.english_strings.is_empty() {
            self.english_strings = world.default_strings();
        }

        let supp = parse_dehsupp(text)?;
        let world: &dyn World = world;
        let mut tables = LookupTables {
            org_heights: supp.org_heights,
            code_p_conv: supp.code_p_conv,
            org_spr_names: supp.org_spr_names,
            bit_names: supp.thing_bits,
            style_names: supp.render_styles,
            unchanged_sprites: world.sprite_names().to_vec(),
            ..LookupTables::default()
        };

        for action in &supp.actions {
            let Some(action) = action else {
                tables.actions.push(None);
                continue;
            };
            let symbol = world
                .find_function(&format!("A_{action}"))
                .ok_or_else(|| SupportError::Unresolved {
                    what: "code pointer",
                    name: action.clone(),
                })?;
            if !symbol.callable_without_args() {
                log::warn!("Incompatible code pointer '{action}'");
            }
            tables.actions.push(Some(symbol));
        }

        // The state map outlives the tables so later top-level patches see
        // the runs of earlier ones.
        let mut state_map = Vec::new();
        if self.state_map.is_empty() {
            for entry in &supp.state_map {
                let owner = resolve_class(world, "actor type", &entry.class_name)?;
                let bad_range = || SupportError::BadStateRange {
                    class: entry.class_name.clone(),
                    label: entry.label.clone(),
                    span: entry.span,
                };
                let first = world.find_state(owner, &entry.label).ok_or_else(bad_range)?;
                if entry.span < 1 || !world.owns_state(owner, first.offset(entry.span - 1)) {
                    return Err(bad_range());
                }
                state_map.push(StateMapper {
                    first,
                    span: entry.span,
                    owner,
                    owner_is_pickup: world
                        .defaults(owner)
                        .flags
                        .contains(dehacked_types::ActorFlags::SPECIAL),
                });
            }
        }

        tables.sound_map = supp.sound_map.iter().map(|s| world.find_sound(s)).collect();

        self.info_names = supp
            .info_names
            .iter()
            .map(|name| resolve_class(world, "actor type", name))
            .collect::<Result<_, _>>()?;

        for ammo in &supp.ammo_names {
            let class = match ammo {
                Some(name) => Some(require_descendant(world, "ammo type", name, "Ammo")?),
                None => None,
            };
            tables.ammo_names.push(class);
        }

        self.weapon_names = supp
            .weapon_names
            .iter()
            .map(|name| require_descendant(world, "weapon type", name, "Weapon"))
            .collect::<Result<_, _>>()?;

        tables.aliases = supp
            .aliases
            .into_iter()
            .map(|a| CodePointerAlias {
                alias: a.alias,
                name: a.name,
                arity: a.arity,
            })
            .collect();

        if self.state_map.is_empty() {
            self.state_map = state_map;
        }
        self.tables = tables;
        Ok(())
    }

    /// Drop one use of the lookup tables. The last release binds pending
    /// MBF parameters, then frees the tables. The state map and the
    /// resolved thing and weapon classes stay until `finish`, which needs
    /// them for the slam and ammo passes.
    pub fn release_tables(&mut self, world: &mut dyn World) {
        self.active_loads = self.active_loads.saturating_sub(1);
        if self.active_loads > 0 {
            return;
        }
        crate::mbf::bind_pending(self, world);
        self.state_args.clear();
        self.mbf_param_states.clear();
        self.tables = LookupTables::default();
    }

    pub(crate) fn push_touched(&mut self, class: ClassId) {
        if !self.touched_actors.contains(&class) {
            self.touched_actors.push(class);
        }
    }

    /// Resolve a 1-based legacy state number through the state map. Hitting
    /// a state owned by a pickup marks its owner as touched.
    pub fn find_state(&mut self, statenum: i64) -> Option<StateId> {
        if statenum <= 0 {
            return None;
        }
        let mut first_num: i64 = 1;
        for i in 0..self.state_map.len() {
            let run = self.state_map[i];
            let span = i64::from(run.span);
            if statenum < first_num + span {
                if run.owner_is_pickup {
                    self.push_touched(run.owner);
                }
                let offset = u32::try_from(statenum - first_num).ok()?;
                return Some(run.first.offset(offset));
            }
            first_num += span;
        }
        None
    }

    /// Total number of legacy states covered by the state map.
    pub fn mapped_state_count(&self) -> u64 {
        self.state_map.iter().map(|r| u64::from(r.span)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(first: u32, span: u32, owner: u32, pickup: bool) -> StateMapper {
        StateMapper {
            first: StateId(first),
            span,
            owner: ClassId(owner),
            owner_is_pickup: pickup,
        }
    }

    #[test]
    fn find_state_walks_runs_in_order() {
        let mut engine = PatchEngine::new();
        engine.state_map = vec![run(100, 3, 1, false), run(10, 2, 2, true)];

        assert_eq!(engine.find_state(0), None);
        assert_eq!(engine.find_state(1), Some(StateId(100)));
        assert_eq!(engine.find_state(3), Some(StateId(102)));
        assert!(engine.touched_actors.is_empty());
        assert_eq!(engine.find_state(4), Some(StateId(10)));
        assert_eq!(engine.find_state(5), Some(StateId(11)));
        assert_eq!(engine.touched_actors, vec![ClassId(2)]);
        assert_eq!(engine.find_state(6), None);
        assert_eq!(engine.mapped_state_count(), 5);
    }

    #[test]
    fn touched_actors_stay_unique() {
        let mut engine = PatchEngine::new();
        engine.state_map = vec![run(0, 4, 7, true)];
        engine.find_state(1);
        engine.find_state(2);
        assert_eq!(engine.touched_actors, vec![ClassId(7)]);
    }

    #[test]
    fn last_release_keeps_what_finish_needs() {
        let support = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../dat/dehsupp.txt"));
        let mut world = crate::world_from_descriptor(support).expect("shipped descriptor");
        let mut engine = PatchEngine::new();
        engine.load_tables(&mut world).expect("tables");
        engine.load_tables(&mut world).expect("nested tables");
        engine.release_tables(&mut world);
        assert!(!engine.tables.actions.is_empty());

        engine.release_tables(&mut world);
        assert_eq!(engine.active_loads, 0);
        assert!(engine.tables.actions.is_empty());
        assert!(engine.tables.aliases.is_empty());
        assert_eq!(engine.mapped_state_count(), 225);
        assert_eq!(engine.info_names.len(), 137);
        assert_eq!(engine.weapon_names.len(), 9);

        engine.finish(&mut world);
        assert_eq!(engine.mapped_state_count(), 0);
        assert!(engine.weapon_names.is_empty());
    }

    #[test]
    fn sound_indices_are_one_based() {
        let tables = LookupTables {
            sound_map: vec![SoundId(5), SoundId(9)],
            ..LookupTables::default()
        };
        assert_eq!(tables.sound(0), SoundId::NONE);
        assert_eq!(tables.sound(1), SoundId(5));
        assert_eq!(tables.sound(2), SoundId(9));
        assert_eq!(tables.sound(3), SoundId::NONE);
    }
}
