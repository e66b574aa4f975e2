//! Binding of MBF codepointer parameters.
//!
//! Legacy MBF codepointers read their parameters from a state's two misc
//! fields (or, for MBF21, from `Args1`..`Args8`). The modern routines take
//! named arguments instead, so every queued state gets a new callable that
//! passes the legacy values as constants.

use std::str::FromStr;

use dehacked_types::{ActionArg, Callable, MbfArgs, SoundId, fixed_to_f64};
use strum::EnumString;

use crate::engine::{MbfParamState, PatchEngine};
use crate::world::World;

const CHAN_BODY: i32 = 4;
const ATTN_NONE: f64 = 0.0;
const ATTN_NORM: f64 = 1.0;
const MSF_CLASSIC: i32 = 1;

/// How the legacy values of one alias become routine arguments. Keyed by
/// the alias name without its `A_` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
enum MbfFactory {
    Mushroom,
    Spawn,
    Turn,
    Face,
    Scratch,
    PlaySound,
    RandomJump,
    LineEffect,
    SpawnObject,
    MonsterProjectile,
    MonsterBulletAttack,
    MonsterMeleeAttack,
    RadiusDamage,
    HealChase,
    SeekTracer,
    FindTracer,
    JumpIfHealthBelow,
    #[strum(
        serialize = "JumpIfTargetInSight",
        serialize = "JumpIfTargetCloser",
        serialize = "JumpIfTracerInSight",
        serialize = "JumpIfTracerCloser"
    )]
    JumpIf,
    WeaponProjectile,
    WeaponBulletAttack,
    WeaponMeleeAttack,
    WeaponSound,
    #[strum(
        serialize = "WeaponJump",
        serialize = "CheckAmmo",
        serialize = "RefireTo",
        serialize = "GunFlashTo"
    )]
    WeaponJump,
    ConsumeAmmo,
    JumpIfFlagsSet,
    #[strum(serialize = "AddFlags", serialize = "RemoveFlags")]
    FlagSet,
}

impl MbfFactory {
    fn for_alias(alias: &str) -> Option<Self> {
        let bare = alias
            .get(..2)
            .filter(|p| p.eq_ignore_ascii_case("A_"))
            .map_or(alias, |_| &alias[2..]);
        MbfFactory::from_str(bare).ok()
    }

    /// Only the random jump hands a state back to the state machine.
    fn returns_state(self) -> bool {
        self == MbfFactory::RandomJump
    }

    /// Whether the factory reads `ArgsN` rather than the misc fields.
    fn uses_args(self) -> bool {
        !matches!(
            self,
            MbfFactory::Mushroom
                | MbfFactory::Spawn
                | MbfFactory::Turn
                | MbfFactory::Face
                | MbfFactory::Scratch
                | MbfFactory::PlaySound
                | MbfFactory::RandomJump
                | MbfFactory::LineEffect
        )
    }
}

/// Argument getters over one state's legacy values.
struct LegacyParams<'a> {
    engine: &'a mut PatchEngine,
    args: MbfArgs,
}

impl LegacyParams<'_> {
    fn raw(&self, i: usize) -> i64 {
        self.args.args[i]
    }

    /// Thing types are 1-based indices into the info names.
    fn type_arg(&self, i: usize) -> ActionArg {
        let num = self.raw(i);
        let names = &self.engine.info_names;
        let class = usize::try_from(num)
            .ok()
            .filter(|&n| n > 0 && n < names.len())
            .map(|n| names[n - 1]);
        ActionArg::Class(class)
    }

    fn state_arg(&mut self, i: usize) -> ActionArg {
        let num = self.raw(i);
        ActionArg::State(self.engine.find_state(num))
    }

    fn int_arg(&self, i: usize, default: i32) -> ActionArg {
        let value = if self.args.is_set(i) { self.raw(i) as i32 } else { default };
        ActionArg::Int(value)
    }

    fn sound_arg(&self, i: usize) -> ActionArg {
        let num = if self.args.is_set(i) { self.raw(i) } else { 0 };
        ActionArg::Sound(self.engine.tables.sound(num))
    }

    fn float_arg(&self, i: usize, default: f64) -> ActionArg {
        let value = if self.args.is_set(i) { fixed_to_f64(self.raw(i)) } else { default };
        ActionArg::Float(value)
    }

    fn legacy_sound(&self, value: i32) -> SoundId {
        self.engine.tables.sound(i64::from(value))
    }
}

/// Build the constant arguments for `factory`. `None` means the state
/// cannot be bound and keeps its plain routine.
fn build_args(
    factory: MbfFactory,
    p: &mut LegacyParams<'_>,
    world: &dyn World,
    misc1: i32,
    misc2: i32,
) -> Option<Vec<ActionArg>> {
    use ActionArg::{Class, Float, Int, Name, State};

    let args = match factory {
        MbfFactory::Mushroom => vec![
            Class(world.find_class("FatShot")),
            Int(0),
            Int(MSF_CLASSIC),
            Float(if misc1 != 0 { fixed_to_f64(misc1.into()) } else { 4.0 }),
            Float(if misc2 != 0 { fixed_to_f64(misc2.into()) } else { 0.5 }),
        ],
        MbfFactory::Spawn => {
            let class = usize::try_from(misc1)
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|n| p.engine.info_names.get(n).copied());
            let Some(class) = class else {
                log::warn!("No class found for dehackednum {misc1}");
                return None;
            };
            vec![Class(Some(class)), Float(0.0), Float(misc2.into()), Int(0), Int(0)]
        }
        MbfFactory::Turn => vec![Float(misc1.into())],
        MbfFactory::Face => vec![Float(misc1.into()), Int(0), Int(0)],
        MbfFactory::Scratch => vec![
            Int(misc1),
            ActionArg::Sound(p.legacy_sound(misc2)),
            ActionArg::Sound(SoundId::NONE),
            Name("None".to_string()),
            Int(1),
        ],
        MbfFactory::PlaySound => vec![
            ActionArg::Sound(p.legacy_sound(misc1)),
            Int(CHAN_BODY),
            Float(1.0),
            Int(0),
            Float(if misc2 != 0 { ATTN_NONE } else { ATTN_NORM }),
            Int(0),
            Float(0.0),
        ],
        MbfFactory::RandomJump => {
            let target = p.engine.find_state(misc1.into());
            vec![Int(misc2), State(target)]
        }
        MbfFactory::LineEffect => vec![Int(misc1), Int(misc2)],
        MbfFactory::SpawnObject => {
            let mut args = vec![p.type_arg(0)];
            args.extend((1..8).map(|i| p.float_arg(i, 0.0)));
            args
        }
        MbfFactory::MonsterProjectile | MbfFactory::WeaponProjectile => {
            let mut args = vec![p.type_arg(0)];
            args.extend((1..5).map(|i| p.float_arg(i, 0.0)));
            args
        }
        MbfFactory::MonsterBulletAttack => vec![
            p.float_arg(0, 0.0),
            p.float_arg(1, 0.0),
            p.int_arg(2, 1),
            p.int_arg(3, 3),
            p.int_arg(4, 5),
        ],
        MbfFactory::WeaponBulletAttack => vec![
            p.float_arg(0, 0.0),
            p.float_arg(1, 0.0),
            p.int_arg(2, 1),
            p.int_arg(3, 5),
            p.int_arg(4, 3),
        ],
        MbfFactory::MonsterMeleeAttack => vec![
            p.int_arg(0, 3),
            p.int_arg(1, 8),
            p.sound_arg(2),
            p.float_arg(3, 0.0),
        ],
        MbfFactory::WeaponMeleeAttack => vec![
            p.int_arg(0, 2),
            p.int_arg(1, 10),
            p.float_arg(2, 1.0),
            p.sound_arg(3),
            p.float_arg(4, 0.0),
        ],
        MbfFactory::RadiusDamage | MbfFactory::FlagSet => vec![p.int_arg(0, 0), p.int_arg(1, 0)],
        MbfFactory::HealChase => vec![p.state_arg(0), p.sound_arg(1)],
        MbfFactory::SeekTracer => vec![p.float_arg(0, 0.0), p.float_arg(1, 0.0)],
        MbfFactory::FindTracer => vec![p.float_arg(0, 0.0), p.int_arg(1, 10)],
        MbfFactory::JumpIfHealthBelow | MbfFactory::WeaponJump => {
            vec![p.state_arg(0), p.int_arg(1, 0)]
        }
        MbfFactory::JumpIf => vec![p.state_arg(0), p.float_arg(1, 0.0)],
        MbfFactory::JumpIfFlagsSet => vec![p.state_arg(0), p.int_arg(1, 0), p.int_arg(2, 0)],
        MbfFactory::WeaponSound => vec![p.sound_arg(0), p.int_arg(1, 0)],
        MbfFactory::ConsumeAmmo => vec![p.int_arg(0, 0)],
    };
    Some(args)
}

fn bind_state(engine: &mut PatchEngine, world: &mut dyn World, pending: MbfParamState) {
    let Some(alias) = engine.tables.aliases.get(pending.alias).cloned() else {
        log::error!("Unmanaged dehacked codepointer alias num {}", pending.alias);
        return;
    };
    let Some(factory) = MbfFactory::for_alias(&alias.alias) else {
        log::error!("No parameter conversion for codepointer {}", alias.alias);
        return;
    };
    let Some(symbol) = world.find_function(&alias.name) else {
        return;
    };

    let (misc1, misc2) = {
        let record = world.state(pending.state);
        (record.misc1, record.misc2)
    };
    let args = engine.state_args.get(&pending.state).copied().unwrap_or_default();
    // MBF21 routines get their argument defaults even when no `ArgsN` key
    // was given. Classic aliases without misc values keep the plain routine.
    let unset = if factory.uses_args() {
        args.used == 0 && alias.arity == 0
    } else {
        misc1 == 0 && misc2 == 0
    };
    if unset {
        return;
    }
    if factory.uses_args() && u32::from(args.used) >= 1u32 << alias.arity.min(8) {
        log::warn!("Too many args for {}", alias.name);
    }

    let mut params = LegacyParams { engine, args };
    let Some(consts) = build_args(factory, &mut params, world, misc1, misc2) else {
        return;
    };

    let name = format!("Dehacked.{}.{misc1}.{misc2}", alias.name);
    log::debug!("Binding {name}");
    let bound = Callable::bind_constants(&symbol.callable, name, consts, factory.returns_state());
    world.state_mut(pending.state).action = Some(bound);
}

/// Bind every queued MBF state. Runs while the lookup tables are still
/// loaded.
pub(crate) fn bind_pending(engine: &mut PatchEngine, world: &mut dyn World) {
    let pending = std::mem::take(&mut engine.mbf_param_states);
    for entry in pending {
        bind_state(engine, world, entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_pick_factories() {
        assert_eq!(MbfFactory::for_alias("A_Mushroom"), Some(MbfFactory::Mushroom));
        assert_eq!(MbfFactory::for_alias("a_randomjump"), Some(MbfFactory::RandomJump));
        assert_eq!(MbfFactory::for_alias("A_RefireTo"), Some(MbfFactory::WeaponJump));
        assert_eq!(MbfFactory::for_alias("A_JumpIfTracerCloser"), Some(MbfFactory::JumpIf));
        assert_eq!(MbfFactory::for_alias("A_RemoveFlags"), Some(MbfFactory::FlagSet));
        assert_eq!(MbfFactory::for_alias("Turn"), Some(MbfFactory::Turn));
        assert_eq!(MbfFactory::for_alias("A_Die"), None);
    }

    #[test]
    fn only_random_jump_returns_state() {
        assert!(MbfFactory::RandomJump.returns_state());
        assert!(!MbfFactory::Spawn.returns_state());
        assert!(!MbfFactory::WeaponJump.returns_state());
    }

    #[test]
    fn getters_apply_defaults() {
        let mut engine = PatchEngine::new();
        let mut args = MbfArgs::default();
        args.set(1, 0x18000);
        let p = LegacyParams {
            engine: &mut engine,
            args,
        };
        assert_eq!(p.int_arg(0, 3), ActionArg::Int(3));
        assert_eq!(p.float_arg(1, 0.0), ActionArg::Float(1.5));
        assert_eq!(p.float_arg(2, 1.0), ActionArg::Float(1.0));
        assert_eq!(p.sound_arg(3), ActionArg::Sound(SoundId::NONE));
        assert_eq!(p.type_arg(0), ActionArg::Class(None));
    }
}
