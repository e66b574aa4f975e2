mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{apply, patched};
use dehacked_engine::world::{ClassRegistry, StateTable};
use dehacked_engine::{MemoryWorld, PatchEngine};
use dehacked_types::{ActionArg, Callable, FunctionSymbol, ImplicitArgs, StateRecord};

const DESCRIPTOR: &str = r#"
    ActionList { NULL, Mushroom, RandomJump, SpawnObject, Look };
    StateMap { DoomImp, Spawn, 4 };
    InfoNames { DoomImp, FatShot };
    AmmoNames { };
    WeaponNames { };
    Aliases {
        A_Mushroom, A_Mushroom, 0,
        A_RandomJump, A_RandomJump, 0,
        A_SpawnObject, MBF21_SpawnObject, 2,
    };
"#;

type Calls = Rc<RefCell<Vec<Vec<ActionArg>>>>;

/// A routine that records the arguments of every call and jumps to the
/// first state argument it receives.
fn recording(name: &str, returns_state: bool, calls: &Calls) -> FunctionSymbol {
    let sink = Rc::clone(calls);
    FunctionSymbol::new(Callable::native(name, 1, returns_state, move |_, args| {
        sink.borrow_mut().push(args.to_vec());
        args.iter().find_map(|arg| match arg {
            ActionArg::State(state) => *state,
            _ => None,
        })
    }))
}

fn imp_world(calls: &Calls) -> MemoryWorld {
    let mut world = MemoryWorld::new();
    let actor = world.add_class("Actor", None);
    world.add_class("FatShot", Some(actor));
    let imp = world.add_class("DoomImp", Some(actor));
    world.add_states(imp, "Spawn", vec![StateRecord::default(); 4]);
    for (name, jumps) in [
        ("A_Mushroom", false),
        ("A_RandomJump", true),
        ("A_SpawnObject", false),
        ("A_Look", false),
        ("MBF21_SpawnObject", false),
    ] {
        world.add_function(recording(name, jumps, calls));
    }
    world.set_support(DESCRIPTOR, true);
    world
}

fn action_of(world: &MemoryWorld, frame: u32) -> Callable {
    let imp = world.find_class("DoomImp").expect("DoomImp");
    let spawn = world.find_state(imp, "Spawn").expect("Spawn");
    world
        .state(spawn.offset(frame - 1))
        .action
        .clone()
        .expect("action")
}

#[test]
fn legacy_misc_values_become_constants() {
    let calls = Calls::default();
    let mut world = imp_world(&calls);
    let mut engine = PatchEngine::new();
    apply(
        &mut engine,
        &mut world,
        "Frame 1\n\
         Unknown 1 = 131072\n\
         Unknown 2 = 65536\n\
         [CODEPTR]\n\
         Frame 1 = Mushroom\n",
    );

    let action = action_of(&world, 1);
    assert_eq!(action.name(), "Dehacked.A_Mushroom.131072.65536");
    assert!(!action.returns_state());
    action.call(&ImplicitArgs::default(), &[]);

    let fat_shot = world.find_class("FatShot");
    assert_eq!(
        calls.borrow()[0],
        vec![
            ActionArg::Class(fat_shot),
            ActionArg::Int(0),
            ActionArg::Int(1),
            ActionArg::Float(2.0),
            ActionArg::Float(1.0),
        ]
    );
}

#[test]
fn random_jump_returns_its_target() {
    let calls = Calls::default();
    let mut world = imp_world(&calls);
    let mut engine = PatchEngine::new();
    apply(
        &mut engine,
        &mut world,
        "Frame 2\nUnknown 1 = 4\nUnknown 2 = 128\n[CODEPTR]\nFrame 2 = RandomJump\n",
    );

    let action = action_of(&world, 2);
    assert!(action.returns_state());
    let imp = world.find_class("DoomImp").expect("DoomImp");
    let target = world.find_state(imp, "Spawn").map(|s| s.offset(3));
    assert_eq!(action.call(&ImplicitArgs::default(), &[]), target);
    assert_eq!(calls.borrow()[0], vec![ActionArg::Int(128), ActionArg::State(target)]);
}

#[test]
fn mbf21_args_are_bound() {
    let calls = Calls::default();
    let mut world = imp_world(&calls);
    let mut engine = PatchEngine::new();
    apply(
        &mut engine,
        &mut world,
        "Frame 3\nArgs1 = 1\nArgs2 = 98304\n[CODEPTR]\nFrame 3 = A_SpawnObject\n",
    );

    let action = action_of(&world, 3);
    assert_eq!(action.name(), "Dehacked.MBF21_SpawnObject.0.0");
    action.call(&ImplicitArgs::default(), &[]);

    let calls = calls.borrow();
    let args = &calls[0];
    assert_eq!(args.len(), 8);
    assert_eq!(args[0], ActionArg::Class(world.find_class("DoomImp")));
    assert_eq!(args[1], ActionArg::Float(1.5));
    assert_eq!(args[2], ActionArg::Float(0.0));
}

#[test]
fn mbf21_routines_without_args_get_defaults() {
    let calls = Calls::default();
    let mut world = imp_world(&calls);
    let mut engine = PatchEngine::new();
    apply(&mut engine, &mut world, "[CODEPTR]\nFrame 4 = A_SpawnObject\n");

    let action = action_of(&world, 4);
    assert_eq!(action.name(), "Dehacked.MBF21_SpawnObject.0.0");
    action.call(&ImplicitArgs::default(), &[]);

    let calls = calls.borrow();
    let mut expected = vec![ActionArg::Class(None)];
    expected.extend(std::iter::repeat_n(ActionArg::Float(0.0), 7));
    assert_eq!(calls[0], expected);
}

#[test]
fn states_without_values_keep_the_plain_routine() {
    let calls = Calls::default();
    let mut world = imp_world(&calls);
    let mut engine = PatchEngine::new();
    apply(&mut engine, &mut world, "[CODEPTR]\nFrame 1 = Mushroom\n");
    assert_eq!(action_of(&world, 1).name(), "A_Mushroom");
}

#[test]
fn binding_works_on_the_shipped_descriptor() {
    let (_, world) = patched("Frame 115\nUnknown 1 = 5\n[CODEPTR]\nFrame 115 = Mushroom\n");
    let zombie = world.find_class("ZombieMan").expect("ZombieMan");
    let spawn = world.find_state(zombie, "Spawn").expect("Spawn");
    let name = world.state(spawn).action.as_ref().map(|a| a.name().to_string());
    assert_eq!(name.as_deref(), Some("Dehacked.A_Mushroom.5.0"));
}
