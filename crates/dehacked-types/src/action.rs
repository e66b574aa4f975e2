//! Callable action routines attached to states.
//!
//! A [`Callable`] is an opaque behavior object. Patches never see routine
//! bodies; they only pick routines by name and, for the MBF-compatible
//! routines, bake constant arguments into a new callable with
//! [`Callable::bind_constants`].

use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::ids::{ClassId, SoundId, StateId};

/// One explicit argument passed to an action routine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ActionArg {
    Int(i32),
    Float(f64),
    Class(Option<ClassId>),
    State(Option<StateId>),
    Sound(SoundId),
    Name(String),
}

/// The standard arguments every routine receives from the state machine.
///
/// Actor routines use only `actor`; weapon routines also receive the state
/// owner and the calling state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImplicitArgs {
    pub actor: u32,
    pub owner: Option<u32>,
    pub state: Option<StateId>,
}

type ActionFn = dyn Fn(&ImplicitArgs, &[ActionArg]) -> Option<StateId>;

/// A routine that can be attached to a state.
#[derive(Clone)]
pub struct Callable {
    name: String,
    implicit_args: u8,
    returns_state: bool,
    body: Rc<ActionFn>,
}

impl Callable {
    /// Wrap a host-provided routine.
    pub fn native<F>(name: impl Into<String>, implicit_args: u8, returns_state: bool, body: F) -> Self
    where
        F: Fn(&ImplicitArgs, &[ActionArg]) -> Option<StateId> + 'static,
    {
        Callable {
            name: name.into(),
            implicit_args,
            returns_state,
            body: Rc::new(body),
        }
    }

    /// Partially apply `base`: the result forwards its implicit arguments
    /// unchanged and always passes `consts` as the explicit arguments.
    ///
    /// When `returns_state` is set, the jump target produced by `base` is
    /// propagated as the new callable's own result.
    pub fn bind_constants(
        base: &Callable,
        name: impl Into<String>,
        consts: Vec<ActionArg>,
        returns_state: bool,
    ) -> Callable {
        let target = Rc::clone(&base.body);
        Callable {
            name: name.into(),
            implicit_args: base.implicit_args,
            returns_state,
            body: Rc::new(move |implicit, _args| target(implicit, &consts)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn implicit_args(&self) -> u8 {
        self.implicit_args
    }

    pub fn returns_state(&self) -> bool {
        self.returns_state
    }

    pub fn call(&self, implicit: &ImplicitArgs, args: &[ActionArg]) -> Option<StateId> {
        let next = (self.body)(implicit, args);
        if self.returns_state { next } else { None }
    }

    /// True when both callables run the same routine body.
    pub fn same_routine(&self, other: &Callable) -> bool {
        Rc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.name)
            .field("implicit_args", &self.implicit_args)
            .field("returns_state", &self.returns_state)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub optional: bool,
}

/// A routine as published by the function registry.
#[derive(Debug, Clone)]
pub struct FunctionSymbol {
    pub callable: Callable,
    pub params: Vec<ParamSpec>,
    pub is_virtual: bool,
}

impl FunctionSymbol {
    pub fn new(callable: Callable) -> Self {
        FunctionSymbol {
            callable,
            params: Vec::new(),
            is_virtual: false,
        }
    }

    pub fn name(&self) -> &str {
        self.callable.name()
    }

    /// Whether a state can call this routine without explicit arguments.
    pub fn callable_without_args(&self) -> bool {
        !self.is_virtual && self.params.iter().all(|p| p.optional)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn bound_constants_replace_explicit_args() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let base = Callable::native("A_Turn", 1, false, move |imp, args| {
            sink.borrow_mut().push((imp.actor, args.to_vec()));
            None
        });
        let bound = Callable::bind_constants(&base, "Dehacked.A_Turn.90.0", vec![ActionArg::Float(90.0)], false);

        let implicit = ImplicitArgs { actor: 7, ..Default::default() };
        bound.call(&implicit, &[ActionArg::Int(1)]);

        assert_eq!(bound.implicit_args(), 1);
        assert_eq!(*seen.borrow(), vec![(7, vec![ActionArg::Float(90.0)])]);
    }

    #[test]
    fn jump_result_propagates_only_when_declared() {
        let base = Callable::native("A_Jump", 1, true, |_, _| Some(StateId(12)));
        let jumping = Callable::bind_constants(&base, "jump", vec![], true);
        let silent = Callable::bind_constants(&base, "nojump", vec![], false);
        let implicit = ImplicitArgs::default();
        assert_eq!(jumping.call(&implicit, &[]), Some(StateId(12)));
        assert_eq!(silent.call(&implicit, &[]), None);
    }

    #[test]
    fn clones_share_routine_identity() {
        let a = Callable::native("A_FirePistol", 3, false, |_, _| None);
        let b = a.clone();
        let c = Callable::native("A_FirePistol", 3, false, |_, _| None);
        assert!(a.same_routine(&b));
        assert!(!a.same_routine(&c));
    }
}
