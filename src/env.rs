//! The environment module.
//!
//! An environment frame is an `Obj::Env`: an association list of
//! `(symbol . value)` cons cells and an optional parent frame. Frames chain
//! through their parent pointers up to the root, which has none. Lookup
//! returns the binding cell itself so that assignment can mutate its cdr in
//! place; every closure holding the frame sees the mutation.

use std::rc::Rc;

use crate::error::EvalError;
use crate::obj::{Obj, ObjRef, acons};
use crate::util::vectorize;

/// Allocate a frame from an existing binding alist and an optional parent.
pub fn make_env(vars: ObjRef, parent: Option<ObjRef>) -> ObjRef {
    Obj::Env { vars, parent }.into()
}

/// Prepend the binding `(sym . val)` to the frame's local variables. The new
/// binding shadows any later one for the same symbol in this frame.
pub fn add_variable(env: &ObjRef, sym: ObjRef, val: ObjRef) {
    match &mut *env.borrow_mut() {
        Obj::Env { vars, .. } => {
            let rest = vars.clone();
            *vars = acons(sym, val, rest);
        }
        _ => unreachable!("add_variable: not an environment"),
    }
}

/// Walk the frame chain and return the first binding cell whose car is `sym`.
/// Symbols are interned, so the comparison is pointer identity.
pub fn find(env: &ObjRef, sym: &ObjRef) -> Option<ObjRef> {
    let mut frame = env.clone();
    loop {
        let (vars, parent) = match &*frame.borrow() {
            Obj::Env { vars, parent } => (vars.clone(), parent.clone()),
            _ => unreachable!("find: not an environment"),
        };
        let mut cell = vars;
        loop {
            let next = match &*cell.borrow() {
                Obj::Pair(bind, rest) => {
                    if let Obj::Pair(key, _) = &*bind.borrow() {
                        if Rc::ptr_eq(key, sym) {
                            return Some(bind.clone());
                        }
                    }
                    rest.clone()
                }
                _ => break,
            };
            cell = next;
        }
        match parent {
            Some(outer) => frame = outer,
            None => return None,
        }
    }
}

/// Build a child frame of `parent` binding each parameter symbol to the
/// value at the same position. The counts must match.
pub fn push_env(parent: &ObjRef, params: &ObjRef, values: &ObjRef) -> Result<ObjRef, EvalError> {
    let params = vectorize(params.clone())?;
    let values = vectorize(values.clone())?;
    if params.len() != values.len() {
        return Err(EvalError::ArityMismatch);
    }
    let mut vars: ObjRef = Obj::Nil.into();
    for (sym, val) in params.into_iter().zip(values) {
        vars = acons(sym, val, vars);
    }
    Ok(make_env(vars, Some(parent.clone())))
}
