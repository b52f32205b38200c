//! The primitive operations of the initial global environment.
//!
//! Every primitive receives the call-site environment and its argument list
//! unevaluated, and evaluates exactly what its semantics call for. Special
//! forms are just primitives that leave some arguments alone.

use crate::{
    env::{self, add_variable},
    error::EvalError,
    eval::{self, eval, eval_list},
    obj::{Obj, ObjRef, PrimFn},
    symbol::intern,
    util::{get_n_params, no_less_than_n_params, vectorize},
};

/// Name/operation table of the root environment. The REPL completer draws
/// its candidates from here as well.
pub static PRIMITIVES: &[(&str, PrimFn)] = &[
    ("quote", prim_quote),
    ("list", prim_list),
    ("setq", prim_setq),
    ("define", prim_define),
    ("defun", prim_defun),
    ("defmacro", prim_defmacro),
    ("macroexpand", prim_macroexpand),
    ("lambda", prim_lambda),
    ("if", prim_if),
    ("+", prim_plus),
    ("=", prim_num_eq),
    ("println", prim_println),
    ("exit", prim_exit),
];

/// Bind every primitive in `env`, which should be the root frame.
pub fn install(env: &ObjRef) {
    for (name, operation) in PRIMITIVES {
        add_variable(env, intern(name), Obj::Primitive(*operation).into());
    }
}

/// `(quote x)` returns `x` unevaluated.
fn prim_quote(_env: &ObjRef, list: &ObjRef) -> Result<ObjRef, EvalError> {
    let args = get_n_params(list.clone(), 1).map_err(|_| EvalError::Malformed("quote"))?;
    Ok(args[0].clone())
}

/// `(list x ...)` evaluates every argument and returns the results as a list.
fn prim_list(env: &ObjRef, list: &ObjRef) -> Result<ObjRef, EvalError> {
    eval_list(env, list)
}

/// `(setq sym expr)` mutates an existing binding, wherever in the enclosing
/// frames it lives. Unlike `define` it never creates one.
fn prim_setq(env: &ObjRef, list: &ObjRef) -> Result<ObjRef, EvalError> {
    let args = get_n_params(list.clone(), 2).map_err(|_| EvalError::Malformed("setq"))?;
    let name = args[0]
        .borrow()
        .as_symbol_name()
        .map_err(|_| EvalError::Malformed("setq"))?;
    let bind = env::find(env, &args[0]).ok_or(EvalError::UnboundVariable(name))?;
    let value = eval(env, &args[1])?;
    bind.borrow_mut().set_cdr(value.clone())?;
    Ok(value)
}

/// `(define sym expr)` prepends a binding to the current frame.
fn prim_define(env: &ObjRef, list: &ObjRef) -> Result<ObjRef, EvalError> {
    let args = get_n_params(list.clone(), 2).map_err(|_| EvalError::Malformed("define"))?;
    if args[0].borrow().as_symbol_name().is_err() {
        return Err(EvalError::Malformed("define"));
    }
    let value = eval(env, &args[1])?;
    add_variable(env, args[0].clone(), value.clone());
    Ok(value)
}

enum FnKind {
    Function,
    Macro,
}

/// Build a closure from `((params...) body...)`. The parameter list must be
/// a flat list of symbols and the body must be non-empty. The closure
/// captures the environment current at creation time.
fn handle_function(env: &ObjRef, list: &ObjRef, kind: FnKind) -> Result<ObjRef, EvalError> {
    let (params, body) = match &*list.borrow() {
        Obj::Pair(car, cdr) => (car.clone(), cdr.clone()),
        _ => return Err(EvalError::Malformed("lambda")),
    };
    let symbols = vectorize(params.clone())
        .map_err(|_| EvalError::Message("Parameter list is not a flat list".to_string()))?;
    for sym in &symbols {
        if !matches!(&*sym.borrow(), Obj::Symbol(_)) {
            return Err(EvalError::Message("Parameter must be a symbol".to_string()));
        }
    }
    if !matches!(&*body.borrow(), Obj::Pair(_, _)) {
        return Err(EvalError::Malformed("lambda"));
    }
    let env = env.clone();
    Ok(match kind {
        FnKind::Function => Obj::Function { params, body, env },
        FnKind::Macro => Obj::Macro { params, body, env },
    }
    .into())
}

/// `(defun name (params...) body...)` and `(defmacro ...)` share this shape:
/// build the closure, bind it in the current frame, return it.
fn handle_defun(env: &ObjRef, list: &ObjRef, kind: FnKind) -> Result<ObjRef, EvalError> {
    let (name, rest) = match &*list.borrow() {
        Obj::Pair(car, cdr) => (car.clone(), cdr.clone()),
        _ => return Err(EvalError::Malformed("defun")),
    };
    if name.borrow().as_symbol_name().is_err() || !matches!(&*rest.borrow(), Obj::Pair(_, _)) {
        return Err(EvalError::Malformed("defun"));
    }
    let function = handle_function(env, &rest, kind)?;
    add_variable(env, name, function.clone());
    Ok(function)
}

fn prim_defun(env: &ObjRef, list: &ObjRef) -> Result<ObjRef, EvalError> {
    handle_defun(env, list, FnKind::Function)
}

fn prim_defmacro(env: &ObjRef, list: &ObjRef) -> Result<ObjRef, EvalError> {
    handle_defun(env, list, FnKind::Macro)
}

fn prim_lambda(env: &ObjRef, list: &ObjRef) -> Result<ObjRef, EvalError> {
    handle_function(env, list, FnKind::Function)
}

/// `(macroexpand form)` returns the one-level expansion of `form` without
/// evaluating the result.
fn prim_macroexpand(env: &ObjRef, list: &ObjRef) -> Result<ObjRef, EvalError> {
    let args = get_n_params(list.clone(), 1).map_err(|_| EvalError::Malformed("macroexpand"))?;
    eval::macroexpand(env, &args[0])
}

/// `(if cond then else...)`. The condition is false only if it is nil; the
/// else branch is a progn over the remaining forms.
fn prim_if(env: &ObjRef, list: &ObjRef) -> Result<ObjRef, EvalError> {
    let forms = vectorize(list.clone())?;
    no_less_than_n_params(&forms, 2).map_err(|_| EvalError::Malformed("if"))?;
    let cond = eval(env, &forms[0])?;
    if !matches!(&*cond.borrow(), Obj::Nil) {
        return eval(env, &forms[1]);
    }
    let mut result: ObjRef = Obj::Nil.into();
    for form in &forms[2..] {
        result = eval(env, form)?;
    }
    Ok(result)
}

/// `(+ x ...)` sums its evaluated arguments; the empty sum is 0.
fn prim_plus(env: &ObjRef, list: &ObjRef) -> Result<ObjRef, EvalError> {
    let mut sum = 0i64;
    for value in vectorize(eval_list(env, list)?)? {
        sum += value.borrow().as_int()?;
    }
    Ok(Obj::Int(sum).into())
}

/// `(= x y)` on two evaluated integers.
fn prim_num_eq(env: &ObjRef, list: &ObjRef) -> Result<ObjRef, EvalError> {
    let args = get_n_params(list.clone(), 2).map_err(|_| EvalError::Malformed("="))?;
    let x = eval(env, &args[0])?.borrow().as_int()?;
    let y = eval(env, &args[1])?.borrow().as_int()?;
    Ok(if x == y { Obj::True } else { Obj::Nil }.into())
}

/// `(println x)` prints the evaluated argument and a newline, returning nil.
fn prim_println(env: &ObjRef, list: &ObjRef) -> Result<ObjRef, EvalError> {
    let args = get_n_params(list.clone(), 1).map_err(|_| EvalError::Malformed("println"))?;
    let value = eval(env, &args[0])?;
    println!("{}", value.borrow());
    Ok(Obj::Nil.into())
}

/// `(exit)` leaves the process with a success status.
fn prim_exit(_env: &ObjRef, _list: &ObjRef) -> Result<ObjRef, EvalError> {
    std::process::exit(0);
}
