//! The evaluator: symbol lookup, list dispatch, macro expansion and function
//! application. All interpreter state lives in environment frames; the walk
//! itself is a plain recursive descent over cons cells.

use std::rc::Rc;

use crate::{
    env,
    error::EvalError,
    logger::log_debug,
    obj::{Obj, ObjRef, PrimFn, is_list},
    util::vectorize,
};

enum Form {
    SelfEval,
    Symbol(String),
    Combination(ObjRef, ObjRef),
    Bug(&'static str),
}

/// Evaluate `obj` in `env`.
pub fn eval(env: &ObjRef, obj: &ObjRef) -> Result<ObjRef, EvalError> {
    // Deeply nested programs recurse through here; grow the stack on demand.
    stacker::maybe_grow(32 * 1024, 1024 * 1024, || {
        let form = match &*obj.borrow() {
            Obj::Int(_)
            | Obj::Str(_)
            | Obj::Nil
            | Obj::True
            | Obj::Primitive(_)
            | Obj::Function { .. } => Form::SelfEval,
            Obj::Symbol(name) => Form::Symbol(name.clone()),
            Obj::Pair(car, cdr) => Form::Combination(car.clone(), cdr.clone()),
            Obj::Macro { .. } => Form::Bug("eval: unexpected macro object"),
            Obj::Env { .. } => Form::Bug("eval: unexpected environment object"),
        };
        match form {
            Form::SelfEval => Ok(obj.clone()),
            Form::Symbol(name) => match env::find(env, obj) {
                Some(bind) => Ok(bind.borrow().as_pair()?.1),
                None => Err(EvalError::UndefinedSymbol(name)),
            },
            Form::Combination(car, cdr) => {
                let expanded = macroexpand(env, obj)?;
                if !Rc::ptr_eq(&expanded, obj) {
                    return eval(env, &expanded);
                }
                let func = eval(env, &car)?;
                apply(env, &func, &cdr)
            }
            Form::Bug(message) => Err(EvalError::Internal(message.to_string())),
        }
    })
}

enum Callee {
    Prim(PrimFn),
    Func(ObjRef, ObjRef, ObjRef),
}

/// Apply `func` to the unevaluated argument list `args`.
///
/// Primitives receive the arguments as-is. Functions evaluate every argument
/// in the caller's environment, then run their body in a fresh frame chained
/// under the environment captured at creation time.
pub fn apply(env: &ObjRef, func: &ObjRef, args: &ObjRef) -> Result<ObjRef, EvalError> {
    if !is_list(args) {
        return Err(EvalError::Message("argument must be a list".to_string()));
    }
    let callee = match &*func.borrow() {
        Obj::Primitive(f) => Callee::Prim(*f),
        Obj::Function { params, body, env } => {
            Callee::Func(params.clone(), body.clone(), env.clone())
        }
        _ => return Err(EvalError::NotCallable),
    };
    match callee {
        Callee::Prim(f) => f(env, args),
        Callee::Func(params, body, captured) => {
            let values = eval_list(env, args)?;
            let frame = env::push_env(&captured, &params, &values)?;
            progn(&frame, &body)
        }
    }
}

/// Evaluate every element of a proper list and collect the results into a
/// new list.
pub fn eval_list(env: &ObjRef, list: &ObjRef) -> Result<ObjRef, EvalError> {
    let mut values = Vec::new();
    for item in vectorize(list.clone())? {
        values.push(eval(env, &item)?);
    }
    Ok(values.into_iter().collect::<Obj>().into())
}

/// Evaluate a sequence of forms in order and return the last result. The
/// empty sequence yields nil.
pub fn progn(env: &ObjRef, body: &ObjRef) -> Result<ObjRef, EvalError> {
    let mut result: ObjRef = Obj::Nil.into();
    for form in vectorize(body.clone())? {
        result = eval(env, &form)?;
    }
    Ok(result)
}

/// Expand `obj` one level if it is a call to a symbol currently bound to a
/// macro; otherwise return it untouched (the same object, so callers can
/// detect "no expansion" by identity).
///
/// The macro body runs in a frame that binds the parameters to the
/// *unevaluated* argument forms, chained under the caller's environment.
pub fn macroexpand(env: &ObjRef, obj: &ObjRef) -> Result<ObjRef, EvalError> {
    let (head, args) = match &*obj.borrow() {
        Obj::Pair(car, cdr) => (car.clone(), cdr.clone()),
        _ => return Ok(obj.clone()),
    };
    if !matches!(&*head.borrow(), Obj::Symbol(_)) {
        return Ok(obj.clone());
    }
    let Some(bind) = env::find(env, &head) else {
        return Ok(obj.clone());
    };
    let value = bind.borrow().as_pair()?.1;
    let (params, body) = match &*value.borrow() {
        Obj::Macro { params, body, .. } => (params.clone(), body.clone()),
        _ => return Ok(obj.clone()),
    };
    let frame = env::push_env(env, &params, &args)?;
    let expansion = progn(&frame, &body)?;
    log_debug(format!(
        "macroexpand: {} => {}",
        obj.borrow(),
        expansion.borrow()
    ));
    Ok(expansion)
}
