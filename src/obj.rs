//! The runtime value model: a single tagged union of every object the
//! interpreter can touch, plus constructors and the printer.

use std::{
    cell::RefCell,
    fmt::{self, Display},
    rc::Rc,
};

use crate::error::EvalError;

/// Shared handle to a heap object. Everything the reader builds and the
/// evaluator produces is one of these; cons cells and environment frames are
/// mutated in place through the `RefCell`.
pub type ObjRef = Rc<RefCell<Obj>>;

/// A native operation. It receives the environment of the call site and the
/// *unevaluated* argument list, and decides for itself what to evaluate.
pub type PrimFn = fn(&ObjRef, &ObjRef) -> Result<ObjRef, EvalError>;

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Obj {
    /// Machine integers.
    Int(i64),
    /// Cons cell. The cdr may be any object; dotted pairs are permitted.
    Pair(ObjRef, ObjRef),
    /// Symbols. Two symbols with the same name are the same object; the
    /// interner in [`crate::symbol`] enforces this, so identity checks are
    /// `Rc::ptr_eq`.
    Symbol(String),
    /// Byte strings. The reader never produces these; the constructor exists
    /// for native code.
    Str(String),
    /// Native operations.
    Primitive(PrimFn),
    /// A closure: flat parameter list, body forms, and the environment that
    /// was current when the closure was created.
    Function {
        params: ObjRef,
        body: ObjRef,
        env: ObjRef,
    },
    /// Same shape as `Function`, but applied to unevaluated argument forms
    /// before the call site is evaluated.
    Macro {
        params: ObjRef,
        body: ObjRef,
        env: ObjRef,
    },
    /// An environment frame: an association list of `(symbol . value)` pairs
    /// and an optional parent. The root frame has no parent.
    Env {
        vars: ObjRef,
        parent: Option<ObjRef>,
    },
    /// The empty list, which doubles as the false value.
    Nil,
    /// The truth value, printed as `t`.
    True,
}

impl From<Obj> for ObjRef {
    fn from(value: Obj) -> Self {
        Rc::new(RefCell::new(value))
    }
}

/// Allocate a cons cell.
pub fn cons(car: ObjRef, cdr: ObjRef) -> ObjRef {
    Obj::Pair(car, cdr).into()
}

/// Prepend the pair `(key . value)` to an association list.
pub fn acons(key: ObjRef, value: ObjRef, alist: ObjRef) -> ObjRef {
    cons(cons(key, value), alist)
}

/// Whether `obj` can head a cdr chain: nil or a cons cell.
pub fn is_list(obj: &ObjRef) -> bool {
    matches!(&*obj.borrow(), Obj::Nil | Obj::Pair(_, _))
}

impl Obj {
    pub fn as_int(&self) -> Result<i64, String> {
        match self {
            Obj::Int(value) => Ok(*value),
            _ => Err(format!("{self} is not an integer")),
        }
    }

    pub fn as_pair(&self) -> Result<(ObjRef, ObjRef), String> {
        match self {
            Obj::Pair(car, cdr) => Ok((car.clone(), cdr.clone())),
            _ => Err(format!("{self} is not a pair")),
        }
    }

    pub fn as_symbol_name(&self) -> Result<String, String> {
        match self {
            Obj::Symbol(name) => Ok(name.clone()),
            _ => Err(format!("{self} is not a symbol")),
        }
    }

    pub fn set_cdr(&mut self, value: ObjRef) -> Result<(), String> {
        match self {
            Obj::Pair(_, cdr) => {
                *cdr = value;
                Ok(())
            }
            _ => Err(format!("{self} is not a pair")),
        }
    }
}

/// Structural equality. Symbols and strings compare by content (interning
/// makes same-named symbols one object anyway), callables and frames only by
/// identity of the underlying function pointer or never.
impl PartialEq for Obj {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Obj::Int(a), Obj::Int(b)) => a == b,
            (Obj::Symbol(a), Obj::Symbol(b)) => a == b,
            (Obj::Str(a), Obj::Str(b)) => a == b,
            (Obj::Pair(a1, d1), Obj::Pair(a2, d2)) => a1 == a2 && d1 == d2,
            (Obj::Primitive(a), Obj::Primitive(b)) => std::ptr::fn_addr_eq(*a, *b),
            (Obj::Nil, Obj::Nil) | (Obj::True, Obj::True) => true,
            _ => false,
        }
    }
}

impl Eq for Obj {}

impl<T> FromIterator<T> for Obj
where
    T: Into<ObjRef>,
{
    fn from_iter<It: IntoIterator<Item = T>>(iter: It) -> Self {
        let items: Vec<_> = iter.into_iter().collect();
        let mut cur = Obj::Nil;
        for value in items.into_iter().rev() {
            cur = Obj::Pair(value.into(), cur.into());
        }
        cur
    }
}

impl Display for Obj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Obj::Int(value) => write!(f, "{value}"),
            Obj::Symbol(name) => write!(f, "{name}"),
            Obj::Str(bytes) => write!(f, "{bytes}"),
            Obj::Nil => write!(f, "()"),
            Obj::True => write!(f, "t"),
            Obj::Primitive(_) => write!(f, "<primitive>"),
            Obj::Function { .. } => write!(f, "<function>"),
            Obj::Macro { .. } => write!(f, "<macro>"),
            Obj::Env { .. } => write!(f, "<env>"),
            Obj::Pair(car, cdr) => {
                write!(f, "({}", car.borrow())?;
                let mut rest = cdr.clone();
                loop {
                    let next = match &*rest.borrow() {
                        Obj::Nil => None,
                        Obj::Pair(car, cdr) => {
                            write!(f, " {}", car.borrow())?;
                            Some(cdr.clone())
                        }
                        tail => {
                            write!(f, " . {tail}")?;
                            None
                        }
                    };
                    match next {
                        Some(cdr) => rest = cdr,
                        None => break,
                    }
                }
                write!(f, ")")
            }
        }
    }
}

/// Build a proper list from the given elements. Accepts anything convertible
/// to [`ObjRef`]; yields an [`Obj`].
#[macro_export]
macro_rules! list {
    () => {
        $crate::obj::Obj::Nil
    };
    ($($elem:expr),+ $(,)?) => {
        [$($crate::obj::ObjRef::from($elem)),+]
            .into_iter()
            .collect::<$crate::obj::Obj>()
    };
}
