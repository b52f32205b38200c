//! The symbol interner.
//!
//! Symbols compare by identity, so every name must map to exactly one live
//! `Obj::Symbol`. The interner is the only place that allocates symbols; the
//! reader, the primitives and the REPL all go through [`intern`].

use std::{cell::RefCell, collections::HashMap};

use crate::obj::{Obj, ObjRef};

thread_local! {
    // The interpreter is single-threaded; a thread-local table keeps the
    // non-Send `Rc` handles out of any global synchronization.
    static SYMBOLS: RefCell<HashMap<String, ObjRef>> = RefCell::new(HashMap::new());
}

/// Return the symbol named `name`, allocating it on first use. Repeated calls
/// with the same name return the same object.
pub fn intern(name: &str) -> ObjRef {
    SYMBOLS.with(|table| {
        let mut table = table.borrow_mut();
        if let Some(sym) = table.get(name) {
            return sym.clone();
        }
        let sym: ObjRef = Obj::Symbol(name.to_string()).into();
        table.insert(name.to_string(), sym.clone());
        sym
    })
}
