//! Utility functions for walking argument lists.

use crate::obj::{Obj, ObjRef};

pub fn no_less_than_n_params<T>(lst: &[T], n: usize) -> Result<(), String> {
    if lst.len() < n {
        return Err("Fewer parameters than requested".to_string());
    }
    Ok(())
}

pub fn exactly_n_params<T>(lst: &[T], n: usize) -> Result<(), String> {
    if lst.len() > n {
        return Err("More parameters than requested".to_string());
    }
    no_less_than_n_params(lst, n)
}

/// Flatten `lst` into a vector and require exactly `n` elements.
pub fn get_n_params(lst: ObjRef, n: usize) -> Result<Vec<ObjRef>, String> {
    let result = vectorize(lst)?;
    exactly_n_params(&result, n)?;
    Ok(result)
}

/// Flatten a proper list into a vector of its elements.
pub fn vectorize(lst: ObjRef) -> Result<Vec<ObjRef>, String> {
    let mut cur = lst;
    let mut result = Vec::new();
    loop {
        let next = {
            match &*cur.borrow() {
                Obj::Pair(car, cdr) => {
                    result.push(car.clone());
                    Some(cdr.clone())
                }
                _ => None,
            }
        };
        match next {
            Some(next_cur) => cur = next_cur,
            None => break,
        }
    }
    if !matches!(&*cur.borrow(), Obj::Nil) {
        return Err("Not a proper list".to_string());
    }
    Ok(result)
}
