use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ident::Ident;

/// Chained scope frames mapping identifiers to `T`s. Lookup walks innermost
/// to outermost and returns the first hit. Frames are shared: cloning an
/// `Env` is cheap, and every clone sees later `insert`s into the frames it
/// shares. That sharing is what makes `val rec` work — a closure captures
/// the top-level frame before the driver inserts the binding into it.
pub struct Env<T> {
    frame: Rc<RefCell<HashMap<Ident, T>>>,
    next: Option<Rc<Env<T>>>,
}

impl<T> Clone for Env<T> {
    fn clone(&self) -> Self {
        Env {
            frame: self.frame.clone(),
            next: self.next.clone(),
        }
    }
}

impl<T: Clone> Env<T> {
    pub fn new() -> Env<T> {
        Env {
            frame: Rc::new(RefCell::new(HashMap::new())),
            next: None,
        }
    }

    /// A new environment with one extra frame holding a single binding. The
    /// receiver is untouched, so siblings never see the binding.
    pub fn extended(&self, name: Ident, val: T) -> Env<T> {
        let frame = HashMap::from([(name, val)]);
        Env {
            frame: Rc::new(RefCell::new(frame)),
            next: Some(Rc::new(self.clone())),
        }
    }

    /// A new environment with one extra empty frame.
    pub fn nested(&self) -> Env<T> {
        Env {
            frame: Rc::new(RefCell::new(HashMap::new())),
            next: Some(Rc::new(self.clone())),
        }
    }

    /// Bind a name in the innermost frame, shadowing any previous binding
    /// of the same name in it.
    pub fn insert(&self, name: Ident, val: T) {
        self.frame.borrow_mut().insert(name, val);
    }

    pub fn lookup(&self, name: &Ident) -> Option<T> {
        if let Some(val) = self.frame.borrow().get(name) {
            return Some(val.clone());
        }
        self.next.as_ref().and_then(|next| next.lookup(name))
    }
}

impl<T: Clone> Default for Env<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Env<T> {
    /// Values may refer back to this environment through captured closures,
    /// so only the bound names are printed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut env = self;
        loop {
            let frame = env.frame.borrow();
            let mut names: Vec<&str> = frame.keys().map(Ident::name).collect();
            names.sort_unstable();
            write!(f, "[{}]", names.join(", "))?;
            match &env.next {
                Some(next) => {
                    write!(f, " -> ")?;
                    env = next.as_ref();
                }
                None => return Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Env;
    use crate::ident::Ident;

    #[test]
    fn lookup_walks_innermost_first() {
        let outer = Env::new();
        outer.insert(Ident::new("x"), 1);
        outer.insert(Ident::new("y"), 2);
        let inner = outer.extended(Ident::new("x"), 10);
        assert_eq!(inner.lookup(&Ident::new("x")), Some(10));
        assert_eq!(inner.lookup(&Ident::new("y")), Some(2));
        assert_eq!(outer.lookup(&Ident::new("x")), Some(1));
        assert_eq!(inner.lookup(&Ident::new("z")), None);
    }

    #[test]
    fn extension_is_invisible_to_siblings() {
        let base = Env::new();
        let left = base.extended(Ident::new("x"), 1);
        let right = base.extended(Ident::new("y"), 2);
        assert_eq!(left.lookup(&Ident::new("y")), None);
        assert_eq!(right.lookup(&Ident::new("x")), None);
    }

    #[test]
    fn shared_frames_see_later_inserts() {
        let base = Env::new();
        let copy = base.clone();
        base.insert(Ident::new("f"), 7);
        assert_eq!(copy.lookup(&Ident::new("f")), Some(7));
    }
}
