use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Identifiers keep a precomputed hash for quick equality testing. The name
/// itself is reference-counted, so cloning an identifier never copies the
/// string.
#[derive(Clone)]
pub struct Ident {
    name: Rc<str>,
    hash: u64,
}

impl Ident {
    pub fn new(name: impl Into<Rc<str>>) -> Ident {
        let name = name.into();
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        let hash = hasher.finish();
        Ident { name, hash }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The identifier with a numeric suffix appended. Used for fresh-name
    /// generation during alpha-renaming.
    pub fn suffixed(&self, n: u64) -> Ident {
        Ident::new(format!("{}{}", self.name, n))
    }
}

impl PartialEq for Ident {
    /// If the hashes are the same the values are also checked, in case of a
    /// collision.
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.name == other.name
    }
}

impl Eq for Ident {}

impl Hash for Ident {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ident({})", self.name)
    }
}

impl From<&str> for Ident {
    fn from(name: &str) -> Ident {
        Ident::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::Ident;

    #[test]
    fn equality_is_by_value() {
        assert_eq!(Ident::new("x"), Ident::new("x"));
        assert_ne!(Ident::new("x"), Ident::new("y"));
    }

    #[test]
    fn suffixed_appends_digits() {
        let x = Ident::new("x");
        assert_eq!(x.suffixed(1).name(), "x1");
        assert_eq!(x.suffixed(12), Ident::new("x12"));
    }
}
