use std::rc::Rc;

use ast::ast::Type;
use ast::ident::Ident;

use crate::typecheck::TypeEnv;

/// Expands synonym names until a structural head appears, then recurses
/// into arrows and tuples. A name with no entry in the environment stays
/// as it is: an abstract type is not an error here.
pub fn normalize(env: &TypeEnv, ty: &Rc<Type>) -> Rc<Type> {
    match &**ty {
        Type::Named(name) => match env.lookup(name) {
            Some(expansion) => normalize(env, &expansion),
            None => ty.clone(),
        },
        Type::Arrow(dom, rng) => Type::arrow(normalize(env, dom), normalize(env, rng)),
        Type::Tuple(parts) => Type::tuple(parts.iter().map(|p| normalize(env, p)).collect()),
        Type::Int | Type::Bool | Type::String => ty.clone(),
    }
}

/// Would registering `name = def` let normalization loop? Expands `def`
/// the way `normalize` will once the binding exists, with `name` reading
/// as `def`, and reports any name that comes back while still on the
/// expansion path.
pub fn is_cyclic(env: &TypeEnv, name: &Ident, def: &Rc<Type>) -> bool {
    fn expand(
        env: &TypeEnv,
        name: &Ident,
        def: &Rc<Type>,
        ty: &Rc<Type>,
        path: &mut Vec<Ident>,
    ) -> bool {
        match &**ty {
            Type::Named(n) => {
                if path.contains(n) {
                    return true;
                }
                let next = if n == name {
                    Some(def.clone())
                } else {
                    env.lookup(n)
                };
                match next {
                    Some(expansion) => {
                        path.push(n.clone());
                        let found = expand(env, name, def, &expansion, path);
                        path.pop();
                        found
                    }
                    None => false,
                }
            }
            Type::Arrow(dom, rng) => {
                expand(env, name, def, dom, path) || expand(env, name, def, rng, path)
            }
            Type::Tuple(parts) => parts.iter().any(|p| expand(env, name, def, p, path)),
            Type::Int | Type::Bool | Type::String => false,
        }
    }
    expand(env, name, def, def, &mut vec![name.clone()])
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use ast::ast::Type;
    use ast::env::Env;
    use ast::ident::Ident;

    use super::normalize;

    fn env_with(aliases: &[(&str, Rc<Type>)]) -> Env<Rc<Type>> {
        let env = Env::new();
        for (name, ty) in aliases {
            env.insert(Ident::new(*name), ty.clone());
        }
        env
    }

    #[test]
    fn base_types_are_fixed_points() {
        let env = Env::new();
        assert_eq!(normalize(&env, &Type::int()), Type::int());
        assert_eq!(normalize(&env, &Type::bool()), Type::bool());
    }

    #[test]
    fn synonym_chains_expand_transitively() {
        let env = env_with(&[
            ("Count", Type::int()),
            ("Step", Type::named("Count")),
        ]);
        assert_eq!(normalize(&env, &Type::named("Step")), Type::int());
    }

    #[test]
    fn expansion_reaches_under_arrows_and_tuples() {
        let env = env_with(&[("Count", Type::int())]);
        let ty = Type::arrow(
            Type::named("Count"),
            Type::tuple(vec![Type::named("Count"), Type::bool()]),
        );
        assert_eq!(
            normalize(&env, &ty),
            Type::arrow(Type::int(), Type::tuple(vec![Type::int(), Type::bool()]))
        );
    }

    #[test]
    fn unknown_names_are_left_abstract() {
        let env = Env::new();
        let ty = Type::named("Opaque");
        assert_eq!(normalize(&env, &ty), ty);
    }

    #[test]
    fn self_reference_is_cyclic_even_under_constructors() {
        let env = Env::new();
        let a = Ident::new("A");
        assert!(super::is_cyclic(&env, &a, &Type::named("A")));
        assert!(super::is_cyclic(
            &env,
            &a,
            &Type::arrow(Type::int(), Type::tuple(vec![Type::named("A")]))
        ));
        assert!(!super::is_cyclic(&env, &a, &Type::named("B")));
    }

    #[test]
    fn cycles_through_existing_synonyms_are_found() {
        let env = env_with(&[("B", Type::named("A"))]);
        assert!(super::is_cyclic(&env, &Ident::new("A"), &Type::named("B")));
    }

    #[test]
    fn redefining_a_name_uses_its_new_meaning() {
        // B was recorded against the old A = Int; rebinding A to B would
        // close a loop even though the old expansion of B is finite.
        let env = env_with(&[("A", Type::int()), ("B", Type::named("A"))]);
        assert!(super::is_cyclic(&env, &Ident::new("A"), &Type::named("B")));
        assert!(!super::is_cyclic(&env, &Ident::new("C"), &Type::named("B")));
    }

    #[test]
    fn normalize_is_idempotent() {
        let env = env_with(&[("Count", Type::int()), ("Pair", Type::tuple(vec![Type::named("Count"), Type::named("Count")]))]);
        let once = normalize(&env, &Type::named("Pair"));
        assert_eq!(normalize(&env, &once), once);
    }
}
