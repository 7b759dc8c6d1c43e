//! Package-type conversion.
//!
//! `(module S)` and `(module S with type t = u and ...)` embed a module type
//! into a core type. Only a restricted subset of module types is accepted:
//! a bare identifier, or an identifier refined by `with type` equations whose
//! declarations are plain abstract aliases. Anything richer raises
//! [`SyntaxError::InvalidPackageType`] naming the unsupported feature.

use crate::ast::*;
use crate::diagnostics::SyntaxError;

/// Convert a module type into a package type.
///
/// ## Errors
/// `InvalidPackageType` when the module type is not an identifier (optionally
/// refined by `with type` constraints), or when a constraint declaration has
/// type parameters, `constraint` clauses, private visibility, a non-abstract
/// kind, or no right-hand side.
pub fn package_type(mty: &ModuleType) -> Result<PackageType, SyntaxError> {
    match &mty.desc {
        ModTypeDesc::Ident(path) => Ok(PackageType {
            path: path.clone(),
            constraints: Vec::new(),
        }),
        ModTypeDesc::With(inner, constraints) => {
            let path = match &inner.desc {
                ModTypeDesc::Ident(path) => path.clone(),
                _ => {
                    return Err(SyntaxError::invalid_package_type(
                        "only module type identifiers can be constrained",
                        inner.loc.span(),
                    ));
                }
            };
            let mut equations = Vec::with_capacity(constraints.len());
            for constraint in constraints {
                let WithConstraint::Type(name, decl) = constraint;
                equations.push((name.clone(), constraint_rhs(decl)?));
            }
            Ok(PackageType {
                path,
                constraints: equations,
            })
        }
        _ => Err(SyntaxError::invalid_package_type(
            "only module type identifiers are supported",
            mty.loc.span(),
        )),
    }
}

/// Validate one `with type` declaration and extract its right-hand side.
fn constraint_rhs(decl: &TypeDecl) -> Result<CoreType, SyntaxError> {
    let at = decl.loc.span();
    if !decl.params.is_empty() {
        return Err(SyntaxError::invalid_package_type(
            "parametrized types are not supported",
            at,
        ));
    }
    if !decl.cstrs.is_empty() {
        return Err(SyntaxError::invalid_package_type(
            "constrained types are not supported",
            at,
        ));
    }
    if decl.private_ == PrivateFlag::Private {
        return Err(SyntaxError::invalid_package_type(
            "private types are not supported",
            at,
        ));
    }
    if !matches!(decl.kind, TypeKind::Abstract) {
        return Err(SyntaxError::invalid_package_type(
            "only abstract type declarations are supported",
            at,
        ));
    }
    match &decl.manifest {
        Some(rhs) => Ok(rhs.clone()),
        None => Err(SyntaxError::invalid_package_type(
            "a type equation is required",
            at,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> Location {
        Location::real(Span::new(0, 10))
    }

    fn mty_ident(name: &str) -> ModuleType {
        ModuleType::mk(
            ModTypeDesc::Ident(Loc::new(Longident::ident(name), loc())),
            loc(),
        )
    }

    fn int_ty() -> CoreType {
        CoreType::mk(
            TypeDesc::Constr(Loc::new(Longident::ident("int"), loc()), Vec::new()),
            loc(),
        )
    }

    fn with_type(decl: TypeDecl) -> ModuleType {
        ModuleType::mk(
            ModTypeDesc::With(
                Box::new(mty_ident("S")),
                vec![WithConstraint::Type(
                    Loc::new(Longident::ident("t"), loc()),
                    decl,
                )],
            ),
            loc(),
        )
    }

    fn plain_decl() -> TypeDecl {
        let mut decl = TypeDecl::abstract_(Loc::new("t".to_string(), loc()), loc());
        decl.manifest = Some(int_ty());
        decl
    }

    #[test]
    fn test_bare_identifier() {
        let pkg = package_type(&mty_ident("S")).unwrap();
        assert_eq!(pkg.path.txt, Longident::ident("S"));
        assert!(pkg.constraints.is_empty());
    }

    #[test]
    fn test_single_equation() {
        let pkg = package_type(&with_type(plain_decl())).unwrap();
        assert_eq!(pkg.constraints.len(), 1);
        assert_eq!(pkg.constraints[0].0.txt, Longident::ident("t"));
        assert!(matches!(
            pkg.constraints[0].1.desc,
            TypeDesc::Constr(ref id, _) if id.txt == Longident::ident("int")
        ));
    }

    #[test]
    fn test_parametrized_type_rejected() {
        let mut decl = plain_decl();
        decl.params.push(CoreType::mk(TypeDesc::Var("a".to_string()), loc()));
        let err = package_type(&with_type(decl)).unwrap_err();
        assert!(matches!(
            err,
            SyntaxError::InvalidPackageType {
                reason: "parametrized types are not supported",
                ..
            }
        ));
    }

    #[test]
    fn test_private_type_rejected() {
        let mut decl = plain_decl();
        decl.private_ = PrivateFlag::Private;
        let err = package_type(&with_type(decl)).unwrap_err();
        assert!(matches!(
            err,
            SyntaxError::InvalidPackageType {
                reason: "private types are not supported",
                ..
            }
        ));
    }

    #[test]
    fn test_variant_kind_rejected() {
        let mut decl = plain_decl();
        decl.kind = TypeKind::Variant(Vec::new());
        let err = package_type(&with_type(decl)).unwrap_err();
        assert!(matches!(err, SyntaxError::InvalidPackageType { .. }));
    }

    #[test]
    fn test_missing_equation_rejected() {
        let decl = TypeDecl::abstract_(Loc::new("t".to_string(), loc()), loc());
        let err = package_type(&with_type(decl)).unwrap_err();
        assert!(matches!(
            err,
            SyntaxError::InvalidPackageType {
                reason: "a type equation is required",
                ..
            }
        ));
    }

    #[test]
    fn test_signature_rejected() {
        let sig = ModuleType::mk(ModTypeDesc::Signature(Vec::new()), loc());
        let err = package_type(&sig).unwrap_err();
        assert!(matches!(err, SyntaxError::InvalidPackageType { .. }));
    }
}
