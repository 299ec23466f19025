//! The structural type system checked during parsing.
//!
//! `TypeCheckType` is the sum type every expression, declaration, and
//! procedure signature is checked against. Compatibility is one-directional:
//! `Auto` on the *expected* side absorbs any concrete *actual* type, but the
//! reverse never holds. This directionality is what lets bidirectional
//! inference work — the actual type of a value is threaded back in as the
//! expected type for later siblings (array elements, binary operator right
//! operands), concretizing any `Auto` placeholders along the way.

/// Upper bound on the number of sub-types a single `Array`/`Proc` type may
/// carry (an `Array` only ever uses one slot; a `Proc` uses
/// `1 + param_count`).
pub const TYPE_MAX_SUBTYPES: usize = 16;

/// A structural type in the checked language.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeCheckType {
    /// Inference placeholder. Absorbs any concrete actual type.
    Auto,
    /// The bottom type; only legal as an explicitly-permitted procedure return.
    Nothing,
    /// `bool`.
    Bool,
    /// `char`.
    Char,
    /// `long` — a 64-bit signed integer.
    Long,
    /// `float` — a 64-bit float.
    Float,
    /// Reference to the `index`-th generic parameter of the enclosing procedure.
    TypeArg(usize),
    /// `array<T>`.
    Array(Box<TypeCheckType>),
    /// `proc<R, P1, ..., Pn>`. `sub_types[0]` is the return type; the rest
    /// are parameter types. `generic_count` is the number of generic type
    /// parameters the procedure introduces (the "match count").
    Proc {
        sub_types: Vec<TypeCheckType>,
        generic_count: usize,
    },
}

impl TypeCheckType {
    /// Returns `true` if this is `Long` or `Float`.
    pub fn is_numeric(&self) -> bool {
        matches!(self, TypeCheckType::Long | TypeCheckType::Float)
    }

    /// Returns the element type if this is an `Array`.
    pub fn array_element(&self) -> Option<&TypeCheckType> {
        match self {
            TypeCheckType::Array(elem) => Some(elem),
            _ => None,
        }
    }

    /// Returns `(return_type, param_types)` if this is a `Proc`.
    pub fn proc_signature(&self) -> Option<(&TypeCheckType, &[TypeCheckType])> {
        match self {
            TypeCheckType::Proc { sub_types, .. } => {
                Some((&sub_types[0], &sub_types[1..]))
            }
            _ => None,
        }
    }

    /// The number of generic parameters this type introduces (0 for
    /// anything but a `Proc`).
    pub fn generic_count(&self) -> usize {
        match self {
            TypeCheckType::Proc { generic_count, .. } => *generic_count,
            _ => 0,
        }
    }

    /// One-directional structural compatibility check: does `self`
    /// (the *expected* type) accept `actual` (the type a parsed value
    /// actually produced)?
    ///
    /// `Auto` on the expected side accepts anything; everywhere else the
    /// two types must match structurally, with `TypeArg` positions
    /// compared by index.
    pub fn is_compatible(&self, actual: &TypeCheckType) -> bool {
        match (self, actual) {
            (TypeCheckType::Auto, _) => true,
            (TypeCheckType::Nothing, TypeCheckType::Nothing) => true,
            (TypeCheckType::Bool, TypeCheckType::Bool) => true,
            (TypeCheckType::Char, TypeCheckType::Char) => true,
            (TypeCheckType::Long, TypeCheckType::Long) => true,
            (TypeCheckType::Float, TypeCheckType::Float) => true,
            (TypeCheckType::TypeArg(a), TypeCheckType::TypeArg(b)) => a == b,
            (TypeCheckType::Array(expected_elem), TypeCheckType::Array(actual_elem)) => {
                expected_elem.is_compatible(actual_elem)
            }
            (
                TypeCheckType::Proc {
                    sub_types: expected,
                    ..
                },
                TypeCheckType::Proc {
                    sub_types: actual, ..
                },
            ) => {
                expected.len() == actual.len()
                    && expected
                        .iter()
                        .zip(actual.iter())
                        .all(|(e, a)| e.is_compatible(a))
            }
            _ => false,
        }
    }

    /// Recursively replaces every `TypeArg(i)` in `self` with `args[i]`.
    ///
    /// Used at a generic call site once the explicit type-argument list has
    /// been parsed: `args` holds the concrete types supplied in `<...>` and
    /// `self` is a copy of the callee's `Proc` type (including its own
    /// return/parameter sub-types, which may themselves reference the same
    /// generic parameters).
    pub fn substitute_type_args(&mut self, args: &[TypeCheckType]) {
        match self {
            TypeCheckType::TypeArg(index) => {
                if let Some(replacement) = args.get(*index) {
                    *self = replacement.clone();
                }
            }
            TypeCheckType::Array(elem) => elem.substitute_type_args(args),
            TypeCheckType::Proc { sub_types, .. } => {
                for sub in sub_types.iter_mut() {
                    sub.substitute_type_args(args);
                }
            }
            _ => {}
        }
    }
}

impl std::fmt::Display for TypeCheckType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeCheckType::Auto => write!(f, "auto"),
            TypeCheckType::Nothing => write!(f, "nothing"),
            TypeCheckType::Bool => write!(f, "bool"),
            TypeCheckType::Char => write!(f, "char"),
            TypeCheckType::Long => write!(f, "long"),
            TypeCheckType::Float => write!(f, "float"),
            TypeCheckType::TypeArg(index) => write!(f, "T{index}"),
            TypeCheckType::Array(elem) => write!(f, "array<{elem}>"),
            TypeCheckType::Proc { sub_types, .. } => {
                write!(f, "proc<{}", sub_types[0])?;
                for sub in &sub_types[1..] {
                    write!(f, ", {sub}")?;
                }
                write!(f, ">")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array_of(t: TypeCheckType) -> TypeCheckType {
        TypeCheckType::Array(Box::new(t))
    }

    #[test]
    fn auto_absorbs_anything() {
        assert!(TypeCheckType::Auto.is_compatible(&TypeCheckType::Long));
        assert!(TypeCheckType::Auto.is_compatible(&array_of(TypeCheckType::Bool)));
    }

    #[test]
    fn concrete_types_match_structurally() {
        assert!(TypeCheckType::Long.is_compatible(&TypeCheckType::Long));
        assert!(!TypeCheckType::Long.is_compatible(&TypeCheckType::Float));
    }

    #[test]
    fn actual_side_auto_does_not_satisfy_concrete_expected() {
        // Compatibility is one-directional: Auto only absorbs on the expected side.
        assert!(!TypeCheckType::Long.is_compatible(&TypeCheckType::Auto));
    }

    #[test]
    fn arrays_compare_element_type() {
        assert!(array_of(TypeCheckType::Char).is_compatible(&array_of(TypeCheckType::Char)));
        assert!(!array_of(TypeCheckType::Char).is_compatible(&array_of(TypeCheckType::Long)));
    }

    #[test]
    fn type_args_match_by_index() {
        assert!(TypeCheckType::TypeArg(0).is_compatible(&TypeCheckType::TypeArg(0)));
        assert!(!TypeCheckType::TypeArg(0).is_compatible(&TypeCheckType::TypeArg(1)));
    }

    #[test]
    fn proc_types_compare_sub_types_pairwise() {
        let identity = TypeCheckType::Proc {
            sub_types: vec![TypeCheckType::TypeArg(0), TypeCheckType::TypeArg(0)],
            generic_count: 1,
        };
        let same_shape = TypeCheckType::Proc {
            sub_types: vec![TypeCheckType::TypeArg(0), TypeCheckType::TypeArg(0)],
            generic_count: 1,
        };
        assert!(identity.is_compatible(&same_shape));

        let wrong_arity = TypeCheckType::Proc {
            sub_types: vec![TypeCheckType::Long],
            generic_count: 0,
        };
        assert!(!identity.is_compatible(&wrong_arity));
    }

    #[test]
    fn substitute_replaces_matching_indices_recursively() {
        let mut generic_array_proc = TypeCheckType::Proc {
            sub_types: vec![
                array_of(TypeCheckType::TypeArg(0)),
                TypeCheckType::TypeArg(0),
            ],
            generic_count: 1,
        };
        generic_array_proc.substitute_type_args(&[TypeCheckType::Long]);
        assert_eq!(
            generic_array_proc,
            TypeCheckType::Proc {
                sub_types: vec![array_of(TypeCheckType::Long), TypeCheckType::Long],
                generic_count: 1,
            }
        );
    }

    #[test]
    fn display_renders_readable_signatures() {
        assert_eq!(array_of(TypeCheckType::Long).to_string(), "array<long>");
        let proc_ty = TypeCheckType::Proc {
            sub_types: vec![TypeCheckType::Bool, TypeCheckType::Long, TypeCheckType::Char],
            generic_count: 0,
        };
        assert_eq!(proc_ty.to_string(), "proc<bool, long, char>");
    }
}
