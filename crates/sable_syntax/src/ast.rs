//! Abstract Syntax Tree definitions for Sable
//!
//! This module defines the node types for every syntax category produced by
//! the parser. Each node carries a [`Location`] and an insertion-ordered
//! attribute list; node construction goes through `crate::builder` so the
//! location/attribute bookkeeping stays in one place.

use std::fmt;

/// Source span (byte offsets) as reported by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Source location of an AST node.
///
/// ## Notes
/// - Every grammar production marks exactly one node non-ghost (the outermost
///   node it yields). Synthesized helper nodes (desugared cons cells, nil
///   constructors, operator identifiers) are ghost.
/// - Ghost locations still carry real offsets so diagnostics can anchor them,
///   but tooling must not treat them as user-written ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub start: usize,
    pub end: usize,
    pub ghost: bool,
}

impl Location {
    /// A real location covering `span`.
    pub fn real(span: Span) -> Self {
        Self {
            start: span.start,
            end: span.end,
            ghost: false,
        }
    }

    /// A ghost location covering `span`.
    pub fn ghost(span: Span) -> Self {
        Self {
            start: span.start,
            end: span.end,
            ghost: true,
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// Cover both locations. The result is ghost only if both inputs are.
    pub fn merge(self, other: Location) -> Location {
        Location {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            ghost: self.ghost && other.ghost,
        }
    }

    /// The same range, marked ghost.
    pub fn to_ghost(self) -> Self {
        Self { ghost: true, ..self }
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::ghost(Span::default())
    }
}

/// A leaf value (identifier, path, ...) with its own location.
#[derive(Debug, Clone, PartialEq)]
pub struct Loc<T> {
    pub txt: T,
    pub loc: Location,
}

impl<T> Loc<T> {
    pub fn new(txt: T, loc: Location) -> Self {
        Self { txt, loc }
    }
}

// ============================================================================
// Long identifiers
// ============================================================================

/// A possibly-qualified identifier: `x`, `M.x`, `M.N.x`, `F(X).t`.
#[derive(Debug, Clone, PartialEq)]
pub enum Longident {
    Ident(String),
    Dot(Box<Longident>, String),
    /// Applicative functor path component `F(X)`. Only produced when the
    /// parse session enables applicative functor syntax.
    Apply(Box<Longident>, Box<Longident>),
}

impl Longident {
    pub fn ident(name: impl Into<String>) -> Self {
        Longident::Ident(name.into())
    }

    pub fn dot(self, name: impl Into<String>) -> Self {
        Longident::Dot(Box::new(self), name.into())
    }

    /// Build a dotted path from non-empty segments.
    pub fn from_segments(segments: &[&str]) -> Self {
        let mut iter = segments.iter();
        let first = iter.next().expect("Longident needs at least one segment");
        iter.fold(Longident::ident(*first), |acc, seg| acc.dot(*seg))
    }

    /// The rightmost name of the path.
    pub fn last(&self) -> &str {
        match self {
            Longident::Ident(s) => s,
            Longident::Dot(_, s) => s,
            Longident::Apply(_, rhs) => rhs.last(),
        }
    }
}

impl fmt::Display for Longident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Longident::Ident(s) => write!(f, "{}", s),
            Longident::Dot(lhs, s) => write!(f, "{}.{}", lhs, s),
            Longident::Apply(lhs, rhs) => write!(f, "{}({})", lhs, rhs),
        }
    }
}

// ============================================================================
// Constants and flags
// ============================================================================

/// Literal constants.
///
/// Numeric literals keep their source text so unary sign folding can rewrite
/// them without reparsing, and so suffixes survive untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Int { text: String, suffix: Option<char> },
    Float { text: String, suffix: Option<char> },
    Char(char),
    String { text: String, delim: Option<String> },
}

impl Constant {
    pub fn int(text: impl Into<String>) -> Self {
        Constant::Int {
            text: text.into(),
            suffix: None,
        }
    }

    pub fn float(text: impl Into<String>) -> Self {
        Constant::Float {
            text: text.into(),
            suffix: None,
        }
    }

    pub fn string(text: impl Into<String>) -> Self {
        Constant::String {
            text: text.into(),
            delim: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecFlag {
    #[default]
    Nonrecursive,
    Recursive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutableFlag {
    #[default]
    Immutable,
    Mutable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrivateFlag {
    #[default]
    Public,
    Private,
}

// ============================================================================
// Attributes, extensions, payloads
// ============================================================================

/// An attribute `[@name payload]` / `[@@name payload]` / `[@@@name payload]`.
///
/// Attributes are owned by exactly one node; merging concatenates and never
/// overwrites, so attachment order is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Dotted attribute name, e.g. `sable.doc`.
    pub name: Loc<String>,
    pub payload: Payload,
    pub loc: Location,
}

/// An extension point `[%name payload]` / `[%%name payload]`.
///
/// Extension wrapping replaces a whole node with an extension-tagged variant
/// of the same category carrying `(name, payload)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Extension {
    pub name: Loc<String>,
    /// Boxed: extensions are embedded in the desc enums of every category,
    /// and the payload can itself hold nodes of those categories.
    pub payload: Box<Payload>,
}

/// Attribute/extension payloads, selected by the introducing punctuation.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Default: a nested structure.
    Str(Vec<StructureItem>),
    /// `: val ...` — a nested signature.
    Sig(Vec<SignatureItem>),
    /// `: t` — a core type.
    Type(CoreType),
    /// `? p` or `? p when e` — a pattern with an optional guard.
    Pat(Pattern, Option<Expression>),
}

// ============================================================================
// Core types
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CoreType {
    pub desc: TypeDesc,
    pub loc: Location,
    pub attrs: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDesc {
    /// `_`
    Any,
    /// `'a`
    Var(String),
    /// `t1 -> t2`
    Arrow(Box<CoreType>, Box<CoreType>),
    /// `t1 * t2 * ...`
    Tuple(Vec<CoreType>),
    /// `int`, `'a list`, `('a, 'b) result`
    Constr(Loc<Longident>, Vec<CoreType>),
    /// `(module S with type t = u)`
    Package(PackageType),
    Extension(Extension),
}

/// A package type: a module path with `with type` equations, embeddable in a
/// core type. Produced only by `crate::package`.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageType {
    pub path: Loc<Longident>,
    pub constraints: Vec<(Loc<Longident>, CoreType)>,
}

// ============================================================================
// Patterns
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub desc: PatDesc,
    pub loc: Location,
    pub attrs: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatDesc {
    /// `_`
    Any,
    /// `x`
    Var(Loc<String>),
    /// `p as x`
    Alias(Box<Pattern>, Loc<String>),
    Constant(Constant),
    Tuple(Vec<Pattern>),
    /// `C`, `C p`, `x :: xs`
    Construct(Loc<Longident>, Option<Box<Pattern>>),
    /// `p1 | p2`
    Or(Box<Pattern>, Box<Pattern>),
    /// `(p : t)`
    Constraint(Box<Pattern>, CoreType),
    Extension(Extension),
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub desc: ExprDesc,
    pub loc: Location,
    pub attrs: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprDesc {
    Ident(Loc<Longident>),
    Constant(Constant),
    /// `let [rec] p1 = e1 and ... in body`
    Let(RecFlag, Vec<ValueBinding>, Box<Expression>),
    /// `fun p -> e`
    Fun(Box<Pattern>, Box<Expression>),
    /// Application with positional arguments. Desugared operators land here
    /// as applications of an identifier spelled like the operator.
    Apply(Box<Expression>, Vec<Expression>),
    /// `match e with cases`
    Match(Box<Expression>, Vec<Case>),
    Tuple(Vec<Expression>),
    /// `[| e1; ...; en |]`. Arrays do not desugar; the variant also carries
    /// the ghost coordinate block of n-ary bigarray indexing.
    Array(Vec<Expression>),
    /// `C`, `C e`, cons cells from list desugaring
    Construct(Loc<Longident>, Option<Box<Expression>>),
    /// `{ l1 = e1; ... }`, optionally `{ base with l1 = e1; ... }`
    Record(Vec<(Loc<Longident>, Expression)>, Option<Box<Expression>>),
    /// `e.l`
    Field(Box<Expression>, Loc<Longident>),
    IfThenElse(Box<Expression>, Box<Expression>, Option<Box<Expression>>),
    /// `e1; e2`
    Sequence(Box<Expression>, Box<Expression>),
    /// `(e : t)`
    Constraint(Box<Expression>, CoreType),
    /// `let open M in e` and the local-open sugar `M.(e)` / `M.[..]` / `M.{..}`
    Open(Loc<Longident>, Box<Expression>),
    Extension(Extension),
}

/// One `pattern [when guard] -> body` arm of a `match`.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub pat: Pattern,
    pub guard: Option<Expression>,
    pub body: Expression,
}

/// One `p = e` binding of a `let` group.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueBinding {
    pub pat: Pattern,
    pub expr: Expression,
    pub attrs: Vec<Attribute>,
    pub loc: Location,
}

// ============================================================================
// Module expressions and module types
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleExpr {
    pub desc: ModExprDesc,
    pub loc: Location,
    pub attrs: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModExprDesc {
    Ident(Loc<Longident>),
    /// `struct ... end`
    Structure(Vec<StructureItem>),
    /// `(ME : MT)`
    Constraint(Box<ModuleExpr>, ModuleType),
    Extension(Extension),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleType {
    pub desc: ModTypeDesc,
    pub loc: Location,
    pub attrs: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModTypeDesc {
    Ident(Loc<Longident>),
    /// `sig ... end`
    Signature(Vec<SignatureItem>),
    /// `MT with type t = u and ...`
    With(Box<ModuleType>, Vec<WithConstraint>),
    Extension(Extension),
}

#[derive(Debug, Clone, PartialEq)]
pub enum WithConstraint {
    /// `with type path = decl`
    Type(Loc<Longident>, TypeDecl),
}

// ============================================================================
// Type declarations
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: Loc<String>,
    /// `'a`, `'b`, ... in `('a, 'b) t`
    pub params: Vec<CoreType>,
    /// `constraint t1 = t2` clauses
    pub cstrs: Vec<(CoreType, CoreType, Location)>,
    pub kind: TypeKind,
    pub private_: PrivateFlag,
    /// `= t` manifest, if any
    pub manifest: Option<CoreType>,
    pub attrs: Vec<Attribute>,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Abstract,
    Variant(Vec<ConstructorDecl>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDecl {
    pub name: Loc<String>,
    pub args: Vec<CoreType>,
    pub attrs: Vec<Attribute>,
    pub loc: Location,
}

// ============================================================================
// Structure items
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct StructureItem {
    pub desc: StrDesc,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StrDesc {
    /// A bare expression at structure level.
    Eval(Expression, Vec<Attribute>),
    /// `let [rec] p1 = e1 and ...`
    Value(RecFlag, Vec<ValueBinding>),
    /// `type t = ... and ...`
    Type(Vec<TypeDecl>),
    /// `module M = ME`
    Module(ModuleBinding),
    /// `module type S = MT`
    ModType(ModTypeDecl),
    /// `open M`
    Open(Loc<Longident>, Vec<Attribute>),
    /// `class c = CE and ...`
    Class(Vec<ClassDecl>),
    /// Floating attribute `[@@@name]`; also synthesized for floating docs.
    Attribute(Attribute),
    /// Item extension `[%%name]` with its postfix attributes.
    Extension(Extension, Vec<Attribute>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleBinding {
    pub name: Loc<String>,
    pub expr: ModuleExpr,
    pub attrs: Vec<Attribute>,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModTypeDecl {
    pub name: Loc<String>,
    /// `None` for an abstract `module type S`.
    pub mty: Option<ModuleType>,
    pub attrs: Vec<Attribute>,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: Loc<String>,
    pub expr: ClassExpr,
    pub attrs: Vec<Attribute>,
    pub loc: Location,
}

// ============================================================================
// Signature items
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SignatureItem {
    pub desc: SigDesc,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SigDesc {
    /// `val x : t`
    Value(ValueDesc),
    Type(Vec<TypeDecl>),
    /// `module M : MT`
    Module(ModuleDecl),
    ModType(ModTypeDecl),
    Open(Loc<Longident>, Vec<Attribute>),
    /// `class type ct = ... and ...`
    ClassType(Vec<ClassTypeDecl>),
    Attribute(Attribute),
    Extension(Extension, Vec<Attribute>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueDesc {
    pub name: Loc<String>,
    pub ty: CoreType,
    pub attrs: Vec<Attribute>,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDecl {
    pub name: Loc<String>,
    pub mty: ModuleType,
    pub attrs: Vec<Attribute>,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassTypeDecl {
    pub name: Loc<String>,
    pub ty: ClassType,
    pub attrs: Vec<Attribute>,
    pub loc: Location,
}

// ============================================================================
// Classes
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ClassExpr {
    pub desc: ClassExprDesc,
    pub loc: Location,
    pub attrs: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassExprDesc {
    /// `c`, `['a] c`
    Constr(Loc<Longident>, Vec<CoreType>),
    /// `object ... end`
    Structure(ClassStructure),
    /// `fun p -> CE`
    Fun(Box<Pattern>, Box<ClassExpr>),
    /// `let [rec] p = e and ... in CE`. No extension id is legal here.
    Let(RecFlag, Vec<ValueBinding>, Box<ClassExpr>),
    Extension(Extension),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassStructure {
    /// `object (self) ... end`
    pub self_pat: Option<Pattern>,
    pub fields: Vec<ClassField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassField {
    pub desc: ClassFieldDesc,
    pub loc: Location,
    pub attrs: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassFieldDesc {
    /// `val [mutable] x = e`
    Val(Loc<String>, MutableFlag, Expression),
    /// `method [private] m = e`
    Method(Loc<String>, PrivateFlag, Expression),
    /// `initializer e`
    Initializer(Expression),
    Attribute(Attribute),
    Extension(Extension),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassType {
    pub desc: ClassTypeDesc,
    pub loc: Location,
    pub attrs: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassTypeDesc {
    Constr(Loc<Longident>, Vec<CoreType>),
    /// `object ... end`
    Signature(ClassSignature),
    /// `t -> CT`
    Arrow(Box<CoreType>, Box<ClassType>),
    Extension(Extension),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassSignature {
    /// `object ('self) ... end`
    pub self_ty: Option<CoreType>,
    pub fields: Vec<ClassTypeField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassTypeField {
    pub desc: ClassTypeFieldDesc,
    pub loc: Location,
    pub attrs: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassTypeFieldDesc {
    Val(Loc<String>, MutableFlag, CoreType),
    Method(Loc<String>, PrivateFlag, CoreType),
    /// `constraint t1 = t2`
    Constraint(CoreType, CoreType),
    Attribute(Attribute),
    Extension(Extension),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longident_display() {
        let path = Longident::from_segments(&["Bigarray", "Array1", "get"]);
        assert_eq!(path.to_string(), "Bigarray.Array1.get");
        assert_eq!(path.last(), "get");
    }

    #[test]
    fn test_location_ghost_round_trip() {
        let span = Span::new(3, 9);
        let real = Location::real(span);
        assert!(!real.ghost);
        let ghost = real.to_ghost();
        assert!(ghost.ghost);
        assert_eq!(ghost.span(), span);
    }

    #[test]
    fn test_span_merge() {
        let merged = Span::new(4, 7).merge(Span::new(1, 5));
        assert_eq!(merged, Span::new(1, 7));
    }
}
