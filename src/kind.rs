//! Kind taxonomy for classified declarations.

use std::fmt;

/// Structural classification of a declaration.
///
/// `Invalid` and `Suspense` are sentinels: `Invalid` marks declarations the
/// builder could not classify at all, `Suspense` marks declarations whose
/// referent has not been (or can never be) classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Kind {
    Invalid,
    Suspense,
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    Interface,
    Chan,
    Array,
    Slice,
    Map,
    Func,
    Struct,
    Ptr,
}

/// The builtin primitive type names. `byte`, `rune`, `any` and `error` are
/// deliberately absent.
const BASIC_KINDS: [(&str, Kind); 17] = [
    ("bool", Kind::Bool),
    ("int", Kind::Int),
    ("int8", Kind::Int8),
    ("int16", Kind::Int16),
    ("int32", Kind::Int32),
    ("int64", Kind::Int64),
    ("uint", Kind::Uint),
    ("uint8", Kind::Uint8),
    ("uint16", Kind::Uint16),
    ("uint32", Kind::Uint32),
    ("uint64", Kind::Uint64),
    ("uintptr", Kind::Uintptr),
    ("float32", Kind::Float32),
    ("float64", Kind::Float64),
    ("complex64", Kind::Complex64),
    ("complex128", Kind::Complex128),
    ("string", Kind::String),
];

impl Kind {
    /// Looks up a builtin primitive type name.
    pub fn from_basic_name(name: &str) -> Option<Kind> {
        BASIC_KINDS
            .iter()
            .find_map(|&(n, k)| (n == name).then_some(k))
    }

    /// Every builtin primitive name with its kind, in declaration order.
    pub fn basic_names() -> impl Iterator<Item = (&'static str, Kind)> {
        BASIC_KINDS.iter().copied()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Kind::Invalid => "invalid",
            Kind::Suspense => "suspense",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Int8 => "int8",
            Kind::Int16 => "int16",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::Uint => "uint",
            Kind::Uint8 => "uint8",
            Kind::Uint16 => "uint16",
            Kind::Uint32 => "uint32",
            Kind::Uint64 => "uint64",
            Kind::Uintptr => "uintptr",
            Kind::Float32 => "float32",
            Kind::Float64 => "float64",
            Kind::Complex64 => "complex64",
            Kind::Complex128 => "complex128",
            Kind::String => "string",
            Kind::Interface => "interface",
            Kind::Chan => "chan",
            Kind::Array => "array",
            Kind::Slice => "slice",
            Kind::Map => "map",
            Kind::Func => "func",
            Kind::Struct => "struct",
            Kind::Ptr => "ptr",
        }
    }

    #[inline]
    pub const fn is_basic(self) -> bool {
        matches!(self as u8, b if b >= Kind::Bool as u8 && b <= Kind::String as u8)
    }

    /// False only for the two sentinels.
    #[inline]
    pub const fn is_resolved(self) -> bool {
        !matches!(self, Kind::Invalid | Kind::Suspense)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
