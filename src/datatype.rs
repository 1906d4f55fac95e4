// used for timestamps in the database
use chrono::{DateTime, NaiveDateTime, TimeZone};

// used to print out readable forms of a kind
use std::fmt;
// indirections that resolve to their pointee
use std::rc::Rc;
use std::sync::Arc;

/// The native shape of a Rust type as seen by a dialect.
///
/// Kinds are declared statically through [`DataType`] and resolved into
/// column types by [`crate::dialect::Dialect::data_type_of`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Char,
    Text,
    /// Arrays, vectors and byte strings of any element type.
    Sequence,
    DateTime,
    /// A reference, smart pointer or `Option` around another kind.
    Indirect(Box<Kind>),
    /// Any other named structure.
    Struct(&'static str),
}

impl Kind {
    /// Strips every layer of indirection.
    pub fn resolve(&self) -> &Kind {
        let mut kind = self;
        while let Kind::Indirect(inner) = kind {
            kind = inner;
        }
        kind
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Kind::Bool => write!(f, "bool"),
            Kind::I8 => write!(f, "i8"),
            Kind::I16 => write!(f, "i16"),
            Kind::I32 => write!(f, "i32"),
            Kind::I64 => write!(f, "i64"),
            Kind::Isize => write!(f, "isize"),
            Kind::U8 => write!(f, "u8"),
            Kind::U16 => write!(f, "u16"),
            Kind::U32 => write!(f, "u32"),
            Kind::U64 => write!(f, "u64"),
            Kind::Usize => write!(f, "usize"),
            Kind::F32 => write!(f, "f32"),
            Kind::F64 => write!(f, "f64"),
            Kind::Char => write!(f, "char"),
            Kind::Text => write!(f, "text"),
            Kind::Sequence => write!(f, "sequence"),
            Kind::DateTime => write!(f, "datetime"),
            Kind::Indirect(inner) => write!(f, "&{}", inner),
            Kind::Struct(name) => write!(f, "struct {}", name),
        }
    }
}

pub trait DataType {
    fn kind() -> Kind;
}

macro_rules! plain_kind {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(
            impl DataType for $ty {
                fn kind() -> Kind {
                    Kind::$kind
                }
            }
        )+
    };
}

plain_kind! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    char => Char,
    str => Text,
    String => Text,
    NaiveDateTime => DateTime,
}

impl<Tz: TimeZone> DataType for DateTime<Tz> {
    fn kind() -> Kind {
        Kind::DateTime
    }
}

impl<T> DataType for Vec<T> {
    fn kind() -> Kind {
        Kind::Sequence
    }
}
impl<T> DataType for [T] {
    fn kind() -> Kind {
        Kind::Sequence
    }
}
impl<T, const N: usize> DataType for [T; N] {
    fn kind() -> Kind {
        Kind::Sequence
    }
}

macro_rules! indirect_kind {
    ($($wrapper:ident),+) => {
        $(
            impl<T: DataType + ?Sized> DataType for $wrapper<T> {
                fn kind() -> Kind {
                    Kind::Indirect(Box::new(T::kind()))
                }
            }
        )+
    };
}

indirect_kind!(Box, Rc, Arc);

impl<T: DataType> DataType for Option<T> {
    fn kind() -> Kind {
        Kind::Indirect(Box::new(T::kind()))
    }
}
impl<T: DataType + ?Sized> DataType for &T {
    fn kind() -> Kind {
        Kind::Indirect(Box::new(T::kind()))
    }
}
