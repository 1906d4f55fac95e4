//! Table metadata derived from statically declared models.
//!
//! A type becomes mappable by implementing [`Model`], usually through the
//! [`model!`](crate::model) macro which declares the struct and its field
//! descriptors from the same source. [`Schema::parse`] turns those
//! descriptors into a [`Schema`] by asking a [`Dialect`] for column types.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::hash::BuildHasherDefault;

use seahash::SeaHasher;
use tracing::{error, trace, warn};

use crate::datatype::{DataType, Kind};
use crate::dialect::Dialect;
use crate::error::Result;

pub type FieldHasher = BuildHasherDefault<SeaHasher>;

/// Typed column constraint markers, spelled out by the dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    PrimaryKey,
    AutoIncrement,
    NotNull,
    Unique,
}

/// Static declaration of one member of a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: Kind,
    pub constraints: Vec<Constraint>,
    pub exported: bool,
    pub embedded: bool,
}

impl FieldDescriptor {
    /// An exported, non-embedded member of native type `T`.
    pub fn of<T: DataType + ?Sized>(name: &'static str) -> Self {
        Self {
            name,
            kind: T::kind(),
            constraints: Vec::new(),
            exported: true,
            embedded: false,
        }
    }
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }
    pub fn exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }
    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }
}

/// A type that maps onto a table.
pub trait Model: 'static {
    /// Table name.
    const NAME: &'static str;
    /// Members in declaration order.
    fn fields() -> Vec<FieldDescriptor>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: String,
    pub tag: String,
    pub constraints: Vec<Constraint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    model: TypeId,
    model_name: &'static str,
    name: String,
    fields: Vec<Field>,
    field_names: Vec<String>,
    field_map: HashMap<String, usize, FieldHasher>,
}

impl Schema {
    /// Derives the schema of `M`. Only the type is inspected.
    ///
    /// Members that are not exported, or that are embedded, are skipped.
    /// A member whose kind the dialect cannot map aborts the derivation.
    pub fn parse<M: Model>(dialect: &dyn Dialect) -> Result<Schema> {
        let mut schema = Schema {
            model: TypeId::of::<M>(),
            model_name: type_name::<M>(),
            name: M::NAME.to_string(),
            fields: Vec::new(),
            field_names: Vec::new(),
            field_map: HashMap::default(),
        };
        for descriptor in M::fields() {
            if descriptor.embedded || !descriptor.exported {
                trace!(model = M::NAME, field = descriptor.name, "skipping field");
                continue;
            }
            if schema.field_map.contains_key(descriptor.name) {
                warn!(model = M::NAME, field = descriptor.name, "duplicate field name ignored");
                continue;
            }
            let ty = dialect.data_type_of(&descriptor.kind).inspect_err(|e| {
                error!(model = M::NAME, field = descriptor.name, error = %e, "cannot map field type");
            })?;
            let tag = descriptor
                .constraints
                .iter()
                .map(|c| dialect.constraint_sql(*c))
                .collect::<Vec<_>>()
                .join(" ");
            schema.field_map.insert(descriptor.name.to_string(), schema.fields.len());
            schema.field_names.push(descriptor.name.to_string());
            schema.fields.push(Field {
                name: descriptor.name.to_string(),
                ty: ty.to_string(),
                tag,
                constraints: descriptor.constraints,
            });
        }
        Ok(schema)
    }

    pub fn model(&self) -> TypeId {
        self.model
    }
    pub fn model_name(&self) -> &'static str {
        self.model_name
    }
    /// True when this schema was derived from `M`.
    pub fn is_model<M: Model>(&self) -> bool {
        self.model == TypeId::of::<M>()
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.field_map.get(name).map(|&i| &self.fields[i])
    }
}

/// Declares a struct and implements [`Model`] for it.
///
/// Field visibility decides whether a member is mapped; private members are
/// skipped. Constraint markers go in a `#[neorm(...)]` attribute naming
/// [`Constraint`] variants. Doc comments and other field attributes are kept
/// on the generated struct and may appear before or after it.
///
/// ```
/// neorm::model! {
///     #[derive(Debug, Default)]
///     pub struct User {
///         /// Row id.
///         #[neorm(PrimaryKey)]
///         pub id: i32,
///         pub name: String,
///         #[allow(dead_code)]
///         secret: Vec<u8>,
///     }
/// }
/// # use neorm::schema::Model;
/// assert_eq!(User::NAME, "User");
/// ```
#[macro_export]
macro_rules! model {
    (@fields [$(#[$meta:meta])*] $vis:vis $name:ident
        fields[$({ [$($fattr:tt)*] [$($constraint:ident)*] $fvis:vis $field:ident : $fty:ty })*]
        attrs[] cons[]
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $($fattr)* $fvis $field: $fty, )*
        }

        impl $crate::schema::Model for $name {
            const NAME: &'static str = stringify!($name);
            fn fields() -> ::std::vec::Vec<$crate::schema::FieldDescriptor> {
                ::std::vec![
                    $(
                        $crate::schema::FieldDescriptor::of::<$fty>(stringify!($field))
                            .exported(!stringify!($fvis).is_empty())
                            $(.constraint($crate::schema::Constraint::$constraint))*
                    ),*
                ]
            }
        }
    };
    (@fields $meta:tt $vis:vis $name:ident fields[$($done:tt)*] attrs[$($attr:tt)*] cons[$($c:ident)*]
        #[neorm($($constraint:ident),* $(,)?)] $($rest:tt)*
    ) => {
        $crate::model!(@fields $meta $vis $name fields[$($done)*] attrs[$($attr)*]
            cons[$($c)* $($constraint)*] $($rest)*);
    };
    (@fields $meta:tt $vis:vis $name:ident fields[$($done:tt)*] attrs[$($attr:tt)*] cons[$($c:ident)*]
        #[$fmeta:meta] $($rest:tt)*
    ) => {
        $crate::model!(@fields $meta $vis $name fields[$($done)*] attrs[$($attr)* #[$fmeta]]
            cons[$($c)*] $($rest)*);
    };
    (@fields $meta:tt $vis:vis $name:ident fields[$($done:tt)*] attrs[$($attr:tt)*] cons[$($c:ident)*]
        $fvis:vis $field:ident : $fty:ty $(, $($rest:tt)*)?
    ) => {
        $crate::model!(@fields $meta $vis $name
            fields[$($done)* { [$($attr)*] [$($c)*] $fvis $field : $fty }] attrs[] cons[]
            $($($rest)*)?);
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($body:tt)*
        }
    ) => {
        $crate::model!(@fields [$(#[$meta])*] $vis $name fields[] attrs[] cons[] $($body)*);
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Sqlite3;
    use crate::error::NeormError;

    crate::model! {
        #[allow(dead_code)]
        struct TestModel {
            #[neorm(PrimaryKey)]
            pub id: i32,
            #[neorm(NotNull, Unique)]
            pub first_name: String,
            pub age: u8,
            last_name: String,
        }
    }

    crate::model! {
        /// A model whose fields carry doc comments and extra attributes.
        #[allow(dead_code)]
        pub struct Annotated {
            /// Row id.
            #[neorm(PrimaryKey)]
            pub id: i32,
            #[allow(non_snake_case)]
            #[neorm(NotNull)]
            /// Shown as the label.
            pub Title: String,
            #[allow(unused)]
            pub legacy: i64,
        }
    }

    struct Wrapper;

    impl Model for Wrapper {
        const NAME: &'static str = "Wrapper";
        fn fields() -> Vec<FieldDescriptor> {
            vec![
                FieldDescriptor::of::<i64>("Inner").embedded(),
                FieldDescriptor::of::<String>("Label"),
                FieldDescriptor::of::<String>("Label"),
            ]
        }
    }

    #[test]
    fn macro_emits_descriptors_in_order() {
        let fields = TestModel::fields();
        let names: Vec<_> = fields.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["id", "first_name", "age", "last_name"]);
        assert_eq!(fields[0].constraints, vec![Constraint::PrimaryKey]);
        assert_eq!(fields[1].constraints, vec![Constraint::NotNull, Constraint::Unique]);
        assert!(fields[2].exported);
        assert!(!fields[3].exported);
    }

    #[test]
    fn macro_accepts_docs_and_other_field_attributes() {
        let fields = Annotated::fields();
        let names: Vec<_> = fields.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["id", "Title", "legacy"]);
        assert_eq!(fields[0].constraints, vec![Constraint::PrimaryKey]);
        assert_eq!(fields[1].constraints, vec![Constraint::NotNull]);
        assert!(fields[2].constraints.is_empty());
        assert!(fields.iter().all(|f| f.exported));

        let schema = Schema::parse::<Annotated>(&Sqlite3).unwrap();
        assert_eq!(schema.get_field("Title").unwrap().tag, "NOT NULL");
        assert_eq!(schema.get_field("legacy").unwrap().ty, "bigint");
    }

    #[test]
    fn parse_renders_constraints_as_tag() {
        let schema = Schema::parse::<TestModel>(&Sqlite3).unwrap();
        assert_eq!(schema.name(), "TestModel");
        assert_eq!(schema.field_names(), ["id", "first_name", "age"]);
        let first = schema.get_field("first_name").unwrap();
        assert_eq!(first.ty, "text");
        assert_eq!(first.tag, "NOT NULL UNIQUE");
        assert_eq!(schema.get_field("age").unwrap().tag, "");
        assert!(schema.get_field("last_name").is_none());
    }

    #[test]
    fn parse_skips_embedded_and_duplicates() {
        let schema = Schema::parse::<Wrapper>(&Sqlite3).unwrap();
        assert_eq!(schema.field_names(), ["Label"]);
        assert_eq!(schema.fields().len(), 1);
    }

    #[test]
    fn unmapped_field_aborts_parse() {
        crate::model! {
            #[allow(dead_code)]
            struct Measurement {
                pub id: i32,
                pub reading: f64,
            }
        }
        match Schema::parse::<Measurement>(&Sqlite3) {
            Err(NeormError::UnsupportedType(Kind::F64)) => {}
            other => panic!("expected unsupported f64, got {other:?}"),
        }
    }
}
