//! Mapping from Rust types to [`TypeDescriptor`]s.
//!
//! [`Describe`] is implemented for the standard primitives, `String`,
//! collections, `Option`/`Box` (as pointer wrappers), `serde_json::Value`
//! (as an interface) and, with the `chrono` feature, chrono's date-times.
//!
//! Application types implement it by listing their fields:
//!
//! ```
//! use openapi_schema_core::{Describe, Field, TypeDescriptor};
//!
//! struct Comment {
//!     body: String,
//!     replies: Vec<Comment>,
//! }
//!
//! impl Describe for Comment {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::structure(
//!             "Comment",
//!             vec![
//!                 Field::of::<String>("body", r#"json:"body""#),
//!                 Field::of::<Vec<Comment>>("replies", r#"json:"replies" default:"[]""#),
//!             ],
//!         )
//!     }
//! }
//!
//! assert_eq!(Comment::describe().fields().unwrap().len(), 2);
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::descriptor::{FloatKind, IntKind, Kind, TypeDescriptor};

/// Types that can describe their own structure.
pub trait Describe {
    fn describe() -> TypeDescriptor;
}

impl Describe for bool {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::bool()
    }
}

macro_rules! describe_int {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::int(IntKind::$kind)
                }
            }
        )*
    };
}

describe_int! {
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
}

impl Describe for f32 {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::float(FloatKind::F32)
    }
}

impl Describe for f64 {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::float(FloatKind::F64)
    }
}

impl Describe for String {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::string()
    }
}

impl Describe for char {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new("char", Kind::String)
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn describe() -> TypeDescriptor {
        let element = T::describe();
        let name = format!("Vec<{}>", element.name);
        TypeDescriptor::slice(element).named(&name)
    }
}

impl<T: Describe> Describe for HashSet<T> {
    fn describe() -> TypeDescriptor {
        let element = T::describe();
        let name = format!("HashSet<{}>", element.name);
        TypeDescriptor::slice(element).named(&name)
    }
}

impl<T: Describe> Describe for BTreeSet<T> {
    fn describe() -> TypeDescriptor {
        let element = T::describe();
        let name = format!("BTreeSet<{}>", element.name);
        TypeDescriptor::slice(element).named(&name)
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::array(T::describe(), N)
    }
}

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeDescriptor {
        let inner = T::describe();
        let name = format!("Option<{}>", inner.name);
        TypeDescriptor::pointer(inner).named(&name)
    }
}

impl<T: Describe> Describe for Box<T> {
    fn describe() -> TypeDescriptor {
        let inner = T::describe();
        let name = format!("Box<{}>", inner.name);
        TypeDescriptor::pointer(inner).named(&name)
    }
}

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn describe() -> TypeDescriptor {
        let (key, value) = (K::describe(), V::describe());
        let name = format!("HashMap<{}, {}>", key.name, value.name);
        TypeDescriptor::map(key, value).named(&name)
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn describe() -> TypeDescriptor {
        let (key, value) = (K::describe(), V::describe());
        let name = format!("BTreeMap<{}, {}>", key.name, value.name);
        TypeDescriptor::map(key, value).named(&name)
    }
}

impl Describe for serde_json::Value {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::interface("Value")
    }
}

#[cfg(feature = "chrono")]
mod chrono_impls {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

    use super::Describe;
    use crate::descriptor::TypeDescriptor;
    use crate::hooks::Hooks;
    use crate::schema::Format;

    impl<Tz: TimeZone> Describe for DateTime<Tz> {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::temporal("DateTime")
        }
    }

    impl Describe for NaiveDateTime {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::temporal("NaiveDateTime")
        }
    }

    impl Describe for NaiveDate {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::string()
                .named("NaiveDate")
                .with_hooks(Hooks::default().with_format(Format::Date.as_str()))
        }
    }
}
