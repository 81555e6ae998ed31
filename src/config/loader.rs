//! Schema-driven decoding of untyped TOML documents into typed records.
//!
//! A record type is declared with [`record!`], which emits the struct and a
//! [`Record`] implementation that decodes each field in declaration order.
//! Field values are decoded through [`Decode`], implemented here for the
//! supported scalar types and for `Vec<T>` of any decodable `T` (records or
//! scalars). Nothing else can appear as a field type.
//!
//! Scalars are coerced leniently: a numeric `version = 1.5` decodes into a
//! `String` field as `"1.5"`, and `port = "9100"` decodes into an `i64`.
//! Arrays and tables are never coerced into scalars.
use std::path::PathBuf;

use toml::{Table, Value};

use crate::error::ConfigError;

/// A value that can be decoded from a single TOML value.
pub trait Decode: Sized {
    /// Decode `value`, reporting errors against the dotted field `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Type`] if the value has the wrong shape or
    /// cannot be coerced, or any error raised by a nested record.
    fn decode(value: &Value, path: &str) -> Result<Self, ConfigError>;
}

/// A record decoded field-by-field from a TOML table.
pub trait Record: Sized {
    /// Decode every declared field of `Self` from `table`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] for the first declared field
    /// absent from `table`, or the first decoding error of a present field.
    fn from_table(table: &Table, path: &str) -> Result<Self, ConfigError>;
}

/// Declare a struct whose fields are decoded from a TOML table.
///
/// ```ignore
/// record! {
///     #[derive(Debug)]
///     pub struct Service {
///         pub name: String,
///         pub ports: Vec<i64>,
///     }
/// }
/// ```
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::config::loader::Record for $name {
            fn from_table(
                table: &::toml::Table,
                path: &str,
            ) -> ::std::result::Result<Self, $crate::error::ConfigError> {
                // Struct expressions evaluate fields in the order written.
                Ok(Self {
                    $(
                        $field: $crate::config::loader::field(table, stringify!($field), path)?,
                    )*
                })
            }
        }

        impl $crate::config::loader::Decode for $name {
            fn decode(
                value: &::toml::Value,
                path: &str,
            ) -> ::std::result::Result<Self, $crate::error::ConfigError> {
                let table = $crate::config::loader::expect_table(value, path)?;
                <Self as $crate::config::loader::Record>::from_table(table, path)
            }
        }
    };
}

pub(crate) use record;

/// Decode a whole document as the record `R`.
///
/// # Errors
///
/// Returns the first [`ConfigError::MissingField`] or [`ConfigError::Type`]
/// encountered while walking `R`'s fields depth-first in declaration order.
pub fn load<R: Record>(document: &Table) -> Result<R, ConfigError> {
    R::from_table(document, "")
}

/// Decode the field `name` of `table`.
///
/// # Errors
///
/// Returns [`ConfigError::MissingField`] if the key is absent, otherwise any
/// error from decoding its value.
pub fn field<T: Decode>(table: &Table, name: &str, parent: &str) -> Result<T, ConfigError> {
    let path = child_path(parent, name);
    let value = table
        .get(name)
        .ok_or_else(|| ConfigError::MissingField { path: path.clone() })?;
    T::decode(value, &path)
}

/// Borrow `value` as a table.
///
/// # Errors
///
/// Returns [`ConfigError::Type`] if `value` is not a table.
pub fn expect_table<'v>(value: &'v Value, path: &str) -> Result<&'v Table, ConfigError> {
    value
        .as_table()
        .ok_or_else(|| type_error(path, "table", value))
}

fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

fn type_error(path: &str, expected: &'static str, value: &Value) -> ConfigError {
    ConfigError::Type {
        path: path.to_string(),
        expected,
        found: describe(value),
    }
}

/// Short human description of a value for diagnostics.
fn describe(value: &Value) -> String {
    match value {
        Value::Array(_) | Value::Table(_) => value.type_str().to_string(),
        scalar => format!("{} {scalar}", scalar.type_str()),
    }
}

impl Decode for String {
    fn decode(value: &Value, path: &str) -> Result<Self, ConfigError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Integer(i) => Ok(i.to_string()),
            // Debug keeps the trailing `.0` on whole floats.
            Value::Float(f) => Ok(format!("{f:?}")),
            Value::Boolean(b) => Ok(b.to_string()),
            Value::Datetime(d) => Ok(d.to_string()),
            Value::Array(_) | Value::Table(_) => Err(type_error(path, "string", value)),
        }
    }
}

impl Decode for i64 {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::float_cmp
    )]
    fn decode(value: &Value, path: &str) -> Result<Self, ConfigError> {
        match value {
            Value::Integer(i) => Ok(*i),
            Value::Float(f)
                if f.is_finite()
                    && f.fract() == 0.0
                    && *f >= Self::MIN as f64
                    && *f < Self::MAX as f64 =>
            {
                Ok(*f as Self)
            }
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| type_error(path, "integer", value)),
            _ => Err(type_error(path, "integer", value)),
        }
    }
}

impl Decode for f64 {
    #[allow(clippy::cast_precision_loss)]
    fn decode(value: &Value, path: &str) -> Result<Self, ConfigError> {
        match value {
            Value::Float(f) => Ok(*f),
            Value::Integer(i) => Ok(*i as Self),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| type_error(path, "float", value)),
            _ => Err(type_error(path, "float", value)),
        }
    }
}

impl Decode for bool {
    fn decode(value: &Value, path: &str) -> Result<Self, ConfigError> {
        match value {
            Value::Boolean(b) => Ok(*b),
            Value::String(s) => match s.trim() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(type_error(path, "boolean", value)),
            },
            _ => Err(type_error(path, "boolean", value)),
        }
    }
}

impl Decode for PathBuf {
    fn decode(value: &Value, path: &str) -> Result<Self, ConfigError> {
        value
            .as_str()
            .map(Self::from)
            .ok_or_else(|| type_error(path, "path string", value))
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(value: &Value, path: &str) -> Result<Self, ConfigError> {
        let items = value
            .as_array()
            .ok_or_else(|| type_error(path, "array", value))?;
        items
            .iter()
            .enumerate()
            .map(|(idx, item)| T::decode(item, &format!("{path}[{idx}]")))
            .collect()
    }
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    record! {
        #[derive(Debug, PartialEq)]
        struct Listener {
            port: i64,
            tags: Vec<String>,
        }
    }

    record! {
        #[derive(Debug, PartialEq)]
        struct Server {
            name: String,
            weight: f64,
            enabled: bool,
            listener: Listener,
            backends: Vec<Listener>,
        }
    }

    fn doc(text: &str) -> Table {
        text.parse::<Table>().expect("valid TOML")
    }

    fn load_server(text: &str) -> Result<Server, ConfigError> {
        load(&doc(text))
    }

    const VALID: &str = r#"
name = "edge"
weight = 2
enabled = "true"

[listener]
port = "9100"
tags = ["a", 1, 1.5, false]

[[backends]]
port = 1
tags = []

[[backends]]
port = 2.0
tags = ["x"]
"#;

    fn missing_path(result: Result<Server, ConfigError>) -> String {
        match result {
            Err(ConfigError::MissingField { path }) => path,
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    fn type_path(result: Result<Server, ConfigError>) -> (String, String) {
        match result {
            Err(ConfigError::Type { path, found, .. }) => (path, found),
            other => panic!("expected Type, got {other:?}"),
        }
    }

    #[test]
    fn decodes_nested_records_with_coercion() {
        let server = load_server(VALID).unwrap();
        assert_eq!(
            server,
            Server {
                name: "edge".to_string(),
                weight: 2.0,
                enabled: true,
                listener: Listener {
                    port: 9100,
                    tags: vec![
                        "a".to_string(),
                        "1".to_string(),
                        "1.5".to_string(),
                        "false".to_string()
                    ],
                },
                backends: vec![
                    Listener {
                        port: 1,
                        tags: vec![],
                    },
                    Listener {
                        port: 2,
                        tags: vec!["x".to_string()],
                    },
                ],
            }
        );
    }

    #[test]
    fn whole_float_keeps_decimal_point_as_string() {
        let value = Value::Float(1.0);
        assert_eq!(String::decode(&value, "v").unwrap(), "1.0");
    }

    #[test]
    fn missing_top_level_field() {
        let text = VALID.replace("name = \"edge\"", "");
        assert_eq!(missing_path(load_server(&text)), "name");
    }

    #[test]
    fn missing_nested_field_reports_full_path() {
        let text = VALID.replace("port = \"9100\"", "");
        assert_eq!(missing_path(load_server(&text)), "listener.port");
    }

    #[test]
    fn missing_field_in_list_element_reports_index() {
        let text = VALID.replace("port = 2.0", "");
        assert_eq!(missing_path(load_server(&text)), "backends[1].port");
    }

    #[test]
    fn first_missing_field_in_declaration_order_wins() {
        assert_eq!(missing_path(load_server("")), "name");
        assert_eq!(
            missing_path(load_server("name = \"x\"\nenabled = true")),
            "weight"
        );
    }

    #[test]
    fn list_element_that_is_not_a_table_is_type_error() {
        let text = r#"
name = "edge"
weight = 1
enabled = true
backends = ["not-a-table"]

[listener]
port = 1
tags = []
"#;
        let (path, found) = type_path(load_server(text));
        assert_eq!(path, "backends[0]");
        assert!(found.starts_with("string"), "found: {found}");
    }

    #[test]
    fn non_array_for_list_field_is_type_error() {
        let text = r#"
name = "edge"
weight = 1
enabled = true

[listener]
port = 1
tags = "a,b"

[[backends]]
port = 1
tags = []
"#;
        let (path, _) = type_path(load_server(text));
        assert_eq!(path, "listener.tags");
    }

    #[test]
    fn scalar_where_record_expected_is_type_error() {
        let text = r#"
name = "edge"
weight = 1
enabled = true
listener = 5
"#;
        let (path, found) = type_path(load_server(text));
        assert_eq!(path, "listener");
        assert_eq!(found, "integer 5");
    }

    #[test]
    fn uncoercible_scalar_is_type_error() {
        let text = VALID.replace("port = \"9100\"", "port = \"ninety\"");
        let (path, found) = type_path(load_server(&text));
        assert_eq!(path, "listener.port");
        assert!(found.contains("ninety"), "found: {found}");
    }

    #[test]
    fn table_never_coerces_to_string() {
        let value = Value::Table(Table::new());
        assert!(matches!(
            String::decode(&value, "x"),
            Err(ConfigError::Type {
                expected: "string",
                ..
            })
        ));
    }

    #[test]
    fn fractional_float_is_not_an_integer() {
        assert!(i64::decode(&Value::Float(2.5), "n").is_err());
        assert_eq!(i64::decode(&Value::Float(-3.0), "n").unwrap(), -3);
    }

    #[test]
    fn bool_accepts_only_literal_strings() {
        assert!(bool::decode(&Value::String("false".into()), "b").is_ok_and(|b| !b));
        assert!(bool::decode(&Value::String("yes".into()), "b").is_err());
        assert!(bool::decode(&Value::Integer(1), "b").is_err());
    }

    #[test]
    fn path_requires_string() {
        assert_eq!(
            PathBuf::decode(&Value::String("~/svc".into()), "p").unwrap(),
            PathBuf::from("~/svc")
        );
        assert!(PathBuf::decode(&Value::Integer(1), "p").is_err());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let text = format!("{VALID}\n[extra]\nkey = 1\n");
        assert!(load_server(&text).is_ok());
    }
}
