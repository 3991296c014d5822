//! The contract every pipeline operation implements

use std::sync::OnceLock;

use serde_json::{Map, Value as Json};

use crate::error::{Error, Result};
use crate::table::Table;
use crate::value::Value;

/// A single dataset operation: a pure function from a table and named
/// parameters to a new table or a structured result document
///
/// Implementations validate their own parameters, perform no I/O, and never
/// mutate state outside the returned value. Persistence is the caller's
/// responsibility.
pub trait Operation: Send + Sync {
    /// Apply this operation to the table
    fn apply(&self, table: &Table, params: &Params<'_>) -> Result<OpOutput>;
}

impl std::fmt::Debug for dyn Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Operation")
    }
}

/// What an operation produces on success
#[derive(Debug)]
pub enum OpOutput {
    /// A new or updated table (cleaning, transformation)
    Table(Table),

    /// A structured result document (analysis, visualization, export)
    Report(Json),
}

impl OpOutput {
    /// The table, if this output carries one
    pub fn into_table(self) -> Option<Table> {
        match self {
            Self::Table(table) => Some(table),
            Self::Report(_) => None,
        }
    }

    /// The report document, if this output carries one
    pub fn into_report(self) -> Option<Json> {
        match self {
            Self::Table(_) => None,
            Self::Report(report) => Some(report),
        }
    }
}

/// Static descriptor attached to an implementation at registration time, so
/// the registry can answer listing queries without instantiating anything
#[derive(Debug, Clone, Copy)]
pub struct OpSpec {
    /// Stable registry key
    pub key: &'static str,

    /// Human description of what the operation does
    pub description: &'static str,

    /// Parameter names with their descriptions
    pub parameters: &'static [(&'static str, &'static str)],
}

/// Read-only view over an operation descriptor's parameters
///
/// Typed getters return [`Error::InvalidParameter`] when a parameter is
/// present with the wrong shape; `*_or` getters substitute a default when the
/// parameter is absent.
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    fields: &'a Map<String, Json>,
}

impl<'a> Params<'a> {
    /// Wrap a descriptor's parameter map
    pub fn new(fields: &'a Map<String, Json>) -> Self {
        Self { fields }
    }

    /// A parameter set with no entries
    pub fn empty() -> Params<'static> {
        static EMPTY: OnceLock<Map<String, Json>> = OnceLock::new();
        Params {
            fields: EMPTY.get_or_init(Map::new),
        }
    }

    /// The raw parameter map
    pub fn raw(&self) -> &'a Map<String, Json> {
        self.fields
    }

    /// Raw JSON value of a parameter, if present and non-null
    pub fn get(&self, key: &str) -> Option<&'a Json> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    /// Optional string parameter
    pub fn str(&self, key: &str) -> Result<Option<&'a str>> {
        match self.get(key) {
            None => Ok(None),
            Some(Json::String(s)) => Ok(Some(s)),
            Some(other) => Err(Error::InvalidParameter(format!(
                "'{}' must be a string, got {}",
                key, other
            ))),
        }
    }

    /// Required string parameter
    pub fn required_str(&self, key: &str) -> Result<&'a str> {
        self.str(key)?.ok_or_else(|| {
            Error::InvalidParameter(format!("missing required parameter '{}'", key))
        })
    }

    /// String parameter with a default
    pub fn str_or(&self, key: &str, default: &'a str) -> Result<&'a str> {
        Ok(self.str(key)?.unwrap_or(default))
    }

    /// Optional numeric parameter
    pub fn f64(&self, key: &str) -> Result<Option<f64>> {
        match self.get(key) {
            None => Ok(None),
            Some(Json::Number(n)) => n.as_f64().map(Some).ok_or_else(|| {
                Error::InvalidParameter(format!("'{}' is not a representable number", key))
            }),
            Some(other) => Err(Error::InvalidParameter(format!(
                "'{}' must be a number, got {}",
                key, other
            ))),
        }
    }

    /// Numeric parameter with a default
    pub fn f64_or(&self, key: &str, default: f64) -> Result<f64> {
        Ok(self.f64(key)?.unwrap_or(default))
    }

    /// Non-negative integer parameter with a default
    pub fn usize_or(&self, key: &str, default: usize) -> Result<usize> {
        match self.get(key) {
            None => Ok(default),
            Some(Json::Number(n)) => n
                .as_u64()
                .map(|v| v as usize)
                .ok_or_else(|| {
                    Error::InvalidParameter(format!("'{}' must be a non-negative integer", key))
                }),
            Some(other) => Err(Error::InvalidParameter(format!(
                "'{}' must be a non-negative integer, got {}",
                key, other
            ))),
        }
    }

    /// Boolean parameter with a default
    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.get(key) {
            None => Ok(default),
            Some(Json::Bool(b)) => Ok(*b),
            Some(other) => Err(Error::InvalidParameter(format!(
                "'{}' must be a boolean, got {}",
                key, other
            ))),
        }
    }

    /// Optional list-of-strings parameter
    pub fn str_list(&self, key: &str) -> Result<Option<Vec<String>>> {
        match self.get(key) {
            None => Ok(None),
            Some(Json::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        Error::InvalidParameter(format!(
                            "'{}' must be a list of strings, got element {}",
                            key, item
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            Some(other) => Err(Error::InvalidParameter(format!(
                "'{}' must be a list of strings, got {}",
                key, other
            ))),
        }
    }

    /// Scalar parameter converted to a cell [`Value`]
    pub fn scalar(&self, key: &str) -> Result<Option<Value>> {
        match self.get(key) {
            None => Ok(None),
            Some(json) => Value::from_json(json).map(Some).ok_or_else(|| {
                Error::InvalidParameter(format!("'{}' must be a scalar value", key))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params_from(json: Json) -> Map<String, Json> {
        match json {
            Json::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_typed_getters() {
        let map = params_from(json!({
            "method": "mean",
            "n_std": 2.5,
            "columns": ["a", "b"],
            "flag": true,
        }));
        let params = Params::new(&map);

        assert_eq!(params.required_str("method").unwrap(), "mean");
        assert_eq!(params.f64_or("n_std", 3.0).unwrap(), 2.5);
        assert_eq!(params.f64_or("absent", 3.0).unwrap(), 3.0);
        assert_eq!(
            params.str_list("columns").unwrap(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert!(params.bool_or("flag", false).unwrap());
    }

    #[test]
    fn test_missing_required_is_invalid_parameter() {
        let map = Map::new();
        let params = Params::new(&map);
        assert!(matches!(
            params.required_str("method"),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_wrong_type_is_invalid_parameter() {
        let map = params_from(json!({"columns": "a"}));
        let params = Params::new(&map);
        assert!(matches!(
            params.str_list("columns"),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_null_parameter_treated_as_absent() {
        let map = params_from(json!({"columns": null}));
        let params = Params::new(&map);
        assert_eq!(params.str_list("columns").unwrap(), None);
    }
}
