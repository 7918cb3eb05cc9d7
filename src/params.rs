//! Inputs accepted by the dispatcher: query parameters and request bodies.

use indexmap::IndexMap;
use serde_json::Value;

/// A query parameter value: one scalar, or a list sent as repeated keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Scalar(String),
    List(Vec<String>),
}

impl QueryValue {
    fn values(&self) -> &[String] {
        match self {
            QueryValue::Scalar(value) => std::slice::from_ref(value),
            QueryValue::List(values) => values,
        }
    }
}

macro_rules! scalar_from {
    ($($t:ty),*) => {
        $(impl From<$t> for QueryValue {
            fn from(value: $t) -> Self {
                QueryValue::Scalar(value.to_string())
            }
        })*
    };
}

scalar_from!(&str, String, &String, bool, i32, i64, u32, u64, usize);

impl<T: ToString> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        QueryValue::List(values.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString> From<&[T]> for QueryValue {
    fn from(values: &[T]) -> Self {
        QueryValue::List(values.iter().map(ToString::to_string).collect())
    }
}

/// Ordered query parameters.
///
/// Keys keep insertion order; inserting an existing key replaces its value in
/// place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: IndexMap<String, QueryValue>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](QueryParams::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts only when `value` is present.
    pub fn insert_opt<V: Into<QueryValue>>(&mut self, key: impl Into<String>, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flattens into `(key, value)` pairs, one per list element, in order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .flat_map(|(key, value)| {
                value
                    .values()
                    .iter()
                    .map(move |v| (key.clone(), v.clone()))
            })
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// Body of a dispatched request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized as JSON, `Content-Type: application/json`.
    Json(Value),
    /// Sent verbatim, `Content-Type: image/jpeg` (playlist cover uploads).
    Image(Vec<u8>),
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        RequestBody::Json(value)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        RequestBody::Image(bytes)
    }
}
