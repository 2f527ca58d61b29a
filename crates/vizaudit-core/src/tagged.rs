//! Helpers for the platform's externally tagged JSON objects.
//!
//! Filters, measure definitions and bucket items are encoded as an object
//! with a single key naming the variant, e.g.
//! `{"absoluteDateFilter": {"from": "2020-01-01", ...}}`. Deriving
//! `Deserialize` on an enum would reject tags we do not model, so the enums
//! in this crate split the object by hand and keep unknown tags around.

use serde::{
    Deserialize, Deserializer,
    de::{DeserializeOwned, Error},
};
use serde_json::{Map, Value};

/// Splits a single-key JSON object into its tag and body.
pub(crate) fn split<'de, D>(deserializer: D) -> Result<(String, Value), D::Error>
where
    D: Deserializer<'de>,
{
    let map = Map::<String, Value>::deserialize(deserializer)?;
    if map.len() != 1 {
        return Err(D::Error::custom(format!(
            "expected an object with exactly one variant key, found {} keys",
            map.len()
        )));
    }

    // The length check above guarantees one entry.
    map.into_iter()
        .next()
        .ok_or_else(|| D::Error::custom("empty tagged object"))
}

/// Decodes the body of a tagged object into `T`.
pub(crate) fn body<T, E>(tag: &str, value: Value) -> Result<T, E>
where
    T: DeserializeOwned,
    E: Error,
{
    serde_json::from_value(value).map_err(|err| E::custom(format!("invalid `{tag}`: {err}")))
}
