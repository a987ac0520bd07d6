// src/models/mod.rs

pub mod olympic_result;
pub mod olympics;
pub mod question;
pub mod subject;
pub mod user;

use serde::{Deserialize, Deserializer};

/// Wraps any present value in `Some`, so that with `#[serde(default)]` an
/// absent key stays `None` while an explicit `null` becomes `Some(None)`.
pub(crate) fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
