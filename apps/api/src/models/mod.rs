pub mod analysis;
pub mod candidate;
pub mod resume;

use serde::{Deserialize, Deserializer};

/// Deserializes an absent or `null` field as `T::default()`.
/// The parsing service emits `null` for sections it could not extract.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
