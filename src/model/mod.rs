use serde::{Deserialize, Deserializer};

pub mod cell;
pub mod event;
pub mod event_type;
pub mod group;
pub mod player;

/// Read a field that stored records may carry as `null`, treating it like a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
