// Serde helpers mapping the host's zero values onto absent fields
use serde::{Deserialize, Deserializer};

/// Reads an optional string, treating `""` as absent.
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Reads an optional period, treating `0` as absent.
pub(crate) fn zero_as_none<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<u32>::deserialize(deserializer)?;
    Ok(value.filter(|v| *v != 0))
}
