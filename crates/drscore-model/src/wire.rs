//! `rpoHours` travels as an integer where `-1` means unknown.

pub(crate) mod rpo_hours {
    use drscore_core::rpo_sentinel;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(rpo_sentinel(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        let raw = Option::<i64>::deserialize(deserializer)?;
        Ok(raw.and_then(|hours| u32::try_from(hours).ok()))
    }
}
