use serde::de::{self, Deserializer, Visitor};
use std::fmt;

/// TMDB numeric identifier.
pub type MediaId = u64;

/// Deserialize a TMDB id stored either as a JSON number or as a numeric string.
///
/// Older browser builds persisted ids straight from DOM `data-*` attributes,
/// so `"123"` and `123` both show up in stored lists.
pub fn lenient<'de, D>(deserializer: D) -> Result<MediaId, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientIdVisitor)
}

/// Optional variant of [`lenient`]; `null` and empty strings map to `None`.
pub fn lenient_opt<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientOptVisitor)
}

struct LenientIdVisitor;

impl<'de> Visitor<'de> for LenientIdVisitor {
    type Value = MediaId;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a numeric id or a numeric string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<MediaId, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<MediaId, E> {
        u64::try_from(v).map_err(|_| E::custom(format!("negative id: {}", v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<MediaId, E> {
        if v.fract() == 0.0 && v >= 0.0 {
            Ok(v as u64)
        } else {
            Err(E::custom(format!("non-integer id: {}", v)))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<MediaId, E> {
        v.trim().parse().map_err(|_| E::custom(format!("invalid id: {:?}", v)))
    }
}

struct LenientOptVisitor;

impl<'de> Visitor<'de> for LenientOptVisitor {
    type Value = Option<u32>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number, a numeric string or null")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(LenientOptVisitor)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        u32::try_from(v).map(Some).map_err(|_| E::custom(format!("number out of range: {}", v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u32::try_from(v).map(Some).map_err(|_| E::custom(format!("number out of range: {}", v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if v.fract() == 0.0 && v >= 0.0 && v <= u32::MAX as f64 {
            Ok(Some(v as u32))
        } else {
            Err(E::custom(format!("invalid number: {}", v)))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed.parse().map(Some).map_err(|_| E::custom(format!("invalid number: {:?}", v)))
    }
}
