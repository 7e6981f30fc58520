// crates/dex-core/src/core/decode.rs
// ============================================================================
// Module: Dex Wire Decoder
// Description: Decodes one upstream JSON payload into a RemoteRecord.
// Purpose: Validate each nesting level and normalize type ordering.
// Dependencies: serde_json, thiserror, url
// ============================================================================

//! ## Overview
//! The upstream payload nests type names two objects deep and wraps each base
//! stat in its own object. Decoding walks those levels explicitly and fails
//! closed: any missing key, wrong type, out-of-range number, or malformed URL
//! aborts the whole decode. Partial records are never produced.
//!
//! Type ordering rule: when exactly two types are present and the first is
//! `"normal"`, the pair is swapped so `"normal"` is never listed first.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::core::entry::BaseStats;
use crate::core::entry::RemoteRecord;
use crate::core::identifiers::CatalogId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Number of base stats every record must carry.
pub const STAT_COUNT: usize = 6;
/// Maximum number of types a record may carry.
pub const MAX_TYPES: usize = 2;
/// Type name moved out of first position when paired.
const NORMAL_TYPE: &str = "normal";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Wire payload shape violation.
///
/// # Invariants
/// - Messages name the offending field path and never embed payload bodies.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed payload: {0}")]
pub struct DecodeError(pub String);

impl DecodeError {
    /// Builds an error for the given field path and problem.
    fn at(path: &str, problem: &str) -> Self {
        Self(format!("{path}: {problem}"))
    }
}

// ============================================================================
// SECTION: Decoding
// ============================================================================

/// Decodes raw payload bytes into a [`RemoteRecord`].
///
/// # Errors
///
/// Returns [`DecodeError`] when the bytes are not JSON or the shape is invalid.
pub fn decode_record(bytes: &[u8]) -> Result<RemoteRecord, DecodeError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| DecodeError(format!("invalid json: {err}")))?;
    decode_value(&value)
}

/// Decodes a parsed JSON value into a [`RemoteRecord`].
///
/// # Errors
///
/// Returns [`DecodeError`] when any required field is missing or malformed.
pub fn decode_value(value: &Value) -> Result<RemoteRecord, DecodeError> {
    let root = as_object(value, "$")?;
    let id = decode_id(field(root, "$", "id")?)?;
    let name = as_string(field(root, "$", "name")?, "$.name")?.to_string();
    let types = decode_types(field(root, "$", "types")?)?;
    let base_stats = decode_stats(field(root, "$", "stats")?)?;
    let (sprite_url, shiny_url) = decode_sprites(field(root, "$", "sprites")?)?;
    Ok(RemoteRecord {
        id,
        name,
        types,
        base_stats,
        sprite_url,
        shiny_url,
    })
}

/// Decodes the record identifier.
fn decode_id(value: &Value) -> Result<CatalogId, DecodeError> {
    let raw = value.as_u64().ok_or_else(|| DecodeError::at("$.id", "expected unsigned integer"))?;
    let id = u32::try_from(raw).map_err(|_| DecodeError::at("$.id", "out of range"))?;
    Ok(CatalogId::new(id))
}

/// Decodes `types[].type.name` and applies the ordering rule.
fn decode_types(value: &Value) -> Result<Vec<String>, DecodeError> {
    let slots = as_array(value, "$.types")?;
    if slots.is_empty() {
        return Err(DecodeError::at("$.types", "expected at least one type"));
    }
    if slots.len() > MAX_TYPES {
        return Err(DecodeError::at("$.types", "expected at most two types"));
    }
    let mut types = Vec::with_capacity(slots.len());
    for (index, slot) in slots.iter().enumerate() {
        let slot_path = format!("$.types[{index}]");
        let wrapper = as_object(slot, &slot_path)?;
        let type_path = format!("{slot_path}.type");
        let inner = as_object(field(wrapper, &slot_path, "type")?, &type_path)?;
        let name = as_string(field(inner, &type_path, "name")?, &format!("{type_path}.name"))?;
        types.push(name.to_string());
    }
    normalize_type_order(&mut types);
    Ok(types)
}

/// Moves `"normal"` out of first position in a two-type pair.
fn normalize_type_order(types: &mut [String]) {
    if types.len() == 2 && types[0] == NORMAL_TYPE {
        types.swap(0, 1);
    }
}

/// Decodes `stats[].base_stat` in source order.
fn decode_stats(value: &Value) -> Result<BaseStats, DecodeError> {
    let slots = as_array(value, "$.stats")?;
    if slots.len() != STAT_COUNT {
        return Err(DecodeError::at(
            "$.stats",
            &format!("expected {STAT_COUNT} entries, found {}", slots.len()),
        ));
    }
    let mut values = [0_i16; STAT_COUNT];
    for (index, (slot, target)) in slots.iter().zip(values.iter_mut()).enumerate() {
        let slot_path = format!("$.stats[{index}]");
        let wrapper = as_object(slot, &slot_path)?;
        let stat_path = format!("{slot_path}.base_stat");
        let raw = field(wrapper, &slot_path, "base_stat")?
            .as_i64()
            .ok_or_else(|| DecodeError::at(&stat_path, "expected integer"))?;
        *target = i16::try_from(raw).map_err(|_| DecodeError::at(&stat_path, "out of range"))?;
    }
    Ok(BaseStats::from_array(values))
}

/// Decodes `sprites.front_default` and `sprites.front_shiny`.
fn decode_sprites(value: &Value) -> Result<(Url, Url), DecodeError> {
    let sprites = as_object(value, "$.sprites")?;
    let sprite_url = decode_url(field(sprites, "$.sprites", "front_default")?, "front_default")?;
    let shiny_url = decode_url(field(sprites, "$.sprites", "front_shiny")?, "front_shiny")?;
    Ok((sprite_url, shiny_url))
}

/// Parses an absolute URL string.
fn decode_url(value: &Value, key: &str) -> Result<Url, DecodeError> {
    let path = format!("$.sprites.{key}");
    let raw = as_string(value, &path)?;
    Url::parse(raw).map_err(|err| DecodeError::at(&path, &format!("invalid url ({err})")))
}

// ============================================================================
// SECTION: Shape Helpers
// ============================================================================

/// Looks up a required key.
fn field<'a>(map: &'a Map<String, Value>, path: &str, key: &str) -> Result<&'a Value, DecodeError> {
    map.get(key).ok_or_else(|| DecodeError::at(&format!("{path}.{key}"), "missing"))
}

/// Requires a JSON object.
fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, DecodeError> {
    let Value::Object(map) = value else {
        return Err(DecodeError::at(path, "expected object"));
    };
    Ok(map)
}

/// Requires a JSON array.
fn as_array<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>, DecodeError> {
    let Value::Array(items) = value else {
        return Err(DecodeError::at(path, "expected array"));
    };
    Ok(items)
}

/// Requires a JSON string.
fn as_string<'a>(value: &'a Value, path: &str) -> Result<&'a str, DecodeError> {
    let Value::String(text) = value else {
        return Err(DecodeError::at(path, "expected string"));
    };
    Ok(text)
}
