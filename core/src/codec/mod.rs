//! Config codec
//!
//! Settings travel as a portable text blob (clipboard exports, page imports):
//!
//! ```text
//! settings ──serde_json──▶ canonical JSON (+ "$type") ──DEFLATE──▶ bytes ──base64──▶ blob
//! ```
//!
//! Decoding runs the pipeline backwards and resolves every `"$type"` entry
//! through the [`TypeBinder`] allow-list before handing the tree to serde.
//! The config file uses the canonical JSON stage directly (pretty printed).

mod binder;
mod error;

use std::io::{Read, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use lmeter_types::{
    AppConfig, BarConfig, FeedConfig, GeneralConfig, MeterWindowConfig, VisibilityConfig,
    VisibilitySettings,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::error;

pub use binder::{KnownType, TypeBinder};
pub use error::CodecError;

/// Key holding the bound type name
pub const TYPE_KEY: &str = "$type";

/// A settings type the codec may write and read back
pub trait Bindable: Serialize + DeserializeOwned {
    /// Type written for this value
    fn bound_type(&self) -> KnownType;

    /// Whether a blob whose root is `ty` may decode into `Self`
    fn accepts(ty: KnownType) -> bool;
}

macro_rules! bind_struct {
    ($($ty:ty => $known:expr),* $(,)?) => {
        $(
            impl Bindable for $ty {
                fn bound_type(&self) -> KnownType {
                    $known
                }

                fn accepts(ty: KnownType) -> bool {
                    ty == $known
                }
            }
        )*
    };
}

bind_struct! {
    AppConfig => KnownType::AppConfig,
    FeedConfig => KnownType::FeedConfig,
    MeterWindowConfig => KnownType::MeterWindow,
    GeneralConfig => KnownType::GeneralPage,
    BarConfig => KnownType::BarPage,
    VisibilitySettings => KnownType::VisibilityPage,
    VisibilityConfig => KnownType::LegacyVisibilityPage,
}

// ─────────────────────────────────────────────────────────────────────────────
// Canonical Text
// ─────────────────────────────────────────────────────────────────────────────

fn tagged_value<T: Bindable>(value: &T) -> Result<Value, CodecError> {
    let mut tree = serde_json::to_value(value).map_err(CodecError::Serialize)?;
    let Value::Object(map) = &mut tree else {
        return Err(CodecError::NotAnObject);
    };
    map.insert(
        TYPE_KEY.to_string(),
        Value::String(TypeBinder::bind_to_name(value.bound_type()).to_string()),
    );
    Ok(tree)
}

/// Resolve and canonicalize the type tag of one object, if it has one
fn bind_object(map: &mut Map<String, Value>) -> Result<Option<KnownType>, CodecError> {
    let Some(tag) = map.get_mut(TYPE_KEY) else {
        return Ok(None);
    };
    let name = match tag {
        Value::String(name) => name,
        other => {
            return Err(CodecError::TypeLoad {
                name: other.to_string(),
            });
        }
    };
    let ty = TypeBinder::bind_to_type(name)?;
    *name = TypeBinder::bind_to_name(ty).to_string();
    Ok(Some(ty))
}

/// Resolve every type tag below `tree`, failing on the first unknown one
fn bind_nested(tree: &mut Value) -> Result<(), CodecError> {
    match tree {
        Value::Object(map) => {
            bind_object(map)?;
            map.values_mut().try_for_each(bind_nested)
        }
        Value::Array(items) => items.iter_mut().try_for_each(bind_nested),
        _ => Ok(()),
    }
}

fn from_tree<T: Bindable>(mut tree: Value) -> Result<T, CodecError> {
    let Value::Object(root) = &mut tree else {
        return Err(CodecError::NotAnObject);
    };
    let ty = bind_object(root)?.ok_or(CodecError::MissingTypeTag)?;
    for child in root.values_mut() {
        bind_nested(child)?;
    }

    if !T::accepts(ty) {
        return Err(CodecError::TypeMismatch {
            expected: std::any::type_name::<T>(),
            found: ty.canonical_name(),
        });
    }
    serde_json::from_value(tree).map_err(CodecError::Parse)
}

/// Compact canonical JSON with the root type tag
pub fn to_canonical_text<T: Bindable>(value: &T) -> Result<String, CodecError> {
    serde_json::to_string(&tagged_value(value)?).map_err(CodecError::Serialize)
}

/// Pretty canonical JSON, as stored in the config file
pub fn to_config_text<T: Bindable>(value: &T) -> Result<String, CodecError> {
    serde_json::to_string_pretty(&tagged_value(value)?).map_err(CodecError::Serialize)
}

/// Parse canonical JSON (compact or pretty)
pub fn from_canonical_text<T: Bindable>(text: &str) -> Result<T, CodecError> {
    let tree: Value = serde_json::from_str(text).map_err(CodecError::Parse)?;
    from_tree(tree)
}

// ─────────────────────────────────────────────────────────────────────────────
// Blob Encoding
// ─────────────────────────────────────────────────────────────────────────────

pub fn encode<T: Bindable>(value: &T) -> Result<String, CodecError> {
    let text = to_canonical_text(value)?;

    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(text.as_bytes())
        .map_err(CodecError::Compress)?;
    let compressed = encoder.finish().map_err(CodecError::Compress)?;

    Ok(STANDARD.encode(compressed))
}

pub fn decode<T: Bindable>(blob: &str) -> Result<T, CodecError> {
    let blob = blob.trim();
    if blob.is_empty() {
        return Err(CodecError::Empty);
    }

    let compressed = STANDARD.decode(blob).map_err(CodecError::Base64)?;
    let mut text = String::new();
    DeflateDecoder::new(compressed.as_slice())
        .read_to_string(&mut text)
        .map_err(CodecError::Decompress)?;

    from_canonical_text(&text)
}

/// Encode for export; failures are logged and yield `None`
pub fn export_string<T: Bindable>(value: &T) -> Option<String> {
    encode(value)
        .inspect_err(|e| {
            error!(error = %e, source = ?std::error::Error::source(e), "Failed to build export string")
        })
        .ok()
}

/// Decode an import; failures are logged and yield `None`
pub fn import_string<T: Bindable>(blob: &str) -> Option<T> {
    decode(blob)
        .inspect_err(|e| {
            error!(error = %e, source = ?std::error::Error::source(e), "Failed to read import string")
        })
        .ok()
}
