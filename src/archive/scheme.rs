//! Decoding of `.scm` screen files.
//!
//! A scheme file is a JSON document wrapped in a fixed Scheme comment:
//!
//! ```text
//! #|
//! $JSON
//! {"authURL":[...],"YaVersion":"208","Source":"Form","Properties":{...}}
//! |#
//! ```
//!
//! The first 9 characters and the last 3 are the wrapper.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::models::{Screen, ROOT_UID};
use crate::tree::{faulty_component, ComponentBuilder};

const PREFIX_LEN: usize = 9;
const SUFFIX_LEN: usize = 3;

/// Why a scheme could not be turned into a component tree.
#[derive(Debug, thiserror::Error)]
pub enum SchemeError {
    #[error("scheme text is too short to hold the $JSON wrapper")]
    Wrapper,

    #[error("scheme JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("scheme has no Properties object")]
    MissingProperties,
}

#[derive(Debug, Deserialize)]
struct SchemeDocument {
    #[serde(rename = "YaVersion", default)]
    ya_version: Option<Value>,
    #[serde(rename = "Properties", default)]
    properties: Option<Value>,
}

/// Strips the `#|\n$JSON\n` prefix and `\n|#` suffix.
pub fn unwrap_json(text: &str) -> Result<&str, SchemeError> {
    let end = text
        .len()
        .checked_sub(SUFFIX_LEN)
        .filter(|end| *end >= PREFIX_LEN)
        .ok_or(SchemeError::Wrapper)?;
    text.get(PREFIX_LEN..end).ok_or(SchemeError::Wrapper)
}

/// Returns the root component JSON (`Properties`) of a scheme file.
pub fn root_component(text: &str) -> Result<Value, SchemeError> {
    let doc: SchemeDocument = serde_json::from_str(unwrap_json(text)?)?;
    if let Some(version) = &doc.ya_version {
        tracing::debug!(%version, "scheme decoded");
    }
    match doc.properties {
        Some(root @ Value::Object(_)) => Ok(root),
        _ => Err(SchemeError::MissingProperties),
    }
}

/// Builds a [`Screen`] from its scheme and block texts.
///
/// A scheme that cannot be decoded yields a screen whose form is a faulty
/// `Form` placeholder; the block XML is kept either way.
pub fn build_screen(
    name: String,
    scheme: &str,
    blocks: String,
    builder: &ComponentBuilder<'_>,
) -> Screen {
    let form = match root_component(scheme) {
        Ok(root) => builder.build(&root),
        Err(e) => {
            warn!(screen = %name, "screen scheme unreadable, using placeholder form: {e}");
            faulty_component(&name, "Form", ROOT_UID)
        }
    };
    Screen { name, form, blocks }
}
