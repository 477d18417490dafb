//! Loads documents described as JSON objects.
//!
//! A document file holds one object or an array of objects. Each member
//! becomes a property: strings, booleans and numbers map to the matching
//! [`Value`], arrays become multi-valued properties and `null` members are
//! skipped. Three tagged objects are understood:
//!
//! - `{"date": "<RFC 3339>"}` becomes a [`Value::Date`].
//! - `{"file": "<path>"}` becomes binary content read lazily from `path`,
//!   resolved against the directory of the JSON file.
//! - `{"text": "<string>"}` becomes binary content holding the string.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value as Json};
use spi::{BinaryValue, Property, SimpleDocument, Value};
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Failure to load a document file.
#[derive(Debug, Error)]
pub enum DocumentFileError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}", path = .path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The file is not valid JSON.
    #[error("failed to parse {path}: {source}", path = .path.display())]
    Json {
        /// File being parsed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// The JSON does not describe documents.
    #[error("{path}: {message}", path = .path.display())]
    Shape {
        /// File being converted.
        path: PathBuf,
        /// What was wrong.
        message: String,
    },
}

/// Reads every document described in `path`.
pub fn load_documents(path: &Path) -> Result<Vec<SimpleDocument>, DocumentFileError> {
    let text = fs::read_to_string(path).map_err(|source| DocumentFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let json: Json = serde_json::from_str(&text).map_err(|source| DocumentFileError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let shape = |message: String| DocumentFileError::Shape {
        path: path.to_path_buf(),
        message,
    };

    match json {
        Json::Object(members) => Ok(vec![document(&members, base).map_err(shape)?]),
        Json::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Json::Object(members) => document(members, base)
                    .map_err(|message| shape(format!("document {index}: {message}"))),
                _ => Err(shape(format!("document {index} is not an object"))),
            })
            .collect(),
        _ => Err(shape("expected an object or an array of objects".to_owned())),
    }
}

fn document(members: &Map<String, Json>, base: &Path) -> Result<SimpleDocument, String> {
    let mut document = SimpleDocument::new();
    for (name, json) in members {
        let values = match json {
            Json::Null => continue,
            Json::Array(items) => items
                .iter()
                .filter(|item| !item.is_null())
                .map(|item| value(item, base))
                .collect::<Result<Vec<_>, _>>(),
            single => value(single, base).map(|value| vec![value]),
        }
        .map_err(|message| format!("property {name:?}: {message}"))?;
        document.insert(name.clone(), Property::new(values));
    }
    Ok(document)
}

fn value(json: &Json, base: &Path) -> Result<Value, String> {
    match json {
        Json::String(text) => Ok(Value::String(text.clone())),
        Json::Bool(flag) => Ok(Value::Boolean(*flag)),
        Json::Number(number) => Ok(number
            .as_i64()
            .map_or_else(|| Value::Double(number.as_f64().unwrap_or(f64::NAN)), Value::Long)),
        Json::Object(tagged) => tagged_value(tagged, base),
        Json::Null | Json::Array(_) => Err("nested arrays and nulls are not values".to_owned()),
    }
}

fn tagged_value(tagged: &Map<String, Json>, base: &Path) -> Result<Value, String> {
    let mut entries = tagged.iter();
    let (Some((tag, Json::String(text))), None) = (entries.next(), entries.next()) else {
        return Err("tagged values hold exactly one string member".to_owned());
    };
    match tag.as_str() {
        "date" => OffsetDateTime::parse(text, &Rfc3339)
            .map(Value::Date)
            .map_err(|error| format!("invalid date {text:?}: {error}")),
        "file" => Ok(Value::Binary(BinaryValue::from_file(base.join(text)))),
        "text" => Ok(Value::Binary(BinaryValue::from_bytes(text.as_bytes()))),
        other => Err(format!("unknown value tag {other:?}")),
    }
}
