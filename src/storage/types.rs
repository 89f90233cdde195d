//! Core data types for the entry document
//!
//! - `Entry`: one day's recorded metrics, all fields kept as text
//! - `Document`: the single JSON array holding every entry

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{StorageError, StorageResult};

/// Date format used for the `date` field
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One day's recorded metrics.
///
/// Values are free text: nothing here is parsed or range-checked. `waist`
/// is optional because older documents do not carry it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Calendar day, `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub weight: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waist: Option<String>,

    /// Fasting window, e.g. "16:8"
    #[serde(default)]
    pub fasting: String,

    /// Energy level, nominally 1-5
    #[serde(default)]
    pub energy: String,

    #[serde(default)]
    pub notes: String,
}

impl Entry {
    /// Create an entry for the given date with an empty set of metrics
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Default::default()
        }
    }

    /// Create an entry dated today (local time)
    pub fn today() -> Self {
        Self::new(Local::now().format(DATE_FORMAT).to_string())
    }

    /// Builder: set weight
    pub fn weight(mut self, weight: impl Into<String>) -> Self {
        self.weight = weight.into();
        self
    }

    /// Builder: set waist
    pub fn waist(mut self, waist: impl Into<String>) -> Self {
        self.waist = Some(waist.into());
        self
    }

    /// Builder: set fasting window
    pub fn fasting(mut self, fasting: impl Into<String>) -> Self {
        self.fasting = fasting.into();
        self
    }

    /// Builder: set energy level
    pub fn energy(mut self, energy: impl Into<String>) -> Self {
        self.energy = energy.into();
        self
    }

    /// Builder: set notes
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Parse the date field, if it is a valid calendar day
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).ok()
    }

    /// Weight as a number, if the text parses as one
    pub fn weight_value(&self) -> Option<f64> {
        parse_metric(&self.weight)
    }

    /// Waist as a number, if present and the text parses as one
    pub fn waist_value(&self) -> Option<f64> {
        self.waist.as_deref().and_then(parse_metric)
    }
}

fn parse_metric(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// The persisted document: an ordered array of entries.
///
/// Elements are kept as raw JSON so that a document written by a client is
/// read back exactly as it was sent. Use [`Document::entries`] for the typed
/// view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Vec<Value>);

impl Document {
    /// An empty document
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate that a JSON value is array-shaped and wrap it.
    pub fn from_value(value: Value) -> StorageResult<Self> {
        match value {
            Value::Array(items) => Ok(Self(items)),
            other => Err(StorageError::NotAnArray(json_type_name(&other))),
        }
    }

    /// Parse a stored document from raw bytes.
    ///
    /// Syntax errors are `Serialization` errors; valid JSON that is not an
    /// array is `Corruption`.
    pub fn from_slice(bytes: &[u8]) -> StorageResult<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value).map_err(|e| StorageError::Corruption(e.to_string()))
    }

    /// Build a document from typed entries
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> StorageResult<Self> {
        let items = entries
            .into_iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(items))
    }

    /// Serialize to the stored byte form
    pub fn to_bytes(&self) -> StorageResult<Vec<u8>> {
        Ok(serde_json::to_vec(&self.0)?)
    }

    /// Append one entry at the end
    pub fn push(&mut self, entry: &Entry) -> StorageResult<()> {
        self.0.push(serde_json::to_value(entry)?);
        Ok(())
    }

    /// Typed view of the document.
    ///
    /// Elements that are not JSON objects are skipped. Object fields holding
    /// numbers are rendered as text.
    pub fn entries(&self) -> Vec<Entry> {
        self.0.iter().filter_map(entry_from_value).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw elements
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }
}

fn entry_from_value(value: &Value) -> Option<Entry> {
    let object = value.as_object()?;
    let field = |name: &str| object.get(name).and_then(text_of);

    Some(Entry {
        date: field("date").unwrap_or_default(),
        weight: field("weight").unwrap_or_default(),
        waist: field("waist"),
        fasting: field("fasting").unwrap_or_default(),
        energy: field("energy").unwrap_or_default(),
        notes: field("notes").unwrap_or_default(),
    })
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
