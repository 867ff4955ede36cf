//! Opaque content tree: rows hold columns, columns hold leaf modules.
//!
//! Only merge and split operations restructure this tree. Rules read it for counting and for
//! a handful of well-known module attributes (button text, headings, icons, counters).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub id: String,
    /// Column layout descriptor, e.g. `1_2,1_2`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns_layout: Option<String>,
    #[serde(default)]
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Column {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default)]
    pub modules: Vec<Module>,
}

/// A leaf content block such as a heading, button, blurb, or counter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Module {
    #[serde(default)]
    pub id: String,
    pub kind: String,
    #[serde(default)]
    pub attrs: Map<String, Value>,
}

impl Row {
    pub fn new(id: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            id: id.into(),
            columns_layout: None,
            columns,
        }
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.columns.iter().flat_map(|c| c.modules.iter())
    }
}

impl Column {
    pub fn new(id: impl Into<String>, modules: Vec<Module>) -> Self {
        Self {
            id: id.into(),
            width: None,
            modules,
        }
    }
}

impl Module {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            attrs: Map::new(),
        }
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind.eq_ignore_ascii_case(kind)
    }

    /// String attribute, ignoring non-string and empty values.
    pub fn text_attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Loose truthiness for flags stored as bool, number, or string.
    pub fn flag_attr(&self, key: &str) -> bool {
        match self.attrs.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
            Some(Value::String(s)) => {
                let s = s.trim();
                !s.is_empty() && s != "0" && !s.eq_ignore_ascii_case("false")
            }
            _ => false,
        }
    }
}
