//! Ingestion boundary for generated layout documents.
//!
//! Generated documents spell the same attribute in several places (`_visual_context` on the
//! section, `attrs._visual_context`, `attrs.visual_context`) and nest content under `rows`,
//! `children`, or `content`. Every alias is resolved here, once, into a typed [`Layout`]. The
//! typed serde form produced by `serde_json::to_value(&layout)` is accepted as well.

use super::attributes::{
    AttentionLevel, EmotionalTone, NarrativeRole, Spacing, TypographyEmphasis, VisualContext,
    VisualDensity, VisualIntent, VisualScale,
};
use super::content::{Column, Module, Row};
use super::section::{Background, Section};
use super::Layout;
use crate::error::ApiError;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

const CHILD_KEYS: [&str; 3] = ["children", "content", "rows"];
const COLUMN_KEYS: [&str; 3] = ["columns", "children", "content"];
const MODULE_KEYS: [&str; 3] = ["modules", "children", "content"];

/// Parse a layout document from a JSON string.
pub fn from_str(input: &str) -> Result<Layout, ApiError> {
    let value: Value = serde_json::from_str(input)?;
    from_json(&value)
}

/// Read and parse a layout document from disk.
pub fn from_path(path: &Path) -> Result<Layout, ApiError> {
    let raw = std::fs::read_to_string(path)?;
    from_str(&raw).map_err(|e| ApiError::IngestError(format!("{}: {}", path.display(), e)))
}

/// Resolve a layout document into the typed model.
///
/// Accepts `{ "patterns": [...] }`, `{ "sections": [...] }`, or a bare array of sections.
pub fn from_json(value: &Value) -> Result<Layout, ApiError> {
    let sections = match value {
        Value::Array(items) => items,
        Value::Object(doc) => doc
            .get("patterns")
            .or_else(|| doc.get("sections"))
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ApiError::IngestError(
                    "layout document has no `patterns` or `sections` array".to_string(),
                )
            })?,
        _ => {
            return Err(ApiError::IngestError(
                "layout document must be an object or an array".to_string(),
            ))
        }
    };

    let sections = sections
        .iter()
        .enumerate()
        .map(|(index, raw)| ingest_section(index, raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Layout::new(sections))
}

fn ingest_section(index: usize, raw: &Value) -> Result<Section, ApiError> {
    let obj = raw.as_object().ok_or_else(|| {
        ApiError::IngestError(format!("section #{} is not an object", index))
    })?;
    let view = AttrView::new(obj);

    let pattern = view
        .str("pattern")
        .map(|p| p.trim().to_ascii_lowercase())
        .unwrap_or_else(|| "unknown".to_string());

    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("section_{}", index));

    let background = Background {
        color: view.str("background_color").or_else(|| view.nested_str("background", "color")),
        kind: view.str("background_type").or_else(|| view.nested_str("background", "kind")),
        use_alt: view.flag("use_background_alt") || view.nested_flag("background", "use_alt"),
    };

    let section = Section {
        id,
        visual_context: view.parsed("visual_context", VisualContext::parse),
        visual_intent: view.parsed("visual_intent", VisualIntent::parse),
        visual_density: view.parsed("visual_density", VisualDensity::parse),
        visual_scale: view.parsed("visual_scale", VisualScale::parse),
        typography_scale: view.parsed("typography_scale", VisualScale::parse),
        typography_emphasis: view.parsed("typography_emphasis", TypographyEmphasis::parse),
        narrative_role: view.parsed("narrative_role", NarrativeRole::parse),
        emotional_tone: view.parsed("emotional_tone", EmotionalTone::parse),
        attention_level: view.parsed("attention_level", AttentionLevel::parse),
        before_spacing: view.parsed("before_spacing", Spacing::parse),
        after_spacing: view.parsed("after_spacing", Spacing::parse),
        background,
        padding: view.padding(),
        placeholder: view.flag("placeholder"),
        autofix_tags: view.string_list("autofix"),
        rows: children(obj, &CHILD_KEYS)
            .iter()
            .map(ingest_row)
            .collect(),
        pattern,
    };

    Ok(section)
}

fn ingest_row(raw: &Value) -> Row {
    let Some(obj) = raw.as_object() else {
        return Row::default();
    };
    let attrs = obj.get("attrs").and_then(Value::as_object);
    Row {
        id: id_of(obj),
        columns_layout: obj
            .get("columns_layout")
            .or_else(|| attrs.and_then(|a| a.get("columns")))
            .and_then(Value::as_str)
            .map(str::to_string),
        columns: children(obj, &COLUMN_KEYS)
            .iter()
            .map(ingest_column)
            .collect(),
    }
}

fn ingest_column(raw: &Value) -> Column {
    let Some(obj) = raw.as_object() else {
        return Column::default();
    };
    let attrs = obj.get("attrs").and_then(Value::as_object);
    Column {
        id: id_of(obj),
        width: obj
            .get("width")
            .or_else(|| attrs.and_then(|a| a.get("width")))
            .and_then(Value::as_str)
            .map(str::to_string),
        modules: children(obj, &MODULE_KEYS)
            .iter()
            .filter_map(ingest_module)
            .collect(),
    }
}

fn ingest_module(raw: &Value) -> Option<Module> {
    let obj = raw.as_object()?;
    let kind = obj
        .get("kind")
        .or_else(|| obj.get("type"))
        .and_then(Value::as_str)?
        .to_string();
    let mut attrs = obj
        .get("attrs")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    // Canonical spellings: blurb icons under `font_icon`, counter units under `suffix`.
    alias_into(&mut attrs, "icon", "font_icon");
    alias_into(&mut attrs, "percent_sign", "suffix");

    Some(Module {
        id: id_of(obj),
        kind,
        attrs,
    })
}

fn alias_into(attrs: &mut Map<String, Value>, alias: &str, canonical: &str) {
    if attrs.contains_key(canonical) {
        return;
    }
    if let Some(value) = attrs.get(alias).cloned() {
        attrs.insert(canonical.to_string(), value);
    }
}

fn id_of(obj: &Map<String, Value>) -> String {
    obj.get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn children<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> &'a [Value] {
    keys.iter()
        .filter_map(|k| obj.get(*k).and_then(Value::as_array))
        .find(|items| !items.is_empty())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Alias-aware reader over one section object.
///
/// Lookup order for `name`: `_name` on the section, `attrs._name`, `attrs.name`, then `name`
/// on the section.
struct AttrView<'a> {
    section: &'a Map<String, Value>,
    attrs: Option<&'a Map<String, Value>>,
}

impl<'a> AttrView<'a> {
    fn new(section: &'a Map<String, Value>) -> Self {
        Self {
            section,
            attrs: section.get("attrs").and_then(Value::as_object),
        }
    }

    fn get(&self, name: &str) -> Option<&'a Value> {
        let private = format!("_{}", name);
        self.section
            .get(&private)
            .or_else(|| self.attrs.and_then(|a| a.get(&private)))
            .or_else(|| self.attrs.and_then(|a| a.get(name)))
            .or_else(|| self.section.get(name))
            .filter(|v| !v.is_null())
    }

    fn str(&self, name: &str) -> Option<String> {
        self.get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    }

    fn nested_str(&self, outer: &str, inner: &str) -> Option<String> {
        self.section
            .get(outer)
            .and_then(|v| v.get(inner))
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn nested_flag(&self, outer: &str, inner: &str) -> bool {
        self.section
            .get(outer)
            .and_then(|v| v.get(inner))
            .map(truthy)
            .unwrap_or(false)
    }

    fn flag(&self, name: &str) -> bool {
        self.get(name).map(truthy).unwrap_or(false)
    }

    fn parsed<T>(&self, name: &str, parse: fn(&str) -> Option<T>) -> Option<T> {
        let raw = self.get(name)?.as_str()?;
        let parsed = parse(raw);
        if parsed.is_none() {
            debug!(attribute = name, value = raw, "ignoring unrecognized attribute value");
        }
        parsed
    }

    fn padding(&self) -> Option<u32> {
        match self.get("padding")? {
            Value::Number(n) => n.as_u64().map(|v| v as u32),
            Value::Object(sides) => sides.get("top").and_then(Value::as_u64).map(|v| v as u32),
            _ => None,
        }
    }

    fn string_list(&self, name: &str) -> Vec<String> {
        self.get(name)
            .or_else(|| self.section.get("autofix_tags"))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty() && s != "0" && !s.eq_ignore_ascii_case("false"),
        _ => false,
    }
}
