//! Builders turning `has_part` values into directives
//!
//! The articles API is loose about shapes: lists arrive as single objects,
//! counts as strings, URLs under several names. Everything here tolerates
//! that and never fails; missing pieces become `None`.

use crate::directive::{
    ExecutesDirective, ExpressionDirective, ImplementationDirective, IoItemDirective,
    LinkDirective, Provenance, SourceLanguage,
};
use crate::popover::Popover;
use serde_json::Value;
use stmt_model::value::{as_list, first, label_of, str_field, str_field_any};
use stmt_model::Component;

const URL_FIELDS: [&str; 3] = ["has_support_url", "url", "source_url"];
const VERSION_FIELDS: [&str; 2] = ["version_info", "version"];

/// One input or output item
pub(crate) fn io_item(value: &Value, components: &[Component]) -> IoItemDirective {
    let label = label_of(value).map(str::to_string);
    let popover = label
        .as_deref()
        .and_then(|l| Popover::for_label(l, components));

    let has_expressions = value
        .get("has_expressions")
        .or_else(|| value.get("has_expression"))
        .map(|v| as_list(v).into_iter().map(expression).collect())
        .unwrap_or_default();

    IoItemDirective {
        label,
        popover,
        source_url: str_field(value, "source_url").map(str::to_string),
        source_table: value
            .get("source_table")
            .filter(|t| !t.is_null())
            .cloned(),
        has_expressions,
        comment: str_field(value, "comment").map(str::to_string),
        size: value.get("has_characteristic").and_then(size),
    }
}

fn expression(value: &Value) -> ExpressionDirective {
    match value {
        Value::String(url) => ExpressionDirective {
            label: None,
            source_url: Some(url.clone()),
        },
        _ => ExpressionDirective {
            label: str_field(value, "label").map(str::to_string),
            source_url: str_field(value, "source_url").map(str::to_string),
        },
    }
}

/// `"Size: R x C"` from `number_of_rows` / `number_of_columns`
pub(crate) fn size(characteristic: &Value) -> Option<String> {
    let characteristic = first(characteristic)?;
    let rows = count(characteristic.get("number_of_rows")?)?;
    let columns = count(characteristic.get("number_of_columns")?)?;
    Some(format!("Size: {rows} x {columns}"))
}

fn count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Executed software with up to two levels of `part_of`
pub(crate) fn executes(value: &Value, components: &[Component]) -> Option<ExecutesDirective> {
    let target = first(value)?;
    let url = str_field_any(target, &URL_FIELDS).map(str::to_string);
    // An unlabeled entry is named by its URL; with neither there is no subject.
    let label = label_of(target)
        .map(str::to_string)
        .or_else(|| url.clone())?;
    let popover = Popover::for_label(&label, components);

    let part_of = target.get("part_of").and_then(first);
    let top_part_of = part_of.and_then(|p| p.get("part_of")).and_then(first);

    Some(ExecutesDirective {
        url,
        label,
        popover,
        part_of: part_of.and_then(provenance),
        top_part_of: top_part_of.and_then(provenance),
    })
}

fn provenance(value: &Value) -> Option<Provenance> {
    let label = label_of(value)?;
    Some(Provenance {
        label: label.to_string(),
        url: str_field_any(value, &URL_FIELDS).map(str::to_string),
        version: str_field_any(value, &VERSION_FIELDS).map(str::to_string),
    })
}

/// Labeled links of a setup or level entry
pub(crate) fn links(value: Option<&Value>, components: &[Component]) -> Vec<LinkDirective> {
    let Some(value) = value else {
        return Vec::new();
    };

    as_list(value)
        .into_iter()
        .filter_map(|item| {
            let label = label_of(item)?.to_string();
            let url = match item {
                Value::Object(_) => str_field_any(item, &URL_FIELDS).map(str::to_string),
                _ => None,
            };
            let popover = Popover::for_label(&label, components);
            Some(LinkDirective {
                label,
                url,
                popover,
            })
        })
        .collect()
}

/// Classify one `is_implemented_by` entry
pub(crate) fn implementation(value: &Value) -> Option<ImplementationDirective> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(from_url_or_text(s, None)),
        Value::Object(_) => {
            let url = str_field_any(value, &["url", "source_url", "@id"]);
            let label = label_of(value).map(str::to_string);
            match (url, label) {
                (Some(url), label) => Some(from_url_or_text(url, label)),
                (None, Some(text)) => Some(ImplementationDirective::Text { text }),
                (None, None) => None,
            }
        }
        _ => None,
    }
}

fn from_url_or_text(s: &str, label: Option<String>) -> ImplementationDirective {
    if !looks_like_url(s) {
        return ImplementationDirective::Text {
            text: label.unwrap_or_else(|| s.to_string()),
        };
    }
    match SourceLanguage::from_url(s) {
        Some(language) => ImplementationDirective::SourceCode {
            url: s.to_string(),
            language,
        },
        None => ImplementationDirective::Link {
            label,
            url: s.to_string(),
        },
    }
}

fn looks_like_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}
