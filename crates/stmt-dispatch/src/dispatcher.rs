//! Property dispatcher
//!
//! Walks a record's declared properties in schema order and emits one
//! directive per recognized property.
//!
//! # Rules
//! - `label` → [`LabelDirective`] when the label is non-empty
//! - `has_input` / `has_output` → one group with an item per element, empty
//!   when the record carries no value
//! - `executes` → [`ExecutesDirective`] when a first entry exists
//! - `evaluates` / `evaluates_for` → one [`EvaluatesDirective`] per record
//! - `level` / `targets` → one [`LevelDirective`] per record
//! - anything else → nothing
//!
//! `is_implemented_by` entries are appended after the property walk.

use crate::directive::{
    EvaluatesDirective, IoGroupDirective, LabelDirective, LevelDirective, RenderDirective,
};
use crate::error::DispatchError;
use crate::extract;
use crate::popover::Popover;
use crate::property::{Property, PropertyPair};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::HashSet;
use stmt_model::value::label_of;
use stmt_model::DataTypeRecord;

/// Directives of one record, or the reason it was skipped
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOutcome {
    /// Record dispatched
    Rendered {
        index: usize,
        label: Option<String>,
        directives: Vec<RenderDirective>,
    },
    /// Record skipped
    Skipped(#[serde(serialize_with = "display")] DispatchError),
}

fn display<S: Serializer>(err: &DispatchError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(err)
}

impl RecordOutcome {
    /// Directives, empty for skipped records
    #[must_use]
    pub fn directives(&self) -> &[RenderDirective] {
        match self {
            Self::Rendered { directives, .. } => directives,
            Self::Skipped(_) => &[],
        }
    }

    /// Whether the record was skipped
    #[inline]
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// Maps declared properties to rendering directives
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyDispatcher;

impl PropertyDispatcher {
    /// Create dispatcher
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Directives for one record
    #[must_use]
    pub fn dispatch(&self, record: &DataTypeRecord) -> Vec<RenderDirective> {
        let mut directives = Vec::new();
        let mut emitted_pairs: HashSet<PropertyPair> = HashSet::new();

        for name in &record.type_info.properties {
            let property = Property::parse(name);

            if let Some(pair) = property.pair() {
                if !emitted_pairs.insert(pair) {
                    continue;
                }
            }

            match self.directive_for(&property, record) {
                Some(directive) => directives.push(directive),
                None if !property.is_recognized() => {
                    tracing::trace!(property = %property, "no renderer for property");
                }
                None => {}
            }
        }

        directives.extend(
            record
                .is_implemented_by
                .iter()
                .filter_map(extract::implementation)
                .map(RenderDirective::Implementation),
        );

        directives
    }

    /// Parse and dispatch every record of a statement
    ///
    /// Malformed records are skipped with a warning; their siblings are
    /// still dispatched.
    #[must_use]
    pub fn dispatch_all(&self, records: &[Value]) -> Vec<RecordOutcome> {
        records
            .iter()
            .enumerate()
            .map(|(index, value)| match DataTypeRecord::from_value(value) {
                Ok(record) => RecordOutcome::Rendered {
                    index,
                    label: record.label().map(str::to_string),
                    directives: self.dispatch(&record),
                },
                Err(source) => {
                    let err = DispatchError::malformed(index, source);
                    tracing::warn!(error = %err, "skipping data type record");
                    RecordOutcome::Skipped(err)
                }
            })
            .collect()
    }

    fn directive_for(
        &self,
        property: &Property,
        record: &DataTypeRecord,
    ) -> Option<RenderDirective> {
        let has_part = &record.has_part;
        let components = record.components.as_slice();

        match property {
            Property::Label => {
                let text = has_part.get("label").and_then(label_of)?;
                Some(RenderDirective::Label(LabelDirective {
                    text: text.to_string(),
                    popover: Popover::for_label(text, components),
                }))
            }
            Property::HasInput => Some(RenderDirective::InputGroup(io_group(
                has_part.get("has_input"),
                components,
            ))),
            Property::HasOutput => Some(RenderDirective::OutputGroup(io_group(
                has_part.get("has_output"),
                components,
            ))),
            Property::Executes => has_part
                .get("executes")
                .and_then(|v| extract::executes(v, components))
                .map(RenderDirective::Executes),
            Property::Evaluates | Property::EvaluatesFor => {
                Some(RenderDirective::Evaluates(EvaluatesDirective {
                    evaluates: extract::links(has_part.get("evaluates"), components),
                    evaluates_for: extract::links(has_part.get("evaluates_for"), components),
                }))
            }
            Property::Level | Property::Targets => Some(RenderDirective::Level(LevelDirective {
                level: extract::links(has_part.get("level"), components),
                targets: extract::links(has_part.get("targets"), components),
            })),
            Property::Unrecognized(_) => None,
        }
    }
}

fn io_group(value: Option<&Value>, components: &[stmt_model::Component]) -> IoGroupDirective {
    IoGroupDirective {
        items: value
            .map(stmt_model::value::as_list)
            .unwrap_or_default()
            .into_iter()
            .map(|item| extract::io_item(item, components))
            .collect(),
    }
}
