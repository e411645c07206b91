//! Label decorations built from matching components

use serde::Serialize;
use std::fmt::{self, Display, Formatter};
use stmt_model::{Component, LabeledRef};

/// Description shown when hovering a label that matches a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Popover(String);

impl Popover {
    /// Compose the description of a component
    ///
    /// Order: operation, properties (" of "), objects of interest (" of "),
    /// matrices (" in "), units (`[<label>]`). Each part other than units
    /// reads `<label> (<url>)`, with an empty pair of parentheses when the
    /// part has no URL. Returns `None` when the component has no parts.
    #[must_use]
    pub fn from_component(component: &Component) -> Option<Self> {
        let mut text = String::new();

        append(&mut text, "", &component.operation);
        append(&mut text, " of ", &component.properties);
        append(&mut text, " of ", &component.object_of_interests);
        append(&mut text, " in ", &component.matrices);

        let units: Vec<String> = component
            .units
            .iter()
            .filter(|u| !u.label.is_empty())
            .map(|u| format!("[{}]", u.label))
            .collect();
        if !units.is_empty() {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&units.join(" "));
        }

        (!text.is_empty()).then_some(Self(text))
    }

    /// Popover for a label, if a component matches it
    #[must_use]
    pub fn for_label(label: &str, components: &[Component]) -> Option<Self> {
        components
            .iter()
            .find(|c| c.matches(label))
            .and_then(Self::from_component)
    }

    /// Description text
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.0
    }
}

impl Display for Popover {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn append(text: &mut String, separator: &str, refs: &[LabeledRef]) {
    let parts: Vec<String> = refs
        .iter()
        .filter(|r| !r.label.is_empty())
        .map(|r| format!("{} ({})", r.label, r.url.as_deref().unwrap_or("")))
        .collect();
    if parts.is_empty() {
        return;
    }
    if !text.is_empty() {
        text.push_str(separator);
    }
    text.push_str(&parts.join(", "));
}
