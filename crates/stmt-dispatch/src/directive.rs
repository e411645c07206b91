//! Rendering directives
//!
//! Presentation-neutral instructions emitted for one data type record. A
//! front-end walks the list and draws each directive however it likes.

use crate::popover::Popover;
use serde::Serialize;
use serde_json::Value;

/// One rendering instruction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderDirective {
    /// Step title
    Label(LabelDirective),
    /// Inputs panel
    InputGroup(IoGroupDirective),
    /// Outputs panel
    OutputGroup(IoGroupDirective),
    /// Executed software and its provenance
    Executes(ExecutesDirective),
    /// Evaluation setup (`evaluates` + `evaluates_for`)
    Evaluates(EvaluatesDirective),
    /// Level and targets (`level` + `targets`)
    Level(LevelDirective),
    /// One `is_implemented_by` entry
    Implementation(ImplementationDirective),
}

impl RenderDirective {
    /// Short name of the directive kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Label(_) => "label",
            Self::InputGroup(_) => "input_group",
            Self::OutputGroup(_) => "output_group",
            Self::Executes(_) => "executes",
            Self::Evaluates(_) => "evaluates",
            Self::Level(_) => "level",
            Self::Implementation(_) => "implementation",
        }
    }
}

/// Step title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelDirective {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popover: Option<Popover>,
}

/// Inputs or outputs of a step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IoGroupDirective {
    pub items: Vec<IoItemDirective>,
}

/// One input or output
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IoItemDirective {
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popover: Option<Popover>,
    pub source_url: Option<String>,
    /// Tabular data, rendered as a table
    pub source_table: Option<Value>,
    /// Images or expressions attached to the item
    pub has_expressions: Vec<ExpressionDirective>,
    pub comment: Option<String>,
    /// `"Size: R x C"`
    pub size: Option<String>,
}

/// Image or expression attached to an input or output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpressionDirective {
    pub label: Option<String>,
    pub source_url: Option<String>,
}

/// Container of executed software, with version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Provenance {
    pub label: String,
    pub url: Option<String>,
    pub version: Option<String>,
}

impl Provenance {
    /// `"<label> (<version>)"`, or the bare label without a version
    #[must_use]
    pub fn display_label(&self) -> String {
        match &self.version {
            Some(version) => format!("{} ({version})", self.label),
            None => self.label.clone(),
        }
    }
}

/// Executed software
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutesDirective {
    pub label: String,
    /// Support URL of the executed function
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popover: Option<Popover>,
    /// Immediate container (e.g. a package)
    pub part_of: Option<Provenance>,
    /// Container of the container (e.g. a language runtime)
    pub top_part_of: Option<Provenance>,
}

impl ExecutesDirective {
    /// `"Executes <label> of <part_of> (<version>) in <top> (<version>)"`
    ///
    /// Segments whose container is absent are left out.
    #[must_use]
    pub fn text(&self) -> String {
        let mut text = format!("Executes {}", self.label);
        if let Some(part_of) = &self.part_of {
            text.push_str(" of ");
            text.push_str(&part_of.display_label());
            if let Some(top) = &self.top_part_of {
                text.push_str(" in ");
                text.push_str(&top.display_label());
            }
        }
        text
    }
}

/// Labeled link inside a setup or level block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkDirective {
    pub label: String,
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popover: Option<Popover>,
}

/// Evaluation setup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvaluatesDirective {
    pub evaluates: Vec<LinkDirective>,
    pub evaluates_for: Vec<LinkDirective>,
}

/// Level and targets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LevelDirective {
    pub level: Vec<LinkDirective>,
    pub targets: Vec<LinkDirective>,
}

/// Language of a recognized source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLanguage {
    Python,
    R,
}

impl SourceLanguage {
    /// Detect from a URL's file extension (`.py`, `.r`), ignoring case,
    /// query string and fragment
    #[must_use]
    pub fn from_url(url: &str) -> Option<Self> {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let file = path.rsplit('/').next().unwrap_or(path);
        let (_, ext) = file.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "py" => Some(Self::Python),
            "r" => Some(Self::R),
            _ => None,
        }
    }

    /// Lower-case name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::R => "r",
        }
    }
}

/// One implementation of a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum ImplementationDirective {
    /// Source file fetched lazily when the panel is expanded
    SourceCode {
        url: String,
        language: SourceLanguage,
    },
    /// Plain link
    Link { label: Option<String>, url: String },
    /// Plain text
    Text { text: String },
}

impl ImplementationDirective {
    /// URL to fetch when the panel is expanded, for source files only
    #[must_use]
    pub fn lazy_url(&self) -> Option<&str> {
        match self {
            Self::SourceCode { url, .. } => Some(url),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provenance(label: &str, version: Option<&str>) -> Provenance {
        Provenance {
            label: label.to_string(),
            url: None,
            version: version.map(str::to_string),
        }
    }

    #[test]
    fn executes_full_chain() {
        let directive = ExecutesDirective {
            label: "ttest_ind".to_string(),
            part_of: Some(provenance("scipy.stats", Some("1.11"))),
            top_part_of: Some(provenance("Python", Some("3.11"))),
            ..ExecutesDirective::default()
        };
        assert_eq!(
            directive.text(),
            "Executes ttest_ind of scipy.stats (1.11) in Python (3.11)"
        );
    }

    #[test]
    fn executes_partial_chain() {
        let mut directive = ExecutesDirective {
            label: "lm".to_string(),
            part_of: Some(provenance("stats", None)),
            ..ExecutesDirective::default()
        };
        assert_eq!(directive.text(), "Executes lm of stats");

        directive.part_of = None;
        directive.top_part_of = Some(provenance("R", Some("4.3")));
        assert_eq!(directive.text(), "Executes lm");
    }

    #[test]
    fn source_language_detection() {
        assert_eq!(
            SourceLanguage::from_url("https://x.org/a/analysis.PY?raw=1"),
            Some(SourceLanguage::Python)
        );
        assert_eq!(
            SourceLanguage::from_url("https://x.org/model.r#L10"),
            Some(SourceLanguage::R)
        );
        assert_eq!(SourceLanguage::from_url("https://x.org/notebook.ipynb"), None);
        assert_eq!(SourceLanguage::from_url("https://x.org/readme"), None);
    }

    #[test]
    fn directive_serialization_is_tagged() {
        let directive = RenderDirective::Label(LabelDirective {
            text: "Fit".to_string(),
            popover: None,
        });
        assert_eq!(
            serde_json::to_value(&directive).unwrap(),
            json!({ "kind": "label", "text": "Fit" })
        );
    }
}
