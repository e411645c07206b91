//! Known schema properties
//!
//! Provides [`Property`], the closed set of property names the renderer
//! understands, with an explicit [`Property::Unrecognized`] catch-all.

use std::fmt::{self, Display, Formatter};

/// Declared schema property
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Property {
    /// `label`
    Label,
    /// `has_input`
    HasInput,
    /// `has_output`
    HasOutput,
    /// `executes`
    Executes,
    /// `evaluates`
    Evaluates,
    /// `evaluates_for`
    EvaluatesFor,
    /// `level`
    Level,
    /// `targets`
    Targets,
    /// Any other name; produces no directive
    Unrecognized(String),
}

/// Synonym pairs rendered as a single directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyPair {
    /// `evaluates` / `evaluates_for`
    Setup,
    /// `level` / `targets`
    Level,
}

impl Property {
    /// Classify a declared property name
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "label" => Self::Label,
            "has_input" => Self::HasInput,
            "has_output" => Self::HasOutput,
            "executes" => Self::Executes,
            "evaluates" => Self::Evaluates,
            "evaluates_for" => Self::EvaluatesFor,
            "level" => Self::Level,
            "targets" => Self::Targets,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Property name as declared in schemas
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Label => "label",
            Self::HasInput => "has_input",
            Self::HasOutput => "has_output",
            Self::Executes => "executes",
            Self::Evaluates => "evaluates",
            Self::EvaluatesFor => "evaluates_for",
            Self::Level => "level",
            Self::Targets => "targets",
            Self::Unrecognized(name) => name,
        }
    }

    /// Synonym pair this property belongs to
    #[inline]
    #[must_use]
    pub fn pair(&self) -> Option<PropertyPair> {
        match self {
            Self::Evaluates | Self::EvaluatesFor => Some(PropertyPair::Setup),
            Self::Level | Self::Targets => Some(PropertyPair::Level),
            _ => None,
        }
    }

    /// Whether the renderer knows this property
    #[inline]
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl PropertyPair {
    /// Both member names, canonical first
    #[must_use]
    pub fn members(self) -> [&'static str; 2] {
        match self {
            Self::Setup => ["evaluates", "evaluates_for"],
            Self::Level => ["level", "targets"],
        }
    }
}

impl From<&str> for Property {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl Display for Property {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
