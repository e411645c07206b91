//! Plain-text rendering of directives, used by terminal front-ends

use crate::directive::{
    ImplementationDirective, IoGroupDirective, LinkDirective, RenderDirective,
};
use std::fmt::{self, Display, Formatter, Write};

impl Display for RenderDirective {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(label) => {
                write!(f, "{}", label.text)?;
                if let Some(popover) = &label.popover {
                    write!(f, "  ({popover})")?;
                }
                Ok(())
            }
            Self::InputGroup(group) => write_group(f, "Inputs", group),
            Self::OutputGroup(group) => write_group(f, "Outputs", group),
            Self::Executes(executes) => {
                write!(f, "{}", executes.text())?;
                if let Some(url) = &executes.url {
                    write!(f, " <{url}>")?;
                }
                Ok(())
            }
            Self::Evaluates(setup) => {
                write!(f, "Evaluates {}", join_links(&setup.evaluates))?;
                if !setup.evaluates_for.is_empty() {
                    write!(f, " for {}", join_links(&setup.evaluates_for))?;
                }
                Ok(())
            }
            Self::Level(level) => {
                write!(f, "Level {}", join_links(&level.level))?;
                if !level.targets.is_empty() {
                    write!(f, " targeting {}", join_links(&level.targets))?;
                }
                Ok(())
            }
            Self::Implementation(implementation) => match implementation {
                ImplementationDirective::SourceCode { url, language } => {
                    write!(f, "Implementation ({}): {url}", language.name())
                }
                ImplementationDirective::Link { label: Some(label), url } => {
                    write!(f, "Implementation: {label} <{url}>")
                }
                ImplementationDirective::Link { label: None, url } => {
                    write!(f, "Implementation: <{url}>")
                }
                ImplementationDirective::Text { text } => write!(f, "Implementation: {text}"),
            },
        }
    }
}

fn write_group(f: &mut Formatter<'_>, title: &str, group: &IoGroupDirective) -> fmt::Result {
    write!(f, "{title}:")?;
    for item in &group.items {
        write!(f, "\n  - {}", item.label.as_deref().unwrap_or("(unlabeled)"))?;
        if let Some(size) = &item.size {
            write!(f, " [{size}]")?;
        }
        if let Some(url) = &item.source_url {
            write!(f, " <{url}>")?;
        }
        if let Some(comment) = &item.comment {
            write!(f, "\n    {comment}")?;
        }
        for expression in &item.has_expressions {
            if let Some(url) = &expression.source_url {
                write!(f, "\n    figure: {url}")?;
            }
        }
    }
    Ok(())
}

fn join_links(links: &[LinkDirective]) -> String {
    let mut out = String::new();
    for (i, link) in links.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&link.label);
        if let Some(url) = &link.url {
            let _ = write!(out, " <{url}>");
        }
    }
    out
}

/// Render a directive list, one directive per paragraph
#[must_use]
pub fn render_text(directives: &[RenderDirective]) -> String {
    directives
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
