// SPDX-FileCopyrightText: [2023] Serokell <hi@serokell.io>
//
// SPDX-License-Identifier: MIT

//! Micheline annotations: `%field`, `:type` and `@variable`.

use super::Micheline;

/// A single annotation. The stored name excludes the sigil.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Annotation {
    /// One of the special annotations `@%`, `@%%` and `%@`, stored verbatim.
    Special(String),
    /// `%field`
    Field(String),
    /// `@var`
    Variable(String),
    /// `:type`
    Type(String),
}

/// Error returned when a string is not a well-formed annotation.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("malformed annotation: {0:?}")]
pub struct AnnotationError(pub String);

/// Remove a leading `%`, `:` or `@` sigil, if any.
pub fn strip_sigil(annotation: &str) -> &str {
    annotation
        .strip_prefix(&['%', ':', '@'][..])
        .unwrap_or(annotation)
}

/// The name of the first `%` annotation on an application node, with the
/// sigil removed. Other kinds of annotations and non-application nodes
/// yield `None`.
pub fn first_field_annotation(node: &Micheline) -> Option<&str> {
    match node {
        Micheline::App(_, _, anns) => anns.field(),
        _ => None,
    }
}

fn is_ann_char(c: u8) -> bool {
    matches!(c, b'_' | b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z')
}

impl Annotation {
    /// Parse an annotation from its textual form, sigil included.
    ///
    /// Accepts `@%|@%%|%@|[@:%]([_0-9a-zA-Z][_0-9a-zA-Z\.%@]*)?`. A lone sigil
    /// is an empty annotation of that kind.
    pub fn parse(s: &str) -> Result<Self, AnnotationError> {
        let err = || AnnotationError(s.to_owned());
        if matches!(s, "@%" | "@%%" | "%@") {
            return Ok(Annotation::Special(s.to_owned()));
        }
        let (sigil, rest) = match s.as_bytes() {
            [sigil @ (b'@' | b':' | b'%'), rest @ ..] => (*sigil, rest),
            _ => return Err(err()),
        };
        match rest {
            [] => {}
            [first, tail @ ..]
                if is_ann_char(*first)
                    && tail
                        .iter()
                        .all(|c| is_ann_char(*c) || matches!(c, b'.' | b'%' | b'@')) => {}
            _ => return Err(err()),
        }
        let name = s[1..].to_owned();
        Ok(match sigil {
            b'%' => Annotation::Field(name),
            b':' => Annotation::Type(name),
            _ => Annotation::Variable(name),
        })
    }

    /// The annotation name without its sigil.
    pub fn name(&self) -> &str {
        match self {
            Annotation::Special(s) => s,
            Annotation::Field(s) | Annotation::Variable(s) | Annotation::Type(s) => s,
        }
    }

    /// The leading sigil: `%`, `:` or `@`. Special annotations count as the
    /// kind of their first character.
    pub fn sigil(&self) -> char {
        match self {
            Annotation::Special(s) if s.starts_with('%') => '%',
            Annotation::Special(_) | Annotation::Variable(_) => '@',
            Annotation::Field(_) => '%',
            Annotation::Type(_) => ':',
        }
    }

    /// Whether two annotations share a sigil.
    pub fn same_kind(&self, other: &Annotation) -> bool {
        self.sigil() == other.sigil()
    }
}

impl std::fmt::Display for Annotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Annotation::Special(s) => f.write_str(s),
            Annotation::Field(s) => write!(f, "%{s}"),
            Annotation::Variable(s) => write!(f, "@{s}"),
            Annotation::Type(s) => write!(f, ":{s}"),
        }
    }
}

/// The ordered annotations of an application node.
#[derive(Clone, Eq, PartialEq, Hash, Default)]
pub struct Annotations(Vec<Annotation>);

impl std::fmt::Debug for Annotations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Annotations {
    /// An empty set of annotations.
    pub const fn new() -> Self {
        Annotations(Vec::new())
    }

    /// Whether there are no annotations.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over annotations in order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.0.iter()
    }

    /// Name of the first field annotation, if any.
    pub fn field(&self) -> Option<&str> {
        self.0.iter().find_map(|ann| match ann {
            Annotation::Field(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

impl<T> From<T> for Annotations
where
    T: AsRef<[Annotation]>,
{
    fn from(x: T) -> Self {
        Annotations(Vec::from(x.as_ref()))
    }
}

impl FromIterator<Annotation> for Annotations {
    fn from_iter<T: IntoIterator<Item = Annotation>>(iter: T) -> Self {
        Annotations(Vec::from_iter(iter))
    }
}
