//! Compiled route templates
//!
//! A [`Template`] is the compiled form of a path pattern. The same segment
//! tree drives both directions: matching a request path and expanding
//! arguments back into a path.

use super::compiler;
use super::generator::{self, Expansion};
use super::matcher;
use super::params::{Args, Params};
use crate::errors::{RoutingError, RoutingResult};
use regex::Regex;

/// Value constraints for captures and splats
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Must be a valid integer
    Int,
    /// Must be a valid UUID
    Uuid,
    /// Must contain only alphabetic characters
    Alpha,
    /// Must be a valid slug (alphanumeric + hyphens/underscores)
    Slug,
    /// Custom regex, anchored against the whole captured value
    Pattern(Regex),
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Constraint::Int, Constraint::Int) => true,
            (Constraint::Uuid, Constraint::Uuid) => true,
            (Constraint::Alpha, Constraint::Alpha) => true,
            (Constraint::Slug, Constraint::Slug) => true,
            (Constraint::Pattern(a), Constraint::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl Constraint {
    /// Parse a constraint: `int`, `uuid`, `alpha`, `slug` or a regular expression
    pub fn parse(source: &str) -> Result<Self, regex::Error> {
        match source {
            "int" => Ok(Constraint::Int),
            "uuid" => Ok(Constraint::Uuid),
            "alpha" => Ok(Constraint::Alpha),
            "slug" => Ok(Constraint::Slug),
            _ => Regex::new(&format!("^(?:{})$", source)).map(Constraint::Pattern),
        }
    }

    /// Validate a captured value against this constraint
    pub fn validate(&self, value: &str) -> bool {
        match self {
            Constraint::Int => value.parse::<i64>().is_ok(),
            Constraint::Uuid => uuid::Uuid::parse_str(value).is_ok(),
            Constraint::Alpha => !value.is_empty() && value.chars().all(|c| c.is_alphabetic()),
            Constraint::Slug => {
                !value.is_empty()
                    && value.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
            }
            Constraint::Pattern(regex) => regex.is_match(value),
        }
    }
}

/// A node of a compiled template
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Exact text, `/` separators included
    Literal(String),
    /// One path component, no `/`
    Capture {
        name: String,
        constraint: Option<Constraint>,
    },
    /// The remainder of the path, `/` included
    Splat {
        name: String,
        constraint: Option<Constraint>,
    },
    /// A subsequence that may be absent as a whole
    Optional(Vec<Segment>),
}

impl Segment {
    /// Name bound by a capture or splat
    pub fn name(&self) -> Option<&str> {
        match self {
            Segment::Capture { name, .. } | Segment::Splat { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }
}

/// Parsed route template with compiled segments
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
    names: Vec<String>,
}

impl Template {
    /// Compile a template without constraints
    pub fn parse(source: &str) -> RoutingResult<Self> {
        compiler::compile(source, &[])
    }

    /// Compile a template, attaching `(name, constraint)` pairs to its captures
    pub fn with_constraints(source: &str, constraints: &[(String, String)]) -> RoutingResult<Self> {
        compiler::compile(source, constraints)
    }

    pub(crate) fn from_parts(source: String, segments: Vec<Segment>, names: Vec<String>) -> Self {
        Self {
            source,
            segments,
            names,
        }
    }

    /// The template string this was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Every capture and splat name, in declaration order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether the template contains no captures, splats or optional parts
    pub fn is_static(&self) -> bool {
        self.segments.iter().all(|s| matches!(s, Segment::Literal(_)))
    }

    /// Check if the whole path matches
    pub fn matches(&self, path: &str) -> bool {
        matcher::match_path(self, path).is_some()
    }

    /// Match the whole path, returning every declared name
    pub fn match_path(&self, path: &str) -> Option<Params> {
        matcher::match_path(self, path)
    }

    /// Match a prefix of the path
    pub fn peek<'p>(&self, path: &'p str) -> Option<(&'p str, Params)> {
        matcher::peek(self, path)
    }

    /// Expand arguments into a path, returning the arguments it did not use
    pub fn expand(&self, args: &Args) -> RoutingResult<Expansion> {
        generator::expand(self, args)
    }

    /// Expand arguments into a path with unused arguments as a query string
    pub fn expand_with_query(&self, args: &Args) -> RoutingResult<String> {
        generator::expand(self, args).map(Expansion::into_url)
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Template {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Template::parse(s)
    }
}
