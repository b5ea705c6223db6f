//! Upstream path template compilation and matching.
//!
//! # Responsibilities
//! - Compile a path template + optional host + case flag into a matcher
//! - Match host (exact, case-insensitive) and path against the template
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Host matching is case-insensitive (per HTTP spec)
//! - Path matching honors the per-route case_sensitive flag
//! - Templates are split into literal and `{placeholder}` segments
//! - No regex to guarantee O(n) matching

use serde::Serialize;

/// Trait for compiling an upstream path template into a matchable pattern.
///
/// Injected into the resolution stage so tests can substitute a double and
/// so the compilation strategy can evolve independently of resolution.
pub trait PatternCompiler: Send + Sync {
    /// Compile the given template. Pure function of its three inputs.
    fn compile(&self, template: &str, host: Option<&str>, case_sensitive: bool) -> CompiledPattern;
}

/// One segment of a parsed path template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Segment {
    /// Must match the request segment exactly (subject to the case flag).
    Literal(String),
    /// Matches any single non-empty request segment.
    Placeholder(String),
}

/// Compiled representation of a path template, host constraint and
/// case-sensitivity rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledPattern {
    template: String,
    /// Lowercased at compile time; host comparison is case-insensitive.
    host: Option<String>,
    case_sensitive: bool,
    segments: Vec<Segment>,
}

impl CompiledPattern {
    /// The original template string this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Returns true if the request path and host satisfy this pattern.
    ///
    /// All conditions combine with AND: an absent host constraint matches
    /// any host; a present one requires the request host to be supplied
    /// and equal (case-insensitively).
    pub fn is_match(&self, path: &str, host: Option<&str>) -> bool {
        if let Some(expected) = &self.host {
            match host {
                Some(h) if h.to_lowercase() == *expected => {}
                _ => return false,
            }
        }

        let request_segments: Vec<&str> = split_path(path);
        if request_segments.len() != self.segments.len() {
            return false;
        }

        self.segments
            .iter()
            .zip(request_segments)
            .all(|(segment, actual)| match segment {
                Segment::Placeholder(_) => !actual.is_empty(),
                Segment::Literal(expected) => {
                    if self.case_sensitive {
                        expected == actual
                    } else {
                        expected.eq_ignore_ascii_case(actual)
                    }
                }
            })
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect()
}

/// Default production compiler.
#[derive(Debug, Default)]
pub struct TemplateCompiler;

impl PatternCompiler for TemplateCompiler {
    fn compile(&self, template: &str, host: Option<&str>, case_sensitive: bool) -> CompiledPattern {
        let segments = split_path(template)
            .into_iter()
            .map(|raw| {
                if let Some(name) = raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Segment::Placeholder(name.to_string())
                } else {
                    Segment::Literal(raw.to_string())
                }
            })
            .collect();

        CompiledPattern {
            template: template.to_string(),
            host: host.map(|h| h.to_lowercase()),
            case_sensitive,
            segments,
        }
    }
}
