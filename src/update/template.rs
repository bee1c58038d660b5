//! Placeholder template matching
//!
//! A template is literal text interleaved with `${name}` placeholders. Matching
//! looks for an assignment of non-empty substrings to the placeholders that
//! reproduces a target string exactly; repeated names must bind the same text.
//! The search is a deterministic backtracking scan that prefers the shortest
//! binding for the leftmost placeholder, so the answer for a given input is fixed.
//! Each placeholder must be followed by a literal anchor or the end of the
//! template; two placeholders back to back never match.

use crate::manifest::PLACEHOLDER_RE;
use std::collections::BTreeMap;

/// Placeholder assignment produced by a successful match
pub type Bindings = BTreeMap<String, String>;

/// Targets longer than this are never matched
const MAX_TARGET_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed placeholder template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Split text into literal and placeholder segments
    pub fn parse(text: &str) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;
        for caps in PLACEHOLDER_RE.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if whole.start() > last {
                segments.push(Segment::Literal(text[last..whole.start()].to_string()));
            }
            segments.push(Segment::Placeholder(caps[1].to_string()));
            last = whole.end();
        }
        if last < text.len() {
            segments.push(Segment::Literal(text[last..].to_string()));
        }
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Distinct placeholder names in order of appearance
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Returns true if the template has no placeholder left
    pub fn is_literal(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }

    /// Replace every use of `name` with a fixed value
    pub fn substitute(&self, name: &str, value: &str) -> Template {
        let segments = self
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Placeholder(n) if n == name => Segment::Literal(value.to_string()),
                other => other.clone(),
            })
            .collect();
        Template { segments }
    }

    /// Render with the given values; unknown placeholders are written back as `${name}`
    pub fn render(&self, values: &Bindings) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.clone(),
                Segment::Placeholder(name) => values
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| format!("${{{}}}", name)),
            })
            .collect()
    }

    /// Returns true if two placeholders follow each other with no literal between
    pub fn has_adjacent_placeholders(&self) -> bool {
        self.segments.windows(2).any(|pair| {
            matches!(
                pair,
                [Segment::Placeholder(_), Segment::Placeholder(_)]
            )
        })
    }

    /// Find placeholder values reproducing `target`, or `None` when impossible
    pub fn matches(&self, target: &str) -> Option<Bindings> {
        if target.len() > MAX_TARGET_LEN || self.has_adjacent_placeholders() {
            return None;
        }
        let mut bindings = Bindings::new();
        match_from(&self.segments, target, 0, &mut bindings).then_some(bindings)
    }
}

fn match_from(segments: &[Segment], target: &str, pos: usize, bindings: &mut Bindings) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        return pos == target.len();
    };
    let remaining = &target[pos..];
    match first {
        Segment::Literal(literal) => {
            remaining.starts_with(literal.as_str())
                && match_from(rest, target, pos + literal.len(), bindings)
        }
        Segment::Placeholder(name) => {
            if let Some(bound) = bindings.get(name).cloned() {
                return remaining.starts_with(bound.as_str())
                    && match_from(rest, target, pos + bound.len(), bindings);
            }
            let anchor = match rest.first() {
                Some(Segment::Literal(literal)) => Some(literal.as_str()),
                _ => None,
            };
            for (offset, ch) in remaining.char_indices() {
                let end = pos + offset + ch.len_utf8();
                if anchor.is_some_and(|literal| !target[end..].starts_with(literal)) {
                    continue;
                }
                bindings.insert(name.clone(), target[pos..end].to_string());
                if match_from(rest, target, end, bindings) {
                    return true;
                }
                bindings.remove(name);
            }
            false
        }
    }
}

/// Match a template string against a target string
pub fn match_template(template: &str, target: &str) -> Option<Bindings> {
    Template::parse(template).matches(target)
}
