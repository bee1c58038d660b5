//! Version specifier types
//!
//! A requirement is either a concrete version (`1.2.3`, a soft requirement that
//! may be overridden) or a range made of one or more intervals:
//! - `[1.0,2.0]`, `[1.0,2.0)`, `(1.0,2.0)` bounded intervals
//! - `[1.0,)`, `(,2.0]` intervals with an unbounded side
//! - `[1.5]` exactly one version
//! - `(,1.0],[1.2,)` unions of intervals

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// One end of an interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bound {
    /// Version text of the bound
    pub version: String,
    /// Whether the bound itself is accepted
    pub inclusive: bool,
}

/// A single interval; `None` on either side means unbounded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Lower bound
    pub lower: Option<Bound>,
    /// Upper bound
    pub upper: Option<Bound>,
}

impl Interval {
    /// Returns true if `version` lies inside this interval
    pub fn contains(&self, version: &str, cmp: &dyn Fn(&str, &str) -> Ordering) -> bool {
        let above_lower = match &self.lower {
            None => true,
            Some(bound) => match cmp(version, &bound.version) {
                Ordering::Greater => true,
                Ordering::Equal => bound.inclusive,
                Ordering::Less => false,
            },
        };
        let below_upper = match &self.upper {
            None => true,
            Some(bound) => match cmp(version, &bound.version) {
                Ordering::Less => true,
                Ordering::Equal => bound.inclusive,
                Ordering::Greater => false,
            },
        };
        above_lower && below_upper
    }
}

/// A version range with its original text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRange {
    /// The range text as declared
    pub raw: String,
    /// Parsed intervals in declaration order
    pub intervals: Vec<Interval>,
}

impl VersionRange {
    /// Parse range syntax; returns an error message when the text is not a range
    pub fn parse(raw: &str) -> Result<Self, String> {
        let text = raw.trim();
        let mut intervals = Vec::new();
        let mut rest = text;

        loop {
            rest = rest.trim_start();
            let open = rest
                .chars()
                .next()
                .ok_or_else(|| format!("empty range '{}'", raw))?;
            if open != '[' && open != '(' {
                return Err(format!("expected '[' or '(' in range '{}'", raw));
            }
            let close_at = rest
                .find([']', ')'])
                .ok_or_else(|| format!("unterminated interval in range '{}'", raw))?;
            let close = rest[close_at..].chars().next().unwrap_or(')');
            let inner = &rest[1..close_at];
            intervals.push(Self::parse_interval(inner, open == '[', close == ']', raw)?);

            rest = rest[close_at + 1..].trim_start();
            if rest.is_empty() {
                break;
            }
            rest = rest
                .strip_prefix(',')
                .ok_or_else(|| format!("expected ',' between intervals in range '{}'", raw))?;
        }

        Ok(Self {
            raw: raw.to_string(),
            intervals,
        })
    }

    fn parse_interval(
        inner: &str,
        lower_inclusive: bool,
        upper_inclusive: bool,
        raw: &str,
    ) -> Result<Interval, String> {
        let bound = |text: &str, inclusive: bool| {
            let text = text.trim();
            (!text.is_empty()).then(|| Bound {
                version: text.to_string(),
                inclusive,
            })
        };

        match inner.split_once(',') {
            None => {
                // `[1.5]` accepts exactly one version
                let version = inner.trim();
                if version.is_empty() || !lower_inclusive || !upper_inclusive {
                    return Err(format!("invalid single-version interval in '{}'", raw));
                }
                Ok(Interval {
                    lower: bound(version, true),
                    upper: bound(version, true),
                })
            }
            Some((lo, hi)) => {
                if hi.contains(',') {
                    return Err(format!("too many bounds in interval of '{}'", raw));
                }
                Ok(Interval {
                    lower: bound(lo, lower_inclusive),
                    upper: bound(hi, upper_inclusive),
                })
            }
        }
    }

    /// Returns true if any interval accepts `version`
    pub fn contains(&self, version: &str, cmp: &dyn Fn(&str, &str) -> Ordering) -> bool {
        self.intervals.iter().any(|i| i.contains(version, cmp))
    }

    /// Lowest finite bound mentioned by the range (lower bounds first)
    pub fn lowest_bound(&self, cmp: &dyn Fn(&str, &str) -> Ordering) -> Option<&str> {
        let lowers = self
            .intervals
            .iter()
            .filter_map(|i| i.lower.as_ref().map(|b| b.version.as_str()));
        let found = lowers.min_by(|a, b| cmp(a, b));
        found.or_else(|| {
            self.intervals
                .iter()
                .filter_map(|i| i.upper.as_ref().map(|b| b.version.as_str()))
                .min_by(|a, b| cmp(a, b))
        })
    }
}

/// Syntactic form of a required version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum VersionSpecifier {
    /// A single version, accepted with override
    Concrete(String),
    /// One or more intervals
    Range(VersionRange),
}

impl VersionSpecifier {
    /// Parse requirement text; bracketed text must be a valid range
    pub fn parse(text: &str) -> Result<Self, String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err("empty version requirement".to_string());
        }
        if trimmed.starts_with('[') || trimmed.starts_with('(') {
            return VersionRange::parse(trimmed).map(VersionSpecifier::Range);
        }
        Ok(VersionSpecifier::Concrete(trimmed.to_string()))
    }

    /// Returns the requirement text
    pub fn as_str(&self) -> &str {
        match self {
            VersionSpecifier::Concrete(v) => v,
            VersionSpecifier::Range(r) => &r.raw,
        }
    }

    /// Returns true for range specifiers
    pub fn is_range(&self) -> bool {
        matches!(self, VersionSpecifier::Range(_))
    }
}

impl fmt::Display for VersionSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
