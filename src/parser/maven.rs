//! Maven version ordering
//!
//! Implements the `ComparableVersion` rules Maven uses to order artifact versions:
//! - Versions split into items on `.`, `-` and digit/letter transitions
//! - `-` and transitions open a nested list, so `1-1` sorts before `1.1`
//! - Numbers compare numerically at any length
//! - Qualifiers order `alpha < beta < milestone < rc < snapshot < "" < sp`,
//!   unknown qualifiers sort after `sp` lexically
//! - Trailing null items are dropped, so `1.0 == 1.0.0 == 1-ga`

use crate::domain::Ecosystem;
use crate::parser::VersionScheme;
use std::cmp::Ordering;

/// Scheme for Maven artifact versions
pub struct MavenVersionScheme;

/// Known qualifiers in ascending order; the empty string is a plain release
const QUALIFIERS: [&str; 7] = ["alpha", "beta", "milestone", "rc", "snapshot", "", "sp"];

/// Ordering key of the release qualifier
const RELEASE_INDEX: &str = "5";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    /// Digits with leading zeros removed (`"0"` for zero)
    Int(String),
    /// Lowercased qualifier after alias expansion
    Str(String),
    List(Vec<Item>),
}

impl Item {
    fn int(digits: &str) -> Item {
        let stripped = digits.trim_start_matches('0');
        Item::Int(if stripped.is_empty() {
            "0".to_string()
        } else {
            stripped.to_string()
        })
    }

    fn string(value: &str, followed_by_digit: bool) -> Item {
        let value = if followed_by_digit && value.len() == 1 {
            match value {
                "a" => "alpha",
                "b" => "beta",
                "m" => "milestone",
                other => other,
            }
        } else {
            value
        };
        let value = match value {
            "ga" | "final" | "release" => "",
            "cr" => "rc",
            other => other,
        };
        Item::Str(value.to_string())
    }

    fn is_null(&self) -> bool {
        match self {
            Item::Int(v) => v == "0",
            Item::Str(v) => v.is_empty(),
            Item::List(items) => items.is_empty(),
        }
    }

    /// Compare against another item, where `None` stands for padding
    fn compare(&self, other: Option<&Item>) -> Ordering {
        match (self, other) {
            (Item::Int(v), None) => {
                if v == "0" {
                    Ordering::Equal
                } else {
                    Ordering::Greater
                }
            }
            (Item::Int(a), Some(Item::Int(b))) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Item::Int(_), Some(_)) => Ordering::Greater,

            (Item::Str(v), None) => qualifier_key(v).as_str().cmp(RELEASE_INDEX),
            (Item::Str(a), Some(Item::Str(b))) => qualifier_key(a).cmp(&qualifier_key(b)),
            (Item::Str(_), Some(_)) => Ordering::Less,

            (Item::List(items), None) => items
                .first()
                .map_or(Ordering::Equal, |first| first.compare(None)),
            (Item::List(_), Some(Item::Int(_))) => Ordering::Less,
            (Item::List(_), Some(Item::Str(_))) => Ordering::Greater,
            (Item::List(left), Some(Item::List(right))) => compare_lists(left, right),
        }
    }
}

fn compare_lists(left: &[Item], right: &[Item]) -> Ordering {
    for i in 0..left.len().max(right.len()) {
        let result = match (left.get(i), right.get(i)) {
            (Some(l), r) => l.compare(r),
            (None, Some(r)) => r.compare(None).reverse(),
            (None, None) => Ordering::Equal,
        };
        if result != Ordering::Equal {
            return result;
        }
    }
    Ordering::Equal
}

fn qualifier_key(qualifier: &str) -> String {
    match QUALIFIERS.iter().position(|q| *q == qualifier) {
        Some(index) => index.to_string(),
        None => format!("{}-{}", QUALIFIERS.len(), qualifier),
    }
}

/// Drop trailing null items, stopping at the first non-null scalar
fn normalize(items: &mut Vec<Item>) {
    let mut i = items.len();
    while i > 0 {
        i -= 1;
        if items[i].is_null() {
            items.remove(i);
        } else if !matches!(items[i], Item::List(_)) {
            break;
        }
    }
}

/// A parsed Maven version with Maven's total ordering
#[derive(Debug, Clone)]
pub struct ComparableVersion {
    raw: String,
    items: Vec<Item>,
}

impl ComparableVersion {
    /// Parse a version string; every string is accepted
    pub fn parse(version: &str) -> Self {
        let lower = version.trim().to_lowercase();
        let chars: Vec<(usize, char)> = lower.char_indices().collect();

        // Each new sublist is the last element of its parent, so the open lists form a stack
        let mut stack: Vec<Vec<Item>> = vec![Vec::new()];
        let mut is_digit = false;
        let mut start = 0;

        let parse_item = |is_digit: bool, text: &str| {
            if is_digit {
                Item::int(text)
            } else {
                Item::string(text, false)
            }
        };

        for &(i, c) in &chars {
            let current = stack.len() - 1;
            match c {
                '.' => {
                    let item = if i == start {
                        Item::int("0")
                    } else {
                        parse_item(is_digit, &lower[start..i])
                    };
                    stack[current].push(item);
                    start = i + 1;
                }
                '-' => {
                    let item = if i == start {
                        Item::int("0")
                    } else {
                        parse_item(is_digit, &lower[start..i])
                    };
                    stack[current].push(item);
                    start = i + 1;
                    stack.push(Vec::new());
                }
                c if c.is_ascii_digit() => {
                    if !is_digit && i > start {
                        stack[current].push(Item::string(&lower[start..i], true));
                        start = i;
                        stack.push(Vec::new());
                    }
                    is_digit = true;
                }
                _ => {
                    if is_digit && i > start {
                        stack[current].push(Item::int(&lower[start..i]));
                        start = i;
                        stack.push(Vec::new());
                    }
                    is_digit = false;
                }
            }
        }
        if lower.len() > start {
            let last = stack.len() - 1;
            stack[last].push(parse_item(is_digit, &lower[start..]));
        }

        while stack.len() > 1 {
            let mut list = stack.pop().unwrap_or_default();
            normalize(&mut list);
            if let Some(parent) = stack.last_mut() {
                parent.push(Item::List(list));
            }
        }
        let mut items = stack.pop().unwrap_or_default();
        normalize(&mut items);

        Self {
            raw: version.to_string(),
            items,
        }
    }

    /// Returns the version text as given
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns true if any qualifier sorts before a plain release
    pub fn is_prerelease(&self) -> bool {
        fn walk(items: &[Item]) -> bool {
            items.iter().any(|item| match item {
                Item::Str(q) => QUALIFIERS[..5].contains(&q.as_str()),
                Item::List(inner) => walk(inner),
                Item::Int(_) => false,
            })
        }
        walk(&self.items)
    }
}

impl PartialEq for ComparableVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ComparableVersion {}

impl PartialOrd for ComparableVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ComparableVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_lists(&self.items, &other.items)
    }
}

impl VersionScheme for MavenVersionScheme {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Maven
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        ComparableVersion::parse(a).cmp(&ComparableVersion::parse(b))
    }

    fn major(&self, version: &str) -> String {
        let lower = version.trim().to_lowercase();
        let digits: String = lower.chars().take_while(|c| c.is_ascii_digit()).collect();
        if !digits.is_empty() {
            let stripped = digits.trim_start_matches('0');
            return if stripped.is_empty() { "0" } else { stripped }.to_string();
        }
        lower
            .split(['.', '-'])
            .next()
            .unwrap_or_default()
            .to_string()
    }

    fn is_prerelease(&self, version: &str) -> bool {
        ComparableVersion::parse(version).is_prerelease()
    }
}
