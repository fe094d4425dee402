//! Time-range queries with Prometheus-style label matchers.
//!
//! A [`Query`] is the storage-facing form of one remote read query:
//! a time range plus a list of [`Matcher`]s that a series' label set
//! must all satisfy. Matchers follow the Prometheus selector model,
//! including its quirk that an absent label matches as if its value
//! were the empty string.

use once_cell::sync::OnceCell;
use regex::Regex;
use std::fmt;
use thiserror::Error;

use crate::datamodel::labels::label_value;
use crate::parsing::prometheus::remote_read_models;
use crate::parsing::prometheus::remote_write_models::Label;

/// Matcher construction or evaluation failures.
#[derive(Error, Debug)]
pub enum MatcherError {
    /// The pattern of a regex matcher did not compile.
    #[error("Invalid regular expression {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A wire matcher carried a discriminant outside the four defined
    /// match types. Never coerced to a default; a decoder handing us
    /// this has a bug or speaks a newer protocol revision.
    #[error("Unknown match type: {0}")]
    UnknownMatchType(i32),
}

/// The four label matching operations of the Prometheus selector model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchType {
    /// Exact string equality (`=`).
    Equal,
    /// Exact string inequality (`!=`).
    NotEqual,
    /// Anchored regular expression match (`=~`).
    RegexMatch,
    /// Negated anchored regular expression match (`!~`).
    RegexNotMatch,
}

impl MatchType {
    /// Returns true if this match type evaluates a regular expression.
    #[inline]
    pub fn is_regex(&self) -> bool {
        matches!(self, Self::RegexMatch | Self::RegexNotMatch)
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchType::Equal => "=",
            MatchType::NotEqual => "!=",
            MatchType::RegexMatch => "=~",
            MatchType::RegexNotMatch => "!~",
        })
    }
}

impl From<remote_read_models::label_matcher::Type> for MatchType {
    fn from(wire: remote_read_models::label_matcher::Type) -> Self {
        use remote_read_models::label_matcher::Type;
        match wire {
            Type::Eq => MatchType::Equal,
            Type::Neq => MatchType::NotEqual,
            Type::Re => MatchType::RegexMatch,
            Type::Nre => MatchType::RegexNotMatch,
        }
    }
}

/// A single label condition: `name <op> value`.
///
/// Regex matchers compile their pattern once, on first evaluation, and
/// share the compiled form across all later evaluations. The pattern is
/// anchored as `^(?:value)$` so partial matches do not count, matching
/// PromQL selector semantics.
#[derive(Debug, Clone)]
pub struct Matcher {
    /// Label name to match against. `__name__` selects the metric name.
    pub name: String,

    /// Literal value or regex pattern, depending on `match_type`.
    pub value: String,

    /// Matching operation to perform.
    pub match_type: MatchType,

    /// Lazily compiled anchored pattern. `OnceCell` makes racing first
    /// evaluations safe: all concurrent callers observe one winner.
    regex: OnceCell<Regex>,
}

impl Matcher {
    /// Creates a new matcher. Regex patterns are not compiled here but
    /// at first evaluation, so construction never fails.
    pub fn new(name: impl Into<String>, value: impl Into<String>, match_type: MatchType) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            match_type,
            regex: OnceCell::new(),
        }
    }

    /// Creates an equality matcher (`=`).
    pub fn eq(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value, MatchType::Equal)
    }

    /// Creates a not-equal matcher (`!=`).
    pub fn neq(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value, MatchType::NotEqual)
    }

    /// Creates a regex match matcher (`=~`).
    pub fn regex(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(name, pattern, MatchType::RegexMatch)
    }

    /// Creates a negated regex matcher (`!~`).
    pub fn not_regex(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(name, pattern, MatchType::RegexNotMatch)
    }

    /// Evaluates the matcher against a label set. A label absent from
    /// the set matches as if its value were `""`.
    ///
    /// An invalid regex pattern surfaces here as an error on every
    /// evaluation attempt, never as a silent non-match.
    pub fn matches(&self, labels: &[Label]) -> Result<bool, MatcherError> {
        let value = label_value(labels, &self.name);
        match self.match_type {
            MatchType::Equal => Ok(value == self.value),
            MatchType::NotEqual => Ok(value != self.value),
            MatchType::RegexMatch => Ok(self.compiled_regex()?.is_match(value)),
            MatchType::RegexNotMatch => Ok(!self.compiled_regex()?.is_match(value)),
        }
    }

    fn compiled_regex(&self) -> Result<&Regex, MatcherError> {
        self.regex.get_or_try_init(|| {
            Regex::new(&format!("^(?:{})$", self.value)).map_err(|source| {
                MatcherError::InvalidPattern {
                    pattern: self.value.clone(),
                    source,
                }
            })
        })
    }
}

/// Equality is over name, value and match type. The regex cache is a
/// derived artifact and takes no part in it.
impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value && self.match_type == other.match_type
    }
}

impl Eq for Matcher {}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // {:?} quotes and escapes the value the way Go's %q does, which
        // keeps log lines readable when values contain quotes.
        write!(f, "{}{}{:?}", self.name, self.match_type, self.value)
    }
}

impl TryFrom<&remote_read_models::LabelMatcher> for Matcher {
    type Error = MatcherError;

    fn try_from(wire: &remote_read_models::LabelMatcher) -> Result<Self, Self::Error> {
        let match_type = remote_read_models::label_matcher::Type::try_from(wire.r#type)
            .map(MatchType::from)
            .map_err(|_| MatcherError::UnknownMatchType(wire.r#type))?;
        Ok(Self::new(wire.name.clone(), wire.value.clone(), match_type))
    }
}

/// One remote read query: an inclusive time range in milliseconds and
/// the matchers a series must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub start_timestamp_ms: i64,
    pub end_timestamp_ms: i64,
    pub matchers: Vec<Matcher>,
}

impl Query {
    /// True iff every matcher accepts the label set. A query without
    /// matchers accepts every series.
    pub fn matches(&self, labels: &[Label]) -> Result<bool, MatcherError> {
        for matcher in &self.matchers {
            if !matcher.matches(labels)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{},{{",
            self.start_timestamp_ms, self.end_timestamp_ms
        )?;
        for (i, matcher) in self.matchers.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", matcher)?;
        }
        f.write_str("}]")
    }
}

impl TryFrom<&remote_read_models::Query> for Query {
    type Error = MatcherError;

    fn try_from(wire: &remote_read_models::Query) -> Result<Self, Self::Error> {
        let matchers = wire
            .matchers
            .iter()
            .map(Matcher::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            start_timestamp_ms: wire.start_timestamp_ms,
            end_timestamp_ms: wire.end_timestamp_ms,
            matchers,
        })
    }
}
