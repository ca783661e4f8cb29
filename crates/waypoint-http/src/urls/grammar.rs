//! Route grammars: ordered, positional path parameters.
//!
//! A grammar string looks like `year<\d+>/month<\d+>:1/day:1`. Each
//! `/`-separated segment is `key[<regex>][:default]`, and segment order
//! defines which URL path segment binds to which key.
//!
//! Parsing rules:
//!
//! - A `/` or `:` inside `<...>` belongs to the pattern. Angle brackets nest,
//!   so named groups like `(?P<n>\d+)` are allowed.
//! - Outside a pattern, `\/`, `\:`, `\<` and `\\` escape the separator.
//! - `key<>` means "no pattern"; `key:` means the default is the empty string.
//! - Patterns are matched anchored and case-insensitively.

use std::fmt;

use regex::Regex;

use waypoint_core::{RouterError, RouterResult};

use super::rules::{dot_key, RouteRuleSource};

/// One positional parameter of a route grammar.
#[derive(Clone)]
pub struct ParamRule {
    key: String,
    pattern: Option<String>,
    default: Option<String>,
    regex: Option<Regex>,
}

impl fmt::Debug for ParamRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamRule")
            .field("key", &self.key)
            .field("pattern", &self.pattern)
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ParamRule {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.pattern == other.pattern && self.default == other.default
    }
}

impl Eq for ParamRule {}

impl ParamRule {
    /// Creates a rule, compiling its pattern if one is given.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidGrammar`] if the key is empty or the
    /// pattern is not a valid regex.
    pub fn new(
        key: impl Into<String>,
        pattern: Option<String>,
        default: Option<String>,
    ) -> RouterResult<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(RouterError::InvalidGrammar(
                "parameter key must not be empty".to_string(),
            ));
        }

        let pattern = pattern.filter(|p| !p.is_empty());
        let regex = pattern
            .as_deref()
            .map(|p| {
                Regex::new(&format!("(?i)^(?:{p})$")).map_err(|e| {
                    RouterError::InvalidGrammar(format!("bad pattern for '{key}': {e}"))
                })
            })
            .transpose()?;

        Ok(Self {
            key,
            pattern,
            default,
            regex,
        })
    }

    /// Returns the parameter name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the raw pattern, without anchors.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Returns the default value, if any.
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Returns `true` if `value` satisfies this rule's pattern (or it has none).
    pub fn matches(&self, value: &str) -> bool {
        self.regex.as_ref().map_or(true, |re| re.is_match(value))
    }
}

/// An ordered list of [`ParamRule`]s for one (controller, action) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteGrammar {
    rules: Vec<ParamRule>,
}

impl RouteGrammar {
    /// Creates a grammar with no positional parameters.
    pub const fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Parses a grammar string.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidGrammar`] for an unclosed `<`, text
    /// between `>` and the next separator, an empty segment, or a pattern
    /// that fails to compile.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint_http::urls::grammar::RouteGrammar;
    ///
    /// let g = RouteGrammar::parse(r"year<\d+>/month<\d+>:1/day:1").unwrap();
    /// assert_eq!(g.len(), 3);
    /// assert_eq!(g.rules()[0].key(), "year");
    /// assert_eq!(g.rules()[0].pattern(), Some(r"\d+"));
    /// assert_eq!(g.rules()[0].default(), None);
    /// assert_eq!(g.rules()[1].default(), Some("1"));
    /// assert_eq!(g.rules()[2].pattern(), None);
    /// ```
    pub fn parse(rule: &str) -> RouterResult<Self> {
        let rule = rule.trim();
        if rule.is_empty() {
            return Ok(Self::empty());
        }
        GrammarParser::new(rule).parse().map(|rules| Self { rules })
    }

    /// Returns the rules in positional order.
    pub fn rules(&self) -> &[ParamRule] {
        &self.rules
    }

    /// Iterates over the rules in positional order.
    pub fn iter(&self) -> std::slice::Iter<'_, ParamRule> {
        self.rules.iter()
    }

    /// Returns the number of positional parameters.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the route accepts no path parameters.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RouteGrammar {
    type Item = &'a ParamRule;
    type IntoIter = std::slice::Iter<'a, ParamRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Compiles the grammar for a route by looking up its rule string.
///
/// A route with no rule compiles to an empty grammar. This function does no
/// caching; see [`GrammarCache`](super::cache::GrammarCache).
///
/// # Errors
///
/// Returns [`RouterError::InvalidGrammar`] if the rule string is malformed.
pub fn compile_grammar(
    controller: &str,
    action: &str,
    rules: &dyn RouteRuleSource,
) -> RouterResult<RouteGrammar> {
    let key = dot_key(controller, action);
    match rules.find_route_rule(&key) {
        Some(rule) => RouteGrammar::parse(&rule).map_err(|e| match e {
            RouterError::InvalidGrammar(msg) => {
                RouterError::InvalidGrammar(format!("route '{key}': {msg}"))
            }
            other => other,
        }),
        None => Ok(RouteGrammar::empty()),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Key,
    Pattern(usize),
    AfterPattern,
    Default,
}

/// Single-pass scanner over a grammar string.
struct GrammarParser<'a> {
    source: &'a str,
    state: State,
    key: String,
    pattern: Option<String>,
    default: Option<String>,
    rules: Vec<ParamRule>,
}

impl<'a> GrammarParser<'a> {
    const fn new(source: &'a str) -> Self {
        Self {
            source,
            state: State::Key,
            key: String::new(),
            pattern: None,
            default: None,
            rules: Vec::new(),
        }
    }

    fn parse(mut self) -> RouterResult<Vec<ParamRule>> {
        let mut chars = self.source.chars();

        while let Some(c) = chars.next() {
            match (self.state, c) {
                (State::Pattern(_), '\\') => {
                    // Regex escapes are kept verbatim and never close the pattern.
                    let pattern = self.pattern.get_or_insert_with(String::new);
                    pattern.push('\\');
                    if let Some(next) = chars.next() {
                        pattern.push(next);
                    }
                }
                (State::Pattern(depth), '<') => {
                    self.state = State::Pattern(depth + 1);
                    self.pattern.get_or_insert_with(String::new).push('<');
                }
                (State::Pattern(depth), '>') => {
                    if depth == 1 {
                        self.state = State::AfterPattern;
                    } else {
                        self.state = State::Pattern(depth - 1);
                        self.pattern.get_or_insert_with(String::new).push('>');
                    }
                }
                (State::Pattern(_), c) => {
                    self.pattern.get_or_insert_with(String::new).push(c);
                }
                (State::Key | State::Default, '\\') => {
                    let escaped = chars.next().ok_or_else(|| {
                        RouterError::InvalidGrammar(format!(
                            "trailing backslash in '{}'",
                            self.source
                        ))
                    })?;
                    self.push_literal(escaped);
                }
                (_, '/') => self.finish_segment()?,
                (State::Key, '<') => {
                    self.state = State::Pattern(1);
                    self.pattern = Some(String::new());
                }
                (State::Key | State::AfterPattern, ':') => {
                    self.state = State::Default;
                    self.default = Some(String::new());
                }
                (State::AfterPattern, c) => {
                    return Err(RouterError::InvalidGrammar(format!(
                        "unexpected '{c}' after pattern for '{}' in '{}'",
                        self.key, self.source
                    )));
                }
                (State::Key | State::Default, c) => self.push_literal(c),
            }
        }

        if matches!(self.state, State::Pattern(_)) {
            return Err(RouterError::InvalidGrammar(format!(
                "unclosed '<' in '{}'",
                self.source
            )));
        }
        self.finish_segment()?;
        Ok(self.rules)
    }

    fn push_literal(&mut self, c: char) {
        if self.state == State::Default {
            self.default.get_or_insert_with(String::new).push(c);
        } else {
            self.key.push(c);
        }
    }

    fn finish_segment(&mut self) -> RouterResult<()> {
        if self.key.is_empty() && self.pattern.is_none() && self.default.is_none() {
            return Err(RouterError::InvalidGrammar(format!(
                "empty segment in '{}'",
                self.source
            )));
        }
        let rule = ParamRule::new(
            std::mem::take(&mut self.key),
            self.pattern.take(),
            self.default.take(),
        )?;
        self.rules.push(rule);
        self.state = State::Key;
        Ok(())
    }
}
