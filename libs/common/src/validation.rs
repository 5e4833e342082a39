//! Field-path validation toolkit
//!
//! `Checker` walks an untrusted `serde_json::Value` while keeping track of the
//! path it is looking at, so that every failed constraint is recorded as a
//! `Violation` against a path such as `products[1].options[0].price`.
//!
//! Every check returns `Option<T>`: `None` means the value was rejected and a
//! violation was recorded. Record builders evaluate all their fields first and
//! only then combine the options, so a single pass reports every problem.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single failed constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Location of the offending value, e.g. `artwork_image.crops.studio.square.x`
    pub path: String,
    /// Human readable description of the constraint that failed
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every constraint that failed during one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.push(Violation {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Whether any violation sits at `path` or underneath it
    pub fn touches(&self, path: &str) -> bool {
        self.0.iter().any(|violation| {
            violation
                .path
                .strip_prefix(path)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(['.', '[']))
        })
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, violation) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A closed set of accepted terms
#[derive(Debug, Clone, Copy)]
pub struct Vocabulary {
    /// Name used in violation messages
    pub name: &'static str,
    pub terms: &'static [&'static str],
}

impl Vocabulary {
    pub const fn new(name: &'static str, terms: &'static [&'static str]) -> Self {
        Self { name, terms }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(&term)
    }
}

#[derive(Debug, Clone, Copy)]
enum Segment {
    Key(&'static str),
    Index(usize),
}

/// Path-tracking accumulator of violations
#[derive(Debug, Default)]
pub struct Checker {
    path: Vec<Segment>,
    violations: Violations,
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current path rendered as `a.b[2].c`
    pub fn path(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            match segment {
                Segment::Key(key) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(key);
                }
                Segment::Index(index) => {
                    out.push('[');
                    out.push_str(&index.to_string());
                    out.push(']');
                }
            }
        }
        if out.is_empty() {
            out.push_str("(root)");
        }
        out
    }

    /// Record a violation at the current path
    pub fn report(&mut self, message: impl Into<String>) {
        let path = self.path();
        self.violations.push(path, message);
    }

    pub fn violations(&self) -> &Violations {
        &self.violations
    }

    /// Turn the outcome of a validation pass into a result
    pub fn finish<T>(mut self, value: Option<T>) -> Result<T, Violations> {
        match value {
            Some(value) if self.violations.is_empty() => Ok(value),
            _ => {
                if self.violations.is_empty() {
                    self.report("invalid value");
                }
                Err(self.violations)
            }
        }
    }

    /// Run `check` against `object[key]` with the path extended by `key`
    pub fn field<'v, T>(
        &mut self,
        object: &'v Map<String, Value>,
        key: &'static str,
        check: impl FnOnce(&mut Self, Option<&'v Value>) -> Option<T>,
    ) -> Option<T> {
        self.path.push(Segment::Key(key));
        let out = check(self, object.get(key));
        self.path.pop();
        out
    }

    pub fn present<'v>(&mut self, value: Option<&'v Value>) -> Option<&'v Value> {
        if value.is_none() {
            self.report("is required");
        }
        value
    }

    pub fn object<'v>(&mut self, value: Option<&'v Value>) -> Option<&'v Map<String, Value>> {
        match self.present(value)? {
            Value::Object(map) => Some(map),
            other => {
                self.report(format!("expected an object, got {}", describe(other)));
                None
            }
        }
    }

    pub fn boolean(&mut self, value: Option<&Value>) -> Option<bool> {
        match self.present(value)? {
            Value::Bool(flag) => Some(*flag),
            other => {
                self.report(format!("expected a boolean, got {}", describe(other)));
                None
            }
        }
    }

    /// A string of at least `min_len` characters
    pub fn string(&mut self, value: Option<&Value>, min_len: usize) -> Option<String> {
        let text = match self.present(value)? {
            Value::String(text) => text,
            other => {
                self.report(format!("expected a string, got {}", describe(other)));
                return None;
            }
        };

        let len = text.chars().count();
        if len < min_len {
            if min_len == 1 {
                self.report("must not be empty");
            } else {
                self.report(format!("must be at least {} characters long", min_len));
            }
            return None;
        }

        Some(text.clone())
    }

    /// A string of exactly `len` characters
    pub fn string_of_len(&mut self, value: Option<&Value>, len: usize) -> Option<String> {
        let text = self.string(value, 0)?;
        if text.chars().count() != len {
            self.report(format!("must be exactly {} characters long", len));
            return None;
        }
        Some(text)
    }

    /// A non-empty string holding a formatted decimal such as `20` or `20.50`
    pub fn decimal_string(&mut self, value: Option<&Value>) -> Option<String> {
        static DECIMAL_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = DECIMAL_REGEX
            .get_or_init(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("Failed to compile decimal regex"));

        let text = self.string(value, 1)?;
        if !regex.is_match(&text) {
            self.report(format!("expected a decimal string, got {:?}", text));
            return None;
        }
        Some(text)
    }

    /// An integer no smaller than `min`
    pub fn integer(&mut self, value: Option<&Value>, min: u64) -> Option<u64> {
        self.integer_between(value, min, u64::MAX)
    }

    /// An integer within `min..=max`
    pub fn integer_between(&mut self, value: Option<&Value>, min: u64, max: u64) -> Option<u64> {
        let value = self.present(value)?;
        let Some(number) = integral(value) else {
            self.report(format!("expected an integer, got {}", describe(value)));
            return None;
        };

        if number < min as i128 {
            self.report(format!("must be at least {}, got {}", min, number));
            return None;
        }
        if number > max as i128 {
            self.report(format!("must be at most {}, got {}", max, number));
            return None;
        }

        Some(number as u64)
    }

    /// Any number, optionally bounded below by `min`
    pub fn number(&mut self, value: Option<&Value>, min: Option<f64>) -> Option<f64> {
        let value = self.present(value)?;
        let Some(number) = value.as_f64() else {
            self.report(format!("expected a number, got {}", describe(value)));
            return None;
        };

        if let Some(min) = min {
            if number < min {
                self.report(format!("must be at least {}, got {}", min, number));
                return None;
            }
        }

        Some(number)
    }

    /// A string drawn from `vocabulary`
    pub fn term(&mut self, value: Option<&Value>, vocabulary: &Vocabulary) -> Option<String> {
        let text = self.string(value, 0)?;
        if !vocabulary.contains(&text) {
            self.report(format!("{:?} is not a known {}", text, vocabulary.name));
            return None;
        }
        Some(text)
    }

    /// Accept an explicit `null`; the key itself must still be present
    pub fn nullable<'v, T>(
        &mut self,
        value: Option<&'v Value>,
        check: impl FnOnce(&mut Self, Option<&'v Value>) -> Option<T>,
    ) -> Option<Option<T>> {
        match self.present(value)? {
            Value::Null => Some(None),
            _ => check(self, value).map(Some),
        }
    }

    /// Accept a missing key
    pub fn optional<'v, T>(
        &mut self,
        value: Option<&'v Value>,
        check: impl FnOnce(&mut Self, Option<&'v Value>) -> Option<T>,
    ) -> Option<Option<T>> {
        match value {
            None => Some(None),
            Some(_) => check(self, value).map(Some),
        }
    }

    /// An array whose every element passes `check`
    ///
    /// All elements are checked even after the first failure so that the
    /// violations of every element are reported.
    pub fn array<'v, T>(
        &mut self,
        value: Option<&'v Value>,
        mut check: impl FnMut(&mut Self, Option<&'v Value>) -> Option<T>,
    ) -> Option<Vec<T>> {
        let items = match self.present(value)? {
            Value::Array(items) => items,
            other => {
                self.report(format!("expected an array, got {}", describe(other)));
                return None;
            }
        };

        let mut out = Vec::with_capacity(items.len());
        let mut valid = true;
        for (index, item) in items.iter().enumerate() {
            self.path.push(Segment::Index(index));
            match check(self, Some(item)) {
                Some(checked) => out.push(checked),
                None => valid = false,
            }
            self.path.pop();
        }

        valid.then_some(out)
    }
}

/// Integral value of a JSON number, accepting floats with no fractional part
fn integral(value: &Value) -> Option<i128> {
    if let Some(number) = value.as_i64() {
        return Some(number as i128);
    }
    if let Some(number) = value.as_u64() {
        return Some(number as i128);
    }
    value
        .as_f64()
        .filter(|number| number.is_finite() && number.fract() == 0.0 && number.abs() < 9.0e15)
        .map(|number| number as i128)
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COLORS: Vocabulary = Vocabulary::new("color", &["red", "green"]);

    fn object(value: &Value) -> &Map<String, Value> {
        value.as_object().expect("test fixture is an object")
    }

    #[test]
    fn test_paths_are_rendered_with_keys_and_indices() {
        let doc = json!({ "items": [{ "price": 10 }, { "price": 0 }] });
        let mut checker = Checker::new();

        let prices = checker.field(object(&doc), "items", |c, v| {
            c.array(v, |c, item| {
                let item = c.object(item)?;
                c.field(item, "price", |c, v| c.integer(v, 1))
            })
        });

        assert!(prices.is_none());
        let violations = checker.finish(prices).unwrap_err();
        assert_eq!(violations.len(), 1);
        let violation = violations.iter().next().unwrap();
        assert_eq!(violation.path, "items[1].price");
        assert_eq!(violation.message, "must be at least 1, got 0");
    }

    #[test]
    fn test_every_failed_field_is_reported() {
        let doc = json!({ "title": "", "count": "three" });
        let mut checker = Checker::new();

        let title = checker.field(object(&doc), "title", |c, v| c.string(v, 1));
        let count = checker.field(object(&doc), "count", |c, v| c.integer(v, 0));
        let missing = checker.field(object(&doc), "flag", |c, v| c.boolean(v));

        assert!(title.is_none() && count.is_none() && missing.is_none());
        let violations = checker.violations().clone();
        assert_eq!(violations.len(), 3);
        assert!(violations.touches("title"));
        assert!(violations.touches("count"));
        assert!(violations.touches("flag"));
        assert!(!violations.touches("tit"));
    }

    #[test]
    fn test_integers_accept_whole_floats_only() {
        let mut checker = Checker::new();
        assert_eq!(checker.integer(Some(&json!(20.0)), 1), Some(20));
        assert_eq!(checker.integer(Some(&json!(20.5)), 1), None);
        assert_eq!(checker.integer(Some(&json!(-3)), 0), None);
        assert_eq!(checker.integer_between(Some(&json!(4)), 1, 3), None);
        assert_eq!(checker.violations().len(), 3);
    }

    #[test]
    fn test_nullable_and_optional() {
        let mut checker = Checker::new();

        assert_eq!(
            checker.nullable(Some(&Value::Null), |c, v| c.string(v, 1)),
            Some(None)
        );
        assert_eq!(checker.nullable(None, |c, v| c.string(v, 1)), None);
        assert_eq!(checker.optional(None, |c, v| c.string(v, 1)), Some(None));
        assert_eq!(
            checker.optional(Some(&Value::Null), |c, v| c.string(v, 1)),
            None
        );
        assert_eq!(checker.violations().len(), 2);
    }

    #[test]
    fn test_terms_and_decimal_strings() {
        let mut checker = Checker::new();

        assert_eq!(
            checker.term(Some(&json!("red")), &COLORS),
            Some("red".to_string())
        );
        assert_eq!(checker.term(Some(&json!("blue")), &COLORS), None);
        assert_eq!(
            checker.decimal_string(Some(&json!("20.0"))),
            Some("20.0".to_string())
        );
        assert_eq!(checker.decimal_string(Some(&json!("twenty"))), None);

        let messages: Vec<_> = checker.violations().iter().map(|v| v.message.clone()).collect();
        assert_eq!(
            messages,
            vec![
                "\"blue\" is not a known color".to_string(),
                "expected a decimal string, got \"twenty\"".to_string(),
            ]
        );
    }

    #[test]
    fn test_finish_without_violations() {
        let checker = Checker::new();
        assert_eq!(checker.finish(Some(1)), Ok(1));

        let checker = Checker::new();
        let violations = checker.finish::<u8>(None).unwrap_err();
        assert_eq!(violations.iter().next().unwrap().path, "(root)");
    }
}
