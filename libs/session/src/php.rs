//! Decoder for PHP's native serialization format
//!
//! The legacy application writes its sessions with PHP's session serializer:
//! a sequence of `name|<serialized value>` pairs. This module turns those bytes
//! into a `PhpValue` tree without knowing anything about what a session should
//! contain; the schema is applied afterwards on the JSON form of the tree.

use std::fmt;

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Nesting limit for arrays and objects
pub const MAX_DEPTH: usize = 64;

/// A decoded PHP value
#[derive(Debug, Clone, PartialEq)]
pub enum PhpValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// PHP arrays are ordered maps; insertion order is kept
    Array(Vec<(PhpKey, PhpValue)>),
    Object {
        class: String,
        properties: Vec<(String, PhpValue)>,
    },
}

/// Key of a PHP array entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhpKey {
    Int(i64),
    Str(String),
}

impl fmt::Display for PhpKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhpKey::Int(index) => write!(f, "{}", index),
            PhpKey::Str(name) => f.write_str(name),
        }
    }
}

/// Errors raised while decoding serialized PHP data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhpError {
    #[error("unexpected end of input at byte {0}")]
    UnexpectedEnd(usize),

    #[error("expected {expected} at byte {offset}, found {found:?}")]
    Unexpected {
        offset: usize,
        expected: &'static str,
        found: char,
    },

    #[error("invalid {what} at byte {offset}")]
    Invalid { offset: usize, what: &'static str },

    #[error("unsupported value type {tag:?} at byte {offset}")]
    Unsupported { offset: usize, tag: char },

    #[error("values nested deeper than {} levels", MAX_DEPTH)]
    TooDeep,

    #[error("trailing data at byte {0}")]
    TrailingData(usize),
}

type PhpResult<T> = Result<T, PhpError>;

/// Decode a single serialized value, e.g. the output of PHP's `serialize()`
pub fn unserialize(input: &[u8]) -> PhpResult<PhpValue> {
    let mut parser = Parser::new(input);
    let value = parser.value()?;
    if parser.pos != input.len() {
        return Err(PhpError::TrailingData(parser.pos));
    }
    Ok(value)
}

/// Decode a PHP session payload into its named top-level entries
pub fn unserialize_session(input: &[u8]) -> PhpResult<Vec<(String, PhpValue)>> {
    let mut parser = Parser::new(input);
    let mut entries = Vec::new();

    while parser.pos < input.len() {
        let start = parser.pos;
        let name = parser.read_until(b'|')?;
        let name = std::str::from_utf8(name)
            .map_err(|_| PhpError::Invalid {
                offset: start,
                what: "session entry name",
            })?
            .to_string();
        let value = parser.value()?;
        entries.push((name, value));
    }

    Ok(entries)
}

/// Decode a PHP session payload straight into a JSON object keyed by entry name
pub fn session_to_json(input: &[u8]) -> PhpResult<Map<String, Value>> {
    Ok(unserialize_session(input)?
        .into_iter()
        .map(|(name, value)| (name, value.into_json()))
        .collect())
}

impl PhpValue {
    /// Convert into the language-neutral JSON form used for validation
    ///
    /// Arrays keyed exactly `0..n` become JSON arrays. Every other array,
    /// including the empty one, becomes a JSON object, since PHP does not
    /// distinguish an empty list from an empty map.
    pub fn into_json(self) -> Value {
        match self {
            PhpValue::Null => Value::Null,
            PhpValue::Bool(flag) => Value::Bool(flag),
            PhpValue::Int(number) => Value::from(number),
            PhpValue::Float(number) => Number::from_f64(number)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            PhpValue::String(text) => Value::String(text),
            PhpValue::Array(entries) if is_list(&entries) => Value::Array(
                entries
                    .into_iter()
                    .map(|(_, value)| value.into_json())
                    .collect(),
            ),
            PhpValue::Array(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.to_string(), value.into_json()))
                    .collect(),
            ),
            PhpValue::Object { properties, .. } => Value::Object(
                properties
                    .into_iter()
                    .map(|(name, value)| (name, value.into_json()))
                    .collect(),
            ),
        }
    }
}

fn is_list(entries: &[(PhpKey, PhpValue)]) -> bool {
    !entries.is_empty()
        && entries
            .iter()
            .enumerate()
            .all(|(index, (key, _))| *key == PhpKey::Int(index as i64))
}

/// Strip the `\0*\0` and `\0Class\0` prefixes PHP puts on non-public properties
fn unmangle(name: String) -> String {
    if let Some(rest) = name.strip_prefix('\0') {
        if let Some(end) = rest.find('\0') {
            return rest[end + 1..].to_string();
        }
    }
    name
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
        }
    }

    fn value(&mut self) -> PhpResult<PhpValue> {
        let offset = self.pos;
        match self.next_byte()? {
            b'N' => {
                self.expect(b';', "';'")?;
                Ok(PhpValue::Null)
            }
            b'b' => {
                self.expect(b':', "':'")?;
                match self.read_until(b';')? {
                    b"0" => Ok(PhpValue::Bool(false)),
                    b"1" => Ok(PhpValue::Bool(true)),
                    _ => Err(PhpError::Invalid {
                        offset,
                        what: "boolean",
                    }),
                }
            }
            b'i' => {
                self.expect(b':', "':'")?;
                let digits = self.read_until(b';')?;
                parse_str::<i64>(digits)
                    .map(PhpValue::Int)
                    .ok_or(PhpError::Invalid {
                        offset,
                        what: "integer",
                    })
            }
            b'd' => {
                self.expect(b':', "':'")?;
                let digits = self.read_until(b';')?;
                let number = match digits {
                    b"INF" => Some(f64::INFINITY),
                    b"-INF" => Some(f64::NEG_INFINITY),
                    b"NAN" => Some(f64::NAN),
                    _ => parse_str::<f64>(digits),
                };
                number.map(PhpValue::Float).ok_or(PhpError::Invalid {
                    offset,
                    what: "float",
                })
            }
            b's' => {
                self.expect(b':', "':'")?;
                let text = self.quoted()?;
                self.expect(b';', "';'")?;
                Ok(PhpValue::String(text))
            }
            b'a' => {
                self.expect(b':', "':'")?;
                let count = self.length(b':')?;
                self.expect(b'{', "'{'")?;
                self.enter()?;

                let mut entries = Vec::with_capacity(count.min(self.remaining()));
                for _ in 0..count {
                    let key = self.key()?;
                    let value = self.value()?;
                    entries.push((key, value));
                }

                self.leave();
                self.expect(b'}', "'}'")?;
                Ok(PhpValue::Array(entries))
            }
            b'O' => {
                self.expect(b':', "':'")?;
                let class = self.quoted()?;
                self.expect(b':', "':'")?;
                let count = self.length(b':')?;
                self.expect(b'{', "'{'")?;
                self.enter()?;

                let mut properties = Vec::with_capacity(count.min(self.remaining()));
                for _ in 0..count {
                    let name = unmangle(self.key()?.to_string());
                    let value = self.value()?;
                    properties.push((name, value));
                }

                self.leave();
                self.expect(b'}', "'}'")?;
                Ok(PhpValue::Object { class, properties })
            }
            tag => Err(PhpError::Unsupported {
                offset,
                tag: tag as char,
            }),
        }
    }

    fn key(&mut self) -> PhpResult<PhpKey> {
        let offset = self.pos;
        match self.value()? {
            PhpValue::Int(index) => Ok(PhpKey::Int(index)),
            PhpValue::String(name) => Ok(PhpKey::Str(name)),
            _ => Err(PhpError::Invalid {
                offset,
                what: "array key",
            }),
        }
    }

    /// `<len>:"<len bytes>"`, the length counted in bytes
    fn quoted(&mut self) -> PhpResult<String> {
        let len = self.length(b':')?;
        self.expect(b'"', "'\"'")?;
        let offset = self.pos;
        let bytes = self.take(len)?;
        self.expect(b'"', "'\"'")?;
        String::from_utf8(bytes.to_vec()).map_err(|_| PhpError::Invalid {
            offset,
            what: "UTF-8 string",
        })
    }

    fn length(&mut self, terminator: u8) -> PhpResult<usize> {
        let offset = self.pos;
        let digits = self.read_until(terminator)?;
        parse_str::<usize>(digits).ok_or(PhpError::Invalid {
            offset,
            what: "length",
        })
    }

    fn enter(&mut self) -> PhpResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(PhpError::TooDeep);
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    fn next_byte(&mut self) -> PhpResult<u8> {
        let byte = *self
            .input
            .get(self.pos)
            .ok_or(PhpError::UnexpectedEnd(self.pos))?;
        self.pos += 1;
        Ok(byte)
    }

    fn expect(&mut self, wanted: u8, expected: &'static str) -> PhpResult<()> {
        let offset = self.pos;
        let found = self.next_byte()?;
        if found != wanted {
            return Err(PhpError::Unexpected {
                offset,
                expected,
                found: found as char,
            });
        }
        Ok(())
    }

    fn take(&mut self, len: usize) -> PhpResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(PhpError::UnexpectedEnd(self.input.len()));
        }
        let input: &'a [u8] = self.input;
        let bytes = &input[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Bytes up to `terminator`, which is consumed but not returned
    fn read_until(&mut self, terminator: u8) -> PhpResult<&'a [u8]> {
        let input: &'a [u8] = self.input;
        let rest = &input[self.pos..];
        let end = rest
            .iter()
            .position(|byte| *byte == terminator)
            .ok_or(PhpError::UnexpectedEnd(self.input.len()))?;
        self.pos += end + 1;
        Ok(&rest[..end])
    }
}

fn parse_str<T: std::str::FromStr>(bytes: &[u8]) -> Option<T> {
    std::str::from_utf8(bytes).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(unserialize(b"N;"), Ok(PhpValue::Null));
        assert_eq!(unserialize(b"b:1;"), Ok(PhpValue::Bool(true)));
        assert_eq!(unserialize(b"b:0;"), Ok(PhpValue::Bool(false)));
        assert_eq!(unserialize(b"i:-42;"), Ok(PhpValue::Int(-42)));
        assert_eq!(unserialize(b"d:0.5;"), Ok(PhpValue::Float(0.5)));
        assert_eq!(
            unserialize(b"d:-INF;"),
            Ok(PhpValue::Float(f64::NEG_INFINITY))
        );
    }

    #[test]
    fn test_string_length_is_counted_in_bytes() {
        let input = "s:7:\"Zürich\";s:1:\"x\";";
        let mut parser = Parser::new(input.as_bytes());
        assert_eq!(
            parser.value(),
            Ok(PhpValue::String("Zürich".to_string()))
        );

        let input = "s:5:\"a\"b;c\";";
        assert_eq!(
            unserialize(input.as_bytes()),
            Ok(PhpValue::String("a\"b;c".to_string()))
        );
    }

    #[test]
    fn test_nested_arrays_and_objects() {
        let input = b"a:2:{s:7:\"storage\";O:8:\"stdClass\":1:{s:4:\"body\";a:1:{s:2:\"id\";i:7;}}i:5;N;}";
        let value = unserialize(input).unwrap();

        assert_eq!(
            value.into_json(),
            json!({ "storage": { "body": { "id": 7 } }, "5": null })
        );
    }

    #[test]
    fn test_list_detection() {
        let list = unserialize(b"a:2:{i:0;i:11;i:1;i:12;}").unwrap();
        assert_eq!(list.into_json(), json!([11, 12]));

        let sparse = unserialize(b"a:2:{i:0;i:11;i:2;i:12;}").unwrap();
        assert_eq!(sparse.into_json(), json!({ "0": 11, "2": 12 }));

        let empty = unserialize(b"a:0:{}").unwrap();
        assert_eq!(empty.into_json(), json!({}));
    }

    #[test]
    fn test_property_name_mangling_is_stripped() {
        let input = b"O:4:\"User\":2:{s:7:\"\0*\0name\";s:3:\"ada\";s:9:\"\0User\0age\";i:36;}";
        let value = unserialize(input).unwrap();

        match &value {
            PhpValue::Object { class, properties } => {
                assert_eq!(class, "User");
                assert_eq!(properties[0].0, "name");
                assert_eq!(properties[1].0, "age");
            }
            other => panic!("expected an object, got {:?}", other),
        }
    }

    #[test]
    fn test_session_entries() {
        let input = b"Zend_Auth|a:1:{s:1:\"k\";b:1;}Saatchi|a:0:{}";
        let entries = unserialize_session(input).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "Zend_Auth");
        assert_eq!(entries[1].0, "Saatchi");
        assert_eq!(entries[1].1, PhpValue::Array(vec![]));

        assert!(unserialize_session(b"").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_input() {
        assert_eq!(unserialize(b"i:12"), Err(PhpError::UnexpectedEnd(4)));
        assert_eq!(unserialize(b"s:10:\"short\";"), Err(PhpError::UnexpectedEnd(13)));
        assert_eq!(unserialize(b"b:2;"), Err(PhpError::Invalid { offset: 0, what: "boolean" }));
        assert_eq!(unserialize(b"i:1;i:2;"), Err(PhpError::TrailingData(4)));
        assert!(matches!(
            unserialize(b"r:1;"),
            Err(PhpError::Unsupported { tag: 'r', .. })
        ));
        assert!(matches!(
            unserialize(b"a:1:{d:1.5;i:1;}"),
            Err(PhpError::Invalid { what: "array key", .. })
        ));
        assert!(unserialize_session(b"no separator here").is_err());
    }

    #[test]
    fn test_depth_limit() {
        let depth = MAX_DEPTH + 1;
        let mut input = "a:1:{i:0;".repeat(depth);
        input.push_str("N;");
        input.push_str(&"}".repeat(depth));

        assert_eq!(unserialize(input.as_bytes()), Err(PhpError::TooDeep));
    }
}
