//! Legacy session decoding and normalization
//!
//! A session blob is decoded in three steps: the PHP session payload is turned
//! into a JSON tree (`php`), the Zend auth body found under
//! `Zend_Auth.storage.body` is validated field by field, and the `Saatchi`
//! preferences section is normalized with its defaults.

use std::sync::Arc;

use common::cache::SessionStore;
use common::error::{SessionError, SessionResult};
use common::validation::Checker;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::model::{MeasurementSystem, SessionRecord};
use crate::php;

/// Prefix the legacy application puts in front of the session cookie to form a cache key
pub const DEFAULT_KEY_PREFIX: &str = "memc.sess.saatchi_legacy.";

/// Decode the cached blob belonging to a session cookie
///
/// The cookie is checked before anything else, so a request without a cookie
/// is always `NotAuthenticated` regardless of `raw`.
pub fn decode_session(cookie: Option<&str>, raw: Option<&[u8]>) -> SessionResult<SessionRecord> {
    if !matches!(cookie, Some(cookie) if !cookie.is_empty()) {
        return Err(SessionError::NotAuthenticated);
    }

    match raw {
        Some(raw) if !raw.is_empty() => normalize(raw),
        _ => Err(SessionError::DataMissing),
    }
}

fn normalize(raw: &[u8]) -> SessionResult<SessionRecord> {
    let unreadable = |reason: String| SessionError::Unreadable {
        raw: String::from_utf8_lossy(raw).into_owned(),
        reason,
    };

    let session = php::session_to_json(raw).map_err(|e| unreadable(e.to_string()))?;

    let mut checker = Checker::new();
    let record = read_session(&mut checker, &session);
    checker
        .finish(record)
        .map_err(|violations| unreadable(violations.to_string()))
}

fn read_session(c: &mut Checker, session: &Map<String, Value>) -> Option<SessionRecord> {
    let body = c.field(session, "Zend_Auth", |c, v| {
        let auth = c.object(v)?;
        c.field(auth, "storage", |c, v| {
            let storage = c.object(v)?;
            c.field(storage, "body", |c, v| {
                let body = c.object(v)?;
                read_body(c, body)
            })
        })
    });

    let preferences = c.field(session, "Saatchi", |c, v| {
        c.optional(v, |c, v| {
            let saatchi = c.object(v)?;
            read_preferences(c, saatchi)
        })
    });

    let body = body?;
    let preferences = preferences?.unwrap_or_default();

    Some(SessionRecord {
        measurement_system: preferences.measurement_system,
        user_favorites: preferences.user_favorites,
        ..body
    })
}

fn read_body(c: &mut Checker, body: &Map<String, Value>) -> Option<SessionRecord> {
    let email = c.field(body, "email", |c, v| c.string(v, 1));
    let first_name = c.field(body, "first_name", |c, v| c.string(v, 1));
    let last_name = c.field(body, "last_name", |c, v| c.string(v, 0));
    let id = c.field(body, "id", |c, v| c.integer(v, 1));
    let username = c.field(body, "username", |c, v| c.nullable(v, |c, v| c.string(v, 1)));
    let is_easel_admin = c.field(body, "isEaselAdmin", |c, v| c.boolean(v));
    let is_limited_artist = c.field(body, "is_limited_artist", limited_artist_flag);
    let is_verified_to_sell =
        c.field(body, "is_verified_to_sell", |c, v| c.optional(v, |c, v| c.boolean(v)));
    let user_type_id = c.field(body, "user_type_id", |c, v| c.integer_between(v, 1, 3));
    let admin_full_name =
        c.field(body, "admin_full_name", |c, v| c.optional(v, |c, v| c.string(v, 1)));
    let admin_id = c.field(body, "adminId", |c, v| c.optional(v, |c, v| c.integer(v, 1)));
    let check_in_timer_started_at = c.field(body, "check_in_timer_started_at", |c, v| {
        c.optional(v, |c, v| c.nullable(v, |c, v| c.string(v, 1)))
    });

    Some(SessionRecord {
        email: email?,
        first_name: first_name?,
        last_name: last_name?,
        id: id?,
        username: username?,
        is_easel_admin: is_easel_admin?,
        is_limited_artist: is_limited_artist?,
        is_verified_to_sell: is_verified_to_sell?,
        user_type_id: user_type_id? as u8,
        admin_full_name: admin_full_name?,
        admin_id: admin_id?,
        check_in_timer_started_at: check_in_timer_started_at?.flatten(),
        measurement_system: MeasurementSystem::default(),
        user_favorites: Vec::new(),
    })
}

/// The legacy application stores this flag as a PHP int or numeric string,
/// and leaves it out (or null) for accounts that never had it set
fn limited_artist_flag(c: &mut Checker, value: Option<&Value>) -> Option<bool> {
    let flag = match value {
        None | Some(Value::Null) => Some(false),
        Some(Value::Bool(flag)) => Some(*flag),
        Some(Value::Number(number)) => match number.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Some(Value::String(text)) => match text.as_str() {
            "" | "0" => Some(false),
            "1" => Some(true),
            _ => None,
        },
        _ => None,
    };

    if flag.is_none() {
        c.report("expected a boolean or 0/1");
    }
    flag
}

#[derive(Debug, Default)]
struct Preferences {
    measurement_system: MeasurementSystem,
    user_favorites: Vec<u64>,
}

fn read_preferences(c: &mut Checker, saatchi: &Map<String, Value>) -> Option<Preferences> {
    let measurement_system = c.field(saatchi, "measurementSystem", |c, v| match v {
        None | Some(Value::Null) => Some(MeasurementSystem::default()),
        Some(_) => {
            let term = c.string(v, 0)?;
            let system = MeasurementSystem::parse(&term);
            if system.is_none() {
                c.report(format!("{:?} is not a known measurement system", term));
            }
            system
        }
    })?;

    Some(Preferences {
        measurement_system,
        user_favorites: favorites(saatchi.get("userFavorites")),
    })
}

/// Favorites are kept only when they form a list of artwork ids
///
/// PHP writes an empty list as `a:0:{}`, which is indistinguishable from an
/// empty map, so anything that is not a clean list collapses to no favorites.
fn favorites(value: Option<&Value>) -> Vec<u64> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    let ids: Option<Vec<u64>> = items
        .iter()
        .map(|item| item.as_u64().filter(|id| *id >= 1))
        .collect();

    ids.unwrap_or_else(|| {
        debug!("Discarding malformed userFavorites list of {} items", items.len());
        Vec::new()
    })
}

/// Resolves the session of a request through the legacy session cache
#[derive(Clone)]
pub struct SessionDecoder {
    store: Arc<dyn SessionStore>,
    key_prefix: String,
}

impl SessionDecoder {
    /// Create a decoder reading through `store` with the given cache key prefix
    pub fn new(store: Arc<dyn SessionStore>, key_prefix: impl Into<String>) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
        }
    }

    /// Cache key under which the session of `cookie` lives
    pub fn cache_key(&self, cookie: &str) -> String {
        format!("{}{}", self.key_prefix, cookie)
    }

    /// Load and decode the session belonging to `cookie`
    ///
    /// Performs at most one cache read. A failing cache is treated like a
    /// cache miss.
    pub async fn load(&self, cookie: Option<&str>) -> SessionResult<SessionRecord> {
        let cookie = match cookie {
            Some(cookie) if !cookie.is_empty() => cookie,
            _ => return Err(SessionError::NotAuthenticated),
        };

        let raw = match self.store.get(&self.cache_key(cookie)).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Session cache read failed, treating it as a miss: {}", e);
                None
            }
        };

        decode_session(Some(cookie), raw.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BODY: &str = "a:9:{s:5:\"email\";s:15:\"ada@example.com\";s:10:\"first_name\";s:3:\"Ada\";s:9:\"last_name\";s:0:\"\";s:2:\"id\";i:42;s:8:\"username\";N;s:12:\"isEaselAdmin\";b:1;s:17:\"is_limited_artist\";s:1:\"0\";s:12:\"user_type_id\";i:3;s:7:\"adminId\";i:7;}";

    fn blob(saatchi: &str) -> Vec<u8> {
        format!("Zend_Auth|a:1:{{s:7:\"storage\";a:1:{{s:4:\"body\";{}}}}}{}", BODY, saatchi).into_bytes()
    }

    #[test]
    fn test_cookie_is_checked_first() {
        let raw = blob("");
        assert!(matches!(
            decode_session(None, Some(raw.as_slice())),
            Err(SessionError::NotAuthenticated)
        ));
        assert!(matches!(
            decode_session(Some(""), Some(raw.as_slice())),
            Err(SessionError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_missing_blob() {
        assert!(matches!(
            decode_session(Some("abc"), None),
            Err(SessionError::DataMissing)
        ));
        assert!(matches!(
            decode_session(Some("abc"), Some(&b""[..])),
            Err(SessionError::DataMissing)
        ));
    }

    #[test]
    fn test_body_with_defaults() {
        let record = decode_session(Some("abc"), Some(blob("").as_slice())).unwrap();

        assert_eq!(record.email, "ada@example.com");
        assert_eq!(record.last_name, "");
        assert_eq!(record.username, None);
        assert!(record.is_easel_admin);
        assert!(!record.is_limited_artist);
        assert_eq!(record.user_type_id, 3);
        assert_eq!(record.admin_id, Some(7));
        assert_eq!(record.measurement_system, MeasurementSystem::Inch);
        assert!(record.user_favorites.is_empty());
    }

    #[test]
    fn test_missing_limited_artist_flag_reads_as_false() {
        let body = BODY.replacen("a:9:", "a:8:", 1).replace("s:17:\"is_limited_artist\";s:1:\"0\";", "");
        assert!(!body.contains("is_limited_artist"));
        let raw = format!("Zend_Auth|a:1:{{s:7:\"storage\";a:1:{{s:4:\"body\";{}}}}}", body).into_bytes();

        let record = decode_session(Some("abc"), Some(raw.as_slice())).unwrap();
        assert!(!record.is_limited_artist);
        assert_eq!(record.id, 42);
    }

    #[test]
    fn test_unknown_measurement_system_is_unreadable() {
        let raw = blob("Saatchi|a:1:{s:17:\"measurementSystem\";s:6:\"PARSEC\";}");

        match decode_session(Some("abc"), Some(raw.as_slice())) {
            Err(SessionError::Unreadable { reason, .. }) => {
                assert!(reason.contains("Saatchi.measurementSystem"), "got: {}", reason);
            }
            other => panic!("expected an unreadable session, got {:?}", other),
        }
    }

    #[test]
    fn test_limited_artist_flag_coercion() {
        let mut c = Checker::new();
        assert_eq!(limited_artist_flag(&mut c, Some(&json!(1))), Some(true));
        assert_eq!(limited_artist_flag(&mut c, Some(&json!(0))), Some(false));
        assert_eq!(limited_artist_flag(&mut c, Some(&json!("1"))), Some(true));
        assert_eq!(limited_artist_flag(&mut c, Some(&json!(true))), Some(true));
        assert_eq!(limited_artist_flag(&mut c, Some(&json!(null))), Some(false));
        assert_eq!(limited_artist_flag(&mut c, None), Some(false));
        assert!(c.violations().is_empty());

        assert_eq!(limited_artist_flag(&mut c, Some(&json!(2))), None);
        assert_eq!(limited_artist_flag(&mut c, Some(&json!("yes"))), None);
        assert_eq!(c.violations().len(), 2);
    }

    #[test]
    fn test_favorites_leniency() {
        assert_eq!(favorites(Some(&json!([5, 9, 2]))), vec![5, 9, 2]);
        assert!(favorites(Some(&json!({}))).is_empty());
        assert!(favorites(Some(&json!({ "3": 5 }))).is_empty());
        assert!(favorites(Some(&json!([5, 0]))).is_empty());
        assert!(favorites(Some(&json!("5"))).is_empty());
        assert!(favorites(None).is_empty());
    }
}
