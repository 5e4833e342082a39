//! Session record model
//!
//! Field names on the wire follow the keys of the legacy Zend auth body, which
//! is what consumers of `/all-client-data` already read.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unit system the user browses the catalog in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeasurementSystem {
    #[default]
    Inch,
    Centimeter,
}

impl MeasurementSystem {
    pub fn parse(term: &str) -> Option<Self> {
        match term {
            "INCH" => Some(MeasurementSystem::Inch),
            "CENTIMETER" => Some(MeasurementSystem::Centimeter),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementSystem::Inch => "INCH",
            MeasurementSystem::Centimeter => "CENTIMETER",
        }
    }
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated user session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub id: u64,
    /// `None` when the legacy account never picked a username
    pub username: Option<String>,
    #[serde(rename = "isEaselAdmin")]
    pub is_easel_admin: bool,
    pub is_limited_artist: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified_to_sell: Option<bool>,
    pub user_type_id: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_full_name: Option<String>,
    #[serde(rename = "adminId", default, skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in_timer_started_at: Option<String>,
    #[serde(rename = "measurementSystem")]
    pub measurement_system: MeasurementSystem,
    /// Favorited artwork ids, in the order the legacy application stored them
    #[serde(rename = "userFavorites")]
    pub user_favorites: Vec<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_measurement_system_terms() {
        assert_eq!(MeasurementSystem::parse("INCH"), Some(MeasurementSystem::Inch));
        assert_eq!(
            MeasurementSystem::parse("CENTIMETER"),
            Some(MeasurementSystem::Centimeter)
        );
        assert_eq!(MeasurementSystem::parse("inch"), None);
        assert_eq!(MeasurementSystem::default().to_string(), "INCH");
    }

    #[test]
    fn test_record_serializes_with_legacy_keys() {
        let record = SessionRecord {
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            id: 42,
            username: None,
            is_easel_admin: false,
            is_limited_artist: true,
            is_verified_to_sell: None,
            user_type_id: 1,
            admin_full_name: None,
            admin_id: None,
            check_in_timer_started_at: None,
            measurement_system: MeasurementSystem::Centimeter,
            user_favorites: vec![3, 1],
        };

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "email": "ada@example.com",
                "first_name": "Ada",
                "last_name": "Lovelace",
                "id": 42,
                "username": null,
                "isEaselAdmin": false,
                "is_limited_artist": true,
                "user_type_id": 1,
                "measurementSystem": "CENTIMETER",
                "userFavorites": [3, 1],
            })
        );
    }
}
