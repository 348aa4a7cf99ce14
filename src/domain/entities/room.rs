use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Power level table of a room.
///
/// Users without an explicit entry fall back to `users_default`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PowerLevels {
    #[serde(default)]
    pub users: HashMap<String, i64>,
    #[serde(default)]
    pub users_default: i64,
}

impl PowerLevels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: impl Into<String>, level: i64) -> Self {
        self.users.insert(user_id.into(), level);
        self
    }

    pub fn with_default(mut self, level: i64) -> Self {
        self.users_default = level;
        self
    }

    pub fn get_user_level(&self, user_id: &str) -> i64 {
        self.users.get(user_id).copied().unwrap_or(self.users_default)
    }
}

/// A chat room as reported by the protocol client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub room_id: String,
    pub power_levels: PowerLevels,
}

impl Room {
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            power_levels: PowerLevels::default(),
        }
    }

    pub fn with_power_levels(mut self, power_levels: PowerLevels) -> Self {
        self.power_levels = power_levels;
        self
    }

    /// Permission level of `user_id` in this room
    pub fn user_level(&self, user_id: &str) -> i64 {
        self.power_levels.get_user_level(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_level_wins_over_default() {
        let room = Room::new("!abc").with_power_levels(
            PowerLevels::new().with_user("@admin:host", 100).with_default(10),
        );

        assert_eq!(room.user_level("@admin:host"), 100);
        assert_eq!(room.user_level("@someone:host"), 10);
    }

    #[test]
    fn test_power_levels_deserialize_with_missing_fields() {
        let levels: PowerLevels = serde_json::from_str(r#"{"users": {"@a:host": 50}}"#).unwrap();
        assert_eq!(levels.get_user_level("@a:host"), 50);
        assert_eq!(levels.get_user_level("@b:host"), 0);
    }
}
