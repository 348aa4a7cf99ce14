//! Access control for resolved commands.
//!
//! Room scope is checked before the permission level, so a command outside
//! its rooms never reveals what level it would need.

use super::trait_def::CommandSpec;
use crate::domain::entities::Room;

/// Outcome of the access check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// The room is not in the command's allow-list
    OutOfScope,
    Insufficient { required: i64, actual: i64 },
}

/// Whether an optional room allow-list admits `room_id`
pub fn room_permitted(room_ids: Option<&[String]>, room_id: &str) -> bool {
    match room_ids {
        None => true,
        Some(ids) => ids.iter().any(|id| id == room_id),
    }
}

/// Check both gates for `sender` invoking `spec` in `room`
pub fn check(spec: &CommandSpec, room: &Room, sender: &str) -> Access {
    if !room_permitted(spec.room_ids.as_deref(), &room.room_id) {
        return Access::OutOfScope;
    }

    let actual = room.user_level(sender);
    if actual < spec.power_level {
        return Access::Insufficient {
            required: spec.power_level,
            actual,
        };
    }

    Access::Granted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CommandInvocation, PowerLevels};
    use crate::plugins::trait_def::HandlerResult;

    async fn noop(_invocation: CommandInvocation) -> HandlerResult {
        Ok(())
    }

    fn room(id: &str, level: i64) -> Room {
        Room::new(id).with_power_levels(PowerLevels::new().with_user("@user:host", level))
    }

    #[test]
    fn test_unrestricted_command_is_granted() {
        let spec = CommandSpec::new("ping", "", noop);
        assert_eq!(check(&spec, &room("!any", 0), "@user:host"), Access::Granted);
    }

    #[test]
    fn test_room_scope_checked_before_level() {
        let spec = CommandSpec::new("pong", "", noop)
            .with_power_level(50)
            .in_rooms(["!abc"]);

        assert_eq!(check(&spec, &room("!xyz", 100), "@user:host"), Access::OutOfScope);
        assert_eq!(check(&spec, &room("!xyz", 0), "@user:host"), Access::OutOfScope);
    }

    #[test]
    fn test_insufficient_level() {
        let spec = CommandSpec::new("pong", "", noop)
            .with_power_level(50)
            .in_rooms(["!abc"]);

        assert_eq!(
            check(&spec, &room("!abc", 10), "@user:host"),
            Access::Insufficient { required: 50, actual: 10 }
        );
        assert_eq!(check(&spec, &room("!abc", 50), "@user:host"), Access::Granted);
    }

    #[test]
    fn test_unknown_user_uses_room_default() {
        let spec = CommandSpec::new("kick", "", noop).with_power_level(1);
        let room = Room::new("!abc").with_power_levels(PowerLevels::new().with_default(1));

        assert_eq!(check(&spec, &room, "@stranger:host"), Access::Granted);
    }

    #[test]
    fn test_room_permitted() {
        let rooms = vec!["!a".to_string(), "!b".to_string()];
        assert!(room_permitted(None, "!z"));
        assert!(room_permitted(Some(rooms.as_slice()), "!b"));
        assert!(!room_permitted(Some(rooms.as_slice()), "!z"));
        assert!(!room_permitted(Some(&[][..]), "!a"));
    }
}
