use serde::{Deserialize, Serialize};

/// Role badges carried by an incoming chat message, as reported by the
/// platform. Absence of every flag simply means a regular viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleFlags {
    pub broadcaster: bool,
    pub moderator: bool,
    pub vip: bool,
    pub subscriber: bool,
}

impl RoleFlags {
    /// Builds the flags from EventSub badge set ids (`broadcaster`,
    /// `moderator`, `vip`, `subscriber`/`founder`).
    pub fn from_badge_set_ids<'a, I>(set_ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut flags = RoleFlags::default();
        for id in set_ids {
            match id {
                "broadcaster" => flags.broadcaster = true,
                "moderator" => flags.moderator = true,
                "vip" => flags.vip = true,
                "subscriber" | "founder" => flags.subscriber = true,
                _ => {}
            }
        }
        flags
    }
}

/// One chat message as received from the platform layer. Constructed per
/// incoming event, consumed by a single dispatch pass, then dropped;
/// nothing retains these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub user_id: String,
    pub user_login: String,
    pub display_name: String,
    pub roles: RoleFlags,
    /// Platform message id, usable as a reply-parent for threaded replies.
    pub message_id: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_mapping_covers_founder() {
        let flags = RoleFlags::from_badge_set_ids(["founder", "vip"]);
        assert!(flags.subscriber);
        assert!(flags.vip);
        assert!(!flags.moderator);
    }

    #[test]
    fn unknown_badges_are_ignored() {
        let flags = RoleFlags::from_badge_set_ids(["bits-leader", "sub-gifter"]);
        assert_eq!(flags, RoleFlags::default());
    }
}
