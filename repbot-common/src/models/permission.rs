use serde::{Deserialize, Serialize};

use crate::models::chat::ChatMessage;

/// Ordered privilege levels. The derived `Ord` is the total order every
/// "at or above" check relies on, so the variant order here is load-bearing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    Everyone,
    Subscriber,
    Vip,
    Helper,
    Moderator,
    Broadcaster,
    Owner,
}

/// What a handler demands before it runs its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionRequirement {
    AtLeast(PermissionLevel),
    Exactly(PermissionLevel),
    OneOf(Vec<PermissionLevel>),
}

/// Maps a message's sender to a privilege level and answers permission
/// checks. Pure: role flags are already attached to the message and the
/// allow-lists are static config, so there is no failure mode: a sender
/// with no badges is simply `Everyone`.
#[derive(Debug, Clone, Default)]
pub struct PermissionEvaluator {
    owner_ids: Vec<String>,
    helper_ids: Vec<String>,
}

impl PermissionEvaluator {
    pub fn new(owner_ids: Vec<String>, helper_ids: Vec<String>) -> Self {
        Self {
            owner_ids,
            helper_ids,
        }
    }

    /// Highest level the sender qualifies for.
    pub fn level_of(&self, msg: &ChatMessage) -> PermissionLevel {
        if self.owner_ids.iter().any(|id| id == &msg.user_id) {
            PermissionLevel::Owner
        } else if msg.roles.broadcaster {
            PermissionLevel::Broadcaster
        } else if msg.roles.moderator {
            PermissionLevel::Moderator
        } else if self.helper_ids.iter().any(|id| id == &msg.user_id) {
            PermissionLevel::Helper
        } else if msg.roles.vip {
            PermissionLevel::Vip
        } else if msg.roles.subscriber {
            PermissionLevel::Subscriber
        } else {
            PermissionLevel::Everyone
        }
    }

    /// An owner-listed sender satisfies every requirement, including
    /// `Exactly` checks for levels they do not hold.
    pub fn meets(&self, msg: &ChatMessage, requirement: &PermissionRequirement) -> bool {
        if self.owner_ids.iter().any(|id| id == &msg.user_id) {
            return true;
        }
        let level = self.level_of(msg);
        match requirement {
            PermissionRequirement::AtLeast(min) => level >= *min,
            PermissionRequirement::Exactly(exact) => level == *exact,
            PermissionRequirement::OneOf(levels) => levels.contains(&level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::RoleFlags;

    fn msg(user_id: &str, roles: RoleFlags) -> ChatMessage {
        ChatMessage {
            user_id: user_id.to_string(),
            user_login: "viewer".to_string(),
            display_name: "Viewer".to_string(),
            roles,
            message_id: "m1".to_string(),
            text: String::new(),
        }
    }

    #[test]
    fn no_badges_resolves_to_everyone() {
        let eval = PermissionEvaluator::default();
        assert_eq!(
            eval.level_of(&msg("1", RoleFlags::default())),
            PermissionLevel::Everyone
        );
    }

    #[test]
    fn highest_matching_level_wins() {
        let eval = PermissionEvaluator::default();
        let roles = RoleFlags {
            moderator: true,
            subscriber: true,
            ..RoleFlags::default()
        };
        assert_eq!(eval.level_of(&msg("1", roles)), PermissionLevel::Moderator);
    }

    #[test]
    fn at_least_is_monotonic() {
        let eval = PermissionEvaluator::new(vec![], vec!["42".to_string()]);
        let helper = msg("42", RoleFlags::default());
        // Passing at Helper implies passing every strictly lower bar.
        for lower in [
            PermissionLevel::Everyone,
            PermissionLevel::Subscriber,
            PermissionLevel::Vip,
            PermissionLevel::Helper,
        ] {
            assert!(eval.meets(&helper, &PermissionRequirement::AtLeast(lower)));
        }
        assert!(!eval.meets(&helper, &PermissionRequirement::AtLeast(PermissionLevel::Moderator)));
    }

    #[test]
    fn owner_bypasses_every_requirement() {
        let eval = PermissionEvaluator::new(vec!["7".to_string()], vec![]);
        let owner = msg("7", RoleFlags::default());
        assert!(eval.meets(&owner, &PermissionRequirement::Exactly(PermissionLevel::Broadcaster)));
        assert!(eval.meets(&owner, &PermissionRequirement::OneOf(vec![PermissionLevel::Vip])));
    }

    #[test]
    fn exactly_rejects_higher_levels() {
        let eval = PermissionEvaluator::default();
        let broadcaster = msg(
            "1",
            RoleFlags {
                broadcaster: true,
                ..RoleFlags::default()
            },
        );
        assert!(!eval.meets(
            &broadcaster,
            &PermissionRequirement::Exactly(PermissionLevel::Moderator)
        ));
    }
}
