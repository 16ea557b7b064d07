// File: repbot-common/src/models/mod.rs
pub mod chat;
pub mod permission;
pub mod redeem;
pub mod settings;

pub use chat::{ChatMessage, RoleFlags};
pub use permission::{PermissionEvaluator, PermissionLevel, PermissionRequirement};
pub use redeem::{Redemption, RewardDefinition, RewardInfo};
pub use settings::ChatSettings;
