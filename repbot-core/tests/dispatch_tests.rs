//! End-to-end tests for the dispatch core: command registry, event
//! registry lifecycle ordering, and the redemption registry, driven
//! against a recording fake of the outbound Twitch API.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use repbot_common::Error;
use repbot_common::config::BotConfig;
use repbot_common::models::{ChatMessage, ChatSettings, RewardDefinition, RoleFlags};
use repbot_common::traits::{AnnouncementColor, TwitchApi};

use repbot_core::eventbus::{BotEvent, TwitchEvent};
use repbot_core::platforms::twitch_eventsub::events::{
    ChannelPointsRedemptionAdd, RedemptionRewardData,
};
use repbot_core::services::builtin_commands::register_builtin_commands;
use repbot_core::services::builtin_redeems::register_builtin_redeems;
use repbot_core::services::{
    BotContext, BroadcastIdentity, CommandHandler, CommandService, EventDescriptor, EventHandler,
    EventRegistry, RedeemService, SetupOutcome, Trigger,
};

// ---------------------------------------------------------------------------
// Recording fake for the outbound capability trait
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RecordingApi {
    messages: Mutex<Vec<(String, Option<String>)>>,
    announcements: Mutex<Vec<(String, String)>>,
    emote_only_calls: Mutex<Vec<bool>>,
    redemption_updates: Mutex<Vec<(String, String, String)>>,
    timeouts: Mutex<Vec<(String, u32)>>,
    emote_mode_active: AtomicBool,
}

impl RecordingApi {
    fn with_emote_mode(active: bool) -> Self {
        let api = Self::default();
        api.emote_mode_active.store(active, Ordering::SeqCst);
        api
    }

    fn messages(&self) -> Vec<(String, Option<String>)> {
        self.messages.lock().unwrap().clone()
    }

    fn announcements(&self) -> Vec<(String, String)> {
        self.announcements.lock().unwrap().clone()
    }

    fn emote_only_calls(&self) -> Vec<bool> {
        self.emote_only_calls.lock().unwrap().clone()
    }

    fn redemption_updates(&self) -> Vec<(String, String, String)> {
        self.redemption_updates.lock().unwrap().clone()
    }

    fn is_silent(&self) -> bool {
        self.messages().is_empty()
            && self.announcements().is_empty()
            && self.emote_only_calls().is_empty()
            && self.redemption_updates().is_empty()
            && self.timeouts.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl TwitchApi for RecordingApi {
    async fn send_chat_message(&self, text: &str, reply_to: Option<&str>) -> Result<(), Error> {
        self.messages
            .lock()
            .unwrap()
            .push((text.to_string(), reply_to.map(String::from)));
        Ok(())
    }

    async fn send_announcement(&self, text: &str, color: AnnouncementColor) -> Result<(), Error> {
        self.announcements
            .lock()
            .unwrap()
            .push((text.to_string(), color.as_str().to_string()));
        Ok(())
    }

    async fn get_chat_settings(&self) -> Result<ChatSettings, Error> {
        Ok(ChatSettings {
            emote_mode: self.emote_mode_active.load(Ordering::SeqCst),
            ..ChatSettings::default()
        })
    }

    async fn set_emote_only(&self, enabled: bool) -> Result<(), Error> {
        self.emote_only_calls.lock().unwrap().push(enabled);
        self.emote_mode_active.store(enabled, Ordering::SeqCst);
        Ok(())
    }

    async fn ban_user(&self, _user_id: &str, _reason: &str) -> Result<(), Error> {
        Ok(())
    }

    async fn timeout_user(
        &self,
        user_id: &str,
        duration_secs: u32,
        _reason: &str,
    ) -> Result<(), Error> {
        self.timeouts
            .lock()
            .unwrap()
            .push((user_id.to_string(), duration_secs));
        Ok(())
    }

    async fn add_moderator(&self, _user_id: &str) -> Result<(), Error> {
        Ok(())
    }

    async fn remove_moderator(&self, _user_id: &str) -> Result<(), Error> {
        Ok(())
    }

    async fn add_vip(&self, _user_id: &str) -> Result<(), Error> {
        Ok(())
    }

    async fn remove_vip(&self, _user_id: &str) -> Result<(), Error> {
        Ok(())
    }

    async fn create_custom_reward(&self, def: &RewardDefinition) -> Result<String, Error> {
        Ok(format!("reward-{}", def.title.to_lowercase().replace(' ', "-")))
    }

    async fn delete_custom_reward(&self, _reward_id: &str) -> Result<(), Error> {
        Ok(())
    }

    async fn update_redemption_status(
        &self,
        reward_id: &str,
        redemption_id: &str,
        status: &str,
    ) -> Result<(), Error> {
        self.redemption_updates.lock().unwrap().push((
            reward_id.to_string(),
            redemption_id.to_string(),
            status.to_string(),
        ));
        Ok(())
    }

    async fn start_commercial(&self, _length_secs: u32) -> Result<(), Error> {
        Ok(())
    }

    async fn is_stream_live(&self) -> Result<bool, Error> {
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn test_config() -> BotConfig {
    serde_json::from_value(json!({
        "channel": {
            "broadcaster_id": "123",
            "broadcaster_login": "streamer",
            "bot_user_id": "456",
            "owner_ids": ["1"],
            "helper_ids": ["99"]
        },
        "pushups": {
            "infractions": { "swear": 5 },
            "daily_goal": 100
        },
        "timers": {
            "emote_only_minutes": 1,
            "timeout_seconds": 60,
            "commercial_seconds": 90
        },
        "links": { "discord_invite": "https://discord.gg/example" }
    }))
    .expect("test config should deserialize")
}

fn test_context(api: Arc<RecordingApi>) -> Arc<BotContext> {
    Arc::new(BotContext::new(Arc::new(test_config()), api))
}

fn chat_msg(user_id: &str, text: &str, roles: RoleFlags) -> ChatMessage {
    ChatMessage {
        user_id: user_id.to_string(),
        user_login: "someone".to_string(),
        display_name: "Someone".to_string(),
        roles,
        message_id: "m1".to_string(),
        text: text.to_string(),
    }
}

fn redemption_event(title: &str) -> ChannelPointsRedemptionAdd {
    ChannelPointsRedemptionAdd {
        id: "redemption-1".to_string(),
        broadcaster_user_id: "123".to_string(),
        broadcaster_user_login: "streamer".to_string(),
        broadcaster_user_name: "Streamer".to_string(),
        user_id: "456".to_string(),
        user_login: "viewer".to_string(),
        user_name: "Viewer".to_string(),
        user_input: String::new(),
        status: "unfulfilled".to_string(),
        redeemed_at: Utc::now(),
        reward: RedemptionRewardData {
            id: "r1".to_string(),
            title: title.to_string(),
            cost: 2000,
            prompt: String::new(),
        },
    }
}

async fn builtin_command_service(ctx: Arc<BotContext>) -> CommandService {
    let mut service = CommandService::new(ctx);
    register_builtin_commands(&mut service).expect("builtin commands should register");
    service
}

async fn dispatch_and_wait(service: &CommandService, msg: &ChatMessage) {
    for handle in service.handle_chat_message(msg).await {
        handle.await.expect("handler task should not panic");
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pushups_report_at_zero_and_nonzero() {
    let api = Arc::new(RecordingApi::default());
    let ctx = test_context(api.clone());
    let service = builtin_command_service(ctx.clone()).await;

    dispatch_and_wait(&service, &chat_msg("7", "!pushups", RoleFlags::default())).await;
    ctx.pushups.set(5);
    dispatch_and_wait(&service, &chat_msg("7", "!pushups", RoleFlags::default())).await;

    let messages = api.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].0, "streamer has no pushups to do!");
    assert_eq!(messages[1].0, "streamer has 5 pushups to do!");
    // Replies are threaded onto the triggering message.
    assert_eq!(messages[0].1.as_deref(), Some("m1"));
}

#[tokio::test]
async fn setpushups_from_helper_accepts_negative() {
    let api = Arc::new(RecordingApi::default());
    let ctx = test_context(api.clone());
    let service = builtin_command_service(ctx.clone()).await;

    dispatch_and_wait(&service, &chat_msg("99", "!setpushups -3", RoleFlags::default())).await;

    assert_eq!(ctx.pushups.get(), -3);
    assert_eq!(api.messages()[0].0, "Pushup counter set to -3.");
}

#[tokio::test]
async fn setpushups_from_viewer_is_silent() {
    let api = Arc::new(RecordingApi::default());
    let ctx = test_context(api.clone());
    let service = builtin_command_service(ctx.clone()).await;

    dispatch_and_wait(&service, &chat_msg("7", "!setpushups 10", RoleFlags::default())).await;

    assert_eq!(ctx.pushups.get(), 0);
    assert!(api.is_silent());
}

#[tokio::test]
async fn setpushups_bad_argument_gets_corrective_reply() {
    let api = Arc::new(RecordingApi::default());
    let ctx = test_context(api.clone());
    let service = builtin_command_service(ctx.clone()).await;

    dispatch_and_wait(&service, &chat_msg("99", "!setpushups lots", RoleFlags::default())).await;

    assert_eq!(ctx.pushups.get(), 0);
    assert_eq!(api.messages()[0].0, "I don't understand that parameter.");
}

#[tokio::test]
async fn standalone_and_daily_counters_diverge_on_overshoot() {
    let api = Arc::new(RecordingApi::default());
    let ctx = test_context(api.clone());
    let service = builtin_command_service(ctx.clone()).await;

    ctx.pushups.set(5);
    ctx.daily_pushups.reset(5);

    dispatch_and_wait(&service, &chat_msg("99", "!didpushups 8", RoleFlags::default())).await;
    dispatch_and_wait(&service, &chat_msg("99", "!did24 8", RoleFlags::default())).await;

    // The standalone counter goes into credit; the daily one clamps.
    assert_eq!(ctx.pushups.get(), -3);
    assert_eq!(ctx.daily_pushups.remaining(), 0);
}

#[tokio::test]
async fn infraction_applies_configured_increment() {
    let api = Arc::new(RecordingApi::default());
    let ctx = test_context(api.clone());
    let service = builtin_command_service(ctx.clone()).await;

    dispatch_and_wait(&service, &chat_msg("99", "!infraction swear", RoleFlags::default())).await;
    assert_eq!(ctx.pushups.get(), 5);

    dispatch_and_wait(&service, &chat_msg("99", "!infraction yodel", RoleFlags::default())).await;
    assert_eq!(ctx.pushups.get(), 5);
    assert_eq!(api.messages().last().unwrap().0, "I don't know that infraction.");
}

#[tokio::test]
async fn shoutout_requires_helper_and_fails_silently() {
    let api = Arc::new(RecordingApi::default());
    let ctx = test_context(api.clone());
    let service = builtin_command_service(ctx.clone()).await;

    dispatch_and_wait(&service, &chat_msg("7", "!so someuser", RoleFlags::default())).await;
    assert!(api.is_silent());

    dispatch_and_wait(&service, &chat_msg("99", "!so someuser", RoleFlags::default())).await;
    let announcements = api.announcements();
    assert_eq!(announcements.len(), 1);
    assert!(announcements[0].0.contains("someuser"));
}

#[tokio::test]
async fn owner_bypasses_permission_gates() {
    let api = Arc::new(RecordingApi::default());
    let ctx = test_context(api.clone());
    let service = builtin_command_service(ctx.clone()).await;

    // User id "1" is owner-listed but carries no badges.
    dispatch_and_wait(&service, &chat_msg("1", "!setpushups 12", RoleFlags::default())).await;
    assert_eq!(ctx.pushups.get(), 12);
}

#[tokio::test]
async fn overlapping_prefixes_do_not_double_fire() {
    let api = Arc::new(RecordingApi::default());
    let ctx = test_context(api.clone());
    let service = builtin_command_service(ctx.clone()).await;

    dispatch_and_wait(&service, &chat_msg("7", "!thetower", RoleFlags::default())).await;

    let messages = api.messages();
    assert_eq!(messages.len(), 1, "only !thetower may fire");
    assert!(messages[0].0.contains("idle tower-defense"));
}

#[tokio::test]
async fn unmatched_message_has_zero_side_effects() {
    let api = Arc::new(RecordingApi::default());
    let ctx = test_context(api.clone());
    let service = builtin_command_service(ctx.clone()).await;

    dispatch_and_wait(&service, &chat_msg("7", "hello world", RoleFlags::default())).await;

    assert!(api.is_silent());
    assert_eq!(ctx.pushups.get(), 0);
}

// ---------------------------------------------------------------------------
// Error isolation
// ---------------------------------------------------------------------------

struct FailingTriggerHandler {
    trigger: Trigger,
}

#[async_trait]
impl CommandHandler for FailingTriggerHandler {
    fn id(&self) -> &str {
        "failing_trigger"
    }

    fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    async fn matches(&self, _msg: &ChatMessage) -> Result<bool, Error> {
        Err(Error::Parse("predicate blew up".into()))
    }

    async fn execute(&self, _msg: &ChatMessage, _ctx: &Arc<BotContext>) -> Result<(), Error> {
        panic!("must never run when the trigger errors");
    }
}

struct FailingBodyHandler {
    trigger: Trigger,
}

#[async_trait]
impl CommandHandler for FailingBodyHandler {
    fn id(&self) -> &str {
        "failing_body"
    }

    fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    async fn execute(&self, _msg: &ChatMessage, _ctx: &Arc<BotContext>) -> Result<(), Error> {
        Err(Error::Platform("body failed".into()))
    }
}

struct EchoHandler {
    trigger: Trigger,
}

#[async_trait]
impl CommandHandler for EchoHandler {
    fn id(&self) -> &str {
        "echo"
    }

    fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    async fn execute(&self, msg: &ChatMessage, ctx: &Arc<BotContext>) -> Result<(), Error> {
        ctx.api.send_chat_message(&msg.text, None).await
    }
}

#[tokio::test]
async fn trigger_error_skips_handler_but_not_the_pass() {
    let api = Arc::new(RecordingApi::default());
    let ctx = test_context(api.clone());

    let mut service = CommandService::new(ctx);
    service.register(Arc::new(FailingTriggerHandler {
        trigger: Trigger::Dynamic,
    }));
    service.register(Arc::new(EchoHandler {
        trigger: Trigger::exact("!echo").unwrap(),
    }));

    dispatch_and_wait(&service, &chat_msg("7", "!echo", RoleFlags::default())).await;

    assert_eq!(api.messages().len(), 1);
}

#[tokio::test]
async fn body_error_does_not_stop_other_handlers() {
    let api = Arc::new(RecordingApi::default());
    let ctx = test_context(api.clone());

    let mut service = CommandService::new(ctx);
    service.register(Arc::new(FailingBodyHandler {
        trigger: Trigger::exact("!echo").unwrap(),
    }));
    service.register(Arc::new(EchoHandler {
        trigger: Trigger::exact("!echo").unwrap(),
    }));

    dispatch_and_wait(&service, &chat_msg("7", "!echo", RoleFlags::default())).await;

    assert_eq!(api.messages().len(), 1);
}

// ---------------------------------------------------------------------------
// Lifecycle ordering
// ---------------------------------------------------------------------------

struct OrderedSetupHandler {
    name: &'static str,
    priority: i32,
    outcome: SetupOutcome,
    log: Arc<Mutex<Vec<String>>>,
    delay_ms: u64,
}

#[async_trait]
impl EventHandler for OrderedSetupHandler {
    fn id(&self) -> &str {
        self.name
    }

    fn descriptor(&self, _identity: &BroadcastIdentity) -> EventDescriptor {
        EventDescriptor::Startup {
            priority: self.priority,
        }
    }

    async fn setup(&self, _ctx: &Arc<BotContext>) -> SetupOutcome {
        self.log.lock().unwrap().push(format!("start:{}", self.name));
        if self.delay_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.delay_ms)).await;
        }
        self.log.lock().unwrap().push(format!("end:{}", self.name));
        self.outcome.clone()
    }
}

fn identity() -> BroadcastIdentity {
    BroadcastIdentity {
        broadcaster_user_id: "123".to_string(),
        bot_user_id: "456".to_string(),
    }
}

#[tokio::test]
async fn setup_runs_in_strict_priority_order() {
    let api = Arc::new(RecordingApi::default());
    let ctx = test_context(api);
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut registry = EventRegistry::new(ctx);
    // Registered out of order on purpose; the slow one has the lowest
    // priority and must still fully resolve first.
    registry.register(
        Arc::new(OrderedSetupHandler {
            name: "late",
            priority: 999,
            outcome: SetupOutcome::Ready,
            log: log.clone(),
            delay_ms: 0,
        }),
        &identity(),
    );
    registry.register(
        Arc::new(OrderedSetupHandler {
            name: "early",
            priority: 0,
            outcome: SetupOutcome::Ready,
            log: log.clone(),
            delay_ms: 50,
        }),
        &identity(),
    );

    registry.run_setup().await;

    let entries = log.lock().unwrap().clone();
    assert_eq!(entries, vec!["start:early", "end:early", "start:late", "end:late"]);
}

#[tokio::test]
async fn failed_and_skipped_setups_do_not_abort_the_sequence() {
    let api = Arc::new(RecordingApi::default());
    let ctx = test_context(api);
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut registry = EventRegistry::new(ctx);
    registry.register(
        Arc::new(OrderedSetupHandler {
            name: "fails",
            priority: 1,
            outcome: SetupOutcome::Failed("nope".into()),
            log: log.clone(),
            delay_ms: 0,
        }),
        &identity(),
    );
    registry.register(
        Arc::new(OrderedSetupHandler {
            name: "skipped",
            priority: 2,
            outcome: SetupOutcome::Skipped,
            log: log.clone(),
            delay_ms: 0,
        }),
        &identity(),
    );
    registry.register(
        Arc::new(OrderedSetupHandler {
            name: "runs",
            priority: 3,
            outcome: SetupOutcome::Ready,
            log: log.clone(),
            delay_ms: 0,
        }),
        &identity(),
    );

    registry.run_setup().await;

    let entries = log.lock().unwrap().clone();
    assert_eq!(
        entries,
        vec![
            "start:fails",
            "end:fails",
            "start:skipped",
            "end:skipped",
            "start:runs",
            "end:runs"
        ]
    );
}

struct CountingPlatformHandler {
    name: &'static str,
    event_type: &'static str,
    hits: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl EventHandler for CountingPlatformHandler {
    fn id(&self) -> &str {
        self.name
    }

    fn descriptor(&self, identity: &BroadcastIdentity) -> EventDescriptor {
        EventDescriptor::Platform {
            event_type: self.event_type.to_string(),
            version: "1".to_string(),
            condition: json!({ "broadcaster_user_id": identity.broadcaster_user_id }),
        }
    }

    async fn execute(&self, _event: &BotEvent, _ctx: &Arc<BotContext>) -> Result<(), Error> {
        self.hits.lock().unwrap().push(self.name.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn platform_events_reach_only_subscribed_handlers() {
    let api = Arc::new(RecordingApi::default());
    let ctx = test_context(api);
    let hits = Arc::new(Mutex::new(Vec::new()));

    let mut registry = EventRegistry::new(ctx);
    registry.register(
        Arc::new(CountingPlatformHandler {
            name: "on_follow",
            event_type: "channel.follow",
            hits: hits.clone(),
        }),
        &identity(),
    );
    registry.register(
        Arc::new(CountingPlatformHandler {
            name: "on_raid",
            event_type: "channel.raid",
            hits: hits.clone(),
        }),
        &identity(),
    );

    let event = BotEvent::Twitch(TwitchEvent::ChannelFollow(
        serde_json::from_value(json!({
            "user_id": "9",
            "user_login": "follower",
            "user_name": "Follower",
            "broadcaster_user_id": "123",
            "broadcaster_user_login": "streamer",
            "broadcaster_user_name": "Streamer",
            "followed_at": "2024-11-02T18:00:00Z"
        }))
        .unwrap(),
    ));

    for handle in registry.dispatch(&event) {
        handle.await.unwrap();
    }

    assert_eq!(hits.lock().unwrap().clone(), vec!["on_follow"]);
}

#[tokio::test]
async fn subscriptions_are_deduped_by_event_type() {
    let api = Arc::new(RecordingApi::default());
    let ctx = test_context(api);
    let hits = Arc::new(Mutex::new(Vec::new()));

    let mut registry = EventRegistry::new(ctx);
    for name in ["a", "b"] {
        registry.register(
            Arc::new(CountingPlatformHandler {
                name,
                event_type: "channel.follow",
                hits: hits.clone(),
            }),
            &identity(),
        );
    }

    let subs = registry.subscriptions();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].0, "channel.follow");
}

// ---------------------------------------------------------------------------
// Redemptions
// ---------------------------------------------------------------------------

async fn builtin_redeem_service(ctx: Arc<BotContext>) -> RedeemService {
    let mut service = RedeemService::new(ctx);
    register_builtin_redeems(&mut service).expect("builtin redeems should register");
    service
}

#[tokio::test]
async fn emote_only_redeem_cancels_when_already_active() {
    let api = Arc::new(RecordingApi::with_emote_mode(true));
    let ctx = test_context(api.clone());
    let service = builtin_redeem_service(ctx).await;

    for handle in service
        .handle_incoming_redeem(&redemption_event("Emote-Only Chat"))
        .await
    {
        handle.await.unwrap();
    }

    let updates = api.redemption_updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].2, "CANCELED");
    // No settings change happened.
    assert!(api.emote_only_calls().is_empty());
    // And the user got an apology.
    assert!(api.messages()[0].0.contains("already on"));
}

#[tokio::test(start_paused = true)]
async fn emote_only_redeem_resolves_on_a_timer() {
    let api = Arc::new(RecordingApi::default());
    let ctx = test_context(api.clone());
    let service = builtin_redeem_service(ctx).await;

    for handle in service
        .handle_incoming_redeem(&redemption_event("Emote-Only Chat"))
        .await
    {
        handle.await.unwrap();
    }

    // The body has returned: emote-only is on, the redemption is still
    // pending, nothing resolved yet.
    assert_eq!(api.emote_only_calls(), vec![true]);
    assert!(api.redemption_updates().is_empty());
    assert_eq!(service.pending_count(), 1);

    // Let the 1-minute timer fire.
    tokio::time::advance(tokio::time::Duration::from_secs(61)).await;
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }

    assert_eq!(api.emote_only_calls(), vec![true, false]);
    let updates = api.redemption_updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].2, "FULFILLED");
    assert_eq!(service.pending_count(), 0);
}

#[tokio::test]
async fn pushup_reward_parses_increment_from_title() {
    let api = Arc::new(RecordingApi::default());
    let ctx = test_context(api.clone());
    let service = builtin_redeem_service(ctx.clone()).await;

    for handle in service
        .handle_incoming_redeem(&redemption_event("+10 Pushups"))
        .await
    {
        handle.await.unwrap();
    }

    assert_eq!(ctx.pushups.get(), 10);
    let updates = api.redemption_updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].2, "FULFILLED");
}

#[tokio::test]
async fn unmatched_reward_title_is_ignored() {
    let api = Arc::new(RecordingApi::default());
    let ctx = test_context(api.clone());
    let service = builtin_redeem_service(ctx).await;

    let handles = service
        .handle_incoming_redeem(&redemption_event("Hydrate!"))
        .await;
    assert!(handles.is_empty());
    assert!(api.is_silent());
    assert_eq!(service.pending_count(), 0);
}

#[tokio::test]
async fn timeout_redeem_times_out_the_redeemer() {
    let api = Arc::new(RecordingApi::default());
    let ctx = test_context(api.clone());
    let service = builtin_redeem_service(ctx).await;

    for handle in service
        .handle_incoming_redeem(&redemption_event("Timeout Me"))
        .await
    {
        handle.await.unwrap();
    }

    let timeouts = api.timeouts.lock().unwrap().clone();
    assert_eq!(timeouts, vec![("456".to_string(), 60)]);
    assert_eq!(api.redemption_updates()[0].2, "FULFILLED");
}
