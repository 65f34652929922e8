//! End-to-end conversation tests over the in-memory store
//! Run with: cargo test --test conversation_flow

mod common;

use std::time::Duration;

use common::{harness, harness_with_ttl, FakeBackend};
use proptest::prelude::*;
use tablet_bot::application::conversation::{Outcome, UserSessions};
use tablet_bot::application::replies;
use tablet_bot::domain::entities::{ChatUpdate, ConversationState, ReminderTime};
use tablet_bot::domain::traits::StateStore;

const CHAT: i64 = 500;
const USER: i64 = 42;

async fn state_of(store: &dyn StateStore, user_id: i64) -> Option<i64> {
    store.get_int(&UserSessions::state_key(user_id)).await.unwrap()
}

#[tokio::test]
async fn test_start_greets_without_touching_state() {
    let h = harness(FakeBackend::default());

    let outcome = h.machine.process(&h.bot, &ChatUpdate::command(CHAT, USER, "start")).await;

    assert!(matches!(outcome, Outcome::Dispatched(_)));
    assert_eq!(h.bot.sent(), vec![(CHAT, replies::GREETING.to_string())]);
    assert_eq!(state_of(h.store.as_ref(), USER).await, None);
}

#[tokio::test]
async fn test_full_creation_flow() {
    let h = harness(FakeBackend::default());

    h.machine.process(&h.bot, &ChatUpdate::command(CHAT, USER, "create")).await;
    assert_eq!(h.bot.last_text().as_deref(), Some(replies::ASK_NAME));
    assert_eq!(state_of(h.store.as_ref(), USER).await, Some(1));

    h.machine.process(&h.bot, &ChatUpdate::text(CHAT, USER, "Vitamin D")).await;
    assert_eq!(h.bot.last_text().as_deref(), Some(replies::ASK_TIME));
    assert_eq!(state_of(h.store.as_ref(), USER).await, Some(2));
    assert_eq!(
        h.store.get(&UserSessions::draft_key(USER)).await.unwrap().as_deref(),
        Some("Vitamin D")
    );

    h.machine.process(&h.bot, &ChatUpdate::text(CHAT, USER, "9:30")).await;

    let requests = h.backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].user_id(), USER);
    assert_eq!(requests[0].name(), "Vitamin D");
    assert_eq!(requests[0].time(), ReminderTime::new(9, 30).unwrap());

    let reply = h.bot.last_text().unwrap();
    assert!(reply.contains('9') && reply.contains("30"), "unexpected reply: {}", reply);
    assert_eq!(state_of(h.store.as_ref(), USER).await, Some(0));
    assert_eq!(h.store.get(&UserSessions::draft_key(USER)).await.unwrap(), None);
}

#[tokio::test]
async fn test_out_of_range_time_is_rejected() {
    let h = harness(FakeBackend::default());

    h.machine.process(&h.bot, &ChatUpdate::command(CHAT, USER, "create")).await;
    h.machine.process(&h.bot, &ChatUpdate::text(CHAT, USER, "Aspirin")).await;
    h.machine.process(&h.bot, &ChatUpdate::text(CHAT, USER, "25:30")).await;

    assert_eq!(h.bot.last_text().as_deref(), Some(replies::INVALID_TIME));
    assert_eq!(state_of(h.store.as_ref(), USER).await, Some(2));
    assert!(h.backend.requests().is_empty());

    // Still waiting for a time
    h.machine.process(&h.bot, &ChatUpdate::text(CHAT, USER, " 23:59 ")).await;
    assert_eq!(h.backend.requests().len(), 1);
    assert_eq!(h.backend.requests()[0].name(), "Aspirin");
}

#[tokio::test]
async fn test_blank_name_is_reprompted() {
    let h = harness(FakeBackend::default());

    h.machine.process(&h.bot, &ChatUpdate::command(CHAT, USER, "create")).await;
    h.machine.process(&h.bot, &ChatUpdate::text(CHAT, USER, "   ")).await;

    assert_eq!(h.bot.last_text().as_deref(), Some(replies::ASK_NAME));
    assert_eq!(state_of(h.store.as_ref(), USER).await, Some(1));
}

#[tokio::test]
async fn test_backend_error_is_shown_verbatim() {
    let h = harness(FakeBackend::failing("reminder limit reached"));

    h.machine.process(&h.bot, &ChatUpdate::command(CHAT, USER, "create")).await;
    h.machine.process(&h.bot, &ChatUpdate::text(CHAT, USER, "Iron")).await;
    h.machine.process(&h.bot, &ChatUpdate::text(CHAT, USER, "8:00")).await;

    assert_eq!(h.bot.last_text().as_deref(), Some("reminder limit reached"));
    assert_eq!(state_of(h.store.as_ref(), USER).await, Some(0));
}

#[tokio::test]
async fn test_backend_error_hidden_when_not_exposed() {
    let mut h = harness(FakeBackend::failing("stack trace: db down"));
    h.machine = h.machine.with_backend_errors_exposed(false);

    h.machine.process(&h.bot, &ChatUpdate::command(CHAT, USER, "create")).await;
    h.machine.process(&h.bot, &ChatUpdate::text(CHAT, USER, "Iron")).await;
    h.machine.process(&h.bot, &ChatUpdate::text(CHAT, USER, "8:00")).await;

    assert_eq!(h.bot.last_text().as_deref(), Some(replies::BACKEND_FAILED));
}

#[tokio::test]
async fn test_missing_draft_restarts_flow() {
    let h = harness(FakeBackend::default());
    h.store
        .set_int(&UserSessions::state_key(USER), ConversationState::AwaitingTime.code(), None)
        .await
        .unwrap();

    h.machine.process(&h.bot, &ChatUpdate::text(CHAT, USER, "10:15")).await;

    assert_eq!(h.bot.last_text().as_deref(), Some(replies::DRAFT_LOST));
    assert_eq!(state_of(h.store.as_ref(), USER).await, Some(0));
    assert!(h.backend.requests().is_empty());
}

#[tokio::test]
async fn test_text_in_default_state_is_ignored() {
    let h = harness(FakeBackend::default());

    let outcome = h.machine.process(&h.bot, &ChatUpdate::text(CHAT, USER, "hello")).await;

    assert_eq!(outcome, Outcome::Ignored);
    assert!(h.bot.sent().is_empty());
}

#[tokio::test]
async fn test_unknown_command_is_ignored() {
    let h = harness(FakeBackend::default());

    h.machine.process(&h.bot, &ChatUpdate::command(CHAT, USER, "create")).await;
    let outcome = h.machine.process(&h.bot, &ChatUpdate::command(CHAT, USER, "help")).await;

    assert_eq!(outcome, Outcome::Ignored);
    assert_eq!(h.bot.sent().len(), 1);
    assert_eq!(state_of(h.store.as_ref(), USER).await, Some(1));
}

#[tokio::test]
async fn test_create_restarts_an_unfinished_flow() {
    let h = harness(FakeBackend::default());

    h.machine.process(&h.bot, &ChatUpdate::command(CHAT, USER, "create")).await;
    h.machine.process(&h.bot, &ChatUpdate::text(CHAT, USER, "Old")).await;
    h.machine.process(&h.bot, &ChatUpdate::command(CHAT, USER, "create")).await;

    assert_eq!(h.bot.last_text().as_deref(), Some(replies::ASK_NAME));
    assert_eq!(state_of(h.store.as_ref(), USER).await, Some(1));

    h.machine.process(&h.bot, &ChatUpdate::text(CHAT, USER, "New")).await;
    h.machine.process(&h.bot, &ChatUpdate::text(CHAT, USER, "7:05")).await;
    assert_eq!(h.backend.requests()[0].name(), "New");
}

#[tokio::test]
async fn test_users_do_not_share_state() {
    let h = harness(FakeBackend::default());

    h.machine.process(&h.bot, &ChatUpdate::command(CHAT, USER, "create")).await;
    let outcome = h.machine.process(&h.bot, &ChatUpdate::text(CHAT, USER + 1, "Zinc")).await;

    assert_eq!(outcome, Outcome::Ignored);
    assert_eq!(state_of(h.store.as_ref(), USER).await, Some(1));
    assert_eq!(state_of(h.store.as_ref(), USER + 1).await, None);
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_flow_expires() {
    let h = harness_with_ttl(FakeBackend::default(), Some(Duration::from_secs(60)));

    h.machine.process(&h.bot, &ChatUpdate::command(CHAT, USER, "create")).await;
    h.machine.process(&h.bot, &ChatUpdate::text(CHAT, USER, "Magnesium")).await;

    tokio::time::advance(Duration::from_secs(61)).await;

    let outcome = h.machine.process(&h.bot, &ChatUpdate::text(CHAT, USER, "9:00")).await;
    assert_eq!(outcome, Outcome::Ignored);
    assert!(h.backend.requests().is_empty());
    assert_eq!(state_of(h.store.as_ref(), USER).await, None);
}

#[derive(Debug, Clone)]
enum Step {
    Command(&'static str),
    Text(String),
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        prop::sample::select(vec!["start", "create", "help", "stop"]).prop_map(Step::Command),
        "[A-Za-z ]{0,6}".prop_map(Step::Text),
        ("[0-9]{1,3}", "[0-9]{1,3}", " ?").prop_map(|(h, m, pad)| Step::Text(format!("{}{}:{}", pad, h, m))),
    ]
}

fn is_valid_time(text: &str) -> bool {
    let Some((h, m)) = text.trim().split_once(':') else { return false };
    let digits = |s: &str| (1..=2).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit());
    digits(h) && digits(m) && h.parse::<u8>().unwrap() <= 23 && m.parse::<u8>().unwrap() <= 59
}

/// Expected state code after `step`, and whether it produces no reply
fn model(state: i64, step: &Step) -> (i64, bool) {
    match step {
        Step::Command("start") => (state, false),
        Step::Command("create") => (1, false),
        Step::Command(_) => (state, true),
        Step::Text(_) if state == 0 => (0, true),
        Step::Text(t) if state == 1 => (if t.trim().is_empty() { 1 } else { 2 }, false),
        Step::Text(t) => (if is_valid_time(t) { 0 } else { 2 }, false),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_stored_state_follows_model(steps in prop::collection::vec(arb_step(), 1..30)) {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        rt.block_on(async {
            let h = harness(FakeBackend::default());
            let mut expected = 0;
            let mut created = 0;

            for step in &steps {
                let update = match step {
                    Step::Command(name) => ChatUpdate::command(CHAT, USER, *name),
                    Step::Text(text) => ChatUpdate::text(CHAT, USER, text.clone()),
                };
                let (next, ignored) = model(expected, step);
                if expected == 2 && next == 0 {
                    created += 1;
                }
                expected = next;

                let outcome = h.machine.handle(&update).await.unwrap();
                prop_assert_eq!(outcome == Outcome::Ignored, ignored, "step {:?}", step);

                let stored = state_of(h.store.as_ref(), USER).await.unwrap_or(0);
                prop_assert_eq!(stored, expected, "step {:?}", step);
            }

            prop_assert_eq!(h.backend.requests().len(), created);
            Ok(())
        })?;
    }
}
