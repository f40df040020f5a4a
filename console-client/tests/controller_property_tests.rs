//! Property-Based Tests for the Entity Collection Controller
//!
//! **Property 1: List Replacement Is Idempotent**
//! **Property 2: Failed Mutations Leave The Snapshot Untouched**
//! **Property 3: Sequential Numbers Are Never Reused Within A Session**
//!
//! The controller only changes its collection after the gateway confirms,
//! and a rejected credential ends the session for every controller.

use console_client::{
    EntityController, LoadStatus, Notification, NotificationAction, Notifier, Session,
};
use console_core::{
    Chatbot, ChatbotId, ChatbotPatch, ChatbotStatus, ConsoleError, EntityIdType, ResourceKind,
    Role, Staff, StaffDraft, StaffStatus,
};
use console_test_utils::{fixtures, generators::*, MockGateway};
use proptest::prelude::*;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::UnboundedReceiver;

// ============================================================================
// TEST CONFIGURATION
// ============================================================================

fn test_runtime() -> Result<Runtime, TestCaseError> {
    Runtime::new().map_err(|e| TestCaseError::fail(format!("Failed to create runtime: {}", e)))
}

struct Harness<R: console_test_utils::MockResource> {
    controller: EntityController<R, MockGateway>,
    session: Session,
    notifications: UnboundedReceiver<Notification>,
}

fn harness<R>(gateway: &MockGateway) -> Harness<R>
where
    R: console_test_utils::MockResource,
{
    let session = Session::with_token("mock-token");
    let (notifier, notifications) = Notifier::channel();
    let controller = EntityController::new(Arc::new(gateway.clone()), session.clone(), notifier);
    Harness {
        controller,
        session,
        notifications,
    }
}

fn drain(rx: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}

fn arb_gateway_failure() -> impl Strategy<Value = ConsoleError> {
    prop_oneof![
        Just(ConsoleError::network("connection refused")),
        Just(ConsoleError::Conflict {
            reason: "stale record".to_string()
        }),
        (500u16..600).prop_map(|status| ConsoleError::Rejected {
            status,
            message: "server error".to_string()
        }),
        Just(ConsoleError::InvalidResponse {
            reason: "truncated body".to_string()
        }),
    ]
}

// ============================================================================
// PROPERTY TESTS
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// **Property 1: List Replacement Is Idempotent**
    ///
    /// Listing twice against an unchanged remote collection yields
    /// element-wise equal snapshots, and explicit refreshes agree too.
    #[test]
    fn prop_list_is_idempotent(bots in arb_chatbots(8)) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let gateway = MockGateway::new().with_records(bots.clone());
            let mut h = harness::<Chatbot>(&gateway);

            let first = h.controller.list().await.map_err(|e| TestCaseError::fail(e.to_string()))?;
            let second = h.controller.list().await.map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(first.to_vec(), second.to_vec());
            prop_assert_eq!(gateway.count_calls(ResourceKind::Chatbot, "list"), 1);

            let refreshed = h.controller.refresh().await.map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(first.to_vec(), refreshed.to_vec());
            prop_assert_eq!(first.len(), bots.len());

            let ids: Vec<ChatbotId> = first.iter().map(|b| b.id.clone()).collect();
            let expected: Vec<ChatbotId> = bots.iter().map(|b| b.id.clone()).collect();
            prop_assert_eq!(ids, expected);
            prop_assert_eq!(h.controller.status(), LoadStatus::Ready);
            Ok(())
        })?;
    }

    /// **Property 2.1: Failed Update Leaves The Snapshot Untouched**
    #[test]
    fn prop_failed_update_leaves_snapshot(
        bots in arb_chatbots(6).prop_filter("need a target", |b| !b.is_empty()),
        pick in any::<prop::sample::Index>(),
        patch in arb_chatbot_patch(),
        failure in arb_gateway_failure(),
    ) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let gateway = MockGateway::new().with_records(bots.clone());
            let mut h = harness::<Chatbot>(&gateway);
            let before = h.controller.list().await.map_err(|e| TestCaseError::fail(e.to_string()))?;
            drain(&mut h.notifications);

            let target = bots[pick.index(bots.len())].id.clone();
            gateway.fail_next(failure.clone());
            let result = h.controller.update(&target, patch).await;

            prop_assert_eq!(result.unwrap_err(), failure);
            prop_assert_eq!(h.controller.snapshot().to_vec(), before.to_vec());
            prop_assert!(h.session.is_authenticated());

            let raised = drain(&mut h.notifications);
            prop_assert_eq!(raised.len(), 1);
            prop_assert!(raised[0].is_error());
            Ok(())
        })?;
    }

    /// **Property 2.2: Failed Create And Delete Leave The Snapshot Untouched**
    #[test]
    fn prop_failed_create_and_delete_leave_snapshot(
        roles in arb_roles(5).prop_filter("need a target", |r| !r.is_empty()),
        draft in arb_role_draft(),
        failure in arb_gateway_failure(),
    ) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let gateway = MockGateway::new().with_records(roles.clone());
            let mut h = harness::<Role>(&gateway);
            let before = h.controller.list().await.map_err(|e| TestCaseError::fail(e.to_string()))?;

            gateway.fail_next(failure.clone());
            prop_assert!(h.controller.create(draft).await.is_err());
            prop_assert_eq!(h.controller.snapshot().to_vec(), before.to_vec());

            gateway.fail_next(failure);
            prop_assert!(h.controller.remove(&roles[0].id).await.is_err());
            prop_assert_eq!(h.controller.snapshot().to_vec(), before.to_vec());
            prop_assert_eq!(gateway.records::<Role>().len(), roles.len());
            Ok(())
        })?;
    }

    /// **Property 3: Sequential Numbers Are Never Reused Within A Session**
    ///
    /// With a server that leaves numbers blank, every locally derived number
    /// is unique even after deletions.
    #[test]
    fn prop_local_numbers_never_reused(
        drafts in prop::collection::vec(arb_chatbot_draft(), 1..6),
        deletions in prop::collection::vec(any::<prop::sample::Index>(), 0..4),
    ) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let gateway = MockGateway::new().without_numbering();
            let mut h = harness::<Chatbot>(&gateway);
            let mut issued = std::collections::HashSet::new();

            for draft in drafts.iter().cloned() {
                let bot = h.controller.create(draft).await.map_err(|e| TestCaseError::fail(e.to_string()))?;
                prop_assert!(bot.number.starts_with("BOT"));
                prop_assert!(issued.insert(bot.number.clone()), "number reused: {}", bot.number);
            }
            for index in deletions {
                let snapshot = h.controller.snapshot();
                if snapshot.is_empty() {
                    break;
                }
                let id = snapshot.to_vec()[index.index(snapshot.len())].id.clone();
                h.controller.remove(&id).await.map_err(|e| TestCaseError::fail(e.to_string()))?;
            }
            for draft in drafts {
                let bot = h.controller.create(draft).await.map_err(|e| TestCaseError::fail(e.to_string()))?;
                prop_assert!(issued.insert(bot.number.clone()), "number reused: {}", bot.number);
            }
            Ok(())
        })?;
    }

    /// **Property 1.2: Server Numbers Win**
    #[test]
    fn prop_server_numbers_are_kept(drafts in prop::collection::vec(arb_staff_draft(), 1..5)) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let gateway = MockGateway::new().with_records(fixtures::staff());
            let mut h = harness::<Staff>(&gateway);
            h.controller.list().await.map_err(|e| TestCaseError::fail(e.to_string()))?;

            for (offset, draft) in drafts.into_iter().enumerate() {
                let staff = h.controller.create(draft).await.map_err(|e| TestCaseError::fail(e.to_string()))?;
                prop_assert_eq!(staff.number.clone(), format!("{:03}", 6 + offset));
            }
            let server: Vec<String> = gateway.records::<Staff>().into_iter().map(|s| s.number).collect();
            let local: Vec<String> = h.controller.snapshot().iter().map(|s| s.number.clone()).collect();
            prop_assert_eq!(server, local);
            Ok(())
        })?;
    }
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[tokio::test]
async fn scenario_create_into_empty_collection() {
    let gateway = MockGateway::new();
    gateway.queue_id("x");
    let mut h = harness::<Chatbot>(&gateway);

    h.controller
        .create(fixtures::sales_assistant_draft())
        .await
        .expect("create");

    let expected = vec![Chatbot {
        id: ChatbotId::new("x"),
        number: "BOT001".to_string(),
        name: "Sales Assistant".to_string(),
        role: "Sales".to_string(),
        status: ChatbotStatus::Online,
        created_at: None,
        updated_at: None,
    }];
    assert_eq!(h.controller.snapshot().to_vec(), expected);

    let raised = drain(&mut h.notifications);
    assert_eq!(raised.len(), 1);
    assert_eq!(raised[0].title, "Chatbot Added");
    assert_eq!(raised[0].message, "New chatbot has been added successfully.");
}

#[tokio::test]
async fn huge_server_ordinal_does_not_break_local_numbering() {
    let mut huge = fixtures::chatbots().remove(0);
    huge.number = format!("BOT{}", usize::MAX);
    let gateway = MockGateway::new().without_numbering().with_records(vec![huge.clone()]);
    let mut h = harness::<Chatbot>(&gateway);
    h.controller.list().await.expect("list");

    let created = h
        .controller
        .create(fixtures::sales_assistant_draft())
        .await
        .expect("create");
    assert_eq!(created.number, "BOT002");
    assert_ne!(created.number, huge.number);

    let mut blank = fixtures::chatbots().remove(1);
    blank.number = String::new();
    let gateway = MockGateway::new().with_records(vec![huge, blank]);
    let mut h = harness::<Chatbot>(&gateway);
    let snapshot = h.controller.refresh().await.expect("refresh");
    let numbers: Vec<String> = snapshot.iter().map(|b| b.number.clone()).collect();
    assert_eq!(numbers, vec![format!("BOT{}", usize::MAX), "BOT002".to_string()]);
}

#[tokio::test]
async fn scenario_update_unknown_id_is_not_found() {
    let gateway = MockGateway::new().with_records(fixtures::chatbots());
    let mut h = harness::<Chatbot>(&gateway);
    let before = h.controller.list().await.expect("list");

    let patch = ChatbotPatch {
        name: Some("X".to_string()),
        ..Default::default()
    };
    let err = h
        .controller
        .update(&ChatbotId::new("nonexistent-id"), patch)
        .await
        .unwrap_err();

    assert_eq!(err, ConsoleError::not_found(ResourceKind::Chatbot, "nonexistent-id"));
    assert_eq!(h.controller.snapshot(), before);
    assert_eq!(gateway.count_calls(ResourceKind::Chatbot, "update"), 0);
}

#[tokio::test]
async fn scenario_unauthorized_ends_session() {
    let gateway = MockGateway::new().with_records(fixtures::chatbots());
    let mut h = harness::<Chatbot>(&gateway);
    gateway.fail_next(ConsoleError::Unauthorized);

    let err = h.controller.list().await.unwrap_err();
    assert_eq!(err, ConsoleError::Unauthorized);
    assert!(!h.session.is_authenticated());
    assert!(h.session.is_expired());
    assert_eq!(h.controller.status(), LoadStatus::Failed);

    let raised = drain(&mut h.notifications);
    assert_eq!(raised[0].action, Some(NotificationAction::Reauthenticate));

    // Later calls are not attempted until the operator signs in again.
    let calls_before = gateway.call_count();
    assert_eq!(
        h.controller.create(fixtures::sales_assistant_draft()).await.unwrap_err(),
        ConsoleError::Unauthorized
    );
    assert_eq!(h.controller.list().await.unwrap_err(), ConsoleError::Unauthorized);
    assert_eq!(gateway.call_count(), calls_before);

    h.session.init("mock-token", None);
    let bots = h.controller.list().await.expect("list after re-auth");
    assert_eq!(bots.len(), 5);
}

#[tokio::test]
async fn failed_first_load_is_retried_by_list() {
    let gateway = MockGateway::new().with_records(fixtures::roles());
    let mut h = harness::<Role>(&gateway);
    gateway.fail_next(ConsoleError::network("timeout"));

    assert!(h.controller.list().await.is_err());
    assert_eq!(h.controller.status(), LoadStatus::Failed);
    assert!(h.controller.snapshot().is_empty());
    let raised = drain(&mut h.notifications);
    assert_eq!(raised[0].action, Some(NotificationAction::Retry));
    assert_eq!(raised[0].title, "Failed to load role");

    let roles = h.controller.list().await.expect("retry");
    assert_eq!(roles.len(), 5);
    assert_eq!(h.controller.status(), LoadStatus::Ready);
}

#[tokio::test]
async fn status_transitions_are_observable() {
    let gateway = MockGateway::new().with_records(fixtures::roles());
    let mut h = harness::<Role>(&gateway);
    let mut rx = h.controller.subscribe_status();
    assert_eq!(*rx.borrow(), LoadStatus::Idle);

    h.controller.list().await.expect("list");
    assert!(rx.has_changed().expect("sender alive"));
    assert_eq!(*rx.borrow_and_update(), LoadStatus::Ready);
}

#[tokio::test]
async fn double_delete_reports_not_found_without_ending_session() {
    let gateway = MockGateway::new().with_records(fixtures::chatbots());
    let mut h = harness::<Chatbot>(&gateway);
    h.controller.list().await.expect("list");
    let id = ChatbotId::new("5");

    h.controller.remove(&id).await.expect("first delete");
    let err = h.controller.remove(&id).await.unwrap_err();

    assert_eq!(err, ConsoleError::not_found(ResourceKind::Chatbot, "5"));
    assert!(h.session.is_authenticated());
    assert_eq!(gateway.count_calls(ResourceKind::Chatbot, "delete"), 2);
    assert_eq!(h.controller.snapshot().len(), 4);

    let raised = drain(&mut h.notifications);
    assert_eq!(raised[0].title, "Chatbot Deleted");
    assert_eq!(raised[1].title, "Failed to delete chatbot");
    assert_eq!(raised[1].action, None);
}

#[tokio::test]
async fn unsaved_id_is_rejected_before_the_gateway() {
    let gateway = MockGateway::new().with_records(fixtures::chatbots());
    let mut h = harness::<Chatbot>(&gateway);
    h.controller.list().await.expect("list");
    let calls = gateway.call_count();

    let blank = ChatbotId::new("");
    let patch = ChatbotPatch {
        status: Some(ChatbotStatus::Offline),
        ..Default::default()
    };
    assert!(matches!(
        h.controller.update(&blank, patch).await,
        Err(ConsoleError::ValidationRequired { .. })
    ));
    assert!(matches!(
        h.controller.remove(&blank).await,
        Err(ConsoleError::ValidationRequired { .. })
    ));
    assert_eq!(gateway.call_count(), calls);
}

#[tokio::test]
async fn empty_patch_and_invalid_draft_are_rejected() {
    let gateway = MockGateway::new().with_records(fixtures::staff());
    let mut h = harness::<Staff>(&gateway);
    h.controller.list().await.expect("list");
    let calls = gateway.call_count();

    let id = h.controller.snapshot().to_vec()[0].id.clone();
    assert!(matches!(
        h.controller.update(&id, Default::default()).await,
        Err(ConsoleError::ValidationRequired { ref field, .. }) if field == "patch"
    ));

    let draft = StaffDraft {
        name: "Ada".to_string(),
        email: "not-an-email".to_string(),
        role: "Manager".to_string(),
        status: StaffStatus::Active,
    };
    assert!(h.controller.create(draft).await.is_err());
    assert_eq!(gateway.call_count(), calls);
}

#[tokio::test]
async fn update_replaces_with_server_record_and_clears_selection() {
    let gateway = MockGateway::new().with_records(fixtures::chatbots());
    let mut h = harness::<Chatbot>(&gateway);
    h.controller.list().await.expect("list");

    let id = ChatbotId::new("3");
    h.controller.select_for_edit(&id).expect("select");
    assert_eq!(h.controller.selected().map(|b| b.id.clone()), Some(id.clone()));

    let patch = ChatbotPatch {
        status: Some(ChatbotStatus::Online),
        ..Default::default()
    };
    let updated = h.controller.update(&id, patch).await.expect("update");
    assert_eq!(updated.status, ChatbotStatus::Online);
    assert_eq!(updated.number, "BOT003");
    assert!(h.controller.selected().is_none());

    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.position(&id), Some(2));
    assert_eq!(snapshot.get(&id).map(|b| b.status), Some(ChatbotStatus::Online));

    let raised = drain(&mut h.notifications);
    assert_eq!(raised[0].title, "Chatbot Updated");
    assert_eq!(raised[0].message, "Chatbot has been updated successfully.");
}

#[tokio::test]
async fn select_unknown_entity_is_not_found() {
    let gateway = MockGateway::new();
    let mut h = harness::<Chatbot>(&gateway);
    assert!(h.controller.select_for_edit(&ChatbotId::new("9")).is_err());
    assert!(h.controller.selected().is_none());
}

#[tokio::test]
async fn get_refreshes_local_copy() {
    let gateway = MockGateway::new().with_records(fixtures::roles());
    let mut h = harness::<Role>(&gateway);
    h.controller.list().await.expect("list");

    let role = h
        .controller
        .get(&console_core::RoleId::new("3"))
        .await
        .expect("get");
    assert_eq!(role.name, "Team Lead");
    assert_eq!(role.id.as_str(), "3");
}

#[tokio::test]
async fn published_snapshots_never_change() {
    let gateway = MockGateway::new().with_records(fixtures::chatbots());
    let mut h = harness::<Chatbot>(&gateway);
    let published = h.controller.list().await.expect("list");

    h.controller.remove(&ChatbotId::new("1")).await.expect("delete");
    h.controller
        .create(fixtures::sales_assistant_draft())
        .await
        .expect("create");

    assert_eq!(published.len(), 5);
    assert!(published.contains(&ChatbotId::new("1")));
    assert_eq!(h.controller.snapshot().len(), 5);
    assert!(!h.controller.snapshot().contains(&ChatbotId::new("1")));
}
