//! End-to-end pooled conversation flows.

use courier_chat::models::message::ConversationRef;
use courier_chat::models::principal::{Principal, Role};
use courier_chat::AppError;

use super::test_helpers::{insert_pool, insert_shipment, test_db, test_router};

fn pooled(pool_id: &str, shipment_id: Option<&str>) -> ConversationRef {
    ConversationRef::Pooled {
        pool_id: pool_id.to_owned(),
        shipment_id: shipment_id.map(str::to_owned),
    }
}

async fn seed_pool(db: &courier_chat::persistence::db::Database) {
    insert_pool(db, "g1", "POOL-7", Some("a_pick"), Some("a_drop")).await;
    insert_shipment(db, "s1", "TRK-001", Some("c1"), None, Some("g1")).await;
    insert_shipment(db, "s2", "TRK-002", Some("c2"), None, Some("g1")).await;
}

// Pool G has customers C1, C2 and delivery agent D. C1 sends → receiver D,
// C2 unaffected. D without target → MissingTarget. D with target=s2 → C2.
#[tokio::test]
async fn pooled_scenario_routes_per_subthread() {
    let db = test_db().await;
    seed_pool(&db).await;
    let (router, _notifier) = test_router(&db);

    let c1 = Principal::Customer("c1".into());
    let c2 = Principal::Customer("c2".into());
    let delivery = Principal::Agent("a_drop".into());

    let sent = router
        .send(&pooled("g1", Some("s1")), &c1, "Is the van close?".into())
        .await
        .expect("send");
    assert_eq!(sent.receiver_id, "a_drop");
    assert_eq!(sent.shipment_id, "s1");
    assert_eq!(sent.pool_id.as_deref(), Some("g1"));

    // C2's unread count is unaffected by C1's sub-thread.
    assert_eq!(router.unread_count(&c2).await.expect("count"), 0);

    // Agent send without a target cannot be routed.
    let err = router
        .send(&pooled("g1", None), &delivery, "Almost there".into())
        .await;
    assert!(matches!(err, Err(AppError::MissingTarget(_))));

    // With a target the receiver is that member's customer.
    let sent = router
        .send(&pooled("g1", Some("s2")), &delivery, "Almost there".into())
        .await
        .expect("send");
    assert_eq!(sent.receiver_id, "c2");
    assert_eq!(sent.sender_role, Role::Agent);
    assert_eq!(router.unread_count(&c2).await.expect("count"), 1);
    // C1 received nothing; only the delivery agent holds C1's message.
    assert_eq!(router.unread_count(&c1).await.expect("count"), 0);
    assert_eq!(router.unread_count(&delivery).await.expect("count"), 1);
}

// A member shipment can also be addressed through its own single-shipment
// ref; the message still belongs to the pool's conversation.
#[tokio::test]
async fn single_ref_send_on_pool_member_stays_pool_visible() {
    let db = test_db().await;
    seed_pool(&db).await;
    let (router, _notifier) = test_router(&db);

    let c1 = Principal::Customer("c1".into());
    let delivery = Principal::Agent("a_drop".into());
    let single = ConversationRef::Single {
        shipment_id: "s1".to_owned(),
    };

    let sent = router
        .send(&single, &c1, "Via the tracking page".into())
        .await
        .expect("send");
    assert_eq!(sent.receiver_id, "a_drop");
    assert_eq!(sent.pool_id.as_deref(), Some("g1"));

    // The delivery agent sees it in the pool-level listing and counts.
    let listed = router
        .list_messages(&pooled("g1", None), &delivery)
        .await
        .expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].body, "Via the tracking page");
    assert_eq!(
        router
            .unread_count_for_pool("g1", &delivery)
            .await
            .expect("count"),
        1
    );

    let marked = router
        .mark_read(&pooled("g1", None), &delivery)
        .await
        .expect("mark");
    assert_eq!(marked, 1);
    assert_eq!(router.unread_count(&delivery).await.expect("count"), 0);
}

#[tokio::test]
async fn target_in_another_pool_is_not_found() {
    let db = test_db().await;
    seed_pool(&db).await;
    insert_pool(&db, "g2", "POOL-8", None, Some("a_other")).await;
    insert_shipment(&db, "s9", "TRK-009", Some("c9"), None, Some("g2")).await;
    let (router, _notifier) = test_router(&db);

    let err = router
        .send(
            &pooled("g1", Some("s9")),
            &Principal::Agent("a_drop".into()),
            "wrong pool".into(),
        )
        .await;
    assert!(matches!(err, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn unknown_target_is_not_found() {
    let db = test_db().await;
    seed_pool(&db).await;
    let (router, _notifier) = test_router(&db);

    let err = router
        .send(
            &pooled("g1", Some("ghost")),
            &Principal::Agent("a_drop".into()),
            "hello?".into(),
        )
        .await;
    assert!(matches!(err, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn customer_cannot_post_into_sibling_subthread() {
    let db = test_db().await;
    seed_pool(&db).await;
    let (router, _notifier) = test_router(&db);

    let err = router
        .send(
            &pooled("g1", Some("s2")),
            &Principal::Customer("c1".into()),
            "sneaky".into(),
        )
        .await;
    assert!(matches!(err, Err(AppError::AccessDenied(_))));
}

#[tokio::test]
async fn customer_send_without_target_lands_in_own_subthread() {
    let db = test_db().await;
    seed_pool(&db).await;
    let (router, _notifier) = test_router(&db);

    let sent = router
        .send(&pooled("g1", None), &Principal::Customer("c2".into()), "hi".into())
        .await
        .expect("send");
    assert_eq!(sent.shipment_id, "s2");
    assert_eq!(sent.receiver_id, "a_drop");
}

#[tokio::test]
async fn customer_send_falls_back_to_pickup_agent() {
    let db = test_db().await;
    insert_pool(&db, "g3", "POOL-9", Some("a_pick"), None).await;
    insert_shipment(&db, "s5", "TRK-005", Some("c5"), None, Some("g3")).await;
    let (router, _notifier) = test_router(&db);

    let sent = router
        .send(&pooled("g3", None), &Principal::Customer("c5".into()), "hi".into())
        .await
        .expect("send");
    assert_eq!(sent.receiver_id, "a_pick");
}

#[tokio::test]
async fn outsider_is_denied_at_pool_level() {
    let db = test_db().await;
    seed_pool(&db).await;
    let (router, _notifier) = test_router(&db);

    let err = router
        .send(&pooled("g1", None), &Principal::Customer("c9".into()), "hi".into())
        .await;
    assert!(matches!(err, Err(AppError::AccessDenied(_))));

    let err = router
        .list_messages(&pooled("g1", None), &Principal::Agent("a9".into()))
        .await;
    assert!(matches!(err, Err(AppError::AccessDenied(_))));
}

#[tokio::test]
async fn pooled_notification_references_pool_code() {
    let db = test_db().await;
    seed_pool(&db).await;
    let (router, notifier) = test_router(&db);

    router
        .send(
            &pooled("g1", Some("s1")),
            &Principal::Customer("c1".into()),
            "hello".into(),
        )
        .await
        .expect("send");

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].link_ref, "POOL-7");
    assert_eq!(sent[0].recipient_id, "a_drop");
}
