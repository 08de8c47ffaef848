//! Unit tests for the domain models.

use courier_chat::models::message::{ChatMessage, ConversationRef};
use courier_chat::models::principal::{Principal, Role};
use courier_chat::models::shipment::Pool;

#[test]
fn new_message_starts_unread_with_prefixed_id() {
    let msg = ChatMessage::new(
        "s1".into(),
        None,
        "c1".into(),
        Role::Customer,
        "a1".into(),
        "Where is my package?".into(),
    );

    assert!(msg.id.starts_with("msg:"));
    assert!(!msg.read);
    assert!(msg.read_at.is_none());
    assert_eq!(msg.sender_role, Role::Customer);
}

#[test]
fn role_storage_strings_round_trip() {
    for role in [Role::Customer, Role::Agent] {
        assert_eq!(Role::parse(role.as_str()), Some(role));
    }
    assert_eq!(Role::parse("courier"), None);
}

#[test]
fn principal_exposes_id_and_role() {
    let customer = Principal::Customer("c1".into());
    assert_eq!(customer.id(), "c1");
    assert_eq!(customer.role(), Role::Customer);

    let agent = Principal::Agent("a1".into());
    assert_eq!(agent.id(), "a1");
    assert_eq!(agent.role(), Role::Agent);
}

#[test]
fn pool_recognizes_both_agent_roles() {
    let pool = Pool {
        id: "g1".into(),
        code: "POOL-7".into(),
        pickup_agent_id: Some("a_pick".into()),
        delivery_agent_id: Some("a_drop".into()),
    };
    assert!(pool.has_agent("a_pick"));
    assert!(pool.has_agent("a_drop"));
    assert!(!pool.has_agent("a9"));
}

#[test]
fn conversation_ref_serializes_with_kind_tag() {
    let single = ConversationRef::Single {
        shipment_id: "s1".into(),
    };
    let json = serde_json::to_value(&single).expect("serialize");
    assert_eq!(json["kind"], "single");

    let pooled = ConversationRef::Pooled {
        pool_id: "g1".into(),
        shipment_id: Some("s2".into()),
    };
    let json = serde_json::to_value(&pooled).expect("serialize");
    assert_eq!(json["kind"], "pooled");
    assert_eq!(json["shipment_id"], "s2");
}
