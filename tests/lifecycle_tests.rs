//! RFQ and bid lifecycle against a real SQLite store.

use rfqhub::config::Config;
use rfqhub::domain::{Principal, Role};
use rfqhub::models::{BidStatus, BidUpdate, NewBid, NewRfq, RfqFilter, RfqStatus, RfqUpdate};
use rfqhub::services::ServiceError;
use rfqhub::state::SharedState;

const BUYER: Principal = Principal::new(1, Role::Buyer);
const OTHER_BUYER: Principal = Principal::new(2, Role::Buyer);
const VENDOR_A: Principal = Principal::new(10, Role::Vendor);
const VENDOR_B: Principal = Principal::new(11, Role::Vendor);

async fn spawn_state() -> SharedState {
    let db_path = std::env::temp_dir().join(format!(
        "rfqhub-lifecycle-test-{}.db",
        uuid::Uuid::new_v4()
    ));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    SharedState::new(config)
        .await
        .expect("Failed to create shared state")
}

fn new_rfq(title: &str, budget: (Option<f64>, Option<f64>), category_id: Option<i32>) -> NewRfq {
    NewRfq {
        title: title.to_string(),
        description: "Looking for an experienced partner for this job".to_string(),
        category_id,
        subcategory_id: None,
        budget_min: budget.0,
        budget_max: budget.1,
        currency: None,
    }
}

fn new_bid(amount: f64) -> NewBid {
    NewBid {
        amount,
        description: Some("We can deliver this".to_string()),
        delivery_time: Some(14),
    }
}

#[tokio::test]
async fn test_inverted_budget_rejected() {
    let state = spawn_state().await;

    let err = state
        .rfq_service
        .create(&BUYER, new_rfq("Logo design", (Some(500.0), Some(100.0)), None))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_create_persists_open_rfq_with_default_currency() {
    let state = spawn_state().await;

    let rfq = state
        .rfq_service
        .create(&BUYER, new_rfq("Logo design", (Some(100.0), Some(500.0)), Some(3)))
        .await
        .unwrap();

    assert_eq!(rfq.status, RfqStatus::Open);
    assert_eq!(rfq.currency, "USD");
    assert_eq!(rfq.buyer_id, BUYER.id);

    let fetched = state.rfq_service.get(rfq.id).await.unwrap();
    assert_eq!(fetched, rfq);

    let err = state.rfq_service.get(rfq.id + 100).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_vendors_cannot_post_rfqs() {
    let state = spawn_state().await;

    let err = state
        .rfq_service
        .create(&VENDOR_A, new_rfq("Logo design", (None, None), None))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Unauthorized(_)));
}

#[tokio::test]
async fn test_update_is_owner_only_and_revalidates_merged_fields() {
    let state = spawn_state().await;
    let rfq = state
        .rfq_service
        .create(&BUYER, new_rfq("Logo design", (Some(100.0), Some(500.0)), None))
        .await
        .unwrap();

    let err = state
        .rfq_service
        .update(
            rfq.id,
            RfqUpdate {
                title: Some("Hijacked".to_string()),
                ..Default::default()
            },
            &OTHER_BUYER,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));

    // min alone is fine, but it now exceeds the stored max.
    let err = state
        .rfq_service
        .update(
            rfq.id,
            RfqUpdate {
                budget_min: Some(900.0),
                ..Default::default()
            },
            &BUYER,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let updated = state
        .rfq_service
        .update(
            rfq.id,
            RfqUpdate {
                title: Some("Logo and brand kit".to_string()),
                ..Default::default()
            },
            &BUYER,
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Logo and brand kit");
    assert_eq!(updated.description, rfq.description);
    assert_eq!(updated.budget_max, Some(500.0));

    let err = state
        .rfq_service
        .update(9999, RfqUpdate::default(), &BUYER)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_close_is_idempotent_and_blocks_bidding() {
    let state = spawn_state().await;
    let rfq = state
        .rfq_service
        .create(&BUYER, new_rfq("Logo design", (None, None), None))
        .await
        .unwrap();

    let err = state.rfq_service.close(rfq.id, &OTHER_BUYER).await.unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));

    let closed = state.rfq_service.close(rfq.id, &BUYER).await.unwrap();
    assert_eq!(closed.status, RfqStatus::Closed);

    let again = state.rfq_service.close(rfq.id, &BUYER).await.unwrap();
    assert_eq!(again.status, RfqStatus::Closed);

    let err = state
        .bid_service
        .create(rfq.id, &VENDOR_A, new_bid(100.0))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn test_list_pages_newest_first_with_filters() {
    let state = spawn_state().await;

    for i in 0..5 {
        let category = if i % 2 == 0 { Some(1) } else { Some(2) };
        state
            .rfq_service
            .create(&BUYER, new_rfq(&format!("Request {i}"), (None, None), category))
            .await
            .unwrap();
    }
    state
        .rfq_service
        .create(&OTHER_BUYER, new_rfq("Someone else", (None, None), Some(1)))
        .await
        .unwrap();

    let page = state
        .rfq_service
        .list(RfqFilter {
            limit: Some(2),
            buyer_id: Some(BUYER.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.meta.total, 5);
    assert!(page.meta.has_more);
    assert_eq!(page.items[0].title, "Request 4");
    assert_eq!(page.items[1].title, "Request 3");

    let page = state
        .rfq_service
        .list(RfqFilter {
            category_id: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.meta.total, 4);

    let err = state
        .rfq_service
        .list(RfqFilter {
            limit: Some(101),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_find_related_same_category_open_only() {
    let state = spawn_state().await;

    let anchor = state
        .rfq_service
        .create(&BUYER, new_rfq("Anchor", (None, None), Some(7)))
        .await
        .unwrap();
    let sibling = state
        .rfq_service
        .create(&OTHER_BUYER, new_rfq("Sibling", (None, None), Some(7)))
        .await
        .unwrap();
    let closed = state
        .rfq_service
        .create(&OTHER_BUYER, new_rfq("Closed one", (None, None), Some(7)))
        .await
        .unwrap();
    state.rfq_service.close(closed.id, &OTHER_BUYER).await.unwrap();
    state
        .rfq_service
        .create(&OTHER_BUYER, new_rfq("Elsewhere", (None, None), Some(8)))
        .await
        .unwrap();
    let uncategorized = state
        .rfq_service
        .create(&BUYER, new_rfq("No category", (None, None), None))
        .await
        .unwrap();

    let related = state.rfq_service.find_related(anchor.id).await.unwrap();
    let ids: Vec<i32> = related.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![sibling.id]);

    assert!(
        state
            .rfq_service
            .find_related(uncategorized.id)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(state.rfq_service.find_related(9999).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bid_amount_must_be_positive() {
    let state = spawn_state().await;
    let rfq = state
        .rfq_service
        .create(&BUYER, new_rfq("Logo design", (None, None), None))
        .await
        .unwrap();

    for amount in [0.0, -1.0, -250.5] {
        let err = state
            .bid_service
            .create(rfq.id, &VENDOR_A, new_bid(amount))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}

#[tokio::test]
async fn test_bid_rules_on_create() {
    let state = spawn_state().await;
    let rfq = state
        .rfq_service
        .create(&BUYER, new_rfq("Logo design", (Some(100.0), Some(500.0)), None))
        .await
        .unwrap();

    let err = state
        .bid_service
        .create(9999, &VENDOR_A, new_bid(300.0))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    // An admin acting as vendor on their own RFQ is still self-bidding.
    let admin = Principal::new(BUYER.id, Role::Admin);
    let err = state
        .bid_service
        .create(rfq.id, &admin, new_bid(300.0))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));

    let err = state
        .bid_service
        .create(rfq.id, &OTHER_BUYER, new_bid(300.0))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));

    let err = state
        .bid_service
        .create(rfq.id, &VENDOR_A, new_bid(600.0))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_budget_bounds_can_be_relaxed() {
    let db_path = std::env::temp_dir().join(format!(
        "rfqhub-lifecycle-test-{}.db",
        uuid::Uuid::new_v4()
    ));
    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.marketplace.enforce_budget_bounds = false;
    let state = SharedState::new(config).await.unwrap();

    let rfq = state
        .rfq_service
        .create(&BUYER, new_rfq("Logo design", (Some(100.0), Some(500.0)), None))
        .await
        .unwrap();

    let bid = state
        .bid_service
        .create(rfq.id, &VENDOR_A, new_bid(900.0))
        .await
        .unwrap();
    assert_eq!(bid.status, BidStatus::Submitted);

    let updated = state
        .bid_service
        .update(
            bid.id,
            BidUpdate {
                amount: Some(10_000.0),
                ..Default::default()
            },
            &VENDOR_A,
        )
        .await
        .unwrap();
    assert!((updated.amount - 10_000.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_award_scenario() {
    let state = spawn_state().await;
    let rfq = state
        .rfq_service
        .create(&BUYER, new_rfq("Logo design", (Some(100.0), Some(500.0)), None))
        .await
        .unwrap();

    let bid_a = state
        .bid_service
        .create(rfq.id, &VENDOR_A, new_bid(300.0))
        .await
        .unwrap();
    assert_eq!(bid_a.status, BidStatus::Submitted);

    let err = state
        .bid_service
        .create(rfq.id, &VENDOR_A, new_bid(250.0))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let bid_b = state
        .bid_service
        .create(rfq.id, &VENDOR_B, new_bid(200.0))
        .await
        .unwrap();

    let err = state.bid_service.award(bid_a.id, &VENDOR_A).await.unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));

    let award = state.bid_service.award(bid_a.id, &BUYER).await.unwrap();
    assert_eq!(award.bid.status, BidStatus::Awarded);
    assert_eq!(award.rfq.status, RfqStatus::Closed);
    assert_eq!(award.rejected_bids, 1);

    let loser = state.bid_service.get(bid_b.id).await.unwrap();
    assert_eq!(loser.status, BidStatus::Rejected);

    let err = state.bid_service.award(bid_b.id, &BUYER).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let err = state.bid_service.award(bid_a.id, &BUYER).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let err = state.bid_service.award(9999, &BUYER).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_concurrent_awards_have_one_winner() {
    let state = spawn_state().await;
    let rfq = state
        .rfq_service
        .create(&BUYER, new_rfq("Logo design", (None, None), None))
        .await
        .unwrap();

    let bid_a = state
        .bid_service
        .create(rfq.id, &VENDOR_A, new_bid(300.0))
        .await
        .unwrap();
    let bid_b = state
        .bid_service
        .create(rfq.id, &VENDOR_B, new_bid(280.0))
        .await
        .unwrap();

    let (a_id, b_id) = (bid_a.id, bid_b.id);
    let first = {
        let bids = state.bid_service.clone();
        tokio::spawn(async move { bids.award(a_id, &BUYER).await })
    };
    let second = {
        let bids = state.bid_service.clone();
        tokio::spawn(async move { bids.award(b_id, &BUYER).await })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];
    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(ServiceError::Conflict(_))))
    );

    let statuses = [
        state.bid_service.get(a_id).await.unwrap().status,
        state.bid_service.get(b_id).await.unwrap().status,
    ];
    assert_eq!(
        statuses.iter().filter(|s| **s == BidStatus::Awarded).count(),
        1
    );
    assert_eq!(
        statuses.iter().filter(|s| **s == BidStatus::Rejected).count(),
        1
    );
}

#[tokio::test]
async fn test_retract_rules() {
    let state = spawn_state().await;
    let rfq = state
        .rfq_service
        .create(&BUYER, new_rfq("Logo design", (None, None), None))
        .await
        .unwrap();

    let bid = state
        .bid_service
        .create(rfq.id, &VENDOR_A, new_bid(300.0))
        .await
        .unwrap();

    let err = state.bid_service.retract(bid.id, &VENDOR_B).await.unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));

    let retracted = state.bid_service.retract(bid.id, &VENDOR_A).await.unwrap();
    assert_eq!(retracted.status, BidStatus::Retracted);

    let err = state.bid_service.retract(bid.id, &VENDOR_A).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    // Retracting frees the vendor to bid again.
    let rebid = state
        .bid_service
        .create(rfq.id, &VENDOR_A, new_bid(280.0))
        .await
        .unwrap();

    state.bid_service.award(rebid.id, &BUYER).await.unwrap();

    let err = state.bid_service.retract(rebid.id, &VENDOR_A).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn test_update_bid_rules() {
    let state = spawn_state().await;
    let rfq = state
        .rfq_service
        .create(&BUYER, new_rfq("Logo design", (None, None), None))
        .await
        .unwrap();
    let bid = state
        .bid_service
        .create(rfq.id, &VENDOR_A, new_bid(300.0))
        .await
        .unwrap();

    let change = BidUpdate {
        amount: Some(275.0),
        ..Default::default()
    };

    let err = state
        .bid_service
        .update(bid.id, change.clone(), &VENDOR_B)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized(_)));

    let err = state
        .bid_service
        .update(bid.id, BidUpdate::default(), &VENDOR_A)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let updated = state
        .bid_service
        .update(bid.id, change.clone(), &VENDOR_A)
        .await
        .unwrap();
    assert!((updated.amount - 275.0).abs() < f64::EPSILON);
    assert_eq!(updated.delivery_time, Some(14));

    state.bid_service.retract(bid.id, &VENDOR_A).await.unwrap();

    let err = state
        .bid_service
        .update(bid.id, change, &VENDOR_A)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn test_update_bid_stays_within_budget() {
    let state = spawn_state().await;
    let rfq = state
        .rfq_service
        .create(&BUYER, new_rfq("Logo design", (Some(100.0), Some(500.0)), None))
        .await
        .unwrap();

    let err = state
        .bid_service
        .create(rfq.id, &VENDOR_A, new_bid(10_000.0))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let bid = state
        .bid_service
        .create(rfq.id, &VENDOR_A, new_bid(300.0))
        .await
        .unwrap();

    for amount in [10_000.0, 99.0] {
        let err = state
            .bid_service
            .update(
                bid.id,
                BidUpdate {
                    amount: Some(amount),
                    ..Default::default()
                },
                &VENDOR_A,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    let stored = state.bid_service.get(bid.id).await.unwrap();
    assert!((stored.amount - 300.0).abs() < f64::EPSILON);

    // The bounds are inclusive.
    let updated = state
        .bid_service
        .update(
            bid.id,
            BidUpdate {
                amount: Some(500.0),
                delivery_time: Some(10),
                ..Default::default()
            },
            &VENDOR_A,
        )
        .await
        .unwrap();
    assert!((updated.amount - 500.0).abs() < f64::EPSILON);
    assert_eq!(updated.delivery_time, Some(10));
}

#[tokio::test]
async fn test_bid_listing_is_sealed_for_outsiders() {
    let state = spawn_state().await;
    let rfq = state
        .rfq_service
        .create(&BUYER, new_rfq("Logo design", (None, None), None))
        .await
        .unwrap();
    state
        .bid_service
        .create(rfq.id, &VENDOR_A, new_bid(300.0))
        .await
        .unwrap();
    state
        .bid_service
        .create(rfq.id, &VENDOR_B, new_bid(250.0))
        .await
        .unwrap();

    let owner_view = state
        .bid_service
        .list_for_rfq(rfq.id, Some(&BUYER))
        .await
        .unwrap();
    assert_eq!(owner_view.len(), 2);
    assert!(owner_view.iter().all(|b| !b.sealed && b.amount.is_some()));
    assert_eq!(owner_view[0].vendor_id, VENDOR_A.id);

    let vendor_view = state
        .bid_service
        .list_for_rfq(rfq.id, Some(&VENDOR_A))
        .await
        .unwrap();
    for bid in &vendor_view {
        assert_eq!(bid.sealed, bid.vendor_id != VENDOR_A.id);
    }

    let anonymous = state.bid_service.list_for_rfq(rfq.id, None).await.unwrap();
    assert!(anonymous.iter().all(|b| b.sealed && b.amount.is_none()));

    let err = state.bid_service.list_for_rfq(9999, None).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
