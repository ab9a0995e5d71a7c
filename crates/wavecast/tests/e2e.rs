// SPDX-FileCopyrightText: 2026 Wavecast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete dispatch pipeline.
//!
//! Each test creates an isolated TestHarness with a mock transport and the
//! full store/engine/service stack. The clock is paused, so multi-second
//! inter-send delays resolve instantly while preserving virtual-time
//! ordering guarantees.

use std::time::Duration;

use wavecast_core::types::{CampaignState, DeliveryStatus};
use wavecast_core::WavecastError;
use wavecast_test_utils::TestHarness;

// ---- Submission to completion ----

#[tokio::test(start_paused = true)]
async fn two_recipients_both_delivered() {
    let harness = TestHarness::builder().build();

    let accepted = harness
        .submit("Hello", 6000, &["08031234567", "08029876543"])
        .await
        .unwrap();
    assert_eq!(accepted.total_recipients, 2);

    harness.run_to_completion(accepted.campaign_id).await.unwrap();

    let progress = harness
        .reporter
        .campaign_progress(accepted.campaign_id)
        .await
        .unwrap();
    assert_eq!(progress.total, 2);
    assert_eq!(progress.sent, 2);
    assert_eq!(progress.failed, 0);
    assert_eq!(progress.pending, 0);

    let campaign = harness.store.campaign(accepted.campaign_id).await.unwrap();
    assert_eq!(campaign.state, CampaignState::Completed);

    // Recipients were normalized before storage and delivered in list order
    // to WhatsApp JIDs.
    let sent = harness.transport.sent_messages().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].routing_id, "2348031234567@s.whatsapp.net");
    assert_eq!(sent[1].routing_id, "2348029876543@s.whatsapp.net");
    assert!(sent.iter().all(|m| m.content == "Hello"));
}

#[tokio::test(start_paused = true)]
async fn unregistered_second_number_is_recorded_failed() {
    let harness = TestHarness::builder().build();
    harness.transport.mark_missing("2348029876543").await;

    let accepted = harness
        .submit("Hello", 6000, &["08031234567", "08029876543"])
        .await
        .unwrap();
    harness.run_to_completion(accepted.campaign_id).await.unwrap();

    let progress = harness
        .reporter
        .campaign_progress(accepted.campaign_id)
        .await
        .unwrap();
    assert_eq!(progress.sent, 1);
    assert_eq!(progress.failed, 1);
    assert_eq!(progress.pending, 0);

    let records = harness.store.status_records(accepted.campaign_id).await;
    let failed = records
        .iter()
        .find(|r| r.status == DeliveryStatus::Failed)
        .unwrap();
    assert_eq!(failed.phone_number, "2348029876543");
    assert_eq!(failed.error_message.as_deref(), Some("Number is not on WhatsApp"));
}

#[tokio::test(start_paused = true)]
async fn every_recipient_resolves_exactly_once() {
    let harness = TestHarness::builder().build();
    harness.transport.fail_send_to("2348029876543").await;

    let accepted = harness
        .submit("Hello", 6000, &["08031234567", "08029876543", "08112223334"])
        .await
        .unwrap();
    harness.run_to_completion(accepted.campaign_id).await.unwrap();

    let campaign = harness.store.campaign(accepted.campaign_id).await.unwrap();
    assert_eq!(campaign.state, CampaignState::Completed);
    assert_eq!(campaign.sent_count + campaign.failed_count, 3);

    // One record per recipient, none left pending.
    let records = harness.store.status_records(accepted.campaign_id).await;
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.status != DeliveryStatus::Pending));
    for number in ["2348031234567", "2348029876543", "2348112223334"] {
        assert_eq!(
            records.iter().filter(|r| r.phone_number == number).count(),
            1,
            "expected exactly one record for {number}"
        );
    }
}

// ---- Validation ----

#[tokio::test]
async fn validation_rejects_bad_submissions() {
    let harness = TestHarness::builder().build();

    for (content, delay_ms, numbers) in [
        ("", 6000, vec!["2348031234567"]),
        ("hi", 5000, vec!["2348031234567"]),
        ("hi", 6000, vec![]),
    ] {
        let result = harness
            .submit(content, delay_ms, &numbers)
            .await;
        assert!(
            matches!(result, Err(WavecastError::Validation(_))),
            "expected validation rejection for content={content:?} delay={delay_ms}"
        );
    }

    // Nothing was created by any rejected submission.
    assert!(harness.store.campaigns().await.is_empty());
    assert!(harness.store.all_status_records().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn configured_dial_plan_and_delay_floor_are_honored() {
    let harness = TestHarness::builder()
        .with_min_delay_ms(8000)
        .with_phone_config(wavecast_config::model::PhoneConfig {
            country_code: "44".to_string(),
            trunk_prefix: "0".to_string(),
            min_digits: 11,
            max_digits: 13,
        })
        .build();

    // The floor moved up with the config.
    let err = harness
        .submit("hi", 7000, &["07911 123456"])
        .await
        .unwrap_err();
    assert!(matches!(err, WavecastError::Validation(_)));

    let accepted = harness
        .submit("hi", 8000, &["07911 123456"])
        .await
        .unwrap();
    harness.run_to_completion(accepted.campaign_id).await.unwrap();

    let sent = harness.transport.sent_messages().await;
    assert_eq!(sent[0].routing_id, "447911123456@s.whatsapp.net");
}

// ---- Statistics ----

#[tokio::test(start_paused = true)]
async fn statistics_hold_their_invariants_across_campaigns() {
    let harness = TestHarness::builder().build();
    harness.transport.mark_missing("2348445556667").await;

    let stats = harness.reporter.global_statistics().await;
    assert_eq!(stats.total, 0);
    assert_eq!(stats.success_rate, 0.0);

    let first = harness
        .submit("one", 6000, &["08031234567", "08029876543"])
        .await
        .unwrap();
    harness.run_to_completion(first.campaign_id).await.unwrap();

    let second = harness
        .submit("two", 6000, &["08445556667"])
        .await
        .unwrap();
    harness.run_to_completion(second.campaign_id).await.unwrap();

    let stats = harness.reporter.global_statistics().await;
    assert_eq!(stats.total, stats.successful + stats.failed);
    assert_eq!(stats.successful, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.success_rate, 66.7);
}

#[tokio::test(start_paused = true)]
async fn clearing_statistics_purges_only_completed_campaigns() {
    let harness = TestHarness::builder().with_max_concurrent(1).build();

    let done = harness.submit("done", 6000, &["08031234567"]).await.unwrap();
    harness.run_to_completion(done.campaign_id).await.unwrap();

    // Leave a second campaign in flight so clearing must spare it.
    let blocker = harness
        .submit("blocker", 6000, &["08029876543", "08112223334"])
        .await
        .unwrap();
    tokio::task::yield_now().await;

    let outcome = harness.service.clear_statistics().await;
    assert_eq!(outcome.cleared_campaigns, 1);
    assert_eq!(outcome.cleared_records, 1);

    assert!(harness.store.campaign(done.campaign_id).await.is_err());
    assert!(harness.store.campaign(blocker.campaign_id).await.is_ok());

    // The surviving campaign still runs to completion afterwards.
    harness.run_to_completion(blocker.campaign_id).await.unwrap();
    let campaign = harness.store.campaign(blocker.campaign_id).await.unwrap();
    assert_eq!(campaign.state, CampaignState::Completed);
    assert_eq!(campaign.sent_count, 2);
}

// ---- Concurrency ----

#[tokio::test(start_paused = true)]
async fn campaigns_dispatch_concurrently_up_to_the_cap() {
    let harness = TestHarness::builder().with_max_concurrent(4).build();

    let first = harness
        .submit("one", 6000, &["08031234567", "08029876543"])
        .await
        .unwrap();
    let second = harness
        .submit("two", 6000, &["08112223334", "08445556667"])
        .await
        .unwrap();

    harness.run_to_completion(first.campaign_id).await.unwrap();
    harness.run_to_completion(second.campaign_id).await.unwrap();

    for id in [first.campaign_id, second.campaign_id] {
        let campaign = harness.store.campaign(id).await.unwrap();
        assert_eq!(campaign.state, CampaignState::Completed);
        assert_eq!(campaign.sent_count, 2);
        assert_eq!(campaign.failed_count, 0);
    }
    assert_eq!(harness.transport.sent_count().await, 4);
}

#[tokio::test(start_paused = true)]
async fn inter_send_spacing_honors_the_submitted_delay() {
    let harness = TestHarness::builder().build();

    let accepted = harness
        .submit("Hello", 9000, &["08031234567", "08029876543"])
        .await
        .unwrap();
    harness.run_to_completion(accepted.campaign_id).await.unwrap();

    let attempts = harness.transport.attempt_instants().await;
    assert_eq!(attempts.len(), 2);
    assert!(attempts[1].duration_since(attempts[0]) >= Duration::from_millis(9000));
}

// ---- Mid-run disconnect ----

#[tokio::test(start_paused = true)]
async fn disconnect_mid_run_fails_remaining_recipients_without_aborting() {
    let harness = TestHarness::builder().build();

    let accepted = harness
        .submit("Hello", 6000, &["08031234567", "08029876543"])
        .await
        .unwrap();

    // Let the first recipient resolve, then drop the session before the
    // delayed second attempt fires.
    tokio::task::yield_now().await;
    harness.transport.set_connected(false);
    harness.run_to_completion(accepted.campaign_id).await.unwrap();

    let campaign = harness.store.campaign(accepted.campaign_id).await.unwrap();
    assert_eq!(campaign.state, CampaignState::Completed);
    assert_eq!(campaign.sent_count, 1);
    assert_eq!(campaign.failed_count, 1);

    let records = harness.store.status_records(accepted.campaign_id).await;
    let failed = records
        .iter()
        .find(|r| r.status == DeliveryStatus::Failed)
        .unwrap();
    assert!(failed
        .error_message
        .as_deref()
        .unwrap()
        .contains("not connected"));
}
