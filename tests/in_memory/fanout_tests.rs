//! Delivery guarantees of the broadcast fan-out.

use super::helpers::{fanout, notification};
use gazette::article::{
    adapters::{BroadcastFanout, FanoutConfig, MAX_CHANNEL_CAPACITY, ReceiveError},
    domain::{NotificationKind, Topic},
    ports::{EmitError, PublicationEventEmitter},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_subscriber_receives_notifications_in_order(fanout: BroadcastFanout) {
    let mut first = fanout.subscribe(Topic::Ticker);
    let mut second = fanout.subscribe(Topic::Ticker);
    let sent: Vec<_> = (0..3)
        .map(|_| notification(NotificationKind::Published))
        .collect();

    for item in &sent {
        fanout.emit(item).await.expect("emit succeeds");
    }

    for subscription in [&mut first, &mut second] {
        for expected in &sent {
            assert_eq!(subscription.recv().await.as_ref(), Ok(expected));
        }
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn late_subscribers_get_no_replay(fanout: BroadcastFanout) {
    let _early = fanout.subscribe(Topic::Ticker);
    fanout
        .emit(&notification(NotificationKind::Published))
        .await
        .expect("emit succeeds");

    let mut late = fanout.subscribe(Topic::Ticker);
    assert_eq!(late.try_recv(), Ok(None));

    let fresh = notification(NotificationKind::Published);
    fanout.emit(&fresh).await.expect("emit succeeds");
    assert_eq!(late.recv().await, Ok(fresh));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn emitting_without_subscribers_succeeds(fanout: BroadcastFanout) {
    assert_eq!(fanout.subscriber_count(Topic::Breaking), 0);
    let result = fanout.emit(&notification(NotificationKind::Breaking)).await;
    assert!(result.is_ok());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn topics_are_isolated(fanout: BroadcastFanout) {
    let mut ticker = fanout.subscribe(Topic::Ticker);
    let mut breaking = fanout.subscribe(Topic::Breaking);
    let alert = notification(NotificationKind::Breaking);

    fanout.emit(&alert).await.expect("emit succeeds");

    assert_eq!(breaking.recv().await, Ok(alert));
    assert_eq!(ticker.try_recv(), Ok(None));
    assert_eq!(ticker.topic(), Topic::Ticker);
}

#[tokio::test(flavor = "multi_thread")]
async fn slow_subscriber_is_told_how_many_it_missed() {
    let fanout = BroadcastFanout::with_config(FanoutConfig::default().with_channel_capacity(2));
    let mut slow = fanout.subscribe(Topic::Ticker);
    let sent: Vec<_> = (0..5)
        .map(|_| notification(NotificationKind::Published))
        .collect();

    for item in &sent {
        fanout.emit(item).await.expect("emitting never blocks");
    }

    assert_eq!(slow.recv().await, Err(ReceiveError::Lagged(3)));
    assert_eq!(slow.recv().await.as_ref(), Ok(&sent[3]));
    assert_eq!(slow.recv().await.as_ref(), Ok(&sent[4]));
}

#[rstest]
#[case(0)]
#[case(MAX_CHANNEL_CAPACITY + 1)]
#[case(usize::MAX)]
#[tokio::test(flavor = "multi_thread")]
async fn out_of_range_capacity_is_clamped(#[case] capacity: usize) {
    let fanout =
        BroadcastFanout::with_config(FanoutConfig::default().with_channel_capacity(capacity));
    let mut ticker = fanout.subscribe(Topic::Ticker);
    let sent = notification(NotificationKind::Published);

    fanout.emit(&sent).await.expect("emit succeeds");

    assert_eq!(ticker.recv().await, Ok(sent));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn close_drains_queued_then_reports_closed(fanout: BroadcastFanout) {
    let mut ticker = fanout.subscribe(Topic::Ticker);
    let queued = notification(NotificationKind::Published);
    fanout.emit(&queued).await.expect("emit succeeds");

    fanout.close();

    assert_eq!(ticker.recv().await, Ok(queued));
    assert_eq!(ticker.recv().await, Err(ReceiveError::Closed));
    assert!(matches!(
        fanout.emit(&notification(NotificationKind::Published)).await,
        Err(EmitError::Closed)
    ));
    assert_eq!(fanout.subscriber_count(Topic::Ticker), 0);
    assert_eq!(
        fanout.subscribe(Topic::Ticker).try_recv(),
        Err(ReceiveError::Closed)
    );
}

#[rstest]
fn subscriber_count_tracks_live_subscriptions(fanout: BroadcastFanout) {
    let first = fanout.subscribe(Topic::Ticker);
    let second = fanout.subscribe(Topic::Ticker);
    assert_eq!(fanout.subscriber_count(Topic::Ticker), 2);

    drop(first);
    assert_eq!(fanout.subscriber_count(Topic::Ticker), 1);
    drop(second);
    assert_eq!(fanout.subscriber_count(Topic::Ticker), 0);
}
