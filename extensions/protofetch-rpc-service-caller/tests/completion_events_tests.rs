use futures::StreamExt;
use protofetch_rpc_service_caller::RpcCompletionEvents;

#[tokio::test]
async fn every_subscriber_receives_every_completion() {
    let events = RpcCompletionEvents::new();
    let mut first = events.subscribe();
    let mut second = events.subscribe();

    events.publish("demo.Calculator/Add");
    events.publish("demo.Calculator/Count");

    for rx in [&mut first, &mut second] {
        assert_eq!(rx.next().await.as_deref(), Some("demo.Calculator/Add"));
        assert_eq!(rx.next().await.as_deref(), Some("demo.Calculator/Count"));
    }
}

#[test]
fn dropped_subscribers_are_pruned_on_publish() {
    let events = RpcCompletionEvents::new();
    let kept = events.subscribe();
    let dropped = events.subscribe();

    assert_eq!(events.subscriber_count(), 2);

    drop(dropped);
    events.publish("demo.Calculator/Add");

    assert_eq!(events.subscriber_count(), 1);
    drop(kept);
}

#[test]
fn clones_share_subscribers() {
    let events = RpcCompletionEvents::new();
    let mut rx = events.subscribe();

    events.clone().publish("demo.Calculator/Echo");

    assert_eq!(
        rx.try_next().unwrap().as_deref(),
        Some("demo.Calculator/Echo")
    );
}

#[test]
fn publishing_without_subscribers_is_harmless() {
    let events = RpcCompletionEvents::new();
    events.publish("demo.Calculator/Add");
    assert_eq!(events.subscriber_count(), 0);
}
