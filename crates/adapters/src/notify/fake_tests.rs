use super::*;

#[tokio::test]
async fn records_every_call_in_order() {
    let fake = FakeNotifyAdapter::new();
    fake.notify("task_completed", "probe-1 finished").await.unwrap();
    fake.notify("task_error", "cron-2 failed").await.unwrap();

    let calls = fake.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].title, "task_completed");
    assert_eq!(calls[1].message, "cron-2 failed");
}

#[tokio::test]
async fn a_fresh_adapter_has_no_calls() {
    let fake = FakeNotifyAdapter::new();
    assert!(fake.calls().is_empty());
}
