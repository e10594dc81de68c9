mod support;

use std::time::Duration;

use support::http_stub::{refused_url, reserve_port, HttpStub};
use support::stack::{RecordingStack, StackCall};
use xcart_launch::error::Error;
use xcart_launch::probe::Prober;
use xcart_launch::supervisor::StackSupervisor;

fn fast_prober(max_attempts: u32) -> Prober {
    Prober::new(
        max_attempts,
        Duration::from_millis(20),
        Duration::from_secs(2),
    )
}

#[tokio::test]
async fn serving_dashboard_issues_no_start_command() {
    let stub = HttpStub::respond_all("HTTP/1.1 200 OK");
    let url = stub.url();
    let stack = RecordingStack::new();
    let prober = fast_prober(3);

    let supervisor = StackSupervisor::new(&stack, &prober, &url);
    let handle = supervisor.ensure_running().await.expect("already serving");

    assert!(!handle.started_here());
    assert!(stack.calls().is_empty(), "start must not run");
}

#[tokio::test]
async fn starts_stack_and_waits_for_readiness() {
    let port = reserve_port();
    let url = format!("http://127.0.0.1:{port}");
    let stack = RecordingStack::with_start_hook(move || {
        HttpStub::serve_on(port);
    });
    let prober = fast_prober(10);

    let supervisor = StackSupervisor::new(&stack, &prober, &url);
    let handle = supervisor.ensure_running().await.expect("stack comes up");

    assert!(handle.started_here());
    assert_eq!(stack.calls(), vec![StackCall::Start]);
}

#[tokio::test]
async fn unreachable_stack_after_start_is_fatal() {
    let url = refused_url();
    let stack = RecordingStack::new();
    let prober = fast_prober(2);

    let supervisor = StackSupervisor::new(&stack, &prober, &url);
    let err = supervisor
        .ensure_running()
        .await
        .expect_err("dashboard never comes up");

    assert!(matches!(err, Error::Probe(_)));
    assert_eq!(stack.calls(), vec![StackCall::Start]);
}

#[tokio::test]
async fn teardown_leaves_externally_started_stack_alone() {
    let stub = HttpStub::respond_all("HTTP/1.1 200 OK");
    let url = stub.url();
    let stack = RecordingStack::new();
    let prober = fast_prober(3);

    let supervisor = StackSupervisor::new(&stack, &prober, &url);
    let handle = supervisor.ensure_running().await.expect("already serving");
    supervisor.teardown(handle).await;

    assert!(stack.calls().is_empty(), "external stack must not be stopped");
}

#[tokio::test]
async fn teardown_stops_stack_started_here() {
    let port = reserve_port();
    let url = format!("http://127.0.0.1:{port}");
    let stack = RecordingStack::with_start_hook(move || {
        HttpStub::serve_on(port);
    });
    let prober = fast_prober(10);

    let supervisor = StackSupervisor::new(&stack, &prober, &url);
    let handle = supervisor.ensure_running().await.expect("stack comes up");
    supervisor.teardown(handle).await;

    assert_eq!(stack.calls(), vec![StackCall::Start, StackCall::Stop]);
}
