//! Ticket lifecycle: acquisition, background renewal, logout

use mms_client::{MmsConfig, NoPrompt, SyncContext, TracingGuiLog};
use mms_test_utils::{
    init_tracing, login_response, ticket_not_found_response, ticket_valid_response,
    ScriptedTransport,
};
use std::sync::Arc;
use std::time::Duration;

const BASE: &str = "https://mms.example.com/alfresco/service";

fn context_over(transport: Arc<ScriptedTransport>) -> SyncContext {
    let config = MmsConfig::new(BASE)
        .with_popups_disabled(true)
        .with_renewal_interval(Duration::from_secs(60));
    SyncContext::new(
        config,
        transport,
        Arc::new(NoPrompt),
        Arc::new(TracingGuiLog),
    )
}

#[tokio::test(start_paused = true)]
async fn renewal_checks_fire_on_the_configured_interval() {
    init_tracing();
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_ok(200, login_response("T123"));
    transport.push_ok(200, ticket_valid_response("alice"));
    transport.push_ok(200, ticket_valid_response("alice"));

    let context = context_over(transport.clone());
    context.credentials().set_credentials("alice", "secret");
    assert!(context.ticket_manager().login().await);
    assert_eq!(context.ticket_manager().ticket(), "T123");
    assert_eq!(transport.request_count(), 1);

    // two renewal intervals elapse: two validity checks
    tokio::time::sleep(Duration::from_secs(125)).await;
    assert_eq!(transport.request_count(), 3);
    let urls = transport.request_urls();
    assert!(urls[1].ends_with("/mms/login/ticket/T123"));
    assert!(urls[2].ends_with("/mms/login/ticket/T123"));
    assert!(context.ticket_manager().is_authenticated());

    context.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn logout_stops_further_renewal_checks() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_ok(200, login_response("T123"));
    transport.push_ok(200, ticket_valid_response("alice"));

    let context = context_over(transport.clone());
    context.credentials().set_credentials("alice", "secret");
    assert!(context.ticket_manager().login().await);

    tokio::time::sleep(Duration::from_secs(65)).await;
    let checks_before = transport.request_count();
    assert_eq!(checks_before, 2);

    context.ticket_manager().logout();
    assert!(!context.ticket_manager().is_authenticated());
    assert!(!context.ticket_manager().renewal_active());

    // no renewal call fires after the clear
    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(transport.request_count(), checks_before);

    context.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn expired_ticket_detected_by_renewal_forces_logout() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_ok(200, login_response("T123"));
    transport.push_ok(404, ticket_not_found_response());

    let context = context_over(transport.clone());
    context.credentials().set_credentials("alice", "secret");
    assert!(context.ticket_manager().login().await);

    tokio::time::sleep(Duration::from_secs(65)).await;

    assert!(!context.ticket_manager().is_authenticated());
    assert!(!context.ticket_manager().renewal_active());
    // the forced logout also cleared the username
    assert_eq!(context.credentials().username(), "");

    context.shutdown().await;
}

#[tokio::test]
async fn renewal_survives_a_transient_transport_failure() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_ok(200, login_response("T123"));
    transport.push_err(mms_client::TransportError::Timeout);

    let config = MmsConfig::new(BASE)
        .with_popups_disabled(true)
        .with_renewal_interval(Duration::from_millis(20));
    let context = SyncContext::new(
        config,
        transport.clone(),
        Arc::new(NoPrompt),
        Arc::new(TracingGuiLog),
    );
    context.credentials().set_credentials("alice", "secret");
    assert!(context.ticket_manager().login().await);

    // the failed check is swallowed, the schedule keeps running, and the
    // ticket is assumed still valid
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert!(context.ticket_manager().is_authenticated());
    assert!(context.ticket_manager().renewal_active());
    assert!(transport.request_count() >= 3);

    context.shutdown().await;
}
