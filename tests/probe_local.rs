//! Probes against local TLS endpoints presenting generated chains.

mod helpers;

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use chain_auditor::{probe, FailureClass, StaticResolver};

use helpers::{
    correct_chain, leaf_only_chain, mismatched_chain, r3_context, refused_port,
    spawn_client_auth_server, spawn_full_backlog_listener, spawn_silent_listener,
    spawn_tls_server,
};

const LOOPBACK: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

fn resolver_for(host: &str) -> StaticResolver {
    StaticResolver::new().with(host, LOOPBACK)
}

#[tokio::test]
async fn test_expected_intermediate_is_not_a_finding() {
    let addr = spawn_tls_server(correct_chain()).await;
    let ctx = r3_context(resolver_for("good.test"), addr.port(), Duration::from_secs(5));

    let result = probe("good.test".to_string(), &ctx).await;
    assert!(result.reachable, "{result:?}");
    assert!(!result.mismatched);
    assert_eq!(result.failure_class, FailureClass::None);
    assert_eq!(result.peer_ip.as_deref(), Some("127.0.0.1"));
    assert_eq!(result.chain_length, 2);
    assert_eq!(result.leaf_subject.as_deref(), Some("localhost"));
    assert!(matches!(result.tls_version.as_deref(), Some("1.2" | "1.3")));
}

#[tokio::test]
async fn test_wrong_intermediate_is_a_finding() {
    let addr = spawn_tls_server(mismatched_chain()).await;
    let ctx = r3_context(resolver_for("bad.test"), addr.port(), Duration::from_secs(5));

    let result = probe("bad.test".to_string(), &ctx).await;
    assert!(result.reachable, "{result:?}");
    assert!(result.mismatched);
    assert_eq!(result.peer_ip.as_deref(), Some("127.0.0.1"));
}

#[tokio::test]
async fn test_leaf_only_chain_is_not_a_finding() {
    let addr = spawn_tls_server(leaf_only_chain()).await;
    let ctx = r3_context(resolver_for("lonely.test"), addr.port(), Duration::from_secs(5));

    let result = probe("lonely.test".to_string(), &ctx).await;
    assert!(result.reachable, "{result:?}");
    assert!(!result.mismatched);
    assert!(result.is_leaf_only());
}

#[tokio::test]
async fn test_ip_literal_skips_resolver() {
    let addr = spawn_tls_server(mismatched_chain()).await;
    let ctx = r3_context(StaticResolver::new(), addr.port(), Duration::from_secs(5));

    let result = probe("127.0.0.1".to_string(), &ctx).await;
    assert!(result.reachable, "{result:?}");
    assert!(result.mismatched);
}

#[tokio::test]
async fn test_mismatch_survives_failed_handshake() {
    let addr = spawn_client_auth_server(mismatched_chain()).await;
    let ctx = r3_context(resolver_for("strict.test"), addr.port(), Duration::from_secs(5));

    let result = probe("strict.test".to_string(), &ctx).await;
    assert!(!result.reachable, "{result:?}");
    assert!(result.mismatched);
    assert_eq!(result.failure_class, FailureClass::OtherNetwork);
    assert_eq!(result.peer_ip.as_deref(), Some("127.0.0.1"));
}

#[tokio::test]
async fn test_silent_peer_times_out() {
    let addr = spawn_silent_listener().await;
    let ctx = r3_context(
        resolver_for("silent.test"),
        addr.port(),
        Duration::from_millis(300),
    );

    let result = probe("silent.test".to_string(), &ctx).await;
    assert!(!result.reachable);
    assert!(!result.mismatched);
    assert_eq!(result.failure_class, FailureClass::Timeout);
    assert_eq!(result.peer_ip.as_deref(), Some("127.0.0.1"));
}

#[tokio::test]
async fn test_unanswered_connect_times_out() {
    let backlog = spawn_full_backlog_listener().await;
    let ctx = r3_context(
        resolver_for("backlog.test"),
        backlog.addr.port(),
        Duration::from_millis(300),
    );

    let result = probe("backlog.test".to_string(), &ctx).await;
    assert!(!result.reachable);
    assert!(!result.mismatched);
    assert_eq!(result.failure_class, FailureClass::Timeout);
    assert!(result.peer_ip.is_none(), "no connection was established");
    drop(backlog);
}

#[tokio::test]
async fn test_refused_port_is_other_network() {
    let ctx = r3_context(
        resolver_for("closed.test"),
        refused_port(),
        Duration::from_secs(2),
    );

    let result = probe("closed.test".to_string(), &ctx).await;
    assert!(!result.reachable);
    assert_eq!(result.failure_class, FailureClass::OtherNetwork);
    assert!(result.peer_ip.is_none());
}

#[tokio::test]
async fn test_unknown_name_is_dns_error() {
    let ctx = r3_context(StaticResolver::new(), 443, Duration::from_secs(2));

    let result = probe("nowhere.test".to_string(), &ctx).await;
    assert!(!result.reachable);
    assert!(!result.mismatched);
    assert_eq!(result.failure_class, FailureClass::DnsError);
}
