//! Large runs: every hostname produces exactly one result and the tally
//! reconciles with what was dispatched.

mod helpers;

use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use chain_auditor::{audit_hostnames, LineSink, StaticResolver};

use helpers::{mismatched_chain, r3_context, spawn_tls_server};

const TOTAL: usize = 10_000;
const WORKERS: usize = 8;
const TLS_HOSTS: usize = 500;
const INVALID_NAMES: usize = 1_500;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_ten_thousand_hosts_reconcile() {
    let addr = spawn_tls_server(mismatched_chain()).await;

    let mut resolver = StaticResolver::new();
    let mut hostnames = Vec::with_capacity(TOTAL);
    for i in 0..TLS_HOSTS {
        let host = format!("tls-{i}.test");
        resolver.insert(&host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        hostnames.push(host);
    }
    for i in 0..INVALID_NAMES {
        hostnames.push(format!("invalid name {i}"));
    }
    while hostnames.len() < TOTAL {
        hostnames.push(format!("unresolvable-{}.test", hostnames.len()));
    }

    let ctx = r3_context(resolver, addr.port(), Duration::from_secs(10));
    let (tally, sink) = audit_hostnames(hostnames, ctx, WORKERS, LineSink::new(Vec::new()))
        .await
        .expect("audit should complete");

    assert_eq!(tally.processed, TOTAL);
    assert_eq!(tally.mismatched, TLS_HOSTS);
    assert_eq!(tally.unreachable, TOTAL - TLS_HOSTS);
    assert_eq!(tally.other_network, INVALID_NAMES);
    assert_eq!(tally.dns_error, TOTAL - TLS_HOSTS - INVALID_NAMES);
    assert_eq!(tally.timeout, 0);
    assert_eq!(
        tally.unreachable,
        tally.dns_error + tally.timeout + tally.other_network
    );

    let written = String::from_utf8(sink.into_inner().expect("flush")).expect("utf-8");
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), TLS_HOSTS + 1);
    assert_eq!(lines.last().copied(), Some(tally.to_string().as_str()));

    let findings: HashSet<&str> = lines[..TLS_HOSTS]
        .iter()
        .map(|line| {
            let (host, ip) = line.split_once('\t').expect("tab separated finding");
            assert_eq!(ip, "127.0.0.1");
            host
        })
        .collect();
    assert_eq!(findings.len(), TLS_HOSTS, "each finding recorded once");
    assert!(findings.iter().all(|host| host.starts_with("tls-")));
}

#[tokio::test]
async fn test_single_worker_matches_input_cardinality() {
    let hostnames: Vec<String> = (0..300).map(|i| format!("h{i}.test")).collect();
    let ctx = r3_context(StaticResolver::new(), 443, Duration::from_millis(200));

    let (tally, _) = audit_hostnames(hostnames, ctx, 1, LineSink::new(Vec::new()))
        .await
        .expect("audit should complete");
    assert_eq!(tally.processed, 300);
    assert_eq!(tally.dns_error, 300);
}
