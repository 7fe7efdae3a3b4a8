// Shared test helpers: generated certificate chains and local TLS endpoints.
//
// Every integration test probes servers on the loopback interface, so no
// test depends on outside network access.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use rcgen::{BasicConstraints, Certificate, CertificateParams, DnType, IsCa, KeyPair};
use rustls::crypto::ring::default_provider;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::server::WebPkiClientVerifier;
use rustls::{RootCertStore, ServerConfig};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio_rustls::TlsAcceptor;

use chain_auditor::initialization::init_tls_provider;
use chain_auditor::{AuthorityExpectation, ExpectationRule, ProbeContext, StaticResolver};

/// A CA certificate together with its signing key.
#[allow(dead_code)] // Used by other test files
pub struct Authority {
    pub cert: Certificate,
    pub key: KeyPair,
}

#[allow(dead_code)]
fn ca_params(common_name: &str) -> CertificateParams {
    let mut params = CertificateParams::new(Vec::<String>::new()).expect("CA params");
    params
        .distinguished_name
        .push(DnType::CommonName, common_name);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params
}

/// Creates a self-signed root.
#[allow(dead_code)]
pub fn root(common_name: &str) -> Authority {
    let key = KeyPair::generate().expect("root key");
    let cert = ca_params(common_name)
        .self_signed(&key)
        .expect("self-signed root");
    Authority { cert, key }
}

/// Creates an intermediate signed by `parent`.
#[allow(dead_code)]
pub fn intermediate(common_name: &str, parent: &Authority) -> Authority {
    let key = KeyPair::generate().expect("intermediate key");
    let cert = ca_params(common_name)
        .signed_by(&key, &parent.cert, &parent.key)
        .expect("signed intermediate");
    Authority { cert, key }
}

/// Creates a leaf for `localhost` signed by `issuer`, returning its DER and key.
#[allow(dead_code)]
pub fn leaf(issuer: &Authority) -> (CertificateDer<'static>, PrivateKeyDer<'static>) {
    let key = KeyPair::generate().expect("leaf key");
    let mut params =
        CertificateParams::new(vec!["localhost".to_string()]).expect("leaf params");
    params.distinguished_name.push(DnType::CommonName, "localhost");
    let cert = params
        .signed_by(&key, &issuer.cert, &issuer.key)
        .expect("signed leaf");
    let key_der = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key.serialize_der()));
    (cert.der().clone(), key_der)
}

/// A chain ready to be served: leaf first, then whatever follows it.
#[allow(dead_code)]
pub struct ServedChain {
    pub presented: Vec<CertificateDer<'static>>,
    pub key: PrivateKeyDer<'static>,
    pub root: CertificateDer<'static>,
}

/// Leaf issued by `R3`, served with the `R3` intermediate.
#[allow(dead_code)]
pub fn correct_chain() -> ServedChain {
    let root = root("Test Root X1");
    let r3 = intermediate("R3", &root);
    let (leaf, key) = leaf(&r3);
    ServedChain {
        presented: vec![leaf, r3.cert.der().clone()],
        key,
        root: root.cert.der().clone(),
    }
}

/// Leaf issued by `R3`, served with an unrelated `X1` intermediate.
#[allow(dead_code)]
pub fn mismatched_chain() -> ServedChain {
    let root = root("Test Root X1");
    let r3 = intermediate("R3", &root);
    let x1 = intermediate("X1", &root);
    let (leaf, key) = leaf(&r3);
    ServedChain {
        presented: vec![leaf, x1.cert.der().clone()],
        key,
        root: root.cert.der().clone(),
    }
}

/// Leaf issued by `R3`, served alone.
#[allow(dead_code)]
pub fn leaf_only_chain() -> ServedChain {
    let root = root("Test Root X1");
    let r3 = intermediate("R3", &root);
    let (leaf, key) = leaf(&r3);
    ServedChain {
        presented: vec![leaf],
        key,
        root: root.cert.der().clone(),
    }
}

#[allow(dead_code)]
fn serve(listener: TcpListener, config: ServerConfig) {
    let acceptor = TlsAcceptor::from(Arc::new(config));
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                if let Ok(mut tls) = acceptor.accept(stream).await {
                    let _ = tls.shutdown().await;
                }
            });
        }
    });
}

/// Starts a TLS server on 127.0.0.1 presenting `chain` to every client.
#[allow(dead_code)]
pub async fn spawn_tls_server(chain: ServedChain) -> SocketAddr {
    let config = ServerConfig::builder_with_provider(Arc::new(default_provider()))
        .with_safe_default_protocol_versions()
        .expect("protocol versions")
        .with_no_client_auth()
        .with_single_cert(chain.presented, chain.key)
        .expect("server certificate");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    serve(listener, config);
    addr
}

/// Starts a TLS 1.2 server that presents `chain` and then aborts the
/// handshake because the client sends no certificate of its own.
#[allow(dead_code)]
pub async fn spawn_client_auth_server(chain: ServedChain) -> SocketAddr {
    let provider = Arc::new(default_provider());
    let mut roots = RootCertStore::empty();
    roots.add(chain.root.clone()).expect("client auth root");
    let client_verifier =
        WebPkiClientVerifier::builder_with_provider(Arc::new(roots), Arc::clone(&provider))
            .build()
            .expect("client verifier");
    let config = ServerConfig::builder_with_provider(provider)
        .with_protocol_versions(&[&rustls::version::TLS12])
        .expect("protocol versions")
        .with_client_cert_verifier(client_verifier)
        .with_single_cert(chain.presented, chain.key)
        .expect("server certificate");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    serve(listener, config);
    addr
}

/// Starts a listener that accepts connections and never answers.
#[allow(dead_code)]
pub async fn spawn_silent_listener() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    addr
}

/// A loopback listener that never accepts and whose accept queue is full,
/// so further connection attempts get no answer.
#[allow(dead_code)]
pub struct FullBacklog {
    pub addr: SocketAddr,
    _listener: TcpListener,
    _held: Vec<TcpStream>,
}

#[allow(dead_code)]
pub async fn spawn_full_backlog_listener() -> FullBacklog {
    let socket = TcpSocket::new_v4().expect("socket");
    socket
        .bind("127.0.0.1:0".parse().expect("loopback addr"))
        .expect("bind");
    let listener = socket.listen(1).expect("listen");
    let addr = listener.local_addr().expect("local addr");

    let mut held = Vec::new();
    for _ in 0..8 {
        match tokio::time::timeout(Duration::from_millis(100), TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => held.push(stream),
            _ => break,
        }
    }
    FullBacklog {
        addr,
        _listener: listener,
        _held: held,
    }
}

/// A loopback port with nothing listening on it.
#[allow(dead_code)]
pub fn refused_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    port
}

/// Probe context auditing `R3=R3` against `resolver` on `port`.
#[allow(dead_code)]
pub fn r3_context(
    resolver: StaticResolver,
    port: u16,
    timeout: Duration,
) -> Arc<ProbeContext<StaticResolver>> {
    Arc::new(ProbeContext {
        expectations: Arc::new(AuthorityExpectation::from_rules(&[ExpectationRule::new(
            "R3", "R3",
        )])),
        resolver: Arc::new(resolver),
        provider: init_tls_provider(),
        timeout,
        port,
        verbose: false,
    })
}
