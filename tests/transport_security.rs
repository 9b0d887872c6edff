use std::io::Write;
use std::sync::Arc;

use article_facade_lib::error::AppError;
use article_facade_lib::proxy::{ArticleService, FacadeError, ProxyConfig, TransportTrustPolicy};
use p12_keystore::{KeyStore, KeyStoreEntry};
use rcgen::{
    BasicConstraints, CertificateParams, DnType, ExtendedKeyUsagePurpose, IsCa, KeyPair,
    KeyUsagePurpose,
};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use tempfile::NamedTempFile;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_rustls::TlsAcceptor;

const ARTICLE_BODY: &str = r#"{"id":1,"title":"Over TLS","text":"t","author":"a"}"#;

/// A CA and a `localhost` server certificate issued by it
struct TestPki {
    ca_pem: String,
    ca_der: CertificateDer<'static>,
    server_cert: CertificateDer<'static>,
    server_key: PrivateKeyDer<'static>,
}

fn issue_pki(ca_name: &str) -> TestPki {
    let ca_key = KeyPair::generate().unwrap();
    let mut ca_params = CertificateParams::new(Vec::<String>::new()).unwrap();
    ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    ca_params.distinguished_name.push(DnType::CommonName, ca_name);
    ca_params.key_usages = vec![
        KeyUsagePurpose::KeyCertSign,
        KeyUsagePurpose::CrlSign,
        KeyUsagePurpose::DigitalSignature,
    ];
    let ca_cert = ca_params.self_signed(&ca_key).unwrap();

    let server_key = KeyPair::generate().unwrap();
    let mut server_params = CertificateParams::new(vec!["localhost".to_string()]).unwrap();
    server_params
        .distinguished_name
        .push(DnType::CommonName, "localhost");
    server_params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];
    let server_cert = server_params
        .signed_by(&server_key, &ca_cert, &ca_key)
        .unwrap();

    TestPki {
        ca_pem: ca_cert.pem(),
        ca_der: ca_cert.der().clone(),
        server_cert: server_cert.der().clone(),
        server_key: PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(server_key.serialize_der())),
    }
}

/// Minimal HTTPS downstream answering every request with one article
async fn spawn_tls_downstream(pki: &TestPki) -> u16 {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = rustls::ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(vec![pki.server_cert.clone()], pki.server_key.clone_key())
        .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                // Handshake failures are expected for untrusted clients
                let Ok(mut tls) = acceptor.accept(stream).await else {
                    return;
                };
                let mut buf = vec![0u8; 8192];
                let _ = tls.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    ARTICLE_BODY.len(),
                    ARTICLE_BODY
                );
                let _ = tls.write_all(response.as_bytes()).await;
                let _ = tls.shutdown().await;
            });
        }
    });

    port
}

fn write_trust_store(pem: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(pem.as_bytes()).unwrap();
    file
}

/// Password-protected PKCS#12 trust store holding the CA certificate
fn write_pkcs12_trust_store(pki: &TestPki, password: &str) -> NamedTempFile {
    let mut keystore = KeyStore::new();
    keystore.add_entry(
        "facade-test-ca",
        KeyStoreEntry::Certificate(p12_keystore::Certificate::from_der(&pki.ca_der).unwrap()),
    );
    let data = keystore.writer(password).write().unwrap();

    let mut file = tempfile::Builder::new().suffix(".p12").tempfile().unwrap();
    file.write_all(&data).unwrap();
    file
}

fn service(port: u16, transport: TransportTrustPolicy) -> ArticleService {
    let config = ProxyConfig {
        articles_url: format!("https://localhost:{}/api/v1/articles", port),
        request_timeout: 5,
        transport,
        ..Default::default()
    };
    ArticleService::new(&config).unwrap()
}

#[tokio::test]
async fn strict_mode_accepts_certificate_chaining_to_trust_store() {
    let pki = issue_pki("facade test CA");
    let port = spawn_tls_downstream(&pki).await;
    let trust_store = write_trust_store(&pki.ca_pem);

    let article = service(
        port,
        TransportTrustPolicy::StrictTruststore {
            trust_store_path: trust_store.path().to_path_buf(),
            trust_store_password: None,
        },
    )
    .read(1)
    .await
    .unwrap();

    assert_eq!(article.id, Some(1));
    assert_eq!(article.title.as_deref(), Some("Over TLS"));
}

#[tokio::test]
async fn strict_mode_accepts_password_protected_pkcs12_trust_store() {
    let pki = issue_pki("facade test CA");
    let port = spawn_tls_downstream(&pki).await;
    let trust_store = write_pkcs12_trust_store(&pki, "changeit");

    let article = service(
        port,
        TransportTrustPolicy::StrictTruststore {
            trust_store_path: trust_store.path().to_path_buf(),
            trust_store_password: Some("changeit".to_string()),
        },
    )
    .read(1)
    .await
    .unwrap();

    assert_eq!(article.title.as_deref(), Some("Over TLS"));
}

#[test]
fn strict_mode_refuses_pkcs12_trust_store_with_wrong_password() {
    let pki = issue_pki("facade test CA");
    let trust_store = write_pkcs12_trust_store(&pki, "changeit");

    let config = ProxyConfig {
        transport: TransportTrustPolicy::StrictTruststore {
            trust_store_path: trust_store.path().to_path_buf(),
            trust_store_password: Some("wrong".to_string()),
        },
        ..Default::default()
    };
    match ArticleService::new(&config) {
        Err(AppError::TrustStore(_)) => {}
        Err(other) => panic!("expected trust store error, got {:?}", other),
        Ok(_) => panic!("wrong password must not open the trust store"),
    }
}

#[tokio::test]
async fn strict_mode_rejects_certificate_outside_trust_store() {
    let pki = issue_pki("facade test CA");
    let port = spawn_tls_downstream(&pki).await;
    let unrelated = issue_pki("unrelated CA");
    let trust_store = write_trust_store(&unrelated.ca_pem);

    let err = service(
        port,
        TransportTrustPolicy::StrictTruststore {
            trust_store_path: trust_store.path().to_path_buf(),
            trust_store_password: None,
        },
    )
    .read(1)
    .await
    .unwrap_err();

    assert!(matches!(err, FacadeError::Transport(_)), "got {:?}", err);
}

#[tokio::test]
async fn unsecure_mode_accepts_any_certificate() {
    let pki = issue_pki("facade test CA");
    let port = spawn_tls_downstream(&pki).await;

    let article = service(port, TransportTrustPolicy::TrustAll)
        .read(1)
        .await
        .unwrap();

    assert_eq!(article.id, Some(1));
}
