// Outbound TLS trust policy
// Builds the single HTTPS client shared by every downstream call

use std::fmt;
use std::path::{Path, PathBuf};

use p12_keystore::{KeyStore, KeyStoreEntry};
use reqwest::{Certificate, Client};
use rustls::pki_types::CertificateDer;
use rustls::RootCertStore;
use serde::{Deserialize, Serialize};
use tokio::time::Duration;

use crate::error::{AppError, AppResult};

const USER_AGENT: &str = concat!("article-facade/", env!("CARGO_PKG_VERSION"));
const PKCS12_EXTENSIONS: [&str; 3] = ["p12", "pfx", "pkcs12"];

/// How downstream server certificates are validated.
///
/// Selected once at startup. `TrustAll` has to be named explicitly
/// (`"mode": "unsecure"`) and is never the default.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum TransportTrustPolicy {
    /// Only certificates chaining to the trust store are accepted.
    #[serde(rename = "strict")]
    StrictTruststore {
        trust_store_path: PathBuf,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trust_store_password: Option<String>,
    },
    /// Any certificate chain is accepted. Local and integration testing only.
    #[serde(rename = "unsecure")]
    TrustAll,
}

impl Default for TransportTrustPolicy {
    fn default() -> Self {
        TransportTrustPolicy::StrictTruststore {
            trust_store_path: PathBuf::from("truststore.pem"),
            trust_store_password: None,
        }
    }
}

impl fmt::Debug for TransportTrustPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportTrustPolicy::StrictTruststore {
                trust_store_path,
                trust_store_password,
            } => f
                .debug_struct("StrictTruststore")
                .field("trust_store_path", trust_store_path)
                .field(
                    "trust_store_password",
                    &trust_store_password.as_ref().map(|_| "***"),
                )
                .finish(),
            TransportTrustPolicy::TrustAll => f.write_str("TrustAll"),
        }
    }
}

impl TransportTrustPolicy {
    pub fn is_strict(&self) -> bool {
        matches!(self, TransportTrustPolicy::StrictTruststore { .. })
    }
}

/// Build the outbound HTTP client for the given trust policy
pub fn build_http_client(policy: &TransportTrustPolicy, timeout_secs: u64) -> AppResult<Client> {
    let mut builder = Client::builder()
        .use_rustls_tls()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT);

    match policy {
        TransportTrustPolicy::StrictTruststore {
            trust_store_path,
            trust_store_password,
        } => {
            let certificates =
                load_trust_material(trust_store_path, trust_store_password.as_deref())?;

            let count = certificates.len();
            builder = builder.tls_built_in_root_certs(false);
            for certificate in certificates {
                builder = builder.add_root_certificate(certificate);
            }
            tracing::info!(
                "Outbound TLS restricted to {} certificate(s) from {}",
                count,
                trust_store_path.display()
            );
        }
        TransportTrustPolicy::TrustAll => {
            tracing::warn!(
                "Outbound TLS certificate validation DISABLED (unsecure profile) - downstream connections are open to MITM attacks"
            );
            builder = builder.danger_accept_invalid_certs(true);
        }
    }

    builder.build().map_err(AppError::Network)
}

/// Read trust material from a PKCS#12 store, a PEM bundle or a single DER certificate.
///
/// PKCS#12 is picked by a `.p12`/`.pfx`/`.pkcs12` extension, or for non-PEM
/// input when a password is configured. Every certificate is parsed before
/// the client is built so broken material fails here as a trust store error.
fn load_trust_material(path: &Path, password: Option<&str>) -> AppResult<Vec<Certificate>> {
    let bytes = std::fs::read(path).map_err(|e| {
        AppError::TrustStore(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let parse_error =
        |e: String| AppError::TrustStore(format!("Failed to parse {}: {}", path.display(), e));

    let ders = if is_pem(&bytes) {
        if password.is_some() {
            tracing::debug!(
                "Trust store password is not needed for PEM material: {}",
                path.display()
            );
        }
        rustls_pemfile::certs(&mut bytes.as_slice())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| parse_error(e.to_string()))?
    } else if password.is_some() || is_pkcs12_path(path) {
        pkcs12_certificates(&bytes, password.unwrap_or_default()).map_err(parse_error)?
    } else {
        vec![CertificateDer::from(bytes)]
    };

    if ders.is_empty() {
        return Err(AppError::TrustStore(format!(
            "No certificates found in {}",
            path.display()
        )));
    }

    let mut roots = RootCertStore::empty();
    for der in &ders {
        roots
            .add(der.clone())
            .map_err(|e| parse_error(e.to_string()))?;
    }

    ders.iter()
        .map(|der| Certificate::from_der(der.as_ref()).map_err(|e| parse_error(e.to_string())))
        .collect()
}

/// Trusted certificates and key chain certificates of a PKCS#12 store
fn pkcs12_certificates(
    bytes: &[u8],
    password: &str,
) -> Result<Vec<CertificateDer<'static>>, String> {
    let keystore = KeyStore::from_pkcs12(bytes, password)
        .map_err(|e| format!("cannot open PKCS#12 store (wrong password?): {}", e))?;

    let mut ders = Vec::new();
    for (alias, entry) in keystore.entries() {
        if let KeyStoreEntry::Certificate(certificate) = entry {
            ders.push(CertificateDer::from(certificate.as_der().to_vec()));
        } else if let KeyStoreEntry::PrivateKeyChain(chain) = entry {
            tracing::debug!("Using certificate chain of key entry '{}' as trust material", alias);
            ders.extend(
                chain
                    .chain()
                    .iter()
                    .map(|certificate| CertificateDer::from(certificate.as_der().to_vec())),
            );
        }
    }
    Ok(ders)
}

fn is_pkcs12_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            PKCS12_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

fn is_pem(bytes: &[u8]) -> bool {
    bytes.windows(b"-----BEGIN".len()).any(|w| w == b"-----BEGIN")
}
