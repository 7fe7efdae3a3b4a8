//! Label extraction from parsed X.509 certificates.

use x509_parser::certificate::X509Certificate;
use x509_parser::x509::X509Name;

/// Returns the last Common Name attribute of a name, or an empty string.
///
/// When a name carries several CNs the last one wins, matching how Go's
/// `pkix.Name.CommonName` labels certificates. Names without a CN (or with a CN that is not a string type) yield `""`,
/// which never matches a configured label.
fn common_name(name: &X509Name<'_>) -> String {
    name.iter_common_name()
        .last()
        .and_then(|cn| cn.as_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Extracts the Subject Common Name.
pub(crate) fn subject_label(cert: &X509Certificate<'_>) -> String {
    common_name(cert.subject())
}

/// Extracts the Issuer Common Name.
pub(crate) fn issuer_label(cert: &X509Certificate<'_>) -> String {
    common_name(cert.issuer())
}
