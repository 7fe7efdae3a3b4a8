//! Chain consistency check.

use super::{AuthorityExpectation, CertificateChain};

/// Decides whether a presented chain is missing the intermediate its leaf's
/// issuer requires.
///
/// Returns `false` when:
/// - fewer than two certificates were presented (nothing to audit),
/// - the leaf's issuer label has no entry in `expectations`,
/// - any certificate after the leaf carries an acceptable subject label.
///
/// Pure; safe to call from any number of workers at once.
pub fn is_mismatched(chain: &CertificateChain, expectations: &AuthorityExpectation) -> bool {
    if chain.len() < 2 {
        return false;
    }
    let Some(leaf) = chain.leaf() else {
        return false;
    };
    let Some(expected) = expectations.expected(&leaf.issuer) else {
        return false;
    };
    !chain
        .intermediates()
        .iter()
        .any(|cert| expected.contains(&cert.subject))
}
