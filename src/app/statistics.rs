//! End-of-run statistics.

use log::info;
use strum::IntoEnumIterator;

use crate::aggregate::Tally;
use crate::error_handling::FailureClass;

/// Logs the final tally broken down by failure class, then a one-line summary.
pub fn print_final_statistics(tally: &Tally, elapsed_seconds: f64) {
    if tally.unreachable > 0 {
        info!("Unreachable hosts ({} total):", tally.unreachable);
        for class in FailureClass::iter().filter(|c| *c != FailureClass::None) {
            let count = tally.count(class);
            if count > 0 {
                info!("   {}: {}", class.as_str(), count);
            }
        }
    }

    if tally.leaf_only > 0 {
        info!(
            "{} host{} presented a leaf certificate with no intermediate",
            tally.leaf_only,
            if tally.leaf_only == 1 { "" } else { "s" }
        );
    }

    info!(
        "Audited {} hostname{} ({} mismatched, {} unreachable) in {:.1}s",
        tally.processed,
        if tally.processed == 1 { "" } else { "s" },
        tally.mismatched,
        tally.unreachable,
        elapsed_seconds
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_final_statistics_empty() {
        print_final_statistics(&Tally::default(), 0.0);
    }

    #[test]
    fn test_print_final_statistics_with_failures() {
        let tally = Tally {
            processed: 5,
            mismatched: 1,
            unreachable: 3,
            dns_error: 1,
            timeout: 1,
            other_network: 1,
            leaf_only: 1,
        };
        print_final_statistics(&tally, 1.5);
    }
}
