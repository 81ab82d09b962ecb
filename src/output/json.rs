//! JSON serialization for permutation reports.

use crate::result::PermutationReport;

/// Serialize a PermutationReport to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails. JSON has no NaN, so a report
/// carrying a non-finite number is written with `null` in its place.
pub fn to_json(report: &PermutationReport) -> Result<String, serde_json::Error> {
    serde_json::to_string(report)
}

/// Serialize a PermutationReport to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_pretty(report: &PermutationReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tester::PermutationTester;

    fn make_report() -> PermutationReport {
        PermutationTester::new()
            .permutations(20)
            .bins(4)
            .density_points(5)
            .seed(12)
            .run(&[0.0, 0.1, 0.2], &[0.3, 0.4, 0.5])
            .unwrap()
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&make_report()).unwrap();
        assert!(json.contains("\"observed_statistic\":"));
        assert!(json.contains("\"p_value\":"));
        assert!(json.contains("\"seed\":12"));
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json_pretty(&make_report()).unwrap();
        assert!(json.contains('\n'));
        assert!(json.contains("histogram"));
    }

    #[test]
    fn round_trips_through_serde() {
        let report = make_report();
        let back: PermutationReport = serde_json::from_str(&to_json(&report).unwrap()).unwrap();
        assert_eq!(back.histogram, report.histogram);
        assert_eq!(back.metadata.seed, 12);
    }
}
