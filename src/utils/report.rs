use crate::core::engine::SearchReport;
use crate::core::export::render_table;
use crate::utils::error::{ErrorSeverity, FinderError};

/// Prints search results to stdout.
pub fn print_report(report: &SearchReport, show_raw: bool) {
    let outcome = &report.outcome;

    if outcome.is_empty() {
        println!("⚠️ No valid companies found. Try relaxing filters or increasing the max companies.");
        println!();
        println!("Model raw output:");
        println!("{}", outcome.raw_output);
        return;
    }

    println!("✅ Found {} companies.", outcome.records.len());
    println!();
    println!("{}", render_table(&outcome.records));

    if !report.exported.is_empty() {
        println!();
        for path in &report.exported {
            println!("📁 Saved {}", path);
        }
    }

    if show_raw {
        println!();
        println!("Model raw output:");
        println!("{}", outcome.raw_output);
    }
}

/// Logs and prints a failed search, returning the process exit code.
pub fn report_failure(e: &FinderError) -> i32 {
    tracing::error!(
        "❌ Search failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    exit_code(e.severity())
}

pub fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_follow_severity() {
        let network = FinderError::upstream(500, "oops");
        assert_eq!(exit_code(network.severity()), 2);

        let missing = FinderError::MissingConfigError {
            field: "api_key".to_string(),
        };
        assert_eq!(exit_code(missing.severity()), 1);

        let unexpected = FinderError::ProcessingError {
            message: "bad".to_string(),
        };
        assert_eq!(exit_code(unexpected.severity()), 3);
    }
}
