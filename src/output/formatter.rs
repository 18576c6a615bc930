use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::advice::EducationTopic;
use crate::eligibility::{CriterionScore, EligibilityResult, PaymentSummary};

/// Prefix for every displayed amount
pub const CURRENCY_SYMBOL: &str = "₹";

/// Widest divider drawn, even on very wide terminals
const MAX_DIVIDER_WIDTH: usize = 60;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Horizontal rule sized to the terminal
pub fn divider() -> String {
    let width = get_terminal_width()
        .unwrap_or(MAX_DIVIDER_WIDTH)
        .min(MAX_DIVIDER_WIDTH);
    "─".repeat(width)
}

/// Format an amount with thousands separators and two decimals: 1234567.891 -> "1,234,567.89"
pub fn format_amount(amount: f64) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }

    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // "-0.00" reads oddly, keep the sign only for amounts that survive rounding
    let sign = if amount < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, cents)
}

/// Amount with the currency prefix: 500000.0 -> "₹500,000.00"
pub fn format_money(amount: f64) -> String {
    format!("{}{}", CURRENCY_SYMBOL, format_amount(amount))
}

fn heading(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

/// Decision line plus the "Analysis" bullet list
pub fn format_result(result: &EligibilityResult, use_colors: bool) -> String {
    let decision = if result.eligible {
        let text = format!(
            "✅ Congratulations! You are eligible for the loan. (Confidence: {:.1}%)",
            result.confidence_percent
        );
        if use_colors {
            text.green().to_string()
        } else {
            text
        }
    } else {
        let text = format!(
            "❌ Sorry, you are not eligible for the loan at this time. (Confidence: {:.1}%)",
            result.confidence_percent
        );
        if use_colors {
            text.red().to_string()
        } else {
            text
        }
    };

    let mut lines = vec![decision, String::new(), heading("Analysis", use_colors)];
    lines.extend(result.findings.iter().map(|finding| format!("• {}", finding)));
    lines.join("\n")
}

/// "Monthly Payment Details" block
pub fn format_payment(payment: &PaymentSummary, use_colors: bool) -> String {
    let monthly = format_money(payment.monthly_payment);
    let monthly = if use_colors {
        monthly.bold().to_string()
    } else {
        monthly
    };

    [
        heading("Monthly Payment Details", use_colors),
        format!("  Principal:            {}", format_money(payment.principal)),
        format!("  Loan Term:            {} years", payment.term_years),
        format!("  Annual Interest Rate: {:.1}%", payment.annual_rate * 100.0),
        format!("  Monthly Payment:      {}", monthly),
        format!("  Total Paid:           {}", format_money(payment.total_paid)),
        format!("  Total Interest:       {}", format_money(payment.total_interest)),
    ]
    .join("\n")
}

/// Per-criterion weights for verbose output
pub fn format_breakdown(breakdown: &[CriterionScore], use_colors: bool) -> String {
    let label_width = breakdown
        .iter()
        .map(|score| score.criterion.label().len())
        .max()
        .unwrap_or(0);

    let mut lines = vec![heading("Score Breakdown", use_colors)];
    for score in breakdown {
        let line = format!(
            "  {:<width$}  value {:>10}  weight {:.3} × {:.2} = {:.4}",
            score.criterion.label(),
            trim_number(score.value),
            score.weight,
            score.fixed_weight,
            score.contribution,
            width = label_width
        );
        if use_colors && score.weight < 1.0 {
            lines.push(line.yellow().to_string());
        } else {
            lines.push(line);
        }
    }
    lines.join("\n")
}

/// 700.0 -> "700", 0.2 -> "0.2"
fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        let text = format!("{:.4}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Caller-side validation failures, one per line
pub fn format_field_errors(errors: &[String], use_colors: bool) -> String {
    let mut lines = vec![if use_colors {
        "Invalid application:".red().bold().to_string()
    } else {
        "Invalid application:".to_string()
    }];
    lines.extend(errors.iter().map(|e| format!("  - {}", e)));
    lines.join("\n")
}

/// Topic list for `learn --list`
pub fn format_topics(use_colors: bool) -> String {
    EducationTopic::ALL
        .iter()
        .map(|topic| {
            if use_colors {
                format!("{:<20} {}", topic.slug().cyan(), topic.title())
            } else {
                format!("{:<20} {}", topic.slug(), topic.title())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applicant::ApplicantAttributes;
    use crate::eligibility::{evaluate, EligibilityConfig};

    fn eligible_result() -> EligibilityResult {
        let attributes = ApplicantAttributes {
            age: 35,
            income: 150_000.0,
            employment_years: 10.0,
            credit_score: 780,
            loan_amount: 300_000.0,
            debt_to_income: 20.0,
            down_payment: 100_000.0,
            loan_term: 30,
        };
        evaluate(&attributes, &EligibilityConfig::default())
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(999.999), "1,000.00");
        assert_eq!(format_amount(1_234_567.891), "1,234,567.89");
        assert_eq!(format_amount(500_000.0), "500,000.00");
        assert_eq!(format_amount(-1500.5), "-1,500.50");
        assert_eq!(format_amount(-0.001), "0.00");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(500_000.0), "₹500,000.00");
        assert_eq!(format_money(0.0), "₹0.00");
    }

    #[test]
    fn test_format_result_eligible() {
        let result = eligible_result();
        let text = format_result(&result, false);
        assert!(text.starts_with("✅ Congratulations! You are eligible for the loan. (Confidence: 100.0%)"));
        assert!(text.contains("• All criteria have been met successfully!"));
    }

    #[test]
    fn test_format_result_not_eligible() {
        let result = EligibilityResult::invalid_input();
        let text = format_result(&result, false);
        assert!(text.starts_with(
            "❌ Sorry, you are not eligible for the loan at this time. (Confidence: 0.0%)"
        ));
        assert!(text.contains("Analysis\n• Invalid input data. Please check your inputs."));
    }

    #[test]
    fn test_format_payment() {
        let payment = PaymentSummary::new(200_000.0, 30, 0.06);
        let text = format_payment(&payment, false);
        assert!(text.contains("Principal:            ₹200,000.00"));
        assert!(text.contains("Annual Interest Rate: 6.0%"));
        assert!(text.contains("Monthly Payment:      ₹1,199.10"));
        assert!(text.contains("Loan Term:            30 years"));
    }

    #[test]
    fn test_format_breakdown_lists_every_criterion() {
        let result = eligible_result();
        let text = format_breakdown(&result.breakdown, false);
        assert_eq!(text.lines().count(), 1 + result.breakdown.len());
        assert!(text.contains("value        780"));
    }

    #[test]
    fn test_trim_number() {
        assert_eq!(trim_number(700.0), "700");
        assert_eq!(trim_number(0.2), "0.2");
        assert_eq!(trim_number(0.33333), "0.3333");
    }

    #[test]
    fn test_format_field_errors() {
        let errors = vec![
            "Age must be at least 18 years".to_string(),
            "Loan term must be 15, 20, or 30 years".to_string(),
        ];
        let text = format_field_errors(&errors, false);
        assert_eq!(
            text,
            "Invalid application:\n  - Age must be at least 18 years\n  - Loan term must be 15, 20, or 30 years"
        );
    }

    #[test]
    fn test_format_topics() {
        let text = format_topics(false);
        assert_eq!(text.lines().count(), EducationTopic::ALL.len());
        assert!(text.contains("credit-scores"));
        assert!(text.contains("Understanding Credit Scores"));
    }
}
