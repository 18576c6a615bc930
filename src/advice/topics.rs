use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Financial education topics offered by `learn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EducationTopic {
    CreditScores,
    DebtToIncome,
    DownPayment,
    LoanTerms,
    FinancialPlanning,
}

impl EducationTopic {
    pub const ALL: [EducationTopic; 5] = [
        EducationTopic::CreditScores,
        EducationTopic::DebtToIncome,
        EducationTopic::DownPayment,
        EducationTopic::LoanTerms,
        EducationTopic::FinancialPlanning,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            EducationTopic::CreditScores => "Understanding Credit Scores",
            EducationTopic::DebtToIncome => "Debt-to-Income Ratio",
            EducationTopic::DownPayment => "Down Payment Strategies",
            EducationTopic::LoanTerms => "Loan Terms and Interest Rates",
            EducationTopic::FinancialPlanning => "Financial Planning",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            EducationTopic::CreditScores => "credit-scores",
            EducationTopic::DebtToIncome => "debt-to-income",
            EducationTopic::DownPayment => "down-payment",
            EducationTopic::LoanTerms => "loan-terms",
            EducationTopic::FinancialPlanning => "financial-planning",
        }
    }
}

impl fmt::Display for EducationTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for EducationTopic {
    type Err = String;

    /// Accepts the slug or the title, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        EducationTopic::ALL
            .into_iter()
            .find(|topic| {
                topic.slug().eq_ignore_ascii_case(wanted) || topic.title().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| {
                let slugs: Vec<&str> = EducationTopic::ALL.iter().map(|t| t.slug()).collect();
                format!("unknown topic '{}' (expected one of: {})", wanted, slugs.join(", "))
            })
    }
}
