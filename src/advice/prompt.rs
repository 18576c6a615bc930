use super::topics::EducationTopic;
use super::AdviceRequest;
use crate::output::format_money;

/// Prompt asking the model to act as a financial advisor on one application.
pub fn build_advice_prompt(request: &AdviceRequest<'_>) -> String {
    let a = request.attributes;

    let mut lines = vec![
        "As a financial advisor, analyze this loan application and provide detailed advice:"
            .to_string(),
        String::new(),
        "Applicant Details:".to_string(),
        format!("- Age: {}", a.age),
        format!("- Annual Income: {}", format_money(a.income)),
        format!("- Years of Employment: {}", a.employment_years),
        format!("- Credit Score: {}", a.credit_score),
        format!("- Loan Amount: {}", format_money(a.loan_amount)),
        format!("- Down Payment: {}", format_money(a.down_payment)),
        format!("- Debt-to-Income Ratio: {}%", a.debt_to_income),
        format!("- Loan Term: {} years", a.loan_term),
        String::new(),
        "Eligibility Result:".to_string(),
        format!("- Eligible: {}", request.eligible),
        format!("- Confidence Score: {:.1}%", request.confidence_percent),
        String::new(),
        "Analysis Reasons:".to_string(),
    ];
    lines.extend(request.findings.iter().map(|finding| format!("- {}", finding)));
    lines.push(String::new());
    lines.push(
        "Please provide:\n\
         1. A detailed analysis of the application\n\
         2. Specific recommendations for improvement if not eligible\n\
         3. Financial advice regarding the loan terms\n\
         4. Potential risks and considerations\n\
         5. Alternative options if applicable\n\
         \n\
         Format the response in clear sections with bullet points where appropriate."
            .to_string(),
    );

    lines.join("\n")
}

/// Prompt asking the model to explain one financial topic.
pub fn build_education_prompt(topic: EducationTopic) -> String {
    format!(
        "As a financial educator, provide clear and concise information about: {}\n\
         \n\
         Please include:\n\
         1. Basic explanation\n\
         2. Key points to remember\n\
         3. Common mistakes to avoid\n\
         4. Best practices\n\
         5. Additional resources\n\
         \n\
         Format the response in a clear, easy-to-understand manner with bullet points where appropriate.",
        topic.title()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applicant::ApplicantAttributes;

    fn attributes() -> ApplicantAttributes {
        ApplicantAttributes {
            age: 30,
            income: 500_000.0,
            employment_years: 5.0,
            credit_score: 700,
            loan_amount: 2_000_000.0,
            debt_to_income: 30.0,
            down_payment: 400_000.0,
            loan_term: 30,
        }
    }

    #[test]
    fn test_advice_prompt_contains_details() {
        let attributes = attributes();
        let findings = vec![
            "Credit score (700) is below the minimum required (620)".to_string(),
            "Down payment ratio (20.0%) is below the minimum required (20.0%)".to_string(),
        ];
        let request = AdviceRequest {
            attributes: &attributes,
            eligible: true,
            confidence_percent: 87.46,
            findings: &findings,
        };
        let prompt = build_advice_prompt(&request);

        assert!(prompt.contains("- Annual Income: ₹500,000.00"));
        assert!(prompt.contains("- Loan Amount: ₹2,000,000.00"));
        assert!(prompt.contains("- Debt-to-Income Ratio: 30%"));
        assert!(prompt.contains("- Loan Term: 30 years"));
        assert!(prompt.contains("- Eligible: true"));
        assert!(prompt.contains("- Confidence Score: 87.5%"));
        assert!(prompt.contains("- Credit score (700) is below the minimum required (620)"));
        assert!(prompt.contains("- Down Payment: ₹400,000.00"));
        assert!(prompt.contains("5. Alternative options if applicable"));
        assert!(prompt.ends_with("bullet points where appropriate."));
    }

    #[test]
    fn test_findings_keep_their_order() {
        let attributes = attributes();
        let findings = vec!["first".to_string(), "second".to_string()];
        let request = AdviceRequest {
            attributes: &attributes,
            eligible: false,
            confidence_percent: 10.0,
            findings: &findings,
        };
        let prompt = build_advice_prompt(&request);
        let first = prompt.find("- first").unwrap();
        let second = prompt.find("- second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_education_prompt() {
        let prompt = build_education_prompt(EducationTopic::DownPayment);
        assert!(prompt.starts_with(
            "As a financial educator, provide clear and concise information about: Down Payment Strategies"
        ));
        assert!(prompt.contains("3. Common mistakes to avoid"));
    }
}
