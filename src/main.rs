use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use loan_check::advice::cache::{clear_cache, get_cache_path, EducationCache};
use loan_check::advice::{
    advice_or_unavailable, education_or_unavailable, AdviceOutcome, AdviceRequest, EducationTopic,
    GeminiClient, ADVICE_UNAVAILABLE,
};
use loan_check::applicant::{validate_application, ApplicantAttributes, ApplicationForm};
use loan_check::config::{AdviceConfig, Config};
use loan_check::credentials::{resolve_api_key, ENV_API_KEY_VAR};
use loan_check::eligibility::{evaluate, PaymentSummary};
use loan_check::output;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_AUTH: i32 = 3;
const EXIT_CONFIG: i32 = 4;

/// Applicant attributes, from flags and/or an application file
#[derive(Args, Debug, Clone, Default)]
struct CheckArgs {
    /// Applicant age in years
    #[arg(long)]
    age: Option<u32>,

    /// Annual income
    #[arg(long, allow_negative_numbers = true)]
    income: Option<f64>,

    /// Years with the current employer
    #[arg(long, allow_negative_numbers = true)]
    employment_years: Option<f64>,

    /// Credit score (300-850)
    #[arg(long)]
    credit_score: Option<u32>,

    /// Requested loan amount
    #[arg(long, allow_negative_numbers = true)]
    loan_amount: Option<f64>,

    /// Monthly debt payments as a percentage of monthly income (0-100)
    #[arg(long, allow_negative_numbers = true)]
    debt_to_income: Option<f64>,

    /// Down payment amount
    #[arg(long, allow_negative_numbers = true)]
    down_payment: Option<f64>,

    /// Loan term in years (15, 20 or 30)
    #[arg(long)]
    loan_term: Option<u32>,

    /// YAML or JSON application file; flags override its values
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Skip the AI advice request
    #[arg(long)]
    no_advice: bool,
}

impl CheckArgs {
    fn form(&self) -> ApplicationForm {
        ApplicationForm {
            age: self.age,
            income: self.income,
            employment_years: self.employment_years,
            credit_score: self.credit_score,
            loan_amount: self.loan_amount,
            debt_to_income: self.debt_to_income,
            down_payment: self.down_payment,
            loan_term: self.loan_term,
        }
    }

    fn is_empty(&self) -> bool {
        self.input.is_none() && self.form() == ApplicationForm::default()
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check loan eligibility (default when applicant flags are given)
    Check(CheckArgs),
    /// Show the amortized monthly payment for a loan
    Payment {
        /// Amount borrowed
        #[arg(long, allow_negative_numbers = true)]
        principal: f64,

        /// Term in years
        #[arg(long)]
        term: u32,

        /// Annual interest rate as a fraction (defaults to the configured rate, 0.06)
        #[arg(long, allow_negative_numbers = true)]
        rate: Option<f64>,
    },
    /// Financial education on a topic (slug or title)
    Learn {
        topic: Option<EducationTopic>,

        /// List the available topics
        #[arg(long)]
        list: bool,

        /// Remove cached educational content
        #[arg(long)]
        clear_cache: bool,
    },
    /// Create a config file interactively
    Init {
        /// Path to write the config file (defaults to ~/.config/loan-check/config.yaml)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Write the default configuration without asking
        #[arg(long)]
        defaults: bool,
    },
    /// Check the local setup (config, .env, API key, advice service)
    Doctor,
    /// Store the Gemini API key in the system keyring
    Auth,
}

#[derive(Parser, Debug)]
#[command(name = "loan-check")]
#[command(about = "Loan eligibility checks with explained decisions", long_about = None)]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Enable verbose logging and the per-criterion breakdown
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/loan-check/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Machine-readable JSON output
    #[arg(long, global = true)]
    json: bool,

    /// Bypass the educational content cache
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    check: CheckArgs,
}

/// Output switches shared by every subcommand
struct Ui {
    verbose: bool,
    json: bool,
    use_colors: bool,
}

impl Ui {
    fn print<T: serde::Serialize>(&self, report: &T) -> i32 {
        match output::to_json(report) {
            Ok(json) => {
                println!("{}", json);
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to serialize output: {}", e);
                EXIT_CONFIG
            }
        }
    }
}

#[tokio::main]
async fn main() {
    let dotenv_path = dotenvy::dotenv().ok();

    // Install rustls crypto provider (required for rustls 0.23+); Err means one is already set
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();

    let config = match loan_check::config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = loan_check::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    if let Err(e) = loan_check::telemetry::init(config.log_level(), cli.verbose) {
        eprintln!("{}", e);
        std::process::exit(EXIT_CONFIG);
    }

    let ui = Ui {
        verbose: cli.verbose,
        json: cli.json,
        use_colors: !cli.json && output::should_use_colors(),
    };

    let command = match cli.command {
        Some(command) => command,
        None if cli.check.is_empty() => {
            let _ = Cli::command().print_help();
            std::process::exit(EXIT_SUCCESS);
        }
        None => Commands::Check(cli.check),
    };

    let code = match command {
        Commands::Check(args) => run_check(&ui, &config, args).await,
        Commands::Payment {
            principal,
            term,
            rate,
        } => run_payment(&ui, &config, principal, term, rate),
        Commands::Learn {
            topic,
            list,
            clear_cache: clear,
        } => run_learn(&ui, &config, topic, list, clear, cli.no_cache).await,
        Commands::Init { path, defaults } => {
            match loan_check::config::init::run_init_wizard(path, defaults) {
                Ok(()) => EXIT_SUCCESS,
                Err(e) => {
                    eprintln!("Init failed: {:#}", e);
                    EXIT_CONFIG
                }
            }
        }
        Commands::Doctor => {
            let config_path = cli
                .config
                .clone()
                .unwrap_or_else(loan_check::config::get_config_path);
            run_doctor(&ui, &config, &config_path, dotenv_path.as_deref()).await
        }
        Commands::Auth => match loan_check::credentials::setup_api_key().await {
            Ok(key) => {
                info!(source = %key.source, "API key stored");
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("Credential error: {:#}", e);
                EXIT_AUTH
            }
        },
    };

    std::process::exit(code);
}

fn report_field_errors(ui: &Ui, errors: &[String]) -> i32 {
    if ui.json {
        ui.print(&output::FieldErrorsReport { errors });
    } else {
        eprintln!("{}", output::format_field_errors(errors, ui.use_colors));
    }
    EXIT_INPUT
}

/// Build the applicant from the file and flags, then run caller-side validation
fn collect_application(args: &CheckArgs) -> Result<ApplicantAttributes, Vec<String>> {
    let form = match args.input {
        Some(ref path) => ApplicationForm::from_path(path)
            .map_err(|e| vec![format!("{:#}", e)])?
            .merge(args.form()),
        None => args.form(),
    };

    let attributes = form.into_attributes()?;
    validate_application(&attributes)?;
    Ok(attributes)
}

/// Ask for advice when the service is enabled and a key is available.
/// None means advice was skipped.
async fn fetch_advice(
    ui: &Ui,
    advice_config: &AdviceConfig,
    request: &AdviceRequest<'_>,
) -> Option<AdviceOutcome> {
    if !advice_config.enabled {
        debug!("advice service disabled in config");
        return None;
    }

    let key = match resolve_api_key().await {
        Ok(Some(key)) => key,
        Ok(None) => {
            if !ui.json {
                eprintln!(
                    "AI advice skipped: no API key (set {} or run `loan-check auth`).",
                    ENV_API_KEY_VAR
                );
            }
            return None;
        }
        Err(e) => {
            warn!(error = %e, "could not read API key");
            if !ui.json {
                eprintln!("AI advice skipped: {}. Set {} instead.", e, ENV_API_KEY_VAR);
            }
            return None;
        }
    };
    debug!(source = %key.source, "using API key");

    let client = match GeminiClient::new(advice_config, key.value) {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "could not create advice client");
            return Some(AdviceOutcome::Unavailable(ADVICE_UNAVAILABLE.to_string()));
        }
    };

    if !ui.json {
        eprintln!("Requesting AI advice...");
    }
    Some(advice_or_unavailable(&client, request).await)
}

async fn run_check(ui: &Ui, config: &Config, args: CheckArgs) -> i32 {
    let attributes = match collect_application(&args) {
        Ok(attributes) => attributes,
        Err(errors) => return report_field_errors(ui, &errors),
    };

    let eligibility = config.eligibility.clone().unwrap_or_default();
    let result = evaluate(&attributes, &eligibility);
    info!(
        eligible = result.eligible,
        confidence = result.confidence_percent,
        "evaluated application"
    );

    if !ui.json {
        println!("{}", output::format_result(&result, ui.use_colors));
        if let Some(ref payment) = result.payment {
            println!();
            println!("{}", output::format_payment(payment, ui.use_colors));
        }
        if ui.verbose && !result.breakdown.is_empty() {
            println!();
            println!("{}", output::format_breakdown(&result.breakdown, ui.use_colors));
        }
    }

    let advice = if args.no_advice {
        None
    } else {
        let advice_config = config.advice.clone().unwrap_or_default();
        fetch_advice(ui, &advice_config, &AdviceRequest::new(&attributes, &result)).await
    };

    if ui.json {
        return ui.print(&output::CheckReport {
            application: &attributes,
            result: &result,
            advice: advice.as_ref(),
        });
    }

    if let Some(advice) = advice {
        println!();
        println!("AI Financial Advice");
        println!("{}", output::divider());
        println!("{}", advice.text());
    }

    EXIT_SUCCESS
}

fn run_payment(ui: &Ui, config: &Config, principal: f64, term: u32, rate: Option<f64>) -> i32 {
    let rate = rate.unwrap_or_else(|| config.eligibility.clone().unwrap_or_default().annual_rate);

    let mut errors = Vec::new();
    if !principal.is_finite() || principal < 0.0 {
        errors.push("Principal cannot be negative".to_string());
    }
    if term == 0 {
        errors.push("Term must be at least 1 year".to_string());
    }
    if !rate.is_finite() || rate < 0.0 {
        errors.push("Interest rate cannot be negative".to_string());
    }
    if !errors.is_empty() {
        return report_field_errors(ui, &errors);
    }

    let payment = PaymentSummary::new(principal, term, rate);
    if ui.json {
        return ui.print(&output::PaymentReport { payment: &payment });
    }
    println!("{}", output::format_payment(&payment, ui.use_colors));
    EXIT_SUCCESS
}

async fn run_learn(
    ui: &Ui,
    config: &Config,
    topic: Option<EducationTopic>,
    list: bool,
    clear: bool,
    no_cache: bool,
) -> i32 {
    let cache_path = get_cache_path();

    if clear {
        if let Err(e) = clear_cache(&cache_path) {
            eprintln!("Failed to clear cache at {}: {:#}", cache_path.display(), e);
            return EXIT_CONFIG;
        }
        if !ui.json {
            println!("Cleared cached educational content.");
        }
        if topic.is_none() && !list {
            return EXIT_SUCCESS;
        }
    }

    if list {
        if ui.json {
            return ui.print(&EducationTopic::ALL);
        }
        println!("{}", output::format_topics(ui.use_colors));
        return EXIT_SUCCESS;
    }

    let Some(topic) = topic else {
        eprintln!("Pick a topic:");
        eprintln!("{}", output::format_topics(false));
        return EXIT_INPUT;
    };

    let advice_config = config.advice.clone().unwrap_or_default();
    if !advice_config.enabled {
        eprintln!("The advice service is disabled in the config file.");
        return EXIT_CONFIG;
    }

    let key = match resolve_api_key().await {
        Ok(Some(key)) => key,
        Ok(None) => {
            eprintln!(
                "No API key found. Set {} or run `loan-check auth`.",
                ENV_API_KEY_VAR
            );
            return EXIT_AUTH;
        }
        Err(e) => {
            eprintln!("Credential error: {}. Set {} instead.", e, ENV_API_KEY_VAR);
            return EXIT_AUTH;
        }
    };

    let client = match GeminiClient::new(&advice_config, key.value) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to create advice client: {:#}", e);
            return EXIT_NETWORK;
        }
    };

    // validate_config already rejected unparseable TTLs
    let client = match (no_cache, advice_config.cache_ttl()) {
        (false, Ok(ttl)) => client.with_cache(EducationCache::new(cache_path, ttl)),
        _ => client,
    };

    let content = education_or_unavailable(&client, topic).await;

    if ui.json {
        let code = ui.print(&output::EducationReport {
            topic,
            title: topic.title(),
            content: &content,
        });
        return if content.is_delivered() { code } else { EXIT_NETWORK };
    }

    if !content.is_delivered() {
        eprintln!("{}", content.text());
        return EXIT_NETWORK;
    }

    println!("{}", topic.title());
    println!("{}", output::divider());
    println!("{}", content.text());
    EXIT_SUCCESS
}

async fn run_doctor(ui: &Ui, config: &Config, config_path: &Path, dotenv: Option<&Path>) -> i32 {
    let checks = loan_check::doctor::run_checks(config_path, config, dotenv).await;
    if ui.json {
        return ui.print(&checks);
    }
    println!("{}", loan_check::doctor::format_checks(&checks, ui.use_colors));
    EXIT_SUCCESS
}
