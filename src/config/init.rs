use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{get_config_path, AdviceConfig, Config};
use crate::eligibility::{validate_eligibility, EligibilityConfig};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt for a number, re-asking until it parses. Empty input keeps `default`.
fn prompt_number(message: &str, default: f64) -> Result<f64> {
    loop {
        let input = prompt(&format!("{} [{}]: ", message, default))?;
        if input.is_empty() {
            return Ok(default);
        }
        match input.parse::<f64>() {
            Ok(v) if v.is_finite() => return Ok(v),
            _ => println!("  Invalid: must be a number. Try again."),
        }
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Ask for the headline thresholds, keeping the default bands and weights.
fn prompt_eligibility() -> Result<EligibilityConfig> {
    let defaults = EligibilityConfig::default();

    loop {
        let mut config = defaults.clone();

        println!();
        println!("Half credit is given at each threshold; full credit further along the same scale.");
        config.credit_score.threshold =
            prompt_number("Minimum credit score", defaults.credit_score.threshold)?;
        config.credit_score.full_at =
            prompt_number("Credit score for full credit", config.credit_score.threshold + 100.0)?;
        config.debt_to_income.threshold =
            prompt_number("Maximum debt-to-income (%)", defaults.debt_to_income.threshold)?;
        config.debt_to_income.full_at = prompt_number(
            "Debt-to-income for full credit (%)",
            config.debt_to_income.threshold - 10.0,
        )?;
        config.pass_mark = prompt_number("Pass mark (0-1)", defaults.pass_mark)?;
        config.annual_rate = prompt_number("Annual interest rate (e.g. 0.06)", defaults.annual_rate)?;

        match validate_eligibility(&config) {
            Ok(()) => return Ok(config),
            Err(errors) => {
                println!("  Those settings are not valid:");
                for error in errors {
                    println!("    - {}", error);
                }
                println!("  Let's try again.");
            }
        }
    }
}

/// Serialize `config` and write it atomically, creating parent directories.
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}

/// Run the init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, uses ~/.config/loan-check/config.yaml. With `accept_defaults`
/// no questions are asked except before overwriting an existing file.
pub fn run_init_wizard(default_path: Option<PathBuf>, accept_defaults: bool) -> Result<()> {
    let config_path = default_path.unwrap_or_else(get_config_path);

    println!("Loan Check configuration");
    println!("========================");

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!("Config already exists at {}. Overwrite?", config_path.display()),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    let eligibility = if !accept_defaults
        && prompt_yes_no("Customize eligibility thresholds? (n accepts defaults)", false)?
    {
        prompt_eligibility()?
    } else {
        EligibilityConfig::default()
    };

    let enable_advice = accept_defaults
        || prompt_yes_no("Enable AI-powered advice (needs a Gemini API key)?", true)?;

    let config = Config {
        log_level: Some("warn".to_string()),
        eligibility: Some(eligibility),
        advice: Some(AdviceConfig {
            enabled: enable_advice,
            ..AdviceConfig::default()
        }),
    };

    write_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    if enable_advice {
        println!("Set GEMINI_API_KEY (or run `loan-check auth`) to get personalized advice.");
    }
    println!("Run `loan-check check --help` to get started.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use std::env;

    #[test]
    fn test_write_config_roundtrip() {
        let dir = env::temp_dir().join("loan_check_test_init");
        let temp_path = dir.join("nested").join("config.yaml");
        let _ = std::fs::remove_dir_all(&dir);

        let config = Config {
            log_level: Some("info".to_string()),
            eligibility: Some(EligibilityConfig::default()),
            advice: Some(AdviceConfig {
                enabled: false,
                ..AdviceConfig::default()
            }),
        };
        write_config(&temp_path, &config).unwrap();

        let loaded = load_config(Some(temp_path)).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
