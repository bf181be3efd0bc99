use anyhow::{bail, Result};
use chrono::NaiveDate;
use std::path::Path;

pub fn run(config_path: &Path, utterance: &str, date: Option<&str>, json: bool) -> Result<()> {
    if utterance.trim().is_empty() {
        bail!("utterance must not be empty");
    }

    let date = match date {
        Some(d) => {
            if NaiveDate::parse_from_str(d, "%Y-%m-%d").is_err() {
                bail!("--date must be YYYY-MM-DD, got '{d}'");
            }
            d.to_string()
        }
        None => chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
    };

    let orchestrator = super::build_orchestrator(config_path)?;

    let rt = tokio::runtime::Runtime::new()?;
    let response = rt.block_on(orchestrator.handle(utterance, &date));

    if json {
        println!(
            "{}",
            serde_json::json!({ "utterance": utterance, "date": date, "response": response })
        );
    } else {
        println!("{response}");
    }
    Ok(())
}
