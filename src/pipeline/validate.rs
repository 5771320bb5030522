// src/pipeline/validate.rs

use crate::error::Result;
use crate::models::Config;
use crate::services::{DenyList, FieldExtractor};

/// Validate configuration: value ranges, selector and pattern compilation,
/// and readability of the deny-list file.
pub fn run_validate(config: &Config) -> Result<()> {
    log::info!("Validating configuration...");

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {e}");
        return Err(e);
    }
    log::info!("✓ Config values OK");
    log::info!("    User-Agent: {}", config.fetch.user_agent);
    log::info!("    Timeout: {}s", config.fetch.timeout_secs);
    log::info!("    Batch cool-down: {}ms", config.batch.cooldown_ms);

    if let Err(e) = FieldExtractor::new(config) {
        log::error!("Selector validation failed: {e}");
        return Err(e);
    }
    log::info!("✓ Selectors and patterns compile");

    let deny_list = DenyList::load(
        &config.discovery.deny_list_file,
        &config.discovery.base_deny_list,
    )?;
    log::info!(
        "✓ Deny-list OK ({} names, {} custom)",
        deny_list.len(),
        deny_list.custom_count()
    );

    log::info!("All validations passed!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use tempfile::TempDir;

    fn config_in(tmp: &TempDir) -> Config {
        let mut config = Config::default();
        config.discovery.deny_list_file = tmp.path().join("deny.txt");
        config
    }

    #[test]
    fn test_default_config_validates() {
        let tmp = TempDir::new().unwrap();
        assert!(run_validate(&config_in(&tmp)).is_ok());
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut config = config_in(&tmp);
        config.selectors.rating = "span[[".to_string();
        assert!(matches!(
            run_validate(&config),
            Err(AppError::Selector { .. })
        ));
    }

    #[test]
    fn test_invalid_brand_pattern_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut config = config_in(&tmp);
        config.cleaning.brand_suffix_pattern = "(".to_string();
        assert!(run_validate(&config).is_err());
    }
}
