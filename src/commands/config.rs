//! Show the effective configuration.

use crate::config::{get_config_path, BeeyConfig};

/// Prints where configuration is read from and the values in effect, with the key redacted.
///
/// # Errors
/// - If the configuration cannot be loaded
pub fn handle_config() -> anyhow::Result<()> {
    let config_path = get_config_path()?;
    let config = BeeyConfig::load()?;

    let file_state = if config_path.exists() {
        ""
    } else {
        " (not present, using defaults)"
    };
    println!("Config file: {}{file_state}", config_path.display());
    println!("Base URI:    {}", config.api.base_uri);
    println!(
        "API key:     {}",
        config.api.api_key.as_deref().map(redact).unwrap_or_default()
    );
    println!("Timeout:     {}s", config.api.timeout_secs);
    Ok(())
}

fn redact(key: &str) -> String {
    let count = key.chars().count();
    if count <= 8 {
        return "********".to_string();
    }
    let tail: String = key.chars().skip(count - 4).collect();
    format!("********{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_hides_short_keys() {
        assert_eq!(redact("abc"), "********");
        assert_eq!(redact("0123456789abcdef"), "********cdef");
    }
}
