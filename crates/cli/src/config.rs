use std::str::FromStr;

/// Default transport rate per km per ton used by the demo rate table.
pub const DEFAULT_TRANSPORT_RATE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("CLAIMCHECK_OUTPUT must be 'markdown' or 'json', got '{0}'")]
    InvalidOutputFormat(String),

    #[error("CLAIMCHECK_TRANSPORT_RATE must be a positive number, got '{0}'")]
    InvalidRate(String),
}

/// How findings are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidOutputFormat(s.to_string())),
        }
    }
}

/// Demo configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    /// Output format (default: markdown).
    pub output: OutputFormat,
    /// Rate written into the demo rate table (default: `10.0`).
    pub transport_rate: f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            output: OutputFormat::default(),
            transport_rate: DEFAULT_TRANSPORT_RATE,
        }
    }
}

impl DemoConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default    |
    /// |-----------------------------|------------|
    /// | `CLAIMCHECK_OUTPUT`         | `markdown` |
    /// | `CLAIMCHECK_TRANSPORT_RATE` | `10.0`     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let output = match lookup("CLAIMCHECK_OUTPUT") {
            Some(raw) => raw.parse()?,
            None => OutputFormat::default(),
        };

        let transport_rate = match lookup("CLAIMCHECK_TRANSPORT_RATE") {
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(rate) if rate.is_finite() && rate > 0.0 => rate,
                _ => return Err(ConfigError::InvalidRate(raw)),
            },
            None => DEFAULT_TRANSPORT_RATE,
        };

        Ok(Self {
            output,
            transport_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(DemoConfig::from_lookup(lookup(&[])).unwrap(), DemoConfig::default());
    }

    #[test]
    fn reads_output_and_rate() {
        let config = DemoConfig::from_lookup(lookup(&[
            ("CLAIMCHECK_OUTPUT", "JSON"),
            ("CLAIMCHECK_TRANSPORT_RATE", "12.5"),
        ]))
        .unwrap();
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.transport_rate, 12.5);
    }

    #[test]
    fn rejects_unknown_output_format() {
        assert_matches!(
            DemoConfig::from_lookup(lookup(&[("CLAIMCHECK_OUTPUT", "xml")])),
            Err(ConfigError::InvalidOutputFormat(v)) if v == "xml"
        );
    }

    #[test]
    fn rejects_non_positive_rate() {
        for raw in ["0", "-3", "ten", "inf"] {
            assert_matches!(
                DemoConfig::from_lookup(lookup(&[("CLAIMCHECK_TRANSPORT_RATE", raw)])),
                Err(ConfigError::InvalidRate(_))
            );
        }
    }
}
