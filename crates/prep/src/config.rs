use serde::Deserialize;

use crate::error::PrepError;

/// Settings for the transform stage.
#[derive(Debug, Clone, Deserialize)]
pub struct TransformConfig {
    /// Month code written into the lifecycle field picked by the status flag.
    #[serde(default = "default_process_month")]
    pub process_month: u32,
    /// Fields upper-cased instead of title-cased.
    #[serde(default = "default_upper_case_fields")]
    pub upper_case_fields: Vec<String>,
    /// Personal name fields that get apostrophe and Mc/Mac handling.
    #[serde(default = "default_name_fields")]
    pub name_fields: Vec<String>,
}

fn default_process_month() -> u32 {
    1
}

fn default_upper_case_fields() -> Vec<String> {
    ["PDCode", "PostCode", "Elector Number Prefix", "Elector Number", "Register Code"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_name_fields() -> Vec<String> {
    ["Elector Name First", "Elector Name Middle", "Elector Name Last", "Elector Name"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            process_month: default_process_month(),
            upper_case_fields: default_upper_case_fields(),
            name_fields: default_name_fields(),
        }
    }
}

impl TransformConfig {
    pub fn from_toml(input: &str) -> Result<Self, PrepError> {
        let config: TransformConfig =
            toml::from_str(input).map_err(|e| PrepError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PrepError> {
        if self.process_month == 0 {
            return Err(PrepError::ConfigValidation(
                "process_month must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn is_upper_case(&self, field: &str) -> bool {
        self.upper_case_fields.iter().any(|f| f == field)
    }

    pub fn is_name(&self, field: &str) -> bool {
        self.name_fields.iter().any(|f| f == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TransformConfig::from_toml("").unwrap();
        assert_eq!(config.process_month, 1);
        assert!(config.is_upper_case("PostCode"));
        assert!(!config.is_upper_case("Address1"));
        assert!(config.is_name("Elector Name Last"));
    }

    #[test]
    fn parse_overrides() {
        let config = TransformConfig::from_toml(
            r#"
process_month = 11
upper_case_fields = ["PostCode"]
"#,
        )
        .unwrap();
        assert_eq!(config.process_month, 11);
        assert!(!config.is_upper_case("PDCode"));
        assert!(config.is_name("Elector Name"));
    }

    #[test]
    fn reject_zero_month() {
        let err = TransformConfig::from_toml("process_month = 0").unwrap_err();
        assert!(err.to_string().contains("process_month"));
    }
}
