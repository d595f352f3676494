//! Summary options and their resolution order.
//!
//! Every option is resolved independently: per-call `meta` value, then the
//! process-wide default from the environment, then the built-in default.

use serde::{Deserialize, Serialize};

use crate::agents::AgentError;
use crate::types::Meta;

pub const DEFAULT_MAX_LENGTH: usize = 300;

/// Output language of the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// Language name as written in the prompt.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            Language::Japanese => "日本語",
            Language::English => "英語",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ja" => Ok(Language::Japanese),
            "en" => Ok(Language::English),
            other => Err(format!("expected 'ja' or 'en', got '{}'", other)),
        }
    }
}

/// Layout of the summary text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryFormat {
    #[default]
    Paragraph,
    Bullets,
    Structured,
}

impl std::str::FromStr for SummaryFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paragraph" => Ok(SummaryFormat::Paragraph),
            "bullets" => Ok(SummaryFormat::Bullets),
            "structured" => Ok(SummaryFormat::Structured),
            other => Err(format!(
                "expected 'paragraph', 'bullets' or 'structured', got '{}'",
                other
            )),
        }
    }
}

/// Tone of the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStyle {
    #[default]
    Formal,
    Casual,
    Academic,
}

impl std::str::FromStr for SummaryStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "formal" => Ok(SummaryStyle::Formal),
            "casual" => Ok(SummaryStyle::Casual),
            "academic" => Ok(SummaryStyle::Academic),
            other => Err(format!(
                "expected 'formal', 'casual' or 'academic', got '{}'",
                other
            )),
        }
    }
}

/// Process-wide defaults (from the environment). `None` means "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryDefaults {
    pub max_length: Option<usize>,
    pub language: Option<Language>,
    pub format: Option<SummaryFormat>,
    pub style: Option<SummaryStyle>,
    pub focus_areas: Option<Vec<String>>,
}

/// Per-call overrides read from `Input::meta`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMeta {
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub format: Option<SummaryFormat>,
    #[serde(default)]
    pub style: Option<SummaryStyle>,
    #[serde(default)]
    pub focus_areas: Option<Vec<String>>,
}

impl SummaryMeta {
    /// Read overrides from request metadata. Unrelated keys are ignored.
    pub fn from_meta(meta: Option<&Meta>) -> Result<Self, AgentError> {
        let Some(meta) = meta else {
            return Ok(Self::default());
        };
        serde_json::from_value(serde_json::Value::Object(meta.clone()))
            .map_err(|e| AgentError::InvalidInput(format!("invalid summary options: {}", e)))
    }
}

/// Fully resolved options for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOptions {
    pub max_length: usize,
    pub language: Language,
    pub format: SummaryFormat,
    pub style: SummaryStyle,
    pub focus_areas: Vec<String>,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            language: Language::default(),
            format: SummaryFormat::default(),
            style: SummaryStyle::default(),
            focus_areas: Vec::new(),
        }
    }
}

impl SummaryOptions {
    /// Resolve every option: override, then process default, then built-in default.
    ///
    /// A `maxLength` of zero is treated as unset.
    pub fn resolve(overrides: &SummaryMeta, defaults: &SummaryDefaults) -> Self {
        let builtin = Self::default();
        Self {
            max_length: resolve(
                overrides.max_length.filter(|n| *n > 0),
                defaults.max_length.filter(|n| *n > 0),
                builtin.max_length,
            ),
            language: resolve(overrides.language, defaults.language, builtin.language),
            format: resolve(overrides.format, defaults.format, builtin.format),
            style: resolve(overrides.style, defaults.style, builtin.style),
            focus_areas: resolve(
                overrides.focus_areas.clone(),
                defaults.focus_areas.clone(),
                builtin.focus_areas,
            ),
        }
    }
}

/// First present value of `override_value`, `process_default`, else `fallback`.
pub fn resolve<T>(override_value: Option<T>, process_default: Option<T>, fallback: T) -> T {
    override_value.or(process_default).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(value: serde_json::Value) -> Meta {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn resolve_prefers_override_then_default() {
        assert_eq!(resolve(Some(1), Some(2), 3), 1);
        assert_eq!(resolve(None, Some(2), 3), 2);
        assert_eq!(resolve(None::<i32>, None, 3), 3);
    }

    #[test]
    fn builtin_defaults() {
        let options = SummaryOptions::resolve(&SummaryMeta::default(), &SummaryDefaults::default());
        assert_eq!(options.max_length, 300);
        assert_eq!(options.language, Language::Japanese);
        assert_eq!(options.format, SummaryFormat::Paragraph);
        assert_eq!(options.style, SummaryStyle::Formal);
        assert!(options.focus_areas.is_empty());
    }

    #[test]
    fn meta_overrides_process_defaults_field_by_field() {
        let defaults = SummaryDefaults {
            max_length: Some(500),
            language: Some(Language::English),
            style: Some(SummaryStyle::Academic),
            ..Default::default()
        };
        let overrides = SummaryMeta::from_meta(Some(&meta(json!({
            "maxLength": 120,
            "format": "bullets",
            "focusAreas": ["cost"],
            "userId": "user123"
        }))))
        .unwrap();

        let options = SummaryOptions::resolve(&overrides, &defaults);
        assert_eq!(options.max_length, 120);
        assert_eq!(options.language, Language::English);
        assert_eq!(options.format, SummaryFormat::Bullets);
        assert_eq!(options.style, SummaryStyle::Academic);
        assert_eq!(options.focus_areas, vec!["cost".to_string()]);
    }

    #[test]
    fn zero_max_length_counts_as_unset() {
        let overrides = SummaryMeta {
            max_length: Some(0),
            ..Default::default()
        };
        let defaults = SummaryDefaults {
            max_length: Some(450),
            ..Default::default()
        };
        assert_eq!(SummaryOptions::resolve(&overrides, &defaults).max_length, 450);
    }

    #[test]
    fn invalid_meta_values_are_rejected() {
        let err = SummaryMeta::from_meta(Some(&meta(json!({ "language": "fr" })))).unwrap_err();
        assert!(matches!(err, AgentError::InvalidInput(_)));

        let err = SummaryMeta::from_meta(Some(&meta(json!({ "maxLength": "long" })))).unwrap_err();
        assert!(matches!(err, AgentError::InvalidInput(_)));
    }

    #[test]
    fn option_values_parse_from_strings() {
        assert_eq!("EN".parse::<Language>(), Ok(Language::English));
        assert_eq!("structured".parse::<SummaryFormat>(), Ok(SummaryFormat::Structured));
        assert_eq!("casual".parse::<SummaryStyle>(), Ok(SummaryStyle::Casual));
        assert!("poem".parse::<SummaryFormat>().is_err());
    }
}
