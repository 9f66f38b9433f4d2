use serde::{Deserialize, Serialize};

use crate::error::AdapterError;

/// Sampling parameters for a single generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub max_tokens: u32,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub top_k: Option<u32>,
    #[serde(default)]
    pub stop_sequences: Vec<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_tokens: 256,
            temperature: None,
            top_p: None,
            top_k: None,
            stop_sequences: Vec::new(),
        }
    }
}

impl GenerationOptions {
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_stop_sequences(mut self, stop_sequences: Vec<String>) -> Self {
        self.stop_sequences = stop_sequences;
        self
    }
}

/// One prompt and the options it is sent with. Never mutated once built.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    prompt: String,
    options: GenerationOptions,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, options: GenerationOptions) -> Self {
        Self {
            prompt: prompt.into(),
            options,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Rejects values that cannot be sent to a model. `serde_json` writes
    /// non-finite floats as `null`, so they are caught here instead.
    pub fn validate(&self) -> std::result::Result<(), AdapterError> {
        if self.prompt.trim().is_empty() {
            return Err(AdapterError::InvalidRequest("prompt is empty".to_string()));
        }
        let floats = [
            ("temperature", self.options.temperature),
            ("top_p", self.options.top_p),
        ];
        for (name, value) in floats {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(AdapterError::InvalidRequest(format!(
                        "{} must be a finite, non-negative number, got {}",
                        name, v
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Text produced by a model for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
}

impl GenerationResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            stop_reason: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_prompt() {
        let request = GenerationRequest::new("   ", GenerationOptions::default());
        assert!(matches!(
            request.validate(),
            Err(AdapterError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite_sampling() {
        let options = GenerationOptions::default().with_temperature(f64::NAN);
        let request = GenerationRequest::new("hi", options);
        assert!(request.validate().is_err());

        let options = GenerationOptions::default().with_top_p(f64::INFINITY);
        let request = GenerationRequest::new("hi", options);
        assert!(request.validate().is_err());

        let options = GenerationOptions::default()
            .with_max_tokens(500)
            .with_temperature(0.1);
        let request = GenerationRequest::new("hi", options);
        assert!(request.validate().is_ok());
    }
}
