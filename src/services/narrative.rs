//! LLM-backed report comparison: ships two report texts to an
//! Ollama-compatible generate endpoint and returns a structured clinical
//! comparison plus word-level statistics.

use serde::{Deserialize, Serialize};

use super::{map_reqwest_error, ServiceError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonStatistics {
    pub old_word_count: usize,
    pub new_word_count: usize,
    pub added_words: usize,
    pub removed_words: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportComparison {
    pub comparison: String,
    pub statistics: ComparisonStatistics,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
    num_ctx: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

pub struct NarrativeClient {
    base_url: String,
    model: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl NarrativeClient {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        }
    }

    /// Compare two reports. The statistics are computed locally; only the
    /// narrative comparison needs the model.
    pub async fn compare_reports(
        &self,
        old_report: &str,
        new_report: &str,
    ) -> Result<ReportComparison, ServiceError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt: comparison_prompt(old_report, new_report),
            stream: false,
            options: GenerateOptions {
                temperature: 0.3,
                top_p: 0.9,
                num_ctx: 4096,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, &self.base_url, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::ResponseParsing(e.to_string()))?;

        Ok(ReportComparison {
            comparison: strip_markdown(&parsed.response),
            statistics: word_statistics(old_report, new_report),
        })
    }
}

/// The comparison prompt: fixed clinical structure, uppercase section
/// headers, no markdown.
fn comparison_prompt(old_report: &str, new_report: &str) -> String {
    format!(
        "You are a senior radiologist analyzing changes between two medical reports.\n\
         Provide a detailed, professional comparison with the following structure:\n\n\
         [CLINICAL FINDINGS]\n\
         - Key changes in clinical observations\n\
         - New or resolved findings\n\
         - Changes in severity or progression\n\n\
         [DIAGNOSTIC IMPRESSION]\n\
         - Changes in diagnosis or assessment\n\
         - New or modified differential diagnoses\n\n\
         [TREATMENT IMPLICATIONS]\n\
         - New treatment recommendations\n\
         - Medication changes\n\
         - Follow-up requirements\n\n\
         [CRITICAL CHANGES] (if any)\n\
         - Urgent findings requiring immediate attention\n\n\
         OLD REPORT:\n{old_report}\n\n\
         NEW REPORT:\n{new_report}\n\n\
         IMPORTANT:\n\
         - Use clear section headers in UPPERCASE\n\
         - Be concise but thorough\n\
         - Focus on clinically significant changes\n\
         - Avoid markdown formatting\n\
         - Use bullet points for clarity"
    )
}

/// Strip the markdown the model tends to emit anyway.
fn strip_markdown(raw: &str) -> String {
    raw.replace("**", "")
        .replace('*', "\u{2022}")
        .replace('#', "")
        .trim()
        .to_string()
}

/// Set-based word deltas between the two reports.
fn word_statistics(old_report: &str, new_report: &str) -> ComparisonStatistics {
    use std::collections::HashSet;

    let words = |text: &str| -> HashSet<String> {
        text.split_whitespace()
            .map(|w| w.to_lowercase())
            .collect()
    };

    let old_words = words(old_report);
    let new_words = words(new_report);

    ComparisonStatistics {
        old_word_count: old_words.len(),
        new_word_count: new_words.len(),
        added_words: new_words.difference(&old_words).count(),
        removed_words: old_words.difference(&new_words).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_both_reports() {
        let prompt = comparison_prompt("old lesion stable", "lesion enlarged");
        assert!(prompt.contains("OLD REPORT:\nold lesion stable"));
        assert!(prompt.contains("NEW REPORT:\nlesion enlarged"));
        assert!(prompt.contains("[CLINICAL FINDINGS]"));
    }

    #[test]
    fn markdown_stripped_from_model_output() {
        let cleaned = strip_markdown("**Bold** and * bullet and # header");
        assert!(!cleaned.contains("**"));
        assert!(!cleaned.contains('#'));
        assert!(cleaned.contains('\u{2022}'));
    }

    #[test]
    fn word_statistics_count_set_deltas() {
        let stats = word_statistics("lesion stable left hemisphere", "lesion enlarged left");
        assert_eq!(stats.old_word_count, 4);
        assert_eq!(stats.new_word_count, 3);
        assert_eq!(stats.added_words, 1); // enlarged
        assert_eq!(stats.removed_words, 2); // stable, hemisphere
    }

    #[test]
    fn word_statistics_case_insensitive() {
        let stats = word_statistics("Lesion", "lesion");
        assert_eq!(stats.added_words, 0);
        assert_eq!(stats.removed_words, 0);
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = NarrativeClient::new("http://localhost:11434/", "llama3.2", 120);
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(client.model, "llama3.2");
    }
}
