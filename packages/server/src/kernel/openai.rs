// AI implementation using OpenAI
//
// This is the infrastructure implementation of the audit AI trait.
// What to prompt for lives in audit::pipeline::prompts; this module only
// handles transport and schema plumbing against the OpenAI REST API.

use async_trait::async_trait;
use schemars::{schema_for, JsonSchema};
use serde::Deserialize;

use audit::pipeline::prompts;
use audit::schema::{parse_audit_report, parse_structured_record};
use audit::{AuditError, AuditReport, Result, SearchHit, StructuredRecord, AI};

/// OpenAI-backed implementation of the audit AI collaborator.
#[derive(Clone)]
pub struct OpenAiAnalyst {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    extractor_model: String,
    analyst_model: String,
}

#[derive(Deserialize)]
struct ChatResponseRaw {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

impl OpenAiAnalyst {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            extractor_model: "gpt-4o-mini".to_string(),
            analyst_model: "gpt-4o".to_string(),
        }
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the models used for structuring and analysis.
    pub fn with_models(
        mut self,
        extractor_model: impl Into<String>,
        analyst_model: impl Into<String>,
    ) -> Self {
        self.extractor_model = extractor_model.into();
        self.analyst_model = analyst_model.into();
        self
    }

    /// Plain chat completion, returning the assistant's text.
    async fn complete(&self, model: &str, system: &str, user: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "temperature": 0.0,
        });
        self.send(body).await
    }

    /// Structured output via OpenAI's `json_schema` response format.
    ///
    /// Returns the raw JSON content; callers parse through the audit
    /// schema validator so nonconforming output fails as a schema
    /// violation rather than being trusted downstream.
    async fn structured<T: JsonSchema>(
        &self,
        model: &str,
        schema_name: &str,
        system: &str,
        user: &str,
    ) -> Result<String> {
        let schema = strict_schema::<T>();
        tracing::debug!(schema_name, model, "requesting structured output");

        let body = serde_json::json!({
            "model": model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "temperature": 0.0,
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": schema_name,
                    "strict": true,
                    "schema": schema,
                },
            },
        });
        self.send(body).await
    }

    async fn send(&self, body: serde_json::Value) -> Result<String> {
        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "OpenAI request failed");
                AuditError::collaborator(err)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(%status, error = %error_text, "OpenAI API error");
            return Err(AuditError::collaborator_msg(format!(
                "OpenAI API error {status}: {error_text}"
            )));
        }

        let parsed: ChatResponseRaw = response
            .json()
            .await
            .map_err(AuditError::collaborator)?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AuditError::collaborator_msg("no response from OpenAI"))
    }
}

#[async_trait]
impl AI for OpenAiAnalyst {
    async fn infer_brand(&self, domain: &str) -> Result<String> {
        let content = self
            .complete(
                &self.extractor_model,
                prompts::BRAND_SYSTEM_PROMPT,
                &prompts::format_brand_prompt(domain),
            )
            .await?;

        // First line only, stripped of quoting and trailing punctuation.
        let brand = content
            .lines()
            .next()
            .unwrap_or("")
            .trim()
            .trim_matches(['"', '\''])
            .trim_end_matches('.')
            .to_string();

        if brand.is_empty() {
            return Err(AuditError::collaborator_msg(
                "brand inference returned an empty answer",
            ));
        }
        Ok(brand)
    }

    async fn structure(
        &self,
        brand: &str,
        domain: &str,
        hits: &[SearchHit],
    ) -> Result<StructuredRecord> {
        let content = self
            .structured::<StructuredRecord>(
                &self.extractor_model,
                "structured_record",
                prompts::EXTRACTOR_SYSTEM_PROMPT,
                &prompts::format_structure_prompt(brand, domain, hits),
            )
            .await?;
        parse_structured_record(&content)
    }

    async fn analyze(&self, brand: &str, record: &StructuredRecord) -> Result<AuditReport> {
        let content = self
            .structured::<AuditReport>(
                &self.analyst_model,
                "audit_report",
                prompts::ANALYST_SYSTEM_PROMPT,
                &prompts::format_analyze_prompt(brand, record),
            )
            .await?;
        parse_audit_report(&content)
    }
}

/// Generate an OpenAI strict-mode schema for `T`.
///
/// OpenAI's strict mode needs `additionalProperties: false` on every
/// object, every property listed in `required`, and no `$ref`
/// indirection; schemars output is massaged to match.
fn strict_schema<T: JsonSchema>() -> serde_json::Value {
    let mut value = serde_json::to_value(schema_for!(T)).unwrap_or_default();

    tighten_objects(&mut value);

    let definitions = value.get("definitions").cloned();
    if let Some(defs) = definitions {
        inline_refs(&mut value, &defs);
    }

    if let serde_json::Value::Object(map) = &mut value {
        map.remove("definitions");
        map.remove("$schema");
    }
    value
}

/// Add `additionalProperties: false` and a full `required` list to every
/// object schema, recursively.
fn tighten_objects(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            if map.get("type") == Some(&serde_json::Value::String("object".into())) {
                map.insert("additionalProperties".into(), serde_json::Value::Bool(false));
                if let Some(serde_json::Value::Object(props)) = map.get("properties") {
                    let keys: Vec<serde_json::Value> = props
                        .keys()
                        .map(|k| serde_json::Value::String(k.clone()))
                        .collect();
                    map.insert("required".into(), serde_json::Value::Array(keys));
                }
            }
            for (_, nested) in map.iter_mut() {
                tighten_objects(nested);
            }
        }
        serde_json::Value::Array(items) => {
            for item in items.iter_mut() {
                tighten_objects(item);
            }
        }
        _ => {}
    }
}

/// Replace `$ref` pointers with their definitions, recursively.
fn inline_refs(value: &mut serde_json::Value, definitions: &serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            if let Some(serde_json::Value::String(path)) = map.get("$ref").cloned() {
                if let Some(name) = path.strip_prefix("#/definitions/") {
                    if let Some(def) = definitions.get(name) {
                        *value = def.clone();
                        inline_refs(value, definitions);
                        return;
                    }
                }
            }
            for (_, nested) in map.iter_mut() {
                inline_refs(nested, definitions);
            }
        }
        serde_json::Value::Array(items) => {
            for item in items.iter_mut() {
                inline_refs(item, definitions);
            }
        }
        _ => {}
    }
}
