use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{self, CommonFields};
use super::RecordScope;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowserFields {
    #[serde(flatten)]
    pub common: CommonFields,
    #[serde(rename = "source.project.content")]
    pub project_content: String,
    pub playwright_options: String,
    pub screenshots: String,
    pub throttling: Throttling,
    pub ignore_https_errors: bool,
    #[serde(rename = "filter_journeys.match")]
    pub filter_match: String,
    #[serde(rename = "filter_journeys.tags")]
    pub filter_tags: Vec<String>,
    pub synthetics_args: Vec<String>,
}

/// Network throttling profile, `value` in heartbeat's `<d>d/<u>u/<l>l` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Throttling {
    pub value: String,
    pub id: String,
    pub label: String,
}

impl Default for Throttling {
    fn default() -> Self {
        Self {
            value: "5d/3u/20l".to_string(),
            id: "default".to_string(),
            label: "Default".to_string(),
        }
    }
}

impl Throttling {
    fn disabled() -> Self {
        Self {
            value: "0".to_string(),
            id: "no-throttling".to_string(),
            label: "No throttling".to_string(),
        }
    }

    /// `false` turns throttling off; `{download, upload, latency}` builds a
    /// custom profile with each missing figure taken from `base`. Anything
    /// else keeps `base`.
    pub fn from_input(raw: &Value, base: Throttling) -> Throttling {
        match raw {
            Value::Bool(false) => Self::disabled(),
            Value::Object(map) => {
                let (base_download, base_upload, base_latency) = base.figures();
                let figure = |key: &str, fallback: String| {
                    map.get(key)
                        .and_then(|v| match v {
                            Value::Number(n) => Some(n.to_string()),
                            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                            _ => None,
                        })
                        .unwrap_or(fallback)
                };
                let download = figure("download", base_download);
                let upload = figure("upload", base_upload);
                let latency = figure("latency", base_latency);
                Self {
                    value: format!("{download}d/{upload}u/{latency}l"),
                    id: "custom".to_string(),
                    label: "Custom".to_string(),
                }
            }
            _ => base,
        }
    }

    fn figures(&self) -> (String, String, String) {
        let mut parts = self
            .value
            .split('/')
            .map(|part| part.trim_end_matches(['d', 'u', 'l']).to_string());
        (
            parts.next().unwrap_or_default(),
            parts.next().unwrap_or_default(),
            parts.next().unwrap_or_default(),
        )
    }
}

pub fn normalize(scope: &mut RecordScope<'_>) -> BrowserFields {
    let source = &scope.source;

    let base: Throttling = source.default_typed("throttling");
    let throttling = match source.input("throttling") {
        Some(raw) => Throttling::from_input(&raw, base),
        None => base,
    };

    BrowserFields {
        common: common::normalize(scope, "browser", "multistep"),
        project_content: source.text_as("content", "source.project.content"),
        playwright_options: source.text_as("playwrightOptions", "playwright_options"),
        screenshots: source.text_as("screenshot", "screenshots"),
        throttling,
        ignore_https_errors: source.flag_as("ignoreHTTPSErrors", "ignore_https_errors"),
        filter_match: source.text_as("filter.match", "filter_journeys.match"),
        filter_tags: source.list("filter_journeys.tags"),
        synthetics_args: source.list("synthetics_args"),
    }
}
