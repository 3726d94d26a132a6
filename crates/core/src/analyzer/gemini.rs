//! REST client for the Gemini Files and generateContent APIs.

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{FileState, Generation, RemoteFile, VideoUnderstanding};
use crate::{
    config::AnalyzerConfig,
    error::{AdLabelError, Result},
};

const API_KEY_HEADER: &str = "x-goog-api-key";
const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

pub struct GeminiClient {
    api_key: String,
    config: AnalyzerConfig,
    client: Client,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileResource {
    name: String,
    #[serde(default)]
    uri: String,
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    state: FileState,
}

impl From<FileResource> for RemoteFile {
    fn from(f: FileResource) -> Self {
        RemoteFile {
            name: f.name,
            uri: f.uri,
            mime_type: f.mime_type,
            state: f.state,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: FileResource,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum Part<'a> {
    FileData {
        #[serde(rename = "mimeType")]
        mime_type: &'a str,
        #[serde(rename = "fileUri")]
        file_uri: &'a str,
    },
    Text(&'a str),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl From<GenerateResponse> for Generation {
    fn from(response: GenerateResponse) -> Self {
        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .filter(|t| !t.is_empty());

        Generation {
            text,
            block_reason: response.prompt_feedback.and_then(|f| f.block_reason),
        }
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AdLabelError::ApiError {
        status: status.as_u16(),
        body,
    })
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, config: AnalyzerConfig) -> Self {
        Self {
            api_key: api_key.into(),
            config,
            client: Client::new(),
        }
    }

    /// Build a client with the key read from the configured environment variable.
    pub fn from_config(config: AnalyzerConfig) -> Result<Self> {
        let api_key = config.api_key()?;
        Ok(Self::new(api_key, config))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base.trim_end_matches('/'), path)
    }

    fn generate_request<'a>(&self, file: &'a RemoteFile, prompt: &'a str) -> GenerateRequest<'a> {
        let mime_type = if file.mime_type.is_empty() {
            super::source::DEFAULT_MIME_TYPE
        } else {
            file.mime_type.as_str()
        };

        GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::FileData {
                        mime_type,
                        file_uri: &file.uri,
                    },
                    Part::Text(prompt),
                ],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_p: self.config.top_p,
                top_k: self.config.top_k,
                max_output_tokens: self.config.max_output_tokens,
            },
            safety_settings: SAFETY_CATEGORIES
                .into_iter()
                .map(|category| SafetySetting {
                    category,
                    threshold: SAFETY_THRESHOLD,
                })
                .collect(),
        }
    }
}

impl VideoUnderstanding for GeminiClient {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        mime_type: &str,
        display_name: &str,
    ) -> Result<RemoteFile> {
        let response = self
            .client
            .post(self.url("upload/v1beta/files"))
            .header(API_KEY_HEADER, &self.api_key)
            .header("X-Goog-Upload-Protocol", "raw")
            .header("Content-Type", mime_type)
            .body(bytes)
            .send()
            .await?;

        let response = check_status(response)
            .await
            .map_err(|e| AdLabelError::UploadFailed {
                reason: e.to_string(),
            })?;
        let uploaded: UploadResponse =
            response
                .json()
                .await
                .map_err(|e| AdLabelError::UploadFailed {
                    reason: format!("unexpected upload response: {}", e),
                })?;

        info!(video = display_name, file = %uploaded.file.name, "video uploaded");
        Ok(uploaded.file.into())
    }

    async fn get_file(&self, name: &str) -> Result<RemoteFile> {
        let response = self
            .client
            .get(self.url(&format!("v1beta/{}", name)))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let file: FileResource = check_status(response).await?.json().await?;
        debug!(file = %file.name, state = %file.state, "file status");
        Ok(file.into())
    }

    async fn generate(&self, file: &RemoteFile, prompt: &str) -> Result<Generation> {
        let url = self.url(&format!(
            "v1beta/models/{}:generateContent",
            self.config.model
        ));

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&self.generate_request(file, prompt))
            .send()
            .await?;

        let body: GenerateResponse = check_status(response).await?.json().await?;
        Ok(body.into())
    }
}
