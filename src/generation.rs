use crate::config::Config;
use anyhow::{Result, anyhow};
use log::debug;
use serde::Deserialize;
use std::io::Read;
use ureq::Agent;

const CHAT_MODEL: &str = "gpt-4o-mini";
const SPEECH_MODEL: &str = "tts-1";
const SPEECH_VOICE: &str = "nova";
const IMAGE_MODEL: &str = "dall-e-3";
const IMAGE_SIZE: &str = "1024x1024";

/// Text, voice and image generation used to dress up a show
#[cfg_attr(test, mockall::automock)]
pub trait GenerationService {
    fn chat(&self, prompt: &str) -> Result<String>;

    /// MP3 narration audio
    fn speech(&self, text: &str) -> Result<Vec<u8>>;

    /// Downloaded image bytes
    fn image(&self, prompt: &str) -> Result<Vec<u8>>;
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

/// A blocking OpenAI API client
pub struct OpenAiClient {
    agent: Agent,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Self {
        OpenAiClient {
            agent: Agent::new(),
            base_url: config.openai_api_url.trim_end_matches('/').to_string(),
            api_key: config.openai_api_key.clone(),
        }
    }

    fn post(&self, path: &str) -> ureq::Request {
        self.agent
            .post(&format!("{}{}", self.base_url, path))
            .set("Authorization", &format!("Bearer {}", self.api_key))
    }

    fn read_bytes(response: ureq::Response) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        response.into_reader().read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

impl GenerationService for OpenAiClient {
    fn chat(&self, prompt: &str) -> Result<String> {
        let response: ChatResponse = self
            .post("/chat/completions")
            .send_json(serde_json::json!({
                "model": CHAT_MODEL,
                "messages": [{ "role": "user", "content": prompt }],
            }))
            .map_err(|e| anyhow!("Chat completion failed: {}", e))?
            .into_json()?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| anyhow!("Chat completion returned no content"))
    }

    fn speech(&self, text: &str) -> Result<Vec<u8>> {
        debug!("Synthesizing {} characters of narration", text.len());
        let response = self
            .post("/audio/speech")
            .send_json(serde_json::json!({
                "model": SPEECH_MODEL,
                "voice": SPEECH_VOICE,
                "input": text,
            }))
            .map_err(|e| anyhow!("Speech synthesis failed: {}", e))?;
        Self::read_bytes(response)
    }

    fn image(&self, prompt: &str) -> Result<Vec<u8>> {
        let response: ImageResponse = self
            .post("/images/generations")
            .send_json(serde_json::json!({
                "model": IMAGE_MODEL,
                "prompt": prompt,
                "n": 1,
                "size": IMAGE_SIZE,
            }))
            .map_err(|e| anyhow!("Image generation failed: {}", e))?
            .into_json()?;

        let url = response
            .data
            .into_iter()
            .find_map(|image| image.url)
            .ok_or_else(|| anyhow!("Image generation returned no URL"))?;

        let download = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| anyhow!("Image download failed: {}", e))?;
        Self::read_bytes(download)
    }
}
