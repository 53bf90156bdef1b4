use std::{env, fs, io::ErrorKind, path::Path};

use log::{debug, error, info, warn};

use crate::error::{BotError, Result};

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful Discord bot. Keep responses concise and friendly.";
pub const DEFAULT_PROMPT_FILE: &str = "prompt.txt";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub use_groq: bool,
    pub openai_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub openai_model: String,
    pub groq_model: String,
    pub system_prompt: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();

        let discord_token = required_value("DISCORD_TOKEN", env::var("DISCORD_TOKEN").ok())
            .inspect_err(|_| error!("Please create a .env file with your Discord bot token"))?;

        let use_groq = parse_flag(env::var("USE_GROQ").ok().as_deref());

        let openai_api_key = optional_var("OPENAI_API_KEY");
        let groq_api_key = optional_var("GROQ_API_KEY");

        let openai_model =
            optional_var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
        let groq_model =
            optional_var("GROQ_MODEL").unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string());

        let prompt_file =
            optional_var("PROMPT_FILE").unwrap_or_else(|| DEFAULT_PROMPT_FILE.to_string());
        let system_prompt = load_system_prompt(Path::new(&prompt_file));

        info!("Configuration loaded successfully");
        debug!("Discord token length: {} characters", discord_token.len());
        debug!("USE_GROQ: {use_groq}");
        debug!(
            "OpenAI API key length: {} characters",
            openai_api_key.as_ref().map_or(0, String::len)
        );
        debug!(
            "Groq API key length: {} characters",
            groq_api_key.as_ref().map_or(0, String::len)
        );
        debug!("OpenAI model: {openai_model}, Groq model: {groq_model}");
        debug!("System prompt length: {} characters", system_prompt.len());

        Ok(Self {
            discord_token,
            use_groq,
            openai_api_key,
            groq_api_key,
            openai_model,
            groq_model,
            system_prompt,
        })
    }
}

/// A required value that is unset or blank is missing.
fn required_value(name: &'static str, value: Option<String>) -> Result<String> {
    value.filter(|v| !v.trim().is_empty()).ok_or_else(|| {
        error!("{name} not found in environment variables");
        BotError::MissingEnv(name)
    })
}

/// Reads a variable, treating unset and blank values the same.
fn optional_var(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => {
            if name.ends_with("_API_KEY") {
                warn!("{name} is not set; calls to that provider will fail");
            }
            None
        }
    }
}

/// Only a case-insensitive `true` enables the flag.
pub fn parse_flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// Loads the system prompt, falling back to the built-in default when the
/// file is missing or unreadable.
pub fn load_system_prompt(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(contents) => {
            info!("Loaded system prompt from {}", path.display());
            contents.trim().to_string()
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(
                "No prompt file at {}, using default system prompt",
                path.display()
            );
            DEFAULT_SYSTEM_PROMPT.to_string()
        }
        Err(e) => {
            error!("Error loading prompt file {}: {e}", path.display());
            DEFAULT_SYSTEM_PROMPT.to_string()
        }
    }
}
