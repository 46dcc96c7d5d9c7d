pub mod traits;
pub mod extract;
pub mod config;
pub mod timeout;
pub mod gemini;
pub mod openai;

pub use traits::{CompletionClient, GenerationError, GenerationParams};
pub use extract::extract_text;
pub use config::{ClientFactory, GeminiConfig, OpenAIConfig, ProviderConfig, ProviderDetails, ProviderType};
pub use timeout::TimeoutClient;
pub use gemini::GeminiClient;
pub use openai::OpenAIClient;
