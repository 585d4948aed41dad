// Adapters layer: concrete implementations for external systems.

pub mod modelfile;
pub mod ollama;

pub use ollama::OllamaClient;
