pub mod comments;
pub mod config;
pub mod groq;
pub mod models;
pub mod pipeline;
pub mod ranking;
pub mod serper;

pub use config::AppConfig;
pub use pipeline::Pipeline;
