pub mod advisor;
pub mod llm;

pub use advisor::{Analysis, Comparison, PlayerAdvisor, PlayerRanking};
pub use llm::{LlmClient, LlmConfig};
