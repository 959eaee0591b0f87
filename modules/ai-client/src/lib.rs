pub mod error;
pub mod gemini;
pub mod resume;
pub mod traits;

pub use error::ScoreError;
pub use gemini::{GeminiScorer, DEFAULT_MODEL};
pub use resume::{load_resume, load_resume_best_effort};
pub use traits::ResumeScorer;
