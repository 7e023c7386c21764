pub mod envelope;
pub mod error;
pub mod prompt;
pub mod request;

pub use envelope::{GenerateRequest, GenerateResponse};
pub use error::{RequestError, ValidationError};
pub use prompt::build_prompt;
pub use request::{Difficulty, ExamRequest, Language, QuestionType, is_json_path};

