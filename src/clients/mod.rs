pub mod generation;
pub mod openai_client;
pub mod rapidapi_client;
pub mod raw_file;

pub use generation::QuestionGenerator;
pub use openai_client::OpenAiClient;
pub use rapidapi_client::RapidApiClient;
pub use raw_file::RawTextFile;
