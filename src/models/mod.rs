pub mod exam;
pub mod grade;
pub mod subject;

pub use exam::{ChatMessage, DocumentKind, ExamPrompt, ExamRequest};
pub use grade::{ClassLevel, Paper};
pub use subject::{Subject, SubjectCategory};
