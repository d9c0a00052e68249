pub mod client;
pub mod form;
pub mod questionnaire;
pub mod score;
