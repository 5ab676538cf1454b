pub mod question_bank;
pub mod sessions;
