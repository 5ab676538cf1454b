//! Test fixtures and factory functions for creating test data.

use serde_json::json;
use uuid::Uuid;

/// Generate a quiz file with a specified number of questions.
///
/// Question `n` (1-based) has three choices with the correct one at
/// `(n - 1) % 3` and an explanation.
pub fn sample_quiz(num_questions: usize) -> String {
    (1..=num_questions)
        .map(|n| {
            let correct = (n - 1) % 3;
            let choices: String = (0..3)
                .map(|i| {
                    let mark = if i == correct { "x" } else { " " };
                    format!("- [{}] Choice {}-{}\n", mark, n, i)
                })
                .collect();
            format!(
                "#### Q{n}. Question {n}?\n\n{choices}\n**Explanation:** Because {n}.\n",
                n = n,
                choices = choices
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Index of the correct choice for question `n` in [`sample_quiz`].
pub fn correct_choice(number: usize) -> usize {
    (number - 1) % 3
}

/// Create a question request body.
pub fn question_request(session_id: Option<Uuid>, topic_id: i64, current_idx: usize) -> serde_json::Value {
    match session_id {
        Some(id) => json!({ "session_id": id, "topic_id": topic_id, "current_idx": current_idx }),
        None => json!({ "topic_id": topic_id, "current_idx": current_idx }),
    }
}

/// Create an answer request body.
pub fn answer_request(session_id: Uuid, current_idx: usize, selected_choice: usize) -> serde_json::Value {
    json!({
        "session_id": session_id,
        "current_idx": current_idx,
        "selected_choice": selected_choice
    })
}

/// Create a save request body.
pub fn save_request(session_id: Uuid, accuracy: f64) -> serde_json::Value {
    json!({ "session_id": session_id, "accuracy": accuracy })
}
