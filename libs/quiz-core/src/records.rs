//! Turns parsed questions into persistable drafts.

use crate::types::{ParsedQuestion, QuestionDraft};

/// Drop questions without a correct choice and convert the rest.
pub fn build_records(topic: &str, parsed: Vec<ParsedQuestion>) -> Vec<QuestionDraft> {
    let total = parsed.len();
    let drafts: Vec<QuestionDraft> = parsed
        .into_iter()
        .filter_map(|question| to_draft(topic, question))
        .collect();

    tracing::debug!(topic, total, kept = drafts.len(), "built question records");
    drafts
}

fn to_draft(topic: &str, question: ParsedQuestion) -> Option<QuestionDraft> {
    let Some(correct_choice) = question.correct_choice else {
        tracing::warn!(
            topic,
            number = question.number,
            "discarding question without a marked correct choice"
        );
        return None;
    };

    Some(QuestionDraft {
        number: question.number,
        title: question.title,
        content_html: question.content_html,
        explanation_html: question.explanation_html,
        correct_choice,
    })
}
