//! Question Evaluator
//!
//! One entry point for every question variant: choice questions compare the
//! picked option with the answer key, sentence-building questions compare the
//! arranged word indices with `correctOrder`.

use serde::{Deserialize, Serialize};

use crate::types::Question;

/// Raw learner input
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Answer {
    /// The option text that was picked
    Choice(String),
    /// Original word indices in the order they were placed
    Arrangement(Vec<usize>),
}

impl Answer {
    pub fn choice(text: impl Into<String>) -> Self {
        Self::Choice(text.into())
    }

    pub fn arrangement(order: impl Into<Vec<usize>>) -> Self {
        Self::Arrangement(order.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    #[error("no answer selected")]
    Empty,
    #[error("question {question_id} expects {expected} answer")]
    KindMismatch {
        question_id: String,
        expected: &'static str,
    },
    #[error("sentence is incomplete: {placed} of {required} words placed")]
    IncompleteArrangement { placed: usize, required: usize },
    #[error("word index {0} is out of range")]
    WordOutOfRange(usize),
    #[error("word index {0} placed more than once")]
    RepeatedWord(usize),
}

/// Outcome of checking one answer
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Judgement {
    pub is_correct: bool,
    /// What the learner submitted, as displayed back to them
    pub submitted: String,
}

/// Exact-match correctness. A mismatched answer kind is never correct.
pub fn evaluate(question: &Question, answer: &Answer) -> bool {
    match (question.question_type.is_arrangement(), answer) {
        (false, Answer::Choice(choice)) => *choice == question.correct_answer,
        (true, Answer::Arrangement(order)) => question
            .correct_order
            .as_deref()
            .is_some_and(|expected| expected == order.as_slice()),
        _ => false,
    }
}

/// Validates the answer shape before judging it
pub fn check_answer(question: &Question, answer: &Answer) -> Result<Judgement, AnswerError> {
    let submitted = match answer {
        Answer::Choice(choice) => {
            if question.question_type.is_arrangement() {
                return Err(AnswerError::KindMismatch {
                    question_id: question.id.clone(),
                    expected: "an arrangement",
                });
            }
            if choice.is_empty() {
                return Err(AnswerError::Empty);
            }
            choice.clone()
        }
        Answer::Arrangement(order) => {
            if !question.question_type.is_arrangement() {
                return Err(AnswerError::KindMismatch {
                    question_id: question.id.clone(),
                    expected: "a choice",
                });
            }
            built_sentence(question, order)?
        }
    };

    Ok(Judgement {
        is_correct: evaluate(question, answer),
        submitted,
    })
}

/// Joins the placed words with single spaces
fn built_sentence(question: &Question, order: &[usize]) -> Result<String, AnswerError> {
    let words = question.words.as_deref().unwrap_or_default();
    let required = question.correct_order.as_ref().map_or(words.len(), Vec::len);

    if order.is_empty() {
        return Err(AnswerError::Empty);
    }
    if order.len() != required {
        return Err(AnswerError::IncompleteArrangement {
            placed: order.len(),
            required,
        });
    }

    let mut used = vec![false; words.len()];
    let mut placed = Vec::with_capacity(order.len());
    for &index in order {
        let slot = used.get_mut(index).ok_or(AnswerError::WordOutOfRange(index))?;
        if *slot {
            return Err(AnswerError::RepeatedWord(index));
        }
        *slot = true;
        placed.push(words[index].as_str());
    }

    Ok(placed.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QuestionType;

    fn choice_question() -> Question {
        Question {
            id: "1".to_string(),
            question_type: QuestionType::MultipleChoice,
            question: "How do you say \"Hello\" in Farsi?".to_string(),
            options: Some(vec!["سلام".to_string(), "خداحافظ".to_string()]),
            correct_answer: "سلام".to_string(),
            explanation: "سلام (salaam) is the most common way to say hello in Farsi!".to_string(),
            audio_url: None,
            words: None,
            correct_order: None,
            letter: None,
            sound: None,
        }
    }

    fn sentence_question() -> Question {
        Question {
            id: "2".to_string(),
            question_type: QuestionType::SentenceBuilding,
            question: "Build: \"You are happy\"".to_string(),
            options: None,
            correct_answer: "تو هستی خوشحال".to_string(),
            explanation: String::new(),
            audio_url: None,
            words: Some(vec![
                "تو".to_string(),
                "خوشحال".to_string(),
                "هستی".to_string(),
            ]),
            correct_order: Some(vec![0, 2, 1]),
            letter: None,
            sound: None,
        }
    }

    #[test]
    fn test_choice_exact_match() {
        let q = choice_question();
        assert!(evaluate(&q, &Answer::choice("سلام")));
        assert!(!evaluate(&q, &Answer::choice("خداحافظ")));
        assert!(!evaluate(&q, &Answer::choice(" سلام")));
    }

    #[test]
    fn test_choice_is_case_sensitive() {
        let mut q = choice_question();
        q.correct_answer = "Goodbye".to_string();
        assert!(!evaluate(&q, &Answer::choice("goodbye")));
    }

    #[test]
    fn test_arrangement_order_matters() {
        let q = sentence_question();
        assert!(evaluate(&q, &Answer::arrangement(vec![0, 2, 1])));
        assert!(!evaluate(&q, &Answer::arrangement(vec![0, 1, 2])));
    }

    #[test]
    fn test_mismatched_kind_is_incorrect() {
        assert!(!evaluate(&sentence_question(), &Answer::choice("تو هستی خوشحال")));
        assert!(!evaluate(&choice_question(), &Answer::arrangement(vec![0])));
    }

    #[test]
    fn test_check_answer_builds_sentence_text() {
        let judgement = check_answer(&sentence_question(), &Answer::arrangement(vec![0, 2, 1])).unwrap();
        assert!(judgement.is_correct);
        assert_eq!(judgement.submitted, "تو هستی خوشحال");
    }

    #[test]
    fn test_check_answer_rejects_malformed_input() {
        let sentence = sentence_question();
        assert_eq!(check_answer(&choice_question(), &Answer::choice("")), Err(AnswerError::Empty));
        assert_eq!(
            check_answer(&sentence, &Answer::arrangement(vec![0, 2])),
            Err(AnswerError::IncompleteArrangement { placed: 2, required: 3 })
        );
        assert_eq!(
            check_answer(&sentence, &Answer::arrangement(vec![0, 2, 7])),
            Err(AnswerError::WordOutOfRange(7))
        );
        assert_eq!(
            check_answer(&sentence, &Answer::arrangement(vec![0, 0, 1])),
            Err(AnswerError::RepeatedWord(0))
        );
        assert!(matches!(
            check_answer(&sentence, &Answer::choice("تو")),
            Err(AnswerError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_answer_wire_format() {
        let choice: Answer = serde_json::from_str(r#"{"choice":"سلام"}"#).unwrap();
        assert_eq!(choice, Answer::choice("سلام"));
        let arrangement: Answer = serde_json::from_str(r#"{"arrangement":[2,0,1]}"#).unwrap();
        assert_eq!(arrangement, Answer::arrangement(vec![2, 0, 1]));
    }
}
