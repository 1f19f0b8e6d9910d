//! Quiz runner state.
//!
//! DESIGN
//! ======
//! `QuizSession` owns the quiz and one optional answer per question. The quiz
//! page keeps it in an `RwSignal` and re-renders from it; scoring, progress
//! and review rows are all derived here.

#[cfg(test)]
#[path = "quiz_test.rs"]
mod quiz_test;

use super::course::{NavTarget, percent};
use crate::net::types::{LearningStage, Question, Quiz};

/// Outcome of a submitted quiz.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizResult {
    pub correct: u32,
    pub total: u32,
    /// Percentage, rounded.
    pub score: u8,
    pub passed: bool,
}

/// One row of the post-submit review.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewItem {
    pub prompt: String,
    pub your_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuizSession {
    quiz: Quiz,
    index: usize,
    answers: Vec<Option<usize>>,
    result: Option<QuizResult>,
}

impl QuizSession {
    #[must_use]
    pub fn new(quiz: Quiz) -> Self {
        let answers = vec![None; quiz.questions.len()];
        Self { quiz, index: 0, answers, result: None }
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.quiz.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quiz.questions.is_empty()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.questions.get(self.index)
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.answers.get(self.index).copied().flatten()
    }

    #[must_use]
    pub fn result(&self) -> Option<QuizResult> {
        self.result
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.len()
    }

    /// Answer the current question. Out-of-range options and changes after
    /// submission are ignored.
    pub fn select(&mut self, option: usize) {
        if self.result.is_some() {
            return;
        }
        if !self.current_question().is_some_and(|q| option < q.options.len()) {
            return;
        }
        if let Some(slot) = self.answers.get_mut(self.index) {
            *slot = Some(option);
        }
    }

    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.selected().is_some()
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.answers.is_empty() && self.answers.iter().all(Option::is_some)
    }

    pub fn next(&mut self) {
        if self.can_advance() && !self.is_last() {
            self.index += 1;
        }
    }

    pub fn previous(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    /// Position through the quiz, `(index + 1) / total`, as a percentage.
    #[must_use]
    pub fn progress(&self) -> u8 {
        #[allow(clippy::cast_possible_truncation)]
        let (at, total) = ((self.index + 1) as u32, self.len() as u32);
        percent(at.min(total), total)
    }

    /// Score the answers. Returns `None` until every question is answered.
    pub fn submit(&mut self) -> Option<QuizResult> {
        if !self.can_submit() {
            return None;
        }
        let correct = self
            .quiz
            .questions
            .iter()
            .zip(&self.answers)
            .filter(|(q, a)| **a == Some(q.correct_index))
            .count();
        #[allow(clippy::cast_possible_truncation)]
        let (correct, total) = (correct as u32, self.len() as u32);
        let score = percent(correct, total);
        let result = QuizResult { correct, total, score, passed: score >= self.quiz.passing_score };
        self.result = Some(result);
        Some(result)
    }

    /// Clear answers and start over from the first question.
    pub fn retake(&mut self) {
        self.answers.iter_mut().for_each(|a| *a = None);
        self.index = 0;
        self.result = None;
    }

    #[must_use]
    pub fn review(&self) -> Vec<ReviewItem> {
        self.quiz
            .questions
            .iter()
            .zip(&self.answers)
            .map(|(q, answer)| ReviewItem {
                prompt: q.prompt.clone(),
                your_answer: answer.and_then(|i| q.options.get(i).cloned()),
                correct_answer: q.options.get(q.correct_index).cloned().unwrap_or_default(),
                is_correct: *answer == Some(q.correct_index),
                explanation: q.explanation.clone(),
            })
            .collect()
    }
}

/// Where "continue" leads after a quiz: the stage after `stage_id` once
/// passed, otherwise back to the course.
#[must_use]
pub fn continue_target(result: QuizResult, stages: &[LearningStage], stage_id: &str) -> NavTarget {
    if !result.passed {
        return NavTarget::Course;
    }
    super::course::stage_nav(stages, stage_id).next
}
