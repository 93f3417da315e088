// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Dynamic pricing questionnaire.
//!
//! The backend publishes a list of questions whose answers feed its price
//! estimate. Answers are attached to a request's service details as
//! `(question id, chosen option ids)` pairs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
    Boolean,
}

impl QuestionType {
    /// Single-choice and yes/no questions hold exactly one option.
    pub fn is_exclusive(&self) -> bool {
        matches!(self, QuestionType::SingleChoice | QuestionType::Boolean)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: u64,
    #[serde(alias = "option_text", alias = "label")]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingQuestion {
    pub id: u64,
    #[serde(alias = "question_text")]
    pub text: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
}

/// Response of `GET /pricing/questions/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingQuestions {
    pub questions: Vec<PricingQuestion>,
}

/// Answer to one question, as sent inside `service_details`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub question_id: u64,
    pub option_ids: Vec<u64>,
}

/// Answer selections being collected for a new request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionAnswers {
    selected: BTreeMap<u64, Vec<u64>>,
}

impl QuestionAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a click on an option.
    ///
    /// Exclusive questions replace their selection; multiple-choice questions
    /// toggle the option in or out.
    pub fn select(&mut self, question_id: u64, option_id: u64, question_type: QuestionType) {
        if question_type.is_exclusive() {
            self.selected.insert(question_id, vec![option_id]);
            return;
        }
        let current = self.selected.entry(question_id).or_default();
        if let Some(pos) = current.iter().position(|id| *id == option_id) {
            current.remove(pos);
        } else {
            current.push(option_id);
        }
    }

    pub fn selected(&self, question_id: u64) -> &[u64] {
        self.selected
            .get(&question_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Non-empty answers, ordered by question id.
    pub fn to_answers(&self) -> Vec<QuestionAnswer> {
        self.selected
            .iter()
            .filter(|(_, options)| !options.is_empty())
            .map(|(question_id, options)| QuestionAnswer {
                question_id: *question_id,
                option_ids: options.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "pricing_tests.rs"]
mod tests;
