//! Overwrite policy for baseline creation.
//!
//! ```text
//! Ask --"all"--> OverwriteAll   (sticky)
//! Ask --"none"-> SkipAll        (sticky)
//! Ask --"yes"/"no"--> Ask       (decides one conflict only)
//! ```
//!
//! A fresh policy starts in `Ask` for every baseline-creation batch.

use std::collections::VecDeque;

use async_trait::async_trait;

use crate::error::CoreError;

/// Line-input callback used for interactive decisions.
#[async_trait]
pub trait Prompt: Send {
    /// Show `question` and return the raw answer line.
    async fn ask(&mut self, question: &str) -> Result<String, CoreError>;
}

/// Answers from a fixed script, recording every question asked.
///
/// An exhausted script answers with an empty line.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    questions: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            questions: Vec::new(),
        }
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }
}

#[async_trait]
impl Prompt for ScriptedPrompt {
    async fn ask(&mut self, question: &str) -> Result<String, CoreError> {
        self.questions.push(question.to_string());
        Ok(self.answers.pop_front().unwrap_or_default())
    }
}

/// An operator's answer to one overwrite question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteChoice {
    Yes,
    No,
    All,
    None,
}

impl OverwriteChoice {
    /// Parse an answer case-insensitively. Anything unrecognized means no.
    pub fn parse(answer: &str) -> Self {
        match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => OverwriteChoice::Yes,
            "a" | "all" => OverwriteChoice::All,
            "none" => OverwriteChoice::None,
            _ => OverwriteChoice::No,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverwritePolicy {
    #[default]
    Ask,
    OverwriteAll,
    SkipAll,
}

impl OverwritePolicy {
    /// Whether a conflict needs an answer from the operator.
    pub fn needs_answer(self) -> bool {
        self == OverwritePolicy::Ask
    }

    /// Apply one conflict. Returns whether to overwrite and the next state.
    ///
    /// `choice` is ignored once the policy is sticky.
    pub fn resolve(self, choice: Option<OverwriteChoice>) -> (bool, OverwritePolicy) {
        match self {
            OverwritePolicy::OverwriteAll => (true, self),
            OverwritePolicy::SkipAll => (false, self),
            OverwritePolicy::Ask => match choice {
                Some(OverwriteChoice::Yes) => (true, OverwritePolicy::Ask),
                Some(OverwriteChoice::All) => (true, OverwritePolicy::OverwriteAll),
                Some(OverwriteChoice::None) => (false, OverwritePolicy::SkipAll),
                Some(OverwriteChoice::No) | None => (false, OverwritePolicy::Ask),
            },
        }
    }

    /// Resolve one conflict, asking `prompt` only while in `Ask`.
    pub async fn decide(
        self,
        prompt: &mut dyn Prompt,
        question: &str,
    ) -> Result<(bool, OverwritePolicy), CoreError> {
        if !self.needs_answer() {
            return Ok(self.resolve(None));
        }
        let answer = prompt.ask(question).await?;
        Ok(self.resolve(Some(OverwriteChoice::parse(&answer))))
    }
}
