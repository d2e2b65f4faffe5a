use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const TRUE_ANSWER: &str = "True";
pub const FALSE_ANSWER: &str = "False";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct MultipleChoiceQuestion {
    pub question: String,
    /// Answer choices, four when generated.
    pub options: Vec<String>,
    /// Text of the correct option.
    pub answer: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct TrueFalseQuestion {
    pub statement: String,
    /// Either "True" or "False".
    pub answer: String,
}

/// Questions produced for one or more chunks of lecture notes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct GeneratedQuestions {
    #[serde(default)]
    pub multiple_choice: Vec<MultipleChoiceQuestion>,
    #[serde(default)]
    pub true_false: Vec<TrueFalseQuestion>,
}

impl MultipleChoiceQuestion {
    pub fn has_valid_answer(&self) -> bool {
        self.options.len() >= 2 && self.options.iter().any(|o| o == &self.answer)
    }
}

impl TrueFalseQuestion {
    pub fn has_valid_answer(&self) -> bool {
        self.answer == TRUE_ANSWER || self.answer == FALSE_ANSWER
    }
}

impl GeneratedQuestions {
    pub fn extend(&mut self, other: GeneratedQuestions) {
        self.multiple_choice.extend(other.multiple_choice);
        self.true_false.extend(other.true_false);
    }

    pub fn truncate(&mut self, num_mcq: usize, num_tf: usize) {
        self.multiple_choice.truncate(num_mcq);
        self.true_false.truncate(num_tf);
    }

    pub fn len(&self) -> usize {
        self.multiple_choice.len() + self.true_false.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
