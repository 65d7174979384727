use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::corpus::Difficulty;

pub const DEFAULT_LANGUAGE: &str = "English";

/// Outcome of one completed typing test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub user_name: String,
    pub difficulty: Difficulty,
    #[serde(default = "default_language")]
    pub language: String,
    pub wpm: u32,
    pub spm: u32,
    /// Percentage in `[0, 100]`.
    pub accuracy: f64,
    #[serde(rename = "dateTime")]
    pub timestamp: DateTime<Local>,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl TestResult {
    pub fn feedback(&self) -> Feedback {
        Feedback::for_accuracy(self.accuracy)
    }

    /// Congratulation line shown with the final results.
    pub fn summary_message(&self) -> String {
        format!(
            "Great job {}! Your accuracy is {:.2}%! {}",
            self.user_name,
            self.accuracy,
            self.feedback().message()
        )
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Accuracy tiers used for the motivational message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Master,
    Excellent,
    Good,
    KeepPracticing,
}

impl Feedback {
    pub fn for_accuracy(accuracy: f64) -> Self {
        if accuracy >= 90.0 {
            Feedback::Master
        } else if accuracy >= 75.0 {
            Feedback::Excellent
        } else if accuracy >= 60.0 {
            Feedback::Good
        } else {
            Feedback::KeepPracticing
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Feedback::Master => "Outstanding performance! You're a typing master!",
            Feedback::Excellent => "Excellent work! Keep practicing to improve further!",
            Feedback::Good => "Good effort! A bit more practice and you'll excel!",
            Feedback::KeepPracticing => "Keep practicing! Every expert was once a beginner!",
        }
    }
}
