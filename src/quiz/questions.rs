//! Static multiple-choice question bank.

use crate::error::QuizError;

/// Number of options every question carries.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub prompt: &'static str,
    pub options: [&'static str; OPTIONS_PER_QUESTION],
    pub correct: usize,
}

impl Question {
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct
    }

    pub fn correct_label(&self) -> &'static str {
        self.options[self.correct]
    }
}

/// Ordered, immutable list of quiz questions.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank from an explicit list. Panics on an empty list or a
    /// correct index outside the options; banks are fixed at startup.
    pub fn new(questions: Vec<Question>) -> Self {
        assert!(!questions.is_empty(), "question bank must not be empty");
        for q in &questions {
            assert!(q.correct < OPTIONS_PER_QUESTION, "bad correct index for {:?}", q.prompt);
        }
        Self { questions }
    }

    pub fn get(&self, index: usize) -> Result<&Question, QuizError> {
        self.questions
            .get(index)
            .ok_or(QuizError::QuestionOutOfRange {
                index,
                count: self.questions.len(),
            })
    }

    pub fn count(&self) -> usize {
        self.questions.len()
    }

    /// Whether `index` is the final question.
    pub fn is_last(&self, index: usize) -> bool {
        index + 1 == self.questions.len()
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::new(vec![
            Question {
                prompt: "According to the whitepaper, which of these is a key feature that differentiates Nocena from traditional social media platforms?",
                options: [
                    "Unlimited content posting",
                    "Token rewards for completing challenges",
                    "Anonymous profiles",
                    "AI-driven content moderation",
                ],
                correct: 1,
            },
            Question {
                prompt: "According to the Nocena whitepaper, what major problem exists with traditional social media platforms?",
                options: [
                    "They're too expensive for users",
                    "They lack sufficient content moderation",
                    "They prioritize passive scrolling over meaningful engagement",
                    "They don't offer enough features",
                ],
                correct: 2,
            },
            Question {
                prompt: "How often are new AI-generated challenges provided on Nocena?",
                options: [
                    "Hourly",
                    "Daily, weekly, and monthly",
                    "Only on weekends",
                    "Annually",
                ],
                correct: 1,
            },
            Question {
                prompt: "What technology does Nocena use to store images?",
                options: [
                    "AWS S3",
                    "Google Cloud Storage",
                    "Pinata (IPFS)",
                    "Local file storage",
                ],
                correct: 2,
            },
            Question {
                prompt: "What can businesses create on the Nocena map?",
                options: [
                    "NFT collections",
                    "Advertisements",
                    "Location-based challenges",
                    "Virtual events",
                ],
                correct: 2,
            },
        ])
    }
}
