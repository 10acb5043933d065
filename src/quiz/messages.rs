//! User-facing text, prompts, and controls for the quiz conversation.

use crate::channels::{Button, ButtonStyle, ModalPrompt, Response};
use crate::config::QuizConfig;

use super::action::{ButtonAction, ModalKind, START_COMMAND};
use super::questions::Question;
use super::session::{MAX_RESPONSE_CHARS, MIN_RESPONSE_CHARS};

pub fn session_expired() -> Response {
    Response::private(format!(
        "Your quiz session has expired. Please start again with `/{START_COMMAND}`."
    ))
}

pub fn apology() -> Response {
    Response::private(
        "Sorry, something went wrong processing your request. Please try again later.",
    )
}

pub fn wrong_channel(channel: &str) -> Response {
    Response::private(format!(
        "Quiz commands and buttons can only be used in the #{channel} channel!"
    ))
}

pub fn help(config: &QuizConfig) -> Response {
    Response::private(format!(
        "**Nocena Quiz Bot**\n\
         This bot helps you earn an invite code to join the Nocena app.\n\n\
         **How it works**\n\
         Use `/{START_COMMAND}` to begin a short quiz about the Nocena whitepaper. \
         Answer the questions and share your challenge ideas to earn an exclusive invite code.\n\n\
         **Whitepaper**\n{}\n\n\
         **Got questions?**\nJoin our community Discord for more information!",
        config.whitepaper_url
    ))
}

pub fn existing_invite(code: &str, is_used: bool) -> Response {
    let mut message = format!("You've already completed the quiz! Your invite code is: `{code}`");
    if is_used {
        message.push_str("\n\nThis code has already been used to register an account.");
    }
    Response::private(message)
}

pub fn modal(kind: ModalKind) -> Response {
    let (title, label, placeholder) = match kind {
        ModalKind::Initial => (
            "Get Started with Nocena",
            "What is the craziest thing you have done?",
            "Tell us about a crazy experience...",
        ),
        ModalKind::Final => (
            "One Last Question",
            "Come up with a challenge for other users",
            "What challenge would you give to others?",
        ),
    };
    Response::Modal(ModalPrompt {
        custom_id: kind.custom_id().to_string(),
        title: title.to_string(),
        label: label.to_string(),
        placeholder: placeholder.to_string(),
        min_len: MIN_RESPONSE_CHARS,
        max_len: MAX_RESPONSE_CHARS,
    })
}

pub fn response_too_short(kind: ModalKind) -> Response {
    Response::private_with_buttons(
        format!(
            "Your answer needs at least {MIN_RESPONSE_CHARS} characters. Click below to try again."
        ),
        vec![Button {
            custom_id: kind.reopen_action().to_string(),
            label: "Try Again".to_string(),
            style: ButtonStyle::Secondary,
        }],
    )
}

pub fn initial_acknowledged() -> Response {
    Response::private("Thanks for sharing! Now let's test your knowledge about Nocena.")
}

/// A multiple-choice prompt with one button per option.
pub fn question(index: usize, total: usize, question: &Question) -> Response {
    let buttons = question
        .options
        .iter()
        .enumerate()
        .map(|(option, label)| Button {
            custom_id: ButtonAction::Answer {
                question: index,
                option,
            }
            .to_string(),
            label: (*label).to_string(),
            style: ButtonStyle::Primary,
        })
        .collect();

    Response::private_with_buttons(
        format!(
            "**Question {} of {total}**\n{}\n\n_Answer correctly to get a Nocena invite code!_",
            index + 1,
            question.prompt
        ),
        buttons,
    )
}

pub fn answer_feedback(correct: bool, question: &Question) -> Response {
    if correct {
        Response::private("✅ Correct! Great job.")
    } else {
        Response::private(format!(
            "❌ Incorrect. The correct answer was: {}",
            question.correct_label()
        ))
    }
}

/// Confirmation control for the final question. A modal cannot be opened
/// from a follow-up, so the user clicks through to it.
pub fn final_prompt() -> Response {
    Response::private_with_buttons(
        "You've completed all the multiple choice questions! \
         Click the button below to answer the final question and get your invite code.",
        vec![Button {
            custom_id: ButtonAction::ShowFinalModal.to_string(),
            label: "Answer Final Question".to_string(),
            style: ButtonStyle::Success,
        }],
    )
}

pub fn completion(score: u32, total: usize, code: &str, config: &QuizConfig) -> Response {
    Response::private(format!(
        "🎉 **Congratulations!** 🎉\n\
         You've completed the Nocena quiz with {score} out of {total} correct answers!\n\n\
         **Your Exclusive Invite Code**\n`{code}`\n\n\
         **How to Use**\nVisit {} and enter this code during registration to join!\n\n\
         **Invite Expires**\nThis code is valid for 7 days and can only be used once.",
        config.registration_url
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::questions::QuestionBank;

    #[test]
    fn question_buttons_encode_indices() {
        let bank = QuestionBank::default();
        let response = question(2, bank.count(), bank.get(2).unwrap());
        let ids: Vec<&str> = response.buttons().iter().map(|b| b.custom_id.as_str()).collect();
        assert_eq!(ids, ["answer-2-0", "answer-2-1", "answer-2-2", "answer-2-3"]);
        assert!(response.content().unwrap().contains("Question 3 of 5"));
    }

    #[test]
    fn wrong_answer_names_correct_option() {
        let bank = QuestionBank::default();
        let q = bank.get(0).unwrap();
        let text = answer_feedback(false, q).content().unwrap().to_string();
        assert!(text.contains("Token rewards for completing challenges"));
    }

    #[test]
    fn existing_invite_mentions_used_state() {
        let unused = existing_invite("ABCDEF", false);
        assert!(!unused.content().unwrap().contains("already been used"));
        let used = existing_invite("ABCDEF", true);
        assert!(used.content().unwrap().contains("already been used"));
    }

    #[test]
    fn modal_declares_length_bounds() {
        match modal(ModalKind::Final) {
            Response::Modal(m) => {
                assert_eq!(m.custom_id, "finalQuestionModal");
                assert_eq!(m.min_len, MIN_RESPONSE_CHARS);
                assert_eq!(m.max_len, MAX_RESPONSE_CHARS);
            }
            other => panic!("expected modal, got {other:?}"),
        }
    }
}
