//! Answer sources - where callback mode gets its clarification answers.

use async_trait::async_trait;
use tokio::sync::mpsc;

/// Supplies the user's answer to a clarifying question.
///
/// Returning `None` means no answer will ever come (the user went away, the
/// channel closed); the query then fails with `ANSWER_SOURCE_CLOSED`.
#[async_trait]
pub trait AnswerSource: Send {
    async fn answer(&mut self, question: &str) -> Option<String>;
}

/// Any `FnMut(&str) -> String` closure is an answer source that never closes.
#[async_trait]
impl<F> AnswerSource for F
where
    F: FnMut(&str) -> String + Send,
{
    async fn answer(&mut self, question: &str) -> Option<String> {
        Some(self(question))
    }
}

/// Answer source that hands questions to another task over channels.
///
/// Useful when the resolution runs on a worker task and the user interface
/// lives elsewhere.
pub struct ChannelAnswerSource {
    questions: mpsc::Sender<String>,
    answers: mpsc::Receiver<String>,
}

/// The UI-side ends of a [`ChannelAnswerSource`].
pub struct AnswerChannel {
    /// Questions posed by the resolution machine.
    pub questions: mpsc::Receiver<String>,
    /// Answers to send back, one per question.
    pub answers: mpsc::Sender<String>,
}

impl ChannelAnswerSource {
    pub fn new(questions: mpsc::Sender<String>, answers: mpsc::Receiver<String>) -> Self {
        Self { questions, answers }
    }

    /// Creates a connected source and UI-side channel pair.
    pub fn pair(buffer: usize) -> (Self, AnswerChannel) {
        let (question_tx, question_rx) = mpsc::channel(buffer.max(1));
        let (answer_tx, answer_rx) = mpsc::channel(buffer.max(1));
        (
            Self::new(question_tx, answer_rx),
            AnswerChannel {
                questions: question_rx,
                answers: answer_tx,
            },
        )
    }
}

#[async_trait]
impl AnswerSource for ChannelAnswerSource {
    async fn answer(&mut self, question: &str) -> Option<String> {
        if self.questions.send(question.to_string()).await.is_err() {
            tracing::debug!("Question receiver dropped, no answer will arrive");
            return None;
        }
        self.answers.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closure_answers_every_question() {
        let mut asked = Vec::new();
        let mut source = |question: &str| {
            asked.push(question.to_string());
            "the river".to_string()
        };
        assert_eq!(source.answer("which source?").await, Some("the river".to_string()));
        drop(source);
        assert_eq!(asked, vec!["which source?".to_string()]);
    }

    #[tokio::test]
    async fn channel_round_trips_question_and_answer() {
        let (mut source, mut ui) = ChannelAnswerSource::pair(1);
        let ui_task = tokio::spawn(async move {
            let question = ui.questions.recv().await.unwrap();
            ui.answers.send(format!("answer to {}", question)).await.unwrap();
        });

        let answer = source.answer("q1").await;
        ui_task.await.unwrap();
        assert_eq!(answer, Some("answer to q1".to_string()));
    }

    #[tokio::test]
    async fn dropped_ui_closes_the_source() {
        let (mut source, ui) = ChannelAnswerSource::pair(1);
        drop(ui);
        assert_eq!(source.answer("anyone there?").await, None);
    }
}
