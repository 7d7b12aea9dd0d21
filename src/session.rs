//! Turn-by-turn practice session.
//!
//! The session never performs I/O. Each call to [`Session::handle`] applies one
//! event, moves to the next [`Phase`] and returns at most one [`Effect`] for the
//! caller to carry out. Speech completion comes back later as
//! [`Event::AudioFinished`].

use tracing::{debug, info, warn};

use crate::diff::{compare, DiffRow};
use crate::queue::WordQueue;
use crate::word::{Word, WordList};

/// How a submission is judged. The diff shown on failure is always
/// case-sensitive whichever policy is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    #[default]
    CaseSensitive,
    CaseInsensitive,
}

impl MatchPolicy {
    pub fn matches(self, input: &str, word: &Word) -> bool {
        match self {
            MatchPolicy::CaseSensitive => input == word.as_str(),
            MatchPolicy::CaseInsensitive => input.to_lowercase() == word.as_str().to_lowercase(),
        }
    }
}

pub type SpeechId = u64;

/// Longest answer the prompt accepts, in code points. Further keys are ignored.
pub const MAX_INPUT_CHARS: usize = 100;

/// A word to be spoken. The id ties the eventual completion back to this request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeechRequest {
    pub id: SpeechId,
    pub word: Word,
    pub language: String,
}

/// Work the caller must perform on behalf of the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Speak(SpeechRequest),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudioOutcome {
    Spoken,
    Failed(String),
}

/// Everything the session reacts to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    AudioFinished { id: SpeechId, outcome: AudioOutcome },
    Type(char),
    Backspace,
    Submit,
    RepeatAudio,
    Acknowledge,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

/// Feedback for one submission. `diff` is present iff the verdict is `Incorrect`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogResult {
    pub verdict: Verdict,
    pub input: String,
    pub diff: Option<DiffRow>,
}

impl DialogResult {
    pub fn is_correct(&self) -> bool {
        self.verdict == Verdict::Correct
    }
}

/// Recoverable problem with the typed text; the learner is simply re-prompted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputError {
    Blank,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinishReason {
    Completed,
    Cancelled,
}

/// Where the session is in the current turn. Every phase that needs the
/// current word carries it, so it can never be missing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    AwaitingAudio {
        word: Word,
        request: SpeechId,
    },
    AwaitingInput {
        word: Word,
        buffer: String,
        error: Option<InputError>,
    },
    ShowingDialog {
        word: Word,
        result: DialogResult,
    },
    Finished(FinishReason),
}

impl Phase {
    pub fn word(&self) -> Option<&Word> {
        match self {
            Phase::AwaitingAudio { word, .. }
            | Phase::AwaitingInput { word, .. }
            | Phase::ShowingDialog { word, .. } => Some(word),
            Phase::Finished(_) => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Phase::AwaitingAudio { .. } => "awaiting-audio",
            Phase::AwaitingInput { .. } => "awaiting-input",
            Phase::ShowingDialog { .. } => "showing-dialog",
            Phase::Finished(_) => "finished",
        }
    }
}

/// Numbers for the title bar. `total` is the word count at session start,
/// never the live queue length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub turn: usize,
    pub completed: usize,
    pub total: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub correct: usize,
    pub attempts: usize,
    pub original: usize,
}

impl Summary {
    pub fn accuracy_percent(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        self.correct as f64 / self.attempts as f64 * 100.0
    }
}

#[derive(Debug)]
pub struct Session {
    phase: Phase,
    queue: WordQueue,
    original_count: usize,
    correct_count: usize,
    correct_words: Vec<Word>,
    turn: usize,
    attempts: usize,
    language: String,
    policy: MatchPolicy,
    next_speech_id: SpeechId,
    speaking: Option<SpeechId>,
}

impl Session {
    /// Build a session from an already shuffled list and pull the first word.
    pub fn start(list: WordList, policy: MatchPolicy) -> (Self, Option<Effect>) {
        let original_count = list.len();
        let (words, language) = list.into_parts();

        let mut session = Self {
            phase: Phase::Finished(FinishReason::Completed),
            queue: WordQueue::new(words),
            original_count,
            correct_count: 0,
            correct_words: Vec::new(),
            turn: 0,
            attempts: 0,
            language,
            policy,
            next_speech_id: 0,
            speaking: None,
        };

        info!(
            words = original_count,
            language = %session.language,
            ?policy,
            "practice session started"
        );

        let (phase, effect) = session.advance();
        session.phase = phase;
        (session, effect)
    }

    /// Apply one event. Returns the side effect the caller must run, if any.
    pub fn handle(&mut self, event: Event) -> Option<Effect> {
        if let Event::AudioFinished {
            id,
            outcome: AudioOutcome::Failed(reason),
        } = &event
        {
            warn!(request = id, %reason, "speech failed, continuing without audio");
        }
        if let Event::AudioFinished { id, .. } = &event {
            if self.speaking == Some(*id) {
                self.speaking = None;
            }
        }

        let phase = std::mem::replace(&mut self.phase, Phase::Finished(FinishReason::Cancelled));
        let from = phase.name();
        let (next, effect) = self.transition(phase, event);
        if from != next.name() {
            debug!(from, to = next.name(), turn = self.turn, "phase change");
        }
        self.phase = next;
        effect
    }

    fn transition(&mut self, phase: Phase, event: Event) -> (Phase, Option<Effect>) {
        match (phase, event) {
            (Phase::Finished(reason), _) => (Phase::Finished(reason), None),
            (_, Event::Cancel) => {
                info!(
                    turn = self.turn,
                    correct = self.correct_count,
                    "practice session cancelled"
                );
                (Phase::Finished(FinishReason::Cancelled), None)
            }

            (Phase::AwaitingAudio { word, request }, Event::AudioFinished { id, .. })
                if id == request =>
            {
                (
                    Phase::AwaitingInput {
                        word,
                        buffer: String::new(),
                        error: None,
                    },
                    None,
                )
            }

            (Phase::AwaitingInput { word, mut buffer, .. }, Event::Type(c)) => {
                if buffer.chars().count() < MAX_INPUT_CHARS {
                    buffer.push(c);
                }
                (
                    Phase::AwaitingInput {
                        word,
                        buffer,
                        error: None,
                    },
                    None,
                )
            }
            (Phase::AwaitingInput { word, mut buffer, .. }, Event::Backspace) => {
                buffer.pop();
                (
                    Phase::AwaitingInput {
                        word,
                        buffer,
                        error: None,
                    },
                    None,
                )
            }
            (Phase::AwaitingInput { word, buffer, .. }, Event::Submit) => {
                let input = buffer.trim();
                if input.is_empty() {
                    debug!("blank submission rejected");
                    return (
                        Phase::AwaitingInput {
                            word,
                            buffer,
                            error: Some(InputError::Blank),
                        },
                        None,
                    );
                }
                let result = self.evaluate(input, &word);
                (Phase::ShowingDialog { word, result }, None)
            }
            (
                Phase::AwaitingInput {
                    word,
                    buffer,
                    error,
                },
                Event::RepeatAudio,
            ) => {
                let effect = if self.speaking.is_some() {
                    debug!("repeat ignored, word still playing");
                    None
                } else {
                    Some(Effect::Speak(self.speech_request(&word)))
                };
                (
                    Phase::AwaitingInput {
                        word,
                        buffer,
                        error,
                    },
                    effect,
                )
            }

            (Phase::ShowingDialog { word, result }, Event::Acknowledge) => {
                if !result.is_correct() {
                    self.queue.requeue(word);
                }
                self.advance()
            }

            // stale audio completions, keys that mean nothing in this phase
            (phase, _) => (phase, None),
        }
    }

    fn evaluate(&mut self, input: &str, word: &Word) -> DialogResult {
        self.attempts += 1;

        if self.policy.matches(input, word) {
            self.correct_count += 1;
            self.correct_words.push(word.clone());
            debug!(turn = self.turn, "correct");
            DialogResult {
                verdict: Verdict::Correct,
                input: input.to_string(),
                diff: None,
            }
        } else {
            let diff = compare(input, word.as_str());
            debug!(
                turn = self.turn,
                mismatches = diff.mismatch_count(),
                "incorrect"
            );
            DialogResult {
                verdict: Verdict::Incorrect,
                input: input.to_string(),
                diff: Some(diff),
            }
        }
    }

    fn advance(&mut self) -> (Phase, Option<Effect>) {
        match self.queue.next() {
            Some(word) => {
                self.turn += 1;
                let request = self.speech_request(&word);
                let id = request.id;
                (
                    Phase::AwaitingAudio { word, request: id },
                    Some(Effect::Speak(request)),
                )
            }
            None => {
                info!(
                    turns = self.turn,
                    correct = self.correct_count,
                    "practice session complete"
                );
                (Phase::Finished(FinishReason::Completed), None)
            }
        }
    }

    fn speech_request(&mut self, word: &Word) -> SpeechRequest {
        self.next_speech_id += 1;
        self.speaking = Some(self.next_speech_id);
        debug!(request = self.next_speech_id, "speech requested");
        SpeechRequest {
            id: self.next_speech_id,
            word: word.clone(),
            language: self.language.clone(),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn current_word(&self) -> Option<&Word> {
        self.phase.word()
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }

    pub fn progress(&self) -> Progress {
        Progress {
            turn: self.turn,
            completed: self.correct_count,
            total: self.original_count,
        }
    }

    pub fn summary(&self) -> Summary {
        Summary {
            correct: self.correct_count,
            attempts: self.attempts,
            original: self.original_count,
        }
    }

    pub fn correct_words(&self) -> &[Word] {
        &self.correct_words
    }

    pub fn original_count(&self) -> usize {
        self.original_count
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }
}
