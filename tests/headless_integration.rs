use std::mem::discriminant;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use diktat::keys::event_for_key;
use diktat::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use diktat::session::{Effect, FinishReason, MatchPolicy, Phase, Session, SpeechRequest};
use diktat::speech::{AudioDispatcher, SilentSpeaker, Speaker, SpeechError};
use diktat::word::{Word, WordList};

// Headless integration using the runtime + Session without a TTY.
// Keys are only sent once the session is ready for them, the way a learner
// waits for the word to be read out before typing.

fn word_list(words: &[&str], language: &str) -> WordList {
    WordList::new(words.iter().filter_map(Word::new).collect(), language).unwrap()
}

fn send_key(tx: &Sender<AppEvent>, code: KeyCode) {
    tx.send(AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
        .unwrap();
}

fn send_answer(tx: &Sender<AppEvent>, answer: &str) {
    for c in answer.chars() {
        send_key(tx, KeyCode::Char(c));
    }
    send_key(tx, KeyCode::Enter);
}

/// Drive the session to the end, typing `answers` in order. Returns the
/// dialogs seen (true when the answer was accepted).
fn drive(
    session: &mut Session,
    first: Option<Effect>,
    speaker: Arc<dyn Speaker>,
    answers: &[&str],
) -> Vec<bool> {
    let runner = Runner::new(
        TestEventSource::new(),
        FixedTicker::new(Duration::from_millis(5)),
    );
    let tx = runner.sender();
    let audio = AudioDispatcher::new(speaker, runner.sender());
    let mut answers = answers.iter();
    let mut verdicts = Vec::new();

    if let Some(Effect::Speak(request)) = first {
        audio.dispatch(request);
    }

    for _ in 0..1000u32 {
        if session.is_finished() {
            break;
        }
        let event = match runner.step() {
            AppEvent::Key(key) => event_for_key(session.phase(), key),
            AppEvent::Speech(done) => Some(done.into()),
            AppEvent::Resize | AppEvent::Tick => None,
        };
        let Some(event) = event else { continue };

        let before = discriminant(session.phase());
        if let Some(Effect::Speak(request)) = session.handle(event) {
            audio.dispatch(request);
        }
        if discriminant(session.phase()) == before {
            continue;
        }

        match session.phase() {
            Phase::AwaitingInput { .. } => match answers.next() {
                Some(answer) => send_answer(&tx, answer),
                None => send_key(&tx, KeyCode::Esc),
            },
            Phase::ShowingDialog { result, .. } => {
                verdicts.push(result.is_correct());
                send_key(&tx, KeyCode::Enter);
            }
            _ => {}
        }
    }
    verdicts
}

#[test]
fn headless_practice_requeues_until_spelled() {
    let (mut session, first) =
        Session::start(word_list(&["Haus", "Buch"], "de"), MatchPolicy::CaseSensitive);

    let verdicts = drive(
        &mut session,
        first,
        Arc::new(SilentSpeaker),
        &["Haus", "Buhc", "Buch"],
    );

    assert_eq!(verdicts, vec![true, false, true]);
    assert_eq!(session.phase(), &Phase::Finished(FinishReason::Completed));

    let progress = session.progress();
    assert_eq!(progress.turn, 3);
    assert_eq!(progress.completed, 2);
    assert_eq!(progress.total, 2);

    let summary = session.summary();
    assert_eq!(summary.correct, 2);
    assert_eq!(summary.attempts, 3);
    let correct: Vec<&str> = session.correct_words().iter().map(Word::as_str).collect();
    assert_eq!(correct, vec!["Haus", "Buch"]);
}

#[test]
fn headless_ignore_case_accepts_lowercase() {
    let (mut session, first) =
        Session::start(word_list(&["Übung"], "de"), MatchPolicy::CaseInsensitive);

    let verdicts = drive(&mut session, first, Arc::new(SilentSpeaker), &["übung"]);

    assert_eq!(verdicts, vec![true]);
    assert_eq!(session.summary().attempts, 1);
}

#[test]
fn headless_escape_cancels_session() {
    let (mut session, first) =
        Session::start(word_list(&["Haus", "Buch"], "de"), MatchPolicy::default());

    // no answers left: the driver presses Esc at the first prompt
    let verdicts = drive(&mut session, first, Arc::new(SilentSpeaker), &[]);

    assert!(verdicts.is_empty());
    assert_eq!(session.phase(), &Phase::Finished(FinishReason::Cancelled));
    assert_eq!(session.summary().correct, 0);
}

struct MuteSpeaker;

impl Speaker for MuteSpeaker {
    fn speak(&self, _word: &str, _language: &str) -> Result<(), SpeechError> {
        Err(SpeechError::Spawn {
            program: "say".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
        })
    }
}

#[test]
fn headless_speech_failure_still_prompts() {
    let (mut session, first) = Session::start(word_list(&["Haus"], "de"), MatchPolicy::default());
    assert!(matches!(
        first,
        Some(Effect::Speak(SpeechRequest { ref word, .. })) if word.as_str() == "Haus"
    ));

    let verdicts = drive(&mut session, first, Arc::new(MuteSpeaker), &["Haus"]);

    assert_eq!(verdicts, vec![true]);
    assert_eq!(session.phase(), &Phase::Finished(FinishReason::Completed));
}
