use std::io;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::runtime::AppEvent;
use crate::session::{AudioOutcome, Event, SpeechId, SpeechRequest};

/// Words per minute for the system voices.
pub const SPEECH_RATE: u32 = 180;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("failed to run {program}: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("{program} exited with {status}")]
    Failed { program: String, status: ExitStatus },
}

/// Text-to-speech backend. Implementations block until the word has been spoken.
pub trait Speaker: Send + Sync + 'static {
    fn speak(&self, word: &str, language: &str) -> Result<(), SpeechError>;

    /// Cut off anything still playing. Later calls to `speak` return at once.
    fn stop(&self) {}
}

/// Named macOS voice for a language code, if there is a preferred one.
pub fn voice_for_language(language: &str) -> Option<&'static str> {
    match language {
        "de" => Some("Anna"),
        "en" => Some("Alex"),
        "fr" => Some("Thomas"),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Engine {
    /// macOS `say`
    Say,
    /// `espeak` on everything else
    Espeak,
}

impl Engine {
    pub fn for_platform() -> Self {
        if cfg!(target_os = "macos") {
            Engine::Say
        } else {
            Engine::Espeak
        }
    }

    fn program(self) -> &'static str {
        match self {
            Engine::Say => "say",
            Engine::Espeak => "espeak",
        }
    }
}

/// Speaks through the platform's command line TTS tool.
#[derive(Clone, Debug)]
pub struct SystemSpeaker {
    engine: Engine,
    rate: u32,
    current: Arc<Mutex<Option<Child>>>,
    stopped: Arc<AtomicBool>,
}

impl SystemSpeaker {
    pub fn new() -> Self {
        Self::with_engine(Engine::for_platform())
    }

    pub fn with_engine(engine: Engine) -> Self {
        Self {
            engine,
            rate: SPEECH_RATE,
            current: Arc::new(Mutex::new(None)),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Arguments for one invocation. `None` for the voice means the default voice.
    pub fn args(&self, word: &str, voice: Option<&str>) -> Vec<String> {
        let mut args = Vec::with_capacity(5);
        match self.engine {
            Engine::Say => {
                if let Some(voice) = voice {
                    args.extend(["-v".to_string(), voice.to_string()]);
                }
                args.extend(["-r".to_string(), self.rate.to_string()]);
            }
            Engine::Espeak => {
                if let Some(voice) = voice {
                    args.extend(["-v".to_string(), voice.to_string()]);
                }
                args.extend(["-s".to_string(), self.rate.to_string()]);
            }
        }
        args.push(word.to_string());
        args
    }

    fn voice<'a>(&self, language: &'a str) -> Option<&'a str> {
        match self.engine {
            Engine::Say => voice_for_language(language),
            // espeak voices are named by language code
            Engine::Espeak if !language.is_empty() => Some(language),
            Engine::Espeak => None,
        }
    }

    fn run(&self, args: &[String]) -> Result<(), SpeechError> {
        let program = self.engine.program();
        let spawn_error = |source| SpeechError::Spawn {
            program: program.to_string(),
            source,
        };

        let mut current = lock(&self.current);
        if self.stopped.load(Ordering::SeqCst) {
            return Ok(());
        }
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(spawn_error)?;
        *current = Some(child);
        drop(current);

        // poll so that stop() can take the child and kill it meanwhile
        loop {
            let mut current = lock(&self.current);
            let Some(child) = current.as_mut() else {
                return Ok(());
            };
            match child.try_wait() {
                Ok(Some(status)) => {
                    *current = None;
                    return if status.success() {
                        Ok(())
                    } else {
                        Err(SpeechError::Failed {
                            program: program.to_string(),
                            status,
                        })
                    };
                }
                Ok(None) => {}
                Err(source) => {
                    *current = None;
                    return Err(spawn_error(source));
                }
            }
            drop(current);
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Default for SystemSpeaker {
    fn default() -> Self {
        Self::new()
    }
}

impl Speaker for SystemSpeaker {
    fn speak(&self, word: &str, language: &str) -> Result<(), SpeechError> {
        match self.voice(language) {
            Some(voice) => match self.run(&self.args(word, Some(voice))) {
                Ok(()) => Ok(()),
                Err(err) => {
                    debug!(%err, voice, "voice failed, retrying with default voice");
                    self.run(&self.args(word, None))
                }
            },
            None => self.run(&self.args(word, None)),
        }
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        if let Some(mut child) = lock(&self.current).take() {
            debug!("stopping speech in progress");
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Speaker used with `--mute`: every word "plays" instantly.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn speak(&self, _word: &str, _language: &str) -> Result<(), SpeechError> {
        Ok(())
    }
}

/// Completion notice for one speech request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeechDone {
    pub id: SpeechId,
    pub outcome: AudioOutcome,
}

impl From<SpeechDone> for Event {
    fn from(done: SpeechDone) -> Self {
        Event::AudioFinished {
            id: done.id,
            outcome: done.outcome,
        }
    }
}

/// Runs speech requests off the UI thread and posts completions back into
/// the event channel. Requests play one after another, never on top of each
/// other.
#[derive(Clone)]
pub struct AudioDispatcher {
    speaker: Arc<dyn Speaker>,
    tx: Sender<AppEvent>,
    playback: Arc<Mutex<()>>,
}

impl AudioDispatcher {
    pub fn new(speaker: Arc<dyn Speaker>, tx: Sender<AppEvent>) -> Self {
        Self {
            speaker,
            tx,
            playback: Arc::new(Mutex::new(())),
        }
    }

    pub fn dispatch(&self, request: SpeechRequest) {
        let speaker = Arc::clone(&self.speaker);
        let playback = Arc::clone(&self.playback);
        let tx = self.tx.clone();

        debug!(request = request.id, "dispatching speech");
        thread::spawn(move || {
            let outcome = {
                let _playing = lock(&playback);
                match speaker.speak(request.word.as_str(), &request.language) {
                    Ok(()) => AudioOutcome::Spoken,
                    Err(err) => AudioOutcome::Failed(err.to_string()),
                }
            };
            // receiver gone means the session already ended
            let _ = tx.send(AppEvent::Speech(SpeechDone {
                id: request.id,
                outcome,
            }));
        });
    }

    /// Silence the speaker, e.g. when the session ends with audio still playing.
    pub fn stop(&self) {
        self.speaker.stop();
    }
}
