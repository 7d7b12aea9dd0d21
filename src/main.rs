use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use diktat::{
    config::{PracticeSet, WordSource, YamlWordSource, DEFAULT_CONFIG_PATH},
    i18n::Localizer,
    keys,
    logging,
    runtime::{AppEvent, CrosstermEventSource, EventSource, FixedTicker, Runner, Ticker},
    session::{Effect, MatchPolicy, Phase, Session},
    shuffle::shuffle,
    speech::{AudioDispatcher, SilentSpeaker, Speaker, SystemSpeaker},
    ui::{summary_banner, summary_lines, theme::Theme, SessionView},
    word::WordList,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    io::{self, stdin, Write},
    panic,
    path::PathBuf,
    sync::Arc,
    time::Duration,
};
use tracing::{info, warn};

const TICK_RATE_MS: u64 = 100;

/// listen to a word, type it, see where the spelling went wrong
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A spelling dictation trainer. Each word from the list is read aloud, you type what you heard, and mistakes are shown letter by letter. Misspelled words come back until they are spelled correctly."
)]
pub struct Cli {
    /// YAML file with the words to practise
    #[clap(default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// accept answers regardless of upper/lower case, overriding the config file
    #[clap(short = 'i', long)]
    ignore_case: bool,

    /// don't speak the words (no speech engine required)
    #[clap(short = 'm', long)]
    mute: bool,

    /// render without colours (also enabled by a non-empty NO_COLOR)
    #[clap(long)]
    no_color: bool,

    /// log filter written to the log file, e.g. "debug" (default: $DIKTAT_LOG or "info")
    #[clap(long)]
    log_level: Option<String>,
}

impl Cli {
    fn match_policy(&self, from_file: MatchPolicy) -> MatchPolicy {
        if self.ignore_case {
            MatchPolicy::CaseInsensitive
        } else {
            from_file
        }
    }

    fn theme(&self) -> Theme {
        let no_color_env = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        if self.no_color || no_color_env {
            Theme::monochrome()
        } else {
            Theme::default()
        }
    }

    fn speaker(&self) -> Arc<dyn Speaker> {
        if self.mute {
            Arc::new(SilentSpeaker)
        } else {
            Arc::new(SystemSpeaker::new())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match logging::init(cli.log_level.as_deref()) {
        Ok(path) => info!(log = %path.display(), "diktat starting"),
        Err(err) => eprintln!("warning: logging disabled: {err}"),
    }

    let practice = YamlWordSource::with_path(&cli.config)
        .load()
        .inspect_err(|err| warn!(%err, "could not load word list"))?;

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let (session, first_effect) = start_session(practice, &cli)?;
    let l10n = Localizer::new(session.language());
    let theme = cli.theme();

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        reset_terminal();
        original_hook(panic_info);
    }));

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut terminal = match enter_terminal(io::stdout()) {
        Ok(terminal) => terminal,
        Err(err) => {
            reset_terminal();
            return Err(err);
        }
    };

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let audio = AudioDispatcher::new(cli.speaker(), runner.sender());

    let result = run_session(
        &mut terminal,
        &runner,
        &audio,
        session,
        first_effect,
        &l10n,
        &theme,
    );

    audio.stop();

    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    let session = result?;
    if let Phase::Finished(reason) = session.phase() {
        let summary = session.summary();
        println!("{}", summary_banner(&summary_lines(&summary, *reason, &l10n)));
    }

    Ok(())
}

/// Switch `out` to the alternate screen and wrap it in a ratatui terminal.
fn enter_terminal<W: Write>(mut out: W) -> Result<Terminal<CrosstermBackend<W>>> {
    execute!(out, EnterAlternateScreen).context("failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(out)).context("failed to initialise terminal")
}

/// Best-effort restore used when the normal teardown can't run.
fn reset_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Shuffle the loaded words and open the session on the first one.
fn start_session(practice: PracticeSet, cli: &Cli) -> Result<(Session, Option<Effect>)> {
    let policy = cli.match_policy(practice.policy);
    let (words, language) = practice.words.into_parts();
    let list = WordList::new(shuffle(&words), language).context("word list is empty")?;
    Ok(Session::start(list, policy))
}

fn run_session<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    runner: &Runner<E, T>,
    audio: &AudioDispatcher,
    mut session: Session,
    first_effect: Option<Effect>,
    l10n: &Localizer,
    theme: &Theme,
) -> Result<Session> {
    let mut effect = first_effect;

    loop {
        if let Some(Effect::Speak(request)) = effect.take() {
            audio.dispatch(request);
        }
        if session.is_finished() {
            return Ok(session);
        }

        terminal.draw(|f| f.render_widget(SessionView::new(&session, l10n, theme), f.area()))?;

        effect = match runner.step() {
            AppEvent::Key(key) => {
                keys::event_for_key(session.phase(), key).and_then(|event| session.handle(event))
            }
            AppEvent::Speech(done) => session.handle(done.into()),
            AppEvent::Resize | AppEvent::Tick => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use diktat::word::Word;

    fn practice(words: &[&str], policy: MatchPolicy) -> PracticeSet {
        PracticeSet {
            words: WordList::new(words.iter().filter_map(Word::new).collect(), "de").unwrap(),
            policy,
        }
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["diktat"]);

        assert_eq!(cli.config, PathBuf::from("config.yaml"));
        assert!(!cli.ignore_case);
        assert!(!cli.mute);
        assert!(!cli.no_color);
        assert_eq!(cli.log_level, None);
    }

    #[test]
    fn test_cli_config_path() {
        let cli = Cli::parse_from(["diktat", "lists/week3.yaml"]);
        assert_eq!(cli.config, PathBuf::from("lists/week3.yaml"));
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["diktat", "-i", "-m", "--no-color", "--log-level", "debug"]);
        assert!(cli.ignore_case);
        assert!(cli.mute);
        assert!(cli.no_color);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));

        let cli = Cli::parse_from(["diktat", "--ignore-case", "--mute"]);
        assert!(cli.ignore_case);
        assert!(cli.mute);
    }

    #[test]
    fn test_ignore_case_overrides_file_policy() {
        let cli = Cli::parse_from(["diktat"]);
        assert_eq!(
            cli.match_policy(MatchPolicy::CaseInsensitive),
            MatchPolicy::CaseInsensitive
        );
        assert_eq!(
            cli.match_policy(MatchPolicy::CaseSensitive),
            MatchPolicy::CaseSensitive
        );

        let cli = Cli::parse_from(["diktat", "--ignore-case"]);
        assert_eq!(
            cli.match_policy(MatchPolicy::CaseSensitive),
            MatchPolicy::CaseInsensitive
        );
    }

    #[test]
    fn test_no_color_selects_monochrome_theme() {
        let cli = Cli::parse_from(["diktat", "--no-color"]);
        assert_eq!(cli.theme(), Theme::monochrome());
    }

    #[test]
    fn test_start_session_speaks_first_word() {
        let cli = Cli::parse_from(["diktat", "--ignore-case"]);
        let (session, effect) =
            start_session(practice(&["Haus", "Buch"], MatchPolicy::CaseSensitive), &cli).unwrap();

        assert_eq!(session.original_count(), 2);
        assert_eq!(session.language(), "de");
        assert_eq!(session.policy(), MatchPolicy::CaseInsensitive);
        match effect {
            Some(Effect::Speak(request)) => {
                assert!(["Haus", "Buch"].contains(&request.word.as_str()))
            }
            other => panic!("expected speech for the first word, got {other:?}"),
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_terminal_setup_failure_has_context() {
        let err = enter_terminal(BrokenPipe).err().unwrap();
        assert_eq!(err.to_string(), "failed to enter alternate screen");
        assert!(format!("{err:#}").contains("closed"));
    }

    #[test]
    fn test_invalid_flag_is_rejected() {
        assert!(Cli::try_parse_from(["diktat", "--words", "5"]).is_err());
    }
}
