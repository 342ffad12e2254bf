//! The `flashrecall play` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};

use flashrecall_core::keywords::ScoreMode;
use flashrecall_core::model::{Difficulty, DisplayMode, PauseMode};
use flashrecall_core::notes::NoteLookup;
use flashrecall_core::player::{
    parse_word_delay, word_delay_from_ms, PlayerState, RecallScope, SequencePlayer,
};
use flashrecall_core::scheduler::{Scheduler, TokioScheduler};

use super::{load_trainer, RecallReport};
use crate::console::{CommandNarrator, ConsoleListener};

pub struct PlayOptions {
    pub difficulty: Option<Difficulty>,
    pub story: Option<String>,
    pub delay: Option<i64>,
    pub display: Option<DisplayMode>,
    pub pause: Option<PauseMode>,
    pub speech: bool,
    pub no_notes: bool,
    pub mode: Option<ScoreMode>,
}

const HELP: &str =
    "Commands: n = next sentence, c = continue, p = pause mode, m = display mode, d <ms> = delay, q = quit";

pub async fn execute(options: PlayOptions, config_path: Option<PathBuf>) -> Result<()> {
    let (config, mut trainer) = load_trainer(config_path.as_deref()).await?;

    let mut settings = config.player_settings()?;
    if let Some(ms) = options.delay {
        settings.word_delay = word_delay_from_ms(ms)?;
    }
    if let Some(display) = options.display {
        settings.display_mode = display;
    }
    if let Some(pause) = options.pause {
        settings.pause_mode = pause;
    }
    let score_mode = options.mode.unwrap_or(config.score_mode);

    let story = match &options.story {
        Some(title) => {
            let story = trainer
                .catalog()
                .find(title)
                .with_context(|| format!("story not found: {title}"))?;
            trainer
                .progress_mut()
                .mark_done(&story.title, story.difficulty);
            story
        }
        None => {
            let difficulty = options.difficulty.unwrap_or(config.difficulty);
            match trainer.choose_story(difficulty, &mut rand::thread_rng()) {
                Some(story) => story,
                None => {
                    println!(
                        "No unread {difficulty} stories left. Run `flashrecall reset` to start over."
                    );
                    return Ok(());
                }
            }
        }
    };
    trainer.progress().save(&config.progress_path())?;

    let narrator = if options.speech || config.speech {
        CommandNarrator::new(&config.speech_command)
    } else {
        None
    };
    let (scheduler, mut timers) = TokioScheduler::new();
    let mut player = SequencePlayer::new(scheduler, ConsoleListener::new(narrator), settings);
    if config.show_notes && !options.no_notes {
        let notes: Arc<dyn NoteLookup + Send + Sync> = trainer.notes();
        player.set_notes(Some(notes));
    }

    println!(
        "{} ({}, {} sentences)",
        story.title,
        story.difficulty,
        story.sentence_count()
    );
    println!("{HELP}");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;

    player.start(story)?;
    loop {
        if player.state() == PlayerState::Complete {
            break;
        }
        // Nobody is left to press continue.
        if !input_open && player.state() == PlayerState::Paused {
            player.continue_playback()?;
            continue;
        }

        tokio::select! {
            Some(ticket) = timers.recv() => {
                player.on_timer(ticket)?;
            }
            line = lines.next_line(), if input_open => {
                match line? {
                    Some(line) => {
                        if handle_command(&mut player, line.trim())? == Flow::Quit {
                            break;
                        }
                    }
                    None => input_open = false,
                }
            }
            else => break,
        }
    }
    player.listener_mut().break_line();
    if !player.listener().completed() {
        player.listener_mut().silence();
        println!("Playback stopped.");
    }

    recall(&player, &mut lines, input_open, score_mode).await?;
    player.stop();
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn handle_command<S: Scheduler>(
    player: &mut SequencePlayer<S, ConsoleListener>,
    input: &str,
) -> Result<Flow> {
    let (command, argument) = match input.split_once(char::is_whitespace) {
        Some((command, argument)) => (command, argument.trim()),
        None => (input, ""),
    };

    let message = match command {
        "" => return Ok(Flow::Continue),
        "q" | "quit" => return Ok(Flow::Quit),
        "n" | "next" => {
            player.skip_to_next_sentence()?;
            return Ok(Flow::Continue);
        }
        "c" | "continue" => {
            if player.continue_playback()?.is_some() {
                return Ok(Flow::Continue);
            }
            "Not paused.".to_string()
        }
        "p" | "pause" => {
            let next = next_pause_mode(player.settings().pause_mode);
            player.set_pause_mode(next);
            format!("Pause mode: {next}")
        }
        "m" | "mode" => {
            let next = match player.settings().display_mode {
                DisplayMode::FullSentence => DisplayMode::WordByWord,
                DisplayMode::WordByWord => DisplayMode::FullSentence,
            };
            player.set_display_mode(next);
            format!("Display mode: {next}")
        }
        "d" | "delay" => match parse_word_delay(argument) {
            Ok(delay) => {
                player.set_word_delay(delay)?;
                format!("Delay: {}ms", delay.as_millis())
            }
            Err(e) => format!("{e}"),
        },
        other => format!("Unknown command: {other}. {HELP}"),
    };

    player.listener_mut().break_line();
    println!("{message}");
    Ok(Flow::Continue)
}

fn next_pause_mode(mode: PauseMode) -> PauseMode {
    match mode {
        PauseMode::AutoAdvance => PauseMode::PauseAfterEachUnit,
        PauseMode::PauseAfterEachUnit => PauseMode::PauseAfterSentence,
        PauseMode::PauseAfterSentence => PauseMode::AutoAdvance,
    }
}

/// Ask for a full recall, then an optional recall of the last sentences.
async fn recall<S, R>(
    player: &SequencePlayer<S, ConsoleListener>,
    lines: &mut Lines<BufReader<R>>,
    input_open: bool,
    mode: ScoreMode,
) -> Result<()>
where
    S: Scheduler,
    R: AsyncRead + Unpin,
{
    if !input_open {
        println!("No recall attempt given.");
        return Ok(());
    }

    println!();
    println!("Type the story from memory, then press Enter:");
    let Some(attempt) = lines.next_line().await? else {
        println!("No recall attempt given.");
        return Ok(());
    };
    let reference = player.reference_words(RecallScope::Full)?;
    RecallReport::new(mode, &attempt, &reference).print();

    println!();
    println!("Check the last N sentences? Enter N, or leave blank to finish:");
    let Some(answer) = lines.next_line().await? else {
        return Ok(());
    };
    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(());
    }
    let Ok(last_n) = answer.parse::<usize>() else {
        println!("Not a number: {answer}");
        return Ok(());
    };

    println!("Type the last {last_n} sentence(s):");
    let Some(partial) = lines.next_line().await? else {
        return Ok(());
    };
    let reference = player.reference_words(RecallScope::LastSentences(last_n))?;
    RecallReport::new(mode, &partial, &reference).print();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashrecall_core::model::Story;
    use flashrecall_core::player::PlayerSettings;
    use flashrecall_core::scheduler::ManualScheduler;

    fn player() -> SequencePlayer<ManualScheduler, ConsoleListener> {
        let mut player = SequencePlayer::new(
            ManualScheduler::new(),
            ConsoleListener::new(None),
            PlayerSettings::default(),
        );
        let story = Story::new(
            "Test",
            Difficulty::Simple,
            vec!["one two".into(), "three four".into()],
        );
        player.start(Arc::new(story)).unwrap();
        player
    }

    #[test]
    fn pause_mode_cycles() {
        let mut p = player();
        handle_command(&mut p, "p").unwrap();
        assert_eq!(p.settings().pause_mode, PauseMode::PauseAfterEachUnit);
        handle_command(&mut p, "p").unwrap();
        assert_eq!(p.settings().pause_mode, PauseMode::PauseAfterSentence);
        handle_command(&mut p, "p").unwrap();
        assert_eq!(p.settings().pause_mode, PauseMode::AutoAdvance);
    }

    #[test]
    fn display_mode_toggles() {
        let mut p = player();
        handle_command(&mut p, "m").unwrap();
        assert_eq!(p.settings().display_mode, DisplayMode::FullSentence);
    }

    #[test]
    fn delay_command_validates() {
        let mut p = player();
        handle_command(&mut p, "d 250").unwrap();
        assert_eq!(p.settings().word_delay.as_millis(), 250);
        handle_command(&mut p, "d 0").unwrap();
        handle_command(&mut p, "d soon").unwrap();
        assert_eq!(p.settings().word_delay.as_millis(), 250);
    }

    #[test]
    fn quit_and_unknown_commands() {
        let mut p = player();
        assert_eq!(handle_command(&mut p, "q").unwrap(), Flow::Quit);
        assert_eq!(handle_command(&mut p, "xyz").unwrap(), Flow::Continue);
        assert_eq!(handle_command(&mut p, "").unwrap(), Flow::Continue);
    }

    #[test]
    fn skip_command_moves_to_next_sentence() {
        let mut p = player();
        p.step().unwrap();
        handle_command(&mut p, "n").unwrap();
        assert_eq!(p.position(), Some((1, 0)));
    }
}
