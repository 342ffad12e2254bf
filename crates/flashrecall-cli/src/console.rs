//! Terminal rendering and speech for playback events.

use std::io::Write;
use std::process::Stdio;

use tokio::process::{Child, Command};

use flashrecall_core::player::{PlaybackListener, RevealEvent};

/// Speaks text through an external program such as `espeak`.
///
/// Each utterance replaces the previous one: a still-running speech process
/// is killed before the next is spawned. Nothing waits for the speech to end.
pub struct CommandNarrator {
    program: String,
    args: Vec<String>,
    current: Option<Child>,
    failed: bool,
}

impl CommandNarrator {
    /// `command` is split on whitespace; the text is passed as the last argument.
    pub fn new(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            current: None,
            failed: false,
        })
    }

    pub fn speak(&mut self, text: &str) {
        if self.failed {
            return;
        }
        self.silence();

        let spawned = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn();
        match spawned {
            Ok(child) => self.current = Some(child),
            Err(e) => {
                tracing::warn!(program = %self.program, "speech disabled: {e}");
                self.failed = true;
            }
        }
    }

    /// Stop the utterance in progress, if any.
    pub fn silence(&mut self) {
        if let Some(mut child) = self.current.take() {
            let _ = child.start_kill();
        }
    }
}

/// Prints reveals to stdout and optionally narrates them.
pub struct ConsoleListener {
    narrator: Option<CommandNarrator>,
    /// A word-by-word line is open and needs a newline before other output.
    mid_line: bool,
    completed: bool,
}

impl ConsoleListener {
    pub fn new(narrator: Option<CommandNarrator>) -> Self {
        Self {
            narrator,
            mid_line: false,
            completed: false,
        }
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    /// End an open word-by-word line before printing something else.
    pub fn break_line(&mut self) {
        if self.mid_line {
            println!();
            self.mid_line = false;
        }
    }

    pub fn silence(&mut self) {
        if let Some(narrator) = self.narrator.as_mut() {
            narrator.silence();
        }
    }
}

impl PlaybackListener for ConsoleListener {
    fn on_reveal(&mut self, event: &RevealEvent) {
        let text = event.annotated_text();
        if event.word_index.is_none() {
            self.break_line();
            println!("{text}");
        } else {
            if event.is_sentence_start {
                self.break_line();
            }
            print!("{text} ");
            self.mid_line = true;
            if event.is_sentence_end {
                self.break_line();
            }
        }
        let _ = std::io::stdout().flush();

        if let Some(narrator) = self.narrator.as_mut() {
            narrator.speak(&event.narration());
        }
    }

    fn on_complete(&mut self) {
        self.break_line();
        self.completed = true;
        println!("--- End of story ---");
    }
}
