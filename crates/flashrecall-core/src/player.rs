//! Sequence player: timed, stepwise reveal of a story.
//!
//! States: `Idle -> Playing` on [`SequencePlayer::start`]; `Playing ->
//! Paused` when a unit completes under a pausing mode; `Paused -> Playing` on
//! [`SequencePlayer::continue_playback`]; `Playing | Paused -> Complete` when
//! a step finds nothing left to reveal. `Complete` is terminal until the
//! next `start`.
//!
//! All mutation happens synchronously in `step`, the control signals and
//! `on_timer`. At most one timer is outstanding; every control signal that
//! repositions playback invalidates it.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::TrainerError;
use crate::model::{DisplayMode, PauseMode, Story};
use crate::notes::{annotate_word, NoteLookup};
use crate::scheduler::{Scheduler, Ticket};
use crate::scorer::{score, ScoreResult};
use crate::text::clean_word_key;

pub const DEFAULT_WORD_DELAY: Duration = Duration::from_millis(1000);

/// Spoken before the first unit of every sentence.
pub const SENTENCE_PREFIX: &str = "Next sentence. ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    Idle,
    Playing,
    Paused,
    Complete,
}

/// A note attached to one revealed word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// The word as displayed.
    pub word: String,
    pub description: String,
}

/// One revealed unit: a whole sentence, or a single word of one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealEvent {
    pub text: String,
    /// First unit of its sentence.
    pub is_sentence_start: bool,
    /// Last unit of its sentence.
    pub is_sentence_end: bool,
    pub sentence_index: usize,
    /// Word position, `None` when a whole sentence was revealed.
    pub word_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl RevealEvent {
    /// Text with each annotated word rendered as `word (note)`.
    pub fn annotated_text(&self) -> String {
        if self.annotations.is_empty() {
            return self.text.clone();
        }
        self.text
            .split_whitespace()
            .map(|word| {
                match self.annotations.iter().find(|a| a.word == word) {
                    Some(a) => annotate_word(word, &a.description),
                    None => word.to_string(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// What a narrator should say for this unit.
    pub fn narration(&self) -> String {
        if self.is_sentence_start {
            format!("{SENTENCE_PREFIX}{}", self.text)
        } else {
            self.text.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Reveal(RevealEvent),
    StoryComplete,
}

impl StepOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, StepOutcome::StoryComplete)
    }
}

/// Receives playback events for display or narration.
pub trait PlaybackListener {
    fn on_reveal(&mut self, event: &RevealEvent);
    fn on_complete(&mut self);
}

/// Listener that ignores everything.
pub struct NoopListener;

impl PlaybackListener for NoopListener {
    fn on_reveal(&mut self, _: &RevealEvent) {}
    fn on_complete(&mut self) {}
}

/// Playback settings; changes apply from the next step on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerSettings {
    pub word_delay: Duration,
    pub display_mode: DisplayMode,
    pub pause_mode: PauseMode,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            word_delay: DEFAULT_WORD_DELAY,
            display_mode: DisplayMode::default(),
            pause_mode: PauseMode::default(),
        }
    }
}

/// Parse a user-supplied word delay in milliseconds.
pub fn parse_word_delay(input: &str) -> Result<Duration, TrainerError> {
    let ms: i64 = input.trim().parse().map_err(|_| {
        TrainerError::InvalidConfiguration(format!("word delay is not a number: '{}'", input.trim()))
    })?;
    word_delay_from_ms(ms)
}

/// Validate a word delay in milliseconds.
pub fn word_delay_from_ms(ms: i64) -> Result<Duration, TrainerError> {
    if ms <= 0 {
        return Err(TrainerError::InvalidConfiguration(format!(
            "word delay must be positive, got {ms}ms"
        )));
    }
    Ok(Duration::from_millis(ms as u64))
}

/// Position within the active story.
#[derive(Debug, Clone)]
struct PlaybackSession {
    story: Arc<Story>,
    /// Next sentence to reveal from.
    sentence: usize,
    /// Next word within `sentence` (word-by-word mode).
    word: usize,
    /// Sentence shown by the latest reveal, cleared by a skip.
    shown_sentence: Option<usize>,
}

/// Where recall is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecallScope {
    Full,
    /// The last N sentences; N is clamped to `[1, sentence count]`.
    LastSentences(usize),
}

pub struct SequencePlayer<S: Scheduler, L: PlaybackListener> {
    scheduler: S,
    listener: L,
    notes: Option<Arc<dyn NoteLookup + Send + Sync>>,
    settings: PlayerSettings,
    session: Option<PlaybackSession>,
    state: PlayerState,
    next_ticket: u64,
    pending: Option<Ticket>,
}

impl<S: Scheduler, L: PlaybackListener> SequencePlayer<S, L> {
    pub fn new(scheduler: S, listener: L, settings: PlayerSettings) -> Self {
        Self {
            scheduler,
            listener,
            notes: None,
            settings,
            session: None,
            state: PlayerState::Idle,
            next_ticket: 0,
            pending: None,
        }
    }

    /// Attach a notes lookup; revealed words with a note carry an annotation.
    pub fn with_notes(mut self, notes: Arc<dyn NoteLookup + Send + Sync>) -> Self {
        self.notes = Some(notes);
        self
    }

    pub fn set_notes(&mut self, notes: Option<Arc<dyn NoteLookup + Send + Sync>>) {
        self.notes = notes;
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn settings(&self) -> &PlayerSettings {
        &self.settings
    }

    pub fn story(&self) -> Option<&Arc<Story>> {
        self.session.as_ref().map(|s| &s.story)
    }

    /// `(sentence, word)` of the next unit to reveal.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.session.as_ref().map(|s| (s.sentence, s.word))
    }

    pub fn pending_ticket(&self) -> Option<Ticket> {
        self.pending
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Begin playing `story` from its first unit.
    ///
    /// Any previous session is abandoned and its pending timer invalidated
    /// before the new one is set up. The first reveal is delivered through a
    /// zero-delay timer, or by calling [`step`](Self::step) directly.
    pub fn start(&mut self, story: Arc<Story>) -> Result<(), TrainerError> {
        self.invalidate_timer();
        self.session = None;
        self.state = PlayerState::Idle;

        story.validate()?;

        tracing::info!(
            title = %story.title,
            sentences = story.sentence_count(),
            mode = %self.settings.display_mode,
            "starting story"
        );
        self.session = Some(PlaybackSession {
            story,
            sentence: 0,
            word: 0,
            shown_sentence: None,
        });
        self.state = PlayerState::Playing;
        self.arm_timer(Duration::ZERO);
        Ok(())
    }

    /// Abandon the current story.
    pub fn stop(&mut self) {
        self.invalidate_timer();
        self.session = None;
        self.state = PlayerState::Idle;
    }

    /// Reveal exactly one unit, or report that the story is over.
    ///
    /// Calling this while a timer is pending consumes that timer. Once the
    /// story is complete every further call returns `StoryComplete`.
    pub fn step(&mut self) -> Result<StepOutcome, TrainerError> {
        let Some(session) = self.session.as_mut() else {
            return Err(TrainerError::NotStarted);
        };
        if self.state == PlayerState::Complete {
            return Ok(StepOutcome::StoryComplete);
        }
        self.pending = None;
        self.scheduler.cancel();

        let story = Arc::clone(&session.story);
        if session.sentence >= story.sentence_count() {
            self.state = PlayerState::Complete;
            tracing::info!(title = %story.title, "story complete");
            self.listener.on_complete();
            return Ok(StepOutcome::StoryComplete);
        }

        let sentence_index = session.sentence;
        let words = story.words(sentence_index);

        let (text, word_index, is_sentence_start, is_sentence_end) =
            match self.settings.display_mode {
                DisplayMode::FullSentence => {
                    // A sentence already begun in word mode is not restarted.
                    let is_start = session.word == 0;
                    session.sentence += 1;
                    session.word = 0;
                    (words.join(" "), None, is_start, true)
                }
                DisplayMode::WordByWord => {
                    let w = session.word.min(words.len() - 1);
                    let is_end = w + 1 == words.len();
                    if is_end {
                        session.sentence += 1;
                        session.word = 0;
                    } else {
                        session.word = w + 1;
                    }
                    (words[w].to_string(), Some(w), w == 0, is_end)
                }
            };
        session.shown_sentence = Some(sentence_index);

        let annotations = self.annotations_for(&text);
        let event = RevealEvent {
            text,
            is_sentence_start,
            is_sentence_end,
            sentence_index,
            word_index,
            annotations,
        };
        tracing::debug!(
            sentence = sentence_index,
            word = ?word_index,
            text = %event.text,
            "reveal"
        );
        self.listener.on_reveal(&event);

        let pause = match self.settings.pause_mode {
            PauseMode::AutoAdvance => false,
            PauseMode::PauseAfterEachUnit => true,
            PauseMode::PauseAfterSentence => event.is_sentence_end,
        };
        if pause {
            self.state = PlayerState::Paused;
        } else {
            self.state = PlayerState::Playing;
            self.arm_timer(self.settings.word_delay);
        }

        Ok(StepOutcome::Reveal(event))
    }

    /// Resume after a pause. Returns `None` unless the player was paused.
    pub fn continue_playback(&mut self) -> Result<Option<StepOutcome>, TrainerError> {
        if self.session.is_none() {
            return Err(TrainerError::NotStarted);
        }
        if self.state != PlayerState::Paused {
            return Ok(None);
        }
        self.state = PlayerState::Playing;
        self.step().map(Some)
    }

    /// Deliver a fired timer. Stale tickets are ignored.
    pub fn on_timer(&mut self, ticket: Ticket) -> Result<Option<StepOutcome>, TrainerError> {
        if self.pending != Some(ticket) {
            tracing::warn!(ticket = ticket.id(), "ignoring stale timer");
            return Ok(None);
        }
        self.pending = None;
        if self.state != PlayerState::Playing {
            return Ok(None);
        }
        self.step().map(Some)
    }

    /// Abandon the rest of the current sentence and continue from the first
    /// word of the next one. No-op once the story is complete.
    pub fn skip_to_next_sentence(&mut self) -> Result<(), TrainerError> {
        let Some(session) = self.session.as_mut() else {
            return Err(TrainerError::NotStarted);
        };
        if self.state == PlayerState::Complete {
            return Ok(());
        }

        let target = match session.shown_sentence {
            Some(shown) => shown + 1,
            None => session.sentence + 1,
        };
        session.sentence = target;
        session.word = 0;
        session.shown_sentence = None;
        tracing::debug!(sentence = target, "skipping to next sentence");

        self.invalidate_timer();
        self.state = PlayerState::Playing;
        self.arm_timer(Duration::ZERO);
        Ok(())
    }

    /// Change the delay used for the next scheduled step. Invalid delays are
    /// rejected and the previous delay kept.
    pub fn set_word_delay(&mut self, delay: Duration) -> Result<(), TrainerError> {
        if delay.is_zero() {
            tracing::warn!("rejected zero word delay");
            return Err(TrainerError::InvalidConfiguration(
                "word delay must be positive".into(),
            ));
        }
        self.settings.word_delay = delay;
        Ok(())
    }

    pub fn set_word_delay_ms(&mut self, ms: i64) -> Result<(), TrainerError> {
        let delay = word_delay_from_ms(ms).inspect_err(|e| tracing::warn!("{e}"))?;
        self.set_word_delay(delay)
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.settings.display_mode = mode;
    }

    pub fn set_pause_mode(&mut self, mode: PauseMode) {
        self.settings.pause_mode = mode;
    }

    /// Reference words for a recall check, casing and punctuation kept.
    pub fn reference_words(&self, scope: RecallScope) -> Result<Vec<&str>, TrainerError> {
        let story = &self
            .session
            .as_ref()
            .ok_or(TrainerError::NotStarted)?
            .story;
        Ok(match scope {
            RecallScope::Full => story.all_words(),
            RecallScope::LastSentences(n) => story.trailing_words(n),
        })
    }

    /// Score an attempt against the whole story.
    pub fn score_full(&self, attempt: &str) -> Result<ScoreResult, TrainerError> {
        Ok(score(attempt, &self.reference_words(RecallScope::Full)?))
    }

    /// Score an attempt against the last `last_n` sentences.
    pub fn score_partial(&self, attempt: &str, last_n: usize) -> Result<ScoreResult, TrainerError> {
        Ok(score(
            attempt,
            &self.reference_words(RecallScope::LastSentences(last_n))?,
        ))
    }

    fn annotations_for(&self, text: &str) -> Vec<Annotation> {
        let Some(notes) = &self.notes else {
            return Vec::new();
        };
        text.split_whitespace()
            .filter_map(|word| {
                notes
                    .describe(&clean_word_key(word))
                    .map(|description| Annotation {
                        word: word.to_string(),
                        description,
                    })
            })
            .collect()
    }

    fn arm_timer(&mut self, delay: Duration) {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        self.pending = Some(ticket);
        self.scheduler.schedule(delay, ticket);
    }

    fn invalidate_timer(&mut self) {
        if self.pending.take().is_some() {
            self.scheduler.cancel();
        }
    }
}
