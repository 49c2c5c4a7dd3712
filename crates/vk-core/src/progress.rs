//! Progress tracks for journeys, fights and delves.
//!
//! A progress track is a clamped real value between 0 and 10. Each mark
//! moves it by an amount set by the track's difficulty. A character has at
//! most one running track at a time, held in [`Activity`].

use serde::{Deserialize, Serialize};

use crate::mutate::Direction;

/// Highest value a progress track can reach.
pub const PROGRESS_MAX: f64 = 10.0;

/// The challenge rank of a journey, fight or delve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Three progress per mark.
    Troublesome,
    /// Two progress per mark.
    Dangerous,
    /// One progress per mark.
    Formidable,
    /// Two ticks per mark.
    Extreme,
    /// One tick per mark.
    Epic,
}

impl Difficulty {
    /// All difficulties, easiest first.
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Troublesome,
        Difficulty::Dangerous,
        Difficulty::Formidable,
        Difficulty::Extreme,
        Difficulty::Epic,
    ];

    /// Look up a difficulty by its level (1-5).
    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            1 => Some(Self::Troublesome),
            2 => Some(Self::Dangerous),
            3 => Some(Self::Formidable),
            4 => Some(Self::Extreme),
            5 => Some(Self::Epic),
            _ => None,
        }
    }

    /// The level (1-5) stored on disk.
    pub fn level(self) -> i64 {
        match self {
            Self::Troublesome => 1,
            Self::Dangerous => 2,
            Self::Formidable => 3,
            Self::Extreme => 4,
            Self::Epic => 5,
        }
    }

    /// How far one mark moves the track.
    pub fn progress_per_mark(self) -> f64 {
        match self {
            Self::Troublesome => 3.0,
            Self::Dangerous => 2.0,
            Self::Formidable => 1.0,
            Self::Extreme => 0.5,
            Self::Epic => 0.25,
        }
    }

    /// Whether progress is counted in ticks (fractions of a box).
    pub fn uses_ticks(self) -> bool {
        matches!(self, Self::Extreme | Self::Epic)
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Troublesome => "troublesome",
            Self::Dangerous => "dangerous",
            Self::Formidable => "formidable",
            Self::Extreme => "extreme",
            Self::Epic => "epic",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A progress track with a fixed difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressTrack {
    /// Difficulty rank, fixed when the track starts.
    pub difficulty: Difficulty,
    /// Current progress, 0 to 10.
    pub progress: f64,
}

impl ProgressTrack {
    /// Start an empty track.
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            progress: 0.0,
        }
    }

    /// Create a track with existing progress, clamped to 0-10.
    pub fn with_progress(difficulty: Difficulty, progress: f64) -> Self {
        Self {
            difficulty,
            progress: progress.clamp(0.0, PROGRESS_MAX),
        }
    }

    /// Mark (or unmark) one step of progress. Returns the old and new values.
    pub fn mark(&mut self, direction: Direction) -> (f64, f64) {
        let from = self.progress;
        let step = self.difficulty.progress_per_mark();
        self.progress = match direction {
            Direction::Increase => (from + step).min(PROGRESS_MAX),
            Direction::Decrease => (from - step).max(0.0),
        };
        (from, self.progress)
    }

    /// Returns true once the track is full.
    pub fn is_complete(&self) -> bool {
        self.progress >= PROGRESS_MAX
    }

    /// Progress formatted the way the prompt shows it: whole boxes for
    /// troublesome to formidable, two decimals when ticks are involved.
    pub fn progress_label(&self) -> String {
        if self.difficulty.uses_ticks() {
            format!("{:.2}", self.progress)
        } else {
            format!("{:.0}", self.progress)
        }
    }
}

impl std::fmt::Display for ProgressTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Difficulty: {} Progress: {:.2}/10",
            self.difficulty.level(),
            self.progress
        )
    }
}

/// A fight track, which also tracks who holds initiative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FightTrack {
    /// The progress track against the foe.
    pub track: ProgressTrack,
    /// Whether the character is in control of the fight.
    pub initiative: bool,
}

impl FightTrack {
    /// Start a fight. The character begins without initiative.
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            track: ProgressTrack::new(difficulty),
            initiative: false,
        }
    }
}

/// The three kinds of progress activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityKind {
    /// Travel towards a destination.
    Journey,
    /// Combat against a foe.
    Fight,
    /// Exploration of a perilous site.
    Delve,
}

impl ActivityKind {
    /// Order in which activities win when a stored record claims several.
    pub const PRECEDENCE: [ActivityKind; 3] =
        [ActivityKind::Fight, ActivityKind::Delve, ActivityKind::Journey];

    /// Capitalised name, as shown on the prompt.
    pub fn title(self) -> &'static str {
        match self {
            Self::Journey => "Journey",
            Self::Fight => "Fight",
            Self::Delve => "Delve",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// What the character is currently making progress on.
///
/// Only one activity can run at a time; starting another replaces it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Activity {
    /// Nothing in progress.
    #[default]
    Inactive,
    /// An ongoing journey.
    Journey(ProgressTrack),
    /// An ongoing fight.
    Fight(FightTrack),
    /// An ongoing delve.
    Delve(ProgressTrack),
}

impl Activity {
    /// Start an activity of the given kind with an empty track.
    pub fn start(kind: ActivityKind, difficulty: Difficulty) -> Self {
        match kind {
            ActivityKind::Journey => Self::Journey(ProgressTrack::new(difficulty)),
            ActivityKind::Fight => Self::Fight(FightTrack::new(difficulty)),
            ActivityKind::Delve => Self::Delve(ProgressTrack::new(difficulty)),
        }
    }

    /// The kind of the running activity.
    pub fn kind(&self) -> Option<ActivityKind> {
        match self {
            Self::Inactive => None,
            Self::Journey(_) => Some(ActivityKind::Journey),
            Self::Fight(_) => Some(ActivityKind::Fight),
            Self::Delve(_) => Some(ActivityKind::Delve),
        }
    }

    /// Whether an activity of this kind is running.
    pub fn is(&self, kind: ActivityKind) -> bool {
        self.kind() == Some(kind)
    }

    /// The running progress track.
    pub fn track(&self) -> Option<&ProgressTrack> {
        match self {
            Self::Inactive => None,
            Self::Journey(t) | Self::Delve(t) => Some(t),
            Self::Fight(f) => Some(&f.track),
        }
    }

    /// The running progress track, mutably.
    pub fn track_mut(&mut self) -> Option<&mut ProgressTrack> {
        match self {
            Self::Inactive => None,
            Self::Journey(t) | Self::Delve(t) => Some(t),
            Self::Fight(f) => Some(&mut f.track),
        }
    }

    /// The fight, if one is running.
    pub fn fight(&self) -> Option<&FightTrack> {
        match self {
            Self::Fight(f) => Some(f),
            _ => None,
        }
    }

    /// The fight, mutably.
    pub fn fight_mut(&mut self) -> Option<&mut FightTrack> {
        match self {
            Self::Fight(f) => Some(f),
            _ => None,
        }
    }
}

/// A reported progress mark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressMark {
    /// Which activity moved.
    pub kind: ActivityKind,
    /// Progress before the mark.
    pub from: f64,
    /// Progress after the mark.
    pub to: f64,
    /// The track is full after the mark.
    pub complete: bool,
}

impl std::fmt::Display for ProgressMark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} progress from {:.2} to {:.2}",
            self.kind, self.from, self.to
        )?;
        if self.complete {
            write!(f, " (complete)")?;
        }
        Ok(())
    }
}
