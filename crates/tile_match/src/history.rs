use core::fmt::{self, Display, Formatter};

/// The result of one finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScoreEntry {
    pub score: u32,
    pub round: u32,
}

impl Display for ScoreEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} - Round #{}", self.score, self.round)
    }
}

/// Best results of the process lifetime, highest score first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScores {
    entries: Vec<ScoreEntry>,
    capacity: usize,
}

impl HighScores {
    pub const fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn best(&self) -> Option<ScoreEntry> {
        self.entries.first().copied()
    }

    /// Files a result and drops whatever falls past the capacity.
    ///
    /// Equal scores keep their arrival order, so on a tie at the cut-off the
    /// newcomer is the one dropped. Returns whether the entry was kept.
    pub fn record(&mut self, entry: ScoreEntry) -> bool {
        self.entries.push(entry);
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(self.capacity);
        self.entries.contains(&entry)
    }
}
