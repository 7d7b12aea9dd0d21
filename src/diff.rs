/// Placeholder shown where one string has run out of characters.
pub const BLANK: char = ' ';

/// Per-position verdict of a [`DiffRow`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    Match,
    Mismatch,
}

impl Marker {
    /// Character used on the marker line.
    pub fn symbol(self) -> char {
        match self {
            Marker::Match => ' ',
            Marker::Mismatch => '^',
        }
    }
}

/// Position-aligned comparison of what was typed against the correct word.
///
/// All three lines always have the same number of positions: the longer of
/// the two inputs, counted in code points.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiffRow {
    pub user: Vec<char>,
    pub correct: Vec<char>,
    pub markers: Vec<Marker>,
}

impl DiffRow {
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn mismatch_count(&self) -> usize {
        self.markers
            .iter()
            .filter(|m| **m == Marker::Mismatch)
            .count()
    }

    pub fn mismatch_positions(&self) -> Vec<usize> {
        self.markers
            .iter()
            .enumerate()
            .filter(|(_, m)| **m == Marker::Mismatch)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn user_line(&self) -> String {
        self.user.iter().collect()
    }

    pub fn correct_line(&self) -> String {
        self.correct.iter().collect()
    }

    pub fn marker_line(&self) -> String {
        self.markers.iter().map(|m| m.symbol()).collect()
    }
}

/// Compare `input` with `correct` position by position.
///
/// Case-sensitive regardless of the pass/fail policy, so "haus" vs "Haus"
/// always shows the capital as a mismatch. A position only matches when
/// both strings have a character there and the characters are identical;
/// padding never matches padding.
pub fn compare(input: &str, correct: &str) -> DiffRow {
    let user: Vec<char> = input.chars().collect();
    let expected: Vec<char> = correct.chars().collect();
    let max_len = user.len().max(expected.len());

    let mut row = DiffRow {
        user: Vec::with_capacity(max_len),
        correct: Vec::with_capacity(max_len),
        markers: Vec::with_capacity(max_len),
    };

    for idx in 0..max_len {
        let typed = user.get(idx).copied();
        let wanted = expected.get(idx).copied();

        let marker = match (typed, wanted) {
            (Some(a), Some(b)) if a == b => Marker::Match,
            _ => Marker::Mismatch,
        };

        row.user.push(typed.unwrap_or(BLANK));
        row.correct.push(wanted.unwrap_or(BLANK));
        row.markers.push(marker);
    }

    row
}
