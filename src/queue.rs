use std::collections::VecDeque;

use crate::word::Word;

/// FIFO of words still to be practiced.
///
/// The queue grows when words are re-queued, so its length is not the number
/// of words left to learn. Progress is reported against the session's
/// original count instead.
#[derive(Debug, Clone, Default)]
pub struct WordQueue {
    words: VecDeque<Word>,
}

impl WordQueue {
    pub fn new(words: impl IntoIterator<Item = Word>) -> Self {
        Self {
            words: words.into_iter().collect(),
        }
    }

    /// Remove and return the head, or `None` once the queue is exhausted.
    pub fn next(&mut self) -> Option<Word> {
        self.words.pop_front()
    }

    /// Put a failed word back at the tail for a later retry.
    pub fn requeue(&mut self, word: Word) {
        self.words.push_back(word);
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Word> {
        self.words.iter()
    }
}
