use rand::seq::SliceRandom;
use rand::Rng;

/// Return a uniformly shuffled copy of `words`, leaving the input untouched.
///
/// Uses the thread-local generator, which is seeded from the OS so every run
/// gets a different order.
pub fn shuffle<T: Clone>(words: &[T]) -> Vec<T> {
    shuffle_with(words, &mut rand::thread_rng())
}

/// Fisher-Yates shuffle of a copy of `words` driven by `rng`.
pub fn shuffle_with<T: Clone, R: Rng + ?Sized>(words: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = words.to_vec();
    shuffled.shuffle(rng);
    shuffled
}
