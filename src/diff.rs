use itertools::{EitherOrBoth, Itertools};

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
    Pending,
}

/// One rendered position of the current sentence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharMark {
    pub char: char,
    pub outcome: Outcome,
}

impl CharMark {
    fn new(char: char, outcome: Outcome) -> Self {
        Self { char, outcome }
    }
}

/// Position-by-position comparison of `typed` against `reference` for highlighting.
///
/// Typed characters are shown where they exist (correct or not); untyped reference
/// characters are pending. Overtyping past the reference is always incorrect.
pub fn mark_chars(reference: &str, typed: &str) -> Vec<CharMark> {
    reference
        .chars()
        .zip_longest(typed.chars())
        .map(|pair| match pair {
            EitherOrBoth::Both(expected, actual) if expected == actual => {
                CharMark::new(actual, Outcome::Correct)
            }
            EitherOrBoth::Both(_, actual) | EitherOrBoth::Right(actual) => {
                CharMark::new(actual, Outcome::Incorrect)
            }
            EitherOrBoth::Left(expected) => CharMark::new(expected, Outcome::Pending),
        })
        .collect()
}
