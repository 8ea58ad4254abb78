//! Keyword value generators.

use super::words::random_word;
use rand::Rng;

/// Separators recognized in examples, in preference order.
const SEPARATORS: [char; 4] = ['.', '-', '_', ' '];

/// Word count and separator inferred from a keyword example.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordShape {
    words: usize,
    separator: Option<char>,
}

impl KeywordShape {
    /// Shape of an example; no example means a single word.
    pub fn from_example(example: Option<&str>) -> Self {
        let Some(example) = example else {
            return Self {
                words: 1,
                separator: None,
            };
        };

        let trimmed = example
            .trim()
            .trim_end_matches(|c: char| c.is_ascii_punctuation());
        let separator = SEPARATORS.into_iter().find(|sep| trimmed.contains(*sep));
        let words = match separator {
            Some(sep) => trimmed.split(sep).filter(|w| !w.is_empty()).count().max(1),
            None => 1,
        };

        Self { words, separator }
    }

    pub fn words(&self) -> usize {
        self.words
    }

    pub fn separator(&self) -> Option<char> {
        self.separator
    }

    /// Generate a lower-case value of this shape.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> String {
        let mut out = String::with_capacity(self.words * 8);
        for i in 0..self.words {
            if i > 0 {
                if let Some(sep) = self.separator {
                    out.push(sep);
                }
            }
            out.push_str(random_word(rng));
        }
        let stripped_len = out
            .trim_end_matches(|c: char| c.is_ascii_punctuation())
            .len();
        out.truncate(stripped_len);
        out.make_ascii_lowercase();
        out
    }
}
