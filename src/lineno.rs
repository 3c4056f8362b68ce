//! Output line numbering.

use std::fmt;

/// Hands out `N` sequence numbers, starting at 0.
#[derive(Debug, Default)]
pub struct LineNumberer {
    next: u32,
}

impl LineNumberer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the next number.
    pub fn advance(&mut self) -> u32 {
        let number = self.next;
        self.next += 1;
        number
    }

    /// Number of lines handed out so far
    pub fn count(&self) -> u32 {
        self.next
    }
}

/// A numbered line of the output program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub number: u32,
    pub text: String,
}

impl fmt::Display for OutputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{:06} {}", self.number, self.text)
    }
}
