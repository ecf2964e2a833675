//! Digest sequencing.
//!
//! DigestSeq orders passes within and across digest calls so diagnostics
//! can say when a watcher fired.

use std::fmt;

/// Position of a pass: which digest call, and which pass inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DigestSeq {
    /// Digest call number, starting at 1
    pub digest: u64,
    /// Pass within the digest, starting at 1
    pub pass: u32,
}

impl DigestSeq {
    pub fn new(digest: u64, pass: u32) -> Self {
        Self { digest, pass }
    }
}

impl fmt::Display for DigestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "digest {} pass {}", self.digest, self.pass)
    }
}

/// Counter for generating DigestSeq values
#[derive(Debug, Default)]
pub struct DigestCounter {
    current_digest: u64,
    current_pass: u32,
}

impl DigestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new digest call
    pub fn next_digest(&mut self) {
        self.current_digest += 1;
        self.current_pass = 0;
    }

    /// Start the next pass of the current digest
    pub fn next_pass(&mut self) -> DigestSeq {
        self.current_pass += 1;
        self.current()
    }

    pub fn current_digest(&self) -> u64 {
        self.current_digest
    }

    pub fn current(&self) -> DigestSeq {
        DigestSeq::new(self.current_digest, self.current_pass)
    }
}
