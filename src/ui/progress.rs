//! Progress indicators for long-running operations
//!
//! Uses `linya` for allocation-free progress bars. The only long-running
//! local operation is digesting the source archive, which can be hundreds
//! of megabytes for large trees.

use linya::{Bar, Progress};

/// Progress bar over the bytes of a file being hashed
pub struct HashProgress {
  progress: Progress,
  bar: Bar,
}

impl HashProgress {
  /// Create a new progress bar for hashing `total` bytes
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self { progress, bar }
  }

  /// Advance by a number of bytes read
  pub fn advance(&mut self, bytes: usize) {
    self.progress.inc_and_draw(&self.bar, bytes);
  }
}
