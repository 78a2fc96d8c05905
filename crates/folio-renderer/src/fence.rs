//! Code fence tracking for line-based scanners.
//!
//! The footnote extractor, the tabs preprocessor and the TOC extractor all
//! work on raw lines and must ignore anything inside fenced code. They share
//! this tracker so they agree with the renderer on where fences start and end.

/// Maximum indentation (in spaces) a fence line may carry.
const MAX_FENCE_INDENT: usize = 3;

/// Tracks code fence state during line-by-line processing.
///
/// Code fences in `CommonMark` can use backticks or tildes (three or more).
/// The closing fence must use the same character and be at least as long
/// as the opening fence.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    /// Character used for the current fence (backtick or tilde).
    fence_char: Option<char>,
    /// Length of the opening fence (minimum length for closing).
    fence_len: usize,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Check if currently inside a fenced code block.
    pub(crate) fn in_fence(&self) -> bool {
        self.fence_char.is_some()
    }

    /// Update fence state based on a line.
    ///
    /// Returns `true` if the line is a fence marker (opening or closing).
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let Some(trimmed) = strip_indent(line) else {
            return false;
        };

        if let Some(fence_char) = self.fence_char {
            if is_closing_fence(trimmed, fence_char, self.fence_len) {
                self.fence_char = None;
                self.fence_len = 0;
                return true;
            }
            false
        } else if let Some((ch, len)) = detect_fence(trimmed) {
            self.fence_char = Some(ch);
            self.fence_len = len;
            true
        } else {
            false
        }
    }

    /// Check whether a line is code: either a fence marker or inside a fence.
    ///
    /// Updates the tracker, so call it exactly once per line.
    pub(crate) fn is_code_line(&mut self, line: &str) -> bool {
        self.update(line) || self.in_fence()
    }
}

/// Strip up to three leading spaces; deeper indentation cannot start a fence.
fn strip_indent(line: &str) -> Option<&str> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    (indent <= MAX_FENCE_INDENT).then(|| &line[indent..])
}

/// Detect if a line starts a code fence.
///
/// Returns the fence character and length if found.
fn detect_fence(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }

    let count = trimmed.chars().take_while(|&c| c == first).count();
    if count < 3 {
        return None;
    }

    // Backtick fences cannot carry backticks in their info string
    if first == '`' && trimmed[count..].contains('`') {
        return None;
    }

    Some((first, count))
}

/// Check if a line is a valid closing fence.
fn is_closing_fence(trimmed: &str, expected_char: char, min_len: usize) -> bool {
    if !trimmed.starts_with(expected_char) {
        return false;
    }

    let count = trimmed.chars().take_while(|&c| c == expected_char).count();
    if count < min_len {
        return false;
    }

    trimmed[count..].chars().all(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_fence_initially() {
        let tracker = FenceTracker::new();
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_backtick_fence() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("```rust"));
        assert!(tracker.in_fence());

        assert!(!tracker.update("fn main() {}"));
        assert!(tracker.in_fence());

        assert!(tracker.update("```"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_tilde_fence() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("~~~python"));
        assert!(!tracker.update("```"));
        assert!(tracker.in_fence());
        assert!(tracker.update("~~~"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_longer_closing_fence() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("```"));
        assert!(tracker.update("````"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_shorter_fence_not_closing() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("````"));
        assert!(!tracker.update("```"));
        assert!(tracker.in_fence());
    }

    #[test]
    fn test_closing_fence_with_info_is_content() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("```"));
        assert!(!tracker.update("```rust"));
        assert!(tracker.in_fence());
    }

    #[test]
    fn test_indented_fence() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("   ```"));
        assert!(tracker.update("```"));
        assert!(!tracker.update("    ```"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_inline_backticks_are_not_fences() {
        let mut tracker = FenceTracker::new();

        assert!(!tracker.update("``` inline ``` code"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_is_code_line() {
        let mut tracker = FenceTracker::new();

        assert!(!tracker.is_code_line("# Heading"));
        assert!(tracker.is_code_line("```"));
        assert!(tracker.is_code_line("# comment"));
        assert!(tracker.is_code_line("```"));
        assert!(!tracker.is_code_line("# Heading"));
    }
}
