use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::{CharStream, CharStreamError};

// === Basic reading ===

#[test]
fn next_returns_characters_in_order() {
    let mut s = CharStream::from_slice(b"abc");
    assert_eq!(s.next().ok(), Some('a'));
    assert_eq!(s.next().ok(), Some('b'));
    assert_eq!(s.next().ok(), Some('c'));
    assert!(matches!(s.next(), Err(CharStreamError::EndOfInput)));
}

#[test]
fn empty_input_is_end_of_input_immediately() {
    let mut s = CharStream::from_slice(b"");
    assert_eq!(s.is_end_of_input().ok(), Some(true));
    assert!(matches!(s.next(), Err(CharStreamError::EndOfInput)));
}

#[test]
fn end_of_input_requires_consuming_buffered_bytes() {
    let mut s = CharStream::from_slice(b"x");
    assert_eq!(s.is_end_of_input().ok(), Some(false));
    assert_eq!(s.next().ok(), Some('x'));
    assert_eq!(s.is_end_of_input().ok(), Some(true));
}

// === Non-ASCII rejection ===

#[test]
fn high_bit_byte_is_rejected_at_read_time() {
    let mut s = CharStream::from_slice(&[b'a', 0xC3, b'b']);
    assert_eq!(s.next().ok(), Some('a'));
    assert!(matches!(
        s.next(),
        Err(CharStreamError::NonAscii { byte: 0xC3 })
    ));
    // The offending byte is not consumed: reading again fails the same way.
    assert!(matches!(s.next(), Err(CharStreamError::NonAscii { .. })));
}

// === Mark / rewind / advance ===

#[test]
fn rewind_returns_to_mark_without_rereading() {
    let mut s = CharStream::from_slice(b"abcd");
    assert_eq!(s.next().ok(), Some('a'));
    assert_eq!(s.next().ok(), Some('b'));
    s.rewind_to_mark();
    assert_eq!(s.next().ok(), Some('a'));
}

#[test]
fn advance_commits_and_moves_the_mark() {
    let mut s = CharStream::from_slice(b"abcd");
    let _ = s.next();
    let _ = s.next();
    let _ = s.next();
    s.rewind_to_mark();
    // Re-read past the mark, then commit only two characters.
    let _ = s.next();
    let _ = s.next();
    s.advance(2);
    assert_eq!(s.next().ok(), Some('c'));
}

#[test]
fn buffered_exposes_uncommitted_bytes() {
    let mut s = CharStream::from_slice(b"while(");
    for _ in 0..5 {
        let _ = s.next();
    }
    assert_eq!(s.buffered(), b"while");
    s.advance(5);
    assert_eq!(s.buffered(), b"");
}

// === Line/column bookkeeping ===

#[test]
fn columns_advance_within_a_line() {
    let mut s = CharStream::from_slice(b"abc");
    assert_eq!((s.line(), s.col()), (1, 1));
    let _ = s.next();
    s.advance(1);
    assert_eq!((s.line(), s.col()), (1, 2));
}

#[test]
fn newline_resets_column_and_increments_line() {
    let mut s = CharStream::from_slice(b"a\nbc");
    for _ in 0..3 {
        let _ = s.next();
    }
    s.advance(3);
    assert_eq!((s.line(), s.col()), (2, 2));
}

#[test]
fn multi_line_commit_counts_every_newline() {
    // A block comment spanning three lines, committed in one advance.
    let text = b"/* a\nb\nc */x";
    let mut s = CharStream::from_slice(text);
    for _ in 0..text.len() - 1 {
        let _ = s.next();
    }
    s.advance(text.len() - 1);
    assert_eq!((s.line(), s.col()), (3, 5));
}

// === Buffer growth ===

#[test]
fn tokens_longer_than_the_buffer_are_preserved_across_growth() {
    let long = "x".repeat(100);
    let mut s = CharStream::with_capacity(long.as_bytes(), 8);
    for _ in 0..100 {
        assert_eq!(s.next().ok(), Some('x'));
    }
    s.rewind_to_mark();
    assert_eq!(s.next().ok(), Some('x'));
    s.advance(100);
    assert_eq!(s.is_end_of_input().ok(), Some(true));
    assert_eq!((s.line(), s.col()), (1, 101));
}

#[test]
fn compaction_keeps_the_window_when_mark_is_deep() {
    let mut s = CharStream::with_capacity(b"aaaabbbbcccc".as_slice(), 8);
    // Commit past the midpoint of the buffer, then read a window that
    // straddles a refill.
    for _ in 0..6 {
        let _ = s.next();
    }
    s.advance(6);
    for _ in 0..4 {
        let _ = s.next();
    }
    s.rewind_to_mark();
    assert_eq!(s.next().ok(), Some('b'));
    assert_eq!(s.next().ok(), Some('b'));
    assert_eq!(s.next().ok(), Some('c'));
}

// === Properties ===

proptest! {
    /// Reading with arbitrary rewind/commit splits yields the same character
    /// sequence and final (line, column) as the obvious reference scan.
    #[test]
    fn split_commits_match_reference(
        text in "[ -~\n]{0,200}",
        splits in proptest::collection::vec(1usize..8, 0..64),
    ) {
        let mut s = CharStream::with_capacity(text.as_bytes(), 4);
        let mut consumed = Vec::new();
        let mut splits = splits.into_iter();
        'outer: loop {
            let want = splits.next().unwrap_or(3);
            // Read ahead (possibly short at end of input), rewind, re-read,
            // then commit exactly what we saw.
            let mut chunk = Vec::new();
            for _ in 0..want {
                match s.next() {
                    Ok(c) => chunk.push(c as u8),
                    Err(CharStreamError::EndOfInput) => break,
                    Err(e) => prop_assert!(false, "unexpected error: {e}"),
                }
            }
            s.rewind_to_mark();
            for _ in 0..chunk.len() {
                let _ = s.next();
            }
            s.advance(chunk.len());
            consumed.extend_from_slice(&chunk);
            if chunk.is_empty() {
                break 'outer;
            }
        }
        prop_assert_eq!(&consumed, text.as_bytes());

        let expected_line = 1 + text.bytes().filter(|&b| b == b'\n').count() as u32;
        let expected_col = match text.rfind('\n') {
            Some(i) => (text.len() - i) as u32,
            None => 1 + text.len() as u32,
        };
        prop_assert_eq!((s.line(), s.col()), (expected_line, expected_col));
    }
}
