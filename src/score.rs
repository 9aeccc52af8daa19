//! Reading melodies from text, one line at a time.
//!
//! Tokens are separated by whitespace, and bar lines `|` count as whitespace.
//! Tokens that are not notes are reported and skipped.

use std::io;

use log::{debug, trace, warn};

use crate::note::{NoteParser, ParsedNote};

/// Split a line into note tokens.
///
/// # Examples
///
/// ```
/// use tone_txt::score::tokens;
///
/// let line = "c4 e4| g4 |1/2c5\t z";
/// assert_eq!(tokens(line).collect::<Vec<_>>(), vec!["c4", "e4", "g4", "1/2c5", "z"]);
/// ```
pub fn tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(|ch: char| ch == '|' || ch.is_whitespace())
        .filter(|token| !token.is_empty())
}

/// The notes of one line, in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedLine {
    pub notes: Vec<ParsedNote>,
    /// Number of tokens that were not notes.
    pub skipped: usize,
}

/// Parse all tokens of a line, skipping those that are not notes.
/// `line_no` is only used for reporting.
pub fn parse_line(parser: &NoteParser, line_no: usize, line: &str) -> ParsedLine {
    let mut parsed = ParsedLine::default();
    for token in tokens(line) {
        match parser.parse(token) {
            Ok(note) => {
                trace!("line {}: {:?} is {}", line_no, token, note);
                parsed.notes.push(note);
            }
            Err(err) => {
                warn!("line {}: skipping {:?}: {}", line_no, token, err);
                parsed.skipped += 1;
            }
        }
    }
    debug!(
        "line {}: {} notes, {} skipped",
        line_no,
        parsed.notes.len(),
        parsed.skipped
    );
    parsed
}

/// Iterator over the parsed lines of a reader.
///
/// Bytes that are not valid UTF-8 are replaced by U+FFFD, so they only spoil the token they are in.
pub struct Score<'a, R> {
    parser: &'a NoteParser,
    input: R,
    buffer: Vec<u8>,
    line_no: usize,
}

impl<'a, R: io::BufRead> Score<'a, R> {
    pub fn new(parser: &'a NoteParser, input: R) -> Self {
        Score {
            parser,
            input,
            buffer: Vec::new(),
            line_no: 0,
        }
    }
}

impl<'a, R: io::BufRead> Iterator for Score<'a, R> {
    type Item = io::Result<ParsedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.clear();
        match self.input.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                self.line_no += 1;
                let line = String::from_utf8_lossy(&self.buffer);
                Some(Ok(parse_line(self.parser, self.line_no, &line)))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascending_triad() {
        let parsed = parse_line(&NoteParser::default(), 1, "c4 e4 g4");
        assert_eq!(parsed.skipped, 0);
        let notes = parsed.notes;
        assert_eq!(notes.len(), 3);
        assert!(notes.iter().all(|n| n.duration() == notes[0].duration()));
        assert!(notes[0].frequency() < notes[1].frequency());
        assert!(notes[1].frequency() < notes[2].frequency());
    }

    #[test]
    fn skips_bad_tokens() {
        let parsed = parse_line(&NoteParser::default(), 7, "c4 x4 |  | 1/0d4 e4 z3 c11");
        assert_eq!(parsed.skipped, 4);
        assert_eq!(parsed.notes.len(), 2);
    }

    #[test]
    fn blank_lines() {
        assert_eq!(parse_line(&NoteParser::default(), 1, "  | \t"), ParsedLine::default());
    }

    #[test]
    fn reads_line_by_line() {
        let parser = NoteParser::default();
        let input = "c4 d4\n\n| e4 f4 | g4 |\nbogus\n";
        let lines: Vec<_> = Score::new(&parser, input.as_bytes())
            .map(|line| line.unwrap())
            .collect();
        assert_eq!(lines.len(), 4);
        let counts: Vec<_> = lines.iter().map(|l| (l.notes.len(), l.skipped)).collect();
        assert_eq!(counts, vec![(2, 0), (0, 0), (3, 0), (0, 1)]);
    }

    #[test]
    fn invalid_utf8_only_spoils_its_token() {
        let parser = NoteParser::default();
        let input: &[u8] = b"c4 e4\r\n1/2\xe94 g4\nc5";
        let lines: Vec<_> = Score::new(&parser, input)
            .map(|line| line.unwrap())
            .collect();
        let counts: Vec<_> = lines.iter().map(|l| (l.notes.len(), l.skipped)).collect();
        assert_eq!(counts, vec![(2, 0), (1, 1), (1, 0)]);
    }
}
