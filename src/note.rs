// tone.txt -- turning melodies written as text into raw audio
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Definitions of what a note is, and how it is written down.
//!
//! A note token has the form `[duration] pitch [accidentals] octave`, e.g. `1/8c#4`:
//!
//! - the duration is an integer or a fraction and defaults to `1`,
//! - the pitch is a name from a [`PitchTable`](crate::pitch::PitchTable),
//! - accidentals are a run of `b` (flat) or `#` (sharp), one semitone each,
//! - the octave is a possibly negative integer.
//!
//! A rest is written as `[duration] z` and takes neither accidentals nor an octave.

use std::fmt;

use snafu::Snafu;

use crate::pitch::{Pitch, PitchTable};
use crate::rational::Rational;
use crate::synth::tuning::Tuning;
use crate::wave::AudioFormat;

/// A tone of a certain length. A frequency of zero means silence.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParsedNote {
    duration: Rational,
    frequency: f64,
}

impl ParsedNote {
    /// A tone at the given frequency in Hz.
    pub fn tone(duration: Rational, frequency: f64) -> ParsedNote {
        ParsedNote {
            duration,
            frequency,
        }
    }

    /// A silent note.
    pub fn rest(duration: Rational) -> ParsedNote {
        ParsedNote::tone(duration, 0.0)
    }

    /// Length of the note in the time unit of the score.
    pub fn duration(&self) -> Rational {
        self.duration
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn is_silence(&self) -> bool {
        self.frequency == 0.0
    }
}

impl fmt::Display for ParsedNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_silence() {
            write!(f, "{} rest", self.duration)
        } else {
            write!(f, "{} x {:.3} Hz", self.duration, self.frequency)
        }
    }
}

/// Reasons why a token is not a note.
#[derive(Debug, Clone, PartialEq, Snafu)]
pub enum ParseError {
    #[snafu(display("Empty token"))]
    EmptyToken,
    #[snafu(display("Invalid duration {:?}", text))]
    InvalidDuration { text: String },
    #[snafu(display("Missing pitch after the duration"))]
    MissingPitch,
    #[snafu(display("Unknown pitch {:?}", text))]
    UnknownPitch { text: String },
    #[snafu(display("Unexpected {:?} after a rest", text))]
    TrailingGarbage { text: String },
    #[snafu(display("Invalid octave {:?}", text))]
    InvalidOctave { text: String },
    #[snafu(display(
        "Frequency {:.2} Hz is above the Nyquist limit of {} Hz",
        frequency,
        limit
    ))]
    FrequencyExceedsNyquist { frequency: f64, limit: f64 },
    #[snafu(display("{} semitones above C0 is not a representable frequency", semitones))]
    UnrepresentableFrequency { semitones: i64 },
}

/// Parses single note tokens.
#[derive(Clone, Debug)]
pub struct NoteParser {
    table: PitchTable,
    tuning: Tuning,
    max_octave: i32,
    /// Highest frequency accepted, if any.
    nyquist: Option<f64>,
}

impl NoteParser {
    /// Create a parser accepting the names in `table`,
    /// with octave and frequency limits taken from `format`.
    pub fn new(table: PitchTable, format: &AudioFormat) -> NoteParser {
        NoteParser {
            table,
            tuning: Tuning::default(),
            max_octave: format.max_octave(),
            nyquist: Some(format.nyquist()),
        }
    }

    /// Also accept notes that are too high for the sample rate, which will alias.
    pub fn without_nyquist_limit(self) -> NoteParser {
        NoteParser {
            nyquist: None,
            ..self
        }
    }

    pub fn table(&self) -> &PitchTable {
        &self.table
    }

    /// Parse a single token such as `1/8c#4`, `fa3`, `bb-1` or `2z`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tone_txt::note::*;
    /// use tone_txt::rational::Rational;
    ///
    /// let parser = NoteParser::default();
    /// let a = parser.parse("1/4A4").unwrap();
    /// assert_eq!(a.duration(), Rational::new(1, 4));
    /// assert!((a.frequency() - 440.0).abs() < 1e-9);
    /// assert_eq!(parser.parse("4z"), Ok(ParsedNote::rest(Rational::from_int(4))));
    /// assert_eq!(parser.parse("c11"), Err(ParseError::InvalidOctave { text: "11".into() }));
    /// ```
    pub fn parse(&self, token: &str) -> Result<ParsedNote, ParseError> {
        if token.is_empty() {
            return Err(ParseError::EmptyToken);
        }
        let token = token.to_lowercase();

        let (duration, rest) = parse_duration(&token)?;
        if rest.is_empty() {
            return Err(ParseError::MissingPitch);
        }

        let found = self
            .table
            .resolve_lowercase(rest)
            .ok_or_else(|| ParseError::UnknownPitch { text: rest.into() })?;
        let rest = &rest[found.len..];

        let offset = match found.pitch {
            Pitch::Silence if rest.is_empty() => return Ok(ParsedNote::rest(duration)),
            Pitch::Silence => return Err(ParseError::TrailingGarbage { text: rest.into() }),
            Pitch::Tone(offset) => offset,
        };

        let (accidentals, rest) = parse_accidentals(rest);
        let octave = self.parse_octave(rest)?;

        let semitones = offset as i64 + 12 * octave as i64 + accidentals;
        let frequency = self.tuning.frequency(semitones);
        // underflow would turn the tone into a rest, overflow can not be sampled
        if !(frequency > 0.0 && frequency.is_finite()) {
            return Err(ParseError::UnrepresentableFrequency { semitones });
        }
        match self.nyquist {
            Some(limit) if frequency > limit => {
                Err(ParseError::FrequencyExceedsNyquist { frequency, limit })
            }
            _ => Ok(ParsedNote::tone(duration, frequency)),
        }
    }

    /// The octave must make up the rest of the token.
    fn parse_octave(&self, text: &str) -> Result<i32, ParseError> {
        let invalid = || ParseError::InvalidOctave { text: text.into() };
        let digits = text.strip_prefix('-').unwrap_or(text);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let octave: i32 = text.parse().map_err(|_| invalid())?;
        if octave > self.max_octave {
            return Err(invalid());
        }
        Ok(octave)
    }
}

impl Default for NoteParser {
    fn default() -> Self {
        NoteParser::new(PitchTable::standard(), &AudioFormat::default())
    }
}

/// Split off the leading `<int>` or `<int>/<int>`, defaulting to a duration of one.
fn parse_duration(token: &str) -> Result<(Rational, &str), ParseError> {
    let mut len = integer_prefix(token);
    if len == 0 {
        return Ok((Rational::one(), token));
    }
    if token[len..].starts_with('/') {
        let denominator_len = integer_prefix(&token[len + 1..]);
        if denominator_len == 0 {
            return Err(ParseError::InvalidDuration {
                text: token[..len + 1].into(),
            });
        }
        len += 1 + denominator_len;
    }

    let (text, rest) = token.split_at(len);
    match text.parse::<Rational>() {
        Ok(duration) if duration.is_positive() => Ok((duration, rest)),
        _ => Err(ParseError::InvalidDuration { text: text.into() }),
    }
}

/// Length of an optionally negative integer at the start of the text, zero if there is none.
fn integer_prefix(text: &str) -> usize {
    let sign = if text.starts_with('-') { 1 } else { 0 };
    let digits = text[sign..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        0
    } else {
        sign + digits
    }
}

fn accidental(ch: char) -> Option<i64> {
    match ch {
        '#' | '♯' => Some(1),
        'b' | '♭' => Some(-1),
        _ => None,
    }
}

/// Split off a run of either flats or sharps, returning the total offset in semitones.
fn parse_accidentals(text: &str) -> (i64, &str) {
    let sign = match text.chars().next().and_then(accidental) {
        Some(sign) => sign,
        None => return (0, text),
    };
    let mut count = 0;
    let mut len = 0;
    for ch in text.chars().take_while(|&ch| accidental(ch) == Some(sign)) {
        count += 1;
        len += ch.len_utf8();
    }
    (sign * count, &text[len..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::from_semitones;
    use expect_test::{expect, Expect};

    fn check(token: &str, output: Expect) {
        let actual = match NoteParser::default().parse(token) {
            Ok(note) => note.to_string(),
            Err(err) => format!("error: {}", err),
        };
        output.assert_eq(&actual);
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            ((actual - expected) / expected).abs() < 1e-6,
            "{} != {}",
            actual,
            expected
        );
    }

    #[test]
    fn c0_is_the_reference() {
        let note = NoteParser::default().parse("c0").unwrap();
        assert_eq!(note.duration(), Rational::one());
        assert_eq!(note.frequency(), 16.35159783128741466717);
    }

    #[test]
    fn eighth_c_sharp() {
        let note = NoteParser::default().parse("1/8c#4").unwrap();
        assert_eq!(note.duration(), Rational::new(1, 8));
        assert_eq!(note.duration().to_f64(), 0.125);
        assert_close(note.frequency(), 16.35159783128741466717 * from_semitones(49.0));
        assert_close(note.frequency(), 277.182631);
    }

    #[test]
    fn rests() {
        let parser = NoteParser::default();
        assert_eq!(parser.parse("z"), Ok(ParsedNote::rest(Rational::one())));
        assert_eq!(parser.parse("4z"), Ok(ParsedNote::rest(Rational::from_int(4))));
        assert_eq!(parser.parse("3/2Z"), Ok(ParsedNote::rest(Rational::new(3, 2))));
        assert!(parser.parse("z").unwrap().is_silence());
    }

    #[test]
    fn error_kinds() {
        let parser = NoteParser::default();
        assert_eq!(parser.parse(""), Err(ParseError::EmptyToken));
        assert_eq!(
            parser.parse("x4"),
            Err(ParseError::UnknownPitch { text: "x4".into() })
        );
        assert_eq!(
            parser.parse("c11"),
            Err(ParseError::InvalidOctave { text: "11".into() })
        );
        assert_eq!(parser.parse("1/8"), Err(ParseError::MissingPitch));
        assert_eq!(
            parser.parse("z4"),
            Err(ParseError::TrailingGarbage { text: "4".into() })
        );
    }

    #[test]
    fn parsing_is_deterministic() {
        let parser = NoteParser::default();
        for token in &["c4", "1/8c#4", "3sol-2", "bb3", "2z", "q", "1/0c4"] {
            assert_eq!(parser.parse(token), parser.parse(token));
        }
    }

    #[test]
    fn names_are_case_insensitive() {
        let parser = NoteParser::default();
        assert_eq!(parser.parse("C#4"), parser.parse("c#4"));
        assert_eq!(parser.parse("SOL3"), parser.parse("g3"));
        assert_eq!(parser.parse("BB2"), parser.parse("a#2"));
    }

    #[test]
    fn accidentals_shift_by_semitones() {
        let parser = NoteParser::default();
        let f = |token: &str| parser.parse(token).unwrap().frequency();
        assert_close(f("c##4"), f("d4"));
        assert_close(f("ebb4"), f("d4"));
        assert_close(f("b#3"), f("c4"));
        assert_close(f("cb4"), f("b3"));
        assert_close(f("c♯4"), f("c#4"));
        assert_close(f("d♭♭4"), f("c4"));
        assert_close(f("la4"), 440.0);
    }

    #[test]
    fn negative_octaves_are_accepted() {
        let parser = NoteParser::default();
        let f = |token: &str| parser.parse(token).unwrap().frequency();
        assert_close(f("c-1"), f("c0") / 2.0);
        assert_close(f("a-3"), f("a0") / 8.0);
        assert!(f("c-200") > 0.0);
    }

    #[test]
    fn extreme_frequencies_are_rejected() {
        let parser = NoteParser::default().without_nyquist_limit();
        assert_eq!(
            parser.parse("c-100000"),
            Err(ParseError::UnrepresentableFrequency { semitones: -1_200_000 })
        );
        let sharp_run = format!("c{}0", "#".repeat(13000));
        assert_eq!(
            parser.parse(&sharp_run),
            Err(ParseError::UnrepresentableFrequency { semitones: 13000 })
        );
        check(
            "d-1100",
            expect![["error: -13198 semitones above C0 is not a representable frequency"]],
        );
    }

    #[test]
    fn nyquist_limit() {
        let parser = NoteParser::default();
        assert_close(parser.parse("c10").unwrap().frequency(), 16744.036179);
        match parser.parse("b10") {
            Err(ParseError::FrequencyExceedsNyquist { frequency, limit }) => {
                assert_close(frequency, 31608.531280);
                assert_eq!(limit, 22050.0);
            }
            other => panic!("expected Nyquist error, got {:?}", other),
        }
        let permissive = parser.without_nyquist_limit();
        assert!(permissive.parse("b10").is_ok());
        assert!(permissive.parse("b11").is_err());
    }

    #[test]
    fn custom_limits_and_tables() {
        let format = AudioFormat::new(8000, 1.0, 4).unwrap();
        let table = PitchTable::new(vec![("h", Pitch::Tone(11)), ("r", Pitch::Silence)]);
        let parser = NoteParser::new(table, &format);
        assert_eq!(parser.parse("h4"), parser.clone().without_nyquist_limit().parse("h4"));
        assert_eq!(
            parser.parse("h5"),
            Err(ParseError::InvalidOctave { text: "5".into() })
        );
        assert_eq!(
            parser.parse("b4"),
            Err(ParseError::UnknownPitch { text: "b4".into() })
        );
        assert_eq!(parser.parse("2r"), Ok(ParsedNote::rest(Rational::from_int(2))));
    }

    #[test]
    fn durations() {
        check("1/8c#4", expect![["1/8 x 277.183 Hz"]]);
        check("2/16e4", expect![["1/8 x 329.628 Hz"]]);
        check("3g4", expect![["3 x 391.995 Hz"]]);
        check("-1/-2c0", expect![["1/2 x 16.352 Hz"]]);
        check("1/0c4", expect![[r#"error: Invalid duration "1/0""#]]);
        check("0c4", expect![[r#"error: Invalid duration "0""#]]);
        check("-1/2c4", expect![[r#"error: Invalid duration "-1/2""#]]);
        check("1/c4", expect![[r#"error: Invalid duration "1/""#]]);
        check(
            "99999999999999999999c4",
            expect![[r#"error: Invalid duration "99999999999999999999""#]],
        );
    }

    #[test]
    fn malformed_tokens() {
        check("", expect![["error: Empty token"]]);
        check("3/4", expect![["error: Missing pitch after the duration"]]);
        check("h4", expect![[r#"error: Unknown pitch "h4""#]]);
        check("-c4", expect![[r#"error: Unknown pitch "-c4""#]]);
        check("z#", expect![[r##"error: Unexpected "#" after a rest"##]]);
        check("c", expect![[r#"error: Invalid octave """#]]);
        check("c#b4", expect![[r#"error: Invalid octave "b4""#]]);
        check("c4x", expect![[r#"error: Invalid octave "4x""#]]);
        check("c+4", expect![[r#"error: Invalid octave "+4""#]]);
        check("c-", expect![[r#"error: Invalid octave "-""#]]);
        check("c99999999999", expect![[r#"error: Invalid octave "99999999999""#]]);
        check(
            "a#10",
            expect![["error: Frequency 29834.48 Hz is above the Nyquist limit of 22050 Hz"]],
        );
    }
}
