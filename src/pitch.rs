// tone.txt -- turning melodies written as text into raw audio
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Names of pitch classes and their position within an octave.

/// What a pitch name stands for.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Pitch {
    /// A tone, given as the number of semitones above C of the same octave.
    Tone(i32),
    /// A rest. Neither accidentals nor an octave may follow it.
    Silence,
}

/// The result of looking up a pitch name at the start of some input.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PitchMatch {
    pub pitch: Pitch,
    /// Length in bytes of the matched name, relative to the lowercased input.
    pub len: usize,
}

/// Maps pitch names to pitches.
///
/// Names are matched case-insensitively against the start of the input.
/// Longer names are tried before shorter ones (ties in lexicographic order),
/// so that an alias like `do` is never shadowed by a shorter name that happens to be a prefix.
#[derive(Clone, Debug)]
pub struct PitchTable {
    /// Lowercased names, sorted by descending length and then lexicographically.
    entries: Vec<(String, Pitch)>,
}

impl PitchTable {
    /// Build a table from arbitrary names.
    /// Names are lowercased, empty names are ignored, and the first entry wins for duplicates.
    ///
    /// # Examples
    ///
    /// ```
    /// use tone_txt::pitch::*;
    ///
    /// let quarter_tones = PitchTable::new(vec![("c", Pitch::Tone(0)), ("cq", Pitch::Tone(1))]);
    /// assert_eq!(quarter_tones.resolve("Cq4"), Some(PitchMatch { pitch: Pitch::Tone(1), len: 2 }));
    /// assert_eq!(quarter_tones.resolve("c4"), Some(PitchMatch { pitch: Pitch::Tone(0), len: 1 }));
    /// ```
    pub fn new<I, S>(entries: I) -> PitchTable
    where
        I: IntoIterator<Item = (S, Pitch)>,
        S: AsRef<str>,
    {
        let mut table: Vec<(String, Pitch)> = Vec::new();
        for (name, pitch) in entries_lowercased(entries) {
            if !name.is_empty() && table.iter().all(|(existing, _)| *existing != name) {
                table.push((name, pitch));
            }
        }
        table.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        PitchTable { entries: table }
    }

    /// The solfège names `do re mi fa sol la si`, the letters `c d e f g a b`, and `z` for a rest.
    pub fn standard() -> PitchTable {
        PitchTable::new(vec![
            ("do", Pitch::Tone(0)),
            ("re", Pitch::Tone(2)),
            ("mi", Pitch::Tone(4)),
            ("fa", Pitch::Tone(5)),
            ("sol", Pitch::Tone(7)),
            ("la", Pitch::Tone(9)),
            ("si", Pitch::Tone(11)),
            ("c", Pitch::Tone(0)),
            ("d", Pitch::Tone(2)),
            ("e", Pitch::Tone(4)),
            ("f", Pitch::Tone(5)),
            ("g", Pitch::Tone(7)),
            ("a", Pitch::Tone(9)),
            ("b", Pitch::Tone(11)),
            ("z", Pitch::Silence),
        ])
    }

    /// Find the pitch name the input starts with.
    ///
    /// # Examples
    ///
    /// ```
    /// use tone_txt::pitch::*;
    ///
    /// let table = PitchTable::standard();
    /// assert_eq!(table.resolve("SOL4"), Some(PitchMatch { pitch: Pitch::Tone(7), len: 3 }));
    /// assert_eq!(table.resolve("z"), Some(PitchMatch { pitch: Pitch::Silence, len: 1 }));
    /// assert_eq!(table.resolve("x4"), None);
    /// ```
    pub fn resolve(&self, name: &str) -> Option<PitchMatch> {
        self.resolve_lowercase(&name.to_lowercase())
    }

    /// Like `resolve`, but the input must already be lowercase.
    pub(crate) fn resolve_lowercase(&self, name: &str) -> Option<PitchMatch> {
        self.entries
            .iter()
            .find(|(key, _)| name.starts_with(key.as_str()))
            .map(|(key, pitch)| PitchMatch {
                pitch: *pitch,
                len: key.len(),
            })
    }

    /// All names in the order they are tried.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl Default for PitchTable {
    fn default() -> Self {
        PitchTable::standard()
    }
}

fn entries_lowercased<I, S>(entries: I) -> impl Iterator<Item = (String, Pitch)>
where
    I: IntoIterator<Item = (S, Pitch)>,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .map(|(name, pitch)| (name.as_ref().to_lowercase(), pitch))
}
