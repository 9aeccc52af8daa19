// tone.txt -- turning melodies written as text into raw audio
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! `tonec` - the tone compiler, turning melodies written as text into raw PCM audio.
//!
//! The output is headerless signed 16 bit little endian stereo,
//! e.g. for playing with `play -t raw -e signed -b 16 -c 2 -r 44100 -`.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use log::info;
use structopt::StructOpt;

use tone_txt::note::NoteParser;
use tone_txt::pitch::PitchTable;
use tone_txt::render::{self, RenderSummary};
use tone_txt::score::Score;
use tone_txt::synth::ToneSynthesizer;
use tone_txt::wave::AudioFormat;

#[derive(Debug, StructOpt)]
#[structopt(name = "tonec", about = "Compiling melodies into raw audio")]
struct Opt {
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: usize,

    /// The melody. Read from stdin if not given.
    #[structopt(parse(from_os_str))]
    source: Option<PathBuf>,

    /// Output file for the raw samples. Written to stdout if not given.
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Samples per second.
    #[structopt(short, long, default_value = "44100")]
    rate: u32,

    /// Loudness between 0 and 1.
    #[structopt(long, default_value = "0.5")]
    volume: f64,

    /// Notes above this octave are skipped.
    #[structopt(long, default_value = "10")]
    max_octave: i32,

    /// Keep notes above the Nyquist frequency instead of skipping them.
    #[structopt(long)]
    allow_aliasing: bool,

    /// Dump the parsed notes before rendering them, to stderr or to `--dump-notes=<path>`.
    #[structopt(long, require_equals = true)]
    #[allow(clippy::option_option)]
    dump_notes: Option<Option<PathBuf>>,
}

fn main() -> io::Result<()> {
    let opt = Opt::from_args();

    let level = match opt.verbose {
        0 => log::Level::Info,
        1 => log::Level::Debug,
        _ => log::Level::Trace,
    };
    simple_logger::init_with_level(level)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let format = AudioFormat::new(opt.rate, opt.volume, opt.max_octave)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let mut parser = NoteParser::new(PitchTable::standard(), &format);
    if opt.allow_aliasing {
        parser = parser.without_nyquist_limit();
    }
    let synth = ToneSynthesizer::from_format(&format);
    info!(
        "rendering at {} Hz, {} bit stereo, volume {}",
        format.sample_rate(),
        AudioFormat::BIT_DEPTH,
        format.volume()
    );

    check_targets(&opt)?;
    let input: Box<dyn BufRead> = match &opt.source {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let output: Box<dyn Write> = match &opt.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };

    // stdout might already carry the samples
    let dump_out = opt
        .dump_notes
        .map(|path| path.unwrap_or_else(|| "/dev/stderr".into()));
    match dump_out {
        None => {
            render::render(&parser, &synth, input, output).map_err(to_io_error)?;
        }
        Some(dump_out_path) => {
            let mut summary = RenderSummary::default();
            let mut notes = Vec::new();
            for line in Score::new(&parser, input) {
                let line = line?;
                summary.skipped += line.skipped;
                notes.extend(line.notes);
            }
            summary.notes = notes.len();

            let mut f = File::create(dump_out_path)?;
            for note in &notes {
                writeln!(f, "{:?}", note)?;
            }

            summary.frames = render::render_notes(&synth, notes, output).map_err(to_io_error)?;
            summary.report(format.sample_rate());
        }
    }
    Ok(())
}

fn to_io_error(err: render::RenderError) -> io::Error {
    match err {
        render::RenderError::ReadScore { source } | render::RenderError::WriteSamples { source } => source,
        other => io::Error::new(io::ErrorKind::InvalidData, other),
    }
}

/// Refuse to truncate the melody by writing samples or the dump over it.
fn check_targets(opt: &Opt) -> io::Result<()> {
    let source = match &opt.source {
        Some(source) => source,
        None => return Ok(()),
    };
    let dump = opt.dump_notes.as_ref().and_then(Option::as_ref);
    for target in opt.output.iter().chain(dump) {
        if target == source {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("refusing to overwrite the melody {}", source.display()),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> Opt {
        Opt::from_iter_safe(args).unwrap()
    }

    #[test]
    fn dump_notes_keeps_the_source() {
        let opt = parse_args(&["tonec", "--dump-notes", "song.txt"]);
        assert_eq!(opt.source, Some(PathBuf::from("song.txt")));
        assert_eq!(opt.dump_notes, Some(None));
    }

    #[test]
    fn dump_notes_with_path() {
        let opt = parse_args(&["tonec", "--dump-notes=notes.txt", "song.txt"]);
        assert_eq!(opt.source, Some(PathBuf::from("song.txt")));
        assert_eq!(opt.dump_notes, Some(Some(PathBuf::from("notes.txt"))));

        let opt = parse_args(&["tonec", "song.txt"]);
        assert_eq!(opt.dump_notes, None);
    }

    #[test]
    fn never_overwrites_the_melody() {
        let opt = parse_args(&["tonec", "--dump-notes=song.txt", "song.txt"]);
        assert_eq!(check_targets(&opt).unwrap_err().kind(), io::ErrorKind::InvalidInput);

        let opt = parse_args(&["tonec", "-o", "song.txt", "song.txt"]);
        assert!(check_targets(&opt).is_err());

        let opt = parse_args(&["tonec", "-o", "song.raw", "--dump-notes=notes.txt", "song.txt"]);
        assert!(check_targets(&opt).is_ok());
    }
}
