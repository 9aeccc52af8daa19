//! The glue responsible for turning a melody written as text into a PCM stream.

use std::io;

use log::info;
use snafu::{ResultExt, Snafu};

use crate::note::{NoteParser, ParsedNote};
use crate::output::PcmWriter;
use crate::score::Score;
use crate::synth::{SynthError, ToneSynthesizer};

#[derive(Debug, Snafu)]
pub enum RenderError {
    #[snafu(display("Could not read the melody: {}", source))]
    ReadScore { source: io::Error },
    #[snafu(display("Could not write samples: {}", source))]
    WriteSamples { source: io::Error },
    #[snafu(display("Could not synthesize the melody: {}", source))]
    Synthesize { source: SynthError },
}

/// What was rendered.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RenderSummary {
    /// Number of notes played, including rests.
    pub notes: usize,
    /// Number of tokens that were not notes.
    pub skipped: usize,
    /// Number of stereo samples written.
    pub frames: u64,
}

impl RenderSummary {
    pub fn seconds(&self, sample_rate: u32) -> f64 {
        self.frames as f64 / sample_rate as f64
    }

    /// Log the summary the same way for every way of rendering.
    pub fn report(&self, sample_rate: u32) {
        info!(
            "rendered {} notes ({} tokens skipped)",
            self.notes, self.skipped
        );
        info!(
            "total length {} samples ({:.2} seconds)",
            self.frames,
            self.seconds(sample_rate)
        );
    }
}

/// Parse the melody line by line and write the samples of each line as soon as it is parsed.
pub fn render<R, W>(
    parser: &NoteParser,
    synth: &ToneSynthesizer,
    input: R,
    output: W,
) -> Result<RenderSummary, RenderError>
where
    R: io::BufRead,
    W: io::Write,
{
    let mut summary = RenderSummary::default();
    let mut writer = PcmWriter::new(output);
    for line in Score::new(parser, input) {
        let line = line.context(ReadScore)?;
        summary.notes += line.notes.len();
        summary.skipped += line.skipped;
        write_notes(synth, line.notes, &mut writer)?;
    }
    summary.frames = writer.frames();
    writer.finish().context(WriteSamples)?;
    summary.report(synth.sample_rate());
    Ok(summary)
}

/// Write the samples of already parsed notes, returning the number of frames written.
pub fn render_notes<I, W>(
    synth: &ToneSynthesizer,
    notes: I,
    output: W,
) -> Result<u64, RenderError>
where
    I: IntoIterator<Item = ParsedNote>,
    W: io::Write,
{
    let mut writer = PcmWriter::new(output);
    write_notes(synth, notes, &mut writer)?;
    let frames = writer.frames();
    writer.finish().context(WriteSamples)?;
    Ok(frames)
}

fn write_notes<I, W>(
    synth: &ToneSynthesizer,
    notes: I,
    writer: &mut PcmWriter<W>,
) -> Result<(), RenderError>
where
    I: IntoIterator<Item = ParsedNote>,
    W: io::Write,
{
    for frame in synth.synthesize(notes) {
        writer
            .write_frame(frame.context(Synthesize)?)
            .context(WriteSamples)?;
    }
    Ok(())
}
