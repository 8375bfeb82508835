//! Frame sinks
//!
//! The driver hands every emitted frame to a [`FrameSink`]. A frame is the row-major
//! node values of the current field together with the step index.

use std::io::{self, Write};

/// Receiver of emitted frames.
pub trait FrameSink {
    /// Accept the field after `step` steps.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while storing or writing the frame.
    fn emit(&mut self, step: usize, values: &[f32], n: usize) -> io::Result<()>;

    /// Called once after the last frame.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while flushing.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn emit(&mut self, step: usize, values: &[f32], n: usize) -> io::Result<()> {
        (**self).emit(step, values, n)
    }

    fn finish(&mut self) -> io::Result<()> {
        (**self).finish()
    }
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn emit(&mut self, step: usize, values: &[f32], n: usize) -> io::Result<()> {
        (**self).emit(step, values, n)
    }

    fn finish(&mut self) -> io::Result<()> {
        (**self).finish()
    }
}

/// Writes one line of text per frame.
///
/// format: `[node 0,0],[node 1,0],...;[node 0,1],[node 1,1],...;...;\n`, every value
/// with two decimal places and every row (the last one included) followed by `;`.
pub struct TextFrameWriter<W: Write> {
    out: W,
}

impl<W: Write> TextFrameWriter<W> {
    /// Wrap a writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the wrapped writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSink for TextFrameWriter<W> {
    fn emit(&mut self, _step: usize, values: &[f32], n: usize) -> io::Result<()> {
        write_frame(&mut self.out, values, n)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Write a single frame in the text format.
///
/// # Errors
///
/// Returns any I/O error from `out`.
pub fn write_frame<W: Write + ?Sized>(out: &mut W, values: &[f32], n: usize) -> io::Result<()> {
    if n > 0 {
        for row in values.chunks(n) {
            let mut cells = row.iter();
            if let Some(first) = cells.next() {
                write!(out, "{first:.2}")?;
            }
            for value in cells {
                write!(out, ",{value:.2}")?;
            }
            out.write_all(b";")?;
        }
    }
    out.write_all(b"\n")
}

/// Format a single frame as a `String`, line break included.
pub fn format_frame(values: &[f32], n: usize) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_frame(&mut buf, values, n);
    String::from_utf8_lossy(&buf).into_owned()
}

/// One stored frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Number of steps computed before this frame
    pub step: usize,
    /// Nodes per side
    pub n: usize,
    /// Row-major node values
    pub values: Vec<f32>,
}

/// Keeps every frame in memory.
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    frames: Vec<Frame>,
}

impl FrameRecorder {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames received so far, in emission order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Take ownership of the stored frames.
    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

impl FrameSink for FrameRecorder {
    fn emit(&mut self, step: usize, values: &[f32], n: usize) -> io::Result<()> {
        self.frames.push(Frame {
            step,
            n,
            values: values.to_vec(),
        });
        Ok(())
    }
}
