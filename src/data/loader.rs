use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::header::{
    self, BinaryHeader, TraceHeader, BINARY_HEADER_LEN, BIN_SAMPLES_PER_TRACE,
    BIN_SAMPLE_INTERVAL, SAMPLE_LEN, TEXT_HEADER_LEN, TRACE_HEADER_LEN,
};
use super::ibm::decode_be_samples;
use super::model::{SeismicGrid, Shape};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read a whole SEG-Y file into memory.
pub fn open_segy(path: impl AsRef<Path>) -> Result<SegyReader> {
    SegyReader::open(path)
}

// ---------------------------------------------------------------------------
// SegyReader – in-memory image of a SEG-Y file
// ---------------------------------------------------------------------------

/// A SEG-Y file loaded once at open time.
///
/// Samples are decoded from big-endian IBM floats into a
/// [`SeismicGrid`]; headers are kept as raw bytes so they can be written
/// back untouched.
#[derive(Debug, Clone)]
pub struct SegyReader {
    path: PathBuf,
    traces: SeismicGrid,
    dt: f64,
    text_header: Vec<u8>,
    binary_header: BinaryHeader,
    trace_headers: Vec<TraceHeader>,
}

impl SegyReader {
    /// Open and decode `path`.
    ///
    /// Trace blocks are read sequentially until end of file. A block that
    /// ends early is a [`Error::Truncated`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::file(path, "opening SEG-Y file", e))?;
        let mut reader = BufReader::new(file);

        let mut text_header = vec![0u8; TEXT_HEADER_LEN];
        read_block(&mut reader, &mut text_header, path, "text header")?;

        let mut binary_header = [0u8; BINARY_HEADER_LEN];
        read_block(&mut reader, &mut binary_header, path, "binary header")?;

        let interval_us = header::read_u16(&binary_header, BIN_SAMPLE_INTERVAL);
        let n_samples = usize::from(header::read_u16(&binary_header, BIN_SAMPLES_PER_TRACE));
        if n_samples == 0 {
            return Err(Error::Format {
                path: path.to_path_buf(),
                reason: "binary header declares zero samples per trace".into(),
            });
        }
        let dt = f64::from(interval_us) / 1e6;

        let mut cells: Vec<f32> = Vec::new();
        let mut trace_headers: Vec<TraceHeader> = Vec::new();
        let mut sample_bytes = vec![0u8; n_samples * SAMPLE_LEN];

        loop {
            let index = trace_headers.len();
            let mut trace_header = [0u8; TRACE_HEADER_LEN];
            let got = fill(&mut reader, &mut trace_header)
                .map_err(|e| Error::file(path, "reading trace header", e))?;
            if got == 0 {
                break;
            }
            if got < TRACE_HEADER_LEN {
                return Err(truncated(path, format!("trace {index} header")));
            }
            read_block(
                &mut reader,
                &mut sample_bytes,
                path,
                &format!("trace {index} samples"),
            )?;

            let start = cells.len();
            cells.resize(start + n_samples, 0.0);
            decode_be_samples(&sample_bytes, &mut cells[start..]);
            trace_headers.push(trace_header);
        }

        let shape = Shape::new(trace_headers.len(), n_samples);
        let traces = SeismicGrid::from_vec(shape, cells)?;
        log::info!(
            "Read {} ({shape}, dt = {:.3} ms)",
            path.display(),
            dt * 1000.0
        );

        Ok(SegyReader {
            path: path.to_path_buf(),
            traces,
            dt,
            text_header,
            binary_header,
            trace_headers,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn num_traces(&self) -> usize {
        self.traces.n_traces()
    }

    pub fn num_samples(&self) -> usize {
        self.traces.n_samples()
    }

    /// Sample interval in seconds.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// All traces as one grid.
    pub fn traces(&self) -> &SeismicGrid {
        &self.traces
    }

    pub fn trace(&self, index: usize) -> Result<&[f32]> {
        self.check_index(index)?;
        Ok(self.traces.trace(index))
    }

    pub fn trace_header(&self, index: usize) -> Result<&TraceHeader> {
        self.check_index(index)?;
        Ok(&self.trace_headers[index])
    }

    pub fn trace_headers(&self) -> &[TraceHeader] {
        &self.trace_headers
    }

    pub fn binary_header(&self) -> &BinaryHeader {
        &self.binary_header
    }

    pub fn text_header(&self) -> &[u8] {
        &self.text_header
    }

    /// Give up the headers and keep only the decoded samples.
    pub fn into_traces(self) -> SeismicGrid {
        self.traces
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.num_traces() {
            Ok(())
        } else {
            Err(Error::OutOfRange {
                index,
                len: self.num_traces(),
            })
        }
    }
}

// -- I/O helpers --

/// Read until `buf` is full or the stream ends; returns bytes read.
pub(crate) fn fill(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Fill `buf` completely or fail with a truncation error naming `stage`.
pub(crate) fn read_block(
    reader: &mut impl Read,
    buf: &mut [u8],
    path: &Path,
    stage: &str,
) -> Result<()> {
    let got = fill(reader, buf).map_err(|e| Error::file(path, "reading SEG-Y file", e))?;
    if got < buf.len() {
        return Err(truncated(path, stage.to_string()));
    }
    Ok(())
}

fn truncated(path: &Path, stage: String) -> Error {
    Error::Truncated {
        path: path.to_path_buf(),
        stage,
    }
}
