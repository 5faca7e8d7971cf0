use std::fs::File;
use std::io::{BufReader, BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::{Error, Result};

use super::header::{
    self, BinaryHeader, TraceHeader, BINARY_HEADER_LEN, BIN_FORMAT_CODE, BIN_SAMPLES_PER_TRACE,
    BIN_SAMPLE_INTERVAL, FORMAT_IBM_FLOAT, TEXT_HEADER_LEN, TRACES_OFFSET, TRACE_HEADER_LEN,
    TRC_NUM_SAMPLES, TRC_SAMPLE_INTERVAL, TRC_SEQUENCE_FILE, TRC_SEQUENCE_LINE,
};
use super::ibm::encode_be_samples;
use super::loader::read_block;
use super::model::SeismicGrid;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Write `data` to `target`, reusing every header of `reference`.
pub fn write_segy(
    target: impl AsRef<Path>,
    reference: impl AsRef<Path>,
    data: &SeismicGrid,
    sample_interval: f64,
) -> Result<()> {
    SegyWriter::new(target, reference)?.write_file(data, sample_interval)
}

// ---------------------------------------------------------------------------
// SegyTemplate – the header set a writer emits
// ---------------------------------------------------------------------------

/// Text, binary and trace headers donated to new files.
#[derive(Debug, Clone)]
pub struct SegyTemplate {
    pub text_header: Vec<u8>,
    pub binary_header: BinaryHeader,
    pub trace_headers: Vec<TraceHeader>,
}

impl SegyTemplate {
    /// Ingest the headers of an existing SEG-Y file.
    ///
    /// The trace count is derived from the file size and the reference's
    /// own samples-per-trace field; sample data is skipped.
    pub fn from_reference(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::file(path, "opening reference SEG-Y file", e))?;
        let file_len = file
            .metadata()
            .map_err(|e| Error::file(path, "inspecting reference SEG-Y file", e))?
            .len();
        let mut reader = BufReader::new(file);

        let mut text_header = vec![0u8; TEXT_HEADER_LEN];
        read_block(&mut reader, &mut text_header, path, "text header")?;

        let mut binary_header = [0u8; BINARY_HEADER_LEN];
        read_block(&mut reader, &mut binary_header, path, "binary header")?;

        let n_samples = usize::from(header::read_u16(&binary_header, BIN_SAMPLES_PER_TRACE));
        if n_samples == 0 {
            return Err(Error::Format {
                path: path.to_path_buf(),
                reason: "number of samples per trace is zero".into(),
            });
        }

        let block_len = header::trace_block_len(n_samples) as u64;
        let n_traces = (file_len.saturating_sub(TRACES_OFFSET) / block_len) as usize;
        let skip = (block_len - TRACE_HEADER_LEN as u64) as i64;

        let mut trace_headers = Vec::with_capacity(n_traces);
        for i in 0..n_traces {
            let mut trace_header = [0u8; TRACE_HEADER_LEN];
            read_block(&mut reader, &mut trace_header, path, &format!("trace {i} header"))?;
            reader
                .seek_relative(skip)
                .map_err(|e| Error::file(path, "seeking reference SEG-Y file", e))?;
            trace_headers.push(trace_header);
        }

        log::debug!(
            "Reference {}: {n_traces} trace headers, {n_samples} samples per trace",
            path.display()
        );

        Ok(SegyTemplate {
            text_header,
            binary_header,
            trace_headers,
        })
    }

    /// A blank header set for data that has no donor file.
    ///
    /// Declares IBM float samples and numbers the traces from 1.
    pub fn synthetic(n_traces: usize, n_samples: usize, sample_interval: f64) -> Result<Self> {
        let n_samples = to_u16(n_samples, "samples per trace")?;
        let interval_us = interval_to_us(sample_interval)?;

        let lines = [
            "C 1 SYNTHETIC SEISMIC SECTION".to_string(),
            format!("C 2 TRACES {n_traces}  SAMPLES {n_samples}  INTERVAL {interval_us} US"),
            "C 3 SAMPLE FORMAT IBM FLOAT".to_string(),
            "C40 END TEXTUAL HEADER".to_string(),
        ];
        let text_header = header::text_header_from_lines(&lines);

        let mut binary_header = [0u8; BINARY_HEADER_LEN];
        header::write_u16(&mut binary_header, BIN_SAMPLE_INTERVAL, interval_us);
        header::write_u16(&mut binary_header, BIN_SAMPLES_PER_TRACE, n_samples);
        header::write_u16(&mut binary_header, BIN_FORMAT_CODE, FORMAT_IBM_FLOAT);

        let trace_headers = (0..n_traces)
            .map(|i| {
                let seq = u32::try_from(i + 1).unwrap_or(u32::MAX);
                let mut h = [0u8; TRACE_HEADER_LEN];
                header::write_u32(&mut h, TRC_SEQUENCE_LINE, seq);
                header::write_u32(&mut h, TRC_SEQUENCE_FILE, seq);
                header::write_u16(&mut h, TRC_NUM_SAMPLES, n_samples);
                header::write_u16(&mut h, TRC_SAMPLE_INTERVAL, interval_us);
                h
            })
            .collect();

        Ok(SegyTemplate {
            text_header,
            binary_header,
            trace_headers,
        })
    }
}

// ---------------------------------------------------------------------------
// SegyWriter
// ---------------------------------------------------------------------------

/// Writes trace grids as SEG-Y, borrowing headers from a template.
#[derive(Debug, Clone)]
pub struct SegyWriter {
    target: PathBuf,
    template: SegyTemplate,
}

impl SegyWriter {
    /// Prepare to write `target` with the headers of `reference`.
    pub fn new(target: impl AsRef<Path>, reference: impl AsRef<Path>) -> Result<Self> {
        Ok(SegyWriter {
            target: target.as_ref().to_path_buf(),
            template: SegyTemplate::from_reference(reference)?,
        })
    }

    pub fn with_template(target: impl AsRef<Path>, template: SegyTemplate) -> Self {
        SegyWriter {
            target: target.as_ref().to_path_buf(),
            template,
        }
    }

    /// Write `data` using the template's trace headers.
    pub fn write_file(&self, data: &SeismicGrid, sample_interval: f64) -> Result<()> {
        self.write_file_with_headers(data, sample_interval, &self.template.trace_headers)
    }

    /// Write `data` with caller-supplied trace headers, one per trace and
    /// exactly [`TRACE_HEADER_LEN`] bytes each.
    ///
    /// Everything is validated before the target is created.
    pub fn write_file_with_headers<H: AsRef<[u8]> + Sync>(
        &self,
        data: &SeismicGrid,
        sample_interval: f64,
        trace_headers: &[H],
    ) -> Result<()> {
        if data.is_empty() {
            return Err(Error::Input("data is empty".into()));
        }
        if trace_headers.len() != data.n_traces() {
            return Err(Error::Input(format!(
                "{} trace headers for {} traces",
                trace_headers.len(),
                data.n_traces()
            )));
        }
        if let Some((i, h)) = trace_headers
            .iter()
            .enumerate()
            .find(|(_, h)| h.as_ref().len() != TRACE_HEADER_LEN)
        {
            return Err(Error::Input(format!(
                "trace header {i} is {} bytes, expected {TRACE_HEADER_LEN}",
                h.as_ref().len()
            )));
        }

        let n_samples = to_u16(data.n_samples(), "samples per trace")?;
        let interval_us = interval_to_us(sample_interval)?;

        let mut binary_header = self.template.binary_header;
        header::write_u16(&mut binary_header, BIN_SAMPLE_INTERVAL, interval_us);
        header::write_u16(&mut binary_header, BIN_SAMPLES_PER_TRACE, n_samples);

        // Encode trace blocks in parallel, write them in order.
        let blocks: Vec<Vec<u8>> = trace_headers
            .par_iter()
            .zip(data.as_slice().par_chunks(data.n_samples()))
            .map(|(h, samples)| {
                let mut block = Vec::with_capacity(header::trace_block_len(samples.len()));
                block.extend_from_slice(h.as_ref());
                encode_be_samples(samples, &mut block);
                block
            })
            .collect();

        let path = self.target.as_path();
        let file =
            File::create(path).map_err(|e| Error::file(path, "creating SEG-Y file", e))?;
        let mut out = BufWriter::new(file);

        out.write_all(&self.template.text_header)
            .map_err(|e| Error::file(path, "writing text header", e))?;
        out.write_all(&binary_header)
            .map_err(|e| Error::file(path, "writing binary header", e))?;
        for block in &blocks {
            out.write_all(block)
                .map_err(|e| Error::file(path, "writing trace block", e))?;
        }
        out.flush()
            .map_err(|e| Error::file(path, "flushing SEG-Y file", e))?;

        let written = out
            .stream_position()
            .map_err(|e| Error::file(path, "checking SEG-Y file length", e))?;
        log::info!(
            "Wrote {} ({} traces × {n_samples} samples, {written} bytes)",
            path.display(),
            data.n_traces()
        );
        Ok(())
    }
}

fn to_u16(value: usize, what: &str) -> Result<u16> {
    u16::try_from(value)
        .map_err(|_| Error::Input(format!("{what} ({value}) does not fit a 16-bit field")))
}

/// Seconds → whole microseconds for the 16-bit interval field.
fn interval_to_us(seconds: f64) -> Result<u16> {
    let us = (seconds * 1e6).round();
    if !us.is_finite() || us < 0.0 || us > f64::from(u16::MAX) {
        return Err(Error::Input(format!(
            "sample interval {seconds} s does not fit a 16-bit microsecond field"
        )));
    }
    Ok(us as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_rounds_to_microseconds() {
        assert_eq!(interval_to_us(0.002).unwrap(), 2000);
        assert_eq!(interval_to_us(0.000_999_9).unwrap(), 1000);
        assert!(interval_to_us(0.1).is_err());
        assert!(interval_to_us(-0.001).is_err());
    }

    #[test]
    fn synthetic_template_fills_standard_fields() {
        let t = SegyTemplate::synthetic(3, 250, 0.004).unwrap();
        assert_eq!(t.text_header.len(), TEXT_HEADER_LEN);
        assert_eq!(header::read_u16(&t.binary_header, BIN_SAMPLE_INTERVAL), 4000);
        assert_eq!(header::read_u16(&t.binary_header, BIN_SAMPLES_PER_TRACE), 250);
        assert_eq!(header::read_u16(&t.binary_header, BIN_FORMAT_CODE), FORMAT_IBM_FLOAT);
        assert_eq!(t.trace_headers.len(), 3);
        assert_eq!(header::read_u32(&t.trace_headers[2], TRC_SEQUENCE_LINE), 3);
        assert_eq!(header::read_u16(&t.trace_headers[0], TRC_NUM_SAMPLES), 250);
    }

    #[test]
    fn validation_happens_before_the_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.sgy");
        let writer = SegyWriter::with_template(&target, SegyTemplate::synthetic(2, 4, 0.002).unwrap());

        let grid = SeismicGrid::filled(crate::data::model::Shape::new(3, 4), 1.0);
        let err = writer.write_file(&grid, 0.002).unwrap_err();
        assert!(matches!(err, Error::Input(_)));

        let short = vec![vec![0u8; 100]; 3];
        let err = writer.write_file_with_headers(&grid, 0.002, &short).unwrap_err();
        assert!(matches!(err, Error::Input(_)));
        assert!(!target.exists());
    }
}
