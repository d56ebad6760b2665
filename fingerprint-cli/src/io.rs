//! File bindings for the pipeline's in-memory contracts
//!
//! Raw recordings are headerless little-endian `i16` buffers as written by
//! the rig's capture box; curves and tables go to CSV with the column
//! names the downstream tooling expects. Missing values are empty cells,
//! never `NaN` text and never zero.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use noise_fingerprint::{FingerprintError, FingerprintTable, FrequencyRange};

/// Load one raw recording: headerless little-endian 16-bit PCM.
pub fn load_raw_samples(path: &Path) -> Result<Vec<i16>> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    if bytes.len() % 2 != 0 {
        bail!(
            "{}: odd byte count {}, not 16-bit samples",
            path.display(),
            bytes.len()
        );
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

/// Parse a band catalogue file: one `start_hz,end_hz` pair per line,
/// `#` comments and blank lines ignored.
pub fn read_bands_file(path: &Path) -> Result<Vec<FrequencyRange>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    let mut catalogue = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (start, end) = line
            .split_once(',')
            .with_context(|| format!("{}:{}: expected start_hz,end_hz", path.display(), lineno + 1))?;
        let start: f64 = start.trim().parse().with_context(|| {
            format!("{}:{}: bad start frequency", path.display(), lineno + 1)
        })?;
        let end: f64 = end.trim().parse().with_context(|| {
            format!("{}:{}: bad end frequency", path.display(), lineno + 1)
        })?;
        catalogue.push(FrequencyRange::new(start, end));
    }
    Ok(catalogue)
}

/// Write a `(frequency, value)` curve; NaN values become empty cells.
pub fn write_curve_csv(
    path: &Path,
    value_header: &str,
    frequencies_hz: &[f64],
    values: &[f64],
) -> Result<()> {
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "Frequency (Hz),{}", value_header)?;
    for (f, v) in frequencies_hz.iter().zip(values.iter()) {
        if v.is_nan() {
            writeln!(writer, "{},", f)?;
        } else {
            writeln!(writer, "{},{}", f, v)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Read a curve CSV back into `(frequencies, values)`.
///
/// Column mapping is explicit: the frequency column is the first header
/// containing `Frequency`, the value column the first containing
/// `Power spectrum`, `Motor Noise` or `Value`, the headers the rig's
/// historical exports have used. Empty cells load as NaN.
pub fn read_curve_csv(path: &Path) -> Result<(Vec<f64>, Vec<f64>)> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut lines = text.lines();

    let header = lines.next().unwrap_or("");
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();

    let freq_col = columns
        .iter()
        .position(|c| c.contains("Frequency"))
        .ok_or_else(|| FingerprintError::MissingColumn("Frequency".into()))?;
    let value_col = columns
        .iter()
        .position(|c| {
            c.contains("Power spectrum") || c.contains("Motor Noise") || c.contains("Value")
        })
        .ok_or_else(|| FingerprintError::MissingColumn("Power spectrum".into()))?;

    let mut frequencies = Vec::new();
    let mut values = Vec::new();
    for (lineno, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let freq = fields
            .get(freq_col)
            .filter(|s| !s.is_empty())
            .with_context(|| format!("{}:{}: missing frequency", path.display(), lineno + 2))?;
        frequencies.push(
            freq.parse()
                .with_context(|| format!("{}:{}: bad frequency", path.display(), lineno + 2))?,
        );

        match fields.get(value_col).filter(|s| !s.is_empty()) {
            Some(v) => values.push(
                v.parse()
                    .with_context(|| format!("{}:{}: bad value", path.display(), lineno + 2))?,
            ),
            None => values.push(f64::NAN),
        }
    }
    Ok((frequencies, values))
}

/// Write per-band medians for one recording; `None` becomes an empty cell.
pub fn write_medians_csv(
    path: &Path,
    catalogue: &[FrequencyRange],
    medians: &[Option<f64>],
) -> Result<()> {
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "Frequency range,Median noise (dB)")?;
    for (range, median) in catalogue.iter().zip(medians.iter()) {
        match median {
            Some(v) => writeln!(writer, "{},{}", range, v)?,
            None => writeln!(writer, "{},", range)?,
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write the combined fingerprint table: one row per catalogue range, one
/// column per recording.
pub fn write_table_csv(path: &Path, table: &FingerprintTable) -> Result<()> {
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    write!(writer, "Frequency range")?;
    for recording in &table.recordings {
        write!(writer, ",{}", recording)?;
    }
    writeln!(writer)?;

    for (band, range) in table.catalogue.iter().enumerate() {
        write!(writer, "{}", range)?;
        for recording in 0..table.num_recordings() {
            match table.value(band, recording) {
                Some(v) => write!(writer, ",{}", v)?,
                None => write!(writer, ",")?,
            }
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}
