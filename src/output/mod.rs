//! Plain-text matrix output.

use crate::error::Result;
use nalgebra::DMatrix;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write `matrix` as tab-delimited text, creating parent directories as needed.
///
/// One line per row, every line newline-terminated, values with five
/// fractional digits. No header and no axis labels are written. Non-finite
/// values appear as `nan`, `inf` and `-inf`. An existing file is overwritten.
pub fn save_matrix<P: AsRef<Path>>(matrix: &DMatrix<f64>, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.is_dir() {
            log::debug!("Creating output directory {:?}", dir);
            fs::create_dir_all(dir)?;
        }
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for row in matrix.row_iter() {
        let line: Vec<String> = row.iter().map(|&v| format_value(v)).collect();
        writeln!(writer, "{}", line.join("\t"))?;
    }
    writer.flush()?;

    log::debug!(
        "Wrote {} x {} matrix to {:?}",
        matrix.nrows(),
        matrix.ncols(),
        path
    );
    Ok(())
}

fn format_value(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v == f64::INFINITY {
        "inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{:.5}", v)
    }
}
