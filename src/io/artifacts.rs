//! Artifact file naming.
//!
//! Each department gets one CSV and one PNG:
//!
//! - `<csv_dir>/<department>_forecast_data.csv`
//! - `<plot_dir>/<department>_forecast_plot.png`
//!
//! Department names come from the data file and flow into paths, so they are
//! reduced to a single safe path component first.

use std::path::{Path, PathBuf};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::domain::ServerConfig;

/// URL prefix under which `csv_dir` is served.
pub const CSV_ROUTE: &str = "/forecasted_csv";
/// URL prefix under which `plot_dir` is served.
pub const PLOT_ROUTE: &str = "/plots";

/// Output locations for one department.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub csv_file: String,
    pub plot_file: String,
    pub csv_path: PathBuf,
    pub plot_path: PathBuf,
}

impl ArtifactPaths {
    pub fn new(csv_dir: &Path, plot_dir: &Path, department: &str) -> Self {
        let stem = file_stem(department);
        let csv_file = format!("{stem}_forecast_data.csv");
        let plot_file = format!("{stem}_forecast_plot.png");
        Self {
            csv_path: csv_dir.join(&csv_file),
            plot_path: plot_dir.join(&plot_file),
            csv_file,
            plot_file,
        }
    }

    pub fn for_config(config: &ServerConfig, department: &str) -> Self {
        Self::new(&config.csv_dir, &config.plot_dir, department)
    }

    pub fn csv_url(&self, public_url: &str) -> String {
        format!("{public_url}{CSV_ROUTE}/{}", encode_path_segment(&self.csv_file))
    }

    pub fn plot_url(&self, public_url: &str) -> String {
        format!("{public_url}{PLOT_ROUTE}/{}", encode_path_segment(&self.plot_file))
    }
}

/// Reduce a department label to one file-name component.
///
/// Path separators and control characters become `_`, as do leading dots
/// (so `..` cannot escape the output directory). Everything else, spaces
/// included, is kept.
pub fn file_stem(department: &str) -> String {
    let mut out: String = department
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let leading_dots = out.chars().take_while(|&c| c == '.').count();
    if leading_dots > 0 {
        out.replace_range(..leading_dots, &"_".repeat(leading_dots));
    }
    if out.is_empty() {
        out.push('_');
    }
    out
}

/// Everything outside the RFC 3986 unreserved set.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Percent-encode one URL path segment.
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}
