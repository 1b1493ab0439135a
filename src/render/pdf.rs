//! HTML to PDF conversion through the `wkhtmltopdf` executable.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use serde::Deserialize;

use super::PdfBackend;
use crate::constants::render::POLL_INTERVAL_MS;
use crate::error::{Error, Result};

/// Page size, orientation and margins handed to the converter.
///
/// Any unset option is left to the converter's default. `page_width` and
/// `page_height` cover non-standard aspect ratios such as 16:9 slides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    /// Named paper size, e.g. `A4`.
    pub page_size: Option<String>,
    /// `Portrait` or `Landscape`.
    pub orientation: Option<String>,
    /// Top margin with unit.
    pub margin_top: Option<String>,
    /// Bottom margin with unit.
    pub margin_bottom: Option<String>,
    /// Left margin with unit.
    pub margin_left: Option<String>,
    /// Right margin with unit.
    pub margin_right: Option<String>,
    /// Explicit page width.
    pub page_width: Option<String>,
    /// Explicit page height.
    pub page_height: Option<String>,
    /// Content zoom factor.
    pub zoom: Option<String>,
    /// Passed through verbatim after the options above.
    pub extra_options: Vec<String>,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4_portrait()
    }
}

impl PageGeometry {
    /// A4 portrait book page.
    pub fn a4_portrait() -> Self {
        Self {
            page_size: Some("A4".to_string()),
            orientation: Some("Portrait".to_string()),
            margin_top: Some("15".to_string()),
            margin_bottom: Some("15".to_string()),
            margin_left: Some("30".to_string()),
            margin_right: Some("20".to_string()),
            page_width: None,
            page_height: None,
            zoom: None,
            extra_options: default_extra_options(),
        }
    }

    /// 1920x1080 projector slide.
    pub fn widescreen() -> Self {
        Self {
            page_size: None,
            orientation: None,
            margin_top: Some("50px".to_string()),
            margin_bottom: Some("50px".to_string()),
            margin_left: Some("50px".to_string()),
            margin_right: Some("50px".to_string()),
            page_width: Some("1920px".to_string()),
            page_height: Some("1080px".to_string()),
            zoom: None,
            extra_options: default_extra_options(),
        }
    }

    /// Command-line options for `wkhtmltopdf`.
    pub fn to_args(&self) -> Vec<String> {
        let options = [
            ("--page-size", &self.page_size),
            ("--orientation", &self.orientation),
            ("--margin-top", &self.margin_top),
            ("--margin-bottom", &self.margin_bottom),
            ("--margin-left", &self.margin_left),
            ("--margin-right", &self.margin_right),
            ("--page-width", &self.page_width),
            ("--page-height", &self.page_height),
            ("--zoom", &self.zoom),
        ];
        let mut args: Vec<String> = options
            .into_iter()
            .filter_map(|(flag, value)| value.as_ref().map(|v| [flag.to_string(), v.clone()]))
            .flatten()
            .collect();
        args.extend(self.extra_options.iter().cloned());
        args
    }
}

fn default_extra_options() -> Vec<String> {
    vec![
        "--encoding".to_string(),
        "UTF-8".to_string(),
        "--enable-local-file-access".to_string(),
    ]
}

/// Runs `wkhtmltopdf` with a bounded wait.
#[derive(Debug, Clone)]
pub struct Wkhtmltopdf {
    binary: PathBuf,
    temp_dir: PathBuf,
    timeout: Duration,
}

impl Wkhtmltopdf {
    /// Create a backend using `binary`, writing intermediate HTML to `temp_dir`.
    pub fn new(binary: impl Into<PathBuf>, temp_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self { binary: binary.into(), temp_dir: temp_dir.into(), timeout }
    }

    fn run(&self, html_path: &Path, log_path: &Path, geometry: &PageGeometry, output: &Path) -> Result<()> {
        let (log, _) = fs_err::File::create(log_path)
            .map_err(|e| Error::io(e, log_path.to_path_buf()))?
            .into_parts();
        let mut child = Command::new(&self.binary)
            .args(geometry.to_args())
            .arg(html_path)
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(log))
            .spawn()
            .map_err(|e| Error::Pdf(format!("cannot start {}: {e}", self.binary.display())))?;

        let status = wait_bounded(&mut child, self.timeout, &self.binary, output)?;

        if status.success() {
            Ok(())
        } else {
            let stderr = fs_err::read_to_string(log_path).unwrap_or_default();
            let tail: Vec<&str> = stderr.lines().rev().take(3).collect();
            Err(Error::Pdf(format!(
                "{} exited with {status}: {}",
                self.binary.display(),
                tail.into_iter().rev().collect::<Vec<_>>().join(" | ")
            )))
        }
    }
}

/// Wait for `child` at most `timeout`. On timeout the process is killed and
/// whatever it wrote to `output` is removed, so a partial page never reaches
/// the merge step.
fn wait_bounded(child: &mut Child, timeout: Duration, binary: &Path, output: &Path) -> Result<ExitStatus> {
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if started.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            if output.exists() {
                let _ = fs_err::remove_file(output);
            }
            return Err(Error::Pdf(format!(
                "{} timed out after {timeout:?} rendering {}",
                binary.display(),
                output.display()
            )));
        }
        std::thread::sleep(Duration::from_millis(POLL_INTERVAL_MS));
    }
}

impl PdfBackend for Wkhtmltopdf {
    fn render_pdf(&self, html: &str, geometry: &PageGeometry, output: &Path) -> Result<()> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(|e| Error::io(e, parent.to_path_buf()))?;
        }
        fs_err::create_dir_all(&self.temp_dir).map_err(|e| Error::io(e, self.temp_dir.clone()))?;

        let stem = format!("songbook_{}", uuid::Uuid::new_v4());
        let html_path = self.temp_dir.join(format!("{stem}.html"));
        let log_path = self.temp_dir.join(format!("{stem}.log"));
        fs_err::write(&html_path, html).map_err(|e| Error::io(e, html_path.clone()))?;

        let result = self.run(&html_path, &log_path, geometry, output);

        let _ = fs_err::remove_file(&html_path);
        let _ = fs_err::remove_file(&log_path);

        if result.is_ok() {
            tracing::info!("Generated PDF: {}", output.display());
        }
        result
    }
}
