//! PDF rendering through external engines.
//!
//! Engines are tried in order: PowerPoint automation (Windows only), then
//! LibreOffice. A run where every engine fails yields
//! [`Visual::Unavailable`]; conversion problems never abort the caller.

use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Default bound on a single engine invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Outcome of a conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visual {
    /// A rendered PDF
    Pdf(PathBuf),
    /// No rendering; the reason is shown to the user
    Unavailable(String),
}

impl Visual {
    /// Path of the rendered PDF, if any.
    pub fn pdf(&self) -> Option<&Path> {
        match self {
            Visual::Pdf(path) => Some(path),
            Visual::Unavailable(_) => None,
        }
    }

    /// True when a PDF exists.
    pub fn is_available(&self) -> bool {
        matches!(self, Visual::Pdf(_))
    }
}

impl fmt::Display for Visual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visual::Pdf(path) => write!(f, "{}", path.display()),
            Visual::Unavailable(reason) => write!(f, "unavailable ({})", reason),
        }
    }
}

/// A program that renders a presentation to PDF.
pub trait ConversionEngine {
    /// Short name for logs and messages.
    fn name(&self) -> &str;

    /// Render `document` into `out_dir` and return the PDF path.
    fn convert(&self, document: &Path, out_dir: &Path, timeout: Duration) -> Result<PathBuf>;
}

/// Run a command, killing it if it outlives `timeout`.
fn run_with_timeout(mut command: Command, timeout: Duration) -> Result<std::process::ExitStatus> {
    let program = command.get_program().to_string_lossy().into_owned();
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| Error::Conversion(format!("failed to start {}: {}", program, e)))?;

    match child.wait_timeout(timeout)? {
        Some(status) => Ok(status),
        None => {
            let _ = child.kill();
            let _ = child.wait();
            Err(Error::Conversion(format!(
                "{} timed out after {}s",
                program,
                timeout.as_secs()
            )))
        }
    }
}

/// Where an engine writes the rendering of `document`: `<out_dir>/<file stem>.pdf`.
///
/// Only the final extension is replaced, so `q3.final.pptx` renders to
/// `q3.final.pdf` as LibreOffice names it.
pub fn rendered_pdf_path(document: &Path, out_dir: &Path) -> Result<PathBuf> {
    let stem = document
        .file_stem()
        .ok_or_else(|| Error::Conversion(format!("{} has no file name", document.display())))?;
    let mut name = stem.to_os_string();
    name.push(".pdf");
    Ok(out_dir.join(name))
}

/// LibreOffice in headless mode.
#[derive(Debug, Clone)]
pub struct LibreOffice {
    command: PathBuf,
}

impl LibreOffice {
    /// Use a specific `soffice` executable.
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn candidates() -> Vec<&'static str> {
        let mut candidates = vec!["soffice", "libreoffice"];
        if cfg!(target_os = "macos") {
            candidates.push("/Applications/LibreOffice.app/Contents/MacOS/soffice");
        } else if cfg!(windows) {
            candidates.push(r"C:\Program Files\LibreOffice\program\soffice.exe");
        }
        candidates
    }

    /// Find a working LibreOffice executable by running `--version`.
    pub fn detect() -> Option<Self> {
        Self::candidates().into_iter().find_map(|cmd| {
            let mut probe = Command::new(cmd);
            probe.arg("--version");
            match run_with_timeout(probe, Duration::from_secs(30)) {
                Ok(status) if status.success() => Some(Self::new(cmd)),
                _ => None,
            }
        })
    }
}

impl ConversionEngine for LibreOffice {
    fn name(&self) -> &str {
        "libreoffice"
    }

    fn convert(&self, document: &Path, out_dir: &Path, timeout: Duration) -> Result<PathBuf> {
        let pdf = rendered_pdf_path(document, out_dir)?;

        let mut command = Command::new(&self.command);
        command
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg(document)
            .arg("--outdir")
            .arg(out_dir);

        let status = run_with_timeout(command, timeout)?;
        if !status.success() {
            return Err(Error::Conversion(format!("soffice exited with {}", status)));
        }
        if !pdf.exists() {
            return Err(Error::Conversion(format!(
                "soffice produced no output at {}",
                pdf.display()
            )));
        }
        Ok(pdf)
    }
}

/// Installed PowerPoint driven through COM from PowerShell.
#[derive(Debug, Clone, Default)]
pub struct PowerPointAutomation;

/// Exit code the export script uses for a presentation without slides.
const NO_SLIDES_EXIT: i32 = 3;

impl PowerPointAutomation {
    /// Available only on Windows with PowerPoint registered.
    pub fn detect() -> Option<Self> {
        if !cfg!(windows) {
            return None;
        }
        let mut probe = Command::new("powershell");
        probe.args([
            "-NoProfile",
            "-NonInteractive",
            "-Command",
            "if ([type]::GetTypeFromProgID('PowerPoint.Application')) { exit 0 } else { exit 1 }",
        ]);
        match run_with_timeout(probe, Duration::from_secs(30)) {
            Ok(status) if status.success() => Some(Self),
            _ => None,
        }
    }

    fn script(document: &Path, pdf: &Path) -> String {
        let quote = |p: &Path| format!("'{}'", p.display().to_string().replace('\'', "''"));
        format!(
            "$ErrorActionPreference = 'Stop'\n\
             $app = New-Object -ComObject PowerPoint.Application\n\
             $pres = $app.Presentations.Open({}, $true, $false, $false)\n\
             try {{\n\
             \x20 if ($pres.Slides.Count -eq 0) {{ exit {} }}\n\
             \x20 $pres.SaveAs({}, 32)\n\
             }} finally {{ $pres.Close() }}",
            quote(document),
            NO_SLIDES_EXIT,
            quote(pdf)
        )
    }
}

impl ConversionEngine for PowerPointAutomation {
    fn name(&self) -> &str {
        "powerpoint"
    }

    fn convert(&self, document: &Path, out_dir: &Path, timeout: Duration) -> Result<PathBuf> {
        let pdf = rendered_pdf_path(document, out_dir)?;

        let mut command = Command::new("powershell");
        command.args(["-NoProfile", "-NonInteractive", "-Command"]);
        command.arg(Self::script(document, &pdf));

        let status = run_with_timeout(command, timeout)?;
        match status.code() {
            Some(0) if pdf.exists() => Ok(pdf),
            Some(NO_SLIDES_EXIT) => Err(Error::Conversion(
                "presentation has no slides; PowerPoint cannot export it".to_string(),
            )),
            _ => Err(Error::Conversion(format!("PowerPoint export failed ({})", status))),
        }
    }
}

/// Renders presentations through the first engine that succeeds.
pub struct Converter {
    engines: Vec<Box<dyn ConversionEngine>>,
    timeout: Duration,
}

impl Converter {
    /// Detect installed engines once.
    pub fn detect(timeout: Duration) -> Self {
        let mut engines: Vec<Box<dyn ConversionEngine>> = Vec::new();
        if let Some(engine) = PowerPointAutomation::detect() {
            engines.push(Box::new(engine));
        }
        if let Some(engine) = LibreOffice::detect() {
            engines.push(Box::new(engine));
        }

        let converter = Self::with_engines(engines, timeout);
        if converter.engines.is_empty() {
            tracing::warn!("no conversion engine found; visual inspection disabled");
        } else {
            tracing::info!(engines = ?converter.engine_names(), "conversion engines detected");
        }
        converter
    }

    /// Use an explicit engine list, in priority order.
    pub fn with_engines(engines: Vec<Box<dyn ConversionEngine>>, timeout: Duration) -> Self {
        Self { engines, timeout }
    }

    /// Names of the configured engines.
    pub fn engine_names(&self) -> Vec<&str> {
        self.engines.iter().map(|e| e.name()).collect()
    }

    /// True when at least one engine is configured.
    pub fn has_engine(&self) -> bool {
        !self.engines.is_empty()
    }

    /// Render `document` to `<out_dir>/<stem>.pdf`.
    pub fn convert_to_pdf(&self, document: &Path, out_dir: &Path) -> Visual {
        if self.engines.is_empty() {
            return Visual::Unavailable("no conversion engine found".to_string());
        }

        if let Err(e) = std::fs::create_dir_all(out_dir) {
            return Visual::Unavailable(format!("cannot create {}: {}", out_dir.display(), e));
        }
        let document = std::path::absolute(document).unwrap_or_else(|_| document.to_path_buf());
        let out_dir = std::path::absolute(out_dir).unwrap_or_else(|_| out_dir.to_path_buf());

        // A stale rendering must not pass for a fresh one.
        if let Ok(stale) = rendered_pdf_path(&document, &out_dir) {
            let _ = std::fs::remove_file(stale);
        }

        let mut failures = Vec::new();
        for engine in &self.engines {
            match engine.convert(&document, &out_dir, self.timeout) {
                Ok(pdf) => {
                    tracing::debug!(engine = engine.name(), pdf = %pdf.display(), "converted");
                    return Visual::Pdf(pdf);
                }
                Err(e) => {
                    tracing::warn!(engine = engine.name(), error = %e, "conversion failed");
                    failures.push(format!("{}: {}", engine.name(), e));
                }
            }
        }
        Visual::Unavailable(failures.join("; "))
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("engines", &self.engine_names())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Failing;

    impl ConversionEngine for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn convert(&self, _: &Path, _: &Path, _: Duration) -> Result<PathBuf> {
            Err(Error::Conversion("boom".into()))
        }
    }

    struct Writing {
        calls: Cell<usize>,
    }

    impl ConversionEngine for Writing {
        fn name(&self) -> &str {
            "writing"
        }

        fn convert(&self, document: &Path, out_dir: &Path, _: Duration) -> Result<PathBuf> {
            self.calls.set(self.calls.get() + 1);
            let pdf = rendered_pdf_path(document, out_dir)?;
            std::fs::write(&pdf, b"%PDF-1.4")?;
            Ok(pdf)
        }
    }

    #[test]
    fn test_no_engines_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let converter = Converter::with_engines(Vec::new(), DEFAULT_TIMEOUT);
        let visual = converter.convert_to_pdf(&dir.path().join("a.pptx"), dir.path());
        assert!(matches!(visual, Visual::Unavailable(_)));
        assert!(!converter.has_engine());
    }

    #[test]
    fn test_falls_through_to_next_engine() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("visuals");
        let converter = Converter::with_engines(
            vec![Box::new(Failing), Box::new(Writing { calls: Cell::new(0) })],
            DEFAULT_TIMEOUT,
        );

        let visual = converter.convert_to_pdf(&dir.path().join("deck.pptx"), &out);
        let pdf = visual.pdf().unwrap();
        assert!(pdf.ends_with("deck.pdf"));
        assert!(pdf.exists());
        assert_eq!(converter.engine_names(), ["failing", "writing"]);
    }

    #[test]
    fn test_all_failures_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let converter = Converter::with_engines(vec![Box::new(Failing)], DEFAULT_TIMEOUT);
        match converter.convert_to_pdf(&dir.path().join("deck.pptx"), dir.path()) {
            Visual::Unavailable(reason) => assert!(reason.contains("failing: Conversion failed: boom")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let engine = LibreOffice::new("definitely-not-an-installed-soffice");
        let dir = tempfile::tempdir().unwrap();
        let result = engine.convert(&dir.path().join("x.pptx"), dir.path(), Duration::from_secs(5));
        assert!(matches!(result, Err(Error::Conversion(_))));
    }

    #[test]
    fn test_rendered_pdf_keeps_inner_dots() {
        let out = Path::new("/tmp/visuals");
        assert_eq!(
            rendered_pdf_path(Path::new("/work/q3.final.pptx"), out).unwrap(),
            out.join("q3.final.pdf")
        );
        assert_eq!(
            rendered_pdf_path(Path::new("deck.pptx"), out).unwrap(),
            out.join("deck.pdf")
        );
    }

    #[cfg(unix)]
    fn fake_soffice(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("fake-soffice");
        std::fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[cfg(unix)]
    #[test]
    fn test_libreoffice_output_for_dotted_names() {
        let dir = tempfile::tempdir().unwrap();
        // Mimics soffice: writes <outdir>/<name without last extension>.pdf
        let script = fake_soffice(
            dir.path(),
            r#"base=$(basename "$4"); printf '%%PDF-1.4' > "$6/${base%.*}.pdf""#,
        );
        let out = dir.path().join("visuals");
        let converter = Converter::with_engines(vec![Box::new(LibreOffice::new(script))], DEFAULT_TIMEOUT);

        let visual = converter.convert_to_pdf(&dir.path().join("q3.final.pptx"), &out);
        let pdf = visual.pdf().expect("rendering");
        assert!(pdf.ends_with("q3.final.pdf"));
        assert!(pdf.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_hung_engine_is_killed() {
        let dir = tempfile::tempdir().unwrap();
        let script = fake_soffice(dir.path(), "sleep 30");
        let engine = LibreOffice::new(script);

        let err = engine
            .convert(&dir.path().join("slow.pptx"), dir.path(), Duration::from_secs(1))
            .unwrap_err();
        assert!(err.to_string().contains("timed out"), "{}", err);
    }

    #[test]
    fn test_powerpoint_script_quotes_paths() {
        let script = PowerPointAutomation::script(Path::new(r"C:\it's\a.pptx"), Path::new(r"C:\out\a.pdf"));
        assert!(script.contains(r"'C:\it''s\a.pptx'"));
        assert!(script.contains("SaveAs('C:\\out\\a.pdf', 32)"));
        assert!(script.contains("exit 3"));
    }
}
