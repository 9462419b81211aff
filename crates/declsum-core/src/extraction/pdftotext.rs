use crate::error::DeclsumError;
use crate::extraction::layout::{split_pages, tables_from_layout};
use crate::extraction::{PageTables, TableExtractor};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(25);
const DEFAULT_PROGRAM: &str = "pdftotext";

/// PDF table extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -layout` so that table columns stay aligned, then
/// rebuilds rows and cells from the whitespace layout.
pub struct PdftotextExtractor {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor {
            program: PathBuf::from(DEFAULT_PROGRAM),
            timeout: None,
        }
    }

    /// Run `program` instead of the `pdftotext` found on `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Kill pdftotext and fail the document if it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new(DEFAULT_PROGRAM)
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TableExtractor for PdftotextExtractor {
    fn extract_tables(&self, pdf_bytes: &[u8]) -> Result<Vec<PageTables>, DeclsumError> {
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| DeclsumError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| DeclsumError::Extraction(e.to_string()))?;

        let stdout = run_pdftotext(&self.program, tmpfile.path(), self.timeout)?;
        let text = String::from_utf8_lossy(&stdout);

        let pages = split_pages(&text)
            .into_iter()
            .enumerate()
            .map(|(i, page_text)| PageTables {
                page_number: i + 1,
                tables: tables_from_layout(page_text),
            })
            .collect::<Vec<_>>();

        tracing::debug!(pages = pages.len(), "pdftotext extraction finished");
        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

fn run_pdftotext(
    program: &Path,
    pdf_path: &Path,
    timeout: Option<Duration>,
) -> Result<Vec<u8>, DeclsumError> {
    let mut child = Command::new(program)
        .args(["-layout", "-enc", "UTF-8"])
        .arg(pdf_path)
        .arg("-") // output to stdout
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DeclsumError::PdftotextNotFound
            } else {
                DeclsumError::Extraction(format!("pdftotext failed: {}", e))
            }
        })?;

    // Drain both pipes on their own threads so a full pipe cannot stall the child.
    let stdout_reader = drain(child.stdout.take())?;
    let stderr_reader = drain(child.stderr.take())?;

    let status = match timeout {
        Some(limit) => wait_with_deadline(&mut child, limit)?,
        None => child.wait()?,
    };

    let stdout = join_reader(stdout_reader)?;
    if !status.success() {
        let code = status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&join_reader(stderr_reader)?).to_string();
        return Err(DeclsumError::PdftotextFailed { code, stderr });
    }

    Ok(stdout)
}

type Reader = thread::JoinHandle<std::io::Result<Vec<u8>>>;

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Result<Reader, DeclsumError> {
    let mut pipe =
        pipe.ok_or_else(|| DeclsumError::Extraction("pdftotext pipe was not captured".into()))?;
    Ok(thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    }))
}

fn join_reader(reader: Reader) -> Result<Vec<u8>, DeclsumError> {
    let bytes = reader
        .join()
        .map_err(|_| DeclsumError::Extraction("pdftotext output reader panicked".into()))??;
    Ok(bytes)
}

fn wait_with_deadline(child: &mut Child, limit: Duration) -> Result<ExitStatus, DeclsumError> {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            // The process may have exited between try_wait and kill.
            let _ = child.kill();
            let _ = child.wait();
            return Err(DeclsumError::ExtractionTimeout {
                secs: limit.as_secs(),
            });
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::model::Cell;
    use std::os::unix::fs::PermissionsExt;

    fn script(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("fake-pdftotext");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn splits_program_output_into_pages_and_tables() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(&dir, r"printf 'a  b\n\nc\fd  e\n'");
        let extractor = PdftotextExtractor::new().with_program(program);

        let pages = extractor.extract_tables(b"%PDF").unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].tables.len(), 2);
        assert_eq!(pages[1].page_number, 2);
        assert_eq!(pages[1].tables[0].rows[0], vec![Cell::text("d"), Cell::text("e")]);
    }

    #[test]
    fn nonzero_exit_reports_code_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(&dir, "echo 'Syntax Error: broken xref' >&2\nexit 3");
        let extractor = PdftotextExtractor::new().with_program(program);

        match extractor.extract_tables(b"%PDF").unwrap_err() {
            DeclsumError::PdftotextFailed { code, stderr } => {
                assert_eq!(code, 3);
                assert!(stderr.contains("broken xref"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn slow_program_is_killed_after_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(&dir, "exec sleep 30");
        let extractor = PdftotextExtractor::new()
            .with_program(program)
            .with_timeout(Some(Duration::from_secs(1)));

        let started = Instant::now();
        let err = extractor.extract_tables(b"%PDF").unwrap_err();
        assert!(matches!(err, DeclsumError::ExtractionTimeout { secs: 1 }));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn timed_out_document_is_recorded_without_a_table() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(&dir, "exec sleep 30");
        let options = crate::options::parse_options_str(r#"{"timeout_secs": 1}"#).unwrap();
        let extractor = PdftotextExtractor::new()
            .with_program(program)
            .with_timeout(options.timeout());

        let docs = [crate::model::SourceDocument::new("slow.pdf", b"%PDF".to_vec())];
        let outcome = crate::process_documents(&docs, &extractor, &options);

        assert!(outcome.table.is_none());
        assert_eq!(outcome.no_table_files, vec!["slow.pdf"]);
        assert_eq!(
            outcome.warnings[0].kind,
            crate::diagnostics::WarningKind::ProcessingError
        );
    }

    #[test]
    fn missing_program_is_not_found() {
        let extractor = PdftotextExtractor::new().with_program("/nonexistent/pdftotext");
        assert!(matches!(
            extractor.extract_tables(b"%PDF").unwrap_err(),
            DeclsumError::PdftotextNotFound
        ));
    }
}
