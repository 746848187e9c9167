use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::ExtractionError;

/// OCR engine abstraction (allows mocking for tests)
pub trait OcrEngine {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Language pack passed to `tesseract -l`.
const OCR_LANGUAGE: &str = "eng";

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the system `tesseract` binary on a temporary copy of the image.
/// A run that outlives `timeout` is killed.
pub struct TesseractCli {
    binary: PathBuf,
    timeout: Duration,
}

impl TesseractCli {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    /// `tesseract` from PATH.
    pub fn from_path(timeout: Duration) -> Self {
        Self::new("tesseract", timeout)
    }

    fn spawn(&self, input: &Path) -> Result<Child, ExtractionError> {
        Command::new(&self.binary)
            .arg(input)
            .arg("stdout")
            .args(["-l", OCR_LANGUAGE])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ExtractionError::OcrUnavailable(self.binary.display().to_string())
                } else {
                    ExtractionError::Io(e)
                }
            })
    }

    /// Poll until the child exits or the deadline passes.
    fn wait_with_deadline(&self, child: &mut Child) -> Result<ExitStatus, ExtractionError> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                // The child may exit between the poll and the kill
                let _ = child.kill();
                let _ = child.wait();
                tracing::warn!(timeout_ms = self.timeout.as_millis() as u64, "Tesseract OCR timed out");
                return Err(ExtractionError::OcrProcessing(format!(
                    "OCR timed out after {:.1}s",
                    self.timeout.as_secs_f64()
                )));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Read a child pipe to the end on its own thread so a full pipe
/// never stalls the child.
fn drain(pipe: Option<impl Read + Send + 'static>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

impl OcrEngine for TesseractCli {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<String, ExtractionError> {
        let mut input = tempfile::NamedTempFile::new()?;
        input.write_all(image_bytes)?;
        input.flush()?;

        let mut child = self.spawn(input.path())?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = self.wait_with_deadline(&mut child)?;
        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            return Err(ExtractionError::OcrProcessing(stderr.trim().to_string()));
        }

        tracing::debug!(bytes = stdout.len(), "Tesseract OCR complete");
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

/// Mock OCR engine for unit testing without Tesseract.
pub struct MockOcrEngine {
    pub text: String,
}

impl MockOcrEngine {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl OcrEngine for MockOcrEngine {
    fn ocr_image(&self, _image_bytes: &[u8]) -> Result<String, ExtractionError> {
        Ok(self.text.clone())
    }
}
