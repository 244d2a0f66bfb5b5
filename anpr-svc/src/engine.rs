//! Plate recognition engine seam
//!
//! The trained model is a black box behind the `PlateReader` trait: one
//! operation, one distinguished domain fault. The handle is loaded once at
//! startup and shared read-only across requests.

use anpr_common::{ErrorKind, PlateError};
use std::io::Write;
use std::process::{Command, Stdio};
use thiserror::Error;

/// Exit code the external recognizer uses to signal an unreadable image
const INVALID_IMAGE_EXIT: i32 = 2;

/// Faults a recognition engine can raise
#[derive(Debug, Error)]
pub enum RecognizerFault {
    /// Input is not a readable image
    #[error("invalid image")]
    InvalidImage,

    /// Engine-internal failure (model state, subprocess death)
    #[error("recognizer failed: {0}")]
    Failed(String),
}

/// A loaded plate recognition model
///
/// Implementations must be safe for unsynchronized concurrent read-only
/// use; the handle is shared behind an `Arc` and never mutated after load.
pub trait PlateReader: Send + Sync {
    /// Recognize the plate text on one image
    fn read_text(&self, img: &[u8]) -> Result<String, RecognizerFault>;
}

/// Translate engine faults into the error taxonomy
///
/// `InvalidImage` is the one domain fault the pipeline understands. Any
/// other engine failure degrades to `Unknown` so the request still gets a
/// well-formed 500 instead of tearing down the worker.
pub fn read_plate_number(engine: &dyn PlateReader, img: &[u8]) -> anpr_common::Result<String> {
    match engine.read_text(img) {
        Ok(text) => Ok(text),
        Err(RecognizerFault::InvalidImage) => Err(PlateError::new(ErrorKind::InvalidImage)),
        Err(RecognizerFault::Failed(msg)) => Err(PlateError::with_message(ErrorKind::Unknown, msg)),
    }
}

/// Recognizer backed by an external command-line engine
///
/// The image is fed to the command on stdin; the recognized text comes
/// back on stdout. Exit code 2 signals an unreadable image.
pub struct CommandPlateReader {
    command: String,
}

impl CommandPlateReader {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl PlateReader for CommandPlateReader {
    fn read_text(&self, img: &[u8]) -> Result<String, RecognizerFault> {
        let mut child = Command::new(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                RecognizerFault::Failed(format!("failed to start {}: {}", self.command, e))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| RecognizerFault::Failed("recognizer stdin unavailable".to_string()))?;
        // Feed the image from a separate thread so a recognizer that emits
        // more than a pipe buffer of output before draining its input
        // cannot deadlock against us. The write result is discarded: the
        // exit status is authoritative, and a child that exits without
        // reading all of stdin just breaks the pipe.
        let img = img.to_vec();
        let writer = std::thread::spawn(move || {
            let _ = stdin.write_all(&img);
        });

        let output = child
            .wait_with_output()
            .map_err(|e| RecognizerFault::Failed(format!("recognizer did not finish: {}", e)))?;
        let _ = writer.join();

        if output.status.code() == Some(INVALID_IMAGE_EXIT) {
            return Err(RecognizerFault::InvalidImage);
        }
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognizerFault::Failed(format!(
                "recognizer exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8(output.stdout)
            .map_err(|e| RecognizerFault::Failed(format!("non-UTF-8 recognizer output: {}", e)))?;
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubReader {
        fault: Option<fn() -> RecognizerFault>,
    }

    impl PlateReader for StubReader {
        fn read_text(&self, _img: &[u8]) -> Result<String, RecognizerFault> {
            match self.fault {
                None => Ok("c180mv78".to_string()),
                Some(fault) => Err(fault()),
            }
        }
    }

    #[test]
    fn adapter_passes_text_through() {
        let engine = StubReader { fault: None };
        let res = read_plate_number(&engine, b"jpeg bytes").unwrap();
        assert_eq!(res, "c180mv78");
    }

    #[test]
    fn adapter_maps_invalid_image() {
        let engine = StubReader {
            fault: Some(|| RecognizerFault::InvalidImage),
        };
        let err = read_plate_number(&engine, b"not a jpeg").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidImage);
        assert_eq!(err.message(), "invalid image");
    }

    #[test]
    fn adapter_degrades_engine_failure_to_unknown() {
        let engine = StubReader {
            fault: Some(|| RecognizerFault::Failed("model weights corrupted".to_string())),
        };
        let err = read_plate_number(&engine, b"jpeg bytes").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(err.status().as_u16(), 500);
        assert_eq!(err.message(), "model weights corrupted");
    }

    #[cfg(unix)]
    #[test]
    fn command_reader_round_trips_stdout() {
        // `cat` echoes the image bytes, standing in for a real engine
        let engine = CommandPlateReader::new("cat");
        let res = engine.read_text(b"o156gh199\n").unwrap();
        assert_eq!(res, "o156gh199");
    }

    #[cfg(unix)]
    #[test]
    fn command_reader_survives_chatty_recognizer() {
        use std::os::unix::fs::PermissionsExt;

        // Emits well over a pipe buffer of output without ever reading
        // stdin; the image is also larger than a pipe buffer.
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("chatty-engine");
        std::fs::write(
            &script,
            "#!/bin/sh\nhead -c 131072 /dev/zero | tr '\\0' 'x'\nexit 0\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let engine = CommandPlateReader::new(script.to_str().unwrap());
        let img = vec![0u8; 1 << 20];
        let res = engine.read_text(&img).unwrap();
        assert_eq!(res.len(), 131072);
    }

    #[test]
    fn command_reader_reports_missing_binary() {
        let engine = CommandPlateReader::new("definitely-not-a-recognizer");
        let err = engine.read_text(b"img").unwrap_err();
        assert!(matches!(err, RecognizerFault::Failed(_)));
    }
}
