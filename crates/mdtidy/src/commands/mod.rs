//! Command implementations.

use std::io::Read;

use anyhow::Context;
use camino::Utf8Path;
use mdtidy_core::DocumentText;

pub mod analyze;
pub mod format;
pub mod info;
#[cfg(feature = "mcp")]
pub mod serve;

/// Path argument that means "read standard input".
pub const STDIN_PATH: &str = "-";

/// Read a document from a file (or stdin for `-`) and validate its size.
///
/// Files are size-checked via metadata before being read; stdin is read up
/// to one byte past the limit. Bytes that are not valid UTF-8 are rejected.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<DocumentText> {
    let bytes = if path.as_str() == STDIN_PATH {
        read_stdin(max_bytes)?
    } else {
        let metadata = std::fs::metadata(path.as_std_path())
            .with_context(|| format!("failed to read {path}"))?;
        if let Some(max) = max_bytes {
            let size = metadata.len() as usize;
            if size > max {
                anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
            }
        }
        std::fs::read(path.as_std_path()).with_context(|| format!("failed to read {path}"))?
    };

    DocumentText::from_bytes(&bytes).with_context(|| format!("failed to decode {path}"))
}

fn read_stdin(max_bytes: Option<usize>) -> anyhow::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let stdin = std::io::stdin().lock();
    match max_bytes {
        Some(max) => {
            stdin
                .take(max as u64 + 1)
                .read_to_end(&mut bytes)
                .context("failed to read stdin")?;
            if bytes.len() > max {
                anyhow::bail!("input too large: stdin exceeds {max} bytes");
            }
        }
        None => {
            let mut stdin = stdin;
            stdin
                .read_to_end(&mut bytes)
                .context("failed to read stdin")?;
        }
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn temp_file(contents: &[u8]) -> (tempfile::TempDir, Utf8PathBuf) {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("doc.md");
        std::fs::write(&path, contents).unwrap();
        let path = Utf8PathBuf::try_from(path).unwrap();
        (tmp, path)
    }

    #[test]
    fn reads_utf8_file() {
        let (_tmp, path) = temp_file(b"# Title\n");
        let doc = read_input_file(&path, None).unwrap();
        assert_eq!(doc.as_str(), "# Title\n");
    }

    #[test]
    fn rejects_oversized_file() {
        let (_tmp, path) = temp_file(b"0123456789");
        let err = read_input_file(&path, Some(5)).unwrap_err();
        assert!(err.to_string().contains("input too large"));
    }

    #[test]
    fn rejects_invalid_utf8() {
        let (_tmp, path) = temp_file(b"\xff\xfe");
        let err = read_input_file(&path, None).unwrap_err();
        assert!(format!("{err:#}").contains("not valid UTF-8"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_input_file(Utf8Path::new("/nonexistent/doc.md"), None).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
