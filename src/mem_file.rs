use std::fs;
use std::path::Path;

use crate::error::{MemGenError, MemGenResult};
use crate::fixed_point::parse_token;

/// Render tokens as a memory file body: one token per line, no trailing newline
pub fn render(tokens: &[String]) -> String {
    tokens.join("\n")
}

/// Write tokens to `path`, replacing any existing file
pub fn write_tokens(path: &Path, tokens: &[String]) -> MemGenResult<()> {
    fs::write(path, render(tokens)).map_err(|e| MemGenError::io(path, e))
}

/// Parse a memory file body back into 16-bit words.
///
/// Accepts a trailing newline and CRLF line endings so hand-edited files
/// still load.
pub fn parse(body: &str) -> MemGenResult<Vec<u16>> {
    let body = body.strip_suffix('\n').unwrap_or(body);
    if body.is_empty() {
        return Ok(Vec::new());
    }
    body.split('\n')
        .enumerate()
        .map(|(idx, line)| parse_token(line.trim_end_matches('\r'), idx + 1))
        .collect()
}

pub fn read_words(path: &Path) -> MemGenResult<Vec<u16>> {
    let body = fs::read_to_string(path).map_err(|e| MemGenError::io(path, e))?;
    parse(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_render_has_no_trailing_newline() {
        assert_eq!(render(&tokens(&["4000", "0010", "0000"])), "4000\n0010\n0000");
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!(parse("4000\nFFFE").unwrap(), vec![0x4000, 0xFFFE]);
        assert_eq!(parse("4000\r\nFFFE\n").unwrap(), vec![0x4000, 0xFFFE]);
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_reports_line() {
        let err = parse("4000\n\n0000").unwrap_err();
        assert!(matches!(err, MemGenError::MalformedToken { line: 2, .. }));
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("A_matrix.mem");
        write_tokens(&path, &tokens(&["4000", "0010"])).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "4000\n0010");
        assert_eq!(read_words(&path).unwrap(), vec![0x4000, 0x0010]);

        // overwrite is total, not appended
        write_tokens(&path, &tokens(&["0001"])).unwrap();
        assert_eq!(read_words(&path).unwrap(), vec![0x0001]);
    }

    #[test]
    fn test_missing_file_carries_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.mem");
        match read_words(&path) {
            Err(MemGenError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Io error, got {:?}", other),
        }
    }
}
