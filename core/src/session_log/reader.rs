use std::fs;
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use memchr::memchr_iter;
use memmap2::Mmap;

use super::LogBlock;
use crate::error::ParseError;

/// Read a session log into lines.
pub fn read_session_log(path: &Path) -> Result<Vec<String>, ParseError> {
    let io_error = |source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::File::open(path).map_err(io_error)?;
    if file.metadata().map_err(io_error)?.len() == 0 {
        return Ok(Vec::new());
    }
    // SAFETY: the log is only read; a concurrent writer at worst yields a
    // truncated last line.
    let mmap = unsafe { Mmap::map(&file).map_err(io_error)? };
    Ok(split_lines(&mmap))
}

/// Split raw bytes on `\n`, dropping a trailing `\r` and trailing
/// whitespace. Lines that are not UTF-8 are decoded as Windows-1252.
pub fn split_lines(bytes: &[u8]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut start = 0;
    for end in memchr_iter(b'\n', bytes) {
        lines.push(decode_line(&bytes[start..end]));
        start = end + 1;
    }
    if start < bytes.len() {
        lines.push(decode_line(&bytes[start..]));
    }
    lines
}

fn decode_line(raw: &[u8]) -> String {
    match std::str::from_utf8(raw) {
        Ok(line) => line.trim_end().to_string(),
        Err(_) => {
            let (decoded, _, _) = WINDOWS_1252.decode(raw);
            decoded.trim_end().to_string()
        }
    }
}

/// Groups lines into classified blocks. Blank lines separate blocks.
pub struct BlockReader<I> {
    lines: I,
}

impl<I> BlockReader<I> {
    pub fn new(lines: I) -> Self {
        Self { lines }
    }
}

impl<I, S> Iterator for BlockReader<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = LogBlock;

    fn next(&mut self) -> Option<LogBlock> {
        let mut block = Vec::new();
        for line in self.lines.by_ref() {
            let line = line.as_ref().trim_end();
            if line.trim().is_empty() {
                if block.is_empty() {
                    continue;
                }
                break;
            }
            block.push(line.to_string());
        }
        if block.is_empty() {
            None
        } else {
            Some(LogBlock::new(block))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::session_log::LogBlockType;

    #[test]
    fn test_blocks_split_on_blank_lines() {
        let text = "\n\n[1] The Spooky Forest\nEncounter: spooky mummy\n   \n\nYou acquire an item: seal tooth  \nYou gain 5 Meat\n\n";
        let blocks: Vec<_> = BlockReader::new(text.lines()).collect();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].block_type, LogBlockType::Encounter);
        assert_eq!(blocks[1].block_type, LogBlockType::Other);
        assert_eq!(blocks[1].lines, vec!["You acquire an item: seal tooth", "You gain 5 Meat"]);
    }

    #[test]
    fn test_split_lines_handles_crlf_and_cp1252() {
        let bytes = b"eat 1 jumping horseradish\r\nYou acquire an item: caf\xe9 food\r\nlast";
        let lines = split_lines(bytes);
        assert_eq!(
            lines,
            vec!["eat 1 jumping horseradish", "You acquire an item: café food", "last"]
        );
    }

    #[test]
    fn test_read_session_log_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[5] Noob Cave").unwrap();
        writeln!(file, "Encounter: crate").unwrap();
        let lines = read_session_log(file.path()).unwrap();
        assert_eq!(lines, vec!["[5] Noob Cave", "Encounter: crate"]);
    }

    #[test]
    fn test_empty_and_missing_files() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(read_session_log(file.path()).unwrap().is_empty());
        assert!(matches!(
            read_session_log(Path::new("/nonexistent/alv/session.txt")),
            Err(ParseError::Io { .. })
        ));
    }
}
