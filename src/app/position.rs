use std::fmt;
use std::str::FromStr;

use super::error::AppError;

/// A text position in `line.column` form: 1-based line, 0-based character
/// column within the line. This is the addressing scheme script files use;
/// in memory the document works with byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.line, self.col)
    }
}

impl FromStr for Pos {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || AppError::Script(format!("bad position {:?}", s));
        let (line, col) = s.split_once('.').ok_or_else(err)?;
        let line: u32 = line.parse().map_err(|_| err())?;
        let col: u32 = col.parse().map_err(|_| err())?;
        if line == 0 {
            return Err(err());
        }
        Ok(Pos { line, col })
    }
}

/// Convert a byte offset into `text` to a position. Offsets past the end
/// clamp to the end of the text.
pub fn offset_to_pos(text: &str, offset: usize) -> Pos {
    let offset = offset.min(text.len());
    let mut line = 1u32;
    let mut col = 0u32;
    for (i, ch) in text.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    Pos { line, col }
}

/// Resolve a position to a byte offset into `text`. Returns None when the
/// line does not exist or the column runs past the end of its line.
pub fn pos_to_offset(text: &str, pos: Pos) -> Option<usize> {
    let mut line_start = 0usize;
    if pos.line > 1 {
        let mut current = 1u32;
        let mut found = false;
        for (i, ch) in text.char_indices() {
            if ch == '\n' {
                current += 1;
                if current == pos.line {
                    line_start = i + 1;
                    found = true;
                    break;
                }
            }
        }
        if !found {
            return None;
        }
    }

    let mut remaining = pos.col;
    for (i, ch) in text[line_start..].char_indices() {
        if remaining == 0 {
            return Some(line_start + i);
        }
        if ch == '\n' {
            return None;
        }
        remaining -= 1;
    }
    if remaining == 0 { Some(text.len()) } else { None }
}
