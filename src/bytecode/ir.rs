use serde::{Deserialize, Serialize};

use crate::bytecode::image_error::ImageError;

/// A compiled bytecode program: a flat run of cells, each an opcode or a
/// jump target address, ending in HALT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledProgram {
    pub code: Vec<i32>,
}

impl CompiledProgram {
    pub fn len(&self) -> usize {
        self.code.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Render the text image: a length line, then one cell per line.
    pub fn to_text(&self) -> String {
        let mut out = self.code.len().to_string();
        out.push('\n');
        for cell in &self.code {
            out.push_str(&cell.to_string());
            out.push('\n');
        }
        out
    }

    /// Read a text image back. Lines may carry surrounding whitespace,
    /// so images written on any platform load anywhere.
    pub fn from_text(text: &str) -> Result<CompiledProgram, ImageError> {
        let mut lines = text.lines();

        let length_line = match lines.next() {
            Some(line) => line.trim(),
            None => return Err(ImageError::MissingLength),
        };
        let expected: usize = length_line.parse().map_err(|_| ImageError::BadInteger {
            line: 1,
            text: length_line.to_string(),
        })?;

        // the declared length is untrusted until the count check below
        let mut code = Vec::new();
        for (index, line) in lines.enumerate() {
            let cell: i32 = line.trim().parse().map_err(|_| ImageError::BadInteger {
                line: index + 2,
                text: line.trim().to_string(),
            })?;
            code.push(cell);
        }

        if code.len() != expected {
            return Err(ImageError::WrongCount {
                expected,
                actual: code.len(),
            });
        }

        Ok(CompiledProgram { code })
    }

    /// Encode the compact binary image.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ImageError> {
        Ok(postcard::to_allocvec(self)?)
    }

    /// Decode a binary image produced by [`CompiledProgram::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<CompiledProgram, ImageError> {
        Ok(postcard::from_bytes(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(code: &[i32]) -> CompiledProgram {
        CompiledProgram {
            code: code.to_vec(),
        }
    }

    #[test]
    fn test_text_image_is_length_then_one_cell_per_line() {
        assert_eq!(image(&[0, 1, 16]).to_text(), "3\n0\n1\n16\n");
    }

    #[test]
    fn test_empty_program_text_image() {
        assert_eq!(image(&[]).to_text(), "0\n");
        assert_eq!(CompiledProgram::from_text("0\n").unwrap(), image(&[]));
    }

    #[test]
    fn test_text_image_round_trips() {
        let program = image(&[15, 5, 0, 5, 0, 16]);
        let loaded = CompiledProgram::from_text(&program.to_text()).unwrap();
        assert_eq!(loaded, program);
    }

    #[test]
    fn test_from_text_tolerates_carriage_returns_and_padding() {
        let loaded = CompiledProgram::from_text("3\r\n 0\r\n1 \r\n16\r\n").unwrap();
        assert_eq!(loaded, image(&[0, 1, 16]));
    }

    #[test]
    fn test_negative_cells_survive_the_text_image() {
        let loaded = CompiledProgram::from_text("1\n-5\n").unwrap();
        assert_eq!(loaded, image(&[-5]));
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(
            CompiledProgram::from_text(""),
            Err(ImageError::MissingLength)
        ));
    }

    #[test]
    fn test_bad_length_line_is_rejected() {
        assert!(matches!(
            CompiledProgram::from_text("three\n0\n1\n16\n"),
            Err(ImageError::BadInteger { line: 1, .. })
        ));
    }

    #[test]
    fn test_negative_length_is_rejected() {
        assert!(matches!(
            CompiledProgram::from_text("-1\n"),
            Err(ImageError::BadInteger { line: 1, .. })
        ));
    }

    #[test]
    fn test_bad_cell_reports_its_line() {
        let err = CompiledProgram::from_text("3\n0\nbanana\n16\n").unwrap_err();
        match err {
            ImageError::BadInteger { line, text } => {
                assert_eq!(line, 3);
                assert_eq!(text, "banana");
            }
            other => panic!("expected BadInteger, got {:?}", other),
        }
    }

    #[test]
    fn test_too_few_cells_is_rejected() {
        assert!(matches!(
            CompiledProgram::from_text("4\n0\n1\n16\n"),
            Err(ImageError::WrongCount {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_too_many_cells_is_rejected() {
        assert!(matches!(
            CompiledProgram::from_text("2\n0\n1\n16\n"),
            Err(ImageError::WrongCount {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_huge_length_line_is_rejected() {
        // claims ~9e18 cells with none following
        assert!(matches!(
            CompiledProgram::from_text("9000000000000000000\n"),
            Err(ImageError::WrongCount {
                expected: 9000000000000000000,
                actual: 0
            })
        ));
    }

    #[test]
    fn test_binary_image_round_trips() {
        let program = image(&[12, 5, 1, 5, 6, 2, 16]);
        let bytes = program.to_bytes().unwrap();
        let loaded = CompiledProgram::from_bytes(&bytes).unwrap();
        assert_eq!(loaded, program);
    }

    #[test]
    fn test_truncated_binary_image_is_rejected() {
        let bytes = image(&[0, 1, 16]).to_bytes().unwrap();
        assert!(CompiledProgram::from_bytes(&bytes[..bytes.len() - 1]).is_err());
    }
}
