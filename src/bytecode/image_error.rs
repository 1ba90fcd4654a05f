#[derive(Debug)]
pub enum ImageError {
    /// The image is empty, so there is no length line to read
    MissingLength,
    /// A line that should hold one integer holds something else
    BadInteger { line: usize, text: String },
    /// The length line disagrees with the number of cells that follow
    WrongCount { expected: usize, actual: usize },
    /// The binary image failed to encode or decode
    Binary(postcard::Error),
}

impl std::fmt::Display for ImageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageError::MissingLength => {
                write!(f, "bad bytecode image: missing length line")
            }
            ImageError::BadInteger { line, text } => {
                write!(f, "bad bytecode image: line {}: '{}' is not an integer", line, text)
            }
            ImageError::WrongCount { expected, actual } => {
                write!(
                    f,
                    "bad bytecode image: length line says {} cells, found {}",
                    expected, actual
                )
            }
            ImageError::Binary(err) => {
                write!(f, "bad bytecode image: {}", err)
            }
        }
    }
}

impl std::error::Error for ImageError {}

impl From<postcard::Error> for ImageError {
    fn from(err: postcard::Error) -> Self {
        ImageError::Binary(err)
    }
}
