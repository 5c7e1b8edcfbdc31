use std::fmt::Display;
use std::io;

#[derive(Debug)]
pub enum Error {
    InvalidTargetSize(i64, i64),
    UnableToOpenInputFileForReading(String, io::Error),
    UnableToOpenOutputFileForWriting(String, io::Error),
    FailedToPersistOutputFile(String, io::Error),
    FailedToReadInput(io::Error),
    IncompleteHeader(usize),
    ImageDimensionsTooLarge(u32, u32, u32),
    EmptySourceImages(u32, u32),
    PayloadTooShort { expected: usize, actual: usize },
    TrailingPayloadBytes { expected: usize, actual: usize },
    FailedToWriteHeader(io::Error),
    FailedToWriteImageData(io::Error),
    ResamplingWorkerFailed,
}

impl Error {
    /// Header or payload do not describe a well-formed image file.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::IncompleteHeader(_)
                | Self::ImageDimensionsTooLarge(..)
                | Self::EmptySourceImages(..)
                | Self::PayloadTooShort { .. }
                | Self::TrailingPayloadBytes { .. }
        )
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTargetSize(width, height) => {
                write!(
                    f,
                    "Invalid target size {}x{}. Width and height must be positive.",
                    width, height
                )
            }
            Self::UnableToOpenInputFileForReading(path, error) => {
                write!(
                    f,
                    "Unable to open input file '{}' for reading: {}",
                    path, error
                )
            }
            Self::UnableToOpenOutputFileForWriting(path, error) => {
                write!(
                    f,
                    "Unable to open output file '{}' for writing: {}",
                    path, error
                )
            }
            Self::FailedToPersistOutputFile(path, error) => {
                write!(f, "Unable to move output into '{}': {}", path, error)
            }
            Self::FailedToReadInput(error) => write!(f, "Failed to read input: {}", error),
            Self::IncompleteHeader(bytes_read) => {
                write!(
                    f,
                    "Incomplete header. Expected 16 bytes, but got {}.",
                    bytes_read
                )
            }
            Self::ImageDimensionsTooLarge(count, rows, columns) => {
                write!(
                    f,
                    "Header declares {} images of size {}x{}, which exceeds the addressable size",
                    count, rows, columns
                )
            }
            Self::EmptySourceImages(rows, columns) => {
                write!(
                    f,
                    "Images of size {}x{} contain no pixels to interpolate",
                    rows, columns
                )
            }
            Self::PayloadTooShort { expected, actual } => {
                write!(
                    f,
                    "Pixel data is too short. Header declares {} bytes, but only {} are present.",
                    expected, actual
                )
            }
            Self::TrailingPayloadBytes { expected, actual } => {
                write!(
                    f,
                    "Pixel data is too long. Header declares {} bytes, but at least {} are present.",
                    expected, actual
                )
            }
            Self::FailedToWriteHeader(error) => write!(f, "Failed to write header: {}", error),
            Self::FailedToWriteImageData(error) => {
                write!(f, "Failed to write image data: {}", error)
            }
            Self::ResamplingWorkerFailed => write!(f, "A resampling worker terminated early"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnableToOpenInputFileForReading(_, error)
            | Self::UnableToOpenOutputFileForWriting(_, error)
            | Self::FailedToPersistOutputFile(_, error)
            | Self::FailedToReadInput(error)
            | Self::FailedToWriteHeader(error)
            | Self::FailedToWriteImageData(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use std::io;

    use super::Error;

    #[test]
    fn malformed_input_classification() {
        assert!(Error::IncompleteHeader(3).is_malformed_input());
        assert!(Error::PayloadTooShort {
            expected: 10,
            actual: 2
        }
        .is_malformed_input());
        assert!(!Error::InvalidTargetSize(0, 4).is_malformed_input());
        assert!(
            !Error::FailedToReadInput(io::Error::from(io::ErrorKind::Other)).is_malformed_input()
        );
    }

    #[test]
    fn io_errors_are_exposed_as_source() {
        let error = Error::FailedToWriteHeader(io::Error::from(io::ErrorKind::WriteZero));
        let source = std::error::Error::source(&error).expect("Source must be present");
        assert!(!source.to_string().is_empty());
    }
}
