use std::io::Read;

use super::super::{DatasetReader, ImageDataset, MnistHeader, HEADER_LENGTH, IMAGE_MAGIC_NUMBER};
use crate::binary_stream::{read_up_to, ReadBigEndian};
use crate::logger;
use crate::Error;

pub struct MnistImageReader<T: Read> {
    reader: T,
}

impl<T: Read> MnistImageReader<T> {
    pub fn new(reader: T) -> Self {
        Self { reader }
    }

    fn parse_header(&mut self) -> crate::Result<MnistHeader> {
        let mut buffer = [0; HEADER_LENGTH];
        let bytes_read =
            read_up_to(&mut self.reader, &mut buffer).map_err(Error::FailedToReadInput)?;
        if bytes_read < HEADER_LENGTH {
            return Err(Error::IncompleteHeader(bytes_read));
        }
        logger::log_header(&buffer);
        let mut fields = &buffer[..];
        let mut next_field = || fields.read_u32_be().map_err(Error::FailedToReadInput);
        let header = MnistHeader {
            magic_number: next_field()?,
            number_of_images: next_field()?,
            number_of_rows: next_field()?,
            number_of_columns: next_field()?,
        };
        Self::check_magic_number(&header);
        Ok(header)
    }

    fn check_magic_number(header: &MnistHeader) {
        if header.magic_number != IMAGE_MAGIC_NUMBER {
            log::warn!(
                "Unexpected magic number {:#010X}, expected {:#010X}. Reading as images anyway.",
                header.magic_number,
                IMAGE_MAGIC_NUMBER
            );
        }
    }

    fn check_images_are_not_empty(header: &MnistHeader) -> crate::Result<()> {
        let is_empty = header.number_of_rows == 0 || header.number_of_columns == 0;
        if is_empty && header.number_of_images > 0 {
            return Err(Error::EmptySourceImages(
                header.number_of_rows,
                header.number_of_columns,
            ));
        }
        Ok(())
    }

    fn expected_payload_length(header: &MnistHeader) -> crate::Result<usize> {
        header.payload_length().ok_or(Error::ImageDimensionsTooLarge(
            header.number_of_images,
            header.number_of_rows,
            header.number_of_columns,
        ))
    }

    fn parse_payload(&mut self, expected: usize) -> crate::Result<Vec<u8>> {
        let mut payload = Vec::new();
        // one extra byte is enough to detect trailing data
        let limit = (expected as u64).saturating_add(1);
        self.reader
            .by_ref()
            .take(limit)
            .read_to_end(&mut payload)
            .map_err(Error::FailedToReadInput)?;
        Self::check_payload_length_matches_header(expected, payload.len())?;
        Ok(payload)
    }

    fn check_payload_length_matches_header(expected: usize, actual: usize) -> crate::Result<()> {
        if actual < expected {
            return Err(Error::PayloadTooShort { expected, actual });
        }
        if actual > expected {
            return Err(Error::TrailingPayloadBytes { expected, actual });
        }
        Ok(())
    }
}

impl<T: Read> DatasetReader for MnistImageReader<T> {
    fn read_dataset(&mut self) -> crate::Result<ImageDataset> {
        let header = self.parse_header()?;
        log::info!(
            "Header declares {} images of {} rows and {} columns",
            header.number_of_images,
            header.number_of_rows,
            header.number_of_columns
        );
        Self::check_images_are_not_empty(&header)?;
        let expected = Self::expected_payload_length(&header)?;
        let payload = self.parse_payload(expected)?;
        log::debug!("Read {} bytes of pixel data", payload.len());
        Ok(ImageDataset::from_payload(
            header.magic_number,
            header.number_of_images as usize,
            header.number_of_columns,
            header.number_of_rows,
            &payload,
        ))
    }
}
