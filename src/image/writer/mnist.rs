use std::io::{self, Write};

use crate::{
    binary_stream::WriteBigEndian,
    image::{DatasetWriter, ImageDataset, IMAGE_MAGIC_NUMBER},
    Error,
};

pub struct MnistImageWriter<T: Write> {
    writer: T,
}

impl<T: Write> MnistImageWriter<T> {
    pub fn new(writer: T) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> T {
        self.writer
    }

    fn write_header(&mut self, dataset: &ImageDataset) -> io::Result<()> {
        let number_of_images = u32::try_from(dataset.number_of_images()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "number of images exceeds the header field",
            )
        })?;
        // the magic number always marks an image file
        self.writer.write_u32_be(IMAGE_MAGIC_NUMBER)?;
        self.writer.write_u32_be(number_of_images)?;
        self.writer.write_u32_be(dataset.height())?;
        self.writer.write_u32_be(dataset.width())
    }

    fn write_image_data(&mut self, dataset: &ImageDataset) -> io::Result<()> {
        for image in dataset.images() {
            self.writer.write_all(image.dots())?;
        }
        self.writer.flush()
    }
}

impl<T: Write> DatasetWriter for MnistImageWriter<T> {
    fn write_dataset(&mut self, dataset: &ImageDataset) -> crate::Result<()> {
        log::info!(
            "Writing {} images of {}x{}",
            dataset.number_of_images(),
            dataset.width(),
            dataset.height()
        );
        self.write_header(dataset).map_err(Error::FailedToWriteHeader)?;
        self.write_image_data(dataset).map_err(Error::FailedToWriteImageData)
    }
}

#[cfg(test)]
mod test {
    use std::io::{self, Write};

    use super::MnistImageWriter;
    use crate::error::Error;
    use crate::image::{
        reader::mnist::MnistImageReader, DatasetReader, DatasetWriter, GrayscaleImage,
        ImageDataset, IMAGE_MAGIC_NUMBER, LABEL_MAGIC_NUMBER,
    };

    fn write_to_vec(dataset: &ImageDataset) -> Vec<u8> {
        let mut writer = MnistImageWriter::new(Vec::new());
        writer.write_dataset(dataset).expect("Writing must not fail");
        writer.into_inner()
    }

    #[test]
    fn header_layout() {
        let dataset = ImageDataset::new(
            IMAGE_MAGIC_NUMBER,
            3,
            2,
            vec![GrayscaleImage::new(3, 2, vec![1, 2, 3, 4, 5, 6])],
        );
        let bytes = write_to_vec(&dataset);
        #[rustfmt::skip]
        let expected: &[u8] = &[
            0x00, 0x00, 0x08, 0x03,
            0x00, 0x00, 0x00, 0x01,
            0x00, 0x00, 0x00, 0x02,
            0x00, 0x00, 0x00, 0x03,
            1, 2, 3, 4, 5, 6,
        ];
        assert_eq!(bytes, expected);
    }

    #[test]
    fn magic_number_is_always_image_magic() {
        let dataset = ImageDataset::new(
            LABEL_MAGIC_NUMBER,
            1,
            1,
            vec![GrayscaleImage::new(1, 1, vec![9])],
        );
        let bytes = write_to_vec(&dataset);
        assert_eq!(&bytes[..4], &IMAGE_MAGIC_NUMBER.to_be_bytes());
    }

    #[test]
    fn written_dataset_reads_back() {
        let images = (0..3u8)
            .map(|index| GrayscaleImage::new(4, 5, vec![index * 50; 20]))
            .collect();
        let dataset = ImageDataset::new(IMAGE_MAGIC_NUMBER, 4, 5, images);
        let bytes = write_to_vec(&dataset);
        let mut reader = MnistImageReader::new(bytes.as_slice());
        let read_back = reader.read_dataset().expect("Reading must not fail");
        assert_eq!(read_back, dataset);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn io_failure_is_reported_for_header() {
        let dataset = ImageDataset::new(IMAGE_MAGIC_NUMBER, 1, 1, Vec::new());
        let mut writer = MnistImageWriter::new(FailingWriter);
        match writer.write_dataset(&dataset) {
            Err(Error::FailedToWriteHeader(error)) => {
                assert_eq!(error.kind(), io::ErrorKind::PermissionDenied)
            }
            _ => panic!("Write failure was not reported"),
        }
    }
}
