use crate::Error;

pub mod reader;
pub mod resampling;
pub mod transformer;
pub mod writer;

/// Magic number of MNIST image files (IDX3, unsigned bytes)
pub const IMAGE_MAGIC_NUMBER: u32 = 0x0000_0803;
/// Magic number of MNIST label files (IDX1, unsigned bytes)
pub const LABEL_MAGIC_NUMBER: u32 = 0x0000_0801;
/// Size of the image file header in bytes
pub const HEADER_LENGTH: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MnistHeader {
    pub magic_number: u32,
    pub number_of_images: u32,
    pub number_of_rows: u32,
    pub number_of_columns: u32,
}

impl MnistHeader {
    /// Number of payload bytes the header announces, if addressable
    pub fn payload_length(&self) -> Option<usize> {
        (self.number_of_images as usize)
            .checked_mul(self.number_of_rows as usize)?
            .checked_mul(self.number_of_columns as usize)
    }
}

/// A single 8 bit grayscale image, stored row by row
#[derive(Clone, Debug, PartialEq)]
pub struct GrayscaleImage {
    width: u32,
    height: u32,
    dots: Vec<u8>,
}

impl GrayscaleImage {
    pub fn new(width: u32, height: u32, dots: Vec<u8>) -> Self {
        debug_assert_eq!(dots.len(), width as usize * height as usize);
        Self {
            width,
            height,
            dots,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dots(&self) -> &[u8] {
        &self.dots
    }

    pub fn dot(&self, column_index: u32, row_index: u32) -> u8 {
        let index = column_index as usize + row_index as usize * self.width as usize;
        self.dots[index]
    }
}

/// All images of one MNIST file. Every image shares the
/// dimensions of the dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageDataset {
    magic_number: u32,
    width: u32,
    height: u32,
    images: Vec<GrayscaleImage>,
}

impl ImageDataset {
    pub fn new(magic_number: u32, width: u32, height: u32, images: Vec<GrayscaleImage>) -> Self {
        debug_assert!(images
            .iter()
            .all(|image| image.width == width && image.height == height));
        Self {
            magic_number,
            width,
            height,
            images,
        }
    }

    /// Split a flat, image-major payload into `number_of_images`
    /// images of `width` x `height`
    pub fn from_payload(
        magic_number: u32,
        number_of_images: usize,
        width: u32,
        height: u32,
        payload: &[u8],
    ) -> Self {
        let image_length = width as usize * height as usize;
        debug_assert_eq!(payload.len(), number_of_images * image_length);
        let images = (0..number_of_images)
            .map(|index| {
                let start = index * image_length;
                let dots = payload[start..start + image_length].to_vec();
                GrayscaleImage::new(width, height, dots)
            })
            .collect();
        Self::new(magic_number, width, height, images)
    }

    pub fn magic_number(&self) -> u32 {
        self.magic_number
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn number_of_images(&self) -> usize {
        self.images.len()
    }

    pub fn images(&self) -> &[GrayscaleImage] {
        &self.images
    }

    pub fn into_images(self) -> Vec<GrayscaleImage> {
        self.images
    }
}

/// Validated output resolution
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub fn new(width: i64, height: i64) -> crate::Result<Self> {
        let invalid = || Error::InvalidTargetSize(width, height);
        if width <= 0 || height <= 0 {
            return Err(invalid());
        }
        Ok(Self {
            width: u32::try_from(width).map_err(|_| invalid())?,
            height: u32::try_from(height).map_err(|_| invalid())?,
        })
    }
}

pub trait DatasetReader {
    fn read_dataset(&mut self) -> crate::Result<ImageDataset>;
}

pub trait DatasetWriter {
    fn write_dataset(&mut self, dataset: &ImageDataset) -> crate::Result<()>;
}
