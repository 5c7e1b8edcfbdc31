use std::sync::{mpsc, Arc};

use threadpool::ThreadPool;

use super::{resampling::BicubicResampler, GrayscaleImage, ImageDataset, TargetSize};
use crate::{Error, Result};

/// Resamples all images of a dataset on a thread pool.
///
/// Images are independent of each other, so they are cut into one
/// batch per worker and put back together in their original order.
pub struct DatasetTransformer<'a> {
    target: TargetSize,
    threadpool: &'a ThreadPool,
}

impl<'a> DatasetTransformer<'a> {
    pub fn new(target: TargetSize, threadpool: &'a ThreadPool) -> Self {
        DatasetTransformer { target, threadpool }
    }

    fn batch_size(&self, number_of_images: usize) -> usize {
        let number_of_workers = self.threadpool.max_count().max(1);
        number_of_images.div_ceil(number_of_workers).max(1)
    }

    fn split_into_batches(
        images: Vec<GrayscaleImage>,
        batch_size: usize,
    ) -> Vec<Vec<GrayscaleImage>> {
        let mut images = images.into_iter();
        let mut batches = Vec::new();
        loop {
            let batch: Vec<GrayscaleImage> = images.by_ref().take(batch_size).collect();
            if batch.is_empty() {
                return batches;
            }
            batches.push(batch);
        }
    }

    fn resample_batches(
        &self,
        resampler: Arc<BicubicResampler>,
        batches: Vec<Vec<GrayscaleImage>>,
    ) -> Result<Vec<GrayscaleImage>> {
        let number_of_batches = batches.len();
        let (sender, receiver) = mpsc::channel();
        for (batch_index, batch) in batches.into_iter().enumerate() {
            let sender = sender.clone();
            let resampler = Arc::clone(&resampler);
            self.threadpool.execute(move || {
                let resampled: Vec<GrayscaleImage> =
                    batch.iter().map(|image| resampler.resample(image)).collect();
                // the receiver only disappears if the transformation was abandoned
                let _ = sender.send((batch_index, resampled));
            });
        }
        drop(sender);

        let mut results: Vec<Option<Vec<GrayscaleImage>>> =
            (0..number_of_batches).map(|_| None).collect();
        for (batch_index, resampled) in receiver.iter() {
            log::debug!(
                "Batch {} of {} resampled ({} images)",
                batch_index + 1,
                number_of_batches,
                resampled.len()
            );
            results[batch_index] = Some(resampled);
        }
        let batches = results
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or(Error::ResamplingWorkerFailed)?;
        Ok(batches.into_iter().flatten().collect())
    }

    pub fn transform(&self, dataset: ImageDataset) -> Result<ImageDataset> {
        let magic_number = dataset.magic_number();
        let source_width = dataset.width();
        let source_height = dataset.height();
        let number_of_images = dataset.number_of_images();
        if number_of_images == 0 {
            return Ok(ImageDataset::new(
                magic_number,
                self.target.width,
                self.target.height,
                Vec::new(),
            ));
        }
        if source_width == 0 || source_height == 0 {
            return Err(Error::EmptySourceImages(source_height, source_width));
        }
        let resampler = Arc::new(BicubicResampler::new(
            source_width,
            source_height,
            self.target,
        ));
        let batch_size = self.batch_size(number_of_images);
        log::info!(
            "Resampling {} images from {}x{} to {}x{} in batches of {}",
            number_of_images,
            source_width,
            source_height,
            self.target.width,
            self.target.height,
            batch_size
        );
        let batches = Self::split_into_batches(dataset.into_images(), batch_size);
        let images = self.resample_batches(resampler, batches)?;
        Ok(ImageDataset::new(
            magic_number,
            self.target.width,
            self.target.height,
            images,
        ))
    }
}

#[cfg(test)]
mod test {
    use threadpool::ThreadPool;

    use super::DatasetTransformer;
    use crate::error::Error;
    use crate::image::{
        resampling::BicubicResampler, GrayscaleImage, ImageDataset, TargetSize,
        IMAGE_MAGIC_NUMBER,
    };

    fn create_test_dataset(number_of_images: u8) -> ImageDataset {
        let images = (0..number_of_images)
            .map(|index| {
                let dots = (0..6 * 5u8)
                    .map(|dot| dot.wrapping_mul(7).wrapping_add(index.wrapping_mul(31)))
                    .collect();
                GrayscaleImage::new(6, 5, dots)
            })
            .collect();
        ImageDataset::new(IMAGE_MAGIC_NUMBER, 6, 5, images)
    }

    #[test]
    fn parallel_result_matches_sequential_order() {
        let dataset = create_test_dataset(11);
        let target = TargetSize {
            width: 13,
            height: 9,
        };
        let resampler = BicubicResampler::new(6, 5, target);
        let expected: Vec<GrayscaleImage> = dataset
            .images()
            .iter()
            .map(|image| resampler.resample(image))
            .collect();

        let threadpool = ThreadPool::new(4);
        let transformer = DatasetTransformer::new(target, &threadpool);
        let resampled = transformer.transform(dataset).expect("Transformation failed");
        assert_eq!(resampled.number_of_images(), 11);
        assert_eq!(resampled.width(), 13);
        assert_eq!(resampled.height(), 9);
        assert_eq!(resampled.images(), expected.as_slice());
    }

    #[test]
    fn more_workers_than_images() {
        let dataset = create_test_dataset(2);
        let target = TargetSize {
            width: 12,
            height: 10,
        };
        let threadpool = ThreadPool::new(8);
        let transformer = DatasetTransformer::new(target, &threadpool);
        let resampled = transformer.transform(dataset).expect("Transformation failed");
        assert_eq!(resampled.number_of_images(), 2);
        assert!(resampled
            .images()
            .iter()
            .all(|image| image.dots().len() == 120));
    }

    #[test]
    fn empty_dataset_takes_target_size() {
        let dataset = ImageDataset::new(IMAGE_MAGIC_NUMBER, 28, 28, Vec::new());
        let target = TargetSize {
            width: 64,
            height: 32,
        };
        let threadpool = ThreadPool::new(1);
        let transformer = DatasetTransformer::new(target, &threadpool);
        let resampled = transformer.transform(dataset).expect("Transformation failed");
        assert_eq!(resampled.number_of_images(), 0);
        assert_eq!(resampled.width(), 64);
        assert_eq!(resampled.height(), 32);
    }

    #[test]
    fn images_without_pixels_are_rejected() {
        let images = vec![GrayscaleImage::new(0, 4, Vec::new())];
        let dataset = ImageDataset::new(IMAGE_MAGIC_NUMBER, 0, 4, images);
        let target = TargetSize {
            width: 8,
            height: 8,
        };
        let threadpool = ThreadPool::new(1);
        let transformer = DatasetTransformer::new(target, &threadpool);
        let result = transformer.transform(dataset);
        assert!(matches!(result, Err(Error::EmptySourceImages(4, 0))));
    }

    #[test]
    fn batches_keep_every_image() {
        let dataset = create_test_dataset(7);
        let batches = DatasetTransformer::split_into_batches(dataset.into_images(), 3);
        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
    }
}
