use std::{
    ffi::OsString,
    fs::{self, File, OpenOptions},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

pub use cli::CLIParser;
pub use error::Error;
use image::{
    reader::mnist::MnistImageReader, transformer::DatasetTransformer,
    writer::mnist::MnistImageWriter, DatasetReader, DatasetWriter, ImageDataset, TargetSize,
};
use threadpool::ThreadPool;

pub mod binary_stream;
mod cli;
mod error;
pub mod image;
mod logger;

pub type Result<T> = std::result::Result<T, error::Error>;

const PARTIAL_OUTPUT_EXTENSION: &str = "part";

pub struct Arguments {
    input_file: PathBuf,
    output_file: PathBuf,
    width: i64,
    height: i64,
    number_of_threads: usize,
}

fn open_input_file(file_path: &Path) -> Result<File> {
    File::open(file_path).map_err(|e| {
        Error::UnableToOpenInputFileForReading(file_path.display().to_string(), e)
    })
}

fn open_output_file(file_path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(file_path)
        .map_err(|e| {
            Error::UnableToOpenOutputFileForWriting(file_path.display().to_string(), e)
        })
}

/// Sibling of the output file that receives the data until it is complete
fn partial_output_path(output_file: &Path) -> PathBuf {
    let mut file_name = output_file
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    file_name.push(".");
    file_name.push(PARTIAL_OUTPUT_EXTENSION);
    output_file.with_file_name(file_name)
}

fn read_dataset(input_file: &Path) -> Result<ImageDataset> {
    let input_file = open_input_file(input_file)?;
    let mut reader = MnistImageReader::new(BufReader::new(input_file));
    reader.read_dataset()
}

fn write_dataset(output_file: &Path, dataset: &ImageDataset) -> Result<()> {
    let partial_file_path = partial_output_path(output_file);
    let result = write_dataset_to(&partial_file_path, dataset).and_then(|_| {
        fs::rename(&partial_file_path, output_file).map_err(|e| {
            Error::FailedToPersistOutputFile(output_file.display().to_string(), e)
        })
    });
    if result.is_err() && partial_file_path.exists() {
        log::warn!("Removing incomplete output {}", partial_file_path.display());
        let _ = fs::remove_file(&partial_file_path);
    }
    result
}

fn write_dataset_to(file_path: &Path, dataset: &ImageDataset) -> Result<()> {
    let output_file = open_output_file(file_path)?;
    let mut writer = MnistImageWriter::new(BufWriter::new(output_file));
    writer.write_dataset(dataset)
}

pub fn upscale_mnist_images(arguments: &Arguments) -> Result<()> {
    let target = TargetSize::new(arguments.width, arguments.height)?;
    let dataset = read_dataset(&arguments.input_file)?;
    println!(
        "Loaded {} images of size {}x{}.",
        dataset.number_of_images(),
        dataset.height(),
        dataset.width()
    );
    let threadpool = ThreadPool::new(arguments.number_of_threads);
    let transformer = DatasetTransformer::new(target, &threadpool);
    let dataset = transformer.transform(dataset)?;
    println!("Upscaled images to size {}x{}.", target.width, target.height);
    write_dataset(&arguments.output_file, &dataset)?;
    println!(
        "Upscaled images saved to {}.",
        arguments.output_file.display()
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use super::partial_output_path;

    #[test]
    fn partial_output_is_a_sibling() {
        let partial = partial_output_path(Path::new("/data/train-images-64x64-idx3-ubyte"));
        assert_eq!(
            partial,
            Path::new("/data/train-images-64x64-idx3-ubyte.part")
        );
    }
}
