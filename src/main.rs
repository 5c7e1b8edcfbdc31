use std::{env::args_os, process::ExitCode};

use mnist_upscaler::{upscale_mnist_images, CLIParser};

fn main() -> ExitCode {
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    match upscale_mnist_images(&arguments) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Upscaling failed because of: {}", e);
            ExitCode::FAILURE
        }
    }
}
