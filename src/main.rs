// Copyright 2020 TwoCookingMice

use ivglb::{convert, ExportOptions};

use std::env;

const EXIT_USAGE: i32 = 2;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        let program = args.first().map(String::as_str).unwrap_or("ivglb");
        eprintln!("Usage: {} <input.xml> <output.glb>", program);
        std::process::exit(EXIT_USAGE);
    }

    let input_path = &args[1];
    let output_path = &args[2];
    log::info!("Converting {} -> {}.", input_path, output_path);

    match convert(input_path, output_path, &ExportOptions::default()) {
        Ok(summary) => {
            log::debug!("Output bounds: {:?} - {:?}.", summary.bounds.min_array(), summary.bounds.max_array());
            println!("{}", summary);
        }
        Err(err) => {
            log::error!("{}", err);
            eprintln!("ERROR: {}", err);
            std::process::exit(err.exit_code());
        }
    }
}
