//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use std::fs;
use std::io;
use std::path::Path;

use clap::Parser;
use log::{debug, error, info, warn};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use nzip::tools::cli::{Args, Mode};
use nzip::Codec;

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> Result<(), io::Error> {
    let args = Args::parse();

    // Available log levels are Error, Warn, Info, Debug, Trace
    TermLogger::init(
        args.log_level(),
        Config::default(),
        TerminalMode::Stdout,
        ColorChoice::AlwaysAnsi,
    )
    .unwrap();

    let mode = args.mode();
    let mut failures = 0;
    for file in &args.files {
        let result = match mode {
            Mode::Zip => zip(file, &args),
            Mode::Unzip => unzip(file, &args),
        };
        if let Err(e) = result {
            error!("{}: {}", file, e);
            failures += 1;
        }
    }

    if failures > 0 {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("{} file(s) failed", failures),
        ));
    }
    info!("Done.");
    Ok(())
}

/// Compress one file, writing `<name><ext>` next to it.
fn zip(file: &str, args: &Args) -> Result<(), io::Error> {
    let codec = Codec::from(args.method);
    let out_name = format!("{}{}", file, codec.extension());
    check_overwrite(&out_name, args.force)?;

    let data = fs::read(file)?;
    info!("Compressing {} ({} bytes) with {}", file, data.len(), codec.name());

    let mut report = |pct: u8| debug!("{}: {}%", file, pct);
    let packed = codec.compress(&data, Some(&mut report));

    fs::write(&out_name, &packed)?;
    info!(
        "Wrote {} ({} bytes, {:.1}% of original)",
        out_name,
        packed.len(),
        ratio(packed.len(), data.len())
    );

    if !args.keep {
        fs::remove_file(file)?;
    }
    Ok(())
}

/// Decompress one file. The codec comes from the extension, which is also
/// stripped to produce the output name.
fn unzip(file: &str, args: &Args) -> Result<(), io::Error> {
    let codec = Codec::from_extension(file).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "unknown extension")
    })?;
    let out_name = &file[..file.len() - codec.extension().len()];
    check_overwrite(out_name, args.force)?;

    let data = fs::read(file)?;
    info!("Decompressing {} ({} bytes) with {}", file, data.len(), codec.name());

    let mut report = |pct: u8| debug!("{}: {}%", file, pct);
    let output = codec
        .decompress(&data, Some(&mut report))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    fs::write(out_name, &output)?;
    info!("Wrote {} ({} bytes)", out_name, output.len());

    if !args.keep {
        fs::remove_file(file)?;
    }
    Ok(())
}

fn check_overwrite(name: &str, force: bool) -> Result<(), io::Error> {
    if Path::new(name).exists() {
        if !force {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "output file exists, use --force to overwrite",
            ));
        }
        warn!("Overwriting {}", name);
    }
    Ok(())
}

fn ratio(packed: usize, original: usize) -> f64 {
    if original == 0 {
        return 100.0;
    }
    packed as f64 * 100.0 / original as f64
}
