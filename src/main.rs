use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;

use rawcheck::io::{create_progress_bar, RawImageReader};
use rawcheck::parallel::ParallelProcessor;
use rawcheck::LogObserver;

#[derive(Parser, Debug)]
#[command(name = "rawcheck")]
#[command(about = "Verify EDC/ECC and subchannel CRCs of raw (2352/2448) CD images", long_about = None)]
struct Args {
    /// Input raw image path
    #[arg(value_name = "IMAGE")]
    input: PathBuf,

    /// Bytes per sector (2352, or 2448 with subchannel); detected from the file size if omitted
    #[arg(short, long)]
    sector_size: Option<usize>,

    /// Number of worker threads (defaults to number of CPU cores)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Disable progress bar
    #[arg(short, long)]
    quiet: bool,

    /// Print the address of every invalid sector
    #[arg(short, long)]
    list_invalid: bool,

    /// Exit with an error if any sector is invalid
    #[arg(long)]
    strict: bool,

    /// Log per-sector mismatch details
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    let start_time = Instant::now();

    let reader = RawImageReader::new(&args.input, args.sector_size)?;
    let total_sectors = reader.total_sectors();

    println!(
        "Checking {} ({} sectors of {} bytes)",
        args.input.display(),
        total_sectors,
        reader.sector_size()
    );

    let progress = if !args.quiet {
        Some(create_progress_bar(total_sectors))
    } else {
        None
    };

    let processor = ParallelProcessor::new(args.threads);
    log::debug!("Using {} worker threads", processor.num_workers());

    let summary = processor.verify_image(&reader, &LogObserver, |done| {
        if let Some(ref pb) = progress {
            pb.inc(done as u64);
        }
    })?;

    if let Some(ref pb) = progress {
        pb.finish_with_message("Verification complete");
    }

    let elapsed = start_time.elapsed();
    let mb_per_sec = (total_sectors * reader.sector_size()) as f64
        / (1024.0 * 1024.0)
        / elapsed.as_secs_f64();

    println!("\n{summary}");

    if args.list_invalid && !summary.invalid_sectors.is_empty() {
        println!("\nInvalid sectors:");
        for &index in &summary.invalid_sectors {
            if let Some(address) = reader.sector_address(index) {
                println!("  {index:>8}  {address}");
            }
        }
    }

    println!("\nChecked in {:.2?} ({:.2} MB/s)", elapsed, mb_per_sec);

    if args.strict && summary.invalid > 0 {
        anyhow::bail!("{} invalid sectors found", summary.invalid);
    }

    Ok(())
}
