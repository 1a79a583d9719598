// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use clap::Args;
use futures::stream::{self, StreamExt};
use kdam::BarExt;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use tessera_core::constant;
use tessera_core::error::TesseraError;
use tessera_core::geom::GeoClipper;
use tessera_core::split::{SplitConfig, SplitSummary, split_image};
use tessera_core::ut;
use tessera_core::ut::path::YoloLayout;
use tessera_core::ut::track::LogLevel;

#[derive(Debug, Args)]
#[command(about = "Split labelled images into overlapping patches with remapped polygons.")]
pub struct SplitArgs {
    #[arg(help = "Dataset folder containing images/ and labels/ directories.", required = true)]
    pub folder: String,

    #[arg(
        short = 'e',
        long,
        help = "Extension of the source images.",
        default_value = constant::DEFAULT_SOURCE_EXTENSION
    )]
    pub extension: String,

    #[arg(
        short = 's',
        long,
        help = "Tile side length in pixels.",
        default_value_t = constant::DEFAULT_TILE_SIZE
    )]
    pub tile_size: u32,

    #[arg(
        long,
        help = "Overlap between adjacent tiles in pixels.",
        default_value_t = constant::DEFAULT_OVERLAP
    )]
    pub overlap: u32,

    #[arg(
        short = 'f',
        long,
        help = "Pixel value used to pad the bottom and right borders.",
        default_value_t = constant::DEFAULT_FILL
    )]
    pub fill: f64,

    #[arg(
        short = 'i',
        long,
        help = "Format to save patch images (e.g. jpg, png).",
        default_value = constant::DEFAULT_IMAGE_FORMAT
    )]
    pub image_format: String,

    #[arg(short = 'd', long, help = "Also save patches with polygon overlays.")]
    pub draw: bool,

    #[arg(short = 'o', long, help = "Output directory (default: <folder>/split).")]
    pub output: Option<String>,

    #[arg(short = 'r', long, help = "Report directory (default: output directory).")]
    pub report: Option<String>,

    #[arg(short = 't', long, help = "Number of threads.")]
    pub threads: Option<usize>,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,

    #[arg(
        short = 'l',
        long,
        help = "Log level. One of error, warning, info, debug.",
        default_value = "info"
    )]
    pub log_level: String,
}

pub fn split(args: &SplitArgs) {
    let level = LogLevel::from_str(&args.log_level).unwrap_or_else(|err| {
        eprintln!("[tessera::split] ERROR: {}", err);
        std::process::exit(1);
    });

    ut::track::set_log_level(level);

    let threads = if let Some(t) = args.threads {
        t
    } else {
        std::thread::available_parallelism().unwrap_or_else(|_| {
            eprintln!("[tessera::split] Could not automatically assign number of tasks. Please manually set the --threads (-t) argument.");
            std::process::exit(1);
        }).get()
    };

    if threads < 1 {
        eprintln!("[tessera::split] ERROR: threads cannot be less than 1.");
        std::process::exit(1);
    }

    let config = SplitConfig {
        tile_size: args.tile_size,
        overlap: args.overlap,
        fill: args.fill,
        image_format: args.image_format.to_owned(),
        draw: args.draw,
        ..SplitConfig::default()
    };

    if let Err(err) = config.validate() {
        eprintln!("[tessera::split] ERROR: {}", err);
        std::process::exit(1);
    }

    let folder = PathBuf::from(&args.folder);

    if !folder.is_dir() {
        eprintln!(
            "[tessera::split] ERROR: Dataset folder {} does not exist.",
            folder.display()
        );
        std::process::exit(1);
    }

    let output = args
        .output
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| folder.join(constant::SPLIT_DIR));

    let layout = match &args.output {
        Some(root) => YoloLayout::default().with_output_root(root),
        None => YoloLayout::default(),
    };

    let image_files = ut::path::collect_image_paths(&folder, &args.extension, &layout)
        .unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(1);
        });

    if image_files.is_empty() {
        eprintln!(
            "[tessera::split] ERROR: No .{} images were detected in {}.",
            args.extension,
            folder.display()
        );
        std::process::exit(1);
    }

    ut::track::progress_log(
        &format!(
            "Detected {} images.",
            ut::track::thousands_format(image_files.len())
        ),
        args.verbose,
    );

    let rt = tokio::runtime::Runtime::new().unwrap_or_else(|err| {
        eprintln!("[tessera::split] ERROR: Could not start runtime. {}", err);
        std::process::exit(1);
    });

    let results = rt.block_on(run_all(
        image_files,
        Arc::new(config),
        Arc::new(layout),
        threads,
        args.verbose,
    ));

    let patches: Mutex<usize> = Mutex::new(0);
    let success: Mutex<Vec<(String, String)>> = Mutex::new(vec![]);
    let failure: Mutex<Vec<(String, String)>> = Mutex::new(Vec::with_capacity(results.len()));
    let dropped: Mutex<Vec<(String, String)>> = Mutex::new(vec![]);

    results.into_par_iter().for_each(|(id, run)| match run {
        Ok(summary) => {
            if let Ok(mut n) = patches.lock() {
                *n += summary.patches;
            }

            if let Ok(mut dropped) = dropped.lock() {
                dropped.push((id.clone(), diagnostic_rows(&id, &summary)));
            }

            if let Ok(mut success) = success.lock() {
                success.push((
                    id.clone(),
                    format!("{}\t{}\t{}", id, summary.patches, summary.annotations),
                ));
            }
        }
        Err(err) => {
            ut::track::error(&format!("{} | {}", id, err));

            if let Ok(mut failure) = failure.lock() {
                failure.push((id.clone(), format!("{}\t{}", id, err)));
            }
        }
    });

    let patches = patches.into_inner().unwrap_or_default();
    let success = sorted_rows(success.into_inner().unwrap_or_default());
    let failure = sorted_rows(failure.into_inner().unwrap_or_default());
    let dropped = sorted_rows(dropped.into_inner().unwrap_or_default());

    if args.verbose {
        println!();
    }

    ut::track::progress_log(
        &format!(
            "Complete. {} patches written from {} images.",
            ut::track::thousands_format(patches),
            ut::track::thousands_format(success.len())
        ),
        args.verbose,
    );

    let report = args.report.as_ref().map(PathBuf::from).unwrap_or(output);

    if let Err(err) = write_reports(&report, &success, &failure, &dropped) {
        eprintln!("[tessera::split] ERROR: {}", err);
        std::process::exit(1);
    }

    if !failure.is_empty() {
        eprintln!(
            "[tessera::split] ERROR: {} of {} images failed. See {}.",
            failure.len(),
            failure.len() + success.len(),
            report.join(constant::REPORT_ERRORS).display()
        );
        std::process::exit(1);
    }
}

fn diagnostic_rows(id: &str, summary: &SplitSummary) -> String {
    summary
        .diagnostics
        .iter()
        .map(|record| {
            format!(
                "{}\t{}\t{}\t{}",
                id,
                record.patch,
                record.diagnostic.kind(),
                record.raw
            )
        })
        .collect::<Vec<String>>()
        .join("\n")
}

fn sorted_rows(mut rows: Vec<(String, String)>) -> Vec<String> {
    rows.sort_by(|a, b| a.0.cmp(&b.0));
    rows.into_iter()
        .map(|(_, row)| row)
        .filter(|row| !row.is_empty())
        .collect()
}

fn write_reports(
    report: &Path,
    success: &[String],
    failure: &[String],
    dropped: &[String],
) -> Result<(), TesseraError> {
    std::fs::create_dir_all(report)
        .map_err(|err| TesseraError::DirError(format!("{}: {}", report.display(), err)))?;

    for (name, rows) in [
        (constant::REPORT_COUNTS, success),
        (constant::REPORT_ERRORS, failure),
        (constant::REPORT_DIAGNOSTICS, dropped),
    ] {
        if rows.is_empty() {
            continue;
        }

        let path = report.join(name);
        std::fs::write(&path, rows.join("\n") + "\n")
            .map_err(|err| TesseraError::OtherError(format!("{}: {}", path.display(), err)))?;
    }

    Ok(())
}

pub async fn run_all(
    images: Vec<PathBuf>,
    config: Arc<SplitConfig>,
    layout: Arc<YoloLayout>,
    threads: usize,
    verbose: bool,
) -> Vec<(String, Result<SplitSummary, TesseraError>)> {
    let pb = Arc::new(Mutex::new(ut::track::progress_bar(
        images.len(),
        "Splitting",
        verbose,
    )));

    stream::iter(images)
        .map(|image| {
            let config = config.clone();
            let layout = layout.clone();
            let pb_clone = pb.clone();

            async move {
                let id = image.display().to_string();
                let result = tokio::task::spawn_blocking(move || {
                    split_image(&image, &config, layout.as_ref(), &GeoClipper)
                })
                .await
                .unwrap_or_else(|_| {
                    Err(TesseraError::OtherError(
                        "Failed to split image.".to_string(),
                    ))
                });

                if verbose {
                    if let Ok(mut pb) = pb_clone.lock() {
                        let _ = pb.update(1);
                    }
                }

                (id, result)
            }
        })
        .buffer_unordered(threads)
        .collect::<Vec<_>>()
        .await
}
