use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, Command};
use image::Rgb;
use seamcarve::{compute_energy_with, CarveOrder, EnergyConfig, GradientNorm, Image, LumaWeights, SeamCarver};
use std::path::PathBuf;
use tracing::{info, Level};

fn cli() -> Command {
    Command::new("seamcarve")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Content-aware image narrowing by seam carving")
        .arg(
            Arg::new("input")
                .help("The image to carve")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("output")
                .help("Where to write the result; the format follows the extension")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .index(2),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .help("Target width in pixels")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .help("Target height in pixels")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("scale")
                .long("scale")
                .help("Target width as a fraction of the original, e.g. 0.85")
                .value_parser(value_parser!(f64))
                .conflicts_with("width"),
        )
        .arg(
            Arg::new("order")
                .long("order")
                .help("Which dimension to reduce first")
                .value_parser(["width-first", "height-first", "alternate"])
                .default_value("width-first"),
        )
        .arg(
            Arg::new("norm")
                .long("norm")
                .help("How the two Sobel responses are combined")
                .value_parser(["l1", "l2"])
                .default_value("l2"),
        )
        .arg(
            Arg::new("luma")
                .long("luma")
                .help("Brightness weights")
                .value_parser(["bt709", "ntsc"])
                .default_value("bt709"),
        )
        .arg(
            Arg::new("energy-map")
                .long("energy-map")
                .help("Write the energy field as a greyscale image instead of carving")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("More logging; repeat for more")
                .action(ArgAction::Count),
        )
}

fn choice<'a>(matches: &'a clap::ArgMatches, name: &str) -> &'a str {
    matches.get_one::<String>(name).map(String::as_str).unwrap_or_default()
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    let level = match matches.get_count("verbose") {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let input = matches.get_one::<PathBuf>("input").context("missing input path")?;
    let output = matches.get_one::<PathBuf>("output").context("missing output path")?;

    let config = EnergyConfig::new()
        .with_norm(match choice(&matches, "norm") {
            "l1" => GradientNorm::L1,
            _ => GradientNorm::L2,
        })
        .with_luma(match choice(&matches, "luma") {
            "ntsc" => LumaWeights::Ntsc,
            _ => LumaWeights::Bt709,
        });
    let order = match choice(&matches, "order") {
        "height-first" => CarveOrder::HeightFirst,
        "alternate" => CarveOrder::Alternate,
        _ => CarveOrder::WidthFirst,
    };

    let rgb = image::open(input)
        .with_context(|| format!("could not load {}", input.display()))?
        .to_rgb8();
    let source = Image::from_view(&rgb)?;
    let (width, height) = source.dimensions();
    info!(width, height, path = %input.display(), "loaded");

    if matches.get_flag("energy-map") {
        let energy = compute_energy_with(&source, &config)?;
        energy
            .to_gray_image()
            .save(output)
            .with_context(|| format!("could not write {}", output.display()))?;
        return Ok(());
    }

    let new_width = match (matches.get_one::<usize>("width"), matches.get_one::<f64>("scale")) {
        (Some(&w), _) => w,
        (None, Some(&scale)) => {
            if !(scale > 0.0 && scale <= 1.0) {
                bail!("--scale must be in (0, 1], got {}", scale);
            }
            ((width as f64 * scale) as usize).max(1)
        }
        (None, None) => width,
    };
    let new_height = matches.get_one::<usize>("height").copied().unwrap_or(height);

    let carved = SeamCarver::new(config).resize(&source, new_width, new_height, order)?;
    info!(width = carved.width(), height = carved.height(), "carved");

    carved
        .to_buffer::<Rgb<u8>>()?
        .save(output)
        .with_context(|| format!("could not write {}", output.display()))?;
    Ok(())
}
