//! Command-line interface for generating styled QR codes.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use qrism::{QrOptions, QrStyling};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Svg,
    Png,
}

/// Generate a styled QR code as SVG or PNG.
#[derive(Parser, Debug)]
#[command(name = "qrism", version, about)]
struct Cli {
    /// Data to encode
    data: String,

    /// Output file path
    #[arg(short, long, default_value = "qr-code.svg")]
    output: PathBuf,

    /// Output format; inferred from the output extension when omitted
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Foreground color
    #[arg(long, default_value = "#000000")]
    color: String,

    /// Background color
    #[arg(long, default_value = "transparent")]
    bg: String,

    /// Corner radius, 0 (sharp) to 1 (fully rounded)
    #[arg(long, default_value_t = 1.0)]
    radius: f64,

    /// Padding in modules
    #[arg(long, default_value_t = 1)]
    padding: u32,

    /// Logo image path, URL, or data URI
    #[arg(long)]
    logo: Option<String>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => {
            println!("QR code saved to {}", cli.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error generating QR code: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), qrism::Error> {
    let options = QrOptions {
        radius: cli.radius,
        padding: cli.padding,
        foreground_color: cli.color.clone(),
        background_color: cli.bg.clone(),
        has_logo: cli.logo.is_some(),
        logo_url: cli.logo.clone(),
        ..QrOptions::default()
    };
    let qr = QrStyling::new(cli.data.clone(), options);

    match cli.format {
        Some(Format::Svg) => std::fs::write(&cli.output, qr.svg()?)?,
        Some(Format::Png) => qr.bitmap()?.save(&cli.output)?,
        None => qr.save(&cli.output)?,
    }
    Ok(())
}
