pub mod common;
pub mod config;
pub mod curve;
pub mod field;
pub mod plot;
pub mod point;
pub mod report;
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use config::{parse_point, Config};
use log::info;
use plot::Plot;
use point::Point;
use report::Report;
use std::{io, io::Write, path::Path};

/// Point groups of y^2 = x^3 + ax + b over a small prime field.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Alternative config file location, default to ~/.config/ecgroup/config.toml
    #[arg(short, long)]
    config: Option<String>,
    /// Prime modulus, overrides the config.
    #[arg(short, long, allow_negative_numbers = true)]
    prime: Option<i64>,
    /// Coefficient a, overrides the config.
    #[arg(short, allow_negative_numbers = true)]
    a: Option<i64>,
    /// Coefficient b, overrides the config.
    #[arg(short, allow_negative_numbers = true)]
    b: Option<i64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the field and the curve.
    Info,
    /// List every point of the curve.
    Points,
    /// Print the subgroup generated by one point.
    Group {
        /// `x,y` or `inf`, default to the config origin.
        #[arg(short, long, value_parser = parse_point)]
        origin: Option<Point>,
    },
    /// Print the subgroup generated by every point.
    Groups,
    /// Emit chart data of the subgroup generated by one point, as TOML.
    Plot {
        /// `x,y` or `inf`, default to the config origin.
        #[arg(short, long, value_parser = parse_point)]
        origin: Option<Point>,
    },
}

fn pick_origin(origin: Option<Point>, config: &Config) -> Result<Point> {
    match origin {
        Some(origin) => Ok(origin),
        None => config
            .origin()?
            .ok_or_else(|| anyhow!("no origin given and none in config")),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = Config::load(args.config.as_deref().map(Path::new))?
        .with_overrides(args.prime, args.a, args.b);
    let field = config.field()?;
    let curve = config.curve();
    info!("{} / {}", field, curve);

    let stdout = io::stdout();
    let mut report = Report::new(stdout.lock());
    match args.command {
        Command::Info => report.print_infos(&field, &curve)?,
        Command::Points => {
            report.print_infos(&field, &curve)?;
            report.print_valid_points(&field, &curve)?;
        }
        Command::Group { origin } => {
            let origin = pick_origin(origin, &config)?;
            report.print_group(&field, &curve, origin)?;
        }
        Command::Groups => report.print_all_groups(&field, &curve)?,
        Command::Plot { origin } => {
            let origin = pick_origin(origin, &config)?;
            let plot = Plot::build(&field, &curve, origin)?;
            let mut out = report.into_inner();
            write!(out, "{}", plot.to_toml()?)?;
        }
    }
    Ok(())
}

#[test]
fn test_args() {
    let args = Args::try_parse_from(["ecgroup", "-p", "31", "-a", "-3", "group", "--origin", "25,16"])
        .unwrap();
    assert_eq!(args.prime, Some(31));
    assert_eq!(args.a, Some(-3));
    assert_eq!(args.b, None);
    match args.command {
        Command::Group { origin } => assert_eq!(origin, Some(Point::new(25, 16))),
        c => panic!("unexpected command {:?}", c),
    }
    assert!(Args::try_parse_from(["ecgroup", "plot", "-o", "x"]).is_err());
}

#[test]
fn test_pick_origin() {
    let config = Config::default();
    assert_eq!(pick_origin(None, &config).unwrap(), Point::new(4, 4));
    assert_eq!(
        pick_origin(Some(Point::Infinity), &config).unwrap(),
        Point::Infinity
    );
    let config = Config {
        origin: None,
        ..Config::default()
    };
    assert!(pick_origin(None, &config).is_err());
    let config = Config {
        origin: Some("inf".to_owned()),
        ..Config::default()
    };
    assert_eq!(pick_origin(None, &config).unwrap(), Point::Infinity);
}

#[test]
fn verify_cli() {
    use clap::CommandFactory;
    Args::command().debug_assert();
}
