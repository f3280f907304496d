//! Lumen - headless progressive renderer.
//!
//! Builds or loads a scene, runs the requested number of progressive passes
//! and writes the final frame as a PNG.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use lumen_core::{demo_scene, load_scene, save_scene};
use lumen_renderer::{ProgressiveRenderer, RenderConfig};

/// Command line options
struct Options {
    width: u32,
    height: u32,
    samples: u32,
    config: RenderConfig,
    scene: Option<PathBuf>,
    output: PathBuf,
    dump_scene: Option<PathBuf>,
    log_level: log::LevelFilter,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            width: 560,
            height: 384,
            samples: 64,
            config: RenderConfig::default(),
            scene: None,
            output: PathBuf::from("lumen.png"),
            dump_scene: None,
            log_level: log::LevelFilter::Info,
        }
    }
}

enum Command {
    Render(Options),
    Help,
}

fn parse_args(args: &[String]) -> Result<Command> {
    let mut options = Options::default();

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-h" | "--help" => return Ok(Command::Help),
            "-v" | "--verbose" => options.log_level = log::LevelFilter::Debug,
            "-q" | "--quiet" => options.log_level = log::LevelFilter::Warn,
            _ => {
                let value = args
                    .get(i + 1)
                    .with_context(|| format!("Missing value for {}", flag))?;
                match flag {
                    "--width" => options.width = parse_value(flag, value)?,
                    "--height" => options.height = parse_value(flag, value)?,
                    "--samples" => options.samples = parse_value(flag, value)?,
                    "--depth" => options.config.max_depth = parse_value(flag, value)?,
                    "--seed" => options.config.seed = parse_value(flag, value)?,
                    "--scene" => options.scene = Some(PathBuf::from(value)),
                    "--output" => options.output = PathBuf::from(value),
                    "--dump-scene" => options.dump_scene = Some(PathBuf::from(value)),
                    _ => bail!("Unknown option: {}", flag),
                }
                i += 1;
            }
        }
        i += 1;
    }

    if options.width == 0 || options.height == 0 {
        bail!("Image size must be non-zero, got {}x{}", options.width, options.height);
    }
    Ok(Command::Render(options))
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T> {
    value
        .parse()
        .ok()
        .with_context(|| format!("Invalid value for {}: {}", flag, value))
}

fn print_help() {
    println!("Lumen - progressive path tracer");
    println!();
    println!("Usage: lumen [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --width <PX>          Image width (default: 560)");
    println!("  --height <PX>         Image height (default: 384)");
    println!("  --samples <N>         Progressive passes to run (default: 64)");
    println!("  --depth <N>           Maximum bounce count (default: 10)");
    println!("  --seed <N>            Random seed");
    println!("  --scene <FILE>        Scene JSON to render (default: built-in demo scene)");
    println!("  --output <FILE>       PNG to write (default: lumen.png)");
    println!("  --dump-scene <FILE>   Write the scene as JSON before rendering");
    println!("  -v, --verbose         Debug logging");
    println!("  -q, --quiet           Warnings only");
    println!("  -h, --help            Show this help");
}

fn run(options: Options) -> Result<()> {
    let scene = match &options.scene {
        Some(path) => load_scene(path).with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => demo_scene(),
    };
    log::info!("Scene has {} entities", scene.entity_count());

    if let Some(path) = &options.dump_scene {
        save_scene(&scene, path).with_context(|| format!("Failed to write scene {}", path.display()))?;
        log::info!("Wrote scene to {}", path.display());
    }

    let mut renderer = ProgressiveRenderer::new(options.config);
    renderer.configure_viewport(options.width, options.height);

    log::info!(
        "Rendering {}x{} with {} samples, depth {}",
        options.width,
        options.height,
        options.samples,
        renderer.config().max_depth
    );

    let start = Instant::now();
    let mut frame = None;
    for sample in 1..=options.samples.max(1) {
        frame = Some(renderer.render_sample(sample, &scene));
        if sample.is_power_of_two() {
            log::info!("Sample {} done after {:.2?}", sample, start.elapsed());
        }
    }
    log::info!("Rendered in {:.2?}", start.elapsed());

    let image = frame
        .and_then(|frame| frame.to_image())
        .context("Renderer produced no frame")?;
    image
        .save(&options.output)
        .with_context(|| format!("Failed to write {}", options.output.display()))?;
    log::info!("Saved {}", options.output.display());

    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args)? {
        Command::Help => {
            print_help();
            return Ok(());
        }
        Command::Render(options) => options,
    };

    env_logger::Builder::from_default_env()
        .filter_level(options.log_level)
        .init();

    run(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let Command::Render(options) = parse_args(&[]).unwrap() else {
            panic!("expected render command");
        };
        assert_eq!((options.width, options.height), (560, 384));
        assert_eq!(options.config.max_depth, 10);
        assert!(options.scene.is_none());
    }

    #[test]
    fn test_flags() {
        let parsed = parse_args(&args(&[
            "--width", "64", "--height", "32", "--samples", "4", "--depth", "2", "--seed", "7",
            "--output", "out.png", "-q",
        ]))
        .unwrap();
        let Command::Render(options) = parsed else {
            panic!("expected render command");
        };
        assert_eq!((options.width, options.height, options.samples), (64, 32, 4));
        assert_eq!(options.config.max_depth, 2);
        assert_eq!(options.config.seed, 7);
        assert_eq!(options.output, PathBuf::from("out.png"));
        assert_eq!(options.log_level, log::LevelFilter::Warn);
    }

    #[test]
    fn test_bad_input() {
        assert!(parse_args(&args(&["--width"])).is_err());
        assert!(parse_args(&args(&["--width", "wide"])).is_err());
        assert!(parse_args(&args(&["--height", "0"])).is_err());
        assert!(parse_args(&args(&["--frobnicate", "1"])).is_err());
    }

    #[test]
    fn test_help() {
        assert!(matches!(parse_args(&args(&["--help"])).unwrap(), Command::Help));
    }
}
