use clap::Parser;
use image::DynamicImage;
use screenmatch::image::io::{load_luma, luma_from_dynamic, open_image, to_gray_image};
use screenmatch::{
    CollaboratorError, Direction, EdgeParams, EdgeStrategy, Locator, MatchBox, Point,
    ReferenceResolver, ScreenCapture, ScreenMatchError, Session, Settings, StrategyConfig,
    StrategyKind,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "ScreenMatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
enum ModeConfig {
    Locate,
    LocateAll,
    Exists,
    LocateRelative,
    WaitFor,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum StrategyConfigJson {
    Exact,
    Edge,
}

impl From<StrategyConfigJson> for StrategyKind {
    fn from(value: StrategyConfigJson) -> Self {
        match value {
            StrategyConfigJson::Exact => StrategyKind::Exact,
            StrategyConfigJson::Edge => StrategyKind::Edge,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct EdgeConfigJson {
    sigma: f32,
    low_threshold: f32,
    high_threshold: f32,
}

impl Default for EdgeConfigJson {
    fn default() -> Self {
        let params = EdgeParams::default();
        Self {
            sigma: params.sigma,
            low_threshold: params.low_threshold,
            high_threshold: params.high_threshold,
        }
    }
}

impl From<&EdgeConfigJson> for EdgeParams {
    fn from(value: &EdgeConfigJson) -> Self {
        Self {
            sigma: value.sigma,
            low_threshold: value.low_threshold,
            high_threshold: value.high_threshold,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    reference_root: String,
    haystack_path: String,
    spec: String,
    mode: ModeConfig,
    strategy: StrategyConfigJson,
    confidence: Option<f32>,
    edge: EdgeConfigJson,
    high_density_display: bool,
    direction: String,
    pixels: i32,
    timeout_secs: f64,
    dump_dir: Option<String>,
    output_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_root: String::new(),
            haystack_path: String::new(),
            spec: String::new(),
            mode: ModeConfig::Locate,
            strategy: StrategyConfigJson::Exact,
            confidence: None,
            edge: EdgeConfigJson::default(),
            high_density_display: false,
            direction: "right".to_string(),
            pixels: 0,
            timeout_secs: 10.0,
            dump_dir: None,
            output_path: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct BoxRecord {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    score: f32,
}

impl From<MatchBox> for BoxRecord {
    fn from(value: MatchBox) -> Self {
        Self {
            x: value.x,
            y: value.y,
            width: value.width,
            height: value.height,
            score: value.score,
        }
    }
}

#[derive(Debug, Serialize)]
struct PointRecord {
    x: f64,
    y: f64,
}

impl From<Point> for PointRecord {
    fn from(value: Point) -> Self {
        Self {
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    spec: String,
    strategy: String,
    mode: ModeConfig,
    found: bool,
    matches: Vec<BoxRecord>,
    point: Option<PointRecord>,
}

/// Serves the haystack from an image file, re-read on every capture, so a
/// `wait_for` run sees the file being replaced by an external screenshotter.
struct FileCapture {
    path: PathBuf,
}

impl ScreenCapture for FileCapture {
    fn capture(&mut self) -> Result<DynamicImage, CollaboratorError> {
        Ok(open_image(&self.path)?)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("screenmatch=debug".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.reference_root.is_empty()
        || config.haystack_path.is_empty()
        || config.spec.is_empty()
    {
        return Err("reference_root, haystack_path and spec must be set in the config".into());
    }

    let session = Session::new(Settings {
        reference_root: Some(PathBuf::from(&config.reference_root)),
        strategy: StrategyConfig {
            kind: config.strategy.into(),
            edge: EdgeParams::from(&config.edge),
        },
        confidence: config.confidence,
        high_density_display: config.high_density_display,
    })?;

    if let Some(dir) = config.dump_dir.as_deref() {
        dump_edge_analysis(&session, &config, Path::new(dir))?;
    }

    let mut locator = Locator::new(FileCapture {
        path: PathBuf::from(&config.haystack_path),
    });
    let mut output = Output {
        spec: config.spec.clone(),
        strategy: session.strategy().kind.to_string(),
        mode: config.mode,
        found: false,
        matches: Vec::new(),
        point: None,
    };

    match config.mode {
        ModeConfig::Locate => match locator.locate(&session, &config.spec, None) {
            Ok(location) => {
                output.found = true;
                output.matches.push(location.bounds.into());
                output.point = Some(location.center.into());
            }
            Err(ScreenMatchError::NotFound { .. }) => {}
            Err(err) => return Err(err.into()),
        },
        ModeConfig::LocateAll => {
            let boxes = locator.locate_all(&session, &config.spec, None)?;
            output.found = !boxes.is_empty();
            output.matches = boxes.into_iter().map(BoxRecord::from).collect();
        }
        ModeConfig::Exists => {
            output.found = locator.exists(&session, &config.spec);
        }
        ModeConfig::LocateRelative => {
            let direction: Direction = config.direction.parse()?;
            match locator.locate_relative(&session, &config.spec, direction, config.pixels) {
                Ok(point) => {
                    output.found = true;
                    output.point = Some(point.into());
                }
                Err(ScreenMatchError::NotFound { .. }) => {}
                Err(err) => return Err(err.into()),
            }
        }
        ModeConfig::WaitFor => {
            let timeout = Duration::try_from_secs_f64(config.timeout_secs)
                .map_err(|err| format!("invalid timeout_secs {}: {err}", config.timeout_secs))?;
            match locator.wait_for(&session, &config.spec, timeout) {
                Ok(location) => {
                    output.found = true;
                    output.matches.push(location.bounds.into());
                    output.point = Some(location.center.into());
                }
                Err(ScreenMatchError::NotFound { .. }) => {}
                Err(err) => return Err(err.into()),
            }
        }
    }

    let json = serde_json::to_string_pretty(&output)?;
    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}

/// Writes the edge maps and correlation surface of every candidate.
fn dump_edge_analysis(
    session: &Session,
    config: &Config,
    dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if session.strategy().kind != StrategyKind::Edge {
        tracing::warn!("dump_dir is only used by the edge strategy");
        return Ok(());
    }
    fs::create_dir_all(dir)?;

    let strategy = EdgeStrategy::new(session.strategy().edge, session.effective_confidence());
    let haystack = luma_from_dynamic(&open_image(&config.haystack_path)?)?;
    let candidates = ReferenceResolver::new(session.reference_root()).list_candidates(&config.spec)?;
    for (idx, path) in candidates.iter().enumerate() {
        let needle = load_luma(path)?;
        let analysis = strategy.analyze(&needle, &haystack)?;
        let stem = format!("{idx:02}");
        to_gray_image(&analysis.needle_edges, 0.0, 1.0)
            .save(dir.join(format!("{stem}_needle_edges.png")))?;
        to_gray_image(&analysis.haystack_edges, 0.0, 1.0)
            .save(dir.join(format!("{stem}_haystack_edges.png")))?;
        if let Some(surface) = analysis.surface.as_ref() {
            to_gray_image(surface, -1.0, 1.0).save(dir.join(format!("{stem}_surface.png")))?;
        }
        tracing::info!("dumped edge analysis of {} to {}", path.display(), dir.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Config, ModeConfig, EXAMPLE_JSON};

    #[test]
    fn example_config_parses() {
        let config: Config = serde_json::from_str(EXAMPLE_JSON).unwrap();
        assert!(matches!(config.mode, ModeConfig::Locate));
        assert_eq!(config.timeout_secs, 10.0);
    }

    #[test]
    fn wait_for_mode_reads_timeout() {
        let config: Config =
            serde_json::from_str(r#"{"mode": "wait_for", "timeout_secs": 2.5}"#).unwrap();
        assert!(matches!(config.mode, ModeConfig::WaitFor));
        assert_eq!(config.timeout_secs, 2.5);
    }
}
