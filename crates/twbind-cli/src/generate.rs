//! Generate command - header discovery, parsing and rendering

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use twbind_codegen::{CodeGenerator, GeneratorConfig, Language, RenderReport, RenderUnit};

/// Configuration file picked up from the working directory.
pub const DEFAULT_CONFIG: &str = "twbind.toml";

/// Command-line options for `twbind generate`.
#[derive(Debug, Default)]
pub struct GenerateOptions {
    pub config: Option<PathBuf>,
    pub include: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub languages: Vec<Language>,
    pub keep_going: bool,
}

/// Units that parsed, plus the headers that did not.
#[derive(Debug, Default)]
pub struct ParsedHeaders {
    pub units: Vec<RenderUnit>,
    pub failed: Vec<PathBuf>,
}

/// Run the generate command.
pub fn run(options: GenerateOptions) -> Result<()> {
    let config = load_config(&options)?;
    let headers = discover_headers(&config.include_dir)?;
    tracing::info!(
        count = headers.len(),
        include_dir = %config.include_dir.display(),
        "discovered headers"
    );

    let parsed = parse_headers(&headers, options.keep_going)?;
    let reports = CodeGenerator::from_config(&config)
        .render_all(&parsed.units)
        .context("Failed to render bindings")?;

    for report in &reports {
        println!("{}", summarize_report(report));
    }

    if !parsed.failed.is_empty() {
        bail!("{} header(s) failed to parse", parsed.failed.len());
    }

    Ok(())
}

/// Load the configuration file and apply command-line overrides.
pub fn load_config(options: &GenerateOptions) -> Result<GeneratorConfig> {
    let mut config = match &options.config {
        Some(path) => GeneratorConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG).is_file() => GeneratorConfig::from_file(DEFAULT_CONFIG)
            .with_context(|| format!("Failed to load config: {DEFAULT_CONFIG}"))?,
        None => GeneratorConfig::default(),
    };

    if let Some(include) = &options.include {
        config.include_dir = include.clone();
    }
    if let Some(output) = &options.output {
        config.output_dir = output.clone();
    }
    if !options.languages.is_empty() {
        config.languages = options.languages.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Every `*.h` file directly under `dir`, sorted by file name.
pub fn discover_headers(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read include directory: {}", dir.display()))?;

    let mut headers = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read include directory: {}", dir.display()))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "h") {
            headers.push(path);
        }
    }

    headers.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(headers)
}

/// Parse each header into a render unit.
///
/// Stops at the first failure unless `keep_going` is set, in which case
/// failures are logged and collected.
pub fn parse_headers(headers: &[PathBuf], keep_going: bool) -> Result<ParsedHeaders> {
    let mut parsed = ParsedHeaders::default();

    for header in headers {
        match twbind_core::parse_file(header) {
            Ok(Some(declaration)) => {
                tracing::info!(
                    header = %header.display(),
                    kind = %declaration.kind(),
                    name = declaration.name(),
                    "parsed declaration"
                );
                parsed
                    .units
                    .push(RenderUnit::from_header(declaration, header));
            }
            Ok(None) => {
                tracing::debug!(header = %header.display(), "no exported declaration");
            }
            Err(err) if keep_going => {
                tracing::error!(header = %header.display(), error = %err, "skipping header");
                parsed.failed.push(header.clone());
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to parse header: {}", header.display()));
            }
        }
    }

    Ok(parsed)
}

/// One line describing what a language run produced.
pub fn summarize_report(report: &RenderReport) -> String {
    let mut line = format!(
        "{}: {} file(s) written",
        report.language,
        report.written.len()
    );
    if !report.skipped.is_empty() {
        line.push_str(&format!(", {} skipped", report.skipped.len()));
    }
    if let Some(umbrella) = &report.umbrella {
        line.push_str(&format!(", umbrella {}", umbrella.display()));
    }
    line
}
