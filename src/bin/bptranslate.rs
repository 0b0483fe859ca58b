//! CLI binary for blueprint-translate.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `TranslationConfig` and reports where the pages went.

use anyhow::{Context, Result};
use blueprint_translate::{
    translate_pdf, IdentityTranslator, OcrSettings, PageResult, PageSelection,
    PlaceholderTranslator, ProgressCallback, RegionOrder, TranslationConfig,
    TranslationProgressCallback, Translator,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a bar at the bottom of the terminal with the
/// per-page lines printed above it.
struct CliProgressCallback {
    bar: ProgressBar,
    page_started: Mutex<Option<Instant>>,
    /// Regions replaced so far, shown in the bar message.
    replaced: AtomicUsize,
}

impl CliProgressCallback {
    /// Spinner until `on_conversion_start` tells us the page count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            page_started: Mutex::new(None),
            replaced: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Translating");
        self.bar.reset_eta();
    }
}

impl TranslationProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize, input: &Path) {
        self.activate_bar(total_pages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!(
                "Processing {total_pages} pages from '{}'...",
                input.display()
            ))
        ));
    }

    fn on_page_start(&self, page_num: usize, _total_pages: usize) {
        if let Ok(mut started) = self.page_started.lock() {
            *started = Some(Instant::now());
        }
        self.bar.set_message(format!(
            "page {page_num}: OCR  ({} regions replaced)",
            self.replaced.load(Ordering::SeqCst)
        ));
        self.bar
            .println(format!("  Page {page_num}: Performing OCR..."));
    }

    fn on_page_complete(&self, page: &PageResult, _total_pages: usize) {
        let elapsed_ms = self
            .page_started
            .lock()
            .ok()
            .and_then(|mut s| s.take())
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        self.bar.println(format!(
            "  {} Saved translated page to '{}'  {}  {}",
            green("✓"),
            page.output_path.display(),
            dim(&page_summary(page)),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
        let replaced =
            self.replaced.fetch_add(page.regions_annotated, Ordering::SeqCst) + page.regions_annotated;
        self.bar
            .set_message(format!("{replaced} regions replaced"));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, _total_pages: usize, processed_pages: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} Processing complete. {} pages written",
            green("✔"),
            bold(&processed_pages.to_string())
        );
    }
}

/// `"12/15 replaced, 2 low-conf, 1 blank"` plus a fallback note when the
/// configured font could not be used.
fn page_summary(page: &PageResult) -> String {
    let mut s = format!(
        "{}/{} replaced, {} low-conf, {} blank",
        page.regions_annotated,
        page.regions_detected,
        page.skipped_low_confidence,
        page.skipped_blank
    );
    if page.font_fallbacks > 0 {
        s.push_str(&format!(", {} in fallback font", page.font_fallbacks));
    }
    s
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Translate the bundled sample drawing into ./translated_specs
  bptranslate

  # A specific drawing, custom output directory
  bptranslate drawings/hinge.pdf -o out/

  # Lower resolution for a quick look
  bptranslate --dpi 300 drawings/hinge.pdf

  # Only pages 2 to 4, with a CJK font
  bptranslate --pages 2-4 --font /usr/share/fonts/NotoSansSC-Regular.ttf plan.pdf

  # Keep the recognised text (useful to check OCR boxes)
  bptranslate --identity plan.pdf

  # JSON summary of what was written
  bptranslate --json plan.pdf > summary.json

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to an existing libpdfium
  BPT_*             Every flag has a BPT_ fallback (BPT_DPI, BPT_FONT, ...)
  RUST_LOG          Overrides the log filter chosen by -v / -q

REQUIREMENTS:
  pdfium (libpdfium.so / pdfium.dll / libpdfium.dylib) in the working
  directory, on the system library path, or given by --pdfium-lib.
  The tesseract executable on PATH, or given by --tesseract.
"#;

/// Erase the text labels of a technical drawing and overlay replacement text.
#[derive(clap::Parser, Debug)]
#[command(
    name = "bptranslate",
    version,
    about = "Overlay replacement text on the labels of technical-drawing PDFs",
    long_about = "Render each page of a technical-drawing PDF, find its text with tesseract, \
erase every confidently recognised label and draw replacement text sized to fit the \
original box. One PNG is written per page.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input PDF path.
    #[arg(default_value = "./data/aluminum_hinge.pdf", env = "BPT_INPUT")]
    input: PathBuf,

    /// Directory for page_N_translated.png files (created if missing).
    #[arg(short, long, env = "BPT_OUTPUT_DIR", default_value = "./translated_specs")]
    output_dir: PathBuf,

    /// TrueType/OpenType font for the replacement text.
    #[arg(long, env = "BPT_FONT", default_value = "./NotoSansSC-Regular.ttf")]
    font: PathBuf,

    /// Rendering DPI (72–2400).
    #[arg(long, env = "BPT_DPI", default_value_t = 1200,
          value_parser = clap::value_parser!(u32).range(72..=2400))]
    dpi: u32,

    /// Cap on rendered width and height in pixels.
    #[arg(long, env = "BPT_MAX_PIXELS")]
    max_pixels: Option<u32>,

    /// Regions with confidence at or below this are left untouched.
    #[arg(long, env = "BPT_MIN_CONFIDENCE", default_value_t = 10,
          allow_negative_numbers = true)]
    min_confidence: i32,

    /// Text written into every region.
    #[arg(long, env = "BPT_PLACEHOLDER", default_value = "企鹅")]
    placeholder: String,

    /// Redraw the recognised text instead of the placeholder.
    #[arg(long, env = "BPT_IDENTITY", conflicts_with = "placeholder")]
    identity: bool,

    /// Source language tag passed to the translator.
    #[arg(long, env = "BPT_SOURCE_LANG", default_value = "en")]
    source_lang: String,

    /// Target language tag passed to the translator.
    #[arg(long, env = "BPT_TARGET_LANG", default_value = "zh-CN")]
    target_lang: String,

    /// Tesseract language pack(s), e.g. eng or eng+deu.
    #[arg(long, env = "BPT_OCR_LANG", default_value = "eng")]
    ocr_lang: String,

    /// Tesseract page segmentation mode.
    #[arg(long, env = "BPT_PSM", default_value_t = 3,
          value_parser = clap::value_parser!(u8).range(0..=13))]
    psm: u8,

    /// Tesseract OCR engine mode.
    #[arg(long, env = "BPT_OEM", default_value_t = 1,
          value_parser = clap::value_parser!(u8).range(0..=3))]
    oem: u8,

    /// Tesseract executable.
    #[arg(long, env = "BPT_TESSERACT", default_value = "tesseract")]
    tesseract: String,

    /// Path to the pdfium shared library.
    #[arg(long, env = "BPT_PDFIUM_LIB")]
    pdfium_lib: Option<PathBuf>,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "BPT_PAGES", default_value = "all")]
    pages: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "BPT_PASSWORD")]
    password: Option<String>,

    /// Draw order for overlapping regions.
    #[arg(long, env = "BPT_DETECTOR_ORDER", value_enum, default_value = "top-left")]
    detector_order: OrderArg,

    /// Print a JSON summary (TranslationOutput) to stdout.
    #[arg(long, env = "BPT_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "BPT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "BPT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "BPT_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OrderArg {
    TopLeft,
    Detector,
}

impl From<OrderArg> for RegionOrder {
    fn from(v: OrderArg) -> Self {
        match v {
            OrderArg::TopLeft => RegionOrder::TopLeft,
            OrderArg::Detector => RegionOrder::Detector,
        }
    }
}

fn main() -> Result<()> {
    let cli = <Cli as clap::Parser>::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // With the bar active it prints the per-page lines itself; keep WARN so
    // font fallbacks still show.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else if show_progress {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn TranslationProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run ──────────────────────────────────────────────────────────────
    let output = translate_pdf(&config)
        .with_context(|| format!("Failed to translate '{}'", cli.input.display()))?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet {
        eprintln!(
            "   {} regions replaced on {} pages  —  {}ms total",
            dim(&output.stats.regions_annotated.to_string()),
            output.stats.processed_pages,
            output.stats.total_duration_ms,
        );
    }

    Ok(())
}

/// Map CLI args to `TranslationConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<TranslationConfig> {
    let pages = parse_pages(&cli.pages)?;

    let translator: Arc<dyn Translator> = if cli.identity {
        Arc::new(IdentityTranslator)
    } else {
        Arc::new(PlaceholderTranslator::new(cli.placeholder.clone()))
    };

    let mut builder = TranslationConfig::builder()
        .input(&cli.input)
        .output_dir(&cli.output_dir)
        .font_path(&cli.font)
        .dpi(cli.dpi)
        .min_confidence(cli.min_confidence)
        .source_language(&cli.source_lang)
        .target_language(&cli.target_lang)
        .translator(translator)
        .ocr(OcrSettings {
            program: cli.tesseract.clone(),
            language: cli.ocr_lang.clone(),
            engine_mode: cli.oem,
            page_segmentation_mode: cli.psm,
        })
        .region_order(cli.detector_order.clone().into())
        .pages(pages);

    if let Some(px) = cli.max_pixels {
        builder = builder.max_rendered_pixels(px);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_library(lib);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start
            .trim()
            .parse()
            .context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!(
                "Invalid page range '{}-{}': start must be <= end",
                start,
                end
            );
        }
        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages = s
            .split(',')
            .map(|p| {
                let n = p
                    .trim()
                    .parse::<usize>()
                    .with_context(|| format!("Invalid page number: '{}'", p.trim()))?;
                if n < 1 {
                    anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", n);
                }
                Ok(n)
            })
            .collect::<Result<Vec<_>>>()?;
        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }
    Ok(PageSelection::Single(page))
}
