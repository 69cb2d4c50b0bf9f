use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use homewidget::{
    CanvasSize, MaskShape, MemoryPrefs, SizeBudget, WidgetHost, WidgetOpts, WidgetResult,
    WidgetView,
};

#[derive(Parser, Debug)]
#[command(name = "homewidget", version)]
struct Cli {
    /// Print debug logs to stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a base64 thumbnail and write the masked result as a PNG.
    Render(RenderArgs),
    /// Run a widget update pass against a JSON preference file.
    Update(UpdateArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Text file holding raw base64 or a data URI.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Mask shape.
    #[arg(long, value_enum, default_value_t = MaskShape::None)]
    shape: MaskShape,

    /// Canvas side in pixels.
    #[arg(long, default_value_t = 256)]
    size: u32,

    /// Maximum decoded footprint in bytes before re-compression.
    #[arg(long, default_value_t = SizeBudget::DEFAULT.bytes())]
    budget: u64,
}

#[derive(Parser, Debug)]
struct UpdateArgs {
    /// Preference store JSON (flat object); rewritten after the pass.
    #[arg(long)]
    prefs: PathBuf,

    /// Widget ids to update, in order.
    #[arg(long, value_delimiter = ',', required = true)]
    ids: Vec<i64>,

    /// Directory receiving `<id>.png` per widget.
    #[arg(long)]
    out_dir: PathBuf,

    /// Canvas side in pixels (layout size of the widget).
    #[arg(long, default_value_t = 256)]
    size: u32,

    /// File holding the thumbnail used when a widget has none.
    #[arg(long)]
    default_thumbnail: Option<PathBuf>,
}

struct FileHost {
    out_dir: PathBuf,
    layout: u32,
    default_thumbnail: String,
}

impl WidgetHost for FileHost {
    fn default_thumbnail(&self) -> String {
        self.default_thumbnail.clone()
    }

    fn measure_layout(&self) -> (u32, u32) {
        (self.layout, self.layout)
    }

    fn update_widget(&mut self, widget_id: i64, view: WidgetView) -> WidgetResult<()> {
        let path = self.out_dir.join(format!("{widget_id}.png"));
        let png = view.image.encode_png()?;
        std::fs::write(&path, png).with_context(|| format!("write png '{}'", path.display()))?;
        println!("{widget_id} {}", view.launch);
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Update(args) => cmd_update(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let encoded = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read thumbnail '{}'", args.in_path.display()))?;
    let budget = SizeBudget::new(args.budget)?;
    let canvas = CanvasSize::new(args.size)?;

    let fitted = homewidget::decode_and_fit_report(&encoded, budget)
        .with_context(|| format!("decode '{}'", args.in_path.display()))?;
    match fitted.compression {
        Some(c) if c.iterations == 0 => eprintln!("could not re-encode, kept decoded image"),
        Some(c) => eprintln!(
            "re-encoded at quality {} ({} bytes, {} steps)",
            c.quality, c.encoded_len, c.iterations
        ),
        None => {}
    }
    let image = homewidget::composite(&fitted.image, canvas, args.shape)?;

    ensure_parent_dir(&args.out)?;
    std::fs::write(&args.out, image.encode_png()?)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_update(args: UpdateArgs) -> anyhow::Result<()> {
    let mut prefs = MemoryPrefs::load(&args.prefs)?;
    let default_thumbnail = match &args.default_thumbnail {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("read default thumbnail '{}'", p.display()))?,
        None => String::new(),
    };
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut host = FileHost {
        out_dir: args.out_dir.clone(),
        layout: args.size,
        default_thumbnail,
    };
    let stats =
        homewidget::update_widgets(&args.ids, &mut prefs, &mut host, &WidgetOpts::default())?;
    prefs.save(&args.prefs)?;

    eprintln!(
        "updated {} widget(s), {} placeholder(s), {} failed",
        stats.updated, stats.placeholders, stats.failed
    );
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
