use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use brick_mosaic_core::raster::{PreviewOptions, pixels_from_image, render_preview};
use brick_mosaic_core::{
    ColorId, GenerationMode, Inventory, InventoryEntry, MosaicConfig, MosaicJob, MosaicResult,
    Palette, Rgb, bom_rows, bom_to_csv, generate_many, generate_mosaic, shopping_list, to_json,
};
use clap::{ArgAction, Args, Parser, Subcommand};
use globset::{Glob, GlobSetBuilder};
use handlebars::Handlebars;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "brick-mosaic",
    about = "Turn images into brick mosaics built from your own inventory",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --progress false or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a mosaic from one image
    Generate(GenerateArgs),
    /// Generate mosaics for every image in a directory
    Batch(BatchArgs),
    /// Print the effective palette
    Palette(PaletteArgs),
}

/// Settings shared by `generate` and `batch`.
#[derive(Args, Debug, Clone)]
struct MosaicArgs {
    // Input
    /// Inventory file (YAML or JSON). Without it every cell is a shortage in strict mode
    #[arg(long, help_heading = "Input")]
    inventory: Option<PathBuf>,
    /// Palette file (YAML or JSON); defaults to the built-in brick palette
    #[arg(long, help_heading = "Input")]
    palette: Option<PathBuf>,
    /// YAML config file; keys present in it override the flags
    #[arg(long, help_heading = "Input")]
    config: Option<PathBuf>,

    // Mosaic
    /// Mosaic width in studs
    #[arg(long, default_value_t = 16, help_heading = "Mosaic")]
    width: u32,
    /// Mosaic height in studs
    #[arg(long, default_value_t = 16, help_heading = "Mosaic")]
    height: u32,
    /// Generation mode: strict (precise) | unconstrained (artistic)
    #[arg(long, default_value = "strict", help_heading = "Mosaic")]
    mode: String,
    /// Center-crop the image to the mosaic aspect ratio before resizing
    #[arg(long, default_value_t = false, help_heading = "Mosaic")]
    crop: bool,
    /// Resize filter: nearest | triangle | catmullrom | gaussian | lanczos3
    #[arg(long, default_value = "lanczos3", help_heading = "Mosaic")]
    filter: String,

    // Output
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Output")]
    out_dir: PathBuf,
    /// Pixels per stud in the PNG preview (0 disables the preview)
    #[arg(long, default_value_t = 16, help_heading = "Output")]
    preview_scale: u32,
    /// Outline every piece in the preview
    #[arg(long, default_value_t = true, action=ArgAction::Set, help_heading = "Output")]
    outlines: bool,
    /// Draw stud dots in the preview
    #[arg(long, default_value_t = true, action=ArgAction::Set, help_heading = "Output")]
    studs: bool,
    /// Bill of materials format: json | csv | text | template
    #[arg(long, default_value = "csv", value_parser = ["json", "csv", "text", "template"], help_heading = "Output")]
    bom_format: String,
    /// Handlebars template file, used when --bom-format template
    #[arg(long, help_heading = "Output")]
    template: Option<PathBuf>,
    /// Dry run: generate and log stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Output")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct GenerateArgs {
    /// Input image file
    #[arg(help_heading = "Input")]
    input: PathBuf,
    /// Base name of the output files (defaults to the image file stem)
    #[arg(short, long, help_heading = "Output")]
    name: Option<String>,
    /// Export stats (JSON) to this file
    #[arg(long, help_heading = "Output")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Output")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Output")]
    print_config_format: String,
    #[command(flatten)]
    mosaic: MosaicArgs,
}

#[derive(Parser, Debug, Clone)]
struct BatchArgs {
    /// Input directory
    #[arg(help_heading = "Input")]
    input: PathBuf,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input")]
    exclude: Vec<String>,
    /// Generate in parallel (requires core feature `parallel`)
    #[arg(long, default_value_t = false, help_heading = "Mosaic")]
    parallel: bool,
    #[command(flatten)]
    mosaic: MosaicArgs,
}

#[derive(Parser, Debug, Clone)]
struct PaletteArgs {
    /// Palette file (YAML or JSON); defaults to the built-in brick palette
    #[arg(long)]
    palette: Option<PathBuf>,
    /// Only list colors of this category (case-insensitive)
    #[arg(long)]
    category: Option<String>,
    /// Output format: json|yaml
    #[arg(long, default_value = "yaml", value_parser = ["json", "yaml"])]
    format: String,
}

/// Effective settings after merging flags and the optional YAML file.
#[derive(Debug, Clone, Serialize)]
struct Settings {
    mosaic: MosaicConfig,
    crop: bool,
    filter: String,
    preview_scale: u32,
    outlines: bool,
    studs: bool,
    bom_format: String,
    inventory: Option<PathBuf>,
    palette: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Generate(args) => run_generate(args),
        Commands::Batch(args) => run_batch(args, cli.progress && !cli.quiet),
        Commands::Palette(args) => run_palette(args),
    }
}

fn run_generate(args: &GenerateArgs) -> anyhow::Result<()> {
    let settings = resolve_settings(&args.mosaic)?;
    if args.print_config {
        match args.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&settings)?),
            _ => println!("{}", serde_json::to_string_pretty(&settings)?),
        }
        return Ok(());
    }

    let palette = load_palette(settings.palette.as_deref())?;
    let inventory = load_inventory(settings.inventory.as_deref())?;
    info!(
        colors = palette.len(),
        entries = inventory.len(),
        studs = inventory.total_studs(),
        "loaded palette and inventory"
    );

    warn_unknown_colors(&inventory, &palette);

    let pixels = load_pixels(&args.input, &settings)?;
    let start = Instant::now();
    let result = generate_mosaic(&pixels, &inventory, &palette, &settings.mosaic)?;
    let stats = result.stats();
    info!(elapsed = %fmt_dur(start.elapsed()), "{}", stats.summary());
    if !result.is_complete() {
        warn!(
            missing = stats.missing_total,
            colors = result.missing_bricks.len(),
            "inventory is short of the ideal colors"
        );
    }

    let name = args.name.clone().unwrap_or_else(|| file_stem(&args.input));
    if !args.mosaic.dry_run {
        fs::create_dir_all(&args.mosaic.out_dir)
            .with_context(|| format!("create out_dir {}", args.mosaic.out_dir.display()))?;
        write_outputs(
            &args.mosaic.out_dir,
            &name,
            &result,
            &palette,
            &settings,
            args.mosaic.template.as_deref(),
        )?;
    }

    if let Some(stats_path) = &args.export_stats {
        let value = serde_json::to_value(stats)?;
        if !args.mosaic.dry_run {
            fs::write(stats_path, serde_json::to_string_pretty(&value)?)
                .with_context(|| format!("write {}", stats_path.display()))?;
            info!(?stats_path, "stats exported");
        } else {
            println!("{}", stats.summary());
        }
    }
    Ok(())
}

fn run_batch(args: &BatchArgs, show_progress: bool) -> anyhow::Result<()> {
    let settings = resolve_settings(&args.mosaic)?;
    let palette = load_palette(settings.palette.as_deref())?;
    let inventory = load_inventory(settings.inventory.as_deref())?;

    warn_unknown_colors(&inventory, &palette);

    let paths = gather_paths(&args.input, &args.include, &args.exclude)?;
    if paths.is_empty() {
        anyhow::bail!("no images found under {}", args.input.display());
    }
    let jobs = load_jobs_with_progress(&paths, &inventory, &settings, show_progress)?;
    info!(count = jobs.len(), "loaded input images");

    let start = Instant::now();
    let results = generate_many(&jobs, &palette, args.parallel);
    info!(elapsed = %fmt_dur(start.elapsed()), count = results.len(), "batch generated");

    if !args.mosaic.dry_run {
        fs::create_dir_all(&args.mosaic.out_dir)
            .with_context(|| format!("create out_dir {}", args.mosaic.out_dir.display()))?;
    }
    let mut failed = 0usize;
    for (key, res) in &results {
        match res {
            Ok(result) => {
                info!(image = %key, "{}", result.stats().summary());
                if !args.mosaic.dry_run {
                    write_outputs(
                        &args.mosaic.out_dir,
                        &file_stem(Path::new(key)),
                        result,
                        &palette,
                        &settings,
                        args.mosaic.template.as_deref(),
                    )?;
                }
            }
            Err(e) => {
                failed += 1;
                error!(image = %key, error = %e, "generation failed");
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{} of {} images failed", failed, results.len());
    }
    Ok(())
}

fn run_palette(args: &PaletteArgs) -> anyhow::Result<()> {
    let palette = load_palette(args.palette.as_deref())?;
    let colors: Vec<_> = palette
        .colors()
        .iter()
        .filter(|c| {
            args.category
                .as_ref()
                .is_none_or(|cat| c.category.eq_ignore_ascii_case(cat))
        })
        .collect();
    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&colors)?),
        _ => print!("{}", serde_yaml::to_string(&colors)?),
    }
    Ok(())
}

fn resolve_settings(args: &MosaicArgs) -> anyhow::Result<Settings> {
    let mode: GenerationMode = args
        .mode
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown mode: {}", args.mode))?;
    let base = Settings {
        mosaic: MosaicConfig {
            width: args.width,
            height: args.height,
            mode,
            ..Default::default()
        },
        crop: args.crop,
        filter: args.filter.clone(),
        preview_scale: args.preview_scale,
        outlines: args.outlines,
        studs: args.studs,
        bom_format: args.bom_format.clone(),
        inventory: args.inventory.clone(),
        palette: args.palette.clone(),
    };
    let settings = if let Some(path) = &args.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)
            .with_context(|| format!("parse config {}", path.display()))?;
        y.into_settings(base)?
    } else {
        base
    };
    settings.mosaic.validate()?;
    parse_filter(&settings.filter)?;
    Ok(settings)
}

fn write_outputs(
    out_dir: &Path,
    name: &str,
    result: &MosaicResult,
    palette: &Palette,
    settings: &Settings,
    template: Option<&Path>,
) -> anyhow::Result<()> {
    let json_path = out_dir.join(format!("{}.json", name));
    let json = serde_json::to_string_pretty(&to_json(result, palette))?;
    fs::write(&json_path, json).with_context(|| format!("write {}", json_path.display()))?;
    info!(?json_path, pieces = result.placed_pieces.len(), "mosaic written");

    if settings.preview_scale > 0 {
        let png_path = out_dir.join(format!("{}.png", name));
        let opts = PreviewOptions {
            scale: settings.preview_scale,
            outlines: settings.outlines,
            studs: settings.studs,
        };
        render_preview(result, &opts)
            .with_context(|| format!("render preview at scale {}", opts.scale))?
            .save(&png_path)
            .with_context(|| format!("write {}", png_path.display()))?;
        info!(?png_path, "preview written");
    }

    let (bom_path, bom) = match settings.bom_format.as_str() {
        "json" => {
            let value = serde_json::json!({
                "bom": bom_rows(result, palette),
                "missing": shopping_list(result, palette),
            });
            (
                out_dir.join(format!("{}.bom.json", name)),
                serde_json::to_string_pretty(&value)?,
            )
        }
        "csv" => (
            out_dir.join(format!("{}.bom.csv", name)),
            bom_to_csv(result, palette),
        ),
        "text" => (
            out_dir.join(format!("{}.bom.txt", name)),
            render_bom_template(include_str!("templates/bom.txt.hbs"), name, result, palette, settings)?,
        ),
        "template" => {
            let path = template
                .ok_or_else(|| anyhow::anyhow!("--bom-format template requires --template"))?;
            let tpl = fs::read_to_string(path)
                .with_context(|| format!("read template {}", path.display()))?;
            (
                out_dir.join(format!("{}.bom.txt", name)),
                render_bom_template(&tpl, name, result, palette, settings)?,
            )
        }
        other => anyhow::bail!("unknown bom format: {}", other),
    };
    fs::write(&bom_path, bom).with_context(|| format!("write {}", bom_path.display()))?;
    info!(?bom_path, "bill of materials written");
    Ok(())
}

#[derive(Serialize)]
struct BomContext {
    name: String,
    width: u32,
    height: u32,
    mode: String,
    stats_line: String,
    stats: serde_json::Value,
    bom: Vec<brick_mosaic_core::BomRow>,
    shortages: Vec<brick_mosaic_core::ShortageRow>,
}

fn render_bom_template(
    tpl: &str,
    name: &str,
    result: &MosaicResult,
    palette: &Palette,
    settings: &Settings,
) -> anyhow::Result<String> {
    let ctx = BomContext {
        name: name.to_string(),
        width: result.width,
        height: result.height,
        mode: serde_json::to_value(settings.mosaic.mode)?
            .as_str()
            .unwrap_or_default()
            .to_string(),
        stats_line: result.stats().summary(),
        stats: serde_json::to_value(result.stats())?,
        bom: bom_rows(result, palette),
        shortages: shopping_list(result, palette),
    };
    let mut reg = Handlebars::new();
    reg.set_strict_mode(true);
    reg.register_escape_fn(handlebars::no_escape);
    reg.register_template_string("bom", tpl)?;
    Ok(reg.render("bom", &ctx)?)
}

fn parse_filter(s: &str) -> anyhow::Result<FilterType> {
    Ok(match s.to_ascii_lowercase().as_str() {
        "nearest" => FilterType::Nearest,
        "triangle" => FilterType::Triangle,
        "catmullrom" => FilterType::CatmullRom,
        "gaussian" => FilterType::Gaussian,
        "lanczos3" => FilterType::Lanczos3,
        other => anyhow::bail!("unknown resize filter: {}", other),
    })
}

/// Decodes, optionally center-crops, and resizes to the mosaic grid.
fn load_pixels(path: &Path, settings: &Settings) -> anyhow::Result<Vec<Rgb>> {
    let img = load_image(path).with_context(|| format!("load image {}", path.display()))?;
    let (w, h) = (settings.mosaic.width, settings.mosaic.height);
    let img = if settings.crop {
        center_crop(img, w, h)
    } else {
        img
    };
    let resized = img.resize_exact(w, h, parse_filter(&settings.filter)?);
    Ok(pixels_from_image(&resized.to_rgb8()))
}

/// Largest centered region with the aspect ratio `w:h`.
fn center_crop(img: DynamicImage, w: u32, h: u32) -> DynamicImage {
    let (iw, ih) = (img.width() as u64, img.height() as u64);
    let (w, h) = (w as u64, h as u64);
    let (cw, ch) = if iw * h > ih * w {
        ((ih * w / h).max(1), ih)
    } else {
        (iw, (iw * h / w).max(1))
    };
    let x = (iw - cw) / 2;
    let y = (ih - ch) / 2;
    img.crop_imm(x as u32, y as u32, cw as u32, ch as u32)
}

fn load_image(p: &Path) -> anyhow::Result<DynamicImage> {
    let img = ImageReader::open(p)?.with_guessed_format()?.decode()?;
    Ok(img)
}

fn load_jobs_with_progress(
    paths: &[PathBuf],
    inventory: &Inventory,
    settings: &Settings,
    progress: bool,
) -> anyhow::Result<Vec<MosaicJob>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        match load_pixels(p, settings) {
            Ok(pixels) => list.push(MosaicJob {
                key: p.to_string_lossy().replace('\\', "/"),
                pixels,
                inventory: inventory.clone(),
                config: settings.mosaic.clone(),
            }),
            Err(e) => {
                error!(?p, error = %e, "skip image");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    let mut inc_set = None;
    if !include.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in include {
            b.add(Glob::new(pat)?);
        }
        inc_set = Some(b.build()?);
    }
    let mut exc_set = None;
    if !exclude.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in exclude {
            b.add(Glob::new(pat)?);
        }
        exc_set = Some(b.build()?);
    }
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_image(path) {
            list.push(path.to_path_buf());
        }
    } else {
        for entry in WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let p = entry.path();
            if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_image(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    Ok(list)
}

fn should_skip(
    p: &Path,
    include: Option<&globset::GlobSet>,
    exclude: Option<&globset::GlobSet>,
) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp" | "tga" | "gif" | "webp")
    )
}

fn file_stem(p: &Path) -> String {
    p.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mosaic")
        .to_string()
}

fn is_json(p: &Path) -> bool {
    p.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

fn load_palette(path: Option<&Path>) -> anyhow::Result<Palette> {
    let Some(path) = path else {
        return Ok(Palette::default_bricks());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("read palette {}", path.display()))?;
    let palette: Palette = if is_json(path) {
        serde_json::from_str(&text)?
    } else {
        serde_yaml::from_str(&text)?
    };
    Ok(palette)
}

/// Inventory line as written by hand: either the full record
/// (`colorId`, `dimensions`, `quantity`) or `{ color, shape: "2x4", quantity }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InventoryRecord {
    Full(InventoryEntry),
    Short {
        #[serde(alias = "colorId", alias = "color_id")]
        color: ColorId,
        shape: String,
        quantity: u32,
    },
}

/// Stock of colors outside the palette is never used for substitution.
fn warn_unknown_colors(inventory: &Inventory, palette: &Palette) {
    for color in inventory.colors() {
        if let Err(e) = palette.require(color) {
            warn!(error = %e, "inventory color ignored for substitution");
        }
    }
}

fn load_inventory(path: Option<&Path>) -> anyhow::Result<Inventory> {
    let Some(path) = path else {
        return Ok(Inventory::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("read inventory {}", path.display()))?;
    parse_inventory(&text, is_json(path))
        .with_context(|| format!("parse inventory {}", path.display()))
}

fn parse_inventory(text: &str, json: bool) -> anyhow::Result<Inventory> {
    let records: Vec<InventoryRecord> = if json {
        serde_json::from_str(text)?
    } else {
        serde_yaml::from_str(text)?
    };
    let mut inventory = Inventory::default();
    for r in records {
        let entry = match r {
            InventoryRecord::Full(e) => e,
            InventoryRecord::Short {
                color,
                shape,
                quantity,
            } => {
                let dims: brick_mosaic_core::Dimensions = shape.parse()?;
                InventoryEntry::new(color, dims.width, dims.height, quantity)
            }
        };
        inventory.add(entry);
    }
    inventory.validate()?;
    Ok(inventory)
}

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    width: Option<u32>,
    height: Option<u32>,
    mode: Option<String>,
    piece_id_prefix: Option<String>,
    crop: Option<bool>,
    filter: Option<String>,
    preview_scale: Option<u32>,
    outlines: Option<bool>,
    studs: Option<bool>,
    bom_format: Option<String>,
    inventory: Option<PathBuf>,
    palette: Option<PathBuf>,
}

impl YamlConfig {
    fn into_settings(self, mut s: Settings) -> anyhow::Result<Settings> {
        if let Some(v) = self.width {
            s.mosaic.width = v;
        }
        if let Some(v) = self.height {
            s.mosaic.height = v;
        }
        if let Some(v) = self.mode {
            s.mosaic.mode = v
                .parse()
                .map_err(|_| anyhow::anyhow!("unknown mode in config: {}", v))?;
        }
        if let Some(v) = self.piece_id_prefix {
            s.mosaic.piece_id_prefix = v;
        }
        if let Some(v) = self.crop {
            s.crop = v;
        }
        if let Some(v) = self.filter {
            s.filter = v;
        }
        if let Some(v) = self.preview_scale {
            s.preview_scale = v;
        }
        if let Some(v) = self.outlines {
            s.outlines = v;
        }
        if let Some(v) = self.studs {
            s.studs = v;
        }
        if let Some(v) = self.bom_format {
            match v.as_str() {
                "json" | "csv" | "text" | "template" => s.bom_format = v,
                other => anyhow::bail!("unknown bom format in config: {}", other),
            }
        }
        if let Some(v) = self.inventory {
            s.inventory = Some(v);
        }
        if let Some(v) = self.palette {
            s.palette = Some(v);
        }
        Ok(s)
    }
}
