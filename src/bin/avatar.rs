use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "avatar", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resize and letterbox an image into a square JPEG avatar.
    Auto(AutoArgs),
    /// Crop, zoom and rotate an image into a square JPEG avatar.
    Crop(CropArgs),
    /// Print the automatic letterbox plan for an image as JSON.
    Plan(PlanArgs),
}

#[derive(Args, Debug)]
struct Common {
    /// Input image (JPEG, PNG or GIF).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct Delivery {
    /// User id embedded in the generated file name.
    #[arg(long)]
    user: String,

    /// Write the JPEG to this path.
    #[arg(long, conflicts_with = "store", required_unless_present = "store")]
    out: Option<PathBuf>,

    /// Upload into a directory-backed bucket store rooted here.
    #[arg(long)]
    store: Option<PathBuf>,

    /// Base URL used to build public links for `--store` uploads.
    #[arg(long, default_value = "http://localhost/storage")]
    public_url: String,
}

#[derive(Parser, Debug)]
struct AutoArgs {
    #[command(flatten)]
    common: Common,

    #[command(flatten)]
    delivery: Delivery,
}

#[derive(Parser, Debug)]
struct CropArgs {
    #[command(flatten)]
    common: Common,

    #[command(flatten)]
    delivery: Delivery,

    /// Crop square in display pixels: `x,y,side`.
    #[arg(long, value_parser = parse_crop)]
    crop: avatar::CropRegion,

    /// Maximum display box `WxH` the image is fitted into (defaults to natural size).
    #[arg(long, value_parser = parse_size)]
    display: Option<avatar::Size>,

    /// Zoom factor.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Rotation in degrees.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    rotate: f64,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    #[command(flatten)]
    common: Common,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Auto(args) => cmd_auto(args),
        Command::Crop(args) => cmd_crop(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_crop(s: &str) -> Result<avatar::CropRegion, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("expected x,y,side: {e}"))?;
    match parts.as_slice() {
        [x, y, side] => Ok(avatar::CropRegion::square(*x, *y, *side)),
        _ => Err(format!("expected x,y,side, got '{s}'")),
    }
}

fn parse_size(s: &str) -> Result<avatar::Size, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let w: f64 = w.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let h: f64 = h.trim().parse().map_err(|e| format!("bad height: {e}"))?;
    Ok(avatar::Size::new(w, h))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<avatar::AvatarConfig> {
    let cfg = match path {
        Some(p) => avatar::AvatarConfig::from_path(p)?,
        None => avatar::AvatarConfig::default(),
    }
    .apply_env();
    cfg.validate()?;
    Ok(cfg)
}

fn read_input(path: &Path) -> anyhow::Result<avatar::FileInput> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read input '{}'", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime = avatar::FileInput::mime_from_name(&name);
    Ok(avatar::FileInput::new(name, mime, bytes))
}

fn deliver(
    avatar: avatar::EncodedAvatar,
    delivery: &Delivery,
    cfg: &avatar::AvatarConfig,
) -> anyhow::Result<()> {
    if let Some(root) = &delivery.store {
        let mut store = avatar::DirectoryStore::new(root, delivery.public_url.clone());
        let receipt = avatar::upload_avatar(&mut store, avatar, &cfg.upload)?;
        println!("{}", receipt.url);
        return Ok(());
    }

    let out = delivery
        .out
        .as_ref()
        .context("either --out or --store is required")?;
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(out, &avatar.bytes)
        .with_context(|| format!("write jpeg '{}'", out.display()))?;
    eprintln!("wrote {} ({})", out.display(), avatar.file_name);
    Ok(())
}

fn cmd_auto(args: AutoArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.common.config.as_deref())?;
    let file = read_input(&args.common.in_path)?;
    let mut keys = avatar::AvatarKeyGen::new();

    let encoded = avatar::normalize_auto(
        &file,
        &cfg,
        &avatar::JpegAvatarEncoder,
        &mut keys,
        &args.delivery.user,
    )?;
    deliver(encoded, &args.delivery, &cfg)
}

fn cmd_crop(args: CropArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.common.config.as_deref())?;
    let file = read_input(&args.common.in_path)?;
    let display_box = args
        .display
        .unwrap_or(avatar::Size::new(f64::MAX, f64::MAX));

    let mut session = avatar::CropSession::new(cfg.clone())?;
    session.load(&file, display_box)?;

    let planner = session
        .planner_mut()
        .context("crop session did not enter editing")?;
    let applied = planner.set_crop(args.crop);
    let scale = planner.set_scale(args.scale);
    let rotation = planner.set_rotation(args.rotate);
    planner.commit();
    tracing::info!(?applied, scale, rotation, "crop committed");

    let mut keys = avatar::AvatarKeyGen::new();
    let encoded = session
        .confirm(&mut keys, &args.delivery.user)?
        .context("crop session produced no avatar")?;
    deliver(encoded, &args.delivery, &cfg)
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.common.config.as_deref())?;
    let file = read_input(&args.common.in_path)?;
    let source = avatar::decode_image(&file, &cfg.input)?;
    let plan = avatar::plan_for(source.width(), source.height(), &cfg)?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
