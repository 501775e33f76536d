use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "easy-img", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply a JSON edit script to an image and write a PNG.
    Edit(EditArgs),
    /// Print a Poppins font descriptor.
    Font(FontArgs),
}

#[derive(Parser, Debug)]
struct EditArgs {
    /// Input image path or http(s) URL.
    #[arg(long = "in")]
    in_path: String,

    /// Edit script (JSON array of ops).
    #[arg(long)]
    ops: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Extra directories to load fonts from (repeatable).
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct FontArgs {
    /// Size in pixels.
    #[arg(long)]
    size: u32,

    #[arg(long, value_enum, default_value_t = VariantChoice::Regular)]
    variant: VariantChoice,

    /// Also print which installed face the descriptor resolves to.
    #[arg(long)]
    resolve: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantChoice {
    Regular,
    Bold,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Edit(args) => cmd_edit(args),
        Command::Font(args) => cmd_font(args),
    }
}

fn cmd_edit(args: EditArgs) -> anyhow::Result<()> {
    let script = easy_img::EditScript::read(&args.ops)?;

    let mut fonts = easy_img::FontBook::from_env();
    for dir in &args.font_dirs {
        let n = fonts.load_font_dir(dir);
        tracing::debug!(dir = %dir.display(), faces = n, "loaded font dir");
    }

    let mut editor = easy_img::Editor::open(args.in_path.as_str())
        .with_context(|| format!("open image '{}'", args.in_path))?
        .with_fonts(Arc::new(fonts));

    let base_dir = args.ops.parent().unwrap_or_else(|| Path::new("."));
    script.apply(&mut editor, base_dir)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    easy_img::save_surface_to_file_blocking(editor.surface(), &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_font(args: FontArgs) -> anyhow::Result<()> {
    let variant = match args.variant {
        VariantChoice::Regular => easy_img::Variant::Regular,
        VariantChoice::Bold => easy_img::Variant::Bold,
    };
    let descriptor = easy_img::Font::poppins(args.size, variant);
    println!("{descriptor}");

    if args.resolve {
        let spec = easy_img::FontSpec::parse(&descriptor)?;
        let face = easy_img::FontBook::shared().resolve(&spec)?;
        println!("resolved family: {}", face.family);
    }
    Ok(())
}
