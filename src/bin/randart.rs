use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rand::{SeedableRng, rngs::StdRng};

#[derive(Parser, Debug)]
#[command(name = "randart", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate an image for a seed and write it as a PNG.
    Image(ImageArgs),
    /// Print the first expression tree a seed produces.
    Tree(TreeArgs),
}

#[derive(Parser, Debug)]
struct ImageArgs {
    /// Seed string; the same seed always starts from the same tree.
    #[arg(long)]
    seed: String,

    /// Edge length in pixels.
    #[arg(long, default_value_t = 512, value_parser = clap::value_parser!(u32).range(1..))]
    size: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Raster worker threads (defaults to available parallelism).
    #[arg(long)]
    threads: Option<usize>,

    /// Generation options JSON; unspecified fields take defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the accepted expression tree.
    #[arg(long)]
    print_tree: bool,
}

#[derive(Parser, Debug)]
struct TreeArgs {
    /// Seed string.
    #[arg(long)]
    seed: String,

    /// Generation options JSON; only the depth bounds are used.
    #[arg(long)]
    config: Option<PathBuf>,
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
        Command::Image(args) => cmd_image(args),
        Command::Tree(args) => cmd_tree(args),
    }
}

fn read_opts(path: Option<&Path>) -> anyhow::Result<randart::GenerateOpts> {
    let Some(path) = path else {
        return Ok(randart::GenerateOpts::default());
    };
    let f = File::open(path).with_context(|| format!("open options '{}'", path.display()))?;
    let opts: randart::GenerateOpts = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse options JSON '{}'", path.display()))?;
    Ok(opts)
}

fn cmd_image(args: ImageArgs) -> anyhow::Result<()> {
    let mut opts = read_opts(args.config.as_deref())?;
    if args.threads.is_some() {
        opts.threads = args.threads;
    }

    let art = randart::generate_with_opts(&args.seed, args.size, &opts, None)?;
    art.image.save_png(&args.out)?;

    if args.print_tree {
        println!("{}", art.tree);
    }
    eprintln!(
        "wrote {} ({}x{}, diversity {:.2}, attempts {}{})",
        args.out.display(),
        art.image.width,
        art.image.height,
        art.diversity,
        art.attempts,
        if art.low_diversity {
            ", low diversity"
        } else {
            ""
        }
    );
    Ok(())
}

fn cmd_tree(args: TreeArgs) -> anyhow::Result<()> {
    let opts = read_opts(args.config.as_deref())?;
    opts.validate()?;

    let mut rng = StdRng::seed_from_u64(u64::from(randart::seed_hash(&args.seed)));
    let tree = randart::build_tree(opts.min_depth, opts.max_depth, &mut rng);
    println!("{tree}");
    eprintln!(
        "seed hash {:#010x}, depth {}, nodes {}",
        randart::seed_hash(&args.seed),
        tree.depth(),
        tree.node_count()
    );
    Ok(())
}
