//! insol CLI - ray/mesh hit counting benchmark
//!
//! Loads meshes and ray directions from JSON fixtures and reports the hit
//! count and elapsed time of each selected strategy.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use insol_geom::{Mesh, Point3};
use insol_raycast::{
    BatchedPipeline, CulledParallelScan, HostBackend, Ray, RaycastSettings, SequentialScan,
    Strategy, TaskParallelBruteForce, WgpuBackend,
};
use std::path::{Path, PathBuf};
use std::time::Instant;

mod fixture;

#[derive(Parser)]
#[command(name = "insol")]
#[command(about = "Compare ray/mesh hit counting strategies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run strategies over a fixture pair and report hits and timings
    Run {
        /// Mesh fixture (.json)
        #[arg(long, default_value = "meshes.json")]
        meshes: PathBuf,
        /// Ray direction fixture (.json)
        #[arg(long, default_value = "vectors.json")]
        vectors: PathBuf,
        /// Shared ray origin as x,y,z (default: -1079800,4580400,0)
        #[arg(long, value_parser = fixture::parse_point, allow_hyphen_values = true)]
        origin: Option<Point3>,
        /// Strategies to run (default: all)
        #[arg(short, long, value_enum, value_delimiter = ',')]
        strategy: Vec<StrategyKind>,
        /// Compute backend for the batched pipeline
        #[arg(short, long, value_enum, default_value_t = BackendKind::Wgpu)]
        backend: BackendKind,
        #[command(flatten)]
        tuning: Tuning,
    },
    /// Summarize a fixture pair without running anything
    Info {
        /// Mesh fixture (.json)
        #[arg(long, default_value = "meshes.json")]
        meshes: PathBuf,
        /// Ray direction fixture (.json)
        #[arg(long, default_value = "vectors.json")]
        vectors: PathBuf,
    },
}

/// Settings file and per-field overrides.
#[derive(clap::Args)]
struct Tuning {
    /// TOML file with `read_chunk`, `pair_batch` and `threads`
    #[arg(long)]
    config: Option<PathBuf>,
    /// Elements per read-back transfer
    #[arg(long)]
    read_chunk: Option<usize>,
    /// Ray/triangle pairs per triangle-test dispatch
    #[arg(long)]
    pair_batch: Option<usize>,
    /// Worker threads for the parallel strategies (0 = all cores)
    #[arg(long)]
    threads: Option<usize>,
}

/// Run order follows declaration order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum StrategyKind {
    TaskParallel,
    Sequential,
    Culled,
    Batched,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BackendKind {
    /// Evaluate both kernels on the CPU
    Host,
    /// Dispatch both kernels through wgpu
    Wgpu,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            meshes,
            vectors,
            origin,
            strategy,
            backend,
            tuning,
        } => {
            let settings = load_settings(&tuning)?;
            let meshes = fixture::load_meshes(&meshes)?;
            let origin = origin.unwrap_or_else(|| Point3::from(fixture::DEFAULT_ORIGIN));
            let rays = Ray::fan(origin, &fixture::load_vectors(&vectors)?);
            run(&rays, &meshes, strategy, backend, settings)?;
        }
        Commands::Info { meshes, vectors } => {
            show_info(&meshes, &vectors)?;
        }
    }

    Ok(())
}

fn load_settings(tuning: &Tuning) -> Result<RaycastSettings> {
    let mut settings = match &tuning.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => RaycastSettings::default(),
    };

    if let Some(read_chunk) = tuning.read_chunk {
        settings.read_chunk = read_chunk;
    }
    if let Some(pair_batch) = tuning.pair_batch {
        settings.pair_batch = pair_batch;
    }
    if let Some(threads) = tuning.threads {
        settings.threads = threads;
    }

    settings.validate()?;
    Ok(settings)
}

fn build_strategy(
    kind: StrategyKind,
    backend: BackendKind,
    settings: &RaycastSettings,
) -> Result<Box<dyn Strategy>> {
    Ok(match kind {
        StrategyKind::TaskParallel => Box::new(TaskParallelBruteForce::new(settings)?),
        StrategyKind::Sequential => Box::new(SequentialScan),
        StrategyKind::Culled => Box::new(CulledParallelScan::new(settings)?),
        StrategyKind::Batched => match backend {
            BackendKind::Host => Box::new(BatchedPipeline::new(HostBackend, settings.clone())?),
            BackendKind::Wgpu => {
                let gpu = WgpuBackend::init().context("initializing GPU backend")?;
                println!("GPU: {}", gpu.adapter_name());
                Box::new(BatchedPipeline::new(gpu, settings.clone())?)
            }
        },
    })
}

/// Run each selected strategy once, printing its report line, and return
/// the hit counts in run order.
fn run(
    rays: &[Ray],
    meshes: &[Mesh],
    mut kinds: Vec<StrategyKind>,
    backend: BackendKind,
    settings: RaycastSettings,
) -> Result<Vec<(StrategyKind, usize)>> {
    if kinds.is_empty() {
        kinds = StrategyKind::value_variants().to_vec();
    }
    kinds.sort();
    kinds.dedup();

    println!("{} rays, {} meshes", rays.len(), meshes.len());

    let mut counts = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let strategy = build_strategy(kind, backend, &settings)?;
        let start = Instant::now();
        let hits = strategy
            .run(rays, meshes)
            .with_context(|| format!("{} strategy failed", strategy.name()))?;
        println!(
            "{} : {} hits, {}ms",
            strategy.name(),
            hits,
            start.elapsed().as_millis()
        );
        counts.push((kind, hits));
    }

    println!("Done...");
    Ok(counts)
}

fn show_info(meshes: &Path, vectors: &Path) -> Result<()> {
    let meshes = fixture::load_meshes(meshes)?;
    let vectors = fixture::load_vectors(vectors)?;

    let faces: usize = meshes.iter().map(Mesh::num_faces).sum();
    let quads: usize = meshes
        .iter()
        .flat_map(|m| &m.faces)
        .filter(|f| f.is_quad())
        .count();
    let triangles: usize = meshes.iter().map(|m| insol_raycast::triangulate(m).len()).sum();
    let malformed = meshes
        .iter()
        .flat_map(|m| m.faces.iter().map(move |f| (m, f)))
        .filter(|(m, f)| f.indices().iter().any(|&i| m.vertex(i).is_none()))
        .count();

    println!("Meshes: {}", meshes.len());
    println!("Faces: {} ({} quads)", faces, quads);
    println!("Triangles: {}", triangles);
    println!("Ray directions: {}", vectors.len());
    if malformed > 0 {
        println!("Skipped faces: {} (missing vertices)", malformed);
    }

    Ok(())
}
