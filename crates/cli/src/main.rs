use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, Subcommand};
use hilbert::api::{
    bisector_of, draw_region_radial, find_circumcenter_seeded, hilbert_distance,
    minimum_enclosing_ball_seeded, pi_field, BisectorPiece, CircumCfg, ConvexRegion, GeomCfg,
    HilbertBall, MebCfg, PiField, PiFieldCfg, Point, RadialCfg, RegionReplay, Support, TraceCfg,
};
use polars::prelude::*;
use serde::Serialize;
use serde_json::{json, Value};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;

use provenance::{current_git_rev, write_sidecar, Provenance};

#[derive(Parser)]
#[command(name = "hilbert-cli")]
#[command(about = "Hilbert-metric geometry in convex polygons")]
struct Cmd {
    /// Domain vertices as "x,y x,y ..." (the convex hull is used)
    #[arg(long, global = true)]
    omega: Option<String>,

    /// Random domain from a replay token "seed:index" instead of --omega
    #[arg(long, global = true)]
    random: Option<String>,

    /// Write the result here (plus a provenance sidecar) instead of stdout
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    /// Debug-level logs
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Hilbert distance between two sites
    Distance {
        #[arg(long = "site", value_parser = parse_point)]
        sites: Vec<Point>,
    },
    /// Bisector pieces and sampled polyline of two sites
    Bisector {
        #[arg(long = "site", value_parser = parse_point)]
        sites: Vec<Point>,
        #[arg(long, default_value_t = 0.01)]
        resolution: f64,
        /// Per-direction piece budget (default 4n + 8)
        #[arg(long)]
        max_pieces: Option<usize>,
    },
    /// Point equidistant from three sites
    Circumcenter {
        #[arg(long = "site", value_parser = parse_point)]
        sites: Vec<Point>,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Minimum enclosing Hilbert ball of the sites
    Meb {
        #[arg(long = "site", value_parser = parse_point)]
        sites: Vec<Point>,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Hilbert ball around one site
    Ball {
        #[arg(long = "site", value_parser = parse_point)]
        sites: Vec<Point>,
        #[arg(long)]
        radius: f64,
    },
    /// Pi field over the domain; CSV or Parquet by extension of --out
    Pimap {
        #[arg(long, default_value_t = 0.05)]
        resolution: f64,
        #[arg(long, default_value_t = 1.0)]
        radius: f64,
    },
    /// Print version and provenance info
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Action::Report = cmd.action {
        return report();
    }
    let omega = domain(cmd.omega.as_deref(), cmd.random.as_deref())?;
    let cfg = GeomCfg::default();
    let out = cmd.out.as_deref();
    match cmd.action {
        Action::Distance { sites } => distance(&omega, &cfg, &sites, out),
        Action::Bisector {
            sites,
            resolution,
            max_pieces,
        } => bisector(&omega, &cfg, &sites, resolution, TraceCfg { max_pieces }, out),
        Action::Circumcenter { sites, seed } => circumcenter(&omega, &cfg, &sites, seed, out),
        Action::Meb { sites, seed } => meb(&omega, &cfg, &sites, seed, out),
        Action::Ball { sites, radius } => ball(&omega, &cfg, &sites, radius, out),
        Action::Pimap { resolution, radius } => pimap(&omega, &cfg, PiFieldCfg { resolution, radius }, out),
        Action::Report => report(),
    }
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got {s:?}"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x in {s:?}: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y in {s:?}: {e}"))?;
    Ok(Point::new(x, y))
}

fn parse_omega(s: &str) -> Result<ConvexRegion> {
    let pts = s
        .split_whitespace()
        .map(parse_point)
        .collect::<Result<Vec<_>, _>>()
        .map_err(anyhow::Error::msg)
        .context("parsing --omega")?;
    let region = ConvexRegion::from_points(&pts);
    ensure!(
        region.is_polygon(),
        "--omega needs at least three non-collinear vertices, hull has {}",
        region.len()
    );
    Ok(region)
}

fn domain(omega: Option<&str>, random: Option<&str>) -> Result<ConvexRegion> {
    match (omega, random) {
        (Some(_), Some(_)) => bail!("--omega and --random are exclusive"),
        (Some(s), None) => parse_omega(s),
        (None, Some(tok)) => {
            let (seed, index) = tok
                .split_once(':')
                .with_context(|| format!("expected \"seed:index\", got {tok:?}"))?;
            let tok = RegionReplay {
                seed: seed.trim().parse().context("parsing seed")?,
                index: index.trim().parse().context("parsing index")?,
            };
            draw_region_radial(RadialCfg::default(), tok).context("random domain degenerated")
        }
        (None, None) => bail!("a domain is required: --omega \"x,y x,y ...\" or --random seed:index"),
    }
}

fn xy(p: Point) -> [f64; 2] {
    [p.x, p.y]
}

fn vertices(region: &ConvexRegion) -> Vec<[f64; 2]> {
    region.vertices().iter().copied().map(xy).collect()
}

fn expect_sites(sites: &[Point], n: usize, what: &str) -> Result<()> {
    ensure!(sites.len() == n, "{what} takes exactly {n} --site, got {}", sites.len());
    Ok(())
}

/// Pretty JSON to stdout, or to `out` with a provenance sidecar.
fn emit(out: Option<&Path>, value: &Value, prov: Provenance) -> Result<()> {
    let Some(path) = out else {
        println!("{}", serde_json::to_string_pretty(value)?);
        return Ok(());
    };
    create_parent(path)?;
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))?;
    let sidecar = write_sidecar(path, &prov)?;
    tracing::info!(out = %path.display(), sidecar = %sidecar.display(), "wrote");
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    Ok(())
}

fn distance(omega: &ConvexRegion, cfg: &GeomCfg, sites: &[Point], out: Option<&Path>) -> Result<()> {
    expect_sites(sites, 2, "distance")?;
    let d = hilbert_distance(sites[0], sites[1], omega, cfg)
        .context("computing the Hilbert distance")?;
    tracing::info!(d, "distance");
    let params = json!({ "sites": sites.iter().copied().map(xy).collect::<Vec<_>>() });
    emit(
        out,
        &json!({ "distance": d }),
        Provenance::new("distance", params, vertices(omega)),
    )
}

#[derive(Serialize)]
struct PieceRow {
    kind: String,
    start: [f64; 2],
    end: [f64; 2],
    /// `[A, B, C, D, E, F]` of `Ax² + Bxy + Cy² + Dx + Ey + F = 0`
    conic: [f64; 6],
}

impl From<&BisectorPiece> for PieceRow {
    fn from(p: &BisectorPiece) -> Self {
        let e = &p.equation;
        Self {
            kind: format!("{:?}", p.kind),
            start: xy(p.start),
            end: xy(p.end),
            conic: [e.a, e.b, e.c, e.d, e.e, e.f],
        }
    }
}

fn bisector(
    omega: &ConvexRegion,
    cfg: &GeomCfg,
    sites: &[Point],
    resolution: f64,
    tcfg: TraceCfg,
    out: Option<&Path>,
) -> Result<()> {
    expect_sites(sites, 2, "bisector")?;
    let bis = bisector_of(sites[0], sites[1], omega, cfg, tcfg).context("tracing the bisector")?;
    let pieces: Vec<PieceRow> = bis.pieces().map(PieceRow::from).collect();
    let polyline: Vec<[f64; 2]> = bis.polyline(resolution).into_iter().map(xy).collect();
    tracing::info!(pieces = pieces.len(), samples = polyline.len(), "bisector");
    let params = json!({
        "sites": sites.iter().copied().map(xy).collect::<Vec<_>>(),
        "resolution": resolution,
        "max_pieces": tcfg.max_pieces,
    });
    emit(
        out,
        &json!({
            "middle_sector": vertices(&bis.middle.sector),
            "pieces": pieces,
            "polyline": polyline,
        }),
        Provenance::new("bisector", params, vertices(omega)),
    )
}

fn circumcenter(omega: &ConvexRegion, cfg: &GeomCfg, sites: &[Point], seed: u64, out: Option<&Path>) -> Result<()> {
    expect_sites(sites, 3, "circumcenter")?;
    let center = find_circumcenter_seeded(sites[0], sites[1], sites[2], omega, cfg, &CircumCfg::default(), seed);
    let radius = center
        .map(|c| hilbert_distance(c, sites[0], omega, cfg))
        .transpose()
        .context("measuring the circumradius")?;
    if center.is_none() {
        tracing::warn!("no circumcenter found");
    }
    let params = json!({ "sites": sites.iter().copied().map(xy).collect::<Vec<_>>(), "seed": seed });
    emit(
        out,
        &json!({ "center": center.map(xy), "radius": radius }),
        Provenance::new("circumcenter", params, vertices(omega)),
    )
}

fn support_json(s: &Support) -> Value {
    match *s {
        Support::Center(p) => json!({ "kind": "center", "points": [xy(p)] }),
        Support::Pair(p, q) => json!({ "kind": "pair", "points": [xy(p), xy(q)] }),
        Support::Triple(p, q, r) => json!({ "kind": "triple", "points": [xy(p), xy(q), xy(r)] }),
        Support::Covering(p) => json!({ "kind": "covering", "points": [xy(p)] }),
    }
}

fn ball_json(ball: &HilbertBall, omega: &ConvexRegion, cfg: &GeomCfg) -> Result<Value> {
    let sides = ball.side_lengths(omega, cfg).context("measuring ball sides")?;
    let perimeter: f64 = sides.iter().sum();
    Ok(json!({
        "center": xy(ball.center()),
        "radius": ball.radius(),
        "boundary": vertices(ball.boundary()),
        "perimeter": perimeter,
        "max_side_length": sides.iter().copied().fold(0.0, f64::max),
        "polar_body": ball.polar_body().map(|p| vertices(&p)),
    }))
}

fn meb(omega: &ConvexRegion, cfg: &GeomCfg, sites: &[Point], seed: u64, out: Option<&Path>) -> Result<()> {
    ensure!(!sites.is_empty(), "meb needs at least one --site");
    let found = minimum_enclosing_ball_seeded(sites, omega, cfg, &MebCfg::default(), seed)
        .context("computing the minimum enclosing ball")?
        .context("no enclosing ball")?;
    tracing::info!(radius = found.ball.radius(), "meb");
    let mut value = ball_json(&found.ball, omega, cfg)?;
    value["support"] = support_json(&found.support);
    let params = json!({ "sites": sites.iter().copied().map(xy).collect::<Vec<_>>(), "seed": seed });
    emit(out, &value, Provenance::new("meb", params, vertices(omega)))
}

fn ball(omega: &ConvexRegion, cfg: &GeomCfg, sites: &[Point], radius: f64, out: Option<&Path>) -> Result<()> {
    expect_sites(sites, 1, "ball")?;
    ensure!(radius >= 0.0, "--radius must be non-negative");
    let ball = HilbertBall::around(sites[0], radius, omega, cfg).context("building the ball")?;
    let value = ball_json(&ball, omega, cfg)?;
    let params = json!({ "site": xy(sites[0]), "radius": radius });
    emit(out, &value, Provenance::new("ball", params, vertices(omega)))
}

/// One row per grid cell: `x, y, pi, side, grad_x, grad_y`.
fn pi_frame(field: &PiField) -> PolarsResult<DataFrame> {
    let n = field.width * field.height;
    let grad = field.gradient();
    let mut xs = Vec::with_capacity(n);
    let mut ys = Vec::with_capacity(n);
    for y in 0..field.height {
        for x in 0..field.width {
            let p = field.point(x, y);
            xs.push(p.x);
            ys.push(p.y);
        }
    }
    let gx: Vec<Option<f64>> = grad.iter().map(|g| g.map(|v| v.x)).collect();
    let gy: Vec<Option<f64>> = grad.iter().map(|g| g.map(|v| v.y)).collect();
    df!(
        "x" => xs,
        "y" => ys,
        "pi" => field.pi.clone(),
        "side" => field.side.clone(),
        "grad_x" => gx,
        "grad_y" => gy
    )
}

fn write_frame(df: &mut DataFrame, path: &Path) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !matches!(ext, "csv" | "parquet") {
        bail!("unsupported pimap output extension {ext:?} (use .csv or .parquet)");
    }
    create_parent(path)?;
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    if ext == "csv" {
        CsvWriter::new(&mut file).finish(df)?;
    } else {
        ParquetWriter::new(file).finish(df)?;
    }
    Ok(())
}

fn pimap(omega: &ConvexRegion, cfg: &GeomCfg, pcfg: PiFieldCfg, out: Option<&Path>) -> Result<()> {
    ensure!(pcfg.resolution > 0.0, "--resolution must be positive");
    ensure!(pcfg.radius > 0.0, "--radius must be positive");
    let field = pi_field(omega, cfg, &pcfg);
    let range = field.pi_range();
    tracing::info!(width = field.width, height = field.height, ?range, "pimap");
    let mut df = pi_frame(&field)?;
    let params = json!({ "resolution": pcfg.resolution, "radius": pcfg.radius });
    let Some(path) = out else {
        println!("{df}");
        return Ok(());
    };
    write_frame(&mut df, path)?;
    let sidecar = write_sidecar(path, &Provenance::new("pimap", params, vertices(omega)))?;
    tracing::info!(out = %path.display(), sidecar = %sidecar.display(), rows = df.height(), "wrote");
    Ok(())
}

fn report() -> Result<()> {
    let cfg = GeomCfg::default();
    let obj = json!({
        "code_rev": current_git_rev(),
        "hilbert_version": hilbert::VERSION,
        "geom_cfg": {
            "eps_equal": cfg.eps_equal,
            "eps_dedup": cfg.eps_dedup,
            "eps_param": cfg.eps_param,
            "eps_det": cfg.eps_det,
            "eps_step": cfg.eps_step,
            "eps_parallel": cfg.eps_parallel,
        },
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
