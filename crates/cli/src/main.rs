use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::Path;
use tracing_subscriber::fmt::SubscriberBuilder;

use triangulator::hull;
use triangulator::input;
use triangulator::service::Triangulator;
use triangulator::wire;

mod store;

#[derive(Parser)]
#[command(name = "triangulator")]
#[command(about = "Point-set codec and triangulation tools")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Encode a JSON point list into the binary PointSet format
    Encode {
        #[arg(long)]
        input: String,
        #[arg(long)]
        out: String,
    },
    /// Decode a binary PointSet (or Triangulation) file into JSON on stdout
    Decode {
        #[arg(long)]
        input: String,
        /// Treat the input as a Triangulation buffer instead of a PointSet
        #[arg(long)]
        triangulation: bool,
    },
    /// Triangulate a binary PointSet file and write the binary Triangulation
    Triangulate {
        #[arg(long)]
        input: String,
        #[arg(long)]
        out: String,
    },
    /// Fetch a point set by id from the directory store and triangulate it
    Fetch {
        #[arg(long)]
        id: String,
        /// Store root; defaults to $TRIANGULATOR_STORE
        #[arg(long)]
        store: Option<String>,
        #[arg(long)]
        out: String,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Encode { input, out } => encode(input, out),
        Action::Decode {
            input,
            triangulation,
        } => decode(input, triangulation),
        Action::Triangulate { input, out } => triangulate(input, out),
        Action::Fetch { id, store, out } => fetch(id, store, out),
    }
}

fn encode(input: String, out: String) -> Result<()> {
    tracing::info!(input, out, "encode");
    let text =
        std::fs::read_to_string(&input).with_context(|| format!("reading {input}"))?;
    let doc: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("parsing {input}"))?;
    let points = input::pointset_from_json(&doc)?;
    let bytes = wire::encode_pointset(&points)?;
    write_out(&out, &bytes)?;
    tracing::info!(points = points.len(), bytes = bytes.len(), "encoded");
    Ok(())
}

fn decode(input: String, triangulation: bool) -> Result<()> {
    tracing::info!(input, triangulation, "decode");
    let raw = std::fs::read(&input).with_context(|| format!("reading {input}"))?;
    let doc = if triangulation {
        let (points, triangles) = wire::decode_triangulation(&raw)?;
        serde_json::json!({
            "points": input::pointset_to_json(&points),
            "triangles": input::triangles_to_json(&triangles),
        })
    } else {
        let points = wire::decode_pointset(&raw)?;
        input::pointset_to_json(&points)
    };
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn triangulate(input: String, out: String) -> Result<()> {
    tracing::info!(input, out, "triangulate");
    let raw = std::fs::read(&input).with_context(|| format!("reading {input}"))?;
    let points = wire::decode_pointset(&raw)?;
    let triangles = hull::triangulate(&points)?;
    let bytes = wire::encode_triangulation(&points, &triangles)?;
    write_out(&out, &bytes)?;
    tracing::info!(
        points = points.len(),
        triangles = triangles.len(),
        bytes = bytes.len(),
        "triangulated"
    );
    Ok(())
}

fn fetch(id: String, store: Option<String>, out: String) -> Result<()> {
    let root = match store.or_else(|| std::env::var("TRIANGULATOR_STORE").ok()) {
        Some(root) => root,
        None => bail!("no store configured: pass --store or set TRIANGULATOR_STORE"),
    };
    tracing::info!(id, root, out, "fetch");
    let svc = Triangulator::new(store::DirStore::new(&root));
    match svc.triangulation(&id) {
        Ok(bytes) => {
            write_out(&out, &bytes)?;
            tracing::info!(bytes = bytes.len(), "fetched");
            Ok(())
        }
        Err(err) => {
            let body = err.body();
            eprintln!("{}", serde_json::to_string(&body)?);
            bail!("fetch failed with status {}: {}", err.status(), body.code);
        }
    }
}

fn write_out(out: &str, bytes: &[u8]) -> Result<()> {
    let out_path = Path::new(out);
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    std::fs::write(out_path, bytes).with_context(|| format!("writing {out}"))?;
    Ok(())
}
