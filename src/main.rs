use clap::{Args, Parser, Subcommand};
use indexed_mesh::silhouette::{facing_away, silhouette_edges};
use indexed_mesh::{MeshBuilder, ObjConfig, SilhouetteConfig, Vector3};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version = "0.1", author = "Ryan G.")]
struct Opts {
  /// Log stage details
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  method: Methods,
}

#[derive(Subcommand)]
enum Methods {
  /// print welded vertex and topology counts
  Info(InputOpts),
  /// write the welded mesh as a single-indexed obj
  Weld {
    #[command(flatten)]
    input: InputOpts,
    /// Output mesh file
    outfile: PathBuf,
  },
  /// dump the renderer buffers as json
  Buffers {
    #[command(flatten)]
    input: InputOpts,
    /// Output file, stdout when absent
    #[arg(short, long)]
    output: Option<PathBuf>,
  },
  /// list vertices facing away from the viewer and count outline edges
  Silhouette {
    #[command(flatten)]
    input: InputOpts,
    /// Direction toward the viewer
    #[arg(long, num_args = 3, default_values_t = [0.0, 0.0, 1.0])]
    view: Vec<f32>,
    /// Cosine below which a vertex faces away
    #[arg(long, default_value_t = 0.5)]
    threshold: f32,
  },
}

#[derive(Args)]
struct InputOpts {
  /// Input mesh file
  infile: PathBuf,
  /// Pad positions and normals with w = 1
  #[arg(long)]
  homogeneous: bool,
  /// Components per texture coordinate (2 or 3)
  #[arg(long, default_value_t = 2)]
  texcoord_dimension: usize,
}

impl InputOpts {
  fn load(&self) -> indexed_mesh::Result<MeshBuilder> {
    let config = ObjConfig {
      homogeneous: self.homogeneous,
      texcoord_dimension: self.texcoord_dimension,
    };
    MeshBuilder::from_obj(&self.infile, &config)
  }
}

fn main() {
  let opts: Opts = Opts::parse();

  let level = if opts.verbose { "debug" } else { "info" };
  env_logger::Builder::from_env(
    env_logger::Env::default().default_filter_or(level),
  )
  .init();

  if let Err(e) = run(opts) {
    eprintln!("Error: {}", e);
    std::process::exit(1);
  }
}

fn run(opts: Opts) -> indexed_mesh::Result<()> {
  match opts.method {
    Methods::Info(input) => {
      let mesh = input.load()?.build()?;
      let topology = mesh.topology();

      println!("File: {}", input.infile.display());
      println!("Vertices: {}", mesh.vertex_count());
      println!("Faces: {}", topology.num_faces());
      println!("Edges: {}", topology.num_edges());
      println!("Half-edges: {}", topology.num_half_edges());
      println!("Triangles: {}", mesh.to_buffers().num_triangles());
      println!("Boundary half-edges: {}", topology.num_boundary_edges());
      println!(
        "Boundary vertices: {}",
        topology.boundary_vertices().count()
      );
      println!("Closed: {}", topology.is_closed());
    }
    Methods::Weld { input, outfile } => {
      let mesh = input.load()?.build()?;
      mesh.to_buffers().write_obj(&outfile)?;
      println!(
        "wrote {} vertices to {}",
        mesh.vertex_count(),
        outfile.display()
      );
    }
    Methods::Buffers { input, output } => {
      let buffers = input.load()?.build()?.to_buffers();
      match output {
        Some(path) => buffers.write_json(BufWriter::new(File::create(path)?))?,
        None => buffers.write_json(std::io::stdout().lock())?,
      }
    }
    Methods::Silhouette {
      input,
      view,
      threshold,
    } => {
      let mesh = input.load()?.build()?;
      let config = SilhouetteConfig {
        view: Vector3::new(view[0], view[1], view[2]),
        cos_threshold: threshold,
      };

      let away = facing_away(&mesh.to_buffers(), &config)?;
      println!("Facing away: {:?}", away);
      let edges = silhouette_edges(&mesh, &config)?;
      println!("Silhouette edges: {}", edges.len());
    }
  }

  Ok(())
}
