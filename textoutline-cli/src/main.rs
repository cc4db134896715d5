use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use textoutline_core::render::channels::{required_channels, validate_layout, VertexLayout};
use textoutline_core::render::mesh::{self, glyph_quad, UiVertex, VertexStream};
use textoutline_core::{config, OutlineEffect, OutlineParams, VERSION};

#[derive(Parser, Debug)]
#[command(name = "textoutline", version = VERSION, about = "Text outline mesh tools")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and inspect an outline config YAML
    Inspect { path: String },
    /// Expand a JSON triangle list for the outline shader
    Expand {
        #[arg(long)]
        mesh: String,
        #[arg(long)]
        config: Option<String>,
        #[arg(long, default_value = "outlined.json")]
        out: String,
        /// Also write the raw vertex bytes for GPU upload
        #[arg(long)]
        raw: Option<String>,
    },
    /// Build a row of glyph quads and expand them with the default outline
    Demo {
        #[arg(long, default_value_t = 4)]
        glyphs: u32,
        #[arg(long, default_value = "demo.json")]
        out: String,
    },
    /// Print the vertex channel layout read by the outline shader
    Layout,
}

fn load_params(path: Option<&str>) -> Result<OutlineParams> {
    match path {
        Some(p) => {
            let cfg = config::load_from_path(p).with_context(|| format!("reading config {}", p))?;
            Ok(cfg.to_params()?)
        }
        None => Ok(OutlineParams::default()),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Inspect { path } => {
            let params = load_params(Some(path.as_str()))?;
            println!("Loaded outline config: {}", path);
            let c = params.color;
            println!("  color: [{:.3}, {:.3}, {:.3}, {:.3}]", c.x, c.y, c.z, c.w);
            println!("  distance: ({:.2}, {:.2})", params.distance.x, params.distance.y);
        }
        Command::Expand { mesh: mesh_path, config, out, raw } => {
            let params = load_params(config.as_deref())?;
            let mut verts = mesh::read_vertices_json(&mesh_path)
                .with_context(|| format!("reading mesh {}", mesh_path))?;
            let trailing = verts.len() % 3;
            if trailing != 0 {
                log::warn!(
                    "{} has {} vertices; trailing {} left as-is",
                    mesh_path, verts.len(), trailing
                );
            }
            let degenerate = textoutline_core::expand(&mut verts, &params);
            if degenerate > 0 {
                println!("{} degenerate triangle(s) expanded with unreliable UVs", degenerate);
            }
            mesh::write_vertices_json(&out, &verts)?;
            println!("Wrote {} vertices ({} triangles) to {}", verts.len(), verts.len() / 3, out);
            if let Some(raw) = raw {
                std::fs::write(&raw, mesh::as_bytes(&verts))?;
                let bytes = mesh::as_bytes(&verts).len();
                println!("Wrote {} bytes to {}", bytes, raw);
            }
        }
        Command::Demo { glyphs, out } => {
            let mut stream = VertexStream::new();
            let cell = 1.0 / glyphs.max(1) as f32;
            for i in 0..glyphs {
                let x = i as f32 * 12.0;
                let u = i as f32 * cell;
                stream.add_quad(glyph_quad(
                    glam::Vec2::new(x, 0.0),
                    glam::Vec2::new(x + 10.0, 16.0),
                    glam::Vec2::new(u, 0.0),
                    glam::Vec2::new(u + cell, 1.0),
                    [255; 4],
                ));
            }
            OutlineEffect::default().modify_mesh(Some(&mut stream));
            mesh::write_vertices_json(&out, stream.vertices())?;
            println!("Wrote {} glyphs ({} vertices) to {}", glyphs, stream.vertex_count(), out);
        }
        Command::Layout => {
            validate_layout::<UiVertex>()?;
            let vb = UiVertex::vertex_buffer();
            println!("stride={} step={:?}", vb.stride, vb.step);
            for a in UiVertex::vertex_attrs() {
                println!(
                    "  [{}] {:<8} {:<20} offset={:<3} size={:<2} channel={:?}",
                    a.location, a.field, a.format, a.offset, a.size, a.channel
                );
            }
            println!("required channels: {:?}", required_channels::<UiVertex>());
        }
    }
    Ok(())
}
