use colored::*;
use eyre::{Context, Result};

use crate::cli::OutputFormat;
use crate::geometry::Viewpoint;
use crate::geometry::math::Vec3;
use crate::store::TrailStore;
use crate::tracker::Tracker;
use crate::trail::SpatialDomain;

pub fn run(
    map: &str,
    domain: SpatialDomain,
    camera: &str,
    look: &str,
    depth_override: bool,
    format: OutputFormat,
    store: TrailStore,
) -> Result<()> {
    let viewpoint = Viewpoint::new(
        parse_vec3(camera).context("Invalid --camera")?,
        parse_vec3(look).context("Invalid --look")?,
    );

    let mut tracker = Tracker::new(store);
    tracker.enter_map(map);
    tracker.set_rendering(true);
    tracker.set_depth_override(depth_override);

    let frame = tracker.build_frame(domain, &viewpoint).unwrap_or_default();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&frame)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&frame)?),
        OutputFormat::Text => {
            let settings = tracker.store().settings();
            println!("{} {} / {} ({})", "Frame".bold(), tracker.current_session().cyan(), map.cyan(), domain);
            println!(
                "  mode {}, thickness {}, subdivisions {}, render distance {}",
                settings.mode, settings.thickness, settings.subdivisions, settings.render_distance
            );
            println!("  {} source points", tracker.trail(domain).len());
            println!("  {} ribbon quads", frame.quads.len().to_string().green());
            println!("  {} fallback cubes", frame.cubes.len().to_string().yellow());
            println!("  {} quads to draw", frame.all_quads().len());
            if frame.is_empty() {
                println!("  {}", "(nothing visible from this viewpoint)".dimmed());
            }
        }
    }
    Ok(())
}

/// Parse `x,y,z`
fn parse_vec3(s: &str) -> Result<Vec3> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .with_context(|| format!("Expected x,y,z, got '{}'", s))?;

    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => eyre::bail!("Expected three components, got '{}'", s),
    }
}
