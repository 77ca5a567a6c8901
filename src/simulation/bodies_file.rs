//! Flat text format for generated bodies
//!
//! One `# <title>` header line, then one `x,y,z,vx,vy,vz,mass` line per body
//! in SI units. Line order (header excluded, 0-based) is the body id the
//! integrator assigns. Floats are written in shortest round-trip form.

use std::io::{self, BufRead, Write};

use crate::simulation::states::{Body3, Cluster, NVec3};

#[derive(Debug, thiserror::Error)]
pub enum ClusterFileError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

/// Write the header line and one line per body, then flush
pub fn write_cluster<W: Write>(out: &mut W, title: &str, cluster: &Cluster) -> io::Result<()> {
    writeln!(out, "# {title}")?;
    for b in &cluster.bodies {
        writeln!(
            out,
            "{:e},{:e},{:e},{:e},{:e},{:e},{:e}",
            b.x.x, b.x.y, b.x.z, b.v.x, b.v.y, b.v.z, b.m
        )?;
    }
    out.flush()
}

/// Read a bodies file back. Blank lines and `#` lines are skipped.
pub fn read_cluster<R: BufRead>(input: R) -> Result<Cluster, ClusterFileError> {
    let mut bodies = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let malformed = |reason: String| ClusterFileError::Malformed { line: idx + 1, reason };

        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if fields.len() != 7 {
            return Err(malformed(format!("expected 7 fields, found {}", fields.len())));
        }

        let mut vals = [0.0f64; 7];
        for (slot, field) in vals.iter_mut().zip(&fields) {
            *slot = field
                .parse::<f64>()
                .map_err(|e| malformed(format!("`{field}`: {e}")))?;
        }

        bodies.push(Body3 {
            x: NVec3::new(vals[0], vals[1], vals[2]),
            v: NVec3::new(vals[3], vals[4], vals[5]),
            m: vals[6],
        });
    }

    Ok(Cluster { bodies })
}
