//! Space making by uniform scaling.

use octopus_geom::Transform;
use tracing::{debug, info, warn};

use crate::conflict::Conflict;
use crate::error::Result;
use crate::map::MetroMap;
use crate::report::PassReport;

const MIN_SCALE_FACTOR: f64 = 1.00001;

pub struct ScaleHandler<'a> {
    map: &'a mut MetroMap,
}

impl<'a> ScaleHandler<'a> {
    pub fn new(map: &'a mut MetroMap) -> Self {
        Self { map }
    }

    pub fn make_space(&mut self) -> Result<PassReport> {
        let max_iterations = self.map.options().max_iterations_scale;
        let mut iterations = 0;
        loop {
            let conflicts = self.map.evaluate_conflicts();
            info!(iteration = iterations, conflicts = conflicts.len(), "scale iteration");
            if conflicts.is_empty() {
                self.log_size();
                return Ok(PassReport::new("scale", iterations, true));
            }
            if iterations == max_iterations {
                warn!(
                    max_iterations,
                    remaining = conflicts.len(),
                    "max number of scale iterations reached"
                );
                for conflict in &conflicts {
                    warn!(conflict = %conflict.describe(self.map.graph()), "unsolved conflict");
                }
                self.log_size();
                return Ok(PassReport::new("scale", iterations, false));
            }
            let factor = self.evaluate_scale_factor(&conflicts);
            debug!(factor, "scaling map");
            self.scale(factor)?;
            iterations += 1;
        }
    }

    /// Largest factor any single conflict asks for on either axis.
    pub fn evaluate_scale_factor(&self, conflicts: &[Conflict]) -> f64 {
        let precision = self.map.graph().precision();
        let Some(bbox) = self.map.bounding_box() else {
            return MIN_SCALE_FACTOR;
        };
        let (width, height) = (bbox.width(), bbox.height());
        let mut factor: f64 = 1.0;
        for conflict in conflicts {
            if width > 0.0 {
                let dx = f64::from(conflict.displace_distance_along_x());
                factor = factor.max((width + dx) / width);
            }
            if height > 0.0 {
                let dy = f64::from(conflict.displace_distance_along_y());
                factor = factor.max((height + dy) / height);
            }
        }
        precision.make_precise(factor).max(MIN_SCALE_FACTOR)
    }

    /// Scales every node position about the origin.
    pub fn scale(&mut self, factor: f64) -> Result<()> {
        let transform = Transform::scale(factor, factor);
        let graph = self.map.graph_mut();
        for id in graph.node_ids() {
            let scaled = transform.transform_point(graph.node(id).position());
            graph.move_node(id, scaled)?;
        }
        Ok(())
    }

    fn log_size(&self) {
        if let Some((width, height)) = self.map.size() {
            info!("Size: {width}x{height}");
        }
    }
}
