use crate::interaction::{HoverInfo, RotationState};
use crate::placement::PlacementStats;
use crate::projection::ProjectedLabel;
use crate::scene::Scene;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDump {
    pub width: f64,
    pub height: f64,
    pub active: bool,
    pub frame: u64,
    pub frame_angle: f64,
    pub rotation: RotationState,
    pub stats: StatsDump,
    pub placements: Vec<PlacementDump>,
    /// Labels of the dumped frame, back to front.
    pub projected: Vec<ProjectedLabel>,
    pub hover: Option<HoverInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDump {
    pub accepted: usize,
    pub fallbacks: usize,
    pub relax_rounds: usize,
}

#[derive(Debug, Serialize)]
pub struct PlacementDump {
    pub word: String,
    pub weight: f64,
    pub wn: f64,
    pub position: [f64; 3],
    pub theta: f64,
    pub phi: f64,
}

impl From<PlacementStats> for StatsDump {
    fn from(stats: PlacementStats) -> Self {
        Self {
            accepted: stats.accepted,
            fallbacks: stats.fallbacks,
            relax_rounds: stats.relax_rounds,
        }
    }
}

impl SceneDump {
    pub fn from_scene(scene: &Scene) -> Self {
        let placement = scene.placement();
        let placements = placement
            .labels
            .iter()
            .map(|label| PlacementDump {
                word: label.word.clone(),
                weight: label.weight,
                wn: label.normalized,
                position: label.position.to_array(),
                theta: label.theta(),
                phi: label.phi(),
            })
            .collect();

        let viewport = scene.viewport();
        Self {
            width: viewport.width,
            height: viewport.height,
            active: scene.is_active(),
            frame: scene.frame(),
            frame_angle: scene.frame_angle(),
            rotation: scene.rotation(),
            stats: placement.stats.into(),
            placements,
            projected: scene.projected().to_vec(),
            hover: scene.hover().cloned(),
        }
    }
}

pub fn scene_dump_json(scene: &Scene) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&SceneDump::from_scene(scene))?)
}

pub fn write_scene_dump(path: &Path, scene: &Scene) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = SceneDump::from_scene(scene);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
