//! Scenario migration framework.

use tracing::debug;

use crate::ProjectError;
use crate::catalog::Catalog;
use crate::schema::Scenario;

pub const LATEST_VERSION: u32 = 1;

/// Name given to segments whose roughness matches no catalog material.
pub const CUSTOM_MATERIAL: &str = "Custom";

pub fn migrate_to_latest(mut scenario: Scenario) -> Result<Scenario, ProjectError> {
    while scenario.version < LATEST_VERSION {
        scenario = migrate_one_version(scenario)?;
    }
    Ok(scenario)
}

fn migrate_one_version(scenario: Scenario) -> Result<Scenario, ProjectError> {
    match scenario.version {
        0 => migrate_v0_to_v1(scenario),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 0 stored only roughness; version 1 also names the pipe material.
fn migrate_v0_to_v1(mut scenario: Scenario) -> Result<Scenario, ProjectError> {
    let catalog = Catalog::builtin();
    let mut named = 0usize;
    for segment in scenario.topology.segments_mut() {
        if segment.material.trim().is_empty() {
            segment.material = catalog
                .material_by_roughness(segment.roughness_mm)
                .map_or(CUSTOM_MATERIAL, |e| e.name)
                .to_string();
            named += 1;
        }
    }
    debug!(named, "migrated scenario from version 0 to 1");
    scenario.version = 1;
    Ok(scenario)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pn_core::SegmentId;
    use pn_topology::Segment;

    fn bare(id: &str, roughness_mm: f64) -> Segment {
        Segment {
            id: SegmentId::new(id),
            name: String::new(),
            length_m: 1.0,
            diameter_mm: 50.0,
            material: String::new(),
            roughness_mm,
            equipment_loss_m: 0.0,
            fittings: Vec::new(),
        }
    }

    #[test]
    fn v0_segments_get_material_names() {
        let mut scenario = Scenario::new("old");
        scenario.version = 0;
        scenario.topology.suction.push(bare("a", 0.045));
        scenario
            .topology
            .parallel_branches
            .insert("A", vec![bare("b", 0.123)]);

        let migrated = migrate_to_latest(scenario).unwrap();
        assert_eq!(migrated.version, LATEST_VERSION);
        assert_eq!(migrated.topology.suction[0].material, "Carbon Steel (New)");
        let branch = migrated.topology.parallel_branches.get("A").unwrap();
        assert_eq!(branch.segments[0].material, CUSTOM_MATERIAL);
    }

    #[test]
    fn latest_is_untouched() {
        let scenario = Scenario::new("current");
        assert_eq!(migrate_to_latest(scenario.clone()).unwrap(), scenario);
    }
}
