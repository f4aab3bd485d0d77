//! Segment and fitting entities.

use pn_core::SegmentId;
use serde::{Deserialize, Serialize};

/// A local loss element (elbow, valve, entrance...) owned by one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fitting {
    pub name: String,
    /// Dimensionless loss coefficient.
    pub k: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl Fitting {
    pub fn new(name: impl Into<String>, k: f64, quantity: u32) -> Self {
        Self {
            name: name.into(),
            k,
            quantity,
        }
    }

    /// K multiplied by the quantity installed.
    pub fn total_k(&self) -> f64 {
        self.k * f64::from(self.quantity)
    }
}

/// An atomic pipe run with fixed hydraulic properties.
///
/// The identity is assigned by the store when the segment is added and is
/// never patched afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    #[serde(default)]
    pub name: String,
    pub length_m: f64,
    pub diameter_mm: f64,
    #[serde(default)]
    pub material: String,
    pub roughness_mm: f64,
    #[serde(default)]
    pub equipment_loss_m: f64,
    #[serde(default)]
    pub fittings: Vec<Fitting>,
}

impl Segment {
    /// Sum of K over all fittings, quantities included.
    pub fn total_k(&self) -> f64 {
        self.fittings.iter().map(Fitting::total_k).sum()
    }

    /// Name to show in diagrams and reports; falls back when the user left it blank.
    pub fn display_name(&self, fallback: impl FnOnce() -> String) -> String {
        if self.name.trim().is_empty() {
            fallback()
        } else {
            self.name.clone()
        }
    }
}

/// Everything a segment has except its identity: the input to `add_*`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentDraft {
    #[serde(default)]
    pub name: String,
    pub length_m: f64,
    pub diameter_mm: f64,
    #[serde(default)]
    pub material: String,
    pub roughness_mm: f64,
    #[serde(default)]
    pub equipment_loss_m: f64,
    #[serde(default)]
    pub fittings: Vec<Fitting>,
}

impl Default for SegmentDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            length_m: 10.0,
            diameter_mm: 102.3,
            material: "Carbon Steel (New)".to_string(),
            roughness_mm: 0.045,
            equipment_loss_m: 0.0,
            fittings: Vec::new(),
        }
    }
}

impl SegmentDraft {
    pub fn new(name: impl Into<String>, length_m: f64, diameter_mm: f64) -> Self {
        Self {
            name: name.into(),
            length_m,
            diameter_mm,
            ..Self::default()
        }
    }

    pub fn with_roughness(mut self, material: impl Into<String>, roughness_mm: f64) -> Self {
        self.material = material.into();
        self.roughness_mm = roughness_mm;
        self
    }

    pub fn with_equipment_loss(mut self, loss_m: f64) -> Self {
        self.equipment_loss_m = loss_m;
        self
    }

    pub fn with_fitting(mut self, fitting: Fitting) -> Self {
        self.fittings.push(fitting);
        self
    }

    /// Attach a freshly minted identity.
    pub(crate) fn into_segment(self, id: SegmentId) -> Segment {
        Segment {
            id,
            name: self.name,
            length_m: self.length_m,
            diameter_mm: self.diameter_mm,
            material: self.material,
            roughness_mm: self.roughness_mm,
            equipment_loss_m: self.equipment_loss_m,
            fittings: self.fittings,
        }
    }
}

/// Partial update for a segment. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_loss_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fittings: Option<Vec<Fitting>>,
}

impl SegmentPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn length(length_m: f64) -> Self {
        Self {
            length_m: Some(length_m),
            ..Self::default()
        }
    }

    pub fn diameter(diameter_mm: f64) -> Self {
        Self {
            diameter_mm: Some(diameter_mm),
            ..Self::default()
        }
    }

    /// Merge present fields into `segment`. Returns whether anything changed.
    pub fn apply(&self, segment: &mut Segment) -> bool {
        let before = segment.clone();
        if let Some(name) = &self.name {
            segment.name.clone_from(name);
        }
        if let Some(v) = self.length_m {
            segment.length_m = v;
        }
        if let Some(v) = self.diameter_mm {
            segment.diameter_mm = v;
        }
        if let Some(material) = &self.material {
            segment.material.clone_from(material);
        }
        if let Some(v) = self.roughness_mm {
            segment.roughness_mm = v;
        }
        if let Some(v) = self.equipment_loss_m {
            segment.equipment_loss_m = v;
        }
        if let Some(fittings) = &self.fittings {
            segment.fittings.clone_from(fittings);
        }
        *segment != before
    }
}
