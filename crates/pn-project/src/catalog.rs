//! Built-in reference data: pipe materials, nominal diameters, fluids, fittings.

use pn_topology::{Fitting, SegmentDraft};

use crate::schema::Fluid;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialEntry {
    pub name: &'static str,
    /// Absolute roughness, mm.
    pub roughness_mm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiameterEntry {
    /// Nominal size label, e.g. `4" (100mm)`.
    pub nominal: &'static str,
    /// Internal diameter, mm.
    pub internal_mm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidEntry {
    pub name: &'static str,
    pub rho: f64,
    pub nu: f64,
    pub pv_kpa: f64,
}

impl FluidEntry {
    pub fn to_fluid(&self) -> Fluid {
        Fluid {
            name: self.name.to_string(),
            rho: self.rho,
            nu: self.nu,
            pv_kpa: self.pv_kpa,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittingEntry {
    pub name: &'static str,
    pub k: f64,
}

impl FittingEntry {
    pub fn to_fitting(&self, quantity: u32) -> Fitting {
        Fitting::new(self.name, self.k, quantity)
    }
}

const MATERIALS: [MaterialEntry; 12] = [
    MaterialEntry { name: "Carbon Steel (New)", roughness_mm: 0.045 },
    MaterialEntry { name: "Carbon Steel (Used)", roughness_mm: 0.2 },
    MaterialEntry { name: "Carbon Steel (Corroded)", roughness_mm: 0.5 },
    MaterialEntry { name: "Galvanized Steel", roughness_mm: 0.15 },
    MaterialEntry { name: "Stainless Steel (304/316)", roughness_mm: 0.002 },
    MaterialEntry { name: "Cast Iron (New)", roughness_mm: 0.26 },
    MaterialEntry { name: "Cast Iron (Used)", roughness_mm: 0.8 },
    MaterialEntry { name: "PVC / Plastic / HDPE", roughness_mm: 0.0015 },
    MaterialEntry { name: "Concrete (Smooth)", roughness_mm: 0.3 },
    MaterialEntry { name: "Concrete (Rough)", roughness_mm: 2.0 },
    MaterialEntry { name: "Copper / Brass", roughness_mm: 0.0015 },
    MaterialEntry { name: "Glass", roughness_mm: 0.0001 },
];

const DIAMETERS: [DiameterEntry; 22] = [
    DiameterEntry { nominal: "1/2\" (15mm)", internal_mm: 15.8 },
    DiameterEntry { nominal: "3/4\" (20mm)", internal_mm: 20.9 },
    DiameterEntry { nominal: "1\" (25mm)", internal_mm: 26.6 },
    DiameterEntry { nominal: "1 1/4\" (32mm)", internal_mm: 35.1 },
    DiameterEntry { nominal: "1 1/2\" (40mm)", internal_mm: 40.9 },
    DiameterEntry { nominal: "2\" (50mm)", internal_mm: 52.5 },
    DiameterEntry { nominal: "2 1/2\" (65mm)", internal_mm: 62.7 },
    DiameterEntry { nominal: "3\" (75mm)", internal_mm: 77.9 },
    DiameterEntry { nominal: "4\" (100mm)", internal_mm: 102.3 },
    DiameterEntry { nominal: "5\" (125mm)", internal_mm: 128.2 },
    DiameterEntry { nominal: "6\" (150mm)", internal_mm: 154.1 },
    DiameterEntry { nominal: "8\" (200mm)", internal_mm: 202.7 },
    DiameterEntry { nominal: "10\" (250mm)", internal_mm: 254.5 },
    DiameterEntry { nominal: "12\" (300mm)", internal_mm: 303.2 },
    DiameterEntry { nominal: "14\" (350mm)", internal_mm: 333.4 },
    DiameterEntry { nominal: "16\" (400mm)", internal_mm: 381.0 },
    DiameterEntry { nominal: "18\" (450mm)", internal_mm: 428.6 },
    DiameterEntry { nominal: "20\" (500mm)", internal_mm: 477.8 },
    DiameterEntry { nominal: "24\" (600mm)", internal_mm: 574.6 },
    DiameterEntry { nominal: "30\" (750mm)", internal_mm: 717.6 },
    DiameterEntry { nominal: "36\" (900mm)", internal_mm: 863.6 },
    DiameterEntry { nominal: "40\" (1000mm)", internal_mm: 965.2 },
];

const FLUIDS: [FluidEntry; 2] = [
    FluidEntry { name: "Water (20°C)", rho: 998.2, nu: 1.004e-6, pv_kpa: 2.34 },
    FluidEntry { name: "Ethanol (20°C)", rho: 789.0, nu: 1.51e-6, pv_kpa: 5.8 },
];

const FITTINGS: [FittingEntry; 14] = [
    FittingEntry { name: "Sharp-Edged Entrance", k: 0.5 },
    FittingEntry { name: "Slightly Rounded Entrance", k: 0.2 },
    FittingEntry { name: "Well Rounded Entrance", k: 0.04 },
    FittingEntry { name: "Pipe Exit", k: 1.0 },
    FittingEntry { name: "Gate Valve (Fully Open)", k: 0.2 },
    FittingEntry { name: "Gate Valve (1/2 Open)", k: 5.6 },
    FittingEntry { name: "Globe Valve (Fully Open)", k: 10.0 },
    FittingEntry { name: "Swing Check Valve", k: 2.5 },
    FittingEntry { name: "Elbow 90° (Long Radius)", k: 0.6 },
    FittingEntry { name: "Elbow 90° (Short Radius)", k: 0.9 },
    FittingEntry { name: "Elbow 45°", k: 0.4 },
    FittingEntry { name: "Return Bend 180°", k: 2.2 },
    FittingEntry { name: "Tee (Run Through)", k: 0.6 },
    FittingEntry { name: "Tee (Branch Flow)", k: 1.8 },
];

/// Read-only reference tables, in display order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog;

impl Catalog {
    pub fn builtin() -> Self {
        Self
    }

    pub fn materials(&self) -> &'static [MaterialEntry] {
        &MATERIALS
    }

    pub fn diameters(&self) -> &'static [DiameterEntry] {
        &DIAMETERS
    }

    pub fn fluids(&self) -> &'static [FluidEntry] {
        &FLUIDS
    }

    pub fn fittings(&self) -> &'static [FittingEntry] {
        &FITTINGS
    }

    pub fn material(&self, name: &str) -> Option<&'static MaterialEntry> {
        MATERIALS.iter().find(|e| e.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn diameter(&self, nominal: &str) -> Option<&'static DiameterEntry> {
        DIAMETERS.iter().find(|e| e.nominal == nominal.trim())
    }

    pub fn fluid(&self, name: &str) -> Option<&'static FluidEntry> {
        FLUIDS.iter().find(|e| e.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn fitting(&self, name: &str) -> Option<&'static FittingEntry> {
        FITTINGS.iter().find(|e| e.name.eq_ignore_ascii_case(name.trim()))
    }

    /// First material whose roughness matches `roughness_mm` exactly.
    pub fn material_by_roughness(&self, roughness_mm: f64) -> Option<&'static MaterialEntry> {
        MATERIALS.iter().find(|e| e.roughness_mm == roughness_mm)
    }

    /// Segment draft with roughness and internal diameter taken from the tables.
    ///
    /// Returns `None` when either name is unknown.
    pub fn draft_for(&self, material: &str, nominal: &str) -> Option<SegmentDraft> {
        let material = self.material(material)?;
        let diameter = self.diameter(nominal)?;
        Some(SegmentDraft {
            diameter_mm: diameter.internal_mm,
            ..SegmentDraft::default()
        }
        .with_roughness(material.name, material.roughness_mm))
    }
}
