use serde::{Deserialize, Serialize};

/// Degree of freedom carried by a basis site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SiteDoF {
    /// Discrete choice among the listed occupants.
    Occupation { occupants: Vec<String> },
    /// Cartesian displacement vector (x, y, z), rotates with the symmetry operation.
    Displacement,
    /// A single continuous variable that is invariant under symmetry (e.g. a local expansion).
    Scalar { name: String },
}

impl SiteDoF {
    pub fn occupation<S: AsRef<str>>(occupants: &[S]) -> Self {
        SiteDoF::Occupation {
            occupants: occupants.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    /// Number of allowed states (occupations) or components (continuous).
    pub fn num_components(&self) -> usize {
        match self {
            SiteDoF::Occupation { occupants } => occupants.len(),
            SiteDoF::Displacement => 3,
            SiteDoF::Scalar { .. } => 1,
        }
    }

    /// Number of site variables the DoF contributes to cluster functions.
    /// Occupation DoFs drop the constant site function.
    pub fn num_variables(&self) -> usize {
        match self {
            SiteDoF::Occupation { occupants } => occupants.len().saturating_sub(1),
            SiteDoF::Displacement => 3,
            SiteDoF::Scalar { .. } => 1,
        }
    }

    pub fn is_continuous(&self) -> bool {
        !matches!(self, SiteDoF::Occupation { .. })
    }

    /// A DoF with no allowed states cannot be expanded.
    pub fn is_valid(&self) -> bool {
        self.num_components() > 0
    }

    /// True if the site takes part in cluster generation given the minimum
    /// number of occupation components. Continuous DoFs always qualify.
    pub fn is_active(&self, min_num_components: usize) -> bool {
        match self {
            SiteDoF::Occupation { occupants } => occupants.len() >= min_num_components,
            _ => true,
        }
    }

    /// Short label of variable `index` of this DoF.
    pub fn variable_name(&self, index: usize) -> String {
        match self {
            SiteDoF::Occupation { .. } => format!("phi{}", index + 1),
            SiteDoF::Displacement => ["dx", "dy", "dz"]
                .get(index)
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("d{}", index)),
            SiteDoF::Scalar { name } => name.clone(),
        }
    }
}
