//! Rotation scheme registry: one rotation rule per squad type.

use std::collections::HashMap;

use tracing::debug;

use crate::models::RotationScheme;

/// Maps each squad type name to its rotation scheme. Populated at
/// configuration time; read-only afterwards.
#[derive(Debug, Default)]
pub struct SchemeRegistry {
    schemes: HashMap<String, RotationScheme>,
}

impl SchemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a scheme to a squad type, replacing any previous binding.
    pub fn bind(&mut self, squad_type: &str, scheme: RotationScheme) {
        debug!(
            squad_type,
            unit = ?scheme.period_unit,
            epoch = %scheme.epoch_date,
            "Rotation scheme bound"
        );
        self.schemes.insert(squad_type.to_string(), scheme);
    }

    pub fn scheme_for(&self, squad_type: &str) -> Option<&RotationScheme> {
        self.schemes.get(squad_type)
    }

    pub fn is_bound(&self, squad_type: &str) -> bool {
        self.schemes.contains_key(squad_type)
    }
}
