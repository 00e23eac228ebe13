//! Categorical encoder artifacts

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

/// Training-time vocabularies, one per categorical column, exported as
/// `{"<column>": ["class0", "class1", ...]}`. A category's code is its
/// index in the class list.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct Encoders {
    columns: HashMap<String, Vec<String>>,
}

impl Encoders {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Code for a category seen during training, `None` otherwise.
    pub fn code(&self, column: &str, value: &str) -> Option<i64> {
        self.columns
            .get(column)?
            .iter()
            .position(|class| class == value)
            .map(|idx| idx as i64)
    }

    /// An unseen category degrades to code 0 rather than failing the
    /// request. Note that 0 is also the first training-time class, so the
    /// two are indistinguishable downstream.
    pub fn code_or_default(&self, column: &str, value: &str) -> i64 {
        self.code(column, value).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Encoders {
        serde_json::from_value(serde_json::json!({
            "attacktype1_txt": ["Armed Assault", "Bombing/Explosion", "Hijacking"],
            "weaptype1_txt": ["Explosives", "Firearms"]
        }))
        .unwrap()
    }

    #[test]
    fn test_known_category_gets_class_index() {
        let encoders = sample();
        assert_eq!(encoders.code("attacktype1_txt", "Bombing/Explosion"), Some(1));
        assert_eq!(encoders.code("weaptype1_txt", "Explosives"), Some(0));
    }

    #[test]
    fn test_unseen_category_falls_back_to_zero() {
        let encoders = sample();
        assert_eq!(encoders.code("attacktype1_txt", "Orbital Laser"), None);
        assert_eq!(encoders.code_or_default("attacktype1_txt", "Orbital Laser"), 0);
    }

    #[test]
    fn test_unknown_column_falls_back_to_zero() {
        let encoders = sample();
        assert!(!encoders.contains_column("targtype1_txt"));
        assert_eq!(encoders.code_or_default("targtype1_txt", "Military"), 0);
    }
}
