//! Rotation loader.

use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::rotation::RotationStep;

/// Loader for rotations from RON files.
pub struct RotationLoader;

impl RotationLoader {
    /// Load a rotation from a RON file.
    ///
    /// RON format: `[RotationStep]`
    ///
    /// Example:
    /// ```ron
    /// [
    ///     (actor: "Rosaria", action: burst),
    ///     (actor: "Sethos", action: aim, params: {"hold": 1, "weakspot": 1}),
    /// ]
    /// ```
    pub fn load(path: &Path) -> LoadResult<Vec<RotationStep>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse rotation RON at {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<Vec<RotationStep>> {
        let steps: Vec<RotationStep> = ron::from_str(content)?;
        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use sim_core::ActionKind;

    use super::*;

    #[test]
    fn params_default_to_empty() {
        let steps = RotationLoader::parse(
            r#"[
                (actor: "Xilonen", action: attack),
                (actor: "Sethos", action: aim, params: {"hold": 0, "travel": 4}),
            ]"#,
        )
        .unwrap();

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].action, ActionKind::Attack);
        assert!(steps[0].params.is_empty());
        assert_eq!(steps[1].params.get("travel"), Some(4));
    }

    #[test]
    fn unknown_actions_fail_to_parse() {
        assert!(RotationLoader::parse(r#"[(actor: "Sethos", action: fly)]"#).is_err());
    }
}
