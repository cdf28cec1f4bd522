//! Expression map management.

use std::sync::Arc;

use scenescript_domain::ExpressionMap;

use crate::infrastructure::ports::ExpressionRepo;
use crate::use_cases::validation::require_non_empty;

use super::ManagementError;

pub struct ExpressionCrud {
    expressions: Arc<dyn ExpressionRepo>,
}

impl ExpressionCrud {
    pub fn new(expressions: Arc<dyn ExpressionRepo>) -> Self {
        Self { expressions }
    }

    pub fn list(&self) -> Result<ExpressionMap, ManagementError> {
        Ok(self.expressions.load()?)
    }

    /// Map a label to a suffix, replacing any previous suffix.
    pub fn set(&self, label: &str, suffix: &str) -> Result<ExpressionMap, ManagementError> {
        require_non_empty(label, "expression label")?;
        require_non_empty(suffix, "expression suffix")?;

        let mut map = self.expressions.load()?;
        map.insert(label.trim(), suffix.trim());
        self.expressions.replace(&map)?;
        Ok(map)
    }

    pub fn remove(&self, label: &str) -> Result<ExpressionMap, ManagementError> {
        let mut map = self.expressions.load()?;
        if map.remove(label).is_none() {
            return Err(ManagementError::NotFound(format!("expression '{}'", label.trim())));
        }
        self.expressions.replace(&map)?;
        Ok(map)
    }

    /// Overwrite the whole map
    pub fn replace(&self, map: ExpressionMap) -> Result<(), ManagementError> {
        self.expressions.replace(&map)?;
        tracing::info!(mappings = map.len(), "Expression map replaced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockExpressionRepo;

    #[test]
    fn set_adds_mapping_and_persists() {
        let mut expressions = MockExpressionRepo::new();
        expressions.expect_load().returning(|| Ok(ExpressionMap::standard()));
        expressions
            .expect_replace()
            .withf(|map| map.get("놀람") == Some("Surprised") && map.get("화남") == Some("Angry"))
            .times(1)
            .returning(|_| Ok(()));

        let crud = ExpressionCrud::new(Arc::new(expressions));
        let map = crud.set(" 놀람 ", "Surprised").unwrap();
        assert_eq!(map.suffix_for("놀람"), "Surprised");
    }

    #[test]
    fn blank_suffix_is_rejected() {
        let crud = ExpressionCrud::new(Arc::new(MockExpressionRepo::new()));
        assert!(matches!(
            crud.set("놀람", " "),
            Err(ManagementError::InvalidInput(_))
        ));
    }

    #[test]
    fn removing_unknown_label_is_not_found() {
        let mut expressions = MockExpressionRepo::new();
        expressions.expect_load().returning(|| Ok(ExpressionMap::new()));
        expressions.expect_replace().never();

        let crud = ExpressionCrud::new(Arc::new(expressions));
        assert!(matches!(crud.remove("화남"), Err(ManagementError::NotFound(_))));
    }
}
