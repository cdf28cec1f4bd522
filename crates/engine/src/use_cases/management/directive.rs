//! Directive rule management.

use std::sync::Arc;

use scenescript_domain::{BuiltinHandler, DirectiveRule, RuleKindTag};

use crate::infrastructure::ports::DirectiveRuleRepo;
use crate::use_cases::validation::require_non_empty;

use super::ManagementError;

pub struct DirectiveCrud {
    rules: Arc<dyn DirectiveRuleRepo>,
}

impl DirectiveCrud {
    pub fn new(rules: Arc<dyn DirectiveRuleRepo>) -> Self {
        Self { rules }
    }

    /// User rules in registration order
    pub fn list(&self) -> Result<Vec<DirectiveRule>, ManagementError> {
        Ok(self.rules.list()?)
    }

    /// Directive names handled without any user rule
    pub fn builtin_names(&self) -> Vec<&'static str> {
        BuiltinHandler::ALL
            .iter()
            .map(BuiltinHandler::directive_name)
            .collect()
    }

    /// Register a rule. Names already registered are rejected; built-in
    /// names may be shadowed.
    pub fn add(
        &self,
        name: &str,
        kind: RuleKindTag,
        text: &str,
    ) -> Result<DirectiveRule, ManagementError> {
        require_non_empty(name, "directive name")?;
        if kind != RuleKindTag::Builtin {
            require_non_empty(text, "rule text")?;
        }

        let rule = DirectiveRule::from_parts(name, kind, text)?;
        if self.rules.get(rule.name())?.is_some() {
            return Err(ManagementError::Conflict(format!(
                "'{}' rule already exists",
                rule.name()
            )));
        }

        self.rules.save(&rule)?;
        tracing::info!(directive = %rule.name(), kind = %kind, "Directive rule added");
        Ok(rule)
    }

    pub fn delete(&self, name: &str) -> Result<(), ManagementError> {
        if !self.rules.delete(name.trim())? {
            return Err(ManagementError::NotFound(format!("directive rule '{}'", name.trim())));
        }
        tracing::info!(directive = %name.trim(), "Directive rule deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockDirectiveRuleRepo;
    use mockall::predicate::eq;
    use scenescript_domain::RuleKind;

    #[test]
    fn adds_template_rule() {
        let mut rules = MockDirectiveRuleRepo::new();
        rules.expect_get().with(eq("장면")).returning(|_| Ok(None));
        rules
            .expect_save()
            .withf(|rule| rule.name() == "장면")
            .times(1)
            .returning(|_| Ok(()));

        let crud = DirectiveCrud::new(Arc::new(rules));
        let rule = crud
            .add(" 장면 ", RuleKindTag::Template, "장면_전환()\\n#{{dialogue}}")
            .unwrap();

        assert!(matches!(rule.kind(), RuleKind::Template(_)));
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut rules = MockDirectiveRuleRepo::new();
        rules
            .expect_get()
            .returning(|_| Ok(Some(DirectiveRule::fixed("장면", "x").unwrap())));
        rules.expect_save().never();

        let crud = DirectiveCrud::new(Arc::new(rules));
        let err = crud.add("장면", RuleKindTag::Simple, "y").unwrap_err();

        assert!(matches!(err, ManagementError::Conflict(_)));
        assert_eq!(err.to_string(), "Conflict: '장면' rule already exists");
    }

    #[test]
    fn text_is_required_for_template_and_simple_rules() {
        let crud = DirectiveCrud::new(Arc::new(MockDirectiveRuleRepo::new()));
        let err = crud.add("장면", RuleKindTag::Simple, "  ").unwrap_err();
        assert!(matches!(err, ManagementError::InvalidInput(_)));
    }

    #[test]
    fn builtin_names_may_be_shadowed() {
        let mut rules = MockDirectiveRuleRepo::new();
        rules.expect_get().returning(|_| Ok(None));
        rules.expect_save().returning(|_| Ok(()));

        let crud = DirectiveCrud::new(Arc::new(rules));
        assert!(crud.builtin_names().contains(&"카메라"));
        assert!(crud.add("카메라", RuleKindTag::Simple, "줌_인()").is_ok());
    }

    #[test]
    fn deleting_unknown_rule_is_not_found() {
        let mut rules = MockDirectiveRuleRepo::new();
        rules.expect_delete().with(eq("없음")).returning(|_| Ok(false));

        let crud = DirectiveCrud::new(Arc::new(rules));
        assert!(matches!(crud.delete("없음"), Err(ManagementError::NotFound(_))));
    }
}
