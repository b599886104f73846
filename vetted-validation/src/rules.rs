// Predicate chains and multi-field validation

use crate::messages::Reporter;
use crate::traits::ErasedValidator;
use crate::{Input, Params, ValidationContext, ValidationError, ValidationErrors, Validator};
use std::collections::HashMap;
use std::sync::Arc;

type Predicate<'a, T> = Box<dyn Fn(&T) -> bool + 'a>;

struct Rule<'a, T: ?Sized> {
    code: &'static str,
    params: Params,
    check: Predicate<'a, T>,
}

/// Ordered predicates evaluated fail-fast.
///
/// Each predicate is paired with the message code reported when it does not
/// hold. Only the first failure is surfaced.
pub struct RuleChain<'a, T: ?Sized> {
    rules: Vec<Rule<'a, T>>,
}

impl<'a, T: ?Sized> RuleChain<'a, T> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a predicate without parameters.
    #[allow(clippy::should_implement_trait)]
    pub fn add<F>(self, code: &'static str, check: F) -> Self
    where
        F: Fn(&T) -> bool + 'a,
    {
        self.add_with(code, Vec::new(), check)
    }

    /// Append a predicate whose message takes parameters.
    pub fn add_with<F>(mut self, code: &'static str, params: Params, check: F) -> Self
    where
        F: Fn(&T) -> bool + 'a,
    {
        self.rules.push(Rule {
            code,
            params,
            check: Box::new(check),
        });
        self
    }

    /// Append a predicate only when `enabled`.
    pub fn add_if<F>(self, enabled: bool, code: &'static str, params: Params, check: F) -> Self
    where
        F: Fn(&T) -> bool + 'a,
    {
        if enabled {
            self.add_with(code, params, check)
        } else {
            self
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Code and parameters of the first predicate that fails.
    pub fn first_failure(&self, value: &T) -> Option<(&'static str, &Params)> {
        self.rules
            .iter()
            .find(|rule| !(rule.check)(value))
            .map(|rule| (rule.code, &rule.params))
    }

    /// Run the chain, reporting the first failure.
    pub fn check(self, value: &T, reporter: &Reporter<'_>) -> Result<(), ValidationError> {
        match self.rules.into_iter().find(|rule| !(rule.check)(value)) {
            Some(rule) => Err(reporter.error(rule.code, rule.params)),
            None => Ok(()),
        }
    }
}

impl<T: ?Sized> Default for RuleChain<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates several named fields, one validator per field.
///
/// Fields are checked in registration order; a field contributes at most
/// one error. Missing fields are validated as [`Input::Null`].
#[derive(Clone, Default)]
pub struct ValidationBuilder {
    fields: Vec<(String, Arc<dyn ErasedValidator>)>,
}

impl ValidationBuilder {
    /// Create a new validation builder
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Bind a validator to a field
    pub fn field<V>(mut self, name: impl Into<String>, validator: V) -> Self
    where
        V: Validator + 'static,
        V::Output: Into<Input>,
    {
        self.fields.push((name.into(), Arc::new(validator)));
        self
    }

    /// Field names in validation order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Validate in the current locale
    pub fn validate(
        &self,
        data: &HashMap<String, Input>,
    ) -> Result<HashMap<String, Input>, ValidationErrors> {
        self.validate_with(data, &ValidationContext::current())
    }

    /// Validate all fields, returning their canonical values
    pub fn validate_with(
        &self,
        data: &HashMap<String, Input>,
        ctx: &ValidationContext,
    ) -> Result<HashMap<String, Input>, ValidationErrors> {
        let mut values = HashMap::with_capacity(self.fields.len());
        let mut errors = ValidationErrors::default();
        let missing = Input::Null;

        for (name, validator) in &self.fields {
            let input = data.get(name).unwrap_or(&missing);
            match validator.validate_erased(input, ctx) {
                Ok(value) => {
                    values.insert(name.clone(), value);
                }
                Err(error) => errors.add(error.with_field(name.clone())),
            }
        }

        if errors.is_empty() {
            Ok(values)
        } else {
            vetted_log::debug!(
                target: "vetted::validation",
                { failed = errors.len() },
                "Form validation failed"
            );
            Err(errors)
        }
    }
}
