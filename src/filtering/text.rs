use std::{
    hash::{Hash, Hasher},
    sync::Arc,
};

use sea_orm::{
    Condition, EntityTrait,
    sea_query::{Expr, SimpleExpr},
};

use super::criterion::{FilterCriterion, Predicate, accept_all};
use super::search::{contains_pattern, is_blank, upper};
use super::source::FieldSource;

/// Free text filter with whole-field, case and inversion switches.
///
/// | whole field | case sensitive | match |
/// |---|---|---|
/// | yes | yes | `value == text` |
/// | yes | no | `upper(value) == upper(text)` |
/// | no | yes | `value` contains `text` |
/// | no | no | `upper(value)` contains `upper(text)` |
///
/// `invert_result` negates the whole match. A blank text matches everything
/// whatever the switches say.
///
/// In memory, case folding is Unicode `to_uppercase`. Remotely it is the
/// database's `UPPER`, which on sqlite folds ASCII letters only, so a
/// case-insensitive match on non-ASCII text (`"é"` against `"É"`) can differ
/// between the two modes.
#[derive(Debug, Clone, Default)]
pub struct TextFilter<E: EntityTrait> {
    value: String,
    whole_field: bool,
    case_sensitive: bool,
    invert_result: bool,
    source: FieldSource<E>,
}

impl<E: EntityTrait> TextFilter<E> {
    #[must_use]
    pub fn new(source: FieldSource<E>) -> Self {
        Self {
            value: String::new(),
            whole_field: false,
            case_sensitive: false,
            invert_result: false,
            source,
        }
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    #[must_use]
    pub const fn whole_field(mut self, whole_field: bool) -> Self {
        self.whole_field = whole_field;
        self
    }

    #[must_use]
    pub const fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    #[must_use]
    pub const fn invert_result(mut self, invert_result: bool) -> Self {
        self.invert_result = invert_result;
        self
    }

    pub fn text(&self) -> &str {
        &self.value
    }

    pub fn set_text(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub const fn is_whole_field(&self) -> bool {
        self.whole_field
    }

    pub fn set_whole_field(&mut self, whole_field: bool) {
        self.whole_field = whole_field;
    }

    pub const fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.case_sensitive = case_sensitive;
    }

    pub const fn is_invert_result(&self) -> bool {
        self.invert_result
    }

    pub fn set_invert_result(&mut self, invert_result: bool) {
        self.invert_result = invert_result;
    }

    pub fn source_mut(&mut self) -> &mut FieldSource<E> {
        &mut self.source
    }

    fn matcher(&self) -> Predicate<String> {
        let text = self.value.clone();
        match (self.whole_field, self.case_sensitive) {
            (true, true) => Arc::new(move |value: &String| *value == text),
            (true, false) => {
                let text = text.to_uppercase();
                Arc::new(move |value: &String| value.to_uppercase() == text)
            }
            (false, true) => Arc::new(move |value: &String| value.contains(text.as_str())),
            (false, false) => {
                let text = text.to_uppercase();
                Arc::new(move |value: &String| value.to_uppercase().contains(text.as_str()))
            }
        }
    }

    fn constrain(&self, expr: SimpleExpr) -> SimpleExpr {
        match (self.whole_field, self.case_sensitive) {
            (true, true) => Expr::expr(expr).eq(self.value.as_str()),
            (true, false) => Expr::expr(upper(expr)).eq(self.value.to_uppercase()),
            (false, true) => Expr::expr(expr).like(contains_pattern(&self.value)),
            (false, false) => {
                Expr::expr(upper(expr)).like(contains_pattern(&self.value.to_uppercase()))
            }
        }
    }
}

impl<E: EntityTrait> FilterCriterion<E> for TextFilter<E> {
    type Value = String;

    /// A cleared text with a switch still set is not empty.
    fn is_empty(&self) -> bool {
        is_blank(&self.value) && !self.whole_field && !self.case_sensitive && !self.invert_result
    }

    fn predicate(&self) -> Predicate<String> {
        if is_blank(&self.value) {
            return accept_all();
        }
        let matcher = self.matcher();
        if self.invert_result {
            Arc::new(move |value: &String| !matcher(value))
        } else {
            matcher
        }
    }

    fn condition(&self) -> Option<Condition> {
        // Blank text constrains nothing in either mode
        if is_blank(&self.value) {
            return None;
        }
        let condition = self.source.constrain(|expr| self.constrain(expr))?;
        Some(if self.invert_result {
            condition.not()
        } else {
            condition
        })
    }

    fn clear(&mut self) {
        self.value.clear();
        self.whole_field = false;
        self.case_sensitive = false;
        self.invert_result = false;
    }

    fn source(&self) -> &FieldSource<E> {
        &self.source
    }
}

impl<E: EntityTrait> PartialEq for TextFilter<E> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
            && self.whole_field == other.whole_field
            && self.case_sensitive == other.case_sensitive
            && self.invert_result == other.invert_result
    }
}

impl<E: EntityTrait> Eq for TextFilter<E> {}

impl<E: EntityTrait> Hash for TextFilter<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
        self.whole_field.hash(state);
        self.case_sensitive.hash(state);
        self.invert_result.hash(state);
    }
}
