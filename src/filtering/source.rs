use std::{fmt, sync::Arc};

use sea_orm::{
    Condition, EntityTrait,
    sea_query::{Expr, SimpleExpr},
};

/// Builds a remote expression from the entity acting as query root.
pub type Extractor<E> = Arc<dyn Fn(E) -> SimpleExpr + Send + Sync>;

/// Accessor-or-extractor pair a criterion constrains.
///
/// Either side is optional. When both are present each one is constrained
/// separately and the results are joined with `AND`. When neither is present
/// the criterion works in memory only.
pub struct FieldSource<E: EntityTrait> {
    accessor: Option<E::Column>,
    extractor: Option<Extractor<E>>,
}

impl<E: EntityTrait> FieldSource<E> {
    /// No remote field: the criterion filters in memory only
    #[must_use]
    pub const fn none() -> Self {
        Self {
            accessor: None,
            extractor: None,
        }
    }

    /// Target a column of the entity
    #[must_use]
    pub const fn column(column: E::Column) -> Self {
        Self {
            accessor: Some(column),
            extractor: None,
        }
    }

    /// Target an arbitrary expression, e.g. a function call or a column of a joined table
    pub fn extractor(extractor: impl Fn(E) -> SimpleExpr + Send + Sync + 'static) -> Self {
        Self {
            accessor: None,
            extractor: Some(Arc::new(extractor)),
        }
    }

    #[must_use]
    pub const fn with_column(mut self, column: E::Column) -> Self {
        self.accessor = Some(column);
        self
    }

    #[must_use]
    pub fn with_extractor(
        mut self,
        extractor: impl Fn(E) -> SimpleExpr + Send + Sync + 'static,
    ) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    pub const fn accessor(&self) -> Option<E::Column> {
        self.accessor
    }

    pub fn set_accessor(&mut self, accessor: Option<E::Column>) {
        self.accessor = accessor;
    }

    pub fn set_extractor(&mut self, extractor: Option<Extractor<E>>) {
        self.extractor = extractor;
    }

    /// True when at least one of accessor or extractor is set
    pub const fn is_configured(&self) -> bool {
        self.accessor.is_some() || self.extractor.is_some()
    }

    /// Remote expressions in accessor, extractor order
    pub fn expressions(&self) -> Vec<SimpleExpr> {
        let mut expressions = Vec::with_capacity(2);
        if let Some(column) = self.accessor {
            expressions.push(Expr::col((E::default(), column)).into());
        }
        if let Some(extractor) = &self.extractor {
            expressions.push(extractor(E::default()));
        }
        expressions
    }

    /// Apply `constrain` to every expression and join the results with `AND`.
    ///
    /// Returns `None` when nothing is configured.
    pub fn constrain(&self, constrain: impl Fn(SimpleExpr) -> SimpleExpr) -> Option<Condition> {
        if !self.is_configured() {
            return None;
        }
        Some(
            self.expressions()
                .into_iter()
                .fold(Condition::all(), |condition, expr| condition.add(constrain(expr))),
        )
    }
}

impl<E: EntityTrait> Default for FieldSource<E> {
    fn default() -> Self {
        Self::none()
    }
}

impl<E: EntityTrait> Clone for FieldSource<E> {
    fn clone(&self) -> Self {
        Self {
            accessor: self.accessor,
            extractor: self.extractor.clone(),
        }
    }
}

impl<E: EntityTrait> fmt::Debug for FieldSource<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSource")
            .field("accessor", &self.accessor)
            .field("extractor", &self.extractor.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
