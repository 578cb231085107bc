use sea_orm::sea_query::{Func, LikeExpr, SimpleExpr};

/// Escape LIKE wildcards so user text matches literally
/// Escapes: % (match any) and _ (match single char)
pub fn escape_like_wildcards(input: &str) -> String {
    // Backslash first, so the escapes added below stay single
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// `%value%` pattern with wildcards escaped and `ESCAPE '\'` declared
#[must_use]
pub fn contains_pattern(value: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", escape_like_wildcards(value))).escape('\\')
}

/// `UPPER(expr)`
#[must_use]
pub fn upper(expr: SimpleExpr) -> SimpleExpr {
    SimpleExpr::FunctionCall(Func::upper(expr))
}

/// Blank means empty or whitespace only
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
