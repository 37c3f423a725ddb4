/// Append one column to a dynamic `UPDATE ... SET` clause.
///
/// When the `Option` is `Some`, pushes `"column = ?N"` onto `sets` (with `N`
/// the next positional index) and the boxed value onto `values`.
///
/// ```ignore
/// let mut sets: Vec<String> = Vec::new();
/// let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
/// push_field!(changes.response_text, "response_text", sets, values);
/// push_field!(changes.is_active.map(i32::from), "is_active", sets, values);
/// ```
#[macro_export]
macro_rules! push_field {
    ($field:expr, $col:literal, $sets:expr, $values:expr) => {
        if let Some(value) = $field {
            $values.push(Box::new(value) as Box<dyn rusqlite::types::ToSql>);
            $sets.push(format!("{} = ?{}", $col, $values.len()));
        }
    };
}
