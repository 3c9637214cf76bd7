use crate::query::QueryPart;
use crate::value::SqlValue;
use jobly_core::{JoblyError, Result};

/// Static mapping from API field names to storage column names.
///
/// Fields not listed map to themselves.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMap {
    pairs: &'static [(&'static str, &'static str)],
}

impl ColumnMap {
    pub const EMPTY: ColumnMap = ColumnMap { pairs: &[] };

    pub const fn new(pairs: &'static [(&'static str, &'static str)]) -> Self {
        Self { pairs }
    }

    pub fn column<'a>(&self, field: &'a str) -> &'a str {
        self.pairs
            .iter()
            .find(|(f, _)| *f == field)
            .map(|&(_, column)| column)
            .unwrap_or(field)
    }
}

/// Quote a SQL identifier, doubling any embedded `"`.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Build the `SET` list of a partial update.
///
/// Each `(field, value)` pair becomes `"<column>"=$n`, `n` being its 1-based
/// position in `fields`. The row selector is the caller's business: it binds
/// its key after `values` using [`QueryPart::next_placeholder`].
pub fn build_set<F: AsRef<str>>(fields: &[(F, SqlValue)], columns: &ColumnMap) -> Result<QueryPart> {
    if fields.is_empty() {
        return Err(JoblyError::invalid("No data"));
    }

    let assignments: Vec<String> = fields
        .iter()
        .enumerate()
        .map(|(idx, (field, _))| {
            format!("{}=${}", quote_ident(columns.column(field.as_ref())), idx + 1)
        })
        .collect();

    Ok(QueryPart {
        clause: assignments.join(", "),
        values: fields.iter().map(|(_, value)| value.clone()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEOPLE: ColumnMap =
        ColumnMap::new(&[("firstName", "first_name"), ("lastName", "last_name")]);

    #[test]
    fn single_column() {
        let part = build_set(&[("firstName", SqlValue::from("Aliya"))], &PEOPLE).unwrap();
        assert_eq!(part.clause, r#""first_name"=$1"#);
        assert_eq!(part.values, vec![SqlValue::from("Aliya")]);
    }

    #[test]
    fn maps_fields_to_columns_in_order() {
        let fields = [
            ("firstName", SqlValue::from("Aliya")),
            ("lastName", SqlValue::from("Smith")),
        ];
        let part = build_set(&fields, &PEOPLE).unwrap();
        assert_eq!(part.clause, r#""first_name"=$1, "last_name"=$2"#);
        assert_eq!(
            part.values,
            vec![SqlValue::from("Aliya"), SqlValue::from("Smith")]
        );
    }

    #[test]
    fn unmapped_field_is_its_own_column() {
        let part = build_set(&[("age", SqlValue::from(32))], &ColumnMap::EMPTY).unwrap();
        assert_eq!(part.clause, r#""age"=$1"#);
        assert_eq!(part.values, vec![SqlValue::from(32)]);
    }

    #[test]
    fn empty_fields_are_rejected() {
        let fields: [(&str, SqlValue); 0] = [];
        let err = build_set(&fields, &PEOPLE).unwrap_err();
        assert!(matches!(err, JoblyError::InvalidInput(_)));
    }

    #[test]
    fn one_fragment_and_value_per_field() {
        let fields = [
            ("title", SqlValue::from("New")),
            ("salary", SqlValue::Int(None)),
            ("equity", SqlValue::Float(None)),
            ("companyHandle", SqlValue::from("c1")),
        ];
        let map = ColumnMap::new(&[("companyHandle", "company_handle")]);
        let part = build_set(&fields, &map).unwrap();
        assert_eq!(part.clause.split(", ").count(), fields.len());
        assert_eq!(part.values.len(), fields.len());
        assert_eq!(part.values[1], SqlValue::Int(None));
        assert_eq!(
            part.clause,
            r#""title"=$1, "salary"=$2, "equity"=$3, "company_handle"=$4"#
        );
        assert_eq!(part.next_placeholder(), "$5");
    }

    #[test]
    fn quotes_are_escaped_in_identifiers() {
        let part = build_set(&[(r#"we"ird"#, SqlValue::from(1))], &ColumnMap::EMPTY).unwrap();
        assert_eq!(part.clause, r#""we""ird"=$1"#);
    }

    #[test]
    fn same_input_same_output() {
        let fields = [("a", SqlValue::from(1)), ("b", SqlValue::from(2))];
        let first = build_set(&fields, &ColumnMap::EMPTY).unwrap();
        let second = build_set(&fields, &ColumnMap::EMPTY).unwrap();
        assert_eq!(first, second);
    }
}
