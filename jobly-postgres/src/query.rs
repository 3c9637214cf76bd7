use crate::value::SqlValue;
use jobly_core::{CompanyFilter, JobFilter};

/// A SQL fragment together with the values for its `$N` placeholders.
///
/// Placeholder `$k` always corresponds to `values[k - 1]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPart {
    pub clause: String,
    pub values: Vec<SqlValue>,
}

impl QueryPart {
    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }

    /// Placeholder for a value the caller appends after `values`.
    pub fn next_placeholder(&self) -> String {
        format!("${}", self.values.len() + 1)
    }
}

/// Accumulates predicates joined by `AND`, numbering placeholders by the
/// position of their value in the parameter list.
///
/// Columns and operators are `&'static str` so only code can put SQL text
/// into a predicate; runtime input always travels as a bound value.
#[derive(Debug, Default)]
pub struct WhereBuilder {
    predicates: Vec<String>,
    values: Vec<SqlValue>,
}

impl WhereBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `<column> <op> $n` and bind `value` as parameter `n`.
    pub fn and_param(
        &mut self,
        column: &'static str,
        op: &'static str,
        value: impl Into<SqlValue>,
    ) -> &mut Self {
        self.values.push(value.into());
        self.predicates
            .push(format!("{} {} ${}", column, op, self.values.len()));
        self
    }

    /// Add a predicate that takes no parameter.
    pub fn and_const(&mut self, predicate: &'static str) -> &mut Self {
        self.predicates.push(predicate.to_string());
        self
    }

    pub fn build(self) -> QueryPart {
        QueryPart {
            clause: self.predicates.join(" AND "),
            values: self.values,
        }
    }
}

/// Build the WHERE fragment for listing jobs.
///
/// Criteria are always added in the order title, salary, equity. An empty
/// filter yields an empty clause; the caller then emits no `WHERE`.
pub fn build_job_where(filter: &JobFilter) -> QueryPart {
    let mut builder = WhereBuilder::new();

    if let Some(title) = &filter.title_contains {
        builder.and_param("title", "ILIKE", format!("%{title}%"));
    }
    if let Some(min_salary) = filter.min_salary {
        builder.and_param("salary", ">=", min_salary);
    }
    if filter.has_equity == Some(true) {
        builder.and_const("equity > 0");
    }

    builder.build()
}

pub fn build_company_where(filter: &CompanyFilter) -> QueryPart {
    let mut builder = WhereBuilder::new();

    if let Some(name) = &filter.name_like {
        builder.and_param("name", "ILIKE", format!("%{name}%"));
    }
    if let Some(min) = filter.min_employees {
        builder.and_param("num_employees", ">=", min);
    }
    if let Some(max) = filter.max_employees {
        builder.and_param("num_employees", "<=", max);
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_produces_no_clause() {
        let part = build_job_where(&JobFilter::default());
        assert!(part.is_empty());
        assert!(part.values.is_empty());
    }

    #[test]
    fn has_equity_alone_binds_nothing() {
        let part = build_job_where(&JobFilter::default().has_equity(true));
        assert_eq!(part.clause, "equity > 0");
        assert!(part.values.is_empty());
    }

    #[test]
    fn has_equity_false_adds_nothing() {
        let part = build_job_where(&JobFilter::default().has_equity(false));
        assert!(part.is_empty());
    }

    #[test]
    fn all_criteria_in_fixed_order() {
        let filter = JobFilter::default()
            .has_equity(true)
            .min_salary(300000)
            .title_contains("j");
        let part = build_job_where(&filter);
        assert_eq!(part.clause, "title ILIKE $1 AND salary >= $2 AND equity > 0");
        assert_eq!(
            part.values,
            vec![SqlValue::from("%j%"), SqlValue::from(300000)]
        );
    }

    #[test]
    fn placeholders_follow_present_criteria() {
        let part = build_job_where(&JobFilter::default().title_contains("dev").has_equity(true));
        assert_eq!(part.clause, "title ILIKE $1 AND equity > 0");
        assert_eq!(part.values, vec![SqlValue::from("%dev%")]);

        let part = build_job_where(&JobFilter::default().min_salary(5));
        assert_eq!(part.clause, "salary >= $1");
    }

    #[test]
    fn title_text_is_never_inlined() {
        let part = build_job_where(&JobFilter::default().title_contains("'; DROP TABLE jobs; --"));
        assert_eq!(part.clause, "title ILIKE $1");
        assert_eq!(
            part.values,
            vec![SqlValue::from("%'; DROP TABLE jobs; --%")]
        );
    }

    #[test]
    fn same_filter_same_output() {
        let filter = JobFilter::default().title_contains("a").min_salary(1);
        assert_eq!(build_job_where(&filter), build_job_where(&filter));
    }

    #[test]
    fn company_range_uses_two_params() {
        let filter = CompanyFilter {
            name_like: None,
            min_employees: Some(10),
            max_employees: Some(100),
        };
        let part = build_company_where(&filter);
        assert_eq!(part.clause, "num_employees >= $1 AND num_employees <= $2");
        assert_eq!(part.values, vec![SqlValue::from(10), SqlValue::from(100)]);
    }

    #[test]
    fn next_placeholder_follows_values() {
        let part = build_job_where(&JobFilter::default().title_contains("x").min_salary(1));
        assert_eq!(part.next_placeholder(), "$3");
        assert_eq!(QueryPart::default().next_placeholder(), "$1");
    }
}
