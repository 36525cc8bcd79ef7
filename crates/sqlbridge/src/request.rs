//! Fetch requests: the accumulating description of a SELECT.
//!
//! A [`FetchRequest`] only grows: predicates and order clauses are appended
//! in caller order and compiled in that same order. Table and column names
//! are opaque strings here; nothing is validated against a live schema.

use crate::value::Value;

/// Sort direction for an order clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// An opaque SQL boolean fragment plus its positional arguments.
///
/// Predicates are joined with `AND` in insertion order; the flattened
/// argument list at execution time is the concatenation of each predicate's
/// own arguments in that same order.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub text: String,
    pub arguments: Vec<Value>,
}

/// One `ORDER BY` term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderClause {
    pub column: String,
    pub direction: SortDirection,
}

/// The accumulating description of a SELECT prior to compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    table: String,
    columns: Vec<String>,
    predicates: Vec<Predicate>,
    order_clauses: Vec<OrderClause>,
}

impl FetchRequest {
    /// Create an empty request bound to a table name.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            predicates: Vec::new(),
            order_clauses: Vec::new(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Projected column names; empty means "all columns".
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn order_clauses(&self) -> &[OrderClause] {
        &self.order_clauses
    }

    /// Restrict the projection to the given columns.
    pub fn select(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Append a predicate with its arguments.
    ///
    /// `text` uses generic `?` markers, one per argument, `??` for a literal
    /// question mark.
    ///
    /// # Example
    /// ```
    /// use sqlbridge::FetchRequest;
    ///
    /// let request = FetchRequest::new("Person")
    ///     .filter("Name = ?", ["Ada"])
    ///     .filter("Surname = ?", ["Lovelace"]);
    /// assert_eq!(request.predicates().len(), 2);
    /// ```
    pub fn filter(
        mut self,
        text: impl Into<String>,
        arguments: impl IntoIterator<Item = impl Into<Value>>,
    ) -> Self {
        self.add_predicate(Predicate {
            text: text.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Append an order clause.
    pub fn order_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.add_order_clause(OrderClause {
            column: column.into(),
            direction,
        });
        self
    }

    /// Append an already-built predicate (non-consuming form).
    pub fn add_predicate(&mut self, predicate: Predicate) -> &mut Self {
        self.predicates.push(predicate);
        self
    }

    /// Append an already-built order clause (non-consuming form).
    pub fn add_order_clause(&mut self, clause: OrderClause) -> &mut Self {
        self.order_clauses.push(clause);
        self
    }

    /// The flattened argument list, in predicate insertion order.
    pub fn arguments(&self) -> impl Iterator<Item = &Value> {
        self.predicates.iter().flat_map(|p| p.arguments.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_request_has_no_clauses() {
        let request = FetchRequest::new("Person");
        assert_eq!(request.table(), "Person");
        assert!(request.columns().is_empty());
        assert!(request.predicates().is_empty());
        assert!(request.order_clauses().is_empty());
    }

    #[test]
    fn predicates_keep_insertion_order() {
        let request = FetchRequest::new("Person")
            .filter("Name = ?", ["Ada"])
            .filter("Surname = ?", ["Lovelace"]);
        assert_eq!(request.predicates()[0].text, "Name = ?");
        assert_eq!(request.predicates()[1].text, "Surname = ?");
    }

    #[test]
    fn arguments_flatten_in_predicate_order() {
        let request = FetchRequest::new("Person")
            .filter("A IN(?, ?)", [1i64, 2])
            .filter("B = ?", [3i64]);
        let args: Vec<_> = request.arguments().cloned().collect();
        assert_eq!(args, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn predicate_with_no_arguments() {
        let request = FetchRequest::new("Person").filter("Died IS NULL", Vec::<Value>::new());
        assert!(request.predicates()[0].arguments.is_empty());
    }

    #[test]
    fn order_clauses_accumulate() {
        let request = FetchRequest::new("Person")
            .order_by("Surname", SortDirection::Ascending)
            .order_by("Birthdate", SortDirection::Descending);
        assert_eq!(request.order_clauses().len(), 2);
        assert_eq!(request.order_clauses()[1].column, "Birthdate");
    }
}
