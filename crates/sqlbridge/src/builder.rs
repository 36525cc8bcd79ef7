//! Command compilation.
//!
//! [`CommandBuilder`] turns a [`FetchRequest`] (or ad-hoc command text, or an
//! insert/update column mapping) into a [`Command`]: final dialect-correct
//! SQL plus the flat argument list, aligned positionally with the parameter
//! tokens in the text.

use crate::dialect::Dialect;
use crate::error::{AccessError, AccessResult};
use crate::expand::{count_markers, expand_text};
use crate::request::FetchRequest;
use crate::value::Value;

/// Compiled SQL text plus its arguments, in marker order.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Command {
    pub text: String,
    pub arguments: Vec<Value>,
}

/// Compiles fetch requests and ad-hoc statements for one dialect.
#[derive(Debug, Clone, Copy)]
pub struct CommandBuilder {
    dialect: Dialect,
}

impl CommandBuilder {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Compile a fetch request into a SELECT.
    ///
    /// Deterministic, no reordering: projection, `FROM`, predicates joined
    /// with ` AND ` (omitted entirely when there are none), order clauses
    /// joined with `, ` (likewise omitted). One running parameter counter
    /// spans all predicate texts so marker numbering matches the flattened
    /// argument list.
    pub fn fetch(&self, request: &FetchRequest) -> AccessResult<Command> {
        let table = object_name(request.table(), "table name")?;

        let mut text = String::from("SELECT ");

        if request.columns().is_empty() {
            text.push('*');
        } else {
            for (i, column) in request.columns().iter().enumerate() {
                let column = object_name(column, "column name")?;
                if i > 0 {
                    text.push_str(", ");
                }
                self.dialect.quote_style.write_quoted(column, &mut text);
            }
        }

        text.push_str(" FROM ");
        self.dialect.quote_style.write_quoted(table, &mut text);

        let mut counter = 0usize;
        let mut arguments = Vec::new();

        if !request.predicates().is_empty() {
            text.push_str(" WHERE ");
            for (i, predicate) in request.predicates().iter().enumerate() {
                if i > 0 {
                    text.push_str(" AND ");
                }
                let before = counter;
                text.push_str(&expand_text(
                    &predicate.text,
                    self.dialect.param_style,
                    &mut counter,
                ));
                if counter - before != predicate.arguments.len() {
                    return Err(AccessError::configuration(format!(
                        "predicate '{}' has {} markers but {} arguments",
                        predicate.text,
                        counter - before,
                        predicate.arguments.len()
                    )));
                }
                arguments.extend(predicate.arguments.iter().cloned());
            }
        }

        if !request.order_clauses().is_empty() {
            text.push_str(" ORDER BY ");
            for (i, clause) in request.order_clauses().iter().enumerate() {
                let column = object_name(&clause.column, "order column name")?;
                if i > 0 {
                    text.push_str(", ");
                }
                self.dialect.quote_style.write_quoted(column, &mut text);
                text.push(' ');
                text.push_str(clause.direction.keyword());
            }
        }

        Ok(Command { text, arguments })
    }

    /// Expand an ad-hoc command string with a fresh parameter counter.
    pub fn raw(
        &self,
        text: &str,
        arguments: impl IntoIterator<Item = impl Into<Value>>,
    ) -> AccessResult<Command> {
        let arguments: Vec<Value> = arguments.into_iter().map(Into::into).collect();
        let markers = count_markers(text);
        if markers != arguments.len() {
            return Err(AccessError::configuration(format!(
                "command has {markers} markers but {} arguments",
                arguments.len()
            )));
        }
        let mut counter = 0usize;
        let text = expand_text(text, self.dialect.param_style, &mut counter);
        Ok(Command { text, arguments })
    }

    /// Compile `INSERT INTO <table> (<cols>) VALUES (<markers>)`.
    ///
    /// Iteration order of the mapping determines both column order and
    /// argument order.
    pub fn insert<K, V>(
        &self,
        table: &str,
        columns_and_values: impl IntoIterator<Item = (K, V)>,
    ) -> AccessResult<Command>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let table = object_name(table, "table name")?;
        let (columns, arguments) = collect_mapping(columns_and_values)?;
        if columns.is_empty() {
            return Err(AccessError::configuration(
                "insert requires at least one column",
            ));
        }

        let mut text = String::from("INSERT INTO ");
        self.dialect.quote_style.write_quoted(table, &mut text);
        text.push_str(" (");
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                text.push_str(", ");
            }
            self.dialect.quote_style.write_quoted(column, &mut text);
        }
        text.push_str(") VALUES (");
        let mut counter = 0usize;
        for i in 0..columns.len() {
            if i > 0 {
                text.push_str(", ");
            }
            text.push_str(&expand_text("?", self.dialect.param_style, &mut counter));
        }
        text.push(')');

        Ok(Command { text, arguments })
    }

    /// Compile `UPDATE <table> SET <col> = ? [, ...] WHERE <id_column> = ?`,
    /// the id value bound last.
    pub fn update<K, V>(
        &self,
        table: &str,
        id: impl Into<Value>,
        columns_and_values: impl IntoIterator<Item = (K, V)>,
        id_column: &str,
    ) -> AccessResult<Command>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let table = object_name(table, "table name")?;
        let id_column = object_name(id_column, "id column name")?;
        let (columns, mut arguments) = collect_mapping(columns_and_values)?;
        if columns.is_empty() {
            return Err(AccessError::configuration(
                "update requires at least one column",
            ));
        }

        let mut text = String::from("UPDATE ");
        self.dialect.quote_style.write_quoted(table, &mut text);
        text.push_str(" SET ");
        let mut counter = 0usize;
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                text.push_str(", ");
            }
            self.dialect.quote_style.write_quoted(column, &mut text);
            text.push_str(" = ");
            text.push_str(&expand_text("?", self.dialect.param_style, &mut counter));
        }
        text.push_str(" WHERE ");
        self.dialect.quote_style.write_quoted(id_column, &mut text);
        text.push_str(" = ");
        text.push_str(&expand_text("?", self.dialect.param_style, &mut counter));

        arguments.push(id.into());
        Ok(Command { text, arguments })
    }
}

fn object_name<'a>(name: &'a str, what: &str) -> AccessResult<&'a str> {
    if name.is_empty() {
        return Err(AccessError::configuration(format!("empty {what}")));
    }
    Ok(name)
}

fn collect_mapping<K, V>(
    columns_and_values: impl IntoIterator<Item = (K, V)>,
) -> AccessResult<(Vec<String>, Vec<Value>)>
where
    K: Into<String>,
    V: Into<Value>,
{
    let mut columns = Vec::new();
    let mut values = Vec::new();
    for (column, value) in columns_and_values {
        let column = column.into();
        object_name(&column, "column name")?;
        columns.push(column);
        values.push(value.into());
    }
    Ok((columns, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::SortDirection;

    fn sqlite() -> CommandBuilder {
        CommandBuilder::new(Dialect::sqlite())
    }

    fn sql_server() -> CommandBuilder {
        CommandBuilder::new(Dialect::sql_server())
    }

    #[test]
    fn bare_fetch_selects_star_without_where() {
        let request = FetchRequest::new("Person");
        let command = sqlite().fetch(&request).unwrap();
        assert_eq!(command.text, "SELECT * FROM \"Person\"");
        assert!(command.arguments.is_empty());
    }

    #[test]
    fn projection_quotes_each_column() {
        let request = FetchRequest::new("Person").select(["Name", "Surname"]);
        let command = sqlite().fetch(&request).unwrap();
        assert_eq!(
            command.text,
            "SELECT \"Name\", \"Surname\" FROM \"Person\""
        );
    }

    #[test]
    fn predicates_join_with_and_in_order() {
        let request = FetchRequest::new("Person")
            .filter("Name = ?", ["Ada"])
            .filter("Surname = ?", ["Lovelace"]);
        let command = sqlite().fetch(&request).unwrap();
        assert_eq!(
            command.text,
            "SELECT * FROM \"Person\" WHERE Name = ? AND Surname = ?"
        );
        assert_eq!(
            command.arguments,
            vec![Value::Text("Ada".into()), Value::Text("Lovelace".into())]
        );
    }

    #[test]
    fn named_parameters_number_across_predicates() {
        let request = FetchRequest::new("Person")
            .filter("Name IN(?, ?)", ["Ada", "Rosa"])
            .filter("Gender = ?", [2i64]);
        let command = sql_server().fetch(&request).unwrap();
        assert_eq!(
            command.text,
            "SELECT * FROM [Person] WHERE Name IN(@p_0, @p_1) AND Gender = @p_2"
        );
        assert_eq!(command.arguments.len(), 3);
    }

    #[test]
    fn order_clauses_render_after_where() {
        let request = FetchRequest::new("Person")
            .filter("Died IS NULL", Vec::<Value>::new())
            .order_by("Birthdate", SortDirection::Descending)
            .order_by("Surname", SortDirection::Ascending);
        let command = sqlite().fetch(&request).unwrap();
        assert_eq!(
            command.text,
            "SELECT * FROM \"Person\" WHERE Died IS NULL ORDER BY \"Birthdate\" DESC, \"Surname\" ASC"
        );
    }

    #[test]
    fn order_without_predicates_omits_where() {
        let request = FetchRequest::new("Person").order_by("Birthdate", SortDirection::Descending);
        let command = sqlite().fetch(&request).unwrap();
        assert_eq!(
            command.text,
            "SELECT * FROM \"Person\" ORDER BY \"Birthdate\" DESC"
        );
    }

    #[test]
    fn escaped_marker_does_not_bind() {
        let request = FetchRequest::new("Person").filter("Note LIKE 'a??b' AND Name = ?", ["Ada"]);
        let command = sql_server().fetch(&request).unwrap();
        assert_eq!(
            command.text,
            "SELECT * FROM [Person] WHERE Note LIKE 'a?b' AND Name = @p_0"
        );
        assert_eq!(command.arguments.len(), 1);
    }

    #[test]
    fn empty_table_name_fails_at_build_time() {
        let request = FetchRequest::new("");
        let err = sqlite().fetch(&request).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn empty_projected_column_fails() {
        let request = FetchRequest::new("Person").select([""]);
        assert!(sqlite().fetch(&request).unwrap_err().is_configuration());
    }

    #[test]
    fn marker_argument_mismatch_fails() {
        let request = FetchRequest::new("Person").filter("Name = ?", Vec::<Value>::new());
        assert!(sqlite().fetch(&request).unwrap_err().is_configuration());
    }

    #[test]
    fn raw_expands_with_fresh_counter() {
        let command = sql_server()
            .raw("UPDATE Person SET Gender = ? WHERE Id = ?", [2i64, 7])
            .unwrap();
        assert_eq!(
            command.text,
            "UPDATE Person SET Gender = @p_0 WHERE Id = @p_1"
        );
        assert_eq!(command.arguments, vec![Value::Int(2), Value::Int(7)]);
    }

    #[test]
    fn raw_mismatch_fails() {
        assert!(sql_server()
            .raw("WHERE Id = ?", Vec::<Value>::new())
            .unwrap_err()
            .is_configuration());
    }

    #[test]
    fn insert_shape_sqlite() {
        let command = sqlite()
            .insert("Person", [("Name", "Ada"), ("Surname", "Lovelace")])
            .unwrap();
        assert_eq!(
            command.text,
            "INSERT INTO \"Person\" (\"Name\", \"Surname\") VALUES (?, ?)"
        );
        assert_eq!(
            command.arguments,
            vec![Value::Text("Ada".into()), Value::Text("Lovelace".into())]
        );
    }

    #[test]
    fn insert_shape_named() {
        let command = sql_server()
            .insert("Person", [("Name", "Ada"), ("Surname", "Lovelace")])
            .unwrap();
        assert_eq!(
            command.text,
            "INSERT INTO [Person] ([Name], [Surname]) VALUES (@p_0, @p_1)"
        );
    }

    #[test]
    fn insert_requires_a_column() {
        let empty: [(&str, Value); 0] = [];
        assert!(sqlite().insert("Person", empty).unwrap_err().is_configuration());
    }

    #[test]
    fn update_shape_appends_id_last() {
        let command = sqlite()
            .update("Person", 7i64, [("Gender", 2i64)], "Id")
            .unwrap();
        assert_eq!(
            command.text,
            "UPDATE \"Person\" SET \"Gender\" = ? WHERE \"Id\" = ?"
        );
        assert_eq!(command.arguments, vec![Value::Int(2), Value::Int(7)]);
    }

    #[test]
    fn update_shape_named_numbers_id_after_sets() {
        let command = sql_server()
            .update(
                "Person",
                7i64,
                [("Gender", Value::Int(2)), ("Name", Value::Text("Ada".into()))],
                "Id",
            )
            .unwrap();
        assert_eq!(
            command.text,
            "UPDATE [Person] SET [Gender] = @p_0, [Name] = @p_1 WHERE [Id] = @p_2"
        );
        assert_eq!(
            command.arguments,
            vec![Value::Int(2), Value::Text("Ada".into()), Value::Int(7)]
        );
    }

    #[test]
    fn update_requires_a_column() {
        let empty: [(&str, Value); 0] = [];
        assert!(sqlite()
            .update("Person", 7i64, empty, "Id")
            .unwrap_err()
            .is_configuration());
    }

    #[test]
    fn mysql_quoting_end_to_end() {
        let builder = CommandBuilder::new(Dialect::mysql());
        let request = FetchRequest::new("Person").select(["Name"]);
        let command = builder.fetch(&request).unwrap();
        assert_eq!(command.text, "SELECT `Name` FROM `Person`");
    }
}
