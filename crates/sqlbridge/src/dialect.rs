//! Dialect configuration: identifier quoting and parameter naming.
//!
//! A [`Dialect`] pairs one [`QuoteStyle`] with one [`ParamStyle`], selected at
//! construction. Quoting is a single unified operation covering table and
//! column names alike; embedded delimiter characters are not escaped, callers
//! are responsible for supplying well-formed identifiers.

/// How a dialect delimits object names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// MySQL style: `` `Person` ``
    Backtick,
    /// SQL Server style: `[Person]`
    Bracket,
    /// Standard SQL style: `"Person"`
    DoubleQuote,
}

impl QuoteStyle {
    fn delimiters(self) -> (char, char) {
        match self {
            Self::Backtick => ('`', '`'),
            Self::Bracket => ('[', ']'),
            Self::DoubleQuote => ('"', '"'),
        }
    }

    /// Wrap `name` in this style's delimiter pair.
    pub fn quote(self, name: &str) -> String {
        let mut out = String::with_capacity(name.len() + 2);
        self.write_quoted(name, &mut out);
        out
    }

    pub(crate) fn write_quoted(self, name: &str, out: &mut String) {
        let (open, close) = self.delimiters();
        out.push(open);
        out.push_str(name);
        out.push(close);
    }
}

/// How a dialect names the parameter at a given ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamStyle {
    /// The literal `?` placeholder regardless of position.
    Positional,
    /// `@p_0`, `@p_1`, ... distinct per ordinal within one command.
    Named,
}

impl ParamStyle {
    /// The parameter token for the zero-based argument `index`.
    pub fn name(self, index: usize) -> String {
        match self {
            Self::Positional => "?".to_string(),
            Self::Named => format!("@p_{index}"),
        }
    }

    pub(crate) fn write_name(self, index: usize, out: &mut String) {
        match self {
            Self::Positional => out.push('?'),
            Self::Named => {
                out.push_str("@p_");
                out.push_str(&index.to_string());
            }
        }
    }
}

/// A backend-specific combination of quoting and parameter naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub quote_style: QuoteStyle,
    pub param_style: ParamStyle,
}

impl Dialect {
    pub fn new(quote_style: QuoteStyle, param_style: ParamStyle) -> Self {
        Self {
            quote_style,
            param_style,
        }
    }

    /// MySQL: backtick quoting, named `@p_N` parameters.
    pub fn mysql() -> Self {
        Self::new(QuoteStyle::Backtick, ParamStyle::Named)
    }

    /// SQL Server: bracket quoting, named `@p_N` parameters.
    pub fn sql_server() -> Self {
        Self::new(QuoteStyle::Bracket, ParamStyle::Named)
    }

    /// SQLite: double-quote quoting, positional `?` parameters.
    pub fn sqlite() -> Self {
        Self::new(QuoteStyle::DoubleQuote, ParamStyle::Positional)
    }

    /// Quote an object (table or column) name for this dialect.
    pub fn quote(&self, name: &str) -> String {
        self.quote_style.quote(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_backtick() {
        assert_eq!(QuoteStyle::Backtick.quote("Person"), "`Person`");
    }

    #[test]
    fn quote_bracket() {
        assert_eq!(QuoteStyle::Bracket.quote("Person"), "[Person]");
    }

    #[test]
    fn quote_double_quote() {
        assert_eq!(QuoteStyle::DoubleQuote.quote("Person"), "\"Person\"");
    }

    #[test]
    fn quote_alters_nothing_else() {
        assert_eq!(QuoteStyle::Bracket.quote("Birth date"), "[Birth date]");
    }

    #[test]
    fn positional_ignores_index() {
        assert_eq!(ParamStyle::Positional.name(0), "?");
        assert_eq!(ParamStyle::Positional.name(17), "?");
    }

    #[test]
    fn named_is_distinct_per_index() {
        assert_eq!(ParamStyle::Named.name(0), "@p_0");
        assert_eq!(ParamStyle::Named.name(1), "@p_1");
        assert_eq!(ParamStyle::Named.name(123), "@p_123");
    }

    #[test]
    fn presets() {
        assert_eq!(Dialect::mysql().quote("t"), "`t`");
        assert_eq!(Dialect::sql_server().quote("t"), "[t]");
        assert_eq!(Dialect::sqlite().quote("t"), "\"t\"");
        assert_eq!(Dialect::sqlite().param_style, ParamStyle::Positional);
    }
}
