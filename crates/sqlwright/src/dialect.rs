//! Identifier and literal quoting rules per SQL dialect.
//!
//! The builder itself never decides how text is escaped; everything goes
//! through the [`Dialect`] carried by the [`Database`](crate::Database)
//! collaborator. MySQL-style backtick quoting is the default.

use crate::value::Value;

/// Quoting rules for one SQL dialect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dialect {
    /// Backtick identifiers, backslash string escapes, `1`/`0` booleans.
    #[default]
    MySql,
    /// Double-quote identifiers, doubled-quote string escapes,
    /// `TRUE`/`FALSE` booleans.
    Ansi,
}

impl Dialect {
    /// Quote a literal value into dialect-safe SQL text.
    pub fn quote(self, value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => match self {
                Dialect::MySql => (if *b { "1" } else { "0" }).to_string(),
                Dialect::Ansi => (if *b { "TRUE" } else { "FALSE" }).to_string(),
            },
            Value::Int(n) => n.to_string(),
            Value::Float(f) => {
                if f.is_finite() {
                    f.to_string()
                } else {
                    "NULL".to_string()
                }
            }
            Value::Text(s) => self.quote_str(s),
            Value::DateTime(dt) => self.quote_str(&dt.format("%Y-%m-%d %H:%M:%S").to_string()),
            Value::Date(d) => self.quote_str(&d.format("%Y-%m-%d").to_string()),
            Value::Uuid(u) => self.quote_str(&u.to_string()),
            Value::Json(j) => self.quote_str(&j.to_string()),
        }
    }

    /// Quote a single bare identifier such as an alias.
    pub fn quote_identifier(self, name: &str) -> String {
        let delim = self.delimiter();
        let mut out = String::with_capacity(name.len() + 2);
        out.push(delim);
        for ch in name.chars() {
            if ch == delim {
                out.push(delim);
                out.push(delim);
            } else {
                out.push(ch);
            }
        }
        out.push(delim);
        out
    }

    /// Quote a column name, preserving dotted paths and `*`.
    pub fn quote_column(self, name: &str) -> String {
        if name == "*" {
            return name.to_string();
        }
        name.split('.')
            .map(|part| {
                if part == "*" {
                    part.to_string()
                } else {
                    self.quote_identifier(part)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quote a table name, preserving schema qualification.
    pub fn quote_table(self, name: &str) -> String {
        name.split('.')
            .map(|part| self.quote_identifier(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn quote_str(self, s: &str) -> String {
        let mut out = String::with_capacity(s.len() + 2);
        out.push('\'');
        match self {
            Dialect::MySql => {
                for ch in s.chars() {
                    match ch {
                        '\'' => out.push_str("\\'"),
                        '\\' => out.push_str("\\\\"),
                        '\0' => out.push_str("\\0"),
                        '\n' => out.push_str("\\n"),
                        '\r' => out.push_str("\\r"),
                        '\u{1a}' => out.push_str("\\Z"),
                        c => out.push(c),
                    }
                }
            }
            Dialect::Ansi => {
                for ch in s.chars() {
                    if ch == '\'' {
                        out.push_str("''");
                    } else {
                        out.push(ch);
                    }
                }
            }
        }
        out.push('\'');
        out
    }

    fn delimiter(self) -> char {
        match self {
            Dialect::MySql => '`',
            Dialect::Ansi => '"',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_scalars() {
        assert_eq!(Dialect::MySql.quote(&Value::Null), "NULL");
        assert_eq!(Dialect::MySql.quote(&Value::Int(5)), "5");
        assert_eq!(Dialect::MySql.quote(&Value::Bool(true)), "1");
        assert_eq!(Dialect::Ansi.quote(&Value::Bool(false)), "FALSE");
        assert_eq!(Dialect::MySql.quote(&Value::Float(1.5)), "1.5");
        assert_eq!(Dialect::MySql.quote(&Value::Float(f64::NAN)), "NULL");
    }

    #[test]
    fn escapes_strings_per_dialect() {
        assert_eq!(Dialect::MySql.quote(&Value::from("it's")), "'it\\'s'");
        assert_eq!(Dialect::MySql.quote(&Value::from("a\\b")), "'a\\\\b'");
        assert_eq!(Dialect::Ansi.quote(&Value::from("it's")), "'it''s'");
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(Dialect::MySql.quote_identifier("name"), "`name`");
        assert_eq!(Dialect::MySql.quote_identifier("we`ird"), "`we``ird`");
        assert_eq!(Dialect::Ansi.quote_identifier("name"), "\"name\"");
    }

    #[test]
    fn quotes_dotted_columns() {
        assert_eq!(Dialect::MySql.quote_column("users.id"), "`users`.`id`");
        assert_eq!(Dialect::MySql.quote_column("*"), "*");
        assert_eq!(Dialect::MySql.quote_column("users.*"), "`users`.*");
        assert_eq!(Dialect::MySql.quote_table("app.users"), "`app`.`users`");
    }

    #[test]
    fn quotes_temporal_values() {
        use chrono::TimeZone;
        let dt = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 0).unwrap();
        assert_eq!(Dialect::MySql.quote(&Value::DateTime(dt)), "'2024-03-09 12:30:00'");
        let d = chrono::NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(Dialect::MySql.quote(&Value::Date(d)), "'2024-03-09'");
    }
}
