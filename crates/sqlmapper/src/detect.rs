//! Source dialect detection by keyword sniffing.

use tracing::debug;

use crate::dialect::DialectKind;
use crate::error::{MapperError, Result};

/// Markers checked in order; the first one present wins.
const MARKERS: &[(&str, DialectKind)] = &[
    ("ENGINE=INNODB", DialectKind::Mysql),
    ("AUTOINCREMENT", DialectKind::Sqlite),
    ("IDENTITY", DialectKind::Sqlserver),
    ("SERIAL", DialectKind::Postgres),
    ("NUMBER(", DialectKind::Oracle),
];

/// Guess the dialect a DDL script was written for.
///
/// Matching ignores case and whitespace, so `engine = InnoDB` and
/// `NUMBER (10)` are recognized. A script with none of the markers needs an
/// explicit source dialect.
pub fn detect_dialect(text: &str) -> Result<DialectKind> {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    MARKERS
        .iter()
        .find(|(marker, _)| compact.contains(marker))
        .map(|(marker, kind)| {
            debug!("Detected {} from marker {}", kind, marker);
            *kind
        })
        .ok_or_else(|| {
            MapperError::Config(
                "Could not detect the source dialect; pass --from <dialect>".to_string(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_each_dialect() {
        let cases = [
            ("CREATE TABLE a (id INT) ENGINE=InnoDB;", DialectKind::Mysql),
            ("CREATE TABLE a (id INTEGER PRIMARY KEY AUTOINCREMENT);", DialectKind::Sqlite),
            ("CREATE TABLE a (id int IDENTITY(1,1));", DialectKind::Sqlserver),
            ("CREATE TABLE a (id serial);", DialectKind::Postgres),
            ("CREATE TABLE a (id NUMBER(10));", DialectKind::Oracle),
        ];
        for (sql, expected) in cases {
            assert_eq!(detect_dialect(sql).unwrap(), expected, "{sql}");
        }
    }

    #[test]
    fn test_detect_ignores_case_and_spacing() {
        assert_eq!(
            detect_dialect("create table a (x int) engine = innodb").unwrap(),
            DialectKind::Mysql
        );
        assert_eq!(
            detect_dialect("create table a (x number (5))").unwrap(),
            DialectKind::Oracle
        );
    }

    #[test]
    fn test_detect_marker_order() {
        // MySQL wins over the later SERIAL marker.
        let sql = "CREATE TABLE a (id SERIAL) ENGINE=InnoDB;";
        assert_eq!(detect_dialect(sql).unwrap(), DialectKind::Mysql);
    }

    #[test]
    fn test_detect_failure_asks_for_source() {
        let err = detect_dialect("CREATE TABLE a (x int);").unwrap_err();
        assert!(err.to_string().contains("--from"));
    }
}
