use std::io::{self, Write};

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write one comma-separated row, quoting fields where needed.
pub fn write_row<W: Write, S: AsRef<str>>(w: &mut W, row: &[S]) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        let cell = cell.as_ref();
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    w.write_all(b"\n")
}

/// Render a header plus rows into an in-memory CSV document.
pub fn to_csv<S: AsRef<str>>(header: &[&str], rows: &[Vec<S>]) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    write_row(&mut out, header)?;
    for row in rows {
        write_row(&mut out, row.as_slice())?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> String {
        let mut out = Vec::new();
        write_row(&mut out, cells).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_plain_fields_are_unquoted() {
        assert_eq!(row(&["Frasier", "1998", "Live-action"]), "Frasier,1998,Live-action\n");
    }

    #[test]
    fn test_special_characters_are_quoted() {
        assert_eq!(row(&["a, b", "x"]), "\"a, b\",x\n");
        assert_eq!(row(&["say \"hi\""]), "\"say \"\"hi\"\"\"\n");
        assert_eq!(row(&["two\nlines"]), "\"two\nlines\"\n");
    }

    #[test]
    fn test_empty_field_stays_empty() {
        assert_eq!(row(&["text", "", "section"]), "text,,section\n");
    }

    #[test]
    fn test_to_csv_writes_header_first() {
        let rows = vec![vec!["1983".to_string(), "1".to_string()]];
        let out = to_csv(&["year", "count"], &rows).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "year,count\n1983,1\n");
    }
}
