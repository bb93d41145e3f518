use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One name per line; `marked` gets a leading `*`.
pub fn print_names(names: &[String], marked: Option<&str>) {
    for name in names {
        let mark = if Some(name.as_str()) == marked { "*" } else { " " };
        println!("{mark} {name}");
    }
}

/// Left-aligned columns separated by two spaces, with a dashed rule under
/// the header. Widths count chars so paths with multibyte names line up.
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    print!("{}", render_table(headers, &rows));
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, h)| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .fold(h.chars().count(), usize::max)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&table_line(headers.iter().copied(), &widths));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in rows {
        out.push_str(&table_line(row.iter().map(String::as_str), &widths));
        out.push('\n');
    }
    out
}

fn table_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect();
    padded.join("  ").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_to_widest_cell() {
        let out = render_table(
            &["KIND", "NAME"],
            &[
                vec!["directory".into(), "logs".into()],
                vec!["file".into(), "a.txt".into()],
            ],
        );
        assert_eq!(
            out,
            "KIND       NAME\n---------  -----\ndirectory  logs\nfile       a.txt\n"
        );
    }

    #[test]
    fn multibyte_names_count_chars() {
        let out = render_table(&["NAME"], &[vec!["résumé.pdf".into()]]);
        assert!(out.contains("----------\n"));
    }
}
