use std::fmt::Write as _;

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths = vec![1usize; column_count];
    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(header.chars().count());
    }
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(sanitize(cell).chars().count());
        }
    }

    let mut output = String::new();
    push_row(&mut output, headers, &widths);
    let rule = widths
        .iter()
        .map(|w| "-".repeat((*w).max(3)))
        .collect::<Vec<_>>();
    push_row(&mut output, &rule, &widths);
    for row in rows {
        push_row(&mut output, row, &widths);
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn push_row(output: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (idx, cell) in cells.iter().enumerate() {
        if idx >= widths.len() {
            break;
        }
        if idx > 0 {
            line.push_str("  ");
        }
        let cell = sanitize(cell);
        let pad = widths[idx].saturating_sub(cell.chars().count());
        line.push_str(&cell);
        line.push_str(&" ".repeat(pad));
    }
    let _ = writeln!(output, "{}", line.trim_end());
}

fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|ch| match ch {
            '\n' | '\r' | '\t' => ' ',
            other => other,
        })
        .collect()
}
