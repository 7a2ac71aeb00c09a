//! Plain-text table rendering for asteroid records.

use crate::types::AsteroidRecord;

/// Column headers, in display order.
pub const COLUMNS: [&str; 5] = [
    "Name",
    "Diameter (m)",
    "Potentially Hazardous",
    "Closest Approach Date",
    "Miss Distance (km)",
];

const SEPARATOR: &str = "  ";

/// Render records as an aligned table: a header row, a rule, then one row
/// per record. An empty slice yields the header and rule only.
pub fn format(records: &[AsteroidRecord]) -> String {
    let rows: Vec<[String; 5]> = records.iter().map(row).collect();

    let mut widths = COLUMNS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = COLUMNS.map(String::from);
    let rule = widths.map(|w| "-".repeat(w));

    let mut out = String::new();
    push_line(&mut out, &header, &widths);
    push_line(&mut out, &rule, &widths);
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn row(record: &AsteroidRecord) -> [String; 5] {
    [
        record.name.clone(),
        format!("{:.2}", record.max_diameter_meters),
        if record.is_hazardous { "Yes" } else { "No" }.to_string(),
        record.close_approach_date.format("%Y-%m-%d").to_string(),
        format!("{:.2}", record.miss_distance_km),
    ]
}

fn push_line(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let line = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(name: &str, hazardous: bool) -> AsteroidRecord {
        AsteroidRecord {
            name: name.to_string(),
            max_diameter_meters: 120.5,
            is_hazardous: hazardous,
            close_approach_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            miss_distance_km: 54321.0,
        }
    }

    #[test]
    fn test_empty_is_header_only() {
        let table = format(&[]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 2);
        for column in COLUMNS {
            assert!(lines[0].contains(column));
        }
        assert!(lines[1].chars().all(|c| c == '-' || c == ' '));
    }

    #[test]
    fn test_rows_in_order() {
        let table = format(&[record("2024 AB", true), record("(2010 XY)", false)]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("2024 AB"));
        assert!(lines[2].contains("120.50"));
        assert!(lines[2].contains("Yes"));
        assert!(lines[2].contains("2024-01-01"));
        assert!(lines[2].contains("54321.00"));
        assert!(lines[3].starts_with("(2010 XY)"));
        assert!(lines[3].contains("No"));
    }

    #[test]
    fn test_columns_aligned() {
        let table = format(&[record("A very long asteroid name", true), record("B", false)]);
        let lines: Vec<&str> = table.lines().collect();

        let offset = lines[0].find("Diameter (m)").unwrap();
        assert_eq!(lines[2].find("120.50"), Some(offset));
        assert_eq!(lines[3].find("120.50"), Some(offset));
    }
}
