use csv::Writer;
use nalgebra::{DMatrix, DVector};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// one output row per mesh point: argument first, then every variable.
/// `solution` stores one variable per row and one mesh point per column
fn table_rows<'a>(
    solution: &'a DMatrix<f64>,
    x_mesh: &'a DVector<f64>,
) -> impl Iterator<Item = Vec<String>> + 'a {
    solution.column_iter().enumerate().map(move |(k, column)| {
        let mut row = Vec::with_capacity(column.len() + 1);
        row.push(x_mesh[k].to_string());
        row.extend(column.iter().map(|val| val.to_string()));
        row
    })
}

fn header(names: &[String], arg: &str) -> Vec<String> {
    let mut headers = Vec::with_capacity(names.len() + 1);
    headers.push(arg.to_string());
    headers.extend(names.iter().cloned());
    headers
}

/// tab-separated table
pub fn save_solution_to_file(
    solution: &DMatrix<f64>,
    names: &[String],
    filename: &Path,
    x_mesh: &DVector<f64>,
    arg: &str,
) -> io::Result<()> {
    let mut file = File::create(filename)?;
    writeln!(file, "{}", header(names, arg).join("\t"))?;
    for row in table_rows(solution, x_mesh) {
        writeln!(file, "{}", row.join("\t"))?;
    }
    Ok(())
}

pub fn save_solution_to_csv(
    solution: &DMatrix<f64>,
    names: &[String],
    filename: &Path,
    x_mesh: &DVector<f64>,
    arg: &str,
) -> Result<(), csv::Error> {
    let mut writer = Writer::from_path(filename)?;
    writer.write_record(header(names, arg))?;
    for row in table_rows(solution, x_mesh) {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn solution() -> (DMatrix<f64>, DVector<f64>, Vec<String>) {
        let y = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 0.5, 0.5, 0.5]);
        let x = DVector::from_vec(vec![0.0, 0.5, 1.0]);
        (y, x, vec!["y".to_string(), "z".to_string()])
    }

    #[test]
    fn test_save_solution_to_file() {
        let (y, x, names) = solution();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.txt");
        save_solution_to_file(&y, &names, &path, &x, "x").unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["x\ty\tz", "0\t1\t0.5", "0.5\t2\t0.5", "1\t3\t0.5"]);
    }

    #[test]
    fn test_save_solution_to_csv() {
        let (y, x, names) = solution();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.csv");
        save_solution_to_csv(&y, &names, &path, &x, "x").unwrap();
        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<&str> = reader.headers().unwrap().iter().collect();
        assert_eq!(headers, vec!["x", "y", "z"]);
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[1][1], "2");
    }
}
