use serde_json::{Map, Value};
use std::io;

use super::{as_rows, scalar_text};

/// Write output as CSV to stdout.
///
/// A payoff table or a result row array (yearly points) is written as rows
/// with a header line; otherwise the result is written as field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    let _ = write_csv(&mut wtr, value);
    let _ = wtr.flush();
}

fn write_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) -> csv::Result<()> {
    match value {
        Value::Object(map) => {
            let result = map.get("result").and_then(Value::as_object);
            let rows = map
                .get("payoff_table")
                .and_then(as_rows)
                .or_else(|| result.and_then(|r| r.values().find_map(as_rows)));
            match (rows, result) {
                (Some(rows), _) => write_rows(wtr, rows),
                (None, Some(result)) => write_pairs(wtr, result),
                (None, None) => write_pairs(wtr, map),
            }
        }
        Value::Array(arr) => write_rows(wtr, arr),
        _ => wtr.write_record([scalar_text(value)]),
    }
}

fn write_pairs<W: io::Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in map {
        if as_rows(val).is_none() {
            wtr.write_record([key.as_str(), &scalar_text(val)])?;
        }
    }
    Ok(())
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            wtr.write_record([scalar_text(item)])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    wtr.write_record(&headers)?;
    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(scalar_text).unwrap_or_default())
            .collect();
        wtr.write_record(&row)?;
    }
    Ok(())
}
