use serde_json::{Map, Value};
use std::io;

use super::{format_scalar, result_of};

/// Write output as CSV to stdout.
///
/// A result carrying `rows` (an amortization schedule) is written one row per
/// period; anything else becomes a two-column field,value listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let outcome = match result_of(value) {
        Value::Object(result) => match result.get("rows") {
            Some(Value::Array(rows)) => write_rows(&mut wtr, rows),
            _ => write_fields(&mut wtr, result),
        },
        Value::Array(rows) => write_rows(&mut wtr, rows),
        other => wtr.write_record([format_scalar(other, "")]),
    };

    if let Err(e) = outcome.and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        eprintln!("CSV write error: {}", e);
    }
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in map {
        wtr.write_record([key.as_str(), &format_scalar(val, "")])?;
    }
    Ok(())
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            wtr.write_record([format_scalar(item, "")])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    wtr.write_record(&headers)?;
    for map in rows.iter().filter_map(Value::as_object) {
        let record: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(|v| format_scalar(v, "")).unwrap_or_default())
            .collect();
        wtr.write_record(&record)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        match result_of(value) {
            Value::Object(result) => match result.get("rows") {
                Some(Value::Array(rows)) => write_rows(&mut wtr, rows).unwrap(),
                _ => write_fields(&mut wtr, result).unwrap(),
            },
            _ => unreachable!(),
        }
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_schedule_rows() {
        let v = json!({"result": {"rows": [
            {"period": 1, "payment": "10"},
            {"period": 2, "payment": "10"}
        ]}});
        assert_eq!(render(&v), "payment,period\n10,1\n10,2\n");
    }

    #[test]
    fn test_field_value_pairs() {
        let v = json!({"result": {"installment": "3321.43", "valid": true}});
        assert_eq!(render(&v), "field,value\ninstallment,3321.43\nvalid,true\n");
    }
}
