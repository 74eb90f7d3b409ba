use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Format output as tables: scalar result fields first, then one table per
/// nested list (schedule rows, ranked offers).
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_field_table(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    let Value::Object(res_map) = result else {
        print_field_table(envelope);
        return;
    };

    let scalars: Map<String, Value> = res_map
        .iter()
        .filter(|(_, v)| !is_object_list(v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    print_field_table(&scalars);

    for (key, val) in res_map {
        if let Value::Array(items) = val {
            if is_object_list(val) {
                println!("\n{}:", key);
                print_array_table(&flatten_rows(items));
            }
        }
    }

    if let Some(Value::Object(display)) = envelope.get("display") {
        println!("\nDisplay:");
        print_field_table(display);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn is_object_list(value: &Value) -> bool {
    matches!(value, Value::Array(items) if items.first().is_some_and(Value::is_object))
}

/// Lift one level of nested objects into dotted columns,
/// e.g. a ranked offer's `estimate.monthly_payment`.
fn flatten_rows(items: &[Value]) -> Vec<Value> {
    items
        .iter()
        .map(|item| match item {
            Value::Object(map) => {
                let mut flat = Map::new();
                for (k, v) in map {
                    match v {
                        Value::Object(inner) => {
                            for (ik, iv) in inner {
                                flat.insert(format!("{k}.{ik}"), iv.clone());
                            }
                        }
                        _ => {
                            flat.insert(k.clone(), v.clone());
                        }
                    }
                }
                Value::Object(flat)
            }
            other => other.clone(),
        })
        .collect()
}

fn print_field_table(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
