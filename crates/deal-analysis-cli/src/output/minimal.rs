use serde_json::Value;

/// Headline figure per command, most specific first. Pointers are relative
/// to the `result` object of the envelope.
const HEADLINE_POINTERS: [&str; 9] = [
    "/offer/mao",
    "/mao",
    "/recommended_value",
    "/adjusted_mao",
    "/score",
    "/total",
    "/grade",
    "/hourly_rate",
    "/formatted",
];

/// Print just the headline value of the output, falling back to the first
/// field of the result.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(val) = headline(result_obj) {
        println!("{}", format_minimal(val));
        return;
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn headline(result: &Value) -> Option<&Value> {
    HEADLINE_POINTERS
        .iter()
        .filter_map(|p| result.pointer(p))
        .find(|v| !v.is_null())
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_headline_prefers_rapid_mao() {
        let analysis = json!({ "effective_arv": "250000", "offer": { "mao": "179300" } });
        assert_eq!(headline(&analysis), Some(&json!("179300")));

        let arv = json!({ "average_value": "250000", "recommended_value": "248000" });
        assert_eq!(headline(&arv), Some(&json!("248000")));

        assert_eq!(headline(&json!({ "unrelated": 1 })), None);
    }
}
