//! Conversion between plain JSON and Firestore's typed value encoding.
//!
//! Integers travel as strings (`integerValue`), so a round trip keeps
//! `100` an integer and `100.0` a double. Kinds with no plain JSON form
//! (timestamps, references, bytes, geo points) decode to
//! `{"__firestore": <typed value>}` and encode back unchanged.

use serde_json::{Map, Value, json};

/// Key wrapping a typed Firestore value kept as stored.
pub const RAW_VALUE_KEY: &str = "__firestore";

fn raw_value(typed: &Value) -> Value {
    json!({ RAW_VALUE_KEY: typed })
}

fn as_raw_value(map: &Map<String, Value>) -> Option<&Value> {
    if map.len() != 1 {
        return None;
    }
    map.get(RAW_VALUE_KEY).filter(|raw| raw.is_object())
}

pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Object(map) if as_raw_value(map).is_some() => {
            as_raw_value(map).cloned().unwrap_or_default()
        }
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else if let Some(u) = n.as_u64() {
                json!({ "integerValue": u.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64().unwrap_or_default() })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Encodes every entry of a document or map.
pub fn encode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect()
}

pub fn decode_value(value: &Value) -> Value {
    let Some(obj) = value.as_object() else {
        return Value::Null;
    };
    let Some((kind, inner)) = obj.iter().next() else {
        return Value::Null;
    };

    match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => Value::Bool(inner.as_bool().unwrap_or_default()),
        "integerValue" => match inner {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            Value::Number(n) => Value::Number(n.clone()),
            _ => Value::Null,
        },
        "doubleValue" => match inner {
            Value::Number(n) => Value::Number(n.clone()),
            // NaN and infinities arrive as strings and have no JSON form.
            _ => raw_value(value),
        },
        "stringValue" => inner.clone(),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => Value::Object(decode_fields(inner.get("fields"))),
        _ => raw_value(value),
    }
}

/// Decodes the `fields` object of a document or map value.
pub fn decode_fields(fields: Option<&Value>) -> Map<String, Value> {
    fields
        .and_then(Value::as_object)
        .map(|fields| {
            fields
                .iter()
                .map(|(k, v)| (k.clone(), decode_value(v)))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_scalars() {
        assert_eq!(encode_value(&json!(null)), json!({ "nullValue": null }));
        assert_eq!(encode_value(&json!(true)), json!({ "booleanValue": true }));
        assert_eq!(encode_value(&json!(2222)), json!({ "integerValue": "2222" }));
        assert_eq!(encode_value(&json!(73.2)), json!({ "doubleValue": 73.2 }));
        assert_eq!(encode_value(&json!("pago")), json!({ "stringValue": "pago" }));
    }

    #[test]
    fn test_encode_nested_invoice_array() {
        let encoded = encode_value(&json!([{ "id": "fat-1", "valor": 100 }]));
        assert_eq!(
            encoded,
            json!({
                "arrayValue": { "values": [
                    { "mapValue": { "fields": {
                        "id": { "stringValue": "fat-1" },
                        "valor": { "integerValue": "100" }
                    } } }
                ] }
            })
        );
    }

    #[test]
    fn test_decode_document_fields() {
        let fields = json!({
            "nome": { "stringValue": "favio" },
            "criadoEm": { "timestampValue": "2025-05-20T10:00:00Z" },
            "faturas": { "arrayValue": { "values": [
                { "mapValue": { "fields": {
                    "id": { "stringValue": "fat-1" },
                    "valor": { "integerValue": "100" },
                    "desconto": { "doubleValue": 0.5 }
                } } }
            ] } },
            "planos": { "arrayValue": {} },
            "extra": { "mapValue": {} }
        });

        let decoded = decode_fields(Some(&fields));

        assert_eq!(decoded["nome"], "favio");
        assert_eq!(
            decoded["criadoEm"],
            json!({ "__firestore": { "timestampValue": "2025-05-20T10:00:00Z" } })
        );
        assert_eq!(decoded["faturas"][0]["valor"], 100);
        assert_eq!(decoded["faturas"][0]["desconto"], 0.5);
        assert_eq!(decoded["planos"], json!([]));
        assert_eq!(decoded["extra"], json!({}));
    }

    #[test]
    fn test_integers_keep_their_type_through_the_store() {
        let original = json!({ "valor": 100, "preco": 22.5, "ativo": false, "nota": null });
        let encoded = Value::Object(encode_fields(original.as_object().unwrap()));
        assert_eq!(Value::Object(decode_fields(Some(&encoded))), original);
    }

    #[test]
    fn test_typed_kinds_survive_a_rewrite() {
        let stored = json!({
            "vencimento": { "timestampValue": "2025-06-10T03:00:00Z" },
            "servico": { "referenceValue": "projects/p/databases/(default)/documents/projetos/cat-1" },
            "assinatura": { "bytesValue": "aGVsbG8=" },
            "local": { "geoPointValue": { "latitude": -23.55, "longitude": -46.63 } },
            "taxa": { "doubleValue": "NaN" }
        });

        for (field, typed) in stored.as_object().unwrap() {
            let decoded = decode_value(typed);
            assert_eq!(encode_value(&decoded), *typed, "{field}");
        }
    }

    #[test]
    fn test_invoice_array_keeps_timestamp_due_date() {
        let faturas = json!({ "arrayValue": { "values": [
            { "mapValue": { "fields": {
                "id": { "stringValue": "fat-1" },
                "status": { "stringValue": "pendente" },
                "vencimento": { "timestampValue": "2025-06-10T03:00:00Z" }
            } } }
        ] } });

        let mut decoded = decode_value(&faturas);
        decoded[0]["status"] = json!("pago");
        let encoded = encode_value(&decoded);

        let fields = &encoded["arrayValue"]["values"][0]["mapValue"]["fields"];
        assert_eq!(fields["vencimento"], json!({ "timestampValue": "2025-06-10T03:00:00Z" }));
        assert_eq!(fields["status"], json!({ "stringValue": "pago" }));
    }

    #[test]
    fn test_ordinary_single_key_map_is_not_raw() {
        let map = json!({ "__firestore": "texto" });
        assert_eq!(
            encode_value(&map),
            json!({ "mapValue": { "fields": { "__firestore": { "stringValue": "texto" } } } })
        );
    }
}
