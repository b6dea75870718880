use crate::domain::model::CompanyRecord;
use serde_json::Value;
use std::collections::HashSet;

/// Path segment that marks a link as an organization page.
pub const COMPANY_PAGE_MARKER: &str = "/company/";

/// Field names accepted for the page link, in lookup order.
const URL_FIELDS: [&str; 2] = ["linkedin_url", "url"];

/// Reads company records out of free-form model output.
///
/// Never fails: empty, unparseable or off-shape input gives an empty list.
/// The greedy span from the first `[` to the last `]` is tried first. When it
/// yields nothing, each balanced top-level bracket span is tried in order and
/// the first one that yields records wins.
pub fn extract_records(raw: &str) -> Vec<CompanyRecord> {
    let text = raw.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let greedy = greedy_span(text).unwrap_or(text);
    let records = records_from_candidate(greedy);
    if !records.is_empty() {
        return records;
    }

    for span in balanced_spans(text) {
        if span == greedy {
            continue;
        }
        let records = records_from_candidate(span);
        if !records.is_empty() {
            tracing::debug!("Recovered records from a nested bracket span");
            return records;
        }
    }

    Vec::new()
}

/// Strips the query string and fragment from a page link.
pub fn normalize_url(url: &str) -> &str {
    let url = url.split('?').next().unwrap_or(url);
    url.split('#').next().unwrap_or(url)
}

fn greedy_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (start < end).then(|| &text[start..=end])
}

/// `[...]` spans with balanced brackets, ignoring brackets inside JSON string
/// literals. An opening bracket that never closes is skipped and the scan
/// restarts from the next one.
fn balanced_spans(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut from = 0usize;

    while let Some(offset) = text[from..].find('[') {
        let start = from + offset;
        match closing_bracket(&text[start..]) {
            Some(len) => {
                spans.push(&text[start..start + len]);
                from = start + len;
            }
            None => from = start + 1,
        }
    }

    spans
}

/// Byte length of the balanced span opening at the start of `text`.
fn closing_bracket(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}

fn records_from_candidate(candidate: &str) -> Vec<CompanyRecord> {
    let items = match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            tracing::debug!("Candidate span is valid JSON but not an array");
            return Vec::new();
        }
        Err(e) => {
            tracing::debug!("Candidate span is not valid JSON: {}", e);
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for item in &items {
        let Some(record) = record_from_item(item) else {
            continue;
        };
        if seen.insert(record.url.clone()) {
            records.push(record);
        }
    }

    records
}

fn record_from_item(item: &Value) -> Option<CompanyRecord> {
    let obj = item.as_object()?;

    let name = field_text(obj.get("name"));
    let url = URL_FIELDS
        .iter()
        .map(|key| field_text(obj.get(*key)))
        .find(|value| !value.is_empty())
        .unwrap_or_default();

    if name.is_empty() || url.is_empty() || !url.contains(COMPANY_PAGE_MARKER) {
        return None;
    }

    Some(CompanyRecord {
        name,
        url: normalize_url(&url).to_string(),
    })
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, url: &str) -> CompanyRecord {
        CompanyRecord {
            name: name.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_empty_and_non_json_input() {
        assert!(extract_records("").is_empty());
        assert!(extract_records("   \n").is_empty());
        assert!(extract_records("not json at all").is_empty());
        assert!(extract_records("{\"name\": \"Acme\"}").is_empty());
        assert!(extract_records("[{\"name\": \"Acme\",").is_empty());
    }

    #[test]
    fn test_query_string_is_stripped() {
        let raw =
            r#"[{"name":"Acme","linkedin_url":"https://www.linkedin.com/company/acme?x=1"}]"#;
        assert_eq!(
            extract_records(raw),
            vec![record("Acme", "https://www.linkedin.com/company/acme")]
        );
    }

    #[test]
    fn test_fragment_variants_are_deduplicated() {
        let raw = r#"[
            {"name": "Acme One", "linkedin_url": "https://www.linkedin.com/company/acme#a"},
            {"name": "Acme Two", "linkedin_url": "https://www.linkedin.com/company/acme#b"}
        ]"#;
        assert_eq!(
            extract_records(raw),
            vec![record("Acme One", "https://www.linkedin.com/company/acme")]
        );
    }

    #[test]
    fn test_query_and_fragment_both_removed() {
        assert_eq!(
            normalize_url("https://www.linkedin.com/company/acme/?trk=x#about"),
            "https://www.linkedin.com/company/acme/"
        );
        assert_eq!(
            normalize_url("https://www.linkedin.com/company/acme#about?x=1"),
            "https://www.linkedin.com/company/acme"
        );
    }

    #[test]
    fn test_non_company_links_are_dropped() {
        let raw = r#"[
            {"name": "Jane Doe", "linkedin_url": "https://www.linkedin.com/in/jane-doe"},
            {"name": "Acme", "linkedin_url": "https://www.linkedin.com/company/acme"},
            {"name": "Hiring", "linkedin_url": "https://www.linkedin.com/jobs/view/123"}
        ]"#;
        assert_eq!(
            extract_records(raw),
            vec![record("Acme", "https://www.linkedin.com/company/acme")]
        );
    }

    #[test]
    fn test_missing_or_blank_fields_are_dropped() {
        let raw = r#"[
            {"name": "   ", "linkedin_url": "https://www.linkedin.com/company/blank"},
            {"linkedin_url": "https://www.linkedin.com/company/nameless"},
            {"name": "No Link"},
            {"name": null, "linkedin_url": null},
            {"name": "  Beta Corp  ", "linkedin_url": "  https://www.linkedin.com/company/beta  "}
        ]"#;
        assert_eq!(
            extract_records(raw),
            vec![record("Beta Corp", "https://www.linkedin.com/company/beta")]
        );
    }

    #[test]
    fn test_non_object_elements_are_skipped() {
        let raw = r#"[42, "text", null, ["nested"],
            {"name": "Acme", "linkedin_url": "https://www.linkedin.com/company/acme"}]"#;
        assert_eq!(extract_records(raw).len(), 1);
    }

    #[test]
    fn test_scalar_names_are_stringified() {
        let raw = r#"[{"name": 3, "linkedin_url": "https://www.linkedin.com/company/3m"}]"#;
        assert_eq!(
            extract_records(raw),
            vec![record("3", "https://www.linkedin.com/company/3m")]
        );
    }

    #[test]
    fn test_url_field_alias() {
        let raw = r#"[{"name": "Acme", "url": "https://www.linkedin.com/company/acme"}]"#;
        assert_eq!(extract_records(raw).len(), 1);
    }

    #[test]
    fn test_array_wrapped_in_prose() {
        let raw = "Here you go:\n[{\"name\":\"Acme\",\"linkedin_url\":\"https://www.linkedin.com/company/acme\"}]\nThanks";
        assert_eq!(
            extract_records(raw),
            vec![record("Acme", "https://www.linkedin.com/company/acme")]
        );
    }

    #[test]
    fn test_array_in_code_fence() {
        let raw = "```json\n[\n  {\"name\": \"Acme\", \"linkedin_url\": \"https://www.linkedin.com/company/acme\"}\n]\n```";
        assert_eq!(extract_records(raw).len(), 1);
    }

    #[test]
    fn test_names_may_repeat() {
        let raw = r#"[
            {"name": "Acme", "linkedin_url": "https://www.linkedin.com/company/acme-us"},
            {"name": "Acme", "linkedin_url": "https://www.linkedin.com/company/acme-uk"}
        ]"#;
        assert_eq!(extract_records(raw).len(), 2);
    }

    #[test]
    fn test_unrelated_brackets_in_prose_are_recovered() {
        let raw = "I searched [3 sources].\n\
[{\"name\": \"Acme\", \"linkedin_url\": \"https://www.linkedin.com/company/acme\"}]\n\
See [notes] above.";
        assert_eq!(
            extract_records(raw),
            vec![record("Acme", "https://www.linkedin.com/company/acme")]
        );
    }

    #[test]
    fn test_brackets_inside_strings_do_not_split_spans() {
        let raw = "Note [1].\n[{\"name\": \"Acme [EU]\", \"linkedin_url\": \"https://www.linkedin.com/company/acme-eu\"}]";
        assert_eq!(
            extract_records(raw),
            vec![record("Acme [EU]", "https://www.linkedin.com/company/acme-eu")]
        );
    }

    #[test]
    fn test_unclosed_bracket_before_array_is_skipped() {
        let raw = "Results [partial list:\n\
[{\"name\": \"Acme\", \"linkedin_url\": \"https://www.linkedin.com/company/acme\"}]";
        assert_eq!(
            extract_records(raw),
            vec![record("Acme", "https://www.linkedin.com/company/acme")]
        );
    }

    #[test]
    fn test_empty_array() {
        assert!(extract_records("[]").is_empty());
        assert!(extract_records("No matches: []").is_empty());
    }

    #[test]
    fn test_serialized_records_come_back_unchanged() {
        let input = vec![
            record("Acme", "https://www.linkedin.com/company/acme"),
            record("Beta", "https://www.linkedin.com/company/beta"),
            record("Acme", "https://www.linkedin.com/company/acme-holdings"),
        ];
        let raw: Vec<Value> = input
            .iter()
            .map(|r| serde_json::json!({"name": r.name, "linkedin_url": r.url}))
            .collect();
        let text = serde_json::to_string(&raw).unwrap();

        assert_eq!(extract_records(&text), input);
    }
}
