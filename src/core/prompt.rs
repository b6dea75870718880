use crate::domain::model::SearchFilters;

/// Fixed system instruction sent ahead of every search prompt.
pub const SYSTEM_PROMPT: &str = "You are a precise research model. Use the web plugin to find \
public LinkedIn company pages. Always return only valid JSON as requested.";

const EMPTY_FIELD: &str = "N/A";

fn or_placeholder(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        EMPTY_FIELD
    } else {
        trimmed
    }
}

/// Renders the user instruction for one search.
///
/// Filter values are substituted as plain text. The output depends on the
/// filters alone, so identical filters always yield an identical prompt.
pub fn build_prompt(filters: &SearchFilters) -> String {
    let initial = filters.starts_with.map(|c| c.to_ascii_uppercase());
    let initial_label = initial.map_or_else(|| "any".to_string(), |c| c.to_string());

    let mut rules = vec![
        "Use web search. Consider reputable sources and prioritize LinkedIn **company** pages \
only (URLs like `https://www.linkedin.com/company/...`)."
            .to_string(),
        "Exclude personal profiles, job posts, posts, or sales and promotional pages. Return \
organization/company pages only."
            .to_string(),
        "Return **ONLY** a compact JSON array (no prose) with objects of exactly this shape:\n   \
{\"name\": \"Company Name\", \"linkedin_url\": \"https://www.linkedin.com/company/...\"}"
            .to_string(),
        "Ensure URLs are canonical company pages (avoid tracking params) and unique by company."
            .to_string(),
        "A company matches when its page shows ANY of the keywords. Treat the location as a \
signal to prefer, not a strict filter."
            .to_string(),
        "Apply the size filter only when the page shows a size tag.".to_string(),
    ];
    if let Some(c) = initial {
        rules.push(format!(
            "Every company name MUST start with the letter \"{}\".",
            c
        ));
    }
    rules.push("If nothing is found, return `[]`.".to_string());

    let numbered: Vec<String> = rules
        .iter()
        .enumerate()
        .map(|(i, rule)| format!("{}) {}", i + 1, rule))
        .collect();

    format!(
        "You are a web research assistant.\n\
Task: Find up to {max} **public LinkedIn company pages** that match these filters.\n\
\n\
Filters:\n\
- Keywords (match any, comma-separated): {keywords}\n\
- Location (city/region/country words should appear on the page or metadata): {location}\n\
- Company size (use LinkedIn size tag when visible): {size}\n\
- Company name starts with: {initial}\n\
\n\
Rules:\n\
{rules}\n\
\n\
Output: JSON array only.\n",
        max = filters.max_results,
        keywords = or_placeholder(&filters.keywords),
        location = or_placeholder(&filters.location),
        size = filters.size,
        initial = initial_label,
        rules = numbered.join("\n"),
    )
}
