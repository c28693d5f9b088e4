//! Subject filter navigation
//!
//! The directory listing is driven by the `subject` query parameter. Picking
//! "all" removes the parameter; any other subject sets it, leaving the rest of
//! the query untouched.

use url::form_urlencoded;

pub const SUBJECT_PARAM: &str = "subject";

/// Filter value that clears the subject filter
pub const ALL_SUBJECTS: &str = "all";

fn parse(params: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(params.trim_start_matches('?').as_bytes())
        .into_owned()
        .collect()
}

fn serialize(pairs: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Set `key` to `value`, replacing the first existing value in place
pub fn form_url_query(params: &str, key: &str, value: &str) -> String {
    let mut pairs = parse(params);

    match pairs.iter().position(|(k, _)| k == key) {
        Some(index) => {
            pairs[index].1 = value.to_string();
            let mut seen = false;
            pairs.retain(|(k, _)| {
                if k != key {
                    return true;
                }
                let keep = !seen;
                seen = true;
                keep
            });
        }
        None => pairs.push((key.to_string(), value.to_string())),
    }

    serialize(&pairs)
}

/// Drop every occurrence of the given keys
pub fn remove_keys_from_url_query(params: &str, keys: &[&str]) -> String {
    let pairs: Vec<_> = parse(params)
        .into_iter()
        .filter(|(k, _)| !keys.contains(&k.as_str()))
        .collect();

    serialize(&pairs)
}

/// Current subject filter, empty when unset
pub fn current_subject(params: &str) -> String {
    parse(params)
        .into_iter()
        .find(|(k, _)| k == SUBJECT_PARAM)
        .map(|(_, v)| v)
        .unwrap_or_default()
}

/// URL to navigate to after choosing a subject
pub fn subject_filter_url(pathname: &str, params: &str, chosen: &str) -> String {
    let query = if chosen == ALL_SUBJECTS {
        remove_keys_from_url_query(params, &[SUBJECT_PARAM])
    } else {
        form_url_query(params, SUBJECT_PARAM, chosen)
    };

    if query.is_empty() {
        pathname.to_string()
    } else {
        format!("{pathname}?{query}")
    }
}
