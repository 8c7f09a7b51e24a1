/// Normalises a table cell: doubled quotes become single, whitespace runs collapse to
/// one space, and the result is trimmed.
pub fn clean_text(raw: &str) -> String {
    let unquoted = raw.replace("\"\"", "\"");
    unquoted.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits a `;`-separated block list (`"bloc_1; bloc_2"`), dropping empty items.
pub fn split_block_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
