//! Size-bounded splitting of the corpus text into part files.

/// Whether `text` must be split under `limit` bytes.
pub fn needs_split(text: &str, limit: usize) -> bool {
    text.len() > limit
}

/// Split `text` at line boundaries into parts of at most `limit` bytes.
///
/// Each line counts as its UTF-8 length plus one for the newline. The limit is
/// checked before appending a line, so a line longer than the limit still
/// lands whole in a part of its own. Parts are newline-joined.
pub fn split_parts(text: &str, limit: usize) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut size = 0usize;

    for line in text.split('\n') {
        let line_size = line.len() + 1;
        if size + line_size > limit && !current.is_empty() {
            parts.push(current.join("\n"));
            current.clear();
            size = 0;
        }
        current.push(line);
        size += line_size;
    }
    if !current.is_empty() {
        parts.push(current.join("\n"));
    }
    parts
}
