// src/chunking/split.rs
//! Text splitting. All lengths are counted in chars, never bytes.

/// Splits `text` into chunks of at most `max_len` chars for speech synthesis.
///
/// Split points, in order of preference:
/// 1. a sentence end (`.`, `!` or `?` followed by whitespace) within the
///    last `window` chars before the limit;
/// 2. a paragraph break within that window;
/// 3. the last whitespace before the limit;
/// 4. a hard cut at the limit.
///
/// The chunks concatenate back to `text` exactly.
pub fn split_for_synthesis(text: &str, max_len: usize, window: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if max_len == 0 {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut rest = text;
    while let Some((limit, _)) = rest.char_indices().nth(max_len) {
        let cut = choose_cut(&rest[..limit], rest[limit..].chars().next(), max_len, window);
        chunks.push(rest[..cut].to_string());
        rest = &rest[cut..];
    }
    if !rest.is_empty() {
        chunks.push(rest.to_string());
    }
    chunks
}

/// Byte offset in `head` (exactly `max_len` chars) to cut at. Never 0.
///
/// `next` is the char right after `head`, `None` at the end of the text.
fn choose_cut(head: &str, next: Option<char>, max_len: usize, window: usize) -> usize {
    let window_start = head
        .char_indices()
        .nth(max_len.saturating_sub(window))
        .map(|(i, _)| i)
        .unwrap_or(head.len());

    let mut following = next;
    for (at, c) in head.char_indices().rev() {
        if at < window_start {
            break;
        }
        if matches!(c, '.' | '!' | '?') && following.map_or(true, char::is_whitespace) {
            let end = at + c.len_utf8();
            // Keep the whitespace with this chunk when it fits.
            return match following {
                Some(space) if end < head.len() => end + space.len_utf8(),
                _ => end,
            };
        }
        following = Some(c);
    }

    if let Some(found) = head[window_start..].rfind("\n\n") {
        return window_start + found + 2;
    }

    head.char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(head.len())
}

/// Slices `text` into consecutive pieces of `size` chars; the last may be
/// shorter.
pub fn slice_fixed(text: &str, size: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if size == 0 {
        return vec![text.to_string()];
    }

    let mut slices = Vec::with_capacity(text.len() / size + 1);
    let mut rest = text;
    while let Some((limit, _)) = rest.char_indices().nth(size) {
        slices.push(rest[..limit].to_string());
        rest = &rest[limit..];
    }
    slices.push(rest.to_string());
    slices
}
