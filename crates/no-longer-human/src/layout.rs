//! Splits prose into sentences, lines, and pages.
//!
//! All lengths count `char`s, not bytes.

/// Japanese full stop; ends a sentence.
pub const FULL_STOP: char = '\u{3002}';
/// Japanese comma; preferred line break point.
pub const COMMA: char = '\u{3001}';

/// Lines shown together on one screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub lines: Vec<String>,
}

/// Splits `s` after every `delimiter`, keeping the delimiter at the end of
/// each piece. An empty string yields no pieces.
pub fn split_keeping(s: &str, delimiter: char) -> Vec<String> {
    s.split_inclusive(delimiter).map(String::from).collect()
}

/// Breaks one sentence into lines of at most `max_line_length` characters.
///
/// Phrases (split after each comma) are packed greedily. A phrase that
/// cannot fit on any line is cut at `max_line_length`; a comma or full stop
/// left at the head of the remainder is pulled back onto the cut line.
/// Lines shorter than `min_line_length` are only emitted when the next
/// phrase would not fit.
pub fn format_sentence(
    sentence: &str,
    min_line_length: usize,
    max_line_length: usize,
) -> Vec<String> {
    let max = max_line_length.max(1);
    let min = min_line_length.min(max);

    let mut lines = Vec::new();
    let mut phrases = split_keeping(sentence, COMMA)
        .into_iter()
        .map(|phrase| phrase.chars().collect::<Vec<char>>());
    let Some(mut phrase) = phrases.next() else {
        return lines;
    };
    let mut line: Vec<char> = Vec::new();

    loop {
        if (line.len() < min || line.is_empty()) && phrase.len() > max {
            let take = max - line.len();
            line.extend(phrase.drain(..take));
            if matches!(phrase.first(), Some(&COMMA) | Some(&FULL_STOP)) {
                line.push(phrase.remove(0));
            }
            lines.push(line.drain(..).collect());
            continue;
        }

        if line.len() + phrase.len() <= max {
            line.append(&mut phrase);
            match phrases.next() {
                Some(next) => {
                    phrase = next;
                    continue;
                }
                None => break,
            }
        }

        lines.push(line.drain(..).collect());
    }

    if !line.is_empty() {
        lines.push(line.into_iter().collect());
    }
    lines
}

/// Splits `items` into the fewest segments of at most `max_per_segment`,
/// sized as evenly as possible (earlier segments take the remainder).
pub fn divide_evenly<T>(items: Vec<T>, max_per_segment: usize) -> Vec<Vec<T>> {
    if items.is_empty() {
        return Vec::new();
    }
    let segment_count = items.len().div_ceil(max_per_segment.max(1));
    let per_segment = items.len().div_ceil(segment_count);

    let mut items = items.into_iter().peekable();
    let mut segments = Vec::with_capacity(segment_count);
    while items.peek().is_some() {
        segments.push(items.by_ref().take(per_segment).collect());
    }
    segments
}

/// Lays out a text: each input line is a paragraph, split into sentences
/// at full stops, formatted into lines, and divided into pages.
pub fn paginate(
    text: &str,
    min_line_length: usize,
    max_line_length: usize,
    max_lines_per_page: usize,
) -> Vec<Page> {
    text.lines()
        .flat_map(|paragraph| split_keeping(paragraph, FULL_STOP))
        .map(|sentence| format_sentence(sentence.trim(), min_line_length, max_line_length))
        .flat_map(|lines| divide_evenly(lines, max_lines_per_page))
        .map(|lines| Page { lines })
        .collect()
}
