//! Boundary-aware text segmentation with cross-chunk overlap.
//!
//! Text is packed greedily by paragraph (blank-line separated) under a character budget. A
//! paragraph that still exceeds the budget on its own is cut at sentence ends and repacked the
//! same way. Sentences are never split, so one overlong sentence yields one oversized chunk.
//!
//! After segmentation every chunk except the first carries the tail of its predecessor as
//! [`Chunk::overlap`]. The overlap is context for the model only; budgets apply to
//! [`Chunk::content`].

const PARAGRAPH_SEPARATOR: &str = "\n\n";
const SENTENCE_SEPARATOR: &str = " ";

/// One ordered segment of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Zero-based position in the chunk sequence.
    pub index: usize,
    /// Tail of the previous segment, empty for the first chunk or when overlap is disabled.
    pub overlap: String,
    /// The segment's own text.
    pub content: String,
}

impl Chunk {
    /// Text handed to the summarizer: overlap and content joined by a paragraph break.
    pub fn model_input(&self) -> String {
        if self.overlap.is_empty() {
            self.content.clone()
        } else {
            format!("{}{PARAGRAPH_SEPARATOR}{}", self.overlap, self.content)
        }
    }

    /// Character length of the content, excluding the overlap.
    pub fn content_chars(&self) -> usize {
        char_len(&self.content)
    }
}

/// Split `text` into ordered chunks of at most `max_chars` characters of content.
///
/// - Whitespace-only input produces no chunks.
/// - `overlap_chars` characters from the end of the previous segment (or all of it when
///   shorter) are attached to each later chunk; `0` disables overlap.
/// - A `max_chars` of zero is treated as one.
pub fn split(text: &str, max_chars: usize, overlap_chars: usize) -> Vec<Chunk> {
    let max_chars = max_chars.max(1);
    let segments = segment(text, max_chars);

    (0..segments.len())
        .map(|index| Chunk {
            index,
            overlap: overlap_for(&segments, index, overlap_chars).to_string(),
            content: segments[index].clone(),
        })
        .collect()
}

/// Produce the raw segments before overlap injection.
fn segment(text: &str, max_chars: usize) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n");
    let paragraphs = normalized
        .split(PARAGRAPH_SEPARATOR)
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty());

    pack(paragraphs, PARAGRAPH_SEPARATOR, max_chars)
        .into_iter()
        .flat_map(|segment| {
            if char_len(&segment) > max_chars {
                pack(split_sentences(&segment), SENTENCE_SEPARATOR, max_chars)
            } else {
                vec![segment]
            }
        })
        .collect()
}

/// Greedily join non-empty pieces while the joined length stays within `max_chars`.
///
/// A piece that does not fit starts a new segment; a piece larger than the budget becomes a
/// segment of its own.
fn pack<'a>(
    pieces: impl IntoIterator<Item = &'a str>,
    separator: &str,
    max_chars: usize,
) -> Vec<String> {
    let separator_len = char_len(separator);
    let mut segments = Vec::new();
    let mut buffer = String::new();
    let mut buffer_len = 0usize;

    for piece in pieces {
        let piece_len = char_len(piece);
        if buffer_len > 0 && buffer_len + separator_len + piece_len > max_chars {
            segments.push(std::mem::take(&mut buffer));
            buffer_len = 0;
        }
        if buffer_len > 0 {
            buffer.push_str(separator);
            buffer_len += separator_len;
        }
        buffer.push_str(piece);
        buffer_len += piece_len;
    }

    if !buffer.is_empty() {
        segments.push(buffer);
    }
    segments
}

/// Split after `.`, `!` or `?` when followed by whitespace. Pieces are trimmed.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut previous: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        if ch.is_whitespace() && matches!(previous, Some('.' | '!' | '?')) {
            sentences.push(&text[start..offset]);
            start = text.len();
            while let Some(&(next_offset, next)) = chars.peek() {
                if !next.is_whitespace() {
                    start = next_offset;
                    break;
                }
                chars.next();
            }
            previous = None;
            continue;
        }
        previous = Some(ch);
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .collect()
}

fn overlap_for(segments: &[String], index: usize, overlap_chars: usize) -> &str {
    if index == 0 || overlap_chars == 0 {
        return "";
    }
    tail_chars(&segments[index - 1], overlap_chars)
}

fn tail_chars(text: &str, count: usize) -> &str {
    let total = char_len(text);
    if total <= count {
        return text;
    }
    text.char_indices()
        .nth(total - count)
        .map_or("", |(offset, _)| &text[offset..])
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
