//! Quote-aware argument splitting.

use std::collections::BTreeMap;

/// Splits a raw argument string into tokens.
///
/// Tokens are maximal runs of characters other than space, tab and quotes,
/// or complete `"…"`/`'…'` quoted runs. A quote without a closing partner
/// is skipped. When `limit` is non-zero and a token would exceed it, the raw
/// remainder from that token's start becomes the final token verbatim.
/// With `unquote`, quoted tokens lose their surrounding quotes.
///
/// Afterwards each token equal to an alias key is replaced by its long
/// form, and each `key=value` token starting with an alias key gets a
/// leading `--`.
///
/// ```
/// use std::collections::BTreeMap;
/// use herald::command::domain::split_arguments;
///
/// let tokens = split_arguments("a b c d", 2, true, &BTreeMap::new());
/// assert_eq!(tokens, vec!["a".to_owned(), "b c d".to_owned()]);
/// ```
#[must_use]
pub fn split_arguments(
    raw: &str,
    limit: usize,
    unquote: bool,
    aliases: &BTreeMap<String, String>,
) -> Vec<String> {
    let mut tokens = Vec::new();
    for span in Spans::new(raw) {
        if limit > 0 && tokens.len() + 1 >= limit {
            if let Some(rest) = raw.get(span.start..) {
                tokens.push(rest.to_owned());
            }
            break;
        }
        let Some(text) = raw.get(span.start..span.end) else {
            break;
        };
        if unquote && span.quoted {
            tokens.push(strip_quotes(text).to_owned());
        } else {
            tokens.push(text.to_owned());
        }
    }

    if aliases.is_empty() {
        return tokens;
    }
    tokens
        .into_iter()
        .map(|token| expand_alias(token, aliases))
        .collect()
}

fn expand_alias(token: String, aliases: &BTreeMap<String, String>) -> String {
    if is_key_value(&token) && aliases.keys().any(|key| token.starts_with(key.as_str())) {
        return format!("--{token}");
    }
    aliases.get(&token).cloned().unwrap_or(token)
}

fn is_key_value(token: &str) -> bool {
    let is_word = |part: &str| {
        !part.is_empty()
            && part
                .chars()
                .all(|character| character.is_ascii_alphanumeric() || character == '_')
    };
    token
        .split_once('=')
        .is_some_and(|(key, value)| is_word(key) && is_word(value))
}

fn strip_quotes(text: &str) -> &str {
    text.get(1..text.len().saturating_sub(1)).unwrap_or(text)
}

#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
    quoted: bool,
}

struct Spans<'a> {
    raw: &'a str,
    position: usize,
}

impl<'a> Spans<'a> {
    const fn new(raw: &'a str) -> Self {
        Self { raw, position: 0 }
    }
}

const fn is_separator(character: char) -> bool {
    matches!(character, ' ' | '\t')
}

const fn is_quote(character: char) -> bool {
    matches!(character, '"' | '\'')
}

impl Iterator for Spans<'_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        loop {
            let rest = self.raw.get(self.position..)?;
            let mut characters = rest.char_indices();
            let (offset, character) = characters.next()?;
            let start = self.position + offset;

            if is_separator(character) {
                self.position = start + character.len_utf8();
                continue;
            }

            if is_quote(character) {
                let body_start = start + character.len_utf8();
                let closing = self
                    .raw
                    .get(body_start..)
                    .and_then(|body| body.find(character));
                match closing {
                    Some(length) => {
                        let end = body_start + length + character.len_utf8();
                        self.position = end;
                        return Some(Span {
                            start,
                            end,
                            quoted: true,
                        });
                    }
                    None => {
                        self.position = body_start;
                        continue;
                    }
                }
            }

            let length = rest
                .find(|candidate| is_separator(candidate) || is_quote(candidate))
                .unwrap_or(rest.len());
            let end = self.position + length;
            self.position = end;
            return Some(Span {
                start,
                end,
                quoted: false,
            });
        }
    }
}
