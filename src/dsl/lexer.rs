//! Lexer (tokenizer) for circuit definition and test vector files.

use std::cmp::Ordering;

use crate::error::{GatesimError, Result};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token's text
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
}

impl Token {
    fn new(text: impl Into<String>, line: usize) -> Self {
        Self {
            text: text.into(),
            line,
        }
    }

    /// Whether this token closes a braced section.
    pub fn is_close(&self) -> bool {
        self.text == "}"
    }
}

fn is_delimiter(ch: char) -> bool {
    matches!(ch, ' ' | ',' | '{' | ';' | '=' | '\t' | '\n' | '\r')
}

/// Pending expansion of a `[n]` or `[a:b]` word.
#[derive(Debug, Clone)]
enum Repeat {
    /// `NAME[count]`
    Times { text: String, remaining: usize },
    /// `HEAD[start:end]TAIL`, walking towards `end`
    Range {
        head: String,
        tail: String,
        next: i64,
        end: i64,
        done: bool,
    },
}

impl Repeat {
    fn next(&mut self) -> Option<String> {
        match self {
            Repeat::Times { text, remaining } => {
                if *remaining == 0 {
                    return None;
                }
                *remaining -= 1;
                Some(text.clone())
            }
            Repeat::Range {
                head,
                tail,
                next,
                end,
                done,
            } => {
                if *done {
                    return None;
                }
                let value = *next;
                match value.cmp(end) {
                    Ordering::Less => *next += 1,
                    Ordering::Greater => *next -= 1,
                    Ordering::Equal => *done = true,
                }
                Some(format!("{}{}{}", head, value, tail))
            }
        }
    }
}

/// Lexer for circuit files.
///
/// Splits on spaces, tabs, newlines, `,`, `;`, `=` and `{`; `}` is always a
/// token of its own. A word starting with `##` records the rest of its line as
/// an annotation, a word starting with `#` discards it. Words containing `[`
/// are expanded by the repeat state machine before being handed out.
pub struct Lexer<'a> {
    origin: String,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    repeat: Option<(Repeat, usize)>,
    pushback: Option<Token>,
    annotations: Vec<String>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer over `input`; `origin` names the file in errors.
    pub fn new(input: &'a str, origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            chars: input.chars().peekable(),
            line: 1,
            repeat: None,
            pushback: None,
            annotations: Vec::new(),
        }
    }

    /// Name of the file being tokenized.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Current line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Get the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        if let Some(token) = self.pushback.take() {
            return Ok(Some(token));
        }

        loop {
            if let Some(token) = self.next_repeated() {
                return Ok(Some(token));
            }

            let Some(word) = self.read_word() else {
                return Ok(None);
            };

            if word.text.contains('[') {
                let repeat = self.parse_repeat(&word)?;
                self.repeat = Some((repeat, word.line));
                // An empty expansion (`x[0]`) falls through to the next word
                continue;
            }

            return Ok(Some(word));
        }
    }

    /// Push a token back; it is returned by the next call to [`Self::next_token`].
    pub fn unget(&mut self, token: Token) {
        debug_assert!(
            self.pushback.is_none(),
            "only one token of pushback is supported"
        );
        self.pushback = Some(token);
    }

    /// Drain the `##` annotations seen so far.
    pub fn take_annotations(&mut self) -> Vec<String> {
        std::mem::take(&mut self.annotations)
    }

    fn next_repeated(&mut self) -> Option<Token> {
        let (repeat, line) = self.repeat.as_mut()?;
        let line = *line;
        if let Some(text) = repeat.next() {
            return Some(Token::new(text, line));
        }
        self.repeat = None;
        None
    }

    fn read_word(&mut self) -> Option<Token> {
        loop {
            let ch = *self.chars.peek()?;

            if ch == '\n' {
                self.chars.next();
                self.line += 1;
                continue;
            }
            if is_delimiter(ch) {
                self.chars.next();
                continue;
            }
            if ch == '}' {
                self.chars.next();
                return Some(Token::new("}", self.line));
            }
            if ch == '#' {
                self.chars.next();
                if self.chars.peek() == Some(&'#') {
                    self.chars.next();
                    let caption = self.rest_of_line();
                    self.annotations.push(caption.trim().to_string());
                } else {
                    self.rest_of_line();
                }
                continue;
            }

            let line = self.line;
            let mut text = String::new();
            while let Some(&c) = self.chars.peek() {
                if is_delimiter(c) || c == '}' {
                    break;
                }
                text.push(c);
                self.chars.next();
            }
            return Some(Token::new(text, line));
        }
    }

    fn rest_of_line(&mut self) -> String {
        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.chars.next();
        }
        text
    }

    fn parse_repeat(&self, word: &Token) -> Result<Repeat> {
        let text = word.text.as_str();
        let illegal = || GatesimError::IllegalRepeater {
            origin: self.origin.clone(),
            line: word.line,
            text: text.to_string(),
        };

        let open = text.find('[').ok_or_else(illegal)?;
        let close = text[open..]
            .find(']')
            .map(|i| open + i)
            .ok_or_else(illegal)?;
        let head = &text[..open];
        let inner = &text[open + 1..close];
        let tail = &text[close + 1..];

        if head.contains(']') || tail.contains(|c| c == '[' || c == ']') {
            return Err(illegal());
        }

        match inner.split_once(':') {
            None => {
                if head.is_empty() || !tail.is_empty() {
                    return Err(illegal());
                }
                let count = inner.parse::<usize>().map_err(|_| illegal())?;
                Ok(Repeat::Times {
                    text: head.to_string(),
                    remaining: count,
                })
            }
            Some((start, end)) => {
                let start = start.parse::<i64>().map_err(|_| illegal())?;
                let end = end.parse::<i64>().map_err(|_| illegal())?;
                Ok(Repeat::Range {
                    head: head.to_string(),
                    tail: tail.to_string(),
                    next: start,
                    end,
                    done: false,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<String> {
        let mut lexer = Lexer::new(input, "test");
        let mut out = Vec::new();
        while let Some(tok) = lexer.next_token().unwrap() {
            out.push(tok.text);
        }
        out
    }

    #[test]
    fn test_lexer_delimiters() {
        assert_eq!(
            tokens("circuit AND2 g1 { a, b };\n outputs={g1}"),
            vec!["circuit", "AND2", "g1", "a", "b", "}", "outputs", "g1", "}"]
        );
    }

    #[test]
    fn test_repeat_count() {
        assert_eq!(tokens("x[3]"), vec!["x", "x", "x"]);
        assert_eq!(tokens("a x[0] b"), vec!["a", "b"]);
    }

    #[test]
    fn test_repeat_ranges() {
        assert_eq!(tokens("[1:3]y"), vec!["1y", "2y", "3y"]);
        assert_eq!(tokens("a[2:0]b"), vec!["a2b", "a1b", "a0b"]);
        assert_eq!(tokens("in[4:4]"), vec!["in4"]);
        assert_eq!(tokens("c[0:2]"), vec!["c0", "c1", "c2"]);
    }

    #[test]
    fn test_ranges_at_integer_limits() {
        let mut lexer = Lexer::new("x[-9223372036854775808:9223372036854775807]", "test");
        assert_eq!(lexer.next_token().unwrap().unwrap().text, "x-9223372036854775808");
        assert_eq!(lexer.next_token().unwrap().unwrap().text, "x-9223372036854775807");

        assert_eq!(
            tokens("y[9223372036854775806:9223372036854775807]"),
            vec!["y9223372036854775806", "y9223372036854775807"]
        );
        assert_eq!(
            tokens("z[-9223372036854775807:-9223372036854775808]"),
            vec!["z-9223372036854775807", "z-9223372036854775808"]
        );
    }

    #[test]
    fn test_fused_close_brace_after_range() {
        assert_eq!(tokens("{ X[3:4]}"), vec!["X3", "X4", "}"]);
        assert_eq!(tokens("{a b}"), vec!["a", "b", "}"]);
    }

    #[test]
    fn test_comments_and_annotations() {
        let mut lexer = Lexer::new("a # ignored b\n## first case\nc ##second\n", "test");
        assert_eq!(lexer.next_token().unwrap().unwrap().text, "a");
        let c = lexer.next_token().unwrap().unwrap();
        assert_eq!(c.text, "c");
        assert_eq!(c.line, 3);
        assert!(lexer.next_token().unwrap().is_none());
        assert_eq!(lexer.take_annotations(), vec!["first case", "second"]);
        assert!(lexer.take_annotations().is_empty());
    }

    #[test]
    fn test_unget() {
        let mut lexer = Lexer::new("a b", "test");
        let a = lexer.next_token().unwrap().unwrap();
        lexer.unget(a);
        assert_eq!(lexer.next_token().unwrap().unwrap().text, "a");
        assert_eq!(lexer.next_token().unwrap().unwrap().text, "b");
    }

    #[test]
    fn test_unget_during_repeat() {
        let mut lexer = Lexer::new("v[1:3]", "test");
        let first = lexer.next_token().unwrap().unwrap();
        assert_eq!(first.text, "v1");
        lexer.unget(first);
        assert_eq!(lexer.next_token().unwrap().unwrap().text, "v1");
        assert_eq!(lexer.next_token().unwrap().unwrap().text, "v2");
        assert_eq!(lexer.next_token().unwrap().unwrap().text, "v3");
    }

    #[test]
    fn test_illegal_repeaters() {
        for bad in ["x[", "x[a]", "x[1:b]", "[3]", "x[2]y", "x[1:2]y[3]", "x[]"] {
            let mut lexer = Lexer::new(bad, "bad");
            assert!(
                matches!(
                    lexer.next_token(),
                    Err(GatesimError::IllegalRepeater { .. })
                ),
                "{} should be rejected",
                bad
            );
        }
    }
}
