// Lepton Reader - S-Expression Parser
//
// Character-level reader producing heap values through the arena. Reader
// macros are normalized here: 'x -> (quote x), `x -> (quasiquote x),
// ,x -> (unquote x). Errors carry the character position so `load` can
// surface it unmodified.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::arena::Arena;
use crate::types::ExprId;

#[derive(Debug, Clone, PartialEq)]
pub enum ReadErrorKind {
    UnexpectedEof,
    UnexpectedChar(char),
    UnbalancedParen,
    UnclosedString,
    InvalidEscape(char),
}

impl std::fmt::Display for ReadErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "Unexpected end of input"),
            Self::UnexpectedChar(c) => write!(f, "Unexpected character: '{}'", c),
            Self::UnbalancedParen => write!(f, "Unbalanced parentheses"),
            Self::UnclosedString => write!(f, "Unclosed string"),
            Self::InvalidEscape(c) => write!(f, "Invalid escaped character: '{}'", c),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadError {
    pub kind: ReadErrorKind,
    pub pos: usize,
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.kind, self.pos)
    }
}

pub type ReadResult = Result<ExprId, ReadError>;

/// The Lepton Reader
pub struct Reader<'a, 'b> {
    input: Peekable<CharIndices<'a>>,
    len: usize,
    consumed: usize,
    arena: &'b mut Arena,
}

impl<'a, 'b> Reader<'a, 'b> {
    pub fn new(input: &'a str, arena: &'b mut Arena) -> Self {
        Self {
            input: input.char_indices().peekable(),
            len: input.len(),
            consumed: 0,
            arena,
        }
    }

    /// Read the next expression, or `None` at end of input.
    pub fn read(&mut self) -> Option<ReadResult> {
        self.skip_whitespace();
        self.peek()?;
        Some(self.read_expr())
    }

    /// Byte offset just past the last consumed character. The driver uses
    /// this to resume reading after evaluating a form.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    fn peek(&mut self) -> Option<(usize, char)> {
        self.input.peek().copied()
    }

    fn next_char(&mut self) -> Option<(usize, char)> {
        let next = self.input.next();
        if let Some((idx, c)) = next {
            self.consumed = idx + c.len_utf8();
        }
        next
    }

    fn advance(&mut self) {
        let _ = self.next_char();
    }

    fn pos(&mut self) -> usize {
        let len = self.len;
        self.peek().map(|(idx, _)| idx).unwrap_or(len)
    }

    fn skip_whitespace(&mut self) {
        while let Some((_, c)) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else if c == ';' {
                while let Some((_, c)) = self.next_char() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn read_expr(&mut self) -> ReadResult {
        self.skip_whitespace();

        let (pos, c) = match self.peek() {
            Some(pc) => pc,
            None => {
                return Err(ReadError {
                    kind: ReadErrorKind::UnexpectedEof,
                    pos: self.len,
                })
            }
        };

        match c {
            '(' => {
                self.advance();
                self.read_list()
            }
            ')' => Err(ReadError {
                kind: ReadErrorKind::UnexpectedChar(')'),
                pos,
            }),
            '\'' => {
                self.advance();
                self.read_wrapped("quote")
            }
            '`' => {
                self.advance();
                self.read_wrapped("quasiquote")
            }
            ',' => {
                self.advance();
                self.read_wrapped("unquote")
            }
            '"' => self.read_string(),
            _ => self.read_atom(),
        }
    }

    /// `'x` and friends expand into a two-element list `(tag x)`.
    fn read_wrapped(&mut self, tag: &str) -> ReadResult {
        let inner = self.read_expr()?;
        let sym = self.arena.alloc_symbol(tag);
        let nil = self.arena.nil();
        let tail = self.arena.alloc_cons(inner, nil);
        Ok(self.arena.alloc_cons(sym, tail))
    }

    fn read_list(&mut self) -> ReadResult {
        let mut elements = Vec::new();
        let mut dotted_cdr = None;

        loop {
            self.skip_whitespace();

            let (pos, c) = match self.peek() {
                Some(pc) => pc,
                None => {
                    return Err(ReadError {
                        kind: ReadErrorKind::UnbalancedParen,
                        pos: self.len,
                    })
                }
            };

            if c == ')' {
                self.advance();
                break;
            }

            if c == '.' && self.dot_is_delimited() && !elements.is_empty() {
                self.advance();
                dotted_cdr = Some(self.read_expr()?);
                self.skip_whitespace();
                match self.peek() {
                    Some((_, ')')) => self.advance(),
                    _ => {
                        return Err(ReadError {
                            kind: ReadErrorKind::UnbalancedParen,
                            pos,
                        })
                    }
                }
                break;
            }

            elements.push(self.read_expr()?);
        }

        let mut result = match dotted_cdr {
            Some(tail) => tail,
            None => self.arena.nil(),
        };
        for &element in elements.iter().rev() {
            result = self.arena.alloc_cons(element, result);
        }
        Ok(result)
    }

    /// A `.` only splits a dotted pair when followed by a delimiter;
    /// otherwise it belongs to a token such as `.5`.
    fn dot_is_delimited(&self) -> bool {
        let mut lookahead = self.input.clone();
        lookahead.next();
        match lookahead.next() {
            None => true,
            Some((_, c)) => c.is_whitespace() || matches!(c, '(' | ')' | '"' | ';'),
        }
    }

    fn read_string(&mut self) -> ReadResult {
        let start = self.pos();
        self.advance();

        let mut str = String::new();
        loop {
            match self.next_char() {
                None => {
                    return Err(ReadError {
                        kind: ReadErrorKind::UnclosedString,
                        pos: start,
                    })
                }
                Some((_, '"')) => break,
                Some((_, '\\')) => match self.next_char() {
                    Some((_, 'n')) => str.push('\n'),
                    Some((_, 'r')) => str.push('\r'),
                    Some((_, 't')) => str.push('\t'),
                    Some((_, '\\')) => str.push('\\'),
                    Some((_, '"')) => str.push('"'),
                    Some((pos, c)) => {
                        return Err(ReadError {
                            kind: ReadErrorKind::InvalidEscape(c),
                            pos,
                        })
                    }
                    None => {
                        return Err(ReadError {
                            kind: ReadErrorKind::UnclosedString,
                            pos: start,
                        })
                    }
                },
                Some((_, c)) => str.push(c),
            }
        }

        Ok(self.arena.alloc_string(&str))
    }

    fn read_atom(&mut self) -> ReadResult {
        let mut token = String::new();
        while let Some((_, c)) = self.peek() {
            if c.is_whitespace() || matches!(c, '(' | ')' | '"' | ';' | '\'' | '`' | ',') {
                break;
            }
            token.push(c);
            self.advance();
        }
        Ok(self.classify_token(&token))
    }

    /// Numeric-looking tokens try integer first, then real; everything
    /// else (including failed numeric parses) is a symbol.
    fn classify_token(&mut self, token: &str) -> ExprId {
        if looks_numeric(token) {
            if let Ok(num) = token.parse::<i64>() {
                return self.arena.alloc_integer(num);
            }
            if let Ok(real) = token.parse::<f32>() {
                return self.arena.alloc_real(real);
            }
        }
        self.arena.alloc_symbol(token)
    }
}

/// A token may be numeric iff it starts with a digit, or with a sign or
/// dot directly followed by a digit. Keeps `inf`, `nan`, `+` and `-`
/// symbols out of the float parser.
fn looks_numeric(token: &str) -> bool {
    let bytes = token.as_bytes();
    match bytes.first() {
        Some(b'0'..=b'9') => true,
        Some(b'+' | b'-') => {
            matches!(bytes.get(1), Some(b'0'..=b'9'))
                || (bytes.get(1) == Some(&b'.') && matches!(bytes.get(2), Some(b'0'..=b'9')))
        }
        Some(b'.') => matches!(bytes.get(1), Some(b'0'..=b'9')),
        _ => false,
    }
}

/// Read exactly one expression from `source`.
pub fn read_one(arena: &mut Arena, source: &str) -> ReadResult {
    let mut reader = Reader::new(source, arena);
    match reader.read() {
        Some(result) => result,
        None => Err(ReadError {
            kind: ReadErrorKind::UnexpectedEof,
            pos: source.len(),
        }),
    }
}

/// Read every expression from `source` and return them as a proper list
/// (nil when the source holds no forms).
pub fn read_all(arena: &mut Arena, source: &str) -> ReadResult {
    let mut forms = Vec::new();
    {
        let mut reader = Reader::new(source, arena);
        while let Some(result) = reader.read() {
            forms.push(result?);
        }
    }
    Ok(arena.list(&forms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::print_to_string;

    fn read_str(arena: &mut Arena, source: &str) -> String {
        let id = read_one(arena, source).expect("read should succeed");
        print_to_string(arena, id)
    }

    #[test]
    fn reads_atoms() {
        let mut arena = Arena::new();
        assert_eq!(read_str(&mut arena, "42"), "42");
        assert_eq!(read_str(&mut arena, "-7"), "-7");
        assert_eq!(read_str(&mut arena, "2.5"), "2.5");
        assert_eq!(read_str(&mut arena, ".5"), "0.5");
        assert_eq!(read_str(&mut arena, "foo"), "foo");
        assert_eq!(read_str(&mut arena, "+"), "+");
        assert_eq!(read_str(&mut arena, "inf"), "inf");
        assert_eq!(read_str(&mut arena, "\"hi\\n\\\"there\\\"\""), "\"hi\n\"there\"\"");
    }

    #[test]
    fn reads_lists_and_dotted_pairs() {
        let mut arena = Arena::new();
        assert_eq!(read_str(&mut arena, "(1 2 3)"), "(1 2 3)");
        assert_eq!(read_str(&mut arena, "()"), "nil");
        assert_eq!(read_str(&mut arena, "(1 . 2)"), "(1 . 2)");
        assert_eq!(read_str(&mut arena, "(a (b c) d)"), "(a (b c) d)");
        assert_eq!(read_str(&mut arena, "(.5 . .25)"), "(0.5 . 0.25)");
    }

    #[test]
    fn normalizes_reader_macros() {
        let mut arena = Arena::new();
        assert_eq!(read_str(&mut arena, "'x"), "(quote x)");
        assert_eq!(read_str(&mut arena, "'(1 2)"), "(quote (1 2))");
        assert_eq!(read_str(&mut arena, "`(a ,b)"), "(quasiquote (a (unquote b)))");
    }

    #[test]
    fn skips_comments() {
        let mut arena = Arena::new();
        assert_eq!(read_str(&mut arena, "; a comment\n  42"), "42");
    }

    #[test]
    fn reads_several_forms() {
        let mut arena = Arena::new();
        let forms = read_all(&mut arena, "1 (2 3) x").expect("read should succeed");
        assert_eq!(print_to_string(&arena, forms), "(1 (2 3) x)");

        let empty = read_all(&mut arena, "  ; nothing\n").expect("read should succeed");
        assert_eq!(print_to_string(&arena, empty), "nil");
    }

    #[test]
    fn reports_positions() {
        let mut arena = Arena::new();
        let err = read_one(&mut arena, "\"abc").unwrap_err();
        assert_eq!(err.kind, ReadErrorKind::UnclosedString);
        assert_eq!(err.pos, 0);

        let err = read_one(&mut arena, "\"a\\x\"").unwrap_err();
        assert_eq!(err.kind, ReadErrorKind::InvalidEscape('x'));
        assert_eq!(err.pos, 3);

        let err = read_one(&mut arena, "(1 2").unwrap_err();
        assert_eq!(err.kind, ReadErrorKind::UnbalancedParen);
        assert_eq!(err.pos, 4);

        let err = read_one(&mut arena, ")").unwrap_err();
        assert_eq!(err.kind, ReadErrorKind::UnexpectedChar(')'));
        assert_eq!(err.pos, 0);
    }
}
