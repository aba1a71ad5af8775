//! S-expression reader for KiCad footprint files.
//!
//! Grammar:
//!   node   = '(' node* ')' | atom
//!   atom   = string | symbol
//!   string = '"' ( '\' any | [^"\\] )* '"'
//!   symbol = [^ \t\n\r()"]+

use crate::error::ConvertError;
use crate::types::Point;

#[derive(Debug, Clone, PartialEq)]
pub enum Sexp {
    List(Vec<Sexp>),
    Atom(String),
}

impl Sexp {
    /// Keyword at the head of a list, e.g. `pad` in `(pad "1" smd rect ...)`.
    pub fn head(&self) -> Option<&str> {
        match self {
            Sexp::List(items) => items.first().and_then(Sexp::as_atom),
            Sexp::Atom(_) => None,
        }
    }

    /// Everything after the head.
    pub fn args(&self) -> &[Sexp] {
        match self {
            Sexp::List(items) if !items.is_empty() => &items[1..],
            _ => &[],
        }
    }

    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Sexp::Atom(s) => Some(s.as_str()),
            Sexp::List(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_atom().and_then(|s| s.parse().ok())
    }

    /// First child list headed by `tag`.
    pub fn child(&self, tag: &str) -> Option<&Sexp> {
        self.args().iter().find(|c| c.head() == Some(tag))
    }

    pub fn children_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Sexp> + 'a {
        self.args().iter().filter(move |c| c.head() == Some(tag))
    }

    pub fn atom(&self, index: usize) -> Option<&str> {
        self.args().get(index).and_then(Sexp::as_atom)
    }

    pub fn number(&self, index: usize) -> Option<f64> {
        self.args().get(index).and_then(Sexp::as_f64)
    }

    /// Bare atoms among the args, skipping nested lists.
    pub fn atoms(&self) -> impl Iterator<Item = &str> {
        self.args().iter().filter_map(Sexp::as_atom)
    }

    /// First atom of the child headed by `tag`, as in `(layer "F.SilkS")`.
    pub fn value(&self, tag: &str) -> Option<&str> {
        self.child(tag).and_then(|c| c.atom(0))
    }

    pub fn value_f64(&self, tag: &str) -> Option<f64> {
        self.child(tag).and_then(|c| c.number(0))
    }

    /// `(tag x y)` as a point.
    pub fn point(&self, tag: &str) -> Option<Point> {
        let node = self.child(tag)?;
        Some(Point::new(node.number(0)?, node.number(1)?))
    }
}

struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    fn error(&self, msg: &str) -> ConvertError {
        ConvertError::ParseError(format!("{msg} at byte {}", self.pos))
    }

    fn read_node(&mut self) -> Result<Sexp, ConvertError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some(b'(') => self.read_list(),
            Some(b')') => Err(self.error("unexpected ')'")),
            Some(b'"') => self.read_string().map(Sexp::Atom),
            Some(_) => Ok(Sexp::Atom(self.read_symbol())),
        }
    }

    fn read_list(&mut self) -> Result<Sexp, ConvertError> {
        let open = self.pos;
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b')') => {
                    self.pos += 1;
                    return Ok(Sexp::List(items));
                }
                None => {
                    return Err(ConvertError::ParseError(format!(
                        "unclosed '(' opened at byte {open}"
                    )))
                }
                Some(_) => items.push(self.read_node()?),
            }
        }
    }

    fn read_string(&mut self) -> Result<String, ConvertError> {
        let open = self.pos;
        self.pos += 1;
        let mut bytes = Vec::new();
        while let Some(b) = self.peek() {
            self.pos += 1;
            match b {
                b'"' => return Ok(String::from_utf8_lossy(&bytes).into_owned()),
                b'\\' => {
                    let escaped = self.peek().ok_or_else(|| self.error("dangling escape"))?;
                    self.pos += 1;
                    bytes.push(match escaped {
                        b'n' => b'\n',
                        b't' => b'\t',
                        other => other,
                    });
                }
                other => bytes.push(other),
            }
        }
        Err(ConvertError::ParseError(format!(
            "unterminated string starting at byte {open}"
        )))
    }

    fn read_symbol(&mut self) -> String {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'(' | b')' | b'"') {
                break;
            }
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }
}

/// Parse the first S-expression in `input`. Trailing content is ignored.
pub fn parse(input: &[u8]) -> Result<Sexp, ConvertError> {
    let mut reader = Reader::new(input);
    reader.skip_whitespace();
    if reader.peek().is_none() {
        return Err(ConvertError::ParseError("empty input".to_string()));
    }
    reader.read_node()
}
