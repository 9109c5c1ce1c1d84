//! Tokenizer for arithmetic expressions.
//!
//! The lexer is a four-state machine (`Idle`, `Number`, `Symbol`,
//! `Brace`). Each step looks at the byte under the cursor, does its work
//! and names the next state. Identifiers are resolved against the
//! [`Registry`] as they are produced, so the token stream already
//! distinguishes functions, constants and variables.

use log::{debug, trace};

use crate::error::{CalcError, Result};
use crate::registry::{Registry, Resolved};
use crate::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Number,
    Symbol,
    Brace,
}

/// Character classes that drive state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Alphabetic,
    Punctuation,
    Digit,
    Brace,
    Invalid,
}

fn classify(ch: u8) -> CharClass {
    match ch {
        b'a'..=b'z' | b'A'..=b'Z' => CharClass::Alphabetic,
        b'0'..=b'9' => CharClass::Digit,
        b'(' | b')' | b'[' | b']' | b'{' | b'}' => CharClass::Brace,
        _ if ch.is_ascii_punctuation() => CharClass::Punctuation,
        _ => CharClass::Invalid,
    }
}

/// Bracket kinds; closers must match the most recent opener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BraceKind {
    Round,
    Square,
    Curly,
}

impl BraceKind {
    fn open_char(self) -> char {
        match self {
            BraceKind::Round => '(',
            BraceKind::Square => '[',
            BraceKind::Curly => '{',
        }
    }
}

/// Lex an expression into tokens.
///
/// Fails with a lexical error on malformed input and with a structural
/// error when brackets do not pair up.
pub fn tokenize(source: &str, registry: &Registry) -> Result<Vec<Token>> {
    let lexer = Lexer {
        source,
        bytes: source.as_bytes(),
        index: 0,
        registry,
        tokens: Vec::new(),
        braces: Vec::new(),
    };
    let tokens = lexer.run()?;
    debug!("lexed {} tokens from {:?}", tokens.len(), source);
    Ok(tokens)
}

struct Lexer<'src> {
    source: &'src str,
    bytes: &'src [u8],
    index: usize,
    registry: &'src Registry,
    tokens: Vec<Token>,
    braces: Vec<(BraceKind, usize)>,
}

impl<'src> Lexer<'src> {
    fn run(mut self) -> Result<Vec<Token>> {
        let mut state = State::Idle;

        while self.index < self.bytes.len() {
            state = match state {
                State::Idle => self.idle(),
                State::Number => self.number()?,
                State::Symbol => self.symbol()?,
                State::Brace => self.brace()?,
            };
        }

        if let Some(&(kind, position)) = self.braces.last() {
            return Err(CalcError::Structural(format!(
                "unbalanced braces: '{}' at byte {position} is never closed",
                kind.open_char()
            )));
        }

        Ok(self.tokens)
    }

    fn idle(&mut self) -> State {
        let ch = self.bytes[self.index];
        if ch.is_ascii_whitespace() {
            self.index += 1;
            return State::Idle;
        }
        match classify(ch) {
            CharClass::Digit => State::Number,
            _ if matches!(ch, b'.' | b'+' | b'-') => State::Number,
            CharClass::Brace => State::Brace,
            _ => State::Symbol,
        }
    }

    fn number(&mut self) -> Result<State> {
        let start = self.index;
        let mut end = start;
        let signed = matches!(self.bytes[end], b'+' | b'-');
        if signed {
            end += 1;
        }

        let mut dot_found = false;
        let mut digits = 0usize;
        while let Some(&ch) = self.bytes.get(end) {
            match ch {
                b'0'..=b'9' => {
                    digits += 1;
                    end += 1;
                }
                b'.' if dot_found => {
                    return Err(CalcError::lexical(end, "double dot detected in number"));
                }
                b'.' => {
                    dot_found = true;
                    end += 1;
                }
                _ => break,
            }
        }
        if digits > 0 {
            end = self.exponent_end(end);
        }

        let body_len = end - start - usize::from(signed);
        if (signed && body_len == 0) || !self.literal_allowed() {
            // Not a literal here: re-lex as an operator or report it there.
            return Ok(State::Symbol);
        }

        let text = &self.source[start..end];
        let value = text
            .parse::<f64>()
            .map_err(|_| CalcError::lexical(start, format!("'{text}' is not a number")))?;
        self.index = end;
        self.push(Token::Constant(value));
        Ok(State::Idle)
    }

    /// Extends a mantissa ending at `end` over an `e`/`E` exponent, if one
    /// with at least one digit follows.
    fn exponent_end(&self, end: usize) -> usize {
        if !matches!(self.bytes.get(end), Some(b'e' | b'E')) {
            return end;
        }
        let mut digits = end + 1;
        if matches!(self.bytes.get(digits), Some(b'+' | b'-')) {
            digits += 1;
        }
        if !matches!(self.bytes.get(digits), Some(b'0'..=b'9')) {
            return end;
        }
        while matches!(self.bytes.get(digits), Some(b'0'..=b'9')) {
            digits += 1;
        }
        digits
    }

    /// A literal may start the expression or follow `(`, `,` or a function.
    fn literal_allowed(&self) -> bool {
        matches!(
            self.tokens.last(),
            None | Some(Token::BraceOpen | Token::Function(_) | Token::Separator)
        )
    }

    fn symbol(&mut self) -> Result<State> {
        let start = self.index;
        let ch = self.bytes[start];

        match classify(ch) {
            CharClass::Invalid => Err(CalcError::lexical(
                start,
                format!("unexpected character {:?}", self.char_at(start)),
            )),
            CharClass::Digit => Err(CalcError::lexical(
                start,
                "unexpected number: names cannot start with a digit and literals must follow an operator, '(' or ','",
            )),
            CharClass::Punctuation if ch == b',' => {
                self.index += 1;
                self.push(Token::Separator);
                Ok(State::Idle)
            }
            CharClass::Punctuation => self.operator(start),
            CharClass::Alphabetic => {
                let mut end = start + 1;
                while self
                    .bytes
                    .get(end)
                    .is_some_and(|&c| c.is_ascii_alphanumeric() || c == b'_')
                {
                    end += 1;
                }
                self.index = end;
                let name = &self.source[start..end];
                let token = match self.registry.resolve(name) {
                    Resolved::Function(function) => Token::Function(function),
                    Resolved::Constant(value) => Token::Constant(value),
                    Resolved::Variable => Token::variable(name),
                };
                self.push(token);
                Ok(State::Idle)
            }
            CharClass::Brace => Err(CalcError::lexical(start, "internal error: empty symbol")),
        }
    }

    /// Matches the longest registered operator at the start of a
    /// punctuation run. The remainder of the run is lexed afresh.
    fn operator(&mut self, start: usize) -> Result<State> {
        let mut run_end = start;
        while self
            .bytes
            .get(run_end)
            .is_some_and(|&c| c != b',' && classify(c) == CharClass::Punctuation)
        {
            run_end += 1;
        }

        for end in (start + 1..=run_end).rev() {
            if let Some(function) = self.registry.function(&self.source[start..end]) {
                let token = Token::Function(function.clone());
                self.index = end;
                self.push(token);
                return Ok(State::Idle);
            }
        }

        Err(CalcError::lexical(
            start,
            format!("unknown operator '{}'", &self.source[start..run_end]),
        ))
    }

    fn brace(&mut self) -> Result<State> {
        let position = self.index;
        let ch = self.bytes[position];
        let (kind, opening) = match ch {
            b'(' => (BraceKind::Round, true),
            b'[' => (BraceKind::Square, true),
            b'{' => (BraceKind::Curly, true),
            b')' => (BraceKind::Round, false),
            b']' => (BraceKind::Square, false),
            b'}' => (BraceKind::Curly, false),
            _ => {
                return Err(CalcError::lexical(
                    position,
                    format!("unknown brace {:?} found", self.char_at(position)),
                ));
            }
        };
        self.index += 1;

        if opening {
            self.braces.push((kind, position));
            self.push(Token::BraceOpen);
            return Ok(State::Idle);
        }

        match self.braces.pop() {
            Some((open, _)) if open == kind => {
                self.push(Token::BraceClosed);
                Ok(State::Idle)
            }
            Some((open, open_position)) => Err(CalcError::Structural(format!(
                "mismatched braces: '{}' at byte {open_position} closed by '{}' at byte {position}",
                open.open_char(),
                ch as char
            ))),
            None => Err(CalcError::Structural(format!(
                "unbalanced braces: '{}' at byte {position} has no opening brace",
                ch as char
            ))),
        }
    }

    fn push(&mut self, token: Token) {
        trace!("token {token:?}");
        self.tokens.push(token);
    }

    fn char_at(&self, index: usize) -> char {
        self.source[index..].chars().next().unwrap_or('\u{fffd}')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        builtins::install(&mut registry);
        registry
    }

    /// Renders tokens with their kind so sequences compare readably.
    fn lex(source: &str) -> Vec<String> {
        tokenize(source, &registry())
            .expect("lex should succeed")
            .iter()
            .map(|token| match token {
                Token::Constant(v) => format!("num {v}"),
                Token::Variable(name) => format!("var {name}"),
                Token::Function(f) => format!("fn {}", f.name()),
                Token::BraceOpen => "(".to_string(),
                Token::BraceClosed => ")".to_string(),
                Token::Separator => ",".to_string(),
            })
            .collect()
    }

    fn lex_err(source: &str) -> CalcError {
        tokenize(source, &registry()).expect_err("lex should fail")
    }

    #[test]
    fn binary_minus_after_value() {
        assert_eq!(lex("2-1"), vec!["num 2", "fn -", "num 1"]);
        assert_eq!(lex("2- 1"), vec!["num 2", "fn -", "num 1"]);
    }

    #[test]
    fn signed_literal_after_open_brace_or_operator() {
        assert_eq!(lex("(-1)"), vec!["(", "num -1", ")"]);
        assert_eq!(lex("-21 - -2"), vec!["num -21", "fn -", "num -2"]);
        assert_eq!(lex("12 + +2"), vec!["num 12", "fn +", "num 2"]);
        assert_eq!(lex("2*-3"), vec!["num 2", "fn *", "num -3"]);
    }

    #[test]
    fn lone_sign_is_an_operator() {
        assert_eq!(lex("- x"), vec!["fn -", "var x"]);
    }

    #[test]
    fn resolves_functions_constants_and_variables() {
        let pi = format!("num {}", std::f64::consts::PI);
        assert_eq!(
            lex("sin(pi) + x_1"),
            vec!["fn sin", "(", pi.as_str(), ")", "fn +", "var x_1"]
        );
    }

    #[test]
    fn separators_and_square_braces() {
        assert_eq!(
            lex("atan2[0.5, .2]"),
            vec!["fn atan2", "(", "num 0.5", ",", "num 0.2", ")"]
        );
    }

    #[test]
    fn longest_operator_wins() {
        assert_eq!(lex("x<=2"), vec!["var x", "fn <=", "num 2"]);
        assert_eq!(lex("x<2"), vec!["var x", "fn <", "num 2"]);
        assert_eq!(lex("5!"), vec!["num 5", "fn !"]);
        assert_eq!(lex("5! + 1"), vec!["num 5", "fn !", "fn +", "num 1"]);
    }

    #[test]
    fn sign_after_any_function_starts_a_literal() {
        // `!` is a function token like any other, so `+1` is read as a literal.
        assert_eq!(lex("5!+1"), vec!["num 5", "fn !", "num 1"]);
    }

    #[test]
    fn scientific_notation() {
        assert_eq!(lex("1.5e-3"), vec!["num 0.0015"]);
        assert_eq!(lex("2E3*x"), vec!["num 2000", "fn *", "var x"]);
    }

    #[test]
    fn exponent_needs_a_mantissa() {
        assert_eq!(
            lex("max(1, -e5)"),
            vec!["fn max", "(", "num 1", ",", "fn -", "var e5", ")"]
        );
        assert_eq!(lex_err(".e5").kind(), ErrorKind::Lexical);
    }

    #[test]
    fn adjacent_literals_are_lexical_errors() {
        assert_eq!(lex_err("22 33 + 2").kind(), ErrorKind::Lexical);
        assert_eq!(lex_err("x 2").kind(), ErrorKind::Lexical);
    }

    #[test]
    fn rejects_double_dot() {
        let err = lex_err("1.2.3");
        assert_eq!(err, CalcError::lexical(3, "double dot detected in number"));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(lex_err("2 + µ").kind(), ErrorKind::Lexical);
        assert_eq!(lex_err("2 $ 3").kind(), ErrorKind::Lexical);
        assert_eq!(lex_err("2 + .").kind(), ErrorKind::Lexical);
    }

    #[test]
    fn unbalanced_braces_are_structural() {
        assert_eq!(lex_err("12 + 2 - (22 + 2").kind(), ErrorKind::Structural);
        assert_eq!(lex_err(")  + 12 * 22 * sin(12)").kind(), ErrorKind::Structural);
    }

    #[test]
    fn mismatched_brace_kinds_are_structural() {
        let err = lex_err("([1)]");
        assert_eq!(err.kind(), ErrorKind::Structural);
        assert!(err.to_string().contains("mismatched"));
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert!(lex("   ").is_empty());
    }
}
