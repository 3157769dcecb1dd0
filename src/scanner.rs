use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};

use crate::error::ErrorReporter;
use crate::token::{Token, Type};
use crate::value::Value;

pub struct Scanner<'a> {
    source: PeekMoreIterator<Chars<'a>>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner.
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source: source.chars().peekmore(),
            tokens: vec![],
            start: 0,
            current: 0,
            line: 1,
        }
    }

    /// Scans the source code and returns a vector of tokens.
    pub fn scan_tokens(&mut self, reporter: &mut ErrorReporter) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token(reporter);
        }

        self.tokens.push(Token::new(Type::EOF, String::new(), None, self.line));

        self.tokens.clone()
    }

    /// Returns the next character.
    fn advance(&mut self) -> char {
        match self.source.next() {
            Some(char) => {
                self.current += 1;
                char
            }
            None => panic!("tried to advance past end of the file."),
        }
    }

    /// Returns the next character without consuming it.
    fn peek(&mut self) -> &char {
        match self.source.peek() {
            Some(char) => char,
            None => panic!("tried to peek past end of the file."),
        }
    }

    /// Returns the next next character without consuming it.
    fn peek_next(&mut self) -> &char {
        match self.source.peek_next() {
            Some(char) => char,
            None => panic!("tried to peek next past end of the file."),
        }
    }

    /// Returns if the next character is the expected character.
    fn match_next(&mut self, expected: char) -> bool {
        match self.source.peek_next() {
            Some(char) if *char == expected => true,
            Some(_) => false,
            None => false,
        }
    }

    /// Adds a new token to the list of tokens.
    fn add_token(&mut self, r#type: Type, lexeme: String, literal: Option<Value>) {
        self.tokens.push(Token::new(r#type, lexeme, literal, self.line));
    }

    /// Adds a new single char token to the list of tokens.
    fn add_single_char_token(&mut self, r#type: Type) {
        let c = self.advance();
        self.add_token(r#type, c.to_string(), None);
    }

    /// Adds a new double char token to the list of tokens.
    fn add_double_char_token(&mut self, r#type: Type) {
        let first = self.advance();
        let second = self.advance();

        self.add_token(r#type, format!("{first}{second}"), None);
    }

    /// Returns if the scanner has reached the end of the file.
    fn is_at_end(&mut self) -> bool {
        self.source.peek().is_none()
    }

    /// Handles a string literal.
    fn string(&mut self, reporter: &mut ErrorReporter) {
        self.advance(); // Move past the starting double quotes.
        let start_line = self.line;

        let mut value = Vec::new();
        while !self.is_at_end() {
            match self.source.next_if(|&x| x != '"') {
                Some(c) => {
                    self.current += 1;
                    value.push(c);

                    if c == '\n' {
                        self.line += 1;
                    }
                }
                None => break,
            }
        }

        if self.is_at_end() {
            reporter.scan_error(start_line, "Unterminated string");
            return;
        }

        self.advance(); // Move to the closing double quotes.

        let value: String = value.into_iter().collect();

        // Literal does not include the double quotes unlike the lexeme.
        self.add_token(Type::String, value.clone(), Some(Value::String(value)));
    }

    /// Handles a non-nesting block comment, having already confirmed the opening `/*`.
    /// A newline inside the comment still advances the line counter; running off the end
    /// of the source before the closing `*/` is reported at the comment's starting line.
    fn block_comment(&mut self, reporter: &mut ErrorReporter) {
        self.advance(); // '/'
        self.advance(); // '*'
        let start_line = self.line;

        loop {
            if self.is_at_end() {
                reporter.scan_error(start_line, "Unterminated comment block");
                return;
            }

            if *self.peek() == '*' && self.match_next('/') {
                self.advance(); // '*'
                self.advance(); // '/'
                return;
            }

            if *self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }
    }

    /// Handles a number literal.
    fn number(&mut self, reporter: &mut ErrorReporter) {
        let mut value = Vec::new();

        while self.peek().is_ascii_digit() {
            value.push(self.advance());
        }

        if *self.peek() == '.' {
            if self.peek_next().is_ascii_digit() {
                value.push(self.advance()); // Consume the dot.

                while self.peek().is_ascii_digit() {
                    value.push(self.advance());
                }
            } else {
                reporter.scan_error(self.line, "Unterminated number");
                return;
            }
        }

        let value: String = value.into_iter().collect();
        let value_num: f64 = value.parse().unwrap();

        self.add_token(Type::Number, value, Some(Value::Number(value_num)));
    }

    /// Handles an identifier or a keyword.
    fn identifier(&mut self) {
        let mut value = Vec::new();

        // is_alphanumeric does not include underscores.
        while matches!(self.peek(), c if c.is_alphanumeric() || *c == '_') {
            value.push(self.advance());
        }

        let value = String::from_iter(value);
        let token_type = match value.as_str() {
            "and" => Type::And,
            "break" => Type::Break,
            "class" => Type::Class,
            "else" => Type::Else,
            "false" => Type::False,
            "for" => Type::For,
            "fun" => Type::Fun,
            "if" => Type::If,
            "nil" => Type::Nil,
            "or" => Type::Or,
            "print" => Type::Print,
            "return" => Type::Return,
            "super" => Type::Super,
            "this" => Type::This,
            "true" => Type::True,
            "var" => Type::Var,
            "while" => Type::While,
            _ => Type::Identifier,
        };

        self.add_token(token_type, value, None);
    }

    /// Scans the next token.
    fn scan_token(&mut self, reporter: &mut ErrorReporter) {
        let c = *self.peek();
        match c {
            // One character tokens
            '(' => self.add_single_char_token(Type::LeftParen),
            ')' => self.add_single_char_token(Type::RightParen),
            '{' => self.add_single_char_token(Type::LeftBrace),
            '}' => self.add_single_char_token(Type::RightBrace),
            ',' => self.add_single_char_token(Type::Comma),
            '.' => self.add_single_char_token(Type::Dot),
            '-' => self.add_single_char_token(Type::Minus),
            '+' => self.add_single_char_token(Type::Plus),
            ':' => self.add_single_char_token(Type::Colon),
            ';' => self.add_single_char_token(Type::Semicolon),
            '*' => self.add_single_char_token(Type::Star),
            '?' => self.add_single_char_token(Type::Question),

            // Two character tokens
            '!' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::BangEqual);
                } else {
                    self.add_single_char_token(Type::Bang)
                };
            }
            '=' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::EqualEqual);
                } else {
                    self.add_single_char_token(Type::Equal)
                };
            }
            '<' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::LessEqual);
                } else {
                    self.add_single_char_token(Type::Less)
                };
            }
            '>' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::GreaterEqual);
                } else {
                    self.add_single_char_token(Type::Greater)
                };
            }
            '/' => {
                if self.match_next('/') {
                    while *self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else if self.match_next('*') {
                    self.block_comment(reporter);
                } else {
                    self.add_single_char_token(Type::Slash);
                }
            }

            // Ignore whitespace
            ' ' | '\r' | '\t' => {
                self.advance();
            }

            // Update line counter
            '\n' => {
                self.advance();
                self.line += 1;
            }

            // String
            '"' => self.string(reporter),

            // Numbers
            c if c.is_ascii_digit() => self.number(reporter),

            // Identifiers
            c if c.is_alphabetic() || c == '_' => self.identifier(),

            _ => {
                self.advance();
                reporter.scan_error(self.line, &format!("Unexpected character '{c}'"));
            }
        }
    }
}
