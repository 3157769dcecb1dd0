use std::rc::Rc;

use crate::error::{ErrorReporter, ParseError};
use crate::expr::*;
use crate::stmt::*;
use crate::token::{Token, Type};
use crate::value::Value;

type ParseResult<T> = Result<T, ParseError>;

/// Returns if the next token is any of the given types, consuming it if so.
macro_rules! matches {
    ( $self:ident, $( $type:expr ),+ ) => {
        {
            if $( $self.check($type) ) ||* {
                $self.advance();
                true
            } else {
                false
            }
        }
    }
}

/// Parses a token stream into a statement list.
///
/// - Program     -> Declaration* EOF ;
/// - Block       -> "{" Declaration* "}" ;
/// - Declaration -> ClassDecl | FunDecl | VarDecl | Statement ;
/// - ClassDecl   -> "class" IDENTIFIER ( "<" IDENTIFIER )? "{" ClassMember* "}" ;
/// - ClassMember -> "class"? IDENTIFIER ( "(" Parameters? ")" )? Block ;
/// - FunDecl     -> "fun" Function ;
/// - VarDecl     -> "var" IDENTIFIER ( "=" Expression )? ";" ;
/// - Function    -> IDENTIFIER "(" Parameters? ")" Block ;
/// - Parameters  -> IDENTIFIER ( "," IDENTIFIER )* ;
/// - Statement   -> ExprStmt | ForStmt | IfStmt | PrintStmt | ReturnStmt | BreakStmt
///                  | WhileStmt | Block ;
/// - ExprStmt    -> Expression ";" ;
/// - ForStmt     -> "for" "(" ( Declaration | ExprStmt | ";" ) Expression? ";" Expression? ")" Statement ;
/// - IfStmt      -> "if" "(" Expression ")" Statement ( "else" Statement )? ;
/// - PrintStmt   -> "print" Expression ";" ;
/// - ReturnStmt  -> "return" Expression? ";" ;
/// - BreakStmt   -> "break" ";" ;
/// - WhileStmt   -> "while" "(" Expression ")" Statement ;
/// - Expression  -> Comma ;
/// - Comma       -> Assignment ( "," Assignment )* ;
/// - Assignment  -> ( Call "." )? IDENTIFIER "=" Assignment | Ternary ;
/// - Ternary     -> LogicOr ( "?" Expression ":" Expression )? ;
/// - LogicOr     -> LogicAnd ( "or" LogicAnd )* ;
/// - LogicAnd    -> Equality ( "and" Equality )* ;
/// - Equality    -> Comparison ( ( "!=" | "==" ) Comparison )* ;
/// - Comparison  -> Term ( ( ">" | ">=" | "<" | "<=" ) Term )* ;
/// - Term        -> Factor ( ( "+" | "-" ) Factor )* ;
/// - Factor      -> Unary ( ( "*" | "/" ) Unary )* ;
/// - Unary       -> ( "!" | "-" ) Unary | Call ;
/// - Arguments   -> Assignment ( "," Assignment )* ;
/// - Call        -> Primary ( "(" Arguments? ")" | "." IDENTIFIER )* ;
/// - Primary     -> NUMBER | STRING | "false" | "true" | "nil" | "this" | Lambda
///                  | "(" Expression ")" | IDENTIFIER | "super" "." IDENTIFIER ;
/// - Lambda      -> "fun" "(" Parameters? ")" Block ;
///
/// Equality/Comparison/Factor/Comma additionally reject a leading operator token (e.g. a
/// bare `*5` or `,5`): the operator is consumed, one right-hand unit at the same level is
/// parsed and discarded, and a parse error is reported at the operator. Term is exempt,
/// since `-`/`+` also double as valid unary prefixes.
pub struct Parser<'r, 'e> {
    tokens: Vec<Token>,
    current: usize,
    next_id: NodeId,
    reporter: &'r mut ErrorReporter<'e>,
}

impl<'r, 'e> Parser<'r, 'e> {
    pub fn new(tokens: Vec<Token>, reporter: &'r mut ErrorReporter<'e>) -> Self {
        Parser { tokens, current: 0, next_id: 0, reporter }
    }

    /// Parses the full token stream and returns the resulting program.
    pub fn parse(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        statements
    }

    fn next_node_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Returns the next token without consuming it.
    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// Returns the previous token without consuming it.
    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    /// Returns if the parser has reached the end of the token stream.
    fn is_at_end(&self) -> bool {
        self.peek().r#type == Type::EOF
    }

    /// Returns if the next token is of the given type.
    fn check(&self, r#type: Type) -> bool {
        !self.is_at_end() && self.peek().r#type == r#type
    }

    /// Consumes the next token and returns it.
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    /// Consumes the next token if it is of the given type.
    fn consume(&mut self, r#type: Type, message: &str) -> ParseResult<&Token> {
        if self.check(r#type) {
            return Ok(self.advance());
        }

        Err(ParseError { token: self.previous().clone(), message: message.to_string() })
    }

    /// Parses a declaration.
    fn declaration(&mut self) -> Option<Stmt> {
        let statement = if matches!(self, Type::Class) {
            self.class_declaration()
        } else if matches!(self, Type::Fun) {
            self.function_declaration("function").map(Stmt::FunctionDecl)
        } else if matches!(self, Type::Var) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match statement {
            Ok(stmt) => Some(stmt),
            Err(error) => {
                self.reporter.token_error(&error.token, &error.message);
                self.synchronize();
                None
            }
        }
    }

    /// Parses a class declaration.
    fn class_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, "Expect class name.")?.clone();

        let superclass = if matches!(self, Type::Less) {
            self.consume(Type::Identifier, "Expect superclass name.")?;
            Some(VariableData { name: self.previous().clone(), id: self.next_node_id() })
        } else {
            None
        };

        self.consume(Type::LeftBrace, "Expect '{' before class body.")?;

        let mut methods = vec![];
        while !self.check(Type::RightBrace) && !self.is_at_end() {
            methods.push(self.class_member()?);
        }

        self.consume(Type::RightBrace, "Expect '}' after class body.")?;

        Ok(Stmt::ClassDecl(Rc::new(ClassData { name, superclass, methods })))
    }

    /// Parses one class body member: a static method (`class` prefix), a getter (no
    /// parameter list), or a regular method.
    fn class_member(&mut self) -> ParseResult<Rc<FunctionDeclData>> {
        let is_static = matches!(self, Type::Class);
        let name = self.consume(Type::Identifier, "Expect method name.")?.clone();

        if is_static || self.check(Type::LeftParen) {
            self.consume(Type::LeftParen, "Expect '(' after method name.")?;
            let params = self.parameters()?;
            self.consume(Type::RightParen, "Expect ')' after parameters.")?;
            self.consume(Type::LeftBrace, "Expect '{' before method body.")?;
            let body = Rc::new(self.block()?);
            let kind = if is_static { FunctionKind::StaticMethod } else { FunctionKind::Method };
            return Ok(Rc::new(FunctionDeclData { name, params, body, kind }));
        }

        self.consume(Type::LeftBrace, "Expect '{' before getter body.")?;
        let body = Rc::new(self.block()?);
        Ok(Rc::new(FunctionDeclData { name, params: vec![], body, kind: FunctionKind::Getter }))
    }

    /// Parses a named function declaration (not a method).
    fn function_declaration(&mut self, kind: &str) -> ParseResult<Rc<FunctionDeclData>> {
        let name = self.consume(Type::Identifier, &format!("Expect {kind} name."))?.clone();

        self.consume(Type::LeftParen, &format!("Expect '(' after {kind} name."))?;
        let params = self.parameters()?;
        self.consume(Type::RightParen, "Expect ')' after parameters.")?;

        self.consume(Type::LeftBrace, &format!("Expect '{{' before {kind} body."))?;
        let body = Rc::new(self.block()?);

        Ok(Rc::new(FunctionDeclData { name, params, body, kind: FunctionKind::Function }))
    }

    /// Parses a comma-separated parameter list, reporting (but not failing on) more than
    /// 255 parameters.
    fn parameters(&mut self) -> ParseResult<Vec<Token>> {
        let mut params = vec![];

        if !self.check(Type::RightParen) {
            loop {
                if params.len() >= 255 {
                    let token = self.peek().clone();
                    self.reporter.token_error(&token, "Cannot have more than 255 parameters.");
                }

                params.push(self.consume(Type::Identifier, "Expect parameter name.")?.clone());

                if !matches!(self, Type::Comma) {
                    break;
                }
            }
        }

        Ok(params)
    }

    /// Parses a variable declaration.
    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, "Expect variable name.")?.clone();

        let initializer = if matches!(self, Type::Equal) {
            Some(Box::new(self.expression()?))
        } else {
            None
        };

        self.consume(Type::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::VarDecl(VarDeclData { name, initializer }))
    }

    /// Parses a statement.
    fn statement(&mut self) -> ParseResult<Stmt> {
        if matches!(self, Type::For) {
            return self.for_statement();
        }

        if matches!(self, Type::If) {
            return self.if_statement();
        }

        if matches!(self, Type::Print) {
            return self.print_statement();
        }

        if matches!(self, Type::Return) {
            return self.return_statement();
        }

        if matches!(self, Type::Break) {
            return self.break_statement();
        }

        if matches!(self, Type::While) {
            return self.while_statement();
        }

        if matches!(self, Type::LeftBrace) {
            return Ok(Stmt::Block(self.block()?));
        }

        self.expression_statement()
    }

    /// Parses a for statement, desugared into an equivalent while loop.
    fn for_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if matches!(self, Type::Semicolon) {
            None
        } else if matches!(self, Type::Var) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if !self.check(Type::Semicolon) { Some(self.expression()?) } else { None };
        self.consume(Type::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if !self.check(Type::RightParen) { Some(self.expression()?) } else { None };
        self.consume(Type::RightParen, "Expect ')' after loop clauses.")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(Box::new(increment))]);
        }

        body = Stmt::While(WhileData {
            condition: Box::new(condition.unwrap_or(Expr::Literal(Value::Boolean(true)))),
            body: Box::new(body),
        });

        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        Ok(body)
    }

    /// Parses an if statement.
    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(Type::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if matches!(self, Type::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If(IfData { condition: Box::new(condition), then_branch, else_branch }))
    }

    /// Parses a while statement.
    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(Type::RightParen, "Expect ')' after condition.")?;
        let body = self.statement()?;

        Ok(Stmt::While(WhileData { condition: Box::new(condition), body: Box::new(body) }))
    }

    /// Parses a print statement.
    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(Type::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print(Box::new(expr)))
    }

    /// Parses a return statement.
    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();

        let value = if !self.check(Type::Semicolon) { Some(Box::new(self.expression()?)) } else { None };

        self.consume(Type::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::Return(ReturnData { keyword, value }))
    }

    /// Parses a break statement.
    fn break_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();
        self.consume(Type::Semicolon, "Expect ';' after 'break'.")?;
        Ok(Stmt::Break(keyword))
    }

    /// Parses an expression statement.
    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(Type::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression(Box::new(expr)))
    }

    /// Parses a block's contents, up to and including the closing brace.
    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(Type::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.consume(Type::RightBrace, "Expect '}' after block.")?;

        Ok(statements)
    }

    /// Parses an expression.
    fn expression(&mut self) -> ParseResult<Expr> {
        self.comma()
    }

    /// Parses a comma expression.
    fn comma(&mut self) -> ParseResult<Expr> {
        if self.check(Type::Comma) {
            let operator = self.advance().clone();
            let _ = self.assignment();
            return Err(ParseError {
                token: operator,
                message: "Binary operator appearing at the beginning of an expression.".to_string(),
            });
        }

        let mut expr = self.assignment()?;

        while matches!(self, Type::Comma) {
            let operator = self.previous().clone();
            let right = self.assignment()?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    /// Parses an assignment expression.
    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.ternary()?;

        if matches!(self, Type::Equal) {
            let equals = self.previous().clone();
            let value = self.assignment()?;

            return match expr {
                Expr::Variable(data) => Ok(Expr::Assign(AssignData {
                    name: data.name,
                    value: Box::new(value),
                    id: self.next_node_id(),
                })),
                Expr::Get(data) => Ok(Expr::Set(SetData {
                    object: data.object,
                    name: data.name,
                    value: Box::new(value),
                })),
                _ => {
                    self.reporter.token_error(&equals, "Invalid assignment target.");
                    Ok(value)
                }
            };
        }

        Ok(expr)
    }

    /// Parses a ternary conditional expression.
    fn ternary(&mut self) -> ParseResult<Expr> {
        let condition = self.or()?;

        if matches!(self, Type::Question) {
            let then_branch = self.expression()?;
            self.consume(Type::Colon, "Expect ':' after then-branch of ternary expression.")?;
            let else_branch = self.expression()?;

            return Ok(Expr::Ternary(TernaryData {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            }));
        }

        Ok(condition)
    }

    /// Parses an or expression.
    fn or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.and()?;

        while matches!(self, Type::Or) {
            let operator = self.previous().clone();
            let right = self.and()?;
            expr = Expr::Logical(LogicalData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    /// Parses an and expression.
    fn and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;

        while matches!(self, Type::And) {
            let operator = self.previous().clone();
            let right = self.equality()?;
            expr = Expr::Logical(LogicalData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    /// Parses an equality expression.
    fn equality(&mut self) -> ParseResult<Expr> {
        if self.check(Type::BangEqual) || self.check(Type::EqualEqual) {
            let operator = self.advance().clone();
            let _ = self.comparison();
            return Err(ParseError {
                token: operator,
                message: "Binary operator appearing at the beginning of an expression.".to_string(),
            });
        }

        let mut expr = self.comparison()?;

        while matches!(self, Type::BangEqual, Type::EqualEqual) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    /// Parses a comparison expression.
    fn comparison(&mut self) -> ParseResult<Expr> {
        if self.check(Type::Greater)
            || self.check(Type::GreaterEqual)
            || self.check(Type::Less)
            || self.check(Type::LessEqual)
        {
            let operator = self.advance().clone();
            let _ = self.term();
            return Err(ParseError {
                token: operator,
                message: "Binary operator appearing at the beginning of an expression.".to_string(),
            });
        }

        let mut expr = self.term()?;

        while matches!(self, Type::Greater, Type::GreaterEqual, Type::Less, Type::LessEqual) {
            let operator = self.previous().clone();
            let right = self.term()?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    /// Parses a term expression. Exempt from the leading-operator check since `-`/`+`
    /// are also valid unary prefixes.
    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;

        while matches!(self, Type::Minus, Type::Plus) {
            let operator = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    /// Parses a factor expression.
    fn factor(&mut self) -> ParseResult<Expr> {
        if self.check(Type::Slash) || self.check(Type::Star) {
            let operator = self.advance().clone();
            let _ = self.unary();
            return Err(ParseError {
                token: operator,
                message: "Binary operator appearing at the beginning of an expression.".to_string(),
            });
        }

        let mut expr = self.unary()?;

        while matches!(self, Type::Slash, Type::Star) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    /// Parses a unary expression.
    fn unary(&mut self) -> ParseResult<Expr> {
        if matches!(self, Type::Bang, Type::Minus) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            return Ok(Expr::Unary(UnaryData { operator, expr: Box::new(right) }));
        }

        self.call()
    }

    /// Parses a call's argument list, reporting (but not failing on) more than 255
    /// arguments.
    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = vec![];

        if !self.check(Type::RightParen) {
            loop {
                if arguments.len() >= 255 {
                    let token = self.peek().clone();
                    self.reporter.token_error(&token, "Cannot have more than 255 arguments.");
                }

                arguments.push(self.assignment()?);

                if !matches!(self, Type::Comma) {
                    break;
                }
            }
        }

        let paren = self.consume(Type::RightParen, "Expect ')' after arguments.")?.clone();

        Ok(Expr::Call(CallData { callee: Box::new(callee), paren, arguments }))
    }

    /// Parses a call or property-access expression.
    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if matches!(self, Type::LeftParen) {
                expr = self.finish_call(expr)?;
            } else if matches!(self, Type::Dot) {
                let name = self.consume(Type::Identifier, "Expect property name after '.'.")?.clone();
                expr = Expr::Get(GetData { object: Box::new(expr), name });
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parses a primary expression.
    fn primary(&mut self) -> ParseResult<Expr> {
        if matches!(self, Type::False) {
            return Ok(Expr::Literal(Value::Boolean(false)));
        }

        if matches!(self, Type::True) {
            return Ok(Expr::Literal(Value::Boolean(true)));
        }

        if matches!(self, Type::Nil) {
            return Ok(Expr::Literal(Value::Nil));
        }

        if matches!(self, Type::Number, Type::String) {
            let literal = self
                .previous()
                .literal
                .clone()
                .expect("number or string token to carry a literal value");
            return Ok(Expr::Literal(literal));
        }

        if matches!(self, Type::Super) {
            let keyword = self.previous().clone();
            self.consume(Type::Dot, "Expect '.' after 'super'.")?;
            let method = self.consume(Type::Identifier, "Expect superclass method name.")?.clone();
            return Ok(Expr::Super(SuperData { keyword, method, id: self.next_node_id() }));
        }

        if matches!(self, Type::This) {
            let keyword = self.previous().clone();
            return Ok(Expr::This(ThisData { keyword, id: self.next_node_id() }));
        }

        if matches!(self, Type::Identifier) {
            let name = self.previous().clone();
            return Ok(Expr::Variable(VariableData { name, id: self.next_node_id() }));
        }

        if matches!(self, Type::Fun) {
            return self.lambda();
        }

        if matches!(self, Type::LeftParen) {
            let expr = self.expression()?;
            self.consume(Type::RightParen, "Expect ')' after expression.")?;
            return Ok(Expr::Grouping(GroupingData { expr: Box::new(expr) }));
        }

        Err(ParseError { token: self.peek().clone(), message: "Expected expression.".to_string() })
    }

    /// Parses an anonymous function expression.
    fn lambda(&mut self) -> ParseResult<Expr> {
        self.consume(Type::LeftParen, "Expect '(' after 'fun'.")?;
        let params = self.parameters()?;
        self.consume(Type::RightParen, "Expect ')' after parameters.")?;
        self.consume(Type::LeftBrace, "Expect '{' before lambda body.")?;
        let body = Rc::new(self.block()?);

        Ok(Expr::Lambda(LambdaData { params, body }))
    }

    /// Tries to recover from a parse error by skipping to the next likely statement
    /// boundary.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().r#type == Type::Semicolon {
                return;
            }

            match self.peek().r#type {
                Type::Class
                | Type::Fun
                | Type::Var
                | Type::For
                | Type::If
                | Type::While
                | Type::Print
                | Type::Return => return,
                _ => {
                    self.advance();
                }
            };
        }
    }
}
