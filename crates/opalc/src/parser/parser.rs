//! Recursive descent parser for Opal

use crate::ast::*;
use crate::common::{CompileError, CompileResult};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::types::Type;

/// Recursive descent parser for Opal
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source
    pub fn new(source: &'a str) -> CompileResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse a complete program
    pub fn parse(&mut self) -> CompileResult<Program> {
        let mut functions = Vec::new();

        while !self.at_end() {
            functions.push(self.parse_function()?);
        }

        Ok(Program::new(functions))
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    fn at_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> CompileResult<Token> {
        let prev = std::mem::replace(&mut self.current, self.lexer.next_token()?);
        Ok(prev)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> CompileResult<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> CompileResult<Token> {
        if self.check(&kind) {
            self.advance()
        } else {
            Err(CompileError::parser(
                format!("expected {}, found {}", kind, self.current.kind),
                self.current.span,
            ))
        }
    }

    fn parse_type(&mut self) -> CompileResult<Type> {
        match self.current.kind.to_type() {
            Some(ty) => {
                self.advance()?;
                Ok(ty)
            }
            None => Err(CompileError::parser(
                format!("expected type, found {}", self.current.kind),
                self.current.span,
            )),
        }
    }

    fn parse_identifier(&mut self) -> CompileResult<String> {
        if let TokenKind::Identifier(name) = &self.current.kind {
            let name = name.clone();
            self.advance()?;
            Ok(name)
        } else {
            Err(CompileError::parser(
                format!("expected identifier, found {}", self.current.kind),
                self.current.span,
            ))
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_function(&mut self) -> CompileResult<FunctionDecl> {
        let start_span = self.current.span;

        let return_type = self.parse_type()?;
        let name = self.parse_identifier()?;

        self.expect(TokenKind::LParen)?;
        let params = self.parse_params()?;
        self.expect(TokenKind::RParen)?;

        let body = self.parse_block()?;
        let span = start_span.merge(body.span);

        Ok(FunctionDecl::new(name, return_type, params, body, span))
    }

    fn parse_params(&mut self) -> CompileResult<Vec<Param>> {
        let mut params = Vec::new();

        if self.check(&TokenKind::RParen) {
            return Ok(params);
        }

        loop {
            let start_span = self.current.span;
            let ty = self.parse_type()?;
            let name = self.parse_identifier()?;
            let span = start_span.merge(self.current.span);
            params.push(Param::new(name, ty, span));

            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        Ok(params)
    }

    /// Parse `type name [= init]` without the trailing semicolon, so the
    /// same path serves block statements and for-loop headers
    fn parse_declaration(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;

        let ty = self.parse_type()?;
        let name = self.parse_identifier()?;

        let init = if self.match_token(&TokenKind::Eq)? {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let span = start_span.merge(self.current.span);
        Ok(Stmt::new(StmtKind::Declaration { name, ty, init }, span))
    }

    /// Parse `name = expr` without the trailing semicolon
    fn parse_assignment(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;

        let name = self.parse_identifier()?;
        self.expect(TokenKind::Eq)?;
        let value = self.parse_expression()?;

        let span = start_span.merge(value.span);
        Ok(Stmt::new(StmtKind::Assignment { name, value }, span))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_statement(&mut self) -> CompileResult<Stmt> {
        match &self.current.kind {
            TokenKind::LBrace => self.parse_block(),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Do => self.parse_do_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Return => self.parse_return_statement(),

            _ if self.current.kind.is_type_keyword() => {
                let decl = self.parse_declaration()?;
                self.expect(TokenKind::Semi)?;
                Ok(decl)
            }

            TokenKind::Identifier(_) => {
                // One token of lookahead splits `x = ...;` from `f(...);`
                let next = self.lexer.peek()?;
                if matches!(next.kind, TokenKind::Eq) {
                    let assign = self.parse_assignment()?;
                    self.expect(TokenKind::Semi)?;
                    Ok(assign)
                } else {
                    self.parse_expression_statement()
                }
            }

            _ => self.parse_expression_statement(),
        }
    }

    fn parse_block(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        self.expect(TokenKind::LBrace)?;

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            stmts.push(self.parse_statement()?);
        }

        self.expect(TokenKind::RBrace)?;
        let span = start_span.merge(self.current.span);

        Ok(Stmt::new(StmtKind::Block(stmts), span))
    }

    fn parse_if_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;

        let then_branch = Box::new(self.parse_statement()?);

        let else_branch = if self.match_token(&TokenKind::Else)? {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        let span = start_span.merge(self.current.span);
        Ok(Stmt::new(
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            span,
        ))
    }

    fn parse_while_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;

        let body = Box::new(self.parse_statement()?);
        let span = start_span.merge(self.current.span);

        Ok(Stmt::new(StmtKind::While { condition, body }, span))
    }

    fn parse_do_while_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        self.expect(TokenKind::Do)?;

        let body = Box::new(self.parse_statement()?);

        self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Semi)?;

        let span = start_span.merge(self.current.span);
        Ok(Stmt::new(StmtKind::DoWhile { body, condition }, span))
    }

    fn parse_for_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        self.expect(TokenKind::For)?;
        self.expect(TokenKind::LParen)?;

        // Init: declaration, assignment, or empty
        let init = if self.check(&TokenKind::Semi) {
            None
        } else if self.current.kind.is_type_keyword() {
            Some(Box::new(self.parse_declaration()?))
        } else {
            Some(Box::new(self.parse_assignment()?))
        };
        self.expect(TokenKind::Semi)?;

        // Condition
        let condition = if self.check(&TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::Semi)?;

        // Update
        let update = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(Box::new(self.parse_assignment()?))
        };
        self.expect(TokenKind::RParen)?;

        let body = Box::new(self.parse_statement()?);
        let span = start_span.merge(self.current.span);

        Ok(Stmt::new(
            StmtKind::For {
                init,
                condition,
                update,
                body,
            },
            span,
        ))
    }

    fn parse_return_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        self.expect(TokenKind::Return)?;

        let value = if self.check(&TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect(TokenKind::Semi)?;
        let span = start_span.merge(self.current.span);

        Ok(Stmt::new(StmtKind::Return(value), span))
    }

    fn parse_expression_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        let expr = self.parse_expression()?;
        self.expect(TokenKind::Semi)?;
        let span = start_span.merge(self.current.span);

        Ok(Stmt::new(StmtKind::Expression(expr), span))
    }

    // =========================================================================
    // Expressions (loosest to tightest binding)
    // =========================================================================

    fn parse_expression(&mut self) -> CompileResult<Expr> {
        self.parse_logical_or_expression()
    }

    fn parse_logical_or_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_logical_and_expression()?;

        while self.match_token(&TokenKind::PipePipe)? {
            let right = self.parse_logical_and_expression()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op: BinaryOp::Or,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_logical_and_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_bitwise_or_expression()?;

        while self.match_token(&TokenKind::AmpAmp)? {
            let right = self.parse_bitwise_or_expression()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op: BinaryOp::And,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_bitwise_or_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_bitwise_xor_expression()?;

        while self.match_token(&TokenKind::Pipe)? {
            let right = self.parse_bitwise_xor_expression()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op: BinaryOp::BitOr,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_bitwise_xor_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_bitwise_and_expression()?;

        while self.match_token(&TokenKind::Caret)? {
            let right = self.parse_bitwise_and_expression()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op: BinaryOp::BitXor,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_bitwise_and_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_equality_expression()?;

        while self.match_token(&TokenKind::Amp)? {
            let right = self.parse_equality_expression()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op: BinaryOp::BitAnd,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_equality_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_relational_expression()?;

        loop {
            let op = match &self.current.kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::Ne,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_relational_expression()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_relational_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_shift_expression()?;

        loop {
            let op = match &self.current.kind {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::LtEq => BinaryOp::Le,
                TokenKind::GtEq => BinaryOp::Ge,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_shift_expression()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_shift_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_additive_expression()?;

        loop {
            let op = match &self.current.kind {
                TokenKind::LtLt => BinaryOp::Shl,
                TokenKind::GtGt => BinaryOp::Shr,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_additive_expression()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_additive_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_multiplicative_expression()?;

        loop {
            let op = match &self.current.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_multiplicative_expression()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_multiplicative_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_unary_expression()?;

        loop {
            let op = match &self.current.kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_unary_expression()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> CompileResult<Expr> {
        let start_span = self.current.span;

        let op = match &self.current.kind {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            _ => None,
        };

        if let Some(op) = op {
            self.advance()?;
            let operand = self.parse_unary_expression()?;
            let span = start_span.merge(operand.span);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }

        self.parse_primary_expression()
    }

    fn parse_argument_list(&mut self) -> CompileResult<Vec<Expr>> {
        let mut args = Vec::new();

        if self.check(&TokenKind::RParen) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        Ok(args)
    }

    fn parse_primary_expression(&mut self) -> CompileResult<Expr> {
        let span = self.current.span;

        match &self.current.kind {
            TokenKind::IntLiteral(s) => {
                let (value, ty, overflowed) = self.parse_int_literal(s)?;
                self.advance()?;
                Ok(Expr::new(ExprKind::IntLiteral { value, ty, overflowed }, span))
            }
            TokenKind::HexLiteral(s) => {
                let (value, ty, overflowed) = self.parse_hex_literal(s)?;
                self.advance()?;
                Ok(Expr::new(ExprKind::IntLiteral { value, ty, overflowed }, span))
            }
            TokenKind::FloatLiteral(s) => {
                let (value, ty) = self.parse_float_literal(s)?;
                self.advance()?;
                Ok(Expr::new(ExprKind::FloatLiteral { value, ty }, span))
            }
            TokenKind::BoolLiteral(b) => {
                let b = *b;
                self.advance()?;
                Ok(Expr::new(ExprKind::BoolLiteral(b), span))
            }
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance()?;

                if self.match_token(&TokenKind::LParen)? {
                    let args = self.parse_argument_list()?;
                    self.expect(TokenKind::RParen)?;
                    let span = span.merge(self.current.span);
                    Ok(Expr::new(ExprKind::Call { name, args }, span))
                } else {
                    Ok(Expr::new(ExprKind::Variable(name), span))
                }
            }
            TokenKind::LParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            _ => Err(CompileError::parser(
                format!("unexpected token in expression: {}", self.current.kind),
                span,
            )),
        }
    }

    // =========================================================================
    // Literal parsing helpers
    // =========================================================================

    /// Decode digits and type suffix of a decimal integer literal. Digit
    /// strings beyond 64 bits saturate, with the overflow recorded on the
    /// literal node for the analyzer's range check.
    fn parse_int_literal(&self, s: &str) -> CompileResult<(u64, Type, bool)> {
        let digits_end = s
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(s.len());
        let (digits, suffix) = s.split_at(digits_end);
        let ty = self.int_suffix_type(suffix)?;
        let (value, overflowed) = match digits.parse::<u64>() {
            Ok(value) => (value, false),
            Err(_) => (u64::MAX, true),
        };
        Ok((value, ty, overflowed))
    }

    fn parse_hex_literal(&self, s: &str) -> CompileResult<(u64, Type, bool)> {
        let s = s.trim_start_matches("0x").trim_start_matches("0X");
        let digits_end = s
            .find(|c: char| !c.is_ascii_hexdigit())
            .unwrap_or(s.len());
        let (digits, suffix) = s.split_at(digits_end);
        let ty = self.int_suffix_type(suffix)?;
        let (value, overflowed) = match u64::from_str_radix(digits, 16) {
            Ok(value) => (value, false),
            Err(_) => (u64::MAX, true),
        };
        Ok((value, ty, overflowed))
    }

    fn int_suffix_type(&self, suffix: &str) -> CompileResult<Type> {
        match suffix.to_ascii_lowercase().as_str() {
            "" => Ok(Type::Int),
            "u" => Ok(Type::UInt),
            "b" => Ok(Type::Byte),
            "ub" => Ok(Type::UByte),
            "s" => Ok(Type::Short),
            "us" => Ok(Type::UShort),
            "l" => Ok(Type::Long),
            "ul" => Ok(Type::ULong),
            _ => Err(CompileError::parser(
                format!("invalid integer suffix '{}'", suffix),
                self.current.span,
            )),
        }
    }

    fn parse_float_literal(&self, s: &str) -> CompileResult<(f64, Type)> {
        let (digits, ty) = match s.as_bytes().last() {
            Some(b'f' | b'F') => (&s[..s.len() - 1], Type::Float),
            Some(b'd' | b'D') => (&s[..s.len() - 1], Type::Double),
            _ => (s, Type::Double),
        };
        let value: f64 = digits.parse().map_err(|_| {
            CompileError::parser(format!("invalid float literal: {}", s), self.current.span)
        })?;
        Ok((value, ty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_source(source: &str) -> Program {
        let mut parser = Parser::new(source).unwrap();
        parser.parse().unwrap()
    }

    fn body_stmts(func: &FunctionDecl) -> &[Stmt] {
        match &func.body.kind {
            StmtKind::Block(stmts) => stmts,
            _ => panic!("function body is not a block"),
        }
    }

    #[test]
    fn test_parse_simple_function() {
        let program = parse_source("int main() { return 0; }");

        assert_eq!(program.functions.len(), 1);
        let f = &program.functions[0];
        assert_eq!(f.name, "main");
        assert_eq!(f.return_type, Type::Int);
        assert!(f.params.is_empty());
        assert_eq!(body_stmts(f).len(), 1);
        assert!(matches!(body_stmts(f)[0].kind, StmtKind::Return(Some(_))));
    }

    #[test]
    fn test_parse_params() {
        let program = parse_source("long mix(int a, ulong b, double c) { return 0l; }");

        let f = &program.functions[0];
        assert_eq!(f.params.len(), 3);
        assert_eq!(f.params[0].name, "a");
        assert_eq!(f.params[0].ty, Type::Int);
        assert_eq!(f.params[1].ty, Type::ULong);
        assert_eq!(f.params[2].ty, Type::Double);
    }

    #[test]
    fn test_parse_precedence() {
        let program = parse_source("int f() { return 1 + 2 * 3; }");

        let f = &program.functions[0];
        let StmtKind::Return(Some(expr)) = &body_stmts(f)[0].kind else {
            panic!("expected return");
        };
        let ExprKind::Binary { op, right, .. } = &expr.kind else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, BinaryOp::Add);
        assert!(matches!(
            right.kind,
            ExprKind::Binary {
                op: BinaryOp::Mul,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_logical_precedence() {
        let program = parse_source("bool f(bool a, bool b, bool c) { return a || b && c; }");

        let f = &program.functions[0];
        let StmtKind::Return(Some(expr)) = &body_stmts(f)[0].kind else {
            panic!("expected return");
        };
        let ExprKind::Binary { op, right, .. } = &expr.kind else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, BinaryOp::Or);
        assert!(matches!(
            right.kind,
            ExprKind::Binary {
                op: BinaryOp::And,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_if_else_chain() {
        let program = parse_source(
            "int sign(int x) { if (x > 0) { return 1; } else if (x < 0) { return -1; } else { return 0; } }",
        );

        let f = &program.functions[0];
        let StmtKind::If { else_branch, .. } = &body_stmts(f)[0].kind else {
            panic!("expected if");
        };
        // else-if nests as an if statement in the else branch
        assert!(matches!(
            else_branch.as_ref().unwrap().kind,
            StmtKind::If { .. }
        ));
    }

    #[test]
    fn test_parse_assignment_vs_call() {
        let program = parse_source("void f(int x) { x = 1; f(x); }");

        let f = &program.functions[0];
        let stmts = body_stmts(f);
        assert!(matches!(stmts[0].kind, StmtKind::Assignment { .. }));
        assert!(matches!(
            stmts[1].kind,
            StmtKind::Expression(Expr {
                kind: ExprKind::Call { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_parse_for_variants() {
        let program = parse_source(
            "void f() { for (int i = 0; i < 10; i = i + 1) { } for (;;) { } }",
        );

        let f = &program.functions[0];
        let stmts = body_stmts(f);

        let StmtKind::For {
            init,
            condition,
            update,
            ..
        } = &stmts[0].kind
        else {
            panic!("expected for");
        };
        assert!(init.is_some());
        assert!(condition.is_some());
        assert!(update.is_some());

        let StmtKind::For {
            init,
            condition,
            update,
            ..
        } = &stmts[1].kind
        else {
            panic!("expected for");
        };
        assert!(init.is_none());
        assert!(condition.is_none());
        assert!(update.is_none());
    }

    #[test]
    fn test_parse_do_while() {
        let program = parse_source("void f(int x) { do { x = x - 1; } while (x > 0); }");

        let f = &program.functions[0];
        assert!(matches!(body_stmts(f)[0].kind, StmtKind::DoWhile { .. }));
    }

    #[test]
    fn test_parse_literal_suffixes() {
        let program = parse_source("void f() { ubyte b = 200ub; long l = 7l; float x = 2f; }");

        let f = &program.functions[0];
        let stmts = body_stmts(f);

        let StmtKind::Declaration { init: Some(e), .. } = &stmts[0].kind else {
            panic!("expected declaration");
        };
        assert!(matches!(
            e.kind,
            ExprKind::IntLiteral {
                value: 200,
                ty: Type::UByte,
                overflowed: false
            }
        ));

        let StmtKind::Declaration { init: Some(e), .. } = &stmts[1].kind else {
            panic!("expected declaration");
        };
        assert!(matches!(
            e.kind,
            ExprKind::IntLiteral {
                value: 7,
                ty: Type::Long,
                overflowed: false
            }
        ));

        let StmtKind::Declaration { init: Some(e), .. } = &stmts[2].kind else {
            panic!("expected declaration");
        };
        assert!(matches!(
            e.kind,
            ExprKind::FloatLiteral { ty: Type::Float, .. }
        ));
    }

    #[test]
    fn test_parse_oversized_literal_saturates() {
        let program = parse_source("void f() { ulong x = 18446744073709551616ul; }");

        let f = &program.functions[0];
        let StmtKind::Declaration { init: Some(e), .. } = &body_stmts(f)[0].kind else {
            panic!("expected declaration");
        };
        assert!(matches!(
            e.kind,
            ExprKind::IntLiteral {
                value: u64::MAX,
                ty: Type::ULong,
                overflowed: true
            }
        ));
    }

    #[test]
    fn test_parse_unary_nesting() {
        let program = parse_source("int f(int x) { return -~x; }");

        let f = &program.functions[0];
        let StmtKind::Return(Some(expr)) = &body_stmts(f)[0].kind else {
            panic!("expected return");
        };
        let ExprKind::Unary { op, operand } = &expr.kind else {
            panic!("expected unary");
        };
        assert_eq!(*op, UnaryOp::Neg);
        assert!(matches!(
            operand.kind,
            ExprKind::Unary {
                op: UnaryOp::BitNot,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_missing_semicolon() {
        let mut parser = Parser::new("int f() { return 0 }").unwrap();
        assert!(parser.parse().is_err());
    }

    #[test]
    fn test_parse_missing_paren() {
        let mut parser = Parser::new("int f( { return 0; }").unwrap();
        assert!(parser.parse().is_err());
    }
}
