//! Semantic analyzer - name resolution, type checking and return analysis
//!
//! Problems are collected as diagnostics rather than aborting the walk,
//! so one run reports everything it can find. Each check falls back to
//! a recoverable result (an undefined variable reads as `void`, a bad
//! condition proceeds as `bool`) and analysis continues.

use super::scope::{FunctionSymbol, Scope, VariableSymbol};
use super::typed::{
    AnalyzedExpr, AnalyzedExprKind, AnalyzedFunction, AnalyzedProgram, AnalyzedStmt,
    AnalyzedStmtKind, LocalVariable,
};
use crate::ast::{Expr, ExprKind, FunctionDecl, Program, Stmt, StmtKind, UnaryOp};
use crate::common::{Diagnostic, Span};
use crate::types::Type;

/// Semantic analyzer producing a typed program or the full list of
/// diagnostics
pub struct SemanticAnalyzer {
    scope: Scope,
    diagnostics: Vec<Diagnostic>,
    locals: Vec<LocalVariable>,
    return_type: Type,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            scope: Scope::new(),
            diagnostics: Vec::new(),
            locals: Vec::new(),
            return_type: Type::Void,
        }
    }

    /// Analyze a program. Err carries every diagnostic found.
    pub fn analyze(&mut self, program: &Program) -> Result<AnalyzedProgram, Vec<Diagnostic>> {
        // Register all signatures up front so calls resolve regardless
        // of declaration order. The first declaration of a name wins.
        for func in &program.functions {
            let param_types = func.params.iter().map(|p| p.ty).collect();
            let symbol = FunctionSymbol::new(&func.name, func.return_type, param_types);
            if self.scope.define_function(symbol).is_err() {
                self.error(format!("duplicate function '{}'", func.name), func.span);
            }
        }

        // Every body is analyzed, duplicates included
        let functions = program
            .functions
            .iter()
            .map(|func| self.analyze_function(func))
            .collect();

        if self.diagnostics.is_empty() {
            Ok(AnalyzedProgram { functions })
        } else {
            Err(std::mem::take(&mut self.diagnostics))
        }
    }

    fn error(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics.push(Diagnostic::new(message, span));
    }

    /// Bind a name in the current scope and hand it the next local
    /// slot. Returns None when the name is already bound in this scope.
    fn bind_local(&mut self, name: &str, ty: Type) -> Option<u32> {
        let index = self.locals.len() as u32;
        let symbol = VariableSymbol::new(name, ty, index);
        if self.scope.define_variable(symbol).is_ok() {
            self.locals.push(LocalVariable::new(index, name, ty));
            Some(index)
        } else {
            None
        }
    }

    // ==================== Functions ====================

    fn analyze_function(&mut self, func: &FunctionDecl) -> AnalyzedFunction {
        self.locals = Vec::new();
        self.return_type = func.return_type;

        // Parameters and the body's top-level statements share one
        // scope, so redeclaring a parameter is a duplicate
        self.scope.push_child();

        for param in &func.params {
            if param.ty == Type::Void {
                self.error(
                    format!("void-typed parameter '{}'", param.name),
                    param.span,
                );
            } else if self.bind_local(&param.name, param.ty).is_none() {
                self.error(format!("duplicate parameter '{}'", param.name), param.span);
            }
        }

        let body = match &func.body.kind {
            StmtKind::Block(stmts) => {
                let (stmts, guaranteed) = self.analyze_stmts(stmts);
                AnalyzedStmt::new(AnalyzedStmtKind::Block(stmts), func.body.span, guaranteed)
            }
            // The parser only produces block bodies
            _ => self.analyze_stmt(&func.body),
        };

        self.scope.pop_to_parent();

        if func.return_type != Type::Void && !body.has_guaranteed_return {
            self.error(
                format!("indeterminate return in function '{}'", func.name),
                func.span,
            );
        }

        AnalyzedFunction {
            name: func.name.clone(),
            return_type: func.return_type,
            params: func.params.clone(),
            body,
            locals: std::mem::take(&mut self.locals),
        }
    }

    // ==================== Statements ====================

    /// Analyze a statement sequence, flagging everything after the
    /// first guaranteed return as unreachable (it is still analyzed)
    fn analyze_stmts(&mut self, stmts: &[Stmt]) -> (Vec<AnalyzedStmt>, bool) {
        let mut analyzed = Vec::with_capacity(stmts.len());
        let mut guaranteed = false;

        for stmt in stmts {
            if guaranteed {
                self.error("unreachable statement", stmt.span);
            }
            let stmt = self.analyze_stmt(stmt);
            guaranteed = guaranteed || stmt.has_guaranteed_return;
            analyzed.push(stmt);
        }

        (analyzed, guaranteed)
    }

    fn analyze_stmt(&mut self, stmt: &Stmt) -> AnalyzedStmt {
        match &stmt.kind {
            StmtKind::Block(stmts) => {
                self.scope.push_child();
                let (stmts, guaranteed) = self.analyze_stmts(stmts);
                self.scope.pop_to_parent();
                AnalyzedStmt::new(AnalyzedStmtKind::Block(stmts), stmt.span, guaranteed)
            }

            StmtKind::Declaration { name, ty, init } => {
                self.analyze_declaration(name, *ty, init.as_ref(), stmt.span)
            }

            StmtKind::Assignment { name, value } => {
                self.analyze_assignment(name, value, stmt.span)
            }

            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = self.analyze_condition(condition);
                let then_branch = Box::new(self.analyze_stmt(then_branch));
                let else_branch = else_branch
                    .as_ref()
                    .map(|stmt| Box::new(self.analyze_stmt(stmt)));

                let cond_true = is_literal_true(&condition);
                let guaranteed = match &else_branch {
                    // Without an else the body only runs for sure when
                    // the condition is the literal `true`
                    None => cond_true && then_branch.has_guaranteed_return,
                    Some(else_branch) => {
                        then_branch.has_guaranteed_return
                            && (cond_true || else_branch.has_guaranteed_return)
                    }
                };

                AnalyzedStmt::new(
                    AnalyzedStmtKind::If {
                        condition,
                        then_branch,
                        else_branch,
                    },
                    stmt.span,
                    guaranteed,
                )
            }

            StmtKind::While { condition, body } => {
                let condition = self.analyze_condition(condition);
                let body = Box::new(self.analyze_stmt(body));
                let guaranteed = is_literal_true(&condition) && body.has_guaranteed_return;
                AnalyzedStmt::new(
                    AnalyzedStmtKind::While { condition, body },
                    stmt.span,
                    guaranteed,
                )
            }

            StmtKind::DoWhile { body, condition } => {
                // The body runs at least once
                let body = Box::new(self.analyze_stmt(body));
                let condition = self.analyze_condition(condition);
                let guaranteed = body.has_guaranteed_return;
                AnalyzedStmt::new(
                    AnalyzedStmtKind::DoWhile { body, condition },
                    stmt.span,
                    guaranteed,
                )
            }

            StmtKind::For {
                init,
                condition,
                update,
                body,
            } => {
                // The header declaration lives in its own scope
                self.scope.push_child();
                let init = init.as_ref().map(|stmt| Box::new(self.analyze_stmt(stmt)));
                let condition = condition.as_ref().map(|cond| self.analyze_condition(cond));
                let update = update
                    .as_ref()
                    .map(|stmt| Box::new(self.analyze_stmt(stmt)));
                let body = Box::new(self.analyze_stmt(body));
                self.scope.pop_to_parent();

                let cond_true = condition.as_ref().is_none_or(is_literal_true);
                let guaranteed = cond_true && body.has_guaranteed_return;
                AnalyzedStmt::new(
                    AnalyzedStmtKind::For {
                        init,
                        condition,
                        update,
                        body,
                    },
                    stmt.span,
                    guaranteed,
                )
            }

            StmtKind::Return(value) => self.analyze_return(value.as_ref(), stmt.span),

            StmtKind::Expression(expr) => {
                let expr = self.analyze_expr(expr);
                AnalyzedStmt::new(AnalyzedStmtKind::Expression(expr), stmt.span, false)
            }
        }
    }

    fn analyze_declaration(
        &mut self,
        name: &str,
        ty: Type,
        init: Option<&Expr>,
        span: Span,
    ) -> AnalyzedStmt {
        let index = if ty == Type::Void {
            self.error(format!("void-typed variable '{}'", name), span);
            None
        } else {
            let bound = self.bind_local(name, ty);
            if bound.is_none() {
                self.error(format!("duplicate variable '{}'", name), span);
            }
            bound
        };

        // The slot is bound before the initializer runs, so
        // `int x = x;` resolves to the fresh slot
        let init = init.map(|expr| self.analyze_expr(expr));

        if ty != Type::Void {
            if let Some(init) = &init {
                if init.ty != ty {
                    self.error(
                        format!(
                            "type mismatch in initializer of '{}': expected {}, found {}",
                            name, ty, init.ty
                        ),
                        span,
                    );
                }
            }
        }

        // A failed binding falls back to the visible slot of the same
        // name, if any; diagnosed programs never reach lowering
        let index = index
            .or_else(|| self.scope.lookup_variable(name).map(|sym| sym.index))
            .unwrap_or(0);

        AnalyzedStmt::new(
            AnalyzedStmtKind::Declaration {
                name: name.to_string(),
                index,
                init,
            },
            span,
            false,
        )
    }

    fn analyze_assignment(&mut self, name: &str, value: &Expr, span: Span) -> AnalyzedStmt {
        let target = self
            .scope
            .lookup_variable(name)
            .map(|sym| (sym.index, sym.ty));
        if target.is_none() {
            self.error(format!("undefined variable '{}'", name), span);
        }

        let value = self.analyze_expr(value);

        let index = match target {
            Some((index, ty)) => {
                if value.ty != ty {
                    self.error(
                        format!(
                            "type mismatch in assignment to '{}': expected {}, found {}",
                            name, ty, value.ty
                        ),
                        span,
                    );
                }
                index
            }
            None => 0,
        };

        AnalyzedStmt::new(
            AnalyzedStmtKind::Assignment {
                name: name.to_string(),
                index,
                value,
            },
            span,
            false,
        )
    }

    fn analyze_return(&mut self, value: Option<&Expr>, span: Span) -> AnalyzedStmt {
        let value = value.map(|expr| self.analyze_expr(expr));

        match &value {
            Some(value) => {
                if self.return_type == Type::Void {
                    self.error("return with a value in a void function", span);
                } else if value.ty != self.return_type {
                    self.error(
                        format!(
                            "return type mismatch: expected {}, found {}",
                            self.return_type, value.ty
                        ),
                        span,
                    );
                }
            }
            None => {
                if self.return_type != Type::Void {
                    self.error("return missing value", span);
                }
            }
        }

        AnalyzedStmt::new(AnalyzedStmtKind::Return(value), span, true)
    }

    /// Analyze a loop or if condition. A non-bool condition is
    /// reported and then treated as bool.
    fn analyze_condition(&mut self, expr: &Expr) -> AnalyzedExpr {
        let condition = self.analyze_expr(expr);
        if condition.ty != Type::Bool {
            self.error(
                format!("invalid condition: expected bool, found {}", condition.ty),
                expr.span,
            );
        }
        condition
    }

    // ==================== Expressions ====================

    fn analyze_expr(&mut self, expr: &Expr) -> AnalyzedExpr {
        match &expr.kind {
            ExprKind::IntLiteral { value, ty, overflowed } => {
                // The saturated value equals the ulong maximum, so the
                // per-type check below cannot catch it
                if *overflowed {
                    self.error("literal overflow: exceeds 64 bits", expr.span);
                } else if let Some(max) = ty.integer_max() {
                    if *value > max {
                        self.error(
                            format!("literal overflow: {} does not fit in type {}", value, ty),
                            expr.span,
                        );
                    }
                }
                AnalyzedExpr::new(AnalyzedExprKind::IntLiteral(*value), *ty, expr.span)
            }

            ExprKind::FloatLiteral { value, ty } => {
                // f64 decoding turns an oversized spelling into infinity
                if !value.is_finite() {
                    self.error(format!("literal overflow: exceeds {} range", ty), expr.span);
                } else if *ty == Type::Float && (*value as f32).is_infinite() {
                    self.error(
                        format!("literal overflow: {:?} does not fit in type {}", value, ty),
                        expr.span,
                    );
                }
                AnalyzedExpr::new(AnalyzedExprKind::FloatLiteral(*value), *ty, expr.span)
            }

            ExprKind::BoolLiteral(value) => {
                AnalyzedExpr::new(AnalyzedExprKind::BoolLiteral(*value), Type::Bool, expr.span)
            }

            ExprKind::Variable(name) => match self.scope.lookup_variable(name) {
                Some(sym) => AnalyzedExpr::new(
                    AnalyzedExprKind::Variable {
                        name: name.clone(),
                        index: sym.index,
                    },
                    sym.ty,
                    expr.span,
                ),
                None => {
                    self.error(format!("undefined variable '{}'", name), expr.span);
                    AnalyzedExpr::new(
                        AnalyzedExprKind::Variable {
                            name: name.clone(),
                            index: 0,
                        },
                        Type::Void,
                        expr.span,
                    )
                }
            },

            ExprKind::Call { name, args } => self.analyze_call(name, args, expr.span),

            ExprKind::Unary { op, operand } => {
                let operand = self.analyze_expr(operand);
                let valid = match op {
                    UnaryOp::Neg => operand.ty.is_number() && operand.ty.is_signed(),
                    UnaryOp::Not => operand.ty == Type::Bool,
                    UnaryOp::BitNot => operand.ty.is_integer(),
                };
                if !valid {
                    self.error(
                        format!(
                            "invalid unary operation '{}' on type {}",
                            op.as_str(),
                            operand.ty
                        ),
                        expr.span,
                    );
                }

                let ty = operand.ty;
                AnalyzedExpr::new(
                    AnalyzedExprKind::Unary {
                        op: *op,
                        operand: Box::new(operand),
                    },
                    ty,
                    expr.span,
                )
            }

            ExprKind::Binary { op, left, right } => {
                let left = self.analyze_expr(left);
                let right = self.analyze_expr(right);

                // One diagnostic per operation: an operand mismatch
                // preempts the category check
                if left.ty != right.ty {
                    self.error(
                        format!(
                            "invalid binary operation '{}' on types {} and {}",
                            op.as_str(),
                            left.ty,
                            right.ty
                        ),
                        expr.span,
                    );
                } else {
                    let valid = if op.is_arithmetic() || op.is_relational() {
                        left.ty.is_number()
                    } else if op.is_integer_only() {
                        left.ty.is_integer()
                    } else if op.is_logical() {
                        left.ty == Type::Bool
                    } else {
                        // Equality compares any non-void type
                        left.ty != Type::Void
                    };
                    if !valid {
                        self.error(
                            format!(
                                "invalid binary operation '{}' on types {} and {}",
                                op.as_str(),
                                left.ty,
                                right.ty
                            ),
                            expr.span,
                        );
                    }
                }

                let ty = if op.yields_bool() { Type::Bool } else { left.ty };
                AnalyzedExpr::new(
                    AnalyzedExprKind::Binary {
                        op: *op,
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    ty,
                    expr.span,
                )
            }
        }
    }

    fn analyze_call(&mut self, name: &str, args: &[Expr], span: Span) -> AnalyzedExpr {
        let signature = self.scope.lookup_function(name).cloned();

        let args: Vec<AnalyzedExpr> = args.iter().map(|arg| self.analyze_expr(arg)).collect();

        let ty = match signature {
            Some(symbol) => {
                let matches = args.len() == symbol.param_types.len()
                    && args
                        .iter()
                        .zip(&symbol.param_types)
                        .all(|(arg, param)| arg.ty == *param);
                if !matches {
                    let actual: Vec<String> = args.iter().map(|arg| arg.ty.to_string()).collect();
                    self.error(
                        format!(
                            "argument type mismatch: expected {}, found {}({})",
                            symbol.signature(),
                            name,
                            actual.join(", ")
                        ),
                        span,
                    );
                }
                // The call still evaluates to the declared return type
                symbol.return_type
            }
            None => {
                self.error(format!("undefined function '{}'", name), span);
                Type::Void
            }
        };

        AnalyzedExpr::new(
            AnalyzedExprKind::Call {
                name: name.to_string(),
                args,
            },
            ty,
            span,
        )
    }
}

fn is_literal_true(expr: &AnalyzedExpr) -> bool {
    matches!(expr.kind, AnalyzedExprKind::BoolLiteral(true))
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
