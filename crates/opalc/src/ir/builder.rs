//! IR builder - lowers the analyzed program to a control-flow graph

use super::inst::*;
use crate::ast::{BinaryOp, UnaryOp};
use crate::sema::{
    AnalyzedExpr, AnalyzedExprKind, AnalyzedFunction, AnalyzedProgram, AnalyzedStmt,
    AnalyzedStmtKind,
};
use crate::types::Type;

/// Lowers one function at a time; temp ids restart at zero per function.
pub struct IrBuilder {
    func: IrFunction,
    next_temp: u32,
}

impl IrBuilder {
    /// Lower a whole analyzed program. The input must be diagnostic-free.
    pub fn build(program: &AnalyzedProgram) -> IrModule {
        IrModule {
            functions: program.functions.iter().map(Self::build_function).collect(),
        }
    }

    fn build_function(func: &AnalyzedFunction) -> IrFunction {
        let params: Vec<Type> = func.params.iter().map(|p| p.ty).collect();
        let mut builder = IrBuilder {
            func: IrFunction::new(func.name.clone(), func.return_type, params),
            next_temp: 0,
        };

        // Slot table straight from the analyzer, indices preserved
        for local in &func.locals {
            builder.func.locals.push(IrLocal {
                index: local.index,
                name: local.name.clone(),
                ty: local.ty,
            });
        }

        let entry = builder.add_block("entry");
        let exit = builder.build_stmt(&func.body, entry);

        // Only a void function may fall off the end
        if !func.body.has_guaranteed_return {
            builder.terminate(exit, Terminator::Return(None));
        }

        builder.func
    }

    fn add_block(&mut self, label: &str) -> BlockId {
        self.func.add_block(label)
    }

    fn push(&mut self, block: BlockId, inst: Inst) {
        self.func.block_mut(block).push(inst);
    }

    fn terminate(&mut self, block: BlockId, terminator: Terminator) {
        self.func.block_mut(block).terminate(terminator);
    }

    fn new_temp(&mut self, ty: Type) -> Temp {
        let id = self.next_temp;
        self.next_temp += 1;
        Temp { id, ty }
    }

    /// Lower a statement into `block`, returning the block where control
    /// continues afterwards.
    fn build_stmt(&mut self, stmt: &AnalyzedStmt, block: BlockId) -> BlockId {
        match &stmt.kind {
            AnalyzedStmtKind::Block(stmts) => stmts
                .iter()
                .fold(block, |cursor, stmt| self.build_stmt(stmt, cursor)),
            AnalyzedStmtKind::Declaration { index, init, .. } => match init {
                Some(init) => {
                    let (value, cursor) = self.build_expr(init, block);
                    self.push(cursor, Inst::Store {
                        index: *index,
                        value,
                    });
                    cursor
                }
                None => block,
            },
            AnalyzedStmtKind::Assignment { index, value, .. } => {
                let (value, cursor) = self.build_expr(value, block);
                self.push(cursor, Inst::Store {
                    index: *index,
                    value,
                });
                cursor
            }
            AnalyzedStmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.build_if(condition, then_branch, else_branch.as_deref(), block),
            AnalyzedStmtKind::While { condition, body } => self.build_while(condition, body, block),
            AnalyzedStmtKind::DoWhile { body, condition } => {
                self.build_do_while(body, condition, block)
            }
            AnalyzedStmtKind::For {
                init,
                condition,
                update,
                body,
            } => self.build_for(
                init.as_deref(),
                condition.as_ref(),
                update.as_deref(),
                body,
                block,
            ),
            AnalyzedStmtKind::Return(value) => {
                let (value, cursor) = match value {
                    Some(expr) => {
                        let (value, cursor) = self.build_expr(expr, block);
                        (Some(value), cursor)
                    }
                    None => (None, block),
                };
                self.terminate(cursor, Terminator::Return(value));
                // Control never continues past a return; anything the
                // enclosing construct wires up lands in a sink
                self.add_block("unreachable")
            }
            AnalyzedStmtKind::Expression(expr) => self.build_expr(expr, block).1,
        }
    }

    fn build_if(
        &mut self,
        condition: &AnalyzedExpr,
        then_branch: &AnalyzedStmt,
        else_branch: Option<&AnalyzedStmt>,
        block: BlockId,
    ) -> BlockId {
        let (cond, cond_exit) = self.build_expr(condition, block);

        let then_block = self.add_block("if.then");
        let else_block = else_branch.map(|_| self.add_block("if.else"));
        let merge = self.add_block("if.merge");

        self.terminate(cond_exit, Terminator::CondBranch {
            cond,
            then_block,
            else_block: else_block.unwrap_or(merge),
        });

        let then_exit = self.build_stmt(then_branch, then_block);
        let else_exit = else_branch
            .zip(else_block)
            .map(|(stmt, block)| self.build_stmt(stmt, block));

        // When both sides return, the merge stays unwired and dead
        let both_return = then_branch.has_guaranteed_return
            && else_branch.is_some_and(|stmt| stmt.has_guaranteed_return);
        if !both_return {
            self.terminate(then_exit, Terminator::Branch(merge));
            if let Some(else_exit) = else_exit {
                self.terminate(else_exit, Terminator::Branch(merge));
            }
        }

        merge
    }

    fn build_while(
        &mut self,
        condition: &AnalyzedExpr,
        body: &AnalyzedStmt,
        block: BlockId,
    ) -> BlockId {
        // Test before the first iteration
        let cond_block = self.add_block("while.cond");
        self.terminate(block, Terminator::Branch(cond_block));

        let (cond, cond_exit) = self.build_expr(condition, cond_block);
        let body_block = self.add_block("while.body");
        let exit_block = self.add_block("while.exit");
        self.terminate(cond_exit, Terminator::CondBranch {
            cond,
            then_block: body_block,
            else_block: exit_block,
        });

        let body_exit = self.build_stmt(body, body_block);
        self.terminate(body_exit, Terminator::Branch(cond_block));

        exit_block
    }

    fn build_do_while(
        &mut self,
        body: &AnalyzedStmt,
        condition: &AnalyzedExpr,
        block: BlockId,
    ) -> BlockId {
        // The body runs before the first test
        let body_block = self.add_block("do.body");
        self.terminate(block, Terminator::Branch(body_block));
        let body_exit = self.build_stmt(body, body_block);

        let cond_block = self.add_block("do.cond");
        self.terminate(body_exit, Terminator::Branch(cond_block));

        let (cond, cond_exit) = self.build_expr(condition, cond_block);
        let exit_block = self.add_block("do.exit");
        self.terminate(cond_exit, Terminator::CondBranch {
            cond,
            then_block: body_block,
            else_block: exit_block,
        });

        exit_block
    }

    fn build_for(
        &mut self,
        init: Option<&AnalyzedStmt>,
        condition: Option<&AnalyzedExpr>,
        update: Option<&AnalyzedStmt>,
        body: &AnalyzedStmt,
        block: BlockId,
    ) -> BlockId {
        let mut cursor = block;
        if let Some(init) = init {
            cursor = self.build_stmt(init, cursor);
        }

        // Without a condition the body repeats unconditionally; only a
        // return inside it leaves the loop
        let (loop_head, body_block, exit_block) = match condition {
            Some(condition) => {
                let cond_block = self.add_block("for.cond");
                self.terminate(cursor, Terminator::Branch(cond_block));
                let (cond, cond_exit) = self.build_expr(condition, cond_block);
                let body_block = self.add_block("for.body");
                let exit_block = self.add_block("for.exit");
                self.terminate(cond_exit, Terminator::CondBranch {
                    cond,
                    then_block: body_block,
                    else_block: exit_block,
                });
                (cond_block, body_block, exit_block)
            }
            None => {
                let body_block = self.add_block("for.body");
                self.terminate(cursor, Terminator::Branch(body_block));
                let exit_block = self.add_block("for.exit");
                (body_block, body_block, exit_block)
            }
        };

        let mut body_exit = self.build_stmt(body, body_block);
        if let Some(update) = update {
            body_exit = self.build_stmt(update, body_exit);
        }
        self.terminate(body_exit, Terminator::Branch(loop_head));

        exit_block
    }

    /// Lower an expression, returning its value and the block where
    /// evaluation ends.
    fn build_expr(&mut self, expr: &AnalyzedExpr, block: BlockId) -> (Value, BlockId) {
        match &expr.kind {
            AnalyzedExprKind::IntLiteral(value) => (
                Value::IntConst {
                    value: *value,
                    ty: expr.ty,
                },
                block,
            ),
            AnalyzedExprKind::FloatLiteral(value) => (
                Value::FloatConst {
                    value: *value,
                    ty: expr.ty,
                },
                block,
            ),
            AnalyzedExprKind::BoolLiteral(value) => (Value::BoolConst(*value), block),
            AnalyzedExprKind::Variable { index, .. } => (
                Value::LocalPtr {
                    ty: expr.ty,
                    index: *index,
                },
                block,
            ),
            AnalyzedExprKind::Call { name, args } => {
                let mut cursor = block;
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    let (value, next) = self.build_expr(arg, cursor);
                    values.push(value);
                    cursor = next;
                }

                let dst = (expr.ty != Type::Void).then(|| self.new_temp(expr.ty));
                self.push(cursor, Inst::Call {
                    dst,
                    func: name.clone(),
                    args: values,
                });

                // A void call produces no value; nothing downstream reads
                // the placeholder
                let value = dst.map_or(Value::BoolConst(false), Value::Temp);
                (value, cursor)
            }
            AnalyzedExprKind::Unary { op, operand } => {
                let (src, cursor) = self.build_expr(operand, block);
                let dst = self.new_temp(expr.ty);
                let op = match op {
                    UnaryOp::Neg => UnOp::Neg,
                    UnaryOp::Not | UnaryOp::BitNot => UnOp::Not,
                };
                self.push(cursor, Inst::Unary { dst, op, src });
                (Value::Temp(dst), cursor)
            }
            AnalyzedExprKind::Binary { op, left, right } => match op {
                BinaryOp::And | BinaryOp::Or => self.build_logical_expr(*op, left, right, block),
                _ => self.build_binary_expr(expr, *op, left, right, block),
            },
        }
    }

    fn build_binary_expr(
        &mut self,
        expr: &AnalyzedExpr,
        op: BinaryOp,
        left: &AnalyzedExpr,
        right: &AnalyzedExpr,
        block: BlockId,
    ) -> (Value, BlockId) {
        let (lhs, cursor) = self.build_expr(left, block);
        let (rhs, cursor) = self.build_expr(right, cursor);
        let dst = self.new_temp(expr.ty);

        let inst = match op {
            BinaryOp::Lt => Inst::Cmp {
                dst,
                kind: CmpKind::Lt,
                left: lhs,
                right: rhs,
            },
            BinaryOp::Le => Inst::Cmp {
                dst,
                kind: CmpKind::Le,
                left: lhs,
                right: rhs,
            },
            BinaryOp::Gt => Inst::Cmp {
                dst,
                kind: CmpKind::Gt,
                left: lhs,
                right: rhs,
            },
            BinaryOp::Ge => Inst::Cmp {
                dst,
                kind: CmpKind::Ge,
                left: lhs,
                right: rhs,
            },
            BinaryOp::Eq => Inst::Cmp {
                dst,
                kind: CmpKind::Eq,
                left: lhs,
                right: rhs,
            },
            BinaryOp::Ne => Inst::Cmp {
                dst,
                kind: CmpKind::Ne,
                left: lhs,
                right: rhs,
            },
            _ => {
                let op = match op {
                    BinaryOp::Add => BinOp::Add,
                    BinaryOp::Sub => BinOp::Sub,
                    BinaryOp::Mul => BinOp::Mul,
                    BinaryOp::Div => BinOp::Div,
                    BinaryOp::Mod => BinOp::Mod,
                    BinaryOp::BitAnd => BinOp::And,
                    BinaryOp::BitOr => BinOp::Or,
                    BinaryOp::BitXor => BinOp::Xor,
                    BinaryOp::Shl => BinOp::Shl,
                    BinaryOp::Shr => BinOp::Shr,
                    _ => unreachable!(),
                };
                Inst::Binary {
                    dst,
                    op,
                    left: lhs,
                    right: rhs,
                }
            }
        };
        self.push(cursor, inst);
        (Value::Temp(dst), cursor)
    }

    /// Short-circuit lowering: the right operand only evaluates on the
    /// path that needs it, and a phi merges the two results.
    fn build_logical_expr(
        &mut self,
        op: BinaryOp,
        left: &AnalyzedExpr,
        right: &AnalyzedExpr,
        block: BlockId,
    ) -> (Value, BlockId) {
        let (lhs, left_exit) = self.build_expr(left, block);

        let (rhs_block, merge) = match op {
            BinaryOp::And => {
                let rhs_block = self.add_block("and.rhs");
                let merge = self.add_block("and.merge");
                // A false left operand skips the right entirely
                self.terminate(left_exit, Terminator::CondBranch {
                    cond: lhs,
                    then_block: rhs_block,
                    else_block: merge,
                });
                (rhs_block, merge)
            }
            BinaryOp::Or => {
                let rhs_block = self.add_block("or.rhs");
                let merge = self.add_block("or.merge");
                // A true left operand skips the right entirely
                self.terminate(left_exit, Terminator::CondBranch {
                    cond: lhs,
                    then_block: merge,
                    else_block: rhs_block,
                });
                (rhs_block, merge)
            }
            _ => unreachable!(),
        };

        let (rhs, right_exit) = self.build_expr(right, rhs_block);
        self.terminate(right_exit, Terminator::Branch(merge));

        let dst = self.new_temp(Type::Bool);
        self.push(merge, Inst::Phi {
            dst,
            incoming: [(left_exit, lhs), (right_exit, rhs)],
        });

        (Value::Temp(dst), merge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::sema::SemanticAnalyzer;

    fn build_source(source: &str) -> IrModule {
        let program = Parser::new(source).unwrap().parse().unwrap();
        let analyzed = SemanticAnalyzer::new().analyze(&program).unwrap();
        IrBuilder::build(&analyzed)
    }

    #[test]
    fn test_add_function() {
        let module = build_source("int add(int a, int b) { return a + b; }");
        let func = &module.functions[0];
        assert_eq!(func.name, "add");
        assert_eq!(func.params, vec![Type::Int, Type::Int]);
        assert_eq!(func.locals.len(), 2);
        // entry plus the sink after the return
        assert_eq!(func.blocks.len(), 2);

        let entry = &func.blocks[0];
        assert_eq!(entry.instructions, vec![Inst::Binary {
            dst: Temp {
                id: 0,
                ty: Type::Int
            },
            op: BinOp::Add,
            left: Value::LocalPtr {
                ty: Type::Int,
                index: 0
            },
            right: Value::LocalPtr {
                ty: Type::Int,
                index: 1
            },
        }]);
        assert_eq!(
            entry.terminator,
            Some(Terminator::Return(Some(Value::Temp(Temp {
                id: 0,
                ty: Type::Int
            }))))
        );
        assert!(!func.blocks[1].is_terminated());
    }

    #[test]
    fn test_if_lowering() {
        let module = build_source(
            "int main() {
                int x = 10;
                if (x > 5) {
                    return 1;
                }
                return 0;
            }",
        );
        let func = &module.functions[0];
        assert_eq!(func.blocks.len(), 5);

        let entry = &func.blocks[0];
        assert_eq!(entry.instructions.len(), 2);
        assert!(matches!(entry.instructions[1], Inst::Cmp {
            kind: CmpKind::Gt,
            ..
        }));
        assert_eq!(
            entry.terminator,
            Some(Terminator::CondBranch {
                cond: Value::Temp(Temp {
                    id: 0,
                    ty: Type::Bool
                }),
                then_block: BlockId(1),
                else_block: BlockId(2),
            })
        );

        // The then-branch returns; its sink still gets wired to the merge
        assert_eq!(
            func.blocks[1].terminator,
            Some(Terminator::Return(Some(Value::IntConst {
                value: 1,
                ty: Type::Int
            })))
        );
        assert_eq!(
            func.blocks[3].terminator,
            Some(Terminator::Branch(BlockId(2)))
        );
        assert_eq!(
            func.blocks[2].terminator,
            Some(Terminator::Return(Some(Value::IntConst {
                value: 0,
                ty: Type::Int
            })))
        );
        assert!(!func.blocks[4].is_terminated());
    }

    #[test]
    fn test_both_branches_return() {
        let module = build_source(
            "int f(bool c) {
                if (c) {
                    return 1;
                } else {
                    return 2;
                }
            }",
        );
        let func = &module.functions[0];
        // entry, then, else, merge, two sinks
        assert_eq!(func.blocks.len(), 6);
        let terminated: Vec<usize> = func
            .blocks
            .iter()
            .filter(|b| b.is_terminated())
            .map(|b| b.id.0)
            .collect();
        assert_eq!(terminated, vec![0, 1, 2]);

        // The dead merge never shows up in the text
        let text = func.to_string();
        assert!(!text.contains("bb3"));
    }

    #[test]
    fn test_short_circuit_and() {
        let module = build_source("bool f(bool a, bool b) { return a && b; }");
        let func = &module.functions[0];

        let l0 = Value::LocalPtr {
            ty: Type::Bool,
            index: 0,
        };
        let l1 = Value::LocalPtr {
            ty: Type::Bool,
            index: 1,
        };

        // A false left operand jumps straight to the merge
        assert_eq!(
            func.blocks[0].terminator,
            Some(Terminator::CondBranch {
                cond: l0,
                then_block: BlockId(1),
                else_block: BlockId(2),
            })
        );
        assert!(func.blocks[1].instructions.is_empty());
        assert_eq!(
            func.blocks[1].terminator,
            Some(Terminator::Branch(BlockId(2)))
        );
        assert_eq!(func.blocks[2].instructions[0], Inst::Phi {
            dst: Temp {
                id: 0,
                ty: Type::Bool
            },
            incoming: [(BlockId(0), l0), (BlockId(1), l1)],
        });
    }

    #[test]
    fn test_short_circuit_or() {
        let module = build_source("bool f(bool a, bool b) { return a || b; }");
        let func = &module.functions[0];

        let l0 = Value::LocalPtr {
            ty: Type::Bool,
            index: 0,
        };
        let l1 = Value::LocalPtr {
            ty: Type::Bool,
            index: 1,
        };

        // A true left operand jumps straight to the merge
        assert_eq!(
            func.blocks[0].terminator,
            Some(Terminator::CondBranch {
                cond: l0,
                then_block: BlockId(2),
                else_block: BlockId(1),
            })
        );
        assert_eq!(func.blocks[2].instructions[0], Inst::Phi {
            dst: Temp {
                id: 0,
                ty: Type::Bool
            },
            incoming: [(BlockId(0), l0), (BlockId(1), l1)],
        });
    }

    #[test]
    fn test_while_wiring() {
        let module = build_source(
            "int f() {
                int i = 0;
                while (i < 10) {
                    i = i + 1;
                }
                return i;
            }",
        );
        let func = &module.functions[0];
        assert_eq!(func.blocks.len(), 5);
        assert_eq!(
            func.blocks[0].terminator,
            Some(Terminator::Branch(BlockId(1)))
        );
        assert_eq!(
            func.blocks[1].terminator,
            Some(Terminator::CondBranch {
                cond: Value::Temp(Temp {
                    id: 0,
                    ty: Type::Bool
                }),
                then_block: BlockId(2),
                else_block: BlockId(3),
            })
        );
        // Back-edge into the condition block
        assert_eq!(
            func.blocks[2].terminator,
            Some(Terminator::Branch(BlockId(1)))
        );
        assert_eq!(
            func.blocks[3].terminator,
            Some(Terminator::Return(Some(Value::LocalPtr {
                ty: Type::Int,
                index: 0
            })))
        );
    }

    #[test]
    fn test_do_while_wiring() {
        let module = build_source(
            "int f() {
                int i = 0;
                do {
                    i = i + 1;
                } while (i < 3);
                return i;
            }",
        );
        let func = &module.functions[0];
        // The body runs first, then the condition decides
        assert_eq!(
            func.blocks[0].terminator,
            Some(Terminator::Branch(BlockId(1)))
        );
        assert_eq!(
            func.blocks[1].terminator,
            Some(Terminator::Branch(BlockId(2)))
        );
        assert!(matches!(
            func.blocks[2].terminator,
            Some(Terminator::CondBranch {
                then_block: BlockId(1),
                else_block: BlockId(3),
                ..
            })
        ));
    }

    #[test]
    fn test_for_wiring() {
        let module = build_source(
            "int f() {
                int s = 0;
                for (int i = 0; i < 3; i = i + 1) {
                    s = s + i;
                }
                return s;
            }",
        );
        let func = &module.functions[0];
        assert_eq!(func.locals.len(), 2);
        assert_eq!(func.blocks.len(), 5);

        // Both stores land in the entry, then control enters the condition
        assert_eq!(func.blocks[0].instructions.len(), 2);
        assert_eq!(
            func.blocks[0].terminator,
            Some(Terminator::Branch(BlockId(1)))
        );
        // Body plus update before the back-edge
        assert_eq!(func.blocks[2].instructions.len(), 4);
        assert_eq!(
            func.blocks[2].terminator,
            Some(Terminator::Branch(BlockId(1)))
        );
    }

    #[test]
    fn test_for_without_condition() {
        let module = build_source("int f() { for (;;) { return 1; } }");
        let func = &module.functions[0];

        // Entry jumps straight into the body
        assert_eq!(
            func.blocks[0].terminator,
            Some(Terminator::Branch(BlockId(1)))
        );
        assert_eq!(
            func.blocks[1].terminator,
            Some(Terminator::Return(Some(Value::IntConst {
                value: 1,
                ty: Type::Int
            })))
        );
        // The loop exit is never branched to
        assert!(!func.blocks[2].is_terminated());
        // The back-edge lands in the sink left behind by the return
        assert_eq!(
            func.blocks[3].terminator,
            Some(Terminator::Branch(BlockId(1)))
        );
    }

    #[test]
    fn test_void_call_and_implicit_return() {
        let module = build_source(
            "void log() { }
            void main() { log(); }",
        );
        let log = &module.functions[0];
        assert_eq!(log.blocks[0].terminator, Some(Terminator::Return(None)));

        let main = &module.functions[1];
        assert_eq!(main.blocks[0].instructions, vec![Inst::Call {
            dst: None,
            func: "log".to_string(),
            args: vec![],
        }]);
        assert_eq!(main.blocks[0].terminator, Some(Terminator::Return(None)));
    }

    #[test]
    fn test_call_argument_threading() {
        let module = build_source("int f(int x) { return f(x + 1); }");
        let func = &module.functions[0];
        let entry = &func.blocks[0];

        assert_eq!(entry.instructions.len(), 2);
        assert!(matches!(entry.instructions[0], Inst::Binary {
            op: BinOp::Add,
            ..
        }));
        assert_eq!(entry.instructions[1], Inst::Call {
            dst: Some(Temp {
                id: 1,
                ty: Type::Int
            }),
            func: "f".to_string(),
            args: vec![Value::Temp(Temp {
                id: 0,
                ty: Type::Int
            })],
        });
    }

    #[test]
    fn test_unary_lowering() {
        let module = build_source("int f(int x) { return -x; }");
        let func = &module.functions[0];
        assert_eq!(func.blocks[0].instructions[0], Inst::Unary {
            dst: Temp {
                id: 0,
                ty: Type::Int
            },
            op: UnOp::Neg,
            src: Value::LocalPtr {
                ty: Type::Int,
                index: 0
            },
        });
    }

    #[test]
    fn test_bitwise_and_logical_not_share_opcode() {
        let module = build_source(
            "bool f(bool b) { return !b; }
            int g(int x) { return ~x; }",
        );
        assert!(matches!(
            module.functions[0].blocks[0].instructions[0],
            Inst::Unary { op: UnOp::Not, .. }
        ));
        assert!(matches!(
            module.functions[1].blocks[0].instructions[0],
            Inst::Unary { op: UnOp::Not, .. }
        ));
    }

    #[test]
    fn test_build_twice_is_identical() {
        let program = Parser::new("int f(int x) { if (x > 0) { return x; } return -x; }")
            .unwrap()
            .parse()
            .unwrap();
        let analyzed = SemanticAnalyzer::new().analyze(&program).unwrap();
        assert_eq!(IrBuilder::build(&analyzed), IrBuilder::build(&analyzed));
    }
}
