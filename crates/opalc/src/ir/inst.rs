//! IR value, instruction and block definitions
//!
//! The `Display` impls double as the serializer: `IrModule` renders to
//! the stable text form used by the golden-file tests.

use crate::types::Type;

/// Identifier of a basic block within its function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(pub usize);

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bb{}", self.0)
    }
}

/// A typed temporary (virtual register)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Temp {
    pub id: u32,
    pub ty: Type,
}

impl std::fmt::Display for Temp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "%t{}", self.id)
    }
}

/// An IR operand
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// A computed value, never backed by named storage
    Temp(Temp),
    /// Handle to a local variable's slot
    LocalPtr { ty: Type, index: u32 },
    IntConst { value: u64, ty: Type },
    FloatConst { value: f64, ty: Type },
    BoolConst(bool),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Temp(t) => write!(f, "{}", t),
            Value::LocalPtr { index, .. } => write!(f, "%l{}", index),
            Value::IntConst { value, .. } => write!(f, "{}", value),
            // {:?} is the shortest form that round-trips and always
            // keeps a decimal point (10.0, 3.14)
            Value::FloatConst { value, .. } => write!(f, "{:?}", value),
            Value::BoolConst(b) => write!(f, "{}", b),
        }
    }
}

/// Arithmetic and bitwise opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Xor,
    Shl,
    Shr,
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinOp::Add => write!(f, "add"),
            BinOp::Sub => write!(f, "sub"),
            BinOp::Mul => write!(f, "mul"),
            BinOp::Div => write!(f, "div"),
            BinOp::Mod => write!(f, "mod"),
            BinOp::And => write!(f, "and"),
            BinOp::Or => write!(f, "or"),
            BinOp::Xor => write!(f, "xor"),
            BinOp::Shl => write!(f, "shl"),
            BinOp::Shr => write!(f, "shr"),
        }
    }
}

/// Comparison kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpKind {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl std::fmt::Display for CmpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CmpKind::Lt => write!(f, "lt"),
            CmpKind::Le => write!(f, "le"),
            CmpKind::Gt => write!(f, "gt"),
            CmpKind::Ge => write!(f, "ge"),
            CmpKind::Eq => write!(f, "eq"),
            CmpKind::Ne => write!(f, "ne"),
        }
    }
}

/// Unary opcodes. Logical and bitwise not share `Not`; the operand
/// type tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

impl std::fmt::Display for UnOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnOp::Neg => write!(f, "neg"),
            UnOp::Not => write!(f, "not"),
        }
    }
}

/// A non-terminating instruction
#[derive(Debug, Clone, PartialEq)]
pub enum Inst {
    /// dst = op left, right
    Binary {
        dst: Temp,
        op: BinOp,
        left: Value,
        right: Value,
    },

    /// dst = cmp kind left, right
    Cmp {
        dst: Temp,
        kind: CmpKind,
        left: Value,
        right: Value,
    },

    /// dst = op src
    Unary { dst: Temp, op: UnOp, src: Value },

    /// Write a value into a local slot
    Store { index: u32, value: Value },

    /// dst = call @func(args); no destination for void calls
    Call {
        dst: Option<Temp>,
        func: String,
        args: Vec<Value>,
    },

    /// dst = value from whichever predecessor control arrived from
    Phi {
        dst: Temp,
        incoming: [(BlockId, Value); 2],
    },
}

impl std::fmt::Display for Inst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Inst::Binary {
                dst,
                op,
                left,
                right,
            } => write!(f, "{} = {} {}, {}", dst, op, left, right),
            Inst::Cmp {
                dst,
                kind,
                left,
                right,
            } => write!(f, "{} = cmp {} {}, {}", dst, kind, left, right),
            Inst::Unary { dst, op, src } => write!(f, "{} = {} {}", dst, op, src),
            Inst::Store { index, value } => write!(f, "store %l{}, {}", index, value),
            Inst::Call { dst, func, args } => {
                if let Some(dst) = dst {
                    write!(f, "{} = call @{}(", dst, func)?;
                } else {
                    write!(f, "call @{}(", func)?;
                }
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Inst::Phi { dst, incoming } => {
                write!(f, "{} = phi", dst)?;
                for (i, (pred, value)) in incoming.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " [ {}, {} ]", pred, value)?;
                }
                Ok(())
            }
        }
    }
}

/// The closing instruction of a block, determining its successors
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Terminator {
    /// br target
    Branch(BlockId),

    /// br cond, taken, not-taken
    CondBranch {
        cond: Value,
        then_block: BlockId,
        else_block: BlockId,
    },

    /// ret value / ret void
    Return(Option<Value>),
}

impl std::fmt::Display for Terminator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Terminator::Branch(target) => write!(f, "br {}", target),
            Terminator::CondBranch {
                cond,
                then_block,
                else_block,
            } => write!(f, "br {}, {}, {}", cond, then_block, else_block),
            Terminator::Return(Some(value)) => write!(f, "ret {}", value),
            Terminator::Return(None) => write!(f, "ret void"),
        }
    }
}

/// A straight-line instruction sequence with at most one terminator
#[derive(Debug, Clone, PartialEq)]
pub struct BasicBlock {
    pub id: BlockId,
    pub label: String,
    pub instructions: Vec<Inst>,
    pub terminator: Option<Terminator>,
}

impl BasicBlock {
    pub fn new(id: BlockId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            instructions: Vec::new(),
            terminator: None,
        }
    }

    pub fn push(&mut self, inst: Inst) {
        self.instructions.push(inst);
    }

    /// Set the terminator. A block keeps its first terminator; later
    /// calls are no-ops.
    pub fn terminate(&mut self, terminator: Terminator) {
        if self.terminator.is_none() {
            self.terminator = Some(terminator);
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.terminator.is_some()
    }
}

impl std::fmt::Display for BasicBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  {}:  ; {}", self.id, self.label)?;
        for inst in &self.instructions {
            writeln!(f, "    {}", inst)?;
        }
        if let Some(terminator) = &self.terminator {
            writeln!(f, "    {}", terminator)?;
        }
        Ok(())
    }
}

/// Entry in a function's local slot table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrLocal {
    pub index: u32,
    pub name: String,
    pub ty: Type,
}

/// A function lowered to basic blocks
#[derive(Debug, Clone, PartialEq)]
pub struct IrFunction {
    pub name: String,
    pub return_type: Type,
    pub params: Vec<Type>,
    pub locals: Vec<IrLocal>,
    pub blocks: Vec<BasicBlock>,
}

impl IrFunction {
    pub fn new(name: impl Into<String>, return_type: Type, params: Vec<Type>) -> Self {
        Self {
            name: name.into(),
            return_type,
            params,
            locals: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// Allocate a fresh empty block; ids are positions in the block list
    pub fn add_block(&mut self, label: impl Into<String>) -> BlockId {
        let id = BlockId(self.blocks.len());
        self.blocks.push(BasicBlock::new(id, label));
        id
    }

    pub fn block_mut(&mut self, id: BlockId) -> &mut BasicBlock {
        &mut self.blocks[id.0]
    }
}

impl std::fmt::Display for IrFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "define {} @{}(", self.return_type, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        writeln!(f, ") {{")?;

        for local in &self.locals {
            writeln!(f, "    local %l{} : {}", local.index, local.ty)?;
        }

        // Blocks that never received a terminator are construction
        // leftovers (unwired merges, post-return sinks) and are skipped
        for block in &self.blocks {
            if block.is_terminated() {
                write!(f, "{}", block)?;
            }
        }

        writeln!(f, "}}")
    }
}

/// A compiled module: one `IrFunction` per source function
#[derive(Debug, Clone, PartialEq)]
pub struct IrModule {
    pub functions: Vec<IrFunction>,
}

impl IrModule {
    pub fn new() -> Self {
        Self {
            functions: Vec::new(),
        }
    }
}

impl Default for IrModule {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for IrModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, func) in self.functions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", func)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        let temp = Temp {
            id: 0,
            ty: Type::Int,
        };
        assert_eq!(Value::Temp(temp).to_string(), "%t0");
        assert_eq!(
            Value::LocalPtr {
                ty: Type::Int,
                index: 2
            }
            .to_string(),
            "%l2"
        );
        assert_eq!(
            Value::IntConst {
                value: 42,
                ty: Type::Int
            }
            .to_string(),
            "42"
        );
        assert_eq!(
            Value::FloatConst {
                value: 10.0,
                ty: Type::Double
            }
            .to_string(),
            "10.0"
        );
        assert_eq!(
            Value::FloatConst {
                value: 3.14,
                ty: Type::Double
            }
            .to_string(),
            "3.14"
        );
        assert_eq!(Value::BoolConst(true).to_string(), "true");
    }

    #[test]
    fn test_inst_display() {
        let t0 = Temp {
            id: 0,
            ty: Type::Int,
        };
        let l0 = Value::LocalPtr {
            ty: Type::Int,
            index: 0,
        };
        let l1 = Value::LocalPtr {
            ty: Type::Int,
            index: 1,
        };

        let add = Inst::Binary {
            dst: t0,
            op: BinOp::Add,
            left: l0,
            right: l1,
        };
        assert_eq!(add.to_string(), "%t0 = add %l0, %l1");

        let cmp = Inst::Cmp {
            dst: t0,
            kind: CmpKind::Gt,
            left: l0,
            right: Value::IntConst {
                value: 5,
                ty: Type::Int,
            },
        };
        assert_eq!(cmp.to_string(), "%t0 = cmp gt %l0, 5");

        let store = Inst::Store {
            index: 0,
            value: Value::Temp(t0),
        };
        assert_eq!(store.to_string(), "store %l0, %t0");

        let call = Inst::Call {
            dst: Some(t0),
            func: "f".to_string(),
            args: vec![l0, Value::IntConst {
                value: 1,
                ty: Type::Int,
            }],
        };
        assert_eq!(call.to_string(), "%t0 = call @f(%l0, 1)");

        let void_call = Inst::Call {
            dst: None,
            func: "g".to_string(),
            args: vec![],
        };
        assert_eq!(void_call.to_string(), "call @g()");

        let phi = Inst::Phi {
            dst: Temp {
                id: 3,
                ty: Type::Bool,
            },
            incoming: [(BlockId(0), l0), (BlockId(1), l1)],
        };
        assert_eq!(phi.to_string(), "%t3 = phi [ bb0, %l0 ], [ bb1, %l1 ]");
    }

    #[test]
    fn test_terminator_display() {
        let t0 = Temp {
            id: 0,
            ty: Type::Bool,
        };
        assert_eq!(Terminator::Branch(BlockId(1)).to_string(), "br bb1");
        assert_eq!(
            Terminator::CondBranch {
                cond: Value::Temp(t0),
                then_block: BlockId(1),
                else_block: BlockId(2),
            }
            .to_string(),
            "br %t0, bb1, bb2"
        );
        assert_eq!(
            Terminator::Return(Some(Value::Temp(t0))).to_string(),
            "ret %t0"
        );
        assert_eq!(Terminator::Return(None).to_string(), "ret void");
    }

    #[test]
    fn test_terminator_is_set_once() {
        let mut block = BasicBlock::new(BlockId(0), "entry");
        block.terminate(Terminator::Branch(BlockId(1)));
        block.terminate(Terminator::Return(None));
        assert_eq!(block.terminator, Some(Terminator::Branch(BlockId(1))));
    }

    #[test]
    fn test_unterminated_blocks_skipped() {
        let mut func = IrFunction::new("f", Type::Void, vec![]);
        let entry = func.add_block("entry");
        func.add_block("unreachable");
        func.block_mut(entry).terminate(Terminator::Return(None));

        let text = func.to_string();
        assert!(text.contains("bb0:  ; entry"));
        assert!(!text.contains("bb1"));
    }
}
