use std::collections::BTreeSet;
use std::fmt::Write as _;

use super::runtime::{self, Helper};
use super::{Callee, CodeSink, LoopJump, Operand, VarRef};
use crate::builtins::Builtin;
use crate::diagnostics::CompileError;
use crate::lexer::{Literal, TokenKind};
use crate::precedence::{ExprNode, ExprTree};
use crate::symtable::SymbolTable;
use crate::typeck::types::{DataType, ExprType};

const HEADER: &str = "\
.IFJcode24
DEFVAR GF@%tmp0
DEFVAR GF@%tmp1
DEFVAR GF@%trash
CREATEFRAME
CALL $main
EXIT int@0
";

/// Function currently being lowered. `DEFVAR`s are collected separately and
/// placed right after `PUSHFRAME` so a loop body never redefines a variable.
struct FunctionBuf {
    name: String,
    params: Vec<VarRef>,
    defvars: Vec<String>,
    body: String,
}

/// Lowers parser callbacks to IFJcode24 stack code.
#[derive(Default)]
pub struct IfjCodeGen {
    functions: String,
    current: Option<FunctionBuf>,
    helpers: BTreeSet<Helper>,
}

impl IfjCodeGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Complete program: header, user functions, then the helper routines
    /// that were referenced.
    pub fn finish(self) -> String {
        let mut out = String::from(HEADER);
        out.push_str(&self.functions);
        for helper in &self.helpers {
            out.push('\n');
            out.push_str(helper.body());
        }
        out
    }

    fn emit(&mut self, line: impl AsRef<str>) {
        let target = match &mut self.current {
            Some(f) => &mut f.body,
            None => &mut self.functions,
        };
        target.push_str(line.as_ref());
        target.push('\n');
    }

    /// Pushes the tree's value: operands, then their operator, in postorder.
    fn push_tree(&mut self, tree: &ExprTree, table: &SymbolTable) -> Result<(), CompileError> {
        for id in tree.postorder() {
            let node = tree.node(id);
            if node.is_leaf() {
                let value = leaf_operand(node, table)?;
                self.emit(format!("PUSHS {}", runtime::operand(&value)));
            } else {
                self.operator(node);
            }
            if node.widen {
                self.emit("INT2FLOATS");
            }
        }
        Ok(())
    }

    fn operator(&mut self, node: &ExprNode) {
        let int_result = node.ty == Some(ExprType::Value(DataType::Int));
        let code: &[&str] = match node.token.kind {
            TokenKind::Plus => &["ADDS"],
            TokenKind::Minus => &["SUBS"],
            TokenKind::Star => &["MULS"],
            TokenKind::Slash if int_result => &["IDIVS"],
            TokenKind::Slash => &["DIVS"],
            TokenKind::Lt => &["LTS"],
            TokenKind::Gt => &["GTS"],
            TokenKind::EqEq => &["EQS"],
            TokenKind::BangEq => &["EQS", "NOTS"],
            TokenKind::LtEq => &["GTS", "NOTS"],
            TokenKind::GtEq => &["LTS", "NOTS"],
            _ => &[],
        };
        for instr in code {
            self.emit(instr);
        }
    }

    fn call_frame(&mut self, args: &[Operand]) {
        self.emit("CREATEFRAME");
        for (i, arg) in args.iter().enumerate() {
            self.emit(format!("DEFVAR TF@%{i}"));
            self.emit(format!("MOVE TF@%{i} {}", runtime::operand(arg)));
        }
    }

    fn builtin(&mut self, builtin: Builtin, args: &[Operand]) {
        let arg = |i: usize| args.get(i).map(runtime::operand).unwrap_or_else(|| "nil@nil".to_string());
        match builtin {
            Builtin::ReadStr | Builtin::ReadI32 | Builtin::ReadF64 => {
                let ty = match builtin {
                    Builtin::ReadI32 => "int",
                    Builtin::ReadF64 => "float",
                    _ => "string",
                };
                self.emit(format!("READ GF@%tmp0 {ty}"));
                self.emit("PUSHS GF@%tmp0");
            }
            Builtin::Write => self.emit(format!("WRITE {}", arg(0))),
            Builtin::I2F => {
                self.emit(format!("PUSHS {}", arg(0)));
                self.emit("INT2FLOATS");
            }
            Builtin::F2I => {
                self.emit(format!("PUSHS {}", arg(0)));
                self.emit("FLOAT2INTS");
            }
            Builtin::String => self.emit(format!("PUSHS {}", arg(0))),
            Builtin::Length => {
                self.emit(format!("STRLEN GF@%tmp0 {}", arg(0)));
                self.emit("PUSHS GF@%tmp0");
            }
            Builtin::Concat => {
                self.emit(format!("CONCAT GF@%tmp0 {} {}", arg(0), arg(1)));
                self.emit("PUSHS GF@%tmp0");
            }
            Builtin::Chr => {
                self.emit(format!("INT2CHAR GF@%tmp0 {}", arg(0)));
                self.emit("PUSHS GF@%tmp0");
            }
            Builtin::Substr | Builtin::Strcmp | Builtin::Ord => {
                let helper = match builtin {
                    Builtin::Substr => Helper::Substr,
                    Builtin::Strcmp => Helper::Strcmp,
                    _ => Helper::Ord,
                };
                self.helpers.insert(helper);
                self.call_frame(args);
                self.emit(format!("CALL {}", helper.label()));
            }
        }
    }

    /// Pops a nullable condition; jumps to `target` on null, otherwise binds it.
    fn bind_or_jump(&mut self, target: &str, binding: &VarRef) {
        self.emit("POPS GF@%tmp1");
        self.emit(format!("JUMPIFEQ {target} GF@%tmp1 nil@nil"));
        self.emit(format!("MOVE {} GF@%tmp1", runtime::local(binding)));
    }
}

fn leaf_operand(node: &ExprNode, table: &SymbolTable) -> Result<Operand, CompileError> {
    let token = &node.token;
    let operand = match (token.kind, &token.value) {
        (TokenKind::Ident, _) => {
            let var = table
                .lookup(&token.lexeme)
                .and_then(|s| s.as_variable())
                .ok_or_else(|| CompileError::internal_at(format!("unresolved variable '{}' in codegen", token.lexeme), token.span))?;
            Operand::Var(VarRef::new(token.lexeme.clone(), var.id))
        }
        (TokenKind::Null, _) => Operand::Nil,
        (_, Some(Literal::Int(i))) => Operand::Int(*i),
        (_, Some(Literal::Float(f))) => Operand::Float(*f),
        (_, Some(Literal::Str(s))) => Operand::Str(s.clone()),
        _ => return Err(CompileError::internal_at(format!("{token} is not an operand"), token.span)),
    };
    Ok(operand)
}

impl CodeSink for IfjCodeGen {
    fn function_prologue(&mut self, name: &str, params: &[VarRef]) {
        tracing::debug!(function = name, params = params.len(), "lower function");
        self.current = Some(FunctionBuf {
            name: name.to_string(),
            params: params.to_vec(),
            defvars: Vec::new(),
            body: String::new(),
        });
    }

    fn function_epilogue(&mut self, _name: &str, return_type: DataType) {
        if return_type == DataType::Void {
            self.emit("POPFRAME");
            self.emit("RETURN");
        }
        let Some(f) = self.current.take() else { return };
        let out = &mut self.functions;
        let _ = writeln!(out, "\nLABEL ${}", f.name);
        out.push_str("PUSHFRAME\n");
        for (i, param) in f.params.iter().enumerate() {
            let _ = writeln!(out, "DEFVAR {}", runtime::local(param));
            let _ = writeln!(out, "MOVE {} LF@%{i}", runtime::local(param));
        }
        for defvar in &f.defvars {
            let _ = writeln!(out, "DEFVAR {defvar}");
        }
        out.push_str(&f.body);
    }

    fn declare_variable(&mut self, var: &VarRef) {
        if let Some(f) = &mut self.current {
            f.defvars.push(runtime::local(var));
        }
    }

    fn expression(&mut self, tree: &ExprTree, table: &SymbolTable) -> Result<(), CompileError> {
        self.push_tree(tree, table)
    }

    fn store(&mut self, target: Option<&VarRef>) {
        match target {
            Some(var) => self.emit(format!("POPS {}", runtime::local(var))),
            None => self.emit("POPS GF@%trash"),
        }
    }

    fn call(&mut self, callee: Callee<'_>, args: &[Operand]) {
        match callee {
            Callee::Builtin(builtin) => self.builtin(builtin, args),
            Callee::User(name) => {
                self.call_frame(args);
                self.emit(format!("CALL ${name}"));
            }
        }
    }

    fn if_begin(&mut self, id: u32, binding: Option<&VarRef>) {
        match binding {
            Some(var) => self.bind_or_jump(&format!("$else${id}"), var),
            None => {
                self.emit("PUSHS bool@true");
                self.emit(format!("JUMPIFNEQS $else${id}"));
            }
        }
    }

    fn if_else(&mut self, id: u32) {
        self.emit(format!("JUMP $endif${id}"));
        self.emit(format!("LABEL $else${id}"));
    }

    fn if_end(&mut self, id: u32) {
        self.emit(format!("LABEL $endif${id}"));
    }

    fn while_begin(&mut self, id: u32) {
        self.emit(format!("LABEL $while${id}"));
    }

    fn while_condition(&mut self, id: u32, binding: Option<&VarRef>) {
        match binding {
            Some(var) => self.bind_or_jump(&format!("$endwhile${id}"), var),
            None => {
                self.emit("PUSHS bool@true");
                self.emit(format!("JUMPIFNEQS $endwhile${id}"));
            }
        }
    }

    fn while_end(&mut self, id: u32) {
        self.emit(format!("JUMP $while${id}"));
        self.emit(format!("LABEL $endwhile${id}"));
    }

    fn return_value(&mut self, _has_value: bool) {
        self.emit("POPFRAME");
        self.emit("RETURN");
    }

    fn jump_loop(&mut self, id: u32, jump: LoopJump) {
        match jump {
            LoopJump::Break => self.emit(format!("JUMP $endwhile${id}")),
            LoopJump::Continue => self.emit(format!("JUMP $while${id}")),
        }
    }
}
