use netweave_core::TypeRef;
use serde::{Deserialize, Serialize};

use crate::instr::{FieldRef, Instr, Label, MethodRef};

/// Instructions and local slots of one method.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodBody {
    #[serde(default)]
    pub locals: Vec<TypeRef>,
    pub instructions: Vec<Instr>,
}

impl MethodBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn last_is_ret(&self) -> bool {
        matches!(self.instructions.last(), Some(Instr::Ret))
    }

    /// Removes a terminating `ret`. Returns whether one was removed.
    pub fn strip_ret(&mut self) -> bool {
        if self.last_is_ret() {
            self.instructions.pop();
            true
        } else {
            false
        }
    }

    /// Highest label number used by a mark or branch.
    pub fn max_label(&self) -> Option<u32> {
        self.instructions
            .iter()
            .filter_map(|i| match i {
                Instr::Mark(l) => Some(l.0),
                other => other.branch_target().map(|l| l.0),
            })
            .max()
    }

    /// True if any instruction stores into `field`.
    pub fn stores_field(&self, field: &FieldRef) -> bool {
        self.instructions
            .iter()
            .any(|i| matches!(i, Instr::StFld(f) if f == field))
    }
}

/// Appends instructions to a method body.
///
/// Thin layer over the stack machine: push/pop, branch, call and field access
/// primitives, plus fresh labels that never collide with labels already
/// present in an extended body.
pub struct BodyBuilder {
    body: MethodBody,
    next_label: u32,
}

impl Default for BodyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyBuilder {
    pub fn new() -> Self {
        Self {
            body: MethodBody::new(),
            next_label: 0,
        }
    }

    /// Continue appending to an existing body.
    pub fn extend(body: MethodBody) -> Self {
        let next_label = body.max_label().map_or(0, |l| l + 1);
        Self { body, next_label }
    }

    /// Declare a local slot and return its index.
    pub fn local(&mut self, ty: TypeRef) -> u16 {
        self.body.locals.push(ty);
        (self.body.locals.len() - 1) as u16
    }

    pub fn label(&mut self) -> Label {
        let label = Label(self.next_label);
        self.next_label += 1;
        label
    }

    pub fn mark(&mut self, label: Label) -> &mut Self {
        self.emit(Instr::Mark(label))
    }

    pub fn emit(&mut self, instr: Instr) -> &mut Self {
        self.body.instructions.push(instr);
        self
    }

    pub fn ld_arg(&mut self, index: u16) -> &mut Self {
        self.emit(Instr::LdArg(index))
    }

    pub fn ld_loc(&mut self, index: u16) -> &mut Self {
        self.emit(Instr::LdLoc(index))
    }

    pub fn st_loc(&mut self, index: u16) -> &mut Self {
        self.emit(Instr::StLoc(index))
    }

    pub fn ldc_i4(&mut self, value: i32) -> &mut Self {
        self.emit(Instr::LdcI4(value))
    }

    pub fn ld_str(&mut self, value: impl Into<String>) -> &mut Self {
        self.emit(Instr::LdStr(value.into()))
    }

    pub fn ld_fld(&mut self, field: FieldRef) -> &mut Self {
        self.emit(Instr::LdFld(field))
    }

    pub fn ld_flda(&mut self, field: FieldRef) -> &mut Self {
        self.emit(Instr::LdFlda(field))
    }

    pub fn st_fld(&mut self, field: FieldRef) -> &mut Self {
        self.emit(Instr::StFld(field))
    }

    pub fn ld_sfld(&mut self, field: FieldRef) -> &mut Self {
        self.emit(Instr::LdSFld(field))
    }

    pub fn st_sfld(&mut self, field: FieldRef) -> &mut Self {
        self.emit(Instr::StSFld(field))
    }

    pub fn call(&mut self, method: MethodRef) -> &mut Self {
        self.emit(Instr::Call(method))
    }

    pub fn call_virt(&mut self, method: MethodRef) -> &mut Self {
        self.emit(Instr::CallVirt(method))
    }

    pub fn br(&mut self, label: Label) -> &mut Self {
        self.emit(Instr::Br(label))
    }

    pub fn br_true(&mut self, label: Label) -> &mut Self {
        self.emit(Instr::BrTrue(label))
    }

    pub fn br_false(&mut self, label: Label) -> &mut Self {
        self.emit(Instr::BrFalse(label))
    }

    pub fn ret(&mut self) -> &mut Self {
        self.emit(Instr::Ret)
    }

    pub fn finish(self) -> MethodBody {
        self.body
    }
}
