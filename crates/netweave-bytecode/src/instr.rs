use std::fmt;

use netweave_core::TypeRef;
use serde::{Deserialize, Serialize};

/// Branch target inside one method body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Label(pub u32);

/// Field of a declared type, by owner and name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    pub owner: String,
    pub name: String,
}

impl FieldRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

/// Method of a declared type, by owner and name.
///
/// Overloads are not distinguished; generated members have unique names.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    pub owner: String,
    pub name: String,
    #[serde(default)]
    pub generic_args: Vec<TypeRef>,
}

impl MethodRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            generic_args: Vec::new(),
        }
    }

    pub fn with_generic_arg(mut self, arg: TypeRef) -> Self {
        self.generic_args.push(arg);
        self
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.owner, self.name)
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.owner, self.name)?;
        if !self.generic_args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.generic_args.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

/// One stack-machine instruction.
///
/// Instance methods see `this` as argument 0. Branch targets are [`Label`]s
/// placed with [`Instr::Mark`], so bodies can be spliced without offset fixups.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Instr {
    Nop,
    Mark(Label),
    Br(Label),
    BrTrue(Label),
    BrFalse(Label),

    LdArg(u16),
    LdLoc(u16),
    StLoc(u16),
    LdcI4(i32),
    LdcR4(f32),
    LdStr(String),
    LdNull,

    LdFld(FieldRef),
    LdFlda(FieldRef),
    StFld(FieldRef),
    LdSFld(FieldRef),
    StSFld(FieldRef),

    Call(MethodRef),
    CallVirt(MethodRef),
    NewObj(MethodRef),
    LdFtn(MethodRef),

    CastClass(TypeRef),
    IsInst(TypeRef),
    LdToken(TypeRef),

    And,
    Or,
    Pop,
    Dup,
    Ret,
}

impl Instr {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instr::Nop => "nop",
            Instr::Mark(_) => "mark",
            Instr::Br(_) => "br",
            Instr::BrTrue(_) => "brtrue",
            Instr::BrFalse(_) => "brfalse",
            Instr::LdArg(_) => "ldarg",
            Instr::LdLoc(_) => "ldloc",
            Instr::StLoc(_) => "stloc",
            Instr::LdcI4(_) => "ldc.i4",
            Instr::LdcR4(_) => "ldc.r4",
            Instr::LdStr(_) => "ldstr",
            Instr::LdNull => "ldnull",
            Instr::LdFld(_) => "ldfld",
            Instr::LdFlda(_) => "ldflda",
            Instr::StFld(_) => "stfld",
            Instr::LdSFld(_) => "ldsfld",
            Instr::StSFld(_) => "stsfld",
            Instr::Call(_) => "call",
            Instr::CallVirt(_) => "callvirt",
            Instr::NewObj(_) => "newobj",
            Instr::LdFtn(_) => "ldftn",
            Instr::CastClass(_) => "castclass",
            Instr::IsInst(_) => "isinst",
            Instr::LdToken(_) => "ldtoken",
            Instr::And => "and",
            Instr::Or => "or",
            Instr::Pop => "pop",
            Instr::Dup => "dup",
            Instr::Ret => "ret",
        }
    }

    /// Label this instruction jumps to, if it is a branch.
    pub fn branch_target(&self) -> Option<Label> {
        match self {
            Instr::Br(l) | Instr::BrTrue(l) | Instr::BrFalse(l) => Some(*l),
            _ => None,
        }
    }

    /// Method invoked by a call-like instruction.
    pub fn callee(&self) -> Option<&MethodRef> {
        match self {
            Instr::Call(m) | Instr::CallVirt(m) | Instr::NewObj(m) => Some(m),
            _ => None,
        }
    }
}
