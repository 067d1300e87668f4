//! Human-readable listing of woven types and method bodies.

use std::fmt::Write as _;

use netweave_core::{AttrValue, Attribute, Colors, short_name};

use crate::assembly::Assembly;
use crate::body::MethodBody;
use crate::descriptor::{MethodDescriptor, TypeDescriptor};
use crate::instr::Instr;

/// Dump every main-module type, in declaration order.
pub fn dump_assembly(assembly: &Assembly, colors: Colors) -> String {
    let mut out = String::new();
    for (i, id) in assembly.main_types().into_iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&dump_type(assembly.get(id), colors));
    }
    out
}

pub fn dump_type(ty: &TypeDescriptor, c: Colors) -> String {
    let mut out = String::new();
    write!(out, "{}type{} {}{}{}", c.dim, c.reset, c.blue, ty.name, c.reset).unwrap();
    if let Some(base) = &ty.base {
        write!(out, " : {base}").unwrap();
    }
    out.push_str(&attributes(&ty.attributes, c));
    out.push('\n');

    for f in &ty.fields {
        let stat = if f.is_static { "static " } else { "" };
        write!(
            out,
            "  {}field{} {stat}{}{}{}: {}",
            c.dim, c.reset, c.blue, f.name, c.reset, f.ty
        )
        .unwrap();
        out.push_str(&attributes(&f.attributes, c));
        out.push('\n');
    }
    for e in &ty.events {
        write!(out, "  {}event{} {}: {}", c.dim, c.reset, e.name, e.delegate).unwrap();
        out.push_str(&attributes(&e.attributes, c));
        out.push('\n');
    }
    for p in &ty.properties {
        write!(out, "  {}property{} {}: {}", c.dim, c.reset, p.name, p.ty).unwrap();
        if let Some(g) = &p.getter {
            write!(out, " get={g}").unwrap();
        }
        if let Some(s) = &p.setter {
            write!(out, " set={s}").unwrap();
        }
        out.push('\n');
    }
    for m in &ty.methods {
        dump_method(&mut out, m, c);
    }
    out
}

fn dump_method(out: &mut String, m: &MethodDescriptor, c: Colors) {
    let stat = if m.is_static { "static " } else { "" };
    write!(
        out,
        "  {}method{} {stat}{}{}{}(",
        c.dim, c.reset, c.blue, m.name, c.reset
    )
    .unwrap();
    for (i, p) in m.params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write!(out, "{}: {}", p.name, p.ty).unwrap();
    }
    write!(out, ") -> {}", m.return_type).unwrap();
    out.push_str(&attributes(&m.attributes, c));
    out.push('\n');
    if let Some(body) = &m.body {
        for line in dump_body(body, c).lines() {
            writeln!(out, "    {line}").unwrap();
        }
    }
}

/// One line per instruction; labels are flush left, instructions indented.
pub fn dump_body(body: &MethodBody, c: Colors) -> String {
    let mut out = String::new();
    for (i, local) in body.locals.iter().enumerate() {
        writeln!(out, "{}.locals [{i}]{} {local}", c.dim, c.reset).unwrap();
    }
    for instr in &body.instructions {
        if let Instr::Mark(l) = instr {
            writeln!(out, "{}L{}:{}", c.dim, l.0, c.reset).unwrap();
            continue;
        }
        write!(out, "    {}", instr.mnemonic()).unwrap();
        match instr {
            Instr::Br(l) | Instr::BrTrue(l) | Instr::BrFalse(l) => {
                write!(out, " {}L{}{}", c.dim, l.0, c.reset).unwrap()
            }
            Instr::LdArg(n) | Instr::LdLoc(n) | Instr::StLoc(n) => write!(out, " {n}").unwrap(),
            Instr::LdcI4(v) => write!(out, " {v}").unwrap(),
            Instr::LdcR4(v) => write!(out, " {v:?}").unwrap(),
            Instr::LdStr(s) => write!(out, " {}{s:?}{}", c.green, c.reset).unwrap(),
            Instr::LdFld(f)
            | Instr::LdFlda(f)
            | Instr::StFld(f)
            | Instr::LdSFld(f)
            | Instr::StSFld(f) => write!(out, " {}{f}{}", c.blue, c.reset).unwrap(),
            Instr::Call(m) | Instr::CallVirt(m) | Instr::NewObj(m) | Instr::LdFtn(m) => {
                write!(out, " {}{m}{}", c.blue, c.reset).unwrap()
            }
            Instr::CastClass(t) | Instr::IsInst(t) | Instr::LdToken(t) => {
                write!(out, " {t}").unwrap()
            }
            _ => {}
        }
        out.push('\n');
    }
    out
}

fn attributes(attrs: &[Attribute], c: Colors) -> String {
    let mut out = String::new();
    for a in attrs {
        let name = short_name(&a.name);
        let name = name.strip_suffix("Attribute").unwrap_or(name);
        write!(out, " {}[{name}", c.dim).unwrap();
        if !a.args.is_empty() {
            out.push('(');
            for (i, (k, v)) in a.args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                match v {
                    AttrValue::Bool(b) => write!(out, "{k}: {b}").unwrap(),
                    AttrValue::Int(n) => write!(out, "{k}: {n}").unwrap(),
                    AttrValue::Float(x) => write!(out, "{k}: {x:?}").unwrap(),
                    AttrValue::Str(s) => write!(out, "{k}: {s:?}").unwrap(),
                }
            }
            out.push(')');
        }
        write!(out, "]{}", c.reset).unwrap();
    }
    out
}
