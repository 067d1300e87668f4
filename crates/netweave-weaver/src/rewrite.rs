//! Call-site rewriting.
//!
//! Once every type is woven, user code is redirected to the generated
//! members: calls to remote procedures go through their caller stubs, stores
//! to synchronized fields through their setters, and event invocations
//! through the event's caller stub.

use std::collections::{HashMap, HashSet};

use netweave_bytecode::{FieldRef, Instr, MethodBody, MethodRef, TypeDescriptor};
use netweave_core::names;

use crate::generate::naming;
use crate::scan::ScannedType;

/// Replacement targets collected from woven types.
#[derive(Clone, Debug, Default)]
pub struct Redirects {
    /// `(owner, name)` of a remote procedure to its caller stub.
    calls: HashMap<(String, String), MethodRef>,
    /// Synchronized field to its setter.
    stores: HashMap<FieldRef, MethodRef>,
    /// Event backing field to its delegate type and caller stub.
    events: HashMap<FieldRef, (String, MethodRef)>,
}

impl Redirects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_type(&mut self, scanned: &ScannedType) {
        let owner = &scanned.name;
        for procedure in scanned.remotes() {
            self.calls.insert(
                (owner.clone(), procedure.name.clone()),
                MethodRef::new(owner, naming::caller(&procedure.name)),
            );
        }
        for field in scanned.sync_fields() {
            self.stores.insert(
                FieldRef::new(owner, &field.name),
                MethodRef::new(owner, naming::setter(&field.name)),
            );
        }
        for event in &scanned.events {
            self.events.insert(
                FieldRef::new(owner, &event.name),
                (
                    event.delegate.name.clone(),
                    MethodRef::new(owner, naming::caller(&event.name)),
                ),
            );
        }
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty() && self.stores.is_empty() && self.events.is_empty()
    }
}

/// Rewrites every method of `ty` except constructors and `exclude`.
///
/// Returns the number of rewritten sites.
pub fn rewrite_type(ty: &mut TypeDescriptor, redirects: &Redirects, exclude: &HashSet<String>) -> usize {
    let mut sites = 0;
    for method in &mut ty.methods {
        if method.name == names::CTOR || method.name == names::CCTOR || exclude.contains(&method.name) {
            continue;
        }
        if let Some(body) = &mut method.body {
            let n = rewrite_body(body, redirects);
            if n > 0 {
                log::debug!("{}::{}: rewrote {n} call sites", ty.name, method.name);
            }
            sites += n;
        }
    }
    sites
}

/// Rewrites one body in place. Returns the number of rewritten sites.
pub fn rewrite_body(body: &mut MethodBody, redirects: &Redirects) -> usize {
    let mut sites = 0;
    for i in 0..body.instructions.len() {
        let mut invoke_site = None;
        let replacement = match &body.instructions[i] {
            Instr::Call(m) | Instr::CallVirt(m) => redirects
                .calls
                .get(&(m.owner.clone(), m.name.clone()))
                .cloned()
                .map(Instr::Call),
            Instr::StFld(f) => redirects.stores.get(f).cloned().map(Instr::Call),
            Instr::LdFld(f) => redirects.events.get(f).and_then(|(delegate, caller)| {
                let offset = find_invoke(&body.instructions[i + 1..], f, delegate)?;
                invoke_site = Some((i + 1 + offset, caller.clone()));
                Some(Instr::Nop)
            }),
            _ => None,
        };
        if let Some((at, caller)) = invoke_site {
            body.instructions[at] = Instr::Call(caller);
        }
        if let Some(instr) = replacement {
            body.instructions[i] = instr;
            sites += 1;
        }
    }
    sites
}

/// Offset of the `Invoke` consuming a delegate just loaded from `field`.
///
/// A second load of the same field before any `Invoke` means the first load
/// was not an invocation (typically a null check).
fn find_invoke(rest: &[Instr], field: &FieldRef, delegate: &str) -> Option<usize> {
    for (offset, instr) in rest.iter().enumerate() {
        match instr {
            Instr::LdFld(f) if f == field => return None,
            Instr::Call(m) | Instr::CallVirt(m) if m.owner == delegate && m.name == names::INVOKE => {
                return Some(offset);
            }
            _ => {}
        }
    }
    None
}
