//! Interpreter loop and the driving API.

use std::collections::{HashMap, HashSet};

use netweave_bytecode::{
    Assembly, FieldRef, Instr, Label, MessageCategory, MethodBody, MethodDescriptor, MethodRef,
    TypeId,
};
use netweave_core::{TypeRef, names};

use super::error::RuntimeError;
use super::frame::Frame;
use super::heap::{Heap, Instance, ListOp, Object, SyncList};
use super::host::{Host, Role};
use super::stream::{Reader, Wire, Writer};
use super::value::{ObjId, Value};

/// Runtime limits for one top-level call.
#[derive(Clone, Copy, Debug)]
pub struct FuelLimits {
    /// Maximum instructions executed (default: 1,000,000).
    pub(crate) exec_fuel: u32,
    /// Maximum call depth (default: 256).
    pub(crate) recursion_limit: u32,
}

impl Default for FuelLimits {
    fn default() -> Self {
        Self {
            exec_fuel: 1_000_000,
            recursion_limit: 256,
        }
    }
}

impl FuelLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.exec_fuel = fuel;
        self
    }

    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn get_exec_fuel(&self) -> u32 {
        self.exec_fuel
    }

    pub fn get_recursion_limit(&self) -> u32 {
        self.recursion_limit
    }
}

/// Builder for [`Vm`] instances.
pub struct VmBuilder<'a> {
    assembly: &'a Assembly,
    role: Role,
    limits: FuelLimits,
}

impl<'a> VmBuilder<'a> {
    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.limits = self.limits.exec_fuel(fuel);
        self
    }

    pub fn build(self) -> Vm<'a> {
        Vm {
            assembly: self.assembly,
            heap: Heap::default(),
            host: Host::new(self.role),
            statics: HashMap::new(),
            initialized: HashSet::new(),
            exec_fuel: self.limits.exec_fuel,
            recursion_depth: 0,
            limits: self.limits,
            next_net_id: 1,
        }
    }
}

/// One peer executing a woven assembly against a simulated runtime.
pub struct Vm<'a> {
    pub(super) assembly: &'a Assembly,
    pub(super) heap: Heap,
    pub(super) host: Host,
    statics: HashMap<FieldRef, Value>,
    /// Types whose statics exist and whose static initializer has run.
    initialized: HashSet<TypeId>,
    exec_fuel: u32,
    recursion_depth: u32,
    limits: FuelLimits,
    next_net_id: u32,
}

/// Default field or local value of a declared type.
pub(super) fn default_for(ty: &TypeRef) -> Value {
    if ty.array || ty.is_generic_instance() {
        return Value::Null;
    }
    Wire::of_type(&ty.name).map_or(Value::Null, Wire::default_value)
}

fn label_table(body: &MethodBody) -> HashMap<Label, usize> {
    body.instructions
        .iter()
        .enumerate()
        .filter_map(|(pc, instr)| match instr {
            Instr::Mark(label) => Some((*label, pc)),
            _ => None,
        })
        .collect()
}

fn jump(labels: &HashMap<Label, usize>, label: Label) -> Result<usize, RuntimeError> {
    labels
        .get(&label)
        .copied()
        .ok_or(RuntimeError::UnknownLabel(label.0))
}

impl<'a> Vm<'a> {
    pub fn builder(assembly: &'a Assembly) -> VmBuilder<'a> {
        VmBuilder {
            assembly,
            role: Role::default(),
            limits: FuelLimits::default(),
        }
    }

    pub fn new(assembly: &'a Assembly, role: Role) -> Self {
        Self::builder(assembly).role(role).build()
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut Host {
        &mut self.host
    }

    pub fn object(&self, id: ObjId) -> &Object {
        self.heap.get(id)
    }

    /// Creates a behaviour on a fresh entity identity.
    pub fn spawn(&mut self, ty: &str) -> Result<ObjId, RuntimeError> {
        let net_id = self.next_net_id;
        self.next_net_id += 1;
        self.spawn_with_id(ty, net_id)
    }

    /// Creates a behaviour under `net_id`: statics are initialized on first
    /// use, then the constructor and `Awake` run.
    pub fn spawn_with_id(&mut self, ty: &str, net_id: u32) -> Result<ObjId, RuntimeError> {
        self.refuel();
        self.next_net_id = self.next_net_id.max(net_id + 1);
        let id = self.type_id(ty)?;
        let obj = self.instantiate(id)?;
        self.heap.instance_mut(obj)?.net_id = net_id;

        let assembly = self.assembly;
        if let Some(ctor) = assembly.get(id).method(names::CTOR) {
            self.run(id, ctor, vec![Value::Obj(obj)])?;
        }
        self.host.add_behaviour(net_id, obj);
        if let Some((owner, awake)) = assembly.find_method(id, names::AWAKE) {
            if awake.body.is_some() {
                self.run(owner, awake, vec![Value::Obj(obj)])?;
            }
        }
        log::debug!("spawned {ty} {obj} as net id {net_id}");
        Ok(obj)
    }

    /// Registers an entity object under `net_id`.
    pub fn spawn_entity(&mut self, net_id: u32) -> ObjId {
        let obj = self
            .heap
            .alloc(Object::Instance(Instance::new(names::GAME_OBJECT)));
        self.host.add_entity(net_id, obj);
        obj
    }

    /// Allocates an instance with default fields and no constructor call.
    pub fn alloc(&mut self, ty: &str) -> Result<ObjId, RuntimeError> {
        match self.assembly.find(ty) {
            Some(id) => self.instantiate(id),
            None => Err(RuntimeError::UnknownType(ty.to_string())),
        }
    }

    pub fn field(&self, obj: ObjId, name: &str) -> Result<Value, RuntimeError> {
        let instance = self.heap.instance(obj)?;
        instance
            .fields
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownField(format!("{}::{name}", instance.ty)))
    }

    /// Stores without going through a generated setter.
    pub fn set_field(&mut self, obj: ObjId, name: &str, value: Value) -> Result<(), RuntimeError> {
        let instance = self.heap.instance_mut(obj)?;
        match instance.fields.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(RuntimeError::UnknownField(format!("{}::{name}", instance.ty))),
        }
    }

    pub fn static_field(&mut self, owner: &str, name: &str) -> Result<Value, RuntimeError> {
        self.refuel();
        self.load_static(&FieldRef::new(owner, name))
    }

    pub fn dirty_bits(&self, obj: ObjId) -> Result<i32, RuntimeError> {
        Ok(self.heap.instance(obj)?.dirty_bits)
    }

    /// Calls an instance method, dispatching on the object's runtime type.
    pub fn call(
        &mut self,
        obj: ObjId,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Option<Value>, RuntimeError> {
        self.refuel();
        let ty = self.heap.type_name(obj).to_string();
        let mut full = vec![Value::Obj(obj)];
        full.extend(args);
        self.invoke(&MethodRef::new(ty, method), full, true)
    }

    pub fn call_static(
        &mut self,
        ty: &str,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Option<Value>, RuntimeError> {
        self.refuel();
        self.invoke(&MethodRef::new(ty, method), args, false)
    }

    /// Runs `OnSerialize`; returns whether anything was written, and the bytes.
    pub fn serialize(
        &mut self,
        obj: ObjId,
        initial_state: bool,
    ) -> Result<(bool, Vec<u8>), RuntimeError> {
        let writer = self.heap.alloc(Object::Writer(Writer::new()));
        let written = self.call(
            obj,
            names::ON_SERIALIZE,
            vec![Value::Obj(writer), Value::Bool(initial_state)],
        )?;
        let bytes = self.heap.writer_mut(writer)?.bytes().to_vec();
        Ok((written.is_some_and(|v| v.is_truthy()), bytes))
    }

    pub fn deserialize(
        &mut self,
        obj: ObjId,
        bytes: &[u8],
        initial_state: bool,
    ) -> Result<(), RuntimeError> {
        let reader = self.heap.alloc(Object::Reader(Reader::new(bytes.to_vec())));
        self.call(
            obj,
            names::ON_DESERIALIZE,
            vec![Value::Obj(reader), Value::Bool(initial_state)],
        )?;
        Ok(())
    }

    /// Routes an inbound message to the dispatcher registered for its
    /// routing id, on the behaviour spawned under the sender identity.
    pub fn deliver(&mut self, bytes: &[u8]) -> Result<(), RuntimeError> {
        self.refuel();
        let mut reader = Reader::new(bytes.to_vec());
        let _size = reader.read_i16()?;
        let tag = reader.read_i16()?;
        let routing_id = reader.read_packed()? as i32;
        let net_id = reader.read_packed()?;

        let handler = self
            .host
            .handler(routing_id)
            .cloned()
            .ok_or(RuntimeError::UnknownHandler(routing_id))?;
        if handler.category.tag() != tag {
            return Err(RuntimeError::TagMismatch {
                expected: handler.category.tag(),
                found: tag,
            });
        }
        let target = self
            .host
            .behaviours_of(net_id)
            .iter()
            .copied()
            .find(|&obj| self.is_instance_of(obj, &handler.ty))
            .ok_or_else(|| RuntimeError::UnknownObject {
                net_id,
                ty: handler.ty.clone(),
            })?;
        log::debug!(
            "delivering routing id {routing_id} to {target} via {}",
            handler.dispatcher
        );

        let reader = self.heap.alloc(Object::Reader(reader));
        self.invoke(
            &handler.dispatcher,
            vec![Value::Obj(target), Value::Obj(reader)],
            false,
        )?;
        Ok(())
    }

    /// Adds `target.method` to the invocation list held in `obj.event`.
    pub fn subscribe(
        &mut self,
        obj: ObjId,
        event: &str,
        target: ObjId,
        method: &str,
    ) -> Result<(), RuntimeError> {
        let entry = (
            Value::Obj(target),
            MethodRef::new(self.heap.type_name(target), method),
        );
        match self.field(obj, event)? {
            Value::Obj(delegate) => match self.heap.get_mut(delegate) {
                Object::Delegate(targets) => targets.push(entry),
                other => {
                    return Err(RuntimeError::TypeMismatch {
                        expected: "delegate",
                        found: other.type_name().to_string(),
                    });
                }
            },
            _ => {
                let delegate = self.heap.alloc(Object::Delegate(vec![entry]));
                self.set_field(obj, event, Value::Obj(delegate))?;
            }
        }
        Ok(())
    }

    pub fn list_items(&self, obj: ObjId, field: &str) -> Result<Vec<Value>, RuntimeError> {
        let list = self.field(obj, field)?.as_obj()?;
        Ok(self.heap.list(list)?.items.clone())
    }

    /// Applies `op` to the collection in `obj.field` and returns the framed
    /// message that replays it on the other side.
    pub fn change_list(
        &mut self,
        obj: ObjId,
        field: &str,
        op: ListOp,
    ) -> Result<Vec<u8>, RuntimeError> {
        let list = self.field(obj, field)?.as_obj()?;
        let net_id = self.heap.instance(obj)?.net_id;
        let (routing_id, element) = {
            let list = self.heap.list(list)?;
            (list.routing_id, list.element)
        };

        let mut w = Writer::new();
        w.write_i16(0);
        w.write_i16(MessageCategory::SyncList.tag());
        w.write_packed(routing_id as u32);
        w.write_packed(net_id);
        op.encode(&mut w, element)?;

        op.apply(&mut self.heap.list_mut(list)?.items)?;
        Ok(w.into_bytes())
    }

    fn refuel(&mut self) {
        self.exec_fuel = self.limits.exec_fuel;
        self.recursion_depth = 0;
    }

    fn consume_fuel(&mut self) -> Result<(), RuntimeError> {
        if self.exec_fuel == 0 {
            return Err(RuntimeError::FuelExhausted(self.limits.exec_fuel));
        }
        self.exec_fuel -= 1;
        Ok(())
    }

    fn type_id(&self, name: &str) -> Result<TypeId, RuntimeError> {
        self.assembly
            .find(name)
            .ok_or_else(|| RuntimeError::UnknownType(name.to_string()))
    }

    /// `obj`'s runtime type is `ty` or derives from it.
    pub(super) fn is_instance_of(&self, obj: ObjId, ty: &str) -> bool {
        let name = self.heap.type_name(obj);
        name == ty
            || self
                .assembly
                .find(name)
                .is_some_and(|id| self.assembly.is_assignable_to(id, ty))
    }

    /// Allocates an instance of `id` with every inherited field defaulted.
    fn instantiate(&mut self, id: TypeId) -> Result<ObjId, RuntimeError> {
        self.ensure_initialized(id)?;
        let assembly = self.assembly;
        let mut chain = assembly.base_chain(id);
        chain.reverse();
        chain.push(id);

        let mut instance = Instance::new(assembly.get(id).name.clone());
        for t in chain {
            for field in assembly.get(t).fields.iter().filter(|f| !f.is_static) {
                instance
                    .fields
                    .insert(field.name.clone(), default_for(&field.ty));
            }
        }
        Ok(self.heap.alloc(Object::Instance(instance)))
    }

    /// Creates the statics of `id` and its bases, base first, running each
    /// static initializer once.
    fn ensure_initialized(&mut self, id: TypeId) -> Result<(), RuntimeError> {
        let assembly = self.assembly;
        let mut chain = assembly.base_chain(id);
        chain.reverse();
        chain.push(id);
        for t in chain {
            if !self.initialized.insert(t) {
                continue;
            }
            let ty = assembly.get(t);
            for field in ty.fields.iter().filter(|f| f.is_static) {
                self.statics.insert(
                    FieldRef::new(ty.name.clone(), field.name.clone()),
                    default_for(&field.ty),
                );
            }
            if let Some(cctor) = ty.method(names::CCTOR) {
                if cctor.body.is_some() {
                    log::trace!("running static initializer of {}", ty.name);
                    self.run(t, cctor, Vec::new())?;
                }
            }
        }
        Ok(())
    }

    pub(super) fn load_field(&self, obj: ObjId, field: &FieldRef) -> Result<Value, RuntimeError> {
        self.field(obj, &field.name)
    }

    pub(super) fn store_field(
        &mut self,
        obj: ObjId,
        field: &FieldRef,
        value: Value,
    ) -> Result<(), RuntimeError> {
        self.set_field(obj, &field.name, value)
    }

    fn load_static(&mut self, field: &FieldRef) -> Result<Value, RuntimeError> {
        let id = self.type_id(&field.owner)?;
        self.ensure_initialized(id)?;
        self.statics
            .get(field)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownField(field.to_string()))
    }

    fn store_static(&mut self, field: &FieldRef, value: Value) -> Result<(), RuntimeError> {
        let id = self.type_id(&field.owner)?;
        self.ensure_initialized(id)?;
        match self.statics.get_mut(field) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(RuntimeError::UnknownField(field.to_string())),
        }
    }

    /// Reads through a managed pointer.
    pub(super) fn load_addr(&mut self, addr: &Value) -> Result<Value, RuntimeError> {
        match addr {
            Value::Addr {
                obj: Some(obj),
                field,
            } => self.load_field(*obj, field),
            Value::Addr { obj: None, field } => self.load_static(field),
            other => Err(RuntimeError::TypeMismatch {
                expected: "address",
                found: format!("{other:?}"),
            }),
        }
    }

    pub(super) fn store_addr(&mut self, addr: &Value, value: Value) -> Result<(), RuntimeError> {
        match addr {
            Value::Addr {
                obj: Some(obj),
                field,
            } => self.store_field(*obj, field, value),
            Value::Addr { obj: None, field } => self.store_static(field, value),
            other => Err(RuntimeError::TypeMismatch {
                expected: "address",
                found: format!("{other:?}"),
            }),
        }
    }

    /// Calls `method` with `args` already evaluated; returns its result.
    pub(super) fn invoke(
        &mut self,
        method: &MethodRef,
        args: Vec<Value>,
        virtual_: bool,
    ) -> Result<Option<Value>, RuntimeError> {
        let mut frame = Frame::new(method.to_string(), Vec::new(), Vec::new());
        frame.stack = args;
        self.call_method(&mut frame, method, virtual_)?;
        Ok(frame.stack.pop())
    }

    /// Executes a call instruction against `frame`'s evaluation stack.
    ///
    /// Members with a body are interpreted; delegate `Invoke` walks the
    /// invocation list; everything else is a runtime intrinsic.
    fn call_method(
        &mut self,
        frame: &mut Frame,
        method: &MethodRef,
        virtual_: bool,
    ) -> Result<(), RuntimeError> {
        let assembly = self.assembly;
        let Some((owner, declared)) = assembly
            .find(&method.owner)
            .and_then(|id| assembly.find_method(id, &method.name))
        else {
            return self.native(frame, method);
        };
        let arity = declared.params.len() + usize::from(!declared.is_static);

        let (owner, target) = if virtual_ && !declared.is_static {
            self.override_of(frame.peek(arity - 1)?, &method.name)
                .unwrap_or((owner, declared))
        } else {
            (owner, declared)
        };

        if target.body.is_none() {
            if method.name == names::INVOKE
                && assembly.is_derived_from(owner, names::MULTICAST_DELEGATE)
            {
                let args = frame.pop_n(arity)?;
                return self.invoke_delegate(args);
            }
            return self.native(frame, method);
        }

        let args = frame.pop_n(arity)?;
        if let Some(result) = self.run(owner, target, args)? {
            frame.push(result);
        }
        Ok(())
    }

    /// Most-derived implementation of `name` for the receiver's runtime type.
    fn override_of(&self, receiver: &Value, name: &str) -> Option<(TypeId, &'a MethodDescriptor)> {
        let Value::Obj(obj) = receiver else {
            return None;
        };
        let assembly = self.assembly;
        let id = assembly.find(self.heap.type_name(*obj))?;
        assembly
            .find_method(id, name)
            .filter(|(_, m)| m.body.is_some())
    }

    fn invoke_delegate(&mut self, mut args: Vec<Value>) -> Result<(), RuntimeError> {
        let delegate = args.remove(0).as_obj()?;
        let targets = match self.heap.get(delegate) {
            Object::Delegate(targets) => targets.clone(),
            other => {
                return Err(RuntimeError::TypeMismatch {
                    expected: "delegate",
                    found: other.type_name().to_string(),
                });
            }
        };
        for (target, method) in targets {
            let mut call_args = Vec::with_capacity(args.len() + 1);
            if !target.is_null() {
                call_args.push(target);
            }
            call_args.extend(args.iter().cloned());
            self.invoke(&method, call_args, true)?;
        }
        Ok(())
    }

    fn run(
        &mut self,
        owner: TypeId,
        method: &'a MethodDescriptor,
        args: Vec<Value>,
    ) -> Result<Option<Value>, RuntimeError> {
        let name = format!("{}::{}", self.assembly.get(owner).name, method.name);
        let Some(body) = &method.body else {
            return Err(RuntimeError::UnknownMethod(name));
        };
        if self.recursion_depth >= self.limits.recursion_limit {
            return Err(RuntimeError::RecursionLimit(self.limits.recursion_limit));
        }
        self.recursion_depth += 1;
        let result = self.execute(name, body, args, !method.return_type.is_void());
        self.recursion_depth -= 1;
        result
    }

    fn execute(
        &mut self,
        name: String,
        body: &'a MethodBody,
        args: Vec<Value>,
        returns: bool,
    ) -> Result<Option<Value>, RuntimeError> {
        let labels = label_table(body);
        let locals = body.locals.iter().map(default_for).collect();
        let mut frame = Frame::new(name, args, locals);
        let mut pc = 0;

        while let Some(instr) = body.instructions.get(pc) {
            self.consume_fuel()?;
            log::trace!("{} {pc:>4}: {}", frame.method, instr.mnemonic());
            pc += 1;
            match instr {
                Instr::Nop | Instr::Mark(_) => {}
                Instr::Br(label) => pc = jump(&labels, *label)?,
                Instr::BrTrue(label) => {
                    if frame.pop()?.is_truthy() {
                        pc = jump(&labels, *label)?;
                    }
                }
                Instr::BrFalse(label) => {
                    if !frame.pop()?.is_truthy() {
                        pc = jump(&labels, *label)?;
                    }
                }

                Instr::LdArg(i) => {
                    let value = frame.arg(*i)?.clone();
                    frame.push(value);
                }
                Instr::LdLoc(i) => {
                    let value = frame.local(*i)?.clone();
                    frame.push(value);
                }
                Instr::StLoc(i) => {
                    let value = frame.pop()?;
                    frame.set_local(*i, value)?;
                }
                Instr::LdcI4(n) => frame.push(Value::I32(*n)),
                Instr::LdcR4(x) => frame.push(Value::F32(*x)),
                Instr::LdStr(s) => frame.push(Value::Str(s.clone())),
                Instr::LdNull => frame.push(Value::Null),

                Instr::LdFld(field) => {
                    let obj = frame.pop()?.as_obj()?;
                    let value = self.load_field(obj, field)?;
                    frame.push(value);
                }
                Instr::LdFlda(field) => {
                    let obj = frame.pop()?.as_obj()?;
                    frame.push(Value::Addr {
                        obj: Some(obj),
                        field: field.clone(),
                    });
                }
                Instr::StFld(field) => {
                    let value = frame.pop()?;
                    let obj = frame.pop()?.as_obj()?;
                    self.store_field(obj, field, value)?;
                }
                Instr::LdSFld(field) => {
                    let value = self.load_static(field)?;
                    frame.push(value);
                }
                Instr::StSFld(field) => {
                    let value = frame.pop()?;
                    self.store_static(field, value)?;
                }

                Instr::Call(method) => self.call_method(&mut frame, method, false)?,
                Instr::CallVirt(method) => self.call_method(&mut frame, method, true)?,
                Instr::NewObj(ctor) => self.construct(&mut frame, ctor)?,
                Instr::LdFtn(method) => frame.push(Value::Method(method.clone())),

                Instr::CastClass(ty) => {
                    let value = frame.pop()?;
                    if let Value::Obj(obj) = value {
                        if !self.is_instance_of(obj, &ty.name) {
                            return Err(RuntimeError::InvalidCast {
                                from: self.heap.type_name(obj).to_string(),
                                to: ty.name.clone(),
                            });
                        }
                    }
                    frame.push(value);
                }
                Instr::IsInst(ty) => {
                    let value = frame.pop()?;
                    let keep = matches!(value, Value::Obj(obj) if self.is_instance_of(obj, &ty.name));
                    frame.push(if keep { value } else { Value::Null });
                }
                Instr::LdToken(ty) => frame.push(Value::Type(ty.name.clone())),

                Instr::And => {
                    let b = frame.pop()?.as_i32()?;
                    let a = frame.pop()?.as_i32()?;
                    frame.push(Value::I32(a & b));
                }
                Instr::Or => {
                    let b = frame.pop()?.as_i32()?;
                    let a = frame.pop()?.as_i32()?;
                    frame.push(Value::I32(a | b));
                }
                Instr::Pop => {
                    frame.pop()?;
                }
                Instr::Dup => {
                    let value = frame.peek(0)?.clone();
                    frame.push(value);
                }
                Instr::Ret => {
                    return if returns {
                        frame.pop().map(Some)
                    } else {
                        Ok(None)
                    };
                }
            }
        }
        Err(RuntimeError::MissingRet(frame.method))
    }

    /// `newobj`: writers and collections are runtime objects, delegates
    /// capture `(target, method)`, anything else runs its constructor.
    fn construct(&mut self, frame: &mut Frame, ctor: &MethodRef) -> Result<(), RuntimeError> {
        if ctor.owner == names::NETWORK_WRITER {
            let writer = self.heap.alloc(Object::Writer(Writer::new()));
            frame.push(Value::Obj(writer));
            return Ok(());
        }
        let assembly = self.assembly;
        let id = self.type_id(&ctor.owner)?;

        if assembly.is_derived_from(id, names::MULTICAST_DELEGATE) {
            let method = match frame.pop()? {
                Value::Method(m) => m,
                other => {
                    return Err(RuntimeError::TypeMismatch {
                        expected: "method",
                        found: format!("{other:?}"),
                    });
                }
            };
            let target = frame.pop()?;
            let delegate = self.heap.alloc(Object::Delegate(vec![(target, method)]));
            frame.push(Value::Obj(delegate));
            return Ok(());
        }

        if let Some(element) = self.list_element(id) {
            let wire = Wire::of_type(&element.name).ok_or_else(|| RuntimeError::TypeMismatch {
                expected: "marshallable element",
                found: element.to_string(),
            })?;
            let list = self.heap.alloc(Object::List(SyncList {
                ty: ctor.owner.clone(),
                element: wire,
                items: Vec::new(),
                owner: None,
                routing_id: 0,
            }));
            frame.push(Value::Obj(list));
            return Ok(());
        }

        let obj = self.instantiate(id)?;
        if let Some(declared) = assembly.get(id).method(names::CTOR) {
            let mut args = frame.pop_n(declared.params.len())?;
            args.insert(0, Value::Obj(obj));
            if declared.body.is_some() {
                self.run(id, declared, args)?;
            }
        }
        frame.push(Value::Obj(obj));
        Ok(())
    }

    /// Element type of a collection type, from the generic base it derives.
    fn list_element(&self, id: TypeId) -> Option<&'a TypeRef> {
        let assembly = self.assembly;
        std::iter::once(id)
            .chain(assembly.base_chain(id))
            .find_map(|t| {
                assembly
                    .get(t)
                    .base
                    .as_ref()
                    .filter(|base| base.name == names::SYNC_LIST)
            })
            .and_then(|base| base.args.first())
    }
}
