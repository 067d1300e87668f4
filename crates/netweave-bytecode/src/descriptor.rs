use netweave_core::{Attribute, TypeRef, short_name};
use serde::{Deserialize, Serialize};

use crate::body::MethodBody;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeFlags {
    #[serde(default)]
    pub is_interface: bool,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_value_type: bool,
    #[serde(default)]
    pub before_field_init: bool,
}

/// A declared class, struct, interface or delegate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Full dotted name.
    pub name: String,
    pub module: String,
    #[serde(default)]
    pub base: Option<TypeRef>,
    #[serde(default)]
    pub flags: TypeFlags,
    #[serde(default)]
    pub generic_params: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
    #[serde(default)]
    pub events: Vec<EventDescriptor>,
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            base: None,
            flags: TypeFlags::default(),
            generic_params: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            events: Vec::new(),
            properties: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn with_base(mut self, base: impl Into<TypeRef>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_event(mut self, event: EventDescriptor) -> Self {
        self.events.push(event);
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn short_name(&self) -> &str {
        short_name(&self.name)
    }

    pub fn as_type_ref(&self) -> TypeRef {
        TypeRef::named(self.name.clone())
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn method_mut(&mut self, name: &str) -> Option<&mut MethodDescriptor> {
        self.methods.iter_mut().find(|m| m.name == name)
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.method(name).is_some()
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeRef,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            is_static: false,
            attributes: Vec::new(),
        }
    }

    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    pub name: String,
    pub ty: TypeRef,
    #[serde(default)]
    pub is_out: bool,
    #[serde(default)]
    pub is_optional: bool,
    #[serde(default)]
    pub by_ref: bool,
}

impl ParamDescriptor {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            is_out: false,
            is_optional: false,
            by_ref: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParamDescriptor>,
    #[serde(default = "TypeRef::void")]
    pub return_type: TypeRef,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub generic_params: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub body: Option<MethodBody>,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: TypeRef::void(),
            is_static: false,
            is_virtual: false,
            generic_params: Vec::new(),
            attributes: Vec::new(),
            body: None,
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        self.params.push(ParamDescriptor::new(name, ty));
        self
    }

    pub fn returning(mut self, ty: impl Into<TypeRef>) -> Self {
        self.return_type = ty.into();
        self
    }

    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn virtual_(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_body(mut self, body: MethodBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventDescriptor {
    pub name: String,
    pub delegate: TypeRef,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl EventDescriptor {
    pub fn new(name: impl Into<String>, delegate: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            delegate: delegate.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// Property binding a getter and setter method by name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    pub ty: TypeRef,
    #[serde(default)]
    pub getter: Option<String>,
    #[serde(default)]
    pub setter: Option<String>,
}
