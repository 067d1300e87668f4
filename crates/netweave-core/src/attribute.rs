use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Constant argument of a custom attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// Custom attribute attached to a type or member, with named arguments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(default)]
    pub args: IndexMap<String, AttrValue>,
}

impl Attribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: IndexMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        match self.args.get(key)? {
            AttrValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Float argument; integer literals are widened.
    pub fn float(&self, key: &str) -> Option<f64> {
        match self.args.get(key)? {
            AttrValue::Float(v) => Some(*v),
            AttrValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        match self.args.get(key)? {
            AttrValue::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Int(v.into())
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Str(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Str(v)
    }
}
