//! Activation record of one executing method.

use super::error::RuntimeError;
use super::value::Value;

#[derive(Debug)]
pub struct Frame {
    /// `Owner::Name`, for errors and traces.
    pub method: String,
    args: Vec<Value>,
    locals: Vec<Value>,
    pub(super) stack: Vec<Value>,
}

impl Frame {
    pub fn new(method: String, args: Vec<Value>, locals: Vec<Value>) -> Self {
        Self {
            method,
            args,
            locals,
            stack: Vec::new(),
        }
    }

    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    pub fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.stack
            .pop()
            .ok_or_else(|| RuntimeError::StackUnderflow(self.method.clone()))
    }

    /// Pops the top `n` values, bottom-most first.
    pub fn pop_n(&mut self, n: usize) -> Result<Vec<Value>, RuntimeError> {
        if self.stack.len() < n {
            return Err(RuntimeError::StackUnderflow(self.method.clone()));
        }
        Ok(self.stack.split_off(self.stack.len() - n))
    }

    /// The value `depth` slots below the top, without popping.
    pub fn peek(&self, depth: usize) -> Result<&Value, RuntimeError> {
        self.stack
            .len()
            .checked_sub(depth + 1)
            .map(|i| &self.stack[i])
            .ok_or_else(|| RuntimeError::StackUnderflow(self.method.clone()))
    }

    pub fn arg(&self, index: u16) -> Result<&Value, RuntimeError> {
        self.args.get(usize::from(index)).ok_or(RuntimeError::BadSlot {
            method: self.method.clone(),
            index,
        })
    }

    pub fn local(&self, index: u16) -> Result<&Value, RuntimeError> {
        self.locals.get(usize::from(index)).ok_or(RuntimeError::BadSlot {
            method: self.method.clone(),
            index,
        })
    }

    pub fn set_local(&mut self, index: u16, value: Value) -> Result<(), RuntimeError> {
        match self.locals.get_mut(usize::from(index)) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(RuntimeError::BadSlot {
                method: self.method.clone(),
                index,
            }),
        }
    }
}
