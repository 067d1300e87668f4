/// Errors raised while executing a method body.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    #[error("execution exceeded {0} steps")]
    FuelExhausted(u32),

    #[error("call depth exceeded {0}")]
    RecursionLimit(u32),

    #[error("stack underflow in `{0}`")]
    StackUnderflow(String),

    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("unknown type `{0}`")]
    UnknownType(String),

    #[error("unknown method `{0}`")]
    UnknownMethod(String),

    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("branch to undefined label L{0}")]
    UnknownLabel(u32),

    #[error("`{0}` ended without `ret`")]
    MissingRet(String),

    #[error("argument {index} out of range in `{method}`")]
    BadSlot { method: String, index: u16 },

    #[error("null reference")]
    NullReference,

    #[error("cannot cast `{from}` to `{to}`")]
    InvalidCast { from: String, to: String },

    #[error("read past the end of the message")]
    StreamUnderrun,

    #[error("string of {0} bytes exceeds the 65535-byte wire limit")]
    StringTooLong(usize),

    #[error("string payload is not valid UTF-8")]
    InvalidString,

    #[error("no handler registered for routing id {0}")]
    UnknownHandler(i32),

    #[error("message tag {found} does not match handler tag {expected}")]
    TagMismatch { expected: i16, found: i16 },

    #[error("no object with net id {net_id} handles `{ty}`")]
    UnknownObject { net_id: u32, ty: String },

    #[error("unknown collection operation {0}")]
    UnknownListOp(u8),

    #[error("collection index {index} out of range (length {len})")]
    ListIndex { index: usize, len: usize },
}
