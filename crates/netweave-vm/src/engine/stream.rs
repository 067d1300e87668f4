//! Wire codec of the runtime's message writer and reader.
//!
//! Fixed-width integers and floats are little-endian. Strings carry a
//! 16-bit byte length, so longer ones are refused. Routing ids, dirty masks and entity identities use
//! the variable-length packed encoding.

use netweave_core::short_name;

use super::error::RuntimeError;
use super::value::Value;

/// Appends `value` in packed form: 1 byte up to 240, 2 up to 2287,
/// 3 up to 67823, 4 up to 16777215, 5 otherwise.
pub fn pack_u32(out: &mut Vec<u8>, value: u32) {
    match value {
        0..=240 => out.push(value as u8),
        241..=2287 => {
            let v = value - 240;
            out.push((v / 256 + 241) as u8);
            out.push((v % 256) as u8);
        }
        2288..=67823 => {
            let v = value - 2288;
            out.push(249);
            out.push((v / 256) as u8);
            out.push((v % 256) as u8);
        }
        67824..=16_777_215 => {
            out.push(250);
            out.extend_from_slice(&value.to_le_bytes()[..3]);
        }
        _ => {
            out.push(251);
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
}

/// Reads one packed value at `*pos`, advancing it.
pub fn unpack_u32(bytes: &[u8], pos: &mut usize) -> Result<u32, RuntimeError> {
    let mut next = || -> Result<u32, RuntimeError> {
        let b = *bytes.get(*pos).ok_or(RuntimeError::StreamUnderrun)?;
        *pos += 1;
        Ok(u32::from(b))
    };
    let a0 = next()?;
    if a0 < 241 {
        return Ok(a0);
    }
    let a1 = next()?;
    if a0 <= 248 {
        return Ok(240 + 256 * (a0 - 241) + a1);
    }
    let a2 = next()?;
    if a0 == 249 {
        return Ok(2288 + 256 * a1 + a2);
    }
    let a3 = next()?;
    if a0 == 250 {
        return Ok(a1 | (a2 << 8) | (a3 << 16));
    }
    let a4 = next()?;
    Ok(a1 | (a2 << 8) | (a3 << 16) | (a4 << 24))
}

/// Growable outbound message buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Writer {
    bytes: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn write_packed(&mut self, value: u32) {
        pack_u32(&mut self.bytes, value);
    }

    pub fn write_i16(&mut self, value: i16) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_string(&mut self, value: &str) -> Result<(), RuntimeError> {
        let len =
            u16::try_from(value.len()).map_err(|_| RuntimeError::StringTooLong(value.len()))?;
        self.write_u16(len);
        self.write_bytes(value.as_bytes());
        Ok(())
    }
}

/// Inbound message cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reader {
    bytes: Vec<u8>,
    pos: usize,
}

impl Reader {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N], RuntimeError> {
        let end = self.pos + N;
        let slice = self
            .bytes
            .get(self.pos..end)
            .ok_or(RuntimeError::StreamUnderrun)?;
        self.pos = end;
        let mut out = [0; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    pub fn read_packed(&mut self) -> Result<u32, RuntimeError> {
        unpack_u32(&self.bytes, &mut self.pos)
    }

    pub fn read_i16(&mut self) -> Result<i16, RuntimeError> {
        self.read_bytes().map(i16::from_le_bytes)
    }

    pub fn read_u16(&mut self) -> Result<u16, RuntimeError> {
        self.read_bytes().map(u16::from_le_bytes)
    }

    pub fn read_string(&mut self) -> Result<String, RuntimeError> {
        let len = usize::from(self.read_u16()?);
        let end = self.pos + len;
        let slice = self
            .bytes
            .get(self.pos..end)
            .ok_or(RuntimeError::StreamUnderrun)?;
        self.pos = end;
        String::from_utf8(slice.to_vec()).map_err(|_| RuntimeError::InvalidString)
    }
}

/// Wire encoding of one marshalled type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wire {
    Boolean,
    Byte,
    SByte,
    Char,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    String,
    Vector3,
    Packed,
    InstanceId,
}

impl Wire {
    /// Encoding named by a `Write{Name}` / `Read{Name}` suffix.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Some(match suffix {
            "Boolean" => Wire::Boolean,
            "Byte" => Wire::Byte,
            "SByte" => Wire::SByte,
            "Char" => Wire::Char,
            "Int16" => Wire::Int16,
            "UInt16" => Wire::UInt16,
            "Int32" => Wire::Int32,
            "UInt32" => Wire::UInt32,
            "Int64" => Wire::Int64,
            "UInt64" => Wire::UInt64,
            "Single" => Wire::Single,
            "Double" => Wire::Double,
            "String" => Wire::String,
            "Vector3" => Wire::Vector3,
            "PackedUInt32" => Wire::Packed,
            "NetworkInstanceId" => Wire::InstanceId,
            _ => return None,
        })
    }

    /// Encoding of a declared type, by its full name.
    pub fn of_type(full_name: &str) -> Option<Self> {
        Self::from_suffix(short_name(full_name))
    }

    /// Value a field of this type holds before its first store.
    pub fn default_value(self) -> Value {
        match self {
            Wire::Boolean => Value::Bool(false),
            Wire::Int64 | Wire::UInt64 => Value::I64(0),
            Wire::Single => Value::F32(0.0),
            Wire::Double => Value::F64(0.0),
            Wire::String => Value::Null,
            Wire::Vector3 => Value::Vec3([0.0; 3]),
            Wire::InstanceId => Value::InstanceId(0),
            _ => Value::I32(0),
        }
    }

    pub fn write(self, w: &mut Writer, value: &Value) -> Result<(), RuntimeError> {
        match (self, value) {
            (Wire::Boolean, v) => w.write_bytes(&[u8::from(v.is_truthy())]),
            (Wire::Byte | Wire::SByte, v) => w.write_bytes(&[v.as_i32()? as u8]),
            (Wire::Char | Wire::Int16 | Wire::UInt16, v) => {
                w.write_bytes(&(v.as_i32()? as u16).to_le_bytes())
            }
            (Wire::Int32 | Wire::UInt32, v) => w.write_bytes(&v.as_i32()?.to_le_bytes()),
            (Wire::Int64 | Wire::UInt64, Value::I64(n)) => w.write_bytes(&n.to_le_bytes()),
            (Wire::Single, Value::F32(x)) => w.write_bytes(&x.to_le_bytes()),
            (Wire::Double, Value::F64(x)) => w.write_bytes(&x.to_le_bytes()),
            (Wire::String, Value::Null) => w.write_string("")?,
            (Wire::String, Value::Str(s)) => w.write_string(s)?,
            (Wire::Vector3, Value::Vec3(v)) => {
                for x in v {
                    w.write_bytes(&x.to_le_bytes());
                }
            }
            (Wire::Packed, v) => w.write_packed(v.as_i32()? as u32),
            (Wire::InstanceId, v) => w.write_packed(v.as_instance_id()?),
            (wire, v) => {
                return Err(RuntimeError::TypeMismatch {
                    expected: wire.expected(),
                    found: format!("{v:?}"),
                });
            }
        }
        Ok(())
    }

    pub fn read(self, r: &mut Reader) -> Result<Value, RuntimeError> {
        Ok(match self {
            Wire::Boolean => Value::Bool(r.read_bytes::<1>()?[0] != 0),
            Wire::Byte => Value::I32(i32::from(r.read_bytes::<1>()?[0])),
            Wire::SByte => Value::I32(i32::from(r.read_bytes::<1>()?[0] as i8)),
            Wire::Char | Wire::UInt16 => Value::I32(i32::from(r.read_u16()?)),
            Wire::Int16 => Value::I32(i32::from(r.read_i16()?)),
            Wire::Int32 | Wire::UInt32 => Value::I32(i32::from_le_bytes(r.read_bytes()?)),
            Wire::Int64 | Wire::UInt64 => Value::I64(i64::from_le_bytes(r.read_bytes()?)),
            Wire::Single => Value::F32(f32::from_le_bytes(r.read_bytes()?)),
            Wire::Double => Value::F64(f64::from_le_bytes(r.read_bytes()?)),
            Wire::String => Value::Str(r.read_string()?),
            Wire::Vector3 => Value::Vec3([
                f32::from_le_bytes(r.read_bytes()?),
                f32::from_le_bytes(r.read_bytes()?),
                f32::from_le_bytes(r.read_bytes()?),
            ]),
            Wire::Packed => Value::I32(r.read_packed()? as i32),
            Wire::InstanceId => Value::InstanceId(r.read_packed()?),
        })
    }

    fn expected(self) -> &'static str {
        match self {
            Wire::Int64 | Wire::UInt64 => "long",
            Wire::Single => "float",
            Wire::Double => "double",
            Wire::String => "string",
            Wire::Vector3 => "vector",
            Wire::InstanceId => "instance id",
            _ => "int",
        }
    }
}
