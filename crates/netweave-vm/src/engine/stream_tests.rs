use super::error::RuntimeError;
use super::heap::ListOp;
use super::stream::{Reader, Wire, Writer, pack_u32, unpack_u32};
use super::value::Value;

fn packed(value: u32) -> Vec<u8> {
    let mut out = Vec::new();
    pack_u32(&mut out, value);
    out
}

#[test]
fn packed_encoding_boundaries() {
    assert_eq!(packed(0), [0]);
    assert_eq!(packed(240), [240]);
    assert_eq!(packed(241), [241, 1]);
    assert_eq!(packed(2287), [248, 255]);
    assert_eq!(packed(2288), [249, 0, 0]);
    assert_eq!(packed(67823), [249, 255, 255]);
    assert_eq!(packed(67824), [250, 0xF0, 0x08, 0x01]);
    assert_eq!(packed(16_777_215), [250, 255, 255, 255]);
    assert_eq!(packed(16_777_216), [251, 0, 0, 0, 1]);
    assert_eq!(packed(u32::MAX), [251, 255, 255, 255, 255]);
}

#[test]
fn packed_decoding_advances_past_each_value() {
    let mut bytes = packed(2287);
    bytes.extend(packed(7));
    bytes.extend(packed(67824));

    let mut pos = 0;
    assert_eq!(unpack_u32(&bytes, &mut pos), Ok(2287));
    assert_eq!(pos, 2);
    assert_eq!(unpack_u32(&bytes, &mut pos), Ok(7));
    assert_eq!(unpack_u32(&bytes, &mut pos), Ok(67824));
    assert_eq!(pos, bytes.len());
}

#[test]
fn truncated_packed_value_underruns() {
    let mut pos = 0;
    assert_eq!(
        unpack_u32(&[249, 1], &mut pos),
        Err(RuntimeError::StreamUnderrun)
    );
    assert_eq!(unpack_u32(&[], &mut 0), Err(RuntimeError::StreamUnderrun));
}

#[test]
fn strings_carry_byte_length() {
    let mut w = Writer::new();
    w.write_string("hé").unwrap();
    assert_eq!(w.bytes(), [3, 0, b'h', 0xC3, 0xA9]);

    let mut r = Reader::new(w.into_bytes());
    assert_eq!(r.read_string().unwrap(), "hé");
    assert_eq!(r.remaining(), 0);
}

#[test]
fn oversized_strings_are_refused() {
    let mut w = Writer::new();
    let limit = "x".repeat(usize::from(u16::MAX));
    w.write_string(&limit).unwrap();
    assert_eq!(w.bytes()[..2], [0xFF, 0xFF]);

    let mut w = Writer::new();
    let long = Value::Str("x".repeat(usize::from(u16::MAX) + 1));
    assert_eq!(
        Wire::String.write(&mut w, &long),
        Err(RuntimeError::StringTooLong(65536))
    );
    assert!(w.bytes().is_empty());
}

#[test]
fn invalid_utf8_is_rejected() {
    let mut r = Reader::new(vec![1, 0, 0xFF]);
    assert_eq!(r.read_string(), Err(RuntimeError::InvalidString));
}

#[test]
fn null_string_writes_empty() {
    let mut w = Writer::new();
    Wire::String.write(&mut w, &Value::Null).unwrap();
    assert_eq!(w.bytes(), [0, 0]);
}

#[test]
fn fixed_width_values_are_little_endian() {
    let mut w = Writer::new();
    Wire::Int32.write(&mut w, &Value::I32(-2)).unwrap();
    Wire::Int16.write(&mut w, &Value::I32(258)).unwrap();
    Wire::Boolean.write(&mut w, &Value::Bool(true)).unwrap();
    Wire::Single.write(&mut w, &Value::F32(1.5)).unwrap();
    assert_eq!(
        w.bytes(),
        [0xFE, 0xFF, 0xFF, 0xFF, 2, 1, 1, 0x00, 0x00, 0xC0, 0x3F]
    );

    let mut r = Reader::new(w.into_bytes());
    assert_eq!(Wire::Int32.read(&mut r), Ok(Value::I32(-2)));
    assert_eq!(Wire::Int16.read(&mut r), Ok(Value::I32(258)));
    assert_eq!(Wire::Boolean.read(&mut r), Ok(Value::Bool(true)));
    assert_eq!(Wire::Single.read(&mut r), Ok(Value::F32(1.5)));
}

#[test]
fn wrong_value_kind_is_a_type_mismatch() {
    let mut w = Writer::new();
    assert_eq!(
        Wire::Single.write(&mut w, &Value::I32(1)),
        Err(RuntimeError::TypeMismatch {
            expected: "float",
            found: "I32(1)".into(),
        })
    );
}

#[test]
fn encodings_resolve_from_type_names() {
    assert_eq!(Wire::of_type("System.UInt16"), Some(Wire::UInt16));
    assert_eq!(Wire::of_type("Engine.Vector3"), Some(Wire::Vector3));
    assert_eq!(Wire::of_type("Net.NetworkInstanceId"), Some(Wire::InstanceId));
    assert_eq!(Wire::from_suffix("PackedUInt32"), Some(Wire::Packed));
    assert_eq!(Wire::of_type("Game.Player"), None);
}

#[test]
fn list_ops_carry_code_index_and_item() {
    let mut w = Writer::new();
    ListOp::Insert(1, Value::I32(7))
        .encode(&mut w, Wire::Int32)
        .unwrap();
    ListOp::Clear.encode(&mut w, Wire::Int32).unwrap();
    assert_eq!(w.bytes(), [2, 1, 7, 0, 0, 0, 1, 0]);

    let mut r = Reader::new(w.into_bytes());
    assert_eq!(
        ListOp::decode(&mut r, Wire::Int32),
        Ok(ListOp::Insert(1, Value::I32(7)))
    );
    assert_eq!(ListOp::decode(&mut r, Wire::Int32), Ok(ListOp::Clear));
}

#[test]
fn unknown_list_op_is_rejected() {
    let mut r = Reader::new(vec![3, 0]);
    assert_eq!(
        ListOp::decode(&mut r, Wire::Int32),
        Err(RuntimeError::UnknownListOp(3))
    );
}

#[test]
fn list_ops_apply_in_place() {
    let mut items = vec![Value::I32(1), Value::I32(2)];
    ListOp::Set(0, Value::I32(9)).apply(&mut items).unwrap();
    ListOp::RemoveAt(1).apply(&mut items).unwrap();
    ListOp::Add(Value::I32(4)).apply(&mut items).unwrap();
    assert_eq!(items, [Value::I32(9), Value::I32(4)]);

    assert_eq!(
        ListOp::RemoveAt(5).apply(&mut items),
        Err(RuntimeError::ListIndex { index: 5, len: 2 })
    );
}
