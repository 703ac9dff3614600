//! Charstring encoding for tests.

use std::vec::Vec;

#[derive(Clone, Copy, Debug)]
pub enum Value {
    UInt8(u8),
    CFFInt(i32),
    CFFFixed(f32),
}

pub struct Writer {
    pub data: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Writer { data: Vec::with_capacity(16) }
    }

    pub fn write(&mut self, value: Value) {
        match value {
            Value::UInt8(n) => self.data.push(n),
            Value::CFFInt(n) => match n {
                -107..=107 => {
                    self.data.push((n as i16 + 139) as u8);
                }
                108..=1131 => {
                    let n = n - 108;
                    self.data.push(((n >> 8) + 247) as u8);
                    self.data.push(n as u8);
                }
                -1131..=-108 => {
                    let n = -n - 108;
                    self.data.push(((n >> 8) + 251) as u8);
                    self.data.push(n as u8);
                }
                -32768..=32767 => {
                    self.data.push(28);
                    self.data.extend_from_slice(&(n as i16).to_be_bytes());
                }
                _ => panic!("unsupported number"),
            },
            Value::CFFFixed(n) => {
                self.data.push(255);
                self.data.extend_from_slice(&((n * 65536.0) as i32).to_be_bytes());
            }
        }
    }
}

pub fn convert(values: &[Value]) -> Vec<u8> {
    let mut w = Writer::new();
    for v in values {
        w.write(*v);
    }

    w.data
}
