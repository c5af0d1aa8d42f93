//! Big-endian cursor over a layout state buffer.
//!
//! All multi-byte integers in the state stream are big-endian. Strings are
//! stored as a `u32` byte length followed by UTF-16BE code units; a length of
//! `0xFFFF_FFFF` marks a null string.

use crate::error::{LayoutError, Result};

/// Length value used for a null string.
pub const NULL_STRING_LEN: u32 = 0xFFFF_FFFF;

/// Sequential reader over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Current read offset.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Whether every byte has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(LayoutError::UnexpectedEof {
                offset: self.offset,
                needed: len,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take_array::<1>()?[0])
    }

    /// Read a big-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.take_array()?))
    }

    /// Read a big-endian `i32`.
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.take_array()?))
    }

    /// Read a length-prefixed UTF-16BE string. Null strings read as empty.
    pub fn read_string(&mut self) -> Result<String> {
        let start = self.offset;
        let len = self.read_u32()?;
        if len == NULL_STRING_LEN {
            return Ok(String::new());
        }
        let len = len as usize;
        if len % 2 != 0 {
            return Err(LayoutError::invalid_string(
                start,
                format!("odd UTF-16 byte length {len}"),
            ));
        }
        let bytes = self.take(len)?;
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16(&units).map_err(|e| LayoutError::invalid_string(start, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16_field(value: &str) -> Vec<u8> {
        let units: Vec<u8> = value.encode_utf16().flat_map(u16::to_be_bytes).collect();
        let mut out = (units.len() as u32).to_be_bytes().to_vec();
        out.extend(units);
        out
    }

    #[test]
    fn test_read_integers_big_endian() {
        let data = [0x01, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff, 0xfe];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_u32().unwrap(), 0x0100_0000);
        assert_eq!(cursor.read_i32().unwrap(), -1);
        assert_eq!(cursor.read_u8().unwrap(), 0xfe);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_read_string() {
        let data = utf16_field("mainToolBar");
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_string().unwrap(), "mainToolBar");
        assert_eq!(cursor.offset(), data.len());
    }

    #[test]
    fn test_read_null_string() {
        let data = NULL_STRING_LEN.to_be_bytes();
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_string().unwrap(), "");
    }

    #[test]
    fn test_read_non_ascii_string() {
        let data = utf16_field("Панель ☃");
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_string().unwrap(), "Панель ☃");
    }

    #[test]
    fn test_odd_string_length_rejected() {
        let data = [0, 0, 0, 3, 0, b'a', 0];
        let mut cursor = ByteCursor::new(&data);
        assert!(matches!(
            cursor.read_string(),
            Err(LayoutError::InvalidString { offset: 0, .. })
        ));
    }

    #[test]
    fn test_truncated_read_reports_offset() {
        let data = [0, 0, 1];
        let mut cursor = ByteCursor::new(&data);
        let err = cursor.read_u32().unwrap_err();
        assert!(matches!(
            err,
            LayoutError::UnexpectedEof {
                offset: 0,
                needed: 4,
                remaining: 3
            }
        ));
    }
}
