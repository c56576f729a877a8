use super::value::Value;
use crate::core::error::BencodeError;

/// Decode a complete bencoded value
///
/// The whole input must be consumed; trailing bytes are an error. Dictionary
/// key order is preserved as-is (see [`Value`]).
pub fn decode(input: &[u8]) -> Result<Value, BencodeError> {
    let mut parser = Parser { input, pos: 0 };
    let value = parser.parse_value()?;

    if parser.pos != input.len() {
        return Err(BencodeError::TrailingData);
    }

    Ok(value)
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Result<u8, BencodeError> {
        self.input
            .get(self.pos)
            .copied()
            .ok_or(BencodeError::UnexpectedEof)
    }

    fn parse_value(&mut self) -> Result<Value, BencodeError> {
        match self.peek()? {
            b'i' => self.parse_integer(),
            b'l' => self.parse_list(),
            b'd' => self.parse_dict(),
            b'0'..=b'9' => self.parse_bytes().map(Value::Bytes),
            other => Err(BencodeError::UnexpectedByte(other, self.pos)),
        }
    }

    fn parse_integer(&mut self) -> Result<Value, BencodeError> {
        self.pos += 1; // 'i'
        let start = self.pos;

        while self.peek()? != b'e' {
            self.pos += 1;
        }

        let digits = &self.input[start..self.pos];
        self.pos += 1; // 'e'

        let text = std::str::from_utf8(digits).map_err(|_| BencodeError::InvalidInteger)?;
        text.parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| BencodeError::InvalidInteger)
    }

    fn parse_bytes(&mut self) -> Result<Vec<u8>, BencodeError> {
        let start = self.pos;

        while self.peek()? != b':' {
            if !self.peek()?.is_ascii_digit() {
                return Err(BencodeError::InvalidLength);
            }
            self.pos += 1;
        }

        let digits = &self.input[start..self.pos];
        self.pos += 1; // ':'

        if digits.is_empty() {
            return Err(BencodeError::InvalidLength);
        }

        let len = std::str::from_utf8(digits)
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or(BencodeError::InvalidLength)?;

        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.input.len())
            .ok_or(BencodeError::UnexpectedEof)?;

        let bytes = self.input[self.pos..end].to_vec();
        self.pos = end;
        Ok(bytes)
    }

    fn parse_list(&mut self) -> Result<Value, BencodeError> {
        self.pos += 1; // 'l'
        let mut items = Vec::new();

        while self.peek()? != b'e' {
            items.push(self.parse_value()?);
        }

        self.pos += 1; // 'e'
        Ok(Value::List(items))
    }

    fn parse_dict(&mut self) -> Result<Value, BencodeError> {
        self.pos += 1; // 'd'
        let mut pairs = Vec::new();

        while self.peek()? != b'e' {
            if !self.peek()?.is_ascii_digit() {
                return Err(BencodeError::InvalidKey);
            }
            let key = self.parse_bytes()?;
            let value = self.parse_value()?;
            pairs.push((key, value));
        }

        self.pos += 1; // 'e'
        Ok(Value::Dict(pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_integer() {
        assert_eq!(decode(b"i42e").unwrap(), Value::Integer(42));
        assert_eq!(decode(b"i-42e").unwrap(), Value::Integer(-42));
        assert_eq!(decode(b"i0e").unwrap(), Value::Integer(0));
    }

    #[test]
    fn test_decode_bytes() {
        assert_eq!(decode(b"4:spam").unwrap(), Value::Bytes(b"spam".to_vec()));
        assert_eq!(decode(b"0:").unwrap(), Value::Bytes(Vec::new()));
    }

    #[test]
    fn test_decode_binary_bytes() {
        // Byte strings may contain arbitrary bytes, including NULs
        let value = decode(b"4:\x00\x01\xfe\xff").unwrap();
        assert_eq!(value, Value::Bytes(vec![0x00, 0x01, 0xfe, 0xff]));
    }

    #[test]
    fn test_decode_list() {
        assert_eq!(
            decode(b"l4:spami42ee").unwrap(),
            Value::List(vec![Value::Bytes(b"spam".to_vec()), Value::Integer(42)])
        );
        assert_eq!(decode(b"le").unwrap(), Value::List(Vec::new()));
    }

    #[test]
    fn test_decode_dict() {
        assert_eq!(
            decode(b"d3:bari100e3:fooi42ee").unwrap(),
            Value::Dict(vec![
                (b"bar".to_vec(), Value::Integer(100)),
                (b"foo".to_vec(), Value::Integer(42)),
            ])
        );
    }

    #[test]
    fn test_decode_dict_preserves_unsorted_key_order() {
        // Some real-world encoders emit unsorted keys; the decoder must keep
        // them as seen so re-encoding reproduces the input
        let input = b"d3:fooi42e3:bari100ee";
        let value = decode(input).unwrap();
        assert_eq!(value.encode(), input);
    }

    #[test]
    fn test_decode_nested() {
        let input = b"d8:announce16:http://localhost4:infod6:lengthi500000e4:name4:testee";

        let value = decode(input).unwrap();
        let info = value.get(b"info").unwrap();
        assert_eq!(info.get(b"length").and_then(Value::as_int), Some(500000));
        assert_eq!(
            info.get(b"name").and_then(Value::as_bytes),
            Some(b"test".as_slice())
        );
    }

    #[test]
    fn test_decode_truncated() {
        assert!(matches!(decode(b"i42"), Err(BencodeError::UnexpectedEof)));
        assert!(matches!(decode(b"10:short"), Err(BencodeError::UnexpectedEof)));
        assert!(matches!(decode(b"l4:spam"), Err(BencodeError::UnexpectedEof)));
        assert!(matches!(decode(b"d3:foo"), Err(BencodeError::UnexpectedEof)));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(decode(b"you sent me garbage - no info hash").is_err());
        assert!(decode(b"").is_err());
        assert!(decode(b"x").is_err());
    }

    #[test]
    fn test_decode_invalid_integer() {
        assert!(matches!(decode(b"ie"), Err(BencodeError::InvalidInteger)));
        assert!(matches!(decode(b"iabce"), Err(BencodeError::InvalidInteger)));
    }

    #[test]
    fn test_decode_trailing_data() {
        assert!(matches!(
            decode(b"i42etrailing"),
            Err(BencodeError::TrailingData)
        ));
    }

    #[test]
    fn test_decode_non_string_dict_key() {
        assert!(matches!(
            decode(b"di1ei2ee"),
            Err(BencodeError::InvalidKey)
        ));
    }

    #[test]
    fn test_roundtrip_metainfo_shape() {
        let metainfo = Value::Dict(vec![
            (b"announce".to_vec(), Value::Bytes(b"http://localhost".to_vec())),
            (b"comment".to_vec(), Value::Bytes(b"Test comment".to_vec())),
            (
                b"info".to_vec(),
                Value::Dict(vec![
                    (b"length".to_vec(), Value::Integer(500000)),
                    (b"name".to_vec(), Value::Bytes(b"Torrent for testing".to_vec())),
                    (b"piece length".to_vec(), Value::Integer(32768)),
                    (b"pieces".to_vec(), Value::Bytes(vec![0u8; 20 * 16])),
                    (b"private".to_vec(), Value::Integer(1)),
                ]),
            ),
        ]);

        let encoded = metainfo.encode();
        assert_eq!(decode(&encoded).unwrap(), metainfo);
    }
}
