use super::value::Value;

pub trait BencodeEncode {
    fn bencode(&self, buf: &mut Vec<u8>);
}

impl BencodeEncode for i64 {
    fn bencode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(b"i");

        let mut buffer = itoa::Buffer::new();
        buf.extend_from_slice(buffer.format(*self).as_bytes());
        buf.extend_from_slice(b"e");
    }
}

impl BencodeEncode for &[u8] {
    fn bencode(&self, buf: &mut Vec<u8>) {
        let mut buffer = itoa::Buffer::new();
        buf.extend_from_slice(buffer.format(self.len()).as_bytes());
        buf.extend_from_slice(b":");
        buf.extend_from_slice(self);
    }
}

impl BencodeEncode for &str {
    fn bencode(&self, buf: &mut Vec<u8>) {
        self.as_bytes().bencode(buf);
    }
}

impl BencodeEncode for Vec<u8> {
    fn bencode(&self, buf: &mut Vec<u8>) {
        self.as_slice().bencode(buf);
    }
}

impl Value {
    /// Encode to bencoded bytes
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode_into(&mut buf);
        buf
    }

    /// Encode into an existing buffer
    ///
    /// Dictionary pairs are written in stored order, not re-sorted: the
    /// stored order is the order the input carried, and the info-hash
    /// depends on reproducing it.
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        match self {
            Value::Integer(i) => i.bencode(buf),
            Value::Bytes(bytes) => bytes.bencode(buf),
            Value::List(items) => {
                buf.extend_from_slice(b"l");
                for item in items {
                    item.encode_into(buf);
                }
                buf.extend_from_slice(b"e");
            }
            Value::Dict(pairs) => {
                buf.extend_from_slice(b"d");
                for (key, value) in pairs {
                    key.bencode(buf);
                    value.encode_into(buf);
                }
                buf.extend_from_slice(b"e");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_integer() {
        let mut buf = Vec::new();
        42i64.bencode(&mut buf);
        assert_eq!(buf, b"i42e");

        let mut buf = Vec::new();
        (-42i64).bencode(&mut buf);
        assert_eq!(buf, b"i-42e");

        let mut buf = Vec::new();
        0i64.bencode(&mut buf);
        assert_eq!(buf, b"i0e");
    }

    #[test]
    fn test_encode_bytes() {
        let mut buf = Vec::new();
        b"hello".as_slice().bencode(&mut buf);
        assert_eq!(buf, b"5:hello");

        let mut buf = Vec::new();
        b"".as_slice().bencode(&mut buf);
        assert_eq!(buf, b"0:");
    }

    #[test]
    fn test_encode_string() {
        let mut buf = Vec::new();
        "spam".bencode(&mut buf);
        assert_eq!(buf, b"4:spam");
    }

    #[test]
    fn test_encode_value_list() {
        let list = Value::List(vec![
            Value::Bytes(b"spam".to_vec()),
            Value::Integer(42),
        ]);
        assert_eq!(list.encode(), b"l4:spami42ee");
    }

    #[test]
    fn test_encode_value_dict_preserves_order() {
        // Keys deliberately out of sorted order; encoding must not re-sort
        let dict = Value::Dict(vec![
            (b"foo".to_vec(), Value::Integer(42)),
            (b"bar".to_vec(), Value::Integer(100)),
        ]);
        assert_eq!(dict.encode(), b"d3:fooi42e3:bari100ee");
    }

    #[test]
    fn test_encode_nested() {
        let dict = Value::Dict(vec![(
            b"info".to_vec(),
            Value::Dict(vec![(b"length".to_vec(), Value::Integer(500000))]),
        )]);
        assert_eq!(dict.encode(), b"d4:infod6:lengthi500000eee");
    }
}
