use std::io;
use std::io::{Read, Write};

/// Reading of big-endian words, as used by MNIST headers
pub trait ReadBigEndian {
    /// read exactly four bytes and interpret them
    /// as a big-endian unsigned integer
    fn read_u32_be(&mut self) -> io::Result<u32>;
}

/// Writing of big-endian words, as used by MNIST headers
pub trait WriteBigEndian {
    fn write_u32_be(&mut self, value: u32) -> io::Result<()>;
}

impl<T: Read + ?Sized> ReadBigEndian for T {
    fn read_u32_be(&mut self) -> io::Result<u32> {
        let mut buffer = [0; 4];
        self.read_exact(&mut buffer)?;
        Ok(u32::from_be_bytes(buffer))
    }
}

impl<T: Write + ?Sized> WriteBigEndian for T {
    fn write_u32_be(&mut self, value: u32) -> io::Result<()> {
        self.write_all(&value.to_be_bytes())
    }
}

/// Read until `buffer` is full or the stream ends.
///
/// Returns the number of bytes read, which is smaller than
/// the buffer length only if the end of the stream was reached.
pub fn read_up_to<T: Read + ?Sized>(reader: &mut T, buffer: &mut [u8]) -> io::Result<usize> {
    let mut bytes_read = 0;
    while bytes_read < buffer.len() {
        match reader.read(&mut buffer[bytes_read..]) {
            Ok(0) => break,
            Ok(n) => bytes_read += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(bytes_read)
}

#[cfg(test)]
mod test {
    use std::io::ErrorKind;

    use super::{read_up_to, ReadBigEndian, WriteBigEndian};

    #[test]
    fn read_big_endian_word() {
        let mut input: &[u8] = &[0x00, 0x00, 0x08, 0x03, 0xFF];
        let value = input.read_u32_be().expect("should not fail");
        assert_eq!(value, 2051);
        assert_eq!(input.len(), 1, "only four bytes must be consumed");
    }

    #[test]
    fn read_big_endian_word_from_short_stream() {
        let mut input: &[u8] = &[0x00, 0x08];
        let error = input.read_u32_be().expect_err("two bytes are not a word");
        assert_eq!(error.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn write_big_endian_word() {
        let mut my_output: Vec<u8> = vec![];
        my_output.write_u32_be(60000).expect("should not fail");
        assert_eq!(my_output, vec![0x00, 0x00, 0xEA, 0x60]);
    }

    #[test]
    fn read_up_to_stops_at_end_of_stream() {
        let mut input: &[u8] = &[1, 2, 3];
        let mut buffer = [0; 8];
        let bytes_read = read_up_to(&mut input, &mut buffer).expect("should not fail");
        assert_eq!(bytes_read, 3);
        assert_eq!(&buffer[..3], &[1, 2, 3]);
    }
}
