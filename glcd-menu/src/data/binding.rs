use core::{cell::Cell, fmt};

use crate::{
    data::types::{ScalarType, TextValue, Value},
    error::{MenuError, Result},
};

/// Caller-owned storage a binding points at.
///
/// Each variant is a shared cell, so the application keeps reading its
/// variable while the menu holds a reference to it.
#[derive(Clone, Copy)]
pub enum VariableRef<'a> {
    /// Integer variable.
    Integer(&'a Cell<i32>),
    /// Byte variable.
    Byte(&'a Cell<u8>),
    /// Boolean variable.
    Boolean(&'a Cell<bool>),
    /// NUL-terminated text. The buffer length is its capacity.
    Text(&'a Cell<[u8]>),
}

impl VariableRef<'_> {
    /// Scalar type of the referenced storage.
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            VariableRef::Integer(_) => ScalarType::Integer,
            VariableRef::Byte(_) => ScalarType::Byte,
            VariableRef::Boolean(_) => ScalarType::Boolean,
            VariableRef::Text(_) => ScalarType::Text,
        }
    }
}

impl fmt::Debug for VariableRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableRef::Integer(c) => f.debug_tuple("Integer").field(&c.get()).finish(),
            VariableRef::Byte(c) => f.debug_tuple("Byte").field(&c.get()).finish(),
            VariableRef::Boolean(c) => f.debug_tuple("Boolean").field(&c.get()).finish(),
            VariableRef::Text(buf) => f
                .debug_struct("Text")
                .field("capacity", &buf.as_slice_of_cells().len())
                .finish(),
        }
    }
}

/// Association between a menu item and a caller-owned variable.
#[derive(Debug)]
pub struct ValueBinding<'a> {
    variable: VariableRef<'a>,
    readonly: Cell<bool>,
}

impl<'a> ValueBinding<'a> {
    /// Bind to arbitrary storage.
    pub fn new(variable: VariableRef<'a>) -> Self {
        Self {
            variable,
            readonly: Cell::new(false),
        }
    }

    /// Bind to an integer variable.
    pub fn integer(cell: &'a Cell<i32>) -> Self {
        Self::new(VariableRef::Integer(cell))
    }

    /// Bind to a byte variable.
    pub fn byte(cell: &'a Cell<u8>) -> Self {
        Self::new(VariableRef::Byte(cell))
    }

    /// Bind to a boolean variable.
    pub fn boolean(cell: &'a Cell<bool>) -> Self {
        Self::new(VariableRef::Boolean(cell))
    }

    /// Bind to a text buffer, usually a [`TextBuffer`].
    ///
    /// At most `buffer.len() - 1` bytes of text are stored; the rest is
    /// reserved for the terminator.
    ///
    /// [`TextBuffer`]: crate::data::types::TextBuffer
    pub fn text(buffer: &'a Cell<[u8]>) -> Self {
        Self::new(VariableRef::Text(buffer))
    }

    /// Builder-style readonly flag, e.g. `ValueBinding::byte(&b).readonly(READONLY)`.
    pub fn readonly(self, mode: bool) -> Self {
        self.readonly.set(mode);
        self
    }

    /// Scalar type of the bound variable.
    pub fn scalar_type(&self) -> ScalarType {
        self.variable.scalar_type()
    }

    /// The referenced storage.
    pub fn variable(&self) -> VariableRef<'a> {
        self.variable
    }

    /// Buffer length of text bindings, terminator included.
    pub fn text_capacity(&self) -> Option<usize> {
        match self.variable {
            VariableRef::Text(buf) => Some(buf.as_slice_of_cells().len()),
            _ => None,
        }
    }

    /// Set or clear readonly mode.
    pub fn set_readonly(&self, mode: bool) {
        self.readonly.set(mode);
    }

    /// Whether writes are rejected.
    pub fn is_readonly(&self) -> bool {
        self.readonly.get()
    }

    /// Current value of the bound variable.
    ///
    /// Text is read byte for byte up to the terminator or the end of the
    /// buffer, whichever comes first.
    pub fn read(&self) -> Value {
        match self.variable {
            VariableRef::Integer(c) => Value::Integer(c.get()),
            VariableRef::Byte(c) => Value::Byte(c.get()),
            VariableRef::Boolean(c) => Value::Boolean(c.get()),
            VariableRef::Text(buf) => {
                let bytes: Vec<u8> = buf
                    .as_slice_of_cells()
                    .iter()
                    .map(Cell::get)
                    .take_while(|&b| b != 0)
                    .collect();
                Value::Text(TextValue::from(&bytes[..]))
            }
        }
    }

    /// Store `value` into the bound variable.
    ///
    /// Text longer than capacity - 1 bytes is silently truncated. Readonly
    /// bindings are never touched.
    pub fn write(&self, value: &Value) -> Result<()> {
        if self.is_readonly() {
            debug!("rejecting write of {value} to readonly variable");
            return Err(MenuError::ReadonlyViolation);
        }

        match (self.variable, value) {
            (VariableRef::Integer(c), Value::Integer(v)) => c.set(*v),
            (VariableRef::Byte(c), Value::Byte(v)) => c.set(*v),
            (VariableRef::Boolean(c), Value::Boolean(v)) => c.set(*v),
            (VariableRef::Text(buf), Value::Text(s)) => write_text(buf, s),
            (variable, value) => {
                return Err(MenuError::TypeMismatch {
                    expected: variable.scalar_type(),
                    actual: value.scalar_type(),
                });
            }
        }
        trace!("variable set to {value}");
        Ok(())
    }
}

fn write_text(buf: &Cell<[u8]>, text: &TextValue) {
    let cells = buf.as_slice_of_cells();
    let Some(usable) = cells.len().checked_sub(1) else {
        return;
    };

    let bytes = text.as_bytes();
    let bytes = &bytes[..bytes.len().min(usable)];
    if bytes.len() < text.len() {
        warn!("text `{text}` truncated to {usable} bytes");
    }

    for (i, cell) in cells.iter().enumerate() {
        cell.set(bytes.get(i).copied().unwrap_or(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::{READONLY, TEXT_CAPACITY, TextBuffer};

    fn init_log() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_scalar_roundtrip() {
        init_log();
        let int = Cell::new(0i32);
        let byte = Cell::new(0u8);
        let flag = Cell::new(false);

        let b = ValueBinding::integer(&int);
        for v in [i32::MIN, -1, 0, 42, i32::MAX] {
            b.write(&Value::Integer(v)).unwrap();
            assert_eq!(b.read(), Value::Integer(v));
            assert_eq!(int.get(), v);
        }

        let b = ValueBinding::byte(&byte);
        for v in [0u8, 1, 128, 255] {
            b.write(&Value::Byte(v)).unwrap();
            assert_eq!(b.read(), Value::Byte(v));
        }

        let b = ValueBinding::boolean(&flag);
        b.write(&Value::Boolean(true)).unwrap();
        assert_eq!(b.read(), Value::Boolean(true));
        assert!(flag.get());
    }

    #[test]
    fn test_text_truncates_to_capacity() {
        init_log();
        let buf = Cell::new([0u8; 8]);
        let b = ValueBinding::text(&buf);

        b.write(&Value::from("TooLongString")).unwrap();
        assert_eq!(b.read(), Value::from("TooLong"));
        assert_eq!(&buf.get(), b"TooLong\0");

        b.write(&Value::from("ab")).unwrap();
        assert_eq!(b.read(), Value::from("ab"));
        assert_eq!(&buf.get(), b"ab\0\0\0\0\0\0");
    }

    #[test]
    fn test_text_standard_buffer() {
        let buf = Cell::new([0u8; TEXT_CAPACITY]);
        let b = ValueBinding::text(&buf);

        b.write(&Value::from("sixteen chars!!!")).unwrap();
        assert_eq!(b.read(), Value::from("sixteen chars!!!"));

        b.write(&Value::from("seventeen chars!!")).unwrap();
        assert_eq!(b.read(), Value::from("seventeen chars!"));
        let stored: TextBuffer = buf.get();
        assert_eq!(stored[TEXT_CAPACITY - 1], 0);
    }

    #[test]
    fn test_text_keeps_display_bytes() {
        let buf = Cell::new([0xff, b'a', 0, 0]);
        let b = ValueBinding::text(&buf);

        let v = b.read();
        assert_eq!(v.as_text().unwrap().as_bytes(), &[0xff, b'a']);
        b.write(&v).unwrap();
        assert_eq!(buf.get(), [0xff, b'a', 0, 0]);

        // 25 degrees C with the HD44780 degree glyph.
        b.write(&Value::from(&[b'2', b'5', 0xdf, b'C'][..])).unwrap();
        assert_eq!(buf.get(), [b'2', b'5', 0xdf, 0]);
        assert_eq!(b.read(), Value::from(&[b'2', b'5', 0xdf][..]));
    }

    #[test]
    fn test_text_truncates_on_bytes() {
        let buf = Cell::new([0u8; 3]);
        let b = ValueBinding::text(&buf);
        b.write(&Value::from("é!")).unwrap();
        assert_eq!(buf.get(), [0xc3, 0xa9, 0]);
        assert_eq!(b.read(), Value::from("é"));
    }

    #[test]
    fn test_text_capacity() {
        let buf = Cell::new([0u8; TEXT_CAPACITY]);
        let int = Cell::new(0i32);
        assert_eq!(ValueBinding::text(&buf).text_capacity(), Some(TEXT_CAPACITY));
        assert_eq!(ValueBinding::integer(&int).text_capacity(), None);
    }

    #[test]
    fn test_text_reads_unterminated_buffer() {
        let buf = Cell::new(*b"abcd");
        let b = ValueBinding::text(&buf);
        assert_eq!(b.read(), Value::from("abcd"));
    }

    #[test]
    fn test_empty_text_buffer_ignores_writes() {
        let buf = Cell::new([0u8; 0]);
        let b = ValueBinding::text(&buf);
        b.write(&Value::from("x")).unwrap();
        assert_eq!(b.read(), Value::from(""));
    }

    #[test]
    fn test_readonly_rejects_write() {
        init_log();
        let int = Cell::new(5i32);
        let text = Cell::new(*b"keep\0\0\0\0");
        let b = ValueBinding::integer(&int).readonly(READONLY);
        let t = ValueBinding::text(&text).readonly(READONLY);

        assert!(b.is_readonly());
        assert_eq!(b.write(&Value::Integer(9)), Err(MenuError::ReadonlyViolation));
        assert_eq!(int.get(), 5);
        assert_eq!(t.write(&Value::from("nope")), Err(MenuError::ReadonlyViolation));
        assert_eq!(&text.get(), b"keep\0\0\0\0");

        b.set_readonly(false);
        b.write(&Value::Integer(9)).unwrap();
        assert_eq!(int.get(), 9);
    }

    #[test]
    fn test_type_mismatch() {
        let byte = Cell::new(3u8);
        let b = ValueBinding::byte(&byte);
        assert_eq!(
            b.write(&Value::Integer(300)),
            Err(MenuError::TypeMismatch {
                expected: ScalarType::Byte,
                actual: ScalarType::Integer,
            })
        );
        assert_eq!(byte.get(), 3);
    }
}
