use crate::{
    data::{
        binding::ValueBinding,
        types::{ScalarType, Value, until_nul},
    },
    error::{MenuError, Result},
};

/// One labeled choice of an option select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOption<'a, T> {
    /// Label shown in the select.
    pub name: &'a str,
    /// Value assigned to the bound variable when this option is chosen.
    pub value: T,
}

impl<'a, T> SelectOption<'a, T> {
    /// Option labeled `name` carrying `value`.
    pub const fn new(name: &'a str, value: T) -> Self {
        Self { name, value }
    }
}

/// Caller-owned option records of one scalar type.
///
/// There is no boolean variant: a flag has nothing to choose from.
#[derive(Debug, Clone, Copy)]
pub enum Options<'a> {
    /// Options for an integer variable.
    Integer(&'a [SelectOption<'a, i32>]),
    /// Options for a byte variable.
    Byte(&'a [SelectOption<'a, u8>]),
    /// Options for a text variable; each value must fit the bound buffer.
    Text(&'a [SelectOption<'a, &'a str>]),
}

/// Fixed list of labeled values used to constrain a binding.
///
/// Lookups by value take the lowest index on ties, so duplicate values
/// always resolve to the same option.
#[derive(Debug, Clone, Copy)]
pub struct OptionSet<'a> {
    options: Options<'a>,
}

impl<'a> OptionSet<'a> {
    /// Option set over caller-owned records.
    pub const fn new(options: Options<'a>) -> Self {
        Self { options }
    }

    /// Option set for an integer variable.
    pub const fn integer(options: &'a [SelectOption<'a, i32>]) -> Self {
        Self::new(Options::Integer(options))
    }

    /// Option set for a byte variable.
    pub const fn byte(options: &'a [SelectOption<'a, u8>]) -> Self {
        Self::new(Options::Byte(options))
    }

    /// Option set for a text variable.
    pub const fn text(options: &'a [SelectOption<'a, &'a str>]) -> Self {
        Self::new(Options::Text(options))
    }

    /// The underlying records.
    pub fn options(&self) -> Options<'a> {
        self.options
    }

    /// Scalar type shared by all option values.
    pub fn scalar_type(&self) -> ScalarType {
        match self.options {
            Options::Integer(_) => ScalarType::Integer,
            Options::Byte(_) => ScalarType::Byte,
            Options::Text(_) => ScalarType::Text,
        }
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        match self.options {
            Options::Integer(o) => o.len(),
            Options::Byte(o) => o.len(),
            Options::Text(o) => o.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.len();
        if index < len {
            Ok(())
        } else {
            Err(MenuError::IndexOutOfRange { index, len })
        }
    }

    /// Label of the option at `index`.
    pub fn label_at(&self, index: usize) -> Result<&'a str> {
        self.check_index(index)?;
        Ok(match self.options {
            Options::Integer(o) => o[index].name,
            Options::Byte(o) => o[index].name,
            Options::Text(o) => o[index].name,
        })
    }

    /// Value of the option at `index`.
    pub fn value_at(&self, index: usize) -> Result<Value> {
        self.check_index(index)?;
        Ok(match self.options {
            Options::Integer(o) => Value::Integer(o[index].value),
            Options::Byte(o) => Value::Byte(o[index].value),
            Options::Text(o) => Value::from(o[index].value),
        })
    }

    /// Index of the first option whose value equals `value`.
    ///
    /// Text compares byte for byte as C strings: both sides end at their
    /// first NUL.
    pub fn index_of_value(&self, value: &Value) -> Result<usize> {
        let found = match (self.options, value) {
            (Options::Integer(o), Value::Integer(v)) => o.iter().position(|opt| opt.value == *v),
            (Options::Byte(o), Value::Byte(v)) => o.iter().position(|opt| opt.value == *v),
            (Options::Text(o), Value::Text(v)) => o
                .iter()
                .position(|opt| until_nul(opt.value.as_bytes()) == v.as_bytes()),
            (_, value) => {
                return Err(MenuError::TypeMismatch {
                    expected: self.scalar_type(),
                    actual: value.scalar_type(),
                });
            }
        };
        found.ok_or(MenuError::NotFound)
    }

    /// Index of the option matching the binding's current value.
    pub fn selected_index(&self, binding: &ValueBinding<'_>) -> Result<usize> {
        self.index_of_value(&binding.read())
    }

    /// Label of the option matching the binding's current value.
    pub fn selected_label(&self, binding: &ValueBinding<'_>) -> Result<&'a str> {
        self.label_at(self.selected_index(binding)?)
    }

    /// Write the value of option `index` into `binding`.
    ///
    /// The binding is left untouched when the index is out of range or
    /// the binding is readonly.
    pub fn commit_index_to(&self, binding: &ValueBinding<'_>, index: usize) -> Result<()> {
        let value = self.value_at(index)?;
        binding.write(&value)
    }
}
