use crate::{
    config::{MenuConfig, SelectFallback},
    data::{item::MenuItem, select::OptionSet},
    error::{MenuError, Result},
};

/// Edit session over the options of a select item.
///
/// Stepping only moves an index; the bound variable is written once, on
/// [`commit`](Self::commit).
#[derive(Debug)]
pub struct OptionCursor<'s, 'a> {
    item: &'s MenuItem<'a>,
    select: &'a OptionSet<'a>,
    index: usize,
    wrap: bool,
}

impl<'s, 'a> OptionCursor<'s, 'a> {
    /// Start editing `item` at the option matching its current value.
    ///
    /// A value outside the option set starts at index 0 unless
    /// `config.select_fallback` rejects it.
    pub fn open(item: &'s MenuItem<'a>, config: &MenuConfig) -> Result<Self> {
        let not_select = || MenuError::NotApplicable(item.item_type());
        let select = item.select_options().ok_or_else(not_select)?;
        let binding = item.binding().ok_or_else(not_select)?;
        if select.is_empty() {
            return Err(MenuError::IndexOutOfRange { index: 0, len: 0 });
        }

        let index = match select.selected_index(binding) {
            Ok(index) => index,
            Err(MenuError::NotFound) => match config.select_fallback {
                SelectFallback::First => {
                    warn!(
                        "`{}` holds {}, which matches no option; starting at the first",
                        item.title(),
                        binding.read()
                    );
                    0
                }
                SelectFallback::Reject => return Err(MenuError::NotFound),
            },
            Err(e) => return Err(e),
        };

        Ok(Self {
            item,
            select,
            index,
            wrap: config.wrap_options,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> &'a str {
        // `index` stays in range for the cursor's lifetime.
        self.select.label_at(self.index).unwrap_or_default()
    }

    pub fn next(&mut self) {
        let last = self.select.len() - 1;
        self.index = match self.index {
            i if i < last => i + 1,
            _ if self.wrap => 0,
            i => i,
        };
    }

    pub fn prev(&mut self) {
        let last = self.select.len() - 1;
        self.index = match self.index {
            0 if self.wrap => last,
            0 => 0,
            i => i - 1,
        };
    }

    /// Write the chosen option to the item's variable and run its save action.
    pub fn commit(self) -> Result<()> {
        self.item.commit_option(self.index)
    }
}
