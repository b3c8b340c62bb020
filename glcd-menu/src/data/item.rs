use core::{cell::Cell, fmt};

use serde_json::{Value as Json, json};

use crate::{
    data::{
        binding::ValueBinding,
        page::MenuPage,
        select::{OptionSet, Options},
        types::{ItemType, Value, until_nul},
    },
    error::{MenuError, Result},
};

/// Zero-argument user action (save or button callback).
///
/// Actions run to completion and must not re-enter the menu.
pub type Action<'a> = &'a dyn Fn();

/// Variant-specific part of a [`MenuItem`].
pub enum ItemKind<'a> {
    /// Edits the bound variable directly.
    Variable {
        binding: ValueBinding<'a>,
        save_action: Option<Action<'a>>,
    },
    /// Chooses the bound variable's value from an option set.
    Select {
        binding: ValueBinding<'a>,
        select: &'a OptionSet<'a>,
        save_action: Option<Action<'a>>,
    },
    /// Opens `page`.
    PageLink { page: &'a MenuPage<'a> },
    /// Returns to the owning page's parent. Only pages create these.
    BackLink { parent: Cell<Option<&'a MenuPage<'a>>> },
    /// Runs `action` in its own context.
    Button { action: Action<'a> },
}

/// What the controller should do after an item is activated.
#[derive(Debug)]
pub enum Activation<'s, 'a> {
    /// Enter edit mode for `binding`, choosing from `select` if present.
    Edit {
        binding: &'s ValueBinding<'a>,
        select: Option<&'a OptionSet<'a>>,
    },
    /// Switch the active page.
    Navigate(&'a MenuPage<'a>),
    /// The button action has run; the controller owns the button context.
    ButtonContext,
}

/// One row of a menu page.
///
/// Items live in caller-owned storage and are chained into their page
/// through an intrusive `next` link, so building a menu allocates nothing.
pub struct MenuItem<'a> {
    title: &'a str,
    kind: ItemKind<'a>,
    pub(crate) next: Cell<Option<&'a MenuItem<'a>>>,
    pub(crate) linked: Cell<bool>,
}

impl<'a> MenuItem<'a> {
    fn with_kind(title: &'a str, kind: ItemKind<'a>) -> Self {
        Self {
            title,
            kind,
            next: Cell::new(None),
            linked: Cell::new(false),
        }
    }

    /// Option select bound to `binding`, with a save action.
    ///
    /// `binding` and `select` must share a scalar type, and text options
    /// must fit the bound buffer; debug builds assert both.
    pub fn select_with_action(
        title: &'a str,
        binding: ValueBinding<'a>,
        select: &'a OptionSet<'a>,
        save_action: Action<'a>,
    ) -> Self {
        Self::new_select(title, binding, select, Some(save_action))
    }

    /// Option select bound to `binding`.
    ///
    /// `binding` and `select` must share a scalar type, and text options
    /// must fit the bound buffer; debug builds assert both.
    pub fn select(title: &'a str, binding: ValueBinding<'a>, select: &'a OptionSet<'a>) -> Self {
        Self::new_select(title, binding, select, None)
    }

    fn new_select(
        title: &'a str,
        binding: ValueBinding<'a>,
        select: &'a OptionSet<'a>,
        save_action: Option<Action<'a>>,
    ) -> Self {
        debug_assert_eq!(
            binding.scalar_type(),
            select.scalar_type(),
            "select item `{title}` binds a variable of another type than its options"
        );
        debug_assert!(
            text_options_fit(&binding, select),
            "select item `{title}` has text options longer than its buffer"
        );
        Self::with_kind(
            title,
            ItemKind::Select {
                binding,
                select,
                save_action,
            },
        )
    }

    /// Variable item with a save action.
    pub fn variable_with_action(
        title: &'a str,
        binding: ValueBinding<'a>,
        save_action: Action<'a>,
    ) -> Self {
        Self::with_kind(
            title,
            ItemKind::Variable {
                binding,
                save_action: Some(save_action),
            },
        )
    }

    /// Variable item. Readonly mode comes from the binding.
    pub fn variable(title: &'a str, binding: ValueBinding<'a>) -> Self {
        Self::with_kind(
            title,
            ItemKind::Variable {
                binding,
                save_action: None,
            },
        )
    }

    /// Link to another page.
    pub fn page_link(title: &'a str, page: &'a MenuPage<'a>) -> Self {
        Self::with_kind(title, ItemKind::PageLink { page })
    }

    /// Button running `action` when activated.
    pub fn button(title: &'a str, action: Action<'a>) -> Self {
        Self::with_kind(title, ItemKind::Button { action })
    }

    pub(crate) fn back_link(title: &'a str) -> Self {
        Self::with_kind(
            title,
            ItemKind::BackLink {
                parent: Cell::new(None),
            },
        )
    }

    pub fn title(&self) -> &'a str {
        self.title
    }

    pub fn kind(&self) -> &ItemKind<'a> {
        &self.kind
    }

    pub fn item_type(&self) -> ItemType {
        match self.kind {
            ItemKind::Variable { .. } => ItemType::Variable,
            ItemKind::Select { .. } => ItemType::Select,
            ItemKind::PageLink { .. } => ItemType::PageLink,
            ItemKind::BackLink { .. } => ItemType::BackLink,
            ItemKind::Button { .. } => ItemType::Button,
        }
    }

    /// Bound variable of variable and select items.
    pub fn binding(&self) -> Option<&ValueBinding<'a>> {
        match &self.kind {
            ItemKind::Variable { binding, .. } | ItemKind::Select { binding, .. } => Some(binding),
            _ => None,
        }
    }

    /// Option set of select items.
    pub fn select_options(&self) -> Option<&'a OptionSet<'a>> {
        match self.kind {
            ItemKind::Select { select, .. } => Some(select),
            _ => None,
        }
    }

    /// Target of page links, or the current parent for back links.
    pub fn linked_page(&self) -> Option<&'a MenuPage<'a>> {
        match &self.kind {
            ItemKind::PageLink { page } => Some(*page),
            ItemKind::BackLink { parent } => parent.get(),
            _ => None,
        }
    }

    pub(crate) fn set_back_target(&self, page: Option<&'a MenuPage<'a>>) {
        if let ItemKind::BackLink { parent } = &self.kind {
            parent.set(page);
        }
    }

    fn bound(&self) -> Result<&ValueBinding<'a>> {
        self.binding().ok_or(MenuError::NotApplicable(self.item_type()))
    }

    /// Set or clear readonly mode of the bound variable.
    ///
    /// Fails with [`MenuError::NotApplicable`] on links and buttons.
    pub fn set_readonly(&self, mode: bool) -> Result<()> {
        self.bound()?.set_readonly(mode);
        Ok(())
    }

    /// Readonly mode of the bound variable.
    ///
    /// Fails with [`MenuError::NotApplicable`] on links and buttons.
    pub fn readonly(&self) -> Result<bool> {
        Ok(self.bound()?.is_readonly())
    }

    /// Dispatch on the item variant.
    ///
    /// Buttons run their action before returning. Readonly variables
    /// refuse to enter edit mode.
    pub fn activate(&self) -> Result<Activation<'_, 'a>> {
        match &self.kind {
            ItemKind::Variable { binding, .. } | ItemKind::Select { binding, .. } => {
                if binding.is_readonly() {
                    return Err(MenuError::ReadonlyViolation);
                }
                Ok(Activation::Edit {
                    binding,
                    select: self.select_options(),
                })
            }
            ItemKind::PageLink { page } => {
                trace!("`{}` opens page `{}`", self.title, page.title());
                Ok(Activation::Navigate(page))
            }
            ItemKind::BackLink { parent } => {
                let page = parent.get().ok_or(MenuError::NoParent)?;
                trace!("back to page `{}`", page.title());
                Ok(Activation::Navigate(page))
            }
            ItemKind::Button { action } => {
                trace!("running button `{}`", self.title);
                action();
                Ok(Activation::ButtonContext)
            }
        }
    }

    /// Run the save action, if any.
    ///
    /// Called by [`commit`](Self::commit) and
    /// [`commit_option`](Self::commit_option) after a successful write;
    /// controllers writing through the binding directly call it themselves.
    pub fn on_commit(&self) {
        match &self.kind {
            ItemKind::Variable { save_action, .. } | ItemKind::Select { save_action, .. } => {
                if let Some(action) = save_action {
                    action();
                }
            }
            _ => {}
        }
    }

    /// Write `value` to the bound variable and run the save action.
    pub fn commit(&self, value: &Value) -> Result<()> {
        self.bound()?.write(value)?;
        trace!("`{}` saved", self.title);
        self.on_commit();
        Ok(())
    }

    /// Commit option `index` of a select item and run the save action.
    pub fn commit_option(&self, index: usize) -> Result<()> {
        let select = self
            .select_options()
            .ok_or(MenuError::NotApplicable(self.item_type()))?;
        select.commit_index_to(self.bound()?, index)?;
        trace!("`{}` saved option {index}", self.title);
        self.on_commit();
        Ok(())
    }

    /// Snapshot of the item for host-side mirrors.
    pub fn as_json(&self) -> Json {
        let mut obj = json!({
            "title": self.title,
            "type": self.item_type(),
        });

        if let Some(binding) = self.binding() {
            let value = binding.read();
            obj["readonly"] = Json::Bool(binding.is_readonly());
            if let Some(select) = self.select_options() {
                obj["option"] = select
                    .index_of_value(&value)
                    .and_then(|i| select.label_at(i))
                    .map_or(Json::Null, |label| Json::String(label.to_string()));
            }
            obj["value"] = serde_json::to_value(&value).unwrap_or(Json::Null);
        }

        if let Some(page) = self.linked_page() {
            obj["page"] = Json::String(page.title().to_string());
        }

        obj
    }
}

/// Whether every text option survives a commit into `binding` untruncated.
fn text_options_fit(binding: &ValueBinding<'_>, select: &OptionSet<'_>) -> bool {
    match (binding.text_capacity(), select.options()) {
        (Some(capacity), Options::Text(options)) => {
            let usable = capacity.saturating_sub(1);
            options
                .iter()
                .all(|opt| until_nul(opt.value.as_bytes()).len() <= usable)
        }
        _ => true,
    }
}

impl fmt::Debug for MenuItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("title", &self.title)
            .field("type", &self.item_type())
            .field("binding", &self.binding())
            .field("page", &self.linked_page().map(MenuPage::title))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{
        select::SelectOption,
        types::{READONLY, ScalarType},
    };

    #[test]
    fn test_variable_commit_runs_save_action() {
        let count = Cell::new(0i32);
        let saves = Cell::new(0u32);
        let on_save = || saves.set(saves.get() + 1);
        let item = MenuItem::variable_with_action("Count", ValueBinding::integer(&count), &on_save);

        assert_eq!(item.item_type(), ItemType::Variable);
        item.commit(&Value::Integer(12)).unwrap();
        assert_eq!(count.get(), 12);
        assert_eq!(saves.get(), 1);
    }

    #[test]
    fn test_failed_commit_skips_save_action() {
        let count = Cell::new(3i32);
        let saves = Cell::new(0u32);
        let on_save = || saves.set(saves.get() + 1);
        let item = MenuItem::variable_with_action(
            "Count",
            ValueBinding::integer(&count).readonly(READONLY),
            &on_save,
        );

        assert_eq!(item.commit(&Value::Integer(4)), Err(MenuError::ReadonlyViolation));
        assert_eq!(
            item.commit(&Value::Boolean(true)),
            Err(MenuError::ReadonlyViolation)
        );
        item.set_readonly(false).unwrap();
        assert_eq!(
            item.commit(&Value::Boolean(true)),
            Err(MenuError::TypeMismatch {
                expected: ScalarType::Integer,
                actual: ScalarType::Boolean,
            })
        );
        assert_eq!(count.get(), 3);
        assert_eq!(saves.get(), 0);
    }

    #[test]
    fn test_select_commit_option() {
        const OPTS: &[SelectOption<'static, u8>] =
            &[SelectOption::new("Low", 1), SelectOption::new("High", 9)];
        let select = OptionSet::byte(OPTS);
        let level = Cell::new(1u8);
        let saves = Cell::new(0u32);
        let on_save = || saves.set(saves.get() + 1);
        let item =
            MenuItem::select_with_action("Level", ValueBinding::byte(&level), &select, &on_save);

        match item.activate().unwrap() {
            Activation::Edit { binding, select } => {
                assert_eq!(binding.read(), Value::Byte(1));
                assert_eq!(select.unwrap().len(), 2);
            }
            other => panic!("unexpected activation {other:?}"),
        }

        item.commit_option(1).unwrap();
        assert_eq!(level.get(), 9);
        assert_eq!(saves.get(), 1);

        assert_eq!(
            item.commit_option(2),
            Err(MenuError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(level.get(), 9);
        assert_eq!(saves.get(), 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn test_select_type_mismatch_asserts() {
        const OPTS: &[SelectOption<'static, i32>] = &[SelectOption::new("One", 1)];
        let select = OptionSet::integer(OPTS);
        let level = Cell::new(1u8);
        let _ = MenuItem::select("Level", ValueBinding::byte(&level), &select);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "longer than its buffer")]
    fn test_select_text_option_too_long_asserts() {
        const OPTS: &[SelectOption<'static, &'static str>] =
            &[SelectOption::new("Auto", "auto"), SelectOption::new("Manual", "manual")];
        let select = OptionSet::text(OPTS);
        let mode = Cell::new([0u8; 4]);
        let _ = MenuItem::select("Mode", ValueBinding::text(&mode), &select);
    }

    #[test]
    fn test_select_text_options_fit() {
        const OPTS: &[SelectOption<'static, &'static str>] =
            &[SelectOption::new("Auto", "auto"), SelectOption::new("Manual", "manual\0x")];
        let select = OptionSet::text(OPTS);
        let mode = Cell::new([0u8; 7]);
        let item = MenuItem::select("Mode", ValueBinding::text(&mode), &select);

        item.commit_option(1).unwrap();
        assert_eq!(&mode.get(), b"manual\0");
        assert_eq!(select.selected_index(item.binding().unwrap()), Ok(1));
    }

    #[test]
    fn test_readonly_variable_refuses_edit() {
        let flag = Cell::new(false);
        let item = MenuItem::variable("Flag", ValueBinding::boolean(&flag).readonly(READONLY));

        assert_eq!(item.readonly(), Ok(true));
        assert!(matches!(item.activate(), Err(MenuError::ReadonlyViolation)));
        item.set_readonly(false).unwrap();
        assert!(matches!(item.activate(), Ok(Activation::Edit { select: None, .. })));
    }

    #[test]
    fn test_button_runs_action() {
        let pressed = Cell::new(false);
        let action = || pressed.set(true);
        let item = MenuItem::button("Go", &action);

        assert!(matches!(item.activate(), Ok(Activation::ButtonContext)));
        assert!(pressed.get());
        assert_eq!(item.readonly(), Err(MenuError::NotApplicable(ItemType::Button)));
        assert_eq!(
            item.set_readonly(true),
            Err(MenuError::NotApplicable(ItemType::Button))
        );
        assert_eq!(
            item.commit(&Value::Integer(1)),
            Err(MenuError::NotApplicable(ItemType::Button))
        );
    }

    #[test]
    fn test_page_link_navigates() {
        let target = MenuPage::new("Settings");
        let item = MenuItem::page_link("Settings", &target);

        match item.activate().unwrap() {
            Activation::Navigate(page) => assert!(core::ptr::eq(page, &target)),
            other => panic!("unexpected activation {other:?}"),
        }
        assert_eq!(
            item.set_readonly(true),
            Err(MenuError::NotApplicable(ItemType::PageLink))
        );
    }

    #[test]
    fn test_back_link_without_parent() {
        let item = MenuItem::back_link("Back");
        assert_eq!(item.item_type(), ItemType::BackLink);
        assert!(matches!(item.activate(), Err(MenuError::NoParent)));
    }

    #[test]
    fn test_as_json() {
        const OPTS: &[SelectOption<'static, &'static str>] =
            &[SelectOption::new("Red", "r"), SelectOption::new("Blue", "b")];
        let select = OptionSet::text(OPTS);
        let color = Cell::new(*b"b\0\0\0");
        let item = MenuItem::select("Color", ValueBinding::text(&color), &select);

        let json = item.as_json();
        assert_eq!(json["title"], "Color");
        assert_eq!(json["type"], "select");
        assert_eq!(json["value"], "b");
        assert_eq!(json["option"], "Blue");
        assert_eq!(json["readonly"], false);
    }
}
