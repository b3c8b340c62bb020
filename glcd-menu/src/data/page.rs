use core::{cell::Cell, fmt};

use serde_json::{Value as Json, json};

use crate::{
    data::item::MenuItem,
    error::{MenuError, Result},
};

/// Title of the back-link row every page carries.
pub const BACK_TITLE: &str = "Back";

/// A page of menu items.
///
/// Items are appended in caller-owned storage and linked in insertion
/// order. Once a parent is set the page's own back link is listed first.
pub struct MenuPage<'a> {
    title: &'a str,
    head: Cell<Option<&'a MenuItem<'a>>>,
    tail: Cell<Option<&'a MenuItem<'a>>>,
    count: Cell<usize>,
    back: MenuItem<'a>,
}

impl<'a> MenuPage<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            head: Cell::new(None),
            tail: Cell::new(None),
            count: Cell::new(0),
            back: MenuItem::back_link(BACK_TITLE),
        }
    }

    pub fn title(&self) -> &'a str {
        self.title
    }

    /// Append `item` to the end of the page.
    ///
    /// An item belongs to at most one page and appears there once.
    pub fn add_item(&self, item: &'a MenuItem<'a>) -> Result<()> {
        if item.linked.replace(true) {
            debug!("`{}` is already on a page", item.title());
            return Err(MenuError::AlreadyLinked(item.title().to_string()));
        }

        match self.tail.replace(Some(item)) {
            Some(last) => last.next.set(Some(item)),
            None => self.head.set(Some(item)),
        }
        self.count.set(self.count.get() + 1);
        debug!("page `{}`: added `{}`", self.title, item.title());
        Ok(())
    }

    /// Make `parent` the back-navigation target. The last call wins.
    pub fn set_parent(&self, parent: &'a MenuPage<'a>) {
        debug!("page `{}`: parent is `{}`", self.title, parent.title());
        self.back.set_back_target(Some(parent));
    }

    pub fn parent(&self) -> Option<&'a MenuPage<'a>> {
        self.back.linked_page()
    }

    /// The page's back-link row, listed only while a parent is set.
    pub fn back_item(&self) -> &MenuItem<'a> {
        &self.back
    }

    /// Number of rows `items()` yields, back link included.
    pub fn len(&self) -> usize {
        self.count.get() + usize::from(self.parent().is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows in display order: the back link (when a parent is set), then
    /// the added items in insertion order. Each call starts over.
    pub fn items(&self) -> Items<'_, 'a> {
        Items {
            back: self.parent().map(|_| &self.back),
            next: self.head.get(),
        }
    }

    /// Row at `index` in [`items`](Self::items) order.
    pub fn item_at(&self, index: usize) -> Option<&MenuItem<'a>> {
        self.items().nth(index)
    }

    /// Snapshot of the page for host-side mirrors.
    pub fn as_json(&self) -> Json {
        json!({
            "title": self.title,
            "parent": self.parent().map(MenuPage::title),
            "items": self.items().map(MenuItem::as_json).collect::<Vec<_>>(),
        })
    }
}

impl fmt::Debug for MenuPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuPage")
            .field("title", &self.title)
            .field("parent", &self.parent().map(MenuPage::title))
            .field("items", &self.count.get())
            .finish()
    }
}

/// Iterator over the rows of a [`MenuPage`].
pub struct Items<'s, 'a> {
    back: Option<&'s MenuItem<'a>>,
    next: Option<&'a MenuItem<'a>>,
}

impl<'s, 'a> Iterator for Items<'s, 'a> {
    type Item = &'s MenuItem<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(back) = self.back.take() {
            return Some(back);
        }
        let item = self.next?;
        self.next = item.next.get();
        Some(item)
    }
}
