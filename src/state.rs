/// The selected trader's address. Starts empty, is set to the first trader on
/// the first non-empty load, and is overwritten by every card click.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    address: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
        }
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn is_selected(&self, address: &str) -> bool {
        self.address() == Some(address)
    }

    /// Card click: replace the selection unconditionally.
    pub fn select(&mut self, address: impl Into<String>) {
        self.address = Some(address.into());
    }

    /// Select `address` only if nothing is selected yet, and return the
    /// selection afterwards.
    pub fn select_if_unset(&mut self, address: &str) -> &str {
        self.address.get_or_insert_with(|| address.to_string())
    }
}
