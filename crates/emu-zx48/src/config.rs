//! Machine configuration.

/// Configuration for creating a [`crate::Zx48`] machine.
pub struct Zx48Config {
    /// 16,384-byte ROM image.
    pub rom: Vec<u8>,
}

impl Zx48Config {
    #[must_use]
    pub fn new(rom: Vec<u8>) -> Self {
        Self { rom }
    }
}
