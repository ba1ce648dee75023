/// Options for a [`crate::Renderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Skip `afterMount` for nodes that left the document before the post-insertion pass reached
    /// them. Their attachments are cleared either way.
    pub skip_disconnected: bool,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip_disconnected(mut self, skip: bool) -> Self {
        self.skip_disconnected = skip;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            skip_disconnected: true,
        }
    }
}
