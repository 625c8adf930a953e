use std::collections::HashMap;

/// Last rendered signal per symbol. Volatile: lives for the process only,
/// so every symbol notifies on the first pass after a restart.
#[derive(Debug, Default)]
pub struct SignalMemory {
    last: HashMap<String, String>,
}

impl SignalMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, symbol: &str) -> Option<&str> {
        self.last.get(symbol).map(String::as_str)
    }

    pub fn update(&mut self, symbol: &str, rendered: impl Into<String>) {
        self.last.insert(symbol.to_string(), rendered.into());
    }
}
