/// One `[section]` of a configuration file, with its key/value entries in
/// file order. Keys are stored lowercased; lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfSection {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

impl ConfSection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a key, replacing an existing entry in place or appending.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let key = key.to_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }
}

/// A parsed configuration file: an ordered list of sections. Section order
/// and keys this daemon does not understand survive a read/rewrite cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfDocument {
    pub sections: Vec<ConfSection>,
}

impl ConfDocument {
    pub fn section(&self, name: &str) -> Option<&ConfSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut ConfSection> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    pub fn push_section(&mut self, section: ConfSection) {
        self.sections.push(section);
    }

    /// Remove a section by name. Returns false if it was not present.
    pub fn remove_section(&mut self, name: &str) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.name != name);
        self.sections.len() != before
    }
}
