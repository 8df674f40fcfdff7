/// In-app session history. Entries are only ever appended.
#[derive(Debug, Clone, Default)]
pub(crate) struct History {
    entries: Vec<String>,
}

impl History {
    pub(crate) fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
        }
    }

    pub(crate) fn push(&mut self, url: impl Into<String>) {
        self.entries.push(url.into());
    }

    pub(crate) fn current(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub(crate) fn entries(&self) -> &[String] {
        &self.entries
    }
}
