//! Generated sub-pipeline names.

/// Hands out `<prefix><n>` names with a strictly increasing `n`.
#[derive(Debug, Clone)]
pub struct NameGenerator {
    prefix: String,
    counter: u64,
}

impl NameGenerator {
    /// Creates a generator whose first name ends in `1`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 0,
        }
    }

    /// Returns the next name for which `taken` is false.
    ///
    /// Counter values are consumed even when skipped, so a name is never
    /// produced twice.
    pub fn next_name(&mut self, taken: impl Fn(&str) -> bool) -> String {
        loop {
            self.counter += 1;
            let name = format!("{}{}", self.prefix, self.counter);
            if !taken(&name) {
                return name;
            }
        }
    }

    /// Changes the prefix of future names. The counter keeps running.
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    /// Returns how many counter values have been consumed.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_increase() {
        let mut names = NameGenerator::new("subPipeline");
        assert_eq!(names.next_name(|_| false), "subPipeline1");
        assert_eq!(names.next_name(|_| false), "subPipeline2");
        assert_eq!(names.issued(), 2);
    }

    #[test]
    fn test_skips_taken_names() {
        let mut names = NameGenerator::new("p");
        let name = names.next_name(|n| n == "p1" || n == "p2");
        assert_eq!(name, "p3");
        assert_eq!(names.next_name(|_| false), "p4");
    }

    #[test]
    fn test_set_prefix_keeps_counter() {
        let mut names = NameGenerator::new("subPipeline");
        assert_eq!(names.next_name(|_| false), "subPipeline1");

        names.set_prefix("subPipeline");
        assert_eq!(names.next_name(|_| false), "subPipeline2");

        names.set_prefix("branch");
        assert_eq!(names.next_name(|_| false), "branch3");
    }
}
