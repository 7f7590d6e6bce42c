use std::fmt;

/// Ordered sequence of argument tokens for the console runner.
///
/// Token order is significant and reproducible. The list never executes
/// anything; the caller merges it into a full invocation with `append_to`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentList {
    tokens: Vec<String>,
}

impl ArgumentList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }

    /// Appends `value` wrapped in literal double quotes as one token.
    pub fn append_quoted(&mut self, value: impl AsRef<str>) {
        self.tokens.push(format!("\"{}\"", value.as_ref()));
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }

    /// Pushes every token onto `base`, in order. The composition step is
    /// the caller's: this type never owns the rest of the invocation.
    pub fn append_to(&self, base: &mut Vec<String>) {
        base.extend(self.tokens.iter().cloned());
    }

    pub fn into_vec(self) -> Vec<String> {
        self.tokens
    }
}

impl fmt::Display for ArgumentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

impl IntoIterator for ArgumentList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl<'a> IntoIterator for &'a ArgumentList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_keeps_order() {
        let mut args = ArgumentList::new();
        args.append("-nunit");
        args.append_quoted("/out/MyTests.xml");
        assert_eq!(args.as_slice(), ["-nunit", "\"/out/MyTests.xml\""]);
    }

    #[test]
    fn display_joins_with_spaces() {
        let mut args = ArgumentList::new();
        args.append("-parallel all");
        args.append("-maxthreads 4");
        assert_eq!(args.to_string(), "-parallel all -maxthreads 4");
    }

    #[test]
    fn append_to_extends_a_base_invocation() {
        let mut args = ArgumentList::new();
        args.append("-html");
        args.append_quoted("/out/MyTests.html");

        let mut base = vec!["test".to_string(), "My.csproj".to_string()];
        args.append_to(&mut base);
        assert_eq!(base, ["test", "My.csproj", "-html", "\"/out/MyTests.html\""]);
        // the list itself is untouched
        assert_eq!(args.len(), 2);
    }
}
