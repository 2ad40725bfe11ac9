//! Command construction for nmcli invocations
//!
//! Builds the argument vector handed to the process spawner and renders
//! ready-to-run shell strings for the interactive commands that are only
//! formatted, never executed (`con edit`, `con monitor`).
//!
//! Execution always goes through the argv vector, so no shell is involved
//! and no word-splitting can occur. Quoting matters only for the rendered
//! string form, where every token must survive re-splitting as a single
//! literal word.

use std::borrow::Cow;

/// Accumulates nmcli arguments in order. Construction is pure; any
/// caller-supplied value is carried through as one literal token.
#[derive(Debug, Clone, Default)]
pub struct CommandBuilder {
    args: Vec<String>,
}

impl CommandBuilder {
    pub fn new() -> Self {
        Self { args: Vec::new() }
    }

    /// Builder starting with `--mode multiline`, used by every query
    /// whose output feeds the record parser.
    pub fn multiline() -> Self {
        Self::new().arg("--mode").arg("multiline")
    }

    /// Append one token.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several tokens in order.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append `key value` pairs in caller order, as nmcli expects for
    /// `con add` / `con modify` option lists.
    pub fn options<'a, I>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in options {
            self.args.push(key.to_string());
            self.args.push(value.to_string());
        }
        self
    }

    /// The token list, ready for `tokio::process::Command::args`.
    pub fn argv(&self) -> &[String] {
        &self.args
    }

    /// Render `[sudo ]nmcli <tokens...>` with every token quoted so a
    /// POSIX shell re-splits it to exactly the original tokens.
    pub fn render(&self, elevate: bool) -> String {
        let mut rendered = String::new();
        if elevate {
            rendered.push_str("sudo ");
        }
        rendered.push_str("nmcli");
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(&quote(arg));
        }
        rendered
    }
}

/// Quote one token for a POSIX shell. NUL bytes cannot appear in an
/// argv entry and are stripped rather than rejected, keeping this layer
/// error-free.
pub fn quote(arg: &str) -> String {
    let cleaned: Cow<'_, str> = if arg.contains('\0') {
        Cow::Owned(arg.replace('\0', ""))
    } else {
        Cow::Borrowed(arg)
    };
    match shlex::try_quote(&cleaned) {
        Ok(quoted) => quoted.into_owned(),
        // Unreachable once NULs are stripped; fall back to the bare token
        Err(_) => cleaned.into_owned(),
    }
}
