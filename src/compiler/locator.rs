/// Finder API a locator translates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finder {
    Id,
    XPath,
}

impl Finder {
    /// `AppiumBy` constant name.
    pub fn appium_by(&self) -> &'static str {
        match self {
            Finder::Id => "ID",
            Finder::XPath => "XPATH",
        }
    }
}

/// A `<strategy>=<value>` locator expression split on its first `=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locator<'a> {
    pub strategy: &'a str,
    pub value: &'a str,
    pub finder: Finder,
}

/// Split a locator expression. Only the first `=` separates, so values such
/// as `//a[@text='x=y']` stay intact. An expression without `=` has an empty
/// strategy and is treated as a bare expression.
pub fn parse_locator(expression: &str) -> Locator<'_> {
    let (strategy, value) = expression.split_once('=').unwrap_or(("", expression));
    let finder = if strategy.trim() == "id" {
        Finder::Id
    } else {
        Finder::XPath
    };
    Locator {
        strategy,
        value,
        finder,
    }
}
