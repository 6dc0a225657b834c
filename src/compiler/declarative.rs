use crate::recorder::step::Step;

use super::compiler::DialectRules;

const HEADER: &str = "*** Settings ***\nLibrary    AppiumLibrary\n\n*** Test Cases ***\nRecorded Scenario\n";

/// Keyword-style suite (Robot Framework with AppiumLibrary).
pub struct Declarative;

impl DialectRules for Declarative {
    fn header(&self) -> String {
        HEADER.to_string()
    }

    /// A test case needs at least one keyword to be valid.
    fn empty_body(&self) -> String {
        "    No Operation\n".to_string()
    }

    fn statement(&self, _index: usize, step: &Step) -> String {
        let line = match step {
            Step::ElementClick { locator_expression } => {
                format!("Click Element    {}", robot_arg(locator_expression))
            }
            Step::Tap { x, y } => format!("Tap    {}    {}", x, y),
            Step::Scroll { direction } => format!("Swipe    {}", direction),
            Step::Back => "Go Back".to_string(),
            Step::HideKeyboard => "Hide Keyboard".to_string(),
            Step::SendKeys {
                locator_expression,
                text,
            } => format!(
                "Input Text    {}    {}",
                robot_arg(locator_expression),
                robot_arg(text)
            ),
            Step::AssertVisible { locator_expression } => {
                format!("Element Should Be Visible    {}", robot_arg(locator_expression))
            }
            Step::AssertText {
                locator_expression,
                expected,
            } => format!(
                "Element Text Should Be    {}    {}",
                robot_arg(locator_expression),
                robot_arg(expected)
            ),
        };
        format!("    {}\n", line)
    }
}

/// Make a value safe as a single keyword argument. Robot splits arguments
/// on runs of spaces, starts comments at `#` and expands `${..}`, `@{..}`,
/// `&{..}` and `%{..}`, so all of those are escaped.
pub fn robot_arg(value: &str) -> String {
    if value.is_empty() {
        return "${EMPTY}".to_string();
    }

    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len());
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '#' => out.push_str("\\#"),
            '$' | '@' | '&' | '%' if chars.get(i + 1) == Some(&'{') => {
                out.push('\\');
                out.push(c);
            }
            // A lone inner space is literal; leading, trailing and repeated
            // spaces would be read as separators.
            ' ' if i == 0 || i == chars.len() - 1 || chars[i - 1] == ' ' => {
                out.push_str("${SPACE}");
            }
            _ => out.push(c),
        }
    }
    out
}
