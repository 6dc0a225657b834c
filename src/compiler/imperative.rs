use crate::recorder::step::{ScrollDirection, Step};

use super::compiler::DialectRules;
use super::locator::parse_locator;

const HEADER: &str = r#"import pytest
from appium import webdriver
from appium.webdriver.common.appiumby import AppiumBy


def swipe_by_ratio(driver, start_x, start_y, end_x, end_y, duration=300):
    size = driver.get_window_size()
    driver.swipe(
        int(size["width"] * start_x),
        int(size["height"] * start_y),
        int(size["width"] * end_x),
        int(size["height"] * end_y),
        duration,
    )


def test_scenario(driver):
"#;

/// Programmatic pytest module driving the Appium Python client.
pub struct Imperative;

impl DialectRules for Imperative {
    fn header(&self) -> String {
        HEADER.to_string()
    }

    fn empty_body(&self) -> String {
        "    pass\n".to_string()
    }

    fn statement(&self, index: usize, step: &Step) -> String {
        let line = match step {
            Step::ElementClick { locator_expression } => {
                format!("{}.click()", find_call(locator_expression))
            }
            Step::Tap { x, y } => format!("driver.tap([({}, {})])", x, y),
            Step::Scroll { direction } => {
                let (sx, sy, ex, ey) = swipe_ratios(*direction);
                format!("swipe_by_ratio(driver, {}, {}, {}, {})", sx, sy, ex, ey)
            }
            Step::Back => "driver.back()".to_string(),
            Step::HideKeyboard => "driver.hide_keyboard()".to_string(),
            Step::SendKeys {
                locator_expression,
                text,
            } => format!("{}.send_keys({})", find_call(locator_expression), py_str(text)),
            Step::AssertVisible { locator_expression } => {
                format!("assert {}.is_displayed()", find_call(locator_expression))
            }
            Step::AssertText {
                locator_expression,
                expected,
            } => format!(
                "assert {}.text == {}",
                find_call(locator_expression),
                py_str(expected)
            ),
        };
        format!("    # Step {}\n    {}\n", index + 1, line)
    }
}

fn find_call(locator_expression: &str) -> String {
    let locator = parse_locator(locator_expression);
    format!(
        "driver.find_element(AppiumBy.{}, {})",
        locator.finder.appium_by(),
        py_str(locator.value)
    )
}

/// Start/end points as fractions of the screen, swiping along the centre
/// line. Scrolling down drags the finger upwards.
pub fn swipe_ratios(direction: ScrollDirection) -> (f64, f64, f64, f64) {
    match direction {
        ScrollDirection::Down => (0.5, 0.7, 0.5, 0.3),
        ScrollDirection::Up => (0.5, 0.3, 0.5, 0.7),
        ScrollDirection::Right => (0.7, 0.5, 0.3, 0.5),
        ScrollDirection::Left => (0.3, 0.5, 0.7, 0.5),
    }
}

/// Double-quoted Python string literal.
pub fn py_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
