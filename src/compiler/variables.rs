use crate::scan::scan_model::Element;

use super::locator::parse_locator;

/// `*** Variables ***` section for every live element, in scan order.
pub fn variables_block(elements: &[Element]) -> String {
    let mut out = String::from("*** Variables ***\n");
    for el in elements.iter().filter(|el| !el.deleted) {
        out.push_str(&variable_line(el));
        out.push('\n');
    }
    out
}

/// `${name} = \t<strategy>=<value>` for one element.
pub fn variable_line(element: &Element) -> String {
    let name: String = element
        .display_name
        .chars()
        .filter(|c| !matches!(c, '$' | '{' | '}'))
        .collect();
    let locator = parse_locator(&element.locator_expression);
    if locator.strategy.is_empty() {
        format!("${{{}}} = \t{}", name, locator.value)
    } else {
        format!("${{{}}} = \t{}={}", name, locator.strategy, locator.value)
    }
}
